//! Visual Basic and VBScript syntax analysis.
//!
//! `vbsyntax` turns Visual Basic .NET (7.1 and 8.0) and VBScript source
//! text into an arena-allocated syntax tree. Parsing never stops at the
//! first problem: every entry point produces a complete tree, with `Bad`
//! nodes where input could not be understood, and a list of
//! [`SyntaxError`]s.
//!
//! The functions in this crate take source text directly. For control over
//! the scanner, directive tables or the error sink, use the [`ast`] entry
//! points with a [`Scanner`].
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let source = r#"
//! Class Player
//!     Private health As Integer = 100
//!
//!     Public Sub TakeDamage(ByVal amount As Integer)
//!         health -= amount
//!     End Sub
//! End Class
//! "#;
//!
//! match vbsyntax::parse(source, &arena) {
//!     Ok(file) => println!("Parsed {} declarations", file.declarations().len()),
//!     Err(errors) => eprintln!("Syntax errors:\n{errors}"),
//! }
//! ```

use bumpalo::Bump;

pub use vbsyntax_core::{
    LanguageVersion, Location, ScanError, Span, SyntaxError, SyntaxErrorKind, SyntaxErrors,
};
pub use vbsyntax_parser::ast::{self, DirectiveTables, File, ScriptBlock};
pub use vbsyntax_parser::lexer::{self, Scanner, ScannerOptions, Token, TokenKind};

/// Parse a source file, failing if any syntax error was found.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse<'ast>(source: &str, arena: &'ast Bump) -> Result<File<'ast>, SyntaxErrors> {
    into_result(parse_lenient(source, arena))
}

/// Parse a source file, returning the tree together with any errors.
///
/// The tree is always complete; erroneous regions hold `Bad` nodes.
///
/// ```
/// use bumpalo::Bump;
///
/// let arena = Bump::new();
/// let (file, errors) = vbsyntax::parse_lenient("Class C\n    Sub F()\n", &arena);
///
/// assert_eq!(file.declarations().len(), 1);
/// assert_eq!(errors.len(), 2);
/// ```
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_lenient<'ast>(source: &str, arena: &'ast Bump) -> (File<'ast>, SyntaxErrors) {
    parse_with_options(source, arena, ScannerOptions::default())
}

/// Parse a source file written for a particular language version.
pub fn parse_with_options<'ast>(
    source: &str,
    arena: &'ast Bump,
    options: ScannerOptions,
) -> (File<'ast>, SyntaxErrors) {
    let mut errors = SyntaxErrors::new();
    let file = ast::parse_file(Scanner::with_options(source, arena, options), &mut errors);
    (file, errors)
}

/// Parse a VBScript-style script, failing if any syntax error was found.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_script<'ast>(
    source: &str,
    arena: &'ast Bump,
) -> Result<ScriptBlock<'ast>, SyntaxErrors> {
    into_result(parse_script_lenient(source, arena))
}

/// Parse a VBScript-style script, returning the tree together with any
/// errors.
///
/// ```
/// use bumpalo::Bump;
///
/// let arena = Bump::new();
/// let (script, errors) = vbsyntax::parse_script_lenient("MsgBox \"hi\"\nWScript.Quit 1\n", &arena);
///
/// assert!(errors.is_empty());
/// assert_eq!(script.statements().len(), 2);
/// ```
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_script_lenient<'ast>(
    source: &str,
    arena: &'ast Bump,
) -> (ScriptBlock<'ast>, SyntaxErrors) {
    let mut errors = SyntaxErrors::new();
    let script = ast::parse_script_file(Scanner::new(source, arena), &mut errors);
    (script, errors)
}

/// Parse a single expression.
///
/// ```
/// use bumpalo::Bump;
/// use vbsyntax::ast::{BinaryOperator, Expression};
///
/// let arena = Bump::new();
/// let expression = vbsyntax::parse_expression("1 + 2 * 3", &arena).unwrap();
///
/// assert!(matches!(expression, Expression::Binary(b) if b.op == BinaryOperator::Plus));
/// ```
pub fn parse_expression<'ast>(
    source: &str,
    arena: &'ast Bump,
) -> Result<ast::Expression<'ast>, SyntaxErrors> {
    let mut errors = SyntaxErrors::new();
    let expression = ast::parse_expression(Scanner::new(source, arena), &mut errors);
    into_result((expression, errors))
}

fn into_result<T>((tree, errors): (T, SyntaxErrors)) -> Result<T, SyntaxErrors> {
    if errors.is_empty() {
        Ok(tree)
    } else {
        Err(errors)
    }
}
