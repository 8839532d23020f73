//! Abstract Syntax Tree (AST) for Visual Basic and VBScript.
//!
//! This module provides:
//! - AST node definitions for names, types, expressions, statements and
//!   declarations
//! - The recursive-descent parser that builds them from a [`Scanner`]
//! - [`NodeRef`], [`walk`] and [`ParentMap`] for uniform traversal
//!
//! Parsing never fails on malformed input. Every entry point returns a
//! complete tree, with `Bad` placeholders where a required piece could not
//! be parsed, and appends diagnostics to a caller-owned [`SyntaxErrors`].
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use vbsyntax_core::SyntaxErrors;
//! use vbsyntax_parser::ast::parse_file;
//! use vbsyntax_parser::lexer::Scanner;
//!
//! let arena = Bump::new();
//! let source = "Module Program\n    Sub Main()\n        Dim x As Integer = 1\n    End Sub\nEnd Module\n";
//! let mut errors = SyntaxErrors::new();
//! let file = parse_file(Scanner::new(source, &arena), &mut errors);
//!
//! assert!(errors.is_empty());
//! assert_eq!(file.declarations.len(), 1);
//! ```
//!
//! [`Scanner`]: crate::lexer::Scanner

use vbsyntax_core::Span;

#[cfg(doc)]
use vbsyntax_core::SyntaxErrors;

pub mod list;
pub mod names;
pub mod ops;

mod parser;
mod type_parser;
pub mod types;

pub mod expr;
mod expr_parser;

mod block;
pub mod stmt;
mod stmt_parser;

pub mod decl;
mod decl_parser;

mod directives;
pub mod tree;

pub use decl::*;
pub use directives::{DirectiveTables, ExternalChecksum, ExternalLineMapping, SourceRegion};
pub use expr::*;
pub use list::*;
pub use names::*;
pub use ops::*;
pub use parser::{
    parse_declaration, parse_expression, parse_file, parse_file_with_tables, parse_script_file,
    parse_script_file_with_tables, parse_statement, parse_type_name,
};
pub use stmt::*;
pub use tree::{NodeRef, ParentMap, TreeType, walk};
pub use types::*;

/// A comment, with or without the `REM` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment<'ast> {
    /// Text after the quote or `REM`, up to the end of the line.
    pub text: &'ast str,
    pub is_rem: bool,
    pub span: Span,
}

/// A parsed source file: a sequence of declarations.
///
/// All nodes live in the arena passed to the scanner and remain valid for
/// the arena's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct File<'ast> {
    pub declarations: DeclarationList<'ast>,
    /// Every comment in the file, in source order.
    pub comments: &'ast [Comment<'ast>],
    pub span: Span,
}

impl<'ast> File<'ast> {
    /// The top-level declarations.
    pub fn declarations(&self) -> &'ast [Declaration<'ast>] {
        self.declarations.declarations
    }
}

/// A parsed script: statements and declarations in any order, with no
/// enclosing type required.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptBlock<'ast> {
    pub statements: StatementList<'ast>,
    pub comments: &'ast [Comment<'ast>],
    pub span: Span,
}

impl<'ast> ScriptBlock<'ast> {
    pub fn statements(&self) -> &'ast [Statement<'ast>] {
        self.statements.statements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Scanner;
    use bumpalo::Bump;
    use vbsyntax_core::SyntaxErrors;

    #[test]
    fn empty_file() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let file = parse_file(Scanner::new("", &arena), &mut errors);
        assert!(errors.is_empty());
        assert!(file.declarations().is_empty());
        assert!(file.comments.is_empty());
    }

    #[test]
    fn comments_are_collected() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let source = "' first\nREM second\nClass C ' third\nEnd Class\n";
        let file = parse_file(Scanner::new(source, &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        let texts: Vec<_> = file.comments.iter().map(|c| c.text.trim()).collect();
        assert_eq!(texts, ["first", "second", "third"]);
        assert!(file.comments[1].is_rem);
        assert!(!file.comments[0].is_rem);
    }

    #[test]
    fn script_mixes_statements_and_declarations() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let source = "x = 1\nSub Show(v)\n  MsgBox v\nEnd Sub\nShow x\n";
        let script = parse_script_file(Scanner::new(source, &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        let statements = script.statements();
        assert_eq!(statements.len(), 3);
        assert!(matches!(statements[0], Statement::Assignment(_)));
        assert!(matches!(
            statements[1],
            Statement::Declaration(Declaration::Method(_))
        ));
        assert!(matches!(statements[2], Statement::Call(_)));
    }
}
