//! Visual Basic and VBScript parser crate.
//!
//! This crate provides the scanner and parser for Visual Basic .NET and
//! VBScript source text. It includes:
//! - Lexical analysis with line continuations, type characters and
//!   contextual keywords
//! - Abstract Syntax Tree (AST) definitions, allocated in a [`bumpalo::Bump`]
//! - Recursive-descent parsing with error recovery
//! - Conditional compilation and `#Region`/`#ExternalSource` directives
//! - Parent links and uniform traversal of the finished tree
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use vbsyntax_core::SyntaxErrors;
//! use vbsyntax_parser::{Scanner, parse_script_file};
//!
//! let arena = Bump::new();
//! let source = "Dim total\ntotal = 0\nFor i = 1 To 10\n    total = total + i\nNext\n";
//!
//! let mut errors = SyntaxErrors::new();
//! let script = parse_script_file(Scanner::new(source, &arena), &mut errors);
//! assert!(errors.is_empty(), "{errors}");
//! assert_eq!(script.statements().len(), 3);
//! ```

// Lexer module
pub mod lexer;

// AST module
pub mod ast;

// Re-export commonly used items at crate root
pub use ast::{
    File, ScriptBlock, parse_declaration, parse_expression, parse_file, parse_file_with_tables,
    parse_script_file, parse_script_file_with_tables, parse_statement, parse_type_name,
};
pub use lexer::{Scanner, ScannerOptions, Token, TokenKind};
