//! Core types shared by the vbsyntax scanner and parser.
//!
//! - [`Location`] / [`Span`]: positions and half-open source ranges
//! - [`LanguageVersion`]: the version gate for version-dependent syntax
//! - [`SyntaxError`] / [`SyntaxErrorKind`] / [`SyntaxErrors`]: diagnostics
//! - [`ScanError`]: misuse of the scanner API

pub mod error;
pub mod span;
pub mod version;

pub use error::{ScanError, SyntaxError, SyntaxErrorKind, SyntaxErrors};
pub use span::{Location, Span};
pub use version::LanguageVersion;
