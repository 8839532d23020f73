//! Lexical analysis: characters to tokens.

mod chars;
mod cursor;
mod literals;
mod scanner;
mod token;

pub use chars::half_width;
pub use scanner::{Mark, Scanner, ScannerOptions};
pub use token::{
    DateValue, DecimalValue, IdentifierValue, IntegerBase, Keyword, Token, TokenKind, TokenValue,
    TypeCharacter, lookup_keyword,
};
