//! The scanner: characters in, tokens out, with replay.
//!
//! Every token produced is appended to a log. Reading moves a cursor over
//! the log, lexing more source only when the cursor runs past the end, so
//! any earlier position can be revisited with [`Scanner::reset`] or
//! [`Scanner::seek`] and yields exactly the same tokens again.

use std::io::Read;

use bumpalo::Bump;
use vbsyntax_core::{LanguageVersion, Location, ScanError, Span, SyntaxErrorKind};

use super::chars::{
    half_width, is_blank, is_double_quote, is_identifier_part, is_identifier_start,
    is_line_terminator, is_single_quote,
};
use super::cursor::Cursor;
use super::token::{IdentifierValue, Token, TokenKind, TokenValue, TypeCharacter, lookup_keyword};

/// Scanner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerOptions {
    pub version: LanguageVersion,
    pub tab_spaces: u32,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            version: LanguageVersion::default(),
            tab_spaces: 4,
        }
    }
}

impl ScannerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: LanguageVersion) -> Self {
        self.version = version;
        self
    }

    /// Set the tab width; must be at least 1.
    pub fn with_tab_spaces(mut self, tab_spaces: u32) -> Result<Self, ScanError> {
        if tab_spaces < 1 {
            return Err(ScanError::InvalidTabSpaces(tab_spaces));
        }
        self.tab_spaces = tab_spaces;
        Ok(self)
    }
}

/// A saved read position in a scanner's token log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mark(usize);

/// Tokenizer over one source text.
///
/// The scanner is consumed by the parse entry points; dropping it releases
/// the source.
pub struct Scanner<'src, 'ast> {
    pub(super) cursor: Cursor<'src>,
    pub(super) arena: &'ast Bump,
    version: LanguageVersion,
    tab_spaces: u32,
    /// Every token produced so far.
    tokens: Vec<Token<'ast>>,
    /// Index of the next token to read.
    position: usize,
    /// Scratch buffer for literal text.
    pub(super) scratch: String,
}

impl<'src, 'ast> Scanner<'src, 'ast> {
    /// Create a scanner over `source` with default options.
    pub fn new(source: &'src str, arena: &'ast Bump) -> Self {
        Self::with_options(source, arena, ScannerOptions::default())
    }

    pub fn with_options(source: &'src str, arena: &'ast Bump, options: ScannerOptions) -> Self {
        let tab_spaces = options.tab_spaces.max(1);
        let mut cursor = Cursor::new(source, tab_spaces);
        cursor.eat('\u{FEFF}');
        Self {
            cursor,
            arena,
            version: options.version,
            tab_spaces,
            tokens: Vec::new(),
            position: 0,
            scratch: String::new(),
        }
    }

    /// The language version gating version-dependent syntax.
    #[inline]
    pub fn version(&self) -> LanguageVersion {
        self.version
    }

    /// The arena token payloads are allocated in.
    #[inline]
    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    /// Number of tokens produced so far.
    #[inline]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Columns a tab character advances.
    #[inline]
    pub fn tab_spaces(&self) -> u32 {
        self.tab_spaces
    }

    /// Change the tab width for text not yet scanned.
    pub fn set_tab_spaces(&mut self, tab_spaces: u32) -> Result<(), ScanError> {
        if tab_spaces < 1 {
            return Err(ScanError::InvalidTabSpaces(tab_spaces));
        }
        self.tab_spaces = tab_spaces;
        self.cursor.set_tab_spaces(tab_spaces);
        Ok(())
    }

    // =========================================
    // Token log
    // =========================================

    /// The next token, without consuming it.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn peek(&mut self) -> Token<'ast> {
        self.token_at(self.position)
    }

    /// Consume and return the next token. Reading at the end of the stream
    /// keeps returning the end-of-stream token.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn read(&mut self) -> Token<'ast> {
        let token = self.token_at(self.position);
        if token.kind != TokenKind::EndOfStream {
            self.position += 1;
        }
        token
    }

    /// The current read position.
    #[inline]
    pub fn mark(&self) -> Mark {
        Mark(self.position)
    }

    /// Return to a position obtained from [`Scanner::mark`].
    pub fn reset(&mut self, mark: Mark) -> Result<(), ScanError> {
        if mark.0 > self.tokens.len() {
            return Err(ScanError::InvalidMark {
                mark: mark.0,
                len: self.tokens.len(),
            });
        }
        self.position = mark.0;
        Ok(())
    }

    /// Reposition so that the next read returns `token`, searching the log
    /// backward from the current position.
    pub fn seek(&mut self, token: &Token<'ast>) -> Result<(), ScanError> {
        let upper = self.position.min(self.tokens.len().saturating_sub(1));
        let found = self.tokens[..self.tokens.len().min(upper + 1)]
            .iter()
            .rposition(|t| t == token);
        match found {
            Some(index) => {
                self.position = index;
                Ok(())
            }
            None => Err(ScanError::UnknownToken { span: token.span }),
        }
    }

    /// The token before the read position.
    pub fn previous(&self) -> Result<Token<'ast>, ScanError> {
        match self.position.checked_sub(1) {
            Some(index) => Ok(self.tokens[index]),
            None => Err(ScanError::NoPreviousToken),
        }
    }

    /// Whether no token has been consumed yet.
    #[inline]
    pub fn is_on_first_token(&self) -> bool {
        self.position == 0
    }

    /// Read up to `buffer.len()` tokens, stopping after end of stream.
    /// Returns the number of tokens stored.
    pub fn read_block(&mut self, buffer: &mut [Token<'ast>]) -> usize {
        let mut count = 0;
        for slot in buffer.iter_mut() {
            let token = self.read();
            *slot = token;
            count += 1;
            if token.kind == TokenKind::EndOfStream {
                break;
            }
        }
        count
    }

    /// Read through the next line terminator (inclusive) or end of stream.
    pub fn read_line(&mut self) -> Vec<Token<'ast>> {
        let mut line = Vec::new();
        loop {
            let token = self.read();
            line.push(token);
            if matches!(token.kind, TokenKind::LineTerminator | TokenKind::EndOfStream) {
                return line;
            }
        }
    }

    /// Read every remaining token, including the end-of-stream token.
    pub fn read_to_end(&mut self) -> Vec<Token<'ast>> {
        let mut rest = Vec::new();
        loop {
            let token = self.read();
            rest.push(token);
            if token.kind == TokenKind::EndOfStream {
                return rest;
            }
        }
    }

    fn token_at(&mut self, index: usize) -> Token<'ast> {
        while self.tokens.len() <= index {
            if let Some(last) = self.tokens.last()
                && last.kind == TokenKind::EndOfStream
            {
                return *last;
            }
            let token = self.scan_token();
            self.tokens.push(token);
        }
        self.tokens[index]
    }

    // =========================================
    // Scanning
    // =========================================

    fn scan_token(&mut self) -> Token<'ast> {
        loop {
            self.cursor.eat_while(is_blank);
            let start = self.cursor.location();
            let start_offset = self.cursor.offset();

            let Some(c) = self.cursor.peek() else {
                return self.make(TokenKind::EndOfStream, start, TokenValue::None);
            };

            if is_line_terminator(c) {
                self.cursor.advance();
                if c == '\r' {
                    self.cursor.eat('\n');
                }
                return self.make(TokenKind::LineTerminator, start, TokenValue::None);
            }

            if is_single_quote(c) {
                self.cursor.advance();
                return self.scan_comment(start, false);
            }

            let hc = half_width(c);
            if hc == '_' && !self.cursor.peek_nth(1).is_some_and(is_identifier_part) {
                if self.scan_line_continuation() {
                    continue;
                }
                return self.make_error(SyntaxErrorKind::InvalidLineContinuation, start);
            }

            return match hc {
                '[' => self.scan_escaped_identifier(start),
                c if is_identifier_start(c) => self.scan_identifier(start, start_offset),
                _ if is_double_quote(c) => self.scan_string(start),
                '#' => self.scan_date_or_pound(start),
                '0'..='9' => self.scan_number(start),
                '.' if self.cursor.peek_nth(1).is_some_and(|n| half_width(n).is_ascii_digit()) => {
                    self.scan_number(start)
                }
                '&' if self.cursor.peek_nth(1).is_some_and(|n| {
                    let n = half_width(n);
                    matches!(n, 'h' | 'H' | 'o' | 'O') || n.is_ascii_digit()
                }) =>
                {
                    self.scan_number(start)
                }
                _ => self.scan_punctuator(start),
            };
        }
    }

    /// Consume `_` followed by blanks and a line terminator (or the end of
    /// the stream). Returns false, consuming only the underscore, when
    /// anything else follows.
    fn scan_line_continuation(&mut self) -> bool {
        let saved = self.cursor.clone();
        self.cursor.advance();
        self.cursor.eat_while(is_blank);
        match self.cursor.peek() {
            None => true,
            Some(c) if is_line_terminator(c) => {
                self.cursor.advance();
                if c == '\r' {
                    self.cursor.eat('\n');
                }
                true
            }
            Some(_) => {
                self.cursor = saved;
                self.cursor.advance();
                false
            }
        }
    }

    fn scan_comment(&mut self, start: Location, is_rem: bool) -> Token<'ast> {
        let text = self.cursor.eat_while(|c| !is_line_terminator(c));
        let text = self.arena.alloc_str(text);
        self.make(TokenKind::Comment, start, TokenValue::Comment { text, is_rem })
    }

    fn scan_identifier(&mut self, start: Location, start_offset: usize) -> Token<'ast> {
        self.cursor.eat_while(is_identifier_part);
        let text = self.cursor.slice_from(start_offset);
        let type_char = self.scan_identifier_type_character();
        let keyword = lookup_keyword(text, self.version);

        if type_char == TypeCharacter::None && keyword.is_some_and(|k| k.kind == TokenKind::Rem) {
            self.cursor.eat_if(is_blank);
            return self.scan_comment(start, true);
        }

        let (kind, unreserved) = match keyword {
            Some(k) if k.reserved && type_char == TypeCharacter::None => (k.kind, k.kind),
            Some(k) => (TokenKind::Identifier, k.kind),
            None => (TokenKind::Identifier, TokenKind::Identifier),
        };
        let text = self.arena.alloc_str(text);
        self.make(
            kind,
            start,
            TokenValue::Identifier(IdentifierValue {
                text,
                type_char,
                escaped: false,
                unreserved,
            }),
        )
    }

    fn scan_escaped_identifier(&mut self, start: Location) -> Token<'ast> {
        self.cursor.advance();
        let body_start = self.cursor.offset();
        if !self.cursor.check(is_identifier_start) {
            self.cursor.eat_while(|c| half_width(c) != ']' && !is_line_terminator(c));
            self.cursor.eat_if(|c| half_width(c) == ']');
            return self.make_error(SyntaxErrorKind::InvalidEscapedIdentifier, start);
        }
        self.cursor.eat_while(is_identifier_part);
        let text = self.cursor.slice_from(body_start);
        if self.cursor.eat_if(|c| half_width(c) == ']').is_none() {
            return self.make_error(SyntaxErrorKind::InvalidEscapedIdentifier, start);
        }
        let type_char = self.scan_identifier_type_character();
        let text = self.arena.alloc_str(text);
        self.make(
            TokenKind::Identifier,
            start,
            TokenValue::Identifier(IdentifierValue {
                text,
                type_char,
                escaped: true,
                unreserved: TokenKind::Identifier,
            }),
        )
    }

    /// A symbol type character after an identifier. `!` followed by
    /// something that can start an identifier is a dictionary lookup.
    fn scan_identifier_type_character(&mut self) -> TypeCharacter {
        let Some(c) = self.cursor.peek() else {
            return TypeCharacter::None;
        };
        let Some(type_char) = TypeCharacter::from_symbol(half_width(c)) else {
            return TypeCharacter::None;
        };
        if type_char == TypeCharacter::SingleSymbol
            && self.cursor.peek_nth(1).is_some_and(|n| is_identifier_start(n) || half_width(n) == '[')
        {
            return TypeCharacter::None;
        }
        self.cursor.advance();
        type_char
    }

    fn scan_string(&mut self, start: Location) -> Token<'ast> {
        self.cursor.advance();
        self.scratch.clear();
        loop {
            match self.cursor.peek() {
                None => return self.make_error(SyntaxErrorKind::InvalidStringLiteral, start),
                Some(c) if is_line_terminator(c) => {
                    return self.make_error(SyntaxErrorKind::InvalidStringLiteral, start);
                }
                Some(c) if is_double_quote(c) => {
                    self.cursor.advance();
                    if self.cursor.check(is_double_quote) {
                        self.cursor.advance();
                        self.scratch.push('"');
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    self.cursor.advance();
                    self.scratch.push(c);
                }
            }
        }

        if self.cursor.eat_if(|c| matches!(half_width(c), 'c' | 'C')).is_some() {
            let mut chars = self.scratch.chars();
            return match (chars.next(), chars.next()) {
                (Some(ch), None) => {
                    self.make(TokenKind::CharacterLiteral, start, TokenValue::Character(ch))
                }
                _ => self.make_error(SyntaxErrorKind::InvalidCharacterLiteral, start),
            };
        }

        let text = self.arena.alloc_str(&self.scratch);
        self.make(TokenKind::StringLiteral, start, TokenValue::String(text))
    }

    fn scan_punctuator(&mut self, start: Location) -> Token<'ast> {
        use TokenKind::*;

        let c = self.cursor.advance().map(half_width).unwrap_or('\0');
        let next = self.cursor.peek().map(half_width);
        let eat_next = |scanner: &mut Self, kind: TokenKind| {
            scanner.cursor.advance();
            kind
        };

        let kind = match (c, next) {
            ('(', _) => LeftParenthesis,
            (')', _) => RightParenthesis,
            ('{', _) => LeftCurlyBrace,
            ('}', _) => RightCurlyBrace,
            ('!', _) => Exclamation,
            ('#', _) => Pound,
            (',', _) => Comma,
            ('.', _) => Period,
            ('?', _) => QuestionMark,
            (':', Some('=')) => eat_next(self, ColonEquals),
            (':', _) => Colon,
            ('&', Some('=')) => eat_next(self, AmpersandEquals),
            ('&', _) => Ampersand,
            ('*', Some('=')) => eat_next(self, StarEquals),
            ('*', _) => Star,
            ('+', Some('=')) => eat_next(self, PlusEquals),
            ('+', _) => Plus,
            ('-', Some('=')) => eat_next(self, MinusEquals),
            ('-', _) => Minus,
            ('/', Some('=')) => eat_next(self, ForwardSlashEquals),
            ('/', _) => ForwardSlash,
            ('\\', Some('=')) => eat_next(self, BackwardSlashEquals),
            ('\\', _) => BackwardSlash,
            ('^', Some('=')) => eat_next(self, CaretEquals),
            ('^', _) => Caret,
            ('=', _) => Equals,
            ('<', Some('=')) => eat_next(self, LessThanEquals),
            ('<', Some('>')) => eat_next(self, NotEquals),
            ('<', Some('<')) => {
                self.cursor.advance();
                if self.cursor.eat_if(|c| half_width(c) == '=').is_some() {
                    LessThanLessThanEquals
                } else {
                    LessThanLessThan
                }
            }
            ('<', _) => LessThan,
            ('>', Some('=')) => eat_next(self, GreaterThanEquals),
            ('>', Some('>')) => {
                self.cursor.advance();
                if self.cursor.eat_if(|c| half_width(c) == '=').is_some() {
                    GreaterThanGreaterThanEquals
                } else {
                    GreaterThanGreaterThan
                }
            }
            ('>', _) => GreaterThan,
            _ => return self.make_error(SyntaxErrorKind::InvalidCharacter, start),
        };

        self.make(kind, start, TokenValue::None)
    }

    // =========================================
    // Token construction
    // =========================================

    pub(super) fn make(&self, kind: TokenKind, start: Location, value: TokenValue<'ast>) -> Token<'ast> {
        Token::new(kind, Span::new(start, self.cursor.location()), value)
    }

    pub(super) fn make_error(&self, kind: SyntaxErrorKind, start: Location) -> Token<'ast> {
        self.make(TokenKind::LexicalError, start, TokenValue::Error(kind))
    }
}

impl<'ast> Scanner<'ast, 'ast> {
    /// Create a scanner over text read from `reader`. The text is copied
    /// into the arena.
    pub fn from_reader<R: Read>(
        mut reader: R,
        arena: &'ast Bump,
        options: ScannerOptions,
    ) -> std::io::Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let source: &'ast str = arena.alloc_str(&text);
        Ok(Self::with_options(source, arena, options))
    }
}

impl<'ast> Iterator for Scanner<'_, 'ast> {
    type Item = Token<'ast>;

    /// Yields tokens up to and including the end-of-stream token.
    fn next(&mut self) -> Option<Token<'ast>> {
        if self.position > 0
            && self.tokens.get(self.position - 1).is_some_and(|t| t.kind == TokenKind::EndOfStream)
        {
            return None;
        }
        let token = self.peek();
        self.position += 1;
        Some(token)
    }
}
