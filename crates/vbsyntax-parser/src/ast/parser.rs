//! Parser infrastructure for Visual Basic and VBScript.
//!
//! Provides the [`Parser`] struct with token navigation, backtracking,
//! error reporting and resynchronization, and the public entry points.
//! The grammar is spread over `type_parser`, `expr_parser`, `stmt_parser`,
//! `decl_parser` and `directives`, each adding methods to [`Parser`].

use bumpalo::Bump;
use tracing::{debug, trace};
use vbsyntax_core::{LanguageVersion, Location, Span, SyntaxError, SyntaxErrorKind, SyntaxErrors};

use crate::ast::block::{BlockContext, Terminator};
use crate::ast::decl::{Declaration, Modifiers};
use crate::ast::decl_parser::Container;
use crate::ast::directives::{DirectiveState, DirectiveTables};
use crate::ast::expr::Expression;
use crate::ast::stmt::{BlockKind, NextStatement, Statement};
use crate::ast::types::TypeName;
use crate::ast::{Comment, File, ScriptBlock};
use crate::lexer::{Mark, Scanner, Token, TokenKind, TokenValue};

/// A `Next` that named more variables than the loop that read it. The
/// remaining variables close the enclosing `For` loops.
#[derive(Debug, Clone, Copy)]
pub(super) struct PendingNext<'ast> {
    pub(super) next: &'ast NextStatement<'ast>,
    /// Index of the variable for the next enclosing loop.
    pub(super) index: usize,
}

/// What the tokens at the read position start, looking past attribute
/// blocks and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LineStart {
    /// An executable statement, including `Dim`, `Const` and `Static` locals.
    Statement,
    /// A type or member declaration.
    Member,
    /// `Option`, `Imports`, `Inherits` or `Implements`.
    FileLevel,
}

/// The recursive-descent parser.
///
/// Tokens are pulled from the [`Scanner`] on demand; lookahead uses the
/// scanner's mark and reset. AST nodes are allocated in the scanner's
/// arena and diagnostics go to a caller-owned [`SyntaxErrors`].
///
/// At most one error is reported per statement or declaration: once an
/// error has been recorded, later errors in the same construct are
/// dropped until the next construct begins.
pub(crate) struct Parser<'src, 'ast, 'p> {
    pub(super) scanner: Scanner<'src, 'ast>,
    pub(super) arena: &'ast Bump,
    errors: &'p mut SyntaxErrors,
    /// Receives regions, line mappings and checksums, when requested.
    pub(super) tables: Option<&'p mut DirectiveTables>,
    error_in_construct: bool,
    /// Open blocks, innermost last.
    pub(super) blocks: Vec<BlockContext>,
    pub(super) directives: DirectiveState,
    comments: Vec<Comment<'ast>>,
    /// Nesting depth of single-line `If` statements being parsed.
    pub(super) line_if_depth: u32,
    pub(super) pending_next: Option<PendingNext<'ast>>,
    /// Statements and declarations may be mixed at the top level.
    pub(super) script: bool,
    /// The furthest zero-width placeholder created so far. Enclosing spans
    /// are extended to cover it.
    placeholder: Location,
}

impl<'src, 'ast, 'p> Parser<'src, 'ast, 'p> {
    pub(super) fn new(
        scanner: Scanner<'src, 'ast>,
        errors: &'p mut SyntaxErrors,
        tables: Option<&'p mut DirectiveTables>,
        script: bool,
    ) -> Self {
        let arena = scanner.arena();
        Self {
            scanner,
            arena,
            errors,
            tables,
            error_in_construct: false,
            blocks: Vec::new(),
            directives: DirectiveState::default(),
            comments: Vec::new(),
            line_if_depth: 0,
            pending_next: None,
            script,
            placeholder: Location::START,
        }
    }

    #[inline]
    pub(super) fn version(&self) -> LanguageVersion {
        self.scanner.version()
    }

    // ========================================================================
    // Token Navigation
    // ========================================================================

    /// Peek at the next significant token. Comments are recorded and
    /// skipped.
    pub(super) fn peek(&mut self) -> Token<'ast> {
        let token = self.scanner.peek();
        if token.kind != TokenKind::Comment {
            return token;
        }
        self.record_comment(token);
        // A comment always runs to the end of the line, so the token after
        // it is a line terminator or the end of the stream.
        let mark = self.scanner.mark();
        self.scanner.read();
        let next = self.scanner.peek();
        let restored = self.scanner.reset(mark);
        debug_assert!(restored.is_ok());
        next
    }

    #[inline]
    pub(super) fn peek_kind(&mut self) -> TokenKind {
        self.peek().kind
    }

    /// Peek `n` significant tokens ahead without consuming anything.
    pub(super) fn peek_nth(&mut self, n: usize) -> Token<'ast> {
        if n == 0 {
            return self.peek();
        }
        let mark = self.scanner.mark();
        for _ in 0..n {
            self.read();
        }
        let token = self.peek();
        self.backtrack(mark);
        token
    }

    /// Consume the next significant token. Sticks at the end of the stream.
    pub(super) fn read(&mut self) -> Token<'ast> {
        if self.scanner.peek().kind == TokenKind::Comment {
            let comment = self.scanner.read();
            self.record_comment(comment);
        }
        self.scanner.read()
    }

    #[inline]
    pub(super) fn check(&mut self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Whether the next token spells the contextual keyword `keyword`.
    #[inline]
    pub(super) fn check_contextual(&mut self, keyword: TokenKind) -> bool {
        self.peek().is_contextual(keyword)
    }

    /// Consume the next token if it is of the given kind.
    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        if self.check(kind) {
            Some(self.read())
        } else {
            None
        }
    }

    pub(super) fn eat_contextual(&mut self, keyword: TokenKind) -> Option<Token<'ast>> {
        if self.check_contextual(keyword) {
            Some(self.read())
        } else {
            None
        }
    }

    /// Consume a token of the given kind, or report `error` at the next
    /// token and consume nothing.
    pub(super) fn expect(&mut self, kind: TokenKind, error: SyntaxErrorKind) -> Option<Token<'ast>> {
        let token = self.eat(kind);
        if token.is_none() {
            self.report_unexpected(error);
        }
        token
    }

    /// A position the parser can return to.
    #[inline]
    pub(super) fn mark(&self) -> Mark {
        self.scanner.mark()
    }

    /// Return to a position taken with [`Parser::mark`].
    pub(super) fn backtrack(&mut self, mark: Mark) {
        let restored = self.scanner.reset(mark);
        debug_assert!(restored.is_ok(), "mark taken from another scanner");
        let next = self.peek().span.start;
        if self.placeholder > next {
            self.placeholder = Location::START;
        }
    }

    /// Whether the next token begins a physical line.
    pub(super) fn at_line_start(&self) -> bool {
        match self.scanner.previous() {
            Ok(token) => token.kind == TokenKind::LineTerminator,
            Err(_) => true,
        }
    }

    /// Whether the current statement ends here: at a colon, the end of the
    /// line, or an `Else` or `End If` that closes a single-line `If`.
    pub(super) fn at_statement_end(&mut self) -> bool {
        match self.peek_kind() {
            TokenKind::Colon | TokenKind::LineTerminator | TokenKind::EndOfStream => true,
            TokenKind::Else => self.line_if_depth > 0,
            TokenKind::End => self.line_if_depth > 0 && self.peek_nth(1).kind == TokenKind::If,
            _ => false,
        }
    }

    /// Report trailing tokens after a complete statement and skip them.
    pub(super) fn expect_end_of_statement(&mut self) {
        if !self.at_statement_end() {
            self.report_unexpected(SyntaxErrorKind::ExpectedEndOfStatement);
            self.resync_at(&[]);
        }
    }

    /// The finish of the last consumed token or placeholder, or `start` if
    /// nothing was consumed or created since `start`.
    pub(super) fn last_finish(&self, start: Location) -> Location {
        let previous = self.scanner.previous().map_or(start, |token| token.span.finish);
        start.max(previous).max(if self.placeholder >= start {
            self.placeholder
        } else {
            start
        })
    }

    /// A span from `start` to the end of the last consumed token.
    #[inline]
    pub(super) fn span_from(&self, start: Location) -> Span {
        Span::new(start, self.last_finish(start))
    }

    /// The start of the next significant token.
    #[inline]
    pub(super) fn here(&mut self) -> Location {
        self.peek().span.start
    }

    /// Where a zero-width placeholder for missing syntax goes: the start of
    /// the next significant token.
    pub(super) fn placeholder(&mut self) -> Location {
        let at = self.here();
        self.placeholder = self.placeholder.max(at);
        at
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Start a new statement or declaration; errors are reported again.
    #[inline]
    pub(super) fn begin_construct(&mut self) {
        self.error_in_construct = false;
    }

    /// Record a syntax error unless the current construct already has one.
    pub(super) fn report(&mut self, kind: SyntaxErrorKind, span: Span) {
        if self.error_in_construct {
            trace!(?kind, ?span, "suppressed syntax error");
            return;
        }
        trace!(?kind, ?span, "syntax error");
        self.errors.push(SyntaxError::new(kind, span));
        self.error_in_construct = true;
    }

    /// Report that the next token is not what was expected. A lexical error
    /// token reports its own error instead.
    pub(super) fn report_unexpected(&mut self, expected: SyntaxErrorKind) {
        let token = self.peek();
        let kind = token.error().unwrap_or(expected);
        self.report(kind, token.span);
    }

    /// Discard tokens up to the end of the statement, a token in `stops`,
    /// or a keyword that begins a statement. At least one token is skipped
    /// before a statement keyword is honored.
    pub(super) fn resync_at(&mut self, stops: &[TokenKind]) {
        let mut skipped = 0usize;
        loop {
            let token = self.peek();
            let stop = match token.kind {
                TokenKind::Colon | TokenKind::LineTerminator | TokenKind::EndOfStream => true,
                TokenKind::Else => self.line_if_depth > 0,
                kind if stops.contains(&kind) => true,
                kind => skipped > 0 && begins_statement(kind),
            };
            if stop {
                break;
            }
            self.read();
            skipped += 1;
        }
        if skipped > 0 {
            debug!(skipped, "resynchronized");
        }
    }

    /// Discard tokens up to the end of the statement.
    pub(super) fn skip_to_end_of_statement(&mut self) {
        let mut skipped = 0usize;
        while !self.at_statement_end() {
            self.read();
            skipped += 1;
        }
        if skipped > 0 {
            debug!(skipped, "skipped to end of statement");
        }
    }

    // ========================================================================
    // Comments and Separators
    // ========================================================================

    fn record_comment(&mut self, token: Token<'ast>) {
        // Lookahead and backtracking may pass the same comment more than once.
        if self
            .comments
            .last()
            .is_some_and(|last| last.span.start >= token.span.start)
        {
            return;
        }
        if let TokenValue::Comment { text, is_rem } = token.value {
            self.comments.push(Comment {
                text,
                is_rem,
                span: token.span,
            });
        }
    }

    fn take_comments(&mut self) -> &'ast [Comment<'ast>] {
        let comments = std::mem::take(&mut self.comments);
        self.arena.alloc_slice_copy(&comments)
    }

    /// Skip line terminators, colons and preprocessing directive lines
    /// between statements. Colons are appended to `colons`.
    pub(super) fn skip_separators(&mut self, mut colons: Option<&mut Vec<Location>>) {
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::LineTerminator => {
                    self.read();
                }
                TokenKind::Colon => {
                    self.read();
                    if let Some(colons) = colons.as_deref_mut() {
                        colons.push(token.span.start);
                    }
                }
                TokenKind::Pound if self.at_line_start() => self.parse_directive(),
                _ => break,
            }
        }
    }

    // ========================================================================
    // Block Matching
    // ========================================================================

    pub(super) fn push_block(&mut self, context: BlockContext) {
        self.blocks.push(context);
    }

    pub(super) fn pop_block(&mut self) {
        self.blocks.pop();
    }

    #[inline]
    pub(super) fn current_block(&self) -> Option<BlockContext> {
        self.blocks.last().copied()
    }

    /// Whether a block enclosing the innermost one accepts `terminator`.
    pub(super) fn enclosing_accepts(&self, terminator: Terminator) -> bool {
        let Some((_, enclosing)) = self.blocks.split_last() else {
            return false;
        };
        enclosing.iter().any(|block| block.kind.accepts(terminator))
    }

    /// Whether the innermost procedure body is still open.
    pub(super) fn in_procedure_body(&self) -> bool {
        self.blocks.iter().any(BlockContext::is_procedure_body)
    }

    /// Report the innermost block as unterminated.
    pub(super) fn report_unterminated(&mut self, context: BlockContext) {
        self.begin_construct();
        self.report(context.kind.expected_end(), context.span);
    }

    /// Classify the next token as a block terminator, if it is one.
    pub(super) fn peek_terminator(&mut self) -> Option<Terminator> {
        match self.peek_kind() {
            TokenKind::End => {
                BlockKind::from_end_token(self.peek_nth(1).kind).map(Terminator::End)
            }
            TokenKind::Wend => Some(Terminator::End(BlockKind::While)),
            TokenKind::Loop => Some(Terminator::Loop),
            TokenKind::Next => Some(Terminator::Next),
            TokenKind::ElseIf => Some(Terminator::ElseIf),
            TokenKind::Else => Some(if self.peek_nth(1).kind == TokenKind::If {
                Terminator::ElseIf
            } else {
                Terminator::Else
            }),
            TokenKind::Case => Some(if self.peek_nth(1).kind == TokenKind::Else {
                Terminator::CaseElse
            } else {
                Terminator::Case
            }),
            TokenKind::Catch => Some(Terminator::Catch),
            TokenKind::Finally => Some(Terminator::Finally),
            _ => None,
        }
    }

    // ========================================================================
    // Lookahead
    // ========================================================================

    /// Scan forward to the end of the statement and return the first of
    /// `kinds` found outside parentheses.
    pub(super) fn peek_ahead_for(&mut self, kinds: &[TokenKind]) -> Option<TokenKind> {
        let mark = self.mark();
        let mut depth = 0usize;
        let mut found = None;
        loop {
            let kind = self.peek_kind();
            match kind {
                TokenKind::Colon | TokenKind::LineTerminator | TokenKind::EndOfStream => break,
                TokenKind::LeftParenthesis => depth += 1,
                TokenKind::RightParenthesis => depth = depth.saturating_sub(1),
                _ if depth == 0 && kinds.contains(&kind) => {
                    found = Some(kind);
                    break;
                }
                _ => {}
            }
            self.read();
        }
        self.backtrack(mark);
        found
    }

    /// Skip a balanced parenthesized group starting at the next token.
    /// Returns false, leaving the position unspecified, if the group is not
    /// closed before the end of the statement.
    pub(super) fn skip_parenthesized(&mut self) -> bool {
        if self.eat(TokenKind::LeftParenthesis).is_none() {
            return false;
        }
        let mut depth = 1usize;
        loop {
            match self.read().kind {
                TokenKind::LeftParenthesis => depth += 1,
                TokenKind::RightParenthesis => {
                    depth -= 1;
                    if depth == 0 {
                        return true;
                    }
                }
                TokenKind::Colon | TokenKind::LineTerminator | TokenKind::EndOfStream => {
                    return false;
                }
                _ => {}
            }
        }
    }

    /// Skip a `<...>` attribute block. Returns false if it is not closed on
    /// this line.
    pub(super) fn skip_attribute_block(&mut self) -> bool {
        if self.eat(TokenKind::LessThan).is_none() {
            return false;
        }
        let mut depth = 0usize;
        loop {
            match self.read().kind {
                TokenKind::LeftParenthesis => depth += 1,
                TokenKind::RightParenthesis => depth = depth.saturating_sub(1),
                TokenKind::GreaterThan if depth == 0 => return true,
                TokenKind::LineTerminator | TokenKind::EndOfStream => return false,
                _ => {}
            }
        }
    }

    /// Classify the line at the read position without consuming anything.
    pub(super) fn peek_line_start(&mut self) -> LineStart {
        let mark = self.mark();
        let mut member = false;
        while self.check(TokenKind::LessThan) {
            if !self.skip_attribute_block() {
                self.backtrack(mark);
                return LineStart::Statement;
            }
            member = true;
        }
        while let Some(modifier) = Modifiers::from_token(self.peek_kind()) {
            if !(Modifiers::DIM | Modifiers::CONST | Modifiers::STATIC).contains(modifier) {
                member = true;
            }
            self.read();
        }
        let token = self.peek();
        let next = self.peek_nth(1);
        self.backtrack(mark);

        let start = match token.kind {
            TokenKind::Sub
            | TokenKind::Function
            | TokenKind::Property
            | TokenKind::Operator
            | TokenKind::Event
            | TokenKind::Delegate
            | TokenKind::Declare
            | TokenKind::Class
            | TokenKind::Structure
            | TokenKind::Module
            | TokenKind::Interface
            | TokenKind::Enum
            | TokenKind::Namespace => LineStart::Member,
            TokenKind::Option | TokenKind::Imports | TokenKind::Inherits | TokenKind::Implements => {
                LineStart::FileLevel
            }
            TokenKind::Identifier
                if token.is_contextual(TokenKind::Custom) && next.kind == TokenKind::Event =>
            {
                LineStart::Member
            }
            _ => LineStart::Statement,
        };
        if member && start == LineStart::Statement {
            LineStart::Member
        } else {
            start
        }
    }

    // ========================================================================
    // Completion
    // ========================================================================

    /// Report constructs still open at the end of the input.
    fn finish(&mut self) {
        if let Some(pending) = self.pending_next.take() {
            self.begin_construct();
            let span = pending
                .next
                .variables
                .items
                .get(pending.index)
                .map_or(pending.next.span, Expression::span);
            self.report(SyntaxErrorKind::NextWithoutFor, span);
        }
        self.finish_directives();
    }

    fn parse_file_body(&mut self) -> File<'ast> {
        let (declarations, _) = self.parse_declarations(Container::File);
        self.finish();
        let end = self.peek().span.finish.max(declarations.span.finish);
        File {
            declarations,
            comments: self.take_comments(),
            span: Span::new(Location::START, end),
        }
    }

    fn parse_script_body(&mut self) -> ScriptBlock<'ast> {
        let (statements, _) = self.parse_statements();
        self.finish();
        let end = self.peek().span.finish.max(statements.span.finish);
        ScriptBlock {
            statements,
            comments: self.take_comments(),
            span: Span::new(Location::START, end),
        }
    }
}

/// Keywords at which resynchronization stops, because they begin a
/// statement or declaration of their own.
fn begins_statement(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        If | Do
            | For
            | While
            | Select
            | Try
            | With
            | Using
            | SyncLock
            | Dim
            | Const
            | Static
            | Return
            | Throw
            | GoTo
            | Call
            | ReDim
            | Erase
            | RaiseEvent
            | AddHandler
            | RemoveHandler
            | Resume
            | Stop
            | End
            | Loop
            | Next
            | Wend
            | ElseIf
            | Catch
            | Finally
            | Class
            | Structure
            | Module
            | Interface
            | Enum
            | Namespace
            | Imports
            | Option
    )
}

// ============================================================================
// Entry Points
// ============================================================================

/// Parse a source file: options, imports, attributes, namespaces and types.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_file<'ast>(scanner: Scanner<'_, 'ast>, errors: &mut SyntaxErrors) -> File<'ast> {
    let before = errors.len();
    let mut parser = Parser::new(scanner, errors, None, false);
    let file = parser.parse_file_body();
    let tokens = parser.scanner.token_count();
    debug!(tokens, errors = errors.len() - before, "parsed file");
    file
}

/// Parse a source file, recording regions, external source mappings,
/// checksums and conditional constants in `tables`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_file_with_tables<'ast>(
    scanner: Scanner<'_, 'ast>,
    errors: &mut SyntaxErrors,
    tables: &mut DirectiveTables,
) -> File<'ast> {
    let before = errors.len();
    let mut parser = Parser::new(scanner, errors, Some(tables), false);
    let file = parser.parse_file_body();
    let tokens = parser.scanner.token_count();
    debug!(tokens, errors = errors.len() - before, "parsed file");
    file
}

/// Parse a script, where statements and declarations may be mixed at the
/// top level.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_script_file<'ast>(
    scanner: Scanner<'_, 'ast>,
    errors: &mut SyntaxErrors,
) -> ScriptBlock<'ast> {
    let before = errors.len();
    let mut parser = Parser::new(scanner, errors, None, true);
    let script = parser.parse_script_body();
    let tokens = parser.scanner.token_count();
    debug!(tokens, errors = errors.len() - before, "parsed script");
    script
}

#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_script_file_with_tables<'ast>(
    scanner: Scanner<'_, 'ast>,
    errors: &mut SyntaxErrors,
    tables: &mut DirectiveTables,
) -> ScriptBlock<'ast> {
    let before = errors.len();
    let mut parser = Parser::new(scanner, errors, Some(tables), true);
    let script = parser.parse_script_body();
    let tokens = parser.scanner.token_count();
    debug!(tokens, errors = errors.len() - before, "parsed script");
    script
}

/// Parse one declaration, such as a type or a member.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_declaration<'ast>(
    scanner: Scanner<'_, 'ast>,
    errors: &mut SyntaxErrors,
) -> Declaration<'ast> {
    let before = errors.len();
    let mut parser = Parser::new(scanner, errors, None, false);
    parser.skip_separators(None);
    let declaration = parser.parse_declaration(Container::Script);
    parser.finish();
    let tokens = parser.scanner.token_count();
    debug!(tokens, errors = errors.len() - before, "parsed declaration");
    declaration
}

/// Parse one statement. Block statements include their bodies.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_statement<'ast>(
    scanner: Scanner<'_, 'ast>,
    errors: &mut SyntaxErrors,
) -> Statement<'ast> {
    let before = errors.len();
    let mut parser = Parser::new(scanner, errors, None, false);
    parser.skip_separators(None);
    let statement = if parser.check(TokenKind::EndOfStream) {
        let span = parser.peek().span;
        parser.report(SyntaxErrorKind::ExpectedStatement, span);
        Statement::Bad(span)
    } else {
        parser.parse_statement()
    };
    parser.finish();
    let tokens = parser.scanner.token_count();
    debug!(tokens, errors = errors.len() - before, "parsed statement");
    statement
}

#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_expression<'ast>(
    scanner: Scanner<'_, 'ast>,
    errors: &mut SyntaxErrors,
) -> Expression<'ast> {
    let before = errors.len();
    let mut parser = Parser::new(scanner, errors, None, false);
    let expression = parser.parse_expression();
    let tokens = parser.scanner.token_count();
    debug!(tokens, errors = errors.len() - before, "parsed expression");
    expression
}

#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_type_name<'ast>(
    scanner: Scanner<'_, 'ast>,
    errors: &mut SyntaxErrors,
) -> TypeName<'ast> {
    let before = errors.len();
    let mut parser = Parser::new(scanner, errors, None, false);
    let type_name = parser.parse_type_name();
    let tokens = parser.scanner.token_count();
    debug!(tokens, errors = errors.len() - before, "parsed type name");
    type_name
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn with_parser<R>(source: &str, f: impl FnOnce(&mut Parser<'_, '_, '_>) -> R) -> (R, SyntaxErrors) {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let result = {
            let mut parser = Parser::new(Scanner::new(source, &arena), &mut errors, None, false);
            f(&mut parser)
        };
        (result, errors)
    }

    #[test]
    fn token_navigation() {
        let (kinds, _) = with_parser("x = 1", |p| {
            let first = p.peek_kind();
            let second = p.peek_nth(1).kind;
            let read = p.read().kind;
            let after = p.peek_kind();
            (first, second, read, after)
        });
        assert_eq!(
            kinds,
            (
                TokenKind::Identifier,
                TokenKind::Equals,
                TokenKind::Identifier,
                TokenKind::Equals
            )
        );
    }

    #[test]
    fn peek_skips_comments() {
        let (kinds, _) = with_parser("x ' note\ny", |p| {
            p.read();
            let at_comment = p.peek_kind();
            p.read();
            (at_comment, p.peek_kind(), p.comments.len())
        });
        assert_eq!(kinds, (TokenKind::LineTerminator, TokenKind::Identifier, 1));
    }

    #[test]
    fn comments_recorded_once_across_backtracking() {
        let (count, _) = with_parser("a ' c\nb", |p| {
            let mark = p.mark();
            p.peek_nth(3);
            p.read();
            p.read();
            p.backtrack(mark);
            p.read();
            p.read();
            p.comments.len()
        });
        assert_eq!(count, 1);
    }

    #[test]
    fn backtracking_forgets_later_placeholders() {
        let ((before, after), _) = with_parser("a b c", |p| {
            let start = p.here();
            let mark = p.mark();
            p.read();
            p.read();
            p.placeholder();
            p.backtrack(mark);
            let before = p.span_from(start);
            p.read();
            (before, p.span_from(start))
        });
        assert!(before.is_empty(), "{before:?}");
        assert_eq!(after.finish.index, 1);
    }

    #[test]
    fn eat_and_expect() {
        let ((eaten, missing, expected), errors) = with_parser("( x", |p| {
            let eaten = p.eat(TokenKind::LeftParenthesis).is_some();
            let missing = p.eat(TokenKind::Comma).is_none();
            let expected = p.expect(TokenKind::Comma, SyntaxErrorKind::ExpectedComma);
            (eaten, missing, expected.is_none())
        });
        assert!(eaten && missing && expected);
        assert_eq!(errors.kinds(), [SyntaxErrorKind::ExpectedComma]);
    }

    #[test]
    fn one_error_per_construct() {
        let (_, errors) = with_parser("a b c\nd", |p| {
            let span = p.peek().span;
            p.report(SyntaxErrorKind::ExpectedComma, span);
            p.report(SyntaxErrorKind::ExpectedEquals, span);
            p.begin_construct();
            p.report(SyntaxErrorKind::ExpectedAs, span);
        });
        assert_eq!(
            errors.kinds(),
            [SyntaxErrorKind::ExpectedComma, SyntaxErrorKind::ExpectedAs]
        );
    }

    #[test]
    fn lexical_error_token_reports_itself() {
        let (_, errors) = with_parser("x = \"open", |p| {
            p.read();
            p.read();
            p.report_unexpected(SyntaxErrorKind::ExpectedExpression);
        });
        assert_eq!(errors.kinds(), [SyntaxErrorKind::InvalidStringLiteral]);
    }

    #[test]
    fn resync_stops_at_end_of_statement() {
        let (kind, _) = with_parser("a b c : d", |p| {
            p.resync_at(&[]);
            p.peek_kind()
        });
        assert_eq!(kind, TokenKind::Colon);
    }

    #[test]
    fn resync_stops_at_statement_keyword_after_progress() {
        let (kinds, _) = with_parser("If x If y", |p| {
            p.resync_at(&[]);
            let first = p.peek().span.start.index;
            p.resync_at(&[TokenKind::Identifier]);
            (first, p.peek_kind())
        });
        assert_eq!(kinds, (5, TokenKind::Identifier));
    }

    #[test]
    fn resync_honors_stop_tokens() {
        let (kind, _) = with_parser("1 2 ) 3", |p| {
            p.resync_at(&[TokenKind::RightParenthesis]);
            p.peek_kind()
        });
        assert_eq!(kind, TokenKind::RightParenthesis);
    }

    #[test]
    fn lookahead_leaves_position() {
        let (found, _) = with_parser("x(1, 2) As Integer = 3", |p| {
            let found = p.peek_ahead_for(&[TokenKind::As, TokenKind::Equals]);
            (found, p.peek_kind())
        });
        assert_eq!(found, (Some(TokenKind::As), TokenKind::Identifier));
    }

    #[test]
    fn lookahead_ignores_parenthesized() {
        let (found, _) = with_parser("x(a = 1) = 3", |p| p.peek_ahead_for(&[TokenKind::Equals]));
        assert_eq!(found, Some(TokenKind::Equals));
        let (found, _) = with_parser("x(a = 1)", |p| p.peek_ahead_for(&[TokenKind::Equals]));
        assert_eq!(found, None);
    }

    #[test]
    fn line_start_classification() {
        let cases = [
            ("Dim x", LineStart::Statement),
            ("Static x As Integer", LineStart::Statement),
            ("x = 1", LineStart::Statement),
            ("Public x As Integer", LineStart::Member),
            ("Sub Foo()", LineStart::Member),
            ("<Obsolete> Sub Foo()", LineStart::Member),
            ("Custom Event E As EventHandler", LineStart::Member),
            ("Imports System", LineStart::FileLevel),
            ("Private Shared Function F()", LineStart::Member),
        ];
        for (source, expected) in cases {
            let (start, _) = with_parser(source, |p| (p.peek_line_start(), p.peek().span.start.index));
            assert_eq!(start, (expected, 0), "{source}");
        }
    }

    #[test]
    fn terminator_classification() {
        let cases = [
            ("End If", Some(Terminator::End(BlockKind::If))),
            ("End", None),
            ("Wend", Some(Terminator::End(BlockKind::While))),
            ("Else If x", Some(Terminator::ElseIf)),
            ("Else", Some(Terminator::Else)),
            ("Case Else", Some(Terminator::CaseElse)),
            ("Case 1", Some(Terminator::Case)),
            ("Loop Until x", Some(Terminator::Loop)),
            ("x", None),
        ];
        for (source, expected) in cases {
            let (terminator, _) = with_parser(source, |p| p.peek_terminator());
            assert_eq!(terminator, expected, "{source}");
        }
    }

    #[test]
    fn statement_end_in_line_if() {
        let (ends, _) = with_parser("Else", |p| {
            let outside = p.at_statement_end();
            p.line_if_depth = 1;
            (outside, p.at_statement_end())
        });
        assert_eq!(ends, (false, true));
    }

    #[test]
    fn span_from_covers_consumed_tokens() {
        let (span, _) = with_parser("Foo Bar ' trailing", |p| {
            let start = p.here();
            p.read();
            p.read();
            p.peek();
            p.span_from(start)
        });
        assert_eq!((span.start.index, span.finish.index), (0, 7));
    }
}
