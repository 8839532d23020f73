//! Statement parsing.
//!
//! Block statements push a [`BlockContext`] and parse their bodies with
//! [`Parser::parse_statements`], which stops at the first terminator the
//! innermost block accepts. See the `block` module for how terminators are
//! matched against the enclosing blocks.

use vbsyntax_core::{Location, Span, SyntaxErrorKind};

use crate::ast::block::{BlockContext, Terminator};
use crate::ast::decl::Modifiers;
use crate::ast::decl_parser::Container;
use crate::ast::expr::{Expression, ParenthesizedExpression};
use crate::ast::list::{Argument, ArgumentList, CommaList, StatementList};
use crate::ast::names::{Label, SimpleName};
use crate::ast::ops::{BinaryOperator, CompoundOperator, Precedence};
use crate::ast::parser::{LineStart, Parser, PendingNext};
use crate::ast::stmt::{
    AssignmentStatement, BlockKind, CallStatement, CaseBlockStatement, CaseClause, CaseHeader,
    CaseStatement, CatchBlockStatement, CatchStatement, CompoundAssignmentStatement,
    ContinueStatement, DoBlockStatement, ElseBlockStatement, ElseIfBlockStatement,
    ElseIfStatement, EndBlock, EraseStatement, ExitStatement, ExpressionBlockStatement,
    ExpressionStatement, FinallyBlockStatement, ForBlockStatement, ForControl,
    ForEachBlockStatement, GoToStatement, HandlerStatement, IfBlockStatement, IfPart,
    KeywordStatement, LabelStatement, LineIfStatement, LocalDeclarationStatement, LoopCondition,
    LoopStatement, MidAssignmentStatement, NextStatement, OnErrorKind, OnErrorStatement,
    RaiseEventStatement, ReDimStatement, ResumeKind, ResumeStatement, SelectBlockStatement,
    Statement, TryBlockStatement, TryPart, UsingBlockStatement, UsingResource,
    WhileBlockStatement,
};
use crate::ast::tree::TreeType;
use crate::ast::types::IntrinsicType;
use crate::lexer::{Token, TokenKind, TokenValue, TypeCharacter};

impl<'src, 'ast, 'p> Parser<'src, 'ast, 'p> {
    // ========================================================================
    // Statement Lists
    // ========================================================================

    /// Parse statements until a terminator of the innermost block, a
    /// terminator of an enclosing block, a declaration that ends the
    /// enclosing procedure, or the end of the input.
    ///
    /// Returns the terminator the innermost block accepts, unconsumed, or
    /// `None` if the block ended without one (which has been reported).
    pub(super) fn parse_statements(&mut self) -> (StatementList<'ast>, Option<Terminator>) {
        let mut statements = Vec::new();
        let mut colons = Vec::new();

        let terminator = loop {
            self.skip_separators(Some(&mut colons));
            let current = self.current_block();

            if let Some(pending) = self.pending_next {
                match current {
                    Some(context) if context.kind.accepts(Terminator::Next) => {
                        break Some(Terminator::Next);
                    }
                    Some(context) if self.enclosing_accepts(Terminator::Next) => {
                        self.report_unterminated(context);
                        break None;
                    }
                    _ => {
                        self.pending_next = None;
                        self.begin_construct();
                        let span = pending
                            .next
                            .variables
                            .items
                            .get(pending.index)
                            .map_or(pending.next.span, Expression::span);
                        self.report(SyntaxErrorKind::NextWithoutFor, span);
                    }
                }
            }

            if self.check(TokenKind::EndOfStream) {
                if let Some(context) = current {
                    self.report_unterminated(context);
                }
                break None;
            }

            if let Some(terminator) = self.peek_terminator()
                && let Some(context) = current
            {
                if context.kind.accepts(terminator) {
                    break Some(terminator);
                }
                if self.enclosing_accepts(terminator) {
                    self.report_unterminated(context);
                    break None;
                }
            }

            if self.in_procedure_body() {
                if self.at_sibling_accessor() {
                    if let Some(context) = current {
                        self.report_unterminated(context);
                    }
                    break None;
                }
                match self.peek_line_start() {
                    LineStart::Member => {
                        if let Some(context) = current {
                            self.report_unterminated(context);
                        }
                        break None;
                    }
                    LineStart::FileLevel => {
                        self.begin_construct();
                        let start = self.here();
                        let span = self.peek().span;
                        self.report(SyntaxErrorKind::InvalidInsideProcedure, span);
                        self.skip_to_end_of_statement();
                        statements.push(Statement::Bad(self.span_from(start)));
                        continue;
                    }
                    LineStart::Statement => {}
                }
            }

            let mark = self.mark();
            statements.push(self.parse_statement());
            if self.mark() == mark {
                self.read();
            }
        };

        (self.statement_list(statements, colons), terminator)
    }

    fn statement_list(
        &mut self,
        statements: Vec<Statement<'ast>>,
        colons: Vec<Location>,
    ) -> StatementList<'ast> {
        let span = match (statements.first(), statements.last()) {
            (Some(first), Some(last)) => first.span().merge(last.span()),
            _ => Span::point(self.placeholder()),
        };
        StatementList {
            statements: self.arena.alloc_slice_copy(&statements),
            colons: self.arena.alloc_slice_copy(&colons),
            span,
        }
    }

    /// Parse the statement body of a block, with the block's context
    /// pushed for its duration.
    pub(super) fn parse_block_body(
        &mut self,
        kind: BlockKind,
        header: Span,
    ) -> (StatementList<'ast>, Option<Terminator>) {
        self.push_block(BlockContext::statements(kind, header));
        let result = self.parse_statements();
        self.pop_block();
        result
    }

    /// The span of a statement that ends here; trailing tokens are then
    /// reported and skipped.
    pub(super) fn end_statement(&mut self, start: Location) -> Span {
        let span = self.span_from(start);
        self.expect_end_of_statement();
        span
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Parse one statement. Block statements include their bodies and
    /// terminators.
    pub(super) fn parse_statement(&mut self) -> Statement<'ast> {
        self.begin_construct();

        if let Some(terminator) = self.peek_terminator() {
            return self.parse_stray_terminator(terminator);
        }
        if self.script
            && !self.in_procedure_body()
            && self.peek_line_start() != LineStart::Statement
        {
            return Statement::Declaration(self.parse_declaration(Container::Script));
        }

        let token = self.peek();
        match token.kind {
            TokenKind::Identifier
                if self.peek_nth(1).kind == TokenKind::Colon && self.at_line_start() =>
            {
                self.read();
                let label = Label::Name(self.simple_name(token));
                Statement::Label(LabelStatement {
                    label,
                    span: token.span,
                })
            }
            TokenKind::IntegerLiteral => self.parse_line_number_label(),
            TokenKind::Dim | TokenKind::Const | TokenKind::Static => {
                self.parse_local_declaration()
            }
            TokenKind::Call => self.parse_call_statement(),
            TokenKind::Let | TokenKind::Set => self.parse_keyword_assignment(),
            TokenKind::GoTo => {
                self.read();
                let label = self.parse_label();
                let span = self.end_statement(token.span.start);
                Statement::GoTo(GoToStatement { label, span })
            }
            TokenKind::GoSub => {
                self.report(SyntaxErrorKind::ObsoleteGosub, token.span);
                self.read();
                self.skip_to_end_of_statement();
                Statement::Bad(self.span_from(token.span.start))
            }
            TokenKind::Exit => self.parse_exit_statement(),
            TokenKind::Continue => self.parse_continue_statement(),
            TokenKind::Stop => {
                self.read();
                let span = self.end_statement(token.span.start);
                Statement::Keyword(KeywordStatement::new(TreeType::StopStatement, span))
            }
            TokenKind::End => {
                self.read();
                if !self.at_statement_end() {
                    self.report_unexpected(SyntaxErrorKind::ExpectedEndKind);
                    self.resync_at(&[]);
                }
                Statement::Keyword(KeywordStatement::new(TreeType::EndStatement, token.span))
            }
            TokenKind::Return => self.parse_expression_statement(TreeType::ReturnStatement, false),
            TokenKind::Throw => self.parse_expression_statement(TreeType::ThrowStatement, false),
            TokenKind::Error => self.parse_expression_statement(TreeType::ErrorStatement, true),
            TokenKind::RaiseEvent => self.parse_raise_event_statement(),
            TokenKind::AddHandler => self.parse_handler_statement(TreeType::AddHandlerStatement),
            TokenKind::RemoveHandler => {
                self.parse_handler_statement(TreeType::RemoveHandlerStatement)
            }
            TokenKind::On => self.parse_on_error_statement(),
            TokenKind::Resume => self.parse_resume_statement(),
            TokenKind::ReDim => self.parse_redim_statement(),
            TokenKind::Erase => {
                self.read();
                let variables = self.parse_expression_list();
                let span = self.end_statement(token.span.start);
                Statement::Erase(self.arena.alloc(EraseStatement { variables, span }))
            }
            TokenKind::If => self.parse_if_statement(),
            TokenKind::Do => self.parse_do_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::With => self.parse_expression_block(TreeType::WithBlockStatement),
            TokenKind::SyncLock => self.parse_expression_block(TreeType::SyncLockBlockStatement),
            TokenKind::Using => self.parse_using_statement(),
            TokenKind::Try => self.parse_try_statement(),
            TokenKind::Select => self.parse_select_statement(),
            TokenKind::Identifier if self.at_mid_assignment() => self.parse_mid_assignment(),
            _ if self.starts_assignment_or_call(token) => self.parse_assignment_or_call(),
            _ => {
                self.report_unexpected(SyntaxErrorKind::ExpectedStatement);
                self.resync_at(&[]);
                Statement::Bad(self.span_from(token.span.start))
            }
        }
    }

    /// A block part or terminator with no open block that accepts it. It
    /// is reported and kept as a statement.
    fn parse_stray_terminator(&mut self, terminator: Terminator) -> Statement<'ast> {
        let span = self.peek().span;
        self.report(terminator.without_begin(), span);
        match terminator {
            Terminator::End(kind) => Statement::EndBlock(self.parse_end_block(kind)),
            Terminator::Loop => Statement::Loop(self.parse_loop_statement()),
            Terminator::Next => Statement::Next(self.parse_next_statement()),
            Terminator::ElseIf => Statement::ElseIf(self.parse_else_if_statement()),
            Terminator::Else => {
                self.read();
                Statement::Else(self.end_statement(span.start))
            }
            Terminator::Case => Statement::Case(self.parse_case_statement()),
            Terminator::CaseElse => Statement::CaseElse(self.parse_case_else()),
            Terminator::Catch => Statement::Catch(self.parse_catch_statement()),
            Terminator::Finally => {
                self.read();
                Statement::Finally(self.end_statement(span.start))
            }
        }
    }

    /// `End X`, or `Wend` for a `While` block.
    pub(super) fn parse_end_block(&mut self, kind: BlockKind) -> EndBlock {
        let start = self.read();
        if start.kind != TokenKind::Wend {
            self.read();
        }
        let span = self.end_statement(start.span.start);
        EndBlock { kind, span }
    }

    // ========================================================================
    // Labels and Jumps
    // ========================================================================

    /// A label name or line number.
    pub(super) fn parse_label(&mut self) -> Label<'ast> {
        let token = self.peek();
        match (token.kind, token.value) {
            (TokenKind::Identifier, _) => {
                self.read();
                Label::Name(self.simple_name(token))
            }
            (TokenKind::IntegerLiteral, TokenValue::Integer { value, .. }) => {
                self.read();
                Label::LineNumber {
                    value,
                    span: token.span,
                }
            }
            _ => {
                self.report_unexpected(SyntaxErrorKind::ExpectedLabel);
                Label::Name(SimpleName::missing(self.placeholder()))
            }
        }
    }

    /// A line number at the start of a line labels the statement after it.
    fn parse_line_number_label(&mut self) -> Statement<'ast> {
        let token = self.peek();
        if !self.at_line_start() {
            self.report(SyntaxErrorKind::LabelNotAtLineStart, token.span);
        }
        let label = self.parse_label();
        Statement::Label(LabelStatement {
            label,
            span: token.span,
        })
    }

    fn parse_exit_statement(&mut self) -> Statement<'ast> {
        let start = self.read().span.start;
        let kind = BlockKind::from_exit_token(self.peek_kind());
        if kind.is_some() {
            self.read();
        } else {
            self.report_unexpected(SyntaxErrorKind::ExpectedExitKind);
        }
        let span = self.end_statement(start);
        Statement::Exit(ExitStatement { kind, span })
    }

    fn parse_continue_statement(&mut self) -> Statement<'ast> {
        let start = self.read().span.start;
        let kind = BlockKind::from_continue_token(self.peek_kind());
        if kind.is_some() {
            self.read();
        } else {
            self.report_unexpected(SyntaxErrorKind::ExpectedContinueKind);
        }
        let span = self.end_statement(start);
        Statement::Continue(ContinueStatement { kind, span })
    }

    /// `Return`, `Throw` and `Error`. The operand is optional except for
    /// `Error`.
    fn parse_expression_statement(
        &mut self,
        tree_type: TreeType,
        operand_required: bool,
    ) -> Statement<'ast> {
        let start = self.read().span.start;
        let operand = (operand_required || !self.at_statement_end())
            .then(|| self.parse_expression());
        let span = self.end_statement(start);
        let statement = self
            .arena
            .alloc(ExpressionStatement::new(tree_type, operand, span));
        match tree_type {
            TreeType::ReturnStatement => Statement::Return(statement),
            TreeType::ThrowStatement => Statement::Throw(statement),
            _ => Statement::Error(statement),
        }
    }

    /// `On Error GoTo label`, `On Error GoTo 0`, `On Error GoTo -1` or
    /// `On Error Resume Next`.
    fn parse_on_error_statement(&mut self) -> Statement<'ast> {
        let start = self.read().span.start;
        if self
            .expect(TokenKind::Error, SyntaxErrorKind::ExpectedError)
            .is_none()
        {
            self.resync_at(&[]);
            return Statement::OnError(OnErrorStatement {
                kind: OnErrorKind::Bad,
                span: self.span_from(start),
            });
        }

        let kind = if self.eat(TokenKind::GoTo).is_some() {
            let token = self.peek();
            match token.value {
                TokenValue::Integer { value: 0, .. } => {
                    self.read();
                    OnErrorKind::GoToZero
                }
                _ if token.kind == TokenKind::Minus
                    && matches!(self.peek_nth(1).value, TokenValue::Integer { value: 1, .. }) =>
                {
                    self.read();
                    self.read();
                    OnErrorKind::GoToMinusOne
                }
                _ => OnErrorKind::GoToLabel(self.parse_label()),
            }
        } else if self.eat(TokenKind::Resume).is_some() {
            if self
                .expect(TokenKind::Next, SyntaxErrorKind::ExpectedResumeOrGoTo)
                .is_some()
            {
                OnErrorKind::ResumeNext
            } else {
                OnErrorKind::Bad
            }
        } else {
            self.report_unexpected(SyntaxErrorKind::ExpectedResumeOrGoTo);
            OnErrorKind::Bad
        };
        let span = self.end_statement(start);
        Statement::OnError(OnErrorStatement { kind, span })
    }

    /// `Resume`, `Resume Next` or `Resume label`.
    fn parse_resume_statement(&mut self) -> Statement<'ast> {
        let start = self.read().span.start;
        let kind = if self.eat(TokenKind::Next).is_some() {
            ResumeKind::Next
        } else if self.at_statement_end() {
            ResumeKind::Plain
        } else {
            ResumeKind::Label(self.parse_label())
        };
        let span = self.end_statement(start);
        Statement::Resume(ResumeStatement { kind, span })
    }

    // ========================================================================
    // Assignments and Calls
    // ========================================================================

    /// Whether `token` can begin the target of an assignment or call.
    fn starts_assignment_or_call(&mut self, token: Token<'ast>) -> bool {
        match token.kind {
            TokenKind::Identifier
            | TokenKind::Me
            | TokenKind::MyBase
            | TokenKind::MyClass
            | TokenKind::Global
            | TokenKind::Period
            | TokenKind::Exclamation
            | TokenKind::CType
            | TokenKind::DirectCast
            | TokenKind::TryCast
            | TokenKind::GetType => true,
            kind => {
                IntrinsicType::from_cast_token(kind).is_some()
                    || (IntrinsicType::from_token(kind).is_some()
                        && self.peek_nth(1).kind == TokenKind::Period)
            }
        }
    }

    /// `target = value`, `target op= value`, or a call with optional
    /// arguments written without parentheses.
    fn parse_assignment_or_call(&mut self) -> Statement<'ast> {
        let target = self.parse_postfix_target();
        let start = target.span().start;
        let token = self.peek();

        if token.kind == TokenKind::Equals {
            self.read();
            let source = self.parse_expression();
            let span = self.end_statement(start);
            return Statement::Assignment(self.arena.alloc(AssignmentStatement {
                keyword: None,
                target,
                equals: token.span.start,
                source,
                span,
            }));
        }

        if let Some(op) = CompoundOperator::from_token(token.kind) {
            self.read();
            let source = self.parse_expression();
            let span = self.end_statement(start);
            return Statement::CompoundAssignment(self.arena.alloc(CompoundAssignmentStatement {
                target,
                op,
                op_span: token.span,
                source,
                span,
            }));
        }

        let (target, arguments) = if self.at_statement_end() || target.is_bad() {
            (target, None)
        } else {
            self.split_call_arguments(target)
        };
        let span = self.end_statement(start);
        Statement::Call(self.arena.alloc(CallStatement {
            call_keyword: None,
            target,
            arguments,
            span,
        }))
    }

    /// Parse arguments written without parentheses. In `Foo (1), 2` the
    /// postfix parse has already taken `(1)` as an argument list of `Foo`;
    /// it becomes a parenthesized first argument instead.
    fn split_call_arguments(
        &mut self,
        target: Expression<'ast>,
    ) -> (Expression<'ast>, Option<ArgumentList<'ast>>) {
        if let Expression::CallOrIndex(call) = target
            && self.check(TokenKind::Comma)
            && let [argument] = call.arguments.arguments.items
            && let (None, Some(value)) = (argument.name, argument.value)
        {
            let span = call.arguments.span;
            let operand = Expression::Parenthesized(self.arena.alloc(ParenthesizedExpression {
                operand: value,
                close: call.arguments.close,
                span,
            }));
            let first = Argument {
                name: None,
                colon_equals: None,
                value: Some(operand),
                span,
            };
            return (call.target, Some(self.continue_unparenthesized_arguments(first)));
        }
        (target, Some(self.parse_unparenthesized_arguments()))
    }

    /// `Call target`
    fn parse_call_statement(&mut self) -> Statement<'ast> {
        let call = self.read().span.start;
        let target = self.parse_postfix_target();
        let span = self.end_statement(call);
        Statement::Call(self.arena.alloc(CallStatement {
            call_keyword: Some(call),
            target,
            arguments: None,
            span,
        }))
    }

    /// `Let target = value` or `Set target = value`.
    fn parse_keyword_assignment(&mut self) -> Statement<'ast> {
        let keyword = self.read().span;
        let target = self.parse_postfix_target();
        let equals = self
            .expect(TokenKind::Equals, SyntaxErrorKind::ExpectedEquals)
            .map_or_else(|| self.placeholder(), |token| token.span.start);
        let source = self.parse_expression();
        let span = self.end_statement(keyword.start);
        Statement::Assignment(self.arena.alloc(AssignmentStatement {
            keyword: Some(keyword),
            target,
            equals,
            source,
            span,
        }))
    }

    /// Whether the statement is `Mid(...) = ...`: the name `Mid`, with no
    /// type character other than `$`, then a parenthesized group, then `=`.
    fn at_mid_assignment(&mut self) -> bool {
        let token = self.peek();
        if !token.is_contextual(TokenKind::Mid)
            || !matches!(
                token.type_character(),
                TypeCharacter::None | TypeCharacter::StringSymbol
            )
            || self.peek_nth(1).kind != TokenKind::LeftParenthesis
        {
            return false;
        }
        let mark = self.mark();
        self.read();
        let found = self.skip_parenthesized() && self.check(TokenKind::Equals);
        self.backtrack(mark);
        found
    }

    /// `Mid[$](target, start[, length]) = value`
    fn parse_mid_assignment(&mut self) -> Statement<'ast> {
        let mid = self.read();
        self.read();
        let target = self.parse_expression();
        self.expect(TokenKind::Comma, SyntaxErrorKind::ExpectedComma);
        let start = self.parse_expression();
        let length = self
            .eat(TokenKind::Comma)
            .map(|_| self.parse_expression());
        self.expect(TokenKind::RightParenthesis, SyntaxErrorKind::ExpectedRightParenthesis);
        self.expect(TokenKind::Equals, SyntaxErrorKind::ExpectedEquals);
        let source = self.parse_expression();
        let span = self.end_statement(mid.span.start);
        Statement::MidAssignment(self.arena.alloc(MidAssignmentStatement {
            has_type_char: mid.type_character() == TypeCharacter::StringSymbol,
            target,
            start,
            length,
            source,
            span,
        }))
    }

    // ========================================================================
    // Other Simple Statements
    // ========================================================================

    /// `Dim`, `Const` or `Static` locals.
    fn parse_local_declaration(&mut self) -> Statement<'ast> {
        let start = self.here();
        let modifiers = self.parse_modifiers();
        self.check_modifiers(&modifiers, Modifiers::DIM | Modifiers::CONST | Modifiers::STATIC);
        let declarators = self.parse_variable_declarators(true);
        let span = self.end_statement(start);
        Statement::LocalDeclaration(self.arena.alloc(LocalDeclarationStatement {
            modifiers,
            declarators,
            span,
        }))
    }

    fn parse_raise_event_statement(&mut self) -> Statement<'ast> {
        let start = self.read().span.start;
        let name = self.parse_identifier();
        let arguments = (!name.is_bad() && self.check(TokenKind::LeftParenthesis))
            .then(|| self.parse_argument_list());
        let span = self.end_statement(start);
        Statement::RaiseEvent(self.arena.alloc(RaiseEventStatement {
            name,
            arguments,
            span,
        }))
    }

    /// `AddHandler event, handler` or `RemoveHandler event, handler`.
    fn parse_handler_statement(&mut self, tree_type: TreeType) -> Statement<'ast> {
        let start = self.read().span.start;
        let event = self.parse_expression();
        let comma = self
            .expect(TokenKind::Comma, SyntaxErrorKind::ExpectedComma)
            .map(|token| token.span.start);
        let handler = self.parse_expression();
        let span = self.end_statement(start);
        Statement::Handler(self.arena.alloc(HandlerStatement::new(
            tree_type, event, comma, handler, span,
        )))
    }

    /// `ReDim [Preserve] a(10), b(5, 5)`
    fn parse_redim_statement(&mut self) -> Statement<'ast> {
        let start = self.read().span.start;
        let preserve = self
            .eat_contextual(TokenKind::Preserve)
            .map(|token| token.span);
        let variables = self.parse_expression_list();
        let span = self.end_statement(start);
        Statement::ReDim(self.arena.alloc(ReDimStatement {
            preserve,
            variables,
            span,
        }))
    }

    /// One or more comma-separated expressions.
    fn parse_expression_list(&mut self) -> CommaList<'ast, Expression<'ast>> {
        let mut items = Vec::new();
        let mut separators = Vec::new();
        loop {
            items.push(self.parse_expression());
            match self.eat(TokenKind::Comma) {
                Some(comma) => separators.push(comma.span.start),
                None => break,
            }
        }
        let span = items[0].span().merge(items[items.len() - 1].span());
        CommaList::new(
            self.arena.alloc_slice_copy(&items),
            self.arena.alloc_slice_copy(&separators),
            span,
        )
    }

    // ========================================================================
    // If
    // ========================================================================

    /// A block `If`, or a single-line `If` when anything follows `Then` on
    /// the same line.
    fn parse_if_statement(&mut self) -> Statement<'ast> {
        let start = self.read().span.start;
        let condition = self.parse_expression();
        let then = self.eat(TokenKind::Then).map(|token| token.span.start);

        if let Some(then) = then
            && !matches!(
                self.peek_kind(),
                TokenKind::LineTerminator | TokenKind::EndOfStream
            )
        {
            return self.parse_line_if(start, condition, then);
        }

        if then.is_none() && !self.at_statement_end() {
            self.report_unexpected(SyntaxErrorKind::ExpectedThen);
            self.resync_at(&[]);
        }
        let header = self.end_statement(start);

        self.push_block(BlockContext::statements(BlockKind::If, header));
        let (body, mut terminator) = self.parse_statements();
        let mut parts = Vec::new();
        let mut seen_else = false;
        let end = loop {
            match terminator {
                Some(Terminator::ElseIf) => {
                    self.begin_construct();
                    if seen_else {
                        let span = self.peek().span;
                        self.report(SyntaxErrorKind::ElseIfAfterElse, span);
                    }
                    let header = self.parse_else_if_statement();
                    let (body, next) = self.parse_statements();
                    parts.push(IfPart::ElseIf(self.arena.alloc(ElseIfBlockStatement {
                        header,
                        body,
                        span: header.span.merge(body.span),
                    })));
                    terminator = next;
                }
                Some(Terminator::Else) => {
                    self.begin_construct();
                    let token = self.read();
                    if seen_else {
                        self.report(SyntaxErrorKind::ElseAfterElse, token.span);
                    }
                    seen_else = true;
                    let else_span = self.end_statement(token.span.start);
                    let (body, next) = self.parse_statements();
                    parts.push(IfPart::Else(self.arena.alloc(ElseBlockStatement {
                        else_span,
                        body,
                        span: else_span.merge(body.span),
                    })));
                    terminator = next;
                }
                Some(Terminator::End(BlockKind::If)) => {
                    self.begin_construct();
                    break Some(self.parse_end_block(BlockKind::If));
                }
                _ => break None,
            }
        };
        self.pop_block();

        let span = self.span_from(start);
        Statement::If(self.arena.alloc(IfBlockStatement {
            condition,
            then,
            body,
            parts: self.arena.alloc_slice_copy(&parts),
            end,
            span,
        }))
    }

    /// `ElseIf condition [Then]`, also written `Else If`.
    fn parse_else_if_statement(&mut self) -> &'ast ElseIfStatement<'ast> {
        let first = self.read();
        if first.kind == TokenKind::Else {
            self.read();
        }
        let condition = self.parse_expression();
        let then = self.eat(TokenKind::Then).map(|token| token.span.start);
        if then.is_none() && !self.at_statement_end() {
            self.report_unexpected(SyntaxErrorKind::ExpectedThen);
            self.resync_at(&[]);
        }
        let span = self.end_statement(first.span.start);
        self.arena.alloc(ElseIfStatement {
            condition,
            then,
            span,
        })
    }

    /// `If condition Then statements [Else statements] [End If]` on one
    /// line.
    fn parse_line_if(
        &mut self,
        start: Location,
        condition: Expression<'ast>,
        then: Location,
    ) -> Statement<'ast> {
        self.line_if_depth += 1;
        let statements = self.parse_line_statements();
        let (else_location, else_statements) = match self.eat(TokenKind::Else) {
            Some(token) => (Some(token.span.start), Some(self.parse_line_statements())),
            None => (None, None),
        };
        self.line_if_depth -= 1;

        let end = if self.check(TokenKind::End) && self.peek_nth(1).kind == TokenKind::If {
            let first = self.read();
            self.read();
            Some(EndBlock {
                kind: BlockKind::If,
                span: self.span_from(first.span.start),
            })
        } else {
            None
        };
        let span = self.span_from(start);
        Statement::LineIf(self.arena.alloc(LineIfStatement {
            condition,
            then,
            statements,
            else_location,
            else_statements,
            end,
            span,
        }))
    }

    /// Statements up to the end of the line, an `Else`, or `End If`.
    fn parse_line_statements(&mut self) -> StatementList<'ast> {
        let mut statements = Vec::new();
        let mut colons = Vec::new();
        loop {
            while let Some(colon) = self.eat(TokenKind::Colon) {
                colons.push(colon.span.start);
            }
            let at_end = match self.peek_kind() {
                TokenKind::LineTerminator | TokenKind::EndOfStream | TokenKind::Else => true,
                TokenKind::End => self.peek_nth(1).kind == TokenKind::If,
                _ => false,
            };
            if at_end {
                break;
            }
            let mark = self.mark();
            statements.push(self.parse_statement());
            if self.mark() == mark {
                self.read();
            }
        }
        self.statement_list(statements, colons)
    }

    // ========================================================================
    // Loops
    // ========================================================================

    /// `While condition` or `Until condition`, if present.
    fn parse_loop_condition(&mut self) -> Option<LoopCondition<'ast>> {
        let token = self.peek();
        let is_while = if token.kind == TokenKind::While {
            true
        } else if token.is_contextual(TokenKind::Until) {
            false
        } else {
            if !self.at_statement_end() {
                self.report_unexpected(SyntaxErrorKind::ExpectedWhileOrUntil);
                self.resync_at(&[]);
            }
            return None;
        };
        self.read();
        let condition = self.parse_expression();
        Some(LoopCondition {
            is_while,
            keyword: token.span,
            condition,
            span: self.span_from(token.span.start),
        })
    }

    fn parse_do_statement(&mut self) -> Statement<'ast> {
        let start = self.read().span.start;
        let condition = self.parse_loop_condition();
        let header = self.end_statement(start);

        let (body, terminator) = self.parse_block_body(BlockKind::Do, header);
        let end = if terminator == Some(Terminator::Loop) {
            self.begin_construct();
            let end = self.parse_loop_statement();
            if condition.is_some()
                && let Some(repeated) = end.condition
            {
                self.report(SyntaxErrorKind::LoopConditionAlreadySpecified, repeated.span);
            }
            Some(end)
        } else {
            None
        };

        let span = self.span_from(start);
        Statement::Do(self.arena.alloc(DoBlockStatement {
            condition,
            body,
            end,
            span,
        }))
    }

    fn parse_loop_statement(&mut self) -> &'ast LoopStatement<'ast> {
        let start = self.read().span.start;
        let condition = self.parse_loop_condition();
        let span = self.end_statement(start);
        self.arena.alloc(LoopStatement { condition, span })
    }

    /// `For control = lower To upper [Step step]` or
    /// `For Each control In collection`.
    fn parse_for_statement(&mut self) -> Statement<'ast> {
        let start = self.read().span.start;
        if self.eat(TokenKind::Each).is_some() {
            return self.parse_for_each_statement(start);
        }

        let control = self.parse_for_control();
        let equals = self
            .expect(TokenKind::Equals, SyntaxErrorKind::ExpectedEquals)
            .map(|token| token.span.start);
        let lower = self.parse_expression();
        let to = self
            .expect(TokenKind::To, SyntaxErrorKind::ExpectedTo)
            .map(|token| token.span.start);
        let upper = self.parse_expression();
        let step = self
            .eat(TokenKind::Step)
            .map(|_| self.parse_expression());
        let header = self.end_statement(start);

        self.push_block(BlockContext::statements(BlockKind::For, header));
        let (body, terminator) = self.parse_statements();
        let (next, next_variable) = if terminator == Some(Terminator::Next) {
            self.take_next()
        } else {
            (None, None)
        };
        self.pop_block();

        let span = self.span_from(start);
        Statement::For(self.arena.alloc(ForBlockStatement {
            control,
            equals,
            lower,
            to,
            upper,
            step,
            body,
            next,
            next_variable,
            span,
        }))
    }

    fn parse_for_each_statement(&mut self, start: Location) -> Statement<'ast> {
        let control = self.parse_for_control();
        let in_location = self
            .expect(TokenKind::In, SyntaxErrorKind::ExpectedIn)
            .map(|token| token.span.start);
        let collection = self.parse_expression();
        let header = self.end_statement(start);

        self.push_block(BlockContext::statements(BlockKind::For, header));
        let (body, terminator) = self.parse_statements();
        let (next, next_variable) = if terminator == Some(Terminator::Next) {
            self.take_next()
        } else {
            (None, None)
        };
        self.pop_block();

        let span = self.span_from(start);
        Statement::ForEach(self.arena.alloc(ForEachBlockStatement {
            control,
            in_location,
            collection,
            body,
            next,
            next_variable,
            span,
        }))
    }

    /// The loop variable: a declarator when an identifier is followed by
    /// `As`, or by array bounds and then `As` before any `In` or `=`.
    fn parse_for_control(&mut self) -> ForControl<'ast> {
        if self.check(TokenKind::Identifier) {
            let declarator = match self.peek_nth(1).kind {
                TokenKind::As => true,
                TokenKind::LeftParenthesis => {
                    self.peek_ahead_for(&[TokenKind::As, TokenKind::In, TokenKind::Equals])
                        == Some(TokenKind::As)
                }
                _ => false,
            };
            if declarator {
                let declarator = self.parse_for_declarator();
                return ForControl::Declarator(self.arena.alloc(declarator));
            }
        }
        ForControl::Expression(self.parse_binary_expression(Precedence::Relational))
    }

    /// Close a `For` loop with the `Next` at the read position, or with the
    /// next variable of a `Next` that already closed an inner loop.
    fn take_next(
        &mut self,
    ) -> (
        Option<&'ast NextStatement<'ast>>,
        Option<&'ast Expression<'ast>>,
    ) {
        let (next, index) = match self.pending_next.take() {
            Some(pending) => (pending.next, pending.index),
            None => {
                self.begin_construct();
                (self.parse_next_statement(), 0)
            }
        };
        if index + 1 < next.variables.len() {
            self.pending_next = Some(PendingNext {
                next,
                index: index + 1,
            });
        }
        (Some(next), next.variables.items.get(index))
    }

    fn parse_next_statement(&mut self) -> &'ast NextStatement<'ast> {
        let start = self.read().span.start;
        let variables = if self.at_statement_end() {
            CommaList::empty(self.here())
        } else {
            self.parse_expression_list()
        };
        let span = self.end_statement(start);
        self.arena.alloc(NextStatement { variables, span })
    }

    /// `While condition ... End While`, or `... Wend`.
    fn parse_while_statement(&mut self) -> Statement<'ast> {
        let start = self.read().span.start;
        let condition = self.parse_expression();
        let header = self.end_statement(start);

        let (body, terminator) = self.parse_block_body(BlockKind::While, header);
        let end = self.take_end(terminator, BlockKind::While);
        let span = self.span_from(start);
        Statement::While(self.arena.alloc(WhileBlockStatement {
            condition,
            body,
            end,
            span,
        }))
    }

    /// Consume `End kind` if it is the block's terminator.
    pub(super) fn take_end(
        &mut self,
        terminator: Option<Terminator>,
        kind: BlockKind,
    ) -> Option<EndBlock> {
        (terminator == Some(Terminator::End(kind))).then(|| {
            self.begin_construct();
            self.parse_end_block(kind)
        })
    }

    // ========================================================================
    // Other Blocks
    // ========================================================================

    /// `With expression` or `SyncLock expression`.
    fn parse_expression_block(&mut self, tree_type: TreeType) -> Statement<'ast> {
        let kind = if tree_type == TreeType::WithBlockStatement {
            BlockKind::With
        } else {
            BlockKind::SyncLock
        };
        let start = self.read().span.start;
        let expression = self.parse_expression();
        let header = self.end_statement(start);

        let (body, terminator) = self.parse_block_body(kind, header);
        let end = self.take_end(terminator, kind);
        let span = self.span_from(start);
        Statement::ExpressionBlock(self.arena.alloc(ExpressionBlockStatement::new(
            tree_type, expression, body, end, span,
        )))
    }

    /// `Using resource`, where the resource is an expression or
    /// declarators (`Using r As New Reader(path)`).
    fn parse_using_statement(&mut self) -> Statement<'ast> {
        let start = self.read().span.start;
        let resource = if self.check(TokenKind::Identifier) && self.peek_nth(1).kind == TokenKind::As
        {
            UsingResource::Declarators(self.parse_variable_declarators(false))
        } else {
            UsingResource::Expression(self.parse_expression())
        };
        let header = self.end_statement(start);

        let (body, terminator) = self.parse_block_body(BlockKind::Using, header);
        let end = self.take_end(terminator, BlockKind::Using);
        let span = self.span_from(start);
        Statement::Using(self.arena.alloc(UsingBlockStatement {
            resource,
            body,
            end,
            span,
        }))
    }

    fn parse_try_statement(&mut self) -> Statement<'ast> {
        let start = self.read().span.start;
        let header = self.end_statement(start);

        self.push_block(BlockContext::statements(BlockKind::Try, header));
        let (body, mut terminator) = self.parse_statements();
        let mut parts = Vec::new();
        let mut seen_finally = false;
        let end = loop {
            match terminator {
                Some(Terminator::Catch) => {
                    self.begin_construct();
                    if seen_finally {
                        let span = self.peek().span;
                        self.report(SyntaxErrorKind::CatchAfterFinally, span);
                    }
                    let header = self.parse_catch_statement();
                    let (body, next) = self.parse_statements();
                    parts.push(TryPart::Catch(self.arena.alloc(CatchBlockStatement {
                        header,
                        body,
                        span: header.span.merge(body.span),
                    })));
                    terminator = next;
                }
                Some(Terminator::Finally) => {
                    self.begin_construct();
                    let token = self.read();
                    if seen_finally {
                        self.report(SyntaxErrorKind::FinallyAfterFinally, token.span);
                    }
                    seen_finally = true;
                    let finally_span = self.end_statement(token.span.start);
                    let (body, next) = self.parse_statements();
                    parts.push(TryPart::Finally(self.arena.alloc(FinallyBlockStatement {
                        finally_span,
                        body,
                        span: finally_span.merge(body.span),
                    })));
                    terminator = next;
                }
                Some(Terminator::End(BlockKind::Try)) => {
                    self.begin_construct();
                    break Some(self.parse_end_block(BlockKind::Try));
                }
                _ => break None,
            }
        };
        self.pop_block();

        let span = self.span_from(start);
        Statement::Try(self.arena.alloc(TryBlockStatement {
            body,
            parts: self.arena.alloc_slice_copy(&parts),
            end,
            span,
        }))
    }

    /// `Catch [name [As type]] [When filter]`
    fn parse_catch_statement(&mut self) -> &'ast CatchStatement<'ast> {
        let start = self.read().span.start;
        let (name, exception_type) = if self.check(TokenKind::Identifier) {
            let name = self.parse_identifier();
            let exception_type = self
                .eat(TokenKind::As)
                .map(|_| self.parse_non_array_type_name());
            (Some(name), exception_type)
        } else {
            (None, None)
        };
        let filter = self
            .eat(TokenKind::When)
            .map(|_| self.parse_expression());
        let span = self.end_statement(start);
        self.arena.alloc(CatchStatement {
            name,
            exception_type,
            filter,
            span,
        })
    }

    // ========================================================================
    // Select
    // ========================================================================

    fn parse_select_statement(&mut self) -> Statement<'ast> {
        let start = self.read().span.start;
        let case_keyword = self.eat(TokenKind::Case).map(|token| token.span.start);
        let expression = self.parse_expression();
        let header = self.end_statement(start);

        self.push_block(BlockContext::statements(BlockKind::Select, header));
        let (leading, mut terminator) = self.parse_statements();
        if !leading.is_empty() {
            self.begin_construct();
            self.report(SyntaxErrorKind::ExpectedCase, leading.span);
        }

        let mut cases = Vec::new();
        let mut seen_else = false;
        let end = loop {
            let header = match terminator {
                Some(Terminator::Case) => {
                    self.begin_construct();
                    if seen_else {
                        let span = self.peek().span;
                        self.report(SyntaxErrorKind::CaseAfterCaseElse, span);
                    }
                    CaseHeader::Case(self.parse_case_statement())
                }
                Some(Terminator::CaseElse) => {
                    self.begin_construct();
                    if seen_else {
                        let span = self.peek().span;
                        self.report(SyntaxErrorKind::CaseElseAfterCaseElse, span);
                    }
                    seen_else = true;
                    CaseHeader::Else(self.parse_case_else())
                }
                Some(Terminator::End(BlockKind::Select)) => {
                    self.begin_construct();
                    break Some(self.parse_end_block(BlockKind::Select));
                }
                _ => break None,
            };
            let (body, next) = self.parse_statements();
            cases.push(CaseBlockStatement {
                header,
                body,
                span: header.span().merge(body.span),
            });
            terminator = next;
        };
        self.pop_block();

        let span = self.span_from(start);
        Statement::Select(self.arena.alloc(SelectBlockStatement {
            case_keyword,
            expression,
            leading,
            cases: self.arena.alloc_slice_copy(&cases),
            end,
            span,
        }))
    }

    /// `Case clause, clause, ...`
    fn parse_case_statement(&mut self) -> &'ast CaseStatement<'ast> {
        let start = self.read().span.start;
        let mut clauses = Vec::new();
        let mut separators = Vec::new();
        loop {
            clauses.push(self.parse_case_clause());
            match self.eat(TokenKind::Comma) {
                Some(comma) => separators.push(comma.span.start),
                None => break,
            }
        }
        let clauses_span = clauses[0].span().merge(clauses[clauses.len() - 1].span());
        let clauses = CommaList::new(
            self.arena.alloc_slice_copy(&clauses),
            self.arena.alloc_slice_copy(&separators),
            clauses_span,
        );
        let span = self.end_statement(start);
        self.arena.alloc(CaseStatement { clauses, span })
    }

    /// `Case Else`
    fn parse_case_else(&mut self) -> Span {
        let start = self.read().span.start;
        self.read();
        self.end_statement(start)
    }

    /// `value`, `lower To upper`, or `[Is] op value`.
    fn parse_case_clause(&mut self) -> CaseClause<'ast> {
        let token = self.peek();
        let is_keyword = self.eat(TokenKind::Is).map(|is| is.span.start);
        let relational = BinaryOperator::from_token(self.peek_kind()).filter(|op| {
            op.is_relational()
                && !matches!(
                    op,
                    BinaryOperator::Is | BinaryOperator::IsNot | BinaryOperator::Like
                )
        });

        if let Some(op) = relational {
            self.read();
            let operand = self.parse_expression();
            return CaseClause::Relational {
                is_keyword,
                op,
                operand,
                span: self.span_from(token.span.start),
            };
        }
        if is_keyword.is_some() {
            self.report_unexpected(SyntaxErrorKind::ExpectedRelationalOperator);
            let operand = Expression::Bad(Span::point(self.placeholder()));
            return CaseClause::Relational {
                is_keyword,
                op: BinaryOperator::Equals,
                operand,
                span: self.span_from(token.span.start),
            };
        }

        let lower = self.parse_expression();
        match self.eat(TokenKind::To) {
            Some(to) => {
                let upper = self.parse_expression();
                CaseClause::Range {
                    lower,
                    to: to.span.start,
                    upper,
                    span: self.span_from(token.span.start),
                }
            }
            None => CaseClause::Expression(lower),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::lexer::Scanner;
    use bumpalo::Bump;
    use vbsyntax_core::{SyntaxErrorKind, SyntaxErrors};

    fn statement_errors(source: &str) -> Vec<SyntaxErrorKind> {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        parse_statement(Scanner::new(source, &arena), &mut errors);
        errors.kinds()
    }

    fn script_errors(source: &str) -> Vec<SyntaxErrorKind> {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        parse_script_file(Scanner::new(source, &arena), &mut errors);
        errors.kinds()
    }

    #[test]
    fn assignment_and_compound_assignment() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let script = parse_script_file(Scanner::new("x = 1\nx += 2\nSet y = z\n", &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        let statements = script.statements();
        assert!(matches!(statements[0], Statement::Assignment(a) if a.keyword.is_none()));
        assert!(matches!(
            statements[1],
            Statement::CompoundAssignment(a) if a.op == CompoundOperator::Plus
        ));
        assert!(matches!(statements[2], Statement::Assignment(a) if a.keyword.is_some()));
    }

    #[test]
    fn calls_without_parentheses() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let statement = parse_statement(Scanner::new("MsgBox \"hi\", 1", &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        let Statement::Call(call) = statement else {
            panic!("expected a call, got {statement:?}");
        };
        assert_eq!(call.arguments.map(|a| a.len()), Some(2));
    }

    #[test]
    fn parenthesized_first_argument() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let statement = parse_statement(Scanner::new("Foo (1), 2", &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        let Statement::Call(call) = statement else {
            panic!("expected a call, got {statement:?}");
        };
        assert!(matches!(call.target, Expression::SimpleName(_)));
        let arguments = call.arguments.expect("arguments");
        assert_eq!(arguments.len(), 2);
        assert!(matches!(
            arguments.arguments.items[0].value,
            Some(Expression::Parenthesized(_))
        ));
    }

    #[test]
    fn call_with_parentheses() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let statement = parse_statement(Scanner::new("Call Foo(1, 2)", &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        assert!(matches!(
            statement,
            Statement::Call(call) if call.call_keyword.is_some()
                && matches!(call.target, Expression::CallOrIndex(_))
        ));
    }

    #[test]
    fn block_if() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let source = "If a Then\n  x = 1\nElseIf b Then\n  x = 2\nElse\n  x = 3\nEnd If";
        let statement = parse_statement(Scanner::new(source, &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        let Statement::If(block) = statement else {
            panic!("expected an If block, got {statement:?}");
        };
        assert_eq!(block.body.len(), 1);
        assert_eq!(block.else_ifs().count(), 1);
        assert!(block.else_block().is_some());
        assert_eq!(block.end.map(|e| e.kind), Some(BlockKind::If));
    }

    #[test]
    fn if_closed_by_enclosing_end_sub() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let source = "Sub Main()\n  If True Then\nEnd Sub\n";
        let script = parse_script_file(Scanner::new(source, &arena), &mut errors);
        assert_eq!(errors.kinds(), [SyntaxErrorKind::ExpectedEndIf]);
        let Statement::Declaration(Declaration::Method(method)) = script.statements()[0] else {
            panic!("expected a method");
        };
        assert!(method.end.is_some());
        let body = method.body.expect("body");
        assert!(matches!(body.statements[0], Statement::If(block) if block.end.is_none()));
    }

    #[test]
    fn line_if() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let statement = parse_statement(
            Scanner::new("If x Then y = 1 : z = 2 Else y = 3", &arena),
            &mut errors,
        );
        assert!(errors.is_empty(), "{errors}");
        let Statement::LineIf(line_if) = statement else {
            panic!("expected a line If, got {statement:?}");
        };
        assert_eq!(line_if.statements.len(), 2);
        assert_eq!(line_if.else_statements.map(|s| s.len()), Some(1));
        assert!(line_if.end.is_none());
    }

    #[test]
    fn line_if_consumes_end_if() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let statement = parse_statement(Scanner::new("If x Then y = 1 End If", &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        assert!(matches!(statement, Statement::LineIf(l) if l.end.is_some()));
    }

    #[test]
    fn stray_terminators() {
        assert_eq!(statement_errors("End If"), [SyntaxErrorKind::EndIfWithoutIf]);
        assert_eq!(statement_errors("Loop"), [SyntaxErrorKind::LoopWithoutDo]);
        assert_eq!(statement_errors("Next"), [SyntaxErrorKind::NextWithoutFor]);
        assert_eq!(statement_errors("Wend"), [SyntaxErrorKind::EndWhileWithoutWhile]);
        assert_eq!(statement_errors("Case 1"), [SyntaxErrorKind::CaseWithoutSelect]);
        assert_eq!(statement_errors("Else"), [SyntaxErrorKind::ElseWithoutIf]);
    }

    #[test]
    fn loops() {
        assert!(statement_errors("Do While x < 10\n  x += 1\nLoop").is_empty());
        assert!(statement_errors("Do\n  x += 1\nLoop Until x > 10").is_empty());
        assert_eq!(
            statement_errors("Do While a\nLoop Until b"),
            [SyntaxErrorKind::LoopConditionAlreadySpecified]
        );
        assert!(statement_errors("While x\n  x = x - 1\nWend").is_empty());
        assert!(statement_errors("While x\nEnd While").is_empty());
        assert_eq!(statement_errors("Do\n  x = 1\n"), [SyntaxErrorKind::ExpectedLoop]);
    }

    #[test]
    fn for_loops() {
        assert!(statement_errors("For i = 1 To 10 Step 2\nNext i").is_empty());
        assert!(statement_errors("For Each item In items\nNext").is_empty());
        assert!(statement_errors("For i As Integer = 0 To 9\nNext").is_empty());
        assert!(statement_errors("For Each b As Byte In data\nNext").is_empty());
        assert_eq!(statement_errors("For i = 1 To 10\n"), [SyntaxErrorKind::ExpectedNext]);
        assert_eq!(statement_errors("For i 1 To 10\nNext"), [SyntaxErrorKind::ExpectedEquals]);
    }

    #[test]
    fn next_closes_several_loops() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let source = "For i = 1 To 2\nFor j = 1 To 2\nx = i * j\nNext j, i";
        let statement = parse_statement(Scanner::new(source, &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        let Statement::For(outer) = statement else {
            panic!("expected a For block, got {statement:?}");
        };
        let Statement::For(inner) = outer.body.statements[0] else {
            panic!("expected a nested For block");
        };
        let shared = outer.next.expect("outer next");
        assert!(std::ptr::eq(shared, inner.next.expect("inner next")));
        assert!(!std::ptr::eq(
            outer.next_variable.expect("outer variable"),
            inner.next_variable.expect("inner variable")
        ));
    }

    #[test]
    fn next_with_too_many_variables() {
        assert_eq!(
            statement_errors("For i = 1 To 2\nNext i, j"),
            [SyntaxErrorKind::NextWithoutFor]
        );
    }

    #[test]
    fn select_case() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let source = "Select Case x\nCase 1, 2\nCase 3 To 5\nCase Is > 10, < 0\nCase Else\nEnd Select";
        let statement = parse_statement(Scanner::new(source, &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        let Statement::Select(select) = statement else {
            panic!("expected a Select block, got {statement:?}");
        };
        assert_eq!(select.cases.len(), 4);
        assert!(select.case_else().is_some());
        let CaseHeader::Case(third) = select.cases[2].header else {
            panic!("expected a Case");
        };
        assert!(matches!(
            third.clauses.items[0],
            CaseClause::Relational { op: BinaryOperator::GreaterThan, is_keyword: Some(_), .. }
        ));
        assert!(matches!(
            third.clauses.items[1],
            CaseClause::Relational { op: BinaryOperator::LessThan, is_keyword: None, .. }
        ));
    }

    #[test]
    fn select_ordering_errors() {
        assert_eq!(
            statement_errors("Select Case x\nCase Else\nCase 1\nEnd Select"),
            [SyntaxErrorKind::CaseAfterCaseElse]
        );
        assert_eq!(
            statement_errors("Select Case x\ny = 1\nCase 1\nEnd Select"),
            [SyntaxErrorKind::ExpectedCase]
        );
        assert_eq!(
            statement_errors("Select Case x\nCase Is\nEnd Select"),
            [SyntaxErrorKind::ExpectedRelationalOperator]
        );
    }

    #[test]
    fn try_blocks() {
        assert!(
            statement_errors(
                "Try\n  f()\nCatch ex As IOException When ex.Data Is Nothing\nCatch\nFinally\n  g()\nEnd Try"
            )
            .is_empty()
        );
        assert_eq!(
            statement_errors("Try\nFinally\nCatch\nEnd Try"),
            [SyntaxErrorKind::CatchAfterFinally]
        );
        assert_eq!(
            statement_errors("Try\nFinally\nFinally\nEnd Try"),
            [SyntaxErrorKind::FinallyAfterFinally]
        );
    }

    #[test]
    fn if_part_ordering() {
        assert_eq!(
            statement_errors("If a Then\nElse\nElse\nEnd If"),
            [SyntaxErrorKind::ElseAfterElse]
        );
        assert_eq!(
            statement_errors("If a Then\nElse\nElseIf b Then\nEnd If"),
            [SyntaxErrorKind::ElseIfAfterElse]
        );
    }

    #[test]
    fn other_blocks() {
        assert!(statement_errors("With obj\n  .Name = \"x\"\n  !Key = 1\nEnd With").is_empty());
        assert!(statement_errors("SyncLock gate\nEnd SyncLock").is_empty());
        assert!(statement_errors("Using r As New Reader(path)\nEnd Using").is_empty());
        assert!(statement_errors("Using lockObject\nEnd Using").is_empty());
        assert_eq!(statement_errors("With obj\n"), [SyntaxErrorKind::ExpectedEndWith]);
    }

    #[test]
    fn error_handling_statements() {
        assert!(statement_errors("On Error Resume Next").is_empty());
        assert!(statement_errors("On Error GoTo 0").is_empty());
        assert!(statement_errors("On Error GoTo -1").is_empty());
        assert!(statement_errors("On Error GoTo Handler").is_empty());
        assert!(statement_errors("Resume Next").is_empty());
        assert!(statement_errors("Resume").is_empty());
        assert_eq!(statement_errors("On Foo"), [SyntaxErrorKind::ExpectedError]);
        assert_eq!(
            statement_errors("On Error Stop"),
            [SyntaxErrorKind::ExpectedResumeOrGoTo]
        );
    }

    #[test]
    fn jumps_and_keywords() {
        assert!(statement_errors("GoTo 100").is_empty());
        assert!(statement_errors("Exit Sub").is_empty());
        assert!(statement_errors("Continue For").is_empty());
        assert!(statement_errors("Stop").is_empty());
        assert!(statement_errors("End").is_empty());
        assert!(statement_errors("Return").is_empty());
        assert!(statement_errors("Throw New Exception(\"x\")").is_empty());
        assert!(statement_errors("Error 5").is_empty());
        assert_eq!(statement_errors("Exit If"), [SyntaxErrorKind::ExpectedExitKind]);
        assert_eq!(statement_errors("Continue Sub"), [SyntaxErrorKind::ExpectedContinueKind]);
        assert_eq!(statement_errors("GoSub 10"), [SyntaxErrorKind::ObsoleteGosub]);
        assert_eq!(statement_errors("End Foo"), [SyntaxErrorKind::ExpectedEndKind]);
    }

    #[test]
    fn labels() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let source = "Retry:\n10 x = 1\nGoTo Retry\n";
        let script = parse_script_file(Scanner::new(source, &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        let statements = script.statements();
        assert!(matches!(statements[0], Statement::Label(_)));
        assert!(matches!(
            statements[1],
            Statement::Label(LabelStatement { label: Label::LineNumber { value: 10, .. }, .. })
        ));
        assert!(matches!(statements[2], Statement::Assignment(_)));
        assert!(matches!(statements[3], Statement::GoTo(_)));
    }

    #[test]
    fn handler_and_event_statements() {
        assert!(statement_errors("AddHandler b.Click, AddressOf OnClick").is_empty());
        assert!(statement_errors("RemoveHandler b.Click, AddressOf OnClick").is_empty());
        assert!(statement_errors("RaiseEvent Changed(Me, e)").is_empty());
        assert_eq!(
            statement_errors("AddHandler b.Click AddressOf OnClick"),
            [SyntaxErrorKind::ExpectedComma]
        );
    }

    #[test]
    fn redim_and_erase() {
        assert!(statement_errors("ReDim Preserve a(10), b(2, 2)").is_empty());
        assert!(statement_errors("Erase a, b").is_empty());
    }

    #[test]
    fn local_declarations() {
        assert!(statement_errors("Dim a, b As Integer, c As New Collection").is_empty());
        assert!(statement_errors("Const Pi As Double = 3.14").is_empty());
        assert!(statement_errors("Static count As Integer").is_empty());
        assert!(statement_errors("Dim grid(9, 9) As Integer").is_empty());
    }

    #[test]
    fn mid_assignment() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let statement = parse_statement(Scanner::new("Mid$(s, 1, 2) = \"ab\"", &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        let Statement::MidAssignment(mid) = statement else {
            panic!("expected a Mid assignment, got {statement:?}");
        };
        assert!(mid.has_type_char);
        assert!(mid.length.is_some());

        // Without `=` after the parentheses, `Mid` is an ordinary call.
        let statement = parse_statement(Scanner::new("Mid(s, 1)", &arena), &mut errors);
        assert!(matches!(statement, Statement::Call(_)));
    }

    #[test]
    fn one_error_per_statement() {
        assert_eq!(
            statement_errors("Foo(1 2"),
            [SyntaxErrorKind::ExpectedRightParenthesis]
        );
    }

    #[test]
    fn garbage_resyncs_per_line() {
        assert_eq!(
            script_errors(") )\n) )\n"),
            [SyntaxErrorKind::ExpectedStatement, SyntaxErrorKind::ExpectedStatement]
        );
    }

    #[test]
    fn declaration_keyword_closes_procedure() {
        let errors = script_errors("Sub A()\n  x = 1\nSub B()\nEnd Sub\n");
        assert_eq!(errors, [SyntaxErrorKind::ExpectedEndSub]);
    }

    #[test]
    fn file_level_statement_inside_procedure() {
        let errors = script_errors("Sub A()\n  Imports System\nEnd Sub\n");
        assert_eq!(errors, [SyntaxErrorKind::InvalidInsideProcedure]);
    }

    #[test]
    fn empty_statement_input() {
        assert_eq!(statement_errors(""), [SyntaxErrorKind::ExpectedStatement]);
    }
}
