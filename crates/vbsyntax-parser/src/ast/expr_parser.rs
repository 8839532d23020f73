//! Expression parsing.
//!
//! Binary expressions are parsed by precedence climbing over the table in
//! [`Precedence`]; every operator is left-associative. Primaries are
//! followed by a postfix loop of member access, dictionary lookup and
//! argument lists.

use vbsyntax_core::{Location, Span, SyntaxErrorKind};

use crate::ast::expr::{
    AddressOfExpression, AggregateInitializer, BinaryExpression, CallOrIndexExpression,
    CastExpression, DictionaryLookupExpression, Expression, GetTypeExpression, Initializer,
    InstanceExpression, IntrinsicCastExpression, LiteralExpression, LiteralValue,
    NewAggregateExpression, NewExpression, ParenthesizedExpression, QualifiedExpression,
    SimpleNameExpression, TypeOfExpression, UnaryExpression,
};
use crate::ast::list::{Argument, ArgumentList, CommaList};
use crate::ast::ops::{BinaryOperator, Precedence, UnaryOperator};
use crate::ast::parser::Parser;
use crate::ast::tree::TreeType;
use crate::ast::types::{ArrayTypeName, IntrinsicType, TypeName};
use crate::lexer::{Token, TokenKind, TokenValue};

impl<'src, 'ast, 'p> Parser<'src, 'ast, 'p> {
    // ========================================================================
    // Operators
    // ========================================================================

    /// Parse a complete expression.
    pub(super) fn parse_expression(&mut self) -> Expression<'ast> {
        self.parse_binary_expression(Precedence::None)
    }

    /// Parse an expression, consuming only binary operators that bind
    /// tighter than `pending`.
    pub(super) fn parse_binary_expression(&mut self, pending: Precedence) -> Expression<'ast> {
        let mut left = self.parse_unary_expression();
        let start = left.span().start;

        loop {
            let token = self.peek();
            let Some(op) = BinaryOperator::from_token(token.kind) else {
                break;
            };
            let precedence = op.precedence();
            if precedence <= pending {
                break;
            }
            self.read();

            let right = self.parse_binary_expression(precedence);
            let span = self.span_from(start);
            left = Expression::Binary(self.arena.alloc(BinaryExpression {
                left,
                op,
                op_span: token.span,
                right,
                span,
            }));
        }
        left
    }

    fn parse_unary_expression(&mut self) -> Expression<'ast> {
        let token = self.peek();
        let Some(op) = UnaryOperator::from_token(token.kind) else {
            let primary = self.parse_primary_expression();
            return self.parse_postfix_expression(primary);
        };
        self.read();
        let operand = self.parse_binary_expression(op.operand_precedence());
        let span = self.span_from(token.span.start);
        Expression::Unary(self.arena.alloc(UnaryExpression { op, operand, span }))
    }

    // ========================================================================
    // Primaries
    // ========================================================================

    fn parse_primary_expression(&mut self) -> Expression<'ast> {
        let token = self.peek();
        if let Some(value) = literal_value(token) {
            self.read();
            return Expression::Literal(LiteralExpression {
                value,
                span: token.span,
            });
        }

        match token.kind {
            TokenKind::Identifier => {
                self.read();
                self.finish_simple_name(token)
            }
            TokenKind::Me => {
                self.read();
                Expression::Instance(InstanceExpression::new(TreeType::MeExpression, token.span))
            }
            TokenKind::MyClass => {
                self.read();
                Expression::Instance(InstanceExpression::new(
                    TreeType::MyClassExpression,
                    token.span,
                ))
            }
            TokenKind::MyBase => {
                self.read();
                Expression::Instance(InstanceExpression::new(
                    TreeType::MyBaseExpression,
                    token.span,
                ))
            }
            TokenKind::Global => {
                self.read();
                if !self.check(TokenKind::Period) {
                    self.report_unexpected(SyntaxErrorKind::ExpectedPeriod);
                }
                Expression::Global(token.span)
            }
            TokenKind::Nothing => {
                self.read();
                Expression::Nothing(token.span)
            }
            TokenKind::LeftParenthesis => self.parse_parenthesized_expression(),
            TokenKind::Period => {
                self.read();
                self.finish_member_access(None, token.span.start)
            }
            TokenKind::Exclamation => {
                self.read();
                self.finish_dictionary_lookup(None, token.span.start)
            }
            TokenKind::TypeOf => self.parse_type_of_expression(),
            TokenKind::GetType => self.parse_get_type_expression(),
            TokenKind::CType => self.parse_cast_expression(TreeType::CTypeExpression),
            TokenKind::DirectCast => self.parse_cast_expression(TreeType::DirectCastExpression),
            TokenKind::TryCast => self.parse_cast_expression(TreeType::TryCastExpression),
            TokenKind::New => self.parse_new_expression(),
            TokenKind::AddressOf => {
                self.read();
                let operand = self.parse_postfix_target();
                let span = self.span_from(token.span.start);
                Expression::AddressOf(self.arena.alloc(AddressOfExpression { operand, span }))
            }
            kind if IntrinsicType::from_cast_token(kind).is_some() => {
                self.parse_intrinsic_cast_expression()
            }
            // `Integer.MaxValue`
            kind if IntrinsicType::from_token(kind).is_some()
                && self.peek_nth(1).kind == TokenKind::Period =>
            {
                self.read();
                self.finish_simple_name(token)
            }
            TokenKind::LexicalError => {
                self.report_unexpected(SyntaxErrorKind::ExpectedExpression);
                self.read();
                Expression::Bad(token.span)
            }
            _ => {
                self.report_unexpected(SyntaxErrorKind::ExpectedExpression);
                Expression::Bad(Span::point(self.placeholder()))
            }
        }
    }

    /// Build a name expression from an already consumed token, with type
    /// arguments if `(Of` follows.
    fn finish_simple_name(&mut self, token: Token<'ast>) -> Expression<'ast> {
        let name = self.simple_name(token);
        let type_arguments = self
            .at_type_arguments()
            .then(|| self.parse_type_arguments());
        let span = self.span_from(token.span.start);
        Expression::SimpleName(self.arena.alloc(SimpleNameExpression {
            name,
            type_arguments,
            span,
        }))
    }

    fn parse_parenthesized_expression(&mut self) -> Expression<'ast> {
        let open = self.read().span.start;
        let operand = self.parse_expression();
        let close = self
            .expect(TokenKind::RightParenthesis, SyntaxErrorKind::ExpectedRightParenthesis)
            .map(|token| token.span.start);
        let span = self.span_from(open);
        Expression::Parenthesized(self.arena.alloc(ParenthesizedExpression {
            operand,
            close,
            span,
        }))
    }

    /// `TypeOf expression Is type`
    fn parse_type_of_expression(&mut self) -> Expression<'ast> {
        let start = self.read().span.start;
        let operand = self.parse_binary_expression(Precedence::Relational);
        let is_location = self
            .expect(TokenKind::Is, SyntaxErrorKind::ExpectedIs)
            .map(|token| token.span.start);
        let type_name = if is_location.is_some() {
            self.parse_type_name()
        } else {
            TypeName::Bad(Span::point(self.placeholder()))
        };
        let span = self.span_from(start);
        Expression::TypeOf(self.arena.alloc(TypeOfExpression {
            operand,
            is_location,
            type_name,
            span,
        }))
    }

    /// `GetType(type)`
    fn parse_get_type_expression(&mut self) -> Expression<'ast> {
        let start = self.read().span.start;
        self.expect(TokenKind::LeftParenthesis, SyntaxErrorKind::ExpectedLeftParenthesis);
        let type_name = self.parse_type_name();
        let close = self
            .expect(TokenKind::RightParenthesis, SyntaxErrorKind::ExpectedRightParenthesis)
            .map(|token| token.span.start);
        let span = self.span_from(start);
        Expression::GetType(self.arena.alloc(GetTypeExpression {
            type_name,
            close,
            span,
        }))
    }

    /// `CType(expression, type)` and its `DirectCast` and `TryCast` forms.
    fn parse_cast_expression(&mut self, tree_type: TreeType) -> Expression<'ast> {
        let start = self.read().span.start;
        self.expect(TokenKind::LeftParenthesis, SyntaxErrorKind::ExpectedLeftParenthesis);
        let operand = self.parse_expression();
        let comma = self
            .expect(TokenKind::Comma, SyntaxErrorKind::ExpectedComma)
            .map(|token| token.span.start);
        let type_name = self.parse_type_name();
        let close = self
            .expect(TokenKind::RightParenthesis, SyntaxErrorKind::ExpectedRightParenthesis)
            .map(|token| token.span.start);
        let span = self.span_from(start);
        Expression::Cast(self.arena.alloc(CastExpression::new(
            tree_type, operand, comma, type_name, close, span,
        )))
    }

    /// `CInt(expression)` and the other conversion keywords.
    fn parse_intrinsic_cast_expression(&mut self) -> Expression<'ast> {
        let token = self.read();
        let Some(intrinsic) = IntrinsicType::from_cast_token(token.kind) else {
            return Expression::Bad(token.span);
        };
        self.expect(TokenKind::LeftParenthesis, SyntaxErrorKind::ExpectedLeftParenthesis);
        let operand = self.parse_expression();
        let close = self
            .expect(TokenKind::RightParenthesis, SyntaxErrorKind::ExpectedRightParenthesis)
            .map(|token| token.span.start);
        let span = self.span_from(token.span.start);
        Expression::IntrinsicCast(self.arena.alloc(IntrinsicCastExpression {
            intrinsic,
            operand,
            close,
            span,
        }))
    }

    // ========================================================================
    // Object Creation
    // ========================================================================

    /// `New T(arguments)` or `New T(bounds) {initializers}`.
    fn parse_new_expression(&mut self) -> Expression<'ast> {
        let start = self.read().span.start;
        let type_name = self.parse_non_array_type_name();

        if !type_name.is_bad() && self.at_array_creation() {
            let type_start = type_name.span().start;
            let bounds = self.parse_array_bounds(true);
            let span = self.span_from(type_start);
            let array_type = TypeName::Array(self.arena.alloc(ArrayTypeName {
                element: type_name,
                rank: bounds.rank,
                bounds: (!bounds.is_rank_only()).then_some(bounds),
                span,
            }));
            let array_type = self.parse_array_suffixes(array_type);
            let initializer = self.parse_aggregate_initializer();
            let span = self.span_from(start);
            return Expression::NewAggregate(self.arena.alloc(NewAggregateExpression {
                array_type,
                initializer,
                span,
            }));
        }

        let arguments = (!type_name.is_bad() && self.check(TokenKind::LeftParenthesis))
            .then(|| self.parse_argument_list());
        let span = self.span_from(start);
        Expression::New(self.arena.alloc(NewExpression {
            type_name,
            arguments,
            span,
        }))
    }

    /// Whether the parenthesized group that follows is an array size,
    /// that is, it is followed by `{` or by another group.
    fn at_array_creation(&mut self) -> bool {
        if !self.check(TokenKind::LeftParenthesis) || self.at_type_arguments() {
            return false;
        }
        let mark = self.mark();
        let found = self.skip_parenthesized()
            && matches!(
                self.peek_kind(),
                TokenKind::LeftCurlyBrace | TokenKind::LeftParenthesis
            );
        self.backtrack(mark);
        found
    }

    /// `{a, b, {c, d}}`. Reports `ExpectedLeftCurlyBrace` and returns an
    /// empty initializer if there is no opening brace.
    pub(super) fn parse_aggregate_initializer(&mut self) -> &'ast AggregateInitializer<'ast> {
        let Some(open) = self.eat(TokenKind::LeftCurlyBrace) else {
            self.report_unexpected(SyntaxErrorKind::ExpectedLeftCurlyBrace);
            let at = self.placeholder();
            return self.arena.alloc(AggregateInitializer {
                open: at,
                elements: CommaList::empty(at),
                close: None,
                span: Span::point(at),
            });
        };
        let open = open.span.start;

        let mut elements = Vec::new();
        let mut separators = Vec::new();
        if !self.check(TokenKind::RightCurlyBrace) {
            loop {
                elements.push(self.parse_initializer());
                match self.eat(TokenKind::Comma) {
                    Some(comma) => separators.push(comma.span.start),
                    None => break,
                }
            }
        }
        let elements = match (elements.first(), elements.last()) {
            (Some(first), Some(last)) => {
                let span = first.span().merge(last.span());
                CommaList::new(
                    self.arena.alloc_slice_copy(&elements),
                    self.arena.alloc_slice_copy(&separators),
                    span,
                )
            }
            _ => CommaList::empty(self.here()),
        };
        let close = self
            .expect(TokenKind::RightCurlyBrace, SyntaxErrorKind::ExpectedRightCurlyBrace)
            .map(|token| token.span.start);
        let span = self.span_from(open);
        self.arena.alloc(AggregateInitializer {
            open,
            elements,
            close,
            span,
        })
    }

    /// An expression or a nested aggregate initializer.
    pub(super) fn parse_initializer(&mut self) -> Initializer<'ast> {
        if self.check(TokenKind::LeftCurlyBrace) {
            Initializer::Aggregate(self.parse_aggregate_initializer())
        } else {
            Initializer::Expression(self.parse_expression())
        }
    }

    // ========================================================================
    // Postfix Operators
    // ========================================================================

    /// Parse a primary expression and its postfix operators, as in the
    /// target of an assignment or call statement.
    pub(super) fn parse_postfix_target(&mut self) -> Expression<'ast> {
        let primary = self.parse_primary_expression();
        self.parse_postfix_expression(primary)
    }

    /// Apply member access, dictionary lookup and argument lists to
    /// `target` for as long as they follow.
    pub(super) fn parse_postfix_expression(
        &mut self,
        mut target: Expression<'ast>,
    ) -> Expression<'ast> {
        if target.is_bad() {
            return target;
        }
        loop {
            let token = self.peek();
            target = match token.kind {
                TokenKind::Period => {
                    self.read();
                    self.finish_member_access(Some(target), token.span.start)
                }
                TokenKind::Exclamation => {
                    self.read();
                    self.finish_dictionary_lookup(Some(target), token.span.start)
                }
                TokenKind::LeftParenthesis => {
                    let arguments = self.parse_argument_list();
                    let span = self.span_from(target.span().start);
                    Expression::CallOrIndex(self.arena.alloc(CallOrIndexExpression {
                        target,
                        arguments,
                        span,
                    }))
                }
                _ => break,
            };
            if self.last_name_missing(&target) {
                break;
            }
        }
        target
    }

    fn last_name_missing(&self, expression: &Expression<'ast>) -> bool {
        match expression {
            Expression::Qualified(e) => e.name.is_bad(),
            Expression::DictionaryLookup(e) => e.name.is_bad(),
            _ => false,
        }
    }

    /// `.name` after the dot has been consumed.
    fn finish_member_access(
        &mut self,
        qualifier: Option<Expression<'ast>>,
        dot: Location,
    ) -> Expression<'ast> {
        let start = qualifier.map_or(dot, |q| q.span().start);
        let name = self.parse_member_name();
        let type_arguments = (!name.is_bad() && self.at_type_arguments())
            .then(|| self.parse_type_arguments());
        let span = self.span_from(start);
        Expression::Qualified(self.arena.alloc(QualifiedExpression {
            qualifier,
            dot,
            name,
            type_arguments,
            span,
        }))
    }

    /// `!name` after the bang has been consumed.
    fn finish_dictionary_lookup(
        &mut self,
        qualifier: Option<Expression<'ast>>,
        bang: Location,
    ) -> Expression<'ast> {
        let start = qualifier.map_or(bang, |q| q.span().start);
        let name = self.parse_member_name();
        let span = self.span_from(start);
        Expression::DictionaryLookup(self.arena.alloc(DictionaryLookupExpression {
            qualifier,
            bang,
            name,
            span,
        }))
    }

    // ========================================================================
    // Arguments
    // ========================================================================

    /// Parse a parenthesized argument list. Arguments may be omitted
    /// (`f(1, , 3)`) or named (`f(x := 1)`); positional arguments may not
    /// follow named ones.
    pub(super) fn parse_argument_list(&mut self) -> ArgumentList<'ast> {
        let open = self.read().span.start;
        let mut arguments = Vec::new();
        let mut separators = Vec::new();
        let mut named = false;
        if !self.check(TokenKind::RightParenthesis) {
            loop {
                arguments.push(self.parse_argument(&mut named));
                match self.eat(TokenKind::Comma) {
                    Some(comma) => separators.push(comma.span.start),
                    None => break,
                }
            }
        }

        let mut close = self
            .expect(TokenKind::RightParenthesis, SyntaxErrorKind::ExpectedRightParenthesis)
            .map(|token| token.span.start);
        if close.is_none() {
            self.resync_at(&[TokenKind::RightParenthesis]);
            close = self
                .eat(TokenKind::RightParenthesis)
                .map(|token| token.span.start);
        }
        let arguments = self.comma_list_of_arguments(arguments, separators, open);
        ArgumentList {
            open: Some(open),
            arguments,
            close,
            span: self.span_from(open),
        }
    }

    /// Parse arguments without parentheses, up to the end of the
    /// statement: `MsgBox "Hello", vbOKOnly`.
    pub(super) fn parse_unparenthesized_arguments(&mut self) -> ArgumentList<'ast> {
        let start = self.here();
        let mut arguments = Vec::new();
        let mut separators = Vec::new();
        let mut named = false;
        if !self.at_statement_end() {
            loop {
                arguments.push(self.parse_argument(&mut named));
                match self.eat(TokenKind::Comma) {
                    Some(comma) => separators.push(comma.span.start),
                    None => break,
                }
            }
        }
        let arguments = self.comma_list_of_arguments(arguments, separators, start);
        ArgumentList {
            open: None,
            arguments,
            close: None,
            span: if arguments.is_empty() {
                Span::point(start)
            } else {
                self.span_from(start)
            },
        }
    }

    /// Continue an argument list whose first argument was already parsed.
    pub(super) fn continue_unparenthesized_arguments(
        &mut self,
        first: Argument<'ast>,
    ) -> ArgumentList<'ast> {
        let start = first.span.start;
        let mut arguments = vec![first];
        let mut separators = Vec::new();
        let mut named = false;
        while let Some(comma) = self.eat(TokenKind::Comma) {
            separators.push(comma.span.start);
            arguments.push(self.parse_argument(&mut named));
        }
        let arguments = self.comma_list_of_arguments(arguments, separators, start);
        ArgumentList {
            open: None,
            arguments,
            close: None,
            span: self.span_from(start),
        }
    }

    fn comma_list_of_arguments(
        &mut self,
        arguments: Vec<Argument<'ast>>,
        separators: Vec<Location>,
        at: Location,
    ) -> CommaList<'ast, Argument<'ast>> {
        match (arguments.first(), arguments.last()) {
            (Some(first), Some(last)) => CommaList::new(
                self.arena.alloc_slice_copy(&arguments),
                self.arena.alloc_slice_copy(&separators),
                first.span.merge(last.span),
            ),
            _ => CommaList::empty(at),
        }
    }

    fn parse_argument(&mut self, named: &mut bool) -> Argument<'ast> {
        if matches!(
            self.peek_kind(),
            TokenKind::Comma | TokenKind::RightParenthesis
        ) || self.at_statement_end()
        {
            if *named {
                self.report_unexpected(SyntaxErrorKind::ExpectedNamedArgument);
            }
            let at = self.placeholder();
            return Argument {
                name: None,
                colon_equals: None,
                value: None,
                span: Span::point(at),
            };
        }

        let token = self.peek();
        if token.identifier().is_some() && self.peek_nth(1).kind == TokenKind::ColonEquals {
            self.read();
            let name = self.simple_name(token);
            let colon_equals = self.read().span.start;
            let value = self.parse_expression();
            *named = true;
            return Argument {
                name: Some(name),
                colon_equals: Some(colon_equals),
                value: Some(value),
                span: self.span_from(token.span.start),
            };
        }

        if *named {
            self.report(SyntaxErrorKind::ExpectedNamedArgument, token.span);
        }
        let value = self.parse_expression();
        Argument {
            name: None,
            colon_equals: None,
            value: Some(value),
            span: value.span(),
        }
    }
}

/// The literal value a token carries, if it is a literal.
fn literal_value<'ast>(token: Token<'ast>) -> Option<LiteralValue<'ast>> {
    Some(match token.value {
        TokenValue::Integer {
            value,
            base,
            type_char,
        } => LiteralValue::Integer {
            value,
            base,
            type_char,
        },
        TokenValue::UnsignedInteger {
            value,
            base,
            type_char,
        } => LiteralValue::UnsignedInteger {
            value,
            base,
            type_char,
        },
        TokenValue::FloatingPoint { value, type_char } => LiteralValue::FloatingPoint {
            value: value.into_inner(),
            type_char,
        },
        TokenValue::Decimal { value, type_char } => LiteralValue::Decimal { value, type_char },
        TokenValue::Character(c) => LiteralValue::Character(c),
        TokenValue::String(s) => LiteralValue::String(s),
        TokenValue::Date(d) => LiteralValue::Date(d),
        _ => match token.kind {
            TokenKind::True => LiteralValue::Boolean(true),
            TokenKind::False => LiteralValue::Boolean(false),
            _ => return None,
        },
    })
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::lexer::Scanner;
    use bumpalo::Bump;
    use vbsyntax_core::{SyntaxErrorKind, SyntaxErrors};

    /// Parse `source` and render it fully parenthesized.
    fn render(source: &str) -> (String, Vec<SyntaxErrorKind>) {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let expr = parse_expression(Scanner::new(source, &arena), &mut errors);
        (show(&expr), errors.kinds())
    }

    fn show(expr: &Expression<'_>) -> String {
        match expr {
            Expression::Literal(lit) => match lit.value {
                LiteralValue::Boolean(b) => b.to_string(),
                LiteralValue::Integer { value, .. } => value.to_string(),
                LiteralValue::FloatingPoint { value, .. } => value.to_string(),
                LiteralValue::String(s) => format!("{s:?}"),
                _ => "lit".to_string(),
            },
            Expression::SimpleName(e) => e.name.text.to_string(),
            Expression::Qualified(e) => match e.qualifier {
                Some(q) => format!("{}.{}", show(&q), e.name.text),
                None => format!(".{}", e.name.text),
            },
            Expression::DictionaryLookup(e) => match e.qualifier {
                Some(q) => format!("{}!{}", show(&q), e.name.text),
                None => format!("!{}", e.name.text),
            },
            Expression::CallOrIndex(e) => {
                let args: Vec<_> = e
                    .arguments
                    .iter()
                    .map(|a| {
                        let value = a.value.as_ref().map_or(String::new(), show);
                        match a.name {
                            Some(n) => format!("{} := {value}", n.text),
                            None => value,
                        }
                    })
                    .collect();
                format!("{}({})", show(&e.target), args.join(", "))
            }
            Expression::Instance(e) => format!("{:?}", e.tree_type),
            Expression::Global(_) => "Global".to_string(),
            Expression::Nothing(_) => "Nothing".to_string(),
            Expression::Parenthesized(e) => format!("({})", show(&e.operand)),
            Expression::Unary(e) => format!("({} {})", e.op, show(&e.operand)),
            Expression::Binary(e) => {
                format!("({} {:?} {})", show(&e.left), e.op, show(&e.right))
            }
            Expression::TypeOf(e) => format!("TypeOf {} Is {}", show(&e.operand), e.type_name),
            Expression::GetType(e) => format!("GetType({})", e.type_name),
            Expression::Cast(e) => format!("{:?}({}, {})", e.tree_type, show(&e.operand), e.type_name),
            Expression::IntrinsicCast(e) => format!("C{}({})", e.intrinsic, show(&e.operand)),
            Expression::New(e) => format!("New {}", e.type_name),
            Expression::NewAggregate(e) => {
                format!("New {} {{{}}}", e.array_type, e.initializer.elements.len())
            }
            Expression::AddressOf(e) => format!("AddressOf {}", show(&e.operand)),
            Expression::Bad(_) => "<bad>".to_string(),
        }
    }

    #[test]
    fn precedence() {
        assert_eq!(render("1 + 2 * 3").0, "(1 Plus (2 Multiply 3))");
        assert_eq!(render("1 * 2 + 3").0, "((1 Multiply 2) Plus 3)");
        assert_eq!(render("a & b + c").0, "(a Concatenate (b Plus c))");
        assert_eq!(render("a Or b And c").0, "(a Or (b And c))");
        assert_eq!(render("a Xor b Or c").0, "(a Xor (b Or c))");
        assert_eq!(render("a Mod b \\ c").0, "(a Modulus (b IntegralDivide c))");
        assert_eq!(render("x << 1 + 2").0, "(x ShiftLeft (1 Plus 2))");
    }

    #[test]
    fn left_associative() {
        assert_eq!(render("1 - 2 - 3").0, "((1 Minus 2) Minus 3)");
        assert_eq!(render("2 ^ 3 ^ 2").0, "((2 Power 3) Power 2)");
        assert_eq!(render("a = b = c").0, "((a Equals b) Equals c)");
    }

    #[test]
    fn unary_operators() {
        assert_eq!(render("-a ^ b").0, "(- (a Power b))");
        assert_eq!(render("-a * b").0, "((- a) Multiply b)");
        assert_eq!(render("Not a = b").0, "(Not (a Equals b))");
        assert_eq!(render("Not a And b").0, "((Not a) And b)");
    }

    #[test]
    fn literals() {
        assert_eq!(render("True").0, "true");
        assert_eq!(render("\"hi\"").0, "\"hi\"");
        assert_eq!(render("&HFF").0, "255");
        assert_eq!(render("1.5").0, "1.5");
    }

    #[test]
    fn postfix_chains() {
        assert_eq!(render("a.b(1).c").0, "a.b(1).c");
        assert_eq!(render("rs!Name").0, "rs!Name");
        assert_eq!(render(".Value + !Key").0, "(.Value Plus !Key)");
        assert_eq!(render("f(1, , 3)").0, "f(1, , 3)");
        assert_eq!(render("f(x := 1, y := 2)").0, "f(x := 1, y := 2)");
        assert_eq!(render("Integer.MaxValue").0, "Integer.MaxValue");
    }

    #[test]
    fn keywords_as_member_names() {
        let (text, errors) = render("obj.Next.Loop");
        assert!(errors.is_empty());
        assert_eq!(text, "obj.Next.Loop");
    }

    #[test]
    fn positional_after_named_argument() {
        let (_, errors) = render("f(x := 1, 2)");
        assert_eq!(errors, [SyntaxErrorKind::ExpectedNamedArgument]);
    }

    #[test]
    fn conversions() {
        assert_eq!(render("CInt(x)").0, "CInteger(x)");
        assert_eq!(
            render("CType(o, String)").0,
            "CTypeExpression(o, String)"
        );
        assert_eq!(render("TypeOf o Is Form").0, "TypeOf o Is Form");
        assert_eq!(render("GetType(List(Of Integer))").0, "GetType(List(Of Integer))");
    }

    #[test]
    fn type_of_binds_before_logical_operators() {
        assert_eq!(
            render("TypeOf o Is Form And x").0,
            "(TypeOf o Is Form And x)"
        );
    }

    #[test]
    fn object_creation() {
        assert_eq!(render("New Collection").0, "New Collection");
        assert_eq!(render("New List(Of Integer)(10)").0, "New List(Of Integer)");
        assert_eq!(render("New Integer(2) {1, 2, 3}").0, "New Integer() {3}");
        assert_eq!(render("New Byte() {}").0, "New Byte() {0}");
        assert_eq!(render("New Integer(,) {{1}, {2}}").0, "New Integer(,) {2}");
    }

    #[test]
    fn jagged_array_creation() {
        assert_eq!(
            render("New Integer(5)() {}"),
            ("New Integer()() {0}".to_string(), vec![])
        );
        assert_eq!(
            render("New Integer(5)()"),
            (
                "New Integer()() {0}".to_string(),
                vec![SyntaxErrorKind::ExpectedLeftCurlyBrace]
            )
        );
        // Only the first group may carry bounds.
        assert_eq!(
            render("New Integer(5)(3)"),
            (
                "New Integer()() {0}".to_string(),
                vec![SyntaxErrorKind::ArrayBoundsNotAllowed]
            )
        );
    }

    #[test]
    fn generic_method_call() {
        assert_eq!(render("obj.Convert(Of String)(x)").0, "obj.Convert(x)");
    }

    #[test]
    fn missing_operand() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let expr = parse_expression(Scanner::new("1 +", &arena), &mut errors);
        assert_eq!(errors.kinds(), [SyntaxErrorKind::ExpectedExpression]);
        let Expression::Binary(binary) = expr else {
            panic!("expected a binary expression, got {expr:?}");
        };
        assert!(binary.right.is_bad());
        assert!(binary.span.contains(&binary.right.span()));
    }

    #[test]
    fn unclosed_parenthesis() {
        let (text, errors) = render("(1 + 2");
        assert_eq!(text, "((1 Plus 2))");
        assert_eq!(errors, [SyntaxErrorKind::ExpectedRightParenthesis]);
    }

    #[test]
    fn lexical_error_becomes_bad_expression() {
        let (text, errors) = render("\"open");
        assert_eq!(text, "<bad>");
        assert_eq!(errors, [SyntaxErrorKind::InvalidStringLiteral]);
    }

    #[test]
    fn spans_cover_operands() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let expr = parse_expression(Scanner::new("a.b(c)", &arena), &mut errors);
        assert_eq!(expr.span().start.index, 0);
        assert_eq!(expr.span().finish.index, 6);
    }
}
