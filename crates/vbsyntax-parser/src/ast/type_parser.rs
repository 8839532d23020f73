//! Parsing of names, type names, type arguments, type parameters and
//! array bounds.

use vbsyntax_core::{Location, Span, SyntaxErrorKind};

use crate::ast::list::CommaList;
use crate::ast::names::{GlobalNamespaceName, Name, QualifiedName, SimpleName};
use crate::ast::parser::Parser;
use crate::ast::types::{
    ArrayBound, ArrayBounds, ArrayTypeName, Constraint, ConstraintList, ConstructedTypeName,
    IntrinsicType, IntrinsicTypeName, NamedTypeName, TypeArgumentList, TypeName, TypeParameter,
    TypeParameterList,
};
use crate::lexer::{Token, TokenKind};

impl<'src, 'ast, 'p> Parser<'src, 'ast, 'p> {
    // ========================================================================
    // Names
    // ========================================================================

    /// The simple name a token spells. Keywords yield their own text.
    pub(super) fn simple_name(&self, token: Token<'ast>) -> SimpleName<'ast> {
        match token.identifier() {
            Some(ident) => SimpleName::new(ident.text, ident.type_char, ident.escaped, token.span),
            None => SimpleName::missing(token.span.start),
        }
    }

    /// Parse an identifier, reporting `ExpectedIdentifier` if there is none.
    /// A reserved keyword is reported but still taken as the name.
    pub(super) fn parse_identifier(&mut self) -> SimpleName<'ast> {
        let token = self.peek();
        if token.kind == TokenKind::Identifier {
            self.read();
            return self.simple_name(token);
        }
        if token.kind.is_keyword() && token.identifier().is_some() {
            self.report(SyntaxErrorKind::InvalidUseOfKeyword, token.span);
            self.read();
            return self.simple_name(token);
        }
        self.report_unexpected(SyntaxErrorKind::ExpectedIdentifier);
        SimpleName::missing(self.placeholder())
    }

    /// Parse a name after `.` or `!`, where keywords are allowed.
    pub(super) fn parse_member_name(&mut self) -> SimpleName<'ast> {
        let token = self.peek();
        if token.identifier().is_some() {
            self.read();
            return self.simple_name(token);
        }
        self.report_unexpected(SyntaxErrorKind::ExpectedIdentifier);
        SimpleName::missing(self.placeholder())
    }

    /// Parse a possibly qualified name, optionally starting with `Global`.
    pub(super) fn parse_name(&mut self) -> Name<'ast> {
        let token = self.peek();
        let mut name = match token.kind {
            TokenKind::Identifier => {
                self.read();
                Name::Simple(self.simple_name(token))
            }
            TokenKind::Global => {
                self.read();
                if !self.check(TokenKind::Period) {
                    self.report_unexpected(SyntaxErrorKind::ExpectedPeriod);
                }
                Name::Global(GlobalNamespaceName { span: token.span })
            }
            _ => {
                self.report_unexpected(SyntaxErrorKind::ExpectedIdentifier);
                return Name::Simple(SimpleName::missing(self.placeholder()));
            }
        };

        while let Some(dot) = self.eat(TokenKind::Period) {
            let member = self.parse_member_name();
            let span = name.span().to(member.span);
            name = Name::Qualified(self.arena.alloc(QualifiedName {
                qualifier: name,
                dot: dot.span.start,
                name: member,
                span,
            }));
            if member.is_bad() {
                break;
            }
        }
        name
    }

    // ========================================================================
    // Type Names
    // ========================================================================

    /// Parse a type name with optional array rank specifiers (`Integer(,)`).
    pub(super) fn parse_type_name(&mut self) -> TypeName<'ast> {
        let element = self.parse_non_array_type_name();
        if element.is_bad() {
            return element;
        }
        self.parse_array_suffixes(element)
    }

    /// Parse a type name without an array suffix, as after `New` or in
    /// `Inherits`.
    pub(super) fn parse_non_array_type_name(&mut self) -> TypeName<'ast> {
        let token = self.peek();
        if let Some(intrinsic) = IntrinsicType::from_token(token.kind) {
            self.read();
            return TypeName::Intrinsic(IntrinsicTypeName {
                intrinsic,
                span: token.span,
            });
        }
        if !matches!(token.kind, TokenKind::Identifier | TokenKind::Global) {
            self.report_unexpected(SyntaxErrorKind::ExpectedType);
            return TypeName::Bad(Span::point(self.placeholder()));
        }

        let start = token.span.start;
        let name = self.parse_name();
        if self.at_type_arguments() {
            let arguments = self.parse_type_arguments();
            let span = self.span_from(start);
            return TypeName::Constructed(self.arena.alloc(ConstructedTypeName {
                name,
                arguments,
                span,
            }));
        }
        TypeName::Named(NamedTypeName {
            name,
            span: name.span(),
        })
    }

    /// Wrap `element` in each array rank specifier that follows.
    pub(super) fn parse_array_suffixes(&mut self, mut element: TypeName<'ast>) -> TypeName<'ast> {
        let start = element.span().start;
        while self.check(TokenKind::LeftParenthesis) && !self.at_type_arguments() {
            let bounds = self.parse_array_bounds(false);
            let span = self.span_from(start);
            element = TypeName::Array(self.arena.alloc(ArrayTypeName {
                element,
                rank: bounds.rank,
                bounds: (!bounds.is_rank_only()).then_some(bounds),
                span,
            }));
        }
        element
    }

    /// Whether `(Of` follows.
    pub(super) fn at_type_arguments(&mut self) -> bool {
        self.check(TokenKind::LeftParenthesis) && self.peek_nth(1).kind == TokenKind::Of
    }

    /// Parse `(Of T1, T2)`.
    pub(super) fn parse_type_arguments(&mut self) -> TypeArgumentList<'ast> {
        let start = self.read().span.start;
        let of = self.read().span.start;
        let mut arguments = Vec::new();
        let mut separators = Vec::new();
        loop {
            arguments.push(self.parse_type_name());
            match self.eat(TokenKind::Comma) {
                Some(comma) => separators.push(comma.span.start),
                None => break,
            }
        }
        let list_span = arguments[0].span().to(self.span_from(start));
        let close = self
            .expect(TokenKind::RightParenthesis, SyntaxErrorKind::ExpectedRightParenthesis)
            .map(|token| token.span.start);
        TypeArgumentList {
            open: start,
            of,
            arguments: CommaList::new(
                self.arena.alloc_slice_copy(&arguments),
                self.arena.alloc_slice_copy(&separators),
                list_span,
            ),
            close,
            span: self.span_from(start),
        }
    }

    // ========================================================================
    // Type Parameters
    // ========================================================================

    /// Parse `(Of T As {Class, New}, U)` if present.
    pub(super) fn parse_type_parameters(&mut self) -> Option<TypeParameterList<'ast>> {
        if !self.at_type_arguments() {
            return None;
        }
        let start = self.read().span.start;
        let of = self.read().span.start;
        let mut parameters = Vec::new();
        let mut separators = Vec::new();
        loop {
            parameters.push(self.parse_type_parameter());
            match self.eat(TokenKind::Comma) {
                Some(comma) => separators.push(comma.span.start),
                None => break,
            }
        }
        let list_span = parameters[0].span.to(self.span_from(start));
        let close = self
            .expect(TokenKind::RightParenthesis, SyntaxErrorKind::ExpectedRightParenthesis)
            .map(|token| token.span.start);
        Some(TypeParameterList {
            open: start,
            of,
            parameters: CommaList::new(
                self.arena.alloc_slice_copy(&parameters),
                self.arena.alloc_slice_copy(&separators),
                list_span,
            ),
            close,
            span: self.span_from(start),
        })
    }

    fn parse_type_parameter(&mut self) -> TypeParameter<'ast> {
        let name = self.parse_identifier();
        let start = name.span.start;
        let constraints = match self.eat(TokenKind::As) {
            Some(as_token) => {
                let list = self.parse_constraints(as_token.span.start);
                Some(&*self.arena.alloc(list))
            }
            None => None,
        };
        TypeParameter {
            name,
            constraints,
            span: self.span_from(start),
        }
    }

    /// Parse the constraints after `As`: one constraint or a braced list.
    fn parse_constraints(&mut self, as_location: Location) -> ConstraintList<'ast> {
        let Some(open) = self.eat(TokenKind::LeftCurlyBrace) else {
            let constraint = self.parse_constraint();
            let constraints = self.arena.alloc_slice_copy(&[constraint]);
            return ConstraintList {
                as_location,
                open_brace: None,
                constraints: CommaList::new(constraints, &[], constraint.span()),
                close_brace: None,
                span: self.span_from(as_location),
            };
        };

        let mut constraints = Vec::new();
        let mut separators = Vec::new();
        loop {
            constraints.push(self.parse_constraint());
            match self.eat(TokenKind::Comma) {
                Some(comma) => separators.push(comma.span.start),
                None => break,
            }
        }
        let list_span = constraints[0].span().to(self.span_from(open.span.start));
        let close_brace = self
            .expect(TokenKind::RightCurlyBrace, SyntaxErrorKind::ExpectedRightCurlyBrace)
            .map(|token| token.span.start);
        ConstraintList {
            as_location,
            open_brace: Some(open.span.start),
            constraints: CommaList::new(
                self.arena.alloc_slice_copy(&constraints),
                self.arena.alloc_slice_copy(&separators),
                list_span,
            ),
            close_brace,
            span: self.span_from(as_location),
        }
    }

    fn parse_constraint(&mut self) -> Constraint<'ast> {
        let token = self.peek();
        match token.kind {
            TokenKind::Class => {
                self.read();
                Constraint::Class(token.span)
            }
            TokenKind::Structure => {
                self.read();
                Constraint::Structure(token.span)
            }
            TokenKind::New => {
                self.read();
                Constraint::New(token.span)
            }
            TokenKind::Identifier | TokenKind::Global => {
                Constraint::Type(self.parse_non_array_type_name())
            }
            _ if IntrinsicType::from_token(token.kind).is_some() => {
                Constraint::Type(self.parse_non_array_type_name())
            }
            _ => {
                self.report_unexpected(SyntaxErrorKind::ExpectedConstraint);
                Constraint::Type(TypeName::Bad(Span::point(self.placeholder())))
            }
        }
    }

    // ========================================================================
    // Array Bounds
    // ========================================================================

    /// Parse `(bounds)` or a rank specifier `(,)`. Explicit bounds are
    /// reported unless `allow_bounds` is set.
    pub(super) fn parse_array_bounds(&mut self, allow_bounds: bool) -> &'ast ArrayBounds<'ast> {
        let open = self.read().span.start;
        let mut bounds = Vec::new();
        let mut separators = Vec::new();
        let mut rank = 1u32;
        loop {
            if !matches!(
                self.peek_kind(),
                TokenKind::Comma | TokenKind::RightParenthesis
            ) && !self.at_statement_end()
            {
                bounds.push(self.parse_array_bound());
            }
            match self.eat(TokenKind::Comma) {
                Some(comma) => {
                    separators.push(comma.span.start);
                    rank += 1;
                }
                None => break,
            }
        }

        if !bounds.is_empty() && bounds.len() != rank as usize {
            // A dimension was left empty next to one with a bound.
            let at = self.placeholder();
            self.report(SyntaxErrorKind::ExpectedExpression, Span::point(at));
            separators.truncate(bounds.len() - 1);
        }
        let bounds_span = match (bounds.first(), bounds.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => Span::point(open),
        };
        if !bounds.is_empty() {
            if !allow_bounds {
                self.report(SyntaxErrorKind::ArrayBoundsNotAllowed, bounds_span);
            }
        } else {
            separators.clear();
        }

        let close = self
            .expect(TokenKind::RightParenthesis, SyntaxErrorKind::ExpectedRightParenthesis)
            .map(|token| token.span.start);
        self.arena.alloc(ArrayBounds {
            open,
            rank,
            bounds: CommaList::new(
                self.arena.alloc_slice_copy(&bounds),
                self.arena.alloc_slice_copy(&separators),
                bounds_span,
            ),
            close,
            span: self.span_from(open),
        })
    }

    /// `[lower To] upper`
    fn parse_array_bound(&mut self) -> ArrayBound<'ast> {
        let first = self.parse_expression();
        let start = first.span().start;
        match self.eat(TokenKind::To) {
            Some(to) => {
                let upper = self.parse_expression();
                ArrayBound {
                    lower: Some(first),
                    to: Some(to.span.start),
                    upper,
                    span: self.span_from(start),
                }
            }
            None => ArrayBound {
                lower: None,
                to: None,
                upper: first,
                span: first.span(),
            },
        }
    }

    /// Parse the bounds or rank of a declared variable name, if present.
    pub(super) fn parse_variable_array(
        &mut self,
        allow_bounds: bool,
    ) -> Option<&'ast ArrayBounds<'ast>> {
        self.check(TokenKind::LeftParenthesis)
            .then(|| self.parse_array_bounds(allow_bounds))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{TypeName, parse_type_name};
    use crate::lexer::Scanner;
    use bumpalo::Bump;
    use vbsyntax_core::{SyntaxErrorKind, SyntaxErrors};

    fn parse(source: &str) -> (String, Vec<SyntaxErrorKind>) {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let type_name = parse_type_name(Scanner::new(source, &arena), &mut errors);
        (type_name.to_string(), errors.kinds())
    }

    #[test]
    fn intrinsic_and_named() {
        assert_eq!(parse("Integer"), ("Integer".to_string(), vec![]));
        assert_eq!(
            parse("System.Collections.ArrayList"),
            ("System.Collections.ArrayList".to_string(), vec![])
        );
    }

    #[test]
    fn constructed_and_array() {
        assert_eq!(
            parse("Dictionary(Of String, List(Of Integer))"),
            ("Dictionary(Of String, List(Of Integer))".to_string(), vec![])
        );
        assert_eq!(parse("Long(,)"), ("Long(,)".to_string(), vec![]));
        assert_eq!(parse("Byte()()"), ("Byte()()".to_string(), vec![]));
    }

    #[test]
    fn global_qualified() {
        assert_eq!(parse("Global.System.String"), ("Global.System.String".to_string(), vec![]));
    }

    #[test]
    fn bounds_not_allowed_in_type() {
        let (_, errors) = parse("Integer(5)");
        assert_eq!(errors, [SyntaxErrorKind::ArrayBoundsNotAllowed]);
    }

    #[test]
    fn missing_type() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let type_name = parse_type_name(Scanner::new("+", &arena), &mut errors);
        assert!(type_name.is_bad());
        assert!(type_name.span().is_empty());
        assert_eq!(errors.kinds(), [SyntaxErrorKind::ExpectedType]);
    }

    #[test]
    fn constraints_on_type_parameters() {
        let (result, errors) = crate::ast::parser::tests::with_parser(
            "(Of T As {Class, New}, U As IComparable)",
            |p| {
                p.parse_type_parameters().map(|list| {
                    list.parameters
                        .iter()
                        .map(|param| param.constraints.map_or(0, |c| c.constraints.len()))
                        .collect::<Vec<_>>()
                })
            },
        );
        assert!(errors.is_empty(), "{errors}");
        assert_eq!(result, Some(vec![2, 1]));
    }

    #[test]
    fn unclosed_type_arguments() {
        let (_, errors) = parse("List(Of Integer");
        assert_eq!(errors, [SyntaxErrorKind::ExpectedRightParenthesis]);
    }
}
