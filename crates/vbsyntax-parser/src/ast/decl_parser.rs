//! Declaration parsing.
//!
//! Declarations are parsed the same way in every container; the container
//! only decides which members, modifiers and orderings are legal, and those
//! are reported without changing the shape of the tree.

use vbsyntax_core::{Location, Span, SyntaxErrorKind};

use crate::ast::block::{BlockContext, Terminator};
use crate::ast::decl::{
    AccessorDeclaration, AsClause, Attribute, AttributeBlock, AttributeDeclaration,
    AttributeTarget, Charset, CustomEventDeclaration, Declaration, DelegateDeclaration,
    EnumDeclaration, EnumValueDeclaration, EventDeclaration, ExternalDeclaration, HandlesClause,
    HandlesItem, ImplementsClause, ImportsClause, ImportsDeclaration, MethodDeclaration, Modifier,
    ModifierList, Modifiers, NamespaceDeclaration, OperatorDeclaration, OptionDeclaration,
    OptionKind, OptionSetting, Parameter, ParameterList, ParameterModifier, ParameterModifiers,
    PropertyDeclaration, ReturnType, TypeDeclaration, TypeListDeclaration,
    VariableDeclarator, VariableListDeclaration,
};
use crate::ast::list::{CommaList, DeclarationList};
use crate::ast::names::{Name, SimpleName, SpecialName, SpecialNameKind, VariableName};
use crate::ast::ops::OverloadableOperator;
use crate::ast::parser::{LineStart, Parser};
use crate::ast::stmt::BlockKind;
use crate::ast::tree::TreeType;
use crate::lexer::{TokenKind, TokenValue};

/// What a list of declarations is nested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Container {
    File,
    Namespace,
    Class,
    Structure,
    Module,
    Interface,
    Enum,
    Property,
    CustomEvent,
    /// Script files, where declarations and statements mix freely.
    Script,
}

impl Container {
    /// The error for an `Option`, `Imports` or assembly attribute
    /// statement in this container.
    fn file_level_error(self) -> Option<SyntaxErrorKind> {
        match self {
            Self::File | Self::Script => None,
            Self::Namespace => Some(SyntaxErrorKind::InvalidInsideNamespace),
            Self::Class | Self::Structure | Self::Module => Some(SyntaxErrorKind::InvalidInsideType),
            Self::Interface => Some(SyntaxErrorKind::InvalidInsideInterface),
            Self::Enum => Some(SyntaxErrorKind::InvalidInsideEnum),
            Self::Property => Some(SyntaxErrorKind::ExpectedGetOrSet),
            Self::CustomEvent => Some(SyntaxErrorKind::ExpectedEventAccessor),
        }
    }
}

/// The kind of member a declaration line introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Member {
    Namespace,
    Class,
    Structure,
    Module,
    Interface,
    Enum,
    Field,
    Method,
    Constructor,
    Operator,
    Property,
    Event,
    CustomEvent,
    Delegate,
    External,
}

impl Member {
    fn is_type(self) -> bool {
        matches!(
            self,
            Self::Class | Self::Structure | Self::Module | Self::Interface | Self::Enum | Self::Delegate
        )
    }

    /// Modifiers the member accepts anywhere.
    fn modifiers(self) -> Modifiers {
        const METHOD: Modifiers = Modifiers::ACCESS
            .union(Modifiers::SHADOWS)
            .union(Modifiers::SHARED)
            .union(Modifiers::OVERRIDABLE)
            .union(Modifiers::NOT_OVERRIDABLE)
            .union(Modifiers::MUST_OVERRIDE)
            .union(Modifiers::OVERRIDES)
            .union(Modifiers::OVERLOADS);

        match self {
            Self::Namespace => Modifiers::empty(),
            Self::Class => Modifiers::ACCESS
                | Modifiers::SHADOWS
                | Modifiers::MUST_INHERIT
                | Modifiers::NOT_INHERITABLE
                | Modifiers::PARTIAL,
            Self::Structure => Modifiers::ACCESS | Modifiers::SHADOWS | Modifiers::PARTIAL,
            Self::Module => Modifiers::ACCESS | Modifiers::PARTIAL,
            Self::Interface | Self::Enum | Self::Delegate => Modifiers::ACCESS | Modifiers::SHADOWS,
            Self::Field => Modifiers::ACCESS
                | Modifiers::SHADOWS
                | Modifiers::SHARED
                | Modifiers::READ_ONLY
                | Modifiers::DIM
                | Modifiers::CONST
                | Modifiers::WITH_EVENTS,
            Self::Method => METHOD,
            Self::Constructor => Modifiers::ACCESS | Modifiers::SHARED,
            Self::Operator => Modifiers::PUBLIC
                | Modifiers::SHARED
                | Modifiers::SHADOWS
                | Modifiers::OVERLOADS
                | Modifiers::WIDENING
                | Modifiers::NARROWING,
            Self::Property => {
                METHOD | Modifiers::DEFAULT | Modifiers::READ_ONLY | Modifiers::WRITE_ONLY
            }
            Self::Event | Self::CustomEvent => {
                Modifiers::ACCESS | Modifiers::SHADOWS | Modifiers::SHARED
            }
            Self::External => Modifiers::ACCESS | Modifiers::SHADOWS | Modifiers::OVERLOADS,
        }
    }

    /// Modifiers the member accepts inside `container`.
    fn modifiers_in(self, container: Container) -> Modifiers {
        let allowed = self.modifiers();
        match container {
            Container::File | Container::Namespace => {
                allowed.difference(Modifiers::PRIVATE | Modifiers::PROTECTED | Modifiers::SHADOWS)
            }
            Container::Module => allowed.difference(
                Modifiers::PROTECTED
                    | Modifiers::SHARED
                    | Modifiers::OVERRIDABLE
                    | Modifiers::NOT_OVERRIDABLE
                    | Modifiers::MUST_OVERRIDE
                    | Modifiers::OVERRIDES
                    | Modifiers::DEFAULT,
            ),
            Container::Structure => allowed.difference(
                Modifiers::PROTECTED
                    | Modifiers::OVERRIDABLE
                    | Modifiers::NOT_OVERRIDABLE
                    | Modifiers::MUST_OVERRIDE,
            ),
            Container::Interface if !self.is_type() => allowed.intersection(
                Modifiers::SHADOWS
                    | Modifiers::OVERLOADS
                    | Modifiers::DEFAULT
                    | Modifiers::READ_ONLY
                    | Modifiers::WRITE_ONLY,
            ),
            _ => allowed,
        }
    }

    /// The error for declaring this member inside `container`, if any.
    fn placement_error(self, container: Container) -> Option<SyntaxErrorKind> {
        use Member::*;
        match container {
            Container::File | Container::Namespace => matches!(
                self,
                Field | Method | Constructor | Operator | Property | Event | CustomEvent | External
            )
            .then_some(SyntaxErrorKind::InvalidInsideNamespace),
            Container::Class | Container::Structure => {
                matches!(self, Namespace | Module).then_some(SyntaxErrorKind::InvalidInsideType)
            }
            Container::Module => matches!(self, Namespace | Module | Operator)
                .then_some(SyntaxErrorKind::InvalidInsideType),
            Container::Interface => matches!(
                self,
                Namespace | Module | Field | Constructor | Operator | CustomEvent | External
            )
            .then_some(SyntaxErrorKind::InvalidInsideInterface),
            Container::Script | Container::Enum | Container::Property | Container::CustomEvent => {
                None
            }
        }
    }
}

/// How far a container's declarations have progressed, for ordering rules.
#[derive(Debug, Default)]
struct DeclarationOrder {
    past_options: bool,
    past_imports: bool,
    past_attributes: bool,
    inherits: bool,
    implements: bool,
    members: bool,
}

/// The declaration heading shared by every member.
#[derive(Debug, Clone, Copy)]
struct Head<'ast> {
    start: Location,
    attributes: &'ast [AttributeBlock<'ast>],
    modifiers: ModifierList<'ast>,
}

impl<'src, 'ast, 'p> Parser<'src, 'ast, 'p> {
    // ========================================================================
    // Declaration Lists
    // ========================================================================

    /// Parse declarations until a terminator of the innermost block, a
    /// terminator of an enclosing block, or the end of the input.
    pub(super) fn parse_declarations(
        &mut self,
        container: Container,
    ) -> (DeclarationList<'ast>, Option<Terminator>) {
        let mut declarations = Vec::new();
        let mut order = DeclarationOrder::default();

        let terminator = loop {
            self.skip_separators(None);
            let current = self.current_block();

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

            if self.leaves_container(container) {
                if let Some(context) = current {
                    self.report_unterminated(context);
                }
                break None;
            }

            self.begin_construct();
            self.check_declaration_order(container, &mut order);
            let mark = self.mark();
            declarations.push(self.parse_declaration(container));
            if self.mark() == mark {
                self.read();
            }
        };

        let span = match (declarations.first(), declarations.last()) {
            (Some(first), Some(last)) => first.span().merge(last.span()),
            _ => Span::point(self.placeholder()),
        };
        let list = DeclarationList {
            declarations: self.arena.alloc_slice_copy(&declarations),
            span,
        };
        (list, terminator)
    }

    /// Whether the next line is a member that cannot belong to an enum
    /// or accessor list, which then ends unterminated.
    fn leaves_container(&mut self, container: Container) -> bool {
        match container {
            Container::Property | Container::CustomEvent => {
                self.peek_accessor().is_none() && self.peek_line_start() == LineStart::Member
            }
            Container::Enum => {
                !matches!(self.peek_kind(), TokenKind::Identifier | TokenKind::LessThan)
                    && self.peek_line_start() == LineStart::Member
            }
            _ => false,
        }
    }

    fn check_declaration_order(&mut self, container: Container, order: &mut DeclarationOrder) {
        let token = self.peek();
        match container {
            Container::File => {
                let assembly_attribute = self.at_assembly_attribute();
                let error = match token.kind {
                    TokenKind::Option if order.past_options => {
                        Some(SyntaxErrorKind::OptionStatementWrongOrder)
                    }
                    TokenKind::Imports if order.past_imports => {
                        Some(SyntaxErrorKind::ImportsStatementWrongOrder)
                    }
                    TokenKind::LessThan if assembly_attribute && order.past_attributes => {
                        Some(SyntaxErrorKind::AttributeStatementWrongOrder)
                    }
                    _ => None,
                };
                if let Some(error) = error {
                    self.report(error, token.span);
                }
                match token.kind {
                    TokenKind::Option => {}
                    TokenKind::Imports => order.past_options = true,
                    TokenKind::LessThan if assembly_attribute => {
                        order.past_options = true;
                        order.past_imports = true;
                    }
                    _ => {
                        order.past_options = true;
                        order.past_imports = true;
                        order.past_attributes = true;
                    }
                }
            }
            Container::Class | Container::Interface if token.kind == TokenKind::Inherits => {
                if order.members || order.implements {
                    self.report(SyntaxErrorKind::InheritsMustBeFirst, token.span);
                } else if order.inherits && container == Container::Class {
                    self.report(SyntaxErrorKind::NoMultipleInheritance, token.span);
                }
                order.inherits = true;
            }
            Container::Class | Container::Structure if token.kind == TokenKind::Implements => {
                if order.members {
                    self.report(SyntaxErrorKind::ImplementsInWrongOrder, token.span);
                }
                order.implements = true;
            }
            _ => order.members = true,
        }
    }

    /// `<Assembly: ...>` or `<Module: ...>`.
    fn at_assembly_attribute(&mut self) -> bool {
        let target = self.peek_nth(1);
        self.check(TokenKind::LessThan)
            && (target.is_contextual(TokenKind::Assembly) || target.kind == TokenKind::Module)
            && self.peek_nth(2).kind == TokenKind::Colon
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// Parse one declaration, including the body and terminator of block
    /// declarations.
    pub(super) fn parse_declaration(&mut self, container: Container) -> Declaration<'ast> {
        let start = self.here();

        match self.peek_terminator() {
            Some(Terminator::End(kind)) => {
                let span = self.peek().span;
                self.report(kind.end_without_begin(), span);
                return Declaration::EndBlock(self.parse_end_block(kind));
            }
            Some(_) => {
                self.report_unexpected(SyntaxErrorKind::ExpectedDeclaration);
                self.resync_at(&[]);
                return Declaration::Bad(self.span_from(start));
            }
            None => {}
        }

        match self.peek_kind() {
            TokenKind::Option | TokenKind::Imports => {
                if let Some(error) = container.file_level_error() {
                    let span = self.peek().span;
                    self.report(error, span);
                }
                return if self.check(TokenKind::Option) {
                    self.parse_option_declaration()
                } else {
                    self.parse_imports_declaration()
                };
            }
            TokenKind::Inherits => {
                return self.parse_type_list(TreeType::InheritsDeclaration, container);
            }
            TokenKind::Implements => {
                return self.parse_type_list(TreeType::ImplementsDeclaration, container);
            }
            _ => {}
        }

        let attributes = self.parse_attribute_blocks();
        if !attributes.is_empty()
            && self.at_statement_end()
            && attributes
                .iter()
                .all(|block| block.attributes.iter().all(|a| a.target.is_some()))
        {
            if let Some(error) = container.file_level_error() {
                self.report(error, attributes[0].span);
            }
            return Declaration::Attribute(self.arena.alloc(AttributeDeclaration {
                blocks: attributes,
                span: self.span_from(start),
            }));
        }

        if container == Container::Enum {
            return self.parse_enum_value(start, attributes);
        }

        let head = Head {
            start,
            attributes,
            modifiers: self.parse_modifiers(),
        };

        match container {
            Container::Property => {
                return match self.peek_kind() {
                    TokenKind::Get | TokenKind::Set => self.parse_accessor_declaration(head, container),
                    _ => self.bad_declaration(start, SyntaxErrorKind::ExpectedGetOrSet),
                };
            }
            Container::CustomEvent => {
                return match self.peek_kind() {
                    TokenKind::AddHandler | TokenKind::RemoveHandler | TokenKind::RaiseEvent => {
                        self.parse_accessor_declaration(head, container)
                    }
                    _ => self.bad_declaration(start, SyntaxErrorKind::ExpectedEventAccessor),
                };
            }
            _ => {}
        }

        let custom = self.peek();
        if custom.is_contextual(TokenKind::Custom)
            && self.peek_nth(1).kind != TokenKind::Event
            && is_declaration_keyword(self.peek_nth(1).kind)
        {
            self.report(SyntaxErrorKind::InvalidUseOfCustomModifier, custom.span);
            self.read();
        }

        let token = self.peek();
        let member = match token.kind {
            TokenKind::Namespace => Member::Namespace,
            TokenKind::Class => Member::Class,
            TokenKind::Structure => Member::Structure,
            TokenKind::Module => Member::Module,
            TokenKind::Interface => Member::Interface,
            TokenKind::Enum => Member::Enum,
            TokenKind::Sub if self.peek_nth(1).kind == TokenKind::New => Member::Constructor,
            TokenKind::Sub | TokenKind::Function => Member::Method,
            TokenKind::Operator => Member::Operator,
            TokenKind::Property => Member::Property,
            TokenKind::Event => Member::Event,
            TokenKind::Delegate => Member::Delegate,
            TokenKind::Declare => Member::External,
            TokenKind::Identifier
                if token.is_contextual(TokenKind::Custom)
                    && self.peek_nth(1).kind == TokenKind::Event =>
            {
                Member::CustomEvent
            }
            TokenKind::Identifier if !head.modifiers.is_empty() => Member::Field,
            _ => return self.bad_declaration(start, SyntaxErrorKind::ExpectedDeclaration),
        };

        if let Some(error) = member.placement_error(container) {
            self.report(error, token.span);
        }
        self.check_modifiers(&head.modifiers, member.modifiers_in(container));

        match member {
            Member::Namespace => self.parse_namespace_declaration(head),
            Member::Class | Member::Structure | Member::Module | Member::Interface => {
                self.parse_type_declaration(head, token.kind)
            }
            Member::Enum => self.parse_enum_declaration(head),
            Member::Field => self.parse_field_declaration(head),
            Member::Method | Member::Constructor => {
                self.parse_method_declaration(head, member, container)
            }
            Member::Operator => self.parse_operator_declaration(head),
            Member::Property => self.parse_property_declaration(head, container),
            Member::Event => self.parse_event_declaration(head),
            Member::CustomEvent => self.parse_custom_event_declaration(head),
            Member::Delegate => self.parse_delegate_declaration(head),
            Member::External => self.parse_external_declaration(head),
        }
    }

    fn bad_declaration(&mut self, start: Location, error: SyntaxErrorKind) -> Declaration<'ast> {
        self.report_unexpected(error);
        self.resync_at(&[]);
        Declaration::Bad(self.span_from(start))
    }

    // ========================================================================
    // File-level Statements
    // ========================================================================

    /// `Option Explicit|Strict [On|Off]` or `Option Compare Binary|Text`.
    fn parse_option_declaration(&mut self) -> Declaration<'ast> {
        let start = self.read().span.start;
        let token = self.peek();
        let kind = if token.is_contextual(TokenKind::Explicit) {
            OptionKind::Explicit
        } else if token.is_contextual(TokenKind::Strict) {
            OptionKind::Strict
        } else if token.is_contextual(TokenKind::Compare) {
            OptionKind::Compare
        } else {
            self.report_unexpected(SyntaxErrorKind::ExpectedOptionKind);
            self.resync_at(&[]);
            return Declaration::Option(OptionDeclaration {
                kind: None,
                setting: None,
                span: self.span_from(start),
            });
        };
        self.read();

        let setting = match kind {
            OptionKind::Explicit | OptionKind::Strict => {
                if self.at_statement_end() {
                    None
                } else if self.eat(TokenKind::On).is_some() {
                    Some(OptionSetting::On)
                } else if self.eat_contextual(TokenKind::Off).is_some() {
                    Some(OptionSetting::Off)
                } else {
                    self.report_unexpected(SyntaxErrorKind::ExpectedOnOrOff);
                    None
                }
            }
            OptionKind::Compare => {
                if self.eat_contextual(TokenKind::Binary).is_some() {
                    Some(OptionSetting::Binary)
                } else if self.eat_contextual(TokenKind::Text).is_some() {
                    Some(OptionSetting::Text)
                } else {
                    self.report_unexpected(SyntaxErrorKind::ExpectedBinaryOrText);
                    None
                }
            }
        };

        let span = self.end_statement(start);
        Declaration::Option(OptionDeclaration {
            kind: Some(kind),
            setting,
            span,
        })
    }

    /// `Imports [alias =] name, ...`
    fn parse_imports_declaration(&mut self) -> Declaration<'ast> {
        let start = self.read().span.start;
        let mut clauses = Vec::new();
        let mut separators = Vec::new();
        loop {
            let clause_start = self.here();
            let (alias, equals) = if self.check(TokenKind::Identifier)
                && self.peek_nth(1).kind == TokenKind::Equals
            {
                let alias = self.parse_identifier();
                let equals = self.read().span.start;
                (Some(alias), Some(equals))
            } else {
                (None, None)
            };
            let target = self.parse_non_array_type_name();
            clauses.push(ImportsClause {
                alias,
                equals,
                target,
                span: self.span_from(clause_start),
            });
            match self.eat(TokenKind::Comma) {
                Some(comma) => separators.push(comma.span.start),
                None => break,
            }
        }
        let list_span = clauses[0].span.merge(clauses[clauses.len() - 1].span);
        let clauses = self.comma_list(&clauses, &separators, list_span);
        let span = self.end_statement(start);
        Declaration::Imports(self.arena.alloc(ImportsDeclaration { clauses, span }))
    }

    /// `Inherits` or `Implements` followed by type names.
    fn parse_type_list(&mut self, tree_type: TreeType, container: Container) -> Declaration<'ast> {
        let keyword = self.read();
        let valid = match tree_type {
            TreeType::InheritsDeclaration => {
                matches!(container, Container::Class | Container::Interface)
            }
            _ => matches!(container, Container::Class | Container::Structure),
        };
        if !valid {
            let error = if tree_type == TreeType::InheritsDeclaration {
                SyntaxErrorKind::InheritsNotValidHere
            } else {
                SyntaxErrorKind::ImplementsNotValidHere
            };
            self.report(error, keyword.span);
        }

        let mut types = Vec::new();
        let mut separators = Vec::new();
        loop {
            types.push(self.parse_non_array_type_name());
            match self.eat(TokenKind::Comma) {
                Some(comma) => separators.push(comma.span.start),
                None => break,
            }
        }
        if tree_type == TreeType::InheritsDeclaration
            && container == Container::Class
            && types.len() > 1
        {
            self.report(SyntaxErrorKind::NoMultipleInheritance, types[1].span());
        }

        let list_span = types[0].span().merge(types[types.len() - 1].span());
        let types = self.comma_list(&types, &separators, list_span);
        let span = self.end_statement(keyword.span.start);
        Declaration::TypeList(self.arena.alloc(TypeListDeclaration {
            tree_type,
            types,
            span,
        }))
    }

    // ========================================================================
    // Attributes and Modifiers
    // ========================================================================

    /// Zero or more `<...>` attribute blocks.
    pub(super) fn parse_attribute_blocks(&mut self) -> &'ast [AttributeBlock<'ast>] {
        let mut blocks = Vec::new();
        while self.check(TokenKind::LessThan) {
            blocks.push(self.parse_attribute_block());
        }
        self.arena.alloc_slice_copy(&blocks)
    }

    fn parse_attribute_block(&mut self) -> AttributeBlock<'ast> {
        let open = self.read().span.start;
        let mut attributes = Vec::new();
        let mut separators = Vec::new();
        loop {
            attributes.push(self.parse_attribute());
            match self.eat(TokenKind::Comma) {
                Some(comma) => separators.push(comma.span.start),
                None => break,
            }
        }
        let list_span = attributes[0]
            .span
            .merge(attributes[attributes.len() - 1].span);
        let attributes = self.comma_list(&attributes, &separators, list_span);

        let close = self
            .expect(TokenKind::GreaterThan, SyntaxErrorKind::ExpectedGreaterThan)
            .map(|token| token.span.start);
        if close.is_none() {
            self.resync_at(&[TokenKind::GreaterThan]);
            self.eat(TokenKind::GreaterThan);
        }
        AttributeBlock {
            open,
            attributes,
            close,
            span: self.span_from(open),
        }
    }

    /// `[Assembly: | Module:] name [(arguments)]`
    fn parse_attribute(&mut self) -> Attribute<'ast> {
        let start = self.here();
        let token = self.peek();
        let target = if self.peek_nth(1).kind != TokenKind::Colon {
            None
        } else if token.is_contextual(TokenKind::Assembly) {
            Some(AttributeTarget::Assembly)
        } else if token.kind == TokenKind::Module {
            Some(AttributeTarget::Module)
        } else {
            None
        };
        if target.is_some() {
            self.read();
            self.read();
        }

        let name = self.parse_name();
        let arguments = if !name.is_bad() && self.check(TokenKind::LeftParenthesis) {
            Some(self.parse_argument_list())
        } else {
            None
        };
        Attribute {
            target,
            name,
            arguments,
            span: self.span_from(start),
        }
    }

    /// Zero or more modifier keywords. Repeats are reported and kept.
    pub(super) fn parse_modifiers(&mut self) -> ModifierList<'ast> {
        let start = self.here();
        let mut modifiers = Vec::new();
        let mut flags = Modifiers::empty();
        while let Some(kind) = Modifiers::from_token(self.peek_kind()) {
            let token = self.read();
            if flags.contains(kind) {
                self.report(SyntaxErrorKind::DuplicateModifier, token.span);
            }
            flags |= kind;
            modifiers.push(Modifier {
                kind,
                span: token.span,
            });
        }

        let span = match (modifiers.first(), modifiers.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => Span::point(start),
        };
        ModifierList {
            modifiers: self.arena.alloc_slice_copy(&modifiers),
            flags,
            span,
        }
    }

    /// Report the first modifier outside `allowed`.
    pub(super) fn check_modifiers(&mut self, modifiers: &ModifierList<'ast>, allowed: Modifiers) {
        if let Some(invalid) = modifiers
            .modifiers
            .iter()
            .find(|modifier| !allowed.contains(modifier.kind))
        {
            self.report(SyntaxErrorKind::InvalidModifier, invalid.span);
        }
    }

    // ========================================================================
    // Variables
    // ========================================================================

    /// `a, b As T, c As New T(args) = value, ...`
    ///
    /// Names share the `As` clause that follows them; a comma after an
    /// `As` clause or initializer starts the next declarator.
    pub(super) fn parse_variable_declarators(
        &mut self,
        allow_bounds: bool,
    ) -> CommaList<'ast, VariableDeclarator<'ast>> {
        let mut declarators = Vec::new();
        let mut separators = Vec::new();
        loop {
            declarators.push(self.parse_variable_declarator(allow_bounds));
            match self.eat(TokenKind::Comma) {
                Some(comma) => separators.push(comma.span.start),
                None => break,
            }
        }
        let span = declarators[0]
            .span
            .merge(declarators[declarators.len() - 1].span);
        self.comma_list(&declarators, &separators, span)
    }

    fn parse_variable_declarator(&mut self, allow_bounds: bool) -> VariableDeclarator<'ast> {
        let start = self.here();
        let mut names = Vec::new();
        let mut separators = Vec::new();
        loop {
            let name = self.parse_variable_name(allow_bounds);
            names.push(name);
            if name.name.is_bad() {
                break;
            }
            match self.eat(TokenKind::Comma) {
                Some(comma) => separators.push(comma.span.start),
                None => break,
            }
        }
        let list_span = names[0].span.merge(names[names.len() - 1].span);
        let names = self.comma_list(&names, &separators, list_span);

        let as_clause = self.parse_as_clause(true);
        let equals = self.eat(TokenKind::Equals).map(|token| token.span.start);
        let initializer = match equals {
            Some(_) => Some(self.parse_initializer()),
            None => None,
        };
        VariableDeclarator {
            names,
            as_clause,
            equals,
            initializer,
            span: self.span_from(start),
        }
    }

    /// A declared name with optional array bounds or rank specifiers.
    pub(super) fn parse_variable_name(&mut self, allow_bounds: bool) -> VariableName<'ast> {
        let name = self.parse_identifier();
        let array = if name.is_bad() {
            None
        } else {
            self.parse_variable_array(allow_bounds)
        };
        VariableName {
            name,
            array,
            span: self.span_from(name.span.start),
        }
    }

    /// `As T` or, with `allow_new`, `As New T(args)`.
    fn parse_as_clause(&mut self, allow_new: bool) -> Option<AsClause<'ast>> {
        let as_location = self.eat(TokenKind::As)?.span.start;
        let new = if allow_new {
            self.eat(TokenKind::New).map(|token| token.span.start)
        } else {
            None
        };
        let (type_name, arguments) = if new.is_some() {
            let type_name = self.parse_non_array_type_name();
            let arguments = if !type_name.is_bad() && self.check(TokenKind::LeftParenthesis) {
                Some(self.parse_argument_list())
            } else {
                None
            };
            (type_name, arguments)
        } else {
            (self.parse_type_name(), None)
        };
        Some(AsClause {
            as_location,
            new,
            type_name,
            arguments,
            span: self.span_from(as_location),
        })
    }

    /// The control variable declared by `For x As T = ...`.
    pub(super) fn parse_for_declarator(&mut self) -> VariableDeclarator<'ast> {
        let name = self.parse_variable_name(false);
        let start = name.span.start;
        let as_clause = self.parse_as_clause(false);
        let names = self.comma_list(&[name], &[], name.span);
        VariableDeclarator {
            names,
            as_clause,
            equals: None,
            initializer: None,
            span: self.span_from(start),
        }
    }

    fn parse_field_declaration(&mut self, head: Head<'ast>) -> Declaration<'ast> {
        let declarators = self.parse_variable_declarators(true);
        let span = self.end_statement(head.start);
        Declaration::Variables(self.arena.alloc(VariableListDeclaration {
            attributes: head.attributes,
            modifiers: head.modifiers,
            declarators,
            span,
        }))
    }

    // ========================================================================
    // Containers
    // ========================================================================

    fn parse_namespace_declaration(&mut self, head: Head<'ast>) -> Declaration<'ast> {
        self.read();
        let name = self.parse_name();
        let header = self.end_statement(head.start);

        self.push_block(BlockContext::declarations(BlockKind::Namespace, header));
        let (members, terminator) = self.parse_declarations(Container::Namespace);
        self.pop_block();
        let end = self.take_end(terminator, BlockKind::Namespace);

        Declaration::Namespace(self.arena.alloc(NamespaceDeclaration {
            name,
            members,
            end,
            span: self.span_from(head.start),
        }))
    }

    /// `Class`, `Structure`, `Module` or `Interface`.
    fn parse_type_declaration(&mut self, head: Head<'ast>, keyword: TokenKind) -> Declaration<'ast> {
        let (tree_type, kind, container) = match keyword {
            TokenKind::Structure => (
                TreeType::StructureDeclaration,
                BlockKind::Structure,
                Container::Structure,
            ),
            TokenKind::Module => (TreeType::ModuleDeclaration, BlockKind::Module, Container::Module),
            TokenKind::Interface => (
                TreeType::InterfaceDeclaration,
                BlockKind::Interface,
                Container::Interface,
            ),
            _ => (TreeType::ClassDeclaration, BlockKind::Class, Container::Class),
        };
        self.read();
        let name = self.parse_identifier();
        let type_parameters = if kind == BlockKind::Module {
            None
        } else {
            self.parse_type_parameters()
        };
        let header = self.end_statement(head.start);

        self.push_block(BlockContext::declarations(kind, header));
        let (members, terminator) = self.parse_declarations(container);
        self.pop_block();
        let end = self.take_end(terminator, kind);

        Declaration::Type(self.arena.alloc(TypeDeclaration {
            tree_type,
            attributes: head.attributes,
            modifiers: head.modifiers,
            name,
            type_parameters,
            members,
            end,
            span: self.span_from(head.start),
        }))
    }

    fn parse_enum_declaration(&mut self, head: Head<'ast>) -> Declaration<'ast> {
        self.read();
        let name = self.parse_identifier();
        let underlying = match self.eat(TokenKind::As) {
            Some(_) => Some(self.parse_non_array_type_name()),
            None => None,
        };
        let header = self.end_statement(head.start);

        self.push_block(BlockContext::declarations(BlockKind::Enum, header));
        let (members, terminator) = self.parse_declarations(Container::Enum);
        self.pop_block();
        let end = self.take_end(terminator, BlockKind::Enum);

        Declaration::Enum(self.arena.alloc(EnumDeclaration {
            attributes: head.attributes,
            modifiers: head.modifiers,
            name,
            underlying,
            members,
            end,
            span: self.span_from(head.start),
        }))
    }

    /// `[attributes] name [= value]`
    fn parse_enum_value(
        &mut self,
        start: Location,
        attributes: &'ast [AttributeBlock<'ast>],
    ) -> Declaration<'ast> {
        let token = self.peek();
        if token.kind != TokenKind::Identifier {
            self.report(SyntaxErrorKind::InvalidInsideEnum, token.span);
            self.skip_to_end_of_statement();
            return Declaration::Bad(self.span_from(start));
        }
        let name = self.parse_identifier();
        let value = match self.eat(TokenKind::Equals) {
            Some(_) => Some(self.parse_expression()),
            None => None,
        };
        let span = self.end_statement(start);
        Declaration::EnumValue(self.arena.alloc(EnumValueDeclaration {
            attributes,
            name,
            value,
            span,
        }))
    }

    // ========================================================================
    // Procedures
    // ========================================================================

    /// `Sub`, `Function` or `Sub New`. Interface members and
    /// `MustOverride` methods have no body.
    fn parse_method_declaration(
        &mut self,
        head: Head<'ast>,
        member: Member,
        container: Container,
    ) -> Declaration<'ast> {
        let keyword = self.read();
        let (tree_type, kind) = if member == Member::Constructor {
            (TreeType::ConstructorDeclaration, BlockKind::Sub)
        } else if keyword.kind == TokenKind::Function {
            (TreeType::FunctionDeclaration, BlockKind::Function)
        } else {
            (TreeType::SubDeclaration, BlockKind::Sub)
        };

        let name = if member == Member::Constructor {
            let new = self.read();
            self.simple_name(new)
        } else {
            self.parse_identifier()
        };
        let type_parameters = if member == Member::Constructor {
            None
        } else {
            self.parse_type_parameters()
        };
        let parameters = self.parse_parameter_list();
        let return_type = if kind == BlockKind::Function {
            self.parse_return_type()
        } else {
            None
        };
        let handles = if self.check(TokenKind::Handles) {
            Some(self.parse_handles_clause())
        } else {
            None
        };
        let implements = self.parse_implements_clause();
        let header = self.end_statement(head.start);

        let (body, end) =
            if container == Container::Interface || head.modifiers.contains(Modifiers::MUST_OVERRIDE) {
                (None, None)
            } else {
                let (body, terminator) = self.parse_block_body(kind, header);
                (Some(body), self.take_end(terminator, kind))
            };

        Declaration::Method(self.arena.alloc(MethodDeclaration {
            tree_type,
            attributes: head.attributes,
            modifiers: head.modifiers,
            name,
            type_parameters,
            parameters,
            return_type,
            handles,
            implements,
            body,
            end,
            span: self.span_from(head.start),
        }))
    }

    /// `Operator op(parameters) As T`
    fn parse_operator_declaration(&mut self, head: Head<'ast>) -> Declaration<'ast> {
        self.read();
        let token = self.peek();
        let operator = OverloadableOperator::from_token(token.kind, token.unreserved());
        let operator_span = if operator.is_some() {
            self.read();
            token.span
        } else {
            self.report_unexpected(SyntaxErrorKind::ExpectedOverloadableOperator);
            if self.check(TokenKind::LeftParenthesis) || self.at_statement_end() {
                Span::point(self.placeholder())
            } else {
                self.read();
                token.span
            }
        };
        let parameters = self.parse_parameter_list();
        let return_type = self.parse_return_type();
        let header = self.end_statement(head.start);

        let (body, terminator) = self.parse_block_body(BlockKind::Operator, header);
        let end = self.take_end(terminator, BlockKind::Operator);

        Declaration::Operator(self.arena.alloc(OperatorDeclaration {
            attributes: head.attributes,
            modifiers: head.modifiers,
            operator,
            operator_span,
            parameters,
            return_type,
            body,
            end,
            span: self.span_from(head.start),
        }))
    }

    /// `As [attributes] T` after a parameter list.
    fn parse_return_type(&mut self) -> Option<ReturnType<'ast>> {
        let as_location = self.eat(TokenKind::As)?.span.start;
        let attributes = self.parse_attribute_blocks();
        let type_name = self.parse_type_name();
        Some(ReturnType {
            as_location,
            attributes,
            type_name,
            span: self.span_from(as_location),
        })
    }

    /// `(parameter, ...)`, if present.
    pub(super) fn parse_parameter_list(&mut self) -> Option<ParameterList<'ast>> {
        if !self.check(TokenKind::LeftParenthesis) {
            return None;
        }
        let open = self.read().span.start;
        let mut parameters = Vec::new();
        let mut separators = Vec::new();
        if !self.check(TokenKind::RightParenthesis) {
            loop {
                parameters.push(self.parse_parameter());
                match self.eat(TokenKind::Comma) {
                    Some(comma) => separators.push(comma.span.start),
                    None => break,
                }
            }
        }

        if let Some((_, rest)) = parameters.split_last()
            && let Some(param_array) = rest
                .iter()
                .find(|parameter| parameter.flags.contains(ParameterModifiers::PARAM_ARRAY))
        {
            self.report(SyntaxErrorKind::ParamArrayMustBeLast, param_array.span);
        }

        let list_span = match (parameters.first(), parameters.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => Span::point(self.here()),
        };
        let parameters = self.comma_list(&parameters, &separators, list_span);

        let close = self
            .expect(
                TokenKind::RightParenthesis,
                SyntaxErrorKind::ExpectedRightParenthesis,
            )
            .map(|token| token.span.start);
        if close.is_none() {
            self.resync_at(&[TokenKind::RightParenthesis]);
            self.eat(TokenKind::RightParenthesis);
        }

        Some(ParameterList {
            open,
            parameters,
            close,
            span: self.span_from(open),
        })
    }

    /// `[attributes] [ByVal|ByRef|Optional|ParamArray] name [As T] [= default]`
    fn parse_parameter(&mut self) -> Parameter<'ast> {
        let start = self.here();
        let attributes = self.parse_attribute_blocks();

        let mut modifiers = Vec::new();
        let mut flags = ParameterModifiers::empty();
        while let Some(kind) = ParameterModifiers::from_token(self.peek_kind()) {
            let token = self.read();
            if flags.contains(kind) {
                self.report(SyntaxErrorKind::DuplicateParameterSpecifier, token.span);
            } else if conflicts(flags | kind) {
                self.report(SyntaxErrorKind::ConflictingParameterSpecifiers, token.span);
            }
            flags |= kind;
            modifiers.push(ParameterModifier {
                kind,
                span: token.span,
            });
        }

        let name = self.parse_variable_name(false);
        let as_type = match self.eat(TokenKind::As) {
            Some(_) => Some(self.parse_type_name()),
            None => None,
        };
        let default = if self.eat(TokenKind::Equals).is_some() {
            Some(self.parse_expression())
        } else {
            if flags.contains(ParameterModifiers::OPTIONAL) {
                self.report_unexpected(SyntaxErrorKind::ExpectedOptionalDefault);
            }
            None
        };

        Parameter {
            attributes,
            modifiers: self.arena.alloc_slice_copy(&modifiers),
            flags,
            name,
            as_type,
            default,
            span: self.span_from(start),
        }
    }

    /// `Handles source.Event, ...`
    fn parse_handles_clause(&mut self) -> HandlesClause<'ast> {
        let handles = self.read().span.start;
        let mut events = Vec::new();
        let mut separators = Vec::new();
        loop {
            events.push(self.parse_handles_item());
            match self.eat(TokenKind::Comma) {
                Some(comma) => separators.push(comma.span.start),
                None => break,
            }
        }
        let list_span = events[0].span.merge(events[events.len() - 1].span);
        HandlesClause {
            handles,
            events: self.comma_list(&events, &separators, list_span),
            span: self.span_from(handles),
        }
    }

    fn parse_handles_item(&mut self) -> HandlesItem<'ast> {
        let token = self.peek();
        let start = token.span.start;
        let special = match token.kind {
            TokenKind::Me => Some(SpecialNameKind::Me),
            TokenKind::MyBase => Some(SpecialNameKind::MyBase),
            TokenKind::MyClass => Some(SpecialNameKind::MyClass),
            _ => None,
        };
        let source = match special {
            Some(kind) => {
                if kind == SpecialNameKind::Me && !self.version().supports_v8() {
                    self.report(SyntaxErrorKind::MeNotValidInHandles, token.span);
                }
                self.read();
                Name::Special(SpecialName {
                    kind,
                    span: token.span,
                })
            }
            None => Name::Simple(self.parse_identifier()),
        };

        let dot = self
            .expect(TokenKind::Period, SyntaxErrorKind::ExpectedPeriod)
            .map(|token| token.span.start);
        let event = if dot.is_some() {
            self.parse_member_name()
        } else {
            SimpleName::missing(self.placeholder())
        };
        HandlesItem {
            source,
            dot,
            event,
            span: self.span_from(start),
        }
    }

    /// `Implements I.Member, ...`, if present.
    fn parse_implements_clause(&mut self) -> Option<ImplementsClause<'ast>> {
        let implements = self.eat(TokenKind::Implements)?.span.start;
        let mut members = Vec::new();
        let mut separators = Vec::new();
        loop {
            members.push(self.parse_name());
            match self.eat(TokenKind::Comma) {
                Some(comma) => separators.push(comma.span.start),
                None => break,
            }
        }
        let list_span = members[0].span().merge(members[members.len() - 1].span());
        Some(ImplementsClause {
            implements,
            members: self.comma_list(&members, &separators, list_span),
            span: self.span_from(implements),
        })
    }

    // ========================================================================
    // Properties and Events
    // ========================================================================

    fn parse_property_declaration(
        &mut self,
        head: Head<'ast>,
        container: Container,
    ) -> Declaration<'ast> {
        self.read();
        if matches!(
            self.peek_kind(),
            TokenKind::Get | TokenKind::Set | TokenKind::Let
        ) {
            return self.parse_script_property(head);
        }

        let name = self.parse_identifier();
        let parameters = self.parse_parameter_list();
        let return_type = self.parse_return_type();
        let implements = self.parse_implements_clause();
        let header = self.end_statement(head.start);

        let (accessors, end) =
            if container == Container::Interface || head.modifiers.contains(Modifiers::MUST_OVERRIDE) {
                (None, None)
            } else {
                self.push_block(BlockContext::declarations(BlockKind::Property, header));
                let (accessors, terminator) = self.parse_declarations(Container::Property);
                self.pop_block();
                (Some(accessors), self.take_end(terminator, BlockKind::Property))
            };

        Declaration::Property(self.arena.alloc(PropertyDeclaration {
            attributes: head.attributes,
            modifiers: head.modifiers,
            name,
            parameters,
            return_type,
            implements,
            accessors,
            end,
            span: self.span_from(head.start),
        }))
    }

    /// `Property Get|Let|Set name(...)` ... `End Property`, with one
    /// accessor per declaration.
    fn parse_script_property(&mut self, head: Head<'ast>) -> Declaration<'ast> {
        let keyword = self.read();
        let tree_type = if keyword.kind == TokenKind::Get {
            TreeType::GetAccessorDeclaration
        } else {
            TreeType::SetAccessorDeclaration
        };
        let name = self.parse_identifier();
        let parameters = self.parse_parameter_list();
        let return_type = if keyword.kind == TokenKind::Get {
            self.parse_return_type()
        } else {
            None
        };
        let header = self.end_statement(head.start);

        let (body, terminator) = self.parse_block_body(BlockKind::Property, header);
        let end = self.take_end(terminator, BlockKind::Property);

        let accessor: &'ast AccessorDeclaration<'ast> = self.arena.alloc(AccessorDeclaration {
            tree_type,
            attributes: &[],
            modifiers: ModifierList::empty(keyword.span.start),
            parameters: None,
            body,
            end: None,
            span: keyword.span.merge(body.span),
        });
        let accessors = DeclarationList {
            declarations: self.arena.alloc_slice_copy(&[Declaration::Accessor(accessor)]),
            span: accessor.span,
        };

        Declaration::Property(self.arena.alloc(PropertyDeclaration {
            attributes: head.attributes,
            modifiers: head.modifiers,
            name,
            parameters,
            return_type,
            implements: None,
            accessors: Some(accessors),
            end,
            span: self.span_from(head.start),
        }))
    }

    /// `Get`, `Set`, `AddHandler`, `RemoveHandler` or `RaiseEvent` with its
    /// body.
    fn parse_accessor_declaration(
        &mut self,
        head: Head<'ast>,
        container: Container,
    ) -> Declaration<'ast> {
        let keyword = self.read();
        let (tree_type, kind) = match keyword.kind {
            TokenKind::Get => (TreeType::GetAccessorDeclaration, BlockKind::Get),
            TokenKind::Set => (TreeType::SetAccessorDeclaration, BlockKind::Set),
            TokenKind::AddHandler => (TreeType::AddHandlerAccessorDeclaration, BlockKind::AddHandler),
            TokenKind::RemoveHandler => (
                TreeType::RemoveHandlerAccessorDeclaration,
                BlockKind::RemoveHandler,
            ),
            _ => (TreeType::RaiseEventAccessorDeclaration, BlockKind::RaiseEvent),
        };
        let allowed = if container == Container::Property {
            Modifiers::ACCESS
        } else {
            Modifiers::empty()
        };
        self.check_modifiers(&head.modifiers, allowed);

        let parameters = self.parse_parameter_list();
        let header = self.end_statement(head.start);
        let (body, terminator) = self.parse_block_body(kind, header);
        let end = self.take_end(terminator, kind);

        Declaration::Accessor(self.arena.alloc(AccessorDeclaration {
            tree_type,
            attributes: head.attributes,
            modifiers: head.modifiers,
            parameters,
            body,
            end,
            span: self.span_from(head.start),
        }))
    }

    /// The accessor keyword starting the next line, if any, and the kind of
    /// the token after it.
    fn peek_accessor(&mut self) -> Option<(TokenKind, TokenKind)> {
        let mark = self.mark();
        while self.check(TokenKind::LessThan) {
            if !self.skip_attribute_block() {
                break;
            }
        }
        while Modifiers::from_token(self.peek_kind()).is_some() {
            self.read();
        }
        let keyword = self.peek_kind();
        let next = self.peek_nth(1).kind;
        self.backtrack(mark);
        matches!(
            keyword,
            TokenKind::Get
                | TokenKind::Set
                | TokenKind::AddHandler
                | TokenKind::RemoveHandler
                | TokenKind::RaiseEvent
        )
        .then_some((keyword, next))
    }

    /// Whether the next line starts another accessor of the property or
    /// custom event being parsed, which ends the current accessor body.
    pub(super) fn at_sibling_accessor(&mut self) -> bool {
        let in_accessors = self.blocks.iter().any(|block| {
            !block.statements && matches!(block.kind, BlockKind::Property | BlockKind::Event)
        });
        if !in_accessors {
            return false;
        }
        match self.peek_accessor() {
            Some((TokenKind::Get, _)) => true,
            Some((_, next)) => matches!(
                next,
                TokenKind::LeftParenthesis
                    | TokenKind::LineTerminator
                    | TokenKind::Colon
                    | TokenKind::EndOfStream
            ),
            None => false,
        }
    }

    /// `Event name[(parameters)] [As T] [Implements ...]`
    fn parse_event_declaration(&mut self, head: Head<'ast>) -> Declaration<'ast> {
        self.read();
        let name = self.parse_identifier();
        let parameters = self.parse_parameter_list();
        let as_type = if parameters.is_none() && self.eat(TokenKind::As).is_some() {
            Some(self.parse_non_array_type_name())
        } else {
            None
        };
        let implements = self.parse_implements_clause();
        let span = self.end_statement(head.start);
        Declaration::Event(self.arena.alloc(EventDeclaration {
            attributes: head.attributes,
            modifiers: head.modifiers,
            name,
            parameters,
            as_type,
            implements,
            span,
        }))
    }

    /// `Custom Event name As T` ... `End Event`
    fn parse_custom_event_declaration(&mut self, head: Head<'ast>) -> Declaration<'ast> {
        let custom = self.read().span;
        self.read();
        let name = self.parse_identifier();
        let as_type = match self.expect(TokenKind::As, SyntaxErrorKind::ExpectedAs) {
            Some(_) => Some(self.parse_non_array_type_name()),
            None => None,
        };
        let implements = self.parse_implements_clause();
        let header = self.end_statement(head.start);

        self.push_block(BlockContext::declarations(BlockKind::Event, header));
        let (accessors, terminator) = self.parse_declarations(Container::CustomEvent);
        self.pop_block();
        let end = self.take_end(terminator, BlockKind::Event);

        Declaration::CustomEvent(self.arena.alloc(CustomEventDeclaration {
            attributes: head.attributes,
            modifiers: head.modifiers,
            custom,
            name,
            as_type,
            implements,
            accessors,
            end,
            span: self.span_from(head.start),
        }))
    }

    // ========================================================================
    // Delegates and External Procedures
    // ========================================================================

    fn parse_delegate_declaration(&mut self, head: Head<'ast>) -> Declaration<'ast> {
        self.read();
        let tree_type = match self.peek_kind() {
            TokenKind::Sub => TreeType::DelegateSubDeclaration,
            TokenKind::Function => TreeType::DelegateFunctionDeclaration,
            _ => return self.bad_declaration(head.start, SyntaxErrorKind::ExpectedSubOrFunction),
        };
        self.read();
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        let return_type = if tree_type == TreeType::DelegateFunctionDeclaration {
            self.parse_return_type()
        } else {
            None
        };
        let span = self.end_statement(head.start);
        Declaration::Delegate(self.arena.alloc(DelegateDeclaration {
            tree_type,
            attributes: head.attributes,
            modifiers: head.modifiers,
            name,
            type_parameters,
            parameters,
            return_type,
            span,
        }))
    }

    /// `Declare [Ansi|Unicode|Auto] Sub|Function name Lib "lib" [Alias "alias"] (...)`
    fn parse_external_declaration(&mut self, head: Head<'ast>) -> Declaration<'ast> {
        self.read();
        let charset = if self.eat_contextual(TokenKind::Ansi).is_some() {
            Some(Charset::Ansi)
        } else if self.eat_contextual(TokenKind::Unicode).is_some() {
            Some(Charset::Unicode)
        } else if self.eat_contextual(TokenKind::Auto).is_some() {
            Some(Charset::Auto)
        } else {
            None
        };
        let tree_type = match self.peek_kind() {
            TokenKind::Sub => TreeType::ExternalSubDeclaration,
            TokenKind::Function => TreeType::ExternalFunctionDeclaration,
            _ => return self.bad_declaration(head.start, SyntaxErrorKind::ExpectedSubOrFunction),
        };
        self.read();
        let name = self.parse_identifier();

        let lib = match self.expect(TokenKind::Lib, SyntaxErrorKind::ExpectedLib) {
            Some(_) => self.parse_string_literal(),
            None => None,
        };
        let alias = match self.eat(TokenKind::Alias) {
            Some(_) => self.parse_string_literal(),
            None => None,
        };
        let parameters = self.parse_parameter_list();
        let return_type = if tree_type == TreeType::ExternalFunctionDeclaration {
            self.parse_return_type()
        } else {
            None
        };
        let span = self.end_statement(head.start);

        Declaration::External(self.arena.alloc(ExternalDeclaration {
            tree_type,
            attributes: head.attributes,
            modifiers: head.modifiers,
            charset,
            name,
            lib,
            alias,
            parameters,
            return_type,
            span,
        }))
    }

    fn parse_string_literal(&mut self) -> Option<&'ast str> {
        let token = self.peek();
        match token.value {
            TokenValue::String(text) if token.kind == TokenKind::StringLiteral => {
                self.read();
                Some(text)
            }
            _ => {
                self.report_unexpected(SyntaxErrorKind::ExpectedStringLiteral);
                None
            }
        }
    }

    fn comma_list<T: Copy>(
        &self,
        items: &[T],
        separators: &[Location],
        span: Span,
    ) -> CommaList<'ast, T> {
        CommaList::new(
            self.arena.alloc_slice_copy(items),
            self.arena.alloc_slice_copy(separators),
            span,
        )
    }
}

/// Keywords that begin a declaration after any modifiers.
fn is_declaration_keyword(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Sub
            | TokenKind::Function
            | TokenKind::Property
            | TokenKind::Operator
            | TokenKind::Delegate
            | TokenKind::Declare
            | TokenKind::Class
            | TokenKind::Structure
            | TokenKind::Module
            | TokenKind::Interface
            | TokenKind::Enum
            | TokenKind::Namespace
    )
}

/// `ByVal` with `ByRef`, and `ParamArray` with `Optional` or `ByRef`.
fn conflicts(flags: ParameterModifiers) -> bool {
    flags.contains(ParameterModifiers::BY_VAL | ParameterModifiers::BY_REF)
        || flags.contains(ParameterModifiers::OPTIONAL | ParameterModifiers::PARAM_ARRAY)
        || flags.contains(ParameterModifiers::PARAM_ARRAY | ParameterModifiers::BY_REF)
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::lexer::Scanner;
    use bumpalo::Bump;
    use vbsyntax_core::{SyntaxErrorKind, SyntaxErrors};

    fn file_errors(source: &str) -> Vec<SyntaxErrorKind> {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        parse_file(Scanner::new(source, &arena), &mut errors);
        errors.kinds()
    }

    #[test]
    fn module_with_method() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let file = parse_file(
            Scanner::new("Module Program\n    Sub Main()\n        x = 1\n    End Sub\nEnd Module\n", &arena),
            &mut errors,
        );
        assert!(errors.is_empty(), "{errors}");
        let Declaration::Type(module) = file.declarations()[0] else {
            panic!("expected a module");
        };
        assert_eq!(module.tree_type, TreeType::ModuleDeclaration);
        assert!(module.name.matches("Program"));
        assert!(module.end.is_some());
        let Declaration::Method(main) = module.members.declarations[0] else {
            panic!("expected a method");
        };
        assert_eq!(main.tree_type, TreeType::SubDeclaration);
        assert_eq!(main.body.map(|body| body.len()), Some(1));
        assert!(main.end.is_some());
    }

    #[test]
    fn duplicate_modifier_reported_once() {
        assert_eq!(
            file_errors("Class C\nPublic Public Sub Foo()\nEnd Sub\nEnd Class\n"),
            [SyntaxErrorKind::DuplicateModifier]
        );
    }

    #[test]
    fn invalid_modifier_keeps_declaration() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let file = parse_file(
            Scanner::new("Module M\nMustOverride Sub Foo()\nEnd Module\n", &arena),
            &mut errors,
        );
        assert_eq!(errors.kinds(), [SyntaxErrorKind::InvalidModifier]);
        let Declaration::Type(module) = file.declarations()[0] else {
            panic!("expected a module");
        };
        let Declaration::Method(method) = module.members.declarations[0] else {
            panic!("expected a method");
        };
        assert!(method.modifiers.contains(Modifiers::MUST_OVERRIDE));
        assert!(method.body.is_none());
        assert!(module.end.is_some());
    }

    #[test]
    fn file_level_ordering() {
        assert!(file_errors("Option Strict On\nImports System\n<Assembly: CLSCompliant(True)>\nClass C\nEnd Class\n").is_empty());
        assert_eq!(
            file_errors("Imports System\nOption Strict On\n"),
            [SyntaxErrorKind::OptionStatementWrongOrder]
        );
        assert_eq!(
            file_errors("Class C\nEnd Class\nImports System\n"),
            [SyntaxErrorKind::ImportsStatementWrongOrder]
        );
        assert_eq!(
            file_errors("Class C\nEnd Class\n<Assembly: A>\n"),
            [SyntaxErrorKind::AttributeStatementWrongOrder]
        );
    }

    #[test]
    fn option_settings() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let file = parse_file(
            Scanner::new("Option Explicit\nOption Compare Text\n", &arena),
            &mut errors,
        );
        assert!(errors.is_empty(), "{errors}");
        assert!(matches!(
            file.declarations()[0],
            Declaration::Option(OptionDeclaration { kind: Some(OptionKind::Explicit), setting: None, .. })
        ));
        assert!(matches!(
            file.declarations()[1],
            Declaration::Option(OptionDeclaration { setting: Some(OptionSetting::Text), .. })
        ));

        assert_eq!(file_errors("Option Fast\n"), [SyntaxErrorKind::ExpectedOptionKind]);
        assert_eq!(file_errors("Option Strict Maybe\n"), [SyntaxErrorKind::ExpectedOnOrOff]);
        assert_eq!(file_errors("Option Compare On\n"), [SyntaxErrorKind::ExpectedBinaryOrText]);
    }

    #[test]
    fn imports_alias() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let file = parse_file(
            Scanner::new("Imports IO = System.IO, System.Text\n", &arena),
            &mut errors,
        );
        assert!(errors.is_empty(), "{errors}");
        let Declaration::Imports(imports) = file.declarations()[0] else {
            panic!("expected imports");
        };
        assert_eq!(imports.clauses.len(), 2);
        assert!(imports.clauses.items[0].alias.is_some());
        assert!(imports.clauses.items[1].alias.is_none());
    }

    #[test]
    fn inherits_and_implements_ordering() {
        assert!(file_errors("Class C\nInherits B\nImplements I, J\nEnd Class\n").is_empty());
        assert!(file_errors("Interface I\nInherits A, B\nEnd Interface\n").is_empty());
        assert_eq!(
            file_errors("Class C\nInherits A, B\nEnd Class\n"),
            [SyntaxErrorKind::NoMultipleInheritance]
        );
        assert_eq!(
            file_errors("Class C\nDim x As Integer\nInherits B\nEnd Class\n"),
            [SyntaxErrorKind::InheritsMustBeFirst]
        );
        assert_eq!(
            file_errors("Class C\nSub F()\nEnd Sub\nImplements I\nEnd Class\n"),
            [SyntaxErrorKind::ImplementsInWrongOrder]
        );
        assert_eq!(
            file_errors("Structure S\nInherits B\nEnd Structure\n"),
            [SyntaxErrorKind::InheritsNotValidHere]
        );
        assert_eq!(
            file_errors("Module M\nImplements I\nEnd Module\n"),
            [SyntaxErrorKind::ImplementsNotValidHere]
        );
    }

    #[test]
    fn placement_errors() {
        assert_eq!(
            file_errors("Namespace N\nSub F()\nEnd Sub\nEnd Namespace\n"),
            [SyntaxErrorKind::InvalidInsideNamespace]
        );
        assert_eq!(
            file_errors("Class C\nNamespace N\nEnd Namespace\nEnd Class\n"),
            [SyntaxErrorKind::InvalidInsideType]
        );
        assert_eq!(
            file_errors("Interface I\nSub New()\nEnd Interface\n"),
            [SyntaxErrorKind::InvalidInsideInterface]
        );
        assert_eq!(
            file_errors("Class C\nx = 1\nEnd Class\n"),
            [SyntaxErrorKind::ExpectedDeclaration]
        );
    }

    #[test]
    fn unterminated_and_stray_blocks() {
        assert_eq!(
            file_errors("Class C\nSub F()\nEnd Sub\n"),
            [SyntaxErrorKind::ExpectedEndClass]
        );
        assert_eq!(
            file_errors("Class C\nEnd Module\n"),
            [SyntaxErrorKind::EndModuleWithoutModule, SyntaxErrorKind::ExpectedEndClass]
        );
        assert_eq!(
            file_errors("Class C\nSub F()\nx = 1\nEnd Class\n"),
            [SyntaxErrorKind::ExpectedEndSub]
        );
    }

    #[test]
    fn interface_members_have_no_bodies() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let file = parse_file(
            Scanner::new(
                "Interface IShape\nFunction Area() As Double\nReadOnly Property Name() As String\nEvent Changed()\nEnd Interface\n",
                &arena,
            ),
            &mut errors,
        );
        assert!(errors.is_empty(), "{errors}");
        let Declaration::Type(shape) = file.declarations()[0] else {
            panic!("expected an interface");
        };
        let members = shape.members.declarations;
        assert_eq!(members.len(), 3);
        assert!(matches!(members[0], Declaration::Method(m) if m.body.is_none() && m.is_function()));
        assert!(matches!(members[1], Declaration::Property(p) if p.accessors.is_none()));
        assert!(matches!(members[2], Declaration::Event(_)));
    }

    #[test]
    fn properties_with_accessors() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let source = "Class C\n\
                      Public Property Value() As Integer\n\
                      Get\nReturn m\nEnd Get\n\
                      Private Set(ByVal v As Integer)\nm = v\nEnd Set\n\
                      End Property\n\
                      End Class\n";
        let file = parse_file(Scanner::new(source, &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        let Declaration::Type(class) = file.declarations()[0] else {
            panic!("expected a class");
        };
        let Declaration::Property(property) = class.members.declarations[0] else {
            panic!("expected a property");
        };
        let accessors = property.accessors.expect("accessors");
        assert_eq!(accessors.len(), 2);
        assert!(matches!(
            accessors.declarations[1],
            Declaration::Accessor(a) if a.block_kind() == BlockKind::Set && a.parameters.is_some()
        ));
        assert!(property.end.is_some());
    }

    #[test]
    fn accessor_closed_by_next_accessor() {
        assert_eq!(
            file_errors(
                "Class C\nProperty P As Integer\nGet\nReturn 1\nSet(v As Integer)\nEnd Set\nEnd Property\nEnd Class\n"
            ),
            [SyntaxErrorKind::ExpectedEndGet]
        );
        assert_eq!(
            file_errors("Class C\nProperty P As Integer\nx = 1\nEnd Property\nEnd Class\n"),
            [SyntaxErrorKind::ExpectedGetOrSet]
        );
    }

    #[test]
    fn custom_event() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let source = "Class C\n\
                      Public Custom Event Changed As EventHandler\n\
                      AddHandler(ByVal value As EventHandler)\nEnd AddHandler\n\
                      RemoveHandler(ByVal value As EventHandler)\nEnd RemoveHandler\n\
                      RaiseEvent(ByVal sender As Object, ByVal e As EventArgs)\nEnd RaiseEvent\n\
                      End Event\n\
                      End Class\n";
        let file = parse_file(Scanner::new(source, &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        let Declaration::Type(class) = file.declarations()[0] else {
            panic!("expected a class");
        };
        let Declaration::CustomEvent(event) = class.members.declarations[0] else {
            panic!("expected a custom event");
        };
        assert_eq!(event.accessors.len(), 3);
        assert!(event.end.is_some());

        assert_eq!(
            file_errors("Class C\nCustom Sub F()\nEnd Sub\nEnd Class\n"),
            [SyntaxErrorKind::InvalidUseOfCustomModifier]
        );
    }

    #[test]
    fn external_and_delegate_declarations() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let source = "Module M\n\
                      Declare Ansi Function GetTickCount Lib \"kernel32\" Alias \"GetTickCount\" () As Integer\n\
                      Delegate Function Compare(Of T)(a As T, b As T) As Integer\n\
                      End Module\n";
        let file = parse_file(Scanner::new(source, &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        let Declaration::Type(module) = file.declarations()[0] else {
            panic!("expected a module");
        };
        let Declaration::External(external) = module.members.declarations[0] else {
            panic!("expected a declare");
        };
        assert_eq!(external.charset, Some(Charset::Ansi));
        assert_eq!(external.lib, Some("kernel32"));
        assert_eq!(external.alias, Some("GetTickCount"));
        assert!(external.return_type.is_some());
        let Declaration::Delegate(delegate) = module.members.declarations[1] else {
            panic!("expected a delegate");
        };
        assert_eq!(delegate.tree_type, TreeType::DelegateFunctionDeclaration);
        assert!(delegate.type_parameters.is_some());

        assert_eq!(
            file_errors("Module M\nDeclare Sub Beep \"kernel32\" ()\nEnd Module\n"),
            [SyntaxErrorKind::ExpectedLib]
        );
        assert_eq!(
            file_errors("Module M\nDelegate Property P\nEnd Module\n"),
            [SyntaxErrorKind::ExpectedSubOrFunction]
        );
    }

    #[test]
    fn operators() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let source = "Class C\n\
                      Public Shared Operator +(a As C, b As C) As C\nReturn a\nEnd Operator\n\
                      Public Shared Widening Operator CType(x As C) As Integer\nReturn 0\nEnd Operator\n\
                      End Class\n";
        let file = parse_file(Scanner::new(source, &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        let Declaration::Type(class) = file.declarations()[0] else {
            panic!("expected a class");
        };
        assert!(matches!(
            class.members.declarations[1],
            Declaration::Operator(o) if o.operator == Some(OverloadableOperator::Conversion)
        ));

        assert_eq!(
            file_errors("Class C\nShared Operator AndAlso(a As C, b As C) As C\nEnd Operator\nEnd Class\n"),
            [SyntaxErrorKind::ExpectedOverloadableOperator]
        );
    }

    #[test]
    fn parameter_errors() {
        assert_eq!(
            file_errors("Module M\nSub F(ByVal ByRef x)\nEnd Sub\nEnd Module\n"),
            [SyntaxErrorKind::ConflictingParameterSpecifiers]
        );
        assert_eq!(
            file_errors("Module M\nSub F(ByVal ByVal x)\nEnd Sub\nEnd Module\n"),
            [SyntaxErrorKind::DuplicateParameterSpecifier]
        );
        assert_eq!(
            file_errors("Module M\nSub F(Optional x As Integer)\nEnd Sub\nEnd Module\n"),
            [SyntaxErrorKind::ExpectedOptionalDefault]
        );
        assert_eq!(
            file_errors("Module M\nSub F(ParamArray a() As Integer, b As Integer)\nEnd Sub\nEnd Module\n"),
            [SyntaxErrorKind::ParamArrayMustBeLast]
        );
        assert!(file_errors("Module M\nSub F(Optional ByVal x As Integer = 1, ParamArray rest() As Object)\nEnd Sub\nEnd Module\n").is_empty());
    }

    #[test]
    fn handles_clause() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let source = "Class Form1\nSub OnLoad(sender As Object, e As EventArgs) Handles MyBase.Load, button.Click\nEnd Sub\nEnd Class\n";
        let file = parse_file(Scanner::new(source, &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        let Declaration::Type(class) = file.declarations()[0] else {
            panic!("expected a class");
        };
        let Declaration::Method(method) = class.members.declarations[0] else {
            panic!("expected a method");
        };
        let handles = method.handles.expect("handles clause");
        assert_eq!(handles.events.len(), 2);
        assert!(matches!(
            handles.events.items[0].source,
            Name::Special(SpecialName { kind: SpecialNameKind::MyBase, .. })
        ));
        assert!(handles.events.items[1].event.matches("Click"));
    }

    #[test]
    fn enums() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let file = parse_file(
            Scanner::new("Enum Color As Byte\nRed\nGreen = 2\n<Obsolete> Blue\nEnd Enum\n", &arena),
            &mut errors,
        );
        assert!(errors.is_empty(), "{errors}");
        let Declaration::Enum(color) = file.declarations()[0] else {
            panic!("expected an enum");
        };
        assert!(color.underlying.is_some());
        assert_eq!(color.members.len(), 3);
        assert!(matches!(color.members.declarations[1], Declaration::EnumValue(v) if v.value.is_some()));

        assert_eq!(
            file_errors("Enum E\nA\nDim x\nEnd Enum\n"),
            [SyntaxErrorKind::InvalidInsideEnum]
        );
        assert_eq!(
            file_errors("Enum E\nA\nSub F()\nEnd Sub\n"),
            [SyntaxErrorKind::ExpectedEndEnum, SyntaxErrorKind::InvalidInsideNamespace]
        );
    }

    #[test]
    fn attributes_on_members() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let file = parse_file(
            Scanner::new("<Serializable(), ComVisible(True)> Public Class C\n<NonSerialized> Private x As Integer\nEnd Class\n", &arena),
            &mut errors,
        );
        assert!(errors.is_empty(), "{errors}");
        let Declaration::Type(class) = file.declarations()[0] else {
            panic!("expected a class");
        };
        assert_eq!(class.attributes.len(), 1);
        assert_eq!(class.attributes[0].attributes.len(), 2);
        assert!(matches!(class.members.declarations[0], Declaration::Variables(v) if v.attributes.len() == 1));
    }

    #[test]
    fn fields_and_generics() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let file = parse_file(
            Scanner::new(
                "Class Box(Of T As New)\nPrivate items(10) As T, count As Integer = 0\nPublic Shared ReadOnly Instance As New Box(Of T)()\nEnd Class\n",
                &arena,
            ),
            &mut errors,
        );
        assert!(errors.is_empty(), "{errors}");
        let Declaration::Type(class) = file.declarations()[0] else {
            panic!("expected a class");
        };
        assert!(class.type_parameters.is_some());
        let Declaration::Variables(fields) = class.members.declarations[0] else {
            panic!("expected fields");
        };
        assert_eq!(fields.declarators.len(), 2);
        assert!(fields.declarators.items[1].initializer.is_some());
        let Declaration::Variables(instance) = class.members.declarations[1] else {
            panic!("expected a field");
        };
        assert!(instance.declarators.items[0].as_clause.is_some_and(|c| c.is_new()));
    }

    #[test]
    fn script_properties() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let source = "Class Person\n\
                      Private m_name\n\
                      Public Property Get Name\nName = m_name\nEnd Property\n\
                      Public Property Let Name(v)\nm_name = v\nEnd Property\n\
                      End Class\n";
        let script = parse_script_file(Scanner::new(source, &arena), &mut errors);
        assert!(errors.is_empty(), "{errors}");
        let Statement::Declaration(Declaration::Type(class)) = script.statements()[0] else {
            panic!("expected a class");
        };
        assert_eq!(class.members.len(), 3);
        let Declaration::Property(getter) = class.members.declarations[1] else {
            panic!("expected a property");
        };
        assert!(getter.end.is_some());
        assert!(matches!(
            getter.accessors.map(|a| a.declarations[0]),
            Some(Declaration::Accessor(a)) if a.block_kind() == BlockKind::Get && a.body.len() == 1
        ));
    }

    #[test]
    fn single_declaration_entry_point() {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let declaration = parse_declaration(
            Scanner::new("Public Function Twice(x As Integer) As Integer\nReturn x * 2\nEnd Function", &arena),
            &mut errors,
        );
        assert!(errors.is_empty(), "{errors}");
        assert_eq!(declaration.tree_type(), TreeType::FunctionDeclaration);
    }
}
