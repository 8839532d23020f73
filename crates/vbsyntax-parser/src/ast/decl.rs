//! Declaration AST nodes.
//!
//! Declarations form the top level of a file and the bodies of namespaces,
//! types, properties and custom events:
//! - `Option`, `Imports` and assembly/module attribute statements
//! - `Namespace`, `Class`, `Structure`, `Module`, `Interface` and `Enum`
//! - Fields, methods, constructors, operators, properties, events,
//!   delegates and `Declare` statements
//! - Accessors (`Get`, `Set`, `AddHandler`, `RemoveHandler`, `RaiseEvent`)

use bitflags::bitflags;
use vbsyntax_core::{Location, Span};

use crate::ast::expr::{Expression, Initializer};
use crate::ast::list::{ArgumentList, CommaList, DeclarationList, StatementList};
use crate::ast::names::{Name, SimpleName, VariableName};
use crate::ast::ops::OverloadableOperator;
use crate::ast::stmt::{BlockKind, EndBlock};
use crate::ast::tree::TreeType;
use crate::ast::types::{TypeName, TypeParameterList};
use crate::lexer::TokenKind;

bitflags! {
    /// Declaration modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const FRIEND = 1 << 3;
        const STATIC = 1 << 4;
        const SHARED = 1 << 5;
        const SHADOWS = 1 << 6;
        const OVERLOADS = 1 << 7;
        const MUST_INHERIT = 1 << 8;
        const NOT_INHERITABLE = 1 << 9;
        const OVERRIDES = 1 << 10;
        const NOT_OVERRIDABLE = 1 << 11;
        const OVERRIDABLE = 1 << 12;
        const MUST_OVERRIDE = 1 << 13;
        const READ_ONLY = 1 << 14;
        const WRITE_ONLY = 1 << 15;
        const DIM = 1 << 16;
        const CONST = 1 << 17;
        const DEFAULT = 1 << 18;
        const WITH_EVENTS = 1 << 19;
        const WIDENING = 1 << 20;
        const NARROWING = 1 << 21;
        const PARTIAL = 1 << 22;

        const ACCESS = Self::PUBLIC.bits()
            | Self::PRIVATE.bits()
            | Self::PROTECTED.bits()
            | Self::FRIEND.bits();
    }
}

impl Modifiers {
    /// The modifier a keyword token spells.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Public => Self::PUBLIC,
            TokenKind::Private => Self::PRIVATE,
            TokenKind::Protected => Self::PROTECTED,
            TokenKind::Friend => Self::FRIEND,
            TokenKind::Static => Self::STATIC,
            TokenKind::Shared => Self::SHARED,
            TokenKind::Shadows => Self::SHADOWS,
            TokenKind::Overloads => Self::OVERLOADS,
            TokenKind::MustInherit => Self::MUST_INHERIT,
            TokenKind::NotInheritable => Self::NOT_INHERITABLE,
            TokenKind::Overrides => Self::OVERRIDES,
            TokenKind::NotOverridable => Self::NOT_OVERRIDABLE,
            TokenKind::Overridable => Self::OVERRIDABLE,
            TokenKind::MustOverride => Self::MUST_OVERRIDE,
            TokenKind::ReadOnly => Self::READ_ONLY,
            TokenKind::WriteOnly => Self::WRITE_ONLY,
            TokenKind::Dim => Self::DIM,
            TokenKind::Const => Self::CONST,
            TokenKind::Default => Self::DEFAULT,
            TokenKind::WithEvents => Self::WITH_EVENTS,
            TokenKind::Widening => Self::WIDENING,
            TokenKind::Narrowing => Self::NARROWING,
            TokenKind::Partial => Self::PARTIAL,
            _ => return None,
        })
    }
}

/// One modifier keyword as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifier {
    /// A single flag.
    pub kind: Modifiers,
    pub span: Span,
}

/// The modifiers in front of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierList<'ast> {
    pub modifiers: &'ast [Modifier],
    /// Union of all modifiers.
    pub flags: Modifiers,
    pub span: Span,
}

impl<'ast> ModifierList<'ast> {
    pub fn empty(at: Location) -> Self {
        Self {
            modifiers: &[],
            flags: Modifiers::empty(),
            span: Span::point(at),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    #[inline]
    pub fn contains(&self, flag: Modifiers) -> bool {
        self.flags.contains(flag)
    }
}

bitflags! {
    /// Parameter specifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParameterModifiers: u8 {
        const BY_VAL = 1 << 0;
        const BY_REF = 1 << 1;
        const OPTIONAL = 1 << 2;
        const PARAM_ARRAY = 1 << 3;
    }
}

impl ParameterModifiers {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::ByVal => Self::BY_VAL,
            TokenKind::ByRef => Self::BY_REF,
            TokenKind::Optional => Self::OPTIONAL,
            TokenKind::ParamArray => Self::PARAM_ARRAY,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterModifier {
    pub kind: ParameterModifiers,
    pub span: Span,
}

/// A top-level or member declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Declaration<'ast> {
    Option(OptionDeclaration),
    Imports(&'ast ImportsDeclaration<'ast>),
    /// `<Assembly: ...>` on its own line.
    Attribute(&'ast AttributeDeclaration<'ast>),
    Namespace(&'ast NamespaceDeclaration<'ast>),
    /// `Class`, `Structure`, `Module` or `Interface`.
    Type(&'ast TypeDeclaration<'ast>),
    Enum(&'ast EnumDeclaration<'ast>),
    EnumValue(&'ast EnumValueDeclaration<'ast>),
    /// `Inherits` or `Implements` at the top of a type.
    TypeList(&'ast TypeListDeclaration<'ast>),
    /// Fields and constants.
    Variables(&'ast VariableListDeclaration<'ast>),
    /// `Sub`, `Function` or `Sub New`.
    Method(&'ast MethodDeclaration<'ast>),
    Operator(&'ast OperatorDeclaration<'ast>),
    /// `Declare Sub` or `Declare Function`.
    External(&'ast ExternalDeclaration<'ast>),
    Delegate(&'ast DelegateDeclaration<'ast>),
    Event(&'ast EventDeclaration<'ast>),
    CustomEvent(&'ast CustomEventDeclaration<'ast>),
    Property(&'ast PropertyDeclaration<'ast>),
    Accessor(&'ast AccessorDeclaration<'ast>),
    /// An `End X` found where no block expects it.
    EndBlock(EndBlock),
    /// A declaration that could not be parsed.
    Bad(Span),
}

impl<'ast> Declaration<'ast> {
    /// Get the span of this declaration.
    pub fn span(&self) -> Span {
        match self {
            Self::Option(d) => d.span,
            Self::Imports(d) => d.span,
            Self::Attribute(d) => d.span,
            Self::Namespace(d) => d.span,
            Self::Type(d) => d.span,
            Self::Enum(d) => d.span,
            Self::EnumValue(d) => d.span,
            Self::TypeList(d) => d.span,
            Self::Variables(d) => d.span,
            Self::Method(d) => d.span,
            Self::Operator(d) => d.span,
            Self::External(d) => d.span,
            Self::Delegate(d) => d.span,
            Self::Event(d) => d.span,
            Self::CustomEvent(d) => d.span,
            Self::Property(d) => d.span,
            Self::Accessor(d) => d.span,
            Self::EndBlock(d) => d.span,
            Self::Bad(span) => *span,
        }
    }

    /// The node type tag.
    pub fn tree_type(&self) -> TreeType {
        match self {
            Self::Option(_) => TreeType::OptionDeclaration,
            Self::Imports(_) => TreeType::ImportsDeclaration,
            Self::Attribute(_) => TreeType::AttributeDeclaration,
            Self::Namespace(_) => TreeType::NamespaceDeclaration,
            Self::Type(d) => d.tree_type,
            Self::Enum(_) => TreeType::EnumDeclaration,
            Self::EnumValue(_) => TreeType::EnumValueDeclaration,
            Self::TypeList(d) => d.tree_type,
            Self::Variables(_) => TreeType::VariableListDeclaration,
            Self::Method(d) => d.tree_type,
            Self::Operator(_) => TreeType::OperatorDeclaration,
            Self::External(d) => d.tree_type,
            Self::Delegate(d) => d.tree_type,
            Self::Event(_) => TreeType::EventDeclaration,
            Self::CustomEvent(_) => TreeType::CustomEventDeclaration,
            Self::Property(_) => TreeType::PropertyDeclaration,
            Self::Accessor(d) => d.tree_type,
            Self::EndBlock(_) => TreeType::EndBlockDeclaration,
            Self::Bad(_) => TreeType::BadDeclaration,
        }
    }

    #[inline]
    pub fn is_bad(&self) -> bool {
        matches!(self, Self::Bad(_))
    }

    /// The modifiers written on this declaration, if it takes any.
    pub fn modifiers(&self) -> Option<&ModifierList<'ast>> {
        match self {
            Self::Type(d) => Some(&d.modifiers),
            Self::Enum(d) => Some(&d.modifiers),
            Self::Variables(d) => Some(&d.modifiers),
            Self::Method(d) => Some(&d.modifiers),
            Self::Operator(d) => Some(&d.modifiers),
            Self::External(d) => Some(&d.modifiers),
            Self::Delegate(d) => Some(&d.modifiers),
            Self::Event(d) => Some(&d.modifiers),
            Self::CustomEvent(d) => Some(&d.modifiers),
            Self::Property(d) => Some(&d.modifiers),
            Self::Accessor(d) => Some(&d.modifiers),
            _ => None,
        }
    }
}

// ============================================================================
// File-level statements
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Explicit,
    Strict,
    Compare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionSetting {
    On,
    Off,
    Binary,
    Text,
}

/// `Option Explicit [On|Off]`, `Option Strict [On|Off]`,
/// `Option Compare Binary|Text`. `kind` is `None` when malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDeclaration {
    pub kind: Option<OptionKind>,
    pub setting: Option<OptionSetting>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportsDeclaration<'ast> {
    pub clauses: CommaList<'ast, ImportsClause<'ast>>,
    pub span: Span,
}

/// `[alias =] Namespace.Or.Type`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportsClause<'ast> {
    pub alias: Option<SimpleName<'ast>>,
    pub equals: Option<Location>,
    pub target: TypeName<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeDeclaration<'ast> {
    pub blocks: &'ast [AttributeBlock<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeTarget {
    Assembly,
    Module,
}

/// `<Attr1, Attr2(args)>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeBlock<'ast> {
    pub open: Location,
    pub attributes: CommaList<'ast, Attribute<'ast>>,
    pub close: Option<Location>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attribute<'ast> {
    pub target: Option<AttributeTarget>,
    pub name: Name<'ast>,
    pub arguments: Option<ArgumentList<'ast>>,
    pub span: Span,
}

// ============================================================================
// Containers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamespaceDeclaration<'ast> {
    pub name: Name<'ast>,
    pub members: DeclarationList<'ast>,
    pub end: Option<EndBlock>,
    pub span: Span,
}

/// `Class`, `Structure`, `Module` and `Interface` blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeDeclaration<'ast> {
    pub tree_type: TreeType,
    pub attributes: &'ast [AttributeBlock<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub name: SimpleName<'ast>,
    pub type_parameters: Option<TypeParameterList<'ast>>,
    pub members: DeclarationList<'ast>,
    pub end: Option<EndBlock>,
    pub span: Span,
}

impl<'ast> TypeDeclaration<'ast> {
    /// The block kind that closes this declaration.
    pub fn block_kind(&self) -> BlockKind {
        match self.tree_type {
            TreeType::StructureDeclaration => BlockKind::Structure,
            TreeType::ModuleDeclaration => BlockKind::Module,
            TreeType::InterfaceDeclaration => BlockKind::Interface,
            _ => BlockKind::Class,
        }
    }

    /// The `Inherits` types, in order.
    pub fn inherits(&self) -> impl Iterator<Item = &'ast TypeName<'ast>> + use<'ast> {
        type_lists(self.members, TreeType::InheritsDeclaration)
    }

    /// The `Implements` types, in order.
    pub fn implements(&self) -> impl Iterator<Item = &'ast TypeName<'ast>> + use<'ast> {
        type_lists(self.members, TreeType::ImplementsDeclaration)
    }
}

fn type_lists<'ast>(
    members: DeclarationList<'ast>,
    tree_type: TreeType,
) -> impl Iterator<Item = &'ast TypeName<'ast>> {
    members
        .declarations
        .iter()
        .filter_map(move |member| match member {
            Declaration::TypeList(list) if list.tree_type == tree_type => Some(list.types.items),
            _ => None,
        })
        .flatten()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnumDeclaration<'ast> {
    pub attributes: &'ast [AttributeBlock<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub name: SimpleName<'ast>,
    pub underlying: Option<TypeName<'ast>>,
    pub members: DeclarationList<'ast>,
    pub end: Option<EndBlock>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnumValueDeclaration<'ast> {
    pub attributes: &'ast [AttributeBlock<'ast>],
    pub name: SimpleName<'ast>,
    pub value: Option<Expression<'ast>>,
    pub span: Span,
}

/// `Inherits A, B` or `Implements I1, I2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeListDeclaration<'ast> {
    pub tree_type: TreeType,
    pub types: CommaList<'ast, TypeName<'ast>>,
    pub span: Span,
}

// ============================================================================
// Members
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableListDeclaration<'ast> {
    pub attributes: &'ast [AttributeBlock<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub declarators: CommaList<'ast, VariableDeclarator<'ast>>,
    pub span: Span,
}

/// `a, b(10) As Integer = 1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableDeclarator<'ast> {
    pub names: CommaList<'ast, VariableName<'ast>>,
    pub as_clause: Option<AsClause<'ast>>,
    pub equals: Option<Location>,
    pub initializer: Option<Initializer<'ast>>,
    pub span: Span,
}

/// `As [New] Type[(arguments)]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsClause<'ast> {
    pub as_location: Location,
    pub new: Option<Location>,
    pub type_name: TypeName<'ast>,
    pub arguments: Option<ArgumentList<'ast>>,
    pub span: Span,
}

impl AsClause<'_> {
    #[inline]
    pub fn is_new(&self) -> bool {
        self.new.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterList<'ast> {
    pub open: Location,
    pub parameters: CommaList<'ast, Parameter<'ast>>,
    pub close: Option<Location>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameter<'ast> {
    pub attributes: &'ast [AttributeBlock<'ast>],
    pub modifiers: &'ast [ParameterModifier],
    /// Union of `modifiers`.
    pub flags: ParameterModifiers,
    pub name: VariableName<'ast>,
    pub as_type: Option<TypeName<'ast>>,
    pub default: Option<Expression<'ast>>,
    pub span: Span,
}

/// `As [<attributes>] Type` after a function signature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnType<'ast> {
    pub as_location: Location,
    pub attributes: &'ast [AttributeBlock<'ast>],
    pub type_name: TypeName<'ast>,
    pub span: Span,
}

/// `Handles a.Click, MyBase.Load`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandlesClause<'ast> {
    pub handles: Location,
    pub events: CommaList<'ast, HandlesItem<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandlesItem<'ast> {
    /// A `WithEvents` variable, or `Me`, `MyBase` or `MyClass`.
    pub source: Name<'ast>,
    pub dot: Option<Location>,
    pub event: SimpleName<'ast>,
    pub span: Span,
}

/// `Implements I.M, J.N`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImplementsClause<'ast> {
    pub implements: Location,
    pub members: CommaList<'ast, Name<'ast>>,
    pub span: Span,
}

/// `Sub`, `Function` and `Sub New` declarations.
///
/// `body` and `end` are absent for interface members and `MustOverride`
/// methods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodDeclaration<'ast> {
    pub tree_type: TreeType,
    pub attributes: &'ast [AttributeBlock<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub name: SimpleName<'ast>,
    pub type_parameters: Option<TypeParameterList<'ast>>,
    pub parameters: Option<ParameterList<'ast>>,
    pub return_type: Option<ReturnType<'ast>>,
    pub handles: Option<HandlesClause<'ast>>,
    pub implements: Option<ImplementsClause<'ast>>,
    pub body: Option<StatementList<'ast>>,
    pub end: Option<EndBlock>,
    pub span: Span,
}

impl MethodDeclaration<'_> {
    #[inline]
    pub fn is_function(&self) -> bool {
        self.tree_type == TreeType::FunctionDeclaration
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatorDeclaration<'ast> {
    pub attributes: &'ast [AttributeBlock<'ast>],
    pub modifiers: ModifierList<'ast>,
    /// `None` when the token after `Operator` is not overloadable.
    pub operator: Option<OverloadableOperator>,
    pub operator_span: Span,
    pub parameters: Option<ParameterList<'ast>>,
    pub return_type: Option<ReturnType<'ast>>,
    pub body: StatementList<'ast>,
    pub end: Option<EndBlock>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    Ansi,
    Unicode,
    Auto,
}

/// `Declare [Ansi|Unicode|Auto] Sub|Function name Lib "lib" [Alias "alias"]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalDeclaration<'ast> {
    pub tree_type: TreeType,
    pub attributes: &'ast [AttributeBlock<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub charset: Option<Charset>,
    pub name: SimpleName<'ast>,
    pub lib: Option<&'ast str>,
    pub alias: Option<&'ast str>,
    pub parameters: Option<ParameterList<'ast>>,
    pub return_type: Option<ReturnType<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelegateDeclaration<'ast> {
    pub tree_type: TreeType,
    pub attributes: &'ast [AttributeBlock<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub name: SimpleName<'ast>,
    pub type_parameters: Option<TypeParameterList<'ast>>,
    pub parameters: Option<ParameterList<'ast>>,
    pub return_type: Option<ReturnType<'ast>>,
    pub span: Span,
}

/// `Event name(params)` or `Event name As DelegateType`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventDeclaration<'ast> {
    pub attributes: &'ast [AttributeBlock<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub name: SimpleName<'ast>,
    pub parameters: Option<ParameterList<'ast>>,
    pub as_type: Option<TypeName<'ast>>,
    pub implements: Option<ImplementsClause<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomEventDeclaration<'ast> {
    pub attributes: &'ast [AttributeBlock<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub custom: Span,
    pub name: SimpleName<'ast>,
    pub as_type: Option<TypeName<'ast>>,
    pub implements: Option<ImplementsClause<'ast>>,
    pub accessors: DeclarationList<'ast>,
    pub end: Option<EndBlock>,
    pub span: Span,
}

/// `accessors` is absent for auto-declared interface or `MustOverride`
/// properties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyDeclaration<'ast> {
    pub attributes: &'ast [AttributeBlock<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub name: SimpleName<'ast>,
    pub parameters: Option<ParameterList<'ast>>,
    pub return_type: Option<ReturnType<'ast>>,
    pub implements: Option<ImplementsClause<'ast>>,
    pub accessors: Option<DeclarationList<'ast>>,
    pub end: Option<EndBlock>,
    pub span: Span,
}

/// `Get`, `Set`, `AddHandler`, `RemoveHandler` and `RaiseEvent` accessors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccessorDeclaration<'ast> {
    pub tree_type: TreeType,
    pub attributes: &'ast [AttributeBlock<'ast>],
    pub modifiers: ModifierList<'ast>,
    pub parameters: Option<ParameterList<'ast>>,
    pub body: StatementList<'ast>,
    pub end: Option<EndBlock>,
    pub span: Span,
}

impl AccessorDeclaration<'_> {
    pub fn block_kind(&self) -> BlockKind {
        match self.tree_type {
            TreeType::SetAccessorDeclaration => BlockKind::Set,
            TreeType::AddHandlerAccessorDeclaration => BlockKind::AddHandler,
            TreeType::RemoveHandlerAccessorDeclaration => BlockKind::RemoveHandler,
            TreeType::RaiseEventAccessorDeclaration => BlockKind::RaiseEvent,
            _ => BlockKind::Get,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_tokens() {
        assert_eq!(Modifiers::from_token(TokenKind::Public), Some(Modifiers::PUBLIC));
        assert_eq!(Modifiers::from_token(TokenKind::Sub), None);
        assert!(Modifiers::ACCESS.contains(Modifiers::FRIEND));
        assert!(!Modifiers::ACCESS.contains(Modifiers::SHARED));
        assert_eq!(
            ParameterModifiers::from_token(TokenKind::ParamArray),
            Some(ParameterModifiers::PARAM_ARRAY)
        );
    }

    #[test]
    fn empty_modifier_list() {
        let list = ModifierList::empty(Location::START);
        assert!(list.is_empty());
        assert!(!list.contains(Modifiers::PUBLIC));
    }

    #[test]
    fn declaration_tree_type() {
        let span = Span::point(Location::START);
        assert_eq!(Declaration::Bad(span).tree_type(), TreeType::BadDeclaration);
        assert!(Declaration::Bad(span).is_bad());
        let option = Declaration::Option(OptionDeclaration {
            kind: Some(OptionKind::Strict),
            setting: Some(OptionSetting::On),
            span,
        });
        assert_eq!(option.tree_type(), TreeType::OptionDeclaration);
        assert!(option.modifiers().is_none());
    }
}
