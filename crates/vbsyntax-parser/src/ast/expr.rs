//! Expression AST nodes.
//!
//! Provides nodes for all expression forms including:
//! - Literals (boolean, integer, floating point, decimal, char, string, date)
//! - Operators (unary, binary)
//! - Conversions (`CInt`, `CType`, `DirectCast`, `TryCast`)
//! - Member access, dictionary lookup (`x!y`), calls and indexing
//! - Object and array creation
//!
//! # Expression Precedence
//!
//! From loosest to tightest binding:
//! 1. `Xor`
//! 2. `Or`, `OrElse`
//! 3. `And`, `AndAlso`
//! 4. `Not` (prefix)
//! 5. Relational (`= <> < <= > >= Is IsNot Like`)
//! 6. Shift (`<< >>`)
//! 7. Concatenation (`&`)
//! 8. Additive (`+ -`)
//! 9. Modulus (`Mod`)
//! 10. Integer division (`\`)
//! 11. Multiplicative (`* /`)
//! 12. Negation (prefix `- +`)
//! 13. Exponentiation (`^`)

use vbsyntax_core::{Location, Span};

use crate::ast::list::{ArgumentList, CommaList};
use crate::ast::names::SimpleName;
use crate::ast::ops::{BinaryOperator, UnaryOperator};
use crate::ast::tree::TreeType;
use crate::ast::types::{IntrinsicType, TypeArgumentList, TypeName};
use crate::lexer::{DateValue, DecimalValue, IntegerBase, TypeCharacter};

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expression<'ast> {
    Literal(LiteralExpression<'ast>),
    /// A bare name, optionally with type arguments (`Foo(Of T)`)
    SimpleName(&'ast SimpleNameExpression<'ast>),
    /// `a.b`, or `.b` inside a `With` block
    Qualified(&'ast QualifiedExpression<'ast>),
    /// `a!b`, or `!b` inside a `With` block
    DictionaryLookup(&'ast DictionaryLookupExpression<'ast>),
    /// `target(arguments)`
    CallOrIndex(&'ast CallOrIndexExpression<'ast>),
    /// `Me`, `MyClass` or `MyBase`
    Instance(InstanceExpression),
    /// The `Global` namespace qualifier
    Global(Span),
    /// `Nothing`
    Nothing(Span),
    Parenthesized(&'ast ParenthesizedExpression<'ast>),
    Unary(&'ast UnaryExpression<'ast>),
    Binary(&'ast BinaryExpression<'ast>),
    /// `TypeOf x Is T`
    TypeOf(&'ast TypeOfExpression<'ast>),
    /// `GetType(T)`
    GetType(&'ast GetTypeExpression<'ast>),
    /// `CType`, `DirectCast` or `TryCast`
    Cast(&'ast CastExpression<'ast>),
    /// `CInt(x)`, `CStr(x)`, ...
    IntrinsicCast(&'ast IntrinsicCastExpression<'ast>),
    /// `New T(arguments)`
    New(&'ast NewExpression<'ast>),
    /// `New T(bounds) {initializers}`
    NewAggregate(&'ast NewAggregateExpression<'ast>),
    AddressOf(&'ast AddressOfExpression<'ast>),
    /// Placeholder where an expression could not be parsed
    Bad(Span),
}

impl<'ast> Expression<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::SimpleName(e) => e.span,
            Self::Qualified(e) => e.span,
            Self::DictionaryLookup(e) => e.span,
            Self::CallOrIndex(e) => e.span,
            Self::Instance(e) => e.span,
            Self::Global(span) | Self::Nothing(span) | Self::Bad(span) => *span,
            Self::Parenthesized(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Binary(e) => e.span,
            Self::TypeOf(e) => e.span,
            Self::GetType(e) => e.span,
            Self::Cast(e) => e.span,
            Self::IntrinsicCast(e) => e.span,
            Self::New(e) => e.span,
            Self::NewAggregate(e) => e.span,
            Self::AddressOf(e) => e.span,
        }
    }

    #[inline]
    pub fn is_bad(&self) -> bool {
        matches!(self, Self::Bad(_))
    }
}

/// A literal value with its source range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpression<'ast> {
    pub value: LiteralValue<'ast>,
    pub span: Span,
}

/// The value of a literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue<'ast> {
    Boolean(bool),
    Integer {
        value: i64,
        base: IntegerBase,
        type_char: TypeCharacter,
    },
    UnsignedInteger {
        value: u64,
        base: IntegerBase,
        type_char: TypeCharacter,
    },
    FloatingPoint {
        value: f64,
        type_char: TypeCharacter,
    },
    Decimal {
        value: DecimalValue,
        type_char: TypeCharacter,
    },
    Character(char),
    String(&'ast str),
    Date(DateValue),
}

impl LiteralValue<'_> {
    pub fn tree_type(&self) -> TreeType {
        match self {
            Self::Boolean(_) => TreeType::BooleanLiteralExpression,
            Self::Integer { .. } | Self::UnsignedInteger { .. } => {
                TreeType::IntegerLiteralExpression
            }
            Self::FloatingPoint { .. } => TreeType::FloatingPointLiteralExpression,
            Self::Decimal { .. } => TreeType::DecimalLiteralExpression,
            Self::Character(_) => TreeType::CharacterLiteralExpression,
            Self::String(_) => TreeType::StringLiteralExpression,
            Self::Date(_) => TreeType::DateLiteralExpression,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleNameExpression<'ast> {
    pub name: SimpleName<'ast>,
    pub type_arguments: Option<TypeArgumentList<'ast>>,
    pub span: Span,
}

/// Member access. `qualifier` is `None` for `.name` inside `With`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualifiedExpression<'ast> {
    pub qualifier: Option<Expression<'ast>>,
    pub dot: Location,
    pub name: SimpleName<'ast>,
    pub type_arguments: Option<TypeArgumentList<'ast>>,
    pub span: Span,
}

/// `qualifier!name`. `qualifier` is `None` inside `With`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DictionaryLookupExpression<'ast> {
    pub qualifier: Option<Expression<'ast>>,
    pub bang: Location,
    pub name: SimpleName<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallOrIndexExpression<'ast> {
    pub target: Expression<'ast>,
    pub arguments: ArgumentList<'ast>,
    pub span: Span,
}

/// `Me`, `MyClass` or `MyBase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceExpression {
    pub tree_type: TreeType,
    pub span: Span,
}

impl InstanceExpression {
    pub fn new(tree_type: TreeType, span: Span) -> Self {
        debug_assert!(
            matches!(
                tree_type,
                TreeType::MeExpression | TreeType::MyClassExpression | TreeType::MyBaseExpression
            ),
            "{tree_type:?} is not an instance expression"
        );
        Self { tree_type, span }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParenthesizedExpression<'ast> {
    pub operand: Expression<'ast>,
    pub close: Option<Location>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpression<'ast> {
    pub op: UnaryOperator,
    pub operand: Expression<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpression<'ast> {
    pub left: Expression<'ast>,
    pub op: BinaryOperator,
    pub op_span: Span,
    pub right: Expression<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeOfExpression<'ast> {
    pub operand: Expression<'ast>,
    pub is_location: Option<Location>,
    pub type_name: TypeName<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GetTypeExpression<'ast> {
    pub type_name: TypeName<'ast>,
    pub close: Option<Location>,
    pub span: Span,
}

/// `CType(x, T)`, `DirectCast(x, T)`, `TryCast(x, T)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastExpression<'ast> {
    pub tree_type: TreeType,
    pub operand: Expression<'ast>,
    pub comma: Option<Location>,
    pub type_name: TypeName<'ast>,
    pub close: Option<Location>,
    pub span: Span,
}

impl<'ast> CastExpression<'ast> {
    pub fn new(
        tree_type: TreeType,
        operand: Expression<'ast>,
        comma: Option<Location>,
        type_name: TypeName<'ast>,
        close: Option<Location>,
        span: Span,
    ) -> Self {
        debug_assert!(
            matches!(
                tree_type,
                TreeType::CTypeExpression
                    | TreeType::DirectCastExpression
                    | TreeType::TryCastExpression
            ),
            "{tree_type:?} is not a cast expression"
        );
        Self {
            tree_type,
            operand,
            comma,
            type_name,
            close,
            span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntrinsicCastExpression<'ast> {
    pub intrinsic: IntrinsicType,
    pub operand: Expression<'ast>,
    pub close: Option<Location>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewExpression<'ast> {
    pub type_name: TypeName<'ast>,
    pub arguments: Option<ArgumentList<'ast>>,
    pub span: Span,
}

/// Array creation with an initializer. `array_type` is always an
/// [`TypeName::Array`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewAggregateExpression<'ast> {
    pub array_type: TypeName<'ast>,
    pub initializer: &'ast AggregateInitializer<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddressOfExpression<'ast> {
    pub operand: Expression<'ast>,
    pub span: Span,
}

/// `{a, b, {c, d}}`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateInitializer<'ast> {
    pub open: Location,
    pub elements: CommaList<'ast, Initializer<'ast>>,
    pub close: Option<Location>,
    pub span: Span,
}

/// A variable or array element initializer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Initializer<'ast> {
    Expression(Expression<'ast>),
    Aggregate(&'ast AggregateInitializer<'ast>),
}

impl Initializer<'_> {
    pub fn span(&self) -> Span {
        match self {
            Self::Expression(e) => e.span(),
            Self::Aggregate(a) => a.span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_tree_types() {
        assert_eq!(
            LiteralValue::Boolean(true).tree_type(),
            TreeType::BooleanLiteralExpression
        );
        assert_eq!(
            LiteralValue::UnsignedInteger {
                value: 1,
                base: IntegerBase::Decimal,
                type_char: TypeCharacter::UnsignedIntegerChar
            }
            .tree_type(),
            TreeType::IntegerLiteralExpression
        );
        assert_eq!(
            LiteralValue::String("x").tree_type(),
            TreeType::StringLiteralExpression
        );
    }

    #[test]
    fn bad_expression_span() {
        let span = Span::point(Location::new(3, 1, 4));
        let expr = Expression::Bad(span);
        assert!(expr.is_bad());
        assert_eq!(expr.span(), span);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn instance_expression_rejects_other_types() {
        let _ = InstanceExpression::new(TreeType::NothingExpression, Span::default());
    }
}
