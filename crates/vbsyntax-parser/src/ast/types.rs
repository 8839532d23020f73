//! Type names, type arguments and type parameters.
//!
//! # Grammar
//!
//! ```text
//! TYPE         ::= NON_ARRAY ARRAY_SUFFIX*
//! NON_ARRAY    ::= INTRINSIC | NAME TYPE_ARGS?
//! TYPE_ARGS    ::= '(' 'Of' TYPE (',' TYPE)* ')'
//! ARRAY_SUFFIX ::= '(' ','* ')'
//! ```

use std::fmt;

use vbsyntax_core::{Location, Span};

use crate::ast::expr::Expression;
use crate::ast::list::CommaList;
use crate::ast::names::{Name, SimpleName};
use crate::lexer::TokenKind;

/// The built-in types with a keyword spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntrinsicType {
    Boolean,
    SByte,
    Byte,
    Short,
    UShort,
    Integer,
    UInteger,
    Long,
    ULong,
    Decimal,
    Single,
    Double,
    Date,
    Char,
    String,
    Object,
}

impl IntrinsicType {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        use IntrinsicType::*;
        Some(match kind {
            TokenKind::Boolean => Boolean,
            TokenKind::SByte => SByte,
            TokenKind::Byte => Byte,
            TokenKind::Short => Short,
            TokenKind::UShort => UShort,
            TokenKind::Integer => Integer,
            TokenKind::UInteger => UInteger,
            TokenKind::Long => Long,
            TokenKind::ULong => ULong,
            TokenKind::Decimal => Decimal,
            TokenKind::Single => Single,
            TokenKind::Double => Double,
            TokenKind::Date => Date,
            TokenKind::Char => Char,
            TokenKind::String => String,
            TokenKind::Object => Object,
            _ => return None,
        })
    }

    /// The target type of an intrinsic conversion operator (`CInt`, ...).
    pub fn from_cast_token(kind: TokenKind) -> Option<Self> {
        use IntrinsicType::*;
        Some(match kind {
            TokenKind::CBool => Boolean,
            TokenKind::CSByte => SByte,
            TokenKind::CByte => Byte,
            TokenKind::CShort => Short,
            TokenKind::CUShort => UShort,
            TokenKind::CInt => Integer,
            TokenKind::CUInt => UInteger,
            TokenKind::CLng => Long,
            TokenKind::CULng => ULong,
            TokenKind::CDec => Decimal,
            TokenKind::CSng => Single,
            TokenKind::CDbl => Double,
            TokenKind::CDate => Date,
            TokenKind::CChar => Char,
            TokenKind::CStr => String,
            TokenKind::CObj => Object,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        use IntrinsicType::*;
        match self {
            Boolean => "Boolean",
            SByte => "SByte",
            Byte => "Byte",
            Short => "Short",
            UShort => "UShort",
            Integer => "Integer",
            UInteger => "UInteger",
            Long => "Long",
            ULong => "ULong",
            Decimal => "Decimal",
            Single => "Single",
            Double => "Double",
            Date => "Date",
            Char => "Char",
            String => "String",
            Object => "Object",
        }
    }
}

impl fmt::Display for IntrinsicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to a type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeName<'ast> {
    Intrinsic(IntrinsicTypeName),
    Named(NamedTypeName<'ast>),
    /// A generic type with arguments (`List(Of Integer)`).
    Constructed(&'ast ConstructedTypeName<'ast>),
    Array(&'ast ArrayTypeName<'ast>),
    /// A type that could not be parsed.
    Bad(Span),
}

impl<'ast> TypeName<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::Intrinsic(t) => t.span,
            Self::Named(t) => t.span,
            Self::Constructed(t) => t.span,
            Self::Array(t) => t.span,
            Self::Bad(span) => *span,
        }
    }

    #[inline]
    pub fn is_bad(&self) -> bool {
        matches!(self, Self::Bad(_))
    }
}

impl fmt::Display for TypeName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intrinsic(t) => write!(f, "{}", t.intrinsic),
            Self::Named(t) => write!(f, "{}", t.name),
            Self::Constructed(t) => {
                write!(f, "{}(Of ", t.name)?;
                for (i, arg) in t.arguments.arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Self::Array(t) => {
                write!(f, "{}(", t.element)?;
                for _ in 1..t.rank {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Self::Bad(_) => f.write_str("<bad type>"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntrinsicTypeName {
    pub intrinsic: IntrinsicType,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedTypeName<'ast> {
    pub name: Name<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstructedTypeName<'ast> {
    pub name: Name<'ast>,
    pub arguments: TypeArgumentList<'ast>,
    pub span: Span,
}

/// An array type. `bounds` is present only where sizes are allowed, in
/// array creation (`New Integer(9) {}`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayTypeName<'ast> {
    pub element: TypeName<'ast>,
    pub rank: u32,
    pub bounds: Option<&'ast ArrayBounds<'ast>>,
    pub span: Span,
}

/// `(Of T1, T2)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeArgumentList<'ast> {
    pub open: Location,
    pub of: Location,
    pub arguments: CommaList<'ast, TypeName<'ast>>,
    pub close: Option<Location>,
    pub span: Span,
}

/// Array bounds or rank: `(10)`, `(0 To 9, 4)`, `(,)`.
///
/// A rank-only specifier has no bounds and `rank` equal to the number of
/// commas plus one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayBounds<'ast> {
    pub open: Location,
    pub rank: u32,
    pub bounds: CommaList<'ast, ArrayBound<'ast>>,
    pub close: Option<Location>,
    pub span: Span,
}

impl ArrayBounds<'_> {
    /// Whether only the rank was written.
    #[inline]
    pub fn is_rank_only(&self) -> bool {
        self.bounds.is_empty()
    }
}

/// `[lower To] upper`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayBound<'ast> {
    pub lower: Option<Expression<'ast>>,
    pub to: Option<Location>,
    pub upper: Expression<'ast>,
    pub span: Span,
}

/// `(Of T As {Class, New}, U)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeParameterList<'ast> {
    pub open: Location,
    pub of: Location,
    pub parameters: CommaList<'ast, TypeParameter<'ast>>,
    pub close: Option<Location>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeParameter<'ast> {
    pub name: SimpleName<'ast>,
    pub constraints: Option<&'ast ConstraintList<'ast>>,
    pub span: Span,
}

/// `As Constraint` or `As {Constraint, ...}`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintList<'ast> {
    pub as_location: Location,
    pub open_brace: Option<Location>,
    pub constraints: CommaList<'ast, Constraint<'ast>>,
    pub close_brace: Option<Location>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint<'ast> {
    Class(Span),
    Structure(Span),
    New(Span),
    Type(TypeName<'ast>),
}

impl Constraint<'_> {
    pub fn span(&self) -> Span {
        match self {
            Self::Class(span) | Self::Structure(span) | Self::New(span) => *span,
            Self::Type(t) => t.span(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intrinsic_tokens() {
        assert_eq!(
            IntrinsicType::from_token(TokenKind::Integer),
            Some(IntrinsicType::Integer)
        );
        assert_eq!(IntrinsicType::from_token(TokenKind::Dim), None);
        assert_eq!(
            IntrinsicType::from_cast_token(TokenKind::CStr),
            Some(IntrinsicType::String)
        );
        assert_eq!(IntrinsicType::from_cast_token(TokenKind::CType), None);
    }

    #[test]
    fn display_array_type() {
        let element = TypeName::Intrinsic(IntrinsicTypeName {
            intrinsic: IntrinsicType::Long,
            span: Span::default(),
        });
        let array = ArrayTypeName {
            element,
            rank: 2,
            bounds: None,
            span: Span::default(),
        };
        assert_eq!(TypeName::Array(&array).to_string(), "Long(,)");
    }
}
