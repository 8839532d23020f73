//! Operator definitions for expressions and statements.
//!
//! Provides enums for unary, binary, compound-assignment and overloadable
//! operators, along with the precedence table the binary expression parser
//! climbs.

use std::fmt;

use crate::lexer::TokenKind;

/// Operator precedence, lowest binding first.
///
/// A binary operator is only consumed when its precedence is strictly
/// greater than the pending precedence of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// Nothing pending: any operator may be consumed.
    None,
    /// `Xor`
    Xor,
    /// `Or`, `OrElse`
    Or,
    /// `And`, `AndAlso`
    And,
    /// Unary `Not`
    Not,
    /// `= <> < <= > >= Is IsNot Like`
    Relational,
    /// `<< >>`
    Shift,
    /// `&`
    Concatenate,
    /// Binary `+ -`
    Additive,
    /// `Mod`
    Modulus,
    /// `\`
    IntegralDivide,
    /// `* /`
    Multiplicative,
    /// Unary `- +`
    Negate,
    /// `^`
    Power,
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// `-`
    Negate,
    /// `+`
    UnaryPlus,
    /// `Not`
    Not,
}

impl UnaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Minus => Some(Self::Negate),
            TokenKind::Plus => Some(Self::UnaryPlus),
            TokenKind::Not => Some(Self::Not),
            _ => None,
        }
    }

    /// The precedence the operand is parsed at.
    pub fn operand_precedence(self) -> Precedence {
        match self {
            Self::Negate | Self::UnaryPlus => Precedence::Negate,
            Self::Not => Precedence::Not,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Negate => "-",
            Self::UnaryPlus => "+",
            Self::Not => "Not",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    // Arithmetic
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `\`
    IntegralDivide,
    /// `Mod`
    Modulus,
    /// `^`
    Power,

    // String
    /// `&`
    Concatenate,

    // Bitwise shift
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,

    // Relational
    /// `=`
    Equals,
    /// `<>`
    NotEquals,
    /// `<`
    LessThan,
    /// `<=`
    LessThanEquals,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanEquals,
    /// `Is`
    Is,
    /// `IsNot`
    IsNot,
    /// `Like`
    Like,

    // Logical
    /// `And`
    And,
    /// `AndAlso`
    AndAlso,
    /// `Or`
    Or,
    /// `OrElse`
    OrElse,
    /// `Xor`
    Xor,
}

impl BinaryOperator {
    /// Map a token to the binary operator it spells, if any.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        use BinaryOperator::*;
        Some(match kind {
            TokenKind::Plus => Plus,
            TokenKind::Minus => Minus,
            TokenKind::Star => Multiply,
            TokenKind::ForwardSlash => Divide,
            TokenKind::BackwardSlash => IntegralDivide,
            TokenKind::Mod => Modulus,
            TokenKind::Caret => Power,
            TokenKind::Ampersand => Concatenate,
            TokenKind::LessThanLessThan => ShiftLeft,
            TokenKind::GreaterThanGreaterThan => ShiftRight,
            TokenKind::Equals => Equals,
            TokenKind::NotEquals => NotEquals,
            TokenKind::LessThan => LessThan,
            TokenKind::LessThanEquals => LessThanEquals,
            TokenKind::GreaterThan => GreaterThan,
            TokenKind::GreaterThanEquals => GreaterThanEquals,
            TokenKind::Is => Is,
            TokenKind::IsNot => IsNot,
            TokenKind::Like => Like,
            TokenKind::And => And,
            TokenKind::AndAlso => AndAlso,
            TokenKind::Or => Or,
            TokenKind::OrElse => OrElse,
            TokenKind::Xor => Xor,
            _ => return None,
        })
    }

    pub fn precedence(self) -> Precedence {
        use BinaryOperator::*;
        match self {
            Power => Precedence::Power,
            Multiply | Divide => Precedence::Multiplicative,
            IntegralDivide => Precedence::IntegralDivide,
            Modulus => Precedence::Modulus,
            Plus | Minus => Precedence::Additive,
            Concatenate => Precedence::Concatenate,
            ShiftLeft | ShiftRight => Precedence::Shift,
            Equals | NotEquals | LessThan | LessThanEquals | GreaterThan | GreaterThanEquals
            | Is | IsNot | Like => Precedence::Relational,
            And | AndAlso => Precedence::And,
            Or | OrElse => Precedence::Or,
            Xor => Precedence::Xor,
        }
    }

    /// Whether the operator compares its operands.
    pub fn is_relational(self) -> bool {
        self.precedence() == Precedence::Relational
    }

    pub fn as_str(self) -> &'static str {
        use BinaryOperator::*;
        match self {
            Plus => "+",
            Minus => "-",
            Multiply => "*",
            Divide => "/",
            IntegralDivide => "\\",
            Modulus => "Mod",
            Power => "^",
            Concatenate => "&",
            ShiftLeft => "<<",
            ShiftRight => ">>",
            Equals => "=",
            NotEquals => "<>",
            LessThan => "<",
            LessThanEquals => "<=",
            GreaterThan => ">",
            GreaterThanEquals => ">=",
            Is => "Is",
            IsNot => "IsNot",
            Like => "Like",
            And => "And",
            AndAlso => "AndAlso",
            Or => "Or",
            OrElse => "OrElse",
            Xor => "Xor",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operators of compound assignment statements (`x += 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompoundOperator {
    /// `+=`
    Plus,
    /// `-=`
    Minus,
    /// `*=`
    Multiply,
    /// `/=`
    Divide,
    /// `\=`
    IntegralDivide,
    /// `^=`
    Power,
    /// `&=`
    Concatenate,
    /// `<<=`
    ShiftLeft,
    /// `>>=`
    ShiftRight,
}

impl CompoundOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        use CompoundOperator::*;
        Some(match kind {
            TokenKind::PlusEquals => Plus,
            TokenKind::MinusEquals => Minus,
            TokenKind::StarEquals => Multiply,
            TokenKind::ForwardSlashEquals => Divide,
            TokenKind::BackwardSlashEquals => IntegralDivide,
            TokenKind::CaretEquals => Power,
            TokenKind::AmpersandEquals => Concatenate,
            TokenKind::LessThanLessThanEquals => ShiftLeft,
            TokenKind::GreaterThanGreaterThanEquals => ShiftRight,
            _ => return None,
        })
    }

    /// The binary operator the assignment applies.
    pub fn binary(self) -> BinaryOperator {
        match self {
            Self::Plus => BinaryOperator::Plus,
            Self::Minus => BinaryOperator::Minus,
            Self::Multiply => BinaryOperator::Multiply,
            Self::Divide => BinaryOperator::Divide,
            Self::IntegralDivide => BinaryOperator::IntegralDivide,
            Self::Power => BinaryOperator::Power,
            Self::Concatenate => BinaryOperator::Concatenate,
            Self::ShiftLeft => BinaryOperator::ShiftLeft,
            Self::ShiftRight => BinaryOperator::ShiftRight,
        }
    }
}

impl fmt::Display for CompoundOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.binary())
    }
}

/// Operators that an `Operator` declaration may overload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverloadableOperator {
    Unary(UnaryOperator),
    Binary(BinaryOperator),
    /// `IsTrue`
    IsTrue,
    /// `IsFalse`
    IsFalse,
    /// `CType` conversion
    Conversion,
}

impl OverloadableOperator {
    /// Operators spelled by `kind` in an operator declaration. `+`, `-`
    /// and `Not` are resolved to unary or binary by parameter count, which
    /// is not known yet, so the binary form is returned for `+` and `-`.
    pub fn from_token(kind: TokenKind, unreserved: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Not => Some(Self::Unary(UnaryOperator::Not)),
            TokenKind::CType => Some(Self::Conversion),
            TokenKind::AndAlso | TokenKind::OrElse | TokenKind::Is | TokenKind::IsNot => None,
            TokenKind::Identifier => match unreserved {
                TokenKind::IsTrue => Some(Self::IsTrue),
                TokenKind::IsFalse => Some(Self::IsFalse),
                _ => None,
            },
            other => BinaryOperator::from_token(other).map(Self::Binary),
        }
    }
}

impl fmt::Display for OverloadableOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unary(op) => write!(f, "{op}"),
            Self::Binary(op) => write!(f, "{op}"),
            Self::IsTrue => f.write_str("IsTrue"),
            Self::IsFalse => f.write_str("IsFalse"),
            Self::Conversion => f.write_str("CType"),
        }
    }
}
