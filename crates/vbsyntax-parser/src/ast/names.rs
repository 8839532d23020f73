//! Name nodes: simple, qualified and special names.

use vbsyntax_core::{Location, Span};

use crate::ast::types::ArrayBounds;
use crate::lexer::TypeCharacter;

/// A single identifier.
///
/// A name that could not be parsed has empty text and a zero-width span at
/// the point where it was expected; see [`SimpleName::is_bad`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleName<'ast> {
    /// Identifier text as written, without brackets or type character.
    pub text: &'ast str,
    pub type_char: TypeCharacter,
    /// Written as `[name]`.
    pub escaped: bool,
    pub span: Span,
}

impl<'ast> SimpleName<'ast> {
    pub fn new(text: &'ast str, type_char: TypeCharacter, escaped: bool, span: Span) -> Self {
        Self {
            text,
            type_char,
            escaped,
            span,
        }
    }

    /// Placeholder for a name that is missing from the source.
    pub fn missing(at: Location) -> Self {
        Self {
            text: "",
            type_char: TypeCharacter::None,
            escaped: false,
            span: Span::point(at),
        }
    }

    #[inline]
    pub fn is_bad(&self) -> bool {
        self.text.is_empty()
    }

    /// Case-insensitive comparison, the way the language compares names.
    pub fn matches(&self, text: &str) -> bool {
        self.text.eq_ignore_ascii_case(text)
    }
}

/// A possibly qualified name (`System.Collections.Generic`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Name<'ast> {
    Simple(SimpleName<'ast>),
    Qualified(&'ast QualifiedName<'ast>),
    /// The `Global` namespace qualifier.
    Global(GlobalNamespaceName),
    /// `Me`, `MyBase` or `MyClass`, as used in `Handles` clauses.
    Special(SpecialName),
}

impl<'ast> Name<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::Simple(n) => n.span,
            Self::Qualified(n) => n.span,
            Self::Global(n) => n.span,
            Self::Special(n) => n.span,
        }
    }

    /// The rightmost simple name, if any.
    pub fn last(&self) -> Option<&SimpleName<'ast>> {
        match self {
            Self::Simple(n) => Some(n),
            Self::Qualified(n) => Some(&n.name),
            Self::Global(_) | Self::Special(_) => None,
        }
    }

    pub fn is_bad(&self) -> bool {
        match self {
            Self::Simple(n) => n.is_bad(),
            Self::Qualified(n) => n.name.is_bad() || n.qualifier.is_bad(),
            Self::Global(_) | Self::Special(_) => false,
        }
    }
}

impl std::fmt::Display for Name<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple(n) => f.write_str(n.text),
            Self::Qualified(n) => write!(f, "{}.{}", n.qualifier, n.name.text),
            Self::Global(_) => f.write_str("Global"),
            Self::Special(n) => f.write_str(n.kind.as_str()),
        }
    }
}

/// `qualifier.name`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualifiedName<'ast> {
    pub qualifier: Name<'ast>,
    pub dot: Location,
    pub name: SimpleName<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalNamespaceName {
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialNameKind {
    Me,
    MyBase,
    MyClass,
}

impl SpecialNameKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Me => "Me",
            Self::MyBase => "MyBase",
            Self::MyClass => "MyClass",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialName {
    pub kind: SpecialNameKind,
    pub span: Span,
}

/// The name of a declared variable or parameter, with optional array
/// bounds or rank (`x(10)`, `y(,)`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableName<'ast> {
    pub name: SimpleName<'ast>,
    pub array: Option<&'ast ArrayBounds<'ast>>,
    pub span: Span,
}

/// A statement label: an identifier or a line number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Label<'ast> {
    Name(SimpleName<'ast>),
    LineNumber { value: i64, span: Span },
}

impl Label<'_> {
    pub fn span(&self) -> Span {
        match self {
            Self::Name(n) => n.span,
            Self::LineNumber { span, .. } => *span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: u32, end: u32) -> Span {
        Span::new(Location::new(start, 1, start + 1), Location::new(end, 1, end + 1))
    }

    #[test]
    fn missing_name_is_bad() {
        let name = SimpleName::missing(Location::new(4, 1, 5));
        assert!(name.is_bad());
        assert!(name.span.is_empty());
    }

    #[test]
    fn qualified_display() {
        let system = SimpleName::new("System", TypeCharacter::None, false, span(0, 6));
        let io = SimpleName::new("IO", TypeCharacter::None, false, span(7, 9));
        let qualified = QualifiedName {
            qualifier: Name::Simple(system),
            dot: Location::new(6, 1, 7),
            name: io,
            span: span(0, 9),
        };
        let name = Name::Qualified(&qualified);
        assert_eq!(name.to_string(), "System.IO");
        assert_eq!(name.last().map(|n| n.text), Some("IO"));
        assert!(!name.is_bad());
    }

    #[test]
    fn case_insensitive_match() {
        let name = SimpleName::new("Mid", TypeCharacter::None, false, span(0, 3));
        assert!(name.matches("MID"));
        assert!(!name.matches("Left"));
    }
}
