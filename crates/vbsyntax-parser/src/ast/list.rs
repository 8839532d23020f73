//! Delimited collections shared by the node families.

use vbsyntax_core::{Location, Span};

use crate::ast::decl::Declaration;
use crate::ast::expr::Expression;
use crate::ast::names::SimpleName;
use crate::ast::stmt::Statement;

/// A comma-separated sequence with the location of every comma.
pub struct CommaList<'ast, T> {
    pub items: &'ast [T],
    pub separators: &'ast [Location],
    pub span: Span,
}

impl<T> Clone for CommaList<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CommaList<'_, T> {}

impl<T: PartialEq> PartialEq for CommaList<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items && self.separators == other.separators && self.span == other.span
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for CommaList<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommaList")
            .field("items", &self.items)
            .field("span", &self.span)
            .finish()
    }
}

impl<'ast, T> CommaList<'ast, T> {
    pub fn new(items: &'ast [T], separators: &'ast [Location], span: Span) -> Self {
        debug_assert!(
            separators.len() <= items.len() && items.len() <= separators.len() + 1,
            "{} items with {} separators",
            items.len(),
            separators.len()
        );
        Self {
            items,
            separators,
            span,
        }
    }

    pub fn empty(at: Location) -> Self {
        Self {
            items: &[],
            separators: &[],
            span: Span::point(at),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'ast, T> {
        self.items.iter()
    }

    pub fn first(&self) -> Option<&'ast T> {
        self.items.first()
    }
}

impl<'ast, T> IntoIterator for &CommaList<'ast, T> {
    type Item = &'ast T;
    type IntoIter = std::slice::Iter<'ast, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// The statements of a block body or a single-line construct, with the
/// colons that separated statements on the same line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatementList<'ast> {
    pub statements: &'ast [Statement<'ast>],
    pub colons: &'ast [Location],
    pub span: Span,
}

impl<'ast> StatementList<'ast> {
    pub fn empty(at: Location) -> Self {
        Self {
            statements: &[],
            colons: &[],
            span: Span::point(at),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'ast, Statement<'ast>> {
        self.statements.iter()
    }
}

/// The declarations of a file, namespace or type body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeclarationList<'ast> {
    pub declarations: &'ast [Declaration<'ast>],
    pub span: Span,
}

impl<'ast> DeclarationList<'ast> {
    pub fn empty(at: Location) -> Self {
        Self {
            declarations: &[],
            span: Span::point(at),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'ast, Declaration<'ast>> {
        self.declarations.iter()
    }
}

/// Arguments of a call, index or attribute. The parentheses are absent
/// for VBScript-style calls (`MsgBox "hi", 1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArgumentList<'ast> {
    pub open: Option<Location>,
    pub arguments: CommaList<'ast, Argument<'ast>>,
    pub close: Option<Location>,
    pub span: Span,
}

impl<'ast> ArgumentList<'ast> {
    #[inline]
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'ast, Argument<'ast>> {
        self.arguments.iter()
    }
}

/// One argument: positional, named (`name := value`) or omitted (`f(1, , 3)`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Argument<'ast> {
    pub name: Option<SimpleName<'ast>>,
    pub colon_equals: Option<Location>,
    pub value: Option<Expression<'ast>>,
    pub span: Span,
}

impl Argument<'_> {
    #[inline]
    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    #[inline]
    pub fn is_omitted(&self) -> bool {
        self.value.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(i: u32) -> Location {
        Location::new(i, 1, i + 1)
    }

    #[test]
    fn comma_list_basics() {
        let items = [1, 2, 3];
        let seps = [loc(1), loc(3)];
        let list = CommaList::new(&items, &seps, Span::new(loc(0), loc(5)));
        assert_eq!(list.len(), 3);
        assert_eq!(list.iter().copied().sum::<i32>(), 6);
        assert_eq!(list.first(), Some(&1));
        let copy = list;
        assert_eq!(copy, list);
    }

    #[test]
    fn empty_lists() {
        let list: CommaList<'_, u8> = CommaList::empty(loc(3));
        assert!(list.is_empty());
        assert!(list.span.is_empty());
        assert!(StatementList::empty(loc(0)).is_empty());
        assert!(DeclarationList::empty(loc(0)).is_empty());
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn separator_count_checked() {
        let items = [1];
        let seps = [loc(1), loc(2)];
        let _ = CommaList::new(&items, &seps, Span::new(loc(0), loc(3)));
    }
}
