//! Block context and terminator matching.
//!
//! The parser keeps a stack of open blocks. When a statement that ends or
//! continues a block (`End If`, `Loop`, `Case`, ...) appears, it is matched
//! against the innermost block first and then against the enclosing ones:
//!
//! - accepted by the innermost block: the block consumes it
//! - accepted by an enclosing block: the innermost block is reported as
//!   unterminated and closed, and the terminator is left for the enclosing
//!   block
//! - accepted by no open block: it is reported and kept as a statement

use vbsyntax_core::{Span, SyntaxErrorKind};

use crate::ast::stmt::BlockKind;

/// A statement that ends or continues a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Terminator {
    /// `End X`, or `Wend`
    End(BlockKind),
    Loop,
    Next,
    /// `ElseIf` or `Else If`
    ElseIf,
    Else,
    Case,
    CaseElse,
    Catch,
    Finally,
}

impl Terminator {
    /// The error for this terminator when no open block accepts it.
    pub(super) fn without_begin(self) -> SyntaxErrorKind {
        use SyntaxErrorKind::*;
        match self {
            Self::End(kind) => kind.end_without_begin(),
            Self::Loop => LoopWithoutDo,
            Self::Next => NextWithoutFor,
            Self::ElseIf => ElseIfWithoutIf,
            Self::Else => ElseWithoutIf,
            Self::Case => CaseWithoutSelect,
            Self::CaseElse => CaseElseWithoutSelect,
            Self::Catch => CatchWithoutTry,
            Self::Finally => FinallyWithoutTry,
        }
    }
}

/// An open block on the parser's context stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct BlockContext {
    pub(super) kind: BlockKind,
    /// The span of the statement that opened the block.
    pub(super) span: Span,
    /// Whether the body holds statements rather than declarations.
    pub(super) statements: bool,
}

impl BlockContext {
    pub(super) fn statements(kind: BlockKind, span: Span) -> Self {
        Self {
            kind,
            span,
            statements: true,
        }
    }

    pub(super) fn declarations(kind: BlockKind, span: Span) -> Self {
        Self {
            kind,
            span,
            statements: false,
        }
    }

    /// Whether this is the statement body of a procedure or accessor.
    pub(super) fn is_procedure_body(&self) -> bool {
        use BlockKind::*;
        self.statements
            && matches!(
                self.kind,
                Sub | Function
                    | Operator
                    | Property
                    | Get
                    | Set
                    | AddHandler
                    | RemoveHandler
                    | RaiseEvent
            )
    }
}

impl BlockKind {
    /// Whether a block of this kind consumes `terminator`.
    pub(super) fn accepts(self, terminator: Terminator) -> bool {
        use Terminator as T;
        match self {
            BlockKind::If => matches!(
                terminator,
                T::ElseIf | T::Else | T::End(BlockKind::If)
            ),
            BlockKind::Select => matches!(
                terminator,
                T::Case | T::CaseElse | T::End(BlockKind::Select)
            ),
            BlockKind::Try => matches!(
                terminator,
                T::Catch | T::Finally | T::End(BlockKind::Try)
            ),
            BlockKind::Do => terminator == T::Loop,
            BlockKind::For => terminator == T::Next,
            kind => terminator == T::End(kind),
        }
    }

    /// The error for a block of this kind that is never closed.
    pub(super) fn expected_end(self) -> SyntaxErrorKind {
        use SyntaxErrorKind::*;
        match self {
            BlockKind::If => ExpectedEndIf,
            BlockKind::Using => ExpectedEndUsing,
            BlockKind::With => ExpectedEndWith,
            BlockKind::Select => ExpectedEndSelect,
            BlockKind::Structure => ExpectedEndStructure,
            BlockKind::Enum => ExpectedEndEnum,
            BlockKind::Interface => ExpectedEndInterface,
            BlockKind::Property => ExpectedEndProperty,
            BlockKind::Operator => ExpectedEndOperator,
            BlockKind::Sub => ExpectedEndSub,
            BlockKind::Function => ExpectedEndFunction,
            BlockKind::Event => ExpectedEndEvent,
            BlockKind::AddHandler => ExpectedEndAddHandler,
            BlockKind::RemoveHandler => ExpectedEndRemoveHandler,
            BlockKind::RaiseEvent => ExpectedEndRaiseEvent,
            BlockKind::Get => ExpectedEndGet,
            BlockKind::Set => ExpectedEndSet,
            BlockKind::Namespace => ExpectedEndNamespace,
            BlockKind::Module => ExpectedEndModule,
            BlockKind::Class => ExpectedEndClass,
            BlockKind::Try => ExpectedEndTry,
            BlockKind::While => ExpectedEndWhile,
            BlockKind::SyncLock => ExpectedEndSyncLock,
            BlockKind::Do => ExpectedLoop,
            BlockKind::For => ExpectedNext,
        }
    }

    /// The error for `End X` with no open `X` block.
    pub(super) fn end_without_begin(self) -> SyntaxErrorKind {
        use SyntaxErrorKind::*;
        match self {
            BlockKind::If => EndIfWithoutIf,
            BlockKind::Using => EndUsingWithoutUsing,
            BlockKind::With => EndWithWithoutWith,
            BlockKind::Select => EndSelectWithoutSelect,
            BlockKind::Structure => EndStructureWithoutStructure,
            BlockKind::Enum => EndEnumWithoutEnum,
            BlockKind::Interface => EndInterfaceWithoutInterface,
            BlockKind::Property => EndPropertyWithoutProperty,
            BlockKind::Operator => EndOperatorWithoutOperator,
            BlockKind::Sub => EndSubWithoutSub,
            BlockKind::Function => EndFunctionWithoutFunction,
            BlockKind::Event => EndEventWithoutEvent,
            BlockKind::AddHandler => EndAddHandlerWithoutAddHandler,
            BlockKind::RemoveHandler => EndRemoveHandlerWithoutRemoveHandler,
            BlockKind::RaiseEvent => EndRaiseEventWithoutRaiseEvent,
            BlockKind::Get => EndGetWithoutGet,
            BlockKind::Set => EndSetWithoutSet,
            BlockKind::Namespace => EndNamespaceWithoutNamespace,
            BlockKind::Module => EndModuleWithoutModule,
            BlockKind::Class => EndClassWithoutClass,
            BlockKind::Try => EndTryWithoutTry,
            BlockKind::While => EndWhileWithoutWhile,
            BlockKind::SyncLock => EndSyncLockWithoutSyncLock,
            BlockKind::Do => LoopWithoutDo,
            BlockKind::For => NextWithoutFor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn if_accepts_its_parts() {
        assert!(BlockKind::If.accepts(Terminator::Else));
        assert!(BlockKind::If.accepts(Terminator::ElseIf));
        assert!(BlockKind::If.accepts(Terminator::End(BlockKind::If)));
        assert!(!BlockKind::If.accepts(Terminator::End(BlockKind::Sub)));
        assert!(!BlockKind::If.accepts(Terminator::Case));
    }

    #[test]
    fn loops_accept_their_closers() {
        assert!(BlockKind::Do.accepts(Terminator::Loop));
        assert!(BlockKind::For.accepts(Terminator::Next));
        assert!(BlockKind::While.accepts(Terminator::End(BlockKind::While)));
        assert!(!BlockKind::Do.accepts(Terminator::Next));
    }

    #[test]
    fn other_blocks_accept_only_their_end() {
        assert!(BlockKind::Class.accepts(Terminator::End(BlockKind::Class)));
        assert!(!BlockKind::Class.accepts(Terminator::End(BlockKind::Module)));
        assert!(!BlockKind::With.accepts(Terminator::Else));
    }

    #[test]
    fn error_maps() {
        assert_eq!(BlockKind::If.expected_end(), SyntaxErrorKind::ExpectedEndIf);
        assert_eq!(BlockKind::Do.expected_end(), SyntaxErrorKind::ExpectedLoop);
        assert_eq!(
            Terminator::End(BlockKind::Sub).without_begin(),
            SyntaxErrorKind::EndSubWithoutSub
        );
        assert_eq!(Terminator::Loop.without_begin(), SyntaxErrorKind::LoopWithoutDo);
        assert_eq!(
            Terminator::CaseElse.without_begin(),
            SyntaxErrorKind::CaseElseWithoutSelect
        );
    }

    #[test]
    fn procedure_bodies() {
        let span = Span::default();
        assert!(BlockContext::statements(BlockKind::Sub, span).is_procedure_body());
        assert!(BlockContext::statements(BlockKind::Property, span).is_procedure_body());
        assert!(!BlockContext::declarations(BlockKind::Property, span).is_procedure_body());
        assert!(!BlockContext::statements(BlockKind::If, span).is_procedure_body());
    }
}
