//! Statement AST nodes.
//!
//! Provides nodes for all executable statements including:
//! - Assignments (plain, compound, `Mid`)
//! - Calls, labels and jumps
//! - Declarations of locals
//! - Block statements (`If`, `Do`, `For`, `While`, `Select`, `Try`, ...)
//!   together with the part statements that open and close their pieces
//!
//! A block statement owns the statement list of its body and the statement
//! that terminated it, if one was found. Part statements (`Loop`, `Next`,
//! `Case`, `Else`, `End ...`) that appear where no block expects them are
//! kept as ordinary statements.

use std::fmt;

use vbsyntax_core::{Location, Span};

use crate::ast::decl::{Declaration, ModifierList, VariableDeclarator};
use crate::ast::expr::Expression;
use crate::ast::list::{ArgumentList, CommaList, StatementList};
use crate::ast::names::{Label, SimpleName};
use crate::ast::ops::{BinaryOperator, CompoundOperator};
use crate::ast::tree::TreeType;
use crate::ast::types::TypeName;
use crate::lexer::TokenKind;

/// The kind of block a terminator names (`End If`, `Exit Do`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    If,
    Using,
    With,
    Select,
    Structure,
    Enum,
    Interface,
    Property,
    Operator,
    Sub,
    Function,
    Event,
    AddHandler,
    RemoveHandler,
    RaiseEvent,
    Get,
    Set,
    Namespace,
    Module,
    Class,
    Try,
    While,
    SyncLock,
    Do,
    For,
}

impl BlockKind {
    /// The block named by the keyword after `End`.
    pub fn from_end_token(kind: TokenKind) -> Option<Self> {
        use BlockKind::*;
        Some(match kind {
            TokenKind::If => If,
            TokenKind::Using => Using,
            TokenKind::With => With,
            TokenKind::Select => Select,
            TokenKind::Structure => Structure,
            TokenKind::Enum => Enum,
            TokenKind::Interface => Interface,
            TokenKind::Property => Property,
            TokenKind::Operator => Operator,
            TokenKind::Sub => Sub,
            TokenKind::Function => Function,
            TokenKind::Event => Event,
            TokenKind::AddHandler => AddHandler,
            TokenKind::RemoveHandler => RemoveHandler,
            TokenKind::RaiseEvent => RaiseEvent,
            TokenKind::Get => Get,
            TokenKind::Set => Set,
            TokenKind::Namespace => Namespace,
            TokenKind::Module => Module,
            TokenKind::Class => Class,
            TokenKind::Try => Try,
            TokenKind::While => While,
            TokenKind::SyncLock => SyncLock,
            _ => return None,
        })
    }

    /// The block named by the keyword after `Exit`.
    pub fn from_exit_token(kind: TokenKind) -> Option<Self> {
        use BlockKind::*;
        Some(match kind {
            TokenKind::Do => Do,
            TokenKind::For => For,
            TokenKind::While => While,
            TokenKind::Select => Select,
            TokenKind::Sub => Sub,
            TokenKind::Function => Function,
            TokenKind::Property => Property,
            TokenKind::Try => Try,
            _ => return None,
        })
    }

    /// The block named by the keyword after `Continue`.
    pub fn from_continue_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Do => Some(BlockKind::Do),
            TokenKind::For => Some(BlockKind::For),
            TokenKind::While => Some(BlockKind::While),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        use BlockKind::*;
        match self {
            If => "If",
            Using => "Using",
            With => "With",
            Select => "Select",
            Structure => "Structure",
            Enum => "Enum",
            Interface => "Interface",
            Property => "Property",
            Operator => "Operator",
            Sub => "Sub",
            Function => "Function",
            Event => "Event",
            AddHandler => "AddHandler",
            RemoveHandler => "RemoveHandler",
            RaiseEvent => "RaiseEvent",
            Get => "Get",
            Set => "Set",
            Namespace => "Namespace",
            Module => "Module",
            Class => "Class",
            Try => "Try",
            While => "While",
            SyncLock => "SyncLock",
            Do => "Do",
            For => "For",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `End X`, or `Wend` for a `While` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndBlock {
    pub kind: BlockKind,
    pub span: Span,
}

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statement<'ast> {
    // Assignments and calls
    Assignment(&'ast AssignmentStatement<'ast>),
    CompoundAssignment(&'ast CompoundAssignmentStatement<'ast>),
    /// `Mid(s, start[, length]) = value`
    MidAssignment(&'ast MidAssignmentStatement<'ast>),
    Call(&'ast CallStatement<'ast>),

    // Locals
    LocalDeclaration(&'ast LocalDeclarationStatement<'ast>),

    // Jumps and simple statements
    Label(LabelStatement<'ast>),
    GoTo(GoToStatement<'ast>),
    Exit(ExitStatement),
    Continue(ContinueStatement),
    /// `Stop` or `End`
    Keyword(KeywordStatement),
    Return(&'ast ExpressionStatement<'ast>),
    Throw(&'ast ExpressionStatement<'ast>),
    /// `Error code`
    Error(&'ast ExpressionStatement<'ast>),
    RaiseEvent(&'ast RaiseEventStatement<'ast>),
    /// `AddHandler` or `RemoveHandler`
    Handler(&'ast HandlerStatement<'ast>),
    OnError(OnErrorStatement<'ast>),
    Resume(ResumeStatement<'ast>),
    ReDim(&'ast ReDimStatement<'ast>),
    Erase(&'ast EraseStatement<'ast>),

    // Blocks
    If(&'ast IfBlockStatement<'ast>),
    LineIf(&'ast LineIfStatement<'ast>),
    Do(&'ast DoBlockStatement<'ast>),
    For(&'ast ForBlockStatement<'ast>),
    ForEach(&'ast ForEachBlockStatement<'ast>),
    While(&'ast WhileBlockStatement<'ast>),
    /// `With` or `SyncLock`
    ExpressionBlock(&'ast ExpressionBlockStatement<'ast>),
    Using(&'ast UsingBlockStatement<'ast>),
    Try(&'ast TryBlockStatement<'ast>),
    Select(&'ast SelectBlockStatement<'ast>),

    // Block parts and terminators found outside their block
    EndBlock(EndBlock),
    Loop(&'ast LoopStatement<'ast>),
    Next(&'ast NextStatement<'ast>),
    ElseIf(&'ast ElseIfStatement<'ast>),
    Else(Span),
    Case(&'ast CaseStatement<'ast>),
    CaseElse(Span),
    Catch(&'ast CatchStatement<'ast>),
    Finally(Span),

    /// A declaration inside a script block.
    Declaration(Declaration<'ast>),
    /// A statement that could not be parsed.
    Bad(Span),
}

impl<'ast> Statement<'ast> {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Assignment(s) => s.span,
            Self::CompoundAssignment(s) => s.span,
            Self::MidAssignment(s) => s.span,
            Self::Call(s) => s.span,
            Self::LocalDeclaration(s) => s.span,
            Self::Label(s) => s.span,
            Self::GoTo(s) => s.span,
            Self::Exit(s) => s.span,
            Self::Continue(s) => s.span,
            Self::Keyword(s) => s.span,
            Self::Return(s) | Self::Throw(s) | Self::Error(s) => s.span,
            Self::RaiseEvent(s) => s.span,
            Self::Handler(s) => s.span,
            Self::OnError(s) => s.span,
            Self::Resume(s) => s.span,
            Self::ReDim(s) => s.span,
            Self::Erase(s) => s.span,
            Self::If(s) => s.span,
            Self::LineIf(s) => s.span,
            Self::Do(s) => s.span,
            Self::For(s) => s.span,
            Self::ForEach(s) => s.span,
            Self::While(s) => s.span,
            Self::ExpressionBlock(s) => s.span,
            Self::Using(s) => s.span,
            Self::Try(s) => s.span,
            Self::Select(s) => s.span,
            Self::EndBlock(s) => s.span,
            Self::Loop(s) => s.span,
            Self::Next(s) => s.span,
            Self::ElseIf(s) => s.span,
            Self::Case(s) => s.span,
            Self::Catch(s) => s.span,
            Self::Else(span) | Self::CaseElse(span) | Self::Finally(span) | Self::Bad(span) => {
                *span
            }
            Self::Declaration(d) => d.span(),
        }
    }

    #[inline]
    pub fn is_bad(&self) -> bool {
        matches!(self, Self::Bad(_))
    }
}

/// `[Let | Set] target = source`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignmentStatement<'ast> {
    /// The VBScript `Let` or `Set` prefix.
    pub keyword: Option<Span>,
    pub target: Expression<'ast>,
    pub equals: Location,
    pub source: Expression<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompoundAssignmentStatement<'ast> {
    pub target: Expression<'ast>,
    pub op: CompoundOperator,
    pub op_span: Span,
    pub source: Expression<'ast>,
    pub span: Span,
}

impl CompoundAssignmentStatement<'_> {
    pub fn binary_operator(&self) -> BinaryOperator {
        self.op.binary()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MidAssignmentStatement<'ast> {
    /// Written `Mid$`.
    pub has_type_char: bool,
    pub target: Expression<'ast>,
    pub start: Expression<'ast>,
    pub length: Option<Expression<'ast>>,
    pub source: Expression<'ast>,
    pub span: Span,
}

/// A call. Parenthesized arguments are part of `target`; `arguments` holds
/// VBScript-style arguments written without parentheses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallStatement<'ast> {
    pub call_keyword: Option<Location>,
    pub target: Expression<'ast>,
    pub arguments: Option<ArgumentList<'ast>>,
    pub span: Span,
}

/// `Dim`, `Const` or `Static` locals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalDeclarationStatement<'ast> {
    pub modifiers: ModifierList<'ast>,
    pub declarators: CommaList<'ast, VariableDeclarator<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStatement<'ast> {
    pub label: Label<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoToStatement<'ast> {
    pub label: Label<'ast>,
    pub span: Span,
}

/// `Exit Do`, `Exit Sub`, ... `kind` is `None` if the block keyword is
/// missing or invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatement {
    pub kind: Option<BlockKind>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinueStatement {
    pub kind: Option<BlockKind>,
    pub span: Span,
}

/// A statement consisting of a single keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordStatement {
    pub tree_type: TreeType,
    pub span: Span,
}

impl KeywordStatement {
    pub fn new(tree_type: TreeType, span: Span) -> Self {
        debug_assert!(
            matches!(tree_type, TreeType::StopStatement | TreeType::EndStatement),
            "{tree_type:?} is not a keyword statement"
        );
        Self { tree_type, span }
    }
}

/// `Return`, `Throw` and `Error`, each with an operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpressionStatement<'ast> {
    pub tree_type: TreeType,
    pub operand: Option<Expression<'ast>>,
    pub span: Span,
}

impl<'ast> ExpressionStatement<'ast> {
    pub fn new(tree_type: TreeType, operand: Option<Expression<'ast>>, span: Span) -> Self {
        debug_assert!(
            matches!(
                tree_type,
                TreeType::ReturnStatement | TreeType::ThrowStatement | TreeType::ErrorStatement
            ),
            "{tree_type:?} is not an expression statement"
        );
        Self {
            tree_type,
            operand,
            span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaiseEventStatement<'ast> {
    pub name: SimpleName<'ast>,
    pub arguments: Option<ArgumentList<'ast>>,
    pub span: Span,
}

/// `AddHandler event, handler` or `RemoveHandler event, handler`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandlerStatement<'ast> {
    pub tree_type: TreeType,
    pub event: Expression<'ast>,
    pub comma: Option<Location>,
    pub handler: Expression<'ast>,
    pub span: Span,
}

impl<'ast> HandlerStatement<'ast> {
    pub fn new(
        tree_type: TreeType,
        event: Expression<'ast>,
        comma: Option<Location>,
        handler: Expression<'ast>,
        span: Span,
    ) -> Self {
        debug_assert!(
            matches!(
                tree_type,
                TreeType::AddHandlerStatement | TreeType::RemoveHandlerStatement
            ),
            "{tree_type:?} is not a handler statement"
        );
        Self {
            tree_type,
            event,
            comma,
            handler,
            span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OnErrorKind<'ast> {
    /// `On Error GoTo label`
    GoToLabel(Label<'ast>),
    /// `On Error GoTo 0`
    GoToZero,
    /// `On Error GoTo -1`
    GoToMinusOne,
    /// `On Error Resume Next`
    ResumeNext,
    /// Malformed
    Bad,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnErrorStatement<'ast> {
    pub kind: OnErrorKind<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResumeKind<'ast> {
    /// `Resume`
    Plain,
    /// `Resume Next`
    Next,
    /// `Resume label`
    Label(Label<'ast>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResumeStatement<'ast> {
    pub kind: ResumeKind<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReDimStatement<'ast> {
    pub preserve: Option<Span>,
    pub variables: CommaList<'ast, Expression<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EraseStatement<'ast> {
    pub variables: CommaList<'ast, Expression<'ast>>,
    pub span: Span,
}

// ============================================================================
// If
// ============================================================================

/// A multi-line `If` block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfBlockStatement<'ast> {
    pub condition: Expression<'ast>,
    pub then: Option<Location>,
    pub body: StatementList<'ast>,
    /// `ElseIf` and `Else` parts in source order.
    pub parts: &'ast [IfPart<'ast>],
    pub end: Option<EndBlock>,
    pub span: Span,
}

impl<'ast> IfBlockStatement<'ast> {
    pub fn else_ifs(&self) -> impl Iterator<Item = &'ast ElseIfBlockStatement<'ast>> + use<'ast> {
        self.parts.iter().filter_map(|part| match part {
            IfPart::ElseIf(block) => Some(*block),
            IfPart::Else(_) => None,
        })
    }

    pub fn else_block(&self) -> Option<&'ast ElseBlockStatement<'ast>> {
        self.parts.iter().find_map(|part| match part {
            IfPart::Else(block) => Some(*block),
            IfPart::ElseIf(_) => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IfPart<'ast> {
    ElseIf(&'ast ElseIfBlockStatement<'ast>),
    Else(&'ast ElseBlockStatement<'ast>),
}

impl IfPart<'_> {
    pub fn span(&self) -> Span {
        match self {
            Self::ElseIf(block) => block.span,
            Self::Else(block) => block.span,
        }
    }
}

/// `ElseIf condition Then` (also written `Else If`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElseIfStatement<'ast> {
    pub condition: Expression<'ast>,
    pub then: Option<Location>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElseIfBlockStatement<'ast> {
    pub header: &'ast ElseIfStatement<'ast>,
    pub body: StatementList<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElseBlockStatement<'ast> {
    pub else_span: Span,
    pub body: StatementList<'ast>,
    pub span: Span,
}

/// `If condition Then statements [Else statements]` on one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineIfStatement<'ast> {
    pub condition: Expression<'ast>,
    pub then: Location,
    pub statements: StatementList<'ast>,
    pub else_location: Option<Location>,
    pub else_statements: Option<StatementList<'ast>>,
    /// A trailing `End If` consumed by the line `If`.
    pub end: Option<EndBlock>,
    pub span: Span,
}

// ============================================================================
// Loops
// ============================================================================

/// `While condition` or `Until condition` on a `Do` or `Loop`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopCondition<'ast> {
    pub is_while: bool,
    pub keyword: Span,
    pub condition: Expression<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoBlockStatement<'ast> {
    pub condition: Option<LoopCondition<'ast>>,
    pub body: StatementList<'ast>,
    pub end: Option<&'ast LoopStatement<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopStatement<'ast> {
    pub condition: Option<LoopCondition<'ast>>,
    pub span: Span,
}

/// The control variable of a `For` or `For Each` loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForControl<'ast> {
    /// An existing variable or other expression.
    Expression(Expression<'ast>),
    /// An inline declaration (`For i As Integer = ...`).
    Declarator(&'ast VariableDeclarator<'ast>),
}

impl ForControl<'_> {
    pub fn span(&self) -> Span {
        match self {
            Self::Expression(e) => e.span(),
            Self::Declarator(d) => d.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForBlockStatement<'ast> {
    pub control: ForControl<'ast>,
    pub equals: Option<Location>,
    pub lower: Expression<'ast>,
    pub to: Option<Location>,
    pub upper: Expression<'ast>,
    pub step: Option<Expression<'ast>>,
    pub body: StatementList<'ast>,
    /// The `Next` that closed this loop. A `Next` naming several
    /// variables closes several loops and is shared by all of them.
    pub next: Option<&'ast NextStatement<'ast>>,
    /// The variable in `next` that names this loop.
    pub next_variable: Option<&'ast Expression<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForEachBlockStatement<'ast> {
    pub control: ForControl<'ast>,
    pub in_location: Option<Location>,
    pub collection: Expression<'ast>,
    pub body: StatementList<'ast>,
    pub next: Option<&'ast NextStatement<'ast>>,
    pub next_variable: Option<&'ast Expression<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextStatement<'ast> {
    pub variables: CommaList<'ast, Expression<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhileBlockStatement<'ast> {
    pub condition: Expression<'ast>,
    pub body: StatementList<'ast>,
    pub end: Option<EndBlock>,
    pub span: Span,
}

// ============================================================================
// Other blocks
// ============================================================================

/// `With expression` or `SyncLock expression` blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpressionBlockStatement<'ast> {
    pub tree_type: TreeType,
    pub expression: Expression<'ast>,
    pub body: StatementList<'ast>,
    pub end: Option<EndBlock>,
    pub span: Span,
}

impl<'ast> ExpressionBlockStatement<'ast> {
    pub fn new(
        tree_type: TreeType,
        expression: Expression<'ast>,
        body: StatementList<'ast>,
        end: Option<EndBlock>,
        span: Span,
    ) -> Self {
        debug_assert!(
            matches!(
                tree_type,
                TreeType::WithBlockStatement | TreeType::SyncLockBlockStatement
            ),
            "{tree_type:?} is not an expression block"
        );
        Self {
            tree_type,
            expression,
            body,
            end,
            span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UsingResource<'ast> {
    Expression(Expression<'ast>),
    Declarators(CommaList<'ast, VariableDeclarator<'ast>>),
}

impl UsingResource<'_> {
    pub fn span(&self) -> Span {
        match self {
            Self::Expression(e) => e.span(),
            Self::Declarators(d) => d.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsingBlockStatement<'ast> {
    pub resource: UsingResource<'ast>,
    pub body: StatementList<'ast>,
    pub end: Option<EndBlock>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TryBlockStatement<'ast> {
    pub body: StatementList<'ast>,
    /// `Catch` and `Finally` parts in source order.
    pub parts: &'ast [TryPart<'ast>],
    pub end: Option<EndBlock>,
    pub span: Span,
}

impl<'ast> TryBlockStatement<'ast> {
    pub fn catches(&self) -> impl Iterator<Item = &'ast CatchBlockStatement<'ast>> + use<'ast> {
        self.parts.iter().filter_map(|part| match part {
            TryPart::Catch(block) => Some(*block),
            TryPart::Finally(_) => None,
        })
    }

    pub fn finally_block(&self) -> Option<&'ast FinallyBlockStatement<'ast>> {
        self.parts.iter().find_map(|part| match part {
            TryPart::Finally(block) => Some(*block),
            TryPart::Catch(_) => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TryPart<'ast> {
    Catch(&'ast CatchBlockStatement<'ast>),
    Finally(&'ast FinallyBlockStatement<'ast>),
}

impl TryPart<'_> {
    pub fn span(&self) -> Span {
        match self {
            Self::Catch(block) => block.span,
            Self::Finally(block) => block.span,
        }
    }
}

/// `Catch [name As Type] [When filter]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchStatement<'ast> {
    pub name: Option<SimpleName<'ast>>,
    pub exception_type: Option<TypeName<'ast>>,
    pub filter: Option<Expression<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchBlockStatement<'ast> {
    pub header: &'ast CatchStatement<'ast>,
    pub body: StatementList<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinallyBlockStatement<'ast> {
    pub finally_span: Span,
    pub body: StatementList<'ast>,
    pub span: Span,
}

/// `Select [Case] expression`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectBlockStatement<'ast> {
    pub case_keyword: Option<Location>,
    pub expression: Expression<'ast>,
    /// Statements before the first `Case`, which are reported.
    pub leading: StatementList<'ast>,
    pub cases: &'ast [CaseBlockStatement<'ast>],
    pub end: Option<EndBlock>,
    pub span: Span,
}

impl<'ast> SelectBlockStatement<'ast> {
    pub fn case_else(&self) -> Option<&'ast CaseBlockStatement<'ast>> {
        self.cases.iter().find(|block| block.is_else())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaseHeader<'ast> {
    Case(&'ast CaseStatement<'ast>),
    /// The span of `Case Else`
    Else(Span),
}

impl CaseHeader<'_> {
    pub fn span(&self) -> Span {
        match self {
            Self::Case(s) => s.span,
            Self::Else(span) => *span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaseBlockStatement<'ast> {
    pub header: CaseHeader<'ast>,
    pub body: StatementList<'ast>,
    pub span: Span,
}

impl CaseBlockStatement<'_> {
    #[inline]
    pub fn is_else(&self) -> bool {
        matches!(self.header, CaseHeader::Else(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaseStatement<'ast> {
    pub clauses: CommaList<'ast, CaseClause<'ast>>,
    pub span: Span,
}

/// One clause of a `Case` statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaseClause<'ast> {
    /// `Case value`
    Expression(Expression<'ast>),
    /// `Case lower To upper`
    Range {
        lower: Expression<'ast>,
        to: Location,
        upper: Expression<'ast>,
        span: Span,
    },
    /// `Case [Is] < value`
    Relational {
        is_keyword: Option<Location>,
        op: BinaryOperator,
        operand: Expression<'ast>,
        span: Span,
    },
}

impl CaseClause<'_> {
    pub fn span(&self) -> Span {
        match self {
            Self::Expression(e) => e.span(),
            Self::Range { span, .. } | Self::Relational { span, .. } => *span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_kind_tokens() {
        assert_eq!(BlockKind::from_end_token(TokenKind::If), Some(BlockKind::If));
        assert_eq!(BlockKind::from_end_token(TokenKind::Do), None);
        assert_eq!(BlockKind::from_exit_token(TokenKind::Do), Some(BlockKind::Do));
        assert_eq!(BlockKind::from_exit_token(TokenKind::If), None);
        assert_eq!(
            BlockKind::from_continue_token(TokenKind::While),
            Some(BlockKind::While)
        );
        assert_eq!(BlockKind::from_continue_token(TokenKind::Sub), None);
        assert_eq!(BlockKind::SyncLock.to_string(), "SyncLock");
    }

    #[test]
    fn statement_span() {
        let span = Span::point(vbsyntax_core::Location::new(2, 1, 3));
        assert_eq!(Statement::Else(span).span(), span);
        assert!(Statement::Bad(span).is_bad());
        let end = EndBlock {
            kind: BlockKind::If,
            span,
        };
        assert_eq!(Statement::EndBlock(end).span(), span);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn keyword_statement_checks_type() {
        let _ = KeywordStatement::new(TreeType::ReturnStatement, Span::default());
    }
}
