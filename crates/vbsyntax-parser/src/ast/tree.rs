//! Node type tags and uniform tree traversal.
//!
//! Every node has a [`TreeType`] tag. Tags are grouped in numeric ranges by
//! category, so `is_expression`, `is_statement` and friends are range
//! checks.
//!
//! [`NodeRef`] is a borrowed handle to any node in an arena-allocated tree.
//! It exposes the node's span, tag and children in source order, which is
//! all [`walk`] and [`ParentMap`] need. Nodes do not store parent links;
//! build a [`ParentMap`] when ancestry is needed.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use rustc_hash::FxHashMap;
use vbsyntax_core::Span;

use crate::ast::decl::{
    Attribute, AttributeBlock, Declaration, HandlesItem, ImportsClause, Parameter, ParameterList,
    ReturnType, VariableDeclarator,
};
use crate::ast::expr::{AggregateInitializer, Expression, Initializer};
use crate::ast::list::{ArgumentList, Argument, DeclarationList, StatementList};
use crate::ast::names::{Label, Name, SimpleName, VariableName};
use crate::ast::stmt::{
    CaseBlockStatement, CaseClause, CaseHeader, CatchBlockStatement, CatchStatement,
    ElseBlockStatement, ElseIfBlockStatement, FinallyBlockStatement, ForControl, IfPart,
    OnErrorKind, ResumeKind, Statement, TryPart, UsingResource,
};
use crate::ast::types::{
    ArrayBound, ArrayBounds, Constraint, TypeArgumentList, TypeName, TypeParameter,
    TypeParameterList,
};
use crate::ast::{File, ScriptBlock};

const NAME_BASE: u16 = 100;
const TYPE_BASE: u16 = 200;
const EXPRESSION_BASE: u16 = 300;
const STATEMENT_BASE: u16 = 500;
const DECLARATION_BASE: u16 = 700;

/// The syntactic kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum TreeType {
    // Roots and shared pieces
    File = 0,
    ScriptBlock,
    Argument,
    AggregateInitializer,
    VariableDeclarator,
    Parameter,
    TypeParameter,
    Constraint,
    ArrayBound,
    Attribute,
    ImportsClause,
    HandlesItem,
    CaseValueClause,
    CaseRangeClause,
    CaseRelationalClause,
    ElseIfBlock,
    ElseBlock,
    CaseBlock,
    CatchBlock,
    FinallyBlock,

    // Names
    SimpleName = NAME_BASE,
    QualifiedName,
    GlobalNamespaceName,
    SpecialName,
    VariableName,

    // Types
    IntrinsicType = TYPE_BASE,
    NamedType,
    ConstructedType,
    ArrayType,
    BadType,

    // Expressions
    BooleanLiteralExpression = EXPRESSION_BASE,
    IntegerLiteralExpression,
    FloatingPointLiteralExpression,
    DecimalLiteralExpression,
    CharacterLiteralExpression,
    StringLiteralExpression,
    DateLiteralExpression,
    SimpleNameExpression,
    QualifiedExpression,
    DictionaryLookupExpression,
    CallOrIndexExpression,
    MeExpression,
    MyClassExpression,
    MyBaseExpression,
    GlobalExpression,
    NothingExpression,
    ParenthesizedExpression,
    UnaryOperatorExpression,
    BinaryOperatorExpression,
    TypeOfExpression,
    GetTypeExpression,
    CTypeExpression,
    DirectCastExpression,
    TryCastExpression,
    IntrinsicCastExpression,
    NewExpression,
    NewAggregateExpression,
    AddressOfExpression,
    BadExpression,

    // Statements
    AssignmentStatement = STATEMENT_BASE,
    CompoundAssignmentStatement,
    MidAssignmentStatement,
    CallStatement,
    LocalDeclarationStatement,
    LabelStatement,
    GoToStatement,
    ExitStatement,
    ContinueStatement,
    StopStatement,
    EndStatement,
    ReturnStatement,
    ThrowStatement,
    ErrorStatement,
    RaiseEventStatement,
    AddHandlerStatement,
    RemoveHandlerStatement,
    OnErrorStatement,
    ResumeStatement,
    ReDimStatement,
    EraseStatement,
    IfBlockStatement,
    LineIfStatement,
    DoBlockStatement,
    ForBlockStatement,
    ForEachBlockStatement,
    WhileBlockStatement,
    WithBlockStatement,
    SyncLockBlockStatement,
    UsingBlockStatement,
    TryBlockStatement,
    SelectBlockStatement,
    EndBlockStatement,
    LoopStatement,
    NextStatement,
    ElseIfStatement,
    ElseStatement,
    CaseStatement,
    CaseElseStatement,
    CatchStatement,
    FinallyStatement,
    BadStatement,

    // Declarations
    OptionDeclaration = DECLARATION_BASE,
    ImportsDeclaration,
    AttributeDeclaration,
    NamespaceDeclaration,
    ClassDeclaration,
    StructureDeclaration,
    ModuleDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    EnumValueDeclaration,
    InheritsDeclaration,
    ImplementsDeclaration,
    VariableListDeclaration,
    SubDeclaration,
    FunctionDeclaration,
    ConstructorDeclaration,
    OperatorDeclaration,
    ExternalSubDeclaration,
    ExternalFunctionDeclaration,
    DelegateSubDeclaration,
    DelegateFunctionDeclaration,
    EventDeclaration,
    CustomEventDeclaration,
    PropertyDeclaration,
    GetAccessorDeclaration,
    SetAccessorDeclaration,
    AddHandlerAccessorDeclaration,
    RemoveHandlerAccessorDeclaration,
    RaiseEventAccessorDeclaration,
    EndBlockDeclaration,
    BadDeclaration,
}

impl TreeType {
    #[inline]
    fn code(self) -> u16 {
        self.into()
    }

    pub fn is_name(self) -> bool {
        (NAME_BASE..TYPE_BASE).contains(&self.code())
    }

    pub fn is_type(self) -> bool {
        (TYPE_BASE..EXPRESSION_BASE).contains(&self.code())
    }

    pub fn is_expression(self) -> bool {
        (EXPRESSION_BASE..STATEMENT_BASE).contains(&self.code())
    }

    pub fn is_statement(self) -> bool {
        (STATEMENT_BASE..DECLARATION_BASE).contains(&self.code())
    }

    pub fn is_declaration(self) -> bool {
        self.code() >= DECLARATION_BASE
    }

    /// Whether this tag marks a placeholder for unparsable input.
    pub fn is_bad(self) -> bool {
        matches!(
            self,
            TreeType::BadType
                | TreeType::BadExpression
                | TreeType::BadStatement
                | TreeType::BadDeclaration
        )
    }
}

// ============================================================================
// Tags for the node enums
// ============================================================================

impl Name<'_> {
    pub fn tree_type(&self) -> TreeType {
        match self {
            Self::Simple(_) => TreeType::SimpleName,
            Self::Qualified(_) => TreeType::QualifiedName,
            Self::Global(_) => TreeType::GlobalNamespaceName,
            Self::Special(_) => TreeType::SpecialName,
        }
    }
}

impl TypeName<'_> {
    pub fn tree_type(&self) -> TreeType {
        match self {
            Self::Intrinsic(_) => TreeType::IntrinsicType,
            Self::Named(_) => TreeType::NamedType,
            Self::Constructed(_) => TreeType::ConstructedType,
            Self::Array(_) => TreeType::ArrayType,
            Self::Bad(_) => TreeType::BadType,
        }
    }
}

impl Expression<'_> {
    pub fn tree_type(&self) -> TreeType {
        match self {
            Self::Literal(e) => e.value.tree_type(),
            Self::SimpleName(_) => TreeType::SimpleNameExpression,
            Self::Qualified(_) => TreeType::QualifiedExpression,
            Self::DictionaryLookup(_) => TreeType::DictionaryLookupExpression,
            Self::CallOrIndex(_) => TreeType::CallOrIndexExpression,
            Self::Instance(e) => e.tree_type,
            Self::Global(_) => TreeType::GlobalExpression,
            Self::Nothing(_) => TreeType::NothingExpression,
            Self::Parenthesized(_) => TreeType::ParenthesizedExpression,
            Self::Unary(_) => TreeType::UnaryOperatorExpression,
            Self::Binary(_) => TreeType::BinaryOperatorExpression,
            Self::TypeOf(_) => TreeType::TypeOfExpression,
            Self::GetType(_) => TreeType::GetTypeExpression,
            Self::Cast(e) => e.tree_type,
            Self::IntrinsicCast(_) => TreeType::IntrinsicCastExpression,
            Self::New(_) => TreeType::NewExpression,
            Self::NewAggregate(_) => TreeType::NewAggregateExpression,
            Self::AddressOf(_) => TreeType::AddressOfExpression,
            Self::Bad(_) => TreeType::BadExpression,
        }
    }
}

impl Statement<'_> {
    pub fn tree_type(&self) -> TreeType {
        match self {
            Self::Assignment(_) => TreeType::AssignmentStatement,
            Self::CompoundAssignment(_) => TreeType::CompoundAssignmentStatement,
            Self::MidAssignment(_) => TreeType::MidAssignmentStatement,
            Self::Call(_) => TreeType::CallStatement,
            Self::LocalDeclaration(_) => TreeType::LocalDeclarationStatement,
            Self::Label(_) => TreeType::LabelStatement,
            Self::GoTo(_) => TreeType::GoToStatement,
            Self::Exit(_) => TreeType::ExitStatement,
            Self::Continue(_) => TreeType::ContinueStatement,
            Self::Keyword(s) => s.tree_type,
            Self::Return(s) | Self::Throw(s) | Self::Error(s) => s.tree_type,
            Self::RaiseEvent(_) => TreeType::RaiseEventStatement,
            Self::Handler(s) => s.tree_type,
            Self::OnError(_) => TreeType::OnErrorStatement,
            Self::Resume(_) => TreeType::ResumeStatement,
            Self::ReDim(_) => TreeType::ReDimStatement,
            Self::Erase(_) => TreeType::EraseStatement,
            Self::If(_) => TreeType::IfBlockStatement,
            Self::LineIf(_) => TreeType::LineIfStatement,
            Self::Do(_) => TreeType::DoBlockStatement,
            Self::For(_) => TreeType::ForBlockStatement,
            Self::ForEach(_) => TreeType::ForEachBlockStatement,
            Self::While(_) => TreeType::WhileBlockStatement,
            Self::ExpressionBlock(s) => s.tree_type,
            Self::Using(_) => TreeType::UsingBlockStatement,
            Self::Try(_) => TreeType::TryBlockStatement,
            Self::Select(_) => TreeType::SelectBlockStatement,
            Self::EndBlock(_) => TreeType::EndBlockStatement,
            Self::Loop(_) => TreeType::LoopStatement,
            Self::Next(_) => TreeType::NextStatement,
            Self::ElseIf(_) => TreeType::ElseIfStatement,
            Self::Else(_) => TreeType::ElseStatement,
            Self::Case(_) => TreeType::CaseStatement,
            Self::CaseElse(_) => TreeType::CaseElseStatement,
            Self::Catch(_) => TreeType::CatchStatement,
            Self::Finally(_) => TreeType::FinallyStatement,
            Self::Declaration(d) => d.tree_type(),
            Self::Bad(_) => TreeType::BadStatement,
        }
    }
}

// ============================================================================
// NodeRef
// ============================================================================

/// A borrowed reference to any node of a tree.
///
/// Wrapper variants that only hold another node (a statement holding a
/// declaration, a simple `Name`, an expression initializer) are never
/// produced as children; the wrapped node is produced instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'ast> {
    File(&'ast File<'ast>),
    ScriptBlock(&'ast ScriptBlock<'ast>),
    Declaration(&'ast Declaration<'ast>),
    Statement(&'ast Statement<'ast>),
    Expression(&'ast Expression<'ast>),
    TypeName(&'ast TypeName<'ast>),
    Name(&'ast Name<'ast>),
    SimpleName(&'ast SimpleName<'ast>),
    VariableName(&'ast VariableName<'ast>),
    Argument(&'ast Argument<'ast>),
    AggregateInitializer(&'ast AggregateInitializer<'ast>),
    VariableDeclarator(&'ast VariableDeclarator<'ast>),
    Parameter(&'ast Parameter<'ast>),
    TypeParameter(&'ast TypeParameter<'ast>),
    Constraint(&'ast Constraint<'ast>),
    ArrayBound(&'ast ArrayBound<'ast>),
    Attribute(&'ast Attribute<'ast>),
    ImportsClause(&'ast ImportsClause<'ast>),
    HandlesItem(&'ast HandlesItem<'ast>),
    CaseClause(&'ast CaseClause<'ast>),
    ElseIfBlock(&'ast ElseIfBlockStatement<'ast>),
    ElseBlock(&'ast ElseBlockStatement<'ast>),
    CaseBlock(&'ast CaseBlockStatement<'ast>),
    CatchBlock(&'ast CatchBlockStatement<'ast>),
    FinallyBlock(&'ast FinallyBlockStatement<'ast>),
}

impl<'ast> NodeRef<'ast> {
    pub fn span(self) -> Span {
        match self {
            Self::File(n) => n.span,
            Self::ScriptBlock(n) => n.span,
            Self::Declaration(n) => n.span(),
            Self::Statement(n) => n.span(),
            Self::Expression(n) => n.span(),
            Self::TypeName(n) => n.span(),
            Self::Name(n) => n.span(),
            Self::SimpleName(n) => n.span,
            Self::VariableName(n) => n.span,
            Self::Argument(n) => n.span,
            Self::AggregateInitializer(n) => n.span,
            Self::VariableDeclarator(n) => n.span,
            Self::Parameter(n) => n.span,
            Self::TypeParameter(n) => n.span,
            Self::Constraint(n) => n.span(),
            Self::ArrayBound(n) => n.span,
            Self::Attribute(n) => n.span,
            Self::ImportsClause(n) => n.span,
            Self::HandlesItem(n) => n.span,
            Self::CaseClause(n) => n.span(),
            Self::ElseIfBlock(n) => n.span,
            Self::ElseBlock(n) => n.span,
            Self::CaseBlock(n) => n.span,
            Self::CatchBlock(n) => n.span,
            Self::FinallyBlock(n) => n.span,
        }
    }

    pub fn tree_type(self) -> TreeType {
        match self {
            Self::File(_) => TreeType::File,
            Self::ScriptBlock(_) => TreeType::ScriptBlock,
            Self::Declaration(n) => n.tree_type(),
            Self::Statement(n) => n.tree_type(),
            Self::Expression(n) => n.tree_type(),
            Self::TypeName(n) => n.tree_type(),
            Self::Name(n) => n.tree_type(),
            Self::SimpleName(_) => TreeType::SimpleName,
            Self::VariableName(_) => TreeType::VariableName,
            Self::Argument(_) => TreeType::Argument,
            Self::AggregateInitializer(_) => TreeType::AggregateInitializer,
            Self::VariableDeclarator(_) => TreeType::VariableDeclarator,
            Self::Parameter(_) => TreeType::Parameter,
            Self::TypeParameter(_) => TreeType::TypeParameter,
            Self::Constraint(_) => TreeType::Constraint,
            Self::ArrayBound(_) => TreeType::ArrayBound,
            Self::Attribute(_) => TreeType::Attribute,
            Self::ImportsClause(_) => TreeType::ImportsClause,
            Self::HandlesItem(_) => TreeType::HandlesItem,
            Self::CaseClause(n) => match n {
                CaseClause::Expression(_) => TreeType::CaseValueClause,
                CaseClause::Range { .. } => TreeType::CaseRangeClause,
                CaseClause::Relational { .. } => TreeType::CaseRelationalClause,
            },
            Self::ElseIfBlock(_) => TreeType::ElseIfBlock,
            Self::ElseBlock(_) => TreeType::ElseBlock,
            Self::CaseBlock(_) => TreeType::CaseBlock,
            Self::CatchBlock(_) => TreeType::CatchBlock,
            Self::FinallyBlock(_) => TreeType::FinallyBlock,
        }
    }

    /// Whether the node is a placeholder for unparsable input.
    pub fn is_bad(self) -> bool {
        match self {
            Self::SimpleName(n) => n.is_bad(),
            _ => self.tree_type().is_bad(),
        }
    }

    fn address(self) -> usize {
        fn addr<T>(r: &T) -> usize {
            r as *const T as usize
        }
        match self {
            Self::File(n) => addr(n),
            Self::ScriptBlock(n) => addr(n),
            Self::Declaration(n) => addr(n),
            Self::Statement(n) => addr(n),
            Self::Expression(n) => addr(n),
            Self::TypeName(n) => addr(n),
            Self::Name(n) => addr(n),
            Self::SimpleName(n) => addr(n),
            Self::VariableName(n) => addr(n),
            Self::Argument(n) => addr(n),
            Self::AggregateInitializer(n) => addr(n),
            Self::VariableDeclarator(n) => addr(n),
            Self::Parameter(n) => addr(n),
            Self::TypeParameter(n) => addr(n),
            Self::Constraint(n) => addr(n),
            Self::ArrayBound(n) => addr(n),
            Self::Attribute(n) => addr(n),
            Self::ImportsClause(n) => addr(n),
            Self::HandlesItem(n) => addr(n),
            Self::CaseClause(n) => addr(n),
            Self::ElseIfBlock(n) => addr(n),
            Self::ElseBlock(n) => addr(n),
            Self::CaseBlock(n) => addr(n),
            Self::CatchBlock(n) => addr(n),
            Self::FinallyBlock(n) => addr(n),
        }
    }

    /// Identity of the node within its tree.
    #[inline]
    fn key(self) -> (usize, TreeType) {
        (self.address(), self.tree_type())
    }

    /// Whether both handles refer to the same node.
    pub fn same_node(self, other: NodeRef<'_>) -> bool {
        self.key() == other.key()
    }

    /// The node's children, in source order.
    pub fn children(self) -> Vec<NodeRef<'ast>> {
        let mut out = Children(Vec::new());
        match self {
            Self::File(n) => out.declarations(&n.declarations),
            Self::ScriptBlock(n) => out.statements(&n.statements),
            Self::Declaration(n) => out.declaration(n),
            Self::Statement(n) => out.statement(n),
            Self::Expression(n) => out.expression_children(n),
            Self::TypeName(n) => out.type_name_children(n),
            Self::Name(n) => {
                if let Name::Qualified(q) = n {
                    out.name(&q.qualifier);
                    out.simple(&q.name);
                }
            }
            Self::SimpleName(_) => {}
            Self::VariableName(n) => {
                out.simple(&n.name);
                if let Some(bounds) = n.array {
                    out.array_bounds(bounds);
                }
            }
            Self::Argument(n) => {
                if let Some(name) = &n.name {
                    out.simple(name);
                }
                out.opt_expr(&n.value);
            }
            Self::AggregateInitializer(n) => {
                for element in n.elements.items {
                    out.initializer(element);
                }
            }
            Self::VariableDeclarator(n) => {
                for name in n.names.items {
                    out.push(NodeRef::VariableName(name));
                }
                if let Some(as_clause) = &n.as_clause {
                    out.type_name(&as_clause.type_name);
                    if let Some(args) = &as_clause.arguments {
                        out.arguments(args);
                    }
                }
                if let Some(init) = &n.initializer {
                    out.initializer(init);
                }
            }
            Self::Parameter(n) => {
                out.attribute_blocks(n.attributes);
                out.push(NodeRef::VariableName(&n.name));
                if let Some(t) = &n.as_type {
                    out.type_name(t);
                }
                out.opt_expr(&n.default);
            }
            Self::TypeParameter(n) => {
                out.simple(&n.name);
                if let Some(constraints) = n.constraints {
                    for c in constraints.constraints.items {
                        out.push(NodeRef::Constraint(c));
                    }
                }
            }
            Self::Constraint(n) => {
                if let Constraint::Type(t) = n {
                    out.type_name(t);
                }
            }
            Self::ArrayBound(n) => {
                out.opt_expr(&n.lower);
                out.expr(&n.upper);
            }
            Self::Attribute(n) => {
                out.name(&n.name);
                if let Some(args) = &n.arguments {
                    out.arguments(args);
                }
            }
            Self::ImportsClause(n) => {
                if let Some(alias) = &n.alias {
                    out.simple(alias);
                }
                out.type_name(&n.target);
            }
            Self::HandlesItem(n) => {
                out.name(&n.source);
                out.simple(&n.event);
            }
            Self::CaseClause(n) => match n {
                CaseClause::Expression(e) => out.expr(e),
                CaseClause::Range { lower, upper, .. } => {
                    out.expr(lower);
                    out.expr(upper);
                }
                CaseClause::Relational { operand, .. } => out.expr(operand),
            },
            Self::ElseIfBlock(n) => {
                out.expr(&n.header.condition);
                out.statements(&n.body);
            }
            Self::ElseBlock(n) => out.statements(&n.body),
            Self::CaseBlock(n) => {
                if let CaseHeader::Case(case) = &n.header {
                    for clause in case.clauses.items {
                        out.push(NodeRef::CaseClause(clause));
                    }
                }
                out.statements(&n.body);
            }
            Self::CatchBlock(n) => {
                out.catch_header(n.header);
                out.statements(&n.body);
            }
            Self::FinallyBlock(n) => out.statements(&n.body),
        }
        out.0
    }
}

impl<'ast> From<&'ast File<'ast>> for NodeRef<'ast> {
    fn from(node: &'ast File<'ast>) -> Self {
        NodeRef::File(node)
    }
}

impl<'ast> From<&'ast ScriptBlock<'ast>> for NodeRef<'ast> {
    fn from(node: &'ast ScriptBlock<'ast>) -> Self {
        NodeRef::ScriptBlock(node)
    }
}

impl<'ast> From<&'ast Declaration<'ast>> for NodeRef<'ast> {
    fn from(node: &'ast Declaration<'ast>) -> Self {
        NodeRef::Declaration(node)
    }
}

impl<'ast> From<&'ast Statement<'ast>> for NodeRef<'ast> {
    fn from(node: &'ast Statement<'ast>) -> Self {
        match node {
            Statement::Declaration(d) => NodeRef::Declaration(d),
            _ => NodeRef::Statement(node),
        }
    }
}

impl<'ast> From<&'ast Expression<'ast>> for NodeRef<'ast> {
    fn from(node: &'ast Expression<'ast>) -> Self {
        NodeRef::Expression(node)
    }
}

impl<'ast> From<&'ast TypeName<'ast>> for NodeRef<'ast> {
    fn from(node: &'ast TypeName<'ast>) -> Self {
        NodeRef::TypeName(node)
    }
}

/// Child collector.
struct Children<'ast>(Vec<NodeRef<'ast>>);

impl<'ast> Children<'ast> {
    #[inline]
    fn push(&mut self, node: NodeRef<'ast>) {
        self.0.push(node);
    }

    fn expr(&mut self, e: &'ast Expression<'ast>) {
        self.push(NodeRef::Expression(e));
    }

    fn opt_expr(&mut self, e: &'ast Option<Expression<'ast>>) {
        if let Some(e) = e {
            self.expr(e);
        }
    }

    fn simple(&mut self, n: &'ast SimpleName<'ast>) {
        self.push(NodeRef::SimpleName(n));
    }

    fn name(&mut self, n: &'ast Name<'ast>) {
        match n {
            Name::Simple(s) => self.simple(s),
            _ => self.push(NodeRef::Name(n)),
        }
    }

    fn label(&mut self, label: &'ast Label<'ast>) {
        if let Label::Name(n) = label {
            self.simple(n);
        }
    }

    fn type_name(&mut self, t: &'ast TypeName<'ast>) {
        self.push(NodeRef::TypeName(t));
    }

    fn opt_type_name(&mut self, t: &'ast Option<TypeName<'ast>>) {
        if let Some(t) = t {
            self.type_name(t);
        }
    }

    fn type_arguments(&mut self, args: &'ast Option<TypeArgumentList<'ast>>) {
        if let Some(args) = args {
            for t in args.arguments.items {
                self.type_name(t);
            }
        }
    }

    fn type_parameters(&mut self, params: &'ast Option<TypeParameterList<'ast>>) {
        if let Some(params) = params {
            for p in params.parameters.items {
                self.push(NodeRef::TypeParameter(p));
            }
        }
    }

    fn array_bounds(&mut self, bounds: &'ast ArrayBounds<'ast>) {
        for bound in bounds.bounds.items {
            self.push(NodeRef::ArrayBound(bound));
        }
    }

    fn arguments(&mut self, args: &'ast ArgumentList<'ast>) {
        for arg in args.arguments.items {
            self.push(NodeRef::Argument(arg));
        }
    }

    fn opt_arguments(&mut self, args: &'ast Option<ArgumentList<'ast>>) {
        if let Some(args) = args {
            self.arguments(args);
        }
    }

    fn initializer(&mut self, init: &'ast Initializer<'ast>) {
        match init {
            Initializer::Expression(e) => self.expr(e),
            Initializer::Aggregate(a) => self.push(NodeRef::AggregateInitializer(a)),
        }
    }

    fn declarators(&mut self, declarators: &'ast [VariableDeclarator<'ast>]) {
        for d in declarators {
            self.push(NodeRef::VariableDeclarator(d));
        }
    }

    fn attribute_blocks(&mut self, blocks: &'ast [AttributeBlock<'ast>]) {
        for block in blocks {
            for attribute in block.attributes.items {
                self.push(NodeRef::Attribute(attribute));
            }
        }
    }

    fn parameters(&mut self, params: &'ast Option<ParameterList<'ast>>) {
        if let Some(params) = params {
            for p in params.parameters.items {
                self.push(NodeRef::Parameter(p));
            }
        }
    }

    fn return_type(&mut self, ret: &'ast Option<ReturnType<'ast>>) {
        if let Some(ret) = ret {
            self.attribute_blocks(ret.attributes);
            self.type_name(&ret.type_name);
        }
    }

    fn implements(&mut self, clause: &'ast Option<crate::ast::decl::ImplementsClause<'ast>>) {
        if let Some(clause) = clause {
            for member in clause.members.items {
                self.name(member);
            }
        }
    }

    fn statements(&mut self, list: &'ast StatementList<'ast>) {
        for s in list.statements {
            self.push(NodeRef::from(s));
        }
    }

    fn declarations(&mut self, list: &'ast DeclarationList<'ast>) {
        for d in list.declarations {
            self.push(NodeRef::Declaration(d));
        }
    }

    fn catch_header(&mut self, header: &'ast CatchStatement<'ast>) {
        if let Some(name) = &header.name {
            self.simple(name);
        }
        self.opt_type_name(&header.exception_type);
        self.opt_expr(&header.filter);
    }

    fn for_control(&mut self, control: &'ast ForControl<'ast>) {
        match control {
            ForControl::Expression(e) => self.expr(e),
            ForControl::Declarator(d) => self.push(NodeRef::VariableDeclarator(d)),
        }
    }

    fn expression_children(&mut self, e: &'ast Expression<'ast>) {
        match e {
            Expression::Literal(_)
            | Expression::Instance(_)
            | Expression::Global(_)
            | Expression::Nothing(_)
            | Expression::Bad(_) => {}
            Expression::SimpleName(n) => {
                self.simple(&n.name);
                self.type_arguments(&n.type_arguments);
            }
            Expression::Qualified(q) => {
                self.opt_expr(&q.qualifier);
                self.simple(&q.name);
                self.type_arguments(&q.type_arguments);
            }
            Expression::DictionaryLookup(d) => {
                self.opt_expr(&d.qualifier);
                self.simple(&d.name);
            }
            Expression::CallOrIndex(c) => {
                self.expr(&c.target);
                self.arguments(&c.arguments);
            }
            Expression::Parenthesized(p) => self.expr(&p.operand),
            Expression::Unary(u) => self.expr(&u.operand),
            Expression::Binary(b) => {
                self.expr(&b.left);
                self.expr(&b.right);
            }
            Expression::TypeOf(t) => {
                self.expr(&t.operand);
                self.type_name(&t.type_name);
            }
            Expression::GetType(g) => self.type_name(&g.type_name),
            Expression::Cast(c) => {
                self.expr(&c.operand);
                self.type_name(&c.type_name);
            }
            Expression::IntrinsicCast(c) => self.expr(&c.operand),
            Expression::New(n) => {
                self.type_name(&n.type_name);
                self.opt_arguments(&n.arguments);
            }
            Expression::NewAggregate(n) => {
                self.type_name(&n.array_type);
                self.push(NodeRef::AggregateInitializer(n.initializer));
            }
            Expression::AddressOf(a) => self.expr(&a.operand),
        }
    }

    fn type_name_children(&mut self, t: &'ast TypeName<'ast>) {
        match t {
            TypeName::Intrinsic(_) | TypeName::Bad(_) => {}
            TypeName::Named(n) => self.name(&n.name),
            TypeName::Constructed(c) => {
                self.name(&c.name);
                for arg in c.arguments.arguments.items {
                    self.type_name(arg);
                }
            }
            TypeName::Array(a) => {
                self.type_name(&a.element);
                if let Some(bounds) = a.bounds {
                    self.array_bounds(bounds);
                }
            }
        }
    }

    fn statement(&mut self, s: &'ast Statement<'ast>) {
        match s {
            Statement::Assignment(a) => {
                self.expr(&a.target);
                self.expr(&a.source);
            }
            Statement::CompoundAssignment(a) => {
                self.expr(&a.target);
                self.expr(&a.source);
            }
            Statement::MidAssignment(m) => {
                self.expr(&m.target);
                self.expr(&m.start);
                self.opt_expr(&m.length);
                self.expr(&m.source);
            }
            Statement::Call(c) => {
                self.expr(&c.target);
                self.opt_arguments(&c.arguments);
            }
            Statement::LocalDeclaration(d) => self.declarators(d.declarators.items),
            Statement::Label(l) => self.label(&l.label),
            Statement::GoTo(g) => self.label(&g.label),
            Statement::Exit(_)
            | Statement::Continue(_)
            | Statement::Keyword(_)
            | Statement::EndBlock(_)
            | Statement::Else(_)
            | Statement::CaseElse(_)
            | Statement::Finally(_)
            | Statement::Bad(_) => {}
            Statement::Return(e) | Statement::Throw(e) | Statement::Error(e) => {
                self.opt_expr(&e.operand)
            }
            Statement::RaiseEvent(r) => {
                self.simple(&r.name);
                self.opt_arguments(&r.arguments);
            }
            Statement::Handler(h) => {
                self.expr(&h.event);
                self.expr(&h.handler);
            }
            Statement::OnError(o) => {
                if let OnErrorKind::GoToLabel(label) = &o.kind {
                    self.label(label);
                }
            }
            Statement::Resume(r) => {
                if let ResumeKind::Label(label) = &r.kind {
                    self.label(label);
                }
            }
            Statement::ReDim(r) => {
                for v in r.variables.items {
                    self.expr(v);
                }
            }
            Statement::Erase(e) => {
                for v in e.variables.items {
                    self.expr(v);
                }
            }
            Statement::If(i) => {
                self.expr(&i.condition);
                self.statements(&i.body);
                for part in i.parts {
                    match part {
                        IfPart::ElseIf(b) => self.push(NodeRef::ElseIfBlock(b)),
                        IfPart::Else(b) => self.push(NodeRef::ElseBlock(b)),
                    }
                }
            }
            Statement::LineIf(i) => {
                self.expr(&i.condition);
                self.statements(&i.statements);
                if let Some(else_statements) = &i.else_statements {
                    self.statements(else_statements);
                }
            }
            Statement::Do(d) => {
                if let Some(c) = &d.condition {
                    self.expr(&c.condition);
                }
                self.statements(&d.body);
                if let Some(end) = d.end
                    && let Some(c) = &end.condition
                {
                    self.expr(&c.condition);
                }
            }
            Statement::For(f) => {
                self.for_control(&f.control);
                self.expr(&f.lower);
                self.expr(&f.upper);
                self.opt_expr(&f.step);
                self.statements(&f.body);
                if let Some(v) = f.next_variable {
                    self.expr(v);
                }
            }
            Statement::ForEach(f) => {
                self.for_control(&f.control);
                self.expr(&f.collection);
                self.statements(&f.body);
                if let Some(v) = f.next_variable {
                    self.expr(v);
                }
            }
            Statement::While(w) => {
                self.expr(&w.condition);
                self.statements(&w.body);
            }
            Statement::ExpressionBlock(b) => {
                self.expr(&b.expression);
                self.statements(&b.body);
            }
            Statement::Using(u) => {
                match &u.resource {
                    UsingResource::Expression(e) => self.expr(e),
                    UsingResource::Declarators(d) => self.declarators(d.items),
                }
                self.statements(&u.body);
            }
            Statement::Try(t) => {
                self.statements(&t.body);
                for part in t.parts {
                    match part {
                        TryPart::Catch(b) => self.push(NodeRef::CatchBlock(b)),
                        TryPart::Finally(b) => self.push(NodeRef::FinallyBlock(b)),
                    }
                }
            }
            Statement::Select(s) => {
                self.expr(&s.expression);
                self.statements(&s.leading);
                for case in s.cases {
                    self.push(NodeRef::CaseBlock(case));
                }
            }
            Statement::Loop(l) => {
                if let Some(c) = &l.condition {
                    self.expr(&c.condition);
                }
            }
            Statement::Next(n) => {
                for v in n.variables.items {
                    self.expr(v);
                }
            }
            Statement::ElseIf(e) => self.expr(&e.condition),
            Statement::Case(c) => {
                for clause in c.clauses.items {
                    self.push(NodeRef::CaseClause(clause));
                }
            }
            Statement::Catch(c) => self.catch_header(c),
            Statement::Declaration(d) => self.declaration(d),
        }
    }

    fn declaration(&mut self, d: &'ast Declaration<'ast>) {
        match d {
            Declaration::Option(_) | Declaration::EndBlock(_) | Declaration::Bad(_) => {}
            Declaration::Imports(i) => {
                for clause in i.clauses.items {
                    self.push(NodeRef::ImportsClause(clause));
                }
            }
            Declaration::Attribute(a) => self.attribute_blocks(a.blocks),
            Declaration::Namespace(n) => {
                self.name(&n.name);
                self.declarations(&n.members);
            }
            Declaration::Type(t) => {
                self.attribute_blocks(t.attributes);
                self.simple(&t.name);
                self.type_parameters(&t.type_parameters);
                self.declarations(&t.members);
            }
            Declaration::Enum(e) => {
                self.attribute_blocks(e.attributes);
                self.simple(&e.name);
                self.opt_type_name(&e.underlying);
                self.declarations(&e.members);
            }
            Declaration::EnumValue(v) => {
                self.attribute_blocks(v.attributes);
                self.simple(&v.name);
                self.opt_expr(&v.value);
            }
            Declaration::TypeList(t) => {
                for ty in t.types.items {
                    self.type_name(ty);
                }
            }
            Declaration::Variables(v) => {
                self.attribute_blocks(v.attributes);
                self.declarators(v.declarators.items);
            }
            Declaration::Method(m) => {
                self.attribute_blocks(m.attributes);
                self.simple(&m.name);
                self.type_parameters(&m.type_parameters);
                self.parameters(&m.parameters);
                self.return_type(&m.return_type);
                if let Some(handles) = &m.handles {
                    for item in handles.events.items {
                        self.push(NodeRef::HandlesItem(item));
                    }
                }
                self.implements(&m.implements);
                if let Some(body) = &m.body {
                    self.statements(body);
                }
            }
            Declaration::Operator(o) => {
                self.attribute_blocks(o.attributes);
                self.parameters(&o.parameters);
                self.return_type(&o.return_type);
                self.statements(&o.body);
            }
            Declaration::External(e) => {
                self.attribute_blocks(e.attributes);
                self.simple(&e.name);
                self.parameters(&e.parameters);
                self.return_type(&e.return_type);
            }
            Declaration::Delegate(d) => {
                self.attribute_blocks(d.attributes);
                self.simple(&d.name);
                self.type_parameters(&d.type_parameters);
                self.parameters(&d.parameters);
                self.return_type(&d.return_type);
            }
            Declaration::Event(e) => {
                self.attribute_blocks(e.attributes);
                self.simple(&e.name);
                self.parameters(&e.parameters);
                self.opt_type_name(&e.as_type);
                self.implements(&e.implements);
            }
            Declaration::CustomEvent(e) => {
                self.attribute_blocks(e.attributes);
                self.simple(&e.name);
                self.opt_type_name(&e.as_type);
                self.implements(&e.implements);
                self.declarations(&e.accessors);
            }
            Declaration::Property(p) => {
                self.attribute_blocks(p.attributes);
                self.simple(&p.name);
                self.parameters(&p.parameters);
                self.return_type(&p.return_type);
                self.implements(&p.implements);
                if let Some(accessors) = &p.accessors {
                    self.declarations(accessors);
                }
            }
            Declaration::Accessor(a) => {
                self.attribute_blocks(a.attributes);
                self.parameters(&a.parameters);
                self.statements(&a.body);
            }
        }
    }
}

// ============================================================================
// Traversal
// ============================================================================

/// Visit `root` and every descendant in pre-order. The callback receives
/// each node and its depth below `root`.
pub fn walk<'ast>(root: NodeRef<'ast>, mut f: impl FnMut(NodeRef<'ast>, usize)) {
    let mut stack = vec![(root, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        f(node, depth);
        let children = node.children();
        stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
    }
}

/// Child-to-parent relation for a whole tree, computed on demand.
#[derive(Debug, Default)]
pub struct ParentMap<'ast> {
    parents: FxHashMap<(usize, TreeType), NodeRef<'ast>>,
}

impl<'ast> ParentMap<'ast> {
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(root: NodeRef<'ast>) -> Self {
        let mut parents = FxHashMap::default();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            for child in node.children() {
                parents.insert(child.key(), node);
                stack.push(child);
            }
        }
        Self { parents }
    }

    /// The parent of `node`, or `None` for the root or a node from another
    /// tree.
    pub fn parent(&self, node: NodeRef<'_>) -> Option<NodeRef<'ast>> {
        self.parents.get(&node.key()).copied()
    }

    /// The ancestors of `node`, nearest first.
    pub fn ancestors(&self, node: NodeRef<'_>) -> impl Iterator<Item = NodeRef<'ast>> + '_ {
        let mut current = self.parent(node);
        std::iter::from_fn(move || {
            let node = current?;
            current = self.parent(node);
            Some(node)
        })
    }

    /// Number of nodes that have a parent.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_ranges() {
        assert!(TreeType::SimpleName.is_name());
        assert!(TreeType::ArrayType.is_type());
        assert!(TreeType::BadExpression.is_expression());
        assert!(TreeType::IfBlockStatement.is_statement());
        assert!(!TreeType::IfBlockStatement.is_declaration());
        assert!(TreeType::BadDeclaration.is_declaration());
        assert!(!TreeType::File.is_statement());
        assert!(TreeType::BadStatement.is_bad());
    }

    #[test]
    fn primitive_round_trip() {
        let code: u16 = TreeType::MeExpression.into();
        assert_eq!(TreeType::try_from(code).ok(), Some(TreeType::MeExpression));
        assert!(TreeType::try_from(9999u16).is_err());
    }
}
