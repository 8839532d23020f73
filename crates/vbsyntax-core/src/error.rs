//! Diagnostic and error types shared by the scanner and parser.
//!
//! Malformed source text never produces a Rust error. Every problem in the
//! input becomes a [`SyntaxError`] appended to a caller-owned
//! [`SyntaxErrors`] sink while parsing carries on. [`ScanError`] is reserved
//! for misuse of the scanner API by the host.

use std::fmt;

use thiserror::Error;

use crate::Span;

// ============================================================================
// Syntax error kinds
// ============================================================================

/// Every diagnostic the scanner and parser can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxErrorKind {
    // Lexical
    InvalidCharacter,
    InvalidIdentifier,
    InvalidEscapedIdentifier,
    InvalidTypeCharacter,
    InvalidIntegerLiteral,
    InvalidFloatingPointLiteral,
    InvalidDecimalLiteral,
    InvalidStringLiteral,
    InvalidCharacterLiteral,
    InvalidDateLiteral,
    InvalidLineContinuation,

    // Expected tokens
    ExpectedEndOfStatement,
    ExpectedIdentifier,
    ExpectedComma,
    ExpectedLeftParenthesis,
    ExpectedRightParenthesis,
    ExpectedLeftCurlyBrace,
    ExpectedRightCurlyBrace,
    ExpectedGreaterThan,
    ExpectedEquals,
    ExpectedAs,
    ExpectedPeriod,
    ExpectedIs,
    ExpectedIn,
    ExpectedTo,
    ExpectedThen,
    ExpectedOf,
    ExpectedLib,
    ExpectedStringLiteral,
    ExpectedIntegerLiteral,
    ExpectedExpression,
    ExpectedType,
    ExpectedRelationalOperator,
    ExpectedOverloadableOperator,
    ExpectedNamedArgument,
    ExpectedSubOrFunction,
    ExpectedDeclaration,
    ExpectedStatement,
    ExpectedCase,
    ExpectedExitKind,
    ExpectedContinueKind,
    ExpectedEndKind,
    ExpectedOptionKind,
    ExpectedOnOrOff,
    ExpectedBinaryOrText,
    ExpectedError,
    ExpectedResumeOrGoTo,
    ExpectedLabel,
    ExpectedGetOrSet,
    ExpectedEventAccessor,
    ExpectedWhileOrUntil,
    ExpectedConstraint,
    ExpectedInitializer,
    ExpectedOptionalDefault,

    // Block matching: If / Else
    ExpectedEndIf,
    EndIfWithoutIf,
    ElseWithoutIf,
    ElseIfWithoutIf,
    ElseAfterElse,
    ElseIfAfterElse,

    // Block matching: loops
    ExpectedLoop,
    LoopWithoutDo,
    LoopConditionAlreadySpecified,
    ExpectedNext,
    NextWithoutFor,
    ExpectedEndWhile,
    EndWhileWithoutWhile,

    // Block matching: Select
    ExpectedEndSelect,
    EndSelectWithoutSelect,
    CaseWithoutSelect,
    CaseElseWithoutSelect,
    CaseAfterCaseElse,
    CaseElseAfterCaseElse,

    // Block matching: Try
    ExpectedEndTry,
    EndTryWithoutTry,
    CatchWithoutTry,
    FinallyWithoutTry,
    CatchAfterFinally,
    FinallyAfterFinally,

    // Block matching: other executable blocks
    ExpectedEndUsing,
    EndUsingWithoutUsing,
    ExpectedEndSyncLock,
    EndSyncLockWithoutSyncLock,
    ExpectedEndWith,
    EndWithWithoutWith,

    // Block matching: methods and accessors
    ExpectedEndSub,
    EndSubWithoutSub,
    ExpectedEndFunction,
    EndFunctionWithoutFunction,
    ExpectedEndOperator,
    EndOperatorWithoutOperator,
    ExpectedEndProperty,
    EndPropertyWithoutProperty,
    ExpectedEndGet,
    EndGetWithoutGet,
    ExpectedEndSet,
    EndSetWithoutSet,
    ExpectedEndEvent,
    EndEventWithoutEvent,
    ExpectedEndAddHandler,
    EndAddHandlerWithoutAddHandler,
    ExpectedEndRemoveHandler,
    EndRemoveHandlerWithoutRemoveHandler,
    ExpectedEndRaiseEvent,
    EndRaiseEventWithoutRaiseEvent,

    // Block matching: types and namespaces
    ExpectedEndClass,
    EndClassWithoutClass,
    ExpectedEndStructure,
    EndStructureWithoutStructure,
    ExpectedEndModule,
    EndModuleWithoutModule,
    ExpectedEndInterface,
    EndInterfaceWithoutInterface,
    ExpectedEndEnum,
    EndEnumWithoutEnum,
    ExpectedEndNamespace,
    EndNamespaceWithoutNamespace,

    // Ordering and placement
    InheritsMustBeFirst,
    NoMultipleInheritance,
    ImplementsInWrongOrder,
    InheritsNotValidHere,
    ImplementsNotValidHere,
    OptionStatementWrongOrder,
    ImportsStatementWrongOrder,
    AttributeStatementWrongOrder,
    InvalidInsideType,
    InvalidInsideEnum,
    InvalidInsideInterface,
    InvalidInsideNamespace,
    InvalidInsideProcedure,
    LabelNotAtLineStart,

    // Modifiers and parameters
    InvalidModifier,
    DuplicateModifier,
    DuplicateParameterSpecifier,
    ConflictingParameterSpecifiers,
    ParamArrayMustBeLast,
    InvalidUseOfCustomModifier,

    // Expressions, names and arguments
    InvalidUseOfKeyword,
    ArrayBoundsNotAllowed,
    MeNotValidInHandles,
    ObsoleteGosub,

    // Directives
    InvalidPreprocessorDirective,
    NestedExternalSourceStatement,
    EndExternalSourceWithoutExternalSource,
    ExpectedEndExternalSource,
    EndRegionWithoutRegion,
    ExpectedEndRegion,
    CcElseIfWithoutCcIf,
    CcElseWithoutCcIf,
    CcEndIfWithoutCcIf,
    CcElseIfAfterCcElse,
    CcElseAfterCcElse,
    ExpectedCcEndIf,
}

impl SyntaxErrorKind {
    /// A short human-readable description.
    pub fn as_str(&self) -> &'static str {
        use SyntaxErrorKind::*;
        match self {
            InvalidCharacter => "invalid character",
            InvalidIdentifier => "invalid identifier",
            InvalidEscapedIdentifier => "invalid escaped identifier",
            InvalidTypeCharacter => "type character is not valid here",
            InvalidIntegerLiteral => "invalid integer literal",
            InvalidFloatingPointLiteral => "invalid floating-point literal",
            InvalidDecimalLiteral => "invalid decimal literal",
            InvalidStringLiteral => "string literal is not terminated",
            InvalidCharacterLiteral => "character literal must contain exactly one character",
            InvalidDateLiteral => "invalid date literal",
            InvalidLineContinuation => "line continuation must be followed by a line terminator",

            ExpectedEndOfStatement => "expected end of statement",
            ExpectedIdentifier => "expected identifier",
            ExpectedComma => "expected ','",
            ExpectedLeftParenthesis => "expected '('",
            ExpectedRightParenthesis => "expected ')'",
            ExpectedLeftCurlyBrace => "expected '{'",
            ExpectedRightCurlyBrace => "expected '}'",
            ExpectedGreaterThan => "expected '>'",
            ExpectedEquals => "expected '='",
            ExpectedAs => "expected 'As'",
            ExpectedPeriod => "expected '.'",
            ExpectedIs => "expected 'Is'",
            ExpectedIn => "expected 'In'",
            ExpectedTo => "expected 'To'",
            ExpectedThen => "expected 'Then'",
            ExpectedOf => "expected 'Of'",
            ExpectedLib => "expected 'Lib'",
            ExpectedStringLiteral => "expected string literal",
            ExpectedIntegerLiteral => "expected integer literal",
            ExpectedExpression => "expected expression",
            ExpectedType => "expected type",
            ExpectedRelationalOperator => "expected relational operator",
            ExpectedOverloadableOperator => "expected overloadable operator",
            ExpectedNamedArgument => "named argument expected",
            ExpectedSubOrFunction => "expected 'Sub' or 'Function'",
            ExpectedDeclaration => "expected declaration",
            ExpectedStatement => "expected statement",
            ExpectedCase => "expected 'Case'",
            ExpectedExitKind => "expected 'Do', 'For', 'While', 'Select', 'Sub', 'Function', 'Property' or 'Try'",
            ExpectedContinueKind => "expected 'Do', 'For' or 'While'",
            ExpectedEndKind => "expected block kind after 'End'",
            ExpectedOptionKind => "expected 'Explicit', 'Strict' or 'Compare'",
            ExpectedOnOrOff => "expected 'On' or 'Off'",
            ExpectedBinaryOrText => "expected 'Binary' or 'Text'",
            ExpectedError => "expected 'Error'",
            ExpectedResumeOrGoTo => "expected 'Resume' or 'GoTo'",
            ExpectedLabel => "expected label or line number",
            ExpectedGetOrSet => "expected 'Get' or 'Set' accessor",
            ExpectedEventAccessor => "expected 'AddHandler', 'RemoveHandler' or 'RaiseEvent' accessor",
            ExpectedWhileOrUntil => "expected 'While' or 'Until'",
            ExpectedConstraint => "expected type constraint",
            ExpectedInitializer => "expected initializer",
            ExpectedOptionalDefault => "optional parameter requires a default value",

            ExpectedEndIf => "'If' must end with a matching 'End If'",
            EndIfWithoutIf => "'End If' must be preceded by a matching 'If'",
            ElseWithoutIf => "'Else' must be preceded by a matching 'If' or 'ElseIf'",
            ElseIfWithoutIf => "'ElseIf' must be preceded by a matching 'If' or 'ElseIf'",
            ElseAfterElse => "'Else' cannot follow 'Else'",
            ElseIfAfterElse => "'ElseIf' cannot follow 'Else'",

            ExpectedLoop => "'Do' must end with a matching 'Loop'",
            LoopWithoutDo => "'Loop' must be preceded by a matching 'Do'",
            LoopConditionAlreadySpecified => "loop condition cannot appear on both 'Do' and 'Loop'",
            ExpectedNext => "'For' must end with a matching 'Next'",
            NextWithoutFor => "'Next' must be preceded by a matching 'For'",
            ExpectedEndWhile => "'While' must end with a matching 'End While'",
            EndWhileWithoutWhile => "'End While' must be preceded by a matching 'While'",

            ExpectedEndSelect => "'Select Case' must end with a matching 'End Select'",
            EndSelectWithoutSelect => "'End Select' must be preceded by a matching 'Select Case'",
            CaseWithoutSelect => "'Case' must be preceded by a matching 'Select Case'",
            CaseElseWithoutSelect => "'Case Else' must be preceded by a matching 'Select Case'",
            CaseAfterCaseElse => "'Case' cannot follow 'Case Else'",
            CaseElseAfterCaseElse => "'Case Else' cannot follow 'Case Else'",

            ExpectedEndTry => "'Try' must end with a matching 'End Try'",
            EndTryWithoutTry => "'End Try' must be preceded by a matching 'Try'",
            CatchWithoutTry => "'Catch' must be preceded by a matching 'Try'",
            FinallyWithoutTry => "'Finally' must be preceded by a matching 'Try'",
            CatchAfterFinally => "'Catch' cannot follow 'Finally'",
            FinallyAfterFinally => "'Finally' cannot follow 'Finally'",

            ExpectedEndUsing => "'Using' must end with a matching 'End Using'",
            EndUsingWithoutUsing => "'End Using' must be preceded by a matching 'Using'",
            ExpectedEndSyncLock => "'SyncLock' must end with a matching 'End SyncLock'",
            EndSyncLockWithoutSyncLock => "'End SyncLock' must be preceded by a matching 'SyncLock'",
            ExpectedEndWith => "'With' must end with a matching 'End With'",
            EndWithWithoutWith => "'End With' must be preceded by a matching 'With'",

            ExpectedEndSub => "'Sub' must end with a matching 'End Sub'",
            EndSubWithoutSub => "'End Sub' must be preceded by a matching 'Sub'",
            ExpectedEndFunction => "'Function' must end with a matching 'End Function'",
            EndFunctionWithoutFunction => "'End Function' must be preceded by a matching 'Function'",
            ExpectedEndOperator => "'Operator' must end with a matching 'End Operator'",
            EndOperatorWithoutOperator => "'End Operator' must be preceded by a matching 'Operator'",
            ExpectedEndProperty => "'Property' must end with a matching 'End Property'",
            EndPropertyWithoutProperty => "'End Property' must be preceded by a matching 'Property'",
            ExpectedEndGet => "'Get' must end with a matching 'End Get'",
            EndGetWithoutGet => "'End Get' must be preceded by a matching 'Get'",
            ExpectedEndSet => "'Set' must end with a matching 'End Set'",
            EndSetWithoutSet => "'End Set' must be preceded by a matching 'Set'",
            ExpectedEndEvent => "'Custom Event' must end with a matching 'End Event'",
            EndEventWithoutEvent => "'End Event' must be preceded by a matching 'Custom Event'",
            ExpectedEndAddHandler => "'AddHandler' must end with a matching 'End AddHandler'",
            EndAddHandlerWithoutAddHandler => "'End AddHandler' must be preceded by a matching 'AddHandler'",
            ExpectedEndRemoveHandler => "'RemoveHandler' must end with a matching 'End RemoveHandler'",
            EndRemoveHandlerWithoutRemoveHandler => {
                "'End RemoveHandler' must be preceded by a matching 'RemoveHandler'"
            }
            ExpectedEndRaiseEvent => "'RaiseEvent' must end with a matching 'End RaiseEvent'",
            EndRaiseEventWithoutRaiseEvent => "'End RaiseEvent' must be preceded by a matching 'RaiseEvent'",

            ExpectedEndClass => "'Class' must end with a matching 'End Class'",
            EndClassWithoutClass => "'End Class' must be preceded by a matching 'Class'",
            ExpectedEndStructure => "'Structure' must end with a matching 'End Structure'",
            EndStructureWithoutStructure => "'End Structure' must be preceded by a matching 'Structure'",
            ExpectedEndModule => "'Module' must end with a matching 'End Module'",
            EndModuleWithoutModule => "'End Module' must be preceded by a matching 'Module'",
            ExpectedEndInterface => "'Interface' must end with a matching 'End Interface'",
            EndInterfaceWithoutInterface => "'End Interface' must be preceded by a matching 'Interface'",
            ExpectedEndEnum => "'Enum' must end with a matching 'End Enum'",
            EndEnumWithoutEnum => "'End Enum' must be preceded by a matching 'Enum'",
            ExpectedEndNamespace => "'Namespace' must end with a matching 'End Namespace'",
            EndNamespaceWithoutNamespace => "'End Namespace' must be preceded by a matching 'Namespace'",

            InheritsMustBeFirst => "'Inherits' must be the first statement in a type",
            NoMultipleInheritance => "a class can inherit from only one type",
            ImplementsInWrongOrder => "'Implements' must follow 'Inherits' and precede other members",
            InheritsNotValidHere => "'Inherits' is not valid in this type",
            ImplementsNotValidHere => "'Implements' is not valid in this type",
            OptionStatementWrongOrder => "'Option' statements must precede all other declarations",
            ImportsStatementWrongOrder => "'Imports' statements must precede all declarations except 'Option'",
            AttributeStatementWrongOrder => "assembly and module attributes must precede all other declarations",
            InvalidInsideType => "declaration is not valid inside a type",
            InvalidInsideEnum => "statement is not valid inside an enum",
            InvalidInsideInterface => "declaration is not valid inside an interface",
            InvalidInsideNamespace => "declaration is not valid inside a namespace",
            InvalidInsideProcedure => "declaration is not valid inside a method",
            LabelNotAtLineStart => "labels must appear at the start of a line",

            InvalidModifier => "modifier is not valid on this declaration",
            DuplicateModifier => "modifier specified more than once",
            DuplicateParameterSpecifier => "parameter specifier specified more than once",
            ConflictingParameterSpecifiers => "'ByVal' and 'ByRef' cannot be combined",
            ParamArrayMustBeLast => "'ParamArray' parameter must be the last parameter",
            InvalidUseOfCustomModifier => "'Custom' is only valid before 'Event'",

            InvalidUseOfKeyword => "keyword is not valid as an identifier",
            ArrayBoundsNotAllowed => "array bounds cannot appear here",
            MeNotValidInHandles => "'Me' is not valid in a 'Handles' clause for this language version",
            ObsoleteGosub => "'GoSub' is no longer supported",

            InvalidPreprocessorDirective => "invalid preprocessor directive",
            NestedExternalSourceStatement => "'#ExternalSource' directives cannot be nested",
            EndExternalSourceWithoutExternalSource => {
                "'#End ExternalSource' must be preceded by a matching '#ExternalSource'"
            }
            ExpectedEndExternalSource => "'#ExternalSource' must end with a matching '#End ExternalSource'",
            EndRegionWithoutRegion => "'#End Region' must be preceded by a matching '#Region'",
            ExpectedEndRegion => "'#Region' must end with a matching '#End Region'",
            CcElseIfWithoutCcIf => "'#ElseIf' must be preceded by a matching '#If'",
            CcElseWithoutCcIf => "'#Else' must be preceded by a matching '#If'",
            CcEndIfWithoutCcIf => "'#End If' must be preceded by a matching '#If'",
            CcElseIfAfterCcElse => "'#ElseIf' cannot follow '#Else'",
            CcElseAfterCcElse => "'#Else' cannot follow '#Else'",
            ExpectedCcEndIf => "'#If' must end with a matching '#End If'",
        }
    }

    /// Whether the diagnostic comes from the scanner rather than the parser.
    pub fn is_lexical(&self) -> bool {
        use SyntaxErrorKind::*;
        matches!(
            self,
            InvalidCharacter
                | InvalidIdentifier
                | InvalidEscapedIdentifier
                | InvalidTypeCharacter
                | InvalidIntegerLiteral
                | InvalidFloatingPointLiteral
                | InvalidDecimalLiteral
                | InvalidStringLiteral
                | InvalidCharacterLiteral
                | InvalidDateLiteral
                | InvalidLineContinuation
        )
    }
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Syntax errors
// ============================================================================

/// A diagnostic with the source range it applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("{kind} at {span}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub span: Span,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Render the error with the offending source line and a caret marker.
    pub fn display_with_source(&self, source: &str) -> String {
        let line_no = self.span.start.line as usize;
        let Some(line) = source.lines().nth(line_no.saturating_sub(1)) else {
            return self.to_string();
        };
        let col = (self.span.start.column as usize).max(1);
        let width = if self.span.start.line == self.span.finish.line {
            (self.span.len() as usize).max(1)
        } else {
            1
        };
        format!(
            "error: {}\n --> {}:{}\n  |\n  | {}\n  | {}{}",
            self.kind,
            self.span.start.line,
            self.span.start.column,
            line,
            " ".repeat(col - 1),
            "^".repeat(width)
        )
    }
}

/// The ordered, append-only error list a parse reports into.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyntaxErrors {
    errors: Vec<SyntaxError>,
}

impl SyntaxErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: SyntaxError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SyntaxError> {
        self.errors.iter()
    }

    /// The kinds of all recorded errors, in order.
    pub fn kinds(&self) -> Vec<SyntaxErrorKind> {
        self.errors.iter().map(|e| e.kind).collect()
    }

    /// Whether an error of `kind` was recorded.
    pub fn contains(&self, kind: SyntaxErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    pub fn into_vec(self) -> Vec<SyntaxError> {
        self.errors
    }
}

impl From<Vec<SyntaxError>> for SyntaxErrors {
    fn from(errors: Vec<SyntaxError>) -> Self {
        Self { errors }
    }
}

impl FromIterator<SyntaxError> for SyntaxErrors {
    fn from_iter<I: IntoIterator<Item = SyntaxError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SyntaxErrors {
    type Item = &'a SyntaxError;
    type IntoIter = std::slice::Iter<'a, SyntaxError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for SyntaxErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Scanner misuse
// ============================================================================

/// Host-side misuse of the scanner API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScanError {
    /// A seek named a token this scanner never produced.
    #[error("token at {span} was not produced by this scanner")]
    UnknownToken { span: Span },

    /// A mark from a different scanner, or past the end of the token log.
    #[error("mark {mark} is outside the token log of length {len}")]
    InvalidMark { mark: usize, len: usize },

    /// `previous()` was called before the first token was read.
    #[error("no token has been read yet")]
    NoPreviousToken,

    /// Tab width must be at least one column.
    #[error("tab width must be at least 1, got {0}")]
    InvalidTabSpaces(u32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Location;

    fn span(line: u32, col: u32, index: u32, len: u32) -> Span {
        Span::new(
            Location::new(index, line, col),
            Location::new(index + len, line, col + len),
        )
    }

    #[test]
    fn syntax_error_display() {
        let err = SyntaxError::new(SyntaxErrorKind::ExpectedEndIf, span(3, 5, 20, 2));
        assert_eq!(
            err.to_string(),
            "'If' must end with a matching 'End If' at 3:5"
        );
    }

    #[test]
    fn display_with_source_marks_columns() {
        let source = "Sub Main()\n    x = (1 + \nEnd Sub";
        let err = SyntaxError::new(SyntaxErrorKind::ExpectedExpression, span(2, 13, 23, 1));
        let rendered = err.display_with_source(source);
        assert!(rendered.contains("x = (1 + "));
        assert!(rendered.ends_with(&format!("{}^", " ".repeat(12))));
    }

    #[test]
    fn error_list_is_append_only() {
        let mut errors = SyntaxErrors::new();
        assert!(errors.is_empty());
        errors.push(SyntaxError::new(SyntaxErrorKind::LoopWithoutDo, span(1, 1, 0, 4)));
        errors.push(SyntaxError::new(SyntaxErrorKind::ExpectedNext, span(2, 1, 5, 3)));
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.kinds(),
            vec![SyntaxErrorKind::LoopWithoutDo, SyntaxErrorKind::ExpectedNext]
        );
        assert!(errors.contains(SyntaxErrorKind::ExpectedNext));
        assert_eq!(errors.to_string().lines().count(), 2);
    }

    #[test]
    fn lexical_kinds() {
        assert!(SyntaxErrorKind::InvalidDateLiteral.is_lexical());
        assert!(!SyntaxErrorKind::ExpectedEndIf.is_lexical());
    }

    #[test]
    fn scan_error_messages() {
        assert_eq!(
            ScanError::InvalidTabSpaces(0).to_string(),
            "tab width must be at least 1, got 0"
        );
        assert_eq!(ScanError::NoPreviousToken.to_string(), "no token has been read yet");
    }
}
