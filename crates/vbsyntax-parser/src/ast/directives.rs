//! Preprocessing directives.
//!
//! Directive lines start with `#` at the beginning of a line and may appear
//! anywhere a statement or declaration may. Conditional compilation
//! (`#If`, `#ElseIf`, `#Else`, `#End If`) is checked for balance only; the
//! conditions are parsed and discarded and every branch is parsed. The
//! other directives are recorded in [`DirectiveTables`] when the caller
//! asks for them.

use vbsyntax_core::{Location, Span, SyntaxErrorKind};

use crate::ast::parser::Parser;
use crate::lexer::{Token, TokenKind, TokenValue};

/// A `#Region "description"` ... `#End Region` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegion {
    pub description: String,
    /// From `#Region` to the end of `#End Region`.
    pub span: Span,
}

/// An `#ExternalSource("file", line)` ... `#End ExternalSource` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLineMapping {
    pub file: String,
    /// The external line of the first line after the directive.
    pub line: i64,
    /// From `#ExternalSource` to the end of `#End ExternalSource`.
    pub span: Span,
}

/// `#ExternalChecksum("file", "guid", "checksum")`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalChecksum {
    pub file: String,
    pub guid: String,
    pub checksum: String,
    pub span: Span,
}

/// Information collected from directives, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveTables {
    /// Names defined with `#Const`.
    pub conditional_constants: Vec<String>,
    pub regions: Vec<SourceRegion>,
    pub line_mappings: Vec<ExternalLineMapping>,
    pub checksums: Vec<ExternalChecksum>,
}

impl DirectiveTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no directive has been recorded.
    pub fn is_empty(&self) -> bool {
        self.conditional_constants.is_empty()
            && self.regions.is_empty()
            && self.line_mappings.is_empty()
            && self.checksums.is_empty()
    }
}

#[derive(Debug)]
struct OpenRegion {
    description: String,
    directive: Span,
}

#[derive(Debug)]
struct OpenExternalSource {
    file: String,
    line: i64,
    directive: Span,
}

#[derive(Debug)]
struct OpenConditional {
    directive: Span,
    saw_else: bool,
}

/// Directive blocks open at the read position.
#[derive(Debug, Default)]
pub(super) struct DirectiveState {
    conditionals: Vec<OpenConditional>,
    regions: Vec<OpenRegion>,
    external_source: Option<OpenExternalSource>,
}

impl<'src, 'ast, 'p> Parser<'src, 'ast, 'p> {
    /// Parse a directive line starting at `#`.
    pub(super) fn parse_directive(&mut self) {
        self.begin_construct();
        let start = self.read().span.start;
        let token = self.peek();

        match token.kind {
            TokenKind::If => {
                self.read();
                self.parse_directive_condition();
                let directive = self.span_from(start);
                self.directives.conditionals.push(OpenConditional {
                    directive,
                    saw_else: false,
                });
            }
            TokenKind::ElseIf => {
                self.read();
                self.parse_directive_condition();
                self.close_conditional_branch(start, false);
            }
            TokenKind::Else => {
                self.read();
                if self.eat(TokenKind::If).is_some() {
                    self.parse_directive_condition();
                    self.close_conditional_branch(start, false);
                } else {
                    self.close_conditional_branch(start, true);
                }
            }
            TokenKind::End => {
                self.read();
                self.parse_end_directive(start);
            }
            TokenKind::Const => {
                self.read();
                let name = self.parse_identifier();
                if self.expect(TokenKind::Equals, SyntaxErrorKind::ExpectedEquals).is_some() {
                    self.parse_expression();
                }
                if !name.is_bad()
                    && let Some(tables) = self.tables.as_deref_mut()
                {
                    tables.conditional_constants.push(name.text.to_owned());
                }
            }
            TokenKind::Identifier if token.is_contextual(TokenKind::Region) => {
                self.read();
                let description = self.expect_directive_string().unwrap_or_default();
                let directive = self.span_from(start);
                self.directives.regions.push(OpenRegion {
                    description,
                    directive,
                });
            }
            TokenKind::Identifier if token.is_contextual(TokenKind::ExternalSource) => {
                self.read();
                self.parse_external_source(start);
            }
            TokenKind::Identifier if token.is_contextual(TokenKind::ExternalChecksum) => {
                self.read();
                self.parse_external_checksum(start);
            }
            _ => {
                let span = self.span_from(start).merge(token.span);
                self.report(SyntaxErrorKind::InvalidPreprocessorDirective, span);
            }
        }

        if !self.peek().is_end_of_line() {
            self.report_unexpected(SyntaxErrorKind::ExpectedEndOfStatement);
        }
        self.skip_to_end_of_line();
    }

    fn skip_to_end_of_line(&mut self) {
        while !self.peek().is_end_of_line() {
            self.read();
        }
    }

    /// `#If` and `#ElseIf` conditions are parsed for syntax and discarded.
    fn parse_directive_condition(&mut self) {
        self.parse_expression();
        // `Then` is optional on directives.
        self.eat(TokenKind::Then);
    }

    fn close_conditional_branch(&mut self, start: Location, is_else: bool) {
        let directive = self.span_from(start);
        let Some(open) = self.directives.conditionals.last_mut() else {
            let error = if is_else {
                SyntaxErrorKind::CcElseWithoutCcIf
            } else {
                SyntaxErrorKind::CcElseIfWithoutCcIf
            };
            self.report(error, directive);
            return;
        };
        let saw_else = open.saw_else;
        open.saw_else |= is_else;
        if saw_else {
            let error = if is_else {
                SyntaxErrorKind::CcElseAfterCcElse
            } else {
                SyntaxErrorKind::CcElseIfAfterCcElse
            };
            self.report(error, directive);
        }
    }

    fn parse_end_directive(&mut self, start: Location) {
        let token = self.peek();
        if token.kind == TokenKind::If {
            self.read();
            if self.directives.conditionals.pop().is_none() {
                let span = self.span_from(start);
                self.report(SyntaxErrorKind::CcEndIfWithoutCcIf, span);
            }
        } else if token.is_contextual(TokenKind::Region) {
            self.read();
            let span = self.span_from(start);
            match self.directives.regions.pop() {
                Some(open) => {
                    if let Some(tables) = self.tables.as_deref_mut() {
                        tables.regions.push(SourceRegion {
                            description: open.description,
                            span: open.directive.to(span),
                        });
                    }
                }
                None => self.report(SyntaxErrorKind::EndRegionWithoutRegion, span),
            }
        } else if token.is_contextual(TokenKind::ExternalSource) {
            self.read();
            let span = self.span_from(start);
            match self.directives.external_source.take() {
                Some(open) => {
                    if let Some(tables) = self.tables.as_deref_mut() {
                        tables.line_mappings.push(ExternalLineMapping {
                            file: open.file,
                            line: open.line,
                            span: open.directive.to(span),
                        });
                    }
                }
                None => self.report(SyntaxErrorKind::EndExternalSourceWithoutExternalSource, span),
            }
        } else {
            let span = self.span_from(start).merge(token.span);
            self.report(SyntaxErrorKind::InvalidPreprocessorDirective, span);
        }
    }

    /// `#ExternalSource("file", line)`
    fn parse_external_source(&mut self, start: Location) {
        let mut file = None;
        let mut line = None;
        if self
            .expect(TokenKind::LeftParenthesis, SyntaxErrorKind::ExpectedLeftParenthesis)
            .is_some()
        {
            file = self.expect_directive_string();
            if self.expect(TokenKind::Comma, SyntaxErrorKind::ExpectedComma).is_some() {
                line = self.expect_directive_integer();
            }
            self.expect(TokenKind::RightParenthesis, SyntaxErrorKind::ExpectedRightParenthesis);
        }
        let directive = self.span_from(start);

        if self.directives.external_source.is_some() {
            self.report(SyntaxErrorKind::NestedExternalSourceStatement, directive);
            return;
        }
        self.directives.external_source = Some(OpenExternalSource {
            file: file.unwrap_or_default(),
            line: line.unwrap_or_default(),
            directive,
        });
    }

    /// `#ExternalChecksum("file", "guid", "checksum")`
    fn parse_external_checksum(&mut self, start: Location) {
        if self
            .expect(TokenKind::LeftParenthesis, SyntaxErrorKind::ExpectedLeftParenthesis)
            .is_none()
        {
            return;
        }
        let mut parts = [const { None::<String> }; 3];
        for (i, part) in parts.iter_mut().enumerate() {
            if i > 0 && self.expect(TokenKind::Comma, SyntaxErrorKind::ExpectedComma).is_none() {
                break;
            }
            *part = self.expect_directive_string();
            if part.is_none() {
                break;
            }
        }
        let closed = self
            .expect(TokenKind::RightParenthesis, SyntaxErrorKind::ExpectedRightParenthesis)
            .is_some();
        let span = self.span_from(start);
        if let ([Some(file), Some(guid), Some(checksum)], true) = (parts, closed)
            && let Some(tables) = self.tables.as_deref_mut()
        {
            tables.checksums.push(ExternalChecksum {
                file,
                guid,
                checksum,
                span,
            });
        }
    }

    fn expect_directive_string(&mut self) -> Option<String> {
        match self.peek() {
            Token {
                value: TokenValue::String(text),
                ..
            } => {
                self.read();
                Some(text.to_owned())
            }
            _ => {
                self.report_unexpected(SyntaxErrorKind::ExpectedStringLiteral);
                None
            }
        }
    }

    fn expect_directive_integer(&mut self) -> Option<i64> {
        match self.peek() {
            Token {
                value: TokenValue::Integer { value, .. },
                ..
            } => {
                self.read();
                Some(value)
            }
            _ => {
                self.report_unexpected(SyntaxErrorKind::ExpectedIntegerLiteral);
                None
            }
        }
    }

    /// Report directive blocks left open at the end of the input.
    pub(super) fn finish_directives(&mut self) {
        for open in std::mem::take(&mut self.directives.conditionals) {
            self.begin_construct();
            self.report(SyntaxErrorKind::ExpectedCcEndIf, open.directive);
        }
        for open in std::mem::take(&mut self.directives.regions) {
            self.begin_construct();
            self.report(SyntaxErrorKind::ExpectedEndRegion, open.directive);
        }
        if let Some(open) = self.directives.external_source.take() {
            self.begin_construct();
            self.report(SyntaxErrorKind::ExpectedEndExternalSource, open.directive);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse_file_with_tables;
    use crate::lexer::Scanner;
    use bumpalo::Bump;
    use vbsyntax_core::SyntaxErrors;

    fn parse(source: &str) -> (DirectiveTables, SyntaxErrors) {
        let arena = Bump::new();
        let mut errors = SyntaxErrors::new();
        let mut tables = DirectiveTables::new();
        parse_file_with_tables(Scanner::new(source, &arena), &mut errors, &mut tables);
        (tables, errors)
    }

    #[test]
    fn balanced_conditionals() {
        let source = "#If DEBUG Then\nClass A\nEnd Class\n#ElseIf TRACE\n#Else\nClass B\nEnd Class\n#End If\n";
        let (tables, errors) = parse(source);
        assert!(errors.is_empty(), "{errors}");
        assert!(tables.is_empty());
    }

    #[test]
    fn conditional_balance_errors() {
        let (_, errors) = parse("#Else\n#End If\n");
        assert_eq!(
            errors.kinds(),
            [
                SyntaxErrorKind::CcElseWithoutCcIf,
                SyntaxErrorKind::CcEndIfWithoutCcIf
            ]
        );

        let (_, errors) = parse("#If A\n#Else\n#ElseIf B\n#Else\n#End If\n");
        assert_eq!(
            errors.kinds(),
            [
                SyntaxErrorKind::CcElseIfAfterCcElse,
                SyntaxErrorKind::CcElseAfterCcElse
            ]
        );
    }

    #[test]
    fn unterminated_conditional() {
        let (_, errors) = parse("#If A Then\nClass C\nEnd Class\n");
        assert_eq!(errors.kinds(), [SyntaxErrorKind::ExpectedCcEndIf]);
    }

    #[test]
    fn const_is_recorded() {
        let (tables, errors) = parse("#Const DEBUG = True\n#Const Level = 2\n");
        assert!(errors.is_empty(), "{errors}");
        assert_eq!(tables.conditional_constants, ["DEBUG", "Level"]);
    }

    #[test]
    fn regions_are_recorded() {
        let source = "#Region \"outer\"\n#Region \"inner\"\n#End Region\nClass C\nEnd Class\n#End Region\n";
        let (tables, errors) = parse(source);
        assert!(errors.is_empty(), "{errors}");
        let descriptions: Vec<_> = tables.regions.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(descriptions, ["inner", "outer"]);
        let outer = &tables.regions[1];
        assert_eq!(outer.span.start.index, 0);
        assert_eq!(outer.span.finish.index as usize, source.len() - 1);
        assert!(outer.span.contains(&tables.regions[0].span));
    }

    #[test]
    fn region_errors() {
        let (_, errors) = parse("#End Region\n");
        assert_eq!(errors.kinds(), [SyntaxErrorKind::EndRegionWithoutRegion]);
        let (_, errors) = parse("#Region \"open\"\n");
        assert_eq!(errors.kinds(), [SyntaxErrorKind::ExpectedEndRegion]);
    }

    #[test]
    fn external_source_mapping() {
        let source = "#ExternalSource(\"page.aspx\", 30)\nClass C\nEnd Class\n#End ExternalSource\n";
        let (tables, errors) = parse(source);
        assert!(errors.is_empty(), "{errors}");
        assert_eq!(tables.line_mappings.len(), 1);
        assert_eq!(tables.line_mappings[0].file, "page.aspx");
        assert_eq!(tables.line_mappings[0].line, 30);
    }

    #[test]
    fn nested_external_source() {
        let source = "#ExternalSource(\"a\", 1)\n#ExternalSource(\"b\", 2)\n#End ExternalSource\n";
        let (tables, errors) = parse(source);
        assert_eq!(errors.kinds(), [SyntaxErrorKind::NestedExternalSourceStatement]);
        assert_eq!(tables.line_mappings.len(), 1);
        assert_eq!(tables.line_mappings[0].file, "a");

        let (_, errors) = parse("#End ExternalSource\n");
        assert_eq!(
            errors.kinds(),
            [SyntaxErrorKind::EndExternalSourceWithoutExternalSource]
        );
        let (_, errors) = parse("#ExternalSource(\"a\", 1)\n");
        assert_eq!(errors.kinds(), [SyntaxErrorKind::ExpectedEndExternalSource]);
    }

    #[test]
    fn external_checksum() {
        let source = "#ExternalChecksum(\"a.vb\", \"{406ea660-64cf-4c82-b6f0-42d48172a799}\", \"44179F2B\")\n";
        let (tables, errors) = parse(source);
        assert!(errors.is_empty(), "{errors}");
        assert_eq!(tables.checksums.len(), 1);
        assert_eq!(tables.checksums[0].checksum, "44179F2B");
    }

    #[test]
    fn unknown_directive() {
        let (_, errors) = parse("#Pragma warning\n");
        assert_eq!(errors.kinds(), [SyntaxErrorKind::InvalidPreprocessorDirective]);
    }

    #[test]
    fn directives_inside_bodies() {
        let source = "Module M\n#Region \"r\"\nSub S()\n#If X\nFoo()\n#End If\nEnd Sub\n#End Region\nEnd Module\n";
        let (tables, errors) = parse(source);
        assert!(errors.is_empty(), "{errors}");
        assert_eq!(tables.regions.len(), 1);
    }
}
