//! Property tests for the scanner and parser.
//!
//! These check invariants that must hold for any input, well-formed or
//! not: parsing terminates without panicking, is deterministic, and every
//! span it produces lies inside the source text.

use bumpalo::Bump;
use proptest::prelude::*;
use vbsyntax::ast::{NodeRef, walk};
use vbsyntax::{Scanner, SyntaxErrors, TokenKind};

// =============================================================================
// Generators
// =============================================================================

/// Fragments that exercise block structure, declarations and expressions.
const FRAGMENTS: &[&str] = &[
    "Module M", "End Module", "Class C", "End Class", "Structure S", "End Structure",
    "Interface I", "End Interface", "Enum E", "End Enum", "Namespace N", "End Namespace",
    "Sub F(", "Function G(", "ByVal x As Integer", "Optional y = 1", ")", "As String",
    "End Sub", "End Function", "Property P", "Get", "Set(value)", "End Get", "End Set",
    "End Property", "If", "Then", "ElseIf", "Else", "End If", "For i = 1 To 10", "Next",
    "For Each x In xs", "Do While", "Loop Until", "While", "End While", "Select Case",
    "Case Is > 1", "Case Else", "End Select", "Try", "Catch e As Exception", "Finally",
    "End Try", "With", "End With", "Dim", "Const", "ReDim Preserve", "Public", "Private",
    "Shared", "Overrides", "Custom Event", "Option Strict On", "Imports System",
    "<Serializable>", "#If DEBUG Then", "#End If", "#Region \"r\"", "#End Region",
    "x", "y(1, 2)", "a.b!c", "1 + 2 * 3", "&H1F", "\"text\"", "#1/2/2003#", "New List(Of T)",
    "AddressOf F", "TypeOf o Is C", "=", "+=", ",", ":", " _\n", "\n", "'comment\n",
];

fn arb_fragment_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..60)
        .prop_map(|parts| parts.join(" "))
}

fn arb_source() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\PC{0,400}",
        arb_fragment_soup(),
    ]
}

fn source_len(source: &str) -> u32 {
    source.chars().count() as u32
}

// =============================================================================
// Termination and determinism
// =============================================================================

proptest! {
    #[test]
    fn prop_file_parsing_never_panics(source in arb_source()) {
        let arena = Bump::new();
        let _ = vbsyntax::parse_lenient(&source, &arena);
    }

    #[test]
    fn prop_script_parsing_never_panics(source in arb_source()) {
        let arena = Bump::new();
        let _ = vbsyntax::parse_script_lenient(&source, &arena);
    }

    #[test]
    fn prop_parsing_is_deterministic(source in arb_fragment_soup()) {
        let first_arena = Bump::new();
        let second_arena = Bump::new();
        let (first, first_errors) = vbsyntax::parse_lenient(&source, &first_arena);
        let (second, second_errors) = vbsyntax::parse_lenient(&source, &second_arena);

        prop_assert_eq!(first_errors.kinds(), second_errors.kinds());
        prop_assert_eq!(first.declarations().len(), second.declarations().len());
        prop_assert_eq!(first.span, second.span);
    }
}

// =============================================================================
// Spans
// =============================================================================

proptest! {
    #[test]
    fn prop_error_spans_lie_within_source(source in arb_source()) {
        let arena = Bump::new();
        let (_, errors) = vbsyntax::parse_lenient(&source, &arena);
        let len = source_len(&source);

        for error in errors.iter() {
            prop_assert!(error.span.start <= error.span.finish, "{:?}", error);
            prop_assert!(error.span.finish.index <= len, "{:?}", error);
        }
    }

    #[test]
    fn prop_root_span_covers_every_node(source in arb_fragment_soup()) {
        let arena = Bump::new();
        let (file, _) = vbsyntax::parse_lenient(&source, &arena);
        let root = NodeRef::from(&*arena.alloc(file));
        let root_span = root.span();

        let mut outside = Vec::new();
        walk(root, |node, _| {
            if !root_span.contains(&node.span()) {
                outside.push(node.tree_type());
            }
        });
        prop_assert!(outside.is_empty(), "nodes outside {:?}: {:?}", root_span, outside);
    }

    #[test]
    fn prop_token_spans_are_ordered(source in arb_source()) {
        let arena = Bump::new();
        let tokens = Scanner::new(&source, &arena).read_to_end();
        let len = source_len(&source);

        for pair in tokens.windows(2) {
            prop_assert!(pair[0].span.finish <= pair[1].span.start, "{:?}", pair);
        }
        let last = tokens.last().map(|token| token.kind);
        prop_assert_eq!(last, Some(TokenKind::EndOfStream));
        prop_assert!(tokens.iter().all(|token| token.span.finish.index <= len));
    }
}

// =============================================================================
// Scanner positioning
// =============================================================================

proptest! {
    #[test]
    fn prop_reset_replays_the_same_tokens(source in arb_fragment_soup(), skip in 0usize..20) {
        let arena = Bump::new();
        let mut scanner = Scanner::new(&source, &arena);
        for _ in 0..skip {
            scanner.read();
        }

        let mark = scanner.mark();
        let first = scanner.read_to_end();
        prop_assert!(scanner.reset(mark).is_ok());
        let second = scanner.read_to_end();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn empty_source_parses_cleanly() {
    let arena = Bump::new();
    let (file, errors) = vbsyntax::parse_lenient("", &arena);
    assert!(errors.is_empty(), "{errors}");
    assert!(file.declarations().is_empty());

    let mut errors = SyntaxErrors::new();
    let script = vbsyntax::ast::parse_script_file(Scanner::new("", &arena), &mut errors);
    assert!(errors.is_empty());
    assert!(script.statements().is_empty());
}
