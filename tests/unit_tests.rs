//! Integration tests over the sample sources in `test_scripts/`.
//!
//! These tests run the full pipeline (scanning, directives, parsing) on
//! complete programs and inspect the resulting trees.

mod test_harness;

use bumpalo::Bump;
use test_harness::{NodeCounter, TestHarness, assert_success, parse_file, parse_script};
use vbsyntax::ast::{
    Declaration, NodeRef, ParentMap, Statement, TreeType, TypeDeclaration, walk,
};
use vbsyntax::{LanguageVersion, ScannerOptions, SyntaxErrorKind};

fn types<'ast>(declarations: &'ast [Declaration<'ast>]) -> Vec<&'ast TypeDeclaration<'ast>> {
    declarations
        .iter()
        .filter_map(|declaration| match declaration {
            Declaration::Type(t) => Some(*t),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Complete Programs
// =============================================================================

#[test]
fn test_hello_world() {
    let source = TestHarness::new().load("hello_world.vb");
    let arena = Bump::new();
    let parsed = parse_file(&source, &arena);
    assert_success(&source, &parsed.errors);

    let declarations = parsed.file.declarations();
    assert_eq!(declarations.len(), 4);
    assert_eq!(declarations[0].tree_type(), TreeType::OptionDeclaration);
    assert_eq!(declarations[2].tree_type(), TreeType::ImportsDeclaration);
    assert_eq!(parsed.file.comments.len(), 1);
    assert_eq!(parsed.file.comments[0].text, " Entry point");
}

#[test]
fn test_classes() {
    let source = TestHarness::new().load("classes.vb");
    let arena = Bump::new();
    let parsed = parse_file(&source, &arena);
    assert_success(&source, &parsed.errors);

    let Declaration::Namespace(shapes) = parsed.file.declarations()[1] else {
        panic!("expected the Shapes namespace");
    };
    let members = types(shapes.members.declarations);
    let names: Vec<&str> = members.iter().map(|t| t.name.text).collect();
    assert_eq!(names, ["IShape", "Shape", "Circle", "Point", "Registry"]);

    let circle = members[2];
    assert_eq!(circle.inherits().count(), 1);
    let shape = members[1];
    assert_eq!(shape.implements().count(), 1);
    assert!(members[4].type_parameters.is_some());

    let counts = NodeCounter::count(NodeRef::from(parsed.file));
    assert_eq!(counts.types, 6);
    assert_eq!(counts.bad, 0);
}

#[test]
fn test_control_flow() {
    let source = TestHarness::new().load("control_flow.vb");
    let arena = Bump::new();
    let parsed = parse_file(&source, &arena);
    assert_success(&source, &parsed.errors);

    let mut blocks = Vec::new();
    walk(NodeRef::from(parsed.file), |node, _| {
        let tree_type = node.tree_type();
        if matches!(
            tree_type,
            TreeType::IfBlockStatement
                | TreeType::ForBlockStatement
                | TreeType::ForEachBlockStatement
                | TreeType::DoBlockStatement
                | TreeType::WhileBlockStatement
                | TreeType::SelectBlockStatement
                | TreeType::TryBlockStatement
                | TreeType::UsingBlockStatement
                | TreeType::SyncLockBlockStatement
                | TreeType::WithBlockStatement
        ) {
            blocks.push(tree_type);
        }
    });
    assert!(blocks.contains(&TreeType::SelectBlockStatement));
    assert!(blocks.contains(&TreeType::UsingBlockStatement));
    assert_eq!(
        blocks
            .iter()
            .filter(|&&t| t == TreeType::DoBlockStatement)
            .count(),
        2
    );
}

#[test]
fn test_members() {
    let source = TestHarness::new().load("members.vb");
    let arena = Bump::new();
    let parsed = parse_file(&source, &arena);
    assert_success(&source, &parsed.errors);

    let declarations = parsed.file.declarations();
    assert_eq!(declarations[1].tree_type(), TreeType::AttributeDeclaration);
    assert_eq!(declarations[2].tree_type(), TreeType::DelegateSubDeclaration);

    let account = types(declarations)[0];
    let kinds: Vec<TreeType> = account
        .members
        .declarations
        .iter()
        .map(Declaration::tree_type)
        .collect();
    assert_eq!(
        kinds,
        [
            TreeType::ImplementsDeclaration,
            TreeType::VariableListDeclaration,
            TreeType::EventDeclaration,
            TreeType::VariableListDeclaration,
            TreeType::CustomEventDeclaration,
            TreeType::PropertyDeclaration,
            TreeType::SubDeclaration,
            TreeType::FunctionDeclaration,
            TreeType::OperatorDeclaration,
            TreeType::SubDeclaration,
        ]
    );
}

#[test]
fn test_directives() {
    let source = TestHarness::new().load("directives.vb");
    let arena = Bump::new();
    let parsed = parse_file(&source, &arena);
    assert_success(&source, &parsed.errors);

    assert_eq!(parsed.tables.conditional_constants, ["DEBUG_BUILD"]);
    assert_eq!(parsed.tables.regions.len(), 1);
    assert_eq!(parsed.tables.regions[0].description, "Helpers");
    assert_eq!(parsed.tables.line_mappings.len(), 1);
    assert_eq!(parsed.tables.line_mappings[0].file, "page.aspx");
    assert_eq!(parsed.tables.line_mappings[0].line, 12);

    // Both conditional branches are parsed.
    let helpers = types(parsed.file.declarations())[0];
    assert_eq!(helpers.members.len(), 2);
}

#[test]
fn test_script() {
    let source = TestHarness::new().load("script.vbs");
    let arena = Bump::new();
    let parsed = parse_script(&source, &arena);
    assert_success(&source, &parsed.errors);

    let statements = parsed.script.statements();
    assert!(matches!(
        statements[0],
        Statement::Declaration(Declaration::Option(_))
    ));
    assert!(statements.iter().any(|s| s.tree_type() == TreeType::MidAssignmentStatement));
    assert!(statements.iter().any(|s| s.tree_type() == TreeType::LineIfStatement));
    assert!(statements.iter().any(|s| s.tree_type() == TreeType::WhileBlockStatement));

    let counts = NodeCounter::count(NodeRef::from(parsed.script));
    assert_eq!(counts.types, 1);
    assert_eq!(counts.properties, 2);
}

// =============================================================================
// Error Recovery
// =============================================================================

#[test]
fn test_error_recovery() {
    let source = TestHarness::new().load("errors.vb");
    let arena = Bump::new();
    let parsed = parse_file(&source, &arena);

    let errors = &parsed.errors;
    assert!(errors.contains(SyntaxErrorKind::ExpectedEndIf), "{errors}");
    assert!(errors.contains(SyntaxErrorKind::ConflictingParameterSpecifiers), "{errors}");
    assert!(errors.contains(SyntaxErrorKind::DuplicateModifier), "{errors}");
    assert!(errors.contains(SyntaxErrorKind::ExpectedEndClass), "{errors}");
    assert_eq!(errors.len(), 5, "{errors}");

    // Every method is still present after recovery.
    let counts = NodeCounter::count(NodeRef::from(parsed.file));
    assert_eq!(counts.methods, 4);
    assert_eq!(counts.types, 2);
}

#[test]
fn test_errors_are_in_source_order() {
    let source = TestHarness::new().load("errors.vb");
    let arena = Bump::new();
    let parsed = parse_file(&source, &arena);

    let starts: Vec<u32> = parsed.errors.iter().map(|e| e.span.start.index).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
}

// =============================================================================
// Facade
// =============================================================================

#[test]
fn test_strict_and_lenient_entry_points() {
    let arena = Bump::new();
    assert!(vbsyntax::parse("Module M\nEnd Module\n", &arena).is_ok());

    let errors = vbsyntax::parse("Module M\n", &arena).unwrap_err();
    assert_eq!(errors.kinds(), [SyntaxErrorKind::ExpectedEndModule]);

    let (file, errors) = vbsyntax::parse_lenient("Module M\n", &arena);
    assert_eq!(file.declarations().len(), 1);
    assert_eq!(errors.len(), 1);

    assert!(vbsyntax::parse_script("x = 1\nMsgBox x\n", &arena).is_ok());
    assert!(vbsyntax::parse_expression("a +", &arena).is_err());
}

#[test]
fn test_language_version() {
    let arena = Bump::new();
    let source = "Module M\nSub F()\nDim Continue As Integer\nContinue = 1\nEnd Sub\nEnd Module\n";

    let options = ScannerOptions::new().with_version(LanguageVersion::VisualBasic71);
    let (_, errors) = vbsyntax::parse_with_options(source, &arena, options);
    assert!(errors.is_empty(), "{errors}");

    let (_, errors) = vbsyntax::parse_with_options(source, &arena, ScannerOptions::default());
    assert!(!errors.is_empty());
}

#[test]
fn test_child_spans_nest_inside_parents() {
    let harness = TestHarness::new();
    for name in ["classes.vb", "control_flow.vb", "members.vb"] {
        let source = harness.load(name);
        let arena = Bump::new();
        let parsed = parse_file(&source, &arena);
        let root = NodeRef::from(parsed.file);
        let parents = ParentMap::build(root);

        walk(root, |node, _| {
            if let Some(parent) = parents.parent(node) {
                assert!(
                    parent.span().contains(&node.span()),
                    "{name}: {:?} {:?} escapes {:?} {:?}",
                    node.tree_type(),
                    node.span(),
                    parent.tree_type(),
                    parent.span(),
                );
            }
        });
    }
}

#[test]
fn test_parent_map() {
    let source = TestHarness::new().load("hello_world.vb");
    let arena = Bump::new();
    let parsed = parse_file(&source, &arena);
    let root = NodeRef::from(parsed.file);
    let parents = ParentMap::build(root);

    let mut deepest = None;
    walk(root, |node, depth| {
        if deepest.is_none_or(|(_, d)| depth > d) {
            deepest = Some((node, depth));
        }
    });
    let (node, depth) = deepest.expect("tree has nodes");
    let ancestors: Vec<_> = parents.ancestors(node).collect();
    assert_eq!(ancestors.len(), depth);
    assert!(ancestors.last().is_some_and(|top| top.same_node(root)));
}
