//! Test harness for parsing the sample sources in `test_scripts/`.
//!
//! Each test owns its arena and source text; the harness parses into that
//! arena and offers helpers for checking diagnostics and counting nodes.

#![allow(dead_code)]

use bumpalo::Bump;
use std::fs;
use std::path::PathBuf;
use vbsyntax::ast::{self, NodeRef, TreeType, walk};
use vbsyntax::{DirectiveTables, File, Scanner, ScriptBlock, SyntaxErrors};

/// Loads sources from the `test_scripts` directory.
pub struct TestHarness {
    test_scripts_dir: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let test_scripts_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_scripts");
        Self { test_scripts_dir }
    }

    /// Read a sample source file.
    pub fn load(&self, filename: &str) -> String {
        let path = self.test_scripts_dir.join(filename);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
    }
}

/// A parsed file with everything the parser reported.
pub struct ParsedFile<'ast> {
    pub file: &'ast File<'ast>,
    pub errors: SyntaxErrors,
    pub tables: DirectiveTables,
}

/// A parsed script with everything the parser reported.
pub struct ParsedScript<'ast> {
    pub script: &'ast ScriptBlock<'ast>,
    pub errors: SyntaxErrors,
}

pub fn parse_file<'ast>(source: &str, arena: &'ast Bump) -> ParsedFile<'ast> {
    let mut errors = SyntaxErrors::new();
    let mut tables = DirectiveTables::new();
    let file = ast::parse_file_with_tables(Scanner::new(source, arena), &mut errors, &mut tables);
    ParsedFile {
        file: arena.alloc(file),
        errors,
        tables,
    }
}

pub fn parse_script<'ast>(source: &str, arena: &'ast Bump) -> ParsedScript<'ast> {
    let mut errors = SyntaxErrors::new();
    let script = ast::parse_script_file(Scanner::new(source, arena), &mut errors);
    ParsedScript {
        script: arena.alloc(script),
        errors,
    }
}

/// Panic with every error if `errors` is not empty.
pub fn assert_success(source: &str, errors: &SyntaxErrors) {
    if !errors.is_empty() {
        eprintln!("Source:\n{source}");
        eprintln!("\nErrors:");
        for error in errors.iter() {
            eprintln!("{}", error.display_with_source(source));
        }
        panic!("Expected successful parse, but got {} errors", errors.len());
    }
}

/// Counts of selected node kinds in a tree.
#[derive(Debug, Default)]
pub struct NodeCounter {
    pub types: usize,
    pub methods: usize,
    pub properties: usize,
    pub statements: usize,
    pub expressions: usize,
    pub bad: usize,
}

impl NodeCounter {
    pub fn count(root: NodeRef<'_>) -> Self {
        let mut counter = Self::default();
        walk(root, |node, _| {
            let tree_type = node.tree_type();
            match tree_type {
                TreeType::ClassDeclaration
                | TreeType::StructureDeclaration
                | TreeType::ModuleDeclaration
                | TreeType::InterfaceDeclaration
                | TreeType::EnumDeclaration => counter.types += 1,
                TreeType::SubDeclaration
                | TreeType::FunctionDeclaration
                | TreeType::ConstructorDeclaration => counter.methods += 1,
                TreeType::PropertyDeclaration => counter.properties += 1,
                _ => {}
            }
            if tree_type.is_statement() {
                counter.statements += 1;
            }
            if tree_type.is_expression() {
                counter.expressions += 1;
            }
            if node.is_bad() {
                counter.bad += 1;
            }
        });
        counter
    }
}
