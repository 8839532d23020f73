//! Performance benchmarks for the Visual Basic scanner and parser.
//!
//! This benchmark suite measures:
//! - Scanning alone versus scanning plus parsing
//! - Feature-specific sample files from `test_scripts/`
//! - Synthetic modules of growing size
//! - Script mode and error recovery
//!
//! ## Profiling with Puffin
//!
//! With the `profile-with-puffin` feature the size-based group records the
//! instrumented scanner and parser functions and prints average time per
//! scope when it finishes:
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- "file_sizes"
//! ```

use bumpalo::Bump;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::fmt::Write;
use std::hint::black_box;
use vbsyntax::{Scanner, parse_lenient, parse_script_lenient};

const HELLO_WORLD: &str = include_str!("../test_scripts/hello_world.vb");
const CLASSES: &str = include_str!("../test_scripts/classes.vb");
const CONTROL_FLOW: &str = include_str!("../test_scripts/control_flow.vb");
const MEMBERS: &str = include_str!("../test_scripts/members.vb");
const DIRECTIVES: &str = include_str!("../test_scripts/directives.vb");
const SCRIPT: &str = include_str!("../test_scripts/script.vbs");
const ERRORS: &str = include_str!("../test_scripts/errors.vb");

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

/// Add the duration of `scope` and everything nested in it to `totals`.
#[cfg(feature = "profile-with-puffin")]
fn accumulate_scope(
    stream: &puffin::Stream,
    scope: &puffin::Scope,
    scopes: &puffin::ScopeCollection,
    totals: &mut std::collections::HashMap<String, i64>,
) {
    if let Some(details) = scopes.fetch_by_id(&scope.id) {
        *totals.entry(details.name().to_string()).or_insert(0) += scope.record.duration_ns;
    }
    if scope.child_begin_position >= scope.child_end_position {
        return;
    }
    let children = puffin::Reader::with_offset(stream, scope.child_begin_position)
        .ok()
        .and_then(|reader| reader.read_top_scopes().ok())
        .unwrap_or_default();
    for child in &children {
        accumulate_scope(stream, child, scopes, totals);
    }
}

#[cfg(feature = "profile-with-puffin")]
fn print_profiling_stats() {
    let Some(frame_view) = FRAME_VIEW.get() else {
        return;
    };
    let view = frame_view.lock();
    let scopes = view.scope_collection();

    let mut totals = std::collections::HashMap::new();
    let mut frames = 0i64;
    for frame in view.recent_frames() {
        let Ok(unpacked) = frame.unpacked() else {
            continue;
        };
        frames += 1;
        for stream_info in unpacked.thread_streams.values() {
            let reader = puffin::Reader::from_start(&stream_info.stream);
            for scope in reader.read_top_scopes().unwrap_or_default() {
                accumulate_scope(&stream_info.stream, &scope, scopes, &mut totals);
            }
        }
    }

    let mut entries: Vec<(String, i64)> = totals.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    println!("\n=== Parser scopes ({frames} frames) ===");
    for (name, ns) in entries {
        let average = std::time::Duration::from_nanos((ns / frames.max(1)) as u64);
        println!("  {name:40} {average:>10.2?} avg");
    }
}

#[cfg(not(feature = "profile-with-puffin"))]
fn print_profiling_stats() {}

/// A module with `methods` procedures, each holding a small loop.
fn synthetic_module(methods: usize) -> String {
    let mut source = String::from("Option Strict On\nImports System\n\nModule Generated\n");
    for i in 0..methods {
        let _ = write!(
            source,
            "    Public Function Compute{i}(ByVal n As Integer) As Integer\n\
             \x20       Dim total As Integer = 0\n\
             \x20       For k As Integer = 1 To n\n\
             \x20           If k Mod 2 = 0 Then total += k * {i} Else total -= 1\n\
             \x20       Next\n\
             \x20       Return total\n\
             \x20   End Function\n\n"
        );
    }
    source.push_str("End Module\n");
    source
}

fn scanner_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner");

    for (name, source) in [("classes", CLASSES), ("control_flow", CONTROL_FLOW)] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                let arena = Bump::new();
                let tokens = Scanner::new(black_box(source), &arena).read_to_end();
                black_box(tokens.len())
            });
        });
    }

    group.finish();
}

fn feature_specific_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser/features");

    for (name, source) in [
        ("hello_world", HELLO_WORLD),
        ("classes", CLASSES),
        ("control_flow", CONTROL_FLOW),
        ("members", MEMBERS),
        ("directives", DIRECTIVES),
    ] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                let arena = Bump::new();
                let (file, _) = parse_lenient(black_box(source), &arena);
                black_box(file.declarations().len())
            });
        });
    }

    group.finish();
}

fn size_based_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let mut group = c.benchmark_group("parser/file_sizes");

    for methods in [10, 100, 1000] {
        let source = synthetic_module(methods);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_function(format!("{methods}_methods"), |b| {
            b.iter(|| {
                let arena = Bump::new();
                let (file, _) = parse_lenient(black_box(&source), &arena);
                let count = file.declarations().len();
                end_profiling_frame();
                black_box(count)
            });
        });
    }

    group.finish();
    print_profiling_stats();
}

fn mode_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser/modes");

    group.throughput(Throughput::Bytes(SCRIPT.len() as u64));
    group.bench_function("script", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let (script, _) = parse_script_lenient(black_box(SCRIPT), &arena);
            black_box(script.statements().len())
        });
    });

    // Recovery cost on a file with several syntax errors.
    group.throughput(Throughput::Bytes(ERRORS.len() as u64));
    group.bench_function("error_recovery", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let (file, errors) = parse_lenient(black_box(ERRORS), &arena);
            black_box((file.declarations().len(), errors.len()))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    scanner_benchmarks,
    feature_specific_benchmarks,
    size_based_benchmarks,
    mode_benchmarks
);
criterion_main!(benches);
