//! Benchmark suite for the task line codec.
//!
//! Covers the hot paths a board hits on every file refresh:
//! - Line classification
//! - Task parse and serialise
//! - Marker validation
//! - Whole-document scans
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! cargo bench -- --save-baseline main
//! cargo bench -- --baseline main
//! ```

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tasklane::{
    classify, validate_done_markers, BoardConfig, MarkerSet, Task, TaskContext, TaskDocument,
};

const LINES: [&str; 5] = [
    "- [ ] Something #tag #today",
    "\t- [x] Done with anchor #next-week ^anchor-1",
    "- [[Some Note]]",
    "plain paragraph text without a checkbox",
    "- [ ] Review [[Doc]] and [ext](https://example.com) #later #work ^review",
];

fn context() -> Arc<TaskContext> {
    Arc::new(BoardConfig::default().context().expect("default config is valid"))
}

/// Build a document with `size` lines cycling through the sample lines.
fn sample_document(size: usize) -> String {
    let mut text = String::with_capacity(size * 48);
    for i in 0..size {
        text.push_str(LINES[i % LINES.len()]);
        text.push('\n');
    }
    text
}

// ============================================================================
// Line Benchmarks
// ============================================================================

fn bench_classify(c: &mut Criterion) {
    let ignored = MarkerSet::ignored("-~").expect("valid markers");

    c.bench_function("classify_lines", |b| {
        b.iter(|| {
            for line in LINES {
                black_box(classify(black_box(line), &ignored));
            }
        });
    });
}

fn bench_parse_serialise(c: &mut Criterion) {
    let ctx = context();
    let mut group = c.benchmark_group("task_codec");

    let line = LINES[4];
    group.bench_function("parse", |b| {
        b.iter(|| black_box(Task::parse(black_box(line), "bench.md", 0, &ctx)));
    });

    let task = Task::parse(line, "bench.md", 0, &ctx).expect("task line");
    group.bench_function("serialise", |b| {
        b.iter(|| black_box(task.serialise()));
    });

    group.bench_function("archive_serialise", |b| {
        b.iter(|| {
            let mut task = task.clone();
            task.archive();
            black_box(task.serialise())
        });
    });

    group.finish();
}

fn bench_marker_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("marker_validation");

    for markers in ["xX", "xX✓🚀✅-~/>", "x x\tX\u{7}x"] {
        group.bench_with_input(BenchmarkId::from_parameter(markers), &markers, |b, m| {
            b.iter(|| black_box(validate_done_markers(black_box(m))));
        });
    }

    group.finish();
}

// ============================================================================
// Document Benchmarks
// ============================================================================

fn bench_document_scan(c: &mut Criterion) {
    let ctx = context();
    let mut group = c.benchmark_group("document_scan");

    for size in [100, 1_000, 10_000] {
        let text = sample_document(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("tasks", size), &text, |b, text| {
            b.iter(|| {
                let doc = TaskDocument::new("bench.md", black_box(text));
                black_box(doc.tasks(&ctx))
            });
        });
        group.bench_with_input(BenchmarkId::new("render", size), &text, |b, text| {
            let doc = TaskDocument::new("bench.md", text);
            b.iter(|| black_box(doc.render()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_classify,
    bench_parse_serialise,
    bench_marker_validation,
    bench_document_scan
);
criterion_main!(benches);
