use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use geno_core::{Coordinate, Cursor, Document, EditorConfig, SearchInstance, SearchOptions};
use std::sync::Arc;

/// C++ source of `line_count` lines: small functions with tab-indented bodies.
fn cpp_source(line_count: usize) -> String {
    const BODY: [&str; 4] = [
        "\tint lazy = value * 3 + offset;",
        "\tif (lazy > limit) { return lazy; }",
        "\t// the quick brown fox jumps over the lazy dog",
        "\treturn lazy - limit;",
    ];
    (0..line_count)
        .map(|i| match i % 6 {
            0 => format!("int step_{i}(int value, int offset, int limit) {{"),
            5 => "}".to_string(),
            k => BODY[k - 1].to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_large_file_open(c: &mut Criterion) {
    let text = cpp_source(50_000);
    c.bench_function("large_file_open/50k_lines", |b| {
        b.iter(|| {
            let doc = Document::new(black_box(&text), EditorConfig::default());
            black_box(doc.buffer().line_count());
        })
    });
}

fn bench_typing_in_middle(c: &mut Criterion) {
    let text = cpp_source(50_000);
    c.bench_function("typing_middle/100_chars", |b| {
        b.iter_batched(
            || {
                let mut doc = Document::new(&text, EditorConfig::default());
                doc.set_cursor(Coordinate::new(10, 25_000));
                doc
            },
            |mut doc| {
                for _ in 0..100 {
                    doc.insert_char('x');
                }
                black_box(doc.buffer().line_len(25_000));
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_multi_cursor_typing(c: &mut Criterion) {
    let text = cpp_source(5_000);
    c.bench_function("multi_cursor_typing/1000_cursors", |b| {
        b.iter_batched(
            || {
                let mut doc = Document::new(&text, EditorConfig::default());
                let cursors = (0..1_000)
                    .map(|y| Cursor::at(Coordinate::new(7, y * 5)))
                    .collect();
                doc.cursors_mut().set_all(cursors);
                doc
            },
            |mut doc| {
                for ch in "typed".chars() {
                    doc.insert_char(ch);
                }
                doc.enter();
                black_box(doc.cursors().len());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_background_search(c: &mut Criterion) {
    let doc = Document::new(&cpp_source(50_000), EditorConfig::default());
    let snapshot: Arc<[String]> = doc.buffer().snapshot();
    for workers in [1, 4] {
        c.bench_function(&format!("search/50k_lines/{workers}_workers"), |b| {
            b.iter(|| {
                let mut search = SearchInstance::start(
                    Arc::clone(&snapshot),
                    black_box("lazy"),
                    SearchOptions::default(),
                    workers,
                )
                .unwrap();
                search.wait();
                black_box(search.with_results(|r| r.len()));
            })
        });
    }
}

criterion_group!(
    benches,
    bench_large_file_open,
    bench_typing_in_middle,
    bench_multi_cursor_typing,
    bench_background_search
);
criterion_main!(benches);
