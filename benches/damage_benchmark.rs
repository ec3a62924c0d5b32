//! Damage benchmark: rectangle merging and invalidation throughput.
//!
//! Target: merging a few hundred scattered rects well under a frame budget.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use weave::{merge_rects, DamageTracker, Rect};

/// Scattered, partly overlapping rectangles on a 200x50 surface.
fn scattered_rects(count: i32) -> Vec<Rect> {
    (0..count)
        .map(|i| Rect::new((i * 37) % 190, (i * 13) % 45, 3 + i % 8, 1 + i % 4))
        .collect()
}

fn merge_disjoint(c: &mut Criterion) {
    let rects: Vec<Rect> = (0..50).map(|i| Rect::new((i % 10) * 20, (i / 10) * 10, 5, 3)).collect();

    c.bench_function("merge_50_disjoint", |b| {
        b.iter(|| merge_rects(black_box(rects.clone())));
    });
}

fn merge_typing_burst(c: &mut Criterion) {
    // One cell per keystroke along a single input line.
    let rects: Vec<Rect> = (0..80).map(|x| Rect::new(x, 10, 1, 1)).collect();

    c.bench_function("merge_80_adjacent_cells", |b| {
        b.iter(|| merge_rects(black_box(rects.clone())));
    });
}

fn merge_by_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_scattered");

    for count in [16, 64, 256] {
        let rects = scattered_rects(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &rects, |b, rects| {
            b.iter(|| merge_rects(black_box(rects.clone())));
        });
    }

    group.finish();
}

fn invalidate_and_take(c: &mut Criterion) {
    let tracker = DamageTracker::new();
    let rects = scattered_rects(64);

    c.bench_function("invalidate_64_then_take", |b| {
        b.iter(|| {
            for rect in &rects {
                tracker.invalidate(black_box(*rect));
            }
            tracker.take()
        });
    });
}

criterion_group!(benches, merge_disjoint, merge_typing_burst, merge_by_count, invalidate_and_take);
criterion_main!(benches);
