//! Render benchmark: full versus partial compositor passes and frame diffs.
//!
//! Target: a partial pass for a single keystroke far below a full 200x50 pass.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use weave::present::{render_diff, render_full, DiffState, OutputBuffer};
use weave::widgets::{Panel, PanelLayout, TextInput};
use weave::{Buffer, Cell, Compositor, CompositorConfig, KeyCode, KeyEvent, Rect, Rgb, Style};

/// A panel of `rows` text inputs filling a `width`x`height` surface.
fn build_compositor(width: u16, height: u16, rows: usize) -> (Compositor, weave::WidgetId) {
    let compositor = Compositor::new(width, height, CompositorConfig::default());
    let mut panel = Panel::new(Rect::ZERO).bordered(true).layout(PanelLayout::Rows, true);
    for _ in 0..rows {
        panel.push(TextInput::new(Rect::ZERO));
    }
    let root = compositor.set_root(panel);
    compositor.focus(root);
    compositor.render();
    (compositor, root)
}

fn compositor_full_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("compositor_full_pass");

    for (width, height) in [(80, 24), (200, 50)] {
        let (compositor, _) = build_compositor(width, height, 8);
        group.bench_with_input(BenchmarkId::new("panel_8_inputs", format!("{width}x{height}")), &compositor, |b, compositor| {
            b.iter(|| {
                // An empty dirty list means a full pass.
                black_box(compositor.render())
            });
        });
    }

    group.finish();
}

fn compositor_keystroke_pass(c: &mut Criterion) {
    let (compositor, _) = build_compositor(200, 50, 8);
    let key = KeyEvent::new(KeyCode::Char('x'));
    let backspace = KeyEvent::new(KeyCode::Backspace);

    c.bench_function("compositor_keystroke_200x50", |b| {
        b.iter(|| {
            compositor.handle_key(black_box(&key));
            let typed = compositor.render();
            compositor.handle_key(&backspace);
            black_box((typed, compositor.render()))
        });
    });
}

/// A buffer with varied content and colors.
fn create_test_buffer(width: u16, height: u16, seed: u8) -> Buffer {
    let mut buffer = Buffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let symbol = char::from(b'A' + ((x + y + u16::from(seed)) % 26) as u8);
            let style = Style::new(
                Rgb::new((x * 3 % 256) as u8, (y * 7 % 256) as u8, seed),
                Rgb::new(20, 20, 30),
            );
            buffer.set(i32::from(x), i32::from(y), Cell::styled(symbol, style));
        }
    }
    buffer
}

fn diff_damaged_region(c: &mut Criterion) {
    let current = create_test_buffer(200, 50, 0);
    let next = create_test_buffer(200, 50, 1);
    let region = [Rect::new(10, 10, 60, 3)];
    let whole = [current.area()];

    c.bench_function("diff_200x50_region_only", |b| {
        b.iter(|| {
            let mut out = OutputBuffer::new();
            render_diff(black_box(&current), black_box(&next), &region, &mut out, &mut DiffState::new())
        });
    });

    c.bench_function("diff_200x50_whole_surface", |b| {
        b.iter(|| {
            let mut out = OutputBuffer::new();
            render_diff(black_box(&current), black_box(&next), &whole, &mut out, &mut DiffState::new())
        });
    });
}

fn full_redraw(c: &mut Criterion) {
    let buffer = create_test_buffer(200, 50, 0);

    c.bench_function("render_full_200x50", |b| {
        b.iter(|| {
            let mut out = OutputBuffer::with_capacity(65536);
            render_full(black_box(&buffer), &mut out, &mut DiffState::new())
        });
    });
}

criterion_group!(
    benches,
    compositor_full_pass,
    compositor_keystroke_pass,
    diff_damaged_region,
    full_redraw,
);
criterion_main!(benches);
