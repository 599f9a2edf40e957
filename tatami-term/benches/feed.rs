//! End-to-end feed throughput: bytes in, screen state out

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tatami_term::Terminal;

fn bench_scrolling_log(c: &mut Criterion) {
    let mut group = c.benchmark_group("feed");

    let log_output = "2024-01-01T00:00:00Z \x1b[32mINFO\x1b[0m request handled in 12ms\r\n".repeat(500);
    group.throughput(Throughput::Bytes(log_output.len() as u64));

    group.bench_function("scrolling_log", |b| {
        b.iter(|| {
            let mut term = Terminal::new(80, 24);
            term.feed(black_box(log_output.as_bytes()));
            black_box(term.buffer().cursor.row)
        })
    });

    group.finish();
}

fn bench_tui_repaint(c: &mut Criterion) {
    let mut group = c.benchmark_group("feed");

    // A full-screen repaint the way a TUI does it: home, then per-cell
    // addressing with style changes
    let mut frame = String::from("\x1b[H");
    for row in 1..=24 {
        frame.push_str(&format!("\x1b[{};1H\x1b[7m {:>3} \x1b[0m", row, row));
        frame.push_str(&"x".repeat(70));
    }
    let frame = frame.repeat(20);
    group.throughput(Throughput::Bytes(frame.len() as u64));

    group.bench_function("tui_repaint", |b| {
        b.iter(|| {
            let mut term = Terminal::new(80, 24);
            term.feed(black_box(frame.as_bytes()));
            black_box(term.buffer().cursor.col)
        })
    });

    group.finish();
}

fn bench_wide_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("feed");

    let text = "混合の日本語テキストと ASCII text interleaved. ".repeat(300);
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("wide_text", |b| {
        b.iter(|| {
            let mut term = Terminal::new(80, 24);
            term.feed(black_box(text.as_bytes()));
            black_box(term.buffer().cursor.col)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_scrolling_log, bench_tui_repaint, bench_wide_text);
criterion_main!(benches);
