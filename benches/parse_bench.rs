use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mcinstr::{parse_instrument, InstrScanner};

const TRIPLE_AXIS: &str = include_str!("../tests/fixtures/triple_axis.instr");

/// Build an instrument with `n` chained components
fn generated_instrument(n: usize) -> String {
    let mut source = String::from(
        "DEFINE INSTRUMENT Chain(double L = 1, int n = 3)\n\
         DECLARE %{ double a, b = 2; %}\n\
         TRACE\n\
         COMPONENT c0 = Progress_bar() AT (0, 0, 0) ABSOLUTE\n",
    );
    for i in 1..n {
        source.push_str(&format!(
            "COMPONENT c{i} = Slit(xwidth = 0.01 * {i}, yheight = L / {i})\n  \
             WHEN (n > {i})\n  \
             AT (0, 0, L) RELATIVE c{prev}\n  \
             ROTATED (0, {i}, 0) RELATIVE c{prev}\n  \
             EXTEND %{{ if (SCATTERED) b += {i}; %}}\n",
            i = i,
            prev = i - 1
        ));
    }
    source.push_str("END\n");
    source
}

/// Benchmark scanning alone against scanning plus parsing
fn bench_fixture(c: &mut Criterion) {
    let mut group = c.benchmark_group("triple_axis");

    group.bench_function("scan", |b| {
        b.iter(|| black_box(InstrScanner::new(TRIPLE_AXIS).scan_tokens().unwrap()))
    });
    group.bench_function("parse", |b| {
        b.iter(|| black_box(parse_instrument(TRIPLE_AXIS).unwrap()))
    });

    group.finish();
}

/// Benchmark parsing as the trace grows
fn bench_trace_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace_length");

    for size in [10, 100, 1000].iter() {
        let source = generated_instrument(*size);
        group.bench_with_input(BenchmarkId::new("parse", size), &source, |b, source| {
            b.iter(|| black_box(parse_instrument(source).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fixture, bench_trace_length);
criterion_main!(benches);
