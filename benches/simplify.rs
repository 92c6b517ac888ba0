//! Benchmarks for the icon compilation pipeline.
//!
//! Run with: cargo bench

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use ikona::{CompileOptions, Compiler, dom, simplify_svg};

/// A representative icon: styled, grouped, transformed, with some noise
/// for the pipeline to chew through.
const ICON: &str = r##"<svg viewBox="0 0 512 512">
  <style>.accent { fill: #e33; } .frame { stroke: #333; }</style>
  <defs><linearGradient id="bg"/></defs>
  <title>gauge</title>
  <g transform="translate(16 16)">
    <rect class="frame" x="0" y="0" width="480" height="480"/>
    <circle class="accent" cx="240" cy="240" r="120"/>
  </g>
  <g>
    <path fill="#e33" d="M240 120 L 260 240 L 240 250 L 220 240 Z"/>
    <path fill="#e33" d="M 230 330 h 20 v 20 h -20 z"/>
  </g>
  <path d="M-900 -900L-910 -910"/>
</svg>"##;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_svg", |b| {
        b.iter(|| dom::parse_svg(black_box(ICON)).unwrap());
    });
}

fn bench_simplify(c: &mut Criterion) {
    c.bench_function("simplify_svg", |b| {
        b.iter(|| simplify_svg(black_box(ICON)).unwrap());
    });
}

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile_icon", |b| {
        let mut compiler = Compiler::new(CompileOptions::default());
        b.iter(|| compiler.compile("bench/gauge.svg", black_box(ICON)).unwrap());
    });
}

criterion_group!(benches, bench_parse, bench_simplify, bench_compile);
criterion_main!(benches);
