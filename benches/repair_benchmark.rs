use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use go125_repair::{parse_file, repair, ParseMode, PositionSpace, RepairOptions, SourceBuffer};
use std::hint::black_box as bb;

const CLEAN: &str = r#"
package geometry

type Point struct {
    X, Y float64
}

func (p Point) Abs() float64 {
    return sqrt(p.X*p.X + p.Y*p.Y)
}

func (p *Point) Scale(f float64) {
    p.X = p.X * f
    p.Y = p.Y * f
}

func Sum(ps []Point) (out Point) {
    for _, p := range ps {
        out.X += p.X
        out.Y += p.Y
    }
    return
}
"#;

// Mid-edit: missing braces, dangling dots, a bare slice type.
const EDITING: &str = r#"
package geometry

import "fmt"

func (p *Point) Scale(f float64) {
    if f == 0
    p.X = p.X * f
    defer fmt.
    xs := []Point
    switch {
    cas
    }
}

func Sum(ps []Point) (out Point) {
    for _, p := range ps {
        out.
    }
    return
}
"#;

fn repeated(src: &str, n: usize) -> String {
    let body = src.trim_start().strip_prefix("package geometry").unwrap_or(src);
    let mut out = String::from("package geometry\n");
    for _ in 0..n {
        out.push_str(body);
    }
    out
}

fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean");
    for &n in &[1usize, 16, 128] {
        let input = repeated(CLEAN, n);
        group.throughput(Throughput::Bytes(input.len() as u64));

        group.bench_with_input(BenchmarkId::new("parse_file", n), &input, |b, input| {
            let buf = SourceBuffer::from_text(input.as_str());
            b.iter(|| bb(parse_file(bb(&buf), ParseMode::FULL)));
        });

        group.bench_with_input(BenchmarkId::new("repair", n), &input, |b, input| {
            let space = PositionSpace::shared();
            let options = RepairOptions::default();
            b.iter(|| bb(repair(&space, "clean.go", bb(input.as_bytes()), &options)));
        });
    }
    group.finish();
}

fn bench_editing(c: &mut Criterion) {
    let mut group = c.benchmark_group("editing");
    for &n in &[1usize, 16] {
        let input = repeated(EDITING, n);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("repair", n), &input, |b, input| {
            let space = PositionSpace::shared();
            let options = RepairOptions::default();
            b.iter(|| bb(repair(&space, "editing.go", bb(input.as_bytes()), &options)));
        });
    }

    let input = repeated(CLEAN, 64);
    group.bench_function("purge_func_bodies", |b| {
        let space = PositionSpace::shared();
        let options = RepairOptions::default().purging_func_bodies();
        b.iter(|| bb(repair(&space, "purged.go", bb(input.as_bytes()), &options)));
    });
    group.finish();
}

criterion_group!(benches, bench_clean, bench_editing);
criterion_main!(benches);
