//! Region algebra and stroke expansion benchmarks
//!
//! Run with: cargo bench --bench region_ops

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use plusgeom::{
    Color, CombineMode, DashStyle, LineJoin, Matrix, Path, Pen, PointF, RectangleF, Region,
};

fn staircase(n: usize) -> Region {
    let mut region = Region::empty();
    for i in 0..n {
        let r = RectangleF::new(i as f64 * 7.0, i as f64 * 5.0, 20.0, 20.0);
        let _ = region.union(r);
    }
    region
}

fn zigzag(n: usize) -> Path {
    let points: Vec<PointF> = (0..n)
        .map(|i| PointF::new(i as f64 * 10.0, if i % 2 == 0 { 0.0 } else { 15.0 }))
        .collect();
    let mut path = Path::new();
    let _ = path.add_lines(&points);
    path
}

fn region_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("region");

    for n in [4usize, 16, 64] {
        group.bench_with_input(BenchmarkId::new("union_rects", n), &n, |b, &n| {
            b.iter(|| black_box(staircase(n)).area())
        });
    }

    group.bench_function("xor_ellipses", |b| {
        let mut a = Path::new();
        let _ = a.add_ellipse(RectangleF::new(0.0, 0.0, 100.0, 60.0));
        let mut e = Path::new();
        let _ = e.add_ellipse(RectangleF::new(40.0, 10.0, 100.0, 60.0));
        b.iter(|| {
            let mut r = Region::from_path(&a);
            let _ = r.combine(&e, CombineMode::Xor);
            black_box(r.area())
        })
    });

    group.bench_function("scans", |b| {
        let region = staircase(16);
        let _ = region.area();
        b.iter(|| black_box(region.get_region_scans(&Matrix::identity())).len())
    });

    group.finish();
}

fn stroke_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("stroke");

    let path = zigzag(50);
    let mut pen = Pen::new(Color::BLACK, 4.0).expect("pen");
    let _ = pen.set_line_join(LineJoin::Round);

    group.bench_function("solid_round_join", |b| {
        b.iter(|| black_box(path.widen(&pen)).map(|p| p.point_count()))
    });

    let mut dashed = pen.clone();
    let _ = dashed.set_dash_style(DashStyle::DashDot);
    group.bench_function("dashed_region", |b| {
        b.iter(|| black_box(plusgeom::Engine::default().stroke(&path, &dashed)).map(|r| r.area()))
    });

    group.finish();
}

criterion_group!(benches, region_benchmarks, stroke_benchmarks);
criterion_main!(benches);
