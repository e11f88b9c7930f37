//! Performance benchmarks for skeleton pruning.
//!
//! Run with: `cargo bench --bench pruning`
//!
//! ## Workloads
//!
//! | Benchmark | Shape | Stresses |
//! |-----------|-------|----------|
//! | `comb` | spine with one tooth per vertex | contraction rounds |
//! | `grid` | lattice with pendant branches | burn and core collapse |
//! | `forest` | many small stars | per-component overhead |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use skeleton_significance::{Point2, SkeletonGraph, SkeletonInput, SkeletonPruner, PruningPolicy};

/// Spine of `n` vertices, each with a tooth of varying length.
fn comb(n: usize) -> SkeletonInput {
    let mut points = Vec::with_capacity(2 * n);
    let mut edges = Vec::with_capacity(2 * n);
    let mut angles = Vec::with_capacity(2 * n);
    for i in 0..n {
        points.push(Point2::new(i as f64, 0.0));
        points.push(Point2::new(i as f64, 1.0 + (i % 5) as f64 * 0.3));
        edges.push([2 * i, 2 * i + 1]);
        angles.push(0.2 + (i % 7) as f64 * 0.2);
        if i > 0 {
            edges.push([2 * (i - 1), 2 * i]);
            angles.push(1.2);
        }
    }
    SkeletonInput::new(points, edges, angles)
}

/// `side x side` lattice with a pendant branch on every boundary vertex.
fn grid(side: usize) -> SkeletonInput {
    let id = |x: usize, y: usize| y * side + x;
    let mut points: Vec<Point2> = (0..side * side)
        .map(|i| Point2::new((i % side) as f64, (i / side) as f64))
        .collect();
    let mut edges = Vec::new();
    for y in 0..side {
        for x in 0..side {
            if x + 1 < side {
                edges.push([id(x, y), id(x + 1, y)]);
            }
            if y + 1 < side {
                edges.push([id(x, y), id(x, y + 1)]);
            }
        }
    }
    for x in 0..side {
        points.push(Point2::new(x as f64, -1.5));
        edges.push([id(x, 0), points.len() - 1]);
    }
    let angles = (0..edges.len()).map(|i| 0.3 + (i % 11) as f64 * 0.1).collect();
    SkeletonInput::new(points, edges, angles)
}

/// `count` disjoint three-branch stars.
fn forest(count: usize) -> SkeletonInput {
    let mut points = Vec::with_capacity(4 * count);
    let mut edges = Vec::with_capacity(3 * count);
    for i in 0..count {
        let cx = (i * 10) as f64;
        let center = points.len();
        points.push(Point2::new(cx, 0.0));
        points.push(Point2::new(cx + 1.0, 0.0));
        points.push(Point2::new(cx, 2.0));
        points.push(Point2::new(cx - 3.0, 0.0));
        edges.extend([[center, center + 1], [center, center + 2], [center, center + 3]]);
    }
    let angles = (0..edges.len()).map(|i| 0.4 + (i % 3) as f64 * 0.3).collect();
    SkeletonInput::new(points, edges, angles)
}

/// Benchmark the full pipeline on growing combs.
fn bench_comb(c: &mut Criterion) {
    let pruner = SkeletonPruner::default();
    let mut group = c.benchmark_group("comb");

    for n in [16, 64, 256] {
        let input = comb(n);
        group.throughput(Throughput::Elements(input.num_edges() as u64));
        group.bench_with_input(BenchmarkId::new("teeth", n), &input, |b, input| {
            b.iter(|| pruner.prune(black_box(input)))
        });
    }

    group.finish();
}

/// Benchmark core detection and tree construction on lattices.
fn bench_grid(c: &mut Criterion) {
    let policy = PruningPolicy::default();
    let mut group = c.benchmark_group("grid");

    for side in [8, 16, 32] {
        let input = grid(side);
        group.throughput(Throughput::Elements(input.num_edges() as u64));
        group.bench_with_input(BenchmarkId::new("burn_and_tree", side), &input, |b, input| {
            b.iter(|| {
                let graph = SkeletonGraph::build(black_box(input), &policy).ok();
                graph.map(|g| g.to_components().iter().map(|c| c.to_junction_tree().num_nodes()).sum::<usize>())
            })
        });
    }

    group.finish();
}

/// Benchmark many small components.
fn bench_forest(c: &mut Criterion) {
    let pruner = SkeletonPruner::default();
    let mut group = c.benchmark_group("forest");

    for count in [10, 100, 1000] {
        let input = forest(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("stars", count), &input, |b, input| {
            b.iter(|| pruner.prune(black_box(input)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_comb, bench_grid, bench_forest);
criterion_main!(benches);
