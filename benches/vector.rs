use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use riesz::{ScaledVector, Vector};

fn data(n: usize) -> (Vec<f64>, Vec<f64>) {
    let x = (0..n).map(|i| (i as f64 * 0.37).sin()).collect();
    let y = (0..n).map(|i| (i as f64 * 0.11).cos()).collect();
    (x, y)
}

fn bench_axpy(c: &mut Criterion) {
    let mut group = c.benchmark_group("axpy");
    for n in [100, 10_000, 1_000_000] {
        let (x, y) = data(n);
        let weights: Arc<[f64]> = Arc::from(vec![2.0; n]);
        let sx = ScaledVector::primal(x.clone(), Arc::clone(&weights));
        let sy = ScaledVector::primal(y.clone(), weights);

        group.bench_with_input(BenchmarkId::new("vec", n), &n, |b, _| {
            let mut z = x.clone();
            b.iter(|| z.axpy(black_box(0.5), black_box(&y)))
        });
        group.bench_with_input(BenchmarkId::new("scaled", n), &n, |b, _| {
            let mut z = sx.clone();
            b.iter(|| z.axpy(black_box(0.5), black_box(&sy)))
        });
    }
    group.finish();
}

fn bench_dot(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot");
    for n in [100, 10_000, 1_000_000] {
        let (x, y) = data(n);
        let weights: Arc<[f64]> = Arc::from(vec![2.0; n]);
        let sx = ScaledVector::primal(x.clone(), Arc::clone(&weights));
        let sy = ScaledVector::primal(y.clone(), weights);

        group.bench_with_input(BenchmarkId::new("vec", n), &n, |b, _| {
            b.iter(|| black_box(&x).dot(black_box(&y)))
        });
        group.bench_with_input(BenchmarkId::new("scaled", n), &n, |b, _| {
            b.iter(|| black_box(&sx).dot(black_box(&sy)))
        });
        group.bench_with_input(BenchmarkId::new("scaled_dual", n), &n, |b, _| {
            b.iter(|| black_box(&sx).dual())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_axpy, bench_dot);
criterion_main!(benches);
