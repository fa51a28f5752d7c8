//! Trajectory-entropy pipeline benchmarks.
//!
//! Measures each stage on dense chains of increasing size:
//! - local entropy (O(n²))
//! - stationary distribution (eigen-decomposition plus SVD)
//! - trajectory entropy (adds one LU solve with n right-hand sides)
//!
//! Usage:
//! - `cargo bench -p trajentropy-bench --bench trajectory_bench`
//!
//! Output:
//! - Machine-readable `TRAJECTORY_BENCH ... p50_ns_op=...` lines for perf gating.

use std::cell::RefCell;
use std::time::{Duration, Instant};

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use trajentropy_bench::dense_chain;
use trajentropy_core::{
    DMatrix, Tolerances, ValidationLevel, local_entropy_with, stationary_distribution_with,
    trajectory_entropy_with,
};

const SIZES: [usize; 4] = [4, 16, 64, 128];

#[derive(Default)]
struct BenchStats {
    samples_ns_per_op: Vec<f64>,
}

impl BenchStats {
    fn record(&mut self, iters: u64, dur: Duration) {
        self.samples_ns_per_op
            .push(dur.as_nanos() as f64 / iters.max(1) as f64);
    }

    fn report(&self, stage: &str, n: usize) {
        let mut samples = self.samples_ns_per_op.clone();
        if samples.is_empty() {
            return;
        }
        samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        println!(
            "TRAJECTORY_BENCH stage={stage} n={n} samples={} p50_ns_op={:.3} p95_ns_op={:.3} mean_ns_op={mean:.3}",
            samples.len(),
            percentile_sorted(&samples, 0.50),
            percentile_sorted(&samples, 0.95),
        );
    }
}

fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() - 1) as f64 * p).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn bench_stage<F>(c: &mut Criterion, stage: &str, chains: &[(usize, DMatrix<f64>)], mut f: F)
where
    F: FnMut(&DMatrix<f64>),
{
    let mut group = c.benchmark_group(format!("trajectory_{stage}"));
    for (n, p) in chains {
        let stats = RefCell::new(BenchStats::default());
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), p, |b, p| {
            b.iter_custom(|iters| {
                let start = Instant::now();
                for _ in 0..iters {
                    f(black_box(p));
                }
                let dur = start.elapsed().max(Duration::from_nanos(1));
                stats.borrow_mut().record(iters, dur);
                dur
            });
        });
        stats.borrow().report(stage, *n);
    }
    group.finish();
}

fn bench_trajectory(c: &mut Criterion) {
    let tol = Tolerances::default();
    // Inputs are generated valid; skip re-validation to time the numerics.
    let level = ValidationLevel::Trusting;
    let chains: Vec<(usize, DMatrix<f64>)> = SIZES
        .iter()
        .map(|&n| (n, dense_chain(n, 0xDEAD_BEEF ^ n as u64)))
        .collect();

    bench_stage(c, "local_entropy", &chains, |p| {
        black_box(local_entropy_with(p, &tol, level).ok());
    });
    bench_stage(c, "stationary", &chains, |p| {
        black_box(stationary_distribution_with(p, &tol, level).ok());
    });
    bench_stage(c, "trajectory_entropy", &chains, |p| {
        black_box(trajectory_entropy_with(p, &tol, level).ok());
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_millis(200))
        .measurement_time(Duration::from_secs(2))
        .sample_size(20);
    targets = bench_trajectory
);
criterion_main!(benches);
