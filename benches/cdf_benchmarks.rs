//! CDF and chart layout benchmarks
//!
//! Sequence-level deviation lists reach ~100k waypoint observations for long
//! runs, so CDF building is the only part of a report worth timing.

#![allow(clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use waypoint_eval::cdf::{EmpiricalCdf, DEFAULT_BINS};
use waypoint_eval::chart::{CdfChart, CdfKind};

const SMALL_SIZE: usize = 1_000;
const LARGE_SIZE: usize = 100_000;

/// Deterministic deviations in [0, 5) with every 50th sample lost.
fn deviations(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            if i % 50 == 0 {
                f64::INFINITY
            } else {
                ((i * 7919) % 5000) as f64 / 1000.0
            }
        })
        .collect()
}

fn bench_from_samples(c: &mut Criterion) {
    let mut group = c.benchmark_group("empirical_cdf");

    for size in [SMALL_SIZE, LARGE_SIZE] {
        let data = deviations(size);
        group.bench_with_input(BenchmarkId::new("from_samples", size), &data, |b, data| {
            b.iter(|| EmpiricalCdf::from_samples(black_box(data), DEFAULT_BINS));
        });
    }

    group.finish();
}

fn bench_cdf_chart_layout(c: &mut Criterion) {
    let primary = deviations(LARGE_SIZE);
    let other: Vec<f64> = primary.iter().map(|v| v * 1.5).collect();
    let samples: Vec<(&str, &[f64])> = vec![
        ("ObVi-SLAM", primary.as_slice()),
        ("ORB-SLAM3", other.as_slice()),
    ];

    c.bench_function("cdf_chart_build_two_approaches", |b| {
        b.iter(|| {
            CdfChart::build(
                CdfKind::Translation,
                "ObVi-SLAM",
                black_box(&samples),
                DEFAULT_BINS,
            )
        });
    });
}

criterion_group!(benches, bench_from_samples, bench_cdf_chart_layout);
criterion_main!(benches);
