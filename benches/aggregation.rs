//! Aggregation and ranking benchmarks
//!
//! Measures `summarize` over raw tables of growing size and Top-K ranking
//! of a dataset column.
//!
//! Run with: cargo bench --bench aggregation

use benchkit::aggregate::summarize;
use benchkit::rank::{top_k_indices, SortOrder};
use benchkit::record::TrialRecord;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const METHODS: usize = 10;
const METRICS: [&str; 3] = ["accuracy", "mae", "r2"];

fn raw_table(repeats: u64) -> Vec<TrialRecord> {
    let mut trials = Vec::new();
    for method in 0..METHODS {
        for repeat in 0..repeats {
            for metric in METRICS {
                let value = ((method as u64 * 31 + repeat * 17) % 100) as f64 / 100.0;
                trials.push(TrialRecord::new(format!("method_{method}"), repeat, metric, value));
            }
        }
    }
    trials
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");

    for repeats in [10u64, 100, 1_000] {
        let trials = raw_table(repeats);
        group.bench_with_input(BenchmarkId::from_parameter(trials.len()), &trials, |b, trials| {
            b.iter(|| summarize(black_box(trials)));
        });
    }

    group.finish();
}

fn bench_rank(c: &mut Criterion) {
    let means: Vec<Option<f64>> = (0..1_000)
        .map(|i| if i % 7 == 0 { None } else { Some(f64::from(i % 97)) })
        .collect();

    c.bench_function("top2_descending_1k", |b| {
        b.iter(|| top_k_indices(black_box(&means), 2, SortOrder::Descending));
    });
}

criterion_group!(benches, bench_summarize, bench_rank);
criterion_main!(benches);
