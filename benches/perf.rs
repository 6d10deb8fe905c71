use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use parity_report::inequality::{gini_coefficient, league_inequality, season_inequality};
use parity_report::retention::{RetentionParams, analyze_retention, join_inequality};
use parity_report::sample_data;
use parity_report::standings::{ScoringMode, build_standings};

fn bench_gini_league_sized(c: &mut Criterion) {
    let values: Vec<f64> = (0..20).map(|i| (i * 3) as f64).collect();
    c.bench_function("gini_league_sized", |b| {
        b.iter(|| {
            let g = gini_coefficient(black_box(&values)).unwrap();
            black_box(g);
        })
    });
}

fn bench_gini_pooled(c: &mut Criterion) {
    let values: Vec<f64> = (0..2_000).map(|i| ((i * 7) % 90) as f64).collect();
    c.bench_function("gini_pooled", |b| {
        b.iter(|| {
            let g = gini_coefficient(black_box(&values)).unwrap();
            black_box(g);
        })
    });
}

fn bench_standings_fold(c: &mut Criterion) {
    let matches = sample_data::demo_dataset(7);
    c.bench_function("standings_fold", |b| {
        b.iter(|| {
            let rows = build_standings(black_box(&matches), ScoringMode::Mean).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_retention_analysis(c: &mut Criterion) {
    let matches = sample_data::demo_dataset(7);
    let standings = build_standings(&matches, ScoringMode::Mean).unwrap();
    let params = RetentionParams {
        cohort_size: 3,
        min_season: 15,
        require_adjacent_seasons: true,
    };
    c.bench_function("retention_analysis", |b| {
        b.iter(|| {
            let rows = analyze_retention(black_box(&standings), black_box(&params)).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let matches = sample_data::demo_dataset(7);
    let params = RetentionParams {
        cohort_size: 3,
        min_season: 15,
        require_adjacent_seasons: true,
    };
    c.bench_function("full_pipeline", |b| {
        b.iter(|| {
            let standings = build_standings(black_box(&matches), ScoringMode::Mean).unwrap();
            let seasons = season_inequality(&standings);
            let leagues = league_inequality(&standings);
            let retention = analyze_retention(&standings, &params).unwrap();
            let summaries = join_inequality(retention, &leagues);
            black_box((seasons.len(), summaries.len()));
        })
    });
}

criterion_group!(
    perf,
    bench_gini_league_sized,
    bench_gini_pooled,
    bench_standings_fold,
    bench_retention_analysis,
    bench_full_pipeline
);
criterion_main!(perf);
