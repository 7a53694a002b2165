use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use smartstock::{
    cache::InMemorySeriesCache,
    ml::{generate_series, SimulationConfig, TrendModel},
    models::planning_parameters::PlanningParameters,
    services::{
        inventory_policy::{calculate_policy, PolicyInputs},
        planning::PlanningService,
    },
};
use std::sync::Arc;

// Series generation across horizons
fn generation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_series");

    for horizon in [90u32, 365, 730, 3650].iter() {
        let config = SimulationConfig {
            horizon_days: *horizon,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(horizon), &config, |b, config| {
            b.iter(|| black_box(generate_series(config).unwrap()))
        });
    }

    group.finish();
}

fn trend_fit_benchmark(c: &mut Criterion) {
    let series = generate_series(&SimulationConfig::default()).unwrap();
    c.bench_function("trend_fit_and_forecast", |b| {
        b.iter(|| {
            let trend = TrendModel::fit(black_box(&series)).unwrap();
            black_box(trend.forecast(&series, 30).unwrap())
        })
    });
}

fn policy_benchmark(c: &mut Criterion) {
    let inputs = PolicyInputs {
        monthly_forecast_total: 1500.0,
        historical_std_dev: 10.0,
        order_cost: 100.0,
        holding_cost: 5.0,
        lead_time_days: 5,
        service_level_pct: 95.0,
    };
    c.bench_function("calculate_policy", |b| {
        b.iter(|| black_box(calculate_policy(black_box(&inputs)).unwrap()))
    });
}

// Full recomputation, with and without the series cache
fn pipeline_benchmark(c: &mut Criterion) {
    let params = PlanningParameters::default();
    let uncached = PlanningService::default();
    let cached = PlanningService::default().with_cache(Arc::new(InMemorySeriesCache::new()));

    c.bench_function("pipeline_uncached", |b| {
        b.iter(|| black_box(uncached.compute(&params).unwrap()))
    });
    c.bench_function("pipeline_cached", |b| {
        b.iter(|| black_box(cached.compute(&params).unwrap()))
    });
}

criterion_group!(
    benches,
    generation_benchmark,
    trend_fit_benchmark,
    policy_benchmark,
    pipeline_benchmark
);
criterion_main!(benches);
