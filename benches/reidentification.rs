use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reident::config::ClassifierConfig;
use reident::dataset::SyntheticPopulation;
use reident::monte_carlo::{AccuracyEstimator, CandidatePool, MonteCarloRng, TrialRunner};
use reident::prelude::*;

fn population(n_users: usize, n_features: usize) -> Population {
    SyntheticPopulation::new(n_users, 20)
        .with_n_features(n_features)
        .with_separation(2.0)
        .population(&mut MonteCarloRng::new(42))
        .expect("valid generator")
}

fn bench_pool_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_draw");

    for n in [5, 50, 500].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            let mut rng = MonteCarloRng::new(0);
            b.iter(|| CandidatePool::draw(black_box(1_000), n, &mut rng).expect("n <= 1000"));
        });
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let population = population(50, 8);

    for n in [5, 20, 50].iter() {
        let blocks: Vec<&Matrix<f32>> = (0..*n).map(|u| population.block(u)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, _| {
            b.iter(|| {
                NormalizationPolicy::default()
                    .normalize(black_box(&blocks), population.query(0))
                    .expect("standardize")
            });
        });
    }

    group.finish();
}

fn bench_trial(c: &mut Criterion) {
    let mut group = c.benchmark_group("trial");
    let population = population(30, 4);
    let runner = TrialRunner::new();

    for config in [
        ClassifierConfig::knn(1),
        ClassifierConfig::kde(1.0),
        ClassifierConfig::random_forest(10),
    ] {
        group.bench_function(config.name(), |b| {
            let mut rng = MonteCarloRng::new(7);
            b.iter(|| runner.run(&population, 10, &config, &mut rng).expect("trial"));
        });
    }

    group.finish();
}

fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate");
    group.sample_size(10);
    let population = population(20, 2);
    let estimator = AccuracyEstimator::new().with_n_iters(100);
    let knn = ClassifierConfig::knn(1);

    for n in [2, 5, 10, 20].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            let mut rng = MonteCarloRng::new(3);
            b.iter(|| estimator.estimate(&population, n, &knn, &mut rng).expect("estimate"));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pool_draw, bench_normalize, bench_trial, bench_estimate);
criterion_main!(benches);
