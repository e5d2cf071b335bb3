//! Criterion benchmarks for the GA engine.
//!
//! Uses OneMax on bit chains to measure operator and loop overhead
//! independent of any real fitness cost.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_evolution::ga::{
    BitChain, BitFlipMutation, Crossover, CrossoverStatistics, GaConfig, GaProblem, GaRunner,
    NoMutation, Population, Selection, SelectionStatistics,
};
use u_evolution::random::create_rng;

// ===========================================================================
// OneMax: maximize the number of 1-bits
// ===========================================================================

struct OneMax {
    bits: usize,
}

impl GaProblem for OneMax {
    type Value = Vec<bool>;
    type Chain = BitChain;

    fn random_value<R: Rng>(&self, rng: &mut R) -> Vec<bool> {
        (0..self.bits).map(|_| rng.random_bool(0.5)).collect()
    }

    fn encode(&self, value: &Vec<bool>) -> BitChain {
        value.iter().map(|&b| if b { '1' } else { '0' }).collect()
    }

    fn decode(&self, chain: &BitChain) -> Vec<bool> {
        chain.chars().map(|c| c == '1').collect()
    }

    fn fitness(&self, value: &Vec<bool>) -> f64 {
        value.iter().filter(|&&b| b).count() as f64
    }
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_ga_onemax(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_onemax");
    group.sample_size(10);

    for (bits, pop, gen) in [(32usize, 50usize, 50usize), (64, 100, 30), (128, 100, 20)] {
        let problem = OneMax { bits };
        let config = GaConfig {
            population_size: pop,
            max_generations: gen,
            seed: Some(42),
            ..GaConfig::default()
        };
        let mutation = BitFlipMutation::new(1.0 / bits as f64);
        group.bench_with_input(
            BenchmarkId::new(format!("b{}_p{}_g{}", bits, pop, gen), bits),
            &(problem, config),
            |b, (p, c)| {
                b.iter(|| {
                    let result = GaRunner::run(black_box(p), black_box(c), mutation);
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");
    let problem = OneMax { bits: 64 };

    for selection in [Selection::RouletteWheel, Selection::Tournament(3), Selection::Rank] {
        let mut rng = create_rng(42);
        let mut population = match Population::random(&problem, 200, 0, &mut rng) {
            Ok(population) => population,
            Err(err) => panic!("population: {err}"),
        };
        population.normalize();

        group.bench_function(format!("{selection:?}"), |b| {
            b.iter(|| {
                let mut stats = SelectionStatistics::default();
                black_box(selection.select(black_box(&population), &mut rng, &mut stats))
            })
        });
    }
    group.finish();
}

fn bench_crossover(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_point_crossover");

    for &bits in &[32usize, 256, 1024] {
        let problem = OneMax { bits };
        let mut rng = create_rng(42);
        let parents: Vec<BitChain> = (0..200).map(|_| problem.random_chain(&mut rng)).collect();

        group.bench_with_input(BenchmarkId::from_parameter(bits), &parents, |b, parents| {
            b.iter(|| {
                let mut stats = CrossoverStatistics::default();
                black_box(Crossover::default().crossover(
                    parents.clone(),
                    &NoMutation,
                    &mut rng,
                    &mut stats,
                ))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ga_onemax, bench_selection, bench_crossover);
criterion_main!(benches);
