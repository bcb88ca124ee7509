use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ising_sim::spins::total_energy;
use ising_sim::{Chain, EnergyMode, SimulationConfig};

const STEPS_PER_ITER: usize = 1_000;

fn bench_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("metropolis_steps");
    for size in [16usize, 64] {
        for mode in [EnergyMode::Full, EnergyMode::LocalDelta] {
            let config = SimulationConfig::new(0.44, size, 50.0, STEPS_PER_ITER)
                .with_energy_mode(mode);
            group.bench_with_input(
                BenchmarkId::new(format!("{mode:?}"), size),
                &config,
                |b, config| {
                    let mut chain = Chain::new(config, 42).unwrap();
                    b.iter(|| {
                        for _ in 0..STEPS_PER_ITER {
                            black_box(chain.engine.step(&mut chain.rng).unwrap());
                        }
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_total_energy(c: &mut Criterion) {
    let config = SimulationConfig::new(0.44, 128, 50.0, 0);
    let chain = Chain::new(&config, 42).unwrap();
    c.bench_function("total_energy_128", |b| {
        b.iter(|| black_box(total_energy(black_box(chain.state()))))
    });
}

criterion_group!(benches, bench_steps, bench_total_energy);
criterion_main!(benches);
