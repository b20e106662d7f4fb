use calc_core::{Configuration, SolveMode};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_evaluate(c: &mut Criterion) {
    let runway = Configuration::default();
    let scale = Configuration {
        mode: SolveMode::SolveForScale,
        max_participants_cap: Some(25.0),
        ..Configuration::default()
    };
    c.bench_function("evaluate runway", |b| {
        b.iter(|| calc_econ::evaluate(black_box(&runway)))
    });
    c.bench_function("evaluate scale", |b| {
        b.iter(|| calc_econ::evaluate(black_box(&scale)))
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
