use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use obsplan::constants::{DPI, GAUSS_GRAV_SQUARED};
use obsplan::kepler::{propagate, solve_kepler};

/// Heliocentric state at `r` AU moving at `speed_ratio` times the circular speed, with a
/// random orientation.
fn rand_state(rng: &mut StdRng, speed_ratio: f64) -> (Vector3<f64>, Vector3<f64>) {
    let r = rng.random_range(0.5..5.0);
    let theta = rng.random::<f64>() * DPI;
    let tilt = rng.random_range(-0.3..0.3);
    let position = Vector3::new(r * theta.cos(), r * theta.sin(), r * tilt);
    let circular = (GAUSS_GRAV_SQUARED / position.norm()).sqrt();
    let direction = Vector3::new(-theta.sin(), theta.cos(), rng.random_range(-0.2..0.2)).normalize();
    (position, direction * circular * speed_ratio)
}

fn bench_propagate(c: &mut Criterion, name: &str, seed: u64, speed: (f64, f64)) {
    let mut rng = StdRng::seed_from_u64(seed);
    let samples = 10_000usize;

    c.bench_function(name, |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| {
                        let ratio = rng.random_range(speed.0..speed.1);
                        let (r, v) = rand_state(&mut rng, ratio);
                        (r, v, rng.random_range(-2000.0..2000.0))
                    })
                    .collect::<Vec<_>>()
            },
            |cases| {
                for (r, v, dt) in cases {
                    black_box(propagate(&r, &v, black_box(dt), GAUSS_GRAV_SQUARED));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// Bound orbits: speed below √2 times circular.
fn bench_elliptic(c: &mut Criterion) {
    bench_propagate(c, "universal_kepler/elliptic", 0xE111, (0.6, 1.35));
}

/// Unbound orbits: speed above √2 times circular.
fn bench_hyperbolic(c: &mut Criterion) {
    bench_propagate(c, "universal_kepler/hyperbolic", 0x4B9E, (1.5, 3.0));
}

fn bench_solve_kepler(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);
    let samples = 10_000usize;

    c.bench_function("universal_kepler/solve_kepler_e<0.97", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| (rng.random::<f64>() * DPI, rng.random_range(0.0..0.97)))
                    .collect::<Vec<_>>()
            },
            |cases| {
                for (m, e) in cases {
                    black_box(solve_kepler(black_box(m), black_box(e)));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_elliptic, bench_hyperbolic, bench_solve_kepler
);
criterion_main!(benches);
