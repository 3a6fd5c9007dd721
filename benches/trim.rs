use criterion::{criterion_group, criterion_main, Criterion, BatchSize, black_box};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

use weedfield::field::FieldConfig;
use weedfield::mower::Mower;
use weedfield::weeds::{BonusConfig, WeedField};

fn bench_generate_default(c: &mut Criterion) {
    let mower = Mower::shared(1.0);

    c.bench_function("generate_default_field", |b| {
        b.iter(|| {
            WeedField::generate(black_box(FieldConfig::default()), BonusConfig::default(), &mower)
        });
    });
}

fn bench_cut_sweep(c: &mut Criterion) {
    let mower = Mower::shared(1.0);
    let config = FieldConfig { num_patches: 200, ..Default::default() };
    let half = config.half_width();

    let mut rng = ChaCha12Rng::seed_from_u64(99);
    let path: Vec<Vec2> = (0..600)
        .map(|_| Vec2::new(rng.random_range(-half..half), rng.random_range(-half..half)))
        .collect();

    c.bench_function("cut_600_random_frames", |b| {
        b.iter_batched(
            || WeedField::generate(config.clone(), BonusConfig::default(), &mower)
                .expect("default config is valid"),
            |mut field| {
                for p in &path {
                    black_box(field.cut(*p, 1.0));
                }
                field
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_cut_miss(c: &mut Criterion) {
    let mower = Mower::shared(1.0);
    let mut field = WeedField::generate(FieldConfig::default(), BonusConfig::default(), &mower)
        .expect("default config is valid");

    // Weeds sit at least one unit from the origin, so this never removes anything.
    c.bench_function("cut_empty_area", |b| {
        b.iter(|| field.cut(black_box(Vec2::ZERO), black_box(1.0)));
    });
}

criterion_group!(benches, bench_generate_default, bench_cut_sweep, bench_cut_miss);
criterion_main!(benches);
