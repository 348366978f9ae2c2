use criterion::{Criterion, criterion_group, criterion_main};
use gemswap_core::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::hint::black_box;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (name, size, symbols) in [
        ("small_8x8", (8, 8), 6),
        ("tight_16x16", (16, 16), 3),
        ("large_64x64", (64, 64), 7),
    ] {
        let config = BoardConfig::new(size, symbols);
        group.bench_function(name, |b| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                RandomBoardGenerator::new(black_box(seed))
                    .generate(&config)
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_full_turn(c: &mut Criterion) {
    let config = BoardConfig::new((8, 8), 5).with_cascade(CascadeMode::Full);

    c.bench_function("clear_and_collapse_row", |b| {
        b.iter(|| {
            let mut grid = RandomBoardGenerator::new(7).generate(&config).unwrap();
            for x in 0..8 {
                grid.set((x, 0), Cell::Empty).unwrap();
            }
            let mut rng = SmallRng::seed_from_u64(3);
            collapse(black_box(&mut grid), config.alphabet(), &mut rng).unwrap()
        })
    });

    c.bench_function("swap_sequence", |b| {
        b.iter(|| {
            let mut engine = PlayEngine::new(config, 11).unwrap();
            for x in 0..7 {
                for y in 0..8 {
                    let _ = engine.swap((x, y), (x + 1, y), &mut ());
                }
            }
            engine.score()
        })
    });
}

criterion_group!(benches, bench_generate, bench_full_turn);
criterion_main!(benches);
