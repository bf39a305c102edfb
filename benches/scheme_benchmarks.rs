use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use keysplit::{
    AdditiveScheme, Config, CsprngSource, ReplicatedScheme, ShamirScheme, SplitMode,
    TwoOutOfNScheme,
};

const SECRET: [u8; 16] = *b"benchmark secret";

fn bench_shamir(c: &mut Criterion) {
    let mut group = c.benchmark_group("shamir");

    for mode in [SplitMode::Sequential, SplitMode::Parallel] {
        for (t, n) in [(2, 5), (10, 32), (50, 128)] {
            let config = Config::new().with_mode(mode);
            let mut shamir = ShamirScheme::with_source(config, CsprngSource::seeded(1)).unwrap();
            let bundles = shamir.share(&SECRET, t, n).unwrap();

            group.bench_function(format!("share_{t}_of_{n}_{mode:?}"), |b| {
                b.iter(|| black_box(shamir.share(black_box(&SECRET), t, n).unwrap()));
            });
            group.bench_function(format!("reconstruct_{t}_of_{n}_{mode:?}"), |b| {
                b.iter(|| black_box(shamir.reconstruct(black_box(&bundles[..=t])).unwrap()));
            });
        }
    }

    group.finish();
}

fn bench_replicated(c: &mut Criterion) {
    let mut group = c.benchmark_group("replicated");

    // C(n, t - 1) atomic shares per word grows quickly
    for (t, n) in [(2, 3), (3, 5), (4, 8), (5, 10)] {
        let mut replicated =
            ReplicatedScheme::with_source(Config::default(), CsprngSource::seeded(2)).unwrap();
        let parties = replicated.share(&SECRET, t, n).unwrap();

        group.bench_function(format!("share_{t}_of_{n}"), |b| {
            b.iter(|| black_box(replicated.share(black_box(&SECRET), t, n).unwrap()));
        });
        group.bench_function(format!("reconstruct_{t}_of_{n}"), |b| {
            b.iter(|| black_box(replicated.reconstruct(black_box(&parties[..t])).unwrap()));
        });
    }

    group.finish();
}

fn bench_additive(c: &mut Criterion) {
    let mut group = c.benchmark_group("additive");

    for n in [3, 16, 128] {
        let mut additive =
            AdditiveScheme::with_source(Config::default(), CsprngSource::seeded(3)).unwrap();
        let bundles = additive.share(&SECRET, n).unwrap();

        group.bench_function(format!("share_{n}"), |b| {
            b.iter(|| black_box(additive.share(black_box(&SECRET), n).unwrap()));
        });
        group.bench_function(format!("reconstruct_{n}"), |b| {
            b.iter(|| black_box(additive.reconstruct(black_box(&bundles)).unwrap()));
        });
    }

    group.finish();
}

fn bench_two_of_n(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_of_n");

    for size in [16, 1024, 10240] {
        let message = vec![0x5Au8; size];
        let mut scheme = TwoOutOfNScheme::with_source(CsprngSource::seeded(4));
        let rows = scheme.share(&message, 16).unwrap();

        group.bench_function(format!("share_{size}_bytes"), |b| {
            b.iter(|| black_box(scheme.share(black_box(&message), 16).unwrap()));
        });
        group.bench_function(format!("reconstruct_{size}_bytes"), |b| {
            b.iter(|| black_box(TwoOutOfNScheme::reconstruct(&rows[0], &rows[1]).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_shamir,
    bench_replicated,
    bench_additive,
    bench_two_of_n
);
criterion_main!(benches);
