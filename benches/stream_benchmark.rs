//! Benchmarks for the hot paths: history append and broadcast fan-out.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use citrate::adapters::ChannelSubscriber;
use citrate::client::HistoryBuffer;
use citrate::sampler::{MetricSampler, SharedSampler, SyntheticSampler};
use citrate::server::SubscriptionRegistry;

fn bench_history_push(c: &mut Criterion) {
    let mut sampler = SyntheticSampler::seeded(1);
    let samples: Vec<_> = (0..1_000).map(|_| sampler.sample()).collect();

    c.bench_function("history_push_1000_into_31", |b| {
        b.iter(|| {
            let mut history = HistoryBuffer::default();
            for sample in &samples {
                history.push(sample.clone());
            }
            black_box(history.tps_series())
        })
    });
}

fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast_fan_out");

    for subscribers in [1usize, 10, 100, 1_000] {
        let registry = SubscriptionRegistry::new(SharedSampler::new(SyntheticSampler::seeded(2)));
        let mut receivers = Vec::with_capacity(subscribers);
        for _ in 0..subscribers {
            let (sub, rx) = ChannelSubscriber::channel(4);
            registry.register(sub);
            receivers.push(rx);
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            &subscribers,
            |b, _| {
                b.iter(|| {
                    let report = registry.broadcast_next();
                    // keep queues from filling so every run measures delivery
                    for rx in receivers.iter_mut() {
                        while rx.try_recv().is_ok() {}
                    }
                    black_box(report)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_history_push, bench_broadcast);
criterion_main!(benches);
