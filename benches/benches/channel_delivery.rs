// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_channel::{Channel, SubscribeOptions, handler};

fn subscribed(topics: u32, per_topic: u32, counter: &Rc<Cell<u64>>) -> Channel<u32, u64> {
    let ch = Channel::new();
    for t in 0..topics {
        for _ in 0..per_topic {
            let counter = counter.clone();
            let _ = ch.subscribe(
                t,
                handler(move |d: Option<&u64>| counter.set(counter.get() + d.copied().unwrap_or(1))),
                SubscribeOptions::default(),
            );
        }
    }
    ch
}

fn bench_publish_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel");
    for &(topics, per_topic) in &[(64u32, 1u32), (64, 8), (1024, 2)] {
        let counter = Rc::new(Cell::new(0_u64));
        group.throughput(Throughput::Elements(u64::from(topics * per_topic)));
        group.bench_function(
            format!("publish_drain_t{}_h{}", topics, per_topic),
            |b| {
                b.iter_batched(
                    || subscribed(topics, per_topic, &counter),
                    |ch| {
                        for t in 0..topics {
                            ch.publish(t, Some(u64::from(t)));
                        }
                        black_box(ch.queue().run_pending());
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }
    let counter = Rc::new(Cell::new(0_u64));
    group.bench_function("publish_unsubscribed_topic", |b| {
        b.iter_batched(
            || subscribed(16, 1, &counter),
            |ch| {
                for _ in 0..1024 {
                    ch.publish(9999, None);
                }
                black_box(ch.queue().run_pending());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_publish_drain);
criterion_main!(benches);
