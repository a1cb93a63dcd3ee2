// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::BTreeMap;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_menu::{Lifecycle, MenuConfig, MenuPatch, Registry};

type Data = BTreeMap<u32, u32>;

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("menu-{i}")).collect()
}

fn configured(ids: &[String]) -> Registry<Data> {
    let mut r = Registry::new();
    for id in ids {
        r.set_config(
            id.as_str(),
            MenuConfig::default().with_lifecycle(
                Lifecycle::new()
                    .on_show(|d| {
                        black_box(d);
                    })
                    .on_hide(|d| {
                        black_box(d);
                    }),
            ),
        );
    }
    r.queue().run_pending();
    r
}

fn bench_show_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");
    for &n in &[16usize, 256, 4096] {
        let ids = ids(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("show_each_then_drain_n{}", n), |b| {
            b.iter_batched(
                || configured(&ids),
                |mut r| {
                    for id in &ids {
                        r.show(id.as_str());
                    }
                    black_box(r.queue().run_pending());
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("toggle_pairs_n{}", n), |b| {
            b.iter_batched(
                || configured(&ids),
                |mut r| {
                    for id in &ids {
                        r.toggle(id.as_str());
                        r.toggle(id.as_str());
                    }
                    black_box(r.queue().discard());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_update_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_update");
    let ids = ids(256);
    group.throughput(Throughput::Elements(ids.len() as u64));
    group.bench_function("update_config_merge_n256", |b| {
        b.iter_batched(
            || configured(&ids),
            |mut r| {
                for (i, id) in ids.iter().enumerate() {
                    let key = u32::try_from(i).unwrap_or(u32::MAX);
                    r.update_config(
                        id.as_str(),
                        MenuPatch::new()
                            .data(BTreeMap::from([(key, key)]))
                            .position((f64::from(key), 0.0)),
                    );
                }
                black_box(r.queue().discard());
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("clear_all_n256", |b| {
        b.iter_batched(
            || configured(&ids),
            |mut r| {
                r.clear_all();
                black_box(r.queue().run_pending());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_show_churn, bench_update_merge);
criterion_main!(benches);
