// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for code generation.

use codegen::{generate_for, Target};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use network_ir::{registry, LayerType, NetworkConfig};

/// Input, then `blocks` repetitions of conv/pool/batchnorm, then a dense head.
fn conv_stack(blocks: usize) -> NetworkConfig {
    let mut cfg = NetworkConfig::new("bench");
    cfg.add_layer(registry::instantiate(LayerType::Input));
    for _ in 0..blocks {
        cfg.add_layer(registry::instantiate(LayerType::Conv2d));
        cfg.add_layer(registry::instantiate(LayerType::Pooling));
        cfg.add_layer(registry::instantiate(LayerType::BatchNorm));
    }
    cfg.add_layer(registry::instantiate(LayerType::Flatten));
    cfg.add_layer(registry::instantiate(LayerType::Dense));
    cfg
}

fn bench_targets(c: &mut Criterion) {
    let cfg = conv_stack(8);
    let mut group = c.benchmark_group("generate");
    for target in Target::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(target), &cfg, |b, cfg| {
            b.iter(|| generate_for(black_box(cfg), target))
        });
    }
    group.finish();
}

fn bench_network_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("pytorch_by_blocks");
    for blocks in [1, 16, 128] {
        let cfg = conv_stack(blocks);
        group.bench_with_input(BenchmarkId::from_parameter(blocks), &cfg, |b, cfg| {
            b.iter(|| generate_for(black_box(cfg), Target::PyTorch))
        });
    }
    group.finish();
}

fn bench_config_json(c: &mut Criterion) {
    let cfg = conv_stack(32);
    let json = cfg.to_json().unwrap();
    c.bench_function("config_to_json", |b| b.iter(|| black_box(&cfg).to_json()));
    c.bench_function("config_from_json", |b| {
        b.iter(|| NetworkConfig::from_json(black_box(&json)))
    });
}

criterion_group!(benches, bench_targets, bench_network_size, bench_config_json);
criterion_main!(benches);
