// Copyright 2025 the MuNG Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use mung_node::{Mask, MaskMerge, Node, NodeParts};

fn masked(id: u32, top: i64, left: i64, size: u32) -> Node {
    Node::from_parts(NodeParts {
        id,
        class_name: "noteheadFull".into(),
        top,
        left,
        width: size,
        height: size,
        outlinks: vec![id + 1],
        outlinks_likelihoods: vec![0.5],
        mask: Some(Mask::filled(size, size, 1)),
        ..Default::default()
    })
    .unwrap()
}

fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("join");
    for &size in &[16u32, 64, 256] {
        let other = masked(1, i64::from(size / 2), i64::from(size / 2), size);
        for merge in [MaskMerge::Max, MaskMerge::Binary, MaskMerge::PreferSelf] {
            group.bench_function(format!("{:?}_{}px", merge, size), |b| {
                b.iter_batched(
                    || masked(0, 0, 0, size),
                    |mut node| {
                        node.join_with(&other, merge);
                        black_box(node.area());
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.bench_function("maskless_chain_100", |b| {
        let parts: Vec<Node> = (0..100)
            .map(|i| Node::new(i, "stem", i64::from(i), 0, 3, 40))
            .collect();
        b.iter_batched(
            || Node::new(1000, "stem", 0, 0, 3, 40),
            |mut node| {
                for part in &parts {
                    node.join(part);
                }
                black_box(node.bounding_box());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_join);
criterion_main!(benches);
