// Copyright 2025 the MuNG Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use mung_io::{DecodeOptions, DocumentHeader, decode_all, encode, encode_document};
use mung_node::{Mask, Node, NodeParts};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

/// A page's worth of nodes with filled elliptical masks and a few links each.
fn gen_page(count: u32, seed: u64) -> Vec<Node> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|id| {
            let width = 4 + rng.below(40) as u32;
            let height = 4 + rng.below(40) as u32;
            let mut mask = Mask::zeros(height, width);
            let (cy, cx) = (f64::from(height) / 2.0, f64::from(width) / 2.0);
            for row in 0..height {
                for col in 0..width {
                    let dy = (f64::from(row) + 0.5 - cy) / cy;
                    let dx = (f64::from(col) + 0.5 - cx) / cx;
                    if dy * dy + dx * dx <= 1.0 {
                        mask.set(row, col, 1);
                    }
                }
            }
            let links = rng.below(4) as usize;
            let outlinks = (0..links).map(|_| rng.below(u64::from(count)) as u32).collect();
            let outlinks_likelihoods = (0..links).map(|_| rng.next_f64()).collect();
            Node::from_parts(NodeParts {
                id,
                class_name: "noteheadFull".into(),
                top: rng.below(3000) as i64,
                left: rng.below(2000) as i64,
                width,
                height,
                class_likelihoods: vec![rng.next_f64(), rng.next_f64()],
                outlinks,
                outlinks_likelihoods,
                mask: Some(mask),
                ..Default::default()
            })
            .unwrap()
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for &n in &[100u32, 1000] {
        let nodes = gen_page(n, 0x5eed);
        group.throughput(Throughput::Elements(u64::from(n)));
        group.bench_function(format!("records_n{}", n), |b| {
            b.iter(|| {
                let bytes: usize = nodes.iter().map(|node| encode(node).len()).sum();
                black_box(bytes);
            })
        });
        let header = DocumentHeader::new("bench", "page");
        group.bench_function(format!("document_n{}", n), |b| {
            b.iter(|| black_box(encode_document(&nodes, &header)))
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for &n in &[100u32, 1000] {
        let text = encode_document(&gen_page(n, 0x5eed), &DocumentHeader::new("bench", "page"));
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(format!("document_n{}", n), |b| {
            b.iter(|| black_box(decode_all(&text, &DecodeOptions::default()).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
