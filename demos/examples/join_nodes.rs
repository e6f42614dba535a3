// Copyright 2025 the MuNG Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Joining nodes.
//!
//! Snap a fractional detector box to pixels, then merge an over-segmented
//! notehead back together and compare the mask merge modes.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p mung_demos --example join_nodes`

use kurbo::Rect;
use mung_node::{BoundingBox, Mask, MaskMerge, Node, NodeParts};
use tracing_subscriber::EnvFilter;

fn half(id: u32, left: i64, label: u8) -> Node {
    Node::from_parts(NodeParts {
        id,
        class_name: "noteheadFull".into(),
        top: 10,
        left,
        width: 8,
        height: 6,
        class_likelihoods: vec![0.8, 0.2],
        outlinks: vec![40 + id],
        outlinks_likelihoods: vec![0.9],
        mask: Some(Mask::filled(6, 8, label)),
        ..Default::default()
    })
    .unwrap()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Detector output in x/y space, snapped outward to the pixel grid.
    let detected = Rect::new(101.3, 10.6, 112.2, 15.4);
    let snapped = BoundingBox::<f64>::from(detected).round_outward();
    println!("detected {detected:?} -> pixels {:?}", snapped.as_tuple());

    for merge in [MaskMerge::Max, MaskMerge::Binary, MaskMerge::PreferSelf] {
        let mut left = half(0, 101, 1);
        let right = half(1, 105, 2);
        left.join_with(&right, merge);
        let mask = left.mask().unwrap();
        println!(
            "{merge:?}: box {:?}, labels in first row {:?}, area {}",
            left.bounding_box().as_tuple(),
            mask.rows().next().unwrap_or(&[]),
            left.area(),
        );
        assert_eq!(left.bounding_box(), snapped);
        assert_eq!(left.outlinks(), vec![40, 41]);
    }
}
