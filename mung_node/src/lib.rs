// Copyright 2025 the MuNG Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=mung_node --heading-base-level=0

//! MuNG Node: annotated symbol nodes for notation graphs.
//!
//! A [`Node`] is one detected symbol on a page image (a notehead, a stem, a
//! staff line, ...). It carries:
//!
//! - An integer bounding box given by `top`, `left`, `width`, and `height`.
//! - An optional [`Mask`] of pixel labels with shape `(height, width)`.
//! - Class likelihoods from a classifier.
//! - Outgoing and incoming [`Link`]s to other nodes, each with a likelihood.
//! - An open bag of typed extension fields ([`DataValue`]).
//!
//! This crate owns the geometry (overlap tests, the outward integer rounding
//! rule, box unions) and the in-place merge of one node into another
//! ([`Node::join`]). Reading and writing the XML record format lives in
//! `mung_io`.
//!
//! ## Coordinates
//!
//! Rows grow downward and columns grow rightward. A [`BoundingBox`] is
//! `(top, left, bottom, right)` with half-open rows and columns, so a node's
//! box is `(top, left, top + height, left + width)` and two boxes that only
//! share an edge do not overlap.
//!
//! ## Not a graph
//!
//! Nodes refer to each other by [`NodeId`] only. Id uniqueness, dangling links,
//! and graph-wide consistency are the caller's concern.
//!
//! # Example
//!
//! ```rust
//! use mung_node::{Mask, Node, NodeParts, round_bounding_box_to_integer};
//!
//! // Snap a detector box to pixels without clipping it.
//! let bbox = round_bounding_box_to_integer(10.4, 10.6, 29.2, 29.9);
//! assert_eq!(bbox.as_tuple(), (10, 10, 30, 30));
//!
//! let mut head = Node::from_parts(NodeParts {
//!     id: 0,
//!     class_name: "noteheadFull".into(),
//!     top: 10,
//!     left: 10,
//!     width: 20,
//!     height: 20,
//!     class_likelihoods: vec![0.9, 0.1],
//!     outlinks: vec![2],
//!     outlinks_likelihoods: vec![0.85],
//!     mask: Some(Mask::filled(20, 20, 1)),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let mut stem = Node::new(1, "stem", 15, 15, 30, 30);
//! stem.add_outlink(4, 0.5);
//!
//! head.join(&stem);
//! assert_eq!(head.bounding_box().as_tuple(), (10, 10, 45, 45));
//! assert_eq!(head.outlinks(), vec![2, 4]);
//! assert_eq!(head.class_likelihoods(), &[0.9, 0.1]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod data;
mod error;
pub mod mask;
pub mod node;
pub mod types;

pub use data::{DataMap, DataValue};
pub use error::NodeError;
pub use mask::Mask;
pub use node::{Link, LinkSide, MaskMerge, Node, NodeId, NodeParts, UID_DELIMITER};
pub use types::{BoundingBox, round_bounding_box_to_integer};
