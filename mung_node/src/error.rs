// Copyright 2025 the MuNG Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Invariant violations raised when a [`Node`](crate::Node) or [`Mask`](crate::Mask) is built.

use crate::node::LinkSide;

/// A node or mask was constructed with data that breaks one of its invariants.
///
/// These are raised at construction time and never deferred: a value of
/// [`Node`](crate::Node) that exists always has equal-length link views and a
/// mask whose shape matches its height and width.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    /// A link id list and its likelihood list have different lengths.
    #[error("{side:?}: {links} link ids but {likelihoods} likelihoods")]
    LinkLengthMismatch {
        /// Which link list was malformed.
        side: LinkSide,
        /// Number of link ids supplied.
        links: usize,
        /// Number of likelihoods supplied.
        likelihoods: usize,
    },

    /// A mask's `(height, width)` shape disagrees with the node's.
    #[error("mask shape {actual:?} does not match node shape {expected:?}")]
    MaskShape {
        /// The node's `(height, width)`.
        expected: (u32, u32),
        /// The mask's `(height, width)`.
        actual: (u32, u32),
    },

    /// A flat mask buffer does not hold exactly `height * width` labels.
    #[error("mask buffer has {actual} labels, expected {expected}")]
    MaskLength {
        /// `height * width`.
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },

    /// Run-length encoded runs do not add up to `height * width`.
    #[error("mask runs cover {actual} pixels, expected {expected}")]
    RleLength {
        /// `height * width`.
        expected: usize,
        /// Sum of all run lengths.
        actual: usize,
    },

    /// The mask is too large to allocate.
    #[error("mask of {pixels} pixels cannot be allocated")]
    MaskTooLarge {
        /// `height * width`.
        pixels: usize,
    },
}
