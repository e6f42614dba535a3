// Copyright 2025 the MuNG Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The annotated node: geometry, mask, class evidence, links, and joins.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::data::{DataMap, DataValue};
use crate::error::NodeError;
use crate::mask::Mask;
use crate::types::BoundingBox;

/// Identifier of a node within its graph.
///
/// Uniqueness is the caller's responsibility; a [`Node`] never checks it.
pub type NodeId = u32;

/// Separator between dataset, document, and id in [`Node::uid`].
pub const UID_DELIMITER: &str = "___";

bitflags::bitflags! {
    /// Which link lists an operation looks at.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct LinkSide: u8 {
        /// Links pointing at this node.
        const INLINKS  = 0b0000_0001;
        /// Links leaving this node.
        const OUTLINKS = 0b0000_0010;
    }
}

impl Default for LinkSide {
    fn default() -> Self {
        Self::INLINKS | Self::OUTLINKS
    }
}

/// A directed link to another node together with its likelihood.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Link {
    /// The node at the other end.
    pub target: NodeId,
    /// Confidence of the link, usually in `0.0..=1.0`.
    pub likelihood: f64,
}

impl Link {
    /// Create a link to `target`.
    pub const fn new(target: NodeId, likelihood: f64) -> Self {
        Self { target, likelihood }
    }
}

/// How masks are combined when two nodes are joined.
///
/// Labels are placed at each node's offset inside the joined box; pixels a
/// node does not cover are background (`0`). A node without a mask
/// contributes nothing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MaskMerge {
    /// Each pixel takes the larger of the two labels. Every label of either
    /// mask survives wherever the other mask is background.
    #[default]
    Max,
    /// Union of foreground: any non-zero pixel becomes `1`.
    Binary,
    /// The receiving node's non-zero labels win; the other node only fills
    /// background pixels.
    PreferSelf,
}

impl MaskMerge {
    fn combine(self, dst: u8, src: u8) -> u8 {
        match self {
            Self::Max => dst.max(src),
            Self::Binary => u8::from(dst != 0 || src != 0),
            Self::PreferSelf => {
                if dst != 0 {
                    dst
                } else {
                    src
                }
            }
        }
    }
}

/// Explicit fields for [`Node::from_parts`].
///
/// Links are given as parallel id/likelihood lists, the shape they take in
/// the record format. Construction checks that each pair of lists has equal
/// length and that the mask matches `(height, width)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeParts {
    /// Node id.
    pub id: NodeId,
    /// Symbol class label.
    pub class_name: String,
    /// Row of the upper-left corner.
    pub top: i64,
    /// Column of the upper-left corner.
    pub left: i64,
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Classification likelihoods in classifier order.
    pub class_likelihoods: Vec<f64>,
    /// Ids of outgoing links.
    pub outlinks: Vec<NodeId>,
    /// Likelihood of each outgoing link.
    pub outlinks_likelihoods: Vec<f64>,
    /// Ids of incoming links.
    pub inlinks: Vec<NodeId>,
    /// Likelihood of each incoming link.
    pub inlinks_likelihoods: Vec<f64>,
    /// Optional pixel mask of shape `(height, width)`.
    pub mask: Option<Mask>,
    /// Extension fields.
    pub data: DataMap,
}

/// A detected symbol: bounding box, optional mask, class evidence, and links.
///
/// Links are stored as `(target, likelihood)` pairs, so the id and
/// likelihood views returned by [`Node::outlinks`] and
/// [`Node::outlinks_likelihoods`] (and their inlink counterparts) always
/// have equal length.
///
/// ```
/// use mung_node::Node;
///
/// let node = Node::new(0, "noteheadFull", 10, 100, 10, 20);
/// assert_eq!(node.bounding_box().as_tuple(), (10, 100, 30, 110));
/// assert!(node.overlaps((9, 99, 31, 111)));
/// assert!(!node.overlaps((0, 100, 8, 110)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    id: NodeId,
    class_name: String,
    top: i64,
    left: i64,
    width: u32,
    height: u32,
    class_likelihoods: Vec<f64>,
    outlinks: Vec<Link>,
    inlinks: Vec<Link>,
    mask: Option<Mask>,
    data: DataMap,
}

impl Node {
    /// Create a node with no mask, no links, and no class likelihoods.
    pub fn new(
        id: NodeId,
        class_name: impl Into<String>,
        top: i64,
        left: i64,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id,
            class_name: class_name.into(),
            top,
            left,
            width,
            height,
            class_likelihoods: Vec::new(),
            outlinks: Vec::new(),
            inlinks: Vec::new(),
            mask: None,
            data: DataMap::new(),
        }
    }

    /// Build a node from explicit fields, checking every invariant.
    pub fn from_parts(parts: NodeParts) -> Result<Self, NodeError> {
        let NodeParts {
            id,
            class_name,
            top,
            left,
            width,
            height,
            class_likelihoods,
            outlinks,
            outlinks_likelihoods,
            inlinks,
            inlinks_likelihoods,
            mask,
            data,
        } = parts;
        let outlinks = pair_links(LinkSide::OUTLINKS, outlinks, outlinks_likelihoods)?;
        let inlinks = pair_links(LinkSide::INLINKS, inlinks, inlinks_likelihoods)?;
        if let Some(m) = &mask {
            check_mask_shape(m, height, width)?;
        }
        Ok(Self {
            id,
            class_name,
            top,
            left,
            width,
            height,
            class_likelihoods,
            outlinks,
            inlinks,
            mask,
            data,
        })
    }

    /// Node id.
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Symbol class label.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Replace the class label.
    pub fn set_class_name(&mut self, class_name: impl Into<String>) {
        self.class_name = class_name.into();
    }

    /// Row of the upper-left corner.
    pub const fn top(&self) -> i64 {
        self.top
    }

    /// Column of the upper-left corner.
    pub const fn left(&self) -> i64 {
        self.left
    }

    /// Number of columns.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// One past the last row.
    pub const fn bottom(&self) -> i64 {
        self.bounding_box().bottom
    }

    /// One past the last column.
    pub const fn right(&self) -> i64 {
        self.bounding_box().right
    }

    /// `(height, width)`, the shape a mask must have.
    pub const fn shape(&self) -> (u32, u32) {
        (self.height, self.width)
    }

    /// `(top, left, top + height, left + width)`.
    pub const fn bounding_box(&self) -> BoundingBox<i64> {
        BoundingBox::from_origin_size(self.top, self.left, self.height, self.width)
    }

    /// Integer centre of the box as `(row, column)`, rounding towards the origin.
    pub const fn middle(&self) -> (i64, i64) {
        (
            self.top.saturating_add((self.height / 2) as i64),
            self.left.saturating_add((self.width / 2) as i64),
        )
    }

    /// Foreground pixel count of the mask, or the box area without one.
    pub fn area(&self) -> u64 {
        match &self.mask {
            Some(m) => m.count_nonzero() as u64,
            None => self.bounding_box().area(),
        }
    }

    /// Whether the node's box shares positive area with `bbox`.
    ///
    /// `bbox` is `(top, left, bottom, right)` with half-open rows and columns.
    pub fn overlaps(&self, bbox: impl Into<BoundingBox<i64>>) -> bool {
        self.bounding_box().overlaps(&bbox.into())
    }

    /// Whether the pixel at `(row, col)` lies inside the node's box.
    pub fn contains(&self, row: i64, col: i64) -> bool {
        self.bounding_box().contains_point(row, col)
    }

    /// The part of `bbox` inside this node, relative to the node's own
    /// upper-left corner. `None` when they do not overlap.
    pub fn bbox_intersection(
        &self,
        bbox: impl Into<BoundingBox<i64>>,
    ) -> Option<BoundingBox<i64>> {
        self.bounding_box()
            .intersect(&bbox.into())
            .map(|i| i.translate(-self.top, -self.left))
    }

    /// Globally unique id: `dataset___document___id`.
    pub fn uid(&self, dataset: &str, document: &str) -> String {
        format!(
            "{dataset}{UID_DELIMITER}{document}{UID_DELIMITER}{}",
            self.id
        )
    }

    /// Move the node `down` rows and `right` columns. The mask moves with it.
    pub const fn translate(&mut self, down: i64, right: i64) {
        self.top = self.top.saturating_add(down);
        self.left = self.left.saturating_add(right);
    }

    /// Classification likelihoods in classifier order.
    pub fn class_likelihoods(&self) -> &[f64] {
        &self.class_likelihoods
    }

    /// Replace the classification likelihoods.
    pub fn set_class_likelihoods(&mut self, likelihoods: Vec<f64>) {
        self.class_likelihoods = likelihoods;
    }

    /// The pixel mask, if any.
    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    /// Replace (or clear) the mask. Fails if its shape is not `(height, width)`.
    pub fn set_mask(&mut self, mask: Option<Mask>) -> Result<(), NodeError> {
        if let Some(m) = &mask {
            check_mask_shape(m, self.height, self.width)?;
        }
        self.mask = mask;
        Ok(())
    }

    /// Outgoing links as `(target, likelihood)` pairs.
    pub fn outgoing(&self) -> &[Link] {
        &self.outlinks
    }

    /// Incoming links as `(target, likelihood)` pairs.
    pub fn incoming(&self) -> &[Link] {
        &self.inlinks
    }

    /// Ids of outgoing links.
    pub fn outlinks(&self) -> Vec<NodeId> {
        self.outlinks.iter().map(|l| l.target).collect()
    }

    /// Likelihood of each outgoing link, parallel to [`Node::outlinks`].
    pub fn outlinks_likelihoods(&self) -> Vec<f64> {
        self.outlinks.iter().map(|l| l.likelihood).collect()
    }

    /// Ids of incoming links.
    pub fn inlinks(&self) -> Vec<NodeId> {
        self.inlinks.iter().map(|l| l.target).collect()
    }

    /// Likelihood of each incoming link, parallel to [`Node::inlinks`].
    pub fn inlinks_likelihoods(&self) -> Vec<f64> {
        self.inlinks.iter().map(|l| l.likelihood).collect()
    }

    /// Append an outgoing link.
    pub fn add_outlink(&mut self, target: NodeId, likelihood: f64) {
        self.outlinks.push(Link::new(target, likelihood));
    }

    /// Append an incoming link.
    pub fn add_inlink(&mut self, target: NodeId, likelihood: f64) {
        self.inlinks.push(Link::new(target, likelihood));
    }

    /// Links on the selected sides, inlinks first.
    pub fn links(&self, sides: LinkSide) -> impl Iterator<Item = (LinkSide, &Link)> + '_ {
        let inl = sides
            .contains(LinkSide::INLINKS)
            .then_some(&self.inlinks[..])
            .unwrap_or_default();
        let outl = sides
            .contains(LinkSide::OUTLINKS)
            .then_some(&self.outlinks[..])
            .unwrap_or_default();
        inl.iter()
            .map(|l| (LinkSide::INLINKS, l))
            .chain(outl.iter().map(|l| (LinkSide::OUTLINKS, l)))
    }

    /// Drop every link to `target` on the selected sides. Returns how many were removed.
    pub fn remove_links_to(&mut self, target: NodeId, sides: LinkSide) -> usize {
        let mut removed = 0;
        for (side, list) in [
            (LinkSide::INLINKS, &mut self.inlinks),
            (LinkSide::OUTLINKS, &mut self.outlinks),
        ] {
            if sides.contains(side) {
                let before = list.len();
                list.retain(|l| l.target != target);
                removed += before - list.len();
            }
        }
        removed
    }

    /// Extension fields.
    pub fn data(&self) -> &DataMap {
        &self.data
    }

    /// Mutable access to the extension fields.
    pub fn data_mut(&mut self) -> &mut DataMap {
        &mut self.data
    }

    /// Look up one extension field.
    pub fn data_value(&self, key: &str) -> Option<&DataValue> {
        self.data.get(key)
    }

    /// Set one extension field, returning the previous value.
    pub fn set_data(
        &mut self,
        key: impl Into<String>,
        value: impl Into<DataValue>,
    ) -> Option<DataValue> {
        self.data.insert(key.into(), value.into())
    }

    /// Merge `other` into this node using [`MaskMerge::default`].
    ///
    /// See [`Node::join_with`].
    pub fn join(&mut self, other: &Self) {
        self.join_with(other, MaskMerge::default());
    }

    /// Merge `other` into this node.
    ///
    /// - The box becomes the union of both boxes. Width and height saturate at
    ///   `u32::MAX`, so a union taller or wider than that keeps its top-left
    ///   corner and is clipped at the bottom or right edge.
    /// - The mask, if either node has one, is rebuilt at the new shape with
    ///   each node's labels at its offset, combined by `merge`.
    /// - Class likelihoods are this node's, unchanged.
    /// - Inlinks and outlinks are this node's followed by `other`'s, pairs
    ///   intact and duplicates kept.
    /// - `id`, `class_name`, and `data` are unchanged.
    pub fn join_with(&mut self, other: &Self, merge: MaskMerge) {
        let own = self.bounding_box();
        let joined = own.union(&other.bounding_box());
        let height = saturate_u32(joined.height());
        let width = saturate_u32(joined.width());

        let mask = (self.mask.is_some() || other.mask.is_some()).then(|| {
            let mut out = Mask::zeros(height, width);
            for (bbox, m) in [(own, &self.mask), (other.bounding_box(), &other.mask)] {
                if let Some(m) = m {
                    out.paste_with(
                        m,
                        offset(joined.top, bbox.top),
                        offset(joined.left, bbox.left),
                        |dst, src| merge.combine(dst, src),
                    );
                }
            }
            out
        });

        tracing::trace!(
            id = self.id,
            other = other.id,
            top = joined.top,
            left = joined.left,
            height,
            width,
            "joined nodes"
        );

        self.top = joined.top;
        self.left = joined.left;
        self.height = height;
        self.width = width;
        self.mask = mask;
        self.inlinks.extend_from_slice(&other.inlinks);
        self.outlinks.extend_from_slice(&other.outlinks);
    }
}

fn pair_links(
    side: LinkSide,
    ids: Vec<NodeId>,
    likelihoods: Vec<f64>,
) -> Result<Vec<Link>, NodeError> {
    if ids.len() != likelihoods.len() {
        return Err(NodeError::LinkLengthMismatch {
            side,
            links: ids.len(),
            likelihoods: likelihoods.len(),
        });
    }
    Ok(ids
        .into_iter()
        .zip(likelihoods)
        .map(|(target, likelihood)| Link::new(target, likelihood))
        .collect())
}

fn check_mask_shape(mask: &Mask, height: u32, width: u32) -> Result<(), NodeError> {
    if mask.shape() == (height, width) {
        Ok(())
    } else {
        Err(NodeError::MaskShape {
            expected: (height, width),
            actual: mask.shape(),
        })
    }
}

fn saturate_u32(v: u64) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

fn offset(origin: i64, edge: i64) -> u32 {
    saturate_u32(edge.saturating_sub(origin).max(0).unsigned_abs())
}
