// Copyright 2025 the MuNG Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding boxes in image coordinates and the outward integer rounding rule.

use core::cmp::Ordering;

use kurbo::{Point, Rect};

/// Axis-aligned bounding box in image coordinates.
///
/// Rows grow downward and columns grow rightward. Both axes are half-open:
/// the box covers rows `top..bottom` and columns `left..right`, which matches
/// the `(top, left, top + height, left + width)` convention used by
/// [`Node::bounding_box`](crate::Node::bounding_box).
///
/// `BoundingBox<f64>` carries fractional boxes (for example detector output)
/// until they are snapped to the pixel grid with [`BoundingBox::round_outward`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BoundingBox<T = i64> {
    /// First row covered.
    pub top: T,
    /// First column covered.
    pub left: T,
    /// One past the last row covered.
    pub bottom: T,
    /// One past the last column covered.
    pub right: T,
}

impl<T> BoundingBox<T> {
    /// Create a box from its four edges.
    pub const fn new(top: T, left: T, bottom: T, right: T) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }
}

impl<T: Copy + PartialOrd> BoundingBox<T> {
    /// The edges as a `(top, left, bottom, right)` tuple.
    pub fn as_tuple(&self) -> (T, T, T, T) {
        (self.top, self.left, self.bottom, self.right)
    }

    /// Whether the two boxes share a region of positive area.
    ///
    /// Rows `[top, bottom)` and columns `[left, right)` must both intersect.
    /// Boxes that only touch along an edge or a corner do not overlap, and a
    /// box with zero height or width overlaps nothing.
    pub fn overlaps(&self, other: &Self) -> bool {
        lt(max_t(self.top, other.top), min_t(self.bottom, other.bottom))
            && lt(max_t(self.left, other.left), min_t(self.right, other.right))
    }

    /// Whether the pixel at `(row, col)` lies inside the box.
    pub fn contains_point(&self, row: T, col: T) -> bool {
        le(self.top, row) && lt(row, self.bottom) && le(self.left, col) && lt(col, self.right)
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &Self) -> bool {
        le(self.top, other.top)
            && le(self.left, other.left)
            && le(other.bottom, self.bottom)
            && le(other.right, self.right)
    }

    /// The smallest box covering both boxes.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            top: min_t(self.top, other.top),
            left: min_t(self.left, other.left),
            bottom: max_t(self.bottom, other.bottom),
            right: max_t(self.right, other.right),
        }
    }

    /// The shared region of both boxes, or `None` if they do not overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let clipped = Self {
            top: max_t(self.top, other.top),
            left: max_t(self.left, other.left),
            bottom: min_t(self.bottom, other.bottom),
            right: min_t(self.right, other.right),
        };
        (!clipped.is_empty()).then_some(clipped)
    }

    /// Return true if the box has no area or is inverted. Assumes no NaN.
    pub fn is_empty(&self) -> bool {
        !lt(self.top, self.bottom) || !lt(self.left, self.right)
    }
}

impl BoundingBox<i64> {
    /// Create a box from its upper-left corner and size.
    pub const fn from_origin_size(top: i64, left: i64, height: u32, width: u32) -> Self {
        Self {
            top,
            left,
            bottom: top.saturating_add(height as i64),
            right: left.saturating_add(width as i64),
        }
    }

    /// Number of rows covered. Zero for inverted boxes.
    pub const fn height(&self) -> u64 {
        clamp_extent(self.top, self.bottom)
    }

    /// Number of columns covered. Zero for inverted boxes.
    pub const fn width(&self) -> u64 {
        clamp_extent(self.left, self.right)
    }

    /// Number of pixels covered.
    pub const fn area(&self) -> u64 {
        self.height().saturating_mul(self.width())
    }

    /// The box shifted `down` rows and `right` columns.
    pub const fn translate(&self, down: i64, right: i64) -> Self {
        Self {
            top: self.top.saturating_add(down),
            left: self.left.saturating_add(right),
            bottom: self.bottom.saturating_add(down),
            right: self.right.saturating_add(right),
        }
    }
}

impl BoundingBox<f64> {
    /// Snap the box to the pixel grid without shrinking it.
    ///
    /// Top and left edges round down, bottom and right edges round up, so the
    /// result always contains the original region. Integral edges pass
    /// through unchanged.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Pixel coordinates are far below i64 range; out-of-range values saturate."
    )]
    pub fn round_outward(&self) -> BoundingBox<i64> {
        let min = Point::new(self.left, self.top).floor();
        let max = Point::new(self.right, self.bottom).ceil();
        BoundingBox {
            top: min.y as i64,
            left: min.x as i64,
            bottom: max.y as i64,
            right: max.x as i64,
        }
    }
}

/// Convert a possibly fractional `(top, left, bottom, right)` box to the
/// smallest integer box that fully contains it.
///
/// ```
/// use mung_node::round_bounding_box_to_integer;
///
/// let rounded = round_bounding_box_to_integer(44.2, 18.9, 55.1, 92.99);
/// assert_eq!(rounded.as_tuple(), (44, 18, 56, 93));
/// ```
pub fn round_bounding_box_to_integer(
    top: f64,
    left: f64,
    bottom: f64,
    right: f64,
) -> BoundingBox<i64> {
    BoundingBox::new(top, left, bottom, right).round_outward()
}

impl<T> From<(T, T, T, T)> for BoundingBox<T> {
    fn from((top, left, bottom, right): (T, T, T, T)) -> Self {
        Self::new(top, left, bottom, right)
    }
}

impl From<Rect> for BoundingBox<f64> {
    fn from(rect: Rect) -> Self {
        Self {
            top: rect.y0,
            left: rect.x0,
            bottom: rect.y1,
            right: rect.x1,
        }
    }
}

impl From<BoundingBox<f64>> for Rect {
    fn from(bbox: BoundingBox<f64>) -> Self {
        Self::new(bbox.left, bbox.top, bbox.right, bbox.bottom)
    }
}

impl From<BoundingBox<i64>> for BoundingBox<f64> {
    #[allow(
        clippy::cast_precision_loss,
        reason = "Pixel coordinates fit comfortably in an f64 mantissa."
    )]
    fn from(bbox: BoundingBox<i64>) -> Self {
        Self {
            top: bbox.top as f64,
            left: bbox.left as f64,
            bottom: bbox.bottom as f64,
            right: bbox.right as f64,
        }
    }
}

const fn clamp_extent(start: i64, end: i64) -> u64 {
    if end > start {
        end.abs_diff(start)
    } else {
        0
    }
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}
