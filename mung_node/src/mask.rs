// Copyright 2025 the MuNG Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dense pixel masks with an explicit shape.
//!
//! A [`Mask`] is an owned, row-major buffer of `u8` labels. The node model
//! treats labels as opaque: `0` is background for area and merge purposes,
//! everything else is foreground. The only layout contract is row-major
//! flattening, which is what run-length encoding walks.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::NodeError;

/// A `height × width` grid of pixel labels stored row-major.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Mask {
    height: u32,
    width: u32,
    data: Vec<u8>,
}

impl Mask {
    /// A mask of the given shape filled with background (`0`).
    pub fn zeros(height: u32, width: u32) -> Self {
        Self::filled(height, width, 0)
    }

    /// A mask of the given shape filled with `value`.
    pub fn filled(height: u32, width: u32, value: u8) -> Self {
        Self {
            height,
            width,
            data: vec![value; pixel_count(height, width)],
        }
    }

    /// Wrap a row-major buffer. Fails unless `data.len() == height * width`.
    pub fn from_vec(height: u32, width: u32, data: Vec<u8>) -> Result<Self, NodeError> {
        let expected = pixel_count(height, width);
        if data.len() != expected {
            return Err(NodeError::MaskLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            height,
            width,
            data,
        })
    }

    /// Expand `(value, count)` runs over the flattened mask.
    ///
    /// The runs must cover exactly `height * width` pixels, and the buffer
    /// must be allocatable; a shape too large for memory is an error rather
    /// than an abort.
    pub fn from_rle(height: u32, width: u32, runs: &[(u8, usize)]) -> Result<Self, NodeError> {
        let expected = pixel_count(height, width);
        let actual = runs
            .iter()
            .fold(0_usize, |acc, &(_, n)| acc.saturating_add(n));
        if actual != expected {
            return Err(NodeError::RleLength { expected, actual });
        }
        let mut data = Vec::new();
        data.try_reserve_exact(expected)
            .map_err(|_| NodeError::MaskTooLarge { pixels: expected })?;
        for &(value, n) in runs {
            data.resize(data.len() + n, value);
        }
        Ok(Self {
            height,
            width,
            data,
        })
    }

    /// Number of rows.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of columns.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// `(height, width)`.
    pub const fn shape(&self) -> (u32, u32) {
        (self.height, self.width)
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True for masks with zero rows or zero columns.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The flattened, row-major labels.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consume the mask and return its row-major buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// The label at `(row, col)`, or `None` outside the mask.
    pub fn get(&self, row: u32, col: u32) -> Option<u8> {
        self.offset(row, col).map(|i| self.data[i])
    }

    /// Set the label at `(row, col)`. Returns false if it lies outside the mask.
    pub fn set(&mut self, row: u32, col: u32, value: u8) -> bool {
        match self.offset(row, col) {
            Some(i) => {
                self.data[i] = value;
                true
            }
            None => false,
        }
    }

    /// Iterate rows top to bottom. Masks with zero columns yield no rows.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.data.chunks_exact(self.width.max(1) as usize)
    }

    /// Number of foreground (non-zero) pixels.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Maximal runs of equal labels over the flattened mask.
    ///
    /// An empty mask has no runs.
    pub fn runs(&self) -> Vec<(u8, usize)> {
        let mut out: Vec<(u8, usize)> = Vec::new();
        for &value in &self.data {
            match out.last_mut() {
                Some((last, n)) if *last == value => *n += 1,
                _ => out.push((value, 1)),
            }
        }
        out
    }

    /// Combine `src` into this mask with its upper-left corner at
    /// `(row_offset, col_offset)`. Pixels of `src` falling outside are dropped.
    pub(crate) fn paste_with(
        &mut self,
        src: &Self,
        row_offset: u32,
        col_offset: u32,
        mut combine: impl FnMut(u8, u8) -> u8,
    ) {
        for (r, row) in src.rows().enumerate() {
            let Ok(r) = u32::try_from(r) else {
                break;
            };
            let Some(dst_row) = row_offset.checked_add(r) else {
                break;
            };
            for (c, &value) in row.iter().enumerate() {
                let Ok(c) = u32::try_from(c) else {
                    break;
                };
                let Some(i) = col_offset
                    .checked_add(c)
                    .and_then(|dst_col| self.offset(dst_row, dst_col))
                else {
                    continue;
                };
                self.data[i] = combine(self.data[i], value);
            }
        }
    }

    fn offset(&self, row: u32, col: u32) -> Option<usize> {
        (row < self.height && col < self.width)
            .then(|| row as usize * self.width as usize + col as usize)
    }
}

pub(crate) fn pixel_count(height: u32, width: u32) -> usize {
    (height as usize).saturating_mul(width as usize)
}
