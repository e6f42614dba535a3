// Copyright 2025 the MuNG Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text forms of a mask.
//!
//! Masks are written as run-length pairs `value:count` over the row-major
//! flattened mask, separated by single spaces: a 20×20 background mask is
//! `0:400`. Older files sometimes list one label per pixel instead
//! (`0 0 1 1 ...`); [`decode_mask`] accepts both and tells them apart by
//! whether any token contains a colon.

use std::fmt::Write as _;

use mung_node::{Mask, NodeError};

use crate::error::FormatErrorKind;

/// Run-length encode a mask. An empty mask encodes to the empty string.
pub fn encode_mask(mask: &Mask) -> String {
    let mut out = String::new();
    for (i, (value, count)) in mask.runs().into_iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{value}:{count}");
    }
    out
}

/// Parse mask text into a `height × width` mask.
pub fn decode_mask(text: &str, height: u32, width: u32) -> Result<Mask, FormatErrorKind> {
    let expected = (height as usize).saturating_mul(width as usize);
    let mut tokens = text.split_whitespace().peekable();
    let is_rle = tokens.peek().is_none() || text.contains(':');

    let mask = if is_rle {
        let runs = tokens.map(parse_run).collect::<Result<Vec<_>, _>>()?;
        Mask::from_rle(height, width, &runs)
    } else {
        let labels = tokens.map(parse_label).collect::<Result<Vec<_>, _>>()?;
        Mask::from_vec(height, width, labels)
    };
    mask.map_err(|e| match e {
        NodeError::RleLength { actual, .. } | NodeError::MaskLength { actual, .. } => {
            FormatErrorKind::MaskSize { expected, actual }
        }
        NodeError::MaskTooLarge { pixels } => FormatErrorKind::MaskTooLarge { pixels },
        other => FormatErrorKind::InvalidMask(other.to_string()),
    })
}

fn parse_run(token: &str) -> Result<(u8, usize), FormatErrorKind> {
    let (value, count) = token
        .split_once(':')
        .ok_or_else(|| FormatErrorKind::InvalidMask(token.into()))?;
    let value = value
        .parse::<u8>()
        .map_err(|_| FormatErrorKind::InvalidMask(token.into()))?;
    let count = count
        .parse::<usize>()
        .map_err(|_| FormatErrorKind::InvalidMask(token.into()))?;
    Ok((value, count))
}

fn parse_label(token: &str) -> Result<u8, FormatErrorKind> {
    token
        .parse::<u8>()
        .map_err(|_| FormatErrorKind::InvalidNumber(token.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_square() {
        let m = Mask::zeros(20, 20);
        assert_eq!(encode_mask(&m), "0:400");
        assert_eq!(decode_mask("0:400", 20, 20).unwrap(), m);
    }

    #[test]
    fn mixed_runs_roundtrip() {
        let m = Mask::from_vec(2, 3, vec![0, 1, 1, 1, 0, 0]).unwrap();
        let text = encode_mask(&m);
        assert_eq!(text, "0:1 1:3 0:2");
        assert_eq!(decode_mask(&text, 2, 3).unwrap(), m);
    }

    #[test]
    fn bitmap_text_is_detected() {
        let m = decode_mask("0 1\n1 0", 2, 2).unwrap();
        assert_eq!(m.as_slice(), &[0, 1, 1, 0]);
    }

    #[test]
    fn run_total_must_match_shape() {
        assert_eq!(
            decode_mask("0:5 1:4", 3, 4),
            Err(FormatErrorKind::MaskSize {
                expected: 12,
                actual: 9
            })
        );
        assert_eq!(
            decode_mask("0 1 1", 2, 2),
            Err(FormatErrorKind::MaskSize {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn malformed_runs() {
        assert_eq!(
            decode_mask("0:x", 1, 1),
            Err(FormatErrorKind::InvalidMask("0:x".into()))
        );
        assert_eq!(
            decode_mask("0:1 1", 1, 2),
            Err(FormatErrorKind::InvalidMask("1".into()))
        );
    }

    #[test]
    fn empty_mask() {
        assert_eq!(encode_mask(&Mask::zeros(0, 4)), "");
        assert_eq!(decode_mask("", 0, 4).unwrap(), Mask::zeros(0, 4));
        assert_eq!(
            decode_mask("  ", 1, 1),
            Err(FormatErrorKind::MaskSize {
                expected: 1,
                actual: 0
            })
        );
    }
}
