// Copyright 2025 the MuNG Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while reading or writing node documents.

use std::fmt;

/// A malformed node record.
///
/// Identifies the record by its position among the document's records
/// (counting from zero, skipped records included) and names the offending
/// field.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("record {record}, field `{field}`: {kind}")]
pub struct FormatError {
    /// Index of the record within the document.
    pub record: usize,
    /// Tag (or `Data/<key>` for data items) that failed to decode.
    pub field: String,
    /// What was wrong with it.
    pub kind: FormatErrorKind,
}

impl FormatError {
    pub(crate) fn new(record: usize, field: impl Into<String>, kind: FormatErrorKind) -> Self {
        Self {
            record,
            field: field.into(),
            kind,
        }
    }
}

/// The ways a record field can be malformed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// A required tag or attribute is absent.
    Missing,
    /// A numeric field holds something that is not a number of the right type.
    InvalidNumber(String),
    /// A likelihood list does not pair up with its link list.
    LengthMismatch {
        /// Number of link ids.
        links: usize,
        /// Number of likelihoods.
        likelihoods: usize,
    },
    /// Mask runs (or bitmap labels) do not cover `height * width` pixels.
    MaskSize {
        /// `height * width`.
        expected: usize,
        /// Pixels described by the mask text.
        actual: usize,
    },
    /// Mask dimensions describe more pixels than can be allocated.
    MaskTooLarge {
        /// `height * width`.
        pixels: usize,
    },
    /// A mask run is not of the form `value:count`.
    InvalidMask(String),
    /// A data item declares a type this format does not know.
    UnknownDataType(String),
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("missing"),
            Self::InvalidNumber(v) => write!(f, "`{v}` is not a valid number"),
            Self::LengthMismatch { links, likelihoods } => {
                write!(f, "{likelihoods} likelihoods for {links} links")
            }
            Self::MaskSize { expected, actual } => {
                write!(f, "mask covers {actual} pixels, expected {expected}")
            }
            Self::MaskTooLarge { pixels } => {
                write!(f, "mask of {pixels} pixels is too large to allocate")
            }
            Self::InvalidMask(token) => write!(f, "`{token}` is not a `value:count` run"),
            Self::UnknownDataType(t) => write!(f, "unknown data type `{t}`"),
        }
    }
}

/// Everything that can go wrong reading or writing a node document.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// A node record is malformed.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The root element is neither a node list nor a single node record.
    #[error("unexpected root element `{0}`")]
    UnexpectedRoot(String),

    /// The root element declares a format version this crate cannot read.
    #[error("unsupported format version `{0}`")]
    UnsupportedVersion(String),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
