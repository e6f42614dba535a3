// Copyright 2025 the MuNG Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document-level metadata and decoding options.

use mung_node::Node;

use crate::error::{CodecError, FormatError};

/// Root element of current documents.
pub const NODES_ROOT: &str = "Nodes";
/// Root element of legacy MUSCIMA++ 1.0 documents.
pub const LEGACY_ROOT: &str = "CropObjectList";
/// Record element of current documents.
pub const NODE_TAG: &str = "Node";
/// Record element of legacy documents.
pub const LEGACY_NODE_TAG: &str = "CropObject";

/// Revision of the record format.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FormatVersion {
    /// MUSCIMA++ 1.0 style documents. Records carry no `Data` block; any that
    /// appear are ignored.
    V1,
    /// Current documents. Records may carry a typed `Data` block.
    #[default]
    V2,
}

impl FormatVersion {
    /// The value written to the root's `version` attribute.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "1.0",
            Self::V2 => "2.0",
        }
    }

    /// Whether records of this version carry `Data` blocks.
    pub const fn expects_data(self) -> bool {
        matches!(self, Self::V2)
    }

    pub(crate) fn parse(value: &str) -> Result<Self, CodecError> {
        match value.trim() {
            "1" | "1.0" => Ok(Self::V1),
            "2" | "2.0" => Ok(Self::V2),
            other => Err(CodecError::UnsupportedVersion(other.into())),
        }
    }
}

/// Attributes of a document's root element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentHeader {
    /// Dataset the document belongs to, e.g. `MUSCIMA-pp_2.0`.
    pub dataset: Option<String>,
    /// Name of the page image the nodes were annotated on.
    pub document: Option<String>,
    /// Record format revision.
    pub version: FormatVersion,
}

impl DocumentHeader {
    /// A current-format header for `dataset` and `document`.
    pub fn new(dataset: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            dataset: Some(dataset.into()),
            document: Some(document.into()),
            version: FormatVersion::V2,
        }
    }
}

/// What [`decode_all`](crate::decode_all) does with a malformed record.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ErrorPolicy {
    /// Fail the whole document on the first malformed record.
    #[default]
    Abort,
    /// Drop malformed records, log them, and report them in
    /// [`Decoded::skipped`].
    Skip,
}

/// Options for decoding a document.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Handling of malformed records.
    pub on_error: ErrorPolicy,
}

impl DecodeOptions {
    /// Options that skip malformed records instead of failing.
    pub const fn skipping() -> Self {
        Self {
            on_error: ErrorPolicy::Skip,
        }
    }
}

/// A decoded document.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoded {
    /// Root element attributes.
    pub header: DocumentHeader,
    /// Records that decoded, in document order.
    pub nodes: Vec<Node>,
    /// Records dropped under [`ErrorPolicy::Skip`], in document order.
    pub skipped: Vec<FormatError>,
}
