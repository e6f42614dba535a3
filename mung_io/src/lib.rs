// Copyright 2025 the MuNG Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=mung_io --heading-base-level=0

//! MuNG IO: the XML record format for [`mung_node::Node`]s.
//!
//! Each node is one `<Node>` element with one child tag per field:
//!
//! ```xml
//! <Node>
//!     <Id>0</Id>
//!     <ClassName>noteheadFull</ClassName>
//!     <ClassLikelihoods>0.900 0.100</ClassLikelihoods>
//!     <Top>10</Top>
//!     <Left>10</Left>
//!     <Width>20</Width>
//!     <Height>20</Height>
//!     <Mask>0:400</Mask>
//!     <Outlinks>2</Outlinks>
//!     <OutlinksLikelihoods>0.850</OutlinksLikelihoods>
//! </Node>
//! ```
//!
//! Masks are run-length encoded (see [`mask_text`]); likelihoods are written
//! with three decimals ([`format_likelihood`]). Records are wrapped in a
//! `<Nodes dataset=".." document=".." version="2.0">` root. Version 2 records
//! may carry a typed `<Data>` block of extension fields.
//!
//! The reader also accepts MUSCIMA++ 1.0 documents: a `<CropObjectList>` root
//! with `<CropObject>` records, `<MLClassName>` for the class name, and masks
//! written as one label per pixel.
//!
//! Malformed records either abort decoding or are skipped and reported,
//! depending on [`DecodeOptions`].
//!
//! # Example
//!
//! ```rust
//! use mung_io::{DecodeOptions, DocumentHeader, decode_document, encode_document};
//! use mung_node::Node;
//!
//! let mut node = Node::new(0, "noteheadFull", 10, 10, 20, 20);
//! node.add_outlink(2, 0.85);
//! node.set_data("pitch_step", "G");
//!
//! let header = DocumentHeader::new("MUSCIMA-pp_2.0", "CVC-MUSCIMA_W-01_N-10_D-ideal");
//! let text = encode_document([&node], &header);
//!
//! let decoded = decode_document(&text, &DecodeOptions::default()).unwrap();
//! assert_eq!(decoded.header, header);
//! assert_eq!(decoded.nodes, vec![node]);
//! ```

use std::fs;
use std::path::Path;

use mung_node::Node;

mod decode;
mod document;
mod encode;
mod error;
pub mod mask_text;

pub use decode::{decode, decode_all, decode_document};
pub use document::{
    DecodeOptions, Decoded, DocumentHeader, ErrorPolicy, FormatVersion, LEGACY_NODE_TAG,
    LEGACY_ROOT, NODE_TAG, NODES_ROOT,
};
pub use encode::{encode, encode_document, format_likelihood};
pub use error::{CodecError, FormatError, FormatErrorKind};

/// Read and decode every node of the document at `path`.
pub fn read_nodes_from_file(
    path: impl AsRef<Path>,
    options: &DecodeOptions,
) -> Result<Vec<Node>, CodecError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read node document");
    decode_all(&text, options)
}

/// Encode `nodes` as one document and write it to `path`, replacing any
/// existing file.
pub fn write_nodes_to_file<'a>(
    path: impl AsRef<Path>,
    nodes: impl IntoIterator<Item = &'a Node>,
    header: &DocumentHeader,
) -> Result<(), CodecError> {
    let path = path.as_ref();
    let text = encode_document(nodes, header);
    fs::write(path, &text)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "wrote node document");
    Ok(())
}
