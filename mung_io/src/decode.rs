// Copyright 2025 the MuNG Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parsing node records and documents.

use std::str::FromStr;

use mung_node::{DataMap, DataValue, LinkSide, Node, NodeError, NodeId, NodeParts};

use crate::document::{
    DecodeOptions, Decoded, DocumentHeader, ErrorPolicy, FormatVersion, LEGACY_NODE_TAG,
    LEGACY_ROOT, NODE_TAG, NODES_ROOT,
};
use crate::error::{CodecError, FormatError, FormatErrorKind};
use crate::mask_text::decode_mask;

/// Decode a single `<Node>` (or legacy `<CropObject>`) record.
///
/// The text must be one record element on its own, as produced by
/// [`encode`](crate::encode()). Its `Data` block, if any, is decoded.
pub fn decode(record: &str) -> Result<Node, CodecError> {
    let doc = roxmltree::Document::parse(record)?;
    let root = doc.root_element();
    if !is_record(root) {
        return Err(CodecError::UnexpectedRoot(root.tag_name().name().into()));
    }
    Ok(decode_record(root, 0, FormatVersion::V2)?)
}

/// Decode every record of a document, in document order.
///
/// Under [`ErrorPolicy::Skip`] malformed records are dropped after being
/// logged; use [`decode_document`] to also get them back.
pub fn decode_all(document: &str, options: &DecodeOptions) -> Result<Vec<Node>, CodecError> {
    decode_document(document, options).map(|d| d.nodes)
}

/// Decode a document together with its header and any skipped records.
///
/// The root element is `<Nodes>` (or legacy `<CropObjectList>`), optionally
/// carrying `dataset`, `document`, and `version` attributes. Records may sit
/// directly under the root or inside a container element, as legacy files do.
pub fn decode_document(document: &str, options: &DecodeOptions) -> Result<Decoded, CodecError> {
    let doc = roxmltree::Document::parse(document)?;
    let root = doc.root_element();
    let header = read_header(root)?;
    tracing::debug!(
        dataset = header.dataset.as_deref(),
        document = header.document.as_deref(),
        version = header.version.as_str(),
        "decoding node document"
    );

    let mut nodes = Vec::new();
    let mut skipped = Vec::new();
    for (index, el) in root.descendants().filter(|n| is_record(*n)).enumerate() {
        match decode_record(el, index, header.version) {
            Ok(node) => nodes.push(node),
            Err(err) => match options.on_error {
                ErrorPolicy::Abort => return Err(err.into()),
                ErrorPolicy::Skip => {
                    tracing::warn!(record = index, error = %err, "skipping malformed record");
                    skipped.push(err);
                }
            },
        }
    }
    Ok(Decoded {
        header,
        nodes,
        skipped,
    })
}

fn read_header(root: roxmltree::Node<'_, '_>) -> Result<DocumentHeader, CodecError> {
    let default_version = match root.tag_name().name() {
        NODES_ROOT => FormatVersion::V2,
        LEGACY_ROOT => FormatVersion::V1,
        other => return Err(CodecError::UnexpectedRoot(other.into())),
    };
    let version = match root.attribute("version") {
        Some(v) => FormatVersion::parse(v)?,
        None => default_version,
    };
    Ok(DocumentHeader {
        dataset: root.attribute("dataset").map(Into::into),
        document: root.attribute("document").map(Into::into),
        version,
    })
}

fn is_record(node: roxmltree::Node<'_, '_>) -> bool {
    node.is_element() && matches!(node.tag_name().name(), NODE_TAG | LEGACY_NODE_TAG)
}

/// One record element and its position in the document.
struct Record<'a, 'input> {
    el: roxmltree::Node<'a, 'input>,
    index: usize,
}

impl<'a, 'input> Record<'a, 'input> {
    fn error(&self, field: impl Into<String>, kind: FormatErrorKind) -> FormatError {
        FormatError::new(self.index, field, kind)
    }

    fn child(&self, names: &[&str]) -> Option<roxmltree::Node<'a, 'input>> {
        self.el
            .children()
            .find(|c| c.is_element() && names.contains(&c.tag_name().name()))
    }

    /// Text of the first matching child with surrounding whitespace removed.
    fn text(&self, names: &[&str]) -> Option<&'a str> {
        self.child(names).map(|c| c.text().unwrap_or("").trim())
    }

    /// Text of the first matching child exactly as written.
    fn verbatim(&self, names: &[&'static str]) -> Result<&'a str, FormatError> {
        self.child(names)
            .map(|c| c.text().unwrap_or(""))
            .ok_or_else(|| self.error(names[0], FormatErrorKind::Missing))
    }

    fn required_text(&self, names: &[&'static str]) -> Result<&'a str, FormatError> {
        self.text(names)
            .ok_or_else(|| self.error(names[0], FormatErrorKind::Missing))
    }

    fn number<T: FromStr>(&self, name: &'static str) -> Result<T, FormatError> {
        let text = self.required_text(&[name])?;
        text.parse()
            .map_err(|_| self.error(name, FormatErrorKind::InvalidNumber(text.into())))
    }

    fn list<T: FromStr>(&self, name: &'static str) -> Result<Option<Vec<T>>, FormatError> {
        self.text(&[name])
            .map(|text| {
                parse_list(text).map_err(|bad| self.error(name, FormatErrorKind::InvalidNumber(bad)))
            })
            .transpose()
    }

    /// Link ids and their likelihoods. Likelihoods default to `1.0` when the
    /// likelihood tag is absent altogether.
    fn links(
        &self,
        ids_tag: &'static str,
        likelihoods_tag: &'static str,
    ) -> Result<(Vec<NodeId>, Vec<f64>), FormatError> {
        let ids: Vec<NodeId> = self.list(ids_tag)?.unwrap_or_default();
        let likelihoods = match self.list::<f64>(likelihoods_tag)? {
            Some(l) if l.len() != ids.len() => {
                return Err(self.error(
                    likelihoods_tag,
                    FormatErrorKind::LengthMismatch {
                        links: ids.len(),
                        likelihoods: l.len(),
                    },
                ));
            }
            Some(l) => l,
            None => vec![1.0; ids.len()],
        };
        Ok((ids, likelihoods))
    }

    fn data(&self) -> Result<DataMap, FormatError> {
        let mut data = DataMap::new();
        let Some(block) = self.child(&["Data"]) else {
            return Ok(data);
        };
        for item in block.children().filter(|c| c.is_element()) {
            let key = item
                .attribute("key")
                .ok_or_else(|| self.error("Data", FormatErrorKind::Missing))?;
            let field = format!("Data/{key}");
            let ty = item
                .attribute("type")
                .ok_or_else(|| self.error(field.as_str(), FormatErrorKind::Missing))?;
            let text = item.text().unwrap_or("");
            let value = parse_data_value(ty, text).map_err(|kind| self.error(field, kind))?;
            data.insert(key.into(), value);
        }
        Ok(data)
    }
}

fn decode_record(
    el: roxmltree::Node<'_, '_>,
    index: usize,
    version: FormatVersion,
) -> Result<Node, FormatError> {
    let record = Record { el, index };

    let id: NodeId = record.number("Id")?;
    let class_name = record.verbatim(&["ClassName", "MLClassName"])?;
    let top: i64 = record.number("Top")?;
    let left: i64 = record.number("Left")?;
    let width: u32 = record.number("Width")?;
    let height: u32 = record.number("Height")?;
    let class_likelihoods = record.list("ClassLikelihoods")?.unwrap_or_default();
    let (inlinks, inlinks_likelihoods) = record.links("Inlinks", "InlinksLikelihoods")?;
    let (outlinks, outlinks_likelihoods) = record.links("Outlinks", "OutlinksLikelihoods")?;
    let mask = record
        .text(&["Mask"])
        .map(|text| decode_mask(text, height, width))
        .transpose()
        .map_err(|kind| record.error("Mask", kind))?;

    let data = if version.expects_data() {
        record.data()?
    } else {
        if record.child(&["Data"]).is_some() {
            tracing::debug!(record = index, "ignoring Data block in a version 1 document");
        }
        DataMap::new()
    };

    let node = Node::from_parts(NodeParts {
        id,
        class_name: class_name.into(),
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
    })
    .map_err(|e| invariant_error(index, e))?;
    tracing::trace!(record = index, id, class = class_name, "decoded record");
    Ok(node)
}

fn invariant_error(index: usize, err: NodeError) -> FormatError {
    match err {
        NodeError::LinkLengthMismatch {
            side,
            links,
            likelihoods,
        } => {
            let field = if side == LinkSide::INLINKS {
                "InlinksLikelihoods"
            } else {
                "OutlinksLikelihoods"
            };
            FormatError::new(
                index,
                field,
                FormatErrorKind::LengthMismatch { links, likelihoods },
            )
        }
        NodeError::MaskShape { expected, actual } => FormatError::new(
            index,
            "Mask",
            FormatErrorKind::MaskSize {
                expected: expected.0 as usize * expected.1 as usize,
                actual: actual.0 as usize * actual.1 as usize,
            },
        ),
        NodeError::MaskLength { expected, actual } | NodeError::RleLength { expected, actual } => {
            FormatError::new(index, "Mask", FormatErrorKind::MaskSize { expected, actual })
        }
        NodeError::MaskTooLarge { pixels } => {
            FormatError::new(index, "Mask", FormatErrorKind::MaskTooLarge { pixels })
        }
    }
}

/// Parse whitespace-separated values, returning the first bad token on failure.
fn parse_list<T: FromStr>(text: &str) -> Result<Vec<T>, String> {
    text.split_whitespace()
        .map(|t| t.parse().map_err(|_| t.to_owned()))
        .collect()
}

fn parse_data_value(ty: &str, text: &str) -> Result<DataValue, FormatErrorKind> {
    let number = |t: &str| FormatErrorKind::InvalidNumber(t.into());
    Ok(match ty {
        "int" => DataValue::Int(text.trim().parse().map_err(|_| number(text))?),
        "float" => DataValue::Float(text.trim().parse().map_err(|_| number(text))?),
        "str" => DataValue::Str(text.into()),
        "list[int]" => DataValue::IntList(parse_list(text).map_err(|t| number(&t))?),
        "list[float]" => DataValue::FloatList(parse_list(text).map_err(|t| number(&t))?),
        "list[str]" => DataValue::StrList(text.split_whitespace().map(Into::into).collect()),
        other => return Err(FormatErrorKind::UnknownDataType(other.into())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode;

    const RECORD: &str = "<Node>
\t<Id>7</Id>
\t<ClassName>noteheadFull</ClassName>
\t<ClassLikelihoods>0.900 0.100</ClassLikelihoods>
\t<Top>10</Top>
\t<Left>12</Left>
\t<Width>2</Width>
\t<Height>2</Height>
\t<Mask>0:1 1:3</Mask>
\t<Outlinks>3 4</Outlinks>
\t<OutlinksLikelihoods>0.500 0.250</OutlinksLikelihoods>
</Node>";

    #[test]
    fn decodes_plain_record() {
        let node = decode(RECORD).unwrap();
        assert_eq!(node.id(), 7);
        assert_eq!(node.class_name(), "noteheadFull");
        assert_eq!(node.class_likelihoods(), &[0.9, 0.1]);
        assert_eq!(node.bounding_box().as_tuple(), (10, 12, 12, 14));
        assert_eq!(node.mask().unwrap().as_slice(), &[0, 1, 1, 1]);
        assert_eq!(node.outlinks(), vec![3, 4]);
        assert_eq!(node.outlinks_likelihoods(), vec![0.5, 0.25]);
        assert!(node.inlinks().is_empty());
        assert!(node.data().is_empty());
    }

    #[test]
    fn decode_inverts_encode() {
        let node = decode(RECORD).unwrap();
        assert_eq!(encode(&node), RECORD);
    }

    #[test]
    fn class_names_keep_surrounding_whitespace() {
        let node = Node::new(0, " stem ", 0, 0, 1, 1);
        assert_eq!(decode(&encode(&node)).unwrap().class_name(), " stem ");
        assert_eq!(decode(&encode(&node)).unwrap(), node);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn oversized_mask_is_a_format_error() {
        let record = "<Node><Id>0</Id><ClassName>c</ClassName><Top>0</Top><Left>0</Left>\
             <Width>4294967295</Width><Height>4294967295</Height>\
             <Mask>0:18446744065119617025</Mask></Node>";
        let err = decode(record).unwrap_err();
        let CodecError::Format(err) = err else {
            panic!("expected a format error");
        };
        assert_eq!(err.field, "Mask");
        assert_eq!(
            err.kind,
            FormatErrorKind::MaskTooLarge {
                pixels: 18_446_744_065_119_617_025
            }
        );
    }

    #[test]
    fn missing_mask_stays_unset() {
        let node = decode(
            "<Node><Id>0</Id><ClassName>c</ClassName><Top>0</Top><Left>0</Left>\
             <Width>3</Width><Height>3</Height></Node>",
        )
        .unwrap();
        assert!(node.mask().is_none());
        assert_eq!(node.area(), 9);
    }

    #[test]
    fn missing_likelihoods_default_to_one() {
        let node = decode(
            "<Node><Id>0</Id><ClassName>c</ClassName><Top>0</Top><Left>0</Left>\
             <Width>1</Width><Height>1</Height><Inlinks>5 6</Inlinks></Node>",
        )
        .unwrap();
        assert_eq!(node.inlinks_likelihoods(), vec![1.0, 1.0]);
    }

    #[test]
    fn errors_name_the_field() {
        let bad_number = decode(&RECORD.replace("<Top>10</Top>", "<Top>ten</Top>")).unwrap_err();
        let CodecError::Format(err) = bad_number else {
            panic!("expected a format error");
        };
        assert_eq!(err.field, "Top");
        assert_eq!(err.kind, FormatErrorKind::InvalidNumber("ten".into()));

        let mismatch = decode(&RECORD.replace("0.500 0.250", "0.500")).unwrap_err();
        let CodecError::Format(err) = mismatch else {
            panic!("expected a format error");
        };
        assert_eq!(err.field, "OutlinksLikelihoods");
        assert_eq!(
            err.kind,
            FormatErrorKind::LengthMismatch {
                links: 2,
                likelihoods: 1
            }
        );

        let mask = decode(&RECORD.replace("0:1 1:3", "0:1 1:2")).unwrap_err();
        let CodecError::Format(err) = mask else {
            panic!("expected a format error");
        };
        assert_eq!(err.field, "Mask");
        assert_eq!(
            err.kind,
            FormatErrorKind::MaskSize {
                expected: 4,
                actual: 3
            }
        );

        let missing = decode(&RECORD.replace("\t<Id>7</Id>\n", "")).unwrap_err();
        let CodecError::Format(err) = missing else {
            panic!("expected a format error");
        };
        assert_eq!((err.field.as_str(), err.kind), ("Id", FormatErrorKind::Missing));
    }

    #[test]
    fn data_items_decode_to_native_types() {
        let node = decode(
            "<Node><Id>0</Id><ClassName>c</ClassName><Top>0</Top><Left>0</Left>\
             <Width>1</Width><Height>1</Height><Data>\
             <DataItem key=\"duration_beats\" type=\"float\">0.5</DataItem>\
             <DataItem key=\"names\" type=\"list[str]\">a b</DataItem>\
             <DataItem key=\"weights\" type=\"list[float]\">0.25 1</DataItem>\
             </Data></Node>",
        )
        .unwrap();
        assert_eq!(node.data_value("duration_beats"), Some(&DataValue::Float(0.5)));
        assert_eq!(
            node.data_value("names"),
            Some(&DataValue::StrList(vec!["a".into(), "b".into()]))
        );
        assert_eq!(
            node.data_value("weights"),
            Some(&DataValue::FloatList(vec![0.25, 1.0]))
        );
    }

    #[test]
    fn unknown_data_type_is_rejected() {
        let err = decode(
            "<Node><Id>0</Id><ClassName>c</ClassName><Top>0</Top><Left>0</Left>\
             <Width>1</Width><Height>1</Height><Data>\
             <DataItem key=\"k\" type=\"dict\">x</DataItem></Data></Node>",
        )
        .unwrap_err();
        let CodecError::Format(err) = err else {
            panic!("expected a format error");
        };
        assert_eq!(err.field, "Data/k");
        assert_eq!(err.kind, FormatErrorKind::UnknownDataType("dict".into()));
    }

    #[test]
    fn rejects_foreign_roots() {
        assert!(matches!(
            decode("<Edge/>"),
            Err(CodecError::UnexpectedRoot(name)) if name == "Edge"
        ));
        assert!(matches!(
            decode_all("<Graph/>", &DecodeOptions::default()),
            Err(CodecError::UnexpectedRoot(_))
        ));
        assert!(matches!(
            decode_all("<Nodes version=\"3.0\"/>", &DecodeOptions::default()),
            Err(CodecError::UnsupportedVersion(v)) if v == "3.0"
        ));
        assert!(matches!(decode("<Node>"), Err(CodecError::Xml(_))));
    }
}
