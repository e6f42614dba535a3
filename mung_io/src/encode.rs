// Copyright 2025 the MuNG Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canonical XML records and documents.

use std::fmt::{Display, Write as _};

use mung_node::{DataValue, Node};

use crate::document::{DocumentHeader, NODE_TAG, NODES_ROOT};
use crate::mask_text::encode_mask;

/// Render a likelihood with exactly three decimals.
///
/// Rounding is done on the exact binary value, so the output does not
/// depend on how the platform would display the float. Negative zero (and
/// negatives that round to zero) print as `0.000`.
///
/// ```
/// use mung_io::format_likelihood;
///
/// assert_eq!(format_likelihood(1.0 / 7.0), "0.143");
/// assert_eq!(format_likelihood(4.0 / 7.0), "0.571");
/// assert_eq!(format_likelihood(0.0), "0.000");
/// ```
pub fn format_likelihood(value: f64) -> String {
    let s = format!("{value:.3}");
    if s == "-0.000" { "0.000".into() } else { s }
}

/// Encode one node as a tab-indented `<Node>` record.
///
/// Tags appear in the order `Id`, `ClassName`, `ClassLikelihoods`, `Top`,
/// `Left`, `Width`, `Height`, `Mask`, `Inlinks`, `InlinksLikelihoods`,
/// `Outlinks`, `OutlinksLikelihoods`, `Data`. Empty lists, an unset mask, and an empty data
/// bag are omitted. Encoding never fails.
pub fn encode(node: &Node) -> String {
    encode_record(node, true)
}

/// Encode a whole document: XML declaration, root element with the header's
/// attributes, then one record per node.
///
/// [`FormatVersion::V1`] documents drop every node's `Data` block.
pub fn encode_document<'a>(
    nodes: impl IntoIterator<Item = &'a Node>,
    header: &DocumentHeader,
) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push('<');
    out.push_str(NODES_ROOT);
    for (name, value) in [
        ("dataset", header.dataset.as_deref()),
        ("document", header.document.as_deref()),
        ("version", Some(header.version.as_str())),
    ] {
        if let Some(value) = value {
            let _ = write!(out, " {name}=\"{}\"", escape(value, true));
        }
    }
    out.push_str(">\n");
    let with_data = header.version.expects_data();
    for node in nodes {
        out.push_str(&encode_record(node, with_data));
        out.push('\n');
    }
    let _ = writeln!(out, "</{NODES_ROOT}>");
    out
}

fn encode_record(node: &Node, with_data: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<{NODE_TAG}>");
    tag(&mut out, "Id", node.id());
    tag(&mut out, "ClassName", escape(node.class_name(), false));
    list_tag(
        &mut out,
        "ClassLikelihoods",
        node.class_likelihoods().iter().copied().map(format_likelihood),
    );
    tag(&mut out, "Top", node.top());
    tag(&mut out, "Left", node.left());
    tag(&mut out, "Width", node.width());
    tag(&mut out, "Height", node.height());
    if let Some(mask) = node.mask() {
        tag(&mut out, "Mask", encode_mask(mask));
    }
    list_tag(&mut out, "Inlinks", node.incoming().iter().map(|l| l.target));
    list_tag(
        &mut out,
        "InlinksLikelihoods",
        node.incoming().iter().map(|l| format_likelihood(l.likelihood)),
    );
    list_tag(&mut out, "Outlinks", node.outgoing().iter().map(|l| l.target));
    list_tag(
        &mut out,
        "OutlinksLikelihoods",
        node.outgoing().iter().map(|l| format_likelihood(l.likelihood)),
    );
    if with_data && !node.data().is_empty() {
        out.push_str("\t<Data>\n");
        for (key, value) in node.data() {
            let _ = writeln!(
                out,
                "\t\t<DataItem key=\"{}\" type=\"{}\">{}</DataItem>",
                escape(key, true),
                value.type_name(),
                data_text(value)
            );
        }
        out.push_str("\t</Data>\n");
    }
    let _ = write!(out, "</{NODE_TAG}>");
    out
}

fn tag(out: &mut String, name: &str, value: impl Display) {
    let _ = writeln!(out, "\t<{name}>{value}</{name}>");
}

fn list_tag<T: Display>(out: &mut String, name: &str, values: impl Iterator<Item = T>) {
    let mut values = values.peekable();
    if values.peek().is_none() {
        return;
    }
    let _ = write!(out, "\t<{name}>");
    for (i, v) in values.enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{v}");
    }
    let _ = writeln!(out, "</{name}>");
}

fn data_text(value: &DataValue) -> String {
    fn join<T: Display>(items: &[T]) -> String {
        let mut s = String::new();
        for (i, v) in items.iter().enumerate() {
            if i > 0 {
                s.push(' ');
            }
            let _ = write!(s, "{v}");
        }
        s
    }
    match value {
        DataValue::Int(v) => v.to_string(),
        DataValue::Float(v) => v.to_string(),
        DataValue::Str(v) => escape(v, false),
        DataValue::IntList(v) => join(v),
        DataValue::FloatList(v) => join(v),
        DataValue::StrList(v) => {
            let escaped: Vec<String> = v.iter().map(|s| escape(s, false)).collect();
            join(&escaped)
        }
    }
}

/// Escape XML metacharacters. Attribute values also escape double quotes.
fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FormatVersion;
    use mung_node::{Mask, NodeParts};

    fn sevenths() -> Node {
        Node::from_parts(NodeParts {
            id: 0,
            class_name: "test1".into(),
            top: 10,
            left: 10,
            width: 20,
            height: 20,
            class_likelihoods: vec![
                1.0 / 7.0,
                4.0 / 7.0,
                1.0 / 7.0,
                0.0,
                0.0,
                0.0,
                1.0 / 7.0,
            ],
            outlinks: vec![2],
            outlinks_likelihoods: vec![0.85],
            inlinks: vec![3],
            inlinks_likelihoods: vec![0.7],
            mask: Some(Mask::zeros(20, 20)),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn record_matches_canonical_text() {
        let expected = "<Node>
\t<Id>0</Id>
\t<ClassName>test1</ClassName>
\t<ClassLikelihoods>0.143 0.571 0.143 0.000 0.000 0.000 0.143</ClassLikelihoods>
\t<Top>10</Top>
\t<Left>10</Left>
\t<Width>20</Width>
\t<Height>20</Height>
\t<Mask>0:400</Mask>
\t<Inlinks>3</Inlinks>
\t<InlinksLikelihoods>0.700</InlinksLikelihoods>
\t<Outlinks>2</Outlinks>
\t<OutlinksLikelihoods>0.850</OutlinksLikelihoods>
</Node>";
        assert_eq!(encode(&sevenths()), expected);
    }

    #[test]
    fn empty_parts_are_omitted() {
        let node = Node::new(5, "barline", 0, 0, 1, 30);
        assert_eq!(
            encode(&node),
            "<Node>\n\t<Id>5</Id>\n\t<ClassName>barline</ClassName>\n\t<Top>0</Top>\n\t<Left>0</Left>\n\t<Width>1</Width>\n\t<Height>30</Height>\n</Node>"
        );
    }

    #[test]
    fn data_block_follows_links() {
        let mut node = Node::new(1, "noteheadFull", 0, 0, 1, 1);
        node.set_data("pitch_step", "G");
        node.set_data("midi_pitch_code", 79_i64);
        node.set_data("precedence_outlinks", vec![8_i64, 17]);
        let text = encode(&node);
        assert!(text.ends_with(
            "\t<Height>1</Height>
\t<Data>
\t\t<DataItem key=\"midi_pitch_code\" type=\"int\">79</DataItem>
\t\t<DataItem key=\"pitch_step\" type=\"str\">G</DataItem>
\t\t<DataItem key=\"precedence_outlinks\" type=\"list[int]\">8 17</DataItem>
\t</Data>
</Node>"
        ));
    }

    #[test]
    fn likelihood_rounding() {
        assert_eq!(format_likelihood(1.0 / 7.0), "0.143");
        assert_eq!(format_likelihood(4.0 / 7.0), "0.571");
        assert_eq!(format_likelihood(0.0), "0.000");
        assert_eq!(format_likelihood(-0.0), "0.000");
        assert_eq!(format_likelihood(-0.0001), "0.000");
        assert_eq!(format_likelihood(1.0), "1.000");
        assert_eq!(format_likelihood(0.9996), "1.000");
    }

    #[test]
    fn class_names_are_escaped() {
        let node = Node::new(0, "a<b&c", 0, 0, 0, 0);
        assert!(encode(&node).contains("<ClassName>a&lt;b&amp;c</ClassName>"));
    }

    #[test]
    fn document_wraps_records_and_drops_data_for_v1() {
        let mut node = Node::new(0, "clef", 1, 2, 3, 4);
        node.set_data("k", 1_i64);
        let mut header = DocumentHeader::new("MUSCIMA-pp_2.0", "W-01_N-10");
        let doc = encode_document([&node], &header);
        assert!(doc.starts_with(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Nodes dataset=\"MUSCIMA-pp_2.0\" document=\"W-01_N-10\" version=\"2.0\">\n<Node>"
        ));
        assert!(doc.ends_with("</Node>\n</Nodes>\n"));
        assert!(doc.contains("<Data>"));

        header.version = FormatVersion::V1;
        assert!(!encode_document([&node], &header).contains("<Data>"));
    }
}
