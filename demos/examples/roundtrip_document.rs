// Copyright 2025 the MuNG Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Writing and reading a node document.
//!
//! Encode a few nodes to a file, read them back, and decode a legacy
//! document with one malformed record under the skip policy.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p mung_demos --example roundtrip_document`

use mung_io::{
    DecodeOptions, DocumentHeader, decode_document, encode, read_nodes_from_file,
    write_nodes_to_file,
};
use mung_node::{LinkSide, Node};
use tracing_subscriber::EnvFilter;

const LEGACY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<CropObjectList>
<CropObjects>
<CropObject>
	<Id>0</Id>
	<MLClassName>notehead-full</MLClassName>
	<Top>5</Top>
	<Left>5</Left>
	<Width>2</Width>
	<Height>2</Height>
	<Mask>0 1 1 0</Mask>
</CropObject>
<CropObject>
	<Id>1</Id>
	<MLClassName>stem</MLClassName>
	<Top>oops</Top>
	<Left>6</Left>
	<Width>1</Width>
	<Height>20</Height>
</CropObject>
</CropObjects>
</CropObjectList>
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut head = Node::new(0, "noteheadFull", 117, 224, 16, 13);
    let mut stem = Node::new(1, "stem", 68, 238, 3, 58);
    head.add_outlink(stem.id(), 0.97);
    stem.add_inlink(head.id(), 0.97);
    head.set_data("pitch_step", "G");
    head.set_data("midi_pitch_code", 79_i64);

    println!("{}", encode(&head));

    let path = std::env::temp_dir().join("mung_demo_nodes.xml");
    let header = DocumentHeader::new("MUSCIMA-pp_2.0", "CVC-MUSCIMA_W-01_N-10_D-ideal");
    write_nodes_to_file(&path, [&head, &stem], &header)?;
    let mut nodes = read_nodes_from_file(&path, &DecodeOptions::default())?;
    std::fs::remove_file(&path)?;
    assert_eq!(nodes, vec![head.clone(), stem]);
    println!("uid of first node: {}", nodes[0].uid("MUSCIMA-pp_2.0", "W-01_N-10"));

    let removed = nodes[0].remove_links_to(1, LinkSide::all());
    println!("dropped {removed} link(s) from node 0");

    let legacy = decode_document(LEGACY, &DecodeOptions::skipping())?;
    println!(
        "legacy document (version {}): {} node(s) decoded, {} skipped",
        legacy.header.version.as_str(),
        legacy.nodes.len(),
        legacy.skipped.len(),
    );
    for err in &legacy.skipped {
        println!("  {err}");
    }
    Ok(())
}
