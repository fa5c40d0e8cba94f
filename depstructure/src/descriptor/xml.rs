//! XML reading and writing for descriptor trees.
//!
//! Elements, attributes, text, comments, processing instructions and the
//! doctype survive a round trip in document order. The original formatting
//! does not; the writer always pretty-prints with four-space indentation.

use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::tree::{DescriptorTree, NodeId, NodeKind};
use crate::error::{StructureError, StructureResult};

/// Parse a descriptor document.
///
/// `source_name` identifies the document in error messages (a file path or
/// an archive entry).
pub fn parse_descriptor(content: &str, source_name: &str) -> StructureResult<DescriptorTree> {
    let fail = |reason: String| StructureError::Xml {
        source_name: source_name.to_string(),
        reason,
    };

    let mut reader = Reader::from_str(content.trim_start_matches('\u{feff}'));
    reader.config_mut().trim_text(true);

    let mut builder = TreeBuilder::default();

    loop {
        let event = reader.read_event().map_err(|e| {
            fail(format!("{} at position {}", e, reader.buffer_position()))
        })?;

        match event {
            Event::Start(start) => builder.open(&start, false).map_err(fail)?,
            Event::Empty(start) => builder.open(&start, true).map_err(fail)?,
            Event::End(_) => builder.close(),
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| fail(e.to_string()))?;
                builder.content(NodeKind::Text, &text);
            }
            Event::CData(data) => {
                builder.content(NodeKind::Text, &String::from_utf8_lossy(&data));
            }
            Event::Comment(comment) => {
                builder.content(NodeKind::Comment, &String::from_utf8_lossy(&comment));
            }
            Event::PI(instruction) => {
                builder.content(NodeKind::Instruction, &String::from_utf8_lossy(&instruction));
            }
            Event::DocType(doctype) => {
                builder.content(NodeKind::Doctype, &String::from_utf8_lossy(&doctype));
            }
            Event::Eof => break,
            // The declaration is always rewritten by `write_descriptor`.
            _ => {}
        }
    }

    builder.finish().map_err(fail)
}

/// Incremental tree construction from reader events.
#[derive(Default)]
struct TreeBuilder {
    tree: Option<DescriptorTree>,
    stack: Vec<NodeId>,
    /// Content seen before the root element exists.
    prologue: Vec<(NodeKind, String)>,
}

impl TreeBuilder {
    fn open(&mut self, start: &BytesStart<'_>, empty: bool) -> Result<(), String> {
        let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();

        let (tree, node) = match &mut self.tree {
            Some(existing) => {
                let parent = *self
                    .stack
                    .last()
                    .ok_or_else(|| format!("second root element <{}>", tag))?;
                let node = existing.create_child(parent, &tag);
                (existing, node)
            }
            None => {
                let created = self.tree.insert(DescriptorTree::new(&tag));
                let root = created.root();
                (created, root)
            }
        };

        for attr in start.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            tree.set_attribute(node, &key, &value);
        }

        if !empty {
            self.stack.push(node);
        }
        Ok(())
    }

    fn close(&mut self) {
        self.stack.pop();
    }

    fn content(&mut self, kind: NodeKind, value: &str) {
        match (&mut self.tree, self.stack.last()) {
            (Some(tree), Some(&node)) => {
                if !(kind == NodeKind::Text && value.is_empty()) {
                    tree.append_content(node, kind, value);
                }
            }
            // Whitespace and stray text outside the root carry nothing.
            _ if kind == NodeKind::Text => {}
            (Some(tree), None) => {
                tree.push_outer(kind, value, true);
            }
            (None, _) => self.prologue.push((kind, value.to_string())),
        }
    }

    fn finish(self) -> Result<DescriptorTree, String> {
        if !self.stack.is_empty() {
            return Err("unexpected end of document".to_string());
        }
        let mut tree = self
            .tree
            .ok_or_else(|| "document has no root element".to_string())?;
        for (kind, value) in &self.prologue {
            tree.push_outer(*kind, value, false);
        }
        Ok(tree)
    }
}

/// Serialize a descriptor tree as an indented XML document.
pub fn write_descriptor(tree: &DescriptorTree) -> StructureResult<String> {
    let fail = |reason: String| StructureError::Xml {
        source_name: "<output>".to_string(),
        reason,
    };

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| fail(e.to_string()))?;

    let (before, after) = tree.outer_contents();
    for &node in before {
        write_node(&mut writer, tree, node).map_err(fail)?;
    }
    write_node(&mut writer, tree, tree.root()).map_err(fail)?;
    for &node in after {
        write_node(&mut writer, tree, node).map_err(fail)?;
    }

    let mut xml = String::from_utf8(writer.into_inner()).map_err(|e| fail(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

fn write_node(
    writer: &mut Writer<Vec<u8>>,
    tree: &DescriptorTree,
    node: NodeId,
) -> Result<(), String> {
    let value = tree.tag(node);
    let written = match tree.kind(node) {
        NodeKind::Element => return write_element(writer, tree, node),
        NodeKind::Text => writer.write_event(Event::Text(BytesText::new(value))),
        NodeKind::Comment => writer.write_event(Event::Comment(BytesText::from_escaped(value))),
        NodeKind::Instruction => writer.write_event(Event::PI(BytesPI::new(value))),
        NodeKind::Doctype => writer.write_event(Event::DocType(BytesText::from_escaped(value))),
    };
    written.map_err(|e| e.to_string())
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    tree: &DescriptorTree,
    node: NodeId,
) -> Result<(), String> {
    let tag = tree.tag(node);
    let mut start = BytesStart::new(tag);
    for (key, value) in tree.attributes(node) {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if tree.contents(node).next().is_none() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| e.to_string());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| e.to_string())?;
    for child in tree.contents(node) {
        write_node(writer, tree, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(|e| e.to_string())
}
