//! PDML structured field tree.
//!
//! tshark's `-T pdml` output is a nested protocol/record/field hierarchy
//! where each element carries a `name` and an optional `value` attribute.
//! This module models it as a typed recursive node so the extractor never
//! touches the XML layer directly.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::extract::ParseError;

/// One node of the decoded field tree. `name` comes from the element's
/// `name` attribute when present (protos and fields), otherwise from the
/// tag itself (`pdml`, `packet`).
#[derive(Debug, Clone, Default)]
pub struct FieldNode {
    pub name: String,
    pub value: Option<String>,
    pub children: Vec<FieldNode>,
}

impl FieldNode {
    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&FieldNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given name, in document order.
    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a FieldNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Value of the first direct child with the given name.
    pub fn child_value(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.value.as_deref())
    }
}

fn node_from_element(e: &BytesStart<'_>) -> Result<FieldNode, ParseError> {
    let mut node = FieldNode::default();
    // Extension containers legitimately carry name="", which must stay
    // distinct from elements with no name attribute at all (packet, pdml).
    let mut named = false;
    for attr in e.attributes() {
        let attr = attr.map_err(|e| ParseError::Malformed(e.to_string()))?;
        match attr.key.as_ref() {
            b"name" => {
                named = true;
                node.name = attr
                    .unescape_value()
                    .map_err(|e| ParseError::Malformed(e.to_string()))?
                    .into_owned();
            }
            b"value" => {
                node.value = Some(
                    attr.unescape_value()
                        .map_err(|e| ParseError::Malformed(e.to_string()))?
                        .into_owned(),
                );
            }
            _ => {}
        }
    }
    if !named {
        node.name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    }
    Ok(node)
}

/// Parse PDML text into a field tree rooted at the `pdml` element.
///
/// tshark omits the closing `</pdml>` (and possibly deeper closing tags)
/// when the capture was truncated mid-decode; the tree is then taken as
/// complete up to the last fully-formed element. Anything malformed beyond
/// that is a hard error.
pub fn parse_pdml(input: &str) -> Result<FieldNode, ParseError> {
    let mut reader = Reader::from_str(input);
    // Stack of open elements; stack[0] becomes the root.
    let mut stack: Vec<FieldNode> = vec![FieldNode {
        name: "pdml".to_string(),
        value: None,
        children: Vec::new(),
    }];
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if !saw_root && e.name().as_ref() == b"pdml" {
                    saw_root = true;
                    continue;
                }
                stack.push(node_from_element(&e)?);
            }
            Ok(Event::Empty(e)) => {
                let node = node_from_element(&e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Err(ParseError::Malformed("field outside pdml root".into())),
                }
            }
            Ok(Event::End(_)) => {
                if stack.len() > 1 {
                    let node = stack.pop().unwrap_or_default();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(node);
                    }
                }
            }
            // Truncated capture: fold any still-open elements into their
            // parents and return what we have.
            Ok(Event::Eof) | Err(quick_xml::Error::IllFormed(_)) => {
                while stack.len() > 1 {
                    let node = stack.pop().unwrap_or_default();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(node);
                    }
                }
                break;
            }
            Ok(_) => {}
            Err(e) => return Err(ParseError::Malformed(e.to_string())),
        }
    }

    stack.pop().ok_or_else(|| ParseError::Malformed("empty pdml output".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<pdml version="0" creator="wireshark/3.0.0">
  <packet>
    <proto name="tls" showname="Transport Layer Security">
      <field name="tls.record" showname="TLSv1 Record Layer">
        <field name="tls.record.version" value="0301"/>
      </field>
    </proto>
  </packet>
</pdml>"#;

    #[test]
    fn builds_tree_with_named_child_lookup() {
        let root = parse_pdml(SAMPLE).unwrap();
        assert_eq!(root.name, "pdml");
        let packet = root.child("packet").unwrap();
        let proto = packet.child("tls").unwrap();
        let record = proto.child("tls.record").unwrap();
        assert_eq!(record.child_value("tls.record.version"), Some("0301"));
    }

    #[test]
    fn tolerates_missing_closing_tags() {
        // Everything after the last complete field is cut off.
        let truncated = r#"<pdml>
  <packet>
    <proto name="tls">
      <field name="tls.record">
        <field name="tls.record.version" value="0301"/>"#;
        let root = parse_pdml(truncated).unwrap();
        let record = root
            .child("packet")
            .and_then(|p| p.child("tls"))
            .and_then(|t| t.child("tls.record"))
            .unwrap();
        assert_eq!(record.child_value("tls.record.version"), Some("0301"));
    }

    #[test]
    fn empty_input_yields_empty_root() {
        let root = parse_pdml("").unwrap();
        assert!(root.children.is_empty());
    }

    #[test]
    fn children_named_preserves_document_order() {
        let input = r#"<pdml><packet>
            <proto name="tls">
              <field name="x" value="1"/>
              <field name="y" value="2"/>
              <field name="x" value="3"/>
            </proto>
        </packet></pdml>"#;
        let root = parse_pdml(input).unwrap();
        let proto = root.child("packet").and_then(|p| p.child("tls")).unwrap();
        let values: Vec<_> = proto
            .children_named("x")
            .filter_map(|c| c.value.as_deref())
            .collect();
        assert_eq!(values, vec!["1", "3"]);
    }
}
