//! Loading XML documents into an [`Element`] tree.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{FgError, Result};

use super::{Element, Node};

/// Read and parse an XML file.
///
/// Fantasy Grounds writes `db.xml` as ISO-8859-1, so bytes that are not
/// valid UTF-8 are decoded as Latin-1.
pub fn read_file(path: &Path) -> Result<Element> {
    let bytes = fs::read(path).map_err(|e| FgError::io(path, format!("Failed to read file: {}", e)))?;

    let source = String::from_utf8(bytes)
        .unwrap_or_else(|e| e.into_bytes().iter().map(|&b| b as char).collect());

    parse(&source).map_err(|e| match e {
        FgError::Xml { message, help } => FgError::Xml {
            message: format!("{}: {}", path.display(), message),
            help,
        },
        other => other,
    })
}

/// Parse an XML document and return its root element.
pub fn parse(source: &str) -> Result<Element> {
    let mut reader = Reader::from_str(source);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(xml_error(format!(
                    "Malformed XML at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        };

        match event {
            Event::Start(start) => stack.push(element_from_start(&start)?),
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let mut element = stack
                    .pop()
                    .ok_or_else(|| xml_error("Closing tag without an opening tag"))?;
                strip_indentation(&mut element);
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| xml_error(format!("Invalid text content: {}", e)))?;
                push_text(&mut stack, &text);
            }
            Event::CData(data) => {
                let data = data.into_inner();
                push_text(&mut stack, &String::from_utf8_lossy(&data));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(xml_error(format!("Unclosed element <{}>", open.name)));
    }

    root.ok_or_else(|| xml_error("Document has no root element"))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| xml_error(format!("Invalid element name: {}", e)))?
        .to_string();

    let mut element = Element::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| xml_error(format!("Invalid attribute: {}", e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| xml_error(format!("Invalid attribute name: {}", e)))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| xml_error(format!("Invalid attribute value: {}", e)))?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.push(element);
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(xml_error("Document has more than one root element"))
    }
}

/// Text outside the root element is ignored; adjacent text is merged.
fn push_text(stack: &mut [Element], text: &str) {
    let Some(parent) = stack.last_mut() else {
        return;
    };

    if let Some(Node::Text(existing)) = parent.children.last_mut() {
        existing.push_str(text);
    } else {
        parent.children.push(Node::Text(text.to_string()));
    }
}

/// Drop whitespace-only text between child elements.
fn strip_indentation(element: &mut Element) {
    if element.has_elements() {
        element
            .children
            .retain(|child| !matches!(child, Node::Text(text) if text.trim().is_empty()));
    }
}

fn xml_error(message: impl Into<String>) -> FgError {
    FgError::Xml {
        message: message.into(),
        help: None,
    }
}
