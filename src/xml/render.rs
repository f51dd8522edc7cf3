//! Pretty-printing an [`Element`] tree with tab indentation.

use quick_xml::escape::{escape, partial_escape};

use super::{Element, Node};

const DECLARATION: &str = "<?xml version=\"1.0\" ?>\n";

/// Render a full document: XML declaration followed by the root element.
pub fn render_document(root: &Element) -> String {
    let mut out = String::from(DECLARATION);
    write_element(&mut out, root, 0);
    collapse_blank_lines(&out)
}

/// Render a single element without a declaration.
pub fn render_element(element: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, element, 0);
    collapse_blank_lines(&out)
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    indent(out, depth);
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }

    match element.children.as_slice() {
        [] => out.push_str("/>\n"),
        [Node::Text(text)] => {
            out.push('>');
            out.push_str(&partial_escape(text.as_str()));
            close_tag(out, element);
        }
        children => {
            out.push_str(">\n");
            for child in children {
                match child {
                    Node::Element(el) => write_element(out, el, depth + 1),
                    // Indentation whitespace from the source document.
                    Node::Text(text) if text.trim().is_empty() => {}
                    Node::Text(text) => {
                        indent(out, depth + 1);
                        out.push_str(&partial_escape(text.as_str()));
                        out.push('\n');
                    }
                }
            }
            indent(out, depth);
            close_tag(out, element);
        }
    }
}

fn close_tag(out: &mut String, element: &Element) {
    out.push_str("</");
    out.push_str(&element.name);
    out.push_str(">\n");
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

/// Remove indentation-only blank lines.
///
/// Every run of a newline, optional tabs, a second newline and optional
/// tabs is deleted outright, which is what keeps empty containers from
/// leaving gaps in the output.
pub fn collapse_blank_lines(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied_to = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\n' {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < bytes.len() && bytes[j] == b'\t' {
            j += 1;
        }
        if j < bytes.len() && bytes[j] == b'\n' {
            j += 1;
            while j < bytes.len() && bytes[j] == b'\t' {
                j += 1;
            }
            out.push_str(&text[copied_to..i]);
            copied_to = j;
            i = j;
        } else {
            i += 1;
        }
    }

    out.push_str(&text[copied_to..]);
    out
}
