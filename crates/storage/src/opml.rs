use std::collections::HashSet;

use log::debug;
use logbook_domain::{self as domain, Field, Group, Node, Outline};

use crate::{Error, xml};

/// Reads an OPML 2.0 outline export.
pub fn read_outline(input: &str) -> Result<Outline, Error> {
    let root = xml::parse(input)?;
    if root.name != "opml" {
        return Err(unsupported(format!("root element is \"{}\"", root.name)));
    }
    let version = root
        .attribute("version")
        .ok_or_else(|| unsupported("missing OPML version"))?;
    if version.split('.').next() != Some("2") {
        return Err(unsupported(format!("OPML version {version}")));
    }

    let title = root
        .child("head")
        .and_then(|head| head.child("title"))
        .and_then(xml::Element::text)
        .map(str::trim)
        .ok_or_else(|| unsupported("missing title"))?;
    let body = root
        .child("body")
        .ok_or_else(|| unsupported("missing body"))?;

    let nodes = entries(body)?
        .into_iter()
        .map(|(label, children)| node(label, children))
        .collect::<Result<Vec<_>, _>>()?;
    debug!("read outline \"{title}\" with {} nodes", nodes.len());

    Ok(Outline {
        title: title.to_string(),
        nodes,
    })
}

fn node(label: &str, children: &[xml::Element]) -> Result<Node, Error> {
    if children.is_empty() {
        return Err(malformed(format!("outline \"{label}\" has no lines")));
    }
    if children.iter().all(|child| child.children.is_empty()) {
        return Ok(Node::Field(field(label, children)?));
    }
    if !children.iter().all(|child| !child.children.is_empty()) {
        return Err(malformed(format!(
            "outline \"{label}\" mixes lines and nested outlines"
        )));
    }

    let fields = entries_of(label, children)?
        .into_iter()
        .map(|(field_label, lines)| {
            if lines.iter().any(|line| !line.children.is_empty()) {
                return Err(malformed(format!(
                    "outline \"{label}\" is nested too deeply"
                )));
            }
            field(field_label, lines)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Node::Group(Group::new(label, fields)))
}

fn field(label: &str, lines: &[xml::Element]) -> Result<Field, Error> {
    Ok(Field {
        label: label.to_string(),
        lines: lines
            .iter()
            .map(|line| text(line).map(ToString::to_string))
            .collect::<Result<Vec<_>, _>>()?,
    })
}

fn entries(parent: &xml::Element) -> Result<Vec<(&str, &[xml::Element])>, Error> {
    entries_of("body", &parent.children)
}

/// Labels of one outline level with their children, checking uniqueness.
fn entries_of<'a>(
    parent: &str,
    elements: &'a [xml::Element],
) -> Result<Vec<(&'a str, &'a [xml::Element])>, Error> {
    let mut seen = HashSet::new();
    elements
        .iter()
        .map(|element| {
            let label = text(element)?.trim();
            if label.is_empty() {
                return Err(malformed(format!("empty label in \"{parent}\"")));
            }
            if !seen.insert(label) {
                return Err(malformed(format!(
                    "label \"{label}\" appears more than once in \"{parent}\""
                )));
            }
            Ok((label, element.children.as_slice()))
        })
        .collect()
}

fn text(element: &xml::Element) -> Result<&str, Error> {
    if element.name != "outline" {
        return Err(malformed(format!("unexpected element \"{}\"", element.name)));
    }
    element
        .attribute("text")
        .ok_or_else(|| malformed("outline without text attribute"))
}

fn unsupported(message: impl Into<String>) -> Error {
    Error::Domain(domain::Error::UnsupportedFormat(message.into()))
}

fn malformed(message: impl Into<String>) -> Error {
    Error::Domain(domain::Error::malformed(message))
}
