//! XML documentation file parser.
//!
//! Reads the compiler-emitted `<doc><members><member name="..">` file into
//! [`DocComment`] values keyed by canonical identifier.

use crate::docs::DocCommentSource;
use crate::error::{LoadError, XmlDocError};
use crate::model::{DocComment, DocText, Inline};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::Regex;
use std::collections::HashMap;
use std::io::{self, BufRead};
use std::path::Path;
use std::sync::LazyLock;

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Doc comments of one library, loaded once per run.
#[derive(Debug, Default)]
pub struct XmlDocumentation {
    members: HashMap<String, DocComment>,
}

impl XmlDocumentation {
    /// Load the documentation file; a missing file documents nothing.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let xml = match std::fs::read_to_string(path) {
            Ok(xml) => xml,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no documentation file");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(LoadError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&xml).map_err(|source| LoadError::Documentation {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(xml: &str) -> Result<Self, XmlDocError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);
        let root = parse_children(&mut reader, 0)?;

        let mut members = HashMap::new();
        collect_members(&root, &mut members);
        Ok(Self { members })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl DocCommentSource for XmlDocumentation {
    fn lookup(&self, id: &str) -> Option<&DocComment> {
        self.members.get(id)
    }
}

#[derive(Debug, Default)]
struct Element {
    tag: String,
    attrs: HashMap<String, String>,
    children: Vec<Node>,
}

#[derive(Debug)]
enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => out.push_str(&e.text()),
            }
        }
        out
    }
}

/// Read nodes until the enclosing element ends. `depth` is the number of
/// open elements; the file may only end at depth 0.
fn parse_children<R: BufRead>(
    reader: &mut Reader<R>,
    depth: usize,
) -> Result<Vec<Node>, XmlDocError> {
    let mut buf = Vec::new();
    let mut nodes = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let mut element = start_element(reader, &e);
                element.children = parse_children(reader, depth + 1)?;
                nodes.push(Node::Element(element));
            }
            Event::Empty(e) => {
                nodes.push(Node::Element(start_element(reader, &e)));
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?.into_owned();
                push_text(&mut nodes, &text);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?.into_owned();
                push_text(&mut nodes, &decode_entity(&entity));
            }
            Event::CData(e) => {
                push_text(&mut nodes, &String::from_utf8_lossy(&e));
            }
            Event::Eof if depth > 0 => return Err(XmlDocError::Truncated),
            Event::End(_) | Event::Eof => return Ok(nodes),
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }
}

fn start_element<R: BufRead>(reader: &Reader<R>, e: &BytesStart) -> Element {
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attrs = HashMap::new();
    for attr in e.attributes().flatten() {
        let key = reader.decoder().decode(attr.key.as_ref()).map_or_else(
            |_| String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            std::borrow::Cow::into_owned,
        );
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            std::borrow::Cow::into_owned,
        );
        attrs.insert(key, value);
    }
    Element {
        tag,
        attrs,
        children: Vec::new(),
    }
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if let Some(Node::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_string()));
    }
}

fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_string(),
        "gt" => ">".to_string(),
        "amp" => "&".to_string(),
        "apos" => "'".to_string(),
        "quot" => "\"".to_string(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}

fn collect_members(nodes: &[Node], members: &mut HashMap<String, DocComment>) {
    for node in nodes {
        let Node::Element(element) = node else {
            continue;
        };
        if element.tag == "member" {
            if let Some(name) = element.attr("name") {
                members.insert(name.to_string(), doc_comment(element));
            }
        } else {
            collect_members(&element.children, members);
        }
    }
}

fn doc_comment(member: &Element) -> DocComment {
    let mut doc = DocComment::default();
    for node in &member.children {
        let Node::Element(section) = node else {
            continue;
        };
        let text = doc_text(&section.children);
        match section.tag.as_str() {
            "summary" => doc.summary = text,
            "remarks" => doc.remarks = text,
            "returns" => doc.returns = text,
            "value" => doc.value = text,
            "example" => doc.example = text,
            "param" => {
                if let Some(name) = section.attr("name") {
                    doc.params.push((name.to_string(), text));
                }
            }
            "typeparam" => {
                if let Some(name) = section.attr("name") {
                    doc.type_params.push((name.to_string(), text));
                }
            }
            "exception" => {
                if let Some(cref) = section.attr("cref") {
                    doc.exceptions.push((cref.to_string(), text));
                }
            }
            _ => {}
        }
    }
    doc
}

fn doc_text(nodes: &[Node]) -> DocText {
    let mut inlines = Vec::new();
    flatten(nodes, &mut inlines);
    normalize(inlines)
}

fn flatten(nodes: &[Node], out: &mut Vec<Inline>) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push(Inline::Text(t.clone())),
            Node::Element(e) => match e.tag.as_str() {
                "c" => out.push(Inline::Code(e.text().trim().to_string())),
                "code" => out.push(Inline::CodeBlock(unindent(&e.text()))),
                "para" => {
                    out.push(Inline::Break);
                    flatten(&e.children, out);
                    out.push(Inline::Break);
                }
                "br" => out.push(Inline::Break),
                "see" | "seealso" => {
                    if let Some(cref) = e.attr("cref") {
                        out.push(Inline::Cref(cref.to_string()));
                    } else if let Some(url) = e.attr("href") {
                        let text = e.text().trim().to_string();
                        out.push(Inline::Href {
                            url: url.to_string(),
                            text: if text.is_empty() { url.to_string() } else { text },
                        });
                    } else if let Some(word) = e.attr("langword") {
                        out.push(Inline::Code(word.to_string()));
                    }
                }
                "paramref" | "typeparamref" => {
                    if let Some(name) = e.attr("name") {
                        out.push(Inline::Code(name.to_string()));
                    }
                }
                _ => flatten(&e.children, out),
            },
        }
    }
}

/// Collapse whitespace, merge text runs and trim around paragraph boundaries.
fn normalize(inlines: Vec<Inline>) -> DocText {
    let mut merged: Vec<Inline> = Vec::new();
    for inline in inlines {
        match (merged.last_mut(), inline) {
            (Some(Inline::Text(last)), Inline::Text(t)) => last.push_str(&t),
            (_, inline) => merged.push(inline),
        }
    }

    let mut out: Vec<Inline> = Vec::new();
    let len = merged.len();
    for (i, inline) in merged.into_iter().enumerate() {
        match inline {
            Inline::Text(t) => {
                let mut text = RE_WHITESPACE.replace_all(&t, " ").into_owned();
                let at_start = matches!(
                    out.last(),
                    None | Some(Inline::Break) | Some(Inline::CodeBlock(_))
                );
                if at_start {
                    text = text.trim_start().to_string();
                }
                if i + 1 == len {
                    text = text.trim_end().to_string();
                }
                if !text.is_empty() {
                    out.push(Inline::Text(text));
                }
            }
            Inline::Break | Inline::CodeBlock(_) => {
                if let Some(Inline::Text(last)) = out.last_mut() {
                    let trimmed = last.trim_end().to_string();
                    *last = trimmed;
                    if last.is_empty() {
                        out.pop();
                    }
                }
                if inline == Inline::Break
                    && matches!(out.last(), None | Some(Inline::Break))
                {
                    continue;
                }
                out.push(inline);
            }
            other => out.push(other),
        }
    }
    while matches!(out.last(), Some(Inline::Break)) {
        out.pop();
    }
    DocText(out)
}

/// Remove common leading indentation and surrounding blank lines.
fn unindent(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let Some(start) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return String::new();
    };
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(lines.len(), |i| i + 1);

    let min_indent = lines[start..end]
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    lines[start..end]
        .iter()
        .map(|l| l.get(min_indent..).unwrap_or("").trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}
