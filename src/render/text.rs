//! Doc comment prose to markdown.

use crate::links::LinkResolver;
use crate::markdown::inline_code;
use crate::model::{DocText, Inline};

/// Render a section as markdown paragraphs, code blocks fenced.
///
/// Paragraphs and code blocks are joined by one blank line; code keeps its
/// own blank lines.
pub fn render(resolver: &LinkResolver, from_file: &str, text: &DocText) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut paragraph = String::new();
    for inline in &text.0 {
        match inline {
            Inline::Break => end_paragraph(&mut paragraph, &mut blocks),
            Inline::CodeBlock(code) => {
                end_paragraph(&mut paragraph, &mut blocks);
                blocks.push(format!("```csharp\n{}\n```", code));
            }
            other => paragraph.push_str(&render_inline(resolver, from_file, other)),
        }
    }
    end_paragraph(&mut paragraph, &mut blocks);
    blocks.join("\n\n")
}

fn end_paragraph(paragraph: &mut String, blocks: &mut Vec<String>) {
    let trimmed = paragraph.trim();
    if !trimmed.is_empty() {
        blocks.push(trimmed.to_string());
    }
    paragraph.clear();
}

/// First paragraph only, for a table cell. The table escapes the cell.
pub fn render_cell(resolver: &LinkResolver, from_file: &str, text: &DocText) -> String {
    text.0
        .iter()
        .take_while(|inline| !matches!(inline, Inline::Break | Inline::CodeBlock(_)))
        .map(|inline| render_inline(resolver, from_file, inline))
        .collect::<String>()
        .trim()
        .to_string()
}

fn render_inline(resolver: &LinkResolver, from_file: &str, inline: &Inline) -> String {
    match inline {
        Inline::Text(text) => escape_prose(text),
        Inline::Code(code) => inline_code(code),
        Inline::Cref(cref) => resolver.cref(from_file, cref),
        Inline::Href { url, text } => format!("[{}]({})", escape_prose(text), url),
        Inline::Break => " ".to_string(),
        Inline::CodeBlock(code) => inline_code(code),
    }
}

/// Prose keeps its markdown, only angle brackets are escaped.
fn escape_prose(text: &str) -> String {
    text.replace('<', "\\<").replace('>', "\\>")
}
