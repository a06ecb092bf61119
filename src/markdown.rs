//! Append-only markdown document model.
//!
//! Blocks are serialized in append order, separated by one blank line.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Header { level: u8, text: String },
    Paragraph(String),
    Table { header: Vec<String>, rows: Vec<Vec<String>> },
    Code { language: Option<String>, code: String },
    List { ordered: bool, items: Vec<String> },
    Rule,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownDocument {
    blocks: Vec<Block>,
}

impl MarkdownDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header levels outside `1..=6` are clamped.
    pub fn header(&mut self, text: impl Into<String>, level: u8) -> &mut Self {
        self.blocks.push(Block::Header {
            level: level.clamp(1, 6),
            text: text.into(),
        });
        self
    }

    pub fn paragraph(&mut self, text: impl Into<String>) -> &mut Self {
        self.blocks.push(Block::Paragraph(text.into()));
        self
    }

    pub fn table(&mut self, header: Vec<String>, rows: Vec<Vec<String>>) -> &mut Self {
        self.blocks.push(Block::Table { header, rows });
        self
    }

    pub fn code(&mut self, code: impl Into<String>, language: Option<&str>) -> &mut Self {
        self.blocks.push(Block::Code {
            language: language.map(str::to_string),
            code: code.into(),
        });
        self
    }

    pub fn list(&mut self, items: Vec<String>, ordered: bool) -> &mut Self {
        self.blocks.push(Block::List { ordered, items });
        self
    }

    pub fn rule(&mut self) -> &mut Self {
        self.blocks.push(Block::Rule);
        self
    }
}

impl fmt::Display for MarkdownDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.blocks.iter().map(render_block).collect();
        if rendered.is_empty() {
            return Ok(());
        }
        writeln!(f, "{}", rendered.join("\n\n"))
    }
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Header { level, text } => {
            format!("{} {}", "#".repeat(usize::from(*level)), text)
        }
        Block::Paragraph(text) => text.clone(),
        Block::Table { header, rows } => {
            let mut lines = Vec::with_capacity(rows.len() + 2);
            lines.push(table_row(header));
            lines.push(table_row(&vec!["---".to_string(); header.len()]));
            for row in rows {
                lines.push(table_row(row));
            }
            lines.join("\n")
        }
        Block::Code { language, code } => {
            let fence = fence_for(code);
            format!(
                "{}{}\n{}\n{}",
                fence,
                language.as_deref().unwrap_or(""),
                code.trim_end_matches('\n'),
                fence
            )
        }
        Block::List { ordered, items } => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let indented = item.replace('\n', "\n  ");
                if *ordered {
                    format!("{}. {}", i + 1, indented)
                } else {
                    format!("* {}", indented)
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Block::Rule => "---".to_string(),
    }
}

fn table_row(cells: &[String]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
    format!("| {} |", cells.join(" | "))
}

/// A fence longer than any backtick run inside the code.
fn fence_for(code: &str) -> String {
    let longest = code
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

/// Keep a table cell on one line without breaking the column layout.
pub fn escape_cell(text: &str) -> String {
    text.trim()
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

/// Escape characters that markdown would read as HTML or link syntax.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '<' | '>' | '[' | ']' | '*' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Inline code span, widening the delimiter when the text contains backticks.
pub fn inline_code(text: &str) -> String {
    if text.contains('`') {
        format!("`` {} ``", text)
    } else {
        format!("`{}`", text)
    }
}
