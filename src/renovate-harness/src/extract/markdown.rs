//! Markdown table reading.
//!
//! This is the only place that knows how pull request bodies are laid out.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Plain-text cells of one markdown table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Returns the first table in `markdown`, with links, emphasis and inline
/// code reduced to their text.
#[must_use]
pub fn first_table(markdown: &str) -> Option<MarkdownTable> {
    let mut table: Option<MarkdownTable> = None;
    let mut row = Vec::new();
    let mut cell: Option<String> = None;

    for event in Parser::new_ext(markdown, Options::ENABLE_TABLES) {
        match event {
            Event::Start(Tag::Table(_)) => table = Some(MarkdownTable::default()),
            Event::End(TagEnd::Table) => return table,
            Event::Start(Tag::TableHead | Tag::TableRow) => row.clear(),
            Event::Start(Tag::TableCell) => cell = Some(String::new()),
            Event::End(TagEnd::TableCell) => {
                if let Some(text) = cell.take() {
                    row.push(collapse_whitespace(&text));
                }
            }
            Event::End(TagEnd::TableHead) => {
                if let Some(table) = table.as_mut() {
                    table.header = std::mem::take(&mut row);
                }
            }
            Event::End(TagEnd::TableRow) => {
                if let Some(table) = table.as_mut() {
                    table.rows.push(std::mem::take(&mut row));
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(cell) = cell.as_mut() {
                    cell.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(cell) = cell.as_mut() {
                    cell.push(' ');
                }
            }
            _ => {}
        }
    }

    None
}

/// Removes a trailing link annotation such as `(source)` or
/// `( source, changelog )` from a package cell.
#[must_use]
pub fn strip_source_marker(cell: &str) -> String {
    let trimmed = cell.trim();

    if let Some((name, _)) = trimmed
        .strip_suffix(')')
        .and_then(|rest| rest.rsplit_once('('))
        .filter(|(_, inner)| {
            inner
                .split(',')
                .all(|part| matches!(part.trim(), "source" | "changelog"))
        })
    {
        return name.trim_end().to_string();
    }

    trimmed.to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
