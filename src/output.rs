use std::io::{self, Write};

use serde::Serialize;

use crate::app::{ConvertResult, FetchResult};
use crate::publication::Publication;
use crate::scholar::CitationYear;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Human,
    Json,
}

/// Renders publications as a YAML sequence using block scalars: the free-text
/// fields go out as literal blocks so embedded colons, quotes and backslashes
/// never need escaping. Byte layout: list marker at column 0, sibling keys
/// indented 2 spaces, block content indented 4.
pub fn render_publications(items: &[Publication]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for item in items {
        lines.push("- title: |".to_string());
        push_block_body(&mut lines, &item.title);
        push_block(&mut lines, "authors", &item.authors);
        push_block(&mut lines, "venue", &item.venue);
        lines.push(format!("  year: {}", item.year));
        lines.push(format!("  type: {}", item.kind));
        push_quoted(&mut lines, "pdf", item.pdf.as_deref());
        push_quoted(&mut lines, "doi", item.doi.as_deref());
        push_quoted(&mut lines, "code", item.code.as_deref());
        lines.push(String::new());
    }
    format!("{}\n", lines.join("\n").trim_end())
}

/// Renders citation-year pairs as a plain YAML sequence; the empty sequence
/// renders in flow style.
pub fn render_citations(items: &[CitationYear]) -> String {
    if items.is_empty() {
        return "[]\n".to_string();
    }
    let mut out = String::new();
    for item in items {
        out.push_str(&format!("- year: {}\n  count: {}\n", item.year, item.count));
    }
    out
}

fn push_block(lines: &mut Vec<String>, key: &str, text: &str) {
    lines.push(format!("  {key}: |"));
    push_block_body(lines, text);
}

// An empty block value still needs one content line to stay a valid scalar.
fn push_block_body(lines: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        lines.push("    ".to_string());
    } else {
        for line in text.split('\n') {
            lines.push(format!("    {line}"));
        }
    }
}

fn push_quoted(lines: &mut Vec<String>, key: &str, value: Option<&str>) {
    let value = value.unwrap_or("").replace('"', "\\\"");
    lines.push(format!("  {key}: \"{value}\""));
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_convert(result: &ConvertResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_fetch(result: &FetchResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}
