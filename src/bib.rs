use std::collections::BTreeMap;

use regex::Regex;

/// One bibliography entry as it appears in the source markup: the entry-type
/// tag, the citation key, and the cleaned field map (names lowercased, values
/// stripped of one brace/quote layer with whitespace runs collapsed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub entry_type: String,
    pub key: String,
    pub fields: BTreeMap<String, String>,
}

pub fn parse_entries(text: &str) -> Vec<RawEntry> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let marker = Regex::new(r"@\w+\s*\{").unwrap();
    let starts: Vec<usize> = marker.find_iter(&text).map(|m| m.start()).collect();

    let mut entries = Vec::new();
    for (idx, &start) in starts.iter().enumerate() {
        let end = starts.get(idx + 1).copied().unwrap_or(text.len());
        if let Some(entry) = parse_chunk(text[start..end].trim()) {
            entries.push(entry);
        }
    }
    entries
}

fn parse_chunk(chunk: &str) -> Option<RawEntry> {
    let header = Regex::new(r"^@(\w+)\s*\{\s*([^,]+)\s*,").unwrap();
    let captures = header.captures(chunk)?;

    let entry_type = captures[1].to_lowercase();
    let key = captures[2].trim().to_string();

    // The field body runs up to the entry's final closing brace.
    let rest = &chunk[captures.get(0)?.end()..];
    let body = match rest.rfind('}') {
        Some(pos) => &rest[..pos],
        None => rest,
    };

    Some(RawEntry {
        entry_type,
        key,
        fields: parse_fields(body),
    })
}

fn parse_fields(body: &str) -> BTreeMap<String, String> {
    // value is {...} (one nested brace level tolerated), "..." or bare up to
    // the next comma/closing brace
    let field =
        Regex::new(r#"\b([A-Za-z0-9_+-]+)\s*=\s*(\{(?:[^{}]|\{[^{}]*\})*\}|"[^"]*"|[^,}]+)\s*,?"#)
            .unwrap();
    let whitespace = Regex::new(r"\s+").unwrap();

    let mut fields = BTreeMap::new();
    for captures in field.captures_iter(body) {
        let name = captures[1].to_lowercase();
        let mut value = captures[2].trim();
        if value.starts_with('{') && value.ends_with('}') {
            value = &value[1..value.len() - 1];
        } else if value.starts_with('"') && value.ends_with('"') {
            value = &value[1..value.len() - 1];
        }
        let value = whitespace.replace_all(value, " ").trim().to_string();
        fields.insert(name, value);
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_entry() {
        let entries = parse_entries(
            "@article{doe2020,\n  title = {A Study},\n  author = {Doe, Jane},\n  year = {2020}\n}\n",
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry_type, "article");
        assert_eq!(entries[0].key, "doe2020");
        assert_eq!(entries[0].fields["title"], "A Study");
        assert_eq!(entries[0].fields["author"], "Doe, Jane");
        assert_eq!(entries[0].fields["year"], "2020");
    }

    #[test]
    fn entry_type_and_field_names_lowercased() {
        let entries = parse_entries("@InProceedings{k1, Title = {T}, YEAR = {2021}}");
        assert_eq!(entries[0].entry_type, "inproceedings");
        assert_eq!(entries[0].fields["title"], "T");
        assert_eq!(entries[0].fields["year"], "2021");
    }

    #[test]
    fn quoted_and_bare_values() {
        let entries = parse_entries("@misc{k1, title = \"Quoted Title\", year = 2019}");
        assert_eq!(entries[0].fields["title"], "Quoted Title");
        assert_eq!(entries[0].fields["year"], "2019");
    }

    #[test]
    fn nested_braces_protected() {
        let entries = parse_entries("@article{k1, title = {The {BIG} Result}, year = {2020}}");
        assert_eq!(entries[0].fields["title"], "The {BIG} Result");
    }

    #[test]
    fn whitespace_runs_collapsed() {
        let entries = parse_entries("@article{k1, title = {A\n  Multi   Line\tTitle}}");
        assert_eq!(entries[0].fields["title"], "A Multi Line Title");
    }

    #[test]
    fn crlf_normalized() {
        let entries = parse_entries("@article{k1,\r\n title = {T}\r\n}\r\n@misc{k2, title = {U}}");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].key, "k2");
    }

    #[test]
    fn malformed_header_skipped() {
        let entries =
            parse_entries("@article{no-comma-or-fields\n@article{ok, title = {Fine}, year = {2020}}");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "ok");
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse_entries("").is_empty());
        assert!(parse_entries("no markup here at all").is_empty());
    }
}
