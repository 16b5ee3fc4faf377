use std::collections::BTreeMap;

use regex::Regex;

use crate::bib::RawEntry;

const DOI_RESOLVER: &str = "https://doi.org/";

/// One publication as it appears in the generated data file. Links that the
/// source entry does not provide stay `None` rather than empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub title: String,
    pub authors: String,
    pub venue: String,
    pub year: i32,
    pub kind: String,
    pub pdf: Option<String>,
    pub doi: Option<String>,
    pub code: Option<String>,
}

impl Publication {
    /// Builds a record from a parsed entry. Entries without a title are not
    /// publications and yield `None`.
    pub fn from_entry(entry: &RawEntry) -> Option<Publication> {
        let title = entry.fields.get("title").map(|t| t.trim()).unwrap_or("");
        if title.is_empty() {
            return None;
        }

        let authors = entry
            .fields
            .get("author")
            .map(|raw| normalize_authors(raw))
            .unwrap_or_default();

        let venue = ["journal", "booktitle", "publisher", "series"]
            .iter()
            .filter_map(|name| entry.fields.get(*name))
            .find(|value| !value.is_empty())
            .cloned()
            .unwrap_or_default();

        let year = entry
            .fields
            .get("year")
            .map(|raw| extract_year(raw))
            .unwrap_or(0);

        let links = derive_links(&entry.fields);

        Some(Publication {
            title: title.to_string(),
            authors,
            venue,
            year,
            kind: entry.entry_type.clone(),
            pdf: links.pdf,
            doi: links.doi,
            code: links.code,
        })
    }
}

/// "Last, First and Last, First" becomes "First Last, First Last". Names
/// without a comma pass through unchanged.
fn normalize_authors(raw: &str) -> String {
    let separator = Regex::new(r"\s+and\s+").unwrap();
    separator
        .split(raw)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| match name.split_once(',') {
            Some((last, first)) => {
                let (last, first) = (last.trim(), first.trim());
                if first.is_empty() {
                    last.to_string()
                } else {
                    format!("{first} {last}")
                }
            }
            None => name.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// First 4-digit run anywhere in the field, 0 when there is none.
fn extract_year(raw: &str) -> i32 {
    Regex::new(r"\d{4}")
        .unwrap()
        .find(raw)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

struct Links {
    pdf: Option<String>,
    doi: Option<String>,
    code: Option<String>,
}

// Rule order matters: an explicit pdf field must override a pdf derived from
// url or eprint.
fn derive_links(fields: &BTreeMap<String, String>) -> Links {
    let arxiv_id = Regex::new(r"\d{4}\.\d{4,5}").unwrap();

    let mut links = Links {
        pdf: None,
        doi: None,
        code: None,
    };

    if let Some(doi) = non_empty(fields, "doi") {
        links.doi = Some(if doi.starts_with("http") {
            doi.to_string()
        } else {
            format!("{DOI_RESOLVER}{doi}")
        });
    }

    if let Some(url) = non_empty(fields, "url")
        && url.to_lowercase().ends_with(".pdf")
    {
        links.pdf = Some(url.to_string());
    }

    if let Some(eprint) = non_empty(fields, "eprint")
        && (arxiv_id.is_match(eprint) || eprint.to_lowercase().contains("arxiv"))
    {
        links.pdf = Some(if eprint.starts_with("http") {
            eprint.to_string()
        } else {
            format!("https://arxiv.org/pdf/{eprint}.pdf")
        });
    }

    if let Some(pdf) = non_empty(fields, "pdf") {
        links.pdf = Some(pdf.to_string());
    }

    if let Some(code) = non_empty(fields, "code") {
        links.code = Some(code.to_string());
    }

    links
}

fn non_empty<'a>(fields: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    fields
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}
