use std::cmp;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::bib;
use crate::error::PubsiteError;
use crate::output;
use crate::publication::Publication;
use crate::scholar::{self, ScholarClient};

#[derive(Debug, Clone, Serialize)]
pub struct ConvertResult {
    pub output: String,
    pub records: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    pub output: String,
    pub action: String,
    pub years: usize,
}

/// Parses the bibliography at `input` and writes the publications data file
/// to `output_path`, newest first. A missing input file is fatal; malformed
/// individual entries are skipped.
pub fn convert_bibliography(
    input: &Path,
    output_path: &Path,
) -> Result<ConvertResult, PubsiteError> {
    if !input.exists() {
        return Err(PubsiteError::InputMissing(input.to_path_buf()));
    }
    let raw = fs::read(input)
        .map_err(|err| PubsiteError::Filesystem(format!("read {}: {err}", input.display())))?;
    let text = String::from_utf8_lossy(&raw);

    let mut publications: Vec<Publication> = bib::parse_entries(&text)
        .iter()
        .filter_map(Publication::from_entry)
        .collect();
    // stable sort: equal years keep source order
    publications.sort_by_key(|publication| cmp::Reverse(publication.year));

    write_artifact(output_path, &output::render_publications(&publications))?;

    Ok(ConvertResult {
        output: output_path.display().to_string(),
        records: publications.len(),
    })
}

/// Refreshes the citations data file from the researcher's profile page. A
/// successful scrape overwrites the artifact; any fetch or parse failure
/// leaves an existing artifact untouched, and writes an empty placeholder
/// when there is none yet. Only local write failures surface as errors.
pub fn refresh_citations<C: ScholarClient>(
    client: &C,
    user: &str,
    out_path: &Path,
) -> Result<FetchResult, PubsiteError> {
    tracing::info!("fetching Scholar profile counts for user={user}");
    let fetched = client
        .fetch_profile(user)
        .and_then(|html| scholar::parse_citation_years(&html));

    match fetched {
        Ok(records) => {
            write_artifact(out_path, &output::render_citations(&records))?;
            tracing::info!("wrote {} ({} years)", out_path.display(), records.len());
            Ok(FetchResult {
                output: out_path.display().to_string(),
                action: "updated".to_string(),
                years: records.len(),
            })
        }
        Err(err) => {
            tracing::warn!("could not update citations from Scholar: {err}");
            if out_path.exists() {
                Ok(FetchResult {
                    output: out_path.display().to_string(),
                    action: "kept-existing".to_string(),
                    years: 0,
                })
            } else {
                write_artifact(out_path, &output::render_citations(&[]))?;
                Ok(FetchResult {
                    output: out_path.display().to_string(),
                    action: "wrote-placeholder".to_string(),
                    years: 0,
                })
            }
        }
    }
}

fn write_artifact(path: &Path, contents: &str) -> Result<(), PubsiteError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)
        .map_err(|err| PubsiteError::Filesystem(format!("create {}: {err}", dir.display())))?;

    let mut tmp = NamedTempFile::new_in(&dir)
        .map_err(|err| PubsiteError::Filesystem(err.to_string()))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|err| PubsiteError::Filesystem(err.to_string()))?;
    tmp.persist(path)
        .map_err(|err| PubsiteError::Filesystem(err.to_string()))?;
    Ok(())
}
