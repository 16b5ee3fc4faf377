use pubsite::bib::parse_entries;
use pubsite::publication::Publication;

fn single(markup: &str) -> Publication {
    let entries = parse_entries(markup);
    assert_eq!(entries.len(), 1);
    Publication::from_entry(&entries[0]).unwrap()
}

#[test]
fn full_entry_end_to_end() {
    let publication = single(
        "@article{doe2023,\n\
           author = {Doe, Jane and Smith, John},\n\
           title = {Widgets at Scale: Lessons Learned},\n\
           journal = {Journal of Widget Research},\n\
           year = {2023},\n\
           doi = {10.1000/widgets.2023},\n\
           eprint = {2301.12345},\n\
           code = {https://github.com/doe/widgets}\n\
         }",
    );
    assert_eq!(publication.title, "Widgets at Scale: Lessons Learned");
    assert_eq!(publication.authors, "Jane Doe, John Smith");
    assert_eq!(publication.venue, "Journal of Widget Research");
    assert_eq!(publication.year, 2023);
    assert_eq!(publication.kind, "article");
    assert_eq!(
        publication.doi.as_deref(),
        Some("https://doi.org/10.1000/widgets.2023")
    );
    assert_eq!(
        publication.pdf.as_deref(),
        Some("https://arxiv.org/pdf/2301.12345.pdf")
    );
    assert_eq!(
        publication.code.as_deref(),
        Some("https://github.com/doe/widgets")
    );
}

#[test]
fn venue_falls_back_to_series() {
    let publication = single("@misc{k, title = {T}, series = {LNCS}}");
    assert_eq!(publication.venue, "LNCS");
}

#[test]
fn missing_venue_fields_leave_venue_empty() {
    let publication = single("@misc{k, title = {T}, year = {2020}}");
    assert_eq!(publication.venue, "");
}

#[test]
fn http_eprint_kept_verbatim() {
    let publication = single(
        "@misc{k, title = {T}, eprint = {https://arxiv.org/abs/2301.12345}}",
    );
    assert_eq!(
        publication.pdf.as_deref(),
        Some("https://arxiv.org/abs/2301.12345")
    );
}

#[test]
fn arxiv_substring_triggers_derivation() {
    let publication = single("@misc{k, title = {T}, eprint = {arXiv:hep-th/9901001}}");
    assert_eq!(
        publication.pdf.as_deref(),
        Some("https://arxiv.org/pdf/arXiv:hep-th/9901001.pdf")
    );
}

#[test]
fn non_arxiv_eprint_ignored() {
    let publication = single("@misc{k, title = {T}, eprint = {hal-0123}}");
    assert_eq!(publication.pdf, None);
}

#[test]
fn non_pdf_url_ignored() {
    let publication = single(
        "@misc{k, title = {T}, url = {https://example.org/paper.html}}",
    );
    assert_eq!(publication.pdf, None);
}

#[test]
fn missing_author_and_year_have_defaults() {
    let publication = single("@misc{k, title = {T}}");
    assert_eq!(publication.authors, "");
    assert_eq!(publication.year, 0);
}

#[test]
fn single_author_with_trailing_comma() {
    let publication = single("@misc{k, title = {T}, author = {Knuth,}}");
    assert_eq!(publication.authors, "Knuth");
}

#[test]
fn unrecognized_fields_discarded_quietly() {
    let publication = single(
        "@misc{k, title = {T}, month = {jan}, pages = {1--10}, abstract = {Long text.}}",
    );
    assert_eq!(publication.title, "T");
}
