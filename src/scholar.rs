use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use scraper::{Html, Selector};

use crate::error::PubsiteError;

const PROFILE_URL: &str = "https://scholar.google.com/citations";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
// total attempts = 1 + RETRIES
const RETRIES: usize = 2;
const SLEEP_BETWEEN: Duration = Duration::from_secs(2);

// A normal browser UA reduces blocks (not a guarantee).
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

// A blocked profile page carries none of the graph elements; these phrases
// identify the interstitial in its visible text.
const BLOCK_MARKERS: [&str; 3] = ["not a robot", "captcha", "unusual traffic"];

/// Cumulative citation count attributed to one year of a researcher profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CitationYear {
    pub year: i32,
    pub count: u32,
}

pub trait ScholarClient: Send + Sync {
    fn fetch_profile(&self, user: &str) -> Result<String, PubsiteError>;
}

#[derive(Clone)]
pub struct ScholarHttpClient {
    client: Client,
}

impl ScholarHttpClient {
    pub fn new() -> Result<Self, PubsiteError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| PubsiteError::ScholarHttp(err.to_string()))?;
        Ok(Self { client })
    }

    fn request(&self, user: &str) -> Result<String, PubsiteError> {
        let response = self
            .client
            .get(PROFILE_URL)
            .query(&[("user", user), ("hl", "en")])
            .send()
            .map_err(|err| PubsiteError::ScholarHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "Scholar request failed".to_string());
            return Err(PubsiteError::ScholarStatus { status, message });
        }
        response
            .text()
            .map_err(|err| PubsiteError::ScholarHttp(err.to_string()))
    }
}

impl ScholarClient for ScholarHttpClient {
    fn fetch_profile(&self, user: &str) -> Result<String, PubsiteError> {
        let mut attempt = 0usize;
        loop {
            match self.request(user) {
                Ok(html) => return Ok(html),
                Err(err) => {
                    if attempt < RETRIES {
                        tracing::warn!("Scholar attempt {} failed: {err}", attempt + 1);
                        thread::sleep(SLEEP_BETWEEN);
                        attempt += 1;
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }
}

/// Extracts the citations-per-year bars from a profile page: year labels in
/// `span.gsc_g_t`, counts in `a.gsc_g_al`, paired by position. Pairs that do
/// not parse as integers are skipped; the result is sorted newest first.
pub fn parse_citation_years(html: &str) -> Result<Vec<CitationYear>, PubsiteError> {
    let document = Html::parse_document(html);
    let year_selector = Selector::parse("span.gsc_g_t").unwrap();
    let count_selector = Selector::parse("a.gsc_g_al").unwrap();

    let years: Vec<String> = document
        .select(&year_selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .collect();
    let counts: Vec<String> = document
        .select(&count_selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .collect();

    if years.is_empty() || counts.is_empty() || years.len() != counts.len() {
        return Err(classify_failure(&document, years.len(), counts.len()));
    }

    let mut records: Vec<CitationYear> = years
        .iter()
        .zip(&counts)
        .filter_map(|(year, count)| {
            let year = year.parse().ok()?;
            let count = count.replace(',', "").parse().ok()?;
            Some(CitationYear { year, count })
        })
        .collect();

    if records.is_empty() {
        return Err(PubsiteError::PageLayout(
            "no parseable year/count pairs".to_string(),
        ));
    }

    records.sort_by_key(|record| std::cmp::Reverse(record.year));
    Ok(records)
}

fn classify_failure(document: &Html, years: usize, counts: usize) -> PubsiteError {
    let text = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if BLOCK_MARKERS.iter().any(|marker| text.contains(marker)) {
        PubsiteError::Blocked("profile page served a captcha/consent interstitial".to_string())
    } else {
        PubsiteError::PageLayout(format!("{years} year labels, {counts} count labels"))
    }
}
