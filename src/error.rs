use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PubsiteError {
    #[error("input bibliography not found: {0}")]
    InputMissing(PathBuf),

    #[error("Scholar request failed: {0}")]
    ScholarHttp(String),

    #[error("Scholar returned status {status}: {message}")]
    ScholarStatus { status: u16, message: String },

    #[error("blocked by Scholar (captcha/unusual traffic): {0}")]
    Blocked(String),

    #[error("could not find citations-per-year elements: {0}")]
    PageLayout(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
