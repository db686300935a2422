use thiserror::Error;

/// Failures raised while turning a show page into records. Every variant is
/// fatal for the run: the page no longer looks the way the scraper expects.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScrapeError {
    /// A fragment is missing, duplicated, or the performance table is empty.
    #[error("structural error: {0}")]
    Structural(String),
    /// An icon class that is not in the flag tables.
    #[error("unknown {cell} icon class `{class}`")]
    Vocabulary { cell: &'static str, class: String },
    /// Date or time text that does not match the expected format.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ScrapeError {
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}
