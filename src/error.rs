use thiserror::Error;

/// Errors that can occur while loading, sequencing or rendering pages.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// The document could not be fetched or parsed.
    #[error("failed to load document: {0}")]
    Load(String),

    /// Reading the document from disk failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document location is not a valid URL.
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Only local files and `file://` URLs can be opened.
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// The background load ended without reporting a result.
    #[error("document load was aborted")]
    LoadAborted,

    /// The document has no pages to show.
    #[error("document has no pages")]
    EmptyDocument,

    /// A single page failed to render.
    #[error("failed to render page {page}: {reason}")]
    Render {
        /// The page that failed.
        page: u32,
        /// What went wrong.
        reason: String,
    },

    /// A page number outside `1..=last` was requested.
    #[error("page {page} is out of range (document has {last} pages)")]
    OutOfRange {
        /// The requested page.
        page: u32,
        /// The last page of the document.
        last: u32,
    },

    /// Scales must be finite and strictly positive.
    #[error("invalid scale: {0}")]
    InvalidScale(f32),
}

impl ViewerError {
    /// Shorthand for a [`ViewerError::Render`] of `page`.
    pub fn render(page: u32, reason: impl Into<String>) -> Self {
        ViewerError::Render {
            page,
            reason: reason.into(),
        }
    }
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ViewerError>;
