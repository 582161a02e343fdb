use thiserror::Error;

use crate::util::UrlValidationError;

/// Errors raised while configuring or writing a feed.
///
/// Validation errors come from feed options and abort the option chain that
/// produced them. I/O errors come from the caller's sink; nothing is retried.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The redirect URL given to `itunes:new-feed-url` is not absolute.
    #[error("Invalid feed URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: UrlValidationError,
    },

    /// The channel artwork URL given to `itunes:image` is not absolute.
    #[error("Invalid image URL '{url}': {source}")]
    InvalidImage {
        url: String,
        #[source]
        source: UrlValidationError,
    },

    /// The destination sink reported a write failure.
    #[error("Failed to write feed: {0}")]
    Io(#[from] std::io::Error),

    /// The rendered document was not valid UTF-8.
    #[error("Generated feed contains invalid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

impl FeedError {
    /// True for errors produced by option validation rather than I/O.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidUrl { .. } | Self::InvalidImage { .. })
    }
}
