use thiserror::Error;
use url::Url;

/// Errors that can occur during URL validation.
///
/// Feed-level URLs (the redirect URL and channel artwork) end up verbatim in
/// the published document, so anything a podcast directory could not resolve
/// on its own is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    /// The URL string could not be parsed, including relative references.
    #[error("Invalid URL: {0}")]
    Parse(#[from] url::ParseError),
    /// The URL contains whitespace or ASCII control characters.
    #[error("URL contains whitespace or control characters")]
    ControlCharacter,
    /// The URL parsed but has no host component (e.g. `mailto:`, `data:`).
    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Validates that a string is an absolute URL with a scheme and a host.
///
/// The `url` crate silently strips or percent-encodes some characters that a
/// stricter parser would refuse, so whitespace and control characters are
/// rejected before parsing.
///
/// # Arguments
///
/// * `url_str` - The URL string to validate
///
/// # Returns
///
/// The parsed [`Url`] on success. Callers that need the caller-supplied
/// spelling should keep `url_str` rather than re-serialising the result.
///
/// # Errors
///
/// Returns [`UrlValidationError`] if:
/// - The string contains whitespace or control characters
///   ([`UrlValidationError::ControlCharacter`])
/// - The URL cannot be parsed or is relative ([`UrlValidationError::Parse`])
/// - The URL has no host ([`UrlValidationError::MissingHost`])
///
/// # Examples
///
/// ```
/// use podcast_feed::util::validate_absolute_url;
///
/// let url = validate_absolute_url("https://example.com/feed.xml").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// // Relative references have no scheme
/// assert!(validate_absolute_url("/relative/path").is_err());
///
/// // Schemes without an authority have no host
/// assert!(validate_absolute_url("mailto:owner@example.com").is_err());
/// ```
pub fn validate_absolute_url(url_str: &str) -> Result<Url, UrlValidationError> {
    if url_str.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(UrlValidationError::ControlCharacter);
    }

    let url = Url::parse(url_str)?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlValidationError::MissingHost(url_str.to_owned())),
    }
}
