//! Utility functions for common operations.
//!
//! This module provides reusable utilities for:
//!
//! - **Value formatting**: RFC 2822 publish dates and `itunes:duration` text
//! - **Text processing**: XML character sanitising and CDATA splitting
//! - **URL validation**: Absolute-URL checks for feed-level links
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use podcast_feed::util::{format_duration, strip_invalid_xml_chars, validate_absolute_url};
//!
//! // Validate a redirect URL
//! let url = validate_absolute_url("https://example.com/feed.xml").unwrap();
//!
//! // Format an episode length
//! assert_eq!(format_duration(Duration::from_secs(320)), "5:20");
//!
//! // Drop characters XML cannot carry
//! assert_eq!(strip_invalid_xml_chars("a\x00b"), "ab");
//! ```

mod format;
mod text;
mod url_validator;

pub use format::{format_duration, format_pub_date};
pub use text::{cdata_sections, strip_invalid_xml_chars};
pub use url_validator::{validate_absolute_url, UrlValidationError};
