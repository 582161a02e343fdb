//! Podcast description files (TOML or JSON) for the command-line tool.
//!
//! The file carries the show metadata, a `[channel]` table whose keys map
//! one-to-one onto the feed options, and an `[[episodes]]` array. Unknown
//! top-level keys are accepted but logged as a warning, since they are
//! usually typos.
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::feed::{
    self, Category, Channel, Enclosure, Episode, FeedError, FeedOption, Image, RichText,
};
use crate::podcast::Podcast;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read podcast file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in podcast file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON in podcast file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Podcast file too large: {0}")]
    TooLarge(String),

    #[error("Unsupported podcast file format: {0} (expected .toml or .json)")]
    UnsupportedFormat(String),

    /// A `[channel]` value was rejected by its feed option.
    #[error("Invalid channel settings: {0}")]
    Feed(#[from] FeedError),
}

// ============================================================================
// File Structs
// ============================================================================

/// Top-level podcast description.
///
/// Every field has a default, so a file containing only `title` is valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PodcastFile {
    pub title: String,
    pub description: String,
    pub link: String,
    pub language: String,
    pub copyright: String,
    pub channel: ChannelSection,
    pub episodes: Vec<EpisodeEntry>,
}

/// Channel-level settings. Each key becomes one [`FeedOption`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChannelSection {
    pub author: Option<String>,
    pub block: bool,
    pub explicit: bool,
    pub complete: bool,
    pub new_feed_url: Option<String>,
    pub subtitle: Option<String>,
    /// May contain HTML; written as CDATA.
    pub summary: Option<String>,
    pub owner: Option<OwnerEntry>,
    pub image: Option<String>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OwnerEntry {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EpisodeEntry {
    pub title: String,
    /// Derived from the enclosure URL, title and date when omitted.
    pub guid: Option<String>,
    /// RFC 3339 string, e.g. `"2015-01-01T00:00:00Z"`.
    pub pub_date: Option<DateTime<FixedOffset>>,
    pub description: Option<String>,
    pub content_encoded: Option<String>,
    pub author: String,
    pub block: String,
    /// Whole seconds.
    pub duration: Option<u64>,
    pub explicit: String,
    pub closed_captioned: String,
    pub order: Option<u32>,
    pub subtitle: String,
    pub summary: Option<String>,
    pub enclosure: Option<EnclosureEntry>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnclosureEntry {
    pub url: String,
    /// Size in bytes. Left out of the feed when missing.
    #[serde(default)]
    pub length: Option<u64>,
    #[serde(rename = "type")]
    pub mime_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

const KNOWN_KEYS: [&str; 7] = [
    "title",
    "description",
    "link",
    "language",
    "copyright",
    "channel",
    "episodes",
];

impl PodcastFile {
    /// Maximum podcast file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load a podcast description, picking the format from the extension.
    ///
    /// - Missing file → `Err(ConfigError::Io)`
    /// - Over 1 MB → `Err(ConfigError::TooLarge)`
    /// - Extension other than `.toml`/`.json` → `Err(ConfigError::UnsupportedFormat)`
    /// - Channel URL that is not absolute → `Err(ConfigError::Feed)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = Format::from_path(path)?;

        // Check size before reading so a huge file is never pulled into memory
        let meta = std::fs::metadata(path)?;
        if meta.len() > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge(format!(
                "Podcast file is {} bytes (max {} bytes)",
                meta.len(),
                Self::MAX_FILE_SIZE
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let file = Self::parse(&content, format)?;

        // Surface bad channel URLs here, with the file as context, rather
        // than when the feed is built
        feed::apply_all(&mut Channel::default(), &file.feed_options())?;

        tracing::debug!(
            path = %path.display(),
            title = %file.title,
            episodes = file.episodes.len(),
            "Loaded podcast file"
        );
        Ok(file)
    }

    fn parse(content: &str, format: Format) -> Result<Self, ConfigError> {
        match format {
            Format::Toml => {
                if let Ok(raw) = content.parse::<toml::Table>() {
                    warn_unknown_keys(raw.keys().map(String::as_str));
                }
                Ok(toml::from_str(content)?)
            }
            Format::Json => {
                if let Ok(serde_json::Value::Object(raw)) =
                    serde_json::from_str::<serde_json::Value>(content)
                {
                    warn_unknown_keys(raw.keys().map(String::as_str));
                }
                Ok(serde_json::from_str(content)?)
            }
        }
    }

    /// Feed options for the `[channel]` table, in option-table order.
    pub fn feed_options(&self) -> Vec<FeedOption> {
        let ch = &self.channel;
        let mut options = Vec::new();
        if let Some(name) = &ch.author {
            options.push(feed::author(name.as_str()));
        }
        if ch.block {
            options.push(FeedOption::Block);
        }
        if ch.explicit {
            options.push(FeedOption::Explicit);
        }
        if ch.complete {
            options.push(FeedOption::Complete);
        }
        if let Some(url) = &ch.new_feed_url {
            options.push(feed::new_feed_url(url.as_str()));
        }
        if let Some(text) = &ch.subtitle {
            options.push(feed::subtitle(text.as_str()));
        }
        if let Some(text) = &ch.summary {
            options.push(feed::summary(text.as_str()));
        }
        if let Some(owner) = &ch.owner {
            options.push(feed::owner(owner.name.as_str(), owner.email.as_str()));
        }
        if let Some(href) = &ch.image {
            options.push(feed::image(href.as_str()));
        }
        options
    }

    /// Categories have no feed option; set them on the built feed's channel.
    pub fn categories(&self) -> &[Category] {
        &self.channel.categories
    }

    /// Build the podcast, keeping episode order from the file.
    pub fn into_podcast(self) -> Podcast {
        let mut podcast = Podcast::new(self.title);
        podcast.description = self.description;
        podcast.link = self.link;
        podcast.language = self.language;
        podcast.copyright = self.copyright;

        let total = self.episodes.len();
        for entry in self.episodes {
            podcast.add_episode_with_capacity(entry.into_episode(), total);
        }
        podcast
    }
}

impl EpisodeEntry {
    fn into_episode(self) -> Episode {
        let guid = match self.guid.as_deref().map(str::trim) {
            Some(guid) if !guid.is_empty() => guid.to_string(),
            _ => derive_guid(
                self.enclosure.as_ref().map(|e| e.url.as_str()),
                &self.title,
                self.pub_date.as_ref(),
            ),
        };

        Episode {
            title: self.title,
            guid,
            pub_date: self.pub_date,
            description: self.description.map(RichText::from),
            content_encoded: self.content_encoded.map(RichText::from),
            author: self.author,
            block: self.block,
            duration: self.duration.map(Duration::from_secs),
            explicit: self.explicit,
            closed_captioned: self.closed_captioned,
            order: self.order,
            subtitle: self.subtitle,
            summary: self.summary.map(RichText::from),
            enclosure: self.enclosure.map(|e| Enclosure {
                url: e.url,
                length: e.length.map(|n| n.to_string()).unwrap_or_default(),
                mime_type: e.mime_type,
            }),
            image: self.image.map(Image::new),
        }
    }
}

/// Stable GUID for episodes that do not name one.
fn derive_guid(
    enclosure_url: Option<&str>,
    title: &str,
    pub_date: Option<&DateTime<FixedOffset>>,
) -> String {
    let input = format!(
        "{}|{}|{}",
        enclosure_url.unwrap_or(""),
        title,
        pub_date.map(|d| d.timestamp().to_string()).unwrap_or_default()
    );
    let hash = Sha256::digest(input.as_bytes());
    format!("{:x}", hash)
}

fn warn_unknown_keys<'a>(keys: impl Iterator<Item = &'a str>) {
    for key in keys {
        if !KNOWN_KEYS.contains(&key) {
            tracing::warn!(key = %key, "Unknown key in podcast file, ignoring");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
