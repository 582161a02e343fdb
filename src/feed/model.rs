use std::fmt;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::Deserialize;

/// iTunes podcast extension namespace bound to the `itunes:` prefix.
pub const ITUNES_XMLNS: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";
/// RSS content module namespace bound to the `content:` prefix.
pub const CONTENT_XMLNS: &str = "http://purl.org/rss/1.0/modules/content/";
/// Value of the `version` attribute on `<rss>`.
pub const RSS_VERSION: &str = "2.0";

// ============================================================================
// Value Types
// ============================================================================

/// Text that is written verbatim inside a CDATA section.
///
/// Use this for descriptions, summaries and show notes that may carry HTML
/// such as `<a href="...">` links. Plain `String` fields are always
/// entity-escaped instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RichText(String);

impl RichText {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for RichText {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RichText {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Media file attached to an episode, written as `<enclosure>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enclosure {
    /// URL of the audio or video file.
    pub url: String,
    /// Size in bytes as decimal text. Omitted from output when empty.
    pub length: String,
    /// MIME type, e.g. `audio/mpeg`.
    pub mime_type: String,
}

impl Enclosure {
    pub fn new(url: impl Into<String>, length_bytes: u64, mime_type: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            length: length_bytes.to_string(),
            mime_type: mime_type.into(),
        }
    }
}

/// Artwork reference, written as `<itunes:image href="..."/>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    pub href: String,
}

impl Image {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// Contact for the show, written as `<itunes:owner>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Owner {
    pub name: String,
    pub email: String,
}

/// iTunes category; subcategories nest inside their parent element.
///
/// Deserializable so podcast files can list categories directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub text: String,
    #[serde(default)]
    pub subcategories: Vec<Category>,
}

impl Category {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            subcategories: Vec::new(),
        }
    }

    /// Append a subcategory, builder style.
    pub fn with_subcategory(mut self, subcategory: Category) -> Self {
        self.subcategories.push(subcategory);
        self
    }
}

// ============================================================================
// Episode
// ============================================================================

/// One podcast installment, written as `<item>`.
///
/// Every plain-text field treats the empty string as "not set" and is left
/// out of the document. Nothing here is validated when the episode is added
/// to a [`Podcast`](crate::podcast::Podcast); an episode with only a title
/// still serializes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Episode {
    pub title: String,
    /// Stable identifier for podcast clients, usually the episode page URL.
    pub guid: String,
    pub pub_date: Option<DateTime<FixedOffset>>,
    pub description: Option<RichText>,
    /// Full show notes, written as `content:encoded`.
    pub content_encoded: Option<RichText>,
    pub author: String,
    pub block: String,
    pub duration: Option<Duration>,
    pub explicit: String,
    pub closed_captioned: String,
    pub order: Option<u32>,
    pub subtitle: String,
    pub summary: Option<RichText>,
    pub enclosure: Option<Enclosure>,
    pub image: Option<Image>,
}

impl Episode {
    /// Create an episode with the three fields podcast clients key on.
    ///
    /// The publish date keeps the offset of the supplied timestamp.
    pub fn new<Tz: TimeZone>(
        title: impl Into<String>,
        guid: impl Into<String>,
        pub_date: DateTime<Tz>,
    ) -> Self {
        Self {
            title: title.into(),
            guid: guid.into(),
            pub_date: Some(pub_date.fixed_offset()),
            ..Self::default()
        }
    }
}

// ============================================================================
// Channel and Feed
// ============================================================================

/// Channel-level metadata plus the episodes it publishes.
///
/// `episodes` borrows the backing storage of the podcast the feed was built
/// from, so the podcast cannot be mutated while a feed over it is alive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Channel<'a> {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
    pub copyright: String,
    pub author: String,
    pub block: String,
    pub explicit: String,
    pub complete: String,
    pub new_feed_url: String,
    pub subtitle: String,
    pub summary: Option<RichText>,
    pub owner: Option<Owner>,
    pub image: Option<Image>,
    pub categories: Vec<Category>,
    pub episodes: &'a [Episode],
}

/// Serialization-ready RSS document wrapping exactly one [`Channel`].
///
/// Built by [`Podcast::feed`](crate::podcast::Podcast::feed). Serialization
/// methods live in the `writer` module and option handling in `options`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feed<'a> {
    pub(crate) channel: Channel<'a>,
}

impl<'a> Feed<'a> {
    pub fn new(channel: Channel<'a>) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &Channel<'a> {
        &self.channel
    }

    /// Direct access for fields that have no feed option, such as categories.
    pub fn channel_mut(&mut self) -> &mut Channel<'a> {
        &mut self.channel
    }

    pub fn episode_count(&self) -> usize {
        self.channel.episodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_rich_text_conversions() {
        let text = RichText::from("<b>bold</b>");
        assert_eq!(text.as_str(), "<b>bold</b>");
        assert_eq!(text.to_string(), "<b>bold</b>");
        assert!(!text.is_empty());
        assert!(RichText::default().is_empty());
        assert_eq!(RichText::new(String::from("x")).into_inner(), "x");
    }

    #[test]
    fn test_enclosure_new_formats_length() {
        let enc = Enclosure::new("https://example.com/ep.mp3", 12_312, "audio/mpeg");
        assert_eq!(enc.length, "12312");
        assert_eq!(enc.mime_type, "audio/mpeg");
    }

    #[test]
    fn test_category_nesting() {
        let cat = Category::new("Technology").with_subcategory(Category::new("Podcasting"));
        assert_eq!(cat.subcategories.len(), 1);
        assert_eq!(cat.subcategories[0].text, "Podcasting");
    }

    #[test]
    fn test_episode_new_keeps_offset() {
        let offset = FixedOffset::east_opt(3600).unwrap();
        let date = offset.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let ep = Episode::new("Ep", "guid-1", date);
        assert_eq!(ep.pub_date.unwrap().offset().local_minus_utc(), 3600);
        assert!(ep.enclosure.is_none());
        assert!(ep.duration.is_none());
    }

    #[test]
    fn test_episode_new_from_utc() {
        let date = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
        let ep = Episode::new("Ep", "guid-1", date);
        assert_eq!(ep.pub_date.unwrap(), date);
    }

    #[test]
    fn test_feed_wraps_channel() {
        let episodes = vec![Episode::default(), Episode::default()];
        let mut feed = Feed::new(Channel {
            title: "Show".to_string(),
            episodes: &episodes,
            ..Channel::default()
        });
        assert_eq!(feed.episode_count(), 2);
        feed.channel_mut().categories.push(Category::new("Arts"));
        assert_eq!(feed.channel().categories.len(), 1);
    }

    #[test]
    fn test_category_deserializes_nested() {
        let cat: Category = serde_json::from_str(
            r#"{"text":"Technology","subcategories":[{"text":"Podcasting"}]}"#,
        )
        .unwrap();
        assert_eq!(
            cat,
            Category::new("Technology").with_subcategory(Category::new("Podcasting"))
        );

        let leaf: Category = serde_json::from_str(r#"{"text":"Education"}"#).unwrap();
        assert!(leaf.subcategories.is_empty());
    }
}
