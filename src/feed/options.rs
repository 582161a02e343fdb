use super::error::FeedError;
use super::model::{Channel, Feed, Image, Owner, RichText};
use crate::util::validate_absolute_url;

/// Value written by the flag options (`itunes:block`, `itunes:explicit`,
/// `itunes:complete`).
pub const VALUE_YES: &str = "yes";

/// A named, validated mutation of channel-level metadata.
///
/// Options are applied in the order given. Each one validates its input
/// before touching the channel, so a failing option leaves every field as
/// it was.
///
/// # Example
///
/// ```
/// use podcast_feed::feed::{self, FeedOption};
/// use podcast_feed::podcast::Podcast;
///
/// let podcast = Podcast::new("My podcast");
/// let feed = podcast
///     .feed(&[
///         feed::author("Author Name"),
///         FeedOption::Explicit,
///         feed::image("http://www.example-podcast.com/my-podcast.jpg"),
///     ])
///     .unwrap();
/// assert_eq!(feed.channel().author, "Author Name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOption {
    /// Set `itunes:author`.
    Author(String),
    /// Set `itunes:block` to `yes`.
    Block,
    /// Set `itunes:explicit` to `yes`.
    Explicit,
    /// Set `itunes:complete` to `yes`.
    Complete,
    /// Set `itunes:new-feed-url`. Must be an absolute URL.
    NewFeedUrl(String),
    /// Set `itunes:subtitle`.
    Subtitle(String),
    /// Set `itunes:summary`, written as CDATA.
    Summary(String),
    /// Set `itunes:owner`.
    Owner { name: String, email: String },
    /// Set channel `itunes:image`. Must be an absolute URL.
    Image(String),
}

impl FeedOption {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Author(_) => "author",
            Self::Block => "block",
            Self::Explicit => "explicit",
            Self::Complete => "complete",
            Self::NewFeedUrl(_) => "new_feed_url",
            Self::Subtitle(_) => "subtitle",
            Self::Summary(_) => "summary",
            Self::Owner { .. } => "owner",
            Self::Image(_) => "image",
        }
    }

    /// Validate and apply this option to `channel`.
    ///
    /// # Errors
    ///
    /// - [`FeedError::InvalidUrl`] if a `NewFeedUrl` is not absolute
    /// - [`FeedError::InvalidImage`] if an `Image` URL is not absolute
    pub fn apply(&self, channel: &mut Channel<'_>) -> Result<(), FeedError> {
        match self {
            Self::Author(name) => channel.author = name.clone(),
            Self::Block => channel.block = VALUE_YES.to_string(),
            Self::Explicit => channel.explicit = VALUE_YES.to_string(),
            Self::Complete => channel.complete = VALUE_YES.to_string(),
            Self::NewFeedUrl(url) => {
                validate_absolute_url(url).map_err(|source| FeedError::InvalidUrl {
                    url: url.clone(),
                    source,
                })?;
                channel.new_feed_url = url.clone();
            }
            Self::Subtitle(text) => channel.subtitle = text.clone(),
            Self::Summary(text) => channel.summary = Some(RichText::new(text.as_str())),
            Self::Owner { name, email } => {
                channel.owner = Some(Owner {
                    name: name.clone(),
                    email: email.clone(),
                });
            }
            Self::Image(href) => {
                validate_absolute_url(href).map_err(|source| FeedError::InvalidImage {
                    url: href.clone(),
                    source,
                })?;
                channel.image = Some(Image::new(href.as_str()));
            }
        }
        Ok(())
    }
}

pub fn author(name: impl Into<String>) -> FeedOption {
    FeedOption::Author(name.into())
}

pub fn new_feed_url(url: impl Into<String>) -> FeedOption {
    FeedOption::NewFeedUrl(url.into())
}

pub fn subtitle(text: impl Into<String>) -> FeedOption {
    FeedOption::Subtitle(text.into())
}

pub fn summary(text: impl Into<String>) -> FeedOption {
    FeedOption::Summary(text.into())
}

pub fn owner(name: impl Into<String>, email: impl Into<String>) -> FeedOption {
    FeedOption::Owner {
        name: name.into(),
        email: email.into(),
    }
}

pub fn image(href: impl Into<String>) -> FeedOption {
    FeedOption::Image(href.into())
}

/// Apply `options` to `channel` in order, stopping at the first failure.
///
/// Options before the failing one stay applied to `channel`; use
/// [`Feed::apply_options`] for all-or-nothing semantics.
pub fn apply_all(channel: &mut Channel<'_>, options: &[FeedOption]) -> Result<(), FeedError> {
    for (index, option) in options.iter().enumerate() {
        option.apply(channel)?;
        tracing::trace!(index, option = option.name(), "Applied feed option");
    }
    Ok(())
}

impl Feed<'_> {
    /// Apply `options` in order, committing only if every one succeeds.
    ///
    /// The chain runs against a staged copy of the channel. On the first
    /// failure the remaining options are skipped, the error is returned and
    /// the feed is left exactly as it was.
    pub fn apply_options(&mut self, options: &[FeedOption]) -> Result<(), FeedError> {
        let mut staged = self.channel.clone();
        apply_all(&mut staged, options)?;
        self.channel = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_AUTHOR: &str = "Test Author";
    const TEST_SUBTITLE: &str = "Test Subtitle";

    fn channel() -> Channel<'static> {
        Channel::default()
    }

    #[test]
    fn test_author() {
        let mut ch = channel();
        author("john").apply(&mut ch).unwrap();
        assert_eq!(ch.author, "john");
    }

    #[test]
    fn test_flags() {
        let mut ch = channel();
        FeedOption::Block.apply(&mut ch).unwrap();
        FeedOption::Explicit.apply(&mut ch).unwrap();
        FeedOption::Complete.apply(&mut ch).unwrap();
        assert_eq!(ch.block, VALUE_YES);
        assert_eq!(ch.explicit, VALUE_YES);
        assert_eq!(ch.complete, VALUE_YES);
    }

    #[test]
    fn test_new_feed_url() {
        let mut ch = channel();
        new_feed_url("http://example.com/test").apply(&mut ch).unwrap();
        assert_eq!(ch.new_feed_url, "http://example.com/test");
    }

    #[test]
    fn test_new_feed_url_keeps_caller_spelling() {
        let mut ch = channel();
        new_feed_url("HTTP://Example.com").apply(&mut ch).unwrap();
        assert_eq!(ch.new_feed_url, "HTTP://Example.com");
    }

    #[test]
    fn test_new_feed_url_invalid() {
        let mut ch = channel();
        for url in ["invalid url", "/relative/path", "http://example.com/path\x00\x01", ""] {
            let err = new_feed_url(url).apply(&mut ch).unwrap_err();
            assert!(
                matches!(err, FeedError::InvalidUrl { .. }),
                "expected InvalidUrl for {url:?}, got {err:?}"
            );
        }
        assert!(ch.new_feed_url.is_empty());
    }

    #[test]
    fn test_subtitle() {
        let mut ch = channel();
        subtitle("this is subtitle").apply(&mut ch).unwrap();
        assert_eq!(ch.subtitle, "this is subtitle");
    }

    #[test]
    fn test_summary_is_rich_text() {
        let mut ch = channel();
        let text = r#"this is summary. <a href="http://example.com/more">more</a>"#;
        summary(text).apply(&mut ch).unwrap();
        assert_eq!(ch.summary.as_ref().map(RichText::as_str), Some(text));
    }

    #[test]
    fn test_owner() {
        let mut ch = channel();
        owner("anabelle", "test@test.com").apply(&mut ch).unwrap();
        let o = ch.owner.unwrap();
        assert_eq!(o.name, "anabelle");
        assert_eq!(o.email, "test@test.com");
    }

    #[test]
    fn test_image() {
        let mut ch = channel();
        image("http://example.com/test/image.jpg").apply(&mut ch).unwrap();
        assert_eq!(ch.image.unwrap().href, "http://example.com/test/image.jpg");
    }

    #[test]
    fn test_image_invalid_keeps_previous() {
        let mut ch = channel();
        image("http://example.com/old.jpg").apply(&mut ch).unwrap();
        for href in [
            "invalid img url",
            "/relative/image.jpg",
            "http://example.com/image\x00\x01.jpg",
        ] {
            let err = image(href).apply(&mut ch).unwrap_err();
            assert!(
                matches!(err, FeedError::InvalidImage { .. }),
                "expected InvalidImage for {href:?}, got {err:?}"
            );
        }
        assert_eq!(ch.image.unwrap().href, "http://example.com/old.jpg");
    }

    #[test]
    fn test_apply_all_in_order() {
        let mut ch = channel();
        apply_all(
            &mut ch,
            &[
                author(TEST_AUTHOR),
                FeedOption::Block,
                FeedOption::Explicit,
                subtitle(TEST_SUBTITLE),
            ],
        )
        .unwrap();
        assert_eq!(ch.author, TEST_AUTHOR);
        assert_eq!(ch.block, VALUE_YES);
        assert_eq!(ch.explicit, VALUE_YES);
        assert_eq!(ch.subtitle, TEST_SUBTITLE);
    }

    #[test]
    fn test_apply_all_later_option_wins() {
        let mut ch = channel();
        apply_all(&mut ch, &[author("first"), author("second")]).unwrap();
        assert_eq!(ch.author, "second");
    }

    #[test]
    fn test_apply_all_stops_at_first_failure() {
        let mut ch = channel();
        let err =
            apply_all(&mut ch, &[author("A"), image("not a url"), subtitle("S")]).unwrap_err();
        assert!(matches!(err, FeedError::InvalidImage { .. }));
        assert_eq!(ch.author, "A");
        assert!(ch.subtitle.is_empty());
    }

    #[test]
    fn test_feed_apply_options_is_all_or_nothing() {
        let mut feed = Feed::default();
        feed.apply_options(&[author("kept")]).unwrap();

        let err = feed
            .apply_options(&[author("A"), image("not a url"), subtitle("S")])
            .unwrap_err();
        assert!(matches!(err, FeedError::InvalidImage { .. }));
        assert_eq!(feed.channel().author, "kept");
        assert!(feed.channel().subtitle.is_empty());
    }

    #[test]
    fn test_option_names() {
        assert_eq!(FeedOption::Block.name(), "block");
        assert_eq!(new_feed_url("x").name(), "new_feed_url");
        assert_eq!(owner("a", "b").name(), "owner");
    }
}
