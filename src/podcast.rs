//! The caller-owned podcast aggregate and feed construction.

use crate::feed::{Channel, Episode, Feed, FeedError, FeedOption};

/// Show-level metadata plus its episodes in publication order.
///
/// Episode order is significant: it becomes document order in every feed
/// built from this podcast.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Podcast {
    pub title: String,
    pub description: String,
    pub link: String,
    pub language: String,
    pub copyright: String,
    episodes: Vec<Episode>,
}

impl Podcast {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Append an episode. Its fields are not validated here.
    pub fn add_episode(&mut self, episode: Episode) {
        self.episodes.push(episode);
    }

    /// Append an episode, first growing storage to hold `expected_total`.
    ///
    /// The hint only affects allocation. It never shrinks storage, and a hint
    /// at or below the current length behaves like [`Podcast::add_episode`].
    pub fn add_episode_with_capacity(&mut self, episode: Episode, expected_total: usize) {
        if self.episodes.capacity() < expected_total {
            self.episodes.reserve(expected_total - self.episodes.len());
        }
        self.episodes.push(episode);
    }

    pub fn episode_count(&self) -> usize {
        self.episodes.len()
    }

    /// Independent snapshot of the episodes; changes to it never reach the podcast.
    pub fn copy_episodes(&self) -> Vec<Episode> {
        self.episodes.clone()
    }

    /// Read-only view of the episodes.
    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    /// **Returns the live backing storage, not a copy.**
    ///
    /// This is the unchecked escape hatch for editing episodes in place.
    /// Nothing is validated or cloned: pushes, removals, reorders and field
    /// edits go straight into the podcast and show up in every feed built
    /// from it afterwards. Use [`Podcast::copy_episodes`] for a snapshot that
    /// can be changed without touching the podcast, and
    /// [`Podcast::add_episode`] for ordinary appends.
    ///
    /// # Aliasing
    ///
    /// A [`Feed`] built by [`Podcast::feed`] borrows this same storage, so
    /// this method cannot be called while such a feed is alive.
    pub fn episodes_mut(&mut self) -> &mut Vec<Episode> {
        &mut self.episodes
    }

    /// Build a feed over the current episodes and apply `options` in order.
    ///
    /// The feed borrows the episode storage, so the podcast cannot change
    /// while the feed is alive.
    ///
    /// # Errors
    ///
    /// Returns the first option error. No feed is produced in that case.
    ///
    /// # Example
    ///
    /// ```
    /// use podcast_feed::feed::{self, FeedError};
    /// use podcast_feed::podcast::Podcast;
    ///
    /// let podcast = Podcast::new("My podcast");
    /// let err = podcast
    ///     .feed(&[feed::author("A"), feed::image("not a url"), feed::subtitle("S")])
    ///     .unwrap_err();
    /// assert!(matches!(err, FeedError::InvalidImage { .. }));
    /// ```
    pub fn feed(&self, options: &[FeedOption]) -> Result<Feed<'_>, FeedError> {
        let mut feed = Feed::new(Channel {
            title: self.title.clone(),
            link: self.link.clone(),
            description: self.description.clone(),
            language: self.language.clone(),
            copyright: self.copyright.clone(),
            episodes: &self.episodes,
            ..Channel::default()
        });
        feed.apply_options(options)?;

        tracing::debug!(
            title = %self.title,
            episodes = self.episodes.len(),
            options = options.len(),
            "Built feed"
        );
        Ok(feed)
    }
}
