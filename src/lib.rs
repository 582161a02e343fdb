//! RSS 2.0 podcast feed generation with iTunes extensions.
//!
//! Build a [`podcast::Podcast`], append episodes, then turn it into a
//! [`feed::Feed`] with channel-level options and serialize it.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use podcast_feed::feed::{self, Enclosure, Episode, FeedOption};
//! use podcast_feed::podcast::Podcast;
//!
//! let mut podcast = Podcast::new("My podcast");
//! podcast.link = "http://www.example-podcast.com/my-podcast".to_string();
//!
//! let date = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
//! podcast.add_episode(Episode {
//!     enclosure: Some(Enclosure::new("http://example.com/1.mp3", 12_312, "audio/mpeg")),
//!     ..Episode::new("Episode 1", "http://example.com/1", date)
//! });
//!
//! let feed = podcast
//!     .feed(&[feed::author("Author Name"), FeedOption::Explicit])
//!     .unwrap();
//!
//! let mut out = Vec::new();
//! feed.stream_to(&mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().contains("<itunes:explicit>yes</itunes:explicit>"));
//! ```

pub mod config;
pub mod feed;
pub mod podcast;
pub mod util;
