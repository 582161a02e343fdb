//! Feed construction and RSS serialization.
//!
//! This module turns podcast metadata into an RSS 2.0 document with the
//! iTunes podcast and content-module extensions:
//!
//! - **Model**: Channel, episode and feed types with their namespace constants
//! - **Options**: Validated mutations of channel-level metadata
//! - **Writing**: Whole-document, buffered and streaming serialization
//! - **Pooling**: Reusable render buffers for high-volume callers
//!
//! # Architecture
//!
//! The module is organized into five submodules:
//!
//! - `model` - Plain data types; a [`Feed`] borrows its episodes from the podcast
//! - `options` - [`FeedOption`] and the all-or-nothing [`Feed::apply_options`]
//! - `writer` - A single event emitter shared by every output strategy
//! - `pool` - [`BufferPool`], a mutex-guarded free list of byte buffers
//! - `error` - [`FeedError`]
//!
//! # Example
//!
//! ```
//! use podcast_feed::feed::{self, WriteOptions};
//! use podcast_feed::podcast::Podcast;
//!
//! let podcast = Podcast::new("My podcast");
//! let feed = podcast.feed(&[feed::author("Author Name")]).unwrap();
//!
//! let xml = feed.to_xml().unwrap();
//! assert!(xml.contains("<itunes:author>Author Name</itunes:author>"));
//!
//! // Same bytes, rendered into a pooled buffer
//! let pooled = feed.to_xml_with_options(&WriteOptions::pooled()).unwrap();
//! assert_eq!(xml, pooled);
//! ```

mod error;
mod model;
mod options;
mod pool;
mod writer;

pub use error::FeedError;
pub use model::{
    Category, Channel, Enclosure, Episode, Feed, Image, Owner, RichText, CONTENT_XMLNS,
    ITUNES_XMLNS, RSS_VERSION,
};
pub use options::{
    apply_all, author, image, new_feed_url, owner, subtitle, summary, FeedOption, VALUE_YES,
};
pub use pool::{BufferPool, PooledBuffer};
pub use writer::WriteOptions;
