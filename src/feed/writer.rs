use std::io::{self, Write};

use quick_xml::escape::escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::error::FeedError;
use super::model::{
    Category, Channel, Enclosure, Episode, Feed, Image, Owner, RichText, CONTENT_XMLNS,
    ITUNES_XMLNS, RSS_VERSION,
};
use super::pool::BufferPool;
use crate::util::{cdata_sections, format_duration, format_pub_date, strip_invalid_xml_chars};

const INDENT_CHAR: u8 = b' ';
const INDENT_SIZE: usize = 2;

// ============================================================================
// Write Options
// ============================================================================

/// Allocation settings for the buffered strategy.
///
/// Neither setting changes the produced bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions<'p> {
    /// Reserve at least this many bytes before rendering.
    pub buffer_size: Option<usize>,
    /// Render into a buffer borrowed from this pool instead of a fresh one.
    pub pool: Option<&'p BufferPool>,
}

impl<'p> WriteOptions<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer_size(mut self, bytes: usize) -> Self {
        self.buffer_size = Some(bytes);
        self
    }

    pub fn pool(mut self, pool: &'p BufferPool) -> Self {
        self.pool = Some(pool);
        self
    }
}

impl WriteOptions<'static> {
    /// Render through the process-wide [`BufferPool::global`].
    pub fn pooled() -> Self {
        Self::new().pool(BufferPool::global())
    }
}

// ============================================================================
// Feed Serialization
// ============================================================================

impl Feed<'_> {
    /// Render the whole document into a `String`.
    pub fn to_xml(&self) -> Result<String, FeedError> {
        let mut buf = Vec::new();
        self.render_into(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Render the whole document in memory, then hand it to `sink` in one write.
    ///
    /// Nothing reaches `sink` if rendering fails.
    pub fn write_to<W: Write>(&self, mut sink: W) -> Result<(), FeedError> {
        let mut buf = Vec::new();
        self.render_into(&mut buf)?;
        sink.write_all(&buf)?;
        sink.flush()?;
        Ok(())
    }

    /// Like [`Feed::write_to`], using the allocation settings in `options`.
    pub fn write_with_options<W: Write>(
        &self,
        mut sink: W,
        options: &WriteOptions<'_>,
    ) -> Result<(), FeedError> {
        self.with_buffer(options, |buf| {
            sink.write_all(buf)?;
            sink.flush()?;
            Ok(())
        })
    }

    /// Like [`Feed::to_xml`], using the allocation settings in `options`.
    pub fn to_xml_with_options(&self, options: &WriteOptions<'_>) -> Result<String, FeedError> {
        self.with_buffer(options, |buf| Ok(String::from_utf8(buf.to_vec())?))
    }

    /// Write the document event by event straight into `sink`.
    ///
    /// Only the element being written is held in memory, so peak usage does
    /// not grow with the episode count. If `sink` fails part way, whatever was
    /// already written stays there. Wrap unbuffered sinks such as `File` in a
    /// `BufWriter` to avoid one syscall per event.
    pub fn stream_to<W: Write>(&self, sink: W) -> Result<(), FeedError> {
        tracing::debug!(episodes = self.episode_count(), "Streaming feed document");
        let mut writer = FeedWriter::new(sink);
        writer.document(&self.channel)?;
        writer.into_inner().flush()?;
        Ok(())
    }

    fn render_into(&self, buf: &mut Vec<u8>) -> Result<(), FeedError> {
        FeedWriter::new(&mut *buf).document(&self.channel)?;
        tracing::debug!(
            episodes = self.episode_count(),
            bytes = buf.len(),
            "Rendered feed document"
        );
        Ok(())
    }

    /// Render into a buffer chosen by `options` and pass the bytes to `f`.
    fn with_buffer<T>(
        &self,
        options: &WriteOptions<'_>,
        f: impl FnOnce(&[u8]) -> Result<T, FeedError>,
    ) -> Result<T, FeedError> {
        let hint = options.buffer_size.unwrap_or(0);
        match options.pool {
            Some(pool) => {
                let mut buf = pool.get();
                buf.reserve(hint);
                self.render_into(&mut buf)?;
                f(&buf)
            }
            None => {
                let mut buf = Vec::with_capacity(hint);
                self.render_into(&mut buf)?;
                f(&buf)
            }
        }
    }
}

// ============================================================================
// Event Writer
// ============================================================================

/// Walks the model in document order and emits XML events.
///
/// Every strategy goes through this type, which is what keeps their output
/// byte-identical.
struct FeedWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> FeedWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, INDENT_CHAR, INDENT_SIZE),
        }
    }

    fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn document(&mut self, channel: &Channel<'_>) -> io::Result<()> {
        self.writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("xmlns:itunes", ITUNES_XMLNS));
        rss.push_attribute(("xmlns:content", CONTENT_XMLNS));
        rss.push_attribute(("version", RSS_VERSION));
        self.writer.write_event(Event::Start(rss))?;
        self.start("channel")?;

        self.channel_metadata(channel)?;
        for (index, episode) in channel.episodes.iter().enumerate() {
            self.episode(episode)?;
            tracing::trace!(index, guid = %episode.guid, "Wrote episode");
        }

        self.end("channel")?;
        self.end("rss")
    }

    fn channel_metadata(&mut self, channel: &Channel<'_>) -> io::Result<()> {
        self.text_element("title", &channel.title)?;
        self.text_element("link", &channel.link)?;
        self.text_element("description", &channel.description)?;
        self.text_element("language", &channel.language)?;
        self.text_element("copyright", &channel.copyright)?;
        self.text_element("itunes:author", &channel.author)?;
        self.text_element("itunes:block", &channel.block)?;
        self.text_element("itunes:explicit", &channel.explicit)?;
        self.text_element("itunes:complete", &channel.complete)?;
        self.text_element("itunes:new-feed-url", &channel.new_feed_url)?;
        self.text_element("itunes:subtitle", &channel.subtitle)?;
        self.cdata_element("itunes:summary", channel.summary.as_ref())?;
        self.owner(channel.owner.as_ref())?;
        self.image(channel.image.as_ref())?;
        for category in &channel.categories {
            self.category(category)?;
        }
        Ok(())
    }

    fn episode(&mut self, episode: &Episode) -> io::Result<()> {
        self.start("item")?;
        self.text_element("title", &episode.title)?;
        self.text_element("guid", &episode.guid)?;
        if let Some(date) = &episode.pub_date {
            self.text_element("pubDate", &format_pub_date(date))?;
        }
        self.cdata_element("description", episode.description.as_ref())?;
        self.cdata_element("content:encoded", episode.content_encoded.as_ref())?;
        self.text_element("itunes:author", &episode.author)?;
        self.text_element("itunes:block", &episode.block)?;
        if let Some(duration) = episode.duration {
            self.text_element("itunes:duration", &format_duration(duration))?;
        }
        self.text_element("itunes:explicit", &episode.explicit)?;
        self.text_element("itunes:isClosedCaptioned", &episode.closed_captioned)?;
        if let Some(order) = episode.order {
            self.text_element("itunes:order", &order.to_string())?;
        }
        self.text_element("itunes:subtitle", &episode.subtitle)?;
        self.cdata_element("itunes:summary", episode.summary.as_ref())?;
        self.enclosure(episode.enclosure.as_ref())?;
        self.image(episode.image.as_ref())?;
        self.end("item")
    }

    fn owner(&mut self, owner: Option<&Owner>) -> io::Result<()> {
        let Some(owner) = owner else {
            return Ok(());
        };
        if owner.name.is_empty() && owner.email.is_empty() {
            return Ok(());
        }
        self.start("itunes:owner")?;
        self.text_element("itunes:name", &owner.name)?;
        self.text_element("itunes:email", &owner.email)?;
        self.end("itunes:owner")
    }

    fn image(&mut self, image: Option<&Image>) -> io::Result<()> {
        match image {
            Some(image) if !image.href.is_empty() => {
                self.empty_element("itunes:image", &[("href", image.href.as_str())])
            }
            _ => Ok(()),
        }
    }

    fn enclosure(&mut self, enclosure: Option<&Enclosure>) -> io::Result<()> {
        let Some(enclosure) = enclosure else {
            return Ok(());
        };
        let mut attrs = vec![("url", enclosure.url.as_str())];
        if !enclosure.length.is_empty() {
            attrs.push(("length", enclosure.length.as_str()));
        }
        attrs.push(("type", enclosure.mime_type.as_str()));
        self.empty_element("enclosure", &attrs)
    }

    fn category(&mut self, category: &Category) -> io::Result<()> {
        if category.subcategories.is_empty() {
            return self.empty_element("itunes:category", &[("text", category.text.as_str())]);
        }
        let mut start = BytesStart::new("itunes:category");
        start.push_attribute(("text", &*strip_invalid_xml_chars(&category.text)));
        self.writer.write_event(Event::Start(start))?;
        for subcategory in &category.subcategories {
            self.category(subcategory)?;
        }
        self.end("itunes:category")
    }

    // ------------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------------

    fn start(&mut self, name: &str) -> io::Result<()> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))
    }

    fn end(&mut self, name: &str) -> io::Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))
    }

    /// `<name>escaped value</name>`, or nothing when the value is empty.
    fn text_element(&mut self, name: &str, value: &str) -> io::Result<()> {
        let value = strip_invalid_xml_chars(value);
        if value.is_empty() {
            return Ok(());
        }
        self.start(name)?;
        self.writer.write_event(Event::Text(BytesText::from_escaped(escape(&*value))))?;
        self.end(name)
    }

    /// `<name><![CDATA[value]]></name>`, or nothing when absent or empty.
    fn cdata_element(&mut self, name: &str, value: Option<&RichText>) -> io::Result<()> {
        let Some(value) = value else {
            return Ok(());
        };
        let value = strip_invalid_xml_chars(value.as_str());
        if value.is_empty() {
            return Ok(());
        }
        self.start(name)?;
        for section in cdata_sections(&value) {
            self.writer.write_event(Event::CData(BytesCData::new(section)))?;
        }
        self.end(name)
    }

    /// `<name a="v" .../>`; attribute values are escaped.
    fn empty_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        let mut element = BytesStart::new(name);
        for &(key, value) in attrs {
            element.push_attribute((key, &*strip_invalid_xml_chars(value)));
        }
        self.writer.write_event(Event::Empty(element))
    }
}
