use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use podcast_feed::config::PodcastFile;
use podcast_feed::feed::{BufferPool, Feed, FeedError, WriteOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Render in memory, then write once
    Whole,
    /// Render in memory with a size hint and/or pooled buffer
    Buffered,
    /// Write each element as it is produced
    Stream,
}

#[derive(Parser, Debug)]
#[command(
    name = "podcast-feed",
    about = "Generate an RSS 2.0 podcast feed from a TOML or JSON description"
)]
struct Args {
    /// Podcast description file (.toml or .json)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Write the feed to FILE instead of stdout (replaced atomically)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Serialization strategy
    #[arg(long, value_enum, default_value_t = Strategy::Whole)]
    strategy: Strategy,

    /// Render into the shared buffer pool (buffered strategy)
    #[arg(long)]
    pool: bool,

    /// Pre-size the render buffer to N bytes (buffered strategy)
    #[arg(long, value_name = "N")]
    buffer_size: Option<usize>,
}

impl Args {
    fn write_options(&self) -> WriteOptions<'static> {
        let mut options = WriteOptions::new();
        if self.pool {
            options = options.pool(BufferPool::global());
        }
        if let Some(bytes) = self.buffer_size {
            options = options.buffer_size(bytes);
        }
        options
    }
}

fn render<W: Write>(feed: &Feed<'_>, args: &Args, sink: W) -> Result<(), FeedError> {
    tracing::debug!(strategy = ?args.strategy, "Serializing feed");
    match args.strategy {
        Strategy::Whole => feed.write_to(sink),
        Strategy::Buffered => feed.write_with_options(sink, &args.write_options()),
        Strategy::Stream => feed.stream_to(sink),
    }
}

/// Write a file using the write-to-temp-then-rename pattern.
/// The destination is never left holding a partial feed.
fn write_atomic(
    dst: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> Result<(), FeedError>,
) -> Result<()> {
    // Randomized temp filename so the path cannot be predicted and pre-created
    use std::time::{SystemTime, UNIX_EPOCH};
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = dst.with_extension(format!("tmp.{:016x}", random_suffix));

    let file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true) // Fails if the path exists (prevents symlink race)
        .open(&temp_path)
        .with_context(|| {
            format!(
                "Failed to create temporary file '{}': check directory permissions",
                temp_path.display()
            )
        })?;

    let mut writer = BufWriter::new(file);
    write(&mut writer).with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!("Failed to write feed to '{}'", temp_path.display())
    })?;

    let file = writer.into_inner().map_err(|e| e.into_error()).with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to flush temporary file '{}': disk may be full",
            temp_path.display()
        )
    })?;

    file.sync_all().with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to sync temporary file '{}' to disk",
            temp_path.display()
        )
    })?;

    drop(file);

    // On Windows, rename fails if destination exists, so remove it first
    #[cfg(windows)]
    if dst.exists() {
        std::fs::remove_file(dst).with_context(|| {
            let _ = std::fs::remove_file(&temp_path);
            format!(
                "Failed to remove existing '{}' before atomic replace",
                dst.display()
            )
        })?;
    }

    std::fs::rename(&temp_path, dst).with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to rename '{}' to '{}'",
            temp_path.display(),
            dst.display()
        )
    })?;

    Ok(())
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the feed
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.strategy != Strategy::Buffered && (args.pool || args.buffer_size.is_some()) {
        tracing::warn!(
            strategy = ?args.strategy,
            "--pool and --buffer-size only apply to the buffered strategy, ignoring"
        );
    }

    let file = PodcastFile::load(&args.input)
        .with_context(|| format!("Failed to load podcast file '{}'", args.input.display()))?;

    let options = file.feed_options();
    let categories = file.categories().to_vec();
    let podcast = file.into_podcast();

    let mut feed = podcast.feed(&options).context("Failed to build feed")?;
    feed.channel_mut().categories = categories;

    match &args.output {
        Some(path) => {
            write_atomic(path, |sink| render(&feed, &args, sink))?;
            tracing::info!(
                path = %path.display(),
                episodes = feed.episode_count(),
                "Wrote feed"
            );
        }
        None => {
            let stdout = std::io::stdout().lock();
            render(&feed, &args, BufWriter::new(stdout)).context("Failed to write feed to stdout")?;
        }
    }

    Ok(())
}
