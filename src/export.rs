//! Export orchestration.
//!
//! [`Exporter::run`] drives one export end to end:
//!
//! 1. fetch channel metadata (for the guild id)
//! 2. walk the full message history
//! 3. collect author, emoji, sticker and attachment references
//! 4. resolve author display names
//! 5. write `messages.json` and `profiles.json`
//! 6. download emojis, stickers and attachments
//!
//! Every step runs sequentially and the first error aborts the run. Nothing is
//! cleaned up afterwards; a failed run leaves whatever it wrote so far.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::assets::{AssetCounts, materialize};
use crate::config::CdnConfig;
use crate::error::{ExportError, Result};
use crate::gateway::{ChannelInfo, Downloader, Gateway};
use crate::history::fetch_history;
use crate::message::Message;
use crate::output::{write_messages, write_profiles};
use crate::profiles::resolve_names;
use crate::progress::{Progress, ProgressCallback, Stage, no_progress};
use crate::references::collect_references;
use crate::snowflake::Snowflake;

/// What an export run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Directory holding the export.
    pub directory: PathBuf,
    pub channel: ChannelInfo,
    pub messages: usize,
    pub authors: usize,
    pub assets: AssetCounts,
    /// Oldest exported message.
    pub first_message: Option<Snowflake>,
    /// Newest exported message.
    pub last_message: Option<Snowflake>,
}

/// Sequences one channel export over a gateway and a downloader.
pub struct Exporter<'a, G: ?Sized, D: ?Sized> {
    gateway: &'a G,
    downloader: &'a D,
    cdn: CdnConfig,
    progress: ProgressCallback,
}

impl<'a, G, D> Exporter<'a, G, D>
where
    G: Gateway + ?Sized,
    D: Downloader + ?Sized,
{
    /// Creates an exporter with default CDN settings and no progress output.
    pub fn new(gateway: &'a G, downloader: &'a D) -> Self {
        Self {
            gateway,
            downloader,
            cdn: CdnConfig::default(),
            progress: no_progress(),
        }
    }

    /// Sets the CDN used for emoji and sticker images.
    #[must_use]
    pub fn with_cdn(mut self, cdn: CdnConfig) -> Self {
        self.cdn = cdn;
        self
    }

    /// Sets the progress callback.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = progress;
        self
    }

    /// Exports `channel` into `export_dir`, creating it if needed.
    pub fn run(&self, channel: Snowflake, export_dir: &Path) -> Result<ExportSummary> {
        fs::create_dir_all(export_dir)?;

        info!("Downloading channel information");
        let channel_info = self.gateway.channel_info(channel)?;
        log_channel(&channel_info);
        (self.progress)(
            Progress::new(Stage::Channel, 1)
                .with_total(1)
                .with_detail(channel_info.name.clone().unwrap_or_else(|| channel.to_string())),
        );

        info!("Downloading channel messages");
        let messages = fetch_history(self.gateway, channel, &self.progress)?;

        let refs = collect_references(&messages);

        info!("Downloading user profiles");
        let names = resolve_names(
            self.gateway,
            &refs.authors,
            channel_info.guild_id,
            &self.progress,
        )?;

        write_messages(export_dir, &messages)?;
        write_profiles(export_dir, &names)?;

        let assets = materialize(
            self.downloader,
            &refs,
            &self.cdn,
            export_dir,
            &self.progress,
        )?;

        info!("Export completed: {}", export_dir.display());
        Ok(ExportSummary {
            directory: export_dir.to_path_buf(),
            channel: channel_info,
            messages: messages.len(),
            authors: names.len(),
            assets,
            first_message: messages.first().map(Message::id),
            last_message: messages.last().map(Message::id),
        })
    }
}

fn log_channel(info: &ChannelInfo) {
    let unknown = || "?".to_string();
    info!("Name: '{}'", info.name.as_deref().unwrap_or("?"));
    info!(
        "Guild: {}",
        info.guild_id.map_or_else(|| "none".to_string(), |id| id.to_string())
    );
    info!(
        "Members: {}",
        info.member_count.map_or_else(unknown, |n| n.to_string())
    );
    info!(
        "Messages: {}",
        info.message_count.map_or_else(unknown, |n| n.to_string())
    );
}

/// Creates `<root>/<name>` for a fresh export.
///
/// The root is created if missing; an existing export directory is an error
/// so earlier exports are never overwritten.
pub fn create_export_dir(root: &Path, name: &str) -> Result<PathBuf> {
    fs::create_dir_all(root)?;
    let dir = root.join(name);
    if dir.exists() {
        return Err(ExportError::OutputExists(dir));
    }
    fs::create_dir(&dir)?;
    Ok(dir)
}
