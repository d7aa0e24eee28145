//! Asset materialization.
//!
//! Turns collected [`References`] into files on disk:
//!
//! | Kind | Source URL | Path |
//! |------|------------|------|
//! | emoji | `<emoji cdn>/<id>.webp` | `emojis/<id>.webp` |
//! | sticker | `<sticker cdn>/<id>.webp` | `stickers/<id>.webp` |
//! | attachment | `url` from the message | `attachments/<id>.<subtype>` |
//!
//! Downloads run one at a time and stream straight to the target file. The
//! first failed transfer aborts the run; files written before it stay.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::CdnConfig;
use crate::error::Result;
use crate::gateway::Downloader;
use crate::progress::{Progress, ProgressCallback, Stage};
use crate::references::{AttachmentRef, References};
use crate::snowflake::Snowflake;

/// Extension used for CDN emoji and sticker images.
const CDN_IMAGE_EXTENSION: &str = "webp";

/// The three kinds of downloadable asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKind {
    Emoji,
    Sticker,
    Attachment,
}

impl AssetKind {
    /// All kinds, in download order.
    pub const ALL: [AssetKind; 3] = [AssetKind::Emoji, AssetKind::Sticker, AssetKind::Attachment];

    /// Subdirectory of the export holding this kind.
    pub fn dir_name(self) -> &'static str {
        match self {
            AssetKind::Emoji => "emojis",
            AssetKind::Sticker => "stickers",
            AssetKind::Attachment => "attachments",
        }
    }

    /// Progress stage reported while downloading this kind.
    pub fn stage(self) -> Stage {
        match self {
            AssetKind::Emoji => Stage::Emojis,
            AssetKind::Sticker => Stage::Stickers,
            AssetKind::Attachment => Stage::Attachments,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetKind::Emoji => "emoji",
            AssetKind::Sticker => "sticker",
            AssetKind::Attachment => "attachment",
        };
        f.write_str(name)
    }
}

/// One file to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub id: Snowflake,
    pub kind: AssetKind,
    pub url: String,
    /// File extension without the dot.
    pub extension: Option<String>,
}

impl AssetRef {
    /// A custom emoji image from the CDN.
    pub fn emoji(id: Snowflake, cdn: &CdnConfig) -> Self {
        Self {
            id,
            kind: AssetKind::Emoji,
            url: cdn.emoji_url(id),
            extension: Some(CDN_IMAGE_EXTENSION.to_string()),
        }
    }

    /// A sticker image from the media CDN.
    pub fn sticker(id: Snowflake, cdn: &CdnConfig) -> Self {
        Self {
            id,
            kind: AssetKind::Sticker,
            url: cdn.sticker_url(id),
            extension: Some(CDN_IMAGE_EXTENSION.to_string()),
        }
    }

    /// A message attachment, downloaded from its own URL.
    pub fn attachment(id: Snowflake, attachment: &AttachmentRef) -> Self {
        Self {
            id,
            kind: AssetKind::Attachment,
            url: attachment.url.clone(),
            extension: attachment_extension(
                attachment.content_type.as_deref(),
                attachment.filename.as_deref(),
            ),
        }
    }

    /// `<id>.<ext>`, or just `<id>` when there is no extension.
    pub fn file_name(&self) -> String {
        match &self.extension {
            Some(ext) => format!("{}.{}", self.id, ext),
            None => self.id.to_string(),
        }
    }

    /// Target path below the export directory.
    pub fn path_in(&self, export_dir: &Path) -> PathBuf {
        export_dir.join(self.kind.dir_name()).join(self.file_name())
    }
}

/// File extension for an attachment.
///
/// Uses the MIME subtype (text after the last `/`, parameters dropped), then
/// the filename's extension, then nothing.
///
/// ```
/// use chatdump::assets::attachment_extension;
///
/// assert_eq!(attachment_extension(Some("image/png"), None).as_deref(), Some("png"));
/// assert_eq!(attachment_extension(None, Some("notes.txt")).as_deref(), Some("txt"));
/// assert_eq!(attachment_extension(None, None), None);
/// ```
pub fn attachment_extension(content_type: Option<&str>, filename: Option<&str>) -> Option<String> {
    let from_mime = content_type
        .and_then(|mime| mime.split(';').next())
        .and_then(|essence| essence.rsplit('/').next())
        .map(str::trim)
        .filter(|subtype| !subtype.is_empty());

    let from_name = || {
        filename
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
    };

    from_mime.or_else(from_name).map(str::to_string)
}

/// Download list for one asset kind.
pub fn plan(kind: AssetKind, refs: &References, cdn: &CdnConfig) -> Vec<AssetRef> {
    match kind {
        AssetKind::Emoji => refs.emojis.iter().map(|&id| AssetRef::emoji(id, cdn)).collect(),
        AssetKind::Sticker => refs
            .stickers
            .iter()
            .map(|&id| AssetRef::sticker(id, cdn))
            .collect(),
        AssetKind::Attachment => refs
            .attachments
            .iter()
            .map(|(&id, attachment)| AssetRef::attachment(id, attachment))
            .collect(),
    }
}

/// Files and bytes written per asset kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetCounts {
    pub emojis: usize,
    pub stickers: usize,
    pub attachments: usize,
    pub bytes: u64,
}

impl AssetCounts {
    /// Files written for `kind`.
    pub fn files(&self, kind: AssetKind) -> usize {
        match kind {
            AssetKind::Emoji => self.emojis,
            AssetKind::Sticker => self.stickers,
            AssetKind::Attachment => self.attachments,
        }
    }

    fn merge(&mut self, other: &Self) {
        self.emojis += other.emojis;
        self.stickers += other.stickers;
        self.attachments += other.attachments;
        self.bytes += other.bytes;
    }

    fn record(&mut self, kind: AssetKind, bytes: u64) {
        match kind {
            AssetKind::Emoji => self.emojis += 1,
            AssetKind::Sticker => self.stickers += 1,
            AssetKind::Attachment => self.attachments += 1,
        }
        self.bytes += bytes;
    }
}

/// Downloads a list of assets of the same kind into `export_dir`.
///
/// The kind's subdirectory is created even when the list is empty.
pub fn download_assets<D: Downloader + ?Sized>(
    downloader: &D,
    kind: AssetKind,
    assets: &[AssetRef],
    export_dir: &Path,
    progress: &ProgressCallback,
) -> Result<AssetCounts> {
    fs::create_dir_all(export_dir.join(kind.dir_name()))?;
    info!("Collected {} {}s", assets.len(), kind);

    let mut counts = AssetCounts::default();
    for (index, asset) in assets.iter().enumerate() {
        let bytes = download_one(downloader, asset, export_dir)?;
        counts.record(asset.kind, bytes);

        info!(
            "Downloaded {} ({}/{}) '{}'",
            asset.kind,
            index + 1,
            assets.len(),
            asset.id
        );
        progress(
            Progress::new(kind.stage(), index + 1)
                .with_total(assets.len())
                .with_detail(asset.url.clone()),
        );
    }

    Ok(counts)
}

/// Downloads every emoji, sticker and attachment in `refs`.
pub fn materialize<D: Downloader + ?Sized>(
    downloader: &D,
    refs: &References,
    cdn: &CdnConfig,
    export_dir: &Path,
    progress: &ProgressCallback,
) -> Result<AssetCounts> {
    let mut total = AssetCounts::default();
    for kind in AssetKind::ALL {
        let assets = plan(kind, refs, cdn);
        let counts = download_assets(downloader, kind, &assets, export_dir, progress)?;
        total.merge(&counts);
    }
    Ok(total)
}

fn download_one<D: Downloader + ?Sized>(
    downloader: &D,
    asset: &AssetRef,
    export_dir: &Path,
) -> Result<u64> {
    let path = asset.path_in(export_dir);
    let mut writer = BufWriter::new(File::create(&path)?);
    let result = downloader
        .download(&asset.url, &mut writer)
        .and_then(|bytes| {
            writer.flush()?;
            Ok(bytes)
        });

    if result.is_err() {
        // Partial or empty bodies never stay on disk.
        drop(writer);
        if let Err(e) = fs::remove_file(&path) {
            warn!("Could not remove {}: {}", path.display(), e);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::progress::no_progress;
    use std::cell::RefCell;
    use tempfile::tempdir;

    /// Writes the URL itself as the file body. URLs containing "fail" break
    /// off after a few bytes.
    #[derive(Default)]
    struct EchoDownloader {
        urls: RefCell<Vec<String>>,
    }

    impl Downloader for EchoDownloader {
        fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64> {
            self.urls.borrow_mut().push(url.to_string());
            if url.contains("fail") {
                sink.write_all(b"partial")?;
                return Err(ExportError::download(url, 404));
            }
            sink.write_all(url.as_bytes())?;
            Ok(url.len() as u64)
        }
    }

    fn attachment(url: &str, content_type: Option<&str>) -> AttachmentRef {
        AttachmentRef {
            url: url.to_string(),
            content_type: content_type.map(str::to_string),
            filename: None,
        }
    }

    #[test]
    fn test_attachment_extension_from_mime() {
        assert_eq!(attachment_extension(Some("video/mp4"), None).as_deref(), Some("mp4"));
        assert_eq!(
            attachment_extension(Some("text/plain; charset=utf-8"), Some("a.log")).as_deref(),
            Some("plain")
        );
        assert_eq!(
            attachment_extension(Some("image/svg+xml"), None).as_deref(),
            Some("svg+xml")
        );
    }

    #[test]
    fn test_attachment_extension_fallbacks() {
        assert_eq!(attachment_extension(None, Some("clip.webm")).as_deref(), Some("webm"));
        assert_eq!(attachment_extension(None, Some("README")), None);
        assert_eq!(attachment_extension(Some(""), Some("x.gz")).as_deref(), Some("gz"));
    }

    #[test]
    fn test_asset_paths() {
        let cdn = CdnConfig::new();
        let dir = Path::new("/out/chan");

        let emoji = AssetRef::emoji(Snowflake::new(1), &cdn);
        assert_eq!(emoji.path_in(dir), PathBuf::from("/out/chan/emojis/1.webp"));

        let sticker = AssetRef::sticker(Snowflake::new(2), &cdn);
        assert_eq!(sticker.url, "https://media.discordapp.net/stickers/2.webp");
        assert_eq!(sticker.path_in(dir), PathBuf::from("/out/chan/stickers/2.webp"));

        let file = AssetRef::attachment(Snowflake::new(3), &attachment("https://x/3", None));
        assert_eq!(file.path_in(dir), PathBuf::from("/out/chan/attachments/3"));
    }

    #[test]
    fn test_materialize_writes_files() {
        let dir = tempdir().unwrap();
        let mut refs = References::default();
        refs.emojis.insert(Snowflake::new(11));
        refs.stickers.insert(Snowflake::new(22));
        refs.attachments.insert(
            Snowflake::new(33),
            attachment("https://cdn.discordapp.com/attachments/1/33/a.png", Some("image/png")),
        );

        let downloader = EchoDownloader::default();
        let counts = materialize(&downloader, &refs, &CdnConfig::new(), dir.path(), &no_progress())
            .unwrap();

        assert_eq!((counts.emojis, counts.stickers, counts.attachments), (1, 1, 1));
        let body = fs::read_to_string(dir.path().join("emojis/11.webp")).unwrap();
        assert_eq!(body, "https://cdn.discordapp.com/emojis/11.webp");
        assert!(dir.path().join("stickers/22.webp").exists());
        assert!(dir.path().join("attachments/33.png").exists());
        assert_eq!(counts.bytes, downloader.urls.borrow().iter().map(|u| u.len() as u64).sum::<u64>());
    }

    #[test]
    fn test_empty_refs_still_create_dirs() {
        let dir = tempdir().unwrap();
        let counts = materialize(
            &EchoDownloader::default(),
            &References::default(),
            &CdnConfig::new(),
            dir.path(),
            &no_progress(),
        )
        .unwrap();

        assert_eq!(counts, AssetCounts::default());
        for kind in AssetKind::ALL {
            assert!(dir.path().join(kind.dir_name()).is_dir());
        }
    }

    #[test]
    fn test_failed_download_aborts() {
        let dir = tempdir().unwrap();
        let mut refs = References::default();
        refs.attachments.insert(Snowflake::new(1), attachment("https://x/fail", Some("image/png")));
        refs.attachments.insert(Snowflake::new(2), attachment("https://x/ok", Some("image/png")));

        let downloader = EchoDownloader::default();
        let err = materialize(&downloader, &refs, &CdnConfig::new(), dir.path(), &no_progress())
            .unwrap_err();

        assert!(err.is_download());
        // Attachment 2 is never requested
        assert_eq!(*downloader.urls.borrow(), vec!["https://x/fail".to_string()]);
        assert!(!dir.path().join("attachments/1.png").exists());
        assert!(!dir.path().join("attachments/2.png").exists());
    }

    #[test]
    fn test_counts_per_kind() {
        let mut counts = AssetCounts::default();
        counts.record(AssetKind::Emoji, 3);
        counts.record(AssetKind::Emoji, 4);
        counts.record(AssetKind::Attachment, 10);

        assert_eq!(counts.files(AssetKind::Emoji), 2);
        assert_eq!(counts.files(AssetKind::Sticker), 0);
        assert_eq!(counts.files(AssetKind::Attachment), 1);
        assert_eq!(counts.bytes, 17);
    }
}
