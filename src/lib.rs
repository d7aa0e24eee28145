//! # chatdump
//!
//! A Rust library and CLI for exporting a Discord channel to disk: the full
//! message history, the display names of everyone who posted, and every
//! custom emoji, sticker and attachment the messages reference.
//!
//! ## Overview
//!
//! An export produces one directory:
//!
//! ```text
//! output/<name>/
//! ├── messages.json     raw message records, oldest first, tab-indented
//! ├── profiles.json     author id → display name
//! ├── emojis/<id>.webp
//! ├── stickers/<id>.webp
//! └── attachments/<id>.<ext>
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "http")]
//! # fn main() -> chatdump::Result<()> {
//! use chatdump::config::ApiConfig;
//! use chatdump::export::{Exporter, create_export_dir};
//! use chatdump::gateway::{HttpGateway, login};
//! use chatdump::progress::stderr_progress;
//! use chatdump::Snowflake;
//!
//! let api = ApiConfig::new();
//! let token = login(&api, "me@example.com", "hunter2")?;
//! let gateway = HttpGateway::new(&api, &token)?;
//!
//! let channel = Snowflake::new(381887113391505410);
//! let dir = create_export_dir("./output".as_ref(), "rust-help")?;
//!
//! let summary = Exporter::new(&gateway, &gateway)
//!     .with_progress(stderr_progress())
//!     .run(channel, &dir)?;
//! println!("{} messages exported", summary.messages);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "http"))]
//! # fn main() {}
//! ```
//!
//! ## Module Structure
//!
//! - [`gateway`] — [`Gateway`](gateway::Gateway) and [`Downloader`](gateway::Downloader)
//!   seams, plus the blocking `HttpGateway` (feature `http`)
//! - [`history`] — [`fetch_history`](history::fetch_history), the paginated history walker
//! - [`references`] — [`collect_references`](references::collect_references) over a history
//! - [`profiles`] — [`resolve_names`](profiles::resolve_names) with the nickname rule
//! - [`assets`] — [`materialize`](assets::materialize) for emojis, stickers, attachments
//! - [`export`] — [`Exporter`](export::Exporter), the orchestrator
//! - [`output`] — tab-indented JSON writers
//! - [`config`], [`progress`], [`error`] — configuration, progress callbacks, errors
//! - [`cli`] — CLI types (feature `cli`)

pub mod assets;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod gateway;
pub mod history;
pub mod message;
pub mod output;
pub mod profiles;
pub mod progress;
pub mod references;
pub mod snowflake;

// Re-export the main types at the crate root for convenience
pub use error::{ExportError, Result};
pub use message::Message;
pub use snowflake::Snowflake;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatdump::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Message, Snowflake};

    pub use crate::error::{ExportError, Result};

    pub use crate::config::{ApiConfig, CdnConfig, ExportConfig};

    pub use crate::gateway::{ChannelInfo, Downloader, Gateway, PageCursor};
    #[cfg(feature = "http")]
    pub use crate::gateway::{HttpGateway, login};

    pub use crate::assets::{AssetKind, AssetRef, materialize};
    pub use crate::export::{ExportSummary, Exporter, create_export_dir};
    pub use crate::history::fetch_history;
    pub use crate::profiles::{Profile, resolve_names};
    pub use crate::progress::{Progress, ProgressCallback, Stage, no_progress, stderr_progress};
    pub use crate::references::{References, collect_references, extract_emoji_ids};
}
