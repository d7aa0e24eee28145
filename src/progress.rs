//! Progress reporting for export runs.
//!
//! The export pipeline pushes a [`Progress`] value to a callback after every
//! unit of work: each message page, each resolved profile, each downloaded
//! asset. Library users pick what to do with it; the CLI prints one line per
//! update.
//!
//! # Example
//!
//! ```rust
//! use chatdump::progress::{Progress, ProgressCallback, Stage};
//! use std::sync::Arc;
//!
//! let callback: ProgressCallback = Arc::new(|progress| {
//!     if let Some(pct) = progress.percentage() {
//!         println!("{}: {:.1}%", progress.stage, pct);
//!     }
//! });
//!
//! for i in 0..4usize {
//!     callback(Progress::new(Stage::Emojis, i + 1).with_total(4));
//! }
//! ```

use std::fmt;
use std::sync::Arc;

/// The pipeline stage a progress update belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    #[default]
    Channel,
    Messages,
    Profiles,
    Emojis,
    Stickers,
    Attachments,
}

impl Stage {
    /// Singular noun for the items processed in this stage.
    pub fn item_name(self) -> &'static str {
        match self {
            Stage::Channel => "channel",
            Stage::Messages => "message",
            Stage::Profiles => "profile",
            Stage::Emojis => "emoji",
            Stage::Stickers => "sticker",
            Stage::Attachments => "attachment",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Channel => "Channel",
            Stage::Messages => "Messages",
            Stage::Profiles => "Profiles",
            Stage::Emojis => "Emojis",
            Stage::Stickers => "Stickers",
            Stage::Attachments => "Attachments",
        };
        f.write_str(name)
    }
}

/// A single progress update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Progress {
    /// Stage the update belongs to.
    pub stage: Stage,

    /// Items processed so far in this stage.
    pub current: usize,

    /// Total items in this stage, if known. Message history has no known total.
    pub total: Option<usize>,

    /// Id, URL or name of the item just processed.
    pub detail: Option<String>,
}

impl Progress {
    /// Creates a new progress instance.
    pub fn new(stage: Stage, current: usize) -> Self {
        Self {
            stage,
            current,
            total: None,
            detail: None,
        }
    }

    /// Sets the total item count.
    #[must_use]
    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    /// Attaches a description of the item just processed.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Returns the progress as a percentage (0.0 - 100.0).
    ///
    /// Returns `None` if the total is not known.
    ///
    /// ```rust
    /// use chatdump::progress::{Progress, Stage};
    ///
    /// assert_eq!(Progress::new(Stage::Profiles, 5).with_total(10).percentage(), Some(50.0));
    /// assert_eq!(Progress::new(Stage::Messages, 5).percentage(), None);
    /// ```
    pub fn percentage(&self) -> Option<f64> {
        self.total.map(|total| {
            if total == 0 {
                100.0
            } else {
                (self.current as f64 / total as f64) * 100.0
            }
        })
    }

    /// Returns whether the stage is complete. Unknown totals never complete.
    pub fn is_complete(&self) -> bool {
        self.total.is_some_and(|total| self.current >= total)
    }
}

/// Callback type for receiving progress updates.
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// Creates a no-op progress callback.
pub fn no_progress() -> ProgressCallback {
    Arc::new(|_| {})
}

/// Creates a progress callback that prints `+-- ` lines to stderr.
pub fn stderr_progress() -> ProgressCallback {
    Arc::new(|progress| {
        let detail = progress.detail.as_deref().unwrap_or_default();
        match progress.total {
            Some(total) => eprintln!(
                "+-- {} ({}/{}) '{}'",
                progress.stage.item_name(),
                progress.current,
                total,
                detail
            ),
            None => eprintln!("+-- {} {} {}", progress.current, progress.stage, detail),
        }
    })
}
