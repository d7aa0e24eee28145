//! Configuration types for the API client and export layout.
//!
//! These are plain builder-style structs without any CLI framework
//! dependencies; the binary fills them from command-line flags.
//!
//! - [`ApiConfig`] - API base URL, page size, timeout, user agent
//! - [`CdnConfig`] - Base URLs for emoji and sticker images
//! - [`ExportConfig`] - Output root plus the two above
//!
//! # Example
//!
//! ```rust
//! use chatdump::config::{ApiConfig, ExportConfig};
//!
//! let config = ExportConfig::new()
//!     .with_output_root("./archive")
//!     .with_api(ApiConfig::new().with_timeout_secs(60));
//!
//! assert_eq!(config.api.timeout_secs, 60);
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::gateway::MESSAGES_PAGE_LIMIT;
use crate::snowflake::Snowflake;

/// Default API base URL (Discord API v9).
pub const DEFAULT_API_BASE_URL: &str = "https://discord.com/api/v9";

/// Default base URL for custom emoji images.
pub const DEFAULT_EMOJI_BASE_URL: &str = "https://cdn.discordapp.com/emojis";

/// Default base URL for sticker images.
pub const DEFAULT_STICKER_BASE_URL: &str = "https://media.discordapp.net/stickers";

/// Settings for the Discord API client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Versioned API base URL (default: Discord API v9)
    pub base_url: String,

    /// Messages requested per page (default: 100, the API maximum)
    pub page_limit: u8,

    /// Per-request timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            page_limit: MESSAGES_PAGE_LIMIT,
            timeout_secs: 30,
            user_agent: concat!("chatdump/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the page size, clamped to `1..=100`.
    #[must_use]
    pub fn with_page_limit(mut self, limit: u8) -> Self {
        self.page_limit = limit.clamp(1, MESSAGES_PAGE_LIMIT);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Sets the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }
}

/// CDN locations for emoji and sticker images.
///
/// Both are addressed purely by id: `<base>/<id>.webp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdnConfig {
    pub emoji_base_url: String,
    pub sticker_base_url: String,
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            emoji_base_url: DEFAULT_EMOJI_BASE_URL.to_string(),
            sticker_base_url: DEFAULT_STICKER_BASE_URL.to_string(),
        }
    }
}

impl CdnConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Image URL for a custom emoji.
    ///
    /// ```rust
    /// use chatdump::config::CdnConfig;
    /// use chatdump::Snowflake;
    ///
    /// let url = CdnConfig::new().emoji_url(Snowflake::new(42));
    /// assert_eq!(url, "https://cdn.discordapp.com/emojis/42.webp");
    /// ```
    pub fn emoji_url(&self, id: Snowflake) -> String {
        format!("{}/{}.webp", self.emoji_base_url.trim_end_matches('/'), id)
    }

    /// Image URL for a sticker.
    pub fn sticker_url(&self, id: Snowflake) -> String {
        format!("{}/{}.webp", self.sticker_base_url.trim_end_matches('/'), id)
    }

    /// Sets the emoji base URL.
    #[must_use]
    pub fn with_emoji_base_url(mut self, url: impl Into<String>) -> Self {
        self.emoji_base_url = url.into();
        self
    }

    /// Sets the sticker base URL.
    #[must_use]
    pub fn with_sticker_base_url(mut self, url: impl Into<String>) -> Self {
        self.sticker_base_url = url.into();
        self
    }
}

/// Top-level settings for an export run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory under which each export gets its own folder (default: `./output`)
    pub output_root: PathBuf,

    pub api: ApiConfig,

    pub cdn: CdnConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("./output"),
            api: ApiConfig::default(),
            cdn: CdnConfig::default(),
        }
    }
}

impl ExportConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output root.
    #[must_use]
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Replaces the API settings.
    #[must_use]
    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.api = api;
        self
    }

    /// Replaces the CDN settings.
    #[must_use]
    pub fn with_cdn(mut self, cdn: CdnConfig) -> Self {
        self.cdn = cdn;
        self
    }
}
