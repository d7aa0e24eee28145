//! Remote access seams.
//!
//! The pipeline talks to the outside world through two traits:
//!
//! - [`Gateway`] — authenticated Discord API calls (channel info, message
//!   pages, user profiles)
//! - [`Downloader`] — unauthenticated binary transfers from the CDN or from
//!   attachment URLs
//!
//! Both fail uniformly: any non-200 response becomes an
//! [`ExportError::Api`](crate::ExportError::Api) or
//! [`ExportError::Download`](crate::ExportError::Download) and the caller
//! propagates it. [`HttpGateway`] implements both over blocking `reqwest`;
//! tests substitute in-memory implementations.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpGateway, login};

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::message::Message;
use crate::profiles::Profile;
use crate::snowflake::Snowflake;

/// Maximum number of messages the API returns per page.
pub const MESSAGES_PAGE_LIMIT: u8 = 100;

/// Position of a message page relative to an anchor id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageCursor {
    /// Messages centered on the anchor. The channel id predates every message
    /// in it, so anchoring there yields the start of the history.
    Around(Snowflake),
    /// Messages strictly newer than the anchor.
    After(Snowflake),
}

impl PageCursor {
    /// Query parameter name for this cursor.
    pub fn param(&self) -> &'static str {
        match self {
            PageCursor::Around(_) => "around",
            PageCursor::After(_) => "after",
        }
    }

    /// The anchor id.
    pub fn anchor(&self) -> Snowflake {
        match self {
            PageCursor::Around(id) | PageCursor::After(id) => *id,
        }
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.param(), self.anchor())
    }
}

/// Channel metadata from `GET /channels/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: Snowflake,

    /// Owning guild. Absent for direct messages.
    #[serde(default)]
    pub guild_id: Option<Snowflake>,

    #[serde(default)]
    pub name: Option<String>,

    /// Only reported for threads.
    #[serde(default)]
    pub member_count: Option<u64>,

    /// Only reported for threads.
    #[serde(default)]
    pub message_count: Option<u64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChannelInfo {
    /// Creates channel info with only the fields the exporter reads.
    pub fn new(id: impl Into<Snowflake>, guild_id: Option<Snowflake>) -> Self {
        Self {
            id: id.into(),
            guild_id,
            name: None,
            member_count: None,
            message_count: None,
            extra: Map::new(),
        }
    }
}

/// Authenticated access to the Discord API.
///
/// Every call either returns the decoded payload or fails with
/// [`ExportError::Api`](crate::ExportError::Api).
pub trait Gateway {
    /// Fetches channel metadata.
    fn channel_info(&self, channel: Snowflake) -> Result<ChannelInfo>;

    /// Fetches one page (at most [`MESSAGES_PAGE_LIMIT`] messages) of channel
    /// history, newest message first.
    fn messages(&self, channel: Snowflake, cursor: PageCursor) -> Result<Vec<Message>>;

    /// Fetches a user's profile, with guild member data when `guild` is set.
    fn user_profile(&self, user: Snowflake, guild: Option<Snowflake>) -> Result<Profile>;
}

/// Streaming binary transfers.
pub trait Downloader {
    /// Streams the body at `url` into `sink`, returning the number of bytes
    /// written.
    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64>;
}

impl<G: Gateway + ?Sized> Gateway for &G {
    fn channel_info(&self, channel: Snowflake) -> Result<ChannelInfo> {
        (**self).channel_info(channel)
    }

    fn messages(&self, channel: Snowflake, cursor: PageCursor) -> Result<Vec<Message>> {
        (**self).messages(channel, cursor)
    }

    fn user_profile(&self, user: Snowflake, guild: Option<Snowflake>) -> Result<Profile> {
        (**self).user_profile(user, guild)
    }
}

impl<D: Downloader + ?Sized> Downloader for &D {
    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64> {
        (**self).download(url, sink)
    }
}
