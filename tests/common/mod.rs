//! In-memory stand-in for the Discord API and CDN.
//!
//! Pages behave like the real endpoints: at most `page_size` messages,
//! newest first. `around` splits the page on both sides of the anchor, so
//! anchoring on the channel id (older than every message) yields the oldest
//! page.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;

use chatdump::gateway::{ChannelInfo, Downloader, Gateway, PageCursor};
use chatdump::profiles::Profile;
use chatdump::{ExportError, Message, Result, Snowflake};

pub const CHANNEL: u64 = 1_000;
pub const GUILD: u64 = 500;

/// One recorded call against the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ChannelInfo(Snowflake),
    Messages(PageCursor),
    Profile(Snowflake, Option<Snowflake>),
    Download(String),
}

pub struct FakeDiscord {
    pub channel: ChannelInfo,
    /// All messages, oldest first.
    pub messages: Vec<Message>,
    pub page_size: usize,
    pub profiles: HashMap<Snowflake, Profile>,
    pub files: HashMap<String, Vec<u8>>,
    /// Index of the call (0-based) that fails with status 500.
    pub fail_at: Option<usize>,
    pub calls: RefCell<Vec<Call>>,
}

impl FakeDiscord {
    pub fn new(messages: Vec<Message>) -> Self {
        let mut channel = ChannelInfo::new(CHANNEL, Some(Snowflake::new(GUILD)));
        channel.name = Some("general".to_string());
        Self {
            channel,
            messages,
            page_size: 100,
            profiles: HashMap::new(),
            files: HashMap::new(),
            fail_at: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    pub fn with_profile(mut self, user: u64, profile: Profile) -> Self {
        self.profiles.insert(Snowflake::new(user), profile);
        self
    }

    pub fn with_file(mut self, url: &str, body: &[u8]) -> Self {
        self.files.insert(url.to_string(), body.to_vec());
        self
    }

    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|&c| pred(c)).count()
    }

    fn record(&self, call: Call) -> Result<()> {
        let mut calls = self.calls.borrow_mut();
        calls.push(call);
        if self.fail_at == Some(calls.len() - 1) {
            return Err(ExportError::api(500, "{\"message\": \"simulated failure\"}"));
        }
        Ok(())
    }

    fn page(&self, cursor: PageCursor) -> Vec<Message> {
        let anchor = cursor.anchor();
        let split = self.messages.partition_point(|m| m.id() < anchor);
        let (start, end) = match cursor {
            PageCursor::After(_) => {
                let start = self
                    .messages
                    .partition_point(|m| m.id() <= anchor);
                (start, (start + self.page_size).min(self.messages.len()))
            }
            PageCursor::Around(_) => {
                let start = split.saturating_sub(self.page_size / 2);
                (start, (start + self.page_size).min(self.messages.len()))
            }
        };
        self.messages[start..end].iter().rev().cloned().collect()
    }
}

impl Gateway for FakeDiscord {
    fn channel_info(&self, channel: Snowflake) -> Result<ChannelInfo> {
        self.record(Call::ChannelInfo(channel))?;
        Ok(self.channel.clone())
    }

    fn messages(&self, _channel: Snowflake, cursor: PageCursor) -> Result<Vec<Message>> {
        self.record(Call::Messages(cursor))?;
        Ok(self.page(cursor))
    }

    fn user_profile(&self, user: Snowflake, guild: Option<Snowflake>) -> Result<Profile> {
        self.record(Call::Profile(user, guild))?;
        self.profiles
            .get(&user)
            .cloned()
            .ok_or_else(|| ExportError::api(404, "{\"message\": \"Unknown User\"}"))
    }
}

impl Downloader for FakeDiscord {
    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64> {
        self.record(Call::Download(url.to_string()))?;
        let body = self
            .files
            .get(url)
            .ok_or_else(|| ExportError::download(url, 404))?;
        sink.write_all(body)?;
        Ok(body.len() as u64)
    }
}

/// Messages with ids `first..first + count`, authored round-robin by `authors`.
pub fn history(first: u64, count: u64, authors: &[u64]) -> Vec<Message> {
    (0..count)
        .map(|i| {
            let author = authors[(i as usize) % authors.len()];
            Message::new(first + i, author, format!("message {i}"))
        })
        .collect()
}

/// Default profile for a user with only a username.
pub fn plain_profile(user: u64) -> Profile {
    Profile::new(format!("user{user}"), None, Some(None))
}
