//! Reference collection over a message history.
//!
//! A single pass over the messages yields every entity the export needs to
//! resolve or download:
//!
//! - author ids (for profile resolution)
//! - custom emoji ids, from reactions and from `<:name:id>` markup in content
//! - sticker ids
//! - attachments, keyed by attachment id
//!
//! Built-in unicode emoji have a null id and are skipped, as are sticker
//! items without an id. Messages without `attachments`, `reactions` or
//! `sticker_items` simply contribute nothing.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::message::{Attachment, Message};
use crate::snowflake::Snowflake;

/// Inline custom emoji markup: `<:name:id>`, or `<a:name:id>` when animated.
static EMOJI_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<a?:(\w+):([0-9]+)>").unwrap());

/// Extracts custom emoji ids from inline markup in message text.
///
/// Only the numeric id group is kept; ids that overflow 64 bits are ignored.
///
/// ```
/// use chatdump::references::extract_emoji_ids;
///
/// let ids: Vec<u64> = extract_emoji_ids("hi <:wave:123456789012345678> there")
///     .map(|id| id.get())
///     .collect();
/// assert_eq!(ids, vec![123456789012345678]);
/// ```
pub fn extract_emoji_ids(content: &str) -> impl Iterator<Item = Snowflake> + '_ {
    EMOJI_MARKUP
        .captures_iter(content)
        .filter_map(|caps| caps.get(2)?.as_str().parse().ok())
}

/// Download details of an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub url: String,
    pub content_type: Option<String>,
    pub filename: Option<String>,
}

impl From<&Attachment> for AttachmentRef {
    fn from(attachment: &Attachment) -> Self {
        Self {
            url: attachment.url.clone(),
            content_type: attachment.content_type.clone(),
            filename: attachment.filename.clone(),
        }
    }
}

/// Every entity referenced by a message history.
///
/// Sets are ordered so downloads and `profiles.json` come out in a stable
/// order from run to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct References {
    pub authors: BTreeSet<Snowflake>,
    pub emojis: BTreeSet<Snowflake>,
    pub stickers: BTreeSet<Snowflake>,
    pub attachments: BTreeMap<Snowflake, AttachmentRef>,
}

impl References {
    /// Returns `true` if no message referenced anything.
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
            && self.emojis.is_empty()
            && self.stickers.is_empty()
            && self.attachments.is_empty()
    }

    /// Adds everything `message` references.
    pub fn add(&mut self, message: &Message) {
        self.authors.insert(message.author_id());

        self.emojis.extend(
            message
                .reactions()
                .iter()
                .filter_map(|reaction| reaction.emoji.id),
        );
        self.emojis.extend(extract_emoji_ids(message.content()));

        self.stickers
            .extend(message.sticker_items().iter().filter_map(|item| item.id));

        for attachment in message.attachments() {
            self.attachments
                .entry(attachment.id)
                .or_insert_with(|| AttachmentRef::from(attachment));
        }
    }
}

/// Collects the references of every message in one pass.
pub fn collect_references(messages: &[Message]) -> References {
    let mut refs = References::default();
    for message in messages {
        refs.add(message);
    }
    refs
}
