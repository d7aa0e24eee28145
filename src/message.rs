//! Raw Discord message records.
//!
//! A [`Message`] owns the JSON object the API returned and serializes exactly
//! that object back, so `messages.json` keeps every key, every explicit
//! `null` and the original key order.
//!
//! The handful of fields the exporter reads (id, author, content,
//! attachments, reactions, sticker items) are decoded once when the record is
//! parsed and exposed through read-only accessors. Missing lists read as
//! empty.
//!
//! # Example
//!
//! ```
//! use chatdump::Message;
//!
//! let msg: Message = serde_json::from_str(r#"{
//!     "id": "1000",
//!     "type": 0,
//!     "author": {"id": "7", "username": "alice"},
//!     "content": "hi <:wave:42>",
//!     "pinned": false
//! }"#)?;
//!
//! assert_eq!(msg.id().get(), 1000);
//! assert_eq!(msg.author_id().get(), 7);
//! assert!(msg.reactions().is_empty());
//! assert_eq!(msg.raw()["pinned"], false);
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::snowflake::Snowflake;

/// A message record as returned by `GET /channels/{id}/messages`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Message {
    id: Snowflake,
    author: Author,
    content: String,
    attachments: Vec<Attachment>,
    reactions: Vec<Reaction>,
    sticker_items: Vec<StickerItem>,
    raw: Map<String, Value>,
}

/// The `author` object of a message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Author {
    pub id: Snowflake,
}

/// One entry of a message's `attachments` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Attachment {
    pub id: Snowflake,

    /// Direct download URL.
    pub url: String,

    /// MIME type, e.g. `image/png`. Absent or null for some legacy uploads.
    #[serde(default)]
    pub content_type: Option<String>,

    #[serde(default)]
    pub filename: Option<String>,
}

/// One entry of a message's `reactions` list.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Reaction {
    #[serde(default)]
    pub emoji: ReactionEmoji,
}

/// The emoji of a reaction. Built-in unicode emoji have no id.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ReactionEmoji {
    #[serde(default)]
    pub id: Option<Snowflake>,
}

/// One entry of a message's `sticker_items` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StickerItem {
    #[serde(default)]
    pub id: Option<Snowflake>,
}

/// Fields decoded from the raw record.
#[derive(Deserialize)]
struct Fields {
    id: Snowflake,
    author: Author,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    attachments: Option<Vec<Attachment>>,
    #[serde(default)]
    reactions: Option<Vec<Reaction>>,
    #[serde(default)]
    sticker_items: Option<Vec<StickerItem>>,
}

impl TryFrom<Value> for Message {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let fields = Fields::deserialize(&value)?;
        let Value::Object(raw) = value else {
            return Err(serde_json::Error::custom("message record is not an object"));
        };

        Ok(Self {
            id: fields.id,
            author: fields.author,
            content: fields.content.unwrap_or_default(),
            attachments: fields.attachments.unwrap_or_default(),
            reactions: fields.reactions.unwrap_or_default(),
            sticker_items: fields.sticker_items.unwrap_or_default(),
            raw,
        })
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl Message {
    /// Creates a bare message, mostly useful for tests and fixtures.
    pub fn new(id: impl Into<Snowflake>, author: impl Into<Snowflake>, content: impl Into<String>) -> Self {
        let id = id.into();
        let author = Author { id: author.into() };
        let content = content.into();

        let mut raw = Map::new();
        raw.insert("id".to_string(), json!(id.to_string()));
        raw.insert("author".to_string(), json!({ "id": author.id.to_string() }));
        raw.insert("content".to_string(), json!(content));

        Self {
            id,
            author,
            content,
            attachments: Vec::new(),
            reactions: Vec::new(),
            sticker_items: Vec::new(),
            raw,
        }
    }

    /// Message id; monotonic with send time.
    pub fn id(&self) -> Snowflake {
        self.id
    }

    /// Id of the author.
    pub fn author_id(&self) -> Snowflake {
        self.author.id
    }

    /// Text content, empty when absent. May embed markup such as `<:name:id>`.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Attachments, or an empty slice when the key was absent.
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Reactions, or an empty slice when the key was absent.
    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    /// Sticker items, or an empty slice when the key was absent.
    pub fn sticker_items(&self) -> &[StickerItem] {
        &self.sticker_items
    }

    /// The record exactly as received.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Adds a reaction. `None` models a built-in unicode emoji.
    #[must_use]
    pub fn with_reaction(mut self, emoji_id: Option<u64>) -> Self {
        let id = emoji_id.map(Snowflake::new);
        self.push_raw(
            "reactions",
            json!({ "emoji": { "id": id.map(|id| id.to_string()) }, "count": 1 }),
        );
        self.reactions.push(Reaction {
            emoji: ReactionEmoji { id },
        });
        self
    }

    /// Adds a sticker item.
    #[must_use]
    pub fn with_sticker(mut self, sticker_id: Option<u64>) -> Self {
        let id = sticker_id.map(Snowflake::new);
        self.push_raw("sticker_items", json!({ "id": id.map(|id| id.to_string()) }));
        self.sticker_items.push(StickerItem { id });
        self
    }

    /// Adds an attachment.
    #[must_use]
    pub fn with_attachment(
        mut self,
        id: u64,
        url: impl Into<String>,
        content_type: Option<&str>,
    ) -> Self {
        let url = url.into();
        self.push_raw(
            "attachments",
            json!({ "id": id.to_string(), "url": url, "content_type": content_type }),
        );
        self.attachments.push(Attachment {
            id: Snowflake::new(id),
            url,
            content_type: content_type.map(str::to_string),
            filename: None,
        });
        self
    }

    fn push_raw(&mut self, key: &str, item: Value) {
        match self
            .raw
            .entry(key)
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(items) => items.push(item),
            other => *other = Value::Array(vec![item]),
        }
    }
}
