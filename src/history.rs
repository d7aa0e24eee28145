//! Channel history walker.
//!
//! The API returns at most one page of messages per call, newest first. The
//! walker seeds with the page around the channel id, then keeps asking for
//! the page after the newest id it has seen until the API returns an empty
//! page. Each page is reversed before it is appended so
//! the accumulated list stays in chronological order.

use tracing::info;

use crate::error::Result;
use crate::gateway::{Gateway, PageCursor};
use crate::message::Message;
use crate::progress::{Progress, ProgressCallback, Stage};
use crate::snowflake::Snowflake;

/// Downloads the complete history of `channel`, oldest message first.
pub fn fetch_history<G: Gateway + ?Sized>(
    gateway: &G,
    channel: Snowflake,
    progress: &ProgressCallback,
) -> Result<Vec<Message>> {
    let mut all_messages = Vec::new();

    let mut cursor = PageCursor::Around(channel);
    loop {
        let page = gateway.messages(channel, cursor)?;
        info!("Loaded {} messages {}", page.len(), cursor);

        // Pages arrive newest-first; the head is the next anchor.
        let Some(newest) = page.first().map(Message::id) else {
            break;
        };

        all_messages.extend(page.into_iter().rev());
        progress(
            Progress::new(Stage::Messages, all_messages.len()).with_detail(newest.to_string()),
        );

        cursor = PageCursor::After(newest);
    }

    Ok(all_messages)
}
