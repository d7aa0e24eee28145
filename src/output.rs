//! JSON document writers for the export directory.
//!
//! `messages.json` and `profiles.json` are pretty-printed with tab
//! indentation so they stay diffable and readable in any editor.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::Result;
use crate::message::Message;
use crate::snowflake::Snowflake;

/// File name of the message history document.
pub const MESSAGES_FILE: &str = "messages.json";

/// File name of the author name document.
pub const PROFILES_FILE: &str = "profiles.json";

/// Serializes `value` as tab-indented JSON into `writer`.
pub fn write_pretty<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> Result<()> {
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut serializer = Serializer::with_formatter(writer, formatter);
    value.serialize(&mut serializer)?;
    Ok(())
}

/// Converts `value` to a tab-indented JSON string.
pub fn to_pretty_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    write_pretty(&mut buf, value)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Writes `value` as tab-indented JSON to `path`, replacing any existing file.
pub fn write_json_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Writes the chronological message list to `<dir>/messages.json`.
///
/// # Format
/// ```json
/// [
/// 	{"id": "1", "author": {...}, "content": "first"},
/// 	{"id": "2", "author": {...}, "content": "second"}
/// ]
/// ```
pub fn write_messages(dir: &Path, messages: &[Message]) -> Result<()> {
    write_json_file(&dir.join(MESSAGES_FILE), messages)
}

/// Writes the author id → display name map to `<dir>/profiles.json`.
pub fn write_profiles(dir: &Path, profiles: &BTreeMap<Snowflake, String>) -> Result<()> {
    write_json_file(&dir.join(PROFILES_FILE), profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_tab_indentation() {
        let json = to_pretty_string(&vec![1, 2]).unwrap();
        assert_eq!(json, "[\n\t1,\n\t2\n]");
    }

    #[test]
    fn test_write_messages() {
        let dir = tempdir().unwrap();
        let messages = vec![Message::new(1u64, 9u64, "first"), Message::new(2u64, 9u64, "second")];

        write_messages(dir.path(), &messages).unwrap();

        let content = std::fs::read_to_string(dir.path().join(MESSAGES_FILE)).unwrap();
        assert!(content.starts_with("[\n\t{"));
        assert!(content.contains("\"content\": \"first\""));
        let parsed: Vec<Message> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, messages);
    }

    #[test]
    fn test_write_profiles_keys_are_strings() {
        let dir = tempdir().unwrap();
        let mut profiles = BTreeMap::new();
        profiles.insert(Snowflake::new(300), "Bob".to_string());

        write_profiles(dir.path(), &profiles).unwrap();

        let content = std::fs::read_to_string(dir.path().join(PROFILES_FILE)).unwrap();
        assert_eq!(content, "{\n\t\"300\": \"Bob\"\n}");
    }

    #[test]
    fn test_empty_documents() {
        let dir = tempdir().unwrap();
        write_messages(dir.path(), &[]).unwrap();
        write_profiles(dir.path(), &BTreeMap::new()).unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join(MESSAGES_FILE)).unwrap(), "[]");
        assert_eq!(std::fs::read_to_string(dir.path().join(PROFILES_FILE)).unwrap(), "{}");
    }
}
