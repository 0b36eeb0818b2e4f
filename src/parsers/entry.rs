use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::models::{EntryRecord, LogEntry, MessageBody, ToolUse};
use crate::parsers::deserializers::{deserialize_lenient_bool, deserialize_optional_timestamp};

const RECORD_TYPE_SUMMARY: &str = "summary";
const RECORD_TYPE_USER: &str = "user";
const RECORD_TYPE_ASSISTANT: &str = "assistant";
const SEGMENT_TYPE_TEXT: &str = "text";
const SEGMENT_TYPE_TOOL_USE: &str = "tool_use";

/// Wire shape shared by every line; per-type fields are validated in [`parse_line`]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(rename = "type")]
    record_type: String,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    is_sidechain: bool,
    #[serde(default)]
    cwd: Option<Value>,
    #[serde(default)]
    summary: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    content: RawContent,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawContent {
    Text(String),
    Segments(Vec<Value>),
}

/// Classify one transcript line
///
/// Returns `None` for blank lines, invalid JSON, records without a `type`, and
/// user/assistant/summary records missing the field that makes them meaningful.
/// Never panics on any input.
///
/// # Examples
///
/// ```
/// use session_explorer::parse_line;
/// use session_explorer::models::EntryKind;
///
/// let line = r#"{"type":"user","message":{"role":"user","content":"Fix the parser"}}"#;
/// let entry = parse_line(line).unwrap();
/// assert_eq!(entry.kind(), EntryKind::UserMessage);
/// assert_eq!(entry.text_content(), "Fix the parser");
///
/// assert!(parse_line("not json").is_none());
/// ```
pub fn parse_line(raw: &str) -> Option<LogEntry> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let record: RawRecord = serde_json::from_str(trimmed).ok()?;

    let entry_record = match record.record_type.as_str() {
        RECORD_TYPE_SUMMARY => {
            let summary_text = record.summary.as_ref()?.as_str()?.to_string();
            EntryRecord::Summary { summary_text }
        }
        RECORD_TYPE_USER => EntryRecord::UserMessage(message_body(record.message?)?),
        RECORD_TYPE_ASSISTANT => EntryRecord::AssistantMessage(message_body(record.message?)?),
        other => EntryRecord::Other { record_type: other.to_string() },
    };

    let cwd =
        record.cwd.as_ref().and_then(Value::as_str).filter(|s| !s.is_empty()).map(PathBuf::from);

    Some(LogEntry {
        timestamp: record.timestamp,
        is_sidechain: record.is_sidechain,
        cwd,
        record: entry_record,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SidechainMarker {
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    is_sidechain: bool,
}

/// True if `raw` is a JSON object flagged `isSidechain: true`, even one [`parse_line`] rejects
pub fn is_sidechain_line(raw: &str) -> bool {
    serde_json::from_str::<SidechainMarker>(raw.trim()).is_ok_and(|marker| marker.is_sidechain)
}

// Only user and assistant records must carry a well-formed message
fn message_body(message: Value) -> Option<MessageBody> {
    let message: RawMessage = serde_json::from_value(message).ok()?;
    Some(flatten_content(message.content))
}

fn flatten_content(content: RawContent) -> MessageBody {
    let segments = match content {
        RawContent::Text(text) => return MessageBody { text, tool_uses: Vec::new() },
        RawContent::Segments(segments) => segments,
    };

    let mut texts: Vec<&str> = Vec::new();
    let mut tool_uses = Vec::new();
    for segment in &segments {
        match segment.get("type").and_then(Value::as_str) {
            Some(SEGMENT_TYPE_TEXT) => {
                if let Some(text) = segment.get("text").and_then(Value::as_str) {
                    texts.push(text);
                }
            }
            Some(SEGMENT_TYPE_TOOL_USE) => {
                let name =
                    segment.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
                let input = segment.get("input").cloned().unwrap_or(Value::Null);
                tool_uses.push(ToolUse { name, input });
            }
            // thinking, tool_result, image and anything newer carry no searchable text
            _ => {}
        }
    }

    MessageBody { text: texts.join("\n"), tool_uses }
}
