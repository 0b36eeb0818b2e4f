use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Coarse classification of a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    Summary,
    UserMessage,
    AssistantMessage,
    Other,
}

/// A tool invocation recorded in an assistant message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolUse {
    pub name: String,
    pub input: serde_json::Value,
}

/// Flattened body of a user or assistant message
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    /// All `text` segments in order, joined with newlines
    pub text: String,
    /// `tool_use` segments, kept out of `text`
    pub tool_uses: Vec<ToolUse>,
}

/// What a line carries; each variant holds only the fields meaningful for it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EntryRecord {
    Summary {
        #[serde(rename = "summaryText")]
        summary_text: String,
    },
    UserMessage(MessageBody),
    AssistantMessage(MessageBody),
    Other {
        #[serde(rename = "recordType")]
        record_type: String,
    },
}

/// One classified line of a transcript file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: Option<DateTime<Utc>>,
    pub is_sidechain: bool,
    /// Working directory the CLI recorded for this line
    pub cwd: Option<PathBuf>,
    pub record: EntryRecord,
}

impl LogEntry {
    pub fn kind(&self) -> EntryKind {
        match self.record {
            EntryRecord::Summary { .. } => EntryKind::Summary,
            EntryRecord::UserMessage(_) => EntryKind::UserMessage,
            EntryRecord::AssistantMessage(_) => EntryKind::AssistantMessage,
            EntryRecord::Other { .. } => EntryKind::Other,
        }
    }

    pub fn message(&self) -> Option<&MessageBody> {
        match &self.record {
            EntryRecord::UserMessage(body) | EntryRecord::AssistantMessage(body) => Some(body),
            _ => None,
        }
    }

    /// Searchable text; empty for anything but user and assistant messages
    pub fn text_content(&self) -> &str {
        self.message().map(|body| body.text.as_str()).unwrap_or("")
    }

    pub fn is_message(&self) -> bool {
        self.message().is_some()
    }
}
