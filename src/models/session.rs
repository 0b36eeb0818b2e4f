use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Aggregated view of one transcript file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// File stem of the transcript
    pub id: String,
    pub project_path: PathBuf,
    pub file_path: PathBuf,
    pub start_time: DateTime<Utc>,
    pub last_activity_time: DateTime<Utc>,
    /// User plus assistant entries
    pub message_count: usize,
    pub auto_generated_summary: Option<String>,
    /// First user message, trimmed and shortened for display
    pub first_prompt: Option<String>,
}
