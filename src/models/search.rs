use serde::Serialize;

use crate::models::{LogEntry, Session};

/// A message whose text contains the search query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub session: Session,
    pub matched_entry: LogEntry,
    /// Text around the first occurrence, with `...` where the window was clipped
    pub context: String,
}
