//! Data models for session transcripts.
//!
//! - [`LogEntry`] - One classified transcript line, tagged by [`EntryRecord`]
//! - [`Session`] - Aggregated summary of one transcript file
//! - [`SearchHit`] - A matching message plus its surrounding context
//! - [`ProjectInfo`] - A project directory and the transcripts found in it
//!
//! Everything here serializes to plain JSON so callers outside the crate can consume it.

pub mod entry;
pub mod project;
pub mod search;
pub mod session;

pub use entry::{EntryKind, EntryRecord, LogEntry, MessageBody, ToolUse};
pub use project::ProjectInfo;
pub use search::SearchHit;
pub use session::Session;
