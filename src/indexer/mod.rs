//! Session indexing for a corpus of transcript files
//!
//! - [`project_discovery`] finds project directories and their transcripts.
//! - [`session`] folds one transcript into a [`crate::models::Session`] and applies the
//!   exclusion rules (empty, warmup, sub-agent, no content).
//! - [`builder`] walks the whole corpus and orders the result by recency.

pub mod builder;
pub mod project_discovery;
pub mod session;

pub use builder::{
    IndexReport, SessionIndex, SessionWalker, build_session_index, enumerate_sessions,
};
pub use project_discovery::discover_projects;
pub use session::{IndexOutcome, SkipReason, WARMUP_SENTINEL, index_file, index_session_file};
