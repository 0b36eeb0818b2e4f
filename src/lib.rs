//! Session Explorer - index, label and search CLI session transcripts
//!
//! The CLI tool writes one JSONL transcript per session under `~/.claude/projects/<encoded>/`,
//! where `<encoded>` is the project path with every separator replaced by `-`. This library:
//!
//! - Decodes project directory names back into paths, resolving `-` ambiguity against the
//!   filesystem
//! - Classifies transcript lines into summary, user, assistant and other records
//! - Folds each transcript into a [`Session`], leaving out warmup, sub-agent and empty ones
//! - Derives a display label and task category from a session's summary
//! - Searches message text across the corpus with context around each match
//!
//! # Example
//!
//! ```no_run
//! use session_explorer::{default_label, enumerate_sessions, search};
//! use std::path::PathBuf;
//!
//! let corpus = PathBuf::from("/Users/alice/.claude/projects");
//! for session in enumerate_sessions(&corpus, 50) {
//!     println!("{} ({} messages)", default_label(&session), session.message_count);
//! }
//! for hit in search(&corpus, "parser", 10) {
//!     println!("{}: {}", hit.session.id, hit.context);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod indexer;
pub mod models;
pub mod naming;
pub mod overlay;
pub mod parsers;
pub mod search;
pub mod utils;

// Re-export commonly used types
pub use indexer::{build_session_index, enumerate_sessions, index_session_file};
pub use models::{LogEntry, SearchHit, Session};
pub use naming::{classify_summary, default_label};
pub use parsers::parse_line;
pub use search::search;
pub use utils::paths::{decode_path, encode_path, format_path_with_tilde};
