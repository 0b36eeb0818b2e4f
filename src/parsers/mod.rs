//! Line-level parsing of session transcript files
//!
//! # Error Handling Strategy
//!
//! Transcripts are append-only JSONL written by another program, so damage is local:
//!
//! - **Individual line failures**: [`parse_line`] returns `None` for anything it cannot
//!   classify, and [`TranscriptReader`] treats a line that is not valid UTF-8 the same way.
//!   Both are counted and logged at debug level. A rejected line's `isSidechain` flag is
//!   still noted through [`is_sidechain_line`].
//!
//! - **Read failures**: an I/O error partway through a file ends that file's stream. The
//!   error is kept on the reader so the indexer can decide to drop the file.
//!
//! - **Open failures**: opening is the only step that returns `anyhow::Result`; callers
//!   skip the file and move on.

pub mod deserializers;
pub mod entry;
pub mod transcript;

pub use entry::{is_sidechain_line, parse_line};
pub use transcript::TranscriptReader;
