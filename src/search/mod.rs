//! Case-insensitive substring search across the message text of every session.
//!
//! Sessions are visited most recently active first (the [`enumerate_sessions`] order, capped
//! at [`SearchOptions::scan_limit`]) and messages in file order. Hits keep that order; there
//! is no relevance ranking.
//!
//! [`search_transcripts`] is lazy: each `next()` reads only as far as the next hit, so taking
//! the first N hits stops reading the corpus there. Dropping the iterator abandons the search.
//!
//! An empty or whitespace-only query matches nothing.

use std::ops::Range;
use std::path::Path;

use crate::indexer::enumerate_sessions;
use crate::models::{SearchHit, Session};
use crate::parsers::TranscriptReader;

pub const DEFAULT_SCAN_LIMIT: usize = 500;
pub const DEFAULT_CONTEXT_RADIUS: usize = 50;
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Most recent sessions to consider
    pub scan_limit: usize,
    /// Characters kept on each side of the match
    pub context_radius: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { scan_limit: DEFAULT_SCAN_LIMIT, context_radius: DEFAULT_CONTEXT_RADIUS }
    }
}

/// Lazily yields [`SearchHit`]s, one transcript open at a time
pub struct TranscriptSearch {
    needle: String,
    context_radius: usize,
    sessions: std::vec::IntoIter<Session>,
    current: Option<(Session, TranscriptReader)>,
}

impl TranscriptSearch {
    fn new(corpus_root: &Path, query: &str, options: SearchOptions) -> Self {
        let needle = lowercase_chars(query);
        let sessions = if query.trim().is_empty() {
            Vec::new()
        } else {
            enumerate_sessions(corpus_root, options.scan_limit)
        };
        Self {
            needle,
            context_radius: options.context_radius,
            sessions: sessions.into_iter(),
            current: None,
        }
    }
}

impl Iterator for TranscriptSearch {
    type Item = SearchHit;

    fn next(&mut self) -> Option<SearchHit> {
        loop {
            if let Some((session, reader)) = &mut self.current {
                for entry in reader.by_ref() {
                    if !entry.is_message() {
                        continue;
                    }
                    let text = entry.text_content();
                    let Some(range) = find_lowercased(text, &self.needle) else {
                        continue;
                    };
                    let context = context_window(text, range, self.context_radius);
                    return Some(SearchHit {
                        session: session.clone(),
                        matched_entry: entry,
                        context,
                    });
                }
                self.current = None;
            }

            let session = self.sessions.next()?;
            match TranscriptReader::open(&session.file_path) {
                Ok(reader) => self.current = Some((session, reader)),
                Err(e) => log::warn!(
                    "Failed to open {} for search: {:#}",
                    session.file_path.display(),
                    e
                ),
            }
        }
    }
}

/// Lazy search over the corpus; see the module docs for ordering
pub fn search_transcripts(
    corpus_root: &Path,
    query: &str,
    options: SearchOptions,
) -> TranscriptSearch {
    TranscriptSearch::new(corpus_root, query, options)
}

/// At most `max_results` hits for `query`, with default scan limit and context radius
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use session_explorer::search;
///
/// for hit in search(Path::new("/Users/alice/.claude/projects"), "diff", 10) {
///     println!("{}: {}", hit.session.id, hit.context);
/// }
/// ```
pub fn search(corpus_root: &Path, query: &str, max_results: usize) -> Vec<SearchHit> {
    search_transcripts(corpus_root, query, SearchOptions::default()).take(max_results).collect()
}

/// Byte range in `haystack` of the first case-insensitive occurrence of `needle`
pub fn find_case_insensitive(haystack: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }
    find_lowercased(haystack, &lowercase_chars(needle))
}

// Per-char lowering, matching how the haystack is lowered. `str::to_lowercase` applies
// final-sigma rules that `char::to_lowercase` does not.
fn lowercase_chars(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

// Lowercasing can change byte lengths (e.g. 'İ'), so match in the lowered copy and map
// the offsets back through the char each lowered byte came from.
fn find_lowercased(haystack: &str, lowered_needle: &str) -> Option<Range<usize>> {
    let mut lowered = String::with_capacity(haystack.len());
    let mut origin: Vec<usize> = Vec::with_capacity(haystack.len() + 1);
    for (offset, ch) in haystack.char_indices() {
        for lower in ch.to_lowercase() {
            for _ in 0..lower.len_utf8() {
                origin.push(offset);
            }
            lowered.push(lower);
        }
    }
    origin.push(haystack.len());

    let start = lowered.find(lowered_needle)?;
    let end = start + lowered_needle.len();
    let original_start = origin[start];
    // End at the boundary after the last source char touched by the match
    let last_source = origin[end - 1];
    let original_end = haystack[last_source..]
        .chars()
        .next()
        .map_or(haystack.len(), |ch| last_source + ch.len_utf8());
    Some(original_start..original_end)
}

/// `radius` characters either side of `range`, with `...` on whichever side was clipped
///
/// `range` must lie on char boundaries of `text`.
pub fn context_window(text: &str, range: Range<usize>, radius: usize) -> String {
    let before = &text[..range.start];
    let after = &text[range.end..];

    let before_chars = before.chars().count();
    let skip = before_chars.saturating_sub(radius);
    let start = before.char_indices().nth(skip).map_or(range.start, |(i, _)| i);

    let end = after.char_indices().nth(radius).map_or(text.len(), |(i, _)| range.end + i);

    let mut window = String::with_capacity(end - start + 2 * ELLIPSIS.len());
    if start > 0 {
        window.push_str(ELLIPSIS);
    }
    window.push_str(&text[start..end]);
    if end < text.len() {
        window.push_str(ELLIPSIS);
    }
    window
}
