use std::fs::{File, Metadata};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::LogEntry;
use crate::parsers::entry::{is_sidechain_line, parse_line};
use crate::utils::safe_open_file;

/// Streams the classified entries of one transcript file, one line per `next()`
///
/// Malformed lines, including lines that are not valid UTF-8, are skipped and counted.
/// An I/O error (for example the file vanishing mid-read) ends the stream early and is
/// recorded in [`TranscriptReader::read_error`].
pub struct TranscriptReader {
    path: PathBuf,
    metadata: Metadata,
    reader: BufReader<File>,
    buf: Vec<u8>,
    line_number: usize,
    non_empty_lines: usize,
    skipped_lines: usize,
    skipped_sidechain: bool,
    finished: bool,
    read_error: Option<std::io::Error>,
}

impl TranscriptReader {
    /// Opens `path` for streaming (symlinks and oversized files are refused)
    pub fn open(path: &Path) -> Result<Self> {
        let file = safe_open_file(path)?;
        let metadata = file
            .metadata()
            .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            metadata,
            reader: BufReader::new(file),
            buf: Vec::new(),
            line_number: 0,
            non_empty_lines: 0,
            skipped_lines: 0,
            skipped_sidechain: false,
            finished: false,
            read_error: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Metadata of the open handle, taken when the file was opened
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Lines that were not blank, whether or not they parsed
    pub fn non_empty_lines(&self) -> usize {
        self.non_empty_lines
    }

    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// True if a line that failed to classify still carried `isSidechain: true`
    pub fn skipped_sidechain_line(&self) -> bool {
        self.skipped_sidechain
    }

    pub fn read_error(&self) -> Option<&std::io::Error> {
        self.read_error.as_ref()
    }
}

impl Iterator for TranscriptReader {
    type Item = LogEntry;

    fn next(&mut self) -> Option<LogEntry> {
        while !self.finished {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.finished = true;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!(
                        "Failed to read line {} of {}: {}",
                        self.line_number + 1,
                        self.path.display(),
                        e
                    );
                    self.read_error = Some(e);
                    self.finished = true;
                    return None;
                }
            }
            self.line_number += 1;

            let Ok(line) = std::str::from_utf8(&self.buf) else {
                self.non_empty_lines += 1;
                self.skipped_lines += 1;
                log::debug!(
                    "Skipping line {} in {} (invalid UTF-8)",
                    self.line_number,
                    self.path.display()
                );
                continue;
            };

            if line.trim().is_empty() {
                continue;
            }
            self.non_empty_lines += 1;

            match parse_line(line) {
                Some(entry) => return Some(entry),
                None => {
                    self.skipped_lines += 1;
                    if is_sidechain_line(line) {
                        self.skipped_sidechain = true;
                    }
                    log::debug!(
                        "Skipping malformed line {} in {}",
                        self.line_number,
                        self.path.display()
                    );
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::models::EntryKind;

    /// Helper to create a temporary test file with given content
    fn create_test_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content).expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_reader_yields_entries_in_file_order() {
        let content = r#"{"type":"user","message":{"role":"user","content":[{"type":"text","text":"Hello"}]},"timestamp":1234567890}
{"type":"assistant","message":{"role":"assistant","content":[{"type":"text","text":"Hi there"}]},"timestamp":"2024-01-15T10:30:00Z"}
{"type":"summary","summary":"Greeting"}"#;

        let file = create_test_file(content.as_bytes());
        let entries: Vec<LogEntry> = TranscriptReader::open(file.path()).unwrap().collect();

        let kinds: Vec<EntryKind> = entries.iter().map(LogEntry::kind).collect();
        assert_eq!(
            kinds,
            vec![EntryKind::UserMessage, EntryKind::AssistantMessage, EntryKind::Summary]
        );
        assert_eq!(entries[1].text_content(), "Hi there");
    }

    #[test]
    fn test_reader_skips_and_counts_malformed_lines() {
        let content = r#"{"type":"user","message":{"content":"Valid 1"}}
invalid json line

{"type":"user","message":{"content":"Valid 2"}}
{"type":"user"}"#;

        let file = create_test_file(content.as_bytes());
        let mut reader = TranscriptReader::open(file.path()).unwrap();
        let entries: Vec<LogEntry> = reader.by_ref().collect();

        assert_eq!(entries.len(), 2);
        assert_eq!(reader.non_empty_lines(), 4);
        assert_eq!(reader.skipped_lines(), 2);
        assert!(reader.read_error().is_none());
    }

    #[test]
    fn test_reader_empty_file() {
        let file = create_test_file(b"");
        let mut reader = TranscriptReader::open(file.path()).unwrap();
        assert_eq!(reader.metadata().len(), 0);
        assert!(reader.next().is_none());
        assert_eq!(reader.non_empty_lines(), 0);
    }

    #[test]
    fn test_reader_skips_invalid_utf8_line_and_continues() {
        let mut content = br#"{"type":"user","message":{"content":"before"}}"#.to_vec();
        content.push(b'\n');
        content.extend_from_slice(&[0xff, 0xfe, b'\n']);
        content.extend_from_slice(br#"{"type":"assistant","message":{"content":"after"}}"#);

        let file = create_test_file(&content);
        let mut reader = TranscriptReader::open(file.path()).unwrap();
        let entries: Vec<LogEntry> = reader.by_ref().collect();

        let texts: Vec<&str> = entries.iter().map(LogEntry::text_content).collect();
        assert_eq!(texts, vec!["before", "after"]);
        assert_eq!(reader.non_empty_lines(), 3);
        assert_eq!(reader.skipped_lines(), 1);
        assert!(reader.read_error().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_reader_notes_sidechain_flag_on_skipped_line() {
        let content = r#"{"type":"user","message":{"content":"ok"}}
{"type":"assistant","isSidechain":true,"message":{"content":7}}"#;

        let file = create_test_file(content.as_bytes());
        let mut reader = TranscriptReader::open(file.path()).unwrap();
        assert_eq!(reader.by_ref().count(), 1);
        assert_eq!(reader.skipped_lines(), 1);
        assert!(reader.skipped_sidechain_line());
    }

    #[test]
    fn test_reader_plain_malformed_line_is_not_sidechain() {
        let file = create_test_file(b"not json\n{\"type\":\"user\"}");
        let mut reader = TranscriptReader::open(file.path()).unwrap();
        assert_eq!(reader.by_ref().count(), 0);
        assert!(!reader.skipped_sidechain_line());
    }

    #[test]
    fn test_reader_nonexistent_file() {
        let result = TranscriptReader::open(Path::new("/nonexistent/session.jsonl"));
        assert!(result.is_err());
    }
}
