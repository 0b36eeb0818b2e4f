use std::fmt;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{EntryRecord, Session};
use crate::parsers::TranscriptReader;
use crate::utils::decode_path;
use crate::utils::terminal::truncate_chars;

/// First user message of the CLI's synthetic health-check sessions
pub const WARMUP_SENTINEL: &str = "Warmup";

const FIRST_PROMPT_MAX_CHARS: usize = 120;

/// Why a readable transcript produced no [`Session`], in the order the rules are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    EmptyFile,
    NoEntries,
    Warmup,
    Sidechain,
    NoContent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::EmptyFile => "empty file",
            SkipReason::NoEntries => "no parseable entries",
            SkipReason::Warmup => "warmup session",
            SkipReason::Sidechain => "sub-agent session",
            SkipReason::NoContent => "no conversation content",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    Indexed(Session),
    Skipped(SkipReason),
}

/// Running totals for one pass over a transcript
#[derive(Debug, Default)]
struct FileScan {
    entries: usize,
    earliest: Option<DateTime<Utc>>,
    latest: Option<DateTime<Utc>>,
    message_count: usize,
    first_user_text: Option<String>,
    first_prompt: Option<String>,
    has_real_content: bool,
    is_sidechain: bool,
    summary: Option<String>,
    cwd: Option<PathBuf>,
}

impl FileScan {
    fn skip_reason(&self) -> Option<SkipReason> {
        if self.entries == 0 {
            return Some(SkipReason::NoEntries);
        }
        if self.first_user_text.as_deref().map(str::trim) == Some(WARMUP_SENTINEL) {
            return Some(SkipReason::Warmup);
        }
        if self.is_sidechain {
            return Some(SkipReason::Sidechain);
        }
        if !self.has_real_content && self.message_count < 2 {
            return Some(SkipReason::NoContent);
        }
        None
    }
}

/// Aggregate one transcript into a [`Session`], or `None` if an exclusion rule applies
///
/// `id_hint` overrides the file stem as the session id. The project path comes from the
/// first `cwd` recorded in the file, else from decoding the parent directory's name.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a read fails partway through.
pub fn index_session_file(path: &Path, id_hint: Option<&str>) -> Result<Option<Session>> {
    match index_file(path, id_hint, None)? {
        IndexOutcome::Indexed(session) => Ok(Some(session)),
        IndexOutcome::Skipped(reason) => {
            log::debug!("Skipping {} ({})", path.display(), reason);
            Ok(None)
        }
    }
}

/// Like [`index_session_file`] but reports which rule excluded the file
///
/// `project_hint` is the already-decoded project directory, used when no entry has a `cwd`.
pub fn index_file(
    path: &Path,
    id_hint: Option<&str>,
    project_hint: Option<&Path>,
) -> Result<IndexOutcome> {
    let mut reader = TranscriptReader::open(path)?;
    if reader.metadata().len() == 0 {
        return Ok(IndexOutcome::Skipped(SkipReason::EmptyFile));
    }

    let mut scan = FileScan::default();
    for entry in reader.by_ref() {
        scan.entries += 1;

        if let Some(ts) = entry.timestamp {
            scan.earliest = Some(scan.earliest.map_or(ts, |e| e.min(ts)));
            scan.latest = Some(scan.latest.map_or(ts, |l| l.max(ts)));
        }
        if entry.is_sidechain {
            scan.is_sidechain = true;
        }
        if scan.cwd.is_none() {
            scan.cwd = entry.cwd;
        }

        match entry.record {
            EntryRecord::UserMessage(body) => {
                scan.message_count += 1;
                let trimmed = body.text.trim();
                if scan.first_prompt.is_none() && !trimmed.is_empty() {
                    scan.first_prompt = Some(truncate_chars(trimmed, FIRST_PROMPT_MAX_CHARS));
                }
                if scan.first_user_text.is_none() {
                    scan.first_user_text = Some(body.text);
                }
            }
            EntryRecord::AssistantMessage(_) => {
                scan.message_count += 1;
                scan.has_real_content = true;
            }
            EntryRecord::Summary { summary_text } => {
                if scan.summary.is_none() && !summary_text.trim().is_empty() {
                    scan.summary = Some(summary_text);
                }
            }
            EntryRecord::Other { .. } => {}
        }
    }

    if let Some(e) = reader.read_error() {
        return Err(anyhow!("Failed to read {}: {}", path.display(), e));
    }
    if reader.skipped_sidechain_line() {
        scan.is_sidechain = true;
    }

    if let Some(reason) = scan.skip_reason() {
        return Ok(IndexOutcome::Skipped(reason));
    }

    let id = match id_hint {
        Some(id) => id.to_string(),
        None => session_id_from_path(path),
    };
    let (fallback_start, fallback_end) = file_times(reader.metadata());
    let project_path = match (scan.cwd, project_hint) {
        (Some(cwd), _) => cwd,
        (None, Some(hint)) => hint.to_path_buf(),
        (None, None) => project_path_from_parent(path),
    };

    Ok(IndexOutcome::Indexed(Session {
        id,
        project_path,
        file_path: path.to_path_buf(),
        start_time: scan.earliest.unwrap_or(fallback_start),
        last_activity_time: scan.latest.unwrap_or(fallback_end),
        message_count: scan.message_count,
        auto_generated_summary: scan.summary,
        first_prompt: scan.first_prompt,
    }))
}

/// Session id for a transcript: its file stem
pub fn session_id_from_path(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

fn project_path_from_parent(path: &Path) -> PathBuf {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| decode_path(&name.to_string_lossy()))
        .unwrap_or_else(|| PathBuf::from("/"))
}

// (created, modified); creation time is not available everywhere
fn file_times(metadata: &Metadata) -> (DateTime<Utc>, DateTime<Utc>) {
    let modified =
        metadata.modified().map(DateTime::<Utc>::from).unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    let created = metadata.created().map(DateTime::<Utc>::from).unwrap_or(modified);
    (created.min(modified), modified)
}
