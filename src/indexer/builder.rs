//! Corpus walk: every transcript under the corpus root folded into a [`Session`] list.
//!
//! # Error Handling Strategy
//!
//! Nothing here fails the caller:
//!
//! - **Missing corpus root**: yields zero sessions.
//! - **Unreadable project directory or transcript**: logged as a warning and counted in
//!   [`IndexReport::failed`]; the walk continues with the next file.
//! - **Excluded transcripts** (empty, warmup, sub-agent, no content): counted per
//!   [`SkipReason`] and logged at debug level.
//! - **Summary reporting**: an info-level line with the totals, plus a warning if more than
//!   half of the readable files failed, which usually means the format changed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::indexer::project_discovery::discover_projects;
use crate::indexer::session::{IndexOutcome, SkipReason, index_file};
use crate::models::{ProjectInfo, Session};

/// Counters from one pass over the corpus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexReport {
    pub projects: usize,
    pub files_scanned: usize,
    pub indexed: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
    pub failed: usize,
}

impl IndexReport {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Lazily indexes the corpus one transcript per `next()`
///
/// Sessions come out in discovery order (project directory name, then file name), not by
/// recency; [`enumerate_sessions`] does the sorting. Dropping the walker part-way costs
/// nothing beyond the files already read.
pub struct SessionWalker {
    projects: std::vec::IntoIter<ProjectInfo>,
    current: Option<(PathBuf, std::vec::IntoIter<PathBuf>)>,
    report: IndexReport,
}

impl SessionWalker {
    pub fn new(corpus_root: &Path) -> Self {
        let projects = discover_projects(corpus_root).unwrap_or_else(|e| {
            log::warn!("Failed to discover projects: {:#}", e);
            Vec::new()
        });
        let report = IndexReport { projects: projects.len(), ..IndexReport::default() };
        Self { projects: projects.into_iter(), current: None, report }
    }

    pub fn report(&self) -> &IndexReport {
        &self.report
    }

    pub fn into_report(self) -> IndexReport {
        self.report
    }
}

impl Iterator for SessionWalker {
    type Item = Session;

    fn next(&mut self) -> Option<Session> {
        loop {
            if let Some((decoded_path, files)) = &mut self.current {
                let Some(file) = files.next() else {
                    self.current = None;
                    continue;
                };

                self.report.files_scanned += 1;
                match index_file(&file, None, Some(decoded_path.as_path())) {
                    Ok(IndexOutcome::Indexed(session)) => {
                        self.report.indexed += 1;
                        return Some(session);
                    }
                    Ok(IndexOutcome::Skipped(reason)) => {
                        log::debug!("Skipping {} ({})", file.display(), reason);
                        *self.report.skipped.entry(reason).or_insert(0) += 1;
                    }
                    Err(e) => {
                        log::warn!("Failed to index session file {}: {:#}", file.display(), e);
                        self.report.failed += 1;
                    }
                }
                continue;
            }

            let project = self.projects.next()?;
            self.current = Some((project.decoded_path, project.session_files.into_iter()));
        }
    }
}

/// Sessions plus the counters gathered while building them
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionIndex {
    /// Most recently active first
    pub sessions: Vec<Session>,
    pub report: IndexReport,
}

/// Index every transcript under `corpus_root`
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use session_explorer::build_session_index;
///
/// let corpus = PathBuf::from("/Users/alice/.claude/projects");
/// let index = build_session_index(&corpus);
/// println!("Indexed {} sessions", index.sessions.len());
/// ```
pub fn build_session_index(corpus_root: &Path) -> SessionIndex {
    let mut walker = SessionWalker::new(corpus_root);
    let mut sessions: Vec<Session> = walker.by_ref().collect();
    sort_by_recency(&mut sessions);
    let report = walker.into_report();

    let readable = report.indexed + report.skipped_total();
    if report.failed > readable && report.failed > 0 {
        log::warn!(
            "{} of {} session files could not be read; the transcript format may have changed",
            report.failed,
            report.files_scanned
        );
    }
    log::info!(
        "Indexed {} sessions ({} files scanned, {} skipped, {} failed)",
        report.indexed,
        report.files_scanned,
        report.skipped_total(),
        report.failed
    );

    SessionIndex { sessions, report }
}

/// Most recently active sessions under `corpus_root`, at most `limit` of them
///
/// Sorted by `last_activity_time` descending, ties broken by id so the order is stable
/// across calls on an unchanged corpus. Never fails: a missing root or unreadable files
/// just mean fewer sessions.
pub fn enumerate_sessions(corpus_root: &Path, limit: usize) -> Vec<Session> {
    let mut sessions = build_session_index(corpus_root).sessions;
    sessions.truncate(limit);
    sessions
}

pub(crate) fn sort_by_recency(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| {
        b.last_activity_time.cmp(&a.last_activity_time).then_with(|| a.id.cmp(&b.id))
    });
}
