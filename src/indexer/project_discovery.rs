use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

use crate::models::ProjectInfo;
use crate::utils::decode_path;

/// Transcripts spawned by sub-agents are named `agent-<id>.jsonl`
pub const AGENT_FILE_PREFIX: &str = "agent-";

pub const TRANSCRIPT_EXTENSION: &str = "jsonl";

/// Maximum number of projects to process (security: prevent resource exhaustion)
const MAX_PROJECTS: usize = 10_000;

/// Maximum number of session files per project (security: prevent resource exhaustion)
const MAX_SESSION_FILES_PER_PROJECT: usize = 10_000;

/// Discover every project directory under the corpus root and the transcripts inside it
///
/// Walks the immediate children of `corpus_root` (normally `~/.claude/projects`), skipping
/// hidden entries, plain files and symlinks. Each directory name is decoded back to the
/// project path it stands for. Projects come back sorted by directory name and their
/// session files sorted by file name, so repeated calls see the same order.
///
/// Files named `agent-*.jsonl` are left out without being opened.
///
/// # Returns
///
/// An empty Vec if the corpus root doesn't exist (not an error).
///
/// # Errors
///
/// Returns an error only if the corpus root exists but cannot be listed. Unreadable project
/// directories are logged and skipped. Past [`MAX_PROJECTS`] projects or
/// [`MAX_SESSION_FILES_PER_PROJECT`] files in one project, the rest are ignored with a warning.
pub fn discover_projects(corpus_root: &Path) -> Result<Vec<ProjectInfo>> {
    if !corpus_root.exists() {
        return Ok(Vec::new());
    }

    // Surface an unreadable root instead of silently walking nothing
    std::fs::read_dir(corpus_root)
        .with_context(|| format!("Failed to read corpus directory: {}", corpus_root.display()))?;

    let mut projects = Vec::new();
    let children = WalkDir::new(corpus_root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    for entry in children {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Failed to read corpus entry: {}", e);
                continue;
            }
        };

        if entry.path_is_symlink() {
            log::warn!(
                "Skipping project directory (symlink not allowed) {}",
                entry.path().display()
            );
            continue;
        }
        if !entry.file_type().is_dir() {
            continue;
        }

        if projects.len() >= MAX_PROJECTS {
            log::warn!(
                "Resource limit reached: ignoring projects beyond the first {} in {}",
                MAX_PROJECTS,
                corpus_root.display()
            );
            break;
        }

        let encoded_name = entry.file_name().to_string_lossy().into_owned();
        let project_dir = entry.into_path();
        let session_files = match find_session_files(&project_dir) {
            Ok(files) => files,
            Err(e) => {
                log::warn!("Failed to read project directory {}: {:#}", project_dir.display(), e);
                continue;
            }
        };

        let decoded_path = decode_path(&encoded_name);
        projects.push(ProjectInfo { encoded_name, decoded_path, project_dir, session_files });
    }

    Ok(projects)
}

fn find_session_files(project_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::read_dir(project_dir)
        .with_context(|| format!("Failed to read directory: {}", project_dir.display()))?;

    let mut files = Vec::new();
    let entries = WalkDir::new(project_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    for entry in entries.flatten() {
        if !is_session_file(&entry) {
            continue;
        }
        if entry.path_is_symlink() {
            log::warn!("Skipping session file (symlink not allowed) {}", entry.path().display());
            continue;
        }
        if files.len() >= MAX_SESSION_FILES_PER_PROJECT {
            log::warn!(
                "Resource limit reached: ignoring session files beyond the first {} in {}",
                MAX_SESSION_FILES_PER_PROJECT,
                project_dir.display()
            );
            break;
        }
        files.push(entry.into_path());
    }

    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn is_session_file(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    let has_extension = Path::new(name.as_ref())
        .extension()
        .is_some_and(|ext| ext == TRANSCRIPT_EXTENSION);
    // Symlinks report their own type here, so they reach the symlink check above
    let is_file_like = entry.file_type().is_file() || entry.path_is_symlink();
    is_file_like && has_extension && !name.starts_with(AGENT_FILE_PREFIX)
}
