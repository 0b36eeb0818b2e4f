use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Environment variable the Claude CLI uses to relocate its data directory
pub const CLAUDE_CONFIG_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";

/// Get the Claude directory path (`$CLAUDE_CONFIG_DIR`, else ~/.claude)
pub fn get_claude_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var(CLAUDE_CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    let home = env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".claude"))
}

/// Get the transcript corpus root: one subdirectory per project under `<claude dir>/projects`
pub fn get_projects_dir() -> Result<PathBuf> {
    Ok(get_claude_dir()?.join("projects"))
}
