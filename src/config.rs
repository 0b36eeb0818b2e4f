use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::naming::{KeywordRule, Namer};
use crate::search::{DEFAULT_CONTEXT_RADIUS, DEFAULT_SCAN_LIMIT, SearchOptions};
use crate::utils::get_projects_dir;

/// Overrides `corpus_root` when set and non-empty
pub const CORPUS_ENV: &str = "SESSION_EXPLORER_CORPUS";

const CONFIG_DIR_NAME: &str = "session-explorer";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one subdirectory per project; `~/.claude/projects` when unset
    pub corpus_root: Option<PathBuf>,
    pub list_limit: usize,
    pub search_scan_limit: usize,
    pub search_max_results: usize,
    pub context_radius: usize,
    pub naming: NamingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_root: None,
            list_limit: 50,
            search_scan_limit: DEFAULT_SCAN_LIMIT,
            search_max_results: 100,
            context_radius: DEFAULT_CONTEXT_RADIUS,
            naming: NamingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub project_keywords: Vec<KeywordRule>,
}

impl Config {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Failed to parse config")
    }

    /// Corpus root to scan: the configured one, else the CLI's projects directory
    pub fn resolve_corpus_root(&self) -> Result<PathBuf> {
        match &self.corpus_root {
            Some(root) => Ok(expand_tilde(root)),
            None => get_projects_dir(),
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions { scan_limit: self.search_scan_limit, context_radius: self.context_radius }
    }

    pub fn namer(&self) -> Namer {
        Namer::new(self.naming.project_keywords.clone())
    }

    fn apply_corpus_override(&mut self, value: Option<String>) {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.corpus_root = Some(PathBuf::from(value));
        }
    }
}

/// Load configuration
///
/// An explicit `path` must exist. Without one, `<config dir>/session-explorer/config.toml` is
/// read if present, else defaults are used. [`CORPUS_ENV`] is applied last.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML for [`Config`].
pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };

    let mut config = match path {
        Some(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            log::debug!("Loaded config from {}", path.display());
            Config::from_toml_str(&raw)
                .with_context(|| format!("Invalid config file: {}", path.display()))?
        }
        None => Config::default(),
    };

    config.apply_corpus_override(env::var(CORPUS_ENV).ok());
    Ok(config)
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}
