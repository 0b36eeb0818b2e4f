//! Default labels and task categories derived from a session's summary text.
//!
//! [`classify_summary`] runs ordered keyword passes over the lowercased summary:
//!
//! 1. Self-improvement keywords (work on the assistant's own setup) → `"Self-improvement"`
//! 2. Cross-project or housekeeping keywords → `"Global"`
//! 3. The project keyword table, first match wins → that row's category
//! 4. A `"<phrase>: ..."` summary with a 3-30 character phrase → the phrase verbatim
//! 5. Otherwise → `"Session"`
//!
//! Everything here is pure: no I/O, no stored names. Custom names live in
//! [`crate::overlay`].

use std::sync::LazyLock;

use chrono::{Local, TimeZone};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::Session;

pub const SELF_IMPROVEMENT_CATEGORY: &str = "Self-improvement";
pub const GLOBAL_CATEGORY: &str = "Global";
pub const DEFAULT_CATEGORY: &str = "Session";
/// Replaces [`DEFAULT_CATEGORY`] for sessions whose id starts with a date
pub const SCHEDULED_CATEGORY: &str = "Scheduled";

const LABEL_TIME_FORMAT: &str = "%b %-d, %H:%M";

const COLON_PHRASE_MIN_CHARS: usize = 3;
const COLON_PHRASE_MAX_CHARS: usize = 30;

const SELF_IMPROVEMENT_KEYWORDS: &[&str] = &[
    "self-improvement",
    "self improvement",
    "claude.md",
    "system prompt",
    "prompt engineering",
    "agent instructions",
    "slash command",
    "custom command",
    "memory file",
];

const GLOBAL_KEYWORDS: &[&str] = &[
    "cleanup",
    "clean up",
    "backlog",
    "housekeeping",
    "triage",
    "cross-project",
    "all projects",
    "across projects",
    "roadmap",
    "weekly review",
    "dotfiles",
];

/// Built-in project table; order matters, the first matching row wins
const PROJECT_KEYWORDS: &[(&str, &str)] = &[
    ("corpus search", "corpus-search"),
    ("transcript search", "corpus-search"),
    ("search context", "corpus-search"),
    ("path decod", "path-codec"),
    ("path encod", "path-codec"),
    ("session index", "session-indexer"),
    ("session list", "session-indexer"),
    ("warmup", "session-indexer"),
    ("transcript pars", "entry-parser"),
    ("jsonl", "entry-parser"),
    ("session label", "namer"),
    ("category", "namer"),
    ("tree view", "editor-ui"),
    ("webview", "editor-ui"),
    ("status bar", "editor-ui"),
];

// `YYYY-MM-DD...` or `YYYYMMDD-HHMMSS...`, as written by scheduled runs
static DATE_ENCODED_ID: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?:\d{4}-\d{2}-\d{2}|\d{8}-\d{6})").ok());

/// Extra project keyword row, consulted before the built-in table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub category: String,
}

/// Category classifier with an optional user-supplied project table
#[derive(Debug, Clone, Default)]
pub struct Namer {
    project_keywords: Vec<KeywordRule>,
}

impl Namer {
    /// Rules with an empty keyword are dropped; keywords match case-insensitively
    pub fn new(project_keywords: Vec<KeywordRule>) -> Self {
        let project_keywords = project_keywords
            .into_iter()
            .filter(|rule| !rule.keyword.trim().is_empty())
            .map(|rule| KeywordRule { keyword: rule.keyword.to_lowercase(), ..rule })
            .collect();
        Self { project_keywords }
    }

    pub fn classify(&self, summary: Option<&str>) -> String {
        let Some(summary) = summary else {
            return DEFAULT_CATEGORY.to_string();
        };
        let lowered = summary.to_lowercase();

        if contains_any(&lowered, SELF_IMPROVEMENT_KEYWORDS) {
            return SELF_IMPROVEMENT_CATEGORY.to_string();
        }
        if contains_any(&lowered, GLOBAL_KEYWORDS) {
            return GLOBAL_CATEGORY.to_string();
        }

        let custom = self
            .project_keywords
            .iter()
            .map(|rule| (rule.keyword.as_str(), rule.category.as_str()));
        let builtin = PROJECT_KEYWORDS.iter().copied();
        if let Some((_, category)) =
            custom.chain(builtin).find(|(keyword, _)| lowered.contains(keyword))
        {
            return category.to_string();
        }

        colon_phrase(summary).unwrap_or(DEFAULT_CATEGORY).to_string()
    }

    /// Category used in the label: [`Namer::classify`] plus the date-encoded id override
    pub fn category_for(&self, session: &Session) -> String {
        let category = self.classify(session.auto_generated_summary.as_deref());
        if category == DEFAULT_CATEGORY && is_date_encoded_id(&session.id) {
            return SCHEDULED_CATEGORY.to_string();
        }
        category
    }

    /// `"<category> • <Mon> <day>, <HH>:<MM>"` from the session's start time in `tz`
    pub fn label_in<Tz>(&self, session: &Session, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let started = session.start_time.with_timezone(tz).format(LABEL_TIME_FORMAT);
        format!("{} • {}", self.category_for(session), started)
    }

    pub fn label(&self, session: &Session) -> String {
        self.label_in(session, &Local)
    }
}

pub fn is_date_encoded_id(id: &str) -> bool {
    DATE_ENCODED_ID.as_ref().is_some_and(|re| re.is_match(id))
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| haystack.contains(keyword))
}

fn colon_phrase(summary: &str) -> Option<&str> {
    let (phrase, _) = summary.trim().split_once(':')?;
    let phrase = phrase.trim();
    let len = phrase.chars().count();
    (COLON_PHRASE_MIN_CHARS..=COLON_PHRASE_MAX_CHARS).contains(&len).then_some(phrase)
}

/// Category for a summary using only the built-in tables
///
/// # Examples
///
/// ```
/// use session_explorer::classify_summary;
///
/// assert_eq!(classify_summary(None), "Session");
/// assert_eq!(classify_summary(Some("Quick cleanup of session backlog")), "Global");
/// assert_eq!(classify_summary(Some("Auth refactor: split token module")), "Auth refactor");
/// ```
pub fn classify_summary(summary: Option<&str>) -> String {
    Namer::default().classify(summary)
}

/// Default display label in the local timezone, using only the built-in tables
pub fn default_label(session: &Session) -> String {
    Namer::default().label(session)
}

pub fn default_label_in<Tz>(session: &Session, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    Namer::default().label_in(session, tz)
}
