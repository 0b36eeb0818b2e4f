//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for a fake home directory holding `.claude/projects/<encoded>/<session>.jsonl`
pub struct CorpusBuilder {
    temp_dir: TempDir,
}

impl CorpusBuilder {
    /// Create a new builder with an empty `.claude/projects` directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(temp_dir.path().join(".claude").join("projects"))
            .expect("Failed to create projects dir");
        Self { temp_dir }
    }

    /// The fake home directory (parent of `.claude`)
    pub fn home(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The corpus root (`<home>/.claude/projects`)
    pub fn corpus(&self) -> PathBuf {
        corpus_of(self.temp_dir.path())
    }

    /// Add a project directory with the given encoded name and transcripts
    pub fn with_project(self, encoded_name: &str, transcripts: &[TranscriptBuilder]) -> Self {
        let project_dir = self.corpus().join(encoded_name);
        fs::create_dir_all(&project_dir).expect("Failed to create project dir");

        for transcript in transcripts {
            transcript.create_in(&project_dir);
        }

        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for CorpusBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Corpus root under a home directory produced by [`CorpusBuilder::build`]
pub fn corpus_of(home: &Path) -> PathBuf {
    home.join(".claude").join("projects")
}

/// Builder for one transcript file
pub struct TranscriptBuilder {
    filename: String,
    lines: Vec<String>,
}

impl TranscriptBuilder {
    /// Create a transcript with the given filename (e.g. `"abc.jsonl"`)
    pub fn new(filename: &str) -> Self {
        Self { filename: filename.to_string(), lines: Vec::new() }
    }

    pub fn with_entry(mut self, entry: EntryBuilder) -> Self {
        self.lines.push(entry.to_json());
        self
    }

    /// Add a raw line verbatim (malformed input, blank lines, ...)
    pub fn with_raw_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// Create the file in the given directory
    pub fn create_in(&self, dir: &Path) {
        let file_path = dir.join(&self.filename);
        let mut file = fs::File::create(file_path).expect("Failed to create transcript");
        file.write_all(self.lines.join("\n").as_bytes()).expect("Failed to write transcript");
    }
}

/// Builder for one transcript line
pub struct EntryBuilder {
    record_type: String,
    content: Option<Value>,
    summary: Option<String>,
    timestamp: Option<String>,
    is_sidechain: bool,
    cwd: Option<String>,
}

impl EntryBuilder {
    fn message(record_type: &str, text: &str) -> Self {
        Self {
            record_type: record_type.to_string(),
            content: Some(Value::String(text.to_string())),
            summary: None,
            timestamp: None,
            is_sidechain: false,
            cwd: None,
        }
    }

    /// A user message with plain string content
    pub fn user(text: &str) -> Self {
        Self::message("user", text)
    }

    /// An assistant message with plain string content
    pub fn assistant(text: &str) -> Self {
        Self::message("assistant", text)
    }

    pub fn summary(text: &str) -> Self {
        Self {
            record_type: "summary".to_string(),
            content: None,
            summary: Some(text.to_string()),
            timestamp: None,
            is_sidechain: false,
            cwd: None,
        }
    }

    /// Any other record type (`system`, `file-history-snapshot`, ...)
    pub fn other(record_type: &str) -> Self {
        Self {
            record_type: record_type.to_string(),
            content: None,
            summary: None,
            timestamp: None,
            is_sidechain: false,
            cwd: None,
        }
    }

    /// Replace the message content with typed segments
    pub fn content_blocks(mut self, blocks: Vec<Value>) -> Self {
        self.content = Some(Value::Array(blocks));
        self
    }

    /// RFC3339 timestamp
    pub fn at(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_string());
        self
    }

    pub fn sidechain(mut self) -> Self {
        self.is_sidechain = true;
        self
    }

    pub fn cwd(mut self, cwd: &str) -> Self {
        self.cwd = Some(cwd.to_string());
        self
    }

    pub fn text_block(text: &str) -> Value {
        json!({"type": "text", "text": text})
    }

    pub fn thinking_block(text: &str) -> Value {
        json!({"type": "thinking", "thinking": text})
    }

    pub fn tool_use_block(id: &str, name: &str, input: Value) -> Value {
        json!({"type": "tool_use", "id": id, "name": name, "input": input})
    }

    pub fn tool_result_block(tool_use_id: &str, content: &str) -> Value {
        json!({"type": "tool_result", "tool_use_id": tool_use_id, "content": content})
    }

    /// Convert to a JSON line
    pub fn to_json(&self) -> String {
        let mut record = json!({"type": self.record_type});
        if let Some(content) = &self.content {
            record["message"] = json!({"role": self.record_type, "content": content});
        }
        if let Some(summary) = &self.summary {
            record["summary"] = json!(summary);
        }
        if let Some(timestamp) = &self.timestamp {
            record["timestamp"] = json!(timestamp);
        }
        if self.is_sidechain {
            record["isSidechain"] = json!(true);
        }
        if let Some(cwd) = &self.cwd {
            record["cwd"] = json!(cwd);
        }
        record.to_string()
    }
}

/// A two-message conversation whose last activity is `last_activity`
pub fn conversation(
    filename: &str,
    prompt: &str,
    reply: &str,
    last_activity: &str,
) -> TranscriptBuilder {
    TranscriptBuilder::new(filename)
        .with_entry(EntryBuilder::user(prompt).at("2025-01-01T00:00:00Z"))
        .with_entry(EntryBuilder::assistant(reply).at(last_activity))
}

/// Helper to create a corpus with a few projects and sessions of known recency
pub fn realistic_corpus() -> TempDir {
    CorpusBuilder::new()
        .with_project(
            "-Users-test-project1",
            &[
                conversation("s1.jsonl", "Fix the parser", "Fixed it", "2025-03-01T10:00:00Z")
                    .with_entry(EntryBuilder::summary("Parser fix: handle CRLF")),
                TranscriptBuilder::new("warm.jsonl")
                    .with_entry(EntryBuilder::user("Warmup").at("2025-03-05T10:00:00Z"))
                    .with_entry(EntryBuilder::assistant("ready").at("2025-03-05T10:00:01Z")),
            ],
        )
        .with_project(
            "-Users-test-project2",
            &[
                conversation("s2.jsonl", "Add search", "Search added", "2025-03-03T10:00:00Z"),
                conversation("agent-x.jsonl", "agent", "agent reply", "2025-03-09T10:00:00Z"),
            ],
        )
        .build()
}
