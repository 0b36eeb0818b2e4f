/// Edge case integration tests
///
/// These tests cover filesystem quirks, data edge cases, and other unusual scenarios
mod common;

use std::fs;

use common::{CorpusBuilder, EntryBuilder, TranscriptBuilder, conversation};
use session_explorer::{enumerate_sessions, search};

#[test]
fn test_edge_case_blank_lines_between_entries() {
    let corpus = CorpusBuilder::new().with_project(
        "-Users-test-project",
        &[TranscriptBuilder::new("s.jsonl")
            .with_entry(EntryBuilder::user("Entry 1"))
            .with_raw_line("")
            .with_raw_line("   ")
            .with_raw_line("\t")
            .with_entry(EntryBuilder::assistant("Entry 2"))],
    );

    let sessions = enumerate_sessions(&corpus.corpus(), 50);
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].message_count, 2);
}

#[test]
fn test_edge_case_mixed_line_endings() {
    let dir = CorpusBuilder::new().with_project("-Users-test-project", &[]);
    let content = format!(
        "{}\r\n{}\n{}",
        EntryBuilder::user("one").to_json(),
        EntryBuilder::assistant("two").to_json(),
        EntryBuilder::user("three").to_json()
    );
    fs::write(dir.corpus().join("-Users-test-project").join("s.jsonl"), content).unwrap();

    let sessions = enumerate_sessions(&dir.corpus(), 50);
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].message_count, 3);
}

#[test]
fn test_edge_case_unicode_search_context() {
    let corpus = CorpusBuilder::new().with_project(
        "-Users-test-project",
        &[conversation(
            "s.jsonl",
            "Hello 👋 World 🌍",
            "测试 中文 テスト DIFF مرحبا",
            "2025-02-01T00:00:00Z",
        )],
    );

    let hits = search(&corpus.corpus(), "diff", 10);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].context, "测试 中文 テスト DIFF مرحبا");

    let hits = search(&corpus.corpus(), "👋", 10);
    assert_eq!(hits.len(), 1);
}

#[test]
fn test_edge_case_greek_final_sigma_query() {
    let corpus = CorpusBuilder::new().with_project(
        "-Users-test-project",
        &[conversation("s.jsonl", "ΟΔΟΣ ΠΑΝΕΠΙΣΤΗΜΙΟΥ", "ok", "2025-02-01T00:00:00Z")],
    );

    let hits = search(&corpus.corpus(), "ΟΔΟΣ", 10);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].context, "ΟΔΟΣ ΠΑΝΕΠΙΣΤΗΜΙΟΥ");
    assert_eq!(search(&corpus.corpus(), "οδοσ πανεπιστημιου", 10).len(), 1);
}

#[test]
fn test_edge_case_very_long_message_context_is_bounded() {
    let long_text = format!("{}MARKER{}", "a".repeat(100 * 1024), "b".repeat(100 * 1024));
    let corpus = CorpusBuilder::new().with_project(
        "-Users-test-project",
        &[conversation("s.jsonl", "start", &long_text, "2025-02-01T00:00:00Z")],
    );

    let hits = search(&corpus.corpus(), "marker", 10);
    assert_eq!(hits.len(), 1);
    let context = &hits[0].context;
    assert!(context.starts_with("..."));
    assert!(context.ends_with("..."));
    assert_eq!(context.chars().count(), 3 + 50 + "MARKER".len() + 50 + 3);
}

#[test]
fn test_edge_case_many_sessions() {
    let transcripts: Vec<TranscriptBuilder> = (0..200)
        .map(|i| {
            let at = format!("2025-01-01T{:02}:{:02}:00Z", i / 60, i % 60);
            conversation(&format!("s{:03}.jsonl", i), "q", "a", &at)
        })
        .collect();
    let corpus = CorpusBuilder::new().with_project("-Users-test-project", &transcripts);

    let sessions = enumerate_sessions(&corpus.corpus(), 50);
    assert_eq!(sessions.len(), 50);
    assert_eq!(sessions[0].id, "s199");
    assert_eq!(sessions[49].id, "s150");
}

#[test]
fn test_edge_case_epoch_millis_and_rfc3339_mixed() {
    let dir = CorpusBuilder::new().with_project("-Users-test-project", &[]);
    let content = concat!(
        r#"{"type":"user","message":{"content":"a"},"timestamp":1735689600000}"#,
        "\n",
        r#"{"type":"assistant","message":{"content":"b"},"timestamp":"2025-01-02T00:00:00Z"}"#
    );
    fs::write(dir.corpus().join("-Users-test-project").join("s.jsonl"), content).unwrap();

    let sessions = enumerate_sessions(&dir.corpus(), 50);
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].start_time.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    assert_eq!(sessions[0].last_activity_time.to_rfc3339(), "2025-01-02T00:00:00+00:00");
}

#[test]
fn test_edge_case_summary_only_session_skipped() {
    let corpus = CorpusBuilder::new().with_project(
        "-Users-test-project",
        &[TranscriptBuilder::new("s.jsonl")
            .with_entry(EntryBuilder::summary("Just a summary"))
            .with_entry(EntryBuilder::other("file-history-snapshot"))],
    );
    assert!(enumerate_sessions(&corpus.corpus(), 50).is_empty());
}

#[test]
fn test_edge_case_two_user_messages_without_reply_kept() {
    let corpus = CorpusBuilder::new().with_project(
        "-Users-test-project",
        &[TranscriptBuilder::new("s.jsonl")
            .with_entry(EntryBuilder::user("first"))
            .with_entry(EntryBuilder::user("second"))],
    );
    let sessions = enumerate_sessions(&corpus.corpus(), 50);
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].message_count, 2);
}

#[test]
fn test_edge_case_single_user_message_skipped() {
    let corpus = CorpusBuilder::new().with_project(
        "-Users-test-project",
        &[TranscriptBuilder::new("s.jsonl").with_entry(EntryBuilder::user("only"))],
    );
    assert!(enumerate_sessions(&corpus.corpus(), 50).is_empty());
}

#[test]
fn test_edge_case_empty_file_skipped() {
    let corpus = CorpusBuilder::new()
        .with_project("-Users-test-project", &[TranscriptBuilder::new("empty.jsonl")]);
    assert!(enumerate_sessions(&corpus.corpus(), 50).is_empty());
}

#[test]
fn test_edge_case_corpus_root_is_a_file() {
    let corpus = CorpusBuilder::new();
    let file = corpus.corpus().join("not-a-dir");
    fs::write(&file, "x").unwrap();
    assert!(enumerate_sessions(&file, 50).is_empty());
}

#[test]
fn test_edge_case_hidden_project_directory_ignored() {
    let corpus = CorpusBuilder::new()
        .with_project(".trash", &[conversation("s.jsonl", "q", "a", "2025-02-01T00:00:00Z")]);
    assert!(enumerate_sessions(&corpus.corpus(), 50).is_empty());
}

#[test]
fn test_edge_case_session_id_with_dots() {
    let corpus = CorpusBuilder::new().with_project(
        "-Users-test-project",
        &[conversation("2025-03-07.nightly.jsonl", "q", "a", "2025-03-07T09:05:00Z")],
    );
    let sessions = enumerate_sessions(&corpus.corpus(), 50);
    assert_eq!(sessions[0].id, "2025-03-07.nightly");
}
