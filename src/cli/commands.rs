use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::cli::format::format_last_activity;
use crate::config::{self, Config};
use crate::indexer::{build_session_index, enumerate_sessions};
use crate::models::{SearchHit, Session};
use crate::naming::Namer;
use crate::search::search_transcripts;
use crate::utils::terminal::sanitize_line;
use crate::utils::{decode_path, encode_path, format_path_with_tilde};

const PROMPT_PREVIEW_CHARS: usize = 100;
const CONTEXT_PREVIEW_CHARS: usize = 400;

#[derive(Parser)]
#[command(name = "session-explorer")]
#[command(version)]
#[command(about = "Browse and search CLI session transcripts", long_about = None)]
pub struct Cli {
    /// Corpus root holding one directory per project (default: ~/.claude/projects)
    #[arg(long, global = true, value_name = "DIR")]
    pub corpus: Option<PathBuf>,

    /// Config file (default: <config dir>/session-explorer/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the most recently active sessions
    List {
        /// Maximum number of sessions to show
        #[arg(long)]
        limit: Option<usize>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Case-insensitive search across all message text
    Search {
        query: String,
        /// Maximum number of hits
        #[arg(long)]
        max: Option<usize>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Decode a project directory name back into a path
    Decode {
        #[arg(allow_hyphen_values = true)]
        encoded: String,
    },
    /// Encode a path the way project directories are named
    Encode { path: PathBuf },
    /// Show statistics about the session corpus
    Stats,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListedSession<'a> {
    label: String,
    category: String,
    #[serde(flatten)]
    session: &'a Session,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Decode { encoded }) => {
            println!("{}", decode_path(encoded).display());
        }
        Some(Commands::Encode { path }) => {
            println!("{}", encode_path(path));
        }
        Some(Commands::List { limit, json }) => {
            let config = load_config(&cli)?;
            list_sessions(&config, limit.unwrap_or(config.list_limit), *json)?;
        }
        Some(Commands::Search { query, max, json }) => {
            let config = load_config(&cli)?;
            search_sessions(&config, query, max.unwrap_or(config.search_max_results), *json)?;
        }
        Some(Commands::Stats) => {
            let config = load_config(&cli)?;
            show_stats(&config)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = config::load(cli.config.as_deref())?;
    if let Some(corpus) = &cli.corpus {
        config.corpus_root = Some(corpus.clone());
    }
    Ok(config)
}

fn list_sessions(config: &Config, limit: usize, json: bool) -> Result<()> {
    let corpus = config.resolve_corpus_root()?;
    let namer = config.namer();
    let sessions = enumerate_sessions(&corpus, limit);

    if json {
        let listed: Vec<ListedSession> = sessions
            .iter()
            .map(|session| ListedSession {
                label: namer.label(session),
                category: namer.category_for(session),
                session,
            })
            .collect();
        return print_json(&listed);
    }

    if sessions.is_empty() {
        println!("No sessions found in {}", format_path_with_tilde(&corpus));
        return Ok(());
    }

    let now = Utc::now();
    for session in &sessions {
        println!("{}", sanitize_line(&namer.label(session), PROMPT_PREVIEW_CHARS));
        println!(
            "  {}  ·  {} messages  ·  {}",
            format_path_with_tilde(&session.project_path),
            session.message_count,
            format_last_activity(&session.last_activity_time, &now)
        );
        if let Some(prompt) = &session.first_prompt {
            println!("  {}", sanitize_line(prompt, PROMPT_PREVIEW_CHARS));
        }
        println!("  id: {}", session.id);
    }

    Ok(())
}

fn search_sessions(config: &Config, query: &str, max: usize, json: bool) -> Result<()> {
    let corpus = config.resolve_corpus_root()?;
    let hits: Vec<SearchHit> =
        search_transcripts(&corpus, query, config.search_options()).take(max).collect();

    if json {
        return print_json(&hits);
    }

    if hits.is_empty() {
        println!("No matches for \"{}\"", sanitize_line(query, PROMPT_PREVIEW_CHARS));
        return Ok(());
    }

    let namer = config.namer();
    for hit in &hits {
        print_hit(hit, &namer);
    }
    println!();
    println!("{} match{}", hits.len(), if hits.len() == 1 { "" } else { "es" });

    Ok(())
}

fn print_hit(hit: &SearchHit, namer: &Namer) {
    println!(
        "[{}] {} ({})",
        hit.session.id,
        sanitize_line(&namer.label(&hit.session), PROMPT_PREVIEW_CHARS),
        format_path_with_tilde(&hit.session.project_path)
    );
    println!("  {}", sanitize_line(&hit.context, CONTEXT_PREVIEW_CHARS));
}

fn show_stats(config: &Config) -> Result<()> {
    let corpus = config.resolve_corpus_root()?;
    let index = build_session_index(&corpus);
    let report = &index.report;

    println!("Session Corpus Statistics");
    println!("=========================");
    println!("Projects: {}", report.projects);
    println!("Session files: {}", report.files_scanned);
    println!("  Indexed: {}", report.indexed);
    println!("  Skipped: {}", report.skipped_total());
    for (reason, count) in &report.skipped {
        println!("    {}: {}", reason, count);
    }
    println!("  Failed: {}", report.failed);
    let messages: usize = index.sessions.iter().map(|s| s.message_count).sum();
    println!("Total messages: {}", messages);
    println!();
    println!("Corpus directory: {}", format_path_with_tilde(&corpus));

    if let Some(oldest) = index.sessions.iter().map(|s| s.start_time).min() {
        println!("Oldest session: {}", oldest.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(newest) = index.sessions.first() {
        println!("Latest activity: {}", newest.last_activity_time.format("%Y-%m-%d %H:%M:%S"));
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}
