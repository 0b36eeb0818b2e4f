//! Sanitizing transcript-derived text before it reaches a terminal
//!
//! Summaries, prompts and search contexts come straight from JSONL files the CLI tool
//! wrote, and may contain escape sequences. Anything printed by the `list` and `search`
//! commands goes through [`sanitize_line`] first.

/// Strips ANSI CSI sequences (`ESC [ ... letter`) and control characters other than
/// tab, newline and carriage return
///
/// # Examples
///
/// ```
/// use session_explorer::utils::terminal::strip_ansi_codes;
///
/// let text = "\x1b[31mRed text\x1b[0m";
/// assert_eq!(strip_ansi_codes(text), "Red text");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for next_ch in chars.by_ref() {
                if next_ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }

        if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
            continue;
        }

        result.push(ch);
    }

    result
}

/// Sanitizes `text` and folds it onto one line, cut to `max_chars` with a trailing `…`
pub fn sanitize_line(text: &str, max_chars: usize) -> String {
    let cleaned = strip_ansi_codes(text);
    let folded = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&folded, max_chars)
}

/// Cuts `text` to at most `max_chars` characters, marking the cut with `…`
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
