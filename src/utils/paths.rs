use std::borrow::Cow;
use std::env;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Character that replaced every path separator when the CLI named a project directory
pub const ENCODED_SEPARATOR: char = '-';

// Maximum transcript size: 100MB
const MAX_FILE_SIZE_BYTES: u64 = 100 * 1024 * 1024;

/// Read-only view of the filesystem used to validate decode candidates
///
/// Decoding only ever asks two questions, so tests can answer them from a fixed
/// set of paths instead of touching disk.
pub trait PathProbe {
    /// True if `path` exists (file or directory)
    fn exists(&self, path: &Path) -> bool;

    /// True if `path` exists and is a directory
    fn is_dir(&self, path: &Path) -> bool;
}

/// [`PathProbe`] backed by the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl PathProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Encodes a file system path into Claude's project directory format
///
/// Every separator becomes [`ENCODED_SEPARATOR`]. The mapping is lossy: a `-` that was
/// already part of a segment name is indistinguishable from an encoded separator.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use session_explorer::encode_path;
///
/// let path = PathBuf::from("/Users/foo/bar-baz");
/// assert_eq!(encode_path(&path), "-Users-foo-bar-baz");
/// ```
pub fn encode_path(path: &Path) -> String {
    path.to_string_lossy().replace(['/', '\\'], "-")
}

/// Decodes Claude's project directory format back to a file system path
///
/// Tries every way of regrouping the `-`-separated tokens into path segments and returns
/// the first candidate that exists on disk. Falls back to [`naive_decode`] when nothing
/// matches, so this never fails.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use session_explorer::decode_path;
///
/// // Nothing like this exists, so every token becomes its own segment
/// let encoded = "-no-such-root-foo-bar";
/// assert_eq!(decode_path(encoded), PathBuf::from("/no/such/root/foo/bar"));
/// ```
pub fn decode_path(encoded: &str) -> PathBuf {
    decode_path_with(encoded, &FsProbe)
}

/// [`decode_path`] with an injected filesystem view
pub fn decode_path_with<P: PathProbe + ?Sized>(encoded: &str, probe: &P) -> PathBuf {
    DecodeCandidates::new(encoded, probe)
        .find(|candidate| probe.exists(candidate))
        .unwrap_or_else(|| naive_decode(encoded))
}

/// Treats every token as its own path segment
pub fn naive_decode(encoded: &str) -> PathBuf {
    let tokens: Vec<&str> = split_tokens(encoded).filter(|t| !t.is_empty()).collect();
    PathBuf::from(format!("/{}", tokens.join("/")))
}

fn split_tokens(encoded: &str) -> std::str::Split<'_, char> {
    encoded.strip_prefix(ENCODED_SEPARATOR).unwrap_or(encoded).split(ENCODED_SEPARATOR)
}

/// Lazy depth-first enumeration of the paths an encoded name could stand for
///
/// At every token the search first tries starting a new segment, then gluing the token
/// onto the current segment with a `-`. A segment is only closed if the path up to it is
/// an existing directory, so dead branches are cut early. Yielded candidates have consumed
/// all tokens but have not been checked for existence; that is up to the caller.
pub struct DecodeCandidates<'a, P: PathProbe + ?Sized> {
    tokens: Vec<&'a str>,
    probe: &'a P,
    stack: Vec<Frame>,
}

struct Frame {
    next_token: usize,
    closed: PathBuf,
    segment: String,
}

impl<'a, P: PathProbe + ?Sized> DecodeCandidates<'a, P> {
    pub fn new(encoded: &'a str, probe: &'a P) -> Self {
        let tokens: Vec<&str> = split_tokens(encoded).collect();
        let stack = match tokens.first() {
            Some(first) => vec![Frame {
                next_token: 1,
                closed: PathBuf::from("/"),
                segment: (*first).to_string(),
            }],
            None => Vec::new(),
        };
        Self { tokens, probe, stack }
    }
}

impl<P: PathProbe + ?Sized> Iterator for DecodeCandidates<'_, P> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        while let Some(frame) = self.stack.pop() {
            if frame.next_token == self.tokens.len() {
                if frame.segment.is_empty() {
                    continue;
                }
                return Some(frame.closed.join(&frame.segment));
            }

            let token = self.tokens[frame.next_token];

            // Pushed first so it is explored after the new-segment branch
            let mut joined = String::with_capacity(frame.segment.len() + token.len() + 1);
            joined.push_str(&frame.segment);
            joined.push(ENCODED_SEPARATOR);
            joined.push_str(token);
            let closed_prefix = if frame.segment.is_empty() {
                None
            } else {
                Some(frame.closed.join(&frame.segment))
            };
            self.stack.push(Frame {
                next_token: frame.next_token + 1,
                closed: frame.closed,
                segment: joined,
            });

            if let Some(prefix) = closed_prefix
                && self.probe.is_dir(&prefix)
            {
                self.stack.push(Frame {
                    next_token: frame.next_token + 1,
                    closed: prefix,
                    segment: token.to_string(),
                });
            }
        }
        None
    }
}

/// Validates that a file's size is within acceptable limits (100MB)
///
/// Takes an open file handle to avoid TOCTOU (time-of-check-time-of-use)
/// race conditions where the file could be modified between the size check
/// and subsequent file operations.
///
/// # Errors
///
/// Returns an error if:
/// - The file metadata cannot be read
/// - The file is larger than 100MB
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_FILE_SIZE_BYTES
        );
    }

    Ok(())
}

/// Rejects symlinks so a crafted corpus cannot point the indexer outside itself
pub fn validate_path_not_symlink(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path)
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
    if metadata.file_type().is_symlink() {
        bail!("Symlinks are not allowed: {}", path.display());
    }
    Ok(())
}

/// Opens a transcript for reading without following symlinks, then checks its size
pub fn safe_open_file(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.read(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.custom_flags(libc::O_NOFOLLOW);
    }

    let file =
        options.open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    validate_file_size(&file, path)?;
    Ok(file)
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use session_explorer::format_path_with_tilde;
///
/// let path = PathBuf::from("/Users/alice/Documents");
/// // Returns "~/Documents" if HOME=/Users/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && !home.is_empty()
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
