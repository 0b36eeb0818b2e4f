pub mod environment;
pub mod paths;
pub mod terminal;

pub use environment::{get_claude_dir, get_projects_dir};
pub use paths::{
    DecodeCandidates, FsProbe, PathProbe, decode_path, decode_path_with, encode_path,
    format_path_with_tilde, naive_decode, safe_open_file, validate_file_size,
    validate_path_not_symlink,
};
