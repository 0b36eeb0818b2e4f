use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub encoded_name: String,
    pub decoded_path: PathBuf,
    pub project_dir: PathBuf,
    /// Transcript files, sorted by file name
    pub session_files: Vec<PathBuf>,
}
