//! Post-verdict path inspection.
//!
//! The engine itself never touches the filesystem; this helper exists for
//! collaborators (the CLI, a pre-execution backup step) that want to know
//! what actually exists at the affected paths after a verdict is in hand.

use crate::shell;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stat result for one affected path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// The path as collected, verbatim.
    pub path: String,
    pub exists: bool,
    pub is_dir: bool,
    /// Size in bytes; zero for directories and missing paths.
    pub size: u64,
}

/// Stat every literal affected path. Dynamic tokens (unexpanded variables,
/// substitutions, globs) are skipped: they name no single filesystem object.
///
/// `~` is expanded against the user's home directory so redirects like
/// `> ~/notes.txt` resolve sensibly.
#[must_use]
pub fn stat_paths(paths: &[String]) -> Vec<FileInfo> {
    paths
        .iter()
        .filter(|p| !shell::is_dynamic_token(p))
        .map(|path| {
            let resolved = expand_home(path);
            match std::fs::metadata(&resolved) {
                Ok(meta) => FileInfo {
                    path: path.clone(),
                    exists: true,
                    is_dir: meta.is_dir(),
                    size: if meta.is_dir() { 0 } else { meta.len() },
                },
                Err(_) => FileInfo {
                    path: path.clone(),
                    exists: false,
                    is_dir: false,
                    size: 0,
                },
            }
        })
        .collect()
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_paths_are_reported_not_errored() {
        let infos = stat_paths(&["/definitely/not/a/real/path".to_string()]);
        assert_eq!(infos.len(), 1);
        assert!(!infos[0].exists);
        assert_eq!(infos[0].size, 0);
    }

    #[test]
    fn existing_file_is_statted() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data.txt");
        std::fs::write(&file, b"hello").unwrap();

        let infos = stat_paths(&[file.display().to_string()]);
        assert!(infos[0].exists);
        assert!(!infos[0].is_dir);
        assert_eq!(infos[0].size, 5);
    }

    #[test]
    fn directories_report_zero_size() {
        let dir = tempfile::tempdir().unwrap();
        let infos = stat_paths(&[dir.path().display().to_string()]);
        assert!(infos[0].exists);
        assert!(infos[0].is_dir);
        assert_eq!(infos[0].size, 0);
    }

    #[test]
    fn dynamic_tokens_are_skipped() {
        let infos = stat_paths(&["$HOME/*.log".to_string(), "$(pwd)/x".to_string()]);
        assert!(infos.is_empty());
    }
}
