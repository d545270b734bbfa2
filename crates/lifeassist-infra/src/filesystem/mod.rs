//! Data directory layout for lifeassist.
//!
//! ```text
//! {data_dir}/
//!   config.toml
//!   history/
//!     chat_{session_id}.json
//! ```

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "LIFEASSIST_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `LIFEASSIST_DATA_DIR` environment variable
/// 2. `~/.lifeassist`
/// 3. `./.lifeassist` when no home directory is known
pub fn resolve_data_dir() -> PathBuf {
    resolve_data_dir_with(std::env::var(DATA_DIR_ENV).ok(), dirs::home_dir())
}

fn resolve_data_dir_with(env_dir: Option<String>, home: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = env_dir.filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }

    if let Some(home) = home {
        return home.join(".lifeassist");
    }

    PathBuf::from(".lifeassist")
}

/// Directory holding one history file per session: `{data_dir}/history/`.
pub fn history_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("history")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_dir_wins() {
        let dir = resolve_data_dir_with(
            Some("/tmp/test-lifeassist".to_string()),
            Some(PathBuf::from("/home/user")),
        );
        assert_eq!(dir, PathBuf::from("/tmp/test-lifeassist"));
    }

    #[test]
    fn test_blank_env_dir_is_ignored() {
        let dir = resolve_data_dir_with(Some("  ".to_string()), Some(PathBuf::from("/home/user")));
        assert_eq!(dir, PathBuf::from("/home/user/.lifeassist"));
    }

    #[test]
    fn test_no_home_falls_back_to_cwd() {
        assert_eq!(resolve_data_dir_with(None, None), PathBuf::from(".lifeassist"));
    }

    #[test]
    fn test_history_dir() {
        assert_eq!(
            history_dir(Path::new("/home/user/.lifeassist")),
            PathBuf::from("/home/user/.lifeassist/history")
        );
    }
}
