/// Configuration for filter history persistence.
use std::path::{Path, PathBuf};

/// Session storage key the filter history snapshot is written under.
pub const DEFAULT_STORAGE_KEY: &str = "filters";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "GRAPHLENS_DATA_DIR";

/// Configuration for the history system.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Directory holding the session database.
    pub data_dir: PathBuf,
    /// Key the serialized history is stored under.
    pub storage_key: String,
    /// Whether a session starts from the snapshot already in storage.
    ///
    /// Off by default: every open starts a new, empty session. Only turn it
    /// on to reload within a session that is still running.
    pub restore_on_open: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            data_dir: resolve_data_dir(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            restore_on_open: false,
        }
    }
}

impl HistoryConfig {
    /// Config that reloads the snapshot left in storage by the current session.
    pub fn reloading(data_dir: &Path) -> Self {
        Self {
            restore_on_open: true,
            ..Self::with_data_dir(data_dir)
        }
    }

    /// Default config rooted at `data_dir` instead of the resolved directory.
    pub fn with_data_dir(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            ..Self::default()
        }
    }
}

/// Resolves the data directory path.
///
/// Resolution order:
/// 1. `GRAPHLENS_DATA_DIR` environment variable
/// 2. `graphlens/` under the platform's local data directory
/// 3. `.data/` in the working directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .map(|d| d.join("graphlens"))
        .unwrap_or_else(|| Path::new(".").join(".data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HistoryConfig::default();
        assert_eq!(config.storage_key, "filters");
        assert!(!config.restore_on_open);
    }

    #[test]
    fn test_with_data_dir() {
        let config = HistoryConfig::with_data_dir(Path::new("/tmp/graphlens-test"));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/graphlens-test"));
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert!(!config.restore_on_open);
    }

    #[test]
    fn test_reloading_opts_into_restore() {
        let config = HistoryConfig::reloading(Path::new("/tmp/graphlens-test"));
        assert!(config.restore_on_open);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/graphlens-test"));
    }

    #[test]
    fn test_resolve_data_dir_with_env_var() {
        // Save and restore env var
        let original = std::env::var(DATA_DIR_ENV).ok();
        std::env::set_var(DATA_DIR_ENV, "/custom/path");
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/custom/path"));
        match original {
            Some(val) => std::env::set_var(DATA_DIR_ENV, val),
            None => std::env::remove_var(DATA_DIR_ENV),
        }
    }
}
