//! File System Utilities
//!
//! Per-user directories for settings, session, logs and exported files.

use crate::error::{Error, Result};
use directories::{ProjectDirs, UserDirs};
use home::home_dir;
use std::fs;
use std::path::{Path, PathBuf};

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "taskdesk", "taskdesk").ok_or_else(|| Error::Invalid {
        message: "Could not determine project directories".to_string(),
    })
}

fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(dir.to_path_buf())
}

/// Settings and session files
///
/// - **Linux**: `~/.config/taskdesk/`
/// - **macOS**: `~/Library/Application Support/com.taskdesk.taskdesk/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\taskdesk\taskdesk\config\`
pub fn get_or_create_config_dir() -> Result<PathBuf> {
    ensure_dir(project_dirs()?.config_dir())
}

/// Rolling log files
pub fn get_or_create_data_dir() -> Result<PathBuf> {
    ensure_dir(project_dirs()?.data_dir())
}

/// Generated print/PDF reports
pub fn get_or_create_cache_dir() -> Result<PathBuf> {
    ensure_dir(project_dirs()?.cache_dir())
}

/// Where CSV downloads land: the user's download folder, else the home
/// directory, else the cache directory.
pub fn get_or_create_download_dir() -> Result<PathBuf> {
    if let Some(dir) = UserDirs::new().and_then(|u| u.download_dir().map(Path::to_path_buf)) {
        return ensure_dir(&dir);
    }
    if let Some(home) = home_dir() {
        return Ok(home);
    }
    get_or_create_cache_dir()
}

/// `dir/name`, or `dir/stem (n).ext` when the name is taken.
pub fn unique_file_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{ext}")),
        None => (name, String::new()),
    };
    (1..)
        .map(|n| dir.join(format!("{stem} ({n}){ext}")))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_file_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = unique_file_path(dir.path(), "table_data.csv");
        assert_eq!(first, dir.path().join("table_data.csv"));
        fs::write(&first, "x").expect("write");
        let second = unique_file_path(dir.path(), "table_data.csv");
        assert_eq!(second, dir.path().join("table_data (1).csv"));
    }
}
