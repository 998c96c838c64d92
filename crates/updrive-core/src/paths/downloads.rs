//! Downloads folder resolution.

use std::env;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Default downloads folder, relative to the working directory.
pub const DEFAULT_DOWNLOADS_DIR: &str = "downloads";

/// Environment variable overriding the downloads folder.
pub const DOWNLOADS_DIR_ENV: &str = "UPDRIVE_DOWNLOADS_DIR";

/// How the downloads folder was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadsDirSource {
    /// The caller passed an explicit path (e.g., CLI flag).
    Explicit,
    /// The path came from `UPDRIVE_DOWNLOADS_DIR` / `.env`.
    EnvVar,
    /// Fallback default (`./downloads`).
    Default,
}

/// Resolution result for the downloads folder.
#[derive(Debug, Clone)]
pub struct DownloadsDirResolution {
    /// The resolved, absolute path.
    pub path: PathBuf,
    /// How the path was determined.
    pub source: DownloadsDirSource,
}

/// Resolve the downloads folder from an explicit override, env var, or default.
///
/// Resolution order:
/// 1. Explicit path provided by caller (highest priority)
/// 2. `UPDRIVE_DOWNLOADS_DIR` environment variable
/// 3. `./downloads` under the current working directory
///
/// Relative paths are anchored at the current working directory.
pub fn resolve_downloads_dir(explicit: Option<&Path>) -> Result<DownloadsDirResolution, PathError> {
    if let Some(path) = explicit {
        return Ok(DownloadsDirResolution {
            path: absolutize(path)?,
            source: DownloadsDirSource::Explicit,
        });
    }

    if let Ok(env_path) = env::var(DOWNLOADS_DIR_ENV) {
        if !env_path.trim().is_empty() {
            return Ok(DownloadsDirResolution {
                path: absolutize(Path::new(env_path.trim()))?,
                source: DownloadsDirSource::EnvVar,
            });
        }
    }

    Ok(DownloadsDirResolution {
        path: absolutize(Path::new(DEFAULT_DOWNLOADS_DIR))?,
        source: DownloadsDirSource::Default,
    })
}

fn absolutize(path: &Path) -> Result<PathBuf, PathError> {
    if path.as_os_str().is_empty() {
        return Err(PathError::EmptyPath);
    }
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = env::current_dir().map_err(|e| PathError::CurrentDirError(e.to_string()))?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let resolution = resolve_downloads_dir(Some(Path::new("/srv/uploads"))).unwrap();
        assert_eq!(resolution.path, PathBuf::from("/srv/uploads"));
        assert_eq!(resolution.source, DownloadsDirSource::Explicit);
    }

    #[test]
    fn test_relative_explicit_path_is_anchored() {
        let resolution = resolve_downloads_dir(Some(Path::new("uploads"))).unwrap();
        assert!(resolution.path.is_absolute());
        assert!(resolution.path.ends_with("uploads"));
    }

    #[test]
    fn test_empty_explicit_path_is_rejected() {
        let err = resolve_downloads_dir(Some(Path::new(""))).unwrap_err();
        assert!(matches!(err, PathError::EmptyPath));
    }
}
