//! File locator for the well-known exchange directories
//!
//! User-supplied paths arrive in several shapes: absolute POSIX paths,
//! Windows-style host paths, or bare file names. Path-format detection is a
//! single normalization step; resolution is a linear probe over the
//! configured candidate directories.

use std::path::PathBuf;

use ado_core::config::DirectoriesConfig;
use tokio::fs;
use tracing::debug;

use crate::error::{ToolError, ToolResult};

/// Reduce any supported path shape to its trailing file name.
pub fn normalize_filename(path: &str) -> String {
    path.replace('\\', "/")
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Windows-style input: backslash separators or a single-letter drive prefix.
fn is_windows_style(path: &str) -> bool {
    if path.contains('\\') {
        return true;
    }
    match path.split_once(':') {
        Some((drive, _)) => drive.len() == 1,
        None => false,
    }
}

/// Resolves user-supplied paths against the well-known directories.
#[derive(Debug, Clone)]
pub struct FileLocator {
    dirs: DirectoriesConfig,
}

impl FileLocator {
    pub fn new(dirs: DirectoriesConfig) -> Self {
        Self { dirs }
    }

    /// Locate a file for upload.
    ///
    /// - An absolute POSIX path that exists is used as-is.
    /// - An absolute POSIX path under a candidate directory that does not
    ///   exist fails for that exact path.
    /// - Everything else probes the candidate directories in order and
    ///   returns the first hit; relative inputs are additionally tried as
    ///   given.
    pub async fn locate(&self, requested: &str) -> ToolResult<PathBuf> {
        let windows = is_windows_style(requested);

        if !windows && requested.starts_with('/') {
            let path = PathBuf::from(requested);
            if fs::try_exists(&path).await.unwrap_or(false) {
                return Ok(path);
            }
            if self.dirs.candidates().iter().any(|d| path.starts_with(d)) {
                return Err(ToolError::FileNotFound {
                    path: requested.to_string(),
                    searched: vec![path],
                });
            }
            // Wrong prefix; fall through and probe by file name.
        }

        let candidates = self.candidates_for(requested, windows);
        for candidate in &candidates {
            if fs::try_exists(candidate).await.unwrap_or(false) {
                debug!(requested, resolved = %candidate.display(), "File located");
                return Ok(candidate.clone());
            }
        }

        Err(ToolError::FileNotFound {
            path: requested.to_string(),
            searched: candidates,
        })
    }

    fn candidates_for(&self, requested: &str, windows: bool) -> Vec<PathBuf> {
        if windows || requested.starts_with('/') {
            let filename = normalize_filename(requested);
            self.dirs
                .candidates()
                .iter()
                .map(|d| d.join(&filename))
                .collect()
        } else {
            // Relative paths may name a nested file; keep them intact and
            // also try them relative to the working directory.
            let mut candidates: Vec<PathBuf> = self
                .dirs
                .candidates()
                .iter()
                .map(|d| d.join(requested))
                .collect();
            candidates.push(PathBuf::from(requested));
            candidates
        }
    }
}
