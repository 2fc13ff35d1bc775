//! Typed errors for reading components, the cache and the config file.
//!
//! Everything here concerns a single file, so every variant carries its
//! path. Orchestration code (builder, CLI) wraps these in `anyhow::Error`.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    /// The file could not be read or written.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file has neither a `<template>` nor a `<script>` block.
    #[error("{path} is not a single-file component: no <template> or <script> block")]
    NotAComponent { path: PathBuf },

    /// A `<script>` block does not parse. Line and column are 1-indexed
    /// positions in the `.vue` file.
    #[error("{path}:{line}:{column}: {message}")]
    ScriptSyntax {
        path: PathBuf,
        message: String,
        line: usize,
        column: usize,
    },

    /// The interface cache cannot be used or written.
    #[error("Cache error at {path}: {message}")]
    Cache { path: PathBuf, message: String },

    /// `vinsight.toml` is malformed.
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl InsightError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn not_a_component(path: impl Into<PathBuf>) -> Self {
        Self::NotAComponent { path: path.into() }
    }

    pub fn script_syntax(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::ScriptSyntax {
            path: path.into(),
            message: message.into(),
            line,
            column,
        }
    }

    pub fn cache(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Cache {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether a batch over many files can skip this one and carry on.
    /// A broken config affects every file, so it is not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config { .. })
    }

    /// The file the error is about.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::NotAComponent { path }
            | Self::ScriptSyntax { path, .. }
            | Self::Cache { path, .. }
            | Self::Config { path, .. } => path,
        }
    }

    /// 1-indexed `(line, column)` of the problem, when known.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            Self::ScriptSyntax { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}

pub type InsightResult<T> = Result<T, InsightError>;

/// Attach a path to an `std::io::Result`.
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> InsightResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> InsightResult<T> {
        self.map_err(|e| InsightError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_error_keeps_source() {
        let err = InsightError::io("/app/src/Btn.vue", Error::new(ErrorKind::NotFound, "gone"));
        assert_eq!(err.path(), Path::new("/app/src/Btn.vue"));
        assert!(err.to_string().contains("gone"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_script_syntax_location() {
        let err = InsightError::script_syntax("/app/src/Btn.vue", "Expected `}` but found `EOF`", 12, 3);
        assert_eq!(err.location(), Some((12, 3)));
        assert_eq!(
            err.to_string(),
            "/app/src/Btn.vue:12:3: Expected `}` but found `EOF`"
        );
        assert_eq!(InsightError::not_a_component("util.vue").location(), None);
    }

    #[test]
    fn test_is_recoverable() {
        assert!(InsightError::not_a_component("/Btn.vue").is_recoverable());
        assert!(InsightError::cache("/app/.vinsight/cache.json", "too large").is_recoverable());
        assert!(!InsightError::config("/app/vinsight.toml", "bad key").is_recoverable());
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> = Err(Error::new(ErrorKind::NotFound, "missing"));
        let err = result.with_path("/missing/Card.vue").unwrap_err();
        assert!(matches!(err, InsightError::Io { .. }));
        assert_eq!(err.path(), Path::new("/missing/Card.vue"));
    }
}
