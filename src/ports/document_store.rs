//! Document Store Port - Sandboxed persistence interface.
//!
//! Every record in Galley (sessions, hearing results, deploy state, exported
//! files, the per-session log) is persisted through this port, addressed by a
//! path relative to one root directory. Adapters (like `LocalDocumentStore`)
//! provide the implementation.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::foundation::{ErrorCode, OperationError};

/// Port for sandboxed document persistence.
///
/// # Contract
///
/// Implementations must:
/// - Resolve every relative path against the root and refuse anything that
///   lands outside it (`StorageError::PathTraversal`), before touching disk
/// - Write atomically: a reader sees either the previous or the new complete
///   content, never a partial write, and no temporary file survives
/// - Report a missing document distinctly from other read failures
///
/// # Layout
///
/// ```text
/// {root}/
/// ├── sessions/{id}/session.json
/// ├── sessions/{id}/hearing-result.json
/// ├── sessions/{id}/deploy-state.json
/// ├── sessions/{id}/galley.log
/// └── output/{id}/terraform/*.tf
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// The absolute root all paths are resolved against.
    fn root(&self) -> &Path;

    /// Resolves a relative path to an absolute one inside the root.
    ///
    /// The check is lexical and touches no disk. Every async operation also
    /// rejects paths that escape the root through a symlink.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::PathTraversal` for any path with a `..`
    /// segment, or one that resolves outside the root.
    fn validate_path(&self, relative: &str) -> Result<PathBuf, StorageError>;

    /// Checks whether a document or directory exists.
    async fn exists(&self, relative: &str) -> Result<bool, StorageError>;

    /// Reads a whole document as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the document does not exist.
    async fn read_text(&self, relative: &str) -> Result<String, StorageError>;

    /// Atomically replaces a document, creating parent directories first.
    async fn write_text(&self, relative: &str, content: &str) -> Result<(), StorageError>;

    /// Appends to a document, creating the file (not its directory) if absent.
    async fn append_text(&self, relative: &str, content: &str) -> Result<(), StorageError>;

    /// Creates a directory and all of its parents.
    async fn ensure_dir(&self, relative: &str) -> Result<(), StorageError>;

    /// Lists the names of the immediate subdirectories, sorted.
    ///
    /// A directory that does not exist yields an empty set.
    async fn list_subdirectories(&self, relative: &str) -> Result<BTreeSet<String>, StorageError>;

    /// Recursively removes a directory. Removing an absent path succeeds.
    async fn remove_tree(&self, relative: &str) -> Result<(), StorageError>;
}

/// Typed JSON access on top of any [`DocumentStore`].
///
/// JSON documents are written pretty-printed with a trailing newline.
#[async_trait]
pub trait DocumentStoreExt: DocumentStore {
    /// Reads and deserializes a JSON document.
    ///
    /// # Errors
    ///
    /// - `StorageError::NotFound` if the document does not exist
    /// - `StorageError::Malformed` if it does not parse as `T`
    async fn read_json<T>(&self, relative: &str) -> Result<T, StorageError>
    where
        T: DeserializeOwned + Send,
    {
        let text = self.read_text(relative).await?;
        serde_json::from_str(&text).map_err(|e| StorageError::malformed(relative, e.to_string()))
    }

    /// Serializes and atomically writes a JSON document.
    async fn write_json<T>(&self, relative: &str, value: &T) -> Result<(), StorageError>
    where
        T: Serialize + Sync,
    {
        let mut text = serde_json::to_string_pretty(value)
            .map_err(|e| StorageError::write(relative, e.to_string()))?;
        text.push('\n');
        self.write_text(relative, &text).await
    }
}

impl<S: DocumentStore + ?Sized> DocumentStoreExt for S {}

/// Rejects a caller-supplied filename that could smuggle in a path.
///
/// Used whenever a bare name becomes a path segment.
pub fn validate_filename(name: &str) -> Result<(), StorageError> {
    if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(StorageError::invalid_filename(name));
    }
    Ok(())
}

/// Errors that can occur during document store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Document was not found.
    #[error("File not found: {path}")]
    NotFound { path: String },

    /// Document exists but its content could not be parsed.
    #[error("Malformed document {path}: {reason}")]
    Malformed { path: String, reason: String },

    /// Reading failed for a reason other than absence.
    #[error("Read failed: {path}: {reason}")]
    Read { path: String, reason: String },

    /// Writing, appending, or removing failed.
    #[error("Write failed: {path}: {reason}")]
    Write { path: String, reason: String },

    /// A bare filename contained a separator or `..`.
    #[error("Invalid filename: {name}")]
    InvalidFilename { name: String },

    /// A path resolved outside the store root.
    #[error("Path traversal detected: {path}")]
    PathTraversal { path: String },
}

impl StorageError {
    /// Creates a not found error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates a malformed content error.
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a read error.
    pub fn read(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Read {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a write error.
    pub fn write(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid filename error.
    pub fn invalid_filename(name: impl Into<String>) -> Self {
        Self::InvalidFilename { name: name.into() }
    }

    /// Creates a path traversal error.
    pub fn path_traversal(path: impl Into<String>) -> Self {
        Self::PathTraversal { path: path.into() }
    }

    /// Returns true if the document was simply absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

impl OperationError for StorageError {
    fn code(&self) -> ErrorCode {
        match self {
            StorageError::NotFound { .. } => ErrorCode::FileMissing,
            StorageError::Malformed { .. } => ErrorCode::FileMalformed,
            StorageError::Read { .. } => ErrorCode::FileReadError,
            StorageError::Write { .. } => ErrorCode::FileWriteError,
            StorageError::InvalidFilename { .. } => ErrorCode::InvalidFilename,
            StorageError::PathTraversal { .. } => ErrorCode::PathTraversal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_filename_accepts_plain_names() {
        assert!(validate_filename("main.tf").is_ok());
        assert!(validate_filename("variables.tf").is_ok());
        assert!(validate_filename(".terraform.lock.hcl").is_ok());
    }

    #[test]
    fn validate_filename_rejects_separators_and_dotdot() {
        for name in ["../main.tf", "a/b.tf", "a\\b.tf", "..", "x..y", ""] {
            assert_eq!(
                validate_filename(name),
                Err(StorageError::invalid_filename(name)),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn error_codes_distinguish_missing_from_malformed() {
        assert_eq!(StorageError::not_found("a").code(), ErrorCode::FileMissing);
        assert_eq!(
            StorageError::malformed("a", "eof").code(),
            ErrorCode::FileMalformed
        );
        assert_eq!(StorageError::read("a", "denied").code(), ErrorCode::FileReadError);
        assert_eq!(StorageError::write("a", "full").code(), ErrorCode::FileWriteError);
        assert_eq!(
            StorageError::path_traversal("../x").code(),
            ErrorCode::PathTraversal
        );
        assert_eq!(
            StorageError::invalid_filename("a/b").code(),
            ErrorCode::InvalidFilename
        );
    }

    #[test]
    fn display_includes_path() {
        let err = StorageError::not_found("sessions/x/session.json");
        assert_eq!(err.to_string(), "File not found: sessions/x/session.json");
    }
}
