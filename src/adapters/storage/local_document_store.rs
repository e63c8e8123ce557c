//! Local Filesystem Document Store - Implementation of DocumentStore.
//!
//! Every document lives under one root directory. Paths are resolved and
//! checked against the root before any disk access, and writes go through a
//! temp-file-then-rename so readers never observe a partial document.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::ports::{DocumentStore, StorageError};

/// Filesystem-backed document store rooted at one directory.
///
/// # Atomic Writes
///
/// 1. Create the parent directories
/// 2. Write content to a uniquely named sibling `{name}.tmp.{uuid}`
/// 3. Sync to disk
/// 4. Rename onto the destination
///
/// On failure the temp file is removed and the destination is untouched.
///
/// # Usage
///
/// ```rust,ignore
/// let store = LocalDocumentStore::new(".galley");
/// store.write_json("sessions/abc/session.json", &session).await?;
/// let session: Session = store.read_json("sessions/abc/session.json").await?;
/// ```
#[derive(Debug, Clone)]
pub struct LocalDocumentStore {
    root: PathBuf,
}

impl LocalDocumentStore {
    /// Creates a store rooted at `root`.
    ///
    /// The root is made absolute (and canonical when it already exists) but
    /// is not created; see `init_data_dir`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let absolute = std::path::absolute(&root).unwrap_or(root);
        let root = std::fs::canonicalize(&absolute).unwrap_or_else(|_| normalize(&absolute));
        Self { root }
    }

    fn temp_path(path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!("{}.tmp.{}", name, Uuid::new_v4().simple()))
    }

    /// Rejects paths whose nearest existing ancestor resolves (through
    /// symlinks) outside the canonical root.
    async fn check_symlink_escape(&self, relative: &str, path: &Path) -> Result<(), StorageError> {
        let Ok(canonical_root) = fs::canonicalize(&self.root).await else {
            return Ok(());
        };
        for ancestor in path.ancestors() {
            if fs::symlink_metadata(ancestor).await.is_err() {
                continue;
            }
            return match fs::canonicalize(ancestor).await {
                Ok(resolved) if resolved.starts_with(&canonical_root) => Ok(()),
                // Escaping or dangling symlink.
                _ => Err(StorageError::path_traversal(relative)),
            };
        }
        Ok(())
    }

    /// Validates `relative` and checks it against symlink escapes before disk access.
    async fn resolve(&self, relative: &str) -> Result<PathBuf, StorageError> {
        let path = self.validate_path(relative)?;
        self.check_symlink_escape(relative, &path).await?;
        Ok(path)
    }

    async fn write_atomic(&self, relative: &str, path: &Path, content: &str) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::write(relative, format!("create parent: {}", e)))?;
        }

        let temp_path = Self::temp_path(path);
        let result = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(content.as_bytes()).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&temp_path, path).await
        }
        .await;

        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::write(relative, e.to_string()));
        }
        Ok(())
    }
}

/// Drops `.` components and resolves nothing else.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn validate_path(&self, relative: &str) -> Result<PathBuf, StorageError> {
        let candidate = Path::new(relative);
        if candidate
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(StorageError::path_traversal(relative));
        }

        // An absolute candidate replaces the root here and must still land inside it.
        let resolved = normalize(&self.root.join(candidate));
        if !resolved.starts_with(&self.root) {
            return Err(StorageError::path_traversal(relative));
        }
        Ok(resolved)
    }

    async fn exists(&self, relative: &str) -> Result<bool, StorageError> {
        let path = self.resolve(relative).await?;
        fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::read(relative, e.to_string()))
    }

    async fn read_text(&self, relative: &str) -> Result<String, StorageError> {
        let path = self.resolve(relative).await?;
        fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::not_found(relative),
            ErrorKind::InvalidData => StorageError::malformed(relative, "content is not valid UTF-8"),
            _ => StorageError::read(relative, e.to_string()),
        })
    }

    async fn write_text(&self, relative: &str, content: &str) -> Result<(), StorageError> {
        let path = self.resolve(relative).await?;
        self.write_atomic(relative, &path, content).await
    }

    async fn append_text(&self, relative: &str, content: &str) -> Result<(), StorageError> {
        let path = self.resolve(relative).await?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| StorageError::write(relative, e.to_string()))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|e| StorageError::write(relative, e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| StorageError::write(relative, e.to_string()))
    }

    async fn ensure_dir(&self, relative: &str) -> Result<(), StorageError> {
        let path = self.resolve(relative).await?;
        fs::create_dir_all(&path)
            .await
            .map_err(|e| StorageError::write(relative, e.to_string()))
    }

    async fn list_subdirectories(&self, relative: &str) -> Result<BTreeSet<String>, StorageError> {
        let path = self.resolve(relative).await?;
        let mut entries = match fs::read_dir(&path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => return Err(StorageError::read(relative, e.to_string())),
        };

        let mut names = BTreeSet::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::read(relative, e.to_string()))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            if is_dir {
                names.insert(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    async fn remove_tree(&self, relative: &str) -> Result<(), StorageError> {
        let path = self.resolve(relative).await?;
        if path == self.root {
            return Err(StorageError::path_traversal(relative));
        }

        let metadata = match fs::symlink_metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(StorageError::write(relative, e.to_string())),
        };

        let result = if metadata.is_dir() {
            fs::remove_dir_all(&path).await
        } else {
            fs::remove_file(&path).await
        };
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::write(relative, e.to_string())),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
