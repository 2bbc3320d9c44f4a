use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::{Builder, NamedTempFile};
use thiserror::Error;
use tracing::{debug, warn};

/// Failure to persist one of a set of files
#[derive(Debug, Error)]
#[error("failed to write '{}'", path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Write the content next to its destination, ready to be renamed into place.
fn stage(path: &Path, content: &[u8]) -> io::Result<NamedTempFile> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut builder = Builder::new();
    builder.prefix(".modelgen-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }
    let mut temp = builder.tempfile_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    Ok(temp)
}

/// Put back what the committed files replaced, newest first.
fn rollback(committed: &[(&Path, Option<Vec<u8>>)]) {
    for (path, previous) in committed.iter().rev() {
        let restored = match previous {
            Some(content) => std::fs::write(path, content),
            None => std::fs::remove_file(path),
        };
        if let Err(e) = restored {
            warn!(path = %path.display(), error = %e, "failed to roll back file");
        }
    }
}

/// Write a set of files, all or nothing.
///
/// Every file is first staged in its destination directory. Staged files are
/// then renamed into place; if one rename fails, the files already renamed are
/// restored to their previous content (or removed) and the error is returned.
pub fn write_all(files: &[File]) -> Result<(), WriteError> {
    let mut staged = Vec::with_capacity(files.len());
    for file in files {
        let temp = stage(&file.path, &file.content).map_err(|source| file.error(source))?;
        staged.push((file, temp));
    }

    let mut committed: Vec<(&Path, Option<Vec<u8>>)> = Vec::with_capacity(files.len());
    for (file, temp) in staged {
        let previous = std::fs::read(&file.path).ok();
        if let Err(e) = temp.persist(&file.path) {
            rollback(&committed);
            return Err(file.error(e.error));
        }
        debug!(path = %file.path.display(), bytes = file.content.len(), "wrote file");
        committed.push((&file.path, previous));
    }
    Ok(())
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// Nothing was written (dry run)
    DryRun,
}

/// A generated file ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    path: PathBuf,
    content: Vec<u8>,
}

impl File {
    /// Create a new file with the given path and content
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file content
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Check if the file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the file, creating parent directories and replacing any existing content.
    ///
    /// The destination either keeps its old content or receives the new content
    /// in full.
    pub fn write(&self) -> Result<(), WriteError> {
        write_all(std::slice::from_ref(self))
    }

    fn error(&self, source: io::Error) -> WriteError {
        WriteError {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_write_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.rs");

        File::new(&path, "hello").write().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
        assert_eq!(entries(temp.path()), ["test.rs"]);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("model.rs");

        File::new(&path, "nested").write().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "nested");
    }

    #[test]
    fn test_file_write_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.rs");

        fs::write(&path, "original").unwrap();

        let file = File::new(&path, "updated");
        file.write().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "updated");
    }

    #[test]
    fn test_file_exists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.rs");

        let file = File::new(&path, "content");
        assert!(!file.exists());

        file.write().unwrap();
        assert!(file.exists());
        assert_eq!(file.content(), b"content");
        assert_eq!(file.path(), path);
    }

    #[test]
    fn test_write_error_names_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("taken.rs");
        fs::create_dir(&path).unwrap();

        let err = File::new(&path, "content").write().unwrap_err();

        assert_eq!(err.path, path);
        assert!(path.is_dir());
        assert_eq!(entries(temp.path()), ["taken.rs"]);
    }

    #[test]
    fn test_write_all() {
        let temp = TempDir::new().unwrap();
        let files = [
            File::new(temp.path().join("a.rs"), "a"),
            File::new(temp.path().join("b.rs"), "b"),
        ];

        write_all(&files).unwrap();

        assert_eq!(entries(temp.path()), ["a.rs", "b.rs"]);
        assert_eq!(fs::read_to_string(temp.path().join("b.rs")).unwrap(), "b");
    }

    #[test]
    fn test_write_all_rolls_back_on_failure() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.rs"), "old a").unwrap();
        // A directory cannot be replaced by a file
        fs::create_dir(temp.path().join("c.rs")).unwrap();

        let files = [
            File::new(temp.path().join("a.rs"), "new a"),
            File::new(temp.path().join("b.rs"), "new b"),
            File::new(temp.path().join("c.rs"), "new c"),
        ];
        let err = write_all(&files).unwrap_err();

        assert_eq!(err.path, temp.path().join("c.rs"));
        assert_eq!(entries(temp.path()), ["a.rs", "c.rs"]);
        assert_eq!(fs::read_to_string(temp.path().join("a.rs")).unwrap(), "old a");
    }
}
