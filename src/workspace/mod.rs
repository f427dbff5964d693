// ABOUTME: Workspace file access for template sources
// ABOUTME: Defines the reader contract and a filesystem implementation rooted at a directory

use std::io;
use std::path::{Path, PathBuf};

/// Read-only view of the workspace the step runs in. Template file paths are
/// resolved relative to the workspace root.
pub trait WorkspaceReader: Send + Sync {
    fn exists(&self, path: &str) -> bool;
    fn is_directory(&self, path: &str) -> bool;
    fn read_utf8(&self, path: &str) -> io::Result<String>;
}

pub struct FsWorkspace {
    root: PathBuf,
}

impl FsWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl WorkspaceReader for FsWorkspace {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }

    fn is_directory(&self, path: &str) -> bool {
        self.resolve(path).is_dir()
    }

    fn read_utf8(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(self.resolve(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_relative_paths_resolve_against_root() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("greeting.tpl"), "hello").unwrap();

        let ws = FsWorkspace::new(dir.path());
        assert!(ws.exists("greeting.tpl"));
        assert!(!ws.is_directory("greeting.tpl"));
        assert_eq!(ws.read_utf8("greeting.tpl").unwrap(), "hello");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let ws = FsWorkspace::new(dir.path());
        assert!(!ws.exists("nope.tpl"));
        assert!(ws.read_utf8("nope.tpl").is_err());
    }

    #[test]
    fn test_directory_detection() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let ws = FsWorkspace::new(dir.path());
        assert!(ws.exists("sub"));
        assert!(ws.is_directory("sub"));
    }
}
