//! File-system abstraction for the staging tree, the serializer and the archiver.
//!
//! [`OsFs`] talks to the local disk; [`MemFs`] keeps everything in memory and is
//! what the unit and integration tests run the pipeline against.

use anyhow::{Context, Result, anyhow, bail};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;

/// One child of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: Utf8PathBuf,
    pub is_dir: bool,
}

/// Trait for abstracting file I/O (local disk vs. in-memory).
pub trait FileSystem {
    /// Create a directory and all missing parents.
    fn create_dir_all(&mut self, path: &Utf8Path) -> Result<()>;
    /// Write a file, replacing existing content. The parent directory must exist.
    fn write(&mut self, path: &Utf8Path, contents: &[u8]) -> Result<()>;
    fn read(&mut self, path: &Utf8Path) -> Result<Vec<u8>>;
    /// List the direct children of a directory, in enumeration order.
    fn read_dir(&mut self, path: &Utf8Path) -> Result<Vec<DirEntry>>;
    fn exists(&mut self, path: &Utf8Path) -> bool;
    fn is_dir(&mut self, path: &Utf8Path) -> bool;
    fn remove_file(&mut self, path: &Utf8Path) -> Result<()>;
    fn remove_dir_all(&mut self, path: &Utf8Path) -> Result<()>;
    /// Move a file. Implementations may fall back to copy + delete.
    fn rename(&mut self, from: &Utf8Path, to: &Utf8Path) -> Result<()>;
}

impl<F: FileSystem + ?Sized> FileSystem for &mut F {
    fn create_dir_all(&mut self, path: &Utf8Path) -> Result<()> {
        (**self).create_dir_all(path)
    }
    fn write(&mut self, path: &Utf8Path, contents: &[u8]) -> Result<()> {
        (**self).write(path, contents)
    }
    fn read(&mut self, path: &Utf8Path) -> Result<Vec<u8>> {
        (**self).read(path)
    }
    fn read_dir(&mut self, path: &Utf8Path) -> Result<Vec<DirEntry>> {
        (**self).read_dir(path)
    }
    fn exists(&mut self, path: &Utf8Path) -> bool {
        (**self).exists(path)
    }
    fn is_dir(&mut self, path: &Utf8Path) -> bool {
        (**self).is_dir(path)
    }
    fn remove_file(&mut self, path: &Utf8Path) -> Result<()> {
        (**self).remove_file(path)
    }
    fn remove_dir_all(&mut self, path: &Utf8Path) -> Result<()> {
        (**self).remove_dir_all(path)
    }
    fn rename(&mut self, from: &Utf8Path, to: &Utf8Path) -> Result<()> {
        (**self).rename(from, to)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// OsFs
// ────────────────────────────────────────────────────────────────────────────

/// Reads and writes files directly on the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFs;

impl FileSystem for OsFs {
    fn create_dir_all(&mut self, path: &Utf8Path) -> Result<()> {
        std::fs::create_dir_all(path).with_context(|| format!("Failed to create directory {}", path))
    }

    fn write(&mut self, path: &Utf8Path, contents: &[u8]) -> Result<()> {
        std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path))
    }

    fn read(&mut self, path: &Utf8Path) -> Result<Vec<u8>> {
        std::fs::read(path).with_context(|| format!("Failed to read {}", path))
    }

    fn read_dir(&mut self, path: &Utf8Path) -> Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path).with_context(|| format!("Read dir {}", path))? {
            let entry = entry?;
            let p = Utf8PathBuf::from_path_buf(entry.path())
                .map_err(|_| anyhow!("Non-UTF8 path in {}", path))?;
            entries.push(DirEntry {
                path: p,
                is_dir: entry.file_type()?.is_dir(),
            });
        }
        Ok(entries)
    }

    fn exists(&mut self, path: &Utf8Path) -> bool {
        path.exists()
    }

    fn is_dir(&mut self, path: &Utf8Path) -> bool {
        path.is_dir()
    }

    fn remove_file(&mut self, path: &Utf8Path) -> Result<()> {
        std::fs::remove_file(path).with_context(|| format!("Failed to delete {}", path))
    }

    fn remove_dir_all(&mut self, path: &Utf8Path) -> Result<()> {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("Failed to delete directory {}", path))
    }

    fn rename(&mut self, from: &Utf8Path, to: &Utf8Path) -> Result<()> {
        if std::fs::rename(from, to).is_ok() {
            return Ok(());
        }
        // Staging usually lives in the system temp dir, which may sit on another device.
        if let Err(err) = std::fs::copy(from, to) {
            match std::fs::remove_file(to) {
                Err(partial) if partial.kind() != std::io::ErrorKind::NotFound => {
                    tracing::warn!(error = %partial, "partial copy left at {}", to);
                }
                _ => {}
            }
            return Err(err).with_context(|| format!("Failed to move {} to {}", from, to));
        }
        std::fs::remove_file(from).with_context(|| format!("Failed to delete {}", from))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MemFs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum MemNode {
    Dir,
    File(Vec<u8>),
}

/// In-memory file system. Paths are compared textually; `/` is the only root.
///
/// Directory listings come back sorted by path.
#[derive(Debug, Clone)]
pub struct MemFs {
    nodes: BTreeMap<Utf8PathBuf, MemNode>,
    read_only: bool,
    failing_suffixes: Vec<String>,
    pinned_prefixes: Vec<String>,
}

impl Default for MemFs {
    fn default() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(Utf8PathBuf::from("/"), MemNode::Dir);
        Self {
            nodes,
            read_only: false,
            failing_suffixes: Vec::new(),
            pinned_prefixes: Vec::new(),
        }
    }
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// A file system that rejects every mutation, for exercising I/O failure paths.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Reject writes, directory creation and rename targets whose path ends
    /// with `suffix`.
    pub fn fail_writes_ending_with(&mut self, suffix: impl Into<String>) {
        self.failing_suffixes.push(suffix.into());
    }

    /// Reject `remove_file` and `remove_dir_all` on paths starting with `prefix`.
    pub fn fail_removals_under(&mut self, prefix: impl Into<String>) {
        self.pinned_prefixes.push(prefix.into());
    }

    /// All file paths, sorted.
    pub fn files(&self) -> Vec<&Utf8Path> {
        self.nodes
            .iter()
            .filter(|(_, n)| matches!(n, MemNode::File(_)))
            .map(|(p, _)| p.as_path())
            .collect()
    }

    /// All directory paths, sorted.
    pub fn dirs(&self) -> Vec<&Utf8Path> {
        self.nodes
            .iter()
            .filter(|(_, n)| matches!(n, MemNode::Dir))
            .map(|(p, _)| p.as_path())
            .collect()
    }

    pub fn file(&self, path: impl AsRef<Utf8Path>) -> Option<&[u8]> {
        match self.nodes.get(path.as_ref()) {
            Some(MemNode::File(data)) => Some(data),
            _ => None,
        }
    }

    fn check_writable(&self, path: &Utf8Path) -> Result<()> {
        if self.read_only || self.failing_suffixes.iter().any(|s| path.as_str().ends_with(s.as_str())) {
            bail!("Permission denied: {}", path);
        }
        Ok(())
    }

    fn check_removable(&self, path: &Utf8Path) -> Result<()> {
        self.check_writable(path)?;
        if self.pinned_prefixes.iter().any(|p| path.as_str().starts_with(p.as_str())) {
            bail!("Resource busy: {}", path);
        }
        Ok(())
    }

    fn descendants(&self, path: &Utf8Path) -> Vec<Utf8PathBuf> {
        self.nodes
            .keys()
            .filter(|p| p.as_path() != path && p.starts_with(path))
            .cloned()
            .collect()
    }
}

impl FileSystem for MemFs {
    fn create_dir_all(&mut self, path: &Utf8Path) -> Result<()> {
        self.check_writable(path)?;
        for ancestor in path.ancestors() {
            if ancestor.as_str().is_empty() {
                continue;
            }
            match self.nodes.get(ancestor) {
                Some(MemNode::File(_)) => bail!("Not a directory: {}", ancestor),
                Some(MemNode::Dir) => break,
                None => {
                    self.nodes.insert(ancestor.to_path_buf(), MemNode::Dir);
                }
            }
        }
        Ok(())
    }

    fn write(&mut self, path: &Utf8Path, contents: &[u8]) -> Result<()> {
        self.check_writable(path)?;
        let parent = path.parent().ok_or_else(|| anyhow!("No parent directory for {}", path))?;
        if !parent.as_str().is_empty() && !matches!(self.nodes.get(parent), Some(MemNode::Dir)) {
            bail!("Directory not found: {}", parent);
        }
        if matches!(self.nodes.get(path), Some(MemNode::Dir)) {
            bail!("Is a directory: {}", path);
        }
        self.nodes.insert(path.to_path_buf(), MemNode::File(contents.to_vec()));
        Ok(())
    }

    fn read(&mut self, path: &Utf8Path) -> Result<Vec<u8>> {
        match self.nodes.get(path) {
            Some(MemNode::File(data)) => Ok(data.clone()),
            Some(MemNode::Dir) => bail!("Is a directory: {}", path),
            None => bail!("File not found: {}", path),
        }
    }

    fn read_dir(&mut self, path: &Utf8Path) -> Result<Vec<DirEntry>> {
        if !matches!(self.nodes.get(path), Some(MemNode::Dir)) {
            bail!("Directory not found: {}", path);
        }
        Ok(self
            .nodes
            .iter()
            .filter(|(p, _)| p.parent() == Some(path))
            .map(|(p, n)| DirEntry {
                path: p.clone(),
                is_dir: matches!(n, MemNode::Dir),
            })
            .collect())
    }

    fn exists(&mut self, path: &Utf8Path) -> bool {
        self.nodes.contains_key(path)
    }

    fn is_dir(&mut self, path: &Utf8Path) -> bool {
        matches!(self.nodes.get(path), Some(MemNode::Dir))
    }

    fn remove_file(&mut self, path: &Utf8Path) -> Result<()> {
        self.check_removable(path)?;
        match self.nodes.get(path) {
            Some(MemNode::File(_)) => {
                self.nodes.remove(path);
                Ok(())
            }
            Some(MemNode::Dir) => bail!("Is a directory: {}", path),
            None => bail!("File not found: {}", path),
        }
    }

    fn remove_dir_all(&mut self, path: &Utf8Path) -> Result<()> {
        self.check_removable(path)?;
        if !matches!(self.nodes.get(path), Some(MemNode::Dir)) {
            bail!("Directory not found: {}", path);
        }
        for p in self.descendants(path) {
            self.nodes.remove(&p);
        }
        self.nodes.remove(path);
        Ok(())
    }

    fn rename(&mut self, from: &Utf8Path, to: &Utf8Path) -> Result<()> {
        self.check_writable(to)?;
        let data = self.read(from)?;
        self.write(to, &data)?;
        self.nodes.remove(from);
        Ok(())
    }
}
