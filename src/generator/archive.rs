//! MBZ archive writing and inspection.
//!
//! An MBZ file is a gzip compressed ustar archive of the staging tree. Entry
//! paths are relative to the staging root. Within each directory the files are
//! written first, then each subdirectory entry followed by its contents.

use crate::fs::FileSystem;
use anyhow::{Context, Result, anyhow};
use camino::Utf8Path;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use roxmltree::Document;
use serde::Serialize;
use std::io::Read;

/// Pack everything below `root` into `archive_path`, skipping the archive
/// itself and any other `.mbz` file. Returns the archive size in bytes.
pub fn build_archive<F: FileSystem + ?Sized>(fs: &mut F, root: &Utf8Path, archive_path: &Utf8Path) -> Result<u64> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    let mut count = 0usize;
    append_dir(fs, &mut builder, root, root, archive_path, &mut count)?;

    let bytes = builder
        .into_inner()
        .context("Failed to finish tar stream")?
        .finish()
        .context("Failed to finish gzip stream")?;
    fs.write(archive_path, &bytes)
        .with_context(|| format!("Failed to write archive {}", archive_path))?;
    tracing::debug!(entries = count, "packed {}", archive_path);
    Ok(bytes.len() as u64)
}

fn append_dir<F: FileSystem + ?Sized, W: std::io::Write>(
    fs: &mut F,
    builder: &mut tar::Builder<W>,
    root: &Utf8Path,
    dir: &Utf8Path,
    archive_path: &Utf8Path,
    count: &mut usize,
) -> Result<()> {
    let mut entries = fs.read_dir(dir)?;
    entries.sort_by(|a, b| a.path.cmp(&b.path));

    for entry in entries.iter().filter(|e| !e.is_dir) {
        if entry.path == archive_path || entry.path.extension() == Some("mbz") {
            continue;
        }
        let data = fs.read(&entry.path)?;
        let mut header = tar::Header::new_ustar();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(0);
        builder
            .append_data(&mut header, relative(root, &entry.path)?, data.as_slice())
            .with_context(|| format!("Failed to add {}", entry.path))?;
        *count += 1;
    }

    for entry in entries.iter().filter(|e| e.is_dir) {
        let mut header = tar::Header::new_ustar();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_size(0);
        header.set_mode(0o755);
        header.set_mtime(0);
        builder
            .append_data(&mut header, relative(root, &entry.path)?, std::io::empty())
            .with_context(|| format!("Failed to add directory {}", entry.path))?;
        *count += 1;
        append_dir(fs, builder, root, &entry.path, archive_path, count)?;
    }
    Ok(())
}

fn relative<'a>(root: &Utf8Path, path: &'a Utf8Path) -> Result<&'a Utf8Path> {
    path.strip_prefix(root)
        .map_err(|_| anyhow!("{} is outside of {}", path, root))
}

fn child_text(node: roxmltree::Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|c| c.has_tag_name(name))
        .and_then(|c| c.text())
        .map(str::to_string)
}

// ────────────────────────────────────────────────────────────────────────────
// Inspection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    pub path: String,
    pub size: u64,
    pub is_dir: bool,
}

/// What an existing `.mbz` contains, as far as `moodle_backup.xml` tells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveSummary {
    pub course_title: Option<String>,
    pub activities: Vec<String>,
    pub sections: Vec<String>,
    pub entries: Vec<ArchiveEntry>,
}

impl ArchiveSummary {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut archive = tar::Archive::new(GzDecoder::new(reader));
        let mut summary = ArchiveSummary::default();
        let mut backup_xml = None;

        for entry in archive.entries().context("Failed to read MBZ archive")? {
            let mut entry = entry?;
            let path = entry.path()?.to_string_lossy().trim_end_matches('/').to_string();
            let is_dir = entry.header().entry_type().is_dir();
            if path == "moodle_backup.xml" {
                let mut text = String::new();
                entry
                    .read_to_string(&mut text)
                    .with_context(|| format!("Non-UTF8 content in {}", path))?;
                backup_xml = Some(text);
            }
            summary.entries.push(ArchiveEntry {
                size: entry.size(),
                path,
                is_dir,
            });
        }

        if let Some(text) = backup_xml {
            summary.read_backup_xml(&text)?;
        }
        Ok(summary)
    }

    pub fn from_file(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).with_context(|| format!("Failed to open {}", path))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn entry_paths(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.path.as_str()).collect()
    }

    fn read_backup_xml(&mut self, text: &str) -> Result<()> {
        let doc = Document::parse(text).context("Failed to parse moodle_backup.xml")?;

        for node in doc.descendants().filter(|n| n.is_element()) {
            let parent = node.parent_element().map(|p| p.tag_name().name());
            match (node.tag_name().name(), parent) {
                ("course", Some("contents")) => self.course_title = child_text(node, "title"),
                ("activity", Some("activities")) => self.activities.extend(child_text(node, "directory")),
                ("section", Some("sections")) => self.sections.extend(child_text(node, "directory")),
                _ => {}
            }
        }
        Ok(())
    }
}
