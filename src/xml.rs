//! Generic XML serialization of typed entity records into the staging tree.
//!
//! Element and attribute names come from each record's serde names (`@name`
//! for attributes). Output starts with the XML declaration and uses two-space
//! indentation, the layout Moodle itself writes.

use crate::fs::FileSystem;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

/// Moodle's sentinel for a `NULL` column value.
pub const NULL: &str = "$@NULL@$";

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// A typed record that forms a complete XML document.
pub trait XmlDocument: Serialize {
    /// Root element name, for log output and assertions.
    const ROOT: &'static str;
}

/// Serialize a document into XML text.
///
/// Pure function of the document's field values: the same value always
/// produces the same text.
pub fn to_xml_string<D: XmlDocument>(doc: &D) -> Result<String> {
    let mut body = String::with_capacity(1024);
    let mut ser = quick_xml::se::Serializer::new(&mut body);
    ser.indent(' ', 2);
    doc.serialize(ser)
        .with_context(|| format!("Failed to serialize <{}>", D::ROOT))?;

    let mut out = String::with_capacity(XML_DECLARATION.len() + body.len() + 1);
    out.push_str(XML_DECLARATION);
    out.push_str(&body);
    out.push('\n');
    Ok(out)
}

/// Serialize `doc` and write it to `<root>/<relative>`, creating parent
/// directories when absent.
pub fn serialize_to_path<F, D>(
    fs: &mut F,
    root: &Utf8Path,
    relative: impl AsRef<Utf8Path>,
    doc: &D,
) -> Result<Utf8PathBuf>
where
    F: FileSystem + ?Sized,
    D: XmlDocument,
{
    let path = root.join(relative.as_ref());
    let xml = to_xml_string(doc)?;
    if let Some(parent) = path.parent() {
        fs.create_dir_all(parent)?;
    }
    fs.write(&path, xml.as_bytes())
        .with_context(|| format!("Failed to write <{}> document", D::ROOT))?;
    tracing::debug!("wrote {}", path);
    Ok(path)
}

/// Write handle for one staging tree. Factories serialize through this.
pub struct XmlStage<'a, F: FileSystem + ?Sized> {
    fs: &'a mut F,
    root: Utf8PathBuf,
    written: Vec<Utf8PathBuf>,
}

impl<'a, F: FileSystem + ?Sized> XmlStage<'a, F> {
    pub fn new(fs: &'a mut F, root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
            written: Vec::new(),
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn serialize<D: XmlDocument>(&mut self, relative: impl AsRef<Utf8Path>, doc: &D) -> Result<()> {
        let path = serialize_to_path(&mut *self.fs, &self.root, relative, doc)?;
        self.written.push(path);
        Ok(())
    }

    /// Write raw bytes (content payloads) below the staging root.
    pub fn write_blob(&mut self, relative: impl AsRef<Utf8Path>, data: &[u8]) -> Result<()> {
        let path = self.root.join(relative.as_ref());
        if let Some(parent) = path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        self.fs.write(&path, data)?;
        self.written.push(path);
        Ok(())
    }

    pub fn create_dir(&mut self, relative: impl AsRef<Utf8Path>) -> Result<()> {
        self.fs.create_dir_all(&self.root.join(relative.as_ref()))
    }

    /// Every file written through this stage, in write order.
    pub fn written(&self) -> &[Utf8PathBuf] {
        &self.written
    }
}
