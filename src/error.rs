use camino::Utf8PathBuf;

/// Errors surfaced to the caller of an export. Every variant means the export
/// was aborted and no archive was delivered.
///
/// A staging tree that cannot be removed is logged, not returned: by then the
/// outcome of the export is already decided.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Invalid learning world: {0}")]
    InvalidWorld(String),

    #[error("Failed to stage backup files")]
    Staging(#[source] anyhow::Error),

    #[error("Failed to build backup archive")]
    Archive(#[source] anyhow::Error),

    #[error("Failed to move backup output to {path}")]
    Finalize {
        path: Utf8PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, ExportError>;
