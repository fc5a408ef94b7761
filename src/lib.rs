//! Moodle backup exporter.
//!
//! This crate turns an authored learning world (spaces, elements and their
//! content files) into a Moodle course backup (`.mbz`): a DSL document is
//! derived from the world, typed XML documents are built from it and written
//! into a staging tree, and the tree is packed into a gzip compressed tar.
//!
//! The binary `mbzgen` exports worlds from JSON and inspects existing backups.

pub mod config;
pub mod dsl;
pub mod entities;
pub mod error;
pub mod fs;
pub mod generator;
pub mod model;
pub mod xml;

pub use config::ExportOptions;
pub use dsl::{DslDocument, ElementType};
pub use error::ExportError;
pub use fs::{FileSystem, MemFs, OsFs};
pub use generator::BackupFileGenerator;
pub use model::{LearningContent, LearningElement, LearningSpace, LearningWorld};
