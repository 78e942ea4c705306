//! Error types for the composition pipeline.
//!
//! Only structural misconfiguration is fatal: a missing dictionary, an empty
//! glyph store, or an unwritable output location. Per-resource decode
//! failures and per-sample composition failures are logged and skipped by
//! the callers instead of surfacing here.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ComposerError>;

/// Fatal errors raised by loaders, the generator, and the I/O helpers.
#[derive(Debug, Error)]
pub enum ComposerError {
    #[error("character dictionary {}: {source}", path.display())]
    DictRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no glyphs loaded; nothing can be rendered")]
    NoGlyphs,

    #[error("decode image {}: {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("encode image {}: {source}", path.display())]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("serialize JSON for {}: {source}", path.display())]
    JsonSerialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
