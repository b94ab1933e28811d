use std::path::PathBuf;
use thiserror::Error;

/// Failures the library can surface to the CLI or other callers.
///
/// Duplicate cards are deliberately absent: exhausting the retry budgets is a
/// degraded-but-valid outcome reported through
/// [`GeneratedBatch::duplicates`](crate::GeneratedBatch), never an error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not enough songs to fill a card: need at least {needed}, got {got}")]
    NotEnoughSongs { needed: usize, got: usize },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("duplicate song id {id} in catalogue {path}")]
    DuplicateSongId { id: u32, path: PathBuf },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write page image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no usable system font found (set QUINA_FONT_PATH to a .ttf/.otf file)")]
    FontNotFound,

    #[error("font data could not be parsed")]
    InvalidFont,
}
