use std::path::PathBuf;

use crate::geometry::Size;

#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// Backing store for a bitmap could not be reserved.
    #[error("cannot allocate {pixels} pixels for overlay bitmap")]
    Alloc { pixels: usize },

    /// Pixel data does not match the declared bitmap geometry.
    #[error("bitmap data of {len} bytes does not fit {size:?} with stride {stride}")]
    InvalidBitmap { size: Size, stride: usize, len: usize },

    #[error("failed to access config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, NavError>;
