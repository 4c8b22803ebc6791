//! Error types for icon generation

use std::path::PathBuf;
use thiserror::Error;

use crate::icon_gen::GeneratedIcon;

/// Errors that can occur while rendering or writing a single icon
#[derive(Error, Debug)]
pub enum IconError {
    /// The output directory could not be created
    #[error("Can't create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The icon file could not be opened for writing
    #[error("Failed to create PNG file {}: {source}", .path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bitmap could not be encoded as PNG
    #[error("Failed to write PNG {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A batch that stopped part way through.
///
/// Icons written before the failure stay on disk; nothing is retried.
#[derive(Error, Debug)]
#[error("Error creating icon{size}.png: {source}")]
pub struct BatchError {
    /// Size of the icon that failed
    pub size: u32,
    /// Icons that were written before the failure
    pub created: Vec<GeneratedIcon>,
    #[source]
    pub source: IconError,
}
