//! Detection of the imaging support needed to produce icons.
//!
//! PNG encoding is a cargo feature of the `image` crate, so a build can end up
//! without it. Detection runs once, before any icon is attempted, by encoding
//! a one pixel probe into memory.

use anyhow::{Context, Result};
use image::{DynamicImage, ImageOutputFormat, RgbImage};
use std::{
    fs::File,
    io::{BufWriter, Cursor, Write},
    path::Path,
};

use crate::error::IconError;

/// Result of probing for PNG support
#[derive(Debug, Clone)]
pub enum Capability {
    Available(PngWriter),
    Unavailable { reason: String },
}

/// Handle proving PNG encoding works in this build.
///
/// Only obtainable through [`detect`].
#[derive(Debug, Clone)]
pub struct PngWriter {
    _probed: (),
}

/// Probe the `image` crate for a working PNG encoder
pub fn detect() -> Capability {
    match probe_png() {
        Ok(()) => {
            log::debug!("PNG encoder available");
            Capability::Available(PngWriter { _probed: () })
        }
        Err(err) => {
            log::warn!("PNG encoder unavailable: {err:#}");
            Capability::Unavailable {
                reason: format!("{err:#}"),
            }
        }
    }
}

fn probe_png() -> Result<()> {
    let probe = DynamicImage::ImageRgb8(RgbImage::new(1, 1));
    let mut buf = Cursor::new(Vec::new());
    probe
        .write_to(&mut buf, ImageOutputFormat::Png)
        .context("PNG encoding is not supported by this build")?;
    Ok(())
}

impl PngWriter {
    /// Serialize an RGB bitmap to `path` as PNG, replacing any existing file
    pub fn write(&self, bitmap: RgbImage, path: &Path) -> Result<(), IconError> {
        let file = File::create(path).map_err(|source| IconError::CreateFile {
            path: path.to_path_buf(),
            source,
        })?;
        let mut out = BufWriter::new(file);

        DynamicImage::ImageRgb8(bitmap)
            .write_to(&mut out, ImageOutputFormat::Png)
            .map_err(|source| IconError::Encode {
                path: path.to_path_buf(),
                source,
            })?;

        out.flush().map_err(|source| IconError::Encode {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(source),
        })
    }
}
