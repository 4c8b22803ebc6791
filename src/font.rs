//! Font resolution, glyph measurement and glyph drawing.
//!
//! A scalable TrueType face is used when one can be found. Otherwise the
//! built-in 5x7 bitmap face is used at its native size, whatever size was
//! requested. Resolving a font never fails.

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use rusttype::{point, Font, PositionedGlyph, Scale};
use std::path::Path;

/// Well-known locations probed for a scalable face when none is given
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\arialbd.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Native cell size of the built-in bitmap face
pub const BITMAP_WIDTH: u32 = 5;
pub const BITMAP_HEIGHT: u32 = 7;

/// Width and height of a glyph's ink, and whether they were measured or estimated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
    pub measured: bool,
}

impl Extent {
    /// Stand-in used when the face cannot measure the label
    pub fn estimate(requested_px: u32) -> Self {
        Self {
            width: requested_px / 2,
            height: requested_px,
            measured: false,
        }
    }
}

/// Where glyphs come from for a run
pub struct FontSource {
    scalable: Option<Font<'static>>,
}

impl FontSource {
    /// Look for a scalable face, trying `explicit` first and then the system paths
    pub fn discover(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            match load_font(path) {
                Ok(font) => {
                    log::debug!("Using scalable font {}", path.display());
                    return Self {
                        scalable: Some(font),
                    };
                }
                Err(err) => log::warn!("Font {} could not be loaded: {err:#}", path.display()),
            }
        }

        for path in SYSTEM_FONTS.iter().map(Path::new) {
            if !path.exists() {
                continue;
            }
            match load_font(path) {
                Ok(font) => {
                    log::debug!("Using scalable font {}", path.display());
                    return Self {
                        scalable: Some(font),
                    };
                }
                Err(err) => log::debug!("Skipping font {}: {err:#}", path.display()),
            }
        }

        log::debug!("No scalable font found, using the built-in face");
        Self::builtin()
    }

    /// Only the built-in bitmap face
    pub fn builtin() -> Self {
        Self { scalable: None }
    }

    pub fn is_scalable(&self) -> bool {
        self.scalable.is_some()
    }

    /// Resolve a face for `requested_px`.
    ///
    /// Falls back to the fixed-size bitmap face when no scalable face is loaded.
    pub fn resolve(&self, requested_px: u32) -> FontHandle<'_> {
        let face = match &self.scalable {
            Some(font) => Face::Scalable {
                font,
                scale: Scale::uniform(requested_px as f32),
            },
            None => Face::Bitmap,
        };
        FontHandle { face, requested_px }
    }
}

fn load_font(path: &Path) -> Result<Font<'static>> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read font file {}", path.display()))?;
    Font::try_from_vec(data).context("Not a TrueType/OpenType font")
}

enum Face<'a> {
    Scalable { font: &'a Font<'static>, scale: Scale },
    Bitmap,
}

/// A face resolved for one requested glyph size
pub struct FontHandle<'a> {
    face: Face<'a>,
    requested_px: u32,
}

impl FontHandle<'_> {
    #[cfg(test)]
    fn is_scalable(&self) -> bool {
        matches!(self.face, Face::Scalable { .. })
    }

    /// Measure the ink box of `ch`, or `None` if this face has no ink for it
    pub fn measure(&self, ch: char) -> Option<(u32, u32)> {
        match &self.face {
            Face::Scalable { font, scale } => {
                let bb = scalable_glyph(font, *scale, ch).pixel_bounding_box()?;
                Some((bb.width() as u32, bb.height() as u32))
            }
            Face::Bitmap => {
                let ink = bitmap_ink(bitmap_rows(ch)?)?;
                Some((ink.width, ink.height))
            }
        }
    }

    /// Measured extent of `ch`, or the `(requested/2, requested)` estimate
    pub fn extent(&self, ch: char) -> Extent {
        match self.measure(ch) {
            Some((width, height)) => Extent {
                width,
                height,
                measured: true,
            },
            None => {
                log::debug!(
                    "No glyph box for {ch:?}, estimating from {}px",
                    self.requested_px
                );
                Extent::estimate(self.requested_px)
            }
        }
    }

    /// Draw `ch` with the top-left of its ink at `(x, y)`.
    ///
    /// Pixels outside the bitmap are clipped.
    pub fn draw(&self, bitmap: &mut RgbImage, ch: char, x: i32, y: i32, color: Rgb<u8>) {
        match &self.face {
            Face::Scalable { font, scale } => {
                let glyph = scalable_glyph(font, *scale, ch);
                if glyph.pixel_bounding_box().is_none() {
                    return;
                }
                glyph.draw(|gx, gy, coverage| {
                    blend(bitmap, x + gx as i32, y + gy as i32, color, coverage);
                });
            }
            Face::Bitmap => {
                let Some(rows) = bitmap_rows(ch) else {
                    return;
                };
                let Some(ink) = bitmap_ink(rows) else {
                    return;
                };
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..BITMAP_WIDTH {
                        if bits & (1 << (BITMAP_WIDTH - 1 - col)) != 0 {
                            let px = x + col as i32 - ink.left as i32;
                            let py = y + row as i32 - ink.top as i32;
                            blend(bitmap, px, py, color, 1.0);
                        }
                    }
                }
            }
        }
    }
}

fn scalable_glyph(font: &Font<'static>, scale: Scale, ch: char) -> PositionedGlyph<'static> {
    let ascent = font.v_metrics(scale).ascent;
    font.glyph(ch).scaled(scale).positioned(point(0.0, ascent))
}

fn blend(bitmap: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= bitmap.width() as i32 || y >= bitmap.height() as i32 {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    let pixel = bitmap.get_pixel_mut(x as u32, y as u32);
    for channel in 0..3 {
        let bg = pixel[channel] as f32;
        let fg = color[channel] as f32;
        pixel[channel] = (bg + (fg - bg) * coverage).round() as u8;
    }
}

struct Ink {
    left: u32,
    top: u32,
    width: u32,
    height: u32,
}

fn bitmap_ink(rows: &[u8; BITMAP_HEIGHT as usize]) -> Option<Ink> {
    let mask = rows.iter().fold(0u8, |acc, bits| acc | bits);
    if mask == 0 {
        return None;
    }
    let top = rows.iter().position(|bits| *bits != 0)? as u32;
    let bottom = rows.iter().rposition(|bits| *bits != 0)? as u32;
    // Bit 4 is the leftmost column.
    let left = (0..BITMAP_WIDTH).find(|col| mask & (1 << (BITMAP_WIDTH - 1 - col)) != 0)?;
    let right = (0..BITMAP_WIDTH).rev().find(|col| mask & (1 << (BITMAP_WIDTH - 1 - col)) != 0)?;

    Some(Ink {
        left,
        top,
        width: right - left + 1,
        height: bottom - top + 1,
    })
}

fn bitmap_rows(ch: char) -> Option<&'static [u8; BITMAP_HEIGHT as usize]> {
    let index = (ch as u32).checked_sub('A' as u32)? as usize;
    BITMAP_GLYPHS.get(index)
}

/// Uppercase Latin letters, one byte per row, low five bits used
const BITMAP_GLYPHS: [[u8; BITMAP_HEIGHT as usize]; 26] = [
    [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11], // A
    [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E], // B
    [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E], // C
    [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E], // D
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F], // E
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10], // F
    [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F], // G
    [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11], // H
    [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E], // I
    [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C], // J
    [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11], // K
    [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F], // L
    [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11], // M
    [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11], // N
    [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E], // O
    [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10], // P
    [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D], // Q
    [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11], // R
    [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E], // S
    [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04], // T
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E], // U
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04], // V
    [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A], // W
    [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11], // X
    [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04], // Y
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F], // Z
];
