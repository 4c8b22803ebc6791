use crate::{
    capability::{Capability, PngWriter},
    error::{BatchError, IconError},
    font::{Extent, FontSource},
};
use image::{Rgb, RgbImage};
use std::{
    fs::create_dir_all,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Icon sizes required by the extension, in the order they are written
pub const ICON_SIZES: [u32; 4] = [16, 32, 48, 128];

/// Where icons go when no output directory is given
pub const DEFAULT_OUTPUT_DIR: &str = "extension/icons";

/// The single character drawn on every icon
pub const LABEL: char = 'S';

pub const BACKGROUND_COLOR: &str = "#4285f4";
pub const LABEL_COLOR: &str = "white";

/// Glyph size as a percentage of the icon size
const GLYPH_SCALE_PERCENT: u32 = 60;

pub const MISSING_CAPABILITY: &str = "PNG support not available in this build.";
pub const INSTALL_HINT: &str =
    "Rebuild with the `png` feature of the `image` crate enabled (it is on by default).";

/// Manual fallback when icons can't be generated at all
pub const MANUAL_STEPS: [&str; 4] = [
    "Use any image editor to create 16x16, 32x32, 48x48 and 128x128 PNG files",
    "Save them as icon16.png, icon32.png, icon48.png, icon128.png",
    "Place them in the extension/icons/ folder",
    "Re-enable the icon references in manifest.json",
];

pub const GENERIC_REMEDIATION: [&str; 1] =
    ["Please create the icons manually or use an online tool."];

/// One icon to produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSpec {
    pub size: u32,
    pub output_name: String,
}

impl IconSpec {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            output_name: format!("icon{size}.png"),
        }
    }
}

/// The fixed set of icons, smallest first
pub fn icon_specs() -> Vec<IconSpec> {
    ICON_SIZES.into_iter().map(IconSpec::new).collect()
}

/// An icon that has been written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedIcon {
    pub size: u32,
    pub file_name: String,
    pub path: PathBuf,
}

/// Top-left offset of the glyph's ink within the icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPlacement {
    pub x: i32,
    pub y: i32,
}

/// Center a glyph of the given extent in a `size` x `size` icon.
///
/// Uses floor division, so odd remainders bias the glyph up and left, and an
/// oversized glyph gets a negative offset.
pub fn place_glyph(size: u32, extent: Extent) -> GlyphPlacement {
    GlyphPlacement {
        x: (size as i32 - extent.width as i32).div_euclid(2),
        y: (size as i32 - extent.height as i32).div_euclid(2),
    }
}

/// Requested glyph size for an icon, rounded down
pub fn glyph_font_size(size: u32) -> u32 {
    size * GLYPH_SCALE_PERCENT / 100
}

/// Parse a CSS color, falling back to `default` if it doesn't parse
pub fn parse_color(color: &str, default: Rgb<u8>) -> Rgb<u8> {
    css_color::Srgb::from_str(color)
        .map(|color| {
            Rgb([
                (color.red * 255.).round() as u8,
                (color.green * 255.).round() as u8,
                (color.blue * 255.).round() as u8,
            ])
        })
        .unwrap_or(default)
}

pub fn background_color() -> Rgb<u8> {
    parse_color(BACKGROUND_COLOR, Rgb([0x42, 0x85, 0xf4]))
}

pub fn label_color() -> Rgb<u8> {
    parse_color(LABEL_COLOR, Rgb([255, 255, 255]))
}

/// Draw one icon in memory: flat background with the label centered on it
pub fn render_icon(size: u32, fonts: &FontSource) -> RgbImage {
    let mut bitmap = RgbImage::from_pixel(size, size, background_color());

    let font = fonts.resolve(glyph_font_size(size));
    let extent = font.extent(LABEL);
    let placement = place_glyph(size, extent);
    log::debug!(
        "{size}px icon: glyph {}x{} ({}) at ({}, {})",
        extent.width,
        extent.height,
        if extent.measured { "measured" } else { "estimated" },
        placement.x,
        placement.y
    );

    font.draw(&mut bitmap, LABEL, placement.x, placement.y, label_color());
    bitmap
}

/// Write a rendered icon into `out_dir`, creating the directory if needed
pub fn write_icon(
    writer: &PngWriter,
    bitmap: RgbImage,
    spec: &IconSpec,
    out_dir: &Path,
) -> Result<GeneratedIcon, IconError> {
    create_dir_all(out_dir).map_err(|source| IconError::CreateDir {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let path = out_dir.join(&spec.output_name);
    writer.write(bitmap, &path)?;

    Ok(GeneratedIcon {
        size: spec.size,
        file_name: spec.output_name.clone(),
        path,
    })
}

/// Render and write every icon in order, stopping at the first failure
pub fn generate_icons(
    writer: &PngWriter,
    fonts: &FontSource,
    out_dir: &Path,
) -> Result<Vec<GeneratedIcon>, BatchError> {
    let mut created = Vec::new();

    for spec in icon_specs() {
        let bitmap = render_icon(spec.size, fonts);
        match write_icon(writer, bitmap, &spec, out_dir) {
            Ok(icon) => {
                println!("  ✓ Created {} ({}x{})", icon.file_name, spec.size, spec.size);
                created.push(icon);
            }
            Err(source) => {
                log::error!("Stopping after {} icon(s): {source}", created.len());
                return Err(BatchError {
                    size: spec.size,
                    created,
                    source,
                });
            }
        }
    }

    Ok(created)
}

/// How a run ended
#[derive(Debug)]
pub enum Outcome {
    Created(Vec<GeneratedIcon>),
    Unavailable { reason: String },
    Failed(BatchError),
}

impl Outcome {
    /// Icons that exist on disk after the run
    pub fn created(&self) -> &[GeneratedIcon] {
        match self {
            Outcome::Created(icons) => icons,
            Outcome::Unavailable { .. } => &[],
            Outcome::Failed(err) => &err.created,
        }
    }

    /// Instructions to show the user, empty on success
    pub fn remediation(&self) -> &'static [&'static str] {
        match self {
            Outcome::Created(_) => &[],
            Outcome::Unavailable { .. } => &MANUAL_STEPS,
            Outcome::Failed(_) => &GENERIC_REMEDIATION,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Created(_) => 0,
            Outcome::Failed(_) => 1,
            Outcome::Unavailable { .. } => 2,
        }
    }
}

/// Generate all icons if the imaging capability is present
pub fn run(capability: &Capability, fonts: &FontSource, out_dir: &Path) -> Outcome {
    let writer = match capability {
        Capability::Available(writer) => writer,
        Capability::Unavailable { reason } => {
            return Outcome::Unavailable {
                reason: reason.clone(),
            }
        }
    };

    match generate_icons(writer, fonts, out_dir) {
        Ok(icons) => Outcome::Created(icons),
        Err(err) => Outcome::Failed(err),
    }
}
