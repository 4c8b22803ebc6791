//! Placeholder toolbar icons for a browser extension.
//!
//! Renders a flat `#4285f4` square with a white, centered `S` at 16, 32, 48
//! and 128 pixels and writes them as `icon{size}.png`.

pub mod capability;
pub mod error;
pub mod font;
pub mod icon_gen;
pub mod manifest;
