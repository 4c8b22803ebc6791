//! Icon entries for the extension's `manifest.json`
//!
//! The generator never edits the manifest itself. It prints the fragment that
//! points the `icons` and `action.default_icon` keys at the files it wrote.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::icon_gen::GeneratedIcon;

/// The manifest keys that reference toolbar and store icons
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ManifestIcons {
    pub icons: IconSet,
    pub action: Action,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Action {
    pub default_icon: IconSet,
}

/// Extension-relative icon paths keyed by pixel size
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct IconSet {
    #[serde(rename = "16", skip_serializing_if = "Option::is_none")]
    pub size16: Option<String>,

    #[serde(rename = "32", skip_serializing_if = "Option::is_none")]
    pub size32: Option<String>,

    #[serde(rename = "48", skip_serializing_if = "Option::is_none")]
    pub size48: Option<String>,

    #[serde(rename = "128", skip_serializing_if = "Option::is_none")]
    pub size128: Option<String>,
}

impl IconSet {
    fn set(&mut self, size: u32, path: String) {
        match size {
            16 => self.size16 = Some(path),
            32 => self.size32 = Some(path),
            48 => self.size48 = Some(path),
            128 => self.size128 = Some(path),
            _ => log::debug!("No manifest key for {size}px icon"),
        }
    }
}

impl ManifestIcons {
    /// Build the fragment for icons written into `out_dir`.
    ///
    /// Paths are relative to the extension root, which is taken to be the
    /// parent of `out_dir`.
    pub fn from_icons(out_dir: &Path, icons: &[GeneratedIcon]) -> Self {
        let folder = out_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        let mut manifest = Self::default();
        for icon in icons {
            let path = match &folder {
                Some(folder) => format!("{folder}/{}", icon.file_name),
                None => icon.file_name.clone(),
            };
            manifest.icons.set(icon.size, path.clone());
            if icon.size <= 48 {
                manifest.action.default_icon.set(icon.size, path);
            }
        }
        manifest
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize manifest icons")
    }
}
