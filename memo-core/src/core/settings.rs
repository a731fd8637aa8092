//! Display preferences persisted alongside the notes and folders.

use serde::{Deserialize, Serialize};

use crate::{MemoError, Result};

pub const DEFAULT_FONT_FAMILY: &str = "Inter, sans-serif";
pub const DEFAULT_FONT_SIZE: &str = "15px";

const MIN_FONT_PX: u32 = 8;
const MAX_FONT_PX: u32 = 72;

/// Persisted editor preferences.
///
/// Missing keys in a stored record fall back to the defaults individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// CSS font-family list used by the editor body.
    pub font_family: String,
    /// CSS pixel size, e.g. `"15px"`.
    pub font_size: String,
    pub is_dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE.to_string(),
            is_dark_mode: false,
        }
    }
}

impl Settings {
    /// Replaces the font preferences after validating both values.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::Validation`] if the family is blank or the size is
    /// not of the form `<n>px` within the supported range.
    pub fn set_font(&mut self, family: &str, size: &str) -> Result<()> {
        let family = family.trim();
        if family.is_empty() {
            return Err(MemoError::Validation("Font family cannot be empty".to_string()));
        }
        parse_font_px(size)?;
        self.font_family = family.to_string();
        self.font_size = size.trim().to_string();
        Ok(())
    }

    /// Resets any value the editor cannot apply to its default, e.g. a font
    /// size out of range in an imported backup. Returns `true` if anything
    /// changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        if self.font_family.trim().is_empty() {
            log::warn!("empty font family; using default");
            self.font_family = DEFAULT_FONT_FAMILY.to_string();
            changed = true;
        }
        if let Err(e) = parse_font_px(&self.font_size) {
            log::warn!("unusable font size '{}' ({e}); using default", self.font_size);
            self.font_size = DEFAULT_FONT_SIZE.to_string();
            changed = true;
        }
        changed
    }
}

/// Parses `"15px"` into `15`, enforcing the supported range.
pub fn parse_font_px(size: &str) -> Result<u32> {
    let px = size
        .trim()
        .strip_suffix("px")
        .and_then(|n| n.parse::<u32>().ok())
        .ok_or_else(|| MemoError::Validation(format!("Invalid font size: {size}")))?;
    if !(MIN_FONT_PX..=MAX_FONT_PX).contains(&px) {
        return Err(MemoError::Validation(format!(
            "Font size must be between {MIN_FONT_PX}px and {MAX_FONT_PX}px"
        )));
    }
    Ok(px)
}
