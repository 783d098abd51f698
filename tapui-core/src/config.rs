//! Toolkit configuration
//!
//! Geometry, font cell, touch calibration and colors shared by every
//! widget. The serialisable part can be persisted as a postcard record
//! when the `serde` feature is enabled.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor, WebColors};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of layers (screens) held by the controller
pub const LAYER_POOL_SIZE: usize = 10;

/// Maximum widgets in one layer
pub const MAX_WIDGETS_PER_LAYER: usize = 16;

/// Maximum caption length in bytes
pub const MAX_CAPTION_LEN: usize = 32;

/// Maximum characters in a text-edit buffer
pub const MAX_EDIT_LEN: usize = 64;

/// Shared clipboard capacity in bytes, enough for a full edit buffer of
/// 4-byte characters
pub const CLIPBOARD_CAPACITY: usize = MAX_EDIT_LEN * 4;

/// Maximum entries in a list
pub const MAX_LIST_ENTRIES: usize = 16;

/// Maximum length of a list entry in bytes
pub const LIST_ENTRY_LEN: usize = 32;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Font cell has a zero dimension
    ZeroFont,
    /// Screen has a zero dimension
    ZeroScreen,
    /// Record could not be serialized
    Encode,
    /// Record could not be deserialized
    Decode,
}

/// Screen size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
        }
    }
}

/// Monospaced glyph cell used to size widgets from caption text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FontMetrics {
    /// Width of a single-column glyph in pixels
    pub width: u32,
    /// Line height in pixels
    pub height: u32,
}

impl FontMetrics {
    /// Create font metrics for a `width` x `height` cell
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel width of `columns` display columns
    pub const fn columns(&self, columns: usize) -> u32 {
        self.width * columns as u32
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::new(12, 24)
    }
}

/// Offset applied to raw touch samples before dispatch
///
/// The default compensates for a panel whose touch layer extends above
/// the visible display area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TouchCalibration {
    pub offset_x: i32,
    pub offset_y: i32,
}

impl Default for TouchCalibration {
    fn default() -> Self {
        Self {
            offset_x: 0,
            offset_y: -20,
        }
    }
}

/// Widget colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Screen background, also used to clear the dirty box
    pub background: Rgb565,
    /// Fill of unfocused controls
    pub surface: Rgb565,
    /// Text on `surface`
    pub text: Rgb565,
    /// Focus fill and outlines
    pub accent: Rgb565,
    /// Text on `accent`
    pub accent_text: Rgb565,
    /// Text drawn directly on `background`
    pub foreground: Rgb565,
    /// Selected list row / pressed key fill
    pub selection: Rgb565,
    /// Text on `selection`
    pub selection_text: Rgb565,
    /// Placeholder text in empty edit fields
    pub placeholder: Rgb565,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Rgb565::BLACK,
            surface: Rgb565::WHITE,
            text: Rgb565::BLACK,
            accent: Rgb565::BLUE,
            accent_text: Rgb565::WHITE,
            foreground: Rgb565::WHITE,
            selection: Rgb565::CSS_ORANGE,
            selection_text: Rgb565::BLACK,
            placeholder: Rgb565::CSS_GRAY,
        }
    }
}

/// Complete toolkit configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UiConfig {
    pub screen: ScreenSize,
    pub font: FontMetrics,
    pub touch: TouchCalibration,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub theme: Theme,
}

impl UiConfig {
    /// Check the configuration for values no widget can work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.font.width == 0 || self.font.height == 0 {
            return Err(ConfigError::ZeroFont);
        }
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(ConfigError::ZeroScreen);
        }
        Ok(())
    }

    /// Serialize the persistent part of the configuration into `buffer`
    ///
    /// Returns the written prefix of `buffer`.
    #[cfg(feature = "serde")]
    pub fn encode<'b>(&self, buffer: &'b mut [u8]) -> Result<&'b [u8], ConfigError> {
        postcard::to_slice(self, buffer)
            .map(|used| &*used)
            .map_err(|_| ConfigError::Encode)
    }

    /// Deserialize a record produced by [`UiConfig::encode`]
    ///
    /// The theme is not persisted and comes back as the default.
    #[cfg(feature = "serde")]
    pub fn decode(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }
}
