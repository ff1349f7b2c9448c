//! Image request options and response models.

use serde::{Deserialize, Serialize};
use std::fmt;
use stream_core::query::QueryParams;
use stream_core::Error;

use crate::Result;

/// How an image is fitted into the requested box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    /// Keep aspect ratio, fit inside the box
    #[default]
    Clip,
    /// Keep aspect ratio, crop what overflows
    Crop,
    /// Stretch to the exact size
    Scale,
    /// Keep aspect ratio, pad to the exact size
    Fill,
}

impl ResizeMode {
    /// Query value for the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clip => "clip",
            Self::Crop => "crop",
            Self::Scale => "scale",
            Self::Fill => "fill",
        }
    }
}

impl fmt::Display for ResizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Edge kept when cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropAnchor {
    /// Keep the top edge
    Top,
    /// Keep the bottom edge
    Bottom,
    /// Keep the left edge
    Left,
    /// Keep the right edge
    Right,
    /// Keep the center
    Center,
}

impl CropAnchor {
    /// Query value for the anchor.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
        }
    }
}

impl fmt::Display for CropAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resize directive: `resize=<mode>&w=<width>&h=<height>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resize {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Fitting mode.
    pub mode: ResizeMode,
}

impl Resize {
    /// Resize using the default [`ResizeMode::Clip`].
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            mode: ResizeMode::Clip,
        }
    }

    /// Use a different fitting mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: ResizeMode) -> Self {
        self.mode = mode;
        self
    }

    fn validate(&self) -> Result<()> {
        check_dimensions("resize", self.width, self.height)
    }

    fn push_pairs(&self, params: &mut QueryParams) {
        params.push("resize", self.mode);
        params.push("w", self.width);
        params.push("h", self.height);
    }
}

/// Crop directive: `crop=<anchors>&w=<width>&h=<height>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crop {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Edges to keep; empty means [`CropAnchor::Center`].
    pub anchors: Vec<CropAnchor>,
}

impl Crop {
    /// Crop around the center.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            anchors: Vec::new(),
        }
    }

    /// Add an anchor edge.
    #[must_use]
    pub fn with_anchor(mut self, anchor: CropAnchor) -> Self {
        if !self.anchors.contains(&anchor) {
            self.anchors.push(anchor);
        }
        self
    }

    fn validate(&self) -> Result<()> {
        check_dimensions("crop", self.width, self.height)
    }

    fn push_pairs(&self, params: &mut QueryParams) {
        let anchors = if self.anchors.is_empty() {
            CropAnchor::Center.as_str().to_string()
        } else {
            self.anchors
                .iter()
                .map(CropAnchor::as_str)
                .collect::<Vec<_>>()
                .join(",")
        };
        params.push("crop", anchors);
        params.push("w", self.width);
        params.push("h", self.height);
    }
}

fn check_dimensions(directive: &str, width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidArgument(format!(
            "{directive} dimensions must be positive, got {width}x{height}"
        )));
    }
    Ok(())
}

/// Options applied by the process operation.
///
/// At most one transformation (resize or crop) is applied per call. Custom
/// parameters are forwarded verbatim, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Resize directive.
    pub resize: Option<Resize>,
    /// Crop directive.
    pub crop: Option<Crop>,
    /// Additional query parameters.
    pub custom: Vec<(String, String)>,
}

impl ProcessOptions {
    /// Options with no transformation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize the image.
    #[must_use]
    pub fn with_resize(mut self, resize: Resize) -> Self {
        self.resize = Some(resize);
        self
    }

    /// Crop the image.
    #[must_use]
    pub fn with_crop(mut self, crop: Crop) -> Self {
        self.crop = Some(crop);
        self
    }

    /// Forward an arbitrary query parameter.
    #[must_use]
    pub fn with_custom(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom.push((name.into(), value.into()));
        self
    }

    /// Check that the options can be sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if both resize and crop are set or a
    /// dimension is zero.
    pub fn validate(&self) -> Result<()> {
        if self.resize.is_some() && self.crop.is_some() {
            return Err(Error::InvalidArgument(
                "resize and crop cannot be combined in one request".to_string(),
            ));
        }
        if let Some(resize) = &self.resize {
            resize.validate()?;
        }
        if let Some(crop) = &self.crop {
            crop.validate()?;
        }
        Ok(())
    }

    /// Convert the options into URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut params = QueryParams::new();
        if let Some(resize) = &self.resize {
            resize.push_pairs(&mut params);
        }
        if let Some(crop) = &self.crop {
            crop.push_pairs(&mut params);
        }
        params.extend(self.custom.iter().cloned());
        params.into_pairs()
    }
}
