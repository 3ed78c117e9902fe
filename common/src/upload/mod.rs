//! Boundary of the upload pipeline: slot naming, media type checks and progress.
//!
//! The transport itself lives in the frontend (XHR with progress events) and the
//! backend (multipart handler). Both sides rely on the rules here so a non-image file is
//! refused before any request is made, and a slot never exposes an image path until the
//! upload has completed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BandError;

/// Multipart field carrying the file bytes.
pub const FILE_FIELD: &str = "file";
/// Multipart field carrying the [`UploadKind`] discriminator.
pub const TYPE_FIELD: &str = "type";
/// Multipart field carrying the slot identifier.
pub const TARGET_FIELD: &str = "target";

const SLIDE_PREFIX: &str = "slide_image_";
const PRODUCT_PREFIX: &str = "product_image_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadKind {
    Slideshow,
    Product,
}

impl UploadKind {
    pub fn as_str(self) -> &'static str {
        match self {
            UploadKind::Slideshow => "slideshow",
            UploadKind::Product => "product",
        }
    }
}

impl FromStr for UploadKind {
    type Err = BandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slideshow" => Ok(UploadKind::Slideshow),
            "product" => Ok(UploadKind::Product),
            other => Err(BandError::validation(format!("unknown upload type '{other}'"))),
        }
    }
}

/// The image field an upload is bound to.
///
/// Identifiers follow the `slide_image_<slide id>` / `product_image_<band id>` naming
/// convention, which also determines the upload type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UploadSlot {
    SlideImage { slide_id: String },
    ProductImage { band_id: String },
}

impl UploadSlot {
    pub fn slide(slide_id: impl Into<String>) -> Self {
        Self::SlideImage {
            slide_id: slide_id.into(),
        }
    }

    pub fn product(band_id: impl Into<String>) -> Self {
        Self::ProductImage {
            band_id: band_id.into(),
        }
    }

    pub fn kind(&self) -> UploadKind {
        match self {
            UploadSlot::SlideImage { .. } => UploadKind::Slideshow,
            UploadSlot::ProductImage { .. } => UploadKind::Product,
        }
    }

    pub fn identifier(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for UploadSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadSlot::SlideImage { slide_id } => write!(f, "{SLIDE_PREFIX}{slide_id}"),
            UploadSlot::ProductImage { band_id } => write!(f, "{PRODUCT_PREFIX}{band_id}"),
        }
    }
}

impl FromStr for UploadSlot {
    type Err = BandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slot = if let Some(slide_id) = s.strip_prefix(SLIDE_PREFIX) {
            UploadSlot::slide(slide_id)
        } else if let Some(band_id) = s.strip_prefix(PRODUCT_PREFIX) {
            UploadSlot::product(band_id)
        } else {
            return Err(BandError::validation(format!("unknown upload target '{s}'")));
        };

        match &slot {
            UploadSlot::SlideImage { slide_id: id } | UploadSlot::ProductImage { band_id: id }
                if id.trim().is_empty() =>
            {
                Err(BandError::validation(format!("upload target '{s}' has no id")))
            }
            _ => Ok(slot),
        }
    }
}

/// Accepts only `image/*` media types.
pub fn validate_media_type(media_type: &str) -> Result<(), BandError> {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.strip_prefix("image/") {
        Some(subtype) if !subtype.is_empty() => Ok(()),
        _ => Err(BandError::InvalidFileType(format!(
            "'{media_type}' is not an image type"
        ))),
    }
}

/// A validated upload, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub slot: UploadSlot,
    pub media_type: String,
}

impl UploadRequest {
    /// Checks the slot identifier and the declared media type. Runs before any request.
    pub fn prepare(slot_identifier: &str, media_type: &str) -> Result<Self, BandError> {
        validate_media_type(media_type)?;
        let slot = slot_identifier.parse::<UploadSlot>()?;
        Ok(Self {
            slot,
            media_type: media_type.to_string(),
        })
    }

    pub fn kind(&self) -> UploadKind {
        self.slot.kind()
    }
}

/// Progress of one upload slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UploadStatus {
    /// Request built, nothing sent yet.
    Pending,
    /// Fraction of the body sent, in `0.0..=1.0`.
    InProgress(f64),
    /// Stored path of the uploaded image.
    Completed(String),
    Failed(String),
}

impl UploadStatus {
    /// Progress from raw byte counters. An unknown total reports zero.
    pub fn progress(loaded: f64, total: f64) -> Self {
        if total <= 0.0 {
            return UploadStatus::InProgress(0.0);
        }
        UploadStatus::InProgress((loaded / total).clamp(0.0, 1.0))
    }

    pub fn is_active(&self) -> bool {
        matches!(self, UploadStatus::Pending | UploadStatus::InProgress(_))
    }
}
