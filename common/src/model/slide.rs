use serde::{Deserialize, Serialize};

use crate::error::BandError;
use crate::model::ordering::Ranked;

/// Where a slide or product image currently stands.
///
/// Only `Path` is a loadable image. `Pending` marks a slot whose upload has started but
/// has not been confirmed by the upload pipeline yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ImageRef {
    #[default]
    Missing,
    Pending {
        upload_id: String,
    },
    Path {
        path: String,
    },
}

impl ImageRef {
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path { path: path.into() }
    }

    /// The image path if the image can be loaded, `None` while missing or pending.
    pub fn loadable_path(&self) -> Option<&str> {
        match self {
            ImageRef::Path { path } => Some(path.as_str()),
            ImageRef::Missing | ImageRef::Pending { .. } => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ImageRef::Pending { .. })
    }

    pub(crate) fn validate(&self) -> Result<(), BandError> {
        match self {
            ImageRef::Path { path } if path.trim().is_empty() => {
                Err(BandError::validation("image path must not be empty"))
            }
            ImageRef::Pending { upload_id } if upload_id.trim().is_empty() => {
                Err(BandError::validation("pending upload must carry an upload id"))
            }
            _ => Ok(()),
        }
    }
}

/// True for links that would run script instead of navigating.
pub(crate) fn is_script_link(link: &str) -> bool {
    link.trim_start()
        .to_ascii_lowercase()
        .starts_with("javascript:")
}

/// One item of a slideshow band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub id: String,
    pub band_id: String,
    /// Zero-based display position within the band.
    pub position: usize,
    #[serde(default)]
    pub image: ImageRef,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub seo_title: String,
    #[serde(default)]
    pub seo_description: String,
}

/// Editable slide fields, used to create a slide before it has an id or a position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideDraft {
    pub image: ImageRef,
    pub alt: String,
    pub title: String,
    pub subtitle: String,
    pub link: String,
    pub seo_title: String,
    pub seo_description: String,
}

impl Slide {
    pub fn from_draft(
        id: impl Into<String>,
        band_id: impl Into<String>,
        position: usize,
        draft: SlideDraft,
    ) -> Self {
        Self {
            id: id.into(),
            band_id: band_id.into(),
            position,
            image: draft.image,
            alt: draft.alt,
            title: draft.title,
            subtitle: draft.subtitle,
            link: draft.link,
            seo_title: draft.seo_title,
            seo_description: draft.seo_description,
        }
    }

    pub fn validate(&self) -> Result<(), BandError> {
        if self.id.trim().is_empty() {
            return Err(BandError::validation("slide id must not be empty"));
        }
        if self.band_id.trim().is_empty() {
            return Err(BandError::validation("slide must belong to a band"));
        }
        if is_script_link(&self.link) {
            return Err(BandError::validation("slide link must be a navigable url"));
        }
        self.image.validate()
    }

    /// Marks the image slot as waiting for an upload.
    pub fn begin_upload(&mut self, upload_id: impl Into<String>) {
        self.image = ImageRef::Pending {
            upload_id: upload_id.into(),
        };
    }

    /// Replaces the image with the path reported by a finished upload.
    pub fn complete_upload(&mut self, path: impl Into<String>) {
        self.image = ImageRef::path(path);
    }
}

impl Ranked for Slide {
    fn id(&self) -> &str {
        &self.id
    }

    fn rank(&self) -> usize {
        self.position
    }

    fn set_rank(&mut self, rank: usize) {
        self.position = rank;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_and_missing_images_are_not_loadable() {
        assert_eq!(ImageRef::Missing.loadable_path(), None);
        let pending = ImageRef::Pending {
            upload_id: "u1".into(),
        };
        assert_eq!(pending.loadable_path(), None);
        assert_eq!(ImageRef::path("/uploads/a.png").loadable_path(), Some("/uploads/a.png"));
    }

    #[test]
    fn upload_lifecycle_only_exposes_path_after_completion() {
        let mut slide = Slide::from_draft("s1", "b1", 0, SlideDraft::default());
        slide.begin_upload("up-1");
        assert!(slide.image.is_pending());
        assert_eq!(slide.image.loadable_path(), None);

        slide.complete_upload("/uploads/x.jpg");
        assert_eq!(slide.image.loadable_path(), Some("/uploads/x.jpg"));
    }

    #[test]
    fn image_ref_wire_shape_is_tagged() {
        let json = serde_json::to_value(ImageRef::path("/a.png")).unwrap();
        assert_eq!(json, serde_json::json!({"state": "path", "path": "/a.png"}));

        let slide: Slide =
            serde_json::from_str(r#"{"id":"s1","band_id":"b1","position":0}"#).unwrap();
        assert_eq!(slide.image, ImageRef::Missing);
    }

    #[test]
    fn empty_path_is_invalid() {
        let mut slide = Slide::from_draft("s1", "b1", 0, SlideDraft::default());
        slide.image = ImageRef::path("  ");
        assert!(matches!(slide.validate(), Err(BandError::Validation(_))));
    }

    #[test]
    fn script_links_are_rejected() {
        let mut slide = Slide::from_draft("s1", "b1", 0, SlideDraft::default());
        slide.link = "  JavaScript:alert(1)".into();
        assert!(matches!(slide.validate(), Err(BandError::Validation(_))));

        slide.link = "/ofertas?ref=javascript:".into();
        assert!(slide.validate().is_ok());
    }
}
