//! Bands and their type-specific payloads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BandError;
use crate::model::new_id;
use crate::model::ordering::{self, Ranked};
use crate::model::slide::{is_script_link, ImageRef, Slide, SlideDraft};
use crate::reorder::ReorderIntent;

/// Autoplay period used when a slideshow does not configure one.
pub const DEFAULT_INTERVAL_MS: u32 = 5000;

/// The enumerated band kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandKind {
    Slideshow,
    Product,
    Generic,
}

impl BandKind {
    pub const ALL: [BandKind; 3] = [BandKind::Slideshow, BandKind::Product, BandKind::Generic];

    pub fn as_str(self) -> &'static str {
        match self {
            BandKind::Slideshow => "slideshow",
            BandKind::Product => "product",
            BandKind::Generic => "generic",
        }
    }

    /// Empty payload for a freshly created band of this kind.
    pub fn empty_payload(self) -> BandPayload {
        match self {
            BandKind::Slideshow => BandPayload::Slideshow(SlideshowPayload::default()),
            BandKind::Product => BandPayload::Product(ProductPayload::default()),
            BandKind::Generic => BandPayload::Generic(GenericPayload::default()),
        }
    }
}

impl fmt::Display for BandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BandKind {
    type Err = BandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slideshow" => Ok(BandKind::Slideshow),
            "product" => Ok(BandKind::Product),
            "generic" => Ok(BandKind::Generic),
            other => Err(BandError::validation(format!("unknown band type '{other}'"))),
        }
    }
}

/// Presentation settings. Opaque to the composition rules, escaped by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    pub height_class: String,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            height_class: "band-medium".to_string(),
            background_color: None,
            text_color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideshowPayload {
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,
    #[serde(default = "default_interval")]
    pub interval_ms: u32,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

fn default_autoplay() -> bool {
    true
}

fn default_interval() -> u32 {
    DEFAULT_INTERVAL_MS
}

impl Default for SlideshowPayload {
    fn default() -> Self {
        Self {
            autoplay: default_autoplay(),
            interval_ms: default_interval(),
            slides: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPayload {
    pub image: ImageRef,
    pub image_alt: String,
    pub title: String,
    pub description: String,
    pub cta_label: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericPayload {
    /// Trusted markup, emitted verbatim.
    pub html: String,
}

/// Type-specific content of a band. The tag doubles as the band type on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BandPayload {
    Slideshow(SlideshowPayload),
    Product(ProductPayload),
    Generic(GenericPayload),
}

impl BandPayload {
    pub fn kind(&self) -> BandKind {
        match self {
            BandPayload::Slideshow(_) => BandKind::Slideshow,
            BandPayload::Product(_) => BandKind::Product,
            BandPayload::Generic(_) => BandKind::Generic,
        }
    }

    /// Type-specific shape validation. `band_id` is the owner slides must point at.
    pub fn validate(&self, band_id: &str) -> Result<(), BandError> {
        match self {
            BandPayload::Slideshow(show) => {
                if show.interval_ms == 0 {
                    return Err(BandError::validation("slideshow interval must be positive"));
                }
                for slide in &show.slides {
                    slide.validate()?;
                    if slide.band_id != band_id {
                        return Err(BandError::validation(format!(
                            "slide '{}' belongs to band '{}', not '{band_id}'",
                            slide.id, slide.band_id
                        )));
                    }
                }
                ordering::validate_contiguous(&show.slides)
                    .map_err(|e| BandError::validation(e.to_string()))
            }
            BandPayload::Product(product) => {
                if is_script_link(&product.link) {
                    return Err(BandError::validation("product link must be a navigable url"));
                }
                product.image.validate()
            }
            BandPayload::Generic(_) => Ok(()),
        }
    }
}

/// One ordered content block on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub id: String,
    pub page_id: String,
    /// Zero-based rank within the page.
    pub order: usize,
    #[serde(default)]
    pub visual: VisualConfig,
    pub payload: BandPayload,
}

impl Band {
    pub fn kind(&self) -> BandKind {
        self.payload.kind()
    }

    pub fn validate(&self) -> Result<(), BandError> {
        if self.id.trim().is_empty() {
            return Err(BandError::validation("band id must not be empty"));
        }
        if self.page_id.trim().is_empty() {
            return Err(BandError::validation("band must belong to a page"));
        }
        self.payload.validate(&self.id)
    }

    pub fn slideshow(&self) -> Option<&SlideshowPayload> {
        match &self.payload {
            BandPayload::Slideshow(show) => Some(show),
            _ => None,
        }
    }

    fn slideshow_mut(&mut self) -> Result<&mut SlideshowPayload, BandError> {
        let id = self.id.clone();
        match &mut self.payload {
            BandPayload::Slideshow(show) => Ok(show),
            _ => Err(BandError::validation(format!("band '{id}' is not a slideshow"))),
        }
    }

    pub fn slides(&self) -> &[Slide] {
        self.slideshow().map(|show| show.slides.as_slice()).unwrap_or(&[])
    }

    pub fn slide_mut(&mut self, slide_id: &str) -> Result<&mut Slide, BandError> {
        self.slideshow_mut()?
            .slides
            .iter_mut()
            .find(|slide| slide.id == slide_id)
            .ok_or_else(|| BandError::not_found(format!("slide '{slide_id}'")))
    }

    /// Appends a slide at the end of the band.
    pub fn add_slide(&mut self, draft: SlideDraft) -> Result<Slide, BandError> {
        let band_id = self.id.clone();
        let show = self.slideshow_mut()?;
        let slide = Slide::from_draft(new_id(), band_id, show.slides.len(), draft);
        slide.validate()?;
        show.slides.push(slide.clone());
        Ok(slide)
    }

    /// Appends an already identified slide, e.g. one confirmed by the store.
    pub fn push_slide(&mut self, slide: Slide) -> Result<(), BandError> {
        let band_id = self.id.clone();
        let show = self.slideshow_mut()?;
        if slide.band_id != band_id {
            return Err(BandError::validation("slide belongs to another band"));
        }
        if slide.position != show.slides.len() {
            return Err(BandError::invalid_ordering(format!(
                "slide position {} must be {}",
                slide.position,
                show.slides.len()
            )));
        }
        if show.slides.iter().any(|s| s.id == slide.id) {
            return Err(BandError::validation(format!("duplicate slide '{}'", slide.id)));
        }
        slide.validate()?;
        show.slides.push(slide);
        Ok(())
    }

    /// Removes a slide and re-ranks the ones after it.
    pub fn remove_slide(&mut self, slide_id: &str) -> Result<Slide, BandError> {
        let show = self.slideshow_mut()?;
        let index = show
            .slides
            .iter()
            .position(|slide| slide.id == slide_id)
            .ok_or_else(|| BandError::not_found(format!("slide '{slide_id}'")))?;
        let removed = show.slides.remove(index);
        ordering::compact(&mut show.slides);
        Ok(removed)
    }

    pub fn reorder_slides(&mut self, new_ordering: &[String]) -> Result<(), BandError> {
        ordering::apply_ordering(&mut self.slideshow_mut()?.slides, new_ordering)
    }

    pub fn apply_slide_intent(&mut self, intent: &ReorderIntent) -> Result<(), BandError> {
        let new_ordering = intent.to_ordering()?;
        self.reorder_slides(&new_ordering)
    }

    pub fn slide_ordering(&self) -> Vec<String> {
        ordering::ids_of(self.slides())
    }
}

impl Ranked for Band {
    fn id(&self) -> &str {
        &self.id
    }

    fn rank(&self) -> usize {
        self.order
    }

    fn set_rank(&mut self, rank: usize) {
        self.order = rank;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slideshow(id: &str) -> Band {
        Band {
            id: id.to_string(),
            page_id: "home".to_string(),
            order: 0,
            visual: VisualConfig::default(),
            payload: BandPayload::Slideshow(SlideshowPayload::default()),
        }
    }

    #[test]
    fn kind_parses_only_enumerated_values() {
        assert_eq!("product".parse::<BandKind>().unwrap(), BandKind::Product);
        assert!(matches!(
            "carousel".parse::<BandKind>(),
            Err(BandError::Validation(_))
        ));
    }

    #[test]
    fn payload_tag_is_the_band_type() {
        let json = serde_json::to_value(BandPayload::Generic(GenericPayload {
            html: "<p>x</p>".into(),
        }))
        .unwrap();
        assert_eq!(json["type"], "generic");

        let parsed: BandPayload = serde_json::from_str(r#"{"type":"slideshow"}"#).unwrap();
        let BandPayload::Slideshow(show) = parsed else {
            panic!("expected slideshow payload");
        };
        assert!(show.autoplay);
        assert_eq!(show.interval_ms, DEFAULT_INTERVAL_MS);
    }

    #[test]
    fn slide_positions_stay_contiguous() {
        let mut band = slideshow("b1");
        let s1 = band.add_slide(SlideDraft::default()).unwrap();
        let s2 = band.add_slide(SlideDraft::default()).unwrap();
        let s3 = band.add_slide(SlideDraft::default()).unwrap();
        assert_eq!((s1.position, s2.position, s3.position), (0, 1, 2));

        band.remove_slide(&s2.id).unwrap();
        let positions: Vec<usize> = band.slides().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0, 1]);
        assert_eq!(band.slide_ordering(), vec![s1.id.clone(), s3.id.clone()]);
        assert!(band.validate().is_ok());
    }

    #[test]
    fn slide_reorder_rejects_foreign_ids() {
        let mut band = slideshow("b1");
        let a = band.add_slide(SlideDraft::default()).unwrap();
        let b = band.add_slide(SlideDraft::default()).unwrap();

        let err = band
            .reorder_slides(&[a.id.clone(), "other".to_string()])
            .unwrap_err();
        assert!(matches!(err, BandError::InvalidOrdering(_)));
        assert_eq!(band.slide_ordering(), vec![a.id.clone(), b.id.clone()]);

        band.reorder_slides(&[b.id.clone(), a.id.clone()]).unwrap();
        assert_eq!(band.slide_ordering(), vec![b.id, a.id]);
    }

    #[test]
    fn slide_operations_on_other_kinds_fail() {
        let mut band = slideshow("b1");
        band.payload = BandPayload::Generic(GenericPayload::default());
        assert!(matches!(
            band.add_slide(SlideDraft::default()),
            Err(BandError::Validation(_))
        ));
        assert!(band.slides().is_empty());
    }

    #[test]
    fn zero_interval_and_gapped_slides_fail_validation() {
        let mut band = slideshow("b1");
        band.add_slide(SlideDraft::default()).unwrap();
        band.add_slide(SlideDraft::default()).unwrap();
        if let BandPayload::Slideshow(show) = &mut band.payload {
            show.slides[1].position = 4;
        }
        assert!(matches!(band.validate(), Err(BandError::Validation(_))));

        let mut band = slideshow("b2");
        if let BandPayload::Slideshow(show) = &mut band.payload {
            show.interval_ms = 0;
        }
        assert!(matches!(band.validate(), Err(BandError::Validation(_))));
    }

    #[test]
    fn removing_unknown_slide_is_not_found() {
        let mut band = slideshow("b1");
        assert!(matches!(
            band.remove_slide("ghost"),
            Err(BandError::NotFound(_))
        ));
    }
}
