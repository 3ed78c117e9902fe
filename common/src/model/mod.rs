//! In-memory representation of a page's bands and their typed payloads.
//!
//! - `band`: band kinds, visual configuration and the typed payloads.
//! - `slide`: slides of a slideshow band and their image references.
//! - `page`: the ordered band collection of one page and its mutation rules.
//! - `ordering`: contiguous-ranking helpers shared by bands and slides.

pub mod band;
pub mod ordering;
pub mod page;
pub mod slide;

pub use band::{
    Band, BandKind, BandPayload, GenericPayload, ProductPayload, SlideshowPayload, VisualConfig,
    DEFAULT_INTERVAL_MS,
};
pub use page::Page;
pub use slide::{ImageRef, Slide, SlideDraft};

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
