//! Attribute and class names shared by the slideshow renderer and the controller that
//! attaches to its output.

/// Marks the root element of a rendered slideshow.
pub const ATTR_CAROUSEL: &str = "data-carousel";
pub const ATTR_AUTOPLAY: &str = "data-autoplay";
pub const ATTR_INTERVAL: &str = "data-interval";
/// Deferred image source, moved into `src` when the slide is about to be shown.
pub const ATTR_DEFERRED_SRC: &str = "data-src";
pub const ATTR_SLIDE_INDEX: &str = "data-slide-index";
pub const ATTR_INDICATOR: &str = "data-carousel-indicator";
pub const ATTR_PREV: &str = "data-carousel-prev";
pub const ATTR_NEXT: &str = "data-carousel-next";

pub const CLASS_TRACK: &str = "carousel-track";
pub const CLASS_SLIDE: &str = "carousel-slide";
pub const CLASS_ACTIVE: &str = "active";
pub const CLASS_ANIMATING: &str = "carousel-animating";
pub const CLASS_SLIDE_NEXT: &str = "slide-next";
pub const CLASS_SLIDE_PREV: &str = "slide-prev";
pub const CLASS_LAZY: &str = "lazy";
