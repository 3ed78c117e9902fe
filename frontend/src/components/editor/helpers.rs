//! Utility functions for the band editor.
//!
//! - **User feedback**: temporary toast notifications, the editor's only error channel.
//! - **Dirty tracking**: MD5 of each band's content at its last load or save, mirrored
//!   into the global `app_dirty` flag.
//! - **Field edits**: applying text inputs to typed band and slide fields.
//! - **Upload slots**: locating the image field an upload is bound to.

use common::model::{Band, BandKind, BandPayload, ImageRef, Page, Slide};
use common::upload::UploadSlot;
use common::BandError;
use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;

use super::messages::{BandField, SlideField};
use super::state::BandEditor;

/// Displays a temporary notification at the bottom of the screen.
pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
                let style = html_toast.style();
                style.set_property("position", "fixed").ok();
                style.set_property("bottom", "20px").ok();
                style.set_property("left", "50%").ok();
                style.set_property("transform", "translateX(-50%)").ok();
                style.set_property("background", "rgba(0, 0, 0, 0.8)").ok();
                style.set_property("color", "#fff").ok();
                style.set_property("padding", "10px 20px").ok();
                style.set_property("border-radius", "4px").ok();
                style.set_property("z-index", "10000").ok();
                style.set_property("font-family", "Arial, sans-serif").ok();

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(3000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}

pub fn show_error(context: &str, err: &BandError) {
    gloo_console::error!(format!("{context}: {err}"));
    show_toast(&format!("{context}: {}", err.message()));
}

/// MD5 of the editable content of a band. Order is left out: it is saved through
/// reorder submissions, not through the save button.
pub fn band_md5(band: &Band) -> String {
    let content = serde_json::to_string(&(&band.payload, &band.visual)).unwrap_or_default();
    format!("{:x}", md5::compute(content))
}

pub fn is_dirty(editor: &BandEditor, band: &Band) -> bool {
    editor
        .saved_md5
        .get(&band.id)
        .map_or(true, |saved| saved != &band_md5(band))
}

pub fn mark_saved(editor: &mut BandEditor, band_id: &str) {
    if let Some(band) = editor.page.band(band_id) {
        let md5 = band_md5(band);
        editor.saved_md5.insert(band_id.to_string(), md5);
    }
}

/// Applies a change the store already holds (a confirmed reorder or upload) without
/// turning a clean band dirty.
pub fn apply_persisted(editor: &mut BandEditor, band_id: &str, change: impl FnOnce(&mut Band)) {
    let was_clean = editor
        .page
        .band(band_id)
        .is_some_and(|band| !is_dirty(editor, band));
    if let Ok(band) = editor.page.band_mut(band_id) {
        change(band);
    }
    if was_clean {
        mark_saved(editor, band_id);
    }
}

/// Sets the global `app_dirty` flag when any band differs from its saved content.
pub fn set_window_dirty_flag(editor: &BandEditor) {
    if let Some(window) = web_sys::window() {
        let dirty = editor.page.bands().iter().any(|band| is_dirty(editor, band));
        let _ = Reflect::set(
            &window,
            &JsValue::from_str("app_dirty"),
            &JsValue::from_bool(dirty),
        );
    }
}

pub fn kind_label(kind: BandKind) -> &'static str {
    match kind {
        BandKind::Slideshow => "Carrusel",
        BandKind::Product => "Producto",
        BandKind::Generic => "Contenido libre",
    }
}

pub fn apply_band_field(band: &mut Band, field: BandField, value: String) -> Result<(), BandError> {
    let optional = |value: String| {
        let trimmed = value.trim().to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    };

    match (field, &mut band.payload) {
        (BandField::HeightClass, _) => band.visual.height_class = value,
        (BandField::BackgroundColor, _) => band.visual.background_color = optional(value),
        (BandField::TextColor, _) => band.visual.text_color = optional(value),
        (BandField::Autoplay, BandPayload::Slideshow(show)) => show.autoplay = value == "true",
        (BandField::IntervalMs, BandPayload::Slideshow(show)) => {
            show.interval_ms = value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| BandError::validation(format!("'{value}' is not a valid interval")))?;
        }
        (BandField::ProductTitle, BandPayload::Product(product)) => product.title = value,
        (BandField::ProductDescription, BandPayload::Product(product)) => {
            product.description = value
        }
        (BandField::ProductCta, BandPayload::Product(product)) => product.cta_label = value,
        (BandField::ProductLink, BandPayload::Product(product)) => product.link = value,
        (BandField::ProductImageAlt, BandPayload::Product(product)) => product.image_alt = value,
        (BandField::GenericHtml, BandPayload::Generic(generic)) => generic.html = value,
        (field, payload) => {
            return Err(BandError::validation(format!(
                "{field:?} does not apply to a {} band",
                payload.kind()
            )))
        }
    }
    Ok(())
}

pub fn apply_slide_field(slide: &mut Slide, field: SlideField, value: String) {
    match field {
        SlideField::Alt => slide.alt = value,
        SlideField::Title => slide.title = value,
        SlideField::Subtitle => slide.subtitle = value,
        SlideField::Link => slide.link = value,
        SlideField::SeoTitle => slide.seo_title = value,
        SlideField::SeoDescription => slide.seo_description = value,
    }
}

/// Band owning the image field of `slot`.
pub fn band_of_slot(page: &Page, slot: &UploadSlot) -> Option<String> {
    match slot {
        UploadSlot::SlideImage { slide_id } => page
            .bands()
            .iter()
            .find(|band| band.slides().iter().any(|slide| &slide.id == slide_id))
            .map(|band| band.id.clone()),
        UploadSlot::ProductImage { band_id } => page.band(band_id).map(|band| band.id.clone()),
    }
}

pub fn slot_image_mut<'a>(band: &'a mut Band, slot: &UploadSlot) -> Option<&'a mut ImageRef> {
    match slot {
        UploadSlot::SlideImage { slide_id } => {
            band.slide_mut(slide_id).ok().map(|slide| &mut slide.image)
        }
        UploadSlot::ProductImage { .. } => match &mut band.payload {
            BandPayload::Product(product) => Some(&mut product.image),
            _ => None,
        },
    }
}
