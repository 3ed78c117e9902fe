//! Pure markup rendering for bands.
//!
//! `render` maps one band to a self-contained HTML fragment. It performs no I/O and
//! its output depends only on the band value. Slideshow fragments carry the declarative
//! attributes listed in [`crate::carousel::markup`] so a controller can attach to them
//! without further requests.

use std::fmt::Write;

use crate::carousel::markup::*;
use crate::model::{Band, BandPayload, GenericPayload, ImageRef, ProductPayload, SlideshowPayload};

/// Stylesheet for rendered bands, shared by the public page and the editor preview.
pub const STYLESHEET: &str = include_str!("bands.css");

/// Renders every band of a page in order.
pub fn render_page(bands: &[Band]) -> String {
    bands.iter().map(render).collect::<Vec<_>>().join("\n")
}

/// Renders a single band according to its type.
pub fn render(band: &Band) -> String {
    let body = match &band.payload {
        BandPayload::Slideshow(show) => return render_slideshow(band, show),
        BandPayload::Product(product) => render_product(product),
        BandPayload::Generic(generic) => render_generic(generic),
    };
    format!(
        "<section {}>{}</section>",
        wrapper_attributes(band, &format!("band band-{}", band.kind())),
        body
    )
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn wrapper_attributes(band: &Band, base_class: &str) -> String {
    let mut attrs = format!(
        r#"id="band-{id}" class="{base_class} {height}" data-band-id="{id}""#,
        id = escape_html(&band.id),
        height = escape_html(&band.visual.height_class),
    );

    let mut style = String::new();
    if let Some(color) = &band.visual.background_color {
        let _ = write!(style, "background-color:{};", escape_html(color));
    }
    if let Some(color) = &band.visual.text_color {
        let _ = write!(style, "color:{};", escape_html(color));
    }
    if !style.is_empty() {
        let _ = write!(attrs, r#" style="{style}""#);
    }
    attrs
}

fn render_slideshow(band: &Band, show: &SlideshowPayload) -> String {
    let count = show.slides.len();
    let mut slides = show.slides.iter().collect::<Vec<_>>();
    slides.sort_by_key(|slide| slide.position);

    let mut out = format!(
        r#"<section {} {ATTR_CAROUSEL} {ATTR_AUTOPLAY}="{}" {ATTR_INTERVAL}="{}" tabindex="0" role="region" aria-roledescription="carousel">"#,
        wrapper_attributes(band, "band band-slideshow"),
        show.autoplay,
        show.interval_ms,
    );

    let _ = write!(out, r#"<div class="{CLASS_TRACK}">"#);
    for (index, slide) in slides.iter().enumerate() {
        let active = index == 0;
        let _ = write!(
            out,
            r#"<div class="{CLASS_SLIDE}{}" {ATTR_SLIDE_INDEX}="{index}" role="group" aria-roledescription="slide" aria-label="{} / {count}" aria-hidden="{}">"#,
            if active { format!(" {CLASS_ACTIVE}") } else { String::new() },
            index + 1,
            !active,
        );

        let image = slide_image(&slide.image, &slide.alt, index == 0);
        if slide.link.trim().is_empty() {
            out.push_str(&image);
        } else {
            let _ = write!(out, r#"<a href="{}">{image}</a>"#, escape_html(&slide.link));
        }

        if !slide.title.is_empty() || !slide.subtitle.is_empty() {
            out.push_str(r#"<div class="carousel-caption">"#);
            if !slide.title.is_empty() {
                let _ = write!(out, "<h2>{}</h2>", escape_html(&slide.title));
            }
            if !slide.subtitle.is_empty() {
                let _ = write!(out, "<p>{}</p>", escape_html(&slide.subtitle));
            }
            out.push_str("</div>");
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");

    if count > 1 {
        let _ = write!(
            out,
            r#"<button type="button" class="carousel-prev" {ATTR_PREV} aria-label="Anterior">&#8249;</button><button type="button" class="carousel-next" {ATTR_NEXT} aria-label="Siguiente">&#8250;</button>"#
        );
    }

    out.push_str(r#"<div class="carousel-indicators" role="tablist">"#);
    for index in 0..count {
        let active = index == 0;
        let _ = write!(
            out,
            r#"<button type="button" class="carousel-indicator{}" {ATTR_INDICATOR}="{index}" role="tab" aria-selected="{active}" aria-label="Ir a la diapositiva {}"></button>"#,
            if active { format!(" {CLASS_ACTIVE}") } else { String::new() },
            index + 1,
        );
    }
    out.push_str("</div></section>");
    out
}

/// The first slide loads eagerly; the rest defer their source to the controller.
fn slide_image(image: &ImageRef, alt: &str, eager: bool) -> String {
    match image.loadable_path() {
        Some(path) if eager => format!(
            r#"<img src="{}" alt="{}">"#,
            escape_html(path),
            escape_html(alt)
        ),
        Some(path) => format!(
            r#"<img class="{CLASS_LAZY}" {ATTR_DEFERRED_SRC}="{}" alt="{}">"#,
            escape_html(path),
            escape_html(alt)
        ),
        None => format!(
            r#"<div class="image-placeholder{}" role="img" aria-label="{}"></div>"#,
            if image.is_pending() { " uploading" } else { "" },
            escape_html(alt)
        ),
    }
}

fn render_product(product: &ProductPayload) -> String {
    let image = match product.image.loadable_path() {
        Some(path) => format!(
            r#"<img src="{}" alt="{}" loading="lazy">"#,
            escape_html(path),
            escape_html(&product.image_alt)
        ),
        None => r#"<div class="image-placeholder" role="img"></div>"#.to_string(),
    };
    let cta = if product.cta_label.is_empty() {
        String::new()
    } else {
        format!(
            r#"<span class="product-cta">{}</span>"#,
            escape_html(&product.cta_label)
        )
    };
    format!(
        r#"<a class="product-link" href="{}"><div class="product-image">{image}</div><div class="product-text"><h2>{}</h2><p>{}</p>{cta}</div></a>"#,
        escape_html(&product.link),
        escape_html(&product.title),
        escape_html(&product.description),
    )
}

fn render_generic(generic: &GenericPayload) -> String {
    generic.html.clone()
}

#[cfg(test)]
mod tests;
