use super::*;
use crate::model::{Slide, SlideDraft, VisualConfig};

fn band(payload: BandPayload) -> Band {
    Band {
        id: "b1".into(),
        page_id: "home".into(),
        order: 0,
        visual: VisualConfig::default(),
        payload,
    }
}

fn slide(id: &str, position: usize, path: Option<&str>) -> Slide {
    let mut slide = Slide::from_draft(
        id,
        "b1",
        position,
        SlideDraft {
            alt: format!("alt {id}"),
            title: format!("title {id}"),
            ..SlideDraft::default()
        },
    );
    if let Some(path) = path {
        slide.image = ImageRef::path(path);
    }
    slide
}

fn slideshow(slides: Vec<Slide>) -> Band {
    band(BandPayload::Slideshow(SlideshowPayload {
        autoplay: true,
        interval_ms: 5000,
        slides,
    }))
}

#[test]
fn slideshow_carries_declarative_autoplay_attributes() {
    let html = render(&slideshow(vec![slide("s1", 0, Some("/u/1.png"))]));
    assert!(html.contains(r#"data-carousel data-autoplay="true" data-interval="5000""#));
    assert!(html.contains(r#"data-band-id="b1""#));
}

#[test]
fn slideshow_emits_slides_and_indicators_in_position_order() {
    let html = render(&slideshow(vec![
        slide("second", 1, Some("/u/2.png")),
        slide("first", 0, Some("/u/1.png")),
        slide("third", 2, Some("/u/3.png")),
    ]));

    assert_eq!(html.matches(r#"class="carousel-slide"#).count(), 3);
    assert_eq!(html.matches("data-carousel-indicator=").count(), 3);
    let first = html.find("title first").unwrap();
    let second = html.find("title second").unwrap();
    let third = html.find("title third").unwrap();
    assert!(first < second && second < third);
}

#[test]
fn only_first_slide_loads_eagerly() {
    let html = render(&slideshow(vec![
        slide("a", 0, Some("/u/a.png")),
        slide("b", 1, Some("/u/b.png")),
    ]));
    assert!(html.contains(r#"<img src="/u/a.png""#));
    assert!(html.contains(r#"data-src="/u/b.png""#));
    assert!(!html.contains(r#" src="/u/b.png""#));
}

#[test]
fn pending_upload_is_never_a_loadable_image() {
    let mut pending = slide("a", 0, None);
    pending.begin_upload("up-1");
    let html = render(&slideshow(vec![pending]));
    assert!(!html.contains("<img"));
    assert!(!html.contains("data-src"));
    assert!(html.contains("image-placeholder uploading"));
}

#[test]
fn exactly_one_slide_is_initially_exposed() {
    let html = render(&slideshow(vec![
        slide("a", 0, Some("/a.png")),
        slide("b", 1, Some("/b.png")),
        slide("c", 2, Some("/c.png")),
    ]));
    assert_eq!(html.matches(r#"aria-hidden="false""#).count(), 1);
    assert_eq!(html.matches(r#"aria-selected="true""#).count(), 1);
    assert!(html.contains("data-carousel-prev"));
}

#[test]
fn single_slide_has_no_prev_next_controls() {
    let html = render(&slideshow(vec![slide("a", 0, Some("/a.png"))]));
    assert!(!html.contains("data-carousel-prev"));
    assert_eq!(html.matches("data-carousel-indicator=").count(), 1);
}

#[test]
fn product_is_a_single_link_wrapped_block() {
    let html = render(&band(BandPayload::Product(ProductPayload {
        image: ImageRef::path("/u/p.png"),
        image_alt: "Zapato".into(),
        title: "Zapatos <nuevos>".into(),
        description: "Rebajas".into(),
        cta_label: "Comprar".into(),
        link: "/tienda?a=1&b=2".into(),
    })));
    assert_eq!(html.matches("<a ").count(), 1);
    assert!(html.contains(r#"href="/tienda?a=1&amp;b=2""#));
    assert!(html.contains("Zapatos &lt;nuevos&gt;"));
    assert!(html.contains("Comprar"));
    assert!(!html.contains("data-carousel"));
}

#[test]
fn generic_markup_is_verbatim() {
    let markup = r#"<div class="promo"><script>track()</script></div>"#;
    let html = render(&band(BandPayload::Generic(GenericPayload {
        html: markup.into(),
    })));
    assert!(html.contains(markup));
}

#[test]
fn visual_config_is_escaped_into_wrapper() {
    let mut b = band(BandPayload::Generic(GenericPayload::default()));
    b.visual.background_color = Some("#fff\" onload=\"x".into());
    b.visual.text_color = Some("red".into());
    let html = render(&b);
    assert!(html.contains("background-color:#fff&quot; onload=&quot;x;color:red;"));
}

#[test]
fn rendering_is_deterministic() {
    let b = slideshow(vec![slide("a", 0, Some("/a.png")), slide("b", 1, None)]);
    assert_eq!(render(&b), render(&b));
}

#[test]
fn page_renders_bands_in_order() {
    let mut first = band(BandPayload::Generic(GenericPayload { html: "<p>one</p>".into() }));
    first.id = "x".into();
    let mut second = band(BandPayload::Generic(GenericPayload { html: "<p>two</p>".into() }));
    second.id = "y".into();
    second.order = 1;
    let html = render_page(&[first, second]);
    assert!(html.find("one").unwrap() < html.find("two").unwrap());
}
