use super::{BandStore, StoreError};

use common::model::{
    BandKind, BandPayload, GenericPayload, ImageRef, ProductPayload, SlideDraft, VisualConfig,
};
use common::reorder::ReorderIntent;
use common::upload::UploadSlot;
use common::BandError;

const PAGE: &str = "home";

fn store() -> BandStore {
    BandStore::open_in_memory().expect("in-memory store")
}

fn ids(store: &BandStore, page_id: &str) -> Vec<String> {
    store
        .read_page(page_id)
        .expect("read page")
        .into_iter()
        .map(|band| band.id)
        .collect()
}

fn generic(store: &BandStore, html: &str) -> String {
    store
        .create_band(
            PAGE,
            "generic",
            Some(BandPayload::Generic(GenericPayload {
                html: html.to_string(),
            })),
            VisualConfig::default(),
        )
        .expect("create generic band")
        .id
}

fn slideshow_with(store: &BandStore, titles: &[&str]) -> (String, Vec<String>) {
    let band = store
        .create_band(PAGE, "slideshow", None, VisualConfig::default())
        .expect("create slideshow");
    let slides = titles
        .iter()
        .map(|title| {
            store
                .create_slide(
                    &band.id,
                    SlideDraft {
                        title: title.to_string(),
                        ..SlideDraft::default()
                    },
                )
                .expect("create slide")
                .id
        })
        .collect();
    (band.id, slides)
}

fn assert_band_error(result: Result<impl std::fmt::Debug, StoreError>, expected: fn(&BandError) -> bool) {
    match result {
        Err(StoreError::Band(err)) => assert!(expected(&err), "unexpected error {err:?}"),
        other => panic!("expected a band error, got {other:?}"),
    }
}

#[test]
fn unknown_page_reads_empty() {
    assert!(store().read_page("nowhere").expect("read").is_empty());
}

#[test]
fn created_bands_append_with_contiguous_order() {
    let store = store();
    let first = generic(&store, "<p>1</p>");
    let second = generic(&store, "<p>2</p>");
    let third = store
        .create_band(PAGE, "product", None, VisualConfig::default())
        .expect("product band");

    let bands = store.read_page(PAGE).expect("read");
    assert_eq!(bands.len(), 3);
    assert_eq!(
        bands.iter().map(|b| b.order).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert_eq!(bands[0].id, first);
    assert_eq!(bands[1].id, second);
    assert_eq!(bands[2].kind(), BandKind::Product);
    assert_eq!(third.order, 2);
}

#[test]
fn unknown_kind_is_rejected_and_nothing_is_written() {
    let store = store();
    assert_band_error(
        store.create_band(PAGE, "carousel3d", None, VisualConfig::default()),
        |e| matches!(e, BandError::Validation(_)),
    );
    assert!(store.read_page(PAGE).expect("read").is_empty());
}

#[test]
fn payload_must_match_declared_kind() {
    let store = store();
    assert_band_error(
        store.create_band(
            PAGE,
            "product",
            Some(BandPayload::Generic(GenericPayload::default())),
            VisualConfig::default(),
        ),
        |e| matches!(e, BandError::Validation(_)),
    );
}

#[test]
fn moving_the_last_band_first_reads_back_in_new_order() {
    let store = store();
    let s1 = generic(&store, "1");
    let s2 = generic(&store, "2");
    let s3 = generic(&store, "3");

    let intent = ReorderIntent::from_ordering(&[s3.clone(), s1.clone(), s2.clone()]);
    store.reorder_bands(PAGE, &intent).expect("reorder");

    assert_eq!(ids(&store, PAGE), vec![s3, s1, s2]);
    let orders: Vec<usize> = store
        .read_page(PAGE)
        .expect("read")
        .iter()
        .map(|b| b.order)
        .collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[test]
fn partial_reorder_is_rejected_without_side_effects() {
    let store = store();
    let s1 = generic(&store, "1");
    let s2 = generic(&store, "2");
    let _s3 = generic(&store, "3");
    let before = ids(&store, PAGE);

    let intent = ReorderIntent::from_ordering(&[s2, s1]);
    assert_band_error(store.reorder_bands(PAGE, &intent), |e| {
        matches!(e, BandError::InvalidOrdering(_))
    });
    assert_eq!(ids(&store, PAGE), before);
}

#[test]
fn reorder_with_foreign_id_is_rejected() {
    let store = store();
    let s1 = generic(&store, "1");
    let _s2 = generic(&store, "2");

    let intent = ReorderIntent::from_ordering(&[s1, "elsewhere".to_string()]);
    assert_band_error(store.reorder_bands(PAGE, &intent), |e| {
        matches!(e, BandError::InvalidOrdering(_))
    });
}

#[test]
fn deleting_a_band_compacts_the_rest() {
    let store = store();
    let s1 = generic(&store, "1");
    let s2 = generic(&store, "2");
    let s3 = generic(&store, "3");

    store.delete_band(&s2).expect("delete");

    let bands = store.read_page(PAGE).expect("read");
    assert_eq!(
        bands.iter().map(|b| (b.id.clone(), b.order)).collect::<Vec<_>>(),
        vec![(s1, 0), (s3, 1)]
    );
    assert_band_error(store.band(&s2), |e| matches!(e, BandError::NotFound(_)));
}

#[test]
fn deleting_an_unknown_band_is_not_found() {
    assert_band_error(store().delete_band("ghost"), |e| {
        matches!(e, BandError::NotFound(_))
    });
}

#[test]
fn pages_are_ranked_independently() {
    let store = store();
    generic(&store, "home");
    let about = store
        .create_band("about", "generic", None, VisualConfig::default())
        .expect("about band");
    assert_eq!(about.order, 0);
    assert_eq!(ids(&store, "about"), vec![about.id]);
}

#[test]
fn slides_are_read_back_with_their_band_in_position_order() {
    let store = store();
    let (band_id, slides) = slideshow_with(&store, &["a", "b", "c"]);

    let band = store.band(&band_id).expect("band");
    assert_eq!(band.slide_ordering(), slides);
    assert_eq!(
        band.slides().iter().map(|s| s.title.as_str()).collect::<Vec<_>>(),
        vec!["a", "b", "c"]
    );
    let show = band.slideshow().expect("slideshow payload");
    assert!(show.autoplay);
    assert_eq!(show.interval_ms, 5000);
}

#[test]
fn slides_cannot_be_added_to_other_band_types() {
    let store = store();
    let id = generic(&store, "x");
    assert_band_error(store.create_slide(&id, SlideDraft::default()), |e| {
        matches!(e, BandError::Validation(_))
    });
}

#[test]
fn slide_reorder_and_delete_keep_positions_contiguous() {
    let store = store();
    let (band_id, slides) = slideshow_with(&store, &["a", "b", "c"]);
    let (a, b, c) = (slides[0].clone(), slides[1].clone(), slides[2].clone());

    let intent = ReorderIntent::from_ordering(&[c.clone(), a.clone(), b.clone()]);
    store
        .reorder_slides(PAGE, &band_id, &intent)
        .expect("reorder slides");
    assert_eq!(
        store.band(&band_id).expect("band").slide_ordering(),
        vec![c.clone(), a.clone(), b.clone()]
    );

    store.delete_slide(&a).expect("delete slide");
    let band = store.band(&band_id).expect("band");
    assert_eq!(band.slide_ordering(), vec![c, b]);
    assert_eq!(
        band.slides().iter().map(|s| s.position).collect::<Vec<_>>(),
        vec![0, 1]
    );
}

#[test]
fn slide_reorder_is_scoped_to_the_page() {
    let store = store();
    let (band_id, slides) = slideshow_with(&store, &["a", "b"]);
    let intent = ReorderIntent::from_ordering(&[slides[1].clone(), slides[0].clone()]);
    assert_band_error(store.reorder_slides("about", &band_id, &intent), |e| {
        matches!(e, BandError::NotFound(_))
    });
}

#[test]
fn saving_a_band_keeps_its_order_and_rejects_type_changes() {
    let store = store();
    let _first = generic(&store, "1");
    let second = generic(&store, "2");

    let mut band = store.band(&second).expect("band");
    band.order = 7;
    band.visual.background_color = Some("#112233".to_string());
    band.payload = BandPayload::Generic(GenericPayload {
        html: "<h2>Nuevo</h2>".to_string(),
    });
    let saved = store.save_band(&band).expect("save");
    assert_eq!(saved.order, 1);

    let stored = store.band(&second).expect("band");
    assert_eq!(stored.visual.background_color.as_deref(), Some("#112233"));
    assert_eq!(
        stored.payload,
        BandPayload::Generic(GenericPayload {
            html: "<h2>Nuevo</h2>".to_string()
        })
    );

    let mut retyped = stored.clone();
    retyped.payload = BandPayload::Product(ProductPayload::default());
    assert_band_error(store.save_band(&retyped), |e| {
        matches!(e, BandError::Validation(_))
    });
}

#[test]
fn saving_a_slideshow_updates_slide_content_but_not_positions() {
    let store = store();
    let (band_id, slides) = slideshow_with(&store, &["a", "b"]);

    let mut band = store.band(&band_id).expect("band");
    if let BandPayload::Slideshow(show) = &mut band.payload {
        show.interval_ms = 3000;
        show.slides[0].title = "primera".to_string();
        show.slides[0].position = 1;
        show.slides[1].position = 0;
    }
    store.save_band(&band).expect("save slideshow");

    let band = store.band(&band_id).expect("band");
    assert_eq!(band.slide_ordering(), slides);
    assert_eq!(band.slides()[0].title, "primera");
    assert_eq!(band.slideshow().map(|s| s.interval_ms), Some(3000));
}

#[test]
fn saving_a_slideshow_cannot_add_or_drop_slides() {
    let store = store();
    let (band_id, _) = slideshow_with(&store, &["a", "b"]);

    let mut band = store.band(&band_id).expect("band");
    if let BandPayload::Slideshow(show) = &mut band.payload {
        show.slides.pop();
    }
    assert_band_error(store.save_band(&band), |e| {
        matches!(e, BandError::Validation(_))
    });
    assert_eq!(store.band(&band_id).expect("band").slides().len(), 2);
}

#[test]
fn saving_a_slide_keeps_its_position() {
    let store = store();
    let (band_id, slides) = slideshow_with(&store, &["a", "b"]);

    let mut slide = store.band(&band_id).expect("band").slides()[1].clone();
    slide.position = 0;
    slide.alt = "Vista del producto".to_string();
    let saved = store.save_slide(&slide).expect("save slide");
    assert_eq!(saved.position, 1);

    let band = store.band(&band_id).expect("band");
    assert_eq!(band.slide_ordering(), slides);
    assert_eq!(band.slides()[1].alt, "Vista del producto");
}

#[test]
fn upload_paths_land_in_the_slot() {
    let store = store();
    let (_, slides) = slideshow_with(&store, &["a"]);
    let product = store
        .create_band(PAGE, "product", None, VisualConfig::default())
        .expect("product");

    store
        .set_image(&UploadSlot::slide(slides[0].clone()), "/uploads/abc.png")
        .expect("slide image");
    store
        .set_image(&UploadSlot::product(product.id.clone()), "/uploads/def.jpg")
        .expect("product image");

    let bands = store.read_page(PAGE).expect("read");
    assert_eq!(bands[0].slides()[0].image, ImageRef::path("/uploads/abc.png"));
    match &bands[1].payload {
        BandPayload::Product(p) => assert_eq!(p.image, ImageRef::path("/uploads/def.jpg")),
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn saves_carrying_a_pending_upload_keep_the_stored_image() {
    let store = store();
    let (band_id, slides) = slideshow_with(&store, &["a"]);
    let product = store
        .create_band(PAGE, "product", None, VisualConfig::default())
        .expect("product");
    store
        .set_image(&UploadSlot::slide(slides[0].clone()), "/uploads/abc.png")
        .expect("slide image");
    store
        .set_image(&UploadSlot::product(product.id.clone()), "/uploads/def.jpg")
        .expect("product image");

    let mut slide = store.band(&band_id).expect("band").slides()[0].clone();
    slide.begin_upload("up-1");
    slide.title = "nuevo".to_string();
    let saved = store.save_slide(&slide).expect("save slide");
    assert_eq!(saved.image, ImageRef::path("/uploads/abc.png"));

    let mut band = store.band(&band_id).expect("band");
    if let BandPayload::Slideshow(show) = &mut band.payload {
        show.slides[0].begin_upload("up-2");
    }
    store.save_band(&band).expect("save slideshow");

    let mut product = store.band(&product.id).expect("product");
    if let BandPayload::Product(p) = &mut product.payload {
        p.image = ImageRef::Pending {
            upload_id: "up-3".to_string(),
        };
        p.title = "Zapatilla".to_string();
    }
    store.save_band(&product).expect("save product");

    let bands = store.read_page(PAGE).expect("read");
    assert_eq!(bands[0].slides()[0].image, ImageRef::path("/uploads/abc.png"));
    assert_eq!(bands[0].slides()[0].title, "nuevo");
    match &bands[1].payload {
        BandPayload::Product(p) => {
            assert_eq!(p.image, ImageRef::path("/uploads/def.jpg"));
            assert_eq!(p.title, "Zapatilla");
        }
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn product_slot_must_point_at_a_product_band() {
    let store = store();
    let id = generic(&store, "x");
    assert_band_error(store.set_image(&UploadSlot::product(id), "/uploads/a.png"), |e| {
        matches!(e, BandError::Validation(_))
    });
    assert_band_error(
        store.set_image(&UploadSlot::slide("ghost"), "/uploads/a.png"),
        |e| matches!(e, BandError::NotFound(_)),
    );
}

#[test]
fn data_survives_reopening_the_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bands.sqlite");

    let (band_id, slides) = {
        let store = BandStore::open(&path).expect("open");
        generic(&store, "keep");
        slideshow_with(&store, &["a", "b"])
    };

    let store = BandStore::open(&path).expect("reopen");
    let bands = store.read_page(PAGE).expect("read");
    assert_eq!(bands.len(), 2);
    assert_eq!(bands[1].id, band_id);
    assert_eq!(bands[1].slide_ordering(), slides);
}
