//! View rendering for the band editor.
//!
//! Three panes: the band list on the left (drag to reorder), the field editor of the
//! selected band in the middle, and a live preview rendered with the same markup the
//! public page serves. All user-facing text is in Spanish.

use common::model::{Band, BandPayload, ImageRef, Slide};
use common::render::{render_page, STYLESHEET};
use common::upload::{UploadSlot, UploadStatus};
use web_sys::{DragEvent, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::html::Scope;
use yew::prelude::*;

use super::dialogs::new_band::new_band_dialog;
use super::helpers::{is_dirty, kind_label};
use super::messages::{BandField, Msg, SlideField};
use super::state::{BandEditor, DragItem, SortList};
use super::update::chosen_file;

const HEIGHT_CLASSES: [(&str, &str); 3] = [
    ("band-small", "Baja"),
    ("band-medium", "Media"),
    ("band-large", "Alta"),
];

pub fn view(editor: &BandEditor, ctx: &Context<BandEditor>) -> Html {
    let link = ctx.link();

    html! {
        <div class="band-editor-root">
            { build_toolbar(editor, link) }
            <div class="band-editor-panes">
                { build_band_list(editor, link) }
                { build_field_editor(editor, link) }
                { build_preview(editor) }
            </div>
            <input
                type="file"
                accept="image/*"
                style="display:none;"
                ref={editor.file_input_ref.clone()}
                onchange={link.batch_callback(|e: Event| chosen_file(&e).map(Msg::FileChosen))}
            />
            { new_band_dialog(editor, link) }
        </div>
    }
}

fn icon_button(icon: &str, title: &str, onclick: Callback<MouseEvent>, disabled: bool) -> Html {
    html! {
        <button class="icon-btn" title={title.to_string()} {onclick} {disabled}>
            <i class="material-icons">{ icon }</i>
        </button>
    }
}

fn dirty_dot() -> Html {
    html! { <span class="dirty-dot" title="Cambios sin guardar" /> }
}

fn build_toolbar(editor: &BandEditor, link: &Scope<BandEditor>) -> Html {
    let busy = editor.reorder_busy();
    let save = match &editor.selected_band {
        Some(band_id) => {
            let band_id = band_id.clone();
            icon_button(
                "save",
                "Guardar banda",
                link.callback(move |_| Msg::SaveBand(band_id.clone())),
                false,
            )
        }
        None => icon_button("save", "Guardar banda", Callback::noop(), true),
    };

    html! {
        <div class="icon-toolbar">
            { icon_button("add_box", "Nueva banda", link.callback(|_| Msg::OpenNewBandDialog), busy) }
            { save }
            if editor.reorders.is_pending() {
                <span class="toolbar-status">{ "Guardando orden..." }</span>
            }
        </div>
    }
}

/// Drag source and drop target for one row of a sortable list.
fn sortable_row(
    link: &Scope<BandEditor>,
    list: SortList,
    id: &str,
    index: usize,
    classes: Classes,
    children: Html,
    draggable: bool,
) -> Html {
    let draggable = if draggable { "true" } else { "false" };
    let item = DragItem {
        list: list.clone(),
        id: id.to_string(),
    };
    let drag_id = id.to_string();
    let ondragstart = link.callback(move |e: DragEvent| {
        if let Some(transfer) = e.data_transfer() {
            let _ = transfer.set_data("text/plain", &drag_id);
        }
        Msg::DragStart(item.clone())
    });
    let ondrop = link.callback(move |e: DragEvent| {
        e.prevent_default();
        Msg::DropOn {
            list: list.clone(),
            target_index: index,
        }
    });

    html! {
        <li
            class={classes}
            {draggable}
            {ondragstart}
            ondragover={Callback::from(|e: DragEvent| e.prevent_default())}
            {ondrop}
            ondragend={link.callback(|_: DragEvent| Msg::DragEnd)}
        >
            { children }
        </li>
    }
}

fn build_band_list(editor: &BandEditor, link: &Scope<BandEditor>) -> Html {
    let busy = editor.reorder_busy();
    let labels = editor
        .sync(&SortList::Bands)
        .map(|sync| sync.labels())
        .unwrap_or_default();
    let draggable = editor.reorders.accepts_drop(&SortList::Bands);
    let rows = labels.iter().enumerate().filter_map(|(index, (band_id, rank))| {
        let band = editor.page.band(band_id)?;
        let selected = editor.selected_band.as_deref() == Some(band_id.as_str());
        let select_id = band_id.clone();
        let delete_id = band_id.clone();
        let children = html! {
            <>
                <span class="band-rank">{ rank }</span>
                <span class="band-title" onclick={link.callback(move |_| Msg::SelectBand(Some(select_id.clone())))}>
                    { kind_label(band.kind()) }
                    if is_dirty(editor, band) { { dirty_dot() } }
                </span>
                { icon_button("delete", "Eliminar banda", link.callback(move |_| Msg::DeleteBand(delete_id.clone())), busy) }
            </>
        };
        Some(sortable_row(
            link,
            SortList::Bands,
            band_id,
            index,
            classes!("band-row", selected.then_some("selected")),
            children,
            draggable,
        ))
    });

    html! {
        <div class="band-list-pane">
            <h3>{ "Bandas" }</h3>
            if labels.is_empty() {
                <p class="empty-hint">{ "La página no tiene bandas todavía." }</p>
            }
            <ul class="band-list">{ for rows }</ul>
        </div>
    }
}

fn text_input(label: &str, value: &str, onchange: Callback<String>) -> Html {
    html! {
        <label class="field">
            <span>{ label }</span>
            <input
                type="text"
                value={value.to_string()}
                onchange={Callback::from(move |e: Event| {
                    onchange.emit(e.target_unchecked_into::<HtmlInputElement>().value())
                })}
            />
        </label>
    }
}

fn band_field_callback(link: &Scope<BandEditor>, band_id: &str, field: BandField) -> Callback<String> {
    let band_id = band_id.to_string();
    link.callback(move |value| Msg::EditBand {
        band_id: band_id.clone(),
        field,
        value,
    })
}

fn build_field_editor(editor: &BandEditor, link: &Scope<BandEditor>) -> Html {
    let Some(band) = editor
        .selected_band
        .as_deref()
        .and_then(|band_id| editor.page.band(band_id))
    else {
        return html! {
            <div class="band-fields-pane">
                <p class="empty-hint">{ "Selecciona una banda para editarla." }</p>
            </div>
        };
    };

    let height = band_field_callback(link, &band.id, BandField::HeightClass);
    let height_options = HEIGHT_CLASSES.iter().map(|(value, label)| {
        html! {
            <option value={*value} selected={band.visual.height_class == *value}>{ *label }</option>
        }
    });

    html! {
        <div class="band-fields-pane">
            <h3>{ format!("{} ({})", kind_label(band.kind()), band.order + 1) }</h3>
            <label class="field">
                <span>{ "Altura" }</span>
                <select onchange={Callback::from(move |e: Event| {
                    height.emit(e.target_unchecked_into::<HtmlSelectElement>().value())
                })}>
                    { for height_options }
                </select>
            </label>
            { text_input(
                "Color de fondo",
                band.visual.background_color.as_deref().unwrap_or_default(),
                band_field_callback(link, &band.id, BandField::BackgroundColor),
            ) }
            { text_input(
                "Color de texto",
                band.visual.text_color.as_deref().unwrap_or_default(),
                band_field_callback(link, &band.id, BandField::TextColor),
            ) }
            { build_payload_fields(editor, link, band) }
        </div>
    }
}

fn build_payload_fields(editor: &BandEditor, link: &Scope<BandEditor>, band: &Band) -> Html {
    match &band.payload {
        BandPayload::Slideshow(show) => {
            let autoplay = band_field_callback(link, &band.id, BandField::Autoplay);
            html! {
                <>
                    <label class="field checkbox">
                        <input
                            type="checkbox"
                            checked={show.autoplay}
                            onchange={Callback::from(move |e: Event| {
                                let checked = e.target_unchecked_into::<HtmlInputElement>().checked();
                                autoplay.emit(checked.to_string())
                            })}
                        />
                        <span>{ "Reproducción automática" }</span>
                    </label>
                    { text_input(
                        "Intervalo (ms)",
                        &show.interval_ms.to_string(),
                        band_field_callback(link, &band.id, BandField::IntervalMs),
                    ) }
                    { build_slide_list(editor, link, band) }
                </>
            }
        }
        BandPayload::Product(product) => html! {
            <>
                { image_field(editor, link, UploadSlot::product(band.id.clone()), &product.image) }
                { text_input("Texto alternativo", &product.image_alt, band_field_callback(link, &band.id, BandField::ProductImageAlt)) }
                { text_input("Título", &product.title, band_field_callback(link, &band.id, BandField::ProductTitle)) }
                { text_input("Descripción", &product.description, band_field_callback(link, &band.id, BandField::ProductDescription)) }
                { text_input("Texto del botón", &product.cta_label, band_field_callback(link, &band.id, BandField::ProductCta)) }
                { text_input("Enlace", &product.link, band_field_callback(link, &band.id, BandField::ProductLink)) }
            </>
        },
        BandPayload::Generic(generic) => {
            let html_changed = band_field_callback(link, &band.id, BandField::GenericHtml);
            html! {
                <label class="field">
                    <span>{ "HTML" }</span>
                    <textarea
                        class="generic-html"
                        spellcheck="false"
                        value={generic.html.clone()}
                        onchange={Callback::from(move |e: Event| {
                            html_changed.emit(e.target_unchecked_into::<HtmlTextAreaElement>().value())
                        })}
                    />
                </label>
            }
        }
    }
}

fn image_field(editor: &BandEditor, link: &Scope<BandEditor>, slot: UploadSlot, image: &ImageRef) -> Html {
    let status = editor.uploads.get(&slot).map(|entry| &entry.status);
    let thumbnail = match image {
        ImageRef::Path { path } => html! { <img class="image-thumb" src={path.clone()} alt="" /> },
        ImageRef::Pending { .. } => html! { <div class="image-thumb uploading" /> },
        ImageRef::Missing => html! { <div class="image-thumb missing">{ "Sin imagen" }</div> },
    };
    let progress = match status {
        Some(UploadStatus::InProgress(fraction)) => html! {
            <div class="upload-progress">
                <div class="upload-progress-bar" style={format!("width:{:.0}%;", fraction * 100.0)} />
            </div>
        },
        Some(UploadStatus::Pending) => html! { <span class="upload-label">{ "Preparando subida..." }</span> },
        _ => html! {},
    };
    let uploading = status.is_some_and(UploadStatus::is_active);

    html! {
        <div class="image-field">
            { thumbnail }
            { progress }
            { icon_button("upload", "Subir imagen", link.callback(move |_| Msg::PickImage(slot.clone())), uploading) }
        </div>
    }
}

fn slide_field_callback(
    link: &Scope<BandEditor>,
    slide: &Slide,
    field: SlideField,
) -> Callback<String> {
    let band_id = slide.band_id.clone();
    let slide_id = slide.id.clone();
    link.callback(move |value| Msg::EditSlide {
        band_id: band_id.clone(),
        slide_id: slide_id.clone(),
        field,
        value,
    })
}

fn build_slide_list(editor: &BandEditor, link: &Scope<BandEditor>, band: &Band) -> Html {
    let busy = editor.reorder_busy();
    let list = SortList::Slides {
        band_id: band.id.clone(),
    };
    let labels = editor.sync(&list).map(|sync| sync.labels()).unwrap_or_default();
    let draggable = editor.reorders.accepts_drop(&list);

    let rows = labels.iter().enumerate().filter_map(|(index, (slide_id, rank))| {
        let slide = band.slides().iter().find(|slide| &slide.id == slide_id)?;
        let delete = {
            let band_id = band.id.clone();
            let slide_id = slide.id.clone();
            link.callback(move |_| Msg::DeleteSlide {
                band_id: band_id.clone(),
                slide_id: slide_id.clone(),
            })
        };
        let children = html! {
            <>
                <div class="slide-header">
                    <span class="band-rank">{ rank }</span>
                    { icon_button("delete", "Eliminar diapositiva", delete, busy) }
                </div>
                { image_field(editor, link, UploadSlot::slide(slide.id.clone()), &slide.image) }
                { text_input("Texto alternativo", &slide.alt, slide_field_callback(link, slide, SlideField::Alt)) }
                { text_input("Título", &slide.title, slide_field_callback(link, slide, SlideField::Title)) }
                { text_input("Subtítulo", &slide.subtitle, slide_field_callback(link, slide, SlideField::Subtitle)) }
                { text_input("Enlace", &slide.link, slide_field_callback(link, slide, SlideField::Link)) }
                { text_input("Título SEO", &slide.seo_title, slide_field_callback(link, slide, SlideField::SeoTitle)) }
                { text_input("Descripción SEO", &slide.seo_description, slide_field_callback(link, slide, SlideField::SeoDescription)) }
            </>
        };
        Some(sortable_row(
            link,
            list.clone(),
            slide_id,
            index,
            classes!("slide-row"),
            children,
            draggable,
        ))
    });

    let band_id = band.id.clone();
    html! {
        <div class="slide-list">
            <h4>{ "Diapositivas" }</h4>
            <ul>{ for rows }</ul>
            { icon_button("add_photo_alternate", "Añadir diapositiva", link.callback(move |_| Msg::AddSlide(band_id.clone())), busy) }
        </div>
    }
}

fn build_preview(editor: &BandEditor) -> Html {
    let markup = preview_markup(editor);
    html! {
        <div class="band-preview-pane">
            <style>{ STYLESHEET }</style>
            <div class="band-preview" ref={editor.preview_ref.clone()}>
                { Html::from_html_unchecked(AttrValue::from(markup)) }
            </div>
        </div>
    }
}

/// Markup the preview currently shows. The controllers are re-attached when it changes.
pub fn preview_markup(editor: &BandEditor) -> String {
    render_page(&editor.preview_bands())
}
