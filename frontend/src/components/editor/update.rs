//! Update function for the band editor, Elm style: it mutates the editor for one
//! message and returns whether the view must re-render.
//!
//! Every store call runs in a spawned task and reports back with a message. Reorders
//! are optimistic: the visible order changes at drag end, then the [`PageReorder`] of
//! the page decides what to submit and what to restore when the store disagrees.
//! Creates and deletes are registered with it so reorders and membership changes never
//! overlap.
//!
//! [`PageReorder`]: common::reorder::PageReorder

use common::model::{Band, ImageRef, Page};
use common::reorder::{Resolution, ReorderIntent};
use common::requests::{CreateBandRequest, CreateSlideRequest, ReorderForm};
use common::upload::{UploadRequest, UploadStatus};
use common::model::ordering::move_to;
use common::BandError;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlInputElement};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::tops_sheet::yw_material_top_sheet::{close_top_sheet, open_top_sheet};

use super::api;
use super::helpers::{
    apply_band_field, apply_persisted, apply_slide_field, band_of_slot, mark_saved,
    set_window_dirty_flag, show_error, show_toast, slot_image_mut,
};
use super::messages::Msg;
use super::state::{BandEditor, SortList, UploadEntry};

pub fn update(editor: &mut BandEditor, ctx: &Context<BandEditor>, msg: Msg) -> bool {
    match msg {
        Msg::PageLoaded(bands) => {
            match Page::from_bands(editor.page_id.clone(), bands) {
                Ok(page) => {
                    editor.page = page;
                    editor.reset_syncs();
                    editor.saved_md5.clear();
                    let ids: Vec<String> = editor.page.ordering();
                    for id in ids {
                        mark_saved(editor, &id);
                    }
                    set_window_dirty_flag(editor);
                }
                Err(err) => show_error("La página recibida no es válida", &err),
            }
            true
        }
        Msg::RequestFailed(context, err) => {
            show_error(&context, &err);
            false
        }
        Msg::MembershipFailed(context, err) => {
            editor.reorders.end_membership_change();
            show_error(&context, &err);
            true
        }

        Msg::OpenNewBandDialog => {
            open_top_sheet(editor.new_band_dialog_ref.clone());
            false
        }
        Msg::CloseNewBandDialog => {
            close_top_sheet(editor.new_band_dialog_ref.clone());
            false
        }
        Msg::CreateBand(kind) => {
            close_top_sheet(editor.new_band_dialog_ref.clone());
            if editor.reorders.begin_membership_change().is_err() {
                show_toast("Espera a que termine el reordenamiento.");
                return false;
            }
            let request = CreateBandRequest {
                page_id: editor.page_id.clone(),
                kind: kind.as_str().to_string(),
                payload: None,
                visual: Default::default(),
            };
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::create_band(&request).await {
                    Ok(band) => link.send_message(Msg::BandCreated(band)),
                    Err(err) => link.send_message(Msg::MembershipFailed(
                        "No se pudo crear la banda".to_string(),
                        err,
                    )),
                }
            });
            false
        }
        Msg::BandCreated(band) => {
            editor.reorders.end_membership_change();
            let band_id = band.id.clone();
            if let Err(err) = editor.page.push_band(band) {
                show_error("La banda creada no encaja en la página", &err);
                return false;
            }
            editor.reset_syncs();
            mark_saved(editor, &band_id);
            editor.selected_band = Some(band_id);
            set_window_dirty_flag(editor);
            show_toast("Banda creada.");
            true
        }
        Msg::DeleteBand(band_id) => {
            if editor.reorders.begin_membership_change().is_err() {
                show_toast("Espera a que termine el reordenamiento.");
                return false;
            }
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::delete_band(&band_id).await {
                    Ok(()) => link.send_message(Msg::BandDeleted(band_id)),
                    Err(err) => link.send_message(Msg::MembershipFailed(
                        "No se pudo eliminar la banda".to_string(),
                        err,
                    )),
                }
            });
            false
        }
        Msg::BandDeleted(band_id) => {
            editor.reorders.end_membership_change();
            if let Err(err) = editor.page.remove_band(&band_id) {
                show_error("La banda ya no existe", &err);
            }
            editor.saved_md5.remove(&band_id);
            if editor.selected_band.as_deref() == Some(band_id.as_str()) {
                editor.selected_band = None;
            }
            editor.reset_syncs();
            set_window_dirty_flag(editor);
            show_toast("Banda eliminada.");
            true
        }
        Msg::SelectBand(band_id) => {
            editor.selected_band = band_id;
            true
        }
        Msg::EditBand {
            band_id,
            field,
            value,
        } => {
            let result = editor
                .page
                .band_mut(&band_id)
                .and_then(|band| apply_band_field(band, field, value));
            if let Err(err) = result {
                show_error("Valor no válido", &err);
            }
            set_window_dirty_flag(editor);
            true
        }
        Msg::SaveBand(band_id) => {
            let Some(band) = editor.page.band(&band_id).cloned() else {
                return false;
            };
            let uploading = editor
                .uploads
                .keys()
                .any(|slot| band_of_slot(&editor.page, slot).as_deref() == Some(band_id.as_str()));
            if uploading {
                show_toast("Espera a que termine la subida de imágenes.");
                return false;
            }
            if let Err(err) = band.validate() {
                show_error("La banda no es válida", &err);
                return false;
            }
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::save_band(&band).await {
                    Ok(saved) => link.send_message(Msg::BandSaved(saved)),
                    Err(err) => link.send_message(Msg::RequestFailed(
                        "Error al guardar la banda".to_string(),
                        err,
                    )),
                }
            });
            false
        }
        Msg::BandSaved(saved) => {
            let band_id = saved.id.clone();
            if let Err(err) = editor.page.replace_band(saved) {
                show_error("Error al guardar la banda", &err);
                return true;
            }
            mark_saved(editor, &band_id);
            set_window_dirty_flag(editor);
            show_toast("Banda guardada correctamente.");
            true
        }

        Msg::AddSlide(band_id) => {
            if editor.reorders.begin_membership_change().is_err() {
                show_toast("Espera a que termine el reordenamiento.");
                return false;
            }
            let request = CreateSlideRequest {
                band_id,
                slide: Default::default(),
            };
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::create_slide(&request).await {
                    Ok(slide) => link.send_message(Msg::SlideCreated(slide)),
                    Err(err) => link.send_message(Msg::MembershipFailed(
                        "No se pudo añadir la diapositiva".to_string(),
                        err,
                    )),
                }
            });
            false
        }
        Msg::SlideCreated(slide) => {
            editor.reorders.end_membership_change();
            let band_id = slide.band_id.clone();
            let mut result = Ok(());
            apply_persisted(editor, &band_id, |band| result = band.push_slide(slide));
            if let Err(err) = result {
                show_error("La diapositiva creada no encaja en la banda", &err);
            }
            editor.reset_syncs();
            set_window_dirty_flag(editor);
            true
        }
        Msg::DeleteSlide { band_id, slide_id } => {
            if editor.reorders.begin_membership_change().is_err() {
                show_toast("Espera a que termine el reordenamiento.");
                return false;
            }
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::delete_slide(&slide_id).await {
                    Ok(()) => link.send_message(Msg::SlideDeleted { band_id, slide_id }),
                    Err(err) => link.send_message(Msg::MembershipFailed(
                        "No se pudo eliminar la diapositiva".to_string(),
                        err,
                    )),
                }
            });
            false
        }
        Msg::SlideDeleted { band_id, slide_id } => {
            editor.reorders.end_membership_change();
            apply_persisted(editor, &band_id, |band| {
                let _ = band.remove_slide(&slide_id);
            });
            editor.reset_syncs();
            set_window_dirty_flag(editor);
            true
        }
        Msg::EditSlide {
            band_id,
            slide_id,
            field,
            value,
        } => {
            let result = editor
                .page
                .band_mut(&band_id)
                .and_then(|band| band.slide_mut(&slide_id));
            match result {
                Ok(slide) => apply_slide_field(slide, field, value),
                Err(err) => show_error("Diapositiva no encontrada", &err),
            }
            set_window_dirty_flag(editor);
            true
        }

        Msg::DragStart(item) => {
            editor.dragging = Some(item);
            false
        }
        Msg::DragEnd => {
            editor.dragging = None;
            false
        }
        Msg::DropOn { list, target_index } => {
            let Some(item) = editor.dragging.take() else {
                return false;
            };
            if item.list != list {
                return false;
            }
            let Some(sync) = editor.sync(&list) else {
                return false;
            };
            let next = move_to(sync.visible(), &item.id, target_index);
            match editor.reorders.drag_end(&list, next) {
                Ok(Some(intent)) => submit_reorder(editor, ctx, list, intent),
                Ok(None) => {}
                Err(err) => show_error("No se pudo reordenar", &err),
            }
            true
        }
        Msg::ReorderResolved { list, outcome } => {
            match editor.reorders.resolve(&list, outcome) {
                Resolution::Idle => return false,
                Resolution::Settled => {
                    commit_confirmed(editor, &list);
                }
                Resolution::Submit(intent) => {
                    commit_confirmed(editor, &list);
                    submit_reorder(editor, ctx, list, intent);
                }
                Resolution::RolledBack { error, .. } => {
                    show_error("No se pudo guardar el nuevo orden", &error);
                }
            }
            if editor.reorders.needs_rebuild() {
                editor.reset_syncs();
            }
            true
        }

        Msg::PickImage(slot) => {
            editor.upload_target = Some(slot);
            if let Some(input) = editor.file_input_ref.cast::<HtmlInputElement>() {
                input.set_value("");
                input.click();
            }
            false
        }
        Msg::FileChosen(file) => {
            let Some(slot) = editor.upload_target.take() else {
                return false;
            };
            let request = match UploadRequest::prepare(&slot.identifier(), &file.type_()) {
                Ok(request) => request,
                Err(err) => {
                    show_error("Solo se admiten imágenes", &err);
                    return false;
                }
            };
            if editor.uploads.contains_key(&slot) {
                show_toast("Ya hay una subida en curso para esta imagen.");
                return false;
            }
            let Some(band_id) = band_of_slot(&editor.page, &slot) else {
                return false;
            };

            let link = ctx.link().clone();
            let progress_slot = slot.clone();
            let on_progress = link.callback(move |status: UploadStatus| Msg::UploadProgress {
                slot: progress_slot.clone(),
                status,
            });
            let done_slot = slot.clone();
            let on_done = link.callback(move |result: Result<String, BandError>| {
                Msg::UploadFinished {
                    slot: done_slot.clone(),
                    result,
                }
            });

            let handle = match api::upload(&request, &file, on_progress, on_done) {
                Ok(handle) => handle,
                Err(err) => {
                    show_error("No se pudo iniciar la subida", &err);
                    return false;
                }
            };

            let upload_id = uuid::Uuid::new_v4().to_string();
            let mut previous = ImageRef::Missing;
            apply_persisted(editor, &band_id, |band| {
                if let Some(image) = slot_image_mut(band, &slot) {
                    previous = std::mem::replace(image, ImageRef::Pending { upload_id });
                }
            });
            editor.uploads.insert(
                slot,
                UploadEntry {
                    status: UploadStatus::Pending,
                    previous,
                    handle: Some(handle),
                },
            );
            true
        }
        Msg::UploadProgress { slot, status } => match editor.uploads.get_mut(&slot) {
            Some(entry) => {
                entry.status = status;
                true
            }
            None => false,
        },
        Msg::UploadFinished { slot, result } => {
            let Some(entry) = editor.uploads.remove(&slot) else {
                return false;
            };
            let Some(band_id) = band_of_slot(&editor.page, &slot) else {
                return true;
            };
            let image = match result {
                Ok(path) => {
                    show_toast("Imagen subida correctamente.");
                    ImageRef::path(path)
                }
                Err(err) => {
                    show_error("Error al subir la imagen", &err);
                    entry.previous
                }
            };
            apply_persisted(editor, &band_id, |band| {
                if let Some(current) = slot_image_mut(band, &slot) {
                    *current = image;
                }
            });
            set_window_dirty_flag(editor);
            true
        }
    }
}

/// Sends a reorder intent for `list` and feeds the outcome back as a message.
fn submit_reorder(
    editor: &BandEditor,
    ctx: &Context<BandEditor>,
    list: SortList,
    intent: ReorderIntent,
) {
    let form = match &list {
        SortList::Bands => ReorderForm::bands(editor.page_id.clone(), &intent),
        SortList::Slides { band_id } => {
            ReorderForm::slides(editor.page_id.clone(), band_id.clone(), &intent)
        }
    };
    let link = ctx.link().clone();
    spawn_local(async move {
        let outcome = api::submit_reorder(&form).await;
        link.send_message(Msg::ReorderResolved { list, outcome });
    });
}

/// Copies the list's confirmed order into the page model.
fn commit_confirmed(editor: &mut BandEditor, list: &SortList) {
    let Some(confirmed) = editor.sync(list).map(|sync| sync.confirmed().to_vec()) else {
        return;
    };
    let result = match list {
        SortList::Bands => editor.page.reorder_bands(&confirmed),
        SortList::Slides { band_id } => {
            let mut result = Ok(());
            apply_persisted(editor, band_id, |band: &mut Band| {
                result = band.reorder_slides(&confirmed)
            });
            result
        }
    };
    if let Err(err) = result {
        show_error("El orden confirmado no coincide con la página", &err);
    }
}

/// File picked in the hidden input, if any.
pub fn chosen_file(event: &Event) -> Option<web_sys::File> {
    let input = event.target()?.dyn_into::<HtmlInputElement>().ok()?;
    input.files()?.get(0)
}
