//! HTTP calls from the editor to the band store.
//!
//! JSON endpoints go through `gloo-net`. Uploads use a raw `XmlHttpRequest` because
//! `fetch` reports no upload progress. A non-2xx reply is turned into a [`BandError`]
//! carrying the server's `error` message: 400 is a validation failure, 404 a missing
//! record, anything else a transport failure.

use common::model::{Band, Slide};
use common::requests::{
    CreateBandRequest, CreateSlideRequest, ReorderForm, Reply, StatusReply,
};
use common::upload::{UploadRequest, UploadStatus, FILE_FIELD, TARGET_FIELD, TYPE_FIELD};
use common::BandError;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{File, FormData, ProgressEvent, UrlSearchParams, XmlHttpRequest};
use yew::Callback;

fn transport(err: impl std::fmt::Display) -> BandError {
    BandError::transport(err.to_string())
}

fn js_transport(err: JsValue) -> BandError {
    BandError::transport(format!("{err:?}"))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BandError> {
    if response.ok() {
        return response.json::<T>().await.map_err(transport);
    }

    let status = response.status();
    let message = match response.json::<StatusReply>().await {
        Ok(StatusReply {
            error: Some(error), ..
        }) => error,
        _ => format!("HTTP {status}"),
    };
    Err(match status {
        400 => BandError::Validation(message),
        404 => BandError::NotFound(message),
        _ => BandError::Transport(message),
    })
}

async fn read_ack(response: Response) -> Result<(), BandError> {
    let reply: StatusReply = read_json(response).await?;
    Reply::from(reply).into_ack()
}

pub async fn load_page(page_id: &str) -> Result<Vec<Band>, BandError> {
    let response = Request::get(&format!("/api/bands/page/{page_id}"))
        .send()
        .await
        .map_err(transport)?;
    read_json(response).await
}

pub async fn create_band(request: &CreateBandRequest) -> Result<Band, BandError> {
    let response = Request::post("/api/bands/create")
        .json(request)
        .map_err(transport)?
        .send()
        .await
        .map_err(transport)?;
    read_json(response).await
}

pub async fn save_band(band: &Band) -> Result<Band, BandError> {
    let response = Request::post("/api/bands/save")
        .json(band)
        .map_err(transport)?
        .send()
        .await
        .map_err(transport)?;
    read_json(response).await
}

pub async fn delete_band(band_id: &str) -> Result<(), BandError> {
    let response = Request::delete(&format!("/api/bands/{band_id}"))
        .send()
        .await
        .map_err(transport)?;
    read_ack(response).await
}

pub async fn create_slide(request: &CreateSlideRequest) -> Result<Slide, BandError> {
    let response = Request::post("/api/slides/create")
        .json(request)
        .map_err(transport)?
        .send()
        .await
        .map_err(transport)?;
    read_json(response).await
}

pub async fn delete_slide(slide_id: &str) -> Result<(), BandError> {
    let response = Request::delete(&format!("/api/slides/{slide_id}"))
        .send()
        .await
        .map_err(transport)?;
    read_ack(response).await
}

/// Posts a reorder form; resolves once the store accepted or rejected the ordering.
pub async fn submit_reorder(form: &ReorderForm) -> Result<(), BandError> {
    let params = UrlSearchParams::new().map_err(js_transport)?;
    for (name, value) in form.fields() {
        params.append(name, value);
    }
    let response = Request::post("/api/reorder")
        .body(params)
        .map_err(transport)?
        .send()
        .await
        .map_err(transport)?;
    read_ack(response).await
}

/// An upload in flight. The callbacks stay registered while the handle is alive.
pub struct UploadHandle {
    _xhr: XmlHttpRequest,
    _on_progress: Closure<dyn FnMut(ProgressEvent)>,
    _on_done: Closure<dyn FnMut(ProgressEvent)>,
}

/// Sends one image as `multipart/form-data`. Progress is reported through
/// `on_progress`; `on_done` receives the stored path or the failure, from a separate
/// task so the handle may be dropped from there.
pub fn upload(
    request: &UploadRequest,
    file: &File,
    on_progress: Callback<UploadStatus>,
    on_done: Callback<Result<String, BandError>>,
) -> Result<UploadHandle, BandError> {
    let form = FormData::new().map_err(js_transport)?;
    form.append_with_str(TYPE_FIELD, request.kind().as_str())
        .map_err(js_transport)?;
    form.append_with_str(TARGET_FIELD, &request.slot.identifier())
        .map_err(js_transport)?;
    form.append_with_blob_and_filename(FILE_FIELD, file, &file.name())
        .map_err(js_transport)?;

    let xhr = XmlHttpRequest::new().map_err(js_transport)?;
    xhr.open_with_async("POST", "/api/uploads", true)
        .map_err(js_transport)?;

    let on_progress = Closure::<dyn FnMut(ProgressEvent)>::new(move |event: ProgressEvent| {
        if event.length_computable() {
            on_progress.emit(UploadStatus::progress(event.loaded(), event.total()));
        }
    });
    xhr.upload()
        .map_err(js_transport)?
        .set_onprogress(Some(on_progress.as_ref().unchecked_ref()));

    let finished = xhr.clone();
    let on_done = Closure::<dyn FnMut(ProgressEvent)>::new(move |_: ProgressEvent| {
        let result = completion(&finished);
        let on_done = on_done.clone();
        wasm_bindgen_futures::spawn_local(async move { on_done.emit(result) });
    });
    xhr.set_onloadend(Some(on_done.as_ref().unchecked_ref()));

    xhr.send_with_opt_form_data(Some(&form))
        .map_err(js_transport)?;

    Ok(UploadHandle {
        _xhr: xhr,
        _on_progress: on_progress,
        _on_done: on_done,
    })
}

fn completion(xhr: &XmlHttpRequest) -> Result<String, BandError> {
    let status = xhr.status().map_err(js_transport)?;
    if status == 0 {
        return Err(BandError::transport("the connection to the server was interrupted"));
    }
    let body = xhr.response_text().map_err(js_transport)?.unwrap_or_default();
    let reply: StatusReply = serde_json::from_str(&body)
        .map_err(|e| BandError::transport(format!("unexpected upload reply ({status}): {e}")))?;
    match Reply::from(reply) {
        Reply::Failure { error } if status == 400 => Err(BandError::Validation(error)),
        reply => reply.into_path(),
    }
}
