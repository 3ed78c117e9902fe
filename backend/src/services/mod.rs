//! HTTP surface of the band editor.
//!
//! Every module exposes a `configure_routes()` scope; handlers are `process` functions
//! in one file per endpoint. Failures are answered with a `{success: false, error}` body.

pub mod bands;
pub mod pages;
pub mod reorder;
pub mod slides;
pub mod uploads;

use actix_web::HttpResponse;
use common::requests::StatusReply;
use common::BandError;
use log::{error, warn};
use serde::Serialize;

use crate::store::StoreError;

/// Maps a store failure to its status code: rejected input is 400, a missing band or
/// slide is 404, storage trouble is 503.
pub(crate) fn error_response(err: &StoreError) -> HttpResponse {
    let body = StatusReply::failure(err.to_string());
    match err {
        StoreError::Band(BandError::NotFound(_)) => {
            warn!("{err}");
            HttpResponse::NotFound().json(body)
        }
        StoreError::Band(BandError::Transport(_)) => {
            error!("{err}");
            HttpResponse::ServiceUnavailable().json(body)
        }
        StoreError::Band(_) => {
            warn!("Rejected request: {err}");
            HttpResponse::BadRequest().json(body)
        }
        StoreError::Sqlite(_) | StoreError::Json(_) | StoreError::Poisoned => {
            error!("Storage failure: {err}");
            HttpResponse::ServiceUnavailable().json(body)
        }
    }
}

pub(crate) fn json_or_error<T: Serialize>(result: Result<T, StoreError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(err) => error_response(&err),
    }
}

pub(crate) fn ack_or_error(result: Result<(), StoreError>) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::Ok().json(StatusReply::ok()),
        Err(err) => error_response(&err),
    }
}

#[cfg(test)]
#[path = "tests/services_tests.rs"]
mod tests;
