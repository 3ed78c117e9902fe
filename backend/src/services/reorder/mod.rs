//! # Reorder Service Module
//!
//! `POST /api/reorder` receives the editor's reorder submissions as a form:
//! `action` (`reorder_bands` or `reorder_slides`), `page_id`, `band_id` for slides, and
//! `order`, a JSON object mapping identifiers to one-based ranks.
//!
//! The submission is applied atomically against the current stored set. The reply is
//! `{success: true}` or `{success: false, error}`; on failure nothing is written.

mod submit;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/reorder";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", post().to(submit::process))
}
