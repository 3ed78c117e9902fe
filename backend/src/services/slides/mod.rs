//! # Slide Service Module
//!
//! Routes under `/api/slides`, all scoped to slideshow bands:
//!
//! *   **`POST /create`**: appends a slide, body `{band_id, slide}`.
//! *   **`POST /save`**: updates the content of a slide; its position is kept.
//! *   **`DELETE /{slide_id}`**: removes a slide and compacts the positions after it.

mod create;
mod delete;
mod save;

use actix_web::web::{delete, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/slides";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/create", post().to(create::process))
        .route("/save", post().to(save::process))
        .route("/{slide_id}", delete().to(delete::process))
}
