//! # Band Service Module
//!
//! Routes under `/api/bands`:
//!
//! *   **`GET /page/{page_id}`**: ordered bands of a page, slides included. An unknown
//!     page answers with an empty list.
//! *   **`POST /create`**: appends a band. Body `{page_id, kind, payload?, visual?}`; the
//!     created band is echoed back.
//! *   **`POST /save`**: stores the payload and visual settings of an existing band.
//!     Order, page and type never change through this route.
//! *   **`DELETE /{band_id}`**: removes a band and its slides, compacting the order.

mod create;
mod delete;
mod get;
mod save;

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/bands";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/page/{page_id}", get().to(get::process))
        .route("/create", post().to(create::process))
        .route("/save", post().to(save::process))
        .route("/{band_id}", delete().to(delete::process))
}
