//! # Public Page Module
//!
//! `GET /pages/{page_id}` renders a page's bands on the server into a minimal document.
//! The frontend bundle loaded by the document finds every `data-carousel` element and
//! attaches a controller to it.

mod render;

use actix_web::web::{get, scope};
use actix_web::Scope;

const PAGES_PATH: &str = "/pages";

pub fn configure_routes() -> Scope {
    scope(PAGES_PATH).route("/{page_id}", get().to(render::process))
}
