//! # Upload Service Module
//!
//! `POST /api/uploads` accepts one image per request as multipart form data:
//!
//! - `type`: `slideshow` or `product`, must agree with the target.
//! - `target`: slot identifier, `slide_image_<slide id>` or `product_image_<band id>`.
//! - `file`: the image bytes. Must follow `target`.
//!
//! The declared media type is checked before any byte is read and the content is
//! sniffed once received. Files are stored content-addressed by MD5 in the configured
//! upload directory and served under `/uploads`. The reply is `{success: true, path}`
//! or `{success: false, error}`.

mod upload;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/uploads";

/// Public prefix stored uploads are served from.
pub const PUBLIC_PREFIX: &str = "/uploads";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", post().to(upload::process))
}
