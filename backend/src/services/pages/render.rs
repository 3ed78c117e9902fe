use actix_web::{web, HttpResponse, Responder};
use common::render::{escape_html, render_page, STYLESHEET};
use common::requests::StatusReply;
use log::warn;
use regex::Regex;

use crate::services::error_response;
use crate::store::BandStore;

/// Page identifiers are slugs: letters, digits, `-` and `_`.
const PAGE_ID_PATTERN: &str = r"^[A-Za-z0-9_-]{1,64}$";

pub async fn process(store: web::Data<BandStore>, path: web::Path<String>) -> impl Responder {
    let page_id = path.into_inner();
    let valid = match Regex::new(PAGE_ID_PATTERN) {
        Ok(re) => re.is_match(&page_id),
        Err(e) => {
            warn!("Page id pattern failed to compile: {e}");
            false
        }
    };
    if !valid {
        return HttpResponse::BadRequest()
            .json(StatusReply::failure(format!("invalid page id '{page_id}'")));
    }

    match store.read_page(&page_id) {
        Ok(bands) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(document(&page_id, &render_page(&bands))),
        Err(err) => error_response(&err),
    }
}

/// Wraps rendered bands into a document that boots the carousel controllers.
pub fn document(page_id: &str, bands_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLESHEET}</style>
</head>
<body data-page-id="{title}">
<main class="bands">
{bands_html}
</main>
<script type="module">import init from "/frontend.js"; init("/frontend_bg.wasm");</script>
</body>
</html>"#,
        title = escape_html(page_id),
    )
}
