use actix_web::{web, Responder};

use crate::services::json_or_error;
use crate::store::BandStore;

pub async fn process(store: web::Data<BandStore>, path: web::Path<String>) -> impl Responder {
    let page_id = path.into_inner();
    json_or_error(store.read_page(&page_id))
}
