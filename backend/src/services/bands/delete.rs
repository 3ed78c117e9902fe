use actix_web::{web, Responder};

use crate::services::ack_or_error;
use crate::store::BandStore;

pub async fn process(store: web::Data<BandStore>, path: web::Path<String>) -> impl Responder {
    ack_or_error(store.delete_band(&path.into_inner()))
}
