use actix_web::{web, Responder};
use common::model::Slide;

use crate::services::json_or_error;
use crate::store::BandStore;

pub async fn process(store: web::Data<BandStore>, payload: web::Json<Slide>) -> impl Responder {
    json_or_error(store.save_slide(&payload))
}
