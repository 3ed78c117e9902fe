use actix_web::{web, Responder};
use common::model::Band;

use crate::services::json_or_error;
use crate::store::BandStore;

pub async fn process(store: web::Data<BandStore>, payload: web::Json<Band>) -> impl Responder {
    json_or_error(store.save_band(&payload))
}
