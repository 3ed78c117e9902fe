use actix_web::{web, Responder};
use common::requests::CreateSlideRequest;

use crate::services::json_or_error;
use crate::store::BandStore;

pub async fn process(
    store: web::Data<BandStore>,
    payload: web::Json<CreateSlideRequest>,
) -> impl Responder {
    let request = payload.into_inner();
    json_or_error(store.create_slide(&request.band_id, request.slide))
}
