use actix_web::{web, Responder};
use common::requests::CreateBandRequest;

use crate::services::json_or_error;
use crate::store::BandStore;

pub async fn process(
    store: web::Data<BandStore>,
    payload: web::Json<CreateBandRequest>,
) -> impl Responder {
    let request = payload.into_inner();
    json_or_error(store.create_band(
        &request.page_id,
        &request.kind,
        request.payload,
        request.visual,
    ))
}
