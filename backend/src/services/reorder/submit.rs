use actix_web::{web, Responder};
use common::requests::{ReorderCommand, ReorderForm};
use log::info;

use crate::services::ack_or_error;
use crate::store::{BandStore, StoreError};

pub async fn process(store: web::Data<BandStore>, form: web::Form<ReorderForm>) -> impl Responder {
    ack_or_error(apply(&store, &form))
}

fn apply(store: &BandStore, form: &ReorderForm) -> Result<(), StoreError> {
    match form.parse()? {
        ReorderCommand::Bands { page_id, intent } => {
            info!("Reorder of {} bands requested on page {}", intent.len(), page_id);
            store.reorder_bands(&page_id, &intent)
        }
        ReorderCommand::Slides {
            page_id,
            band_id,
            intent,
        } => {
            info!("Reorder of {} slides requested in band {}", intent.len(), band_id);
            store.reorder_slides(&page_id, &band_id, &intent)
        }
    }
}
