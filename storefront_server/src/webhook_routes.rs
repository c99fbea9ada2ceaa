//! The payment gateway's checkout webhook.
//!
//! By the time a request gets here, the signature middleware has already checked the raw body. The handler answers
//! with one of three things:
//! * `200 {"received": true}` when the order was created, already existed, or the event is of no interest;
//! * `400` when the notification can never be processed, so the gateway stops redelivering it;
//! * `500` when processing failed for a reason that may go away, so the gateway delivers it again later.
use actix_web::{web, HttpResponse};
use log::*;
use storefront_engine::{traits::StorefrontDatabase, FulfillmentApi, FulfillmentOutcome};

use crate::{data_objects::WebhookAck, errors::ServerError, route};

route!(checkout_webhook => Post "/checkout" impl StorefrontDatabase);
pub async fn checkout_webhook<B: StorefrontDatabase>(
    body: web::Bytes,
    api: web::Data<FulfillmentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("🛍️ Received checkout webhook ({} bytes)", body.len());
    match api.process_payload(body.as_ref()).await {
        Ok(FulfillmentOutcome::Created(order, items)) => {
            info!("🛍️ Order #{} ({} items) created for session [{}]", order.id, items.len(), order.session_id);
        },
        Ok(FulfillmentOutcome::AlreadyProcessed(session_id)) => {
            info!("🛍️ Duplicate delivery for session [{session_id}] acknowledged");
        },
        Ok(FulfillmentOutcome::Ignored(event_type)) => {
            debug!("🛍️ '{event_type}' event acknowledged without processing");
        },
        Err(e) if e.is_retryable() => {
            error!("🛍️ Could not process checkout webhook. The gateway will be asked to retry. {e}");
            return Err(e.into());
        },
        Err(e) => {
            warn!("🛍️ Rejecting checkout webhook. {e}");
            return Err(e.into());
        },
    }
    Ok(HttpResponse::Ok().json(WebhookAck::received()))
}
