//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any I/O (and in particular, every database call) must therefore be
//! awaited, never blocked on.
use actix_web::{get, post, web, HttpResponse, Responder};
use log::*;
use storefront_engine::{
    checkout::{CheckoutMetadata, CheckoutRequest},
    traits::OrderManagement,
    SellerApi,
};

use crate::{data_objects::StatusUpdateRequest, errors::ServerError};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

/// JSON bodies that cannot be read are reported in the same `{"error": ...}` shape as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| ServerError::InvalidRequestBody(err.to_string()).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| ServerError::InvalidRequestPath(err.to_string()).into())
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Checkout  ----------------------------------------------------
/// Builds the metadata that the front end must attach to the hosted payment session. Only product ids and quantities
/// go into the cart snapshot. Prices are never taken from the client.
#[post("/api/checkout/metadata")]
pub async fn checkout_metadata(body: web::Json<CheckoutRequest>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received checkout metadata request");
    let metadata = CheckoutMetadata::try_from(body.into_inner()).map_err(|e| {
        debug!("💻️ Rejecting checkout request. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(metadata))
}

//----------------------------------------------   Seller  ----------------------------------------------------
route!(seller_orders => Get "/orders" impl OrderManagement);
/// All orders with their line items, newest first.
pub async fn seller_orders<B: OrderManagement>(api: web::Data<SellerApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET seller orders");
    let orders = api.orders_with_items().await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(update_order_status => Post "/orders/{id}/status" impl OrderManagement);
pub async fn update_order_status<B: OrderManagement>(
    path: web::Path<i64>,
    body: web::Json<StatusUpdateRequest>,
    api: web::Data<SellerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    let status = body.into_inner().status;
    debug!("💻️ POST status {status} for order #{order_id}");
    let order = api.update_order_status(order_id, status).await?;
    Ok(HttpResponse::Ok().json(order))
}
