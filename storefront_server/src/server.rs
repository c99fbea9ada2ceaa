use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use storefront_engine::{
    events::{EventHandlers, EventProducers},
    FulfillmentApi,
    SellerApi,
    SqliteDatabase,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::order_log::order_log_hooks,
    middleware::{SellerKeyMiddlewareFactory, SignatureMiddlewareFactory, SIGNATURE_HEADER},
    routes::{checkout_metadata, health, json_config, path_config, SellerOrdersRoute, UpdateOrderStatusRoute},
    webhook_routes::CheckoutWebhookRoute,
};

const EVENT_BUFFER_SIZE: usize = 128;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = if config.run_migrations {
        SqliteDatabase::new_migrated(&config.database_url, config.max_connections).await
    } else {
        SqliteDatabase::new_with_url(&config.database_url, config.max_connections).await
    }
    .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, order_log_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    if config.seller_api_key.is_empty() {
        warn!("🔑️ No seller key is configured. The seller routes will refuse every request.");
    }
    info!("🛍️ Oversell policy: {}", config.stock_policy);
    let bind_addr = (config.host.clone(), config.port);
    let srv = HttpServer::new(move || {
        let fulfillment_api =
            FulfillmentApi::new(db.clone(), producers.clone()).with_stock_policy(config.stock_policy);
        let seller_api = SellerApi::new(db.clone(), producers.clone());
        let webhook_scope = web::scope("/webhook")
            .wrap(SignatureMiddlewareFactory::new(
                SIGNATURE_HEADER,
                config.webhook.verifier(),
                config.webhook.signature_checks,
            ))
            .service(CheckoutWebhookRoute::<SqliteDatabase>::new());
        let seller_scope = web::scope("/api/seller")
            .wrap(SellerKeyMiddlewareFactory::new(config.seller_api_key.clone()))
            .service(SellerOrdersRoute::<SqliteDatabase>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("sfs::access_log"))
            .app_data(web::Data::new(fulfillment_api))
            .app_data(web::Data::new(seller_api))
            .app_data(json_config())
            .app_data(path_config())
            .service(health)
            .service(checkout_metadata)
            .service(webhook_scope)
            .service(seller_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind(bind_addr)?
    .run();
    Ok(srv)
}
