//! Shared-key access control for the seller routes.
//!
//! Wrap a scope or resource with [`SellerKeyMiddlewareFactory`] and every request must present the configured key in
//! the `X-Seller-Key` header. Anything else gets a 403 Forbidden. An unconfigured (empty) key refuses everybody.
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use storefront_common::Secret;

use crate::errors::ServerError;

pub const SELLER_KEY_HEADER: &str = "X-Seller-Key";

pub struct SellerKeyMiddlewareFactory {
    key: Secret<String>,
}

impl SellerKeyMiddlewareFactory {
    pub fn new(key: Secret<String>) -> Self {
        SellerKeyMiddlewareFactory { key }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SellerKeyMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = SellerKeyMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SellerKeyMiddlewareService { key: self.key.clone(), service: Rc::new(service) }))
    }
}

pub struct SellerKeyMiddlewareService<S> {
    key: Secret<String>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SellerKeyMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let allowed = req
            .headers()
            .get(SELLER_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|presented| keys_match(&self.key, presented));
        Box::pin(async move {
            if allowed {
                trace!("🔑️ Seller key accepted");
                service.call(req).await
            } else {
                warn!("🔑️ Missing or invalid seller key for {}. Denying access.", req.path());
                Err(ServerError::InsufficientPermissions("A valid seller key is required.".into()).into())
            }
        })
    }
}

/// Compares without returning early on the first differing byte.
fn keys_match(expected: &Secret<String>, presented: &str) -> bool {
    let expected = expected.reveal().as_bytes();
    let presented = presented.as_bytes();
    if expected.is_empty() || expected.len() != presented.len() {
        return false;
    }
    expected.iter().zip(presented).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}
