//! # Storefront server
//! This crate hosts the HTTP server of the storefront. It is responsible for:
//! * Receiving checkout completion webhooks from the payment gateway, verifying their signatures, and handing them to
//!   the fulfillment engine, which creates the orders.
//! * Building the metadata that the front end attaches to a hosted payment session.
//! * Serving the seller's order panel.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `GET /health`: A health check route that returns a 200 OK response.
//! * `POST /webhook/checkout`: The payment gateway webhook. Requires a valid `Gateway-Signature` header.
//! * `POST /api/checkout/metadata`: Builds checkout session metadata from a cart.
//! * `GET /api/seller/orders`: Lists all orders. Requires the `X-Seller-Key` header.
//! * `POST /api/seller/orders/{id}/status`: Changes the status of an order. Requires the `X-Seller-Key` header.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod webhook_routes;

#[cfg(test)]
mod endpoint_tests;
