//! API Module
//!
//! HTTP handlers and routing for the gateway.
//!
//! # Endpoints
//! - `GET /equipment` - List equipment (cached upstream lookup)
//! - `GET /equipment/:id` - Fetch one listing (cached upstream lookup)
//! - `POST /events` - Queue an analytics event
//! - `DELETE /cache` - Drop every cached response
//! - `GET /stats` - Cache statistics and analytics backlog
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
