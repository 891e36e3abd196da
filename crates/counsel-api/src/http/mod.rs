//! HTTP/REST API layer for Counsel.
//!
//! Axum-based JSON API with client-address ownership scoping, plain response
//! shapes, and CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
