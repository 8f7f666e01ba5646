//! HTTP surface for driveboard.
//!
//! Accepts gateway-style invocation events over HTTP and answers with the
//! gateway envelope (`statusCode`, `body`, `data`, `headers`).

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
