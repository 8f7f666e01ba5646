//! Data Transfer Objects for the gateway envelope.

pub mod request;
pub mod response;

pub use request::parse_event;
pub use response::Envelope;
