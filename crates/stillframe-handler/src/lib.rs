//! The thumbnail request handler: one request in, one response envelope out.

pub mod handler;
pub mod response;

pub use handler::ThumbnailHandler;
pub use response::HandlerResponse;
