//! Core types shared across the stillframe crates: configuration, error
//! kinds, and the request/result models of the thumbnail pipeline.

pub mod config;
pub mod error;
pub mod request;

pub use config::{Config, ExecutionContext};
pub use error::ThumbnailError;
pub use request::{thumbnail_key, ThumbnailRequest};
