//! Object storage backends for stillframe.
//!
//! The pipeline talks to storage through the [`ObjectStore`] trait: one
//! streaming read of the source video, one write of the finished thumbnail.
//! [`S3ObjectStore`] is the production backend; [`MemoryObjectStore`] backs
//! the tests.

mod memory;
mod s3;
mod traits;

pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;
pub use traits::{ObjectStore, ObjectStream, StorageError, StorageResult};
