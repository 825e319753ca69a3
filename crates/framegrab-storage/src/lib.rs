//! Framegrab Storage Library
//!
//! This crate provides the content-store abstraction and its backends.
//!
//! # Key format
//!
//! Keys are namespaced by object kind: `videos/{unix_ms}-{name}` for source
//! videos, `frames/{unix_ms}-{frameFileName}` for extracted frames, and
//! `brand-images/{unix_ms}-{name}` for reference images. Keys must not
//! contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
pub mod local;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_store;
pub use framegrab_core::StorageBackend;
pub use local::LocalStore;
pub use s3::S3Store;
pub use traits::{ContentStore, StorageError, StorageResult};
