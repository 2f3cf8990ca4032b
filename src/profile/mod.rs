//! Profile storage — named feature vectors with persist-on-write.

pub mod store;

pub use store::{ProfileStore, StoreError};
