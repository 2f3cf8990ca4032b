//! Multi-class speaker classifier.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │              ClassifierManager                  │
//! │                                                │
//! │   retrain(profiles) ──▶ MlpModel::fit          │
//! │        │                    │                  │
//! │        └── persist ◀────────┘                  │
//! │                                                │
//! │   predict(vector) ──▶ model.predict → name     │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! The model is always refitted from the full profile set; see
//! [`mlp`] for why incremental updates are off the table.

pub mod manager;
pub mod mlp;

pub use manager::{ClassifierError, ClassifierManager};
pub use mlp::MlpModel;
