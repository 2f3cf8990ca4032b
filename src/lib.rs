//! Speaker enrollment and recognition.
//!
//! `voiceprint` enrolls voice profiles from short recordings and identifies
//! the speaker of a new recording by comparing its acoustic signature
//! against the enrolled set.
//!
//! # Architecture
//!
//! ```text
//! Microphone ──▶ audio (Recorder) ──▶ features (mean MFCC)
//!                                         │
//!                       enroll ───────────┼─────────── detect
//!                          │              │               │
//!                          ▼              │               ▼
//!                  profile (store) ───────┴──▶ classifier (MLP)
//!                          │                          │
//!                    profiles.json               model.json
//! ```
//!
//! The [`pipeline::Orchestrator`] drives both paths and reports through a
//! [`pipeline::Presenter`]. Everything runs single-threaded: capture blocks
//! for the requested duration, and store + model are fully persisted before
//! an operation returns.

pub mod audio;
pub mod classifier;
pub mod config;
pub mod features;
pub mod persist;
pub mod pipeline;
pub mod profile;
