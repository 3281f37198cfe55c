// src/core/mod.rs
//! Network-facing services: the shared HTTP client and the CV loader

pub mod cv_loader;
pub mod service_client;

pub use cv_loader::{CvLoader, CvSource, FileCvSource, HttpCvSource, LoadOutcome};
pub use service_client::ServiceClient;
