//! Data model for the status documents.
//!
//! Both documents are produced by the external server checker and are only
//! read here.

mod models;

pub use models::*;
