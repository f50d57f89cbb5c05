//! Database library providing the MongoDB connector and shared utilities.
//!
//! # Examples
//!
//! ```ignore
//! use database::mongodb;
//!
//! let client = mongodb::connect("mongodb://localhost:27017").await?;
//! let db = client.database("portfolio");
//! let collection = db.collection::<Document>("interaction_events");
//! ```

pub mod common;
pub mod mongodb;

pub use common::RetryConfig;
