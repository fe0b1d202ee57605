//! JSON-over-HTTP helper shared by the release lookups.

mod client;
mod error;

pub use client::HttpClient;
pub use error::{FetchError, classify_error};
