pub mod client;
pub mod error;
pub mod query;

pub use client::SupabaseClient;
pub use error::BackendError;
pub use query::{Clause, Query};

use serde_json::Value;

/// Anything that can answer a row query against the record view.
pub trait RowSource: Send + Sync {
    fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError>;
}
