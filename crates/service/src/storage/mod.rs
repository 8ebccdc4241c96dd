//! Storage backends for the service layer.
//!
//! Only an in-memory repository exists; quotes live for the lifetime of the
//! process.

pub mod memory_quote_store;
