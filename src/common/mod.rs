//! Common types and utilities shared across leafchain.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants and [`TreeConfig`]
//! - Error types
//! - Identifiers (NodeId, RowId)

pub mod config;
pub mod error;
mod node_id;
mod row_id;

pub use config::TreeConfig;
pub use error::{Error, Result};
pub use node_id::NodeId;
pub use row_id::RowId;
