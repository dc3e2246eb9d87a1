//! Common types module for the pedidos order tracker.
//!
//! This module defines the core data types and structures used throughout
//! the order tracking system. It provides a centralized location for shared
//! types to ensure consistency across all components.

/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// Order types including line items, drafts, and the status pipeline.
pub mod order;
/// Derived statistics types for reporting.
pub mod stats;
/// Storage types for managing persistent data.
pub mod storage;

// Re-export all types for convenient access
pub use api::*;
pub use order::*;
pub use stats::*;
pub use storage::*;
