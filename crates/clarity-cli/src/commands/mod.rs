//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared setup (config, model loading, engine construction)
//! - `classify` - Single and batch categorization
//! - `analyze` - Financial-health report
//! - `model` - Model and rule introspection
//! - `serve` - Web server command

pub mod analyze;
pub mod classify;
pub mod core;
pub mod model;
pub mod serve;

// Re-export command functions for main.rs
pub use analyze::*;
pub use classify::*;
pub use core::*;
pub use model::*;
pub use serve::*;
