//! HTTP request handlers

pub mod analyze;
pub mod classify;
pub mod health;

pub use analyze::*;
pub use classify::*;
pub use health::*;
