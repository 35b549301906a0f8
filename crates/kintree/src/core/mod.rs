//! Core types shared across the layout pipeline
//!
//! This module defines the link/line data model, the layout configuration,
//! error types, and the logging facility.

mod error;
pub mod logging;
mod types;

pub use error::*;
pub use logging::*;
pub use types::*;
