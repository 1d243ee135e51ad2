//! Middleware components
//!
//! Tower layer and service wiring the toolbar into the host's request
//! pipeline. Install the layer so it wraps the host's error handling and
//! any transaction middleware: it has to observe both normal and
//! exception-path responses, after transaction boundaries are settled.

pub mod config;
pub mod layer;
pub mod service;

pub use config::ToolbarConfig;
pub use layer::DebugToolbarLayer;
pub use service::{DebugToolbarService, ToolbarShared};
