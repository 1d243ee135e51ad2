//! # Axum Debug Toolbar
//!
//! An in-process diagnostic overlay for axum applications, inspired by the
//! Pyramid and Django debug toolbars.
//!
//! The toolbar intercepts requests through a Tower middleware layer,
//! collects per-request data through pluggable panels (headers, logging,
//! performance, request vars, SQL, traceback, plus application-wide global
//! panels) and serves its own UI from an independent sub-application
//! mounted under `/_debug_toolbar`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use axum_debug_toolbar::DebugToolbar;
//! use axum::Router;
//! use std::collections::HashMap;
//!
//! let raw = HashMap::from([
//!     ("debugtoolbar.hosts".to_string(), "127.0.0.1 ::1".to_string()),
//! ]);
//! let toolbar = DebugToolbar::new(&raw)?;
//!
//! let app = Router::new()
//!     .route("/", get(handler))
//!     .nest(toolbar.mount_prefix(), toolbar.router())
//!     .layer(toolbar.layer());
//!
//! // after all other configuration:
//! toolbar.application_created();
//! ```
//!
//! ## Architecture
//!
//! 1. **Settings layer**: descriptor-driven parsing of raw key/value
//!    configuration, failing fast on malformed values
//! 2. **Panel layer**: explicit factory registry plus ordered,
//!    idempotent panel registration
//! 3. **Sub-application**: an independent router with a fixed route table,
//!    built-in routes committed before user extensions run
//! 4. **Middleware layer**: request/response interception, visibility
//!    checks and HTML injection
//!
//! Everything is configured once, synchronously, and frozen before the
//! host starts serving; request handling only reads shared state.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

// Module declarations following Rust 2024 module system (no mod.rs)
pub mod application;
pub mod context;
pub mod error;
pub mod history;
pub mod hooks;
pub mod middleware;
pub mod panels;
pub mod settings;
pub mod toolbar;
pub mod ui;
pub mod utils;

// Re-export main types
pub use application::{Includes, MOUNT_PREFIX, ToolbarApplication, build_application};
pub use context::{TOOLBAR_CONTEXT, ToolbarContext};
pub use error::{ToolbarError, ToolbarResult};
pub use history::RequestHistory;
pub use hooks::Hooks;
pub use middleware::{DebugToolbarLayer, DebugToolbarService, ToolbarConfig};
pub use panels::{Panel, PanelFactories, PanelLists, PanelStats};
pub use settings::{InterceptExc, SettingsMap, parse_settings, transform_settings};
pub use toolbar::DebugToolbar;
