//! Panel contract and built-in panels
//!
//! A panel is a pluggable collector contributing one section of the
//! diagnostic overlay. Per-request panels derive their stats from the
//! [`ToolbarContext`](crate::context::ToolbarContext) of one request;
//! global panels describe application-wide state and ignore the request.
//!
//! Factories are looked up by identifier in an explicit
//! [`PanelFactories`](registry::PanelFactories) registry, so a registered
//! identifier is known to produce a [`Panel`] implementation at
//! configuration time rather than at render time.

pub mod headers;
pub mod logging;
pub mod performance;
pub mod registry;
pub mod request_vars;
pub mod routes;
pub mod settings;
pub mod sql;
pub mod traceback;
pub mod versions;

use async_trait::async_trait;

use crate::context::ToolbarContext;
use crate::error::ToolbarResult;

pub use registry::{PanelFactories, PanelLists};

/// Stats generated by one panel for one request
#[derive(Debug, Clone, serde::Serialize)]
pub struct PanelStats {
	/// Identifier of the generating panel
	pub panel_id: String,
	/// Display name of the generating panel
	pub panel_name: String,
	/// Structured data payload
	pub data: serde_json::Value,
	/// One-line summary shown in the toolbar button
	pub summary: String,
	/// Pre-rendered HTML, filled lazily by the UI layer
	pub rendered_html: Option<String>,
}

/// Contract every toolbar panel satisfies
#[async_trait]
pub trait Panel: Send + Sync {
	/// Stable identifier, used in settings and URLs
	fn id(&self) -> &'static str;

	/// Human-readable title
	fn name(&self) -> &'static str;

	/// Ordering weight, higher renders first
	fn priority(&self) -> i32 {
		0
	}

	/// Whether this panel describes application-wide rather than
	/// per-request state
	fn is_global(&self) -> bool {
		false
	}

	/// Hook run before the inner service handles the request
	async fn enable_instrumentation(&self) -> ToolbarResult<()> {
		Ok(())
	}

	/// Hook run after the inner service produced its response
	async fn disable_instrumentation(&self) -> ToolbarResult<()> {
		Ok(())
	}

	/// Derive stats from the collected context
	async fn generate_stats(&self, ctx: &ToolbarContext) -> ToolbarResult<PanelStats>;

	/// Render the stats payload as an HTML fragment
	fn render(&self, stats: &PanelStats) -> ToolbarResult<String>;
}

/// Escape text for embedding into panel HTML
pub(crate) fn html_escape(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}
