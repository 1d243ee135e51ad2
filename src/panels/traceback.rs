//! Traceback panel

use async_trait::async_trait;

use crate::context::ToolbarContext;
use crate::error::ToolbarResult;
use crate::panels::{Panel, PanelStats, html_escape};

/// Displays the exception captured during the request, if any
pub struct TracebackPanel;

impl TracebackPanel {
	/// Create the panel
	pub fn new() -> Self {
		Self
	}
}

impl Default for TracebackPanel {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Panel for TracebackPanel {
	fn id(&self) -> &'static str {
		"traceback"
	}

	fn name(&self) -> &'static str {
		"Traceback"
	}

	fn priority(&self) -> i32 {
		70
	}

	async fn generate_stats(&self, ctx: &ToolbarContext) -> ToolbarResult<PanelStats> {
		let exception = ctx.exception.lock().unwrap();

		let (data, summary) = match exception.as_ref() {
			Some(exc) => (
				serde_json::json!({
					"kind": exc.kind,
					"message": exc.message,
					"frames": exc.frames,
				}),
				format!("{}: {}", exc.kind, exc.message),
			),
			None => (serde_json::json!({ "kind": null }), "no exception".to_string()),
		};

		Ok(PanelStats {
			panel_id: self.id().to_string(),
			panel_name: self.name().to_string(),
			data,
			summary,
			rendered_html: None,
		})
	}

	fn render(&self, stats: &PanelStats) -> ToolbarResult<String> {
		if stats.data["kind"].is_null() {
			return Ok(
				"<div class=\"dt-panel-content\"><p>No exception recorded.</p></div>".to_string(),
			);
		}

		let empty = vec![];
		let frames: String = stats.data["frames"]
			.as_array()
			.unwrap_or(&empty)
			.iter()
			.map(|f| {
				format!(
					"<li><code>{}:{}</code> in <strong>{}</strong>{}</li>",
					html_escape(f["file"].as_str().unwrap_or("")),
					f["line"].as_u64().unwrap_or(0),
					html_escape(f["function"].as_str().unwrap_or("")),
					f["source"]
						.as_str()
						.map(|s| format!("<pre>{}</pre>", html_escape(s)))
						.unwrap_or_default(),
				)
			})
			.collect();

		Ok(format!(
			"<div class=\"dt-panel-content\"><h3>{}</h3><p>{}</p><ol class=\"dt-frames\">{frames}</ol></div>",
			html_escape(stats.data["kind"].as_str().unwrap_or("")),
			html_escape(stats.data["message"].as_str().unwrap_or("")),
		))
	}
}
