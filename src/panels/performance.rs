//! Performance timing panel

use async_trait::async_trait;
use std::time::Duration;

use crate::context::ToolbarContext;
use crate::error::ToolbarResult;
use crate::panels::{Panel, PanelStats, html_escape};

/// Displays total request duration and recorded timing markers
pub struct PerformancePanel;

impl PerformancePanel {
	/// Create the panel
	pub fn new() -> Self {
		Self
	}
}

impl Default for PerformancePanel {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Panel for PerformancePanel {
	fn id(&self) -> &'static str {
		"performance"
	}

	fn name(&self) -> &'static str {
		"Performance"
	}

	fn priority(&self) -> i32 {
		95
	}

	async fn generate_stats(&self, ctx: &ToolbarContext) -> ToolbarResult<PanelStats> {
		let total = ctx
			.response
			.lock()
			.unwrap()
			.as_ref()
			.map(|r| r.duration)
			.unwrap_or(Duration::ZERO);
		let markers = ctx.markers.lock().unwrap();

		let data = serde_json::json!({
			"total_ms": total.as_millis() as u64,
			"markers": *markers,
		});
		let summary = format!("{}ms", total.as_millis());

		Ok(PanelStats {
			panel_id: self.id().to_string(),
			panel_name: self.name().to_string(),
			data,
			summary,
			rendered_html: None,
		})
	}

	fn render(&self, stats: &PanelStats) -> ToolbarResult<String> {
		let empty = vec![];
		let rows: String = stats.data["markers"]
			.as_array()
			.unwrap_or(&empty)
			.iter()
			.map(|m| {
				let duration = m["duration"]["secs"].as_u64().unwrap_or(0) * 1000
					+ m["duration"]["nanos"].as_u64().unwrap_or(0) / 1_000_000;
				format!(
					"<tr><td>{}</td><td>{}ms</td></tr>",
					html_escape(m["name"].as_str().unwrap_or("")),
					duration
				)
			})
			.collect();

		Ok(format!(
			"<div class=\"dt-panel-content\"><h3>Performance</h3>\
			<p><strong>Total:</strong> {}ms</p>\
			<table class=\"dt-table\"><tbody>{rows}</tbody></table></div>",
			stats.data["total_ms"].as_u64().unwrap_or(0)
		))
	}
}
