//! Log record panel

use async_trait::async_trait;

use crate::context::ToolbarContext;
use crate::error::ToolbarResult;
use crate::panels::{Panel, PanelStats, html_escape};

/// Displays log lines recorded during the request via
/// [`ToolbarContext::record_log`]
pub struct LoggingPanel;

impl LoggingPanel {
	/// Create the panel
	pub fn new() -> Self {
		Self
	}
}

impl Default for LoggingPanel {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Panel for LoggingPanel {
	fn id(&self) -> &'static str {
		"logging"
	}

	fn name(&self) -> &'static str {
		"Logging"
	}

	fn priority(&self) -> i32 {
		80
	}

	async fn generate_stats(&self, ctx: &ToolbarContext) -> ToolbarResult<PanelStats> {
		let records = ctx.log_records.lock().unwrap();
		let data = serde_json::json!({
			"count": records.len(),
			"records": *records,
		});
		let summary = format!("{} records", records.len());

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
		let rows: String = stats.data["records"]
			.as_array()
			.unwrap_or(&empty)
			.iter()
			.map(|r| {
				format!(
					"<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
					html_escape(r["level"].as_str().unwrap_or("")),
					html_escape(r["target"].as_str().unwrap_or("")),
					html_escape(r["message"].as_str().unwrap_or(""))
				)
			})
			.collect();

		Ok(format!(
			"<div class=\"dt-panel-content\"><h3>Log Records</h3>\
			<table class=\"dt-table\"><thead><tr><th>Level</th><th>Target</th><th>Message</th></tr></thead>\
			<tbody>{rows}</tbody></table></div>"
		))
	}
}
