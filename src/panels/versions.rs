//! Version panel (global)

use async_trait::async_trait;

use crate::context::ToolbarContext;
use crate::error::ToolbarResult;
use crate::panels::{Panel, PanelStats, html_escape};

/// Displays the toolbar crate version and build metadata
pub struct VersionsPanel;

impl VersionsPanel {
	/// Create the panel
	pub fn new() -> Self {
		Self
	}
}

impl Default for VersionsPanel {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Panel for VersionsPanel {
	fn id(&self) -> &'static str {
		"versions"
	}

	fn name(&self) -> &'static str {
		"Versions"
	}

	fn is_global(&self) -> bool {
		true
	}

	async fn generate_stats(&self, _ctx: &ToolbarContext) -> ToolbarResult<PanelStats> {
		let data = serde_json::json!({
			"packages": [
				{ "name": env!("CARGO_PKG_NAME"), "version": env!("CARGO_PKG_VERSION") },
			],
		});

		Ok(PanelStats {
			panel_id: self.id().to_string(),
			panel_name: self.name().to_string(),
			summary: env!("CARGO_PKG_VERSION").to_string(),
			data,
			rendered_html: None,
		})
	}

	fn render(&self, stats: &PanelStats) -> ToolbarResult<String> {
		let empty = vec![];
		let rows: String = stats.data["packages"]
			.as_array()
			.unwrap_or(&empty)
			.iter()
			.map(|p| {
				format!(
					"<tr><td>{}</td><td>{}</td></tr>",
					html_escape(p["name"].as_str().unwrap_or("")),
					html_escape(p["version"].as_str().unwrap_or(""))
				)
			})
			.collect();

		Ok(format!(
			"<div class=\"dt-panel-content\"><h3>Versions</h3>\
			<table class=\"dt-table\"><tbody>{rows}</tbody></table></div>"
		))
	}
}
