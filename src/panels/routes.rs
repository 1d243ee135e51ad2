//! Route table panel (global)

use async_trait::async_trait;

use crate::application::{MOUNT_PREFIX, route_table};
use crate::context::ToolbarContext;
use crate::error::ToolbarResult;
use crate::panels::{Panel, PanelStats, html_escape};

/// Displays the toolbar's own route table and mount point
pub struct RoutesPanel;

impl RoutesPanel {
	/// Create the panel
	pub fn new() -> Self {
		Self
	}
}

impl Default for RoutesPanel {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Panel for RoutesPanel {
	fn id(&self) -> &'static str {
		"routes"
	}

	fn name(&self) -> &'static str {
		"Routes"
	}

	fn is_global(&self) -> bool {
		true
	}

	async fn generate_stats(&self, _ctx: &ToolbarContext) -> ToolbarResult<PanelStats> {
		let routes: Vec<serde_json::Value> = route_table()
			.iter()
			.map(|r| serde_json::json!({ "name": r.name, "path": r.path }))
			.collect();

		Ok(PanelStats {
			panel_id: self.id().to_string(),
			panel_name: self.name().to_string(),
			summary: format!("{} routes under {MOUNT_PREFIX}", routes.len()),
			data: serde_json::json!({ "mount": MOUNT_PREFIX, "routes": routes }),
			rendered_html: None,
		})
	}

	fn render(&self, stats: &PanelStats) -> ToolbarResult<String> {
		let empty = vec![];
		let rows: String = stats.data["routes"]
			.as_array()
			.unwrap_or(&empty)
			.iter()
			.map(|r| {
				format!(
					"<tr><td>{}</td><td><code>{}</code></td></tr>",
					html_escape(r["name"].as_str().unwrap_or("")),
					html_escape(r["path"].as_str().unwrap_or(""))
				)
			})
			.collect();

		Ok(format!(
			"<div class=\"dt-panel-content\"><h3>Routes</h3>\
			<table class=\"dt-table\"><thead><tr><th>Name</th><th>Path</th></tr></thead>\
			<tbody>{rows}</tbody></table></div>"
		))
	}
}
