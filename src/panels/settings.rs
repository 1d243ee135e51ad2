//! Settings panel (global)

use async_trait::async_trait;

use crate::context::ToolbarContext;
use crate::error::ToolbarResult;
use crate::panels::{Panel, PanelStats, html_escape};

/// Displays the configuration snapshot the toolbar was built with
pub struct SettingsPanel;

impl SettingsPanel {
	/// Create the panel
	pub fn new() -> Self {
		Self
	}
}

impl Default for SettingsPanel {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Panel for SettingsPanel {
	fn id(&self) -> &'static str {
		"settings"
	}

	fn name(&self) -> &'static str {
		"Settings"
	}

	fn is_global(&self) -> bool {
		true
	}

	async fn generate_stats(&self, ctx: &ToolbarContext) -> ToolbarResult<PanelStats> {
		let data = serde_json::to_value(ctx.config.as_ref())
			.map_err(|e| crate::error::ToolbarError::Render(e.to_string()))?;

		Ok(PanelStats {
			panel_id: self.id().to_string(),
			panel_name: self.name().to_string(),
			summary: "toolbar configuration".to_string(),
			data,
			rendered_html: None,
		})
	}

	fn render(&self, stats: &PanelStats) -> ToolbarResult<String> {
		let rows: String = stats
			.data
			.as_object()
			.map(|map| {
				map.iter()
					.map(|(key, value)| {
						format!(
							"<tr><td>{}</td><td><code>{}</code></td></tr>",
							html_escape(key),
							html_escape(&value.to_string())
						)
					})
					.collect()
			})
			.unwrap_or_default();

		Ok(format!(
			"<div class=\"dt-panel-content\"><h3>Settings</h3>\
			<table class=\"dt-table\"><tbody>{rows}</tbody></table></div>"
		))
	}
}
