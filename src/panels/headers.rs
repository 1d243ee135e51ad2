//! Request/response header panel

use async_trait::async_trait;

use crate::context::ToolbarContext;
use crate::error::ToolbarResult;
use crate::panels::{Panel, PanelStats, html_escape};

/// Displays the headers of the intercepted request and its response
pub struct HeadersPanel;

impl HeadersPanel {
	/// Create the panel
	pub fn new() -> Self {
		Self
	}
}

impl Default for HeadersPanel {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Panel for HeadersPanel {
	fn id(&self) -> &'static str {
		"headers"
	}

	fn name(&self) -> &'static str {
		"Headers"
	}

	fn priority(&self) -> i32 {
		100
	}

	async fn generate_stats(&self, ctx: &ToolbarContext) -> ToolbarResult<PanelStats> {
		let response_headers = ctx
			.response
			.lock()
			.unwrap()
			.as_ref()
			.map(|r| r.headers.clone())
			.unwrap_or_default();

		let data = serde_json::json!({
			"request_headers": ctx.request.headers,
			"response_headers": response_headers,
		});
		let summary = format!(
			"{} request / {} response",
			ctx.request.headers.len(),
			response_headers.len()
		);

		Ok(PanelStats {
			panel_id: self.id().to_string(),
			panel_name: self.name().to_string(),
			data,
			summary,
			rendered_html: None,
		})
	}

	fn render(&self, stats: &PanelStats) -> ToolbarResult<String> {
		let section = |title: &str, key: &str| {
			let empty = vec![];
			let rows: String = stats.data[key]
				.as_array()
				.unwrap_or(&empty)
				.iter()
				.map(|pair| {
					format!(
						"<tr><td>{}</td><td>{}</td></tr>",
						html_escape(pair[0].as_str().unwrap_or("")),
						html_escape(pair[1].as_str().unwrap_or(""))
					)
				})
				.collect();
			format!(
				"<h3>{title}</h3><table class=\"dt-table\"><tbody>{rows}</tbody></table>"
			)
		};

		Ok(format!(
			"<div class=\"dt-panel-content\">{}{}</div>",
			section("Request Headers", "request_headers"),
			section("Response Headers", "response_headers"),
		))
	}
}
