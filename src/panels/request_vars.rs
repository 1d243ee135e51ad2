//! Request variables panel

use async_trait::async_trait;

use crate::context::ToolbarContext;
use crate::error::ToolbarResult;
use crate::panels::{Panel, PanelStats, html_escape};

/// Displays method, path, query parameters and client address of the
/// intercepted request
pub struct RequestVarsPanel;

impl RequestVarsPanel {
	/// Create the panel
	pub fn new() -> Self {
		Self
	}
}

impl Default for RequestVarsPanel {
	fn default() -> Self {
		Self::new()
	}
}

fn parse_query(query: &str) -> Vec<(String, String)> {
	query
		.split('&')
		.filter(|pair| !pair.is_empty())
		.map(|pair| match pair.split_once('=') {
			Some((k, v)) => (k.to_string(), v.to_string()),
			None => (pair.to_string(), String::new()),
		})
		.collect()
}

#[async_trait]
impl Panel for RequestVarsPanel {
	fn id(&self) -> &'static str {
		"request_vars"
	}

	fn name(&self) -> &'static str {
		"Request Vars"
	}

	fn priority(&self) -> i32 {
		90
	}

	async fn generate_stats(&self, ctx: &ToolbarContext) -> ToolbarResult<PanelStats> {
		let query_params = ctx
			.request
			.query
			.as_deref()
			.map(parse_query)
			.unwrap_or_default();

		let data = serde_json::json!({
			"method": ctx.request.method,
			"path": ctx.request.path,
			"client_ip": ctx.request.client_ip,
			"query_params": query_params,
		});
		let summary = format!("{} {}", ctx.request.method, ctx.request.path);

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
		let params: String = stats.data["query_params"]
			.as_array()
			.unwrap_or(&empty)
			.iter()
			.map(|p| {
				format!(
					"<tr><td>{}</td><td>{}</td></tr>",
					html_escape(p[0].as_str().unwrap_or("")),
					html_escape(p[1].as_str().unwrap_or(""))
				)
			})
			.collect();

		Ok(format!(
			"<div class=\"dt-panel-content\"><h3>Request Vars</h3>\
			<p><strong>{} {}</strong> from {}</p>\
			<table class=\"dt-table\"><tbody>{params}</tbody></table></div>",
			html_escape(stats.data["method"].as_str().unwrap_or("")),
			html_escape(stats.data["path"].as_str().unwrap_or("")),
			html_escape(stats.data["client_ip"].as_str().unwrap_or("")),
		))
	}
}
