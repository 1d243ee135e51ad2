//! Toolbar HTML rendering

pub mod injection;

use crate::application::MOUNT_PREFIX;
use crate::error::ToolbarResult;
use crate::middleware::ToolbarConfig;
use crate::panels::{PanelStats, html_escape};

/// Wrap a body fragment in the toolbar page chrome
pub(crate) fn page(title: &str, body: &str) -> String {
	format!(
		"<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
		<title>{}</title>\
		<link rel=\"stylesheet\" href=\"{MOUNT_PREFIX}/static/toolbar.css\">\
		</head><body class=\"dt-page\">{body}\
		<script src=\"{MOUNT_PREFIX}/static/toolbar.js\"></script>\
		</body></html>",
		html_escape(title),
	)
}

/// Render the floating overlay injected into host responses
pub fn render_toolbar(stats: &[PanelStats], config: &ToolbarConfig) -> ToolbarResult<String> {
	let mut panels = String::new();
	for stat in stats {
		let open = if config.active_panels.contains(&stat.panel_id) {
			" dt-open"
		} else {
			""
		};
		panels.push_str(&format!(
			"<div class=\"dt-panel{open}\" data-panel=\"{}\">\
			<div class=\"dt-panel-title\">{} <span class=\"dt-summary\">{}</span></div>{}</div>",
			html_escape(&stat.panel_id),
			html_escape(&stat.panel_name),
			html_escape(&stat.summary),
			stat.rendered_html.as_deref().unwrap_or(""),
		));
	}

	let button_style = if config.button_style.is_empty() {
		String::new()
	} else {
		format!(" style=\"{}\"", html_escape(&config.button_style))
	};

	Ok(format!(
		"<link rel=\"stylesheet\" href=\"{MOUNT_PREFIX}/static/toolbar.css\">\
		<div id=\"dt-toolbar\">\
		<a id=\"dt-button\" href=\"{MOUNT_PREFIX}/\"{button_style}>DT</a>\
		<div id=\"dt-panels\">{panels}</div></div>\
		<script src=\"{MOUNT_PREFIX}/static/toolbar.js\"></script>",
	))
}

/// Page shown instead of an intercepted redirect
pub fn render_redirect_page(location: &str, status: u16) -> String {
	page(
		"Redirect Intercepted",
		&format!(
			"<h2>Redirect ({status})</h2>\
			<p>The response redirects to \
			<a href=\"{0}\">{0}</a>.</p>",
			html_escape(location),
		),
	)
}
