//! HTML injection into host responses

use axum::body::Body;
use axum::response::Response;
use http_body_util::BodyExt;

use crate::error::{ToolbarError, ToolbarResult};
use crate::middleware::ToolbarConfig;
use crate::panels::PanelStats;
use crate::ui::render_toolbar;

/// Inject the toolbar overlay into a `text/html` response
///
/// Non-HTML responses pass through untouched. The overlay is inserted
/// before the final `</body>` tag, or appended when the body has none.
pub async fn inject_toolbar(
	response: Response<Body>,
	panel_stats: &[PanelStats],
	config: &ToolbarConfig,
) -> ToolbarResult<Response<Body>> {
	let content_type = response
		.headers()
		.get(http::header::CONTENT_TYPE)
		.and_then(|v| v.to_str().ok())
		.unwrap_or("");
	if !content_type.contains("text/html") {
		return Ok(response);
	}

	let (mut parts, body) = response.into_parts();
	let body_bytes = body
		.collect()
		.await
		.map_err(|e| ToolbarError::Http(e.to_string()))?
		.to_bytes();
	let html = String::from_utf8_lossy(&body_bytes);

	let toolbar_html = render_toolbar(panel_stats, config)?;
	let injected = match html.rfind("</body>") {
		Some(pos) => format!("{}{}{}", &html[..pos], toolbar_html, &html[pos..]),
		None => format!("{html}{toolbar_html}"),
	};

	// the old length no longer holds
	parts.headers.remove(http::header::CONTENT_LENGTH);
	Ok(Response::from_parts(parts, Body::from(injected)))
}
