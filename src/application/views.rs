//! View handlers behind the fixed route table
//!
//! Handlers read only frozen state and the request history. Unknown request
//! ids answer 404; the console endpoints are available only when
//! `intercept_exc` is `debug`.

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Json, Response};
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::{MOUNT_PREFIX, ToolbarState, route_table};
use crate::context::{RequestInfo, ToolbarContext};
use crate::panels::html_escape;
use crate::settings::InterceptExc;
use crate::ui;

fn synthetic_context(state: &ToolbarState) -> ToolbarContext {
	ToolbarContext::new(
		RequestInfo {
			method: "GET".to_string(),
			path: MOUNT_PREFIX.to_string(),
			query: None,
			headers: vec![],
			client_ip: String::new(),
			timestamp: chrono::Utc::now(),
		},
		state.config.clone(),
	)
}

/// Toolbar landing page: recent requests plus the global panels
pub async fn main_view(State(state): State<Arc<ToolbarState>>) -> Html<String> {
	let mut body = String::from("<h2>Requests</h2><ul class=\"dt-requests\">");
	for entry in state.history.latest(state.config.max_visible_requests) {
		body.push_str(&format!(
			"<li><a href=\"{MOUNT_PREFIX}/{}\">{} {}</a></li>",
			entry.id,
			html_escape(&entry.request.method),
			html_escape(&entry.request.path),
		));
	}
	body.push_str("</ul>");

	let ctx = synthetic_context(&state);
	for panel in &state.global_panels {
		match panel.generate_stats(&ctx).await.and_then(|stats| {
			panel.render(&stats).map(|html| (stats.panel_name, html))
		}) {
			Ok((name, html)) => {
				body.push_str(&format!("<section><h2>{}</h2>{html}</section>", html_escape(&name)));
			}
			Err(err) => {
				tracing::warn!(panel = panel.id(), error = %err, "global panel skipped");
			}
		}
	}

	Html(ui::page("Debug Toolbar", &body))
}

/// Server-sent-events stream of the request history
pub async fn sse_view(State(state): State<Arc<ToolbarState>>) -> Response {
	let requests: Vec<serde_json::Value> = state
		.history
		.latest(state.config.max_visible_requests)
		.iter()
		.map(|entry| {
			serde_json::json!({
				"id": entry.id,
				"method": entry.request.method,
				"path": entry.request.path,
			})
		})
		.collect();
	let payload = serde_json::json!({ "requests": requests });

	(
		[(header::CONTENT_TYPE, "text/event-stream")],
		format!("event: history\ndata: {payload}\n\n"),
	)
		.into_response()
}

/// Source excerpt of the traceback frames of a recorded request
pub async fn source_view(
	State(state): State<Arc<ToolbarState>>,
	Query(params): Query<HashMap<String, String>>,
) -> Response {
	let Some(request_id) = params.get("request_id") else {
		return (StatusCode::BAD_REQUEST, "request_id is required").into_response();
	};
	let Some(ctx) = state.history.get(request_id) else {
		return StatusCode::NOT_FOUND.into_response();
	};

	let frames = ctx
		.exception
		.lock()
		.unwrap()
		.as_ref()
		.map(|exc| exc.frames.clone())
		.unwrap_or_default();
	Json(serde_json::json!({ "request_id": ctx.id, "frames": frames })).into_response()
}

/// Evaluate a console command; gated on `intercept_exc = debug`
pub async fn execute_view(
	State(state): State<Arc<ToolbarState>>,
	Query(params): Query<HashMap<String, String>>,
) -> Response {
	if state.config.intercept_exc != InterceptExc::Debug {
		return StatusCode::FORBIDDEN.into_response();
	}

	let cmd = params.get("cmd").map(String::as_str).unwrap_or("");
	let result = match cmd {
		"history" => serde_json::json!(
			state
				.history
				.latest(state.config.max_visible_requests)
				.iter()
				.map(|entry| entry.id.clone())
				.collect::<Vec<_>>()
		),
		"routes" => serde_json::json!(
			route_table()
				.iter()
				.map(|r| format!("{} {}", r.name, r.path))
				.collect::<Vec<_>>()
		),
		"settings" => serde_json::to_value(state.config.as_ref())
			.unwrap_or(serde_json::Value::Null),
		other => {
			return Json(serde_json::json!({
				"error": format!("unknown command {other:?}"),
			}))
			.into_response();
		}
	};

	Json(serde_json::json!({ "cmd": cmd, "result": result })).into_response()
}

/// Interactive console page; gated on `intercept_exc = debug`
pub async fn console_view(State(state): State<Arc<ToolbarState>>) -> Response {
	if state.config.intercept_exc != InterceptExc::Debug {
		return StatusCode::FORBIDDEN.into_response();
	}

	let body = format!(
		"<h2>Console</h2>\
		<form action=\"{MOUNT_PREFIX}/execute\" method=\"get\">\
		<input type=\"text\" name=\"cmd\" placeholder=\"history | routes | settings\">\
		<button type=\"submit\">Run</button></form>"
	);
	Html(ui::page("Console", &body)).into_response()
}

/// Interception page shown instead of a redirect response
pub async fn redirect_view(Query(params): Query<HashMap<String, String>>) -> Response {
	let Some(location) = params.get("redirect_to") else {
		return (StatusCode::BAD_REQUEST, "redirect_to is required").into_response();
	};
	let status = params
		.get("status")
		.and_then(|s| s.parse::<u16>().ok())
		.unwrap_or(302);
	Html(ui::render_redirect_page(location, status)).into_response()
}

/// Traceback detail for a recorded request
pub async fn exception_view(
	State(state): State<Arc<ToolbarState>>,
	Query(params): Query<HashMap<String, String>>,
) -> Response {
	let Some(request_id) = params.get("request_id") else {
		return (StatusCode::BAD_REQUEST, "request_id is required").into_response();
	};
	let Some(ctx) = state.history.get(request_id) else {
		return StatusCode::NOT_FOUND.into_response();
	};
	let exception = ctx.exception.lock().unwrap().clone();
	let Some(exception) = exception else {
		return StatusCode::NOT_FOUND.into_response();
	};

	let mut body = format!(
		"<h2>{}</h2><p>{}</p><ol class=\"dt-frames\">",
		html_escape(&exception.kind),
		html_escape(&exception.message),
	);
	for frame in &exception.frames {
		body.push_str(&format!(
			"<li><code>{}:{}</code> in <strong>{}</strong></li>",
			html_escape(&frame.file),
			frame.line,
			html_escape(&frame.function),
		));
	}
	body.push_str("</ol>");
	Html(ui::page("Exception", &body)).into_response()
}

fn stored_query(
	state: &ToolbarState,
	request_id: &str,
	query_index: usize,
) -> Result<(Arc<ToolbarContext>, crate::context::SqlQuery), StatusCode> {
	let ctx = state.history.get(request_id).ok_or(StatusCode::NOT_FOUND)?;
	let query = ctx
		.sql_queries
		.lock()
		.unwrap()
		.get(query_index)
		.cloned()
		.ok_or(StatusCode::NOT_FOUND)?;
	Ok((ctx, query))
}

/// Recorded SQL statement by request id and query index
pub async fn sql_select_view(
	State(state): State<Arc<ToolbarState>>,
	Path((request_id, query_index)): Path<(String, usize)>,
) -> Response {
	match stored_query(&state, &request_id, query_index) {
		Ok((ctx, query)) => Json(serde_json::json!({
			"request_id": ctx.id,
			"query_index": query_index,
			"sql": query.sql,
			"params": query.params,
			"duration_ms": query.duration.as_millis() as u64,
		}))
		.into_response(),
		Err(status) => status.into_response(),
	}
}

/// EXPLAIN form of a recorded SQL statement
pub async fn sql_explain_view(
	State(state): State<Arc<ToolbarState>>,
	Path((request_id, query_index)): Path<(String, usize)>,
) -> Response {
	match stored_query(&state, &request_id, query_index) {
		Ok((ctx, query)) => Json(serde_json::json!({
			"request_id": ctx.id,
			"query_index": query_index,
			"statement": format!("EXPLAIN {}", query.sql),
			"params": query.params,
		}))
		.into_response(),
		Err(status) => status.into_response(),
	}
}

/// Full panel report for a recorded request
pub async fn request_view(
	State(state): State<Arc<ToolbarState>>,
	Path(request_id): Path<String>,
) -> Response {
	let Some(ctx) = state.history.get(&request_id) else {
		return StatusCode::NOT_FOUND.into_response();
	};

	let mut body = format!(
		"<h2>{} {}</h2>",
		html_escape(&ctx.request.method),
		html_escape(&ctx.request.path),
	);
	for stats in ctx.stats.lock().unwrap().iter() {
		body.push_str(&format!(
			"<section><h3>{} <small>{}</small></h3>{}</section>",
			html_escape(&stats.panel_name),
			html_escape(&stats.summary),
			stats.rendered_html.as_deref().unwrap_or(""),
		));
	}
	Html(ui::page("Request Detail", &body)).into_response()
}

/// Toolbar stylesheet
pub async fn static_css() -> Response {
	(
		[(header::CONTENT_TYPE, "text/css")],
		include_str!("../../static/toolbar.css"),
	)
		.into_response()
}

/// Toolbar script
pub async fn static_js() -> Response {
	(
		[(header::CONTENT_TYPE, "application/javascript")],
		include_str!("../../static/toolbar.js"),
	)
		.into_response()
}
