//! Sub-application routing

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_debug_toolbar::DebugToolbar;
use axum_debug_toolbar::context::{ExceptionFrame, ExceptionInfo, RequestInfo, ToolbarContext};
use chrono::Utc;
use http_body_util::BodyExt;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use crate::common::builders::{LogRecordBuilder, SqlQueryBuilder};

fn toolbar() -> DebugToolbar {
	DebugToolbar::new(&HashMap::new()).unwrap()
}

fn toolbar_with(entries: &[(&str, &str)]) -> DebugToolbar {
	let raw = entries
		.iter()
		.map(|(k, v)| (k.to_string(), v.to_string()))
		.collect();
	DebugToolbar::new(&raw).unwrap()
}

/// Store a finished context with one SQL query and return its id
fn seed_request(toolbar: &DebugToolbar, path: &str) -> String {
	let ctx = Arc::new(ToolbarContext::new(
		RequestInfo {
			method: "GET".to_string(),
			path: path.to_string(),
			query: None,
			headers: vec![],
			client_ip: "127.0.0.1".to_string(),
			timestamp: Utc::now(),
		},
		Arc::new(toolbar.config().clone()),
	));
	ctx.record_sql(
		SqlQueryBuilder::new()
			.sql("SELECT * FROM users WHERE id = ?")
			.params(vec!["1".to_string()])
			.duration(Duration::from_millis(4))
			.build(),
	);
	ctx.record_log(
		LogRecordBuilder::new()
			.level("INFO")
			.target("app::orders")
			.message("order listed")
			.build(),
	);
	let id = ctx.id.clone();
	toolbar.history().put(ctx);
	id
}

async fn get(toolbar: &DebugToolbar, uri: &str) -> (StatusCode, String) {
	let response = toolbar
		.router()
		.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
		.await
		.unwrap();
	let status = response.status();
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	(status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_main_view_lists_recorded_requests() {
	let toolbar = toolbar();
	let id = seed_request(&toolbar, "/orders");

	let (status, body) = get(&toolbar, "/").await;
	assert_eq!(status, StatusCode::OK);
	assert!(body.contains(&id));
	assert!(body.contains("/orders"));
	// global panels render on the landing page
	assert!(body.contains("Routes"));
	assert!(body.contains("Versions"));
}

#[tokio::test]
async fn test_sse_view_streams_history() {
	let toolbar = toolbar();
	let id = seed_request(&toolbar, "/orders");

	let response = toolbar
		.router()
		.oneshot(Request::builder().uri("/sse").body(Body::empty()).unwrap())
		.await
		.unwrap();
	assert_eq!(
		response.headers().get(header::CONTENT_TYPE).unwrap(),
		"text/event-stream"
	);
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	let body = String::from_utf8(bytes.to_vec()).unwrap();
	assert!(body.starts_with("event: history\n"));
	assert!(body.contains(&id));
}

#[tokio::test]
async fn test_source_view_parameter_handling() {
	let toolbar = toolbar();

	let (status, _) = get(&toolbar, "/source").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, _) = get(&toolbar, "/source?request_id=nope").await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let id = seed_request(&toolbar, "/orders");
	let (status, body) = get(&toolbar, &format!("/source?request_id={id}")).await;
	assert_eq!(status, StatusCode::OK);
	assert!(body.contains(&id));
}

#[tokio::test]
async fn test_sql_select_returns_stored_query() {
	let toolbar = toolbar();
	let id = seed_request(&toolbar, "/orders");

	let (status, body) = get(&toolbar, &format!("/{id}/sql/select/0")).await;
	assert_eq!(status, StatusCode::OK);
	let payload: serde_json::Value = serde_json::from_str(&body).unwrap();
	assert_eq!(payload["sql"], "SELECT * FROM users WHERE id = ?");
	assert_eq!(payload["query_index"], 0);
}

#[tokio::test]
async fn test_sql_explain_prefixes_statement() {
	let toolbar = toolbar();
	let id = seed_request(&toolbar, "/orders");

	let (status, body) = get(&toolbar, &format!("/{id}/sql/explain/0")).await;
	assert_eq!(status, StatusCode::OK);
	let payload: serde_json::Value = serde_json::from_str(&body).unwrap();
	assert_eq!(
		payload["statement"],
		"EXPLAIN SELECT * FROM users WHERE id = ?"
	);
}

#[tokio::test]
async fn test_sql_views_reject_bad_coordinates() {
	let toolbar = toolbar();
	let id = seed_request(&toolbar, "/orders");

	// unknown request
	let (status, _) = get(&toolbar, "/nope/sql/select/0").await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	// index past the recorded queries
	let (status, _) = get(&toolbar, &format!("/{id}/sql/select/5")).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	// non-numeric index is rejected by path extraction
	let (status, _) = get(&toolbar, &format!("/{id}/sql/select/first")).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_console_endpoints_gated_on_debug_mode() {
	let debug = toolbar();
	let (status, _) = get(&debug, "/console").await;
	assert_eq!(status, StatusCode::OK);

	let (status, body) = get(&debug, "/execute?cmd=routes").await;
	assert_eq!(status, StatusCode::OK);
	let payload: serde_json::Value = serde_json::from_str(&body).unwrap();
	assert_eq!(payload["result"].as_array().unwrap().len(), 10);

	let plain = toolbar_with(&[("debugtoolbar.intercept_exc", "true")]);
	let (status, _) = get(&plain, "/console").await;
	assert_eq!(status, StatusCode::FORBIDDEN);
	let (status, _) = get(&plain, "/execute?cmd=routes").await;
	assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_execute_rejects_unknown_commands() {
	let toolbar = toolbar();
	let (status, body) = get(&toolbar, "/execute?cmd=drop_tables").await;
	assert_eq!(status, StatusCode::OK);
	let payload: serde_json::Value = serde_json::from_str(&body).unwrap();
	assert!(payload["error"].as_str().unwrap().contains("drop_tables"));
}

#[tokio::test]
async fn test_redirect_view_requires_target() {
	let toolbar = toolbar();

	let (status, _) = get(&toolbar, "/redirect").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, body) = get(&toolbar, "/redirect?redirect_to=/login&status=303").await;
	assert_eq!(status, StatusCode::OK);
	assert!(body.contains("/login"));
	assert!(body.contains("303"));
}

#[tokio::test]
async fn test_exception_view_requires_recorded_exception() {
	let toolbar = toolbar();
	let id = seed_request(&toolbar, "/orders");

	// stored request without an exception
	let (status, _) = get(&toolbar, &format!("/exception?request_id={id}")).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	toolbar.history().get(&id).unwrap().record_exception(ExceptionInfo {
		kind: "ValueError".to_string(),
		message: "bad input".to_string(),
		frames: vec![ExceptionFrame {
			file: "src/handlers.rs".to_string(),
			line: 42,
			function: "create_order".to_string(),
			source: None,
		}],
	});

	let (status, body) = get(&toolbar, &format!("/exception?request_id={id}")).await;
	assert_eq!(status, StatusCode::OK);
	assert!(body.contains("ValueError"));
	assert!(body.contains("src/handlers.rs"));
}

#[tokio::test]
async fn test_request_view_renders_stored_stats() {
	let toolbar = toolbar();
	let id = seed_request(&toolbar, "/orders");

	let (status, _) = get(&toolbar, "/missing-id").await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, body) = get(&toolbar, &format!("/{id}")).await;
	assert_eq!(status, StatusCode::OK);
	assert!(body.contains("/orders"));
}

#[tokio::test]
async fn test_static_assets_are_served() {
	let toolbar = toolbar();

	let response = toolbar
		.router()
		.oneshot(
			Request::builder()
				.uri("/static/toolbar.css")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(
		response.headers().get(header::CONTENT_TYPE).unwrap(),
		"text/css"
	);

	let (status, body) = get(&toolbar, "/static/toolbar.js").await;
	assert_eq!(status, StatusCode::OK);
	assert!(body.contains("dt-"));
}
