//! Two-phase startup and before-render subscriber ordering

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Html;
use axum::routing::get;
use axum_debug_toolbar::DebugToolbar;
use axum_debug_toolbar::hooks::RenderContext;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

async fn page_handler() -> Html<&'static str> {
	Html("<html><body>app</body></html>")
}

fn toolbar() -> DebugToolbar {
	DebugToolbar::new(&HashMap::new()).unwrap()
}

#[test]
fn test_subscribers_run_before_the_toolbar_hook() {
	let toolbar = toolbar();
	let seen: Arc<Mutex<Vec<(&'static str, bool)>>> = Arc::new(Mutex::new(Vec::new()));

	for name in ["metrics", "theme"] {
		let seen = seen.clone();
		toolbar.hooks().add_before_render(Arc::new(move |ctx| {
			seen.lock()
				.unwrap()
				.push((name, ctx.get("debug_toolbar").is_some()));
		}));
	}

	toolbar.application_created();

	let mut ctx = RenderContext::new();
	toolbar.hooks().fire_before_render(&mut ctx);

	// registration order, and none of them saw the toolbar data yet
	assert_eq!(
		*seen.lock().unwrap(),
		vec![("metrics", false), ("theme", false)]
	);
	assert!(ctx.get("debug_toolbar").is_some());
}

#[test]
fn test_application_created_is_idempotent() {
	let toolbar = toolbar();
	toolbar.application_created();
	toolbar.application_created();

	let mut ctx = RenderContext::new();
	toolbar.hooks().fire_before_render(&mut ctx);

	let keys: Vec<_> = ctx.keys().collect();
	assert_eq!(keys, vec!["debug_toolbar"]);
}

#[test]
fn test_toolbar_data_carries_recent_requests() {
	let toolbar = toolbar();
	toolbar.application_created();

	let mut ctx = RenderContext::new();
	toolbar.hooks().fire_before_render(&mut ctx);

	let data = ctx.get("debug_toolbar").unwrap();
	assert_eq!(data["mount"], "/_debug_toolbar");
	assert_eq!(data["requests"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_middleware_fires_subscribers_with_the_request_id() {
	let toolbar = toolbar();
	let observed: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

	{
		let observed = observed.clone();
		toolbar.hooks().add_before_render(Arc::new(move |ctx| {
			if let Some(id) = ctx.get("request_id").and_then(|v| v.as_str()) {
				observed.lock().unwrap().push(id.to_string());
			}
		}));
	}
	toolbar.application_created();

	let app = Router::new()
		.route("/", get(page_handler))
		.layer(toolbar.layer());
	app.oneshot(
		Request::builder()
			.uri("/")
			.header("x-forwarded-for", "127.0.0.1")
			.body(Body::empty())
			.unwrap(),
	)
	.await
	.unwrap();

	let observed = observed.lock().unwrap();
	assert_eq!(observed.len(), 1);
	// the id the subscriber saw is the one stored in the history
	let entry = toolbar.history().latest(1).pop().unwrap();
	assert_eq!(observed[0], entry.id);
}
