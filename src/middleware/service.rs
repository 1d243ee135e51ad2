//! Debug toolbar interception service ("tween")
//!
//! Wraps the host service, decides per request whether the toolbar is
//! shown, collects panel data around the inner call and injects the
//! overlay into HTML responses. Visibility checks never fail the request;
//! a failed check only suppresses the toolbar.

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{HeaderValue, Request, StatusCode, header};
use axum::response::Response;
use chrono::Utc;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::Service;

use crate::application::MOUNT_PREFIX;
use crate::context::{
	ExceptionInfo, RequestInfo, ResponseInfo, TOOLBAR_CONTEXT, ToolbarContext,
};
use crate::history::RequestHistory;
use crate::hooks::{Hooks, RenderContext};
use crate::middleware::ToolbarConfig;
use crate::panels::Panel;
use crate::settings::InterceptExc;
use crate::ui;
use crate::ui::injection::inject_toolbar;

/// Frozen state shared by every service instance of one toolbar
pub struct ToolbarShared {
	/// Configuration snapshot
	pub config: Arc<ToolbarConfig>,
	/// Per-request panels, registration order
	pub panels: Vec<Arc<dyn Panel>>,
	/// Request history the service writes finished contexts to
	pub history: Arc<RequestHistory>,
	/// Lifecycle hooks and the authorization override
	pub hooks: Arc<Hooks>,
}

/// The interception service produced by
/// [`DebugToolbarLayer`](crate::middleware::DebugToolbarLayer)
#[derive(Clone)]
pub struct DebugToolbarService<S> {
	pub(crate) inner: S,
	pub(crate) shared: Arc<ToolbarShared>,
}

/// Visibility state machine: host allow-list, then path exclusion, then
/// the authorization callback when one is registered. Short-circuits to
/// skip; never errors.
fn toolbar_visible(shared: &ToolbarShared, request: &RequestInfo) -> bool {
	if !shared.config.host_allowed(&request.client_ip) {
		return false;
	}
	if request.path.starts_with(MOUNT_PREFIX) || shared.config.path_excluded(&request.path) {
		return false;
	}
	if let Some(authorize) = shared.hooks.authorization() {
		if !authorize(request) {
			return false;
		}
	}
	true
}

fn request_info_from(req: &Request<Body>) -> RequestInfo {
	let client_ip = req
		.extensions()
		.get::<ConnectInfo<SocketAddr>>()
		.map(|info| info.0.ip().to_string())
		.or_else(|| {
			req.headers()
				.get("x-forwarded-for")
				.and_then(|v| v.to_str().ok())
				.and_then(|v| v.split(',').next())
				.map(|v| v.trim().to_string())
		})
		.unwrap_or_default();

	RequestInfo {
		method: req.method().to_string(),
		path: req.uri().path().to_string(),
		query: req.uri().query().map(str::to_string),
		headers: req
			.headers()
			.iter()
			.map(|(name, value)| {
				(
					name.as_str().to_string(),
					value.to_str().unwrap_or("<binary>").to_string(),
				)
			})
			.collect(),
		client_ip,
		timestamp: Utc::now(),
	}
}

fn response_info_from(response: &Response<Body>, duration: std::time::Duration) -> ResponseInfo {
	ResponseInfo {
		status: response.status().as_u16(),
		headers: response
			.headers()
			.iter()
			.map(|(name, value)| {
				(
					name.as_str().to_string(),
					value.to_str().unwrap_or("<binary>").to_string(),
				)
			})
			.collect(),
		content_type: response
			.headers()
			.get(header::CONTENT_TYPE)
			.and_then(|v| v.to_str().ok())
			.map(str::to_string),
		duration,
	}
}

fn html_response(status: StatusCode, body: String) -> Response<Body> {
	let mut response = Response::new(Body::from(body));
	*response.status_mut() = status;
	response.headers_mut().insert(
		header::CONTENT_TYPE,
		HeaderValue::from_static("text/html; charset=utf-8"),
	);
	response
}

impl<S> Service<Request<Body>> for DebugToolbarService<S>
where
	S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
	S::Error: Send,
	S::Future: Send,
{
	type Response = Response<Body>;
	type Error = S::Error;
	type Future =
		Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let shared = self.shared.clone();
		let clone = self.inner.clone();
		// take the service that was polled ready
		let mut inner = std::mem::replace(&mut self.inner, clone);

		Box::pin(async move {
			if !shared.config.enabled {
				return inner.call(req).await;
			}

			let request_info = request_info_from(&req);
			if !toolbar_visible(&shared, &request_info) {
				return inner.call(req).await;
			}

			let ctx = Arc::new(ToolbarContext::new(request_info, shared.config.clone()));

			for panel in &shared.panels {
				if let Err(err) = panel.enable_instrumentation().await {
					tracing::warn!(panel = panel.id(), error = %err, "enable_instrumentation failed");
				}
			}

			let start = Instant::now();
			let result = TOOLBAR_CONTEXT.scope(ctx.clone(), inner.call(req)).await;
			let elapsed = start.elapsed();

			for panel in &shared.panels {
				if let Err(err) = panel.disable_instrumentation().await {
					tracing::warn!(panel = panel.id(), error = %err, "disable_instrumentation failed");
				}
			}

			let mut response = result?;
			*ctx.response.lock().unwrap() = Some(response_info_from(&response, elapsed));

			// an error response with no recorded exception still gets a
			// traceback entry for the panel and the exception view
			if response.status().is_server_error()
				&& ctx.exception.lock().unwrap().is_none()
				&& shared.config.intercept_exc != InterceptExc::Disabled
			{
				ctx.record_exception(ExceptionInfo {
					kind: "HttpError".to_string(),
					message: response.status().to_string(),
					frames: vec![],
				});
			}

			let mut all_stats = Vec::new();
			for panel in &shared.panels {
				match panel.generate_stats(&ctx).await {
					Ok(mut stats) => {
						match panel.render(&stats) {
							Ok(html) => stats.rendered_html = Some(html),
							Err(err) => {
								tracing::warn!(panel = panel.id(), error = %err, "panel render failed");
							}
						}
						all_stats.push(stats);
					}
					Err(err) => {
						tracing::warn!(panel = panel.id(), error = %err, "panel stats skipped");
					}
				}
			}
			*ctx.stats.lock().unwrap() = all_stats.clone();
			shared.history.put(ctx.clone());

			if shared.config.intercept_redirects
				&& response.status().is_redirection()
			{
				let location = response
					.headers()
					.get(header::LOCATION)
					.and_then(|v| v.to_str().ok())
					.map(str::to_string);
				if let Some(location) = location {
					tracing::debug!(%location, "redirect intercepted");
					response = html_response(
						StatusCode::OK,
						ui::render_redirect_page(&location, response.status().as_u16()),
					);
				}
			}

			if response.status().is_server_error()
				&& shared.config.intercept_exc == InterceptExc::Debug
			{
				let url = format!("{MOUNT_PREFIX}/exception?request_id={}", ctx.id);
				if let Ok(value) = HeaderValue::from_str(&url) {
					response
						.headers_mut()
						.insert("x-debugtoolbar-exception", value);
				}
			}

			let mut render_ctx = RenderContext::new();
			render_ctx.insert("request_id", serde_json::json!(ctx.id));
			shared.hooks.fire_before_render(&mut render_ctx);

			let skip_injection = response.status().is_server_error()
				&& shared.config.intercept_exc == InterceptExc::Disabled;
			if !skip_injection {
				response = match inject_toolbar(response, &all_stats, &shared.config).await {
					Ok(response) => response,
					Err(err) => {
						tracing::warn!(error = %err, "toolbar injection failed");
						html_response(
							StatusCode::INTERNAL_SERVER_ERROR,
							ui::render_redirect_page(&format!("{MOUNT_PREFIX}/"), 500),
						)
					}
				};
			}

			Ok(response)
		})
	}
}
