//! Integration hooks
//!
//! Startup is an explicit two-phase sequence. Phase 1 is configuration:
//! components register before-render subscribers on [`Hooks`]. Phase 2 is
//! [`Hooks::application_created`], fired exactly once after configuration
//! completes; it attaches the toolbar's own render hook after every
//! subscriber present at fire time, so the toolbar observes the effects of
//! all of them.
//!
//! [`Hooks`] also carries the per-request authorization override: a
//! predicate consulted by the middleware after the host allow-list and
//! path exclusion checks.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::context::RequestInfo;
use crate::history::RequestHistory;
use crate::middleware::ToolbarConfig;

/// Predicate deciding toolbar visibility for one request
pub type AuthorizationCallback = Arc<dyn Fn(&RequestInfo) -> bool + Send + Sync>;

/// A before-render subscriber
pub type BeforeRenderFn = Arc<dyn Fn(&mut RenderContext) + Send + Sync>;

/// Mutable value bag passed through the before-render subscriber chain
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
	values: BTreeMap<String, serde_json::Value>,
}

impl RenderContext {
	/// Empty render context
	pub fn new() -> Self {
		Self::default()
	}

	/// Set a value
	pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
		self.values.insert(key.into(), value);
	}

	/// Read a value
	pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
		self.values.get(key)
	}

	/// Keys in insertion-independent (sorted) order
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.values.keys().map(String::as_str)
	}
}

/// Lifecycle hooks and the authorization override
pub struct Hooks {
	config: Arc<ToolbarConfig>,
	history: Arc<RequestHistory>,
	before_render: RwLock<Vec<BeforeRenderFn>>,
	toolbar_attached: AtomicBool,
	authorization: RwLock<Option<AuthorizationCallback>>,
}

impl Hooks {
	/// Create the hook set for one toolbar instance
	pub fn new(config: Arc<ToolbarConfig>, history: Arc<RequestHistory>) -> Self {
		Self {
			config,
			history,
			before_render: RwLock::new(Vec::new()),
			toolbar_attached: AtomicBool::new(false),
			authorization: RwLock::new(None),
		}
	}

	/// Register a before-render subscriber (phase 1)
	pub fn add_before_render(&self, subscriber: BeforeRenderFn) {
		self.before_render.write().unwrap().push(subscriber);
	}

	/// Signal the end of configuration (phase 2)
	///
	/// Attaches the toolbar's render hook after every subscriber present
	/// at this point. Firing more than once attaches it once.
	pub fn application_created(&self) {
		if self.toolbar_attached.swap(true, Ordering::SeqCst) {
			return;
		}
		let config = self.config.clone();
		let history = self.history.clone();
		self.before_render
			.write()
			.unwrap()
			.push(Arc::new(move |ctx: &mut RenderContext| {
				let requests: Vec<serde_json::Value> = history
					.latest(config.max_visible_requests)
					.iter()
					.map(|entry| {
						serde_json::json!({
							"id": entry.id,
							"method": entry.request.method,
							"path": entry.request.path,
						})
					})
					.collect();
				ctx.insert(
					"debug_toolbar",
					serde_json::json!({
						"mount": crate::application::MOUNT_PREFIX,
						"requests": requests,
					}),
				);
			}));
	}

	/// Run the subscriber chain in registration order
	pub fn fire_before_render(&self, ctx: &mut RenderContext) {
		for subscriber in self.before_render.read().unwrap().iter() {
			subscriber(ctx);
		}
	}

	/// Register the per-request authorization predicate, replacing any
	/// earlier one
	pub fn set_request_authorization(&self, callback: AuthorizationCallback) {
		*self.authorization.write().unwrap() = Some(callback);
	}

	/// The registered authorization predicate, if any
	pub fn authorization(&self) -> Option<AuthorizationCallback> {
		self.authorization.read().unwrap().clone()
	}
}

impl std::fmt::Debug for Hooks {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Hooks")
			.field("subscribers", &self.before_render.read().unwrap().len())
			.field(
				"toolbar_attached",
				&self.toolbar_attached.load(Ordering::SeqCst),
			)
			.field("authorization", &self.authorization.read().unwrap().is_some())
			.finish()
	}
}
