//! Toolbar setup entry point
//!
//! [`DebugToolbar::new`] is the one-call activation path: parse raw
//! settings, transform the host-facing subset, build the sub-application
//! and wire the hooks. Everything it returns is frozen; the host mounts
//! the router, installs the layer, and fires
//! [`application_created`](DebugToolbar::application_created) once its own
//! configuration is complete.

use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::{Includes, MOUNT_PREFIX, ToolbarApplication, build_application};
use crate::error::ToolbarResult;
use crate::history::RequestHistory;
use crate::hooks::{AuthorizationCallback, Hooks};
use crate::middleware::{DebugToolbarLayer, ToolbarConfig, ToolbarShared};
use crate::panels::PanelFactories;
use crate::settings::{SettingsMap, parse_settings, transform_settings};

/// A fully configured debug toolbar
pub struct DebugToolbar {
	config: Arc<ToolbarConfig>,
	application: ToolbarApplication,
	hooks: Arc<Hooks>,
	history: Arc<RequestHistory>,
	host_settings: SettingsMap,
}

impl DebugToolbar {
	/// Configure the toolbar from raw settings with the built-in panels
	/// and no include extensions
	pub fn new(raw: &HashMap<String, String>) -> ToolbarResult<Self> {
		Self::with_registries(raw, PanelFactories::with_builtins(), &Includes::new())
	}

	/// Configure the toolbar with custom panel factories and include
	/// extensions
	///
	/// Parsing fails fast on malformed values and identifiers that do not
	/// resolve in `factories`; include names are resolved against
	/// `includes` while the sub-application is built.
	pub fn with_registries(
		raw: &HashMap<String, String>,
		factories: PanelFactories,
		includes: &Includes,
	) -> ToolbarResult<Self> {
		let parsed = parse_settings(raw, &factories)?;
		let host_settings = transform_settings(&parsed);
		let config = Arc::new(ToolbarConfig::from_settings(&parsed)?);

		let history = Arc::new(RequestHistory::new(config.max_request_history));
		let application =
			build_application(config.clone(), factories, includes, history.clone())?;
		let hooks = Arc::new(Hooks::new(config.clone(), history.clone()));

		Ok(Self {
			config,
			application,
			hooks,
			history,
			host_settings,
		})
	}

	/// The frozen configuration
	pub fn config(&self) -> &ToolbarConfig {
		&self.config
	}

	/// The toolbar sub-application
	pub fn application(&self) -> &ToolbarApplication {
		&self.application
	}

	/// Router serving the toolbar UI; nest it under
	/// [`mount_prefix`](Self::mount_prefix)
	pub fn router(&self) -> Router {
		self.application.router()
	}

	/// The path prefix the router expects to be mounted under
	pub fn mount_prefix(&self) -> &'static str {
		MOUNT_PREFIX
	}

	/// The interception layer for the host's middleware stack
	pub fn layer(&self) -> DebugToolbarLayer {
		let state = self.application.state();
		DebugToolbarLayer::new(Arc::new(ToolbarShared {
			config: self.config.clone(),
			panels: state.request_panels.clone(),
			history: self.history.clone(),
			hooks: self.hooks.clone(),
		}))
	}

	/// Lifecycle hooks, for registering before-render subscribers
	pub fn hooks(&self) -> Arc<Hooks> {
		self.hooks.clone()
	}

	/// The request history shared with the middleware
	pub fn history(&self) -> Arc<RequestHistory> {
		self.history.clone()
	}

	/// Toolbar settings re-mapped onto the host namespace, for the host
	/// to merge into its own configuration
	pub fn host_settings(&self) -> &SettingsMap {
		&self.host_settings
	}

	/// Register the per-request authorization predicate
	pub fn set_request_authorization(&self, callback: AuthorizationCallback) {
		self.hooks.set_request_authorization(callback);
	}

	/// Signal that the host finished configuring (phase 2); attaches the
	/// toolbar's render hook after all registered subscribers
	pub fn application_created(&self) {
		self.hooks.application_created();
	}
}
