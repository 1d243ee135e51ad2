//! Panel factory registry and panel identifier lists
//!
//! Dynamic dotted-path lookup is replaced by an explicit registry:
//! identifiers are resolved against [`PanelFactories`] at configuration
//! time, and an unknown identifier is a fatal configuration error.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{ToolbarError, ToolbarResult};
use crate::panels::Panel;

/// Factory producing one panel instance
pub type PanelFactory = Arc<dyn Fn() -> Box<dyn Panel> + Send + Sync>;

/// Explicit mapping from panel identifier to factory
///
/// Populated with the built-in panels at construction; user factories may
/// be inserted before settings are parsed. Frozen together with the rest
/// of the configuration once the sub-application is built.
#[derive(Clone, Default)]
pub struct PanelFactories {
	factories: BTreeMap<String, PanelFactory>,
}

impl PanelFactories {
	/// Empty registry, for tests and fully custom setups
	pub fn empty() -> Self {
		Self::default()
	}

	/// Registry pre-populated with every built-in panel
	pub fn with_builtins() -> Self {
		use crate::panels::{
			headers::HeadersPanel, logging::LoggingPanel, performance::PerformancePanel,
			request_vars::RequestVarsPanel, routes::RoutesPanel, settings::SettingsPanel,
			sql::SqlPanel, traceback::TracebackPanel, versions::VersionsPanel,
		};

		let mut registry = Self::empty();
		registry.insert("headers", || Box::new(HeadersPanel::new()));
		registry.insert("logging", || Box::new(LoggingPanel::new()));
		registry.insert("performance", || Box::new(PerformancePanel::new()));
		registry.insert("request_vars", || Box::new(RequestVarsPanel::new()));
		registry.insert("sql", || Box::new(SqlPanel::new()));
		registry.insert("traceback", || Box::new(TracebackPanel::new()));
		registry.insert("routes", || Box::new(RoutesPanel::new()));
		registry.insert("settings", || Box::new(SettingsPanel::new()));
		registry.insert("versions", || Box::new(VersionsPanel::new()));
		registry
	}

	/// Register a factory under an identifier, replacing any previous one
	pub fn insert<F>(&mut self, id: impl Into<String>, factory: F)
	where
		F: Fn() -> Box<dyn Panel> + Send + Sync + 'static,
	{
		self.factories.insert(id.into(), Arc::new(factory));
	}

	/// Whether an identifier is registered
	pub fn contains(&self, id: &str) -> bool {
		self.factories.contains_key(id)
	}

	/// Resolve an identifier to its factory
	pub fn resolve(&self, id: &str) -> ToolbarResult<PanelFactory> {
		self.factories.get(id).cloned().ok_or_else(|| {
			ToolbarError::configuration(format!("unknown panel identifier {id:?}"))
		})
	}

	/// Instantiate the panel registered under an identifier
	pub fn instantiate(&self, id: &str) -> ToolbarResult<Box<dyn Panel>> {
		Ok(self.resolve(id)?())
	}
}

impl std::fmt::Debug for PanelFactories {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PanelFactories")
			.field("ids", &self.factories.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// Ordered panel identifier lists, two scopes with a base and an extra
/// list each
///
/// Grows only during configuration; the sub-application builder freezes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelLists {
	panels: Vec<String>,
	extra_panels: Vec<String>,
	global_panels: Vec<String>,
	extra_global_panels: Vec<String>,
}

impl PanelLists {
	/// Empty lists
	pub fn new() -> Self {
		Self::default()
	}

	/// Seed the lists from already-parsed settings values
	pub fn seeded(
		panels: Vec<String>,
		extra_panels: Vec<String>,
		global_panels: Vec<String>,
		extra_global_panels: Vec<String>,
	) -> Self {
		Self {
			panels,
			extra_panels,
			global_panels,
			extra_global_panels,
		}
	}

	/// Register a panel identifier in the given scope
	///
	/// Appends to the base list of the scope unless the identifier is
	/// already present in the base or extra list; duplicate registration
	/// is silently absorbed and the first registration keeps its position.
	/// The identifier must resolve in `factories`.
	pub fn register(
		&mut self,
		factories: &PanelFactories,
		id: &str,
		is_global: bool,
	) -> ToolbarResult<()> {
		// interface contract verified at registration, not at render
		factories.resolve(id)?;

		let (base, extra) = if is_global {
			(&mut self.global_panels, &self.extra_global_panels)
		} else {
			(&mut self.panels, &self.extra_panels)
		};

		if !base.iter().any(|p| p == id) && !extra.iter().any(|p| p == id) {
			base.push(id.to_string());
		}
		Ok(())
	}

	/// Per-request identifiers, base list then extras, in insertion order
	pub fn request_panel_ids(&self) -> impl Iterator<Item = &str> {
		self.panels
			.iter()
			.chain(&self.extra_panels)
			.map(String::as_str)
	}

	/// Global identifiers, base list then extras, in insertion order
	pub fn global_panel_ids(&self) -> impl Iterator<Item = &str> {
		self.global_panels
			.iter()
			.chain(&self.extra_global_panels)
			.map(String::as_str)
	}
}
