//! Toolbar sub-application
//!
//! The toolbar UI is served by an independent axum application with its own
//! route table and static asset mount, constructed once at configuration
//! time and mounted by the host under [`MOUNT_PREFIX`].
//!
//! Construction is a two-phase commit: the fixed built-in route table is
//! committed first, then the extensions named in the `includes` setting run
//! in order. Extensions can register additional panels and may assume the
//! base routes already exist. The returned [`ToolbarApplication`] is frozen;
//! nothing mutates it after `build_application` returns.

pub mod views;

use axum::Router;
use axum::routing::get;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{ToolbarError, ToolbarResult};
use crate::history::RequestHistory;
use crate::middleware::ToolbarConfig;
use crate::panels::{Panel, PanelFactories, PanelLists};

/// Path prefix the host mounts the toolbar under
pub const MOUNT_PREFIX: &str = "/_debug_toolbar";

/// One entry of the fixed route table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDef {
	/// Route name
	pub name: &'static str,
	/// Path pattern, relative to the mount prefix
	pub path: &'static str,
}

const ROUTE_TABLE: [RouteDef; 10] = [
	RouteDef { name: "main", path: "/" },
	RouteDef { name: "sse", path: "/sse" },
	RouteDef { name: "source", path: "/source" },
	RouteDef { name: "execute", path: "/execute" },
	RouteDef { name: "console", path: "/console" },
	RouteDef { name: "redirect", path: "/redirect" },
	RouteDef { name: "exception", path: "/exception" },
	RouteDef {
		name: "sql_select",
		path: "/{request_id}/sql/select/{query_index}",
	},
	RouteDef {
		name: "sql_explain",
		path: "/{request_id}/sql/explain/{query_index}",
	},
	RouteDef { name: "request", path: "/{request_id}" },
];

/// The fixed route table of the toolbar sub-application
pub fn route_table() -> &'static [RouteDef] {
	&ROUTE_TABLE
}

/// Extension applied while building the sub-application
pub type IncludeFn = fn(&mut ToolbarBuilder) -> ToolbarResult<()>;

/// Explicit registry of named extensions, resolved from the `includes`
/// setting at build time
#[derive(Debug, Clone, Default)]
pub struct Includes {
	map: BTreeMap<String, IncludeFn>,
}

impl Includes {
	/// Empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Register an extension under a name
	pub fn insert(&mut self, name: impl Into<String>, include: IncludeFn) {
		self.map.insert(name.into(), include);
	}

	fn resolve(&self, name: &str) -> ToolbarResult<IncludeFn> {
		self.map.get(name).copied().ok_or_else(|| {
			ToolbarError::configuration(format!("unknown include {name:?}"))
		})
	}
}

/// Shared, frozen state behind the sub-application views and the
/// middleware
pub struct ToolbarState {
	/// Configuration snapshot
	pub config: Arc<ToolbarConfig>,
	/// Request history feeding the UI
	pub history: Arc<RequestHistory>,
	/// Instantiated per-request panels, registration order
	pub request_panels: Vec<Arc<dyn Panel>>,
	/// Instantiated global panels, registration order
	pub global_panels: Vec<Arc<dyn Panel>>,
}

impl std::fmt::Debug for ToolbarState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ToolbarState")
			.field("request_panels", &self.request_panels.len())
			.field("global_panels", &self.global_panels.len())
			.finish()
	}
}

/// Builder passed to include extensions during phase two
pub struct ToolbarBuilder {
	config: Arc<ToolbarConfig>,
	history: Arc<RequestHistory>,
	factories: PanelFactories,
	lists: PanelLists,
	routes: Vec<RouteDef>,
	committed: bool,
}

impl ToolbarBuilder {
	fn new(
		config: Arc<ToolbarConfig>,
		factories: PanelFactories,
		history: Arc<RequestHistory>,
	) -> Self {
		let lists = PanelLists::seeded(
			config.panels.clone(),
			config.extra_panels.clone(),
			config.global_panels.clone(),
			config.extra_global_panels.clone(),
		);
		Self {
			config,
			history,
			factories,
			lists,
			routes: ROUTE_TABLE.to_vec(),
			committed: false,
		}
	}

	/// Commit the built-in setup; the route table is frozen from here on
	fn commit(&mut self) {
		self.committed = true;
	}

	/// Register a panel identifier; available to include extensions
	pub fn add_panel(&mut self, id: &str, is_global: bool) -> ToolbarResult<()> {
		self.lists.register(&self.factories, id, is_global)
	}

	/// The committed route table
	pub fn routes(&self) -> &[RouteDef] {
		&self.routes
	}

	/// The configuration being built against
	pub fn config(&self) -> &ToolbarConfig {
		&self.config
	}

	fn finish(self) -> ToolbarResult<ToolbarApplication> {
		debug_assert!(self.committed, "finish before commit");

		let instantiate = |ids: Vec<&str>| -> ToolbarResult<Vec<Arc<dyn Panel>>> {
			ids.into_iter()
				.map(|id| self.factories.instantiate(id).map(Arc::from))
				.collect()
		};

		let request_panels = instantiate(self.lists.request_panel_ids().collect())?;
		let global_panels = instantiate(self.lists.global_panel_ids().collect())?;

		let state = Arc::new(ToolbarState {
			config: self.config,
			history: self.history,
			request_panels,
			global_panels,
		});
		let router = build_router(state.clone());

		Ok(ToolbarApplication {
			routes: self.routes,
			state,
			router,
		})
	}
}

/// The frozen toolbar sub-application
#[derive(Debug)]
pub struct ToolbarApplication {
	routes: Vec<RouteDef>,
	state: Arc<ToolbarState>,
	router: Router,
}

impl ToolbarApplication {
	/// The route table, in registration order
	pub fn routes(&self) -> &[RouteDef] {
		&self.routes
	}

	/// A handle to the frozen shared state
	pub fn state(&self) -> Arc<ToolbarState> {
		self.state.clone()
	}

	/// The router serving the toolbar UI; nest it under [`MOUNT_PREFIX`]
	pub fn router(&self) -> Router {
		self.router.clone()
	}
}

/// Build the toolbar sub-application
///
/// Built-in routes are committed before the extensions named in
/// `config.includes` run, in the order listed. Unknown include names and
/// unknown panel identifiers fail with a configuration error.
pub fn build_application(
	config: Arc<ToolbarConfig>,
	factories: PanelFactories,
	includes: &Includes,
	history: Arc<RequestHistory>,
) -> ToolbarResult<ToolbarApplication> {
	let mut builder = ToolbarBuilder::new(config.clone(), factories, history);
	builder.commit();

	for name in &config.includes {
		let include = includes.resolve(name)?;
		include(&mut builder)?;
	}

	builder.finish()
}

fn build_router(state: Arc<ToolbarState>) -> Router {
	let mut router = Router::new();
	for route in ROUTE_TABLE {
		router = match route.name {
			"main" => router.route(route.path, get(views::main_view)),
			"sse" => router.route(route.path, get(views::sse_view)),
			"source" => router.route(route.path, get(views::source_view)),
			"execute" => router.route(route.path, get(views::execute_view)),
			"console" => router.route(route.path, get(views::console_view)),
			"redirect" => router.route(route.path, get(views::redirect_view)),
			"exception" => router.route(route.path, get(views::exception_view)),
			"sql_select" => router.route(route.path, get(views::sql_select_view)),
			"sql_explain" => router.route(route.path, get(views::sql_explain_view)),
			"request" => router.route(route.path, get(views::request_view)),
			other => unreachable!("unrouted table entry {other}"),
		};
	}
	router
		.route("/static/toolbar.css", get(views::static_css))
		.route("/static/toolbar.js", get(views::static_js))
		.with_state(state)
}
