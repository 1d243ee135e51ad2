//! Typed toolbar configuration
//!
//! The descriptor-driven [`SettingsMap`] is converted into this struct once
//! at configuration time; everything at serve time reads the frozen struct.

use serde::Serialize;
use std::net::IpAddr;

use crate::error::{ToolbarError, ToolbarResult};
use crate::settings::{InterceptExc, SettingsMap};

/// Frozen toolbar configuration
#[derive(Debug, Clone, Serialize)]
pub struct ToolbarConfig {
	/// Master switch; when off the layer passes requests through untouched
	pub enabled: bool,
	/// How error responses are treated
	pub intercept_exc: InterceptExc,
	/// Whether 3xx responses are replaced with an interception page
	pub intercept_redirects: bool,
	/// Per-request panel identifiers
	pub panels: Vec<String>,
	/// User-appended per-request panel identifiers
	pub extra_panels: Vec<String>,
	/// Global panel identifiers
	pub global_panels: Vec<String>,
	/// User-appended global panel identifiers
	pub extra_global_panels: Vec<String>,
	/// Client addresses the toolbar is shown to
	pub hosts: Vec<IpAddr>,
	/// Path prefixes the toolbar never activates on
	pub exclude_prefixes: Vec<String>,
	/// Panels expanded by default in the UI
	pub active_panels: Vec<String>,
	/// Extension names applied while building the sub-application
	pub includes: Vec<String>,
	/// Extra inline CSS for the toolbar button
	pub button_style: String,
	/// Request history capacity
	pub max_request_history: usize,
	/// Requests shown in the toolbar UI
	pub max_visible_requests: usize,
}

impl ToolbarConfig {
	/// Build the typed configuration from parsed settings
	pub fn from_settings(parsed: &SettingsMap) -> ToolbarResult<Self> {
		let list = |name: &str| -> Vec<String> {
			parsed.list_setting(name).unwrap_or_default().to_vec()
		};

		let mut hosts = Vec::new();
		for host in list("hosts") {
			let ip: IpAddr = host.parse().map_err(|_| {
				ToolbarError::configuration(format!("invalid host address {host:?}"))
			})?;
			hosts.push(ip);
		}

		Ok(Self {
			enabled: parsed.bool_setting("enabled").unwrap_or(true),
			intercept_exc: parsed
				.intercept_setting("intercept_exc")
				.unwrap_or(InterceptExc::Debug),
			intercept_redirects: parsed.bool_setting("intercept_redirects").unwrap_or(false),
			panels: list("panels"),
			extra_panels: list("extra_panels"),
			global_panels: list("global_panels"),
			extra_global_panels: list("extra_global_panels"),
			hosts,
			exclude_prefixes: list("exclude_prefixes"),
			active_panels: list("active_panels"),
			includes: list("includes"),
			button_style: parsed.str_setting("button_style").unwrap_or("").to_string(),
			max_request_history: parsed.int_setting("max_request_history").unwrap_or(100),
			max_visible_requests: parsed.int_setting("max_visible_requests").unwrap_or(10),
		})
	}

	/// Whether a client address passes the host allow-list
	pub fn host_allowed(&self, client_ip: &str) -> bool {
		match client_ip.parse::<IpAddr>() {
			Ok(ip) => self.hosts.contains(&ip),
			Err(_) => false,
		}
	}

	/// Whether a path matches the exclusion prefix list
	pub fn path_excluded(&self, path: &str) -> bool {
		self.exclude_prefixes
			.iter()
			.any(|prefix| path.starts_with(prefix.as_str()))
	}
}

impl Default for ToolbarConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			intercept_exc: InterceptExc::Debug,
			intercept_redirects: false,
			panels: crate::settings::DEFAULT_PANELS
				.split_whitespace()
				.map(str::to_string)
				.collect(),
			extra_panels: vec![],
			global_panels: crate::settings::DEFAULT_GLOBAL_PANELS
				.split_whitespace()
				.map(str::to_string)
				.collect(),
			extra_global_panels: vec![],
			hosts: vec!["127.0.0.1".parse().unwrap(), "::1".parse().unwrap()],
			exclude_prefixes: vec![],
			active_panels: vec![],
			includes: vec![],
			button_style: String::new(),
			max_request_history: 100,
			max_visible_requests: 10,
		}
	}
}
