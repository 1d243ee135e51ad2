//! Settings parsing and transformation
//!
//! Raw configuration is a flat mapping of namespaced string keys to string
//! values. A fixed descriptor table drives conversion: every descriptor
//! names a setting, an optional converter and a default. Parsing walks the
//! table and produces a [`SettingsMap`] of typed values; malformed values
//! abort configuration with [`ToolbarError::Configuration`], never deferred
//! to request time.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::error::{ToolbarError, ToolbarResult};
use crate::panels::registry::PanelFactories;

/// Namespace prefix for all toolbar settings
pub const SETTINGS_PREFIX: &str = "debugtoolbar.";

/// Namespace prefix the transformer re-maps settings onto
pub const HOST_PREFIX: &str = "reinhardt.";

/// How the toolbar treats error responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InterceptExc {
	/// Full interactive exception detail
	Debug,
	/// Plain exception notice only
	Enabled,
	/// Leave error responses untouched
	Disabled,
}

/// A typed setting value produced by a converter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SettingValue {
	/// Boolean flag
	Bool(bool),
	/// Non-negative integer
	Int(usize),
	/// Unconverted string
	Str(String),
	/// Ordered list of tokens
	List(Vec<String>),
	/// Tri-state exception interception mode
	Intercept(InterceptExc),
}

/// Conversion applied to a raw setting value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
	/// Truthy/falsy token
	Bool,
	/// Decimal integer
	Int,
	/// Whitespace/comma separated list
	List,
	/// Newline separated list, entries trimmed, empties dropped
	LineList,
	/// Like `List`, but every token must name a registered panel factory
	GlobalsList,
	/// `"debug"` sentinel or a boolean token
	DisplayDebugOrFalse,
}

impl Converter {
	fn apply(self, raw: &str, factories: &PanelFactories) -> ToolbarResult<SettingValue> {
		match self {
			Converter::Bool => as_bool(raw).map(SettingValue::Bool),
			Converter::Int => as_int(raw).map(SettingValue::Int),
			Converter::List => Ok(SettingValue::List(as_list(raw))),
			Converter::LineList => Ok(SettingValue::List(as_line_list(raw))),
			Converter::GlobalsList => {
				let names = as_list(raw);
				for name in &names {
					// fail fast on unresolvable factory names
					factories.resolve(name)?;
				}
				Ok(SettingValue::List(names))
			}
			Converter::DisplayDebugOrFalse => {
				as_display_debug_or_false(raw).map(SettingValue::Intercept)
			}
		}
	}
}

/// One entry of the descriptor table: name, converter, default
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
	/// Setting name without namespace prefix
	pub name: &'static str,
	/// Converter, or `None` to keep the raw string
	pub convert: Option<Converter>,
	/// Raw default, converted like a supplied value
	pub default: &'static str,
}

const fn desc(name: &'static str, convert: Option<Converter>, default: &'static str) -> Descriptor {
	Descriptor {
		name,
		convert,
		default,
	}
}

/// Default per-request panel identifiers, as a raw list value
pub const DEFAULT_PANELS: &str = "headers logging performance request_vars sql traceback";

/// Default global panel identifiers, as a raw list value
pub const DEFAULT_GLOBAL_PANELS: &str = "routes settings versions";

/// The descriptor table for toolbar-owned settings
pub const DEFAULT_SETTINGS: &[Descriptor] = &[
	desc("enabled", Some(Converter::Bool), "true"),
	desc("intercept_exc", Some(Converter::DisplayDebugOrFalse), "debug"),
	desc("intercept_redirects", Some(Converter::Bool), "false"),
	desc("panels", Some(Converter::GlobalsList), DEFAULT_PANELS),
	desc("extra_panels", Some(Converter::GlobalsList), ""),
	desc("global_panels", Some(Converter::GlobalsList), DEFAULT_GLOBAL_PANELS),
	desc("extra_global_panels", Some(Converter::GlobalsList), ""),
	desc("hosts", Some(Converter::List), "127.0.0.1 ::1"),
	desc("exclude_prefixes", Some(Converter::LineList), ""),
	desc("active_panels", Some(Converter::List), ""),
	desc("includes", Some(Converter::List), ""),
	desc("button_style", None, ""),
	desc("max_request_history", Some(Converter::Int), "100"),
	desc("max_visible_requests", Some(Converter::Int), "10"),
];

/// Settings parsed under the toolbar namespace but re-mapped onto the host
/// namespace by [`transform_settings`]. Converters and defaults are shared
/// by all entries.
pub const DEFAULT_TRANSFORM: &[Descriptor] = &[
	desc("debug_notfound", Some(Converter::Bool), "false"),
	desc("debug_routematch", Some(Converter::Bool), "false"),
	desc("prevent_http_cache", Some(Converter::Bool), "false"),
	desc("reload_assets", Some(Converter::Bool), "false"),
	desc("reload_resources", Some(Converter::Bool), "false"),
	desc("reload_templates", Some(Converter::Bool), "false"),
];

/// Parsed settings: fully namespaced key to typed value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsMap {
	values: BTreeMap<String, SettingValue>,
}

impl SettingsMap {
	/// Look up a value by fully namespaced key
	pub fn get(&self, key: &str) -> Option<&SettingValue> {
		self.values.get(key)
	}

	/// Insert a value under a fully namespaced key
	pub fn insert(&mut self, key: impl Into<String>, value: SettingValue) {
		self.values.insert(key.into(), value);
	}

	/// Iterate over all entries in key order
	pub fn iter(&self) -> impl Iterator<Item = (&String, &SettingValue)> {
		self.values.iter()
	}

	/// Number of entries
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Whether the map is empty
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Boolean value of a toolbar-namespaced setting
	pub fn bool_setting(&self, name: &str) -> Option<bool> {
		match self.get(&format!("{SETTINGS_PREFIX}{name}")) {
			Some(SettingValue::Bool(v)) => Some(*v),
			_ => None,
		}
	}

	/// Integer value of a toolbar-namespaced setting
	pub fn int_setting(&self, name: &str) -> Option<usize> {
		match self.get(&format!("{SETTINGS_PREFIX}{name}")) {
			Some(SettingValue::Int(v)) => Some(*v),
			_ => None,
		}
	}

	/// List value of a toolbar-namespaced setting
	pub fn list_setting(&self, name: &str) -> Option<&[String]> {
		match self.get(&format!("{SETTINGS_PREFIX}{name}")) {
			Some(SettingValue::List(v)) => Some(v),
			_ => None,
		}
	}

	/// String value of a toolbar-namespaced setting
	pub fn str_setting(&self, name: &str) -> Option<&str> {
		match self.get(&format!("{SETTINGS_PREFIX}{name}")) {
			Some(SettingValue::Str(v)) => Some(v),
			_ => None,
		}
	}

	/// Intercept mode of a toolbar-namespaced setting
	pub fn intercept_setting(&self, name: &str) -> Option<InterceptExc> {
		match self.get(&format!("{SETTINGS_PREFIX}{name}")) {
			Some(SettingValue::Intercept(v)) => Some(*v),
			_ => None,
		}
	}
}

/// Parse raw configuration against the descriptor table
///
/// For every descriptor (base table plus transform table) the raw value is
/// looked up under `debugtoolbar.<name>`, falling back to the descriptor's
/// default, and the converter is applied. Deterministic and side-effect
/// free: the same input always produces the same map.
pub fn parse_settings(
	raw: &HashMap<String, String>,
	factories: &PanelFactories,
) -> ToolbarResult<SettingsMap> {
	let mut parsed = SettingsMap::default();

	for descriptor in DEFAULT_SETTINGS.iter().chain(DEFAULT_TRANSFORM) {
		let key = format!("{SETTINGS_PREFIX}{}", descriptor.name);
		let raw_value = raw.get(&key).map(String::as_str).unwrap_or(descriptor.default);
		let value = match descriptor.convert {
			Some(converter) => converter.apply(raw_value, factories).map_err(|err| {
				ToolbarError::configuration(format!("{key}: {err}"))
			})?,
			None => SettingValue::Str(raw_value.to_string()),
		};
		parsed.insert(key, value);
	}

	Ok(parsed)
}

/// Re-map the transform subset onto the host namespace
///
/// Every `debugtoolbar.<name>` in [`DEFAULT_TRANSFORM`] becomes
/// `reinhardt.<name>` with the same value, defaulting to `false` when the
/// parsed map does not contain it. Pure lookup-with-default, no validation.
pub fn transform_settings(parsed: &SettingsMap) -> SettingsMap {
	let mut transformed = SettingsMap::default();

	for descriptor in DEFAULT_TRANSFORM {
		let old_key = format!("{SETTINGS_PREFIX}{}", descriptor.name);
		let new_key = format!("{HOST_PREFIX}{}", descriptor.name);
		let value = parsed
			.get(&old_key)
			.cloned()
			.unwrap_or(SettingValue::Bool(false));
		transformed.insert(new_key, value);
	}

	transformed
}

fn as_bool(value: &str) -> ToolbarResult<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"true" | "yes" | "on" | "1" => Ok(true),
		"false" | "no" | "off" | "0" => Ok(false),
		other => Err(ToolbarError::configuration(format!(
			"invalid boolean value {other:?}"
		))),
	}
}

fn as_int(value: &str) -> ToolbarResult<usize> {
	value.trim().parse::<usize>().map_err(|_| {
		ToolbarError::configuration(format!("invalid integer value {value:?}"))
	})
}

fn as_list(value: &str) -> Vec<String> {
	value
		.split(|c: char| c.is_whitespace() || c == ',')
		.filter(|token| !token.is_empty())
		.map(str::to_string)
		.collect()
}

fn as_line_list(value: &str) -> Vec<String> {
	value
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(str::to_string)
		.collect()
}

fn as_display_debug_or_false(value: &str) -> ToolbarResult<InterceptExc> {
	if value.trim().eq_ignore_ascii_case("debug") {
		return Ok(InterceptExc::Debug);
	}
	Ok(if as_bool(value)? {
		InterceptExc::Enabled
	} else {
		InterceptExc::Disabled
	})
}
