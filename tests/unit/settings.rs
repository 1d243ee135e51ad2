//! Settings parsing, transformation and typed configuration

use axum_debug_toolbar::middleware::ToolbarConfig;
use axum_debug_toolbar::panels::PanelFactories;
use axum_debug_toolbar::settings::{
	DEFAULT_SETTINGS, DEFAULT_TRANSFORM, SettingValue, parse_settings, transform_settings,
};
use axum_debug_toolbar::{InterceptExc, SettingsMap};
use rstest::rstest;
use std::collections::HashMap;

use crate::common::fixtures::builtin_factories;

fn raw(entries: &[(&str, &str)]) -> HashMap<String, String> {
	entries
		.iter()
		.map(|(k, v)| (k.to_string(), v.to_string()))
		.collect()
}

fn parse(entries: &[(&str, &str)], factories: &PanelFactories) -> SettingsMap {
	parse_settings(&raw(entries), factories).unwrap()
}

#[rstest]
fn test_every_descriptor_gets_a_value(builtin_factories: PanelFactories) {
	let parsed = parse(&[], &builtin_factories);

	for descriptor in DEFAULT_SETTINGS.iter().chain(DEFAULT_TRANSFORM) {
		let key = format!("debugtoolbar.{}", descriptor.name);
		assert!(parsed.get(&key).is_some(), "no value for {key}");
	}
}

#[rstest]
fn test_explicit_values_override_defaults(builtin_factories: PanelFactories) {
	let parsed = parse(
		&[
			("debugtoolbar.enabled", "off"),
			("debugtoolbar.intercept_redirects", "yes"),
			("debugtoolbar.max_visible_requests", "3"),
			("debugtoolbar.button_style", "left: 10px"),
			("debugtoolbar.panels", "sql"),
		],
		&builtin_factories,
	);

	assert_eq!(parsed.bool_setting("enabled"), Some(false));
	assert_eq!(parsed.bool_setting("intercept_redirects"), Some(true));
	assert_eq!(parsed.int_setting("max_visible_requests"), Some(3));
	assert_eq!(parsed.str_setting("button_style"), Some("left: 10px"));
	assert_eq!(parsed.list_setting("panels").unwrap(), &["sql".to_string()]);
}

#[rstest]
fn test_unrecognized_keys_are_ignored(builtin_factories: PanelFactories) {
	let with_noise = parse(
		&[
			("debugtoolbar.no_such_setting", "whatever"),
			("app.database_url", "postgres://"),
		],
		&builtin_factories,
	);
	let without = parse(&[], &builtin_factories);

	assert_eq!(with_noise, without);
	assert!(with_noise.get("debugtoolbar.no_such_setting").is_none());
}

#[rstest]
#[case("debug", InterceptExc::Debug)]
#[case("true", InterceptExc::Enabled)]
#[case("false", InterceptExc::Disabled)]
fn test_intercept_exc_tri_state_reaches_config(
	builtin_factories: PanelFactories,
	#[case] value: &str,
	#[case] expected: InterceptExc,
) {
	let parsed = parse(&[("debugtoolbar.intercept_exc", value)], &builtin_factories);
	let config = ToolbarConfig::from_settings(&parsed).unwrap();
	assert_eq!(config.intercept_exc, expected);
}

#[rstest]
fn test_exclude_prefixes_parse_per_line(builtin_factories: PanelFactories) {
	let parsed = parse(
		&[("debugtoolbar.exclude_prefixes", "  /health\n\n/static assets  \n")],
		&builtin_factories,
	);
	let config = ToolbarConfig::from_settings(&parsed).unwrap();

	// line list keeps inner whitespace, only trims the ends
	assert_eq!(config.exclude_prefixes, vec!["/health", "/static assets"]);
	assert!(config.path_excluded("/health/live"));
	assert!(!config.path_excluded("/api"));
}

#[rstest]
fn test_panel_lists_must_resolve_at_parse_time(builtin_factories: PanelFactories) {
	for list_name in [
		"panels",
		"extra_panels",
		"global_panels",
		"extra_global_panels",
	] {
		let key = format!("debugtoolbar.{list_name}");
		let input = raw(&[(key.as_str(), "headers bogus_panel")]);
		let err = parse_settings(&input, &builtin_factories).unwrap_err();
		assert!(
			err.to_string().contains(&key),
			"error for {list_name} should name the offending key: {err}"
		);
	}
}

#[rstest]
fn test_error_messages_name_the_key(builtin_factories: PanelFactories) {
	let input = raw(&[("debugtoolbar.max_request_history", "many")]);
	let err = parse_settings(&input, &builtin_factories).unwrap_err();
	assert!(err.to_string().contains("debugtoolbar.max_request_history"));
}

#[rstest]
fn test_transform_covers_exactly_the_transform_table(builtin_factories: PanelFactories) {
	let parsed = parse(
		&[
			("debugtoolbar.debug_notfound", "true"),
			("debugtoolbar.enabled", "false"),
		],
		&builtin_factories,
	);
	let transformed = transform_settings(&parsed);

	assert_eq!(transformed.len(), DEFAULT_TRANSFORM.len());
	assert_eq!(
		transformed.get("reinhardt.debug_notfound"),
		Some(&SettingValue::Bool(true))
	);
	// toolbar-owned settings never leak into the host namespace
	assert!(transformed.get("reinhardt.enabled").is_none());
	assert!(transformed.get("debugtoolbar.debug_notfound").is_none());
}

#[rstest]
fn test_config_from_settings_round_trips_lists(builtin_factories: PanelFactories) {
	let parsed = parse(
		&[
			("debugtoolbar.panels", "sql headers"),
			("debugtoolbar.extra_panels", "logging"),
			("debugtoolbar.hosts", "10.1.2.3, ::1"),
			("debugtoolbar.active_panels", "sql"),
		],
		&builtin_factories,
	);
	let config = ToolbarConfig::from_settings(&parsed).unwrap();

	assert_eq!(config.panels, vec!["sql", "headers"]);
	assert_eq!(config.extra_panels, vec!["logging"]);
	assert_eq!(config.active_panels, vec!["sql"]);
	assert!(config.host_allowed("10.1.2.3"));
	assert!(config.host_allowed("::1"));
	assert!(!config.host_allowed("127.0.0.1"));
}
