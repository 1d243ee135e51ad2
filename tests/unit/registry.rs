//! Panel factory registration and ordered panel lists

use axum_debug_toolbar::application::Includes;
use axum_debug_toolbar::panels::{Panel, PanelFactories, PanelLists};
use axum_debug_toolbar::{DebugToolbar, ToolbarError};
use rstest::rstest;
use std::collections::HashMap;

use crate::common::fixtures::{builtin_factories, empty_lists};
use crate::common::mock_panel::MockPanel;

#[rstest]
fn test_custom_factory_resolves(mut builtin_factories: PanelFactories) {
	builtin_factories.insert("custom", || {
		Box::new(MockPanel::new("custom", "Custom Panel")) as Box<dyn Panel>
	});

	assert!(builtin_factories.contains("custom"));
	let panel = builtin_factories.instantiate("custom").unwrap();
	assert_eq!(panel.id(), "custom");
	assert_eq!(panel.name(), "Custom Panel");
}

#[rstest]
fn test_factory_replacement_is_last_write_wins(mut builtin_factories: PanelFactories) {
	builtin_factories.insert("sql", || {
		Box::new(MockPanel::new("sql", "Fake SQL")) as Box<dyn Panel>
	});

	let panel = builtin_factories.instantiate("sql").unwrap();
	assert_eq!(panel.name(), "Fake SQL");
}

#[rstest]
fn test_registration_appends_in_call_order(
	builtin_factories: PanelFactories,
	mut empty_lists: PanelLists,
) {
	for id in ["traceback", "headers", "sql"] {
		empty_lists.register(&builtin_factories, id, false).unwrap();
	}

	let ids: Vec<_> = empty_lists.request_panel_ids().collect();
	assert_eq!(ids, vec!["traceback", "headers", "sql"]);
}

#[rstest]
fn test_duplicate_registration_keeps_first_position(
	builtin_factories: PanelFactories,
	mut empty_lists: PanelLists,
) {
	empty_lists.register(&builtin_factories, "headers", false).unwrap();
	empty_lists.register(&builtin_factories, "sql", false).unwrap();
	empty_lists.register(&builtin_factories, "headers", false).unwrap();
	empty_lists.register(&builtin_factories, "sql", false).unwrap();

	let ids: Vec<_> = empty_lists.request_panel_ids().collect();
	assert_eq!(ids, vec!["headers", "sql"]);
}

#[rstest]
fn test_registration_fails_without_a_factory(
	builtin_factories: PanelFactories,
	mut empty_lists: PanelLists,
) {
	let err = empty_lists
		.register(&builtin_factories, "unregistered", false)
		.unwrap_err();
	assert!(matches!(err, ToolbarError::Configuration(_)));
	assert!(err.to_string().contains("unregistered"));
}

#[rstest]
fn test_global_registration_does_not_touch_request_scope(
	builtin_factories: PanelFactories,
	mut empty_lists: PanelLists,
) {
	empty_lists.register(&builtin_factories, "versions", true).unwrap();
	empty_lists.register(&builtin_factories, "versions", true).unwrap();

	assert_eq!(
		empty_lists.global_panel_ids().collect::<Vec<_>>(),
		vec!["versions"]
	);
	assert_eq!(empty_lists.request_panel_ids().count(), 0);
}

#[test]
fn test_toolbar_accepts_custom_panel_in_settings() {
	let mut factories = PanelFactories::with_builtins();
	factories.insert("audit", || {
		Box::new(MockPanel::new("audit", "Audit Panel")) as Box<dyn Panel>
	});

	let raw: HashMap<String, String> = [(
		"debugtoolbar.extra_panels".to_string(),
		"audit".to_string(),
	)]
	.into();

	let toolbar = DebugToolbar::with_registries(&raw, factories, &Includes::new()).unwrap();
	assert!(toolbar.config().extra_panels.contains(&"audit".to_string()));
}

#[test]
fn test_toolbar_rejects_unknown_panel_in_settings() {
	let raw: HashMap<String, String> =
		[("debugtoolbar.panels".to_string(), "audit".to_string())].into();
	assert!(DebugToolbar::new(&raw).is_err());
}
