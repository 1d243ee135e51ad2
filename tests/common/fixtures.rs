//! Common test fixtures
//!
//! Reusable rstest fixtures for toolbar configuration, requests and
//! contexts.

use axum_debug_toolbar::context::{RequestInfo, ToolbarContext};
use axum_debug_toolbar::middleware::ToolbarConfig;
use axum_debug_toolbar::panels::{PanelFactories, PanelLists};
use chrono::Utc;
use rstest::*;
use std::sync::Arc;

/// Default toolbar configuration: enabled, loopback hosts only, the
/// built-in panel lists
#[fixture]
pub fn default_config() -> ToolbarConfig {
	ToolbarConfig::default()
}

/// Configuration with exception interception switched off
#[fixture]
pub fn no_intercept_config() -> ToolbarConfig {
	ToolbarConfig {
		intercept_exc: axum_debug_toolbar::InterceptExc::Disabled,
		..Default::default()
	}
}

/// Basic request information originating from loopback
#[fixture]
pub fn test_request_info() -> RequestInfo {
	RequestInfo {
		method: "GET".to_string(),
		path: "/test".to_string(),
		query: Some("foo=bar".to_string()),
		headers: vec![
			("content-type".to_string(), "application/json".to_string()),
			("user-agent".to_string(), "test agent".to_string()),
		],
		client_ip: "127.0.0.1".to_string(),
		timestamp: Utc::now(),
	}
}

/// A collection context for the default test request
#[fixture]
pub fn test_context(test_request_info: RequestInfo) -> ToolbarContext {
	ToolbarContext::new(test_request_info, Arc::new(ToolbarConfig::default()))
}

/// Factory registry with every built-in panel
#[fixture]
pub fn builtin_factories() -> PanelFactories {
	PanelFactories::with_builtins()
}

/// Empty panel lists for registration tests
#[fixture]
pub fn empty_lists() -> PanelLists {
	PanelLists::new()
}
