//! Configurable mock Panel implementation
//!
//! Tracks lifecycle calls so tests can assert the middleware drives
//! panels correctly, and can be configured to fail.

use async_trait::async_trait;
use axum_debug_toolbar::context::ToolbarContext;
use axum_debug_toolbar::error::{ToolbarError, ToolbarResult};
use axum_debug_toolbar::panels::{Panel, PanelStats};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock panel with call counters and configurable failures
#[derive(Debug, Clone)]
pub struct MockPanel {
	id: &'static str,
	name: &'static str,
	priority: i32,
	enable_count: Arc<AtomicUsize>,
	disable_count: Arc<AtomicUsize>,
	generate_stats_count: Arc<AtomicUsize>,
	should_fail_generate_stats: bool,
}

impl MockPanel {
	/// Create a mock panel with the given id and display name
	pub fn new(id: &'static str, name: &'static str) -> Self {
		Self {
			id,
			name,
			priority: 0,
			enable_count: Arc::new(AtomicUsize::new(0)),
			disable_count: Arc::new(AtomicUsize::new(0)),
			generate_stats_count: Arc::new(AtomicUsize::new(0)),
			should_fail_generate_stats: false,
		}
	}

	/// Set the panel priority
	pub fn with_priority(mut self, priority: i32) -> Self {
		self.priority = priority;
		self
	}

	/// Make `generate_stats` fail
	pub fn with_generate_stats_failure(mut self) -> Self {
		self.should_fail_generate_stats = true;
		self
	}

	/// Times `enable_instrumentation` was called
	pub fn enable_count(&self) -> usize {
		self.enable_count.load(Ordering::SeqCst)
	}

	/// Times `disable_instrumentation` was called
	pub fn disable_count(&self) -> usize {
		self.disable_count.load(Ordering::SeqCst)
	}

	/// Times `generate_stats` was called
	pub fn generate_stats_count(&self) -> usize {
		self.generate_stats_count.load(Ordering::SeqCst)
	}
}

impl Default for MockPanel {
	fn default() -> Self {
		Self::new("mock", "Mock Panel")
	}
}

#[async_trait]
impl Panel for MockPanel {
	fn id(&self) -> &'static str {
		self.id
	}

	fn name(&self) -> &'static str {
		self.name
	}

	fn priority(&self) -> i32 {
		self.priority
	}

	async fn enable_instrumentation(&self) -> ToolbarResult<()> {
		self.enable_count.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}

	async fn disable_instrumentation(&self) -> ToolbarResult<()> {
		self.disable_count.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}

	async fn generate_stats(&self, _ctx: &ToolbarContext) -> ToolbarResult<PanelStats> {
		self.generate_stats_count.fetch_add(1, Ordering::SeqCst);

		if self.should_fail_generate_stats {
			return Err(ToolbarError::Render(format!(
				"mock panel {:?} failed to generate stats",
				self.id
			)));
		}

		Ok(PanelStats {
			panel_id: self.id.to_string(),
			panel_name: self.name.to_string(),
			data: serde_json::json!({ "panel_type": "mock" }),
			summary: format!("{}: mock summary", self.name),
			rendered_html: None,
		})
	}

	fn render(&self, _stats: &PanelStats) -> ToolbarResult<String> {
		Ok(format!(
			"<div class=\"mock-panel\" id=\"mock-panel-{}\">{}</div>",
			self.id, self.name
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::common::fixtures::test_context;
	use rstest::rstest;

	#[rstest]
	#[tokio::test]
	async fn test_mock_panel_tracks_calls(
		test_context: axum_debug_toolbar::context::ToolbarContext,
	) {
		let panel = MockPanel::new("test", "Test Panel").with_priority(50);
		assert_eq!(panel.priority(), 50);

		panel.enable_instrumentation().await.unwrap();
		let stats = panel.generate_stats(&test_context).await.unwrap();
		panel.disable_instrumentation().await.unwrap();

		assert_eq!(panel.enable_count(), 1);
		assert_eq!(panel.generate_stats_count(), 1);
		assert_eq!(panel.disable_count(), 1);
		assert!(panel.render(&stats).unwrap().contains("Test Panel"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_mock_panel_failure(
		test_context: axum_debug_toolbar::context::ToolbarContext,
	) {
		let panel = MockPanel::default().with_generate_stats_failure();
		assert!(panel.generate_stats(&test_context).await.is_err());
	}
}
