//! SQL query panel

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::context::ToolbarContext;
use crate::error::ToolbarResult;
use crate::panels::{Panel, PanelStats, html_escape};
use crate::utils::sql_normalization::{detect_n_plus_one, normalize_sql};

const DEFAULT_WARNING_THRESHOLD_MS: u64 = 100;

/// Displays SQL statements recorded during the request, flagging
/// duplicates, slow statements and likely N+1 patterns
pub struct SqlPanel {
	warning_threshold_ms: u64,
}

impl SqlPanel {
	/// Create the panel with the default slow-query threshold
	pub fn new() -> Self {
		Self {
			warning_threshold_ms: DEFAULT_WARNING_THRESHOLD_MS,
		}
	}

	/// Create the panel with a custom slow-query threshold
	pub fn with_threshold(warning_threshold_ms: u64) -> Self {
		Self {
			warning_threshold_ms,
		}
	}
}

impl Default for SqlPanel {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Panel for SqlPanel {
	fn id(&self) -> &'static str {
		"sql"
	}

	fn name(&self) -> &'static str {
		"SQL"
	}

	fn priority(&self) -> i32 {
		85
	}

	async fn generate_stats(&self, ctx: &ToolbarContext) -> ToolbarResult<PanelStats> {
		let queries = ctx.sql_queries.lock().unwrap();

		let total_queries = queries.len();
		let total_time: Duration = queries.iter().map(|q| q.duration).sum();

		let mut normalized_counts: HashMap<String, usize> = HashMap::new();
		for query in queries.iter() {
			*normalized_counts.entry(normalize_sql(&query.sql)).or_insert(0) += 1;
		}
		let duplicate_count = normalized_counts.values().filter(|&&n| n > 1).count();

		let slow_count = queries
			.iter()
			.filter(|q| q.duration.as_millis() as u64 >= self.warning_threshold_ms)
			.count();

		let n_plus_one = detect_n_plus_one(&queries);

		let queries_data: Vec<serde_json::Value> = queries
			.iter()
			.enumerate()
			.map(|(idx, q)| {
				let normalized = normalize_sql(&q.sql);
				serde_json::json!({
					"index": idx,
					"sql": q.sql,
					"params": q.params,
					"duration_ms": q.duration.as_millis() as u64,
					"is_duplicate": normalized_counts[&normalized] > 1,
					"is_slow": q.duration.as_millis() as u64 >= self.warning_threshold_ms,
					"is_n_plus_one": n_plus_one.contains(&normalized),
				})
			})
			.collect();

		let data = serde_json::json!({
			"total_queries": total_queries,
			"total_time_ms": total_time.as_millis() as u64,
			"duplicate_count": duplicate_count,
			"slow_queries_count": slow_count,
			"n_plus_one_count": n_plus_one.len(),
			"warning_threshold_ms": self.warning_threshold_ms,
			"queries": queries_data,
		});
		let summary = format!("{} queries in {}ms", total_queries, total_time.as_millis());

		Ok(PanelStats {
			panel_id: self.id().to_string(),
			panel_name: self.name().to_string(),
			data,
			summary,
			rendered_html: None,
		})
	}

	fn render(&self, stats: &PanelStats) -> ToolbarResult<String> {
		let data = &stats.data;

		let mut warnings = Vec::new();
		if data["duplicate_count"].as_u64().unwrap_or(0) > 0 {
			warnings.push(format!(
				"<div class=\"dt-warning\">{} duplicate queries</div>",
				data["duplicate_count"]
			));
		}
		if data["slow_queries_count"].as_u64().unwrap_or(0) > 0 {
			warnings.push(format!(
				"<div class=\"dt-warning\">{} slow queries (&gt;{}ms)</div>",
				data["slow_queries_count"], data["warning_threshold_ms"]
			));
		}
		if data["n_plus_one_count"].as_u64().unwrap_or(0) > 0 {
			warnings.push(format!(
				"<div class=\"dt-warning\">{} potential N+1 patterns</div>",
				data["n_plus_one_count"]
			));
		}

		let empty = vec![];
		let rows: String = data["queries"]
			.as_array()
			.unwrap_or(&empty)
			.iter()
			.map(|q| {
				let mut badges = Vec::new();
				if q["is_duplicate"].as_bool().unwrap_or(false) {
					badges.push("<span class=\"dt-badge\">DUPLICATE</span>");
				}
				if q["is_slow"].as_bool().unwrap_or(false) {
					badges.push("<span class=\"dt-badge dt-badge-danger\">SLOW</span>");
				}
				if q["is_n_plus_one"].as_bool().unwrap_or(false) {
					badges.push("<span class=\"dt-badge dt-badge-danger\">N+1</span>");
				}
				format!(
					"<tr><td>#{}</td><td><code>{}</code> {}</td><td>{}ms</td></tr>",
					q["index"].as_u64().unwrap_or(0) + 1,
					html_escape(q["sql"].as_str().unwrap_or("")),
					badges.join(" "),
					q["duration_ms"].as_u64().unwrap_or(0),
				)
			})
			.collect();

		Ok(format!(
			"<div class=\"dt-panel-content\"><h3>SQL Queries</h3>\
			<p><strong>{}</strong> queries, {}ms total</p>{}\
			<table class=\"dt-table\"><thead><tr><th>#</th><th>Query</th><th>Time</th></tr></thead>\
			<tbody>{rows}</tbody></table></div>",
			data["total_queries"],
			data["total_time_ms"],
			warnings.join(""),
		))
	}
}
