//! Per-request collection context
//!
//! A [`ToolbarContext`] is created by the middleware for every request the
//! toolbar is visible on. Collectors (panels, the task-local record helpers)
//! append data to it while the request is being handled; after the response
//! is produced the context is frozen into the request history and served by
//! the toolbar sub-application.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::middleware::ToolbarConfig;
use crate::panels::PanelStats;

tokio::task_local! {
	/// Context of the request currently being handled, available to
	/// application code that wants to record queries, log lines or
	/// performance markers without threading the context through.
	pub static TOOLBAR_CONTEXT: Arc<ToolbarContext>;
}

/// Basic information about the intercepted request
#[derive(Debug, Clone, Serialize)]
pub struct RequestInfo {
	/// HTTP method
	pub method: String,
	/// Request path
	pub path: String,
	/// Raw query string, if any
	pub query: Option<String>,
	/// Request headers as name/value pairs, in wire order
	pub headers: Vec<(String, String)>,
	/// Originating client address
	pub client_ip: String,
	/// When the request was intercepted
	pub timestamp: DateTime<Utc>,
}

/// Information about the response paired with a [`RequestInfo`]
#[derive(Debug, Clone, Serialize)]
pub struct ResponseInfo {
	/// HTTP status code
	pub status: u16,
	/// Response headers as name/value pairs
	pub headers: Vec<(String, String)>,
	/// Content type, if the response declared one
	pub content_type: Option<String>,
	/// Wall-clock time spent in the inner service
	pub duration: Duration,
}

/// One SQL statement executed during the request
#[derive(Debug, Clone, Serialize)]
pub struct SqlQuery {
	/// Statement text
	pub sql: String,
	/// Bound parameters, stringified
	pub params: Vec<String>,
	/// Execution time
	pub duration: Duration,
	/// When the statement was issued
	pub timestamp: DateTime<Utc>,
}

/// One log line captured during the request
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
	/// Level name (`ERROR`, `WARN`, ...)
	pub level: String,
	/// Log target (module path)
	pub target: String,
	/// Formatted message
	pub message: String,
	/// When the line was emitted
	pub timestamp: DateTime<Utc>,
}

/// A named timing span recorded during the request
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceMarker {
	/// Marker name
	pub name: String,
	/// Measured duration
	pub duration: Duration,
	/// When the span started
	pub timestamp: DateTime<Utc>,
}

/// One frame of a captured traceback
#[derive(Debug, Clone, Serialize)]
pub struct ExceptionFrame {
	/// Source file
	pub file: String,
	/// Line number
	pub line: u32,
	/// Enclosing function
	pub function: String,
	/// Source excerpt, when available
	pub source: Option<String>,
}

/// An error captured while handling the request
#[derive(Debug, Clone, Serialize)]
pub struct ExceptionInfo {
	/// Error type name
	pub kind: String,
	/// Error message
	pub message: String,
	/// Captured frames, innermost first
	pub frames: Vec<ExceptionFrame>,
}

/// Mutable per-request collection state
///
/// Vectors are mutex-guarded because collectors run while the host handles
/// the request concurrently with its own tasks. After the middleware stores
/// the context in the request history nothing writes to it anymore.
#[derive(Debug)]
pub struct ToolbarContext {
	/// Opaque request identifier used in toolbar URLs
	pub id: String,
	/// The intercepted request
	pub request: RequestInfo,
	/// Configuration snapshot the toolbar was built with
	pub config: Arc<ToolbarConfig>,
	/// Response data, filled once the inner service returns
	pub response: Mutex<Option<ResponseInfo>>,
	/// SQL statements recorded during the request
	pub sql_queries: Mutex<Vec<SqlQuery>>,
	/// Log lines recorded during the request
	pub log_records: Mutex<Vec<LogRecord>>,
	/// Timing markers recorded during the request
	pub markers: Mutex<Vec<PerformanceMarker>>,
	/// Error captured during the request, if any
	pub exception: Mutex<Option<ExceptionInfo>>,
	/// Generated panel stats, filled after the response is produced
	pub stats: Mutex<Vec<PanelStats>>,
}

impl ToolbarContext {
	/// Create a fresh context for one request
	pub fn new(request: RequestInfo, config: Arc<ToolbarConfig>) -> Self {
		Self {
			id: uuid::Uuid::new_v4().simple().to_string(),
			request,
			config,
			response: Mutex::new(None),
			sql_queries: Mutex::new(Vec::new()),
			log_records: Mutex::new(Vec::new()),
			markers: Mutex::new(Vec::new()),
			exception: Mutex::new(None),
			stats: Mutex::new(Vec::new()),
		}
	}

	/// Record an executed SQL statement
	pub fn record_sql(&self, query: SqlQuery) {
		self.sql_queries.lock().unwrap().push(query);
	}

	/// Record a log line
	pub fn record_log(&self, record: LogRecord) {
		self.log_records.lock().unwrap().push(record);
	}

	/// Record a timing marker
	pub fn record_marker(&self, marker: PerformanceMarker) {
		self.markers.lock().unwrap().push(marker);
	}

	/// Record a captured error, replacing any earlier one
	pub fn record_exception(&self, exception: ExceptionInfo) {
		*self.exception.lock().unwrap() = Some(exception);
	}
}

/// Run `f` against the context of the current request, if the toolbar is
/// collecting for it. Returns `None` outside an instrumented request.
pub fn with_current<R>(f: impl FnOnce(&ToolbarContext) -> R) -> Option<R> {
	TOOLBAR_CONTEXT.try_with(|ctx| f(ctx)).ok()
}

/// Record an SQL statement against the current request, if any
pub fn record_sql(sql: impl Into<String>, params: Vec<String>, duration: Duration) {
	with_current(|ctx| {
		ctx.record_sql(SqlQuery {
			sql: sql.into(),
			params,
			duration,
			timestamp: Utc::now(),
		})
	});
}

/// Record a timing marker against the current request, if any
pub fn record_marker(name: impl Into<String>, duration: Duration) {
	with_current(|ctx| {
		ctx.record_marker(PerformanceMarker {
			name: name.into(),
			duration,
			timestamp: Utc::now(),
		})
	});
}
