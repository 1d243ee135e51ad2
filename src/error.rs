//! Error types for the debug toolbar

use thiserror::Error;

/// Errors produced by the debug toolbar
#[derive(Debug, Error)]
pub enum ToolbarError {
	/// Invalid or unresolvable configuration, raised at configuration time
	#[error("configuration error: {0}")]
	Configuration(String),

	/// Panel stats generation or HTML rendering failed
	#[error("render error: {0}")]
	Render(String),

	/// Failure while reading or rebuilding an HTTP body
	#[error("http error: {0}")]
	Http(String),
}

impl ToolbarError {
	/// Shorthand for a `Configuration` error
	pub fn configuration(message: impl Into<String>) -> Self {
		Self::Configuration(message.into())
	}
}

/// Result alias used throughout the crate
pub type ToolbarResult<T> = Result<T, ToolbarError>;
