//! Bounded per-process request history
//!
//! Intercepted requests are stored here after their response is produced;
//! the toolbar sub-application reads from it to serve request detail and
//! SQL inspection views. Capacity is `max_request_history`; the oldest
//! entry is evicted first.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::context::ToolbarContext;

/// Fixed-capacity, insertion-ordered store of request contexts
#[derive(Debug)]
pub struct RequestHistory {
	capacity: usize,
	entries: Mutex<VecDeque<Arc<ToolbarContext>>>,
}

impl RequestHistory {
	/// Create a history bounded at `capacity` entries
	pub fn new(capacity: usize) -> Self {
		Self {
			capacity,
			entries: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
		}
	}

	/// Store a finished request context, evicting the oldest entry when
	/// the history is full
	pub fn put(&self, ctx: Arc<ToolbarContext>) {
		let mut entries = self.entries.lock().unwrap();
		if self.capacity == 0 {
			return;
		}
		if entries.len() == self.capacity {
			entries.pop_front();
		}
		entries.push_back(ctx);
	}

	/// Look up a context by request id
	pub fn get(&self, id: &str) -> Option<Arc<ToolbarContext>> {
		self.entries
			.lock()
			.unwrap()
			.iter()
			.find(|ctx| ctx.id == id)
			.cloned()
	}

	/// The most recent `limit` contexts, newest first
	pub fn latest(&self, limit: usize) -> Vec<Arc<ToolbarContext>> {
		self.entries
			.lock()
			.unwrap()
			.iter()
			.rev()
			.take(limit)
			.cloned()
			.collect()
	}

	/// Number of stored contexts
	pub fn len(&self) -> usize {
		self.entries.lock().unwrap().len()
	}

	/// Whether the history is empty
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
