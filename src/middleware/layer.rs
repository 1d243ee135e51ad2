//! Debug toolbar Tower layer

use std::sync::Arc;
use tower::Layer;

use crate::middleware::service::{DebugToolbarService, ToolbarShared};

/// Tower layer installing the toolbar interception service
///
/// The wrapped state is frozen at configuration time; layering shares it
/// across every service instance.
#[derive(Clone)]
pub struct DebugToolbarLayer {
	shared: Arc<ToolbarShared>,
}

impl DebugToolbarLayer {
	/// Create the layer from frozen toolbar state
	pub fn new(shared: Arc<ToolbarShared>) -> Self {
		Self { shared }
	}
}

impl<S> Layer<S> for DebugToolbarLayer {
	type Service = DebugToolbarService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		DebugToolbarService {
			inner,
			shared: self.shared.clone(),
		}
	}
}
