use std::sync::Arc;

use crate::space::{SpaceClient, SpaceTransport};

/// Shared state handed to every request handler.
///
/// The client is constructed once at startup and lives for the process
/// lifetime; there is no teardown beyond process exit.
pub struct HandlerState<T: SpaceTransport + 'static> {
    pub client: Arc<SpaceClient<T>>,

    /// Character cap applied after whitespace cleanup.
    pub max_text_chars: usize,
}

impl<T: SpaceTransport + 'static> HandlerState<T> {
    pub fn new(client: Arc<SpaceClient<T>>, max_text_chars: usize) -> Self {
        Self {
            client,
            max_text_chars,
        }
    }
}

// Manual impl: `SpaceClient<T>` sits behind an `Arc`, so no `T: Clone` bound
// is needed.
impl<T: SpaceTransport + 'static> Clone for HandlerState<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            max_text_chars: self.max_text_chars,
        }
    }
}
