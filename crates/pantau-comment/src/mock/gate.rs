//! Hold points for in-flight mock requests.

use std::sync::Arc;

use tokio::sync::{Notify, Semaphore};

#[derive(Debug)]
struct GateInner {
    arrived: Notify,
    released: Semaphore,
}

/// Keeps one mock request in flight until [`release`](Self::release) is called.
#[derive(Debug, Clone)]
pub struct MockGate {
    inner: Arc<GateInner>,
}

impl MockGate {
    pub(super) fn new() -> Self {
        Self {
            inner: Arc::new(GateInner {
                arrived: Notify::new(),
                released: Semaphore::new(0),
            }),
        }
    }

    /// Waits until the held request has reached the transport.
    pub async fn arrived(&self) {
        self.inner.arrived.notified().await;
    }

    /// Lets the held request complete.
    pub fn release(&self) {
        self.inner.released.add_permits(1);
    }

    pub(super) async fn wait(&self) {
        self.inner.arrived.notify_one();
        if let Ok(permit) = self.inner.released.acquire().await {
            permit.forget();
        }
    }
}
