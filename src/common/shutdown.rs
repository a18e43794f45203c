use std::future::Future;

use tokio::sync::watch;

/// One-shot shutdown signal shared between a component and its background tasks.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            tx,
        }
    }

    /// Signal every waiter. Later calls are no-ops.
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_terminated(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `shutdown` has been called, including before this call.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            let _ = rx.wait_for(|terminated| *terminated).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_wait_after_shutdown() {
        let shutdown = Shutdown::new();
        assert!(!shutdown.is_terminated());

        shutdown.shutdown();
        assert!(shutdown.is_terminated());
        tokio::time::timeout(Duration::from_secs(1), shutdown.wait()).await.unwrap();
    }

    #[tokio::test]
    async fn test_wait_wakes_on_shutdown() {
        let shutdown = std::sync::Arc::new(Shutdown::new());
        let waiter = tokio::spawn(shutdown.wait());

        shutdown.shutdown();
        tokio::time::timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
    }
}
