//! Cooperative cancellation for long-running operations

use tokio::sync::watch;

/// Fires the cancellation observed by every clone of the paired `Cancellation`
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Observer side of a cancellation signal
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
}

/// Create a linked handle/observer pair
pub fn channel() -> (CancelHandle, Cancellation) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, Cancellation { rx })
}

impl Cancellation {
    /// A cancellation that never fires
    pub fn never() -> Self {
        channel().1
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled; pends forever if the handle is dropped first
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::never()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn cancel_wakes_all_clones() {
        let (handle, cancellation) = channel();
        let other = cancellation.clone();
        assert!(!cancellation.is_cancelled());

        handle.cancel();

        cancellation.cancelled().await;
        other.cancelled().await;
        assert!(other.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn never_does_not_fire() {
        let cancellation = Cancellation::never();
        let fired = tokio::time::timeout(Duration::from_secs(60), cancellation.cancelled()).await;
        assert!(fired.is_err());
    }

    #[tokio::test]
    async fn cancel_before_handle_dropped_is_observed() {
        let (handle, cancellation) = channel();
        handle.cancel();
        drop(handle);
        cancellation.cancelled().await;
    }
}
