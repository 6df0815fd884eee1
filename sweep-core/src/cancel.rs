use tokio::sync::watch;

/// Receiving end of a run-wide cancellation flag.
#[derive(Debug, Clone)]
pub struct CancelToken {
  rx: watch::Receiver<bool>,
}

/// Trips every [`CancelToken`] handed out by [`CancelToken::new`]. Safe to
/// call from a signal handler thread.
#[derive(Debug)]
pub struct CancelHandle {
  tx: watch::Sender<bool>,
}

impl CancelHandle {
  pub fn cancel(&self) {
    self.tx.send_replace(true);
  }
}

impl CancelToken {
  pub fn new() -> (CancelHandle, Self) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, Self { rx })
  }

  /// A token nobody can trip.
  pub fn never() -> Self {
    Self::new().1
  }

  pub fn is_cancelled(&self) -> bool {
    *self.rx.borrow()
  }

  /// Resolves once the flag is set. Pending forever for [`CancelToken::never`].
  pub async fn cancelled(&self) {
    let mut rx = self.rx.clone();
    let closed = rx.wait_for(|cancelled| *cancelled).await.is_err();
    if closed && !self.is_cancelled() {
      std::future::pending::<()>().await;
    }
  }
}

impl Default for CancelToken {
  fn default() -> Self {
    Self::never()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  #[tokio::test]
  async fn cancel_wakes_waiters() {
    let (handle, token) = CancelToken::new();
    assert!(!token.is_cancelled());

    let waiter = token.clone();
    let wait = tokio::spawn(async move { waiter.cancelled().await });
    handle.cancel();

    tokio::time::timeout(Duration::from_secs(1), wait)
      .await
      .expect("waiter woke")
      .unwrap();
    assert!(token.is_cancelled());
  }

  #[tokio::test]
  async fn never_token_stays_pending() {
    let token = CancelToken::never();
    let waited = tokio::time::timeout(Duration::from_millis(50), token.cancelled()).await;
    assert!(waited.is_err());
    assert!(!token.is_cancelled());
  }
}
