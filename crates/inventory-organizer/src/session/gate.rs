use crate::model::Session;
use cloud_framework::account::{AccountClient, AuthError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// Front door to the account service for the application.
#[derive(Clone)]
pub struct SessionGate {
    inner: AccountClient,
}

impl SessionGate {
    pub fn new(inner: AccountClient) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, password))]
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self.inner.sign_up(email, password).await?;
        info!(uid = %session.uid, "Signed up");
        Ok(session)
    }

    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self.inner.sign_in(email, password).await?;
        info!(uid = %session.uid, "Signed in");
        Ok(session)
    }

    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.inner.sign_out().await
    }

    pub fn current(&self) -> Option<Session> {
        self.inner.current()
    }

    /// Raw receiver for callers that prefer to await changes themselves.
    pub fn watch(&self) -> watch::Receiver<Option<Session>> {
        self.inner.session_changes()
    }

    /// Registers `callback` for session changes.
    ///
    /// The callback runs once with the current session before this returns, then from a
    /// background task on every later change until the [`Subscription`] is dropped or
    /// [`unsubscribe`](Subscription::unsubscribe)d. Changes that land while the callback is
    /// still running are coalesced: it sees the latest session, not each step.
    pub fn subscribe<F>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(Option<Session>) + Send + 'static,
    {
        let mut changes = self.inner.session_changes();
        let current = changes.borrow_and_update().clone();
        callback(current);

        let handle = tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let session = changes.borrow_and_update().clone();
                callback(session);
            }
            debug!("Account service closed, subscription ended");
        });
        Subscription { handle }
    }
}

/// Handle returned by [`SessionGate::subscribe`]. Dropping it stops notifications.
#[must_use = "dropping a Subscription stops its notifications"]
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Stops notifications. Same as dropping the handle.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// `false` once the account service has shut down.
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
