use super::actor::AccountRequest;
use super::error::AuthError;
use super::session::Session;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, instrument};

/// Client for the account service.
///
/// Cloneable; every clone shares the same session channel.
#[derive(Clone)]
pub struct AccountClient {
    sender: mpsc::Sender<AccountRequest>,
    sessions: watch::Receiver<Option<Session>>,
}

impl AccountClient {
    pub fn new(
        sender: mpsc::Sender<AccountRequest>,
        sessions: watch::Receiver<Option<Session>>,
    ) -> Self {
        Self { sender, sessions }
    }

    /// Registers a new account and signs it in.
    #[instrument(skip(self, password))]
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(AccountRequest::SignUp {
            email: email.to_string(),
            password: password.to_string(),
            respond_to,
        })
        .await?;
        response.await.map_err(|_| AuthError::ServiceDropped)?
    }

    /// Signs in an existing account.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(AccountRequest::SignIn {
            email: email.to_string(),
            password: password.to_string(),
            respond_to,
        })
        .await?;
        response.await.map_err(|_| AuthError::ServiceDropped)?
    }

    /// Clears the current session. Succeeds when no one is signed in.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.send(AccountRequest::SignOut { respond_to }).await?;
        response.await.map_err(|_| AuthError::ServiceDropped)?
    }

    /// The session as of now.
    pub fn current(&self) -> Option<Session> {
        self.sessions.borrow().clone()
    }

    /// A fresh receiver for session changes. Its first `borrow` yields the current value.
    pub fn session_changes(&self) -> watch::Receiver<Option<Session>> {
        self.sessions.clone()
    }

    async fn send(&self, request: AccountRequest) -> Result<(), AuthError> {
        self.sender
            .send(request)
            .await
            .map_err(|_| AuthError::ServiceClosed)
    }
}
