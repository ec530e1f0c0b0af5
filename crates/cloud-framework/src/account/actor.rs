//! # Account Actor
//!
//! Server side of the account service: registered credentials plus the single current
//! session of this client. Session changes are published on a `watch` channel so any
//! number of observers see the latest value.

use super::client::AccountClient;
use super::error::AuthError;
use super::session::{Session, UserId};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Type alias for the one-shot response channel used by the account service.
pub type AuthResponse<T> = oneshot::Sender<Result<T, AuthError>>;

/// Requests understood by the [`AccountActor`].
#[derive(Debug)]
pub enum AccountRequest {
    SignUp {
        email: String,
        password: String,
        respond_to: AuthResponse<Session>,
    },
    SignIn {
        email: String,
        password: String,
        respond_to: AuthResponse<Session>,
    },
    SignOut {
        respond_to: AuthResponse<()>,
    },
}

struct Account {
    uid: UserId,
    salt: [u8; 16],
    digest: Vec<u8>,
}

impl Account {
    fn matches(&self, password: &str) -> bool {
        password_digest(&self.salt, password) == self.digest
    }
}

fn password_digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

/// Normalizes and checks an email address.
fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(AuthError::InvalidEmail(email))
    }
}

/// The account service actor.
pub struct AccountActor {
    receiver: mpsc::Receiver<AccountRequest>,
    accounts: HashMap<String, Account>,
    sessions: watch::Sender<Option<Session>>,
    next_id: u32,
}

impl AccountActor {
    /// Creates the actor and its client. No one is signed in initially.
    pub fn new(buffer_size: usize) -> (Self, AccountClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (sessions, session_rx) = watch::channel(None);
        let actor = Self {
            receiver,
            accounts: HashMap::new(),
            sessions,
            next_id: 1,
        };
        (actor, AccountClient::new(sender, session_rx))
    }

    /// Runs the request loop until every client has been dropped.
    pub async fn run(mut self) {
        info!("Account service started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                AccountRequest::SignUp {
                    email,
                    password,
                    respond_to,
                } => {
                    let result = self.sign_up(&email, &password);
                    self.finish("SignUp", result, respond_to);
                }
                AccountRequest::SignIn {
                    email,
                    password,
                    respond_to,
                } => {
                    let result = self.sign_in(&email, &password);
                    self.finish("SignIn", result, respond_to);
                }
                AccountRequest::SignOut { respond_to } => {
                    let previous = self.sessions.send_replace(None);
                    info!(uid = ?previous.map(|s| s.uid), "Signed out");
                    let _ = respond_to.send(Ok(()));
                }
            }
        }

        info!(accounts = self.accounts.len(), "Account service shutdown");
    }

    fn finish(
        &self,
        op: &'static str,
        result: Result<Session, AuthError>,
        respond_to: AuthResponse<Session>,
    ) {
        match &result {
            Ok(session) => {
                info!(op, uid = %session.uid, "Signed in");
                self.sessions.send_replace(Some(session.clone()));
            }
            Err(e) => warn!(op, error = %e, "Rejected"),
        }
        let _ = respond_to.send(result);
    }

    fn sign_up(&mut self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword {
                min: MIN_PASSWORD_LEN,
            });
        }
        if self.accounts.contains_key(&email) {
            return Err(AuthError::EmailAlreadyInUse(email));
        }

        let uid = UserId::from(self.next_id);
        self.next_id += 1;
        let salt: [u8; 16] = rand::random();
        let digest = password_digest(&salt, password);
        self.accounts.insert(email.clone(), Account { uid, salt, digest });
        debug!(%uid, accounts = self.accounts.len(), "Account created");

        Ok(Session { uid, email })
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalize_email(email)?;
        match self.accounts.get(&email) {
            Some(account) if account.matches(password) => Ok(Session {
                uid: account.uid,
                email,
            }),
            _ => Err(AuthError::InvalidCredential),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email(" Ada@Example.com ").unwrap(), "ada@example.com");
        for bad in ["", "ada", "@example.com", "ada@", "a@b@c", "a da@example.com"] {
            assert!(
                matches!(normalize_email(bad), Err(AuthError::InvalidEmail(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn digest_depends_on_salt() {
        let a = password_digest(&[0; 16], "hunter22");
        let b = password_digest(&[1; 16], "hunter22");
        assert_ne!(a, b);
        assert_eq!(a, password_digest(&[0; 16], "hunter22"));
    }
}
