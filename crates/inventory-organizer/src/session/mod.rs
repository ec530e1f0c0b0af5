//! # Session Gate
//!
//! Wraps the account service: sign-up, sign-in, sign-out and an observer registration
//! that reports the current session and every later change.
//!
//! ## Usage
//!
//! ```rust
//! use inventory_organizer::session;
//! use std::sync::{Arc, Mutex};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, gate) = session::new(8);
//!     tokio::spawn(actor.run());
//!
//!     let seen = Arc::new(Mutex::new(Vec::new()));
//!     let sink = Arc::clone(&seen);
//!     let subscription = gate.subscribe(move |s| sink.lock().unwrap().push(s.is_some()));
//!
//!     // The callback already ran once, with "signed out".
//!     assert_eq!(*seen.lock().unwrap(), vec![false]);
//!
//!     gate.sign_up("ada@example.com", "analytical").await?;
//!     subscription.unsubscribe();
//!     Ok(())
//! }
//! ```

pub mod gate;

pub use gate::*;

use cloud_framework::account::AccountActor;

/// Creates the account service actor and a gate bound to it.
pub fn new(buffer_size: usize) -> (AccountActor, SessionGate) {
    let (actor, client) = AccountActor::new(buffer_size);
    (actor, SessionGate::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloud_framework::account::AuthError;

    fn spawn() -> SessionGate {
        let (actor, gate) = new(8);
        tokio::spawn(actor.run());
        gate
    }

    #[tokio::test]
    async fn current_follows_sign_in_and_out() {
        let gate = spawn();
        assert_eq!(gate.current(), None);

        let session = gate.sign_up("ada@example.com", "analytical").await.unwrap();
        assert_eq!(gate.current(), Some(session.clone()));
        assert_eq!(*gate.watch().borrow(), Some(session));

        gate.sign_out().await.unwrap();
        assert_eq!(gate.current(), None);
    }

    #[tokio::test]
    async fn errors_carry_user_messages() {
        let gate = spawn();
        let err = gate.sign_in("ada@example.com", "analytical").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredential);
        assert_eq!(err.to_string(), "Invalid email or password.");
    }

    #[tokio::test]
    async fn subscription_ends_when_service_stops() {
        let (actor, gate) = new(8);
        let service = tokio::spawn(actor.run());
        let subscription = gate.subscribe(|_| {});
        assert!(subscription.is_active());

        // The actor exits once every client, including the gate's, is gone.
        drop(gate);
        service.await.unwrap();
        for _ in 0..10 {
            if !subscription.is_active() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(!subscription.is_active());
    }
}
