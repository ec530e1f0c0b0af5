//! # Account Service
//!
//! Email/password accounts and the current session, run as an actor.
//!
//! ## Structure
//!
//! - [`actor`] - [`AccountActor`], the request loop and credential rules
//! - [`client`] - [`AccountClient`], the cloneable handle
//! - [`error`] - [`AuthError`], user-presentable failures
//! - [`session`] - [`Session`] and [`UserId`]
//!
//! ## Usage
//!
//! ```rust
//! use cloud_framework::account::AccountActor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = AccountActor::new(8);
//!     tokio::spawn(actor.run());
//!
//!     let session = client.sign_up("ada@example.com", "analytical").await?;
//!     assert_eq!(client.current(), Some(session));
//!
//!     client.sign_out().await?;
//!     assert_eq!(client.current(), None);
//!     Ok(())
//! }
//! ```
//!
//! ## Rules
//!
//! - Emails are trimmed, lower-cased and must look like `local@domain`.
//! - Passwords need at least [`MIN_PASSWORD_LEN`] characters and are stored as salted
//!   SHA-256 digests.
//! - Signing up also signs in. Only one session exists at a time.

pub mod actor;
pub mod client;
pub mod error;
pub mod session;

pub use actor::{AccountActor, AccountRequest, MIN_PASSWORD_LEN};
pub use client::AccountClient;
pub use error::AuthError;
pub use session::{Session, UserId};
