//! Error types for the account service.

use thiserror::Error;

/// Reasons the account service refuses a request.
///
/// The `Display` text is meant to be shown to the user as-is.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The email address is not of the form `local@domain`.
    #[error("The email address {0:?} is badly formatted.")]
    InvalidEmail(String),

    /// The password is shorter than the minimum length.
    #[error("Password should be at least {min} characters.")]
    WeakPassword { min: usize },

    /// Sign-up for an address that already has an account.
    #[error("An account already exists for {0}.")]
    EmailAlreadyInUse(String),

    /// Unknown email or wrong password. The two cases are not told apart.
    #[error("Invalid email or password.")]
    InvalidCredential,

    /// The account service is no longer running.
    #[error("Account service unavailable")]
    ServiceClosed,

    /// The account service dropped the reply.
    #[error("Account service dropped response channel")]
    ServiceDropped,
}
