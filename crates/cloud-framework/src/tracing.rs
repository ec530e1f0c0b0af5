//! # Observability & Tracing
//!
//! Every collection and account request is logged with structured fields: the collection
//! name and document key for the store, the operation and user id for accounts. The
//! [`setup_tracing`] function installs a compact formatter driven by `RUST_LOG`.
//!
//! ```bash
//! RUST_LOG=info cargo run      # one line per write, sign-in and sign-out
//! RUST_LOG=debug cargo run     # also reads, scans and request payloads
//! RUST_LOG=cloud_framework=debug,inventory_organizer=info cargo run
//! ```
//!
//! With `RUST_LOG=info` the end-to-end demo prints lines like:
//!
//! ```text
//! INFO Signed in op="SignUp" uid=user_1
//! INFO add_item:add: Applied collection=inventory key="Widget" size=1
//! INFO add_item:add: Quantity changed name="Widget" quantity=Some(1)
//! ```

/// Initializes the global `tracing` subscriber.
///
/// Call once at process start. Module paths are hidden (`with_target(false)`) because every
/// event already carries a `collection` or `op` field.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
