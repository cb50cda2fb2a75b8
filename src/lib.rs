//! # Sessiongate (session-gated web front-end)
//!
//! `sessiongate` renders a home page whose content depends on server-checked
//! session state. Authentication itself (credential checks, the OAuth
//! handshake, session issuance and storage) belongs to an external
//! better-auth compatible service reached over HTTP.
//!
//! ## Flow
//!
//! - `GET /` forwards the caller's cookies to the auth service, waits for the
//!   session lookup and renders either the signed-in summary with a sign-out
//!   control or a sign-in control.
//! - `POST /sign-out` asks the auth service to terminate the session and
//!   redirects to `/sign-in` once it confirms.
//!
//! Lookup failures degrade to the signed-out view; only a misconfigured
//! provider surfaces as a server error.

pub mod auth;
pub mod cli;
pub mod sessiongate;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
