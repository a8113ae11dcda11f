//! Dialog hosts for the secure-auth passphrase dialog.
//!
//! The dialog logic lives in `secure-auth-core`; this crate supplies the
//! surfaces it runs on. The `secure-auth-prompt` binary drives the
//! [`host::TerminalDialogHost`] and prints the accepted secret to stdout.

pub mod host;

pub use host::{MockDialogHost, TerminalDialogHost, UserAction};
