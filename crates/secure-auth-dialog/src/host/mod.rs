//! Dialog host implementations.
//!
//! This module provides implementations of the [`DialogHost`] trait:
//!
//! - [`TerminalDialogHost`]: line-oriented prompt on the controlling terminal
//! - [`MockDialogHost`]: scripted host for testing
//!
//! Both implement the [`DialogHost`] trait from `secure-auth-core`.
//!
//! [`DialogHost`]: secure_auth_core::DialogHost

mod mock;
mod terminal;

pub use mock::{MockDialogHost, UserAction};
pub use terminal::TerminalDialogHost;
