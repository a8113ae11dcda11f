//! Core types for secure-auth.
//!
//! This crate provides the building blocks for collecting an authentication
//! secret (such as an HMAC key) from a user inside an editor plugin, and the
//! error vocabulary the rest of the plugin shares. It is intentionally
//! UI-agnostic to allow:
//!
//! - Unit tests without a display server
//! - Different hosts (native dialog, terminal, scripted mock)
//!
//! # Modules
//!
//! - [`error`]: Three-tier error taxonomy (`UnexpectedError`, `ValidationError`, `InformationalError`)
//! - [`secret`]: Bounded, maskable secret storage (`SecretBuffer`)
//! - [`encoding`]: Wide (UTF-16) to UTF-8 conversion
//! - [`controller`]: The dialog state machine (`AuthDialogController`)
//! - [`traits`]: The host seam (`DialogHost`, `UiEvent`, `ControlId`)
//! - [`modal`]: Drives a controller on a host until it finishes
//! - [`config`]: TOML configuration
//!
//! # Example
//!
//! ```
//! use secrecy::ExposeSecret;
//! use secure_auth_core::{AuthDialogController, DialogEvent, DialogState};
//! use secure_auth_core::encoding::utf8_to_wide;
//!
//! let mut dialog = AuthDialogController::new(None);
//! dialog.handle(DialogEvent::Ready);
//! dialog.handle(DialogEvent::SubmitRequested(utf8_to_wide("hmac-key")));
//!
//! assert_eq!(dialog.state(), DialogState::Accepted);
//! assert_eq!(dialog.take_secret().unwrap().expose_secret(), b"hmac-key");
//! ```

pub mod config;
pub mod controller;
pub mod encoding;
pub mod error;
pub mod modal;
pub mod secret;
pub mod traits;

// Re-export commonly used types at the crate root for convenience
pub use config::{Config, ConfigError, DialogConfig};
pub use controller::{AuthDialogController, DialogEvent, DialogState, HostCommand};
pub use error::{
    InfoKind, InformationalError, PluginError, Result, Tier, UnexpectedError, UnexpectedKind,
    ValidationError, ValidationKind,
};
pub use modal::present_modal;
pub use secret::{SecretBuffer, MAX_INPUT_LEN};
pub use traits::{ControlId, DialogHost, TerminalState, UiEvent};
