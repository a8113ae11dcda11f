//! The authentication dialog state machine.
//!
//! [`AuthDialogController::handle`] is the whole transition function: it
//! takes one [`DialogEvent`], updates the state, and returns the
//! [`HostCommand`]s the display layer should carry out. Nothing in here
//! touches a window, so every transition can be exercised directly.
//!
//! ```text
//!   Init ──Ready──▶ AwaitingInput ──Submit (ok)──▶ Accepted
//!     │               │   ▲    │
//!     │               │   └────┘ Submit (bad encoding) / ToggleMask / TextChanged
//!     │               └──Cancel──▶ Cancelled
//!     └──────Cancel─────────────▶ Cancelled
//! ```

use std::fmt;

use secrecy::SecretSlice;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::config::DialogConfig;
use crate::encoding::wide_to_utf8;
use crate::secret::SecretBuffer;
use crate::traits::{ControlId, TerminalState};

/// Where the dialog is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogState {
    /// Created, not yet shown.
    Init,
    /// Shown and waiting for the user.
    AwaitingInput,
    /// The user confirmed and the secret converted cleanly.
    Accepted,
    /// The user backed out.
    Cancelled,
}

impl DialogState {
    /// The terminal result, if this state is terminal.
    pub fn terminal(self) -> Option<TerminalState> {
        match self {
            DialogState::Accepted => Some(TerminalState::Accepted),
            DialogState::Cancelled => Some(TerminalState::Cancelled),
            DialogState::Init | DialogState::AwaitingInput => None,
        }
    }
}

impl fmt::Display for DialogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogState::Init => write!(f, "init"),
            DialogState::AwaitingInput => write!(f, "awaiting_input"),
            DialogState::Accepted => write!(f, "accepted"),
            DialogState::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Events the controller understands.
///
/// Text is carried as UTF-16 code units in zeroizing storage; it is read from
/// the host by whoever drives the controller.
pub enum DialogEvent {
    /// The host finished creating the dialog.
    Ready,
    /// The input control now holds this text.
    TextChanged(Zeroizing<Vec<u16>>),
    /// The "show" checkbox changed; `reveal` is its new checked state.
    ToggleMaskRequested { reveal: bool },
    /// The confirm button was pressed with this text in the input control.
    SubmitRequested(Zeroizing<Vec<u16>>),
    /// Cancel button or dialog-level cancel.
    CancelRequested,
}

impl DialogEvent {
    fn name(&self) -> &'static str {
        match self {
            DialogEvent::Ready => "ready",
            DialogEvent::TextChanged(_) => "text_changed",
            DialogEvent::ToggleMaskRequested { .. } => "toggle_mask",
            DialogEvent::SubmitRequested(_) => "submit",
            DialogEvent::CancelRequested => "cancel",
        }
    }
}

// Manual Debug implementation to avoid exposing the secret
impl fmt::Debug for DialogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogEvent::TextChanged(_) => f.write_str("TextChanged([REDACTED])"),
            DialogEvent::SubmitRequested(_) => f.write_str("SubmitRequested([REDACTED])"),
            DialogEvent::ToggleMaskRequested { reveal } => f
                .debug_struct("ToggleMaskRequested")
                .field("reveal", reveal)
                .finish(),
            DialogEvent::Ready => f.write_str("Ready"),
            DialogEvent::CancelRequested => f.write_str("CancelRequested"),
        }
    }
}

/// A display or control operation for the host to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    SetCaption(String),
    LimitText { control: ControlId, max: usize },
    SetMaskChar { control: ControlId, mask: Option<char> },
    Invalidate(ControlId),
    Focus(ControlId),
    ShowError(String),
    End(TerminalState),
}

/// State machine that collects one secret from the user.
///
/// One controller serves one presentation. After a terminal state is
/// reached the caller reads the secret once with
/// [`take_secret`](Self::take_secret); the controller keeps no copy.
///
/// # Example
///
/// ```
/// use secrecy::ExposeSecret;
/// use secure_auth_core::controller::{AuthDialogController, DialogEvent, DialogState};
/// use secure_auth_core::encoding::utf8_to_wide;
///
/// let mut dialog = AuthDialogController::new(Some("notes.txt"));
/// dialog.handle(DialogEvent::Ready);
/// assert_eq!(dialog.caption(), "authentication (notes.txt)");
///
/// dialog.handle(DialogEvent::SubmitRequested(utf8_to_wide("secret")));
/// assert_eq!(dialog.state(), DialogState::Accepted);
///
/// let secret = dialog.take_secret().unwrap();
/// assert_eq!(secret.expose_secret(), b"secret");
/// assert!(dialog.take_secret().is_none());
/// ```
pub struct AuthDialogController {
    label: String,
    context: Option<String>,
    caption: String,
    state: DialogState,
    buffer: SecretBuffer,
    outcome: Option<SecretSlice<u8>>,
}

impl AuthDialogController {
    /// Create a controller with default settings.
    ///
    /// `context` is shown next to the caption label, typically a file name.
    pub fn new(context: Option<&str>) -> Self {
        Self::with_config(context, &DialogConfig::default())
    }

    /// Create a controller using the given dialog settings.
    pub fn with_config(context: Option<&str>, config: &DialogConfig) -> Self {
        Self {
            label: config.caption_label.clone(),
            context: context.filter(|c| !c.is_empty()).map(str::to_owned),
            caption: String::new(),
            state: DialogState::Init,
            buffer: SecretBuffer::with_limit(config.max_input_len, config.mask_char),
            outcome: None,
        }
    }

    /// Apply one event and return what the host should do.
    pub fn handle(&mut self, event: DialogEvent) -> Vec<HostCommand> {
        let from = self.state;
        let name = event.name();

        let commands = match (self.state, event) {
            (DialogState::Init, DialogEvent::Ready) => self.on_ready(),
            (DialogState::Init | DialogState::AwaitingInput, DialogEvent::CancelRequested) => {
                self.on_cancel()
            }
            (DialogState::AwaitingInput, DialogEvent::TextChanged(text)) => {
                self.buffer.set_text(&text);
                Vec::new()
            }
            (DialogState::AwaitingInput, DialogEvent::ToggleMaskRequested { reveal }) => {
                self.on_toggle_mask(reveal)
            }
            (DialogState::AwaitingInput, DialogEvent::SubmitRequested(text)) => {
                self.on_submit(&text)
            }
            (state, _) => {
                debug!(state = %state, event = name, "Ignoring event");
                return Vec::new();
            }
        };

        if from != self.state {
            debug!(from = %from, to = %self.state, event = name, "Dialog state changed");
        }
        commands
    }

    fn on_ready(&mut self) -> Vec<HostCommand> {
        self.caption = match &self.context {
            Some(context) => format!("{} ({})", self.label, context),
            None => self.label.clone(),
        };
        self.state = DialogState::AwaitingInput;

        vec![
            HostCommand::SetCaption(self.caption.clone()),
            HostCommand::LimitText {
                control: ControlId::SecretInput,
                max: self.buffer.max_len(),
            },
            HostCommand::SetMaskChar {
                control: ControlId::SecretInput,
                mask: self.buffer.display_mask(),
            },
            HostCommand::Focus(ControlId::SecretInput),
        ]
    }

    fn on_toggle_mask(&mut self, reveal: bool) -> Vec<HostCommand> {
        // Only flip when the checkbox and the buffer disagree; repeated
        // notifications for the same checkbox state are harmless.
        if self.buffer.is_masked() == reveal {
            self.buffer.toggle_mask();
        }

        vec![
            HostCommand::SetMaskChar {
                control: ControlId::SecretInput,
                mask: self.buffer.display_mask(),
            },
            HostCommand::Invalidate(ControlId::SecretInput),
            HostCommand::Focus(ControlId::SecretInput),
        ]
    }

    fn on_submit(&mut self, text: &[u16]) -> Vec<HostCommand> {
        self.buffer.set_text(text);
        let units = self.buffer.consume();

        match wide_to_utf8(&units) {
            Ok(mut utf8) => {
                self.outcome = Some(SecretSlice::from(std::mem::take(&mut *utf8)));
                self.state = DialogState::Accepted;
                vec![HostCommand::End(TerminalState::Accepted)]
            }
            Err(err) => {
                warn!(error = %err.diagnostic(), "Secret could not be converted, staying open");
                vec![HostCommand::ShowError(err.to_string())]
            }
        }
    }

    fn on_cancel(&mut self) -> Vec<HostCommand> {
        self.buffer.clear();
        self.state = DialogState::Cancelled;
        vec![HostCommand::End(TerminalState::Cancelled)]
    }

    /// Take the UTF-8 secret.
    ///
    /// Returns `Some` exactly once after the dialog was accepted, `None` in
    /// every other case. All secret storage is wiped by this call.
    pub fn take_secret(&mut self) -> Option<SecretSlice<u8>> {
        self.buffer.clear();
        self.outcome.take()
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    /// The terminal result, once there is one.
    pub fn terminal_state(&self) -> Option<TerminalState> {
        self.state.terminal()
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal_state().is_some()
    }

    /// Window caption; empty until the dialog is ready.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Maximum secret length in UTF-16 code units.
    pub fn max_input_len(&self) -> usize {
        self.buffer.max_len()
    }

    /// Current display policy of the secret field.
    pub fn is_masked(&self) -> bool {
        self.buffer.is_masked()
    }

    /// Whether an unretrieved secret is being held.
    pub fn has_secret(&self) -> bool {
        self.outcome.is_some()
    }
}

// Manual Debug implementation to avoid exposing the secret
impl fmt::Debug for AuthDialogController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthDialogController")
            .field("caption", &self.caption)
            .field("state", &self.state)
            .field("buffer", &self.buffer)
            .field("outcome", &self.outcome.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
