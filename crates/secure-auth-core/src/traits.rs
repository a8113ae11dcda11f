//! The seam between the dialog logic and whatever draws it.
//!
//! The controller never talks to a windowing toolkit directly. A
//! [`DialogHost`] delivers discrete UI events and carries out the primitive
//! display commands the controller asks for. Implementations:
//!
//! - a native toolkit (not part of this workspace)
//! - a terminal host for command-line use
//! - a scripted mock for tests
//!
//! All calls happen on the thread that owns the host's event loop.

use std::fmt;

use zeroize::Zeroizing;

/// Controls on the authentication dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    /// The text field the secret is typed into.
    SecretInput,
    /// The "show" checkbox that reveals the secret.
    ShowSecret,
    /// The confirm button.
    Confirm,
    /// The cancel button.
    Cancel,
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlId::SecretInput => write!(f, "secret_input"),
            ControlId::ShowSecret => write!(f, "show_secret"),
            ControlId::Confirm => write!(f, "confirm"),
            ControlId::Cancel => write!(f, "cancel"),
        }
    }
}

/// Raw events as a host reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// The dialog surface exists and is about to be painted.
    DialogReady,
    /// The content of a text control changed.
    FieldChanged(ControlId),
    /// A push button was pressed.
    ButtonPressed(ControlId),
    /// A checkbox changed state.
    CheckboxToggled(ControlId),
    /// Dialog-level cancel (Escape, window close).
    CancelSignal,
}

/// How a modal presentation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalState {
    Accepted,
    Cancelled,
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalState::Accepted => write!(f, "accepted"),
            TerminalState::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Trait for the windowing layer that presents the dialog.
///
/// # Example (Mock Implementation)
///
/// ```ignore
/// struct QueueHost {
///     events: VecDeque<UiEvent>,
///     text: Vec<u16>,
/// }
///
/// impl DialogHost for QueueHost {
///     fn next_event(&mut self) -> Option<UiEvent> {
///         self.events.pop_front()
///     }
///
///     fn read_control_text(&mut self, _control: ControlId, max_len: usize) -> Zeroizing<Vec<u16>> {
///         Zeroizing::new(self.text.iter().copied().take(max_len).collect())
///     }
///
///     // ...
/// }
/// ```
pub trait DialogHost {
    /// Block until the next UI event arrives.
    ///
    /// Returns `None` once the dialog surface is gone; the driver treats
    /// that as a cancel.
    fn next_event(&mut self) -> Option<UiEvent>;

    /// Set the window title.
    fn set_caption(&mut self, caption: &str);

    /// Make a text control paint `mask` in place of each character, or the
    /// plain text when `None`.
    fn set_control_mask_char(&mut self, control: ControlId, mask: Option<char>);

    /// Limit how many UTF-16 code units a text control accepts.
    fn limit_control_length(&mut self, control: ControlId, max: usize);

    /// Move keyboard focus to a control.
    fn request_focus(&mut self, control: ControlId);

    /// Schedule a repaint of a control.
    fn invalidate_control(&mut self, control: ControlId);

    /// Read the current content of a text control.
    ///
    /// At most `max_len` code units are returned; anything past that is
    /// dropped by the host.
    fn read_control_text(&mut self, control: ControlId, max_len: usize) -> Zeroizing<Vec<u16>>;

    /// Whether a checkbox is currently checked.
    fn is_checked(&mut self, control: ControlId) -> bool;

    /// Show an error message to the user, owned by the dialog window.
    fn show_error(&mut self, message: &str);

    /// Close the dialog with the given result.
    fn end_dialog(&mut self, result: TerminalState);
}
