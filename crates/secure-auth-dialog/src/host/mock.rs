//! Scripted dialog host for testing.
//!
//! This module provides a [`DialogHost`] that replays a list of user actions
//! against a simulated input field and checkbox, and records every command
//! the controller issues. It needs no display server.

use std::collections::VecDeque;

use secure_auth_core::secret::bounded_len;
use secure_auth_core::{ControlId, DialogHost, TerminalState, UiEvent};
use zeroize::{Zeroize, Zeroizing};

/// One thing the simulated user does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Replace the field content with this text.
    Type(String),
    /// Replace the field content with raw UTF-16 units (may be malformed).
    TypeWide(Vec<u16>),
    /// Click the "show" checkbox.
    ToggleShow,
    /// Press the confirm button.
    Confirm,
    /// Press the cancel button.
    Cancel,
    /// Escape or window close.
    Close,
}

/// A mock dialog host for testing.
///
/// The first event is always [`UiEvent::DialogReady`]; after that the
/// scripted actions are replayed in order. Once the script is exhausted
/// [`next_event`](DialogHost::next_event) returns `None`.
///
/// # Example
///
/// ```
/// use secrecy::ExposeSecret;
/// use secure_auth_core::{present_modal, AuthDialogController, TerminalState};
/// use secure_auth_dialog::host::MockDialogHost;
///
/// let mut host = MockDialogHost::new().typing("hmac-key").confirming();
/// let mut dialog = AuthDialogController::new(Some("notes.txt"));
///
/// assert_eq!(present_modal(&mut host, &mut dialog), TerminalState::Accepted);
/// assert_eq!(host.caption(), "authentication (notes.txt)");
/// assert_eq!(dialog.take_secret().unwrap().expose_secret(), b"hmac-key");
/// ```
#[derive(Default)]
pub struct MockDialogHost {
    script: VecDeque<UserAction>,
    ready_sent: bool,
    field: Zeroizing<Vec<u16>>,
    show_checked: bool,
    caption: String,
    mask_char: Option<char>,
    limit: Option<usize>,
    focus_requests: usize,
    invalidations: usize,
    read_limits: Vec<usize>,
    errors: Vec<String>,
    ended: Option<TerminalState>,
}

impl MockDialogHost {
    /// Create a host with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host that replays the given actions.
    pub fn with_actions(actions: impl IntoIterator<Item = UserAction>) -> Self {
        Self {
            script: actions.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Append an action to the script.
    pub fn then(mut self, action: UserAction) -> Self {
        self.script.push_back(action);
        self
    }

    /// Append typing `text` into the secret field.
    pub fn typing(self, text: impl Into<String>) -> Self {
        self.then(UserAction::Type(text.into()))
    }

    /// Append pressing the confirm button.
    pub fn confirming(self) -> Self {
        self.then(UserAction::Confirm)
    }

    /// Append pressing the cancel button.
    pub fn cancelling(self) -> Self {
        self.then(UserAction::Cancel)
    }

    /// Caption most recently set by the controller.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Mask glyph currently applied to the secret field.
    pub fn mask_char(&self) -> Option<char> {
        self.mask_char
    }

    /// Length limit applied to the secret field, if any.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn focus_requests(&self) -> usize {
        self.focus_requests
    }

    pub fn invalidations(&self) -> usize {
        self.invalidations
    }

    /// `max_len` of every `read_control_text` call, in order.
    pub fn read_limits(&self) -> &[usize] {
        &self.read_limits
    }

    /// Messages passed to `show_error`, in order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Result passed to `end_dialog`, if it was called.
    pub fn ended(&self) -> Option<TerminalState> {
        self.ended
    }

    /// Actions not yet replayed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    fn fill_field(&mut self, units: &[u16]) {
        self.field.zeroize();
        // A real edit control refuses keystrokes past its limit.
        let len = self.limit.map_or(units.len(), |limit| bounded_len(units, limit));
        self.field.extend_from_slice(&units[..len]);
    }
}

impl DialogHost for MockDialogHost {
    fn next_event(&mut self) -> Option<UiEvent> {
        if !self.ready_sent {
            self.ready_sent = true;
            return Some(UiEvent::DialogReady);
        }

        let event = match self.script.pop_front()? {
            UserAction::Type(mut text) => {
                let units: Zeroizing<Vec<u16>> = Zeroizing::new(text.encode_utf16().collect());
                text.zeroize();
                self.fill_field(&units);
                UiEvent::FieldChanged(ControlId::SecretInput)
            }
            UserAction::TypeWide(mut units) => {
                self.fill_field(&units);
                units.zeroize();
                UiEvent::FieldChanged(ControlId::SecretInput)
            }
            UserAction::ToggleShow => {
                self.show_checked = !self.show_checked;
                UiEvent::CheckboxToggled(ControlId::ShowSecret)
            }
            UserAction::Confirm => UiEvent::ButtonPressed(ControlId::Confirm),
            UserAction::Cancel => UiEvent::ButtonPressed(ControlId::Cancel),
            UserAction::Close => UiEvent::CancelSignal,
        };
        Some(event)
    }

    fn set_caption(&mut self, caption: &str) {
        self.caption = caption.to_string();
    }

    fn set_control_mask_char(&mut self, _control: ControlId, mask: Option<char>) {
        self.mask_char = mask;
    }

    fn limit_control_length(&mut self, _control: ControlId, max: usize) {
        self.limit = Some(max);
    }

    fn request_focus(&mut self, _control: ControlId) {
        self.focus_requests += 1;
    }

    fn invalidate_control(&mut self, _control: ControlId) {
        self.invalidations += 1;
    }

    fn read_control_text(&mut self, _control: ControlId, max_len: usize) -> Zeroizing<Vec<u16>> {
        self.read_limits.push(max_len);
        Zeroizing::new(self.field.iter().copied().take(max_len).collect())
    }

    fn is_checked(&mut self, control: ControlId) -> bool {
        control == ControlId::ShowSecret && self.show_checked
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn end_dialog(&mut self, result: TerminalState) {
        self.ended = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use secure_auth_core::{present_modal, AuthDialogController, DialogConfig, MAX_INPUT_LEN};

    #[test]
    fn mock_returns_typed_secret() {
        let mut host = MockDialogHost::new().typing("secret").confirming();
        let mut dialog = AuthDialogController::new(None);

        assert_eq!(present_modal(&mut host, &mut dialog), TerminalState::Accepted);
        assert_eq!(host.ended(), Some(TerminalState::Accepted));
        assert_eq!(host.caption(), "authentication");
        assert_eq!(dialog.take_secret().unwrap().expose_secret(), b"secret");
        assert!(dialog.take_secret().is_none());
    }

    #[test]
    fn mock_applies_initial_setup() {
        let mut host = MockDialogHost::new().cancelling();
        let mut dialog = AuthDialogController::new(Some("notes.txt"));

        present_modal(&mut host, &mut dialog);

        assert_eq!(host.caption(), "authentication (notes.txt)");
        assert_eq!(host.mask_char(), Some('*'));
        assert_eq!(host.limit(), Some(MAX_INPUT_LEN));
        assert_eq!(host.focus_requests(), 1);
    }

    #[test]
    fn mock_cancel_before_submit() {
        let mut host = MockDialogHost::new().typing("half-typed").cancelling();
        let mut dialog = AuthDialogController::new(None);

        assert_eq!(present_modal(&mut host, &mut dialog), TerminalState::Cancelled);
        assert_eq!(host.ended(), Some(TerminalState::Cancelled));
        assert_eq!(host.read_limits().len(), 1);
        assert!(dialog.take_secret().is_none());
    }

    #[test]
    fn mock_close_cancels() {
        let mut host = MockDialogHost::with_actions([UserAction::Close, UserAction::Confirm]);
        let mut dialog = AuthDialogController::new(None);

        assert_eq!(present_modal(&mut host, &mut dialog), TerminalState::Cancelled);
        assert_eq!(host.remaining(), 1);
    }

    #[test]
    fn mock_empty_script_cancels() {
        let mut host = MockDialogHost::new();
        let mut dialog = AuthDialogController::new(None);

        assert_eq!(present_modal(&mut host, &mut dialog), TerminalState::Cancelled);
        assert_eq!(host.ended(), Some(TerminalState::Cancelled));
    }

    #[test]
    fn mock_malformed_input_shows_error_then_retries() {
        let mut host = MockDialogHost::new()
            .then(UserAction::TypeWide(vec![0x73, 0xD800]))
            .confirming()
            .typing("fixed")
            .confirming();
        let mut dialog = AuthDialogController::new(None);

        assert_eq!(present_modal(&mut host, &mut dialog), TerminalState::Accepted);
        assert_eq!(host.errors(), ["failed to convert text to UTF-8".to_string()]);
        assert_eq!(dialog.take_secret().unwrap().expose_secret(), b"fixed");
    }

    #[test]
    fn mock_retry_without_retyping() {
        // The field keeps its content after a failed submit, so the user can
        // fix only the bad part.
        let mut host = MockDialogHost::new()
            .then(UserAction::TypeWide(vec![0x61, 0xDC00]))
            .confirming()
            .then(UserAction::Cancel);
        let mut dialog = AuthDialogController::new(None);

        assert_eq!(present_modal(&mut host, &mut dialog), TerminalState::Cancelled);
        assert_eq!(host.errors().len(), 1);
        assert_eq!(host.read_limits().len(), 2);
    }

    #[test]
    fn mock_toggle_show_reveals_and_remasks() {
        let mut host = MockDialogHost::new()
            .typing("peek")
            .then(UserAction::ToggleShow)
            .confirming();
        let mut dialog = AuthDialogController::new(None);

        present_modal(&mut host, &mut dialog);
        assert_eq!(host.mask_char(), None);
        assert_eq!(host.invalidations(), 1);
        // Initial focus plus one refocus after the toggle.
        assert_eq!(host.focus_requests(), 2);
        assert_eq!(dialog.take_secret().unwrap().expose_secret(), b"peek");

        let mut host = MockDialogHost::new()
            .then(UserAction::ToggleShow)
            .then(UserAction::ToggleShow)
            .cancelling();
        let mut dialog = AuthDialogController::new(None);

        present_modal(&mut host, &mut dialog);
        assert_eq!(host.mask_char(), Some('*'));
        assert!(dialog.is_masked());
    }

    #[test]
    fn mock_field_limit_truncates_typing() {
        let config = DialogConfig {
            max_input_len: 3,
            ..DialogConfig::default()
        };
        let mut host = MockDialogHost::new().typing("abcdef").confirming();
        let mut dialog = AuthDialogController::with_config(None, &config);

        present_modal(&mut host, &mut dialog);
        assert_eq!(host.read_limits(), [4, 4]);
        assert_eq!(dialog.take_secret().unwrap().expose_secret(), b"abc");
    }

    #[test]
    fn mock_field_limit_keeps_surrogate_pairs_whole() {
        let config = DialogConfig {
            max_input_len: 4,
            ..DialogConfig::default()
        };
        let mut host = MockDialogHost::new().typing("abc\u{1F511}").confirming();
        let mut dialog = AuthDialogController::with_config(None, &config);

        assert_eq!(present_modal(&mut host, &mut dialog), TerminalState::Accepted);
        assert!(host.errors().is_empty());
        assert_eq!(dialog.take_secret().unwrap().expose_secret(), b"abc");
    }
}
