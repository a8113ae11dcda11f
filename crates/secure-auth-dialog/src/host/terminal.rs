//! Terminal dialog host for headless systems.
//!
//! This module provides a line-oriented [`DialogHost`]: the caption becomes
//! the prompt, the secret is read without echo through `rpassword` while
//! masked, and errors go to the error stream. An empty line presses cancel;
//! end of input closes the dialog.

use std::io::{self, BufRead, Write};

use secure_auth_core::encoding::utf8_to_wide;
use secure_auth_core::secret::bounded_len;
use secure_auth_core::{ControlId, DialogHost, TerminalState, UiEvent};
use tracing::{debug, warn};
use zeroize::{Zeroize, Zeroizing};

/// Terminal-based dialog host.
///
/// By default it reads from the controlling terminal and writes prompts and
/// errors to stderr, keeping stdout free for the secret itself.
pub struct TerminalDialogHost {
    input: Option<Box<dyn BufRead>>,
    output: Box<dyn Write>,
    ready_sent: bool,
    reveal_requested: bool,
    reveal_sent: bool,
    show_checked: bool,
    caption: String,
    masked: bool,
    limit: Option<usize>,
    field: Zeroizing<Vec<u16>>,
    ended: Option<TerminalState>,
}

impl TerminalDialogHost {
    /// Create a host bound to the terminal.
    pub fn new() -> Self {
        Self::build(None, Box::new(io::stderr()))
    }

    /// Create a host reading lines from `input` and writing to `output`.
    pub fn with_io(input: impl BufRead + 'static, output: impl Write + 'static) -> Self {
        Self::build(Some(Box::new(input)), Box::new(output))
    }

    fn build(input: Option<Box<dyn BufRead>>, output: Box<dyn Write>) -> Self {
        Self {
            input,
            output,
            ready_sent: false,
            reveal_requested: false,
            reveal_sent: false,
            show_checked: false,
            caption: String::new(),
            masked: true,
            limit: None,
            field: Zeroizing::new(Vec::new()),
            ended: None,
        }
    }

    /// Tick the "show" checkbox right after the dialog opens, so input is
    /// echoed.
    pub fn reveal(mut self) -> Self {
        self.reveal_requested = true;
        self
    }

    /// Result passed to `end_dialog`, if it was called.
    pub fn ended(&self) -> Option<TerminalState> {
        self.ended
    }

    fn read_line(&mut self) -> io::Result<Zeroizing<String>> {
        let prompt = format!("{}: ", self.caption);

        let line = match (&mut self.input, self.masked) {
            (None, true) => rpassword::prompt_password(&prompt)?,
            (Some(reader), true) => {
                rpassword::prompt_password_from_bufread(reader, &mut self.output, &prompt)?
            }
            (None, false) => {
                self.output.write_all(prompt.as_bytes())?;
                self.output.flush()?;
                read_echoed(&mut io::stdin().lock())?
            }
            (Some(reader), false) => {
                self.output.write_all(prompt.as_bytes())?;
                self.output.flush()?;
                read_echoed(reader)?
            }
        };
        Ok(Zeroizing::new(line))
    }
}

/// Read one visible line, without its line ending.
fn read_echoed(reader: &mut dyn BufRead) -> io::Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"));
    }
    let trimmed = line.trim_end_matches(['\r', '\n']).to_string();
    line.zeroize();
    Ok(trimmed)
}

impl Default for TerminalDialogHost {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogHost for TerminalDialogHost {
    fn next_event(&mut self) -> Option<UiEvent> {
        if self.ended.is_some() {
            return None;
        }
        if !self.ready_sent {
            self.ready_sent = true;
            return Some(UiEvent::DialogReady);
        }
        if self.reveal_requested && !self.reveal_sent {
            self.reveal_sent = true;
            self.show_checked = true;
            return Some(UiEvent::CheckboxToggled(ControlId::ShowSecret));
        }

        match self.read_line() {
            Ok(line) if line.is_empty() => {
                debug!("Empty input, cancelling");
                Some(UiEvent::ButtonPressed(ControlId::Cancel))
            }
            Ok(line) => {
                let units = utf8_to_wide(&line);
                self.field.zeroize();
                let len = self.limit.map_or(units.len(), |limit| bounded_len(&units, limit));
                self.field.extend_from_slice(&units[..len]);
                Some(UiEvent::ButtonPressed(ControlId::Confirm))
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                debug!("End of input");
                Some(UiEvent::CancelSignal)
            }
            Err(e) => {
                warn!(error = %e, "Failed to read secret from terminal");
                None
            }
        }
    }

    fn set_caption(&mut self, caption: &str) {
        self.caption = caption.to_string();
    }

    fn set_control_mask_char(&mut self, control: ControlId, mask: Option<char>) {
        if control == ControlId::SecretInput {
            self.masked = mask.is_some();
        }
    }

    fn limit_control_length(&mut self, control: ControlId, max: usize) {
        if control == ControlId::SecretInput {
            self.limit = Some(max);
        }
    }

    fn request_focus(&mut self, _control: ControlId) {}

    fn invalidate_control(&mut self, _control: ControlId) {}

    fn read_control_text(&mut self, control: ControlId, max_len: usize) -> Zeroizing<Vec<u16>> {
        if control != ControlId::SecretInput {
            return Zeroizing::new(Vec::new());
        }
        Zeroizing::new(self.field.iter().copied().take(max_len).collect())
    }

    fn is_checked(&mut self, control: ControlId) -> bool {
        control == ControlId::ShowSecret && self.show_checked
    }

    fn show_error(&mut self, message: &str) {
        if writeln!(self.output, "error: {}", message).is_err() {
            warn!(message = %message, "Failed to write error to terminal");
        }
    }

    fn end_dialog(&mut self, result: TerminalState) {
        self.field.zeroize();
        self.ended = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use secure_auth_core::{present_modal, AuthDialogController, DialogConfig};
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    /// Output sink the test can inspect after the host is done with it.
    #[derive(Clone, Default)]
    struct SharedOutput(Arc<Mutex<Vec<u8>>>);

    impl SharedOutput {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn can_create_terminal_host() {
        let host = TerminalDialogHost::new();
        assert!(host.ended().is_none());
    }

    #[test]
    fn reads_secret_and_prompts_with_caption() {
        let output = SharedOutput::default();
        let mut host = TerminalDialogHost::with_io(Cursor::new("hmac-key\n"), output.clone());
        let mut dialog = AuthDialogController::new(Some("notes.txt"));

        assert_eq!(present_modal(&mut host, &mut dialog), TerminalState::Accepted);
        assert_eq!(host.ended(), Some(TerminalState::Accepted));
        assert_eq!(dialog.take_secret().unwrap().expose_secret(), b"hmac-key");
        assert!(output.contents().contains("authentication (notes.txt): "));
    }

    #[test]
    fn empty_line_cancels() {
        let mut host = TerminalDialogHost::with_io(Cursor::new("\n"), SharedOutput::default());
        let mut dialog = AuthDialogController::new(None);

        assert_eq!(present_modal(&mut host, &mut dialog), TerminalState::Cancelled);
        assert!(dialog.take_secret().is_none());
    }

    #[test]
    fn end_of_input_cancels() {
        let mut host = TerminalDialogHost::with_io(Cursor::new(""), SharedOutput::default());
        let mut dialog = AuthDialogController::new(None);

        assert_eq!(present_modal(&mut host, &mut dialog), TerminalState::Cancelled);
    }

    #[test]
    fn reveal_reads_echoed_line() {
        let output = SharedOutput::default();
        let mut host =
            TerminalDialogHost::with_io(Cursor::new("visible\r\n"), output.clone()).reveal();
        let mut dialog = AuthDialogController::new(None);

        assert_eq!(present_modal(&mut host, &mut dialog), TerminalState::Accepted);
        assert!(!dialog.is_masked());
        assert_eq!(dialog.take_secret().unwrap().expose_secret(), b"visible");
        assert!(output.contents().starts_with("authentication: "));
    }

    #[test]
    fn long_line_is_cut_before_a_split_surrogate_pair() {
        let config = DialogConfig {
            max_input_len: 4,
            ..DialogConfig::default()
        };
        let output = SharedOutput::default();
        let mut host =
            TerminalDialogHost::with_io(Cursor::new("abc\u{1F511}\n"), output.clone());
        let mut dialog = AuthDialogController::with_config(None, &config);

        assert_eq!(present_modal(&mut host, &mut dialog), TerminalState::Accepted);
        assert!(!output.contents().contains("error:"));
        assert_eq!(dialog.take_secret().unwrap().expose_secret(), b"abc");
    }

    #[test]
    fn show_error_writes_to_output() {
        let output = SharedOutput::default();
        let mut host = TerminalDialogHost::with_io(Cursor::new(""), output.clone());

        host.show_error("failed to convert text to UTF-8");
        assert_eq!(output.contents(), "error: failed to convert text to UTF-8\n");
    }
}
