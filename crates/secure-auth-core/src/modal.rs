//! Modal presentation: pump host events through the controller until the
//! dialog ends.

use tracing::{debug, trace};

use crate::controller::{AuthDialogController, DialogEvent, HostCommand};
use crate::traits::{ControlId, DialogHost, TerminalState, UiEvent};

/// Present `controller` on `host` and block until it reaches a terminal
/// state.
///
/// Host events are translated into controller events, querying the host
/// for control contents where needed. When the host runs out of events the
/// dialog is treated as cancelled.
///
/// The secret stays inside the controller; read it afterwards with
/// [`AuthDialogController::take_secret`].
pub fn present_modal<H>(host: &mut H, controller: &mut AuthDialogController) -> TerminalState
where
    H: DialogHost + ?Sized,
{
    if let Some(result) = controller.terminal_state() {
        return result;
    }

    loop {
        let event = match host.next_event() {
            Some(ui_event) => match translate(host, controller, ui_event) {
                Some(event) => event,
                None => continue,
            },
            None => {
                debug!("Host closed without a result, cancelling");
                DialogEvent::CancelRequested
            }
        };

        for command in controller.handle(event) {
            apply(host, command);
        }

        if let Some(result) = controller.terminal_state() {
            debug!(result = %result, "Modal dialog finished");
            return result;
        }
    }
}

fn translate<H>(
    host: &mut H,
    controller: &AuthDialogController,
    ui_event: UiEvent,
) -> Option<DialogEvent>
where
    H: DialogHost + ?Sized,
{
    trace!(event = ?ui_event, "Host event");

    // One slot past the limit so the host never has to truncate mid-read.
    let read_len = controller.max_input_len() + 1;

    match ui_event {
        UiEvent::DialogReady => Some(DialogEvent::Ready),
        UiEvent::FieldChanged(ControlId::SecretInput) => Some(DialogEvent::TextChanged(
            host.read_control_text(ControlId::SecretInput, read_len),
        )),
        UiEvent::CheckboxToggled(ControlId::ShowSecret) => {
            Some(DialogEvent::ToggleMaskRequested {
                reveal: host.is_checked(ControlId::ShowSecret),
            })
        }
        UiEvent::ButtonPressed(ControlId::Confirm) => Some(DialogEvent::SubmitRequested(
            host.read_control_text(ControlId::SecretInput, read_len),
        )),
        UiEvent::ButtonPressed(ControlId::Cancel) | UiEvent::CancelSignal => {
            Some(DialogEvent::CancelRequested)
        }
        other => {
            trace!(event = ?other, "Unhandled host event");
            None
        }
    }
}

fn apply<H>(host: &mut H, command: HostCommand)
where
    H: DialogHost + ?Sized,
{
    match command {
        HostCommand::SetCaption(caption) => host.set_caption(&caption),
        HostCommand::LimitText { control, max } => host.limit_control_length(control, max),
        HostCommand::SetMaskChar { control, mask } => host.set_control_mask_char(control, mask),
        HostCommand::Invalidate(control) => host.invalidate_control(control),
        HostCommand::Focus(control) => host.request_focus(control),
        HostCommand::ShowError(message) => host.show_error(&message),
        HostCommand::End(result) => host.end_dialog(result),
    }
}
