//! The bootloader-jump command: one write, one outcome.

use std::pin::pin;
use std::time::Duration;

use hkdfu_proto::commands;

use crate::endpoint::{CharacteristicEndpoint, EndpointError};
use crate::probe::CapabilityState;

/// Grace period before the caller is asked to show a wait prompt. A write
/// that resolves sooner never surfaces a prompt.
pub const WAIT_NOTICE_GRACE: Duration = Duration::from_millis(500);

/// Terminal result of one jump invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The accessory accepted the command and will restart in DFU mode.
    Success,
    /// The transport rejected the write; carries its description verbatim.
    Failure(String),
    /// The transport's own timeout elapsed before the write resolved.
    Timeout,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum JumpError {
    /// The accessory has no DFU control point; nothing was written.
    #[error("accessory does not expose a DFU control point")]
    MissingFeature,
    /// A previous invocation was abandoned while its write was in flight.
    /// Writes cannot be cancelled, so the command stays latched.
    #[error("a jump command is still in flight")]
    Busy,
}

/// Caller-side "please wait" prompt, shown only when the write is slow.
pub trait WaitNotice {
    fn show(&mut self);
    fn dismiss(&mut self);
}

/// For callers that do not prompt.
pub struct SilentNotice;

impl WaitNotice for SilentNotice {
    fn show(&mut self) {}
    fn dismiss(&mut self) {}
}

/// Sends the jump-to-bootloader command. One instance per accessory;
/// `&mut self` keeps invocations single-flight.
#[derive(Debug, Default)]
pub struct BootloaderJumpCommand {
    in_flight: bool,
}

impl BootloaderJumpCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `0x01` to the accessory's DFU control point and classify the
    /// result. Exactly one write per invocation, no retries: a failure goes
    /// back to the caller, who may invoke again.
    ///
    /// If the write has not resolved after [`WAIT_NOTICE_GRACE`], `notice` is
    /// shown once and dismissed on resolution.
    pub async fn invoke<E, N>(
        &mut self,
        capability: &CapabilityState,
        endpoint: &E,
        notice: &mut N,
    ) -> Result<CommandOutcome, JumpError>
    where
        E: CharacteristicEndpoint,
        N: WaitNotice,
    {
        let Some(control_point) = capability.control_point.as_ref() else {
            return Err(JumpError::MissingFeature);
        };
        if self.in_flight {
            return Err(JumpError::Busy);
        }
        self.in_flight = true;

        let payload = [commands::JUMP_TO_BOOTLOADER];
        let mut write = pin!(endpoint.write_value(control_point.id, &payload));
        let mut grace = pin!(tokio::time::sleep(WAIT_NOTICE_GRACE));
        let mut notice_shown = false;

        // The grace timer and the write race; a resolved write suppresses a
        // not-yet-fired notice.
        let result = loop {
            tokio::select! {
                result = &mut write => break result,
                () = &mut grace, if !notice_shown => {
                    notice_shown = true;
                    notice.show();
                }
            }
        };

        if notice_shown {
            notice.dismiss();
        }
        self.in_flight = false;

        Ok(match result {
            Ok(()) => CommandOutcome::Success,
            Err(EndpointError::TimedOut) => CommandOutcome::Timeout,
            Err(EndpointError::Transport(description)) => CommandOutcome::Failure(description),
        })
    }
}
