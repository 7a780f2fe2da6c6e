use std::io::{Read, Write};
use std::thread;
use std::time::Duration;

use tracing::debug;

use shocklink_proto::{Action, DeviceIndex, ReceiverKind, WireAction};

use crate::error::{Result, SerialError};
use crate::link::ArduinoLink;

/// Pause between the beep and the shock of a compound beep-then-shock
/// command. The gap is part of the observable contract with the firmware,
/// not an implementation detail.
const BEEP_SHOCK_GAP: Duration = Duration::from_secs(1);

/// Duration of a single impulse on this receiver family.
const IMPULSE_DURATION: Duration = Duration::from_millis(500);

/// One receiver wired to the firmware, plus its dispatch logic.
///
/// Created from per-device parameters, bound to a link via [`register`],
/// then addressed by index for every subsequent command.
///
/// [`register`]: ArduinoReceiver::register
#[derive(Debug, Clone)]
pub struct ArduinoReceiver {
    kind: ReceiverKind,
    args: [u8; 3],
    index: Option<DeviceIndex>,
}

impl ArduinoReceiver {
    /// A Petainer collar paired by its two sender-code bytes and a channel.
    pub fn petainer(code_first_byte: u8, code_second_byte: u8, channel: u8) -> Self {
        Self {
            kind: ReceiverKind::Petainer,
            args: [code_first_byte, code_second_byte, channel],
            index: None,
        }
    }

    /// An optocoupler board with one pin per stimulation kind.
    pub fn optocoupler(pin_beep: u8, pin_vibrate: u8, pin_shock: u8) -> Self {
        Self {
            kind: ReceiverKind::Optocoupler,
            args: [pin_beep, pin_vibrate, pin_shock],
            index: None,
        }
    }

    /// An optocoupler board where a modifier pin turns the button press
    /// into a beep. The middle argument byte is unused by the firmware.
    pub fn optocoupler_beep_modifier(pin_modifier_beep: u8, pin_button: u8) -> Self {
        Self {
            kind: ReceiverKind::OptocouplerBeepModifier,
            args: [pin_modifier_beep, 0, pin_button],
            index: None,
        }
    }

    pub fn kind(&self) -> ReceiverKind {
        self.kind
    }

    /// The three kind-dependent argument bytes of the ADD payload.
    pub fn args(&self) -> [u8; 3] {
        self.args
    }

    /// The index assigned at registration, if any.
    pub fn index(&self) -> Option<DeviceIndex> {
        self.index
    }

    /// Describe this receiver to the firmware and remember the assigned
    /// index. Must be called once per boot session before any command.
    pub fn register<T: Read + Write>(&mut self, link: &ArduinoLink<T>) -> Result<DeviceIndex> {
        let index =
            link.register_receiver(self.kind, self.args[0], self.args[1], self.args[2])?;
        self.index = Some(index);
        Ok(index)
    }

    /// Translate an abstract action into firmware commands.
    ///
    /// `BeepShock` becomes a zero-power beep, a fixed one-second pause
    /// blocking the calling thread, then the shock at the requested power
    /// and duration. Everything else maps to a single command frame.
    pub fn command<T: Read + Write>(
        &self,
        link: &ArduinoLink<T>,
        action: Action,
        power: u8,
        duration: Duration,
    ) -> Result<()> {
        let index = self.index.ok_or(SerialError::NotRegistered)?;
        let duration_ms = saturating_ms(duration);

        match action {
            Action::BeepShock => {
                debug!(%index, "beepshock: announcing with a beep");
                link.command(WireAction::Beep, index, 0, 0)?;
                thread::sleep(BEEP_SHOCK_GAP);
                link.command(WireAction::Shock, index, power, duration_ms)
            }
            other => link.command(other.into(), index, power, duration_ms),
        }
    }

    /// Duration of one impulse; callers sizing repeated-impulse sequences
    /// divide by this.
    pub fn impulse_duration(&self) -> Duration {
        IMPULSE_DURATION
    }
}

/// The wire carries milliseconds in 16 bits; longer requests saturate.
fn saturating_ms(duration: Duration) -> u16 {
    duration.as_millis().min(u128::from(u16::MAX)) as u16
}
