use std::time::Duration;

use tracing::debug;

use shocklink_proto::Action;

use crate::codec::{encode, generate, MAX_INTENSITY};
use crate::config::{Button, TransmitterCode};
use crate::error::Result;
use crate::sender::{SdrSender, TransmitRequest};

/// One encoded message covers this much air time; longer commands repeat it.
const MESSAGE_DURATION_MS: u128 = 250;

/// Shortest and longest request the receiver reacts to sensibly.
const MIN_DURATION: Duration = Duration::from_millis(250);
const MAX_DURATION: Duration = Duration::from_millis(10_000);

/// Marker telling the transmission layer to hold the preceding message for
/// one second before continuing with the rest of the stream.
const HOLD_ONE_SECOND: &str = "/1s";

/// Power levels run 0..=100 and map linearly onto the 6-bit intensity.
const MAX_POWER: u8 = 100;

/// An RF receiver paired to a transmitter code and button, plus its
/// dispatch logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfReceiver {
    code: TransmitterCode,
    button: Button,
}

impl RfReceiver {
    /// Both parameters are validated at construction, so a receiver in hand
    /// can always be commanded.
    pub fn new(code: TransmitterCode, button: Button) -> Self {
        Self { code, button }
    }

    pub fn code(&self) -> &TransmitterCode {
        &self.code
    }

    pub fn button(&self) -> Button {
        self.button
    }

    /// Translate an abstract action into a symbol stream and hand it to the
    /// SDR.
    ///
    /// The duration is clamped to 250 ms..=10 s and filled with
    /// `ceil(duration / 250 ms)` message repetitions. A beep-then-shock
    /// command prepends a dedicated zero-intensity beep message tagged with
    /// a one-second hold marker.
    pub fn command<S: SdrSender>(
        &self,
        sender: &mut S,
        action: Action,
        power: u8,
        duration: Duration,
    ) -> Result<()> {
        let duration = duration.clamp(MIN_DURATION, MAX_DURATION);
        let repeats = duration.as_millis().div_ceil(MESSAGE_DURATION_MS) as usize;

        let intensity = match action {
            // Note: even intensity 0 creates a tiny shock; light is the
            // closest this hardware gets to a no-op stimulus.
            Action::Light => 0,
            _ => scale_power(power),
        };
        // No vibration motor on this family; the beeper stands in for it.
        let beep = matches!(action, Action::Beep | Action::Vibrate);

        let mut messages = Vec::with_capacity(repeats + 1);
        if action == Action::BeepShock {
            let announce = encode(&generate(&self.code, 0, self.button, true));
            messages.push(format!("{announce}{HOLD_ONE_SECOND}"));
        }

        let template = encode(&generate(&self.code, intensity, self.button, beep));
        for _ in 0..repeats {
            messages.push(template.clone());
        }

        debug!(%action, intensity, repeats, "transmitting rf command");
        sender.send(&TransmitRequest::with_symbols(messages.join(" ")))?;
        Ok(())
    }
}

/// Map a 0..=100 power level onto the 0..=63 intensity scale.
fn scale_power(power: u8) -> u8 {
    (u16::from(power.min(MAX_POWER)) * u16::from(MAX_INTENSITY) / 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_scale_covers_the_intensity_range() {
        assert_eq!(scale_power(0), 0);
        assert_eq!(scale_power(50), 31);
        assert_eq!(scale_power(51), 32);
        assert_eq!(scale_power(100), 63);
        // Out-of-range levels saturate instead of wrapping.
        assert_eq!(scale_power(255), 63);
    }
}
