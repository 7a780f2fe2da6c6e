use serde::{Deserialize, Serialize};

/// Remote carrier frequency, Hz.
pub const CARRIER_FREQUENCY: f64 = 27.1e6;

/// SDR sample rate, samples per second.
pub const SAMPLE_RATE: f64 = 2e6;

/// Samples emitted per symbol.
pub const SAMPLES_PER_SYMBOL: u32 = 3100;

/// FSK sub-carrier for a low symbol, Hz.
pub const LOW_FREQUENCY: f64 = 92e3;

/// FSK sub-carrier for a high symbol, Hz.
pub const HIGH_FREQUENCY: f64 = 95e3;

/// Pause between repeated transmissions, in samples.
pub const PAUSE_SAMPLES: u32 = 262_924;

/// Modulation scheme requested from the SDR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modulation {
    Fsk,
}

/// One transmission order for the SDR collaborator.
///
/// `data` is the symbol stream produced by [`codec::encode`], possibly
/// several space-separated repetitions; everything else is fixed by the
/// receiver family's radio profile.
///
/// [`codec::encode`]: crate::codec::encode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmitRequest {
    pub frequency: f64,
    pub sample_rate: f64,
    pub carrier_frequency: f64,
    pub modulation: Modulation,
    pub samples_per_symbol: u32,
    pub low_frequency: f64,
    pub high_frequency: f64,
    pub pause: u32,
    pub data: String,
}

impl TransmitRequest {
    /// A request carrying `data` with the family's fixed radio parameters.
    pub fn with_symbols(data: String) -> Self {
        Self {
            frequency: CARRIER_FREQUENCY,
            sample_rate: SAMPLE_RATE,
            carrier_frequency: CARRIER_FREQUENCY,
            modulation: Modulation::Fsk,
            samples_per_symbol: SAMPLES_PER_SYMBOL,
            low_frequency: LOW_FREQUENCY,
            high_frequency: HIGH_FREQUENCY,
            pause: PAUSE_SAMPLES,
            data,
        }
    }
}

/// The SDR transmission collaborator.
///
/// Implementations drive the actual radio hardware; this crate only hands
/// them a finished symbol stream and the transmission parameters.
pub trait SdrSender {
    /// Emit one symbol stream with the given radio parameters.
    fn send(&mut self, request: &TransmitRequest) -> std::io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_the_fixed_radio_profile() {
        let request = TransmitRequest::with_symbols("01".into());
        assert_eq!(request.frequency, 27.1e6);
        assert_eq!(request.carrier_frequency, 27.1e6);
        assert_eq!(request.sample_rate, 2e6);
        assert_eq!(request.modulation, Modulation::Fsk);
        assert_eq!(request.samples_per_symbol, 3100);
        assert_eq!(request.low_frequency, 92e3);
        assert_eq!(request.high_frequency, 95e3);
        assert_eq!(request.pause, 262_924);
        assert_eq!(request.data, "01");
    }
}
