//! Pure bit-level construction of the RF command word and its symbol
//! expansion.
//!
//! The command word is 24 logical bits:
//!
//! ```text
//! ┌────────┬───────────┬────┬─────────┬──────────┬──────┬────┬────┐
//! │ code   │ intensity │ b0 │ code    │ checksum │ beep │ b1 │ b2 │
//! │ [0..2) │ 6, LSB 1st│    │ [2..9)  │ 5 bits   │      │    │    │
//! └────────┴───────────┴────┴─────────┴──────────┴──────┴────┴────┘
//! ```
//!
//! where `b0..b2` are the button's bit triplet. The checksum is parity over
//! fixed positions of the word with its own five slots blanked out.

use crate::config::{Button, TransmitterCode};

/// Per-button bit triplet; `[0]` lands before the code suffix, `[1]` and
/// `[2]` close the word. Indexed by the validated button value.
pub const BUTTON_CODES: [[u8; 3]; 8] = [
    [0, 0, 0], // E/P left
    [0, 1, 1], // B1, right 1
    [0, 1, 0], // B2, right 2 and E/P right
    [1, 1, 0], // B3, right 3
    [1, 0, 0], // B4, left 1
    [0, 0, 1], // B5, left 2
    [1, 0, 1], // B6, left 3
    [1, 1, 1], // unused on the stock remote
];

/// Scratch-word positions feeding each checksum bit. The checksum slots
/// themselves (16..21) never contribute.
const CHECKSUM_TAPS: [&[usize]; 5] = [
    &[0, 8],
    &[1, 9, 21],
    &[2, 10, 22],
    &[3, 11, 23],
    &[4, 12],
];

/// Synchronization preamble; trains the receiver's decoder clock.
const SYNC_PREAMBLE: &str = "0101010101010101111";

/// Inter-bit gap symbols; every logical bit is followed by this pattern.
const BIT_FILLER: &str = "10";

/// Length of the assembled command word in logical bits.
pub const PAYLOAD_BITS: usize = 24;

/// Largest intensity the 6-bit field can carry.
pub const MAX_INTENSITY: u8 = 63;

/// Encode an intensity value as six bits, least significant first.
pub fn intensity_code(intensity: u8) -> String {
    let intensity = intensity.min(MAX_INTENSITY);
    (0..6)
        .map(|i| char::from(b'0' + ((intensity >> i) & 1)))
        .collect()
}

/// Compute the 5-bit parity checksum over a 24-character scratch word.
pub fn checksum(scratch: &str) -> String {
    debug_assert_eq!(scratch.len(), PAYLOAD_BITS);
    let bytes = scratch.as_bytes();
    CHECKSUM_TAPS
        .iter()
        .map(|taps| {
            let parity: u8 = taps.iter().map(|&i| bytes[i] - b'0').sum::<u8>() % 2;
            char::from(b'0' + parity)
        })
        .collect()
}

/// Assemble the full 24-bit command word.
pub fn generate(code: &TransmitterCode, intensity: u8, button: Button, beep: bool) -> String {
    let bits = BUTTON_CODES[button.get() as usize];
    let pre_checksum = format!(
        "{}{}{}{}",
        code.prefix(),
        intensity_code(intensity),
        bits[0],
        code.suffix()
    );
    let post_checksum = format!("{}{}{}", u8::from(beep), bits[1], bits[2]);
    let scratch = format!("{pre_checksum}CCCCC{post_checksum}");
    format!("{pre_checksum}{}{post_checksum}", checksum(&scratch))
}

/// Expand a command word into the physical symbol stream: the sync
/// preamble, one filler, then each payload bit followed by the filler.
pub fn encode(payload: &str) -> String {
    let mut symbols =
        String::with_capacity(SYNC_PREAMBLE.len() + (payload.len() + 1) * (1 + BIT_FILLER.len()));
    symbols.push_str(SYNC_PREAMBLE);
    symbols.push_str(BIT_FILLER);
    for bit in payload.chars() {
        symbols.push(bit);
        symbols.push_str(BIT_FILLER);
    }
    symbols
}
