//! Frame synchronization.
//!
//! The protocol has no start symbol. A transmission begins with a clock-high pulse
//! much longer than any bit clock, so the synchronizer waits for the clock to rise
//! and times how long it stays high.

use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::line::{Line, LineReader};
use crate::timer::{PulseKind, classify_pulse, measure_pulse, wait_for_level};

/// Waits for the start marker of the next transmission.
///
/// On success the clock has just been read low at the end of the marker, and the
/// returned value is the marker's duration in reads. The reads that debounce the
/// rising edge are not part of the duration.
///
/// # Errors
/// - [`DecodeError::StartPulseTooShort`] if the pulse is below the threshold
/// - [`DecodeError::StartPulseTooLong`] if it exceeds `start_pulse_max`
/// - [`DecodeError::Timeout`] if the clock stops changing
pub fn synchronize<L: LineReader + ?Sized>(
    lines: &mut L,
    config: &DecoderConfig,
) -> Result<u32, DecodeError> {
    // Noise while the clock floats between transmissions is not reported
    let _ = wait_for_level(
        lines,
        Line::Clock,
        true,
        config.start_debounce,
        config.poll_limit,
    )?;
    let duration = measure_pulse(
        lines,
        Line::Clock,
        true,
        config.clock_debounce,
        config.poll_limit,
    )?
    .polls;

    match classify_pulse(duration, config.pulse_threshold) {
        PulseKind::Bit => Err(DecodeError::StartPulseTooShort),
        PulseKind::Marker => match config.start_pulse_max {
            Some(max) if duration > max => Err(DecodeError::StartPulseTooLong),
            _ => Ok(duration),
        },
    }
}
