//! Word reception for the caliper's synchronous serial stream.
//!
//! Bits arrive LSB first. The data line is stable while the clock is low, so each bit
//! is sampled before waiting for its clock pulse. The pulse after the 24th bit is
//! stretched into a marker, which is how the end of a word is recognised.

use crate::config::DecoderConfig;
use crate::consts::{MAX_MAX_BITS, WORD_COMPLETE_WEIGHT};
use crate::error::DecodeError;
use crate::line::{Line, LineReader};
use crate::timer::{Edge, PulseKind, classify_pulse, measure_pulse, wait_for_level};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Accumulates one caliper word bit by bit.
///
// - `value`: raw word under construction
// - `bit_weight`: positional value of the bit being sampled
pub struct WordReceiver {
    /// Raw word built so far. Bit *i* is set if the data line was high for bit *i*.
    pub value: u32,

    /// Weight of the bit currently being sampled.
    ///
    /// Starts at 1 and doubles after every clock pulse. Equals `2^24` when the
    /// terminating marker follows exactly 24 bits.
    pub bit_weight: u32,

    /// Bits whose data samples disagreed.
    ///
    /// Only counted when more than one sample is taken per bit. Accumulates across
    /// the words of a frame until [`reset`](WordReceiver::reset).
    pub data_glitches: u16,

    /// Clock runs shorter than the configured debounce, ignored as noise.
    ///
    /// Always 0 with a debounce of 1. Accumulates like `data_glitches`.
    pub clock_glitches: u16,

    /// Bits whose clock had already risen when the receiver started waiting for it.
    ///
    /// A late clock means the host may have polled too slowly and missed a clock
    /// period. Accumulates like `data_glitches`.
    pub late_clocks: u16,
}

impl Default for WordReceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl WordReceiver {
    /// Creates an idle receiver.
    pub const fn new() -> Self {
        Self {
            value: 0,
            bit_weight: 1,
            data_glitches: 0,
            clock_glitches: 0,
            late_clocks: 0,
        }
    }

    /// Clears all reception state, including the glitch count.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Receives one word.
    ///
    /// The clock must already be low, either after the start marker or after the
    /// previous word's marker. On return the clock has just fallen at the end of this
    /// word's marker.
    ///
    /// # Errors
    /// - [`DecodeError::ClockGlitch`] if the clock is high at a sampling instant
    /// - [`DecodeError::WordLengthMismatch`] if the marker follows a bit count other
    ///   than 24, or no marker arrives within `max_bits`
    /// - [`DecodeError::Timeout`] if the clock stops changing
    pub fn receive<L: LineReader + ?Sized>(
        &mut self,
        lines: &mut L,
        config: &DecoderConfig,
    ) -> Result<u32, DecodeError> {
        self.value = 0;
        self.bit_weight = 1;
        let bound = 1u32 << config.max_bits.min(MAX_MAX_BITS);

        while self.bit_weight < bound {
            if self.sample_data(lines, config.data_samples) {
                self.value |= self.bit_weight;
            }

            // Clock must still be idle while the bit is sampled
            if lines.read(Line::Clock) {
                return Err(DecodeError::ClockGlitch);
            }

            let rise = wait_for_level(
                lines,
                Line::Clock,
                true,
                config.clock_debounce,
                config.poll_limit,
            )?;
            if rise.was_late() {
                self.late_clocks = self.late_clocks.saturating_add(1);
            }
            self.note_glitches(rise);
            self.bit_weight <<= 1;
            let fall = measure_pulse(
                lines,
                Line::Clock,
                true,
                config.clock_debounce,
                config.poll_limit,
            )?;
            self.note_glitches(fall);
            let duration = fall.polls;

            if classify_pulse(duration, config.pulse_threshold) == PulseKind::Marker {
                if self.bit_weight != WORD_COMPLETE_WEIGHT {
                    debug!(
                        "marker after wrong bit count, weight {:x}",
                        self.bit_weight
                    );
                    return Err(DecodeError::WordLengthMismatch);
                }
                trace!("word complete: {:x}", self.value);
                return Ok(self.value);
            }
        }

        Err(DecodeError::WordLengthMismatch)
    }

    fn note_glitches(&mut self, edge: Edge) {
        let glitches = u16::try_from(edge.glitches).unwrap_or(u16::MAX);
        self.clock_glitches = self.clock_glitches.saturating_add(glitches);
    }

    fn sample_data<L: LineReader + ?Sized>(&mut self, lines: &mut L, samples: u8) -> bool {
        let mut highs: u8 = 0;
        for _ in 0..samples {
            if lines.read(Line::Data) {
                highs += 1;
            }
        }
        if highs != 0 && highs != samples {
            self.data_glitches = self.data_glitches.saturating_add(1);
        }
        u16::from(highs) * 2 > u16::from(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::PinLines;
    use crate::script::{BIT_PULSE, Waveform};

    const THRESHOLD: u32 = 8;

    fn config() -> DecoderConfig {
        DecoderConfig::default()
            .with_pulse_threshold(THRESHOLD)
            .with_poll_limit(64)
    }

    fn receive(wave: Waveform, config: &DecoderConfig) -> (Result<u32, DecodeError>, WordReceiver) {
        let (clock, data) = wave.pins();
        let mut lines = PinLines::new(clock, data, None);
        let mut receiver = WordReceiver::new();
        let result = receiver.receive(&mut lines, config);
        lines.clock.done();
        lines.data.done();
        (result, receiver)
    }

    #[test]
    fn test_receiver_initialization_defaults() {
        let receiver = WordReceiver::new();
        assert_eq!(receiver.value, 0);
        assert_eq!(receiver.bit_weight, 1);
        assert_eq!(receiver.data_glitches, 0);
        assert_eq!(receiver.clock_glitches, 0);
        assert_eq!(receiver.late_clocks, 0);
    }

    #[test]
    fn test_receives_word_lsb_first() {
        let (result, receiver) = receive(Waveform::new().word(0x2800, THRESHOLD), &config());

        assert_eq!(result, Ok(0x2800));
        assert_eq!(receiver.bit_weight, WORD_COMPLETE_WEIGHT);
    }

    #[test]
    fn test_receives_all_ones() {
        let (result, _) = receive(Waveform::new().word(0xFF_FFFF, 20), &config());
        assert_eq!(result, Ok(0xFF_FFFF));
    }

    #[test]
    fn test_marker_after_23_bits_is_length_mismatch() {
        let wave = Waveform::new().bits(0x1234, 23, Some(THRESHOLD));
        let (result, receiver) = receive(wave, &config());

        assert_eq!(result, Err(DecodeError::WordLengthMismatch));
        assert_eq!(receiver.bit_weight, 1 << 23);
    }

    #[test]
    fn test_marker_after_25_bits_is_length_mismatch() {
        let wave = Waveform::new().bits(0, 25, Some(THRESHOLD));
        let (result, _) = receive(wave, &config());
        assert_eq!(result, Err(DecodeError::WordLengthMismatch));
    }

    #[test]
    fn test_pulse_below_threshold_never_ends_word() {
        // 24 bits whose final pulse falls one read short of a marker; the receiver
        // keeps clocking bits until the marker shows up after bit 26.
        let wave = Waveform::new()
            .bits(0, 24, Some(THRESHOLD - 1))
            .bits(0, 2, Some(THRESHOLD));
        let (result, receiver) = receive(wave, &config());

        assert_eq!(result, Err(DecodeError::WordLengthMismatch));
        assert_eq!(receiver.bit_weight, 1 << 26);
    }

    #[test]
    fn test_missing_marker_hits_safety_bound() {
        let wave = Waveform::new().bits(0, 28, None);
        let (result, receiver) = receive(wave, &config());

        assert_eq!(result, Err(DecodeError::WordLengthMismatch));
        assert_eq!(receiver.bit_weight, 1 << 28);
    }

    #[test]
    fn test_safety_bound_is_configurable() {
        let wave = Waveform::new().bits(0, 25, None);
        let (result, receiver) = receive(wave, &config().with_max_bits(25));

        assert_eq!(result, Err(DecodeError::WordLengthMismatch));
        assert_eq!(receiver.bit_weight, 1 << 25);
    }

    #[test]
    fn test_clock_high_at_sampling_is_glitch() {
        let wave = Waveform::new().bits(0b11111, 5, None).clock_glitch(true);
        let (result, receiver) = receive(wave, &config());

        assert_eq!(result, Err(DecodeError::ClockGlitch));
        // Bit 5 was sampled before the clock check
        assert_eq!(receiver.value, 0b111111);
    }

    #[test]
    fn test_clock_stuck_high_times_out() {
        let wave = Waveform::new().bit(true, BIT_PULSE).stuck_bit(false, 4);
        let (result, receiver) = receive(wave, &config().with_poll_limit(4));

        assert_eq!(result, Err(DecodeError::Timeout));
        assert_eq!(receiver.bit_weight, 4);
    }

    #[test]
    fn test_majority_vote_and_glitch_count() {
        let wave = Waveform::new()
            .with_samples(3)
            .sampled_bit(&[true, true, false], BIT_PULSE)
            .sampled_bit(&[false, true, false], BIT_PULSE)
            .sampled_bit(&[true, true, true], BIT_PULSE)
            .bits(0, 21, Some(THRESHOLD));
        let (result, receiver) = receive(wave, &config().with_data_samples(3));

        assert_eq!(result, Ok(0b101));
        assert_eq!(receiver.data_glitches, 2);
    }

    #[test]
    fn test_debounce_ignores_clock_spike_in_gap() {
        // A one-read clock spike inside bit 3's low gap
        let wave = Waveform::new()
            .with_debounce(3)
            .bits(0x2800, 3, None)
            .spiked_bit(false, BIT_PULSE)
            .bits(0x2800 >> 4, 20, Some(THRESHOLD));
        let (result, receiver) = receive(wave, &config().with_debounce(3, 1));

        assert_eq!(result, Ok(0x2800));
        assert_eq!(receiver.bit_weight, WORD_COMPLETE_WEIGHT);
        assert_eq!(receiver.clock_glitches, 1);
        assert_eq!(receiver.late_clocks, 0);
    }

    #[test]
    fn test_debounce_rides_through_dropout_in_marker() {
        let wave = Waveform::new()
            .with_debounce(2)
            .bits(0x55, 23, None)
            .dropout_bit(false, THRESHOLD);
        let (result, receiver) = receive(wave, &config().with_debounce(2, 1));

        assert_eq!(result, Ok(0x55));
        assert_eq!(receiver.clock_glitches, 1);
    }

    #[test]
    fn test_clock_without_low_gap_is_late() {
        let wave = Waveform::new()
            .bits(0x2800, 10, None)
            .tight_bit(true, BIT_PULSE)
            .tight_bit(true, BIT_PULSE)
            .bits(0x2800 >> 12, 12, Some(THRESHOLD));
        let (result, receiver) = receive(wave, &config());

        assert_eq!(result, Ok(0x2800 | 1 << 10));
        assert_eq!(receiver.late_clocks, 2);
        assert_eq!(receiver.clock_glitches, 0);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut receiver = WordReceiver {
            value: 0xABCD,
            bit_weight: 1 << 12,
            data_glitches: 3,
            clock_glitches: 2,
            late_clocks: 1,
        };
        receiver.reset();
        assert_eq!(receiver, WordReceiver::new());
    }
}
