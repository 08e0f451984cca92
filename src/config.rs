//! Platform-tunable decoder settings.
//!
//! The pulse threshold is the one setting that almost always needs tuning: it is a
//! count of polling iterations, so it scales with the speed of the host's line reads.
//! Everything else has a sensible default taken from [`crate::consts`].

use crate::consts::{
    DEFAULT_CLOCK_DEBOUNCE, DEFAULT_DATA_SAMPLES, DEFAULT_IDLE_DELAY_US, DEFAULT_MAX_BITS,
    DEFAULT_POLL_LIMIT, DEFAULT_PULSE_THRESHOLD, DEFAULT_RESYNC_DELAY_US, DEFAULT_START_DEBOUNCE,
    MAX_MAX_BITS, MIN_MAX_BITS, MM_PER_INCREMENT,
};
use crate::error::ConfigError;

/// Settings for a [`CaliperDecoder`](crate::driver::CaliperDecoder).
///
/// Built from [`Default`] and adjusted with the `with_*` methods:
///
/// ```rust
/// use caliper_serial::config::DecoderConfig;
/// use caliper_serial::consts::MM_PER_INCREMENT_ROUNDED;
///
/// let config = DecoderConfig::default()
///     .with_pulse_threshold(45)
///     .with_data_samples(3)
///     .with_scale(MM_PER_INCREMENT_ROUNDED);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecoderConfig {
    /// Polling iterations a clock-high pulse must last to count as a marker.
    pub pulse_threshold: u32,
    /// Bit-weight doublings allowed per word before giving up on the marker.
    pub max_bits: u32,
    /// Reads allowed in any single busy-wait before the frame times out.
    pub poll_limit: u32,
    /// Millimeters per raw increment.
    pub scale_mm: f64,
    /// Data line reads per bit; the bit takes the majority level.
    pub data_samples: u8,
    /// Optional upper bound on the start pulse duration.
    pub start_pulse_max: Option<u32>,
    /// Consecutive reads at the new level needed to accept a bit clock edge.
    pub clock_debounce: u32,
    /// Consecutive high reads needed to accept the rise of a start marker.
    pub start_debounce: u32,
    /// Pause after a discarded frame when driven by a delay loop, in microseconds.
    pub resync_delay_us: u32,
    /// Pause after an emitted reading when driven by a delay loop, in microseconds.
    pub idle_delay_us: u32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            pulse_threshold: DEFAULT_PULSE_THRESHOLD,
            max_bits: DEFAULT_MAX_BITS,
            poll_limit: DEFAULT_POLL_LIMIT,
            scale_mm: MM_PER_INCREMENT,
            data_samples: DEFAULT_DATA_SAMPLES,
            start_pulse_max: None,
            clock_debounce: DEFAULT_CLOCK_DEBOUNCE,
            start_debounce: DEFAULT_START_DEBOUNCE,
            resync_delay_us: DEFAULT_RESYNC_DELAY_US,
            idle_delay_us: DEFAULT_IDLE_DELAY_US,
        }
    }
}

impl DecoderConfig {
    /// Sets the marker threshold, in polling iterations.
    pub const fn with_pulse_threshold(mut self, threshold: u32) -> Self {
        self.pulse_threshold = threshold;
        self
    }

    /// Sets the safety bound on bit-weight doublings per word.
    pub const fn with_max_bits(mut self, max_bits: u32) -> Self {
        self.max_bits = max_bits;
        self
    }

    /// Sets the busy-wait bound.
    pub const fn with_poll_limit(mut self, limit: u32) -> Self {
        self.poll_limit = limit;
        self
    }

    /// Sets the millimeters per raw increment.
    pub const fn with_scale(mut self, scale_mm: f64) -> Self {
        self.scale_mm = scale_mm;
        self
    }

    /// Sets the number of data reads per bit.
    pub const fn with_data_samples(mut self, samples: u8) -> Self {
        self.data_samples = samples;
        self
    }

    /// Rejects start pulses longer than `max` iterations.
    pub const fn with_start_pulse_max(mut self, max: u32) -> Self {
        self.start_pulse_max = Some(max);
        self
    }

    /// Sets the debounce for bit clock edges and for the start marker's rise.
    ///
    /// Shorter runs at the new level are ignored and counted as clock glitches.
    pub const fn with_debounce(mut self, clock: u32, start: u32) -> Self {
        self.clock_debounce = clock;
        self.start_debounce = start;
        self
    }

    /// Sets the pauses used by the delay loop after a discard and after a reading.
    pub const fn with_delays(mut self, resync_us: u32, idle_us: u32) -> Self {
        self.resync_delay_us = resync_us;
        self.idle_delay_us = idle_us;
        self
    }

    /// Checks that the decoder can run with these settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pulse_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if !(MIN_MAX_BITS..=MAX_MAX_BITS).contains(&self.max_bits) {
            return Err(ConfigError::SafetyBound(self.max_bits));
        }
        if !self.scale_mm.is_finite() || self.scale_mm == 0.0 {
            return Err(ConfigError::InvalidScale);
        }
        if self.data_samples == 0 {
            return Err(ConfigError::ZeroDataSamples);
        }
        if self.poll_limit == 0 {
            return Err(ConfigError::ZeroPollLimit);
        }
        if self.clock_debounce == 0 || self.start_debounce == 0 {
            return Err(ConfigError::ZeroDebounce);
        }
        match self.start_pulse_max {
            Some(max) if max < self.pulse_threshold => Err(ConfigError::StartMaxBelowThreshold {
                max,
                threshold: self.pulse_threshold,
            }),
            _ => Ok(()),
        }
    }
}
