//! Error types for frame decoding and decoder configuration.
//!
//! Every [`DecodeError`] is local to one frame: the frame is discarded, the error is
//! recorded in the frame's [`ErrorSet`], and the decoder resynchronizes. None of them
//! is fatal to the decoder.

use core::fmt;

use thiserror::Error;

/// A protocol violation detected while decoding one frame.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum DecodeError {
    /// The candidate start marker was shorter than the pulse threshold.
    #[error("start pulse too short")]
    StartPulseTooShort,
    /// The candidate start marker exceeded the configured maximum.
    #[error("start pulse too long")]
    StartPulseTooLong,
    /// The clock line was high at a bit sampling instant, where it must be idle.
    #[error("clock glitch")]
    ClockGlitch,
    /// A marker arrived after a bit count other than 24, or never arrived within the safety bound.
    #[error("wrong bit count")]
    WordLengthMismatch,
    /// A line did not change level within the poll limit.
    #[error("clock timeout")]
    Timeout,
}

impl DecodeError {
    const ALL: [DecodeError; 5] = [
        DecodeError::StartPulseTooShort,
        DecodeError::StartPulseTooLong,
        DecodeError::ClockGlitch,
        DecodeError::WordLengthMismatch,
        DecodeError::Timeout,
    ];

    /// The bit representing this error inside an [`ErrorSet`].
    pub const fn flag(self) -> u8 {
        match self {
            DecodeError::StartPulseTooShort => 0x01,
            DecodeError::StartPulseTooLong => 0x02,
            DecodeError::ClockGlitch => 0x04,
            DecodeError::WordLengthMismatch => 0x08,
            DecodeError::Timeout => 0x10,
        }
    }
}

/// Errors accumulated during one frame attempt, stored as bit flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct ErrorSet(u8);

impl ErrorSet {
    /// An empty set.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Adds `error` to the set.
    pub fn insert(&mut self, error: DecodeError) {
        self.0 |= error.flag();
    }

    /// Whether `error` is in the set.
    pub const fn contains(&self, error: DecodeError) -> bool {
        self.0 & error.flag() != 0
    }

    /// Whether no error has been recorded.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Raw flag bits, suitable for hexadecimal display.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Iterates over the recorded errors in flag order.
    pub fn iter(&self) -> impl Iterator<Item = DecodeError> + '_ {
        DecodeError::ALL
            .into_iter()
            .filter(move |error| self.contains(*error))
    }
}

impl From<DecodeError> for ErrorSet {
    fn from(error: DecodeError) -> Self {
        let mut set = ErrorSet::new();
        set.insert(error);
        set
    }
}

impl fmt::Display for ErrorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error {:02x}", self.0)?;
        for error in self.iter() {
            write!(f, ", {}", error)?;
        }
        Ok(())
    }
}

/// A [`DecoderConfig`](crate::config::DecoderConfig) value the decoder cannot run with.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ConfigError {
    /// A zero threshold would classify every pulse as a marker.
    #[error("pulse threshold must be non-zero")]
    ZeroThreshold,
    /// The safety bound must exceed the word width and keep the bit weight inside a `u32`.
    #[error("safety bound of {0} bits is outside 25..=31")]
    SafetyBound(u32),
    /// The scale must be finite and non-zero.
    #[error("scale must be finite and non-zero")]
    InvalidScale,
    /// At least one data sample per bit is required.
    #[error("data samples per bit must be non-zero")]
    ZeroDataSamples,
    /// Busy-waits need at least one poll.
    #[error("poll limit must be non-zero")]
    ZeroPollLimit,
    /// A debounce of zero reads would accept an edge without reading the line.
    #[error("clock debounce must be non-zero")]
    ZeroDebounce,
    /// The start pulse maximum lies below the marker threshold, so no start pulse could pass.
    #[error("start pulse maximum {max} is below threshold {threshold}")]
    StartMaxBelowThreshold {
        /// Configured maximum start pulse duration.
        max: u32,
        /// Configured pulse threshold.
        threshold: u32,
    },
}
