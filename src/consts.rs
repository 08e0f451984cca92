//! Constants used across the caliper protocol implementation.
//!
//! This module defines the protocol-wide constants for word layout and unit
//! scaling, plus the defaults of every platform-tunable setting in
//! [`DecoderConfig`](crate::config::DecoderConfig).
//!
//! ## Key Concepts
//!
//! - **Words**: Each transmission carries two 24-bit two's-complement words, LSB first.
//! - **Scale**: The caliper counts 20480 increments per inch.
//! - **Pulse threshold**: Iteration count separating ordinary bit clocks from marker pulses.
//!   It depends on how fast the polling loop runs and must be tuned per platform.
//! - **Safety bound**: Maximum bit-weight doublings before a word is abandoned.

/// Number of data bits in one caliper word.
pub const WORD_BITS: u32 = 24;

/// Number of words in one transmission.
///
/// Word 0 is the absolute position, word 1 is the negative of the displayed value.
pub const WORDS_PER_FRAME: usize = 2;

/// Mask selecting the 24 data bits of a raw word.
pub const WORD_MASK: u32 = (1 << WORD_BITS) - 1;

/// Sign bit of a 24-bit two's-complement word.
pub const WORD_SIGN_BIT: u32 = 1 << (WORD_BITS - 1);

/// `2^24`, subtracted from a raw word with the sign bit set.
pub const WORD_MODULUS: i32 = 1 << WORD_BITS;

/// Bit weight observed when the terminating marker follows exactly [`WORD_BITS`] bits.
pub const WORD_COMPLETE_WEIGHT: u32 = 1 << WORD_BITS;

/// Caliper resolution.
pub const INCREMENTS_PER_INCH: u32 = 20_480;

/// Millimeters in one inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Millimeters per raw increment, derived as `25.4 / 20480`.
pub const MM_PER_INCREMENT: f64 = MM_PER_INCH / INCREMENTS_PER_INCH as f64;

/// Millimeters per raw increment rounded to eight decimals.
///
/// Kept verbatim for decoders that must match readings produced with the rounded
/// constant. Select it with [`DecoderConfig::with_scale`](crate::config::DecoderConfig::with_scale).
pub const MM_PER_INCREMENT_ROUNDED: f64 = 0.00124023;

/// Default pulse threshold in polling iterations.
///
/// Tuned for a Raspberry Pi 4 class polling loop. A high pulse lasting at least this
/// many reads is a marker.
pub const DEFAULT_PULSE_THRESHOLD: u32 = 50;

/// Default safety bound on bit-weight doublings per word.
pub const DEFAULT_MAX_BITS: u32 = 28;

/// Smallest accepted safety bound: one more than the word width.
pub const MIN_MAX_BITS: u32 = WORD_BITS + 1;

/// Largest accepted safety bound, so the bit weight still fits a `u32`.
pub const MAX_MAX_BITS: u32 = 31;

/// Default bound on the number of reads spent in a single busy-wait.
pub const DEFAULT_POLL_LIMIT: u32 = 10_000_000;

/// Default number of data line reads per bit.
pub const DEFAULT_DATA_SAMPLES: u8 = 1;

/// Default consecutive reads needed to accept a bit clock edge.
///
/// 1 accepts every edge. Noisy wiring usually wants 3.
pub const DEFAULT_CLOCK_DEBOUNCE: u32 = 1;

/// Default consecutive high reads needed to accept the rise of a start marker.
///
/// The clock floats between transmissions, so noisy setups want a much longer run
/// here than for bit clocks, such as 20.
pub const DEFAULT_START_DEBOUNCE: u32 = 1;

/// Default pause after a discarded frame, in microseconds.
///
/// Long enough to skip the remainder of a broken transmission before resynchronizing.
pub const DEFAULT_RESYNC_DELAY_US: u32 = 1_500;

/// Default pause after an emitted reading, in microseconds.
///
/// Calipers transmit about three times per second.
pub const DEFAULT_IDLE_DELAY_US: u32 = 300_000;

/// Number of outcomes retained by [`FrameLog`](crate::sink::FrameLog) without `std`.
pub const FRAME_LOG_CAPACITY: usize = 16;
