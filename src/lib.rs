//! # caliper-serial
//!
//! A portable, no_std Rust decoder for the synchronous serial output of cheap digital
//! calipers, which send their position as two 24-bit words on a clock and a data line.
//!
//! This crate decodes the signal in software by polling:
//! - `embedded-hal` input pins for the clock and data lines
//! - pulse widths counted in polling iterations, no hardware timer
//! - a per-frame state machine that discards and resynchronizes on any error
//! - an optional blocking loop paced by `embedded_hal::delay::DelayNs`
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]` support and replaces `heapless::Vec`s with
//! `std::vec::Vec`s |
//! | `delay-loop`          | Uses `embedded_hal::delay::DelayNs` to pause between frames |
//! | `defmt-0-3`           | Uses `defmt` logging |
//! | `log`                 | Uses `log` logging |
//!
//! ## Protocol
//!
//! - Each transmission starts with a long clock-high marker pulse
//! - 24 data bits follow per word, LSB first, sampled while the clock is low
//! - Each word ends with another marker in place of the 24th bit's clock pulse
//! - 20480 increments per inch; word 0 is the absolute position, word 1 the negated display
//!
//! ## Usage
//!
//! ```rust,ignore
//! use caliper_serial::config::DecoderConfig;
//! use caliper_serial::driver::{CaliperDecoder, FrameOutcome};
//! use caliper_serial::line::PinLines;
//!
//! let lines = PinLines::new(clock_pin, data_pin, None);
//! let mut decoder = CaliperDecoder::new(lines, DecoderConfig::default().with_pulse_threshold(45))?;
//! loop {
//!     if let FrameOutcome::Reading(reading) = decoder.decode_frame() {
//!         println!("{}", reading);
//!     }
//! }
//! ```
//!
//! Or, use `run_decode_loop()` with a `DelayNs` implementation:
//!
//! ```rust,ignore
//! caliper_serial::timer::run_decode_loop(&mut decoder, &mut delay, &mut sink);
//! ```
//!
//! ## Integration Notes
//!
//! - The pulse threshold counts loop iterations, so it must be tuned to the host's polling speed
//! - The caliper's supply and the pin directions are the caller's responsibility
//! - Decoding busy-waits; keep interrupts and other work away from it while a frame is in flight
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
pub use heapless;

#[macro_use]
mod macros;

pub mod config;
pub mod consts;
pub mod convert;
pub mod driver;
pub mod error;
pub mod line;
pub mod sink;
pub mod sync;
pub mod timer;
pub mod word;

#[cfg(test)]
mod script;

pub use config::DecoderConfig;
pub use driver::{CaliperDecoder, DecoderState, FrameOutcome, Reading};
pub use error::{DecodeError, ErrorSet};
pub use line::{Line, LineReader, PinLines};
