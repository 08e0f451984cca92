//! Frame decoder for digital caliper synchronous serial output.
//!
//! This module provides the [`CaliperDecoder`] struct, which walks the caliper's
//! two-word transmissions one state at a time: synchronize on the start marker,
//! receive word 0, receive word 1, convert, then emit the reading or discard the frame.
//!
//! The decoder only needs a [`LineReader`]. It polls as fast as the host allows;
//! pulse widths are counted in reads and compared against
//! [`DecoderConfig::pulse_threshold`].
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
//! use caliper_serial::config::DecoderConfig;
//! use caliper_serial::driver::{CaliperDecoder, FrameOutcome};
//! use caliper_serial::line::PinLines;
//!
//! fn main() {
//!     # let clock = Pin::new(&[
//!     #     PinTransaction::get(PinState::High),
//!     #     PinTransaction::get(PinState::High),
//!     #     PinTransaction::get(PinState::Low),
//!     # ]);
//!     # let data = Pin::new(&[]);
//!     let lines = PinLines::new(clock, data, None);
//!     let mut decoder = CaliperDecoder::new(lines, DecoderConfig::default()).unwrap();
//!
//!     loop {
//!         match decoder.decode_frame() {
//!             FrameOutcome::Reading(reading) => println!("{}", reading),
//!             FrameOutcome::Discarded(errors) => println!("Decode fail, {}", errors),
//!         }
//!         # break;
//!     }
//!     # assert_eq!(decoder.frames_bad, 1);
//!     # decoder.lines.clock.done();
//!     # decoder.lines.data.done();
//! }
//! ```
//!
//! ## Design Notes
//!
//! Every error discards the whole frame and sends the decoder back to
//! [`DecoderState::Syncing`]; there is no retry inside a word. Nothing of a
//! discarded frame survives into the next one.
//!
//! For the bit-level logic, see [`crate::word::WordReceiver`] and [`crate::sync`].
//!
//! For a blocking loop with pauses between frames, see [`crate::timer`].

use core::fmt;

use crate::config::DecoderConfig;
use crate::consts::WORDS_PER_FRAME;
use crate::convert::{Measurement, convert};
use crate::error::{ConfigError, DecodeError, ErrorSet};
use crate::line::LineReader;
use crate::sink::FrameSink;
use crate::sync::synchronize;
use crate::word::WordReceiver;

/// Protocol state of the [`CaliperDecoder`].
///
/// The decoder cycles `Syncing → ReceivingWord0 → ReceivingWord1 → Converting → Emit`
/// for a good frame. Any error in the first three states jumps to `Discard`. Both
/// `Emit` and `Discard` lead back to `Syncing`.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum DecoderState {
    ///   Waiting for the long clock-high pulse that starts a transmission.
    #[default]
    Syncing,
    ///   Sampling the absolute position word.
    ReceivingWord0,
    ///   Sampling the negated display word.
    ReceivingWord1,
    ///   Both words arrived without errors; converting to millimeters.
    Converting,
    ///   A reading is ready to be handed out.
    Emit,
    ///   The frame failed; its errors are ready to be reported.
    Discard,
}

/// One transmission under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Frame {
    /// Raw words, valid up to `received`.
    pub words: [u32; WORDS_PER_FRAME],
    /// Number of words received so far.
    pub received: usize,
    /// Errors detected in this frame attempt.
    pub errors: ErrorSet,
}

impl Frame {
    /// A fresh, empty frame.
    pub const fn new() -> Self {
        Self {
            words: [0; WORDS_PER_FRAME],
            received: 0,
            errors: ErrorSet::new(),
        }
    }
}

/// A successfully decoded transmission.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Reading {
    /// The two raw 24-bit words, as received.
    pub raw: [u32; WORDS_PER_FRAME],
    /// The converted values.
    pub measurement: Measurement,
    /// Bits whose data samples disagreed. Always 0 with one sample per bit.
    pub data_glitches: u16,
    /// Clock runs ignored by the debounce. Always 0 with a debounce of 1.
    pub clock_glitches: u16,
    /// Bits whose clock had already risen when polling resumed.
    pub late_clocks: u16,
}

impl Reading {
    /// Whether any diagnostic counter is non-zero.
    pub const fn has_diagnostics(&self) -> bool {
        self.data_glitches != 0 || self.clock_glitches != 0 || self.late_clocks != 0
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "i1={:08x} i2={:08x}  {}",
            self.raw[0], self.raw[1], self.measurement
        )?;
        if self.has_diagnostics() {
            write!(
                f,
                " L:{} Gl:{},{}",
                self.late_clocks, self.clock_glitches, self.data_glitches
            )?;
        }
        Ok(())
    }
}

/// Result of one frame attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum FrameOutcome {
    /// The frame decoded cleanly.
    Reading(Reading),
    /// The frame was dropped with these errors.
    Discarded(ErrorSet),
}

/// A polling decoder for the caliper's two-word synchronous serial output.
///
/// ## Type Parameters
///
/// - `L`: A [`LineReader`] giving access to the clock and data lines, typically
///   [`PinLines`](crate::line::PinLines)
///
/// ## Notes
///
/// - Decoding is single-threaded busy-waiting. Pulse discrimination relies on the
///   polling rate being stable, so do not share the decoder or preempt it mid-frame.
/// - The caliper's power and the pins' direction must be set up before decoding.
#[derive(Debug)]
pub struct CaliperDecoder<L>
where
    L: LineReader,
{
    /// The clock and data lines
    pub lines: L,
    config: DecoderConfig,
    state: DecoderState,
    frame: Frame,
    receiver: WordReceiver,
    pending: Option<Reading>,

    /// Counter of emitted readings.
    pub frames_good: u32,

    /// Counter of discarded frames.
    pub frames_bad: u32,
}

impl<L> CaliperDecoder<L>
where
    L: LineReader,
{
    /// Creates a decoder in [`DecoderState::Syncing`].
    ///
    /// # Arguments
    /// - `lines`: The clock and data lines.
    /// - `config`: Threshold, bounds and scale; see [`DecoderConfig`].
    ///
    /// # Errors
    /// Returns the [`ConfigError`] found by [`DecoderConfig::validate`].
    pub fn new(lines: L, config: DecoderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            lines,
            config,
            state: DecoderState::Syncing,
            frame: Frame::new(),
            receiver: WordReceiver::new(),
            pending: None,
            frames_good: 0,
            frames_bad: 0,
        })
    }

    /// The current protocol state.
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// The frame under construction.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// The word receiver's state.
    pub fn receiver(&self) -> &WordReceiver {
        &self.receiver
    }

    /// The settings in use.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Returns the lines.
    pub fn release(self) -> L {
        self.lines
    }

    /// Drops any partial frame and returns to [`DecoderState::Syncing`].
    pub fn reset(&mut self) {
        self.frame = Frame::new();
        self.receiver.reset();
        self.pending = None;
        self.state = DecoderState::Syncing;
    }

    /// Advances the state machine by one transition.
    ///
    /// The `Syncing` and `ReceivingWord*` states busy-wait on the lines. Returns the
    /// outcome when leaving `Emit` or `Discard`, `None` otherwise.
    pub fn step(&mut self) -> Option<FrameOutcome> {
        match self.state {
            DecoderState::Syncing => {
                self.frame = Frame::new();
                match synchronize(&mut self.lines, &self.config) {
                    Ok(duration) => {
                        trace!("start marker, {} polls", duration);
                        self.state = DecoderState::ReceivingWord0;
                    }
                    Err(error) => self.fail(error),
                }
                None
            }
            DecoderState::ReceivingWord0 => {
                self.receive_word(0, DecoderState::ReceivingWord1);
                None
            }
            DecoderState::ReceivingWord1 => {
                self.receive_word(1, DecoderState::Converting);
                None
            }
            DecoderState::Converting => {
                if self.frame.errors.is_empty() {
                    self.pending = Some(Reading {
                        raw: self.frame.words,
                        measurement: convert(self.frame.words, self.config.scale_mm),
                        data_glitches: self.receiver.data_glitches,
                        clock_glitches: self.receiver.clock_glitches,
                        late_clocks: self.receiver.late_clocks,
                    });
                    self.state = DecoderState::Emit;
                } else {
                    self.state = DecoderState::Discard;
                }
                None
            }
            DecoderState::Emit => {
                let reading = self.pending.take();
                self.reset();
                reading.map(|reading| {
                    debug!("reading {:x} {:x}", reading.raw[0], reading.raw[1]);
                    self.frames_good = self.frames_good.wrapping_add(1);
                    FrameOutcome::Reading(reading)
                })
            }
            DecoderState::Discard => {
                let errors = self.frame.errors;
                warn!("frame discarded: {}", errors);
                self.frames_bad = self.frames_bad.wrapping_add(1);
                self.reset();
                Some(FrameOutcome::Discarded(errors))
            }
        }
    }

    /// Decodes frames until one is emitted or discarded.
    ///
    /// Blocks while the caliper is silent, up to the configured poll limit.
    pub fn decode_frame(&mut self) -> FrameOutcome {
        loop {
            if let Some(outcome) = self.step() {
                return outcome;
            }
        }
    }

    /// Decodes one frame and hands the outcome to `sink`.
    pub fn decode_into<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> FrameOutcome {
        let outcome = self.decode_frame();
        match outcome {
            FrameOutcome::Reading(ref reading) => sink.reading(reading),
            FrameOutcome::Discarded(errors) => sink.discarded(errors),
        }
        outcome
    }

    fn receive_word(&mut self, index: usize, next: DecoderState) {
        match self.receiver.receive(&mut self.lines, &self.config) {
            Ok(word) => {
                self.frame.words[index] = word;
                self.frame.received = index + 1;
                self.state = next;
            }
            Err(error) => self.fail(error),
        }
    }

    fn fail(&mut self, error: DecodeError) {
        self.frame.errors.insert(error);
        self.state = DecoderState::Discard;
    }
}
