//! Iteration-count timing for the caliper decoder.
//!
//! There is no hardware timer involved. Durations are the number of reads a line
//! holds one level, so they are only meaningful relative to a threshold tuned for the
//! host's polling speed. Short clock pulses clock bits; long ones are markers.
//!
//! Contains:
//! - `wait_for_level`: bounded, debounced busy-wait for a line to reach a level
//! - `measure_pulse`: length of the current pulse, in reads
//! - `classify_pulse`: bit clock vs. marker discrimination
//! - `decode_with_delay` and `run_decode_loop`: blocking decode loop for `DelayNs`
//!   (feature `delay-loop`)

use crate::error::DecodeError;
use crate::line::{Line, LineReader};

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

/// What a clock-high pulse means to the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum PulseKind {
    /// An ordinary bit clock.
    Bit,
    /// A start-of-frame or end-of-word marker.
    Marker,
}

/// A level change seen by [`wait_for_level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Edge {
    /// Reads that showed the opposite level before the change was accepted.
    pub polls: u32,
    /// Runs at the target level that ended before reaching the debounce count.
    pub glitches: u32,
}

impl Edge {
    /// Whether the line was already at the target level when polling started.
    pub const fn was_late(&self) -> bool {
        self.polls == 0
    }
}

/// Spins until `line` reads `level` on `debounce` consecutive reads.
///
/// A shorter run at `level` is counted in [`Edge::glitches`] and ignored. With a
/// debounce of 1 the first read at `level` is accepted.
///
/// # Returns
/// - The [`Edge`], whose `polls` counts the reads that showed the opposite level
/// - [`DecodeError::Timeout`] once `limit` such reads have been made
pub fn wait_for_level<L: LineReader + ?Sized>(
    lines: &mut L,
    line: Line,
    level: bool,
    debounce: u32,
    limit: u32,
) -> Result<Edge, DecodeError> {
    let mut edge = Edge::default();
    let mut run: u32 = 0;
    loop {
        if lines.read(line) == level {
            run += 1;
            if run >= debounce {
                return Ok(edge);
            }
        } else {
            if run != 0 {
                run = 0;
                edge.glitches = edge.glitches.saturating_add(1);
            }
            edge.polls += 1;
            if edge.polls >= limit {
                return Err(DecodeError::Timeout);
            }
        }
    }
}

/// Measures how long `line` keeps holding `level`.
///
/// Call right after the edge into `level` was accepted. Returns once the line has
/// left `level` for `debounce` reads, so the caller knows the pulse has ended. The
/// duration in [`Edge::polls`] counts only the reads at `level`.
pub fn measure_pulse<L: LineReader + ?Sized>(
    lines: &mut L,
    line: Line,
    level: bool,
    debounce: u32,
    limit: u32,
) -> Result<Edge, DecodeError> {
    wait_for_level(lines, line, !level, debounce, limit)
}

/// Classifies a pulse duration against the marker threshold.
///
/// A duration equal to the threshold is a marker.
pub const fn classify_pulse(duration: u32, threshold: u32) -> PulseKind {
    if duration >= threshold {
        PulseKind::Marker
    } else {
        PulseKind::Bit
    }
}
