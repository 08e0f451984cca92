//! Output and diagnostics for decoded frames.
//!
//! A [`FrameSink`] receives every reading and every discarded frame's errors.
//! Repeated errors are never suppressed: each discarded frame is reported on its own.

#[cfg(not(feature = "std"))]
use heapless::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::consts::FRAME_LOG_CAPACITY;
use crate::driver::{FrameOutcome, Reading};
use crate::error::ErrorSet;

/// Receives the outcome of every frame attempt.
pub trait FrameSink {
    /// Called with each successfully decoded frame.
    fn reading(&mut self, reading: &Reading);

    /// Called with the errors of each discarded frame.
    fn discarded(&mut self, errors: ErrorSet);
}

/// A [`FrameSink`] that records outcomes in order.
///
/// Without `std` the log keeps the most recent
/// [`FRAME_LOG_CAPACITY`](crate::consts::FRAME_LOG_CAPACITY) outcomes.
#[derive(Debug, Default)]
pub struct FrameLog {
    /// Recorded outcomes, oldest first.
    #[cfg(not(feature = "std"))]
    pub outcomes: Vec<FrameOutcome, FRAME_LOG_CAPACITY>,

    /// Recorded outcomes, oldest first.
    #[cfg(feature = "std")]
    pub outcomes: Vec<FrameOutcome>,
}

impl FrameLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self {
            outcomes: Vec::new(),
        }
    }

    /// Number of recorded outcomes.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Recorded readings, oldest first.
    pub fn readings(&self) -> impl Iterator<Item = &Reading> + '_ {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FrameOutcome::Reading(reading) => Some(reading),
            FrameOutcome::Discarded(_) => None,
        })
    }

    /// Number of recorded discards.
    pub fn discarded_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, FrameOutcome::Discarded(_)))
            .count()
    }

    /// Forgets all recorded outcomes.
    pub fn clear(&mut self) {
        self.outcomes.clear();
    }

    #[cfg(feature = "std")]
    fn record(&mut self, outcome: FrameOutcome) {
        self.outcomes.push(outcome);
    }

    #[cfg(not(feature = "std"))]
    fn record(&mut self, outcome: FrameOutcome) {
        if self.outcomes.is_full() {
            let _ = self.outcomes.remove(0);
        }
        let _ = self.outcomes.push(outcome);
    }
}

impl FrameSink for FrameLog {
    fn reading(&mut self, reading: &Reading) {
        self.record(FrameOutcome::Reading(*reading));
    }

    fn discarded(&mut self, errors: ErrorSet) {
        self.record(FrameOutcome::Discarded(errors));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Measurement;
    use crate::error::DecodeError;

    fn reading(raw: u32) -> Reading {
        Reading {
            raw: [raw, raw],
            measurement: Measurement {
                absolute_mm: 0.0,
                display_mm: -0.0,
            },
            data_glitches: 0,
            clock_glitches: 0,
            late_clocks: 0,
        }
    }

    #[test]
    fn test_log_records_in_order() {
        let mut log = FrameLog::new();
        assert!(log.is_empty());

        log.reading(&reading(1));
        log.discarded(ErrorSet::from(DecodeError::ClockGlitch));
        log.discarded(ErrorSet::from(DecodeError::ClockGlitch));
        log.reading(&reading(2));

        assert_eq!(log.len(), 4);
        assert_eq!(log.discarded_count(), 2);
        let raws: Vec<u32> = log.readings().map(|r| r.raw[0]).collect();
        assert_eq!(raws, vec![1, 2]);

        log.clear();
        assert!(log.is_empty());
    }
}
