//! Scripted caliper waveforms for the unit tests.
//!
//! A [`Waveform`] lists, in order, the level every clock read and every data read
//! will return while the decoder walks one transmission. The two lists feed
//! `embedded-hal-mock` pins, which fail the test on any extra or missing read.

use crate::consts::WORD_BITS;
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};

/// Clock-high reads of an ordinary bit clock.
pub(crate) const BIT_PULSE: u32 = 1;

/// Clock-low reads between the integrity check and the next rising edge.
const BIT_GAP: u32 = 1;

fn level(high: bool) -> PinState {
    if high { PinState::High } else { PinState::Low }
}

#[derive(Debug, Default)]
pub(crate) struct Waveform {
    clock: Vec<PinTransaction>,
    data: Vec<PinTransaction>,
    samples: usize,
    debounce: u32,
}

impl Waveform {
    pub(crate) fn new() -> Self {
        Self {
            samples: 1,
            debounce: 1,
            ..Default::default()
        }
    }

    /// Data reads made per bit; must match `DecoderConfig::data_samples`.
    pub(crate) fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Clock reads needed to accept an edge; must match `DecoderConfig::clock_debounce`.
    pub(crate) fn with_debounce(mut self, debounce: u32) -> Self {
        self.debounce = debounce;
        self
    }

    fn data_reads(&mut self, high: bool) {
        for _ in 0..self.samples {
            self.data.push(PinTransaction::get(level(high)));
        }
    }

    fn clock_reads(&mut self, high: bool, count: u32) {
        for _ in 0..count {
            self.clock.push(PinTransaction::get(level(high)));
        }
    }

    /// Clock held low for `polls` reads.
    pub(crate) fn idle(mut self, polls: u32) -> Self {
        self.clock_reads(false, polls);
        self
    }

    /// Debounced rising edge, `width` more high reads, then the debounced falling edge.
    pub(crate) fn pulse(mut self, width: u32) -> Self {
        self.clock_reads(true, self.debounce + width);
        self.clock_reads(false, self.debounce);
        self
    }

    /// Clock rises and never falls again within `width` reads.
    pub(crate) fn stuck_high(mut self, width: u32) -> Self {
        self.clock_reads(true, 1 + width);
        self
    }

    /// One bit at `high` whose clock rises and stays high for `width` reads.
    pub(crate) fn stuck_bit(mut self, high: bool, width: u32) -> Self {
        self.data_reads(high);
        self.clock_reads(false, 1 + BIT_GAP);
        self.stuck_high(width)
    }

    /// One bit at `high` whose clock then stays low for `polls` reads after the check.
    pub(crate) fn stalled_bit(mut self, high: bool, polls: u32) -> Self {
        self.data_reads(high);
        self.clock_reads(false, 1 + polls);
        self
    }

    /// One bit whose data samples read `samples`, clocked by a pulse of `width`.
    pub(crate) fn sampled_bit(mut self, samples: &[bool], width: u32) -> Self {
        for high in samples {
            self.data.push(PinTransaction::get(level(*high)));
        }
        self.clock_reads(false, 1 + BIT_GAP);
        self.pulse(width)
    }

    /// One bit at `high` with a one-read clock spike inside its low gap.
    pub(crate) fn spiked_bit(mut self, high: bool, width: u32) -> Self {
        self.data_reads(high);
        self.clock_reads(false, 1 + BIT_GAP);
        self.clock_reads(true, 1);
        self.clock_reads(false, 1);
        self.pulse(width)
    }

    /// One bit at `high` whose clock pulse of `width` drops low for one read midway.
    pub(crate) fn dropout_bit(mut self, high: bool, width: u32) -> Self {
        self.data_reads(high);
        self.clock_reads(false, 1 + BIT_GAP);
        self.clock_reads(true, self.debounce + width / 2);
        self.clock_reads(false, 1);
        self.clock_reads(true, width - width / 2);
        self.clock_reads(false, self.debounce);
        self
    }

    /// One bit at `high` whose clock rises right after the integrity check.
    pub(crate) fn tight_bit(mut self, high: bool, width: u32) -> Self {
        self.data_reads(high);
        self.clock_reads(false, 1);
        self.pulse(width)
    }

    /// One bit at `high`, clocked by a pulse of `width`.
    pub(crate) fn bit(self, high: bool, width: u32) -> Self {
        let samples = vec![high; self.samples];
        self.sampled_bit(&samples, width)
    }

    /// The `count` low bits of `value`, LSB first; the last one clocked by `marker` if given.
    pub(crate) fn bits(mut self, value: u32, count: u32, marker: Option<u32>) -> Self {
        for i in 0..count {
            let width = match marker {
                Some(width) if i + 1 == count => width,
                _ => BIT_PULSE,
            };
            self = self.bit(value & (1 << i) != 0, width);
        }
        self
    }

    /// A complete 24-bit word terminated by a marker of `marker` reads.
    pub(crate) fn word(self, value: u32, marker: u32) -> Self {
        self.bits(value, WORD_BITS, Some(marker))
    }

    /// Data sampled at `high`, then the clock is found high at the integrity check.
    pub(crate) fn clock_glitch(mut self, high: bool) -> Self {
        self.data_reads(high);
        self.clock_reads(true, 1);
        self
    }

    pub(crate) fn pins(&self) -> (PinMock, PinMock) {
        (PinMock::new(&self.clock), PinMock::new(&self.data))
    }
}
