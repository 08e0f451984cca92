//! Line-level access to the caliper's clock and data outputs.
//!
//! The decoder never touches pins directly. Every read goes through
//! [`LineReader::read`], so hardware pins, simulated waveforms and test doubles are
//! interchangeable. [`PinLines`] adapts two `embedded-hal` input pins.
//!
//! Pin direction and the caliper's supply are configured by the caller before the
//! decoder starts.

use embedded_hal::digital::InputPin;

/// One of the two caliper output lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Line {
    /// Synchronous serial clock. Idles low between bits.
    Clock,
    /// Serial data, stable while the clock is low.
    Data,
}

/// Reads the instantaneous level of a caliper line.
pub trait LineReader {
    /// Returns `true` if `line` is currently high.
    ///
    /// Every call must reflect the line at the instant of the call; no buffering.
    fn read(&mut self, line: Line) -> bool;
}

impl<T: LineReader + ?Sized> LineReader for &mut T {
    fn read(&mut self, line: Line) -> bool {
        (**self).read(line)
    }
}

/// Clock and data lines backed by `embedded-hal` input pins.
///
/// ## Type Parameters
///
/// - `CLK`: A type implementing [`embedded_hal::digital::InputPin`] wired to the clock output
/// - `DAT`: A type implementing [`embedded_hal::digital::InputPin`] wired to the data output
#[derive(Debug)]
pub struct PinLines<CLK, DAT>
where
    CLK: InputPin,
    DAT: InputPin,
{
    /// Clock pin
    pub clock: CLK,
    /// Data pin
    pub data: DAT,
    /// Whether both levels should be inverted, e.g. behind a transistor level shifter.
    inverted: bool,
}

impl<CLK, DAT> PinLines<CLK, DAT>
where
    CLK: InputPin,
    DAT: InputPin,
{
    /// Wraps the clock and data pins.
    ///
    /// # Arguments
    /// - `clock`: The input pin sampling the caliper clock.
    /// - `data`: The input pin sampling the caliper data.
    /// - `inverted`: Whether both lines read inverted (HIGH => LOW). Defaults to `false`.
    pub fn new(clock: CLK, data: DAT, inverted: Option<bool>) -> Self {
        Self {
            clock,
            data,
            inverted: inverted.unwrap_or(false),
        }
    }

    /// Returns the clock and data pins.
    pub fn release(self) -> (CLK, DAT) {
        (self.clock, self.data)
    }
}

impl<CLK, DAT> LineReader for PinLines<CLK, DAT>
where
    CLK: InputPin,
    DAT: InputPin,
{
    fn read(&mut self, line: Line) -> bool {
        // A failed read counts as low.
        let high = match line {
            Line::Clock => self.clock.is_high().unwrap_or(false),
            Line::Data => self.data.is_high().unwrap_or(false),
        };
        high != self.inverted
    }
}
