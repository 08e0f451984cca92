use crate::driver::{CaliperDecoder, FrameOutcome};
use crate::line::LineReader;
use crate::sink::FrameSink;
use embedded_hal::delay::DelayNs;

/// Decodes one frame, reports it, and pauses before the next attempt.
///
/// After a reading the pause is [`idle_delay_us`](crate::config::DecoderConfig::idle_delay_us):
/// the caliper only transmits a few times per second. After a discard it is
/// [`resync_delay_us`](crate::config::DecoderConfig::resync_delay_us), which skips the
/// rest of the broken transmission so its word markers are not mistaken for a start.
///
/// # Arguments
/// - `decoder`: A mutable reference to a `CaliperDecoder` instance.
/// - `delay`: A delay provider implementing `DelayNs`, typically from the HAL.
/// - `sink`: Receives the reading or the discarded frame's errors.
pub fn decode_with_delay<D, L, S>(
    decoder: &mut CaliperDecoder<L>,
    delay: &mut D,
    sink: &mut S,
) -> FrameOutcome
where
    D: DelayNs,
    L: LineReader,
    S: FrameSink + ?Sized,
{
    let outcome = decoder.decode_into(sink);
    let pause_us = match outcome {
        FrameOutcome::Reading(_) => decoder.config().idle_delay_us,
        FrameOutcome::Discarded(_) => decoder.config().resync_delay_us,
    };
    if pause_us != 0 {
        delay.delay_us(pause_us);
    }
    outcome
}

/// Runs a blocking loop that decodes frames forever.
///
/// This is the polling firmware's main loop: decode, report, pause, repeat.
///
/// # Example
/// ```rust,ignore
/// use caliper_serial::timer::run_decode_loop;
/// let mut decoder = CaliperDecoder::new(PinLines::new(clock, data, None), config)?;
/// run_decode_loop(&mut decoder, &mut delay, &mut sink);
/// ```
///
/// # Notes
/// - This loop will never return; stop it by resetting or terminating the program.
/// - Nothing may preempt the decoder mid-frame, or pulse widths will be miscounted.
pub fn run_decode_loop<D, L, S>(decoder: &mut CaliperDecoder<L>, delay: &mut D, sink: &mut S) -> !
where
    D: DelayNs,
    L: LineReader,
    S: FrameSink + ?Sized,
{
    loop {
        let _ = decode_with_delay(decoder, delay, sink);
    }
}
