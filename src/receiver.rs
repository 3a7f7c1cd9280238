//! Full receiver chain

#[cfg(not(test))]
use log::{info, warn};

#[cfg(test)]
use std::println as info;
#[cfg(test)]
use std::println as warn;

use crate::edge::EdgeDetector;
use crate::frame::Assembler;
use crate::sampling;
use crate::smooth::Smoother;
use crate::timestamp::TimestampResult;

/// A complete DCF77 receiver chain
///
/// The chain takes one boolean carrier sample per tick, together with the
/// caller's monotonic millisecond clock, and performs the following
/// operations:
///
/// 1. Per-phase moving-average smoothing over the last fifteen seconds
/// 2. Second-boundary edge detection on the smoothed stream, with debounce
///    and missed-edge recovery driven by the millisecond clock
/// 3. Pulse classification on the raw stream into time bits and the
///    minute marker
/// 4. Minute assembly and timestamp decoding
///
/// Everything runs synchronously inside [`input()`](Self::input), in small
/// bounded time with no allocation, so the method may be called from a
/// timer interrupt handler. When a minute boundary closes a complete frame,
/// the decode result is returned from that same call; both valid
/// timestamps and precise validation failures are delivered, and the
/// caller decides what to do with the failures.
///
/// ```
/// use funkuhr::Dcf77Receiver;
///
/// let mut rx = Dcf77Receiver::new();
///
/// // ticks of (level, milliseconds) from the antenna module, 32 per second
/// let quiet = (0u32..480).map(|n| (true, n * 125 / 4));
/// for result in rx.iter(quiet) {
///     match result {
///         Ok(timestamp) => println!("minute received: {}", timestamp),
///         Err(err) => println!("minute rejected: {}", err),
///     }
/// }
/// ```
///
/// One instance owns all receiver state; calls from several threads must
/// be serialized by the caller.
#[derive(Clone, Debug)]
pub struct Dcf77Receiver {
    smoother: Smoother,
    detector: EdgeDetector,
    assembler: Assembler,
    input_sample_counter: u64,
}

impl Dcf77Receiver {
    /// Input sampling rate, in samples per second
    ///
    /// [`input()`](Self::input) must be called at this fixed rate; the
    /// pulse classification thresholds are derived from it.
    pub const SAMPLE_RATE: u32 = sampling::SAMPLES_PER_SECOND;

    /// New receiver with zero initial conditions
    ///
    /// The receiver is immediately ready to process samples. Expect the
    /// first results after the smoothing window has filled and two clean
    /// minute boundaries have passed.
    pub fn new() -> Self {
        Self {
            smoother: Smoother::new(),
            detector: EdgeDetector::new(),
            assembler: Assembler::new(),
            input_sample_counter: 0,
        }
    }

    /// Process a single carrier sample
    ///
    /// `sample` is the demodulated carrier level for this tick; `time_ms`
    /// is a monotonic millisecond clock which may wrap around the 32-bit
    /// range. Returns a decode result exactly when this tick completes a
    /// minute boundary with one full minute of gathered bits.
    pub fn input(&mut self, sample: bool, time_ms: u32) -> Option<TimestampResult> {
        self.input_sample_counter = self.input_sample_counter.wrapping_add(1);

        let smoothed = self.smoother.input(sample);
        let edge = self.detector.input(smoothed, sample, time_ms)?;
        let out = self.assembler.input(edge)?;

        match &out {
            Ok(timestamp) => info!(
                "receiver [{:<14}]: {}",
                self.input_sample_counter, timestamp
            ),
            Err(err) => warn!(
                "receiver [{:<14}]: minute rejected: {}",
                self.input_sample_counter, err
            ),
        }
        Some(out)
    }

    /// Receive timestamps from a source of samples
    ///
    /// Binds an iterator which consumes `(sample, time_ms)` pairs from
    /// `input` and produces decode results as minutes complete. The
    /// iterator consumes as many ticks as required to produce the next
    /// result and returns `None` once the input is exhausted without a
    /// further one.
    #[must_use = "iterators are lazy and do nothing unless consumed"]
    pub fn iter<'rx, I, T>(&'rx mut self, input: I) -> SourceIter<'rx, T>
    where
        I: IntoIterator<Item = (bool, u32), IntoIter = T>,
        T: Iterator<Item = (bool, u32)>,
    {
        SourceIter {
            source: input.into_iter(),
            receiver: self,
        }
    }

    /// Clear all receiver state and reset to zero initial conditions
    pub fn reset(&mut self) {
        self.smoother.reset();
        self.detector.reset();
        self.assembler.reset();
        self.input_sample_counter = 0;
    }

    /// Lifetime total of input samples processed
    pub fn input_sample_counter(&self) -> u64 {
        self.input_sample_counter
    }
}

impl Default for Dcf77Receiver {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample source iterator
///
/// Bound to a source of `(sample, time_ms)` ticks by
/// [`Dcf77Receiver::iter`]. Each call to `next()` feeds ticks into the
/// receiver until the next minute completes, and returns its decode
/// result, or `None` when the source runs out first.
#[derive(Debug)]
pub struct SourceIter<'rx, I>
where
    I: Iterator<Item = (bool, u32)>,
{
    source: I,
    receiver: &'rx mut Dcf77Receiver,
}

impl<'rx, I> Iterator for SourceIter<'rx, I>
where
    I: Iterator<Item = (bool, u32)>,
{
    type Item = TimestampResult;

    fn next(&mut self) -> Option<Self::Item> {
        for (sample, time_ms) in &mut self.source {
            if let Some(out) = self.receiver.input(sample, time_ms) {
                return Some(out);
            }
        }
        None
    }
}
