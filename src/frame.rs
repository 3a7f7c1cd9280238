//! Minute assembly: gathering time bits between minute markers

#[cfg(not(test))]
use log::debug;

#[cfg(test)]
use std::println as debug;

use crate::edge::{Edge, Pulse};
use crate::timestamp::{Timestamp, TimestampResult};

/// Raw time-code bits gathered over one minute, in received order
///
/// Bit 0 is the first bit of the minute. A complete minute carries exactly
/// [`COMPLETE_LEN`](Self::COMPLETE_LEN) bits; one overflow slot absorbs the
/// extra bit of a leap second, or of a minute whose marker went undetected.
/// Once the overflow slot is filled the frame is stale and further pushes
/// are ignored until it is cleared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TimeFrame {
    bits: u64,
    len: u8,
}

impl TimeFrame {
    /// Bits broadcast in a minute without a leap second
    pub const COMPLETE_LEN: u8 = 59;

    // One slot past a leap-second minute; reaching it means bits kept
    // arriving with no minute marker in between.
    const STALE_LEN: u8 = 60;

    /// An empty frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one received bit
    ///
    /// Ignored once the frame has gone stale.
    pub fn push(&mut self, bit: bool) {
        if self.len == Self::STALE_LEN {
            return;
        }
        self.bits |= u64::from(bit) << self.len;
        self.len += 1;
    }

    /// Number of bits gathered so far
    pub fn len(&self) -> u8 {
        self.len
    }

    /// True if no bits have been gathered
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True if the frame holds exactly one marker-to-marker minute
    pub fn is_complete(&self) -> bool {
        self.len == Self::COMPLETE_LEN
    }

    /// Discard all gathered bits
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Single received bit, by transmission index
    pub(crate) fn bit(&self, index: u8) -> bool {
        self.bits >> index & 1 != 0
    }

    /// Contiguous field of up to eight bits, least-significant bit first
    ///
    /// The broadcast sends every BCD digit least-significant bit first, so
    /// the field value falls straight out of the shift.
    pub(crate) fn field(&self, offset: u8, width: u8) -> u8 {
        debug_assert!(width <= 8);
        ((self.bits >> offset) & ((1 << width) - 1)) as u8
    }

    /// True if the span, including its trailing parity bit, has an even
    /// number of asserted bits
    pub(crate) fn parity_even(&self, offset: u8, width: u8) -> bool {
        let span = (self.bits >> offset) & ((1 << width) - 1);
        span.count_ones() % 2 == 0
    }
}

/// Collects detector output into frames and closes them out at minute
/// boundaries
///
/// The minute marker announces the boundary, but the minute actually begins
/// with the *next* pulse; the changeover flag spans that gap. A frame is
/// decoded only when the boundary closes it with exactly
/// [`TimeFrame::COMPLETE_LEN`] bits; any other length decodes nothing and
/// simply starts the next minute fresh.
#[derive(Clone, Debug, Default)]
pub(crate) struct Assembler {
    frame: TimeFrame,

    // true between a minute-marker edge and the edge that follows it
    changeover: bool,
}

impl Assembler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Reset to zero initial conditions
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Account for one accepted edge
    ///
    /// Returns a decode attempt exactly when a minute boundary closes a
    /// complete frame.
    pub(crate) fn input(&mut self, edge: Edge) -> Option<TimestampResult> {
        if edge.missed && !self.frame.is_empty() {
            debug!(
                "missed second boundary: discarding {} gathered bits",
                self.frame.len()
            );
            self.frame.clear();
        }

        match edge.pulse {
            Pulse::Marker => {
                let out = if self.changeover {
                    // marker right after a marker: close out all the same
                    self.close_minute()
                } else {
                    None
                };
                self.changeover = true;
                out
            }
            Pulse::Bit(bit) => {
                let out = if self.changeover {
                    self.changeover = false;
                    self.close_minute()
                } else {
                    None
                };
                self.frame.push(bit);
                out
            }
        }
    }

    // A minute boundary: decode if exactly one minute's worth of bits was
    // gathered, and start the next minute fresh either way.
    fn close_minute(&mut self) -> Option<TimestampResult> {
        let frame = core::mem::take(&mut self.frame);
        if frame.is_complete() {
            Some(Timestamp::decode(&frame))
        } else {
            debug!(
                "minute boundary closes {} bits: nothing to decode",
                frame.len()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsig;
    use crate::timestamp::TimestampError;

    fn bit(value: bool) -> Edge {
        Edge {
            pulse: Pulse::Bit(value),
            missed: false,
        }
    }

    const MARKER: Edge = Edge {
        pulse: Pulse::Marker,
        missed: false,
    };

    fn feed_minute(assembler: &mut Assembler, bits: u64) -> Vec<TimestampResult> {
        let mut out = Vec::new();
        out.extend(assembler.input(MARKER));
        for n in 0..u64::from(TimeFrame::COMPLETE_LEN) {
            out.extend(assembler.input(bit(bits >> n & 1 != 0)));
        }
        out
    }

    #[test]
    fn test_frame_field_extraction() {
        let frame = testsig::frame(0b1_0110 << 21);
        assert_eq!(frame.field(21, 4), 0b0110);
        assert!(frame.bit(25));
        assert!(!frame.bit(20));
        // bits 21..=24 hold two asserted bits, 21..=28 hold three
        assert!(frame.parity_even(21, 4));
        assert!(!frame.parity_even(21, 8));
    }

    #[test]
    fn test_frame_goes_stale_at_sixty_bits() {
        let mut frame = TimeFrame::new();
        for _n in 0..70 {
            frame.push(true);
        }
        assert_eq!(frame.len(), 60);
        assert!(!frame.is_complete());

        frame.clear();
        assert!(frame.is_empty());
    }

    #[test]
    fn test_complete_minute_decodes_at_changeover() {
        let mut assembler = Assembler::new();

        let mut out = feed_minute(&mut assembler, testsig::encode(&testsig::MinuteSpec::default()));
        assert!(out.is_empty());

        // the boundary: marker, then the first pulse of the next minute
        out.extend(assembler.input(MARKER));
        assert!(out.is_empty());
        out.extend(assembler.input(bit(false)));

        let timestamp = out.pop().expect("no decode").expect("invalid frame");
        assert_eq!(timestamp.minute, testsig::MinuteSpec::default().minute);
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_minute_is_still_delivered() {
        let mut assembler = Assembler::new();

        // break the minute-parity bit; the decode failure must reach the caller
        let bits = testsig::encode(&testsig::MinuteSpec::default()) ^ (1 << 28);
        let mut out = feed_minute(&mut assembler, bits);
        out.extend(assembler.input(MARKER));
        out.extend(assembler.input(bit(false)));

        assert_eq!(out.pop().expect("no decode"), Err(TimestampError::MinuteParity));
    }

    #[test]
    fn test_short_minute_decodes_nothing() {
        let mut assembler = Assembler::new();

        assembler.input(MARKER);
        for _n in 0..40 {
            assert_eq!(assembler.input(bit(false)), None);
        }
        assert_eq!(assembler.input(MARKER), None);
        assert_eq!(assembler.input(bit(false)), None);
    }

    #[test]
    fn test_missed_boundary_discards_partial_minute() {
        let mut assembler = Assembler::new();

        assembler.input(MARKER);
        for _n in 0..30 {
            assembler.input(bit(true));
        }

        let late = Edge {
            pulse: Pulse::Bit(false),
            missed: true,
        };
        assert_eq!(assembler.input(late), None);
        assert_eq!(assembler.frame.len(), 1);
    }

    #[test]
    fn test_overflowed_minute_decodes_nothing() {
        let mut assembler = Assembler::new();

        // marker was never seen: bits pile up into the stale frame
        assembler.input(MARKER);
        for _n in 0..80 {
            assert_eq!(assembler.input(bit(false)), None);
        }
        assert_eq!(assembler.frame.len(), 60);

        // the next boundary declines to decode and starts fresh
        assert_eq!(assembler.input(MARKER), None);
        assert_eq!(assembler.input(bit(false)), None);
        assert_eq!(assembler.frame.len(), 1);
    }

    #[test]
    fn test_double_marker_closes_the_minute() {
        let mut assembler = Assembler::new();

        feed_minute(&mut assembler, testsig::encode(&testsig::MinuteSpec::default()));
        assembler.input(MARKER);

        // noise turned the changeover pulse into a second marker
        let out = assembler.input(MARKER).expect("no decode");
        assert!(out.is_ok());
        assert!(assembler.frame.is_empty());
    }
}
