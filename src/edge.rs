//! Second-boundary edge detection and pulse classification

#[cfg(not(test))]
use log::{debug, trace};

#[cfg(test)]
use std::println as debug;
#[cfg(test)]
use std::println as trace;

use crate::sampling::{
    EDGE_DEBOUNCE_MS, EDGE_MASK, EDGE_PATTERN, EDGE_TIMEOUT_MS, MARKER_THRESHOLD, PULSE_BODY_MASK,
    PULSE_TRAIL_MASK, ZERO_THRESHOLD,
};

/// What a second's pulse encodes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Pulse {
    /// Carrier dip was present; payload is the decoded time bit
    Bit(bool),

    /// No dip in the raw samples under an averaged edge: the minute marker
    Marker,
}

/// One accepted second-boundary edge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Edge {
    pub(crate) pulse: Pulse,

    /// More than [`EDGE_TIMEOUT_MS`] elapsed since the previous accepted
    /// edge; any partially gathered minute must be discarded.
    pub(crate) missed: bool,
}

/// Finds the leading edge of each second's pulse and classifies the pulse
///
/// The edge is located in the *smoothed* stream, where it is present every
/// second, even in the marker second that carries no pulse of its own,
/// because the preceding seconds of the averaging window put it there. The
/// pulse type is then read from the *raw* stream at a fixed offset behind
/// the edge.
///
/// Classification counts asserted samples against thresholds instead of
/// matching exact patterns, so a single corrupted sample cannot spoil the
/// whole second.
#[derive(Clone, Debug)]
pub(crate) struct EdgeDetector {
    // most recent smoothed samples, newest in bit 0
    smooth_window: u16,

    // most recent raw samples, newest in bit 0
    raw_window: u16,

    // time of the last accepted edge, caller's monotonic milliseconds
    last_edge_ms: u32,
}

impl EdgeDetector {
    pub(crate) fn new() -> Self {
        Self {
            smooth_window: 0,
            raw_window: 0,
            last_edge_ms: 0,
        }
    }

    /// Reset to zero initial conditions
    pub(crate) fn reset(&mut self) {
        self.smooth_window = 0;
        self.raw_window = 0;
        self.last_edge_ms = 0;
    }

    /// Admit one sample pair and report an edge if this tick completes one
    ///
    /// `time_ms` is the caller's monotonic millisecond clock; deltas are
    /// computed with wrapping subtraction, so wraparound of the 32-bit
    /// value is harmless.
    pub(crate) fn input(&mut self, smoothed: bool, raw: bool, time_ms: u32) -> Option<Edge> {
        self.raw_window = (self.raw_window << 1) | u16::from(raw);
        self.smooth_window = (self.smooth_window << 1) | u16::from(smoothed);

        if self.smooth_window & EDGE_MASK != EDGE_PATTERN {
            return None;
        }

        let delta = time_ms.wrapping_sub(self.last_edge_ms);
        if delta < EDGE_DEBOUNCE_MS {
            // a re-trigger of the pulse we already accepted; leave the edge
            // clock untouched
            debug!(
                "edge at {} ms rejected: only {} ms after the previous one",
                time_ms, delta
            );
            return None;
        }

        let missed = delta > EDGE_TIMEOUT_MS;
        if missed {
            debug!(
                "edge at {} ms arrives {} ms after the previous one: second boundary missed",
                time_ms, delta
            );
        }
        self.last_edge_ms = time_ms;

        let body = (self.raw_window & PULSE_BODY_MASK).count_ones();
        let pulse = if body > MARKER_THRESHOLD {
            Pulse::Marker
        } else {
            let trail = (self.raw_window & PULSE_TRAIL_MASK).count_ones();
            Pulse::Bit(trail <= ZERO_THRESHOLD)
        };

        trace!("edge at {} ms: {:?}", time_ms, pulse);
        Some(Edge { pulse, missed })
    }
}
