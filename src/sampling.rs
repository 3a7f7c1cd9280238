//! Tuned signal parameters
//!
//! These values were tuned together against real-life sampling data. The
//! pulse-counting thresholds assume the sampling rate and the detection
//! window shapes below; do not change one of them without re-deriving the
//! others.

/// Input samples taken per second
pub(crate) const SAMPLES_PER_SECOND: u32 = 32;

/// Seconds covered by the per-phase moving average
///
/// Odd, so a strict majority always exists.
pub(crate) const SECONDS_TO_SMOOTH: u32 = 15;

/// Raw samples held by the smoothing window
pub(crate) const SMOOTH_WINDOW_LEN: usize = (SAMPLES_PER_SECOND * SECONDS_TO_SMOOTH) as usize;

/// Leading-edge signature in the smoothed stream: three asserted samples
/// followed by three deasserted ones, with the newest four samples left
/// unconstrained so the raw pulse windows can be inspected at a fixed offset
/// from the edge.
pub(crate) const EDGE_PATTERN: u16 = 0b11_1000_0000;

/// Smoothed-window bits examined by [`EDGE_PATTERN`]
pub(crate) const EDGE_MASK: u16 = 0b11_1111_0000;

/// Raw-window bits covering the pulse body plus one trailing bonus sample
pub(crate) const PULSE_BODY_MASK: u16 = 0b0111_1111;

/// Raw-window bits covering the pulse's second half plus the bonus sample
pub(crate) const PULSE_TRAIL_MASK: u16 = 0b0000_1111;

/// More than this many asserted samples under [`PULSE_BODY_MASK`] means the
/// second carried no pulse at all: the minute marker.
pub(crate) const MARKER_THRESHOLD: u32 = 5;

/// More than this many asserted samples under [`PULSE_TRAIL_MASK`] means the
/// pulse ended early: a short pulse, time bit zero.
pub(crate) const ZERO_THRESHOLD: u32 = 1;

/// Edges closer together than this are re-triggers of the same pulse
pub(crate) const EDGE_DEBOUNCE_MS: u32 = 500;

/// Edges further apart than this mean at least one second boundary was missed
pub(crate) const EDGE_TIMEOUT_MS: u32 = 1500;
