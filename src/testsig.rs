//! Synthetic broadcast signals for tests
//!
//! Builds wire-exact minute frames and sampled signal streams, so receiver
//! tests can feed a clean (or deliberately damaged) broadcast without any
//! recorded data.

use crate::frame::TimeFrame;
use crate::sampling::SAMPLES_PER_SECOND;

/// Fields of one broadcast minute
#[derive(Clone, Copy, Debug)]
pub(crate) struct MinuteSpec {
    pub minute: u8,
    pub hour: u8,
    pub dst: bool,
    pub day: u8,
    pub weekday: u8,
    pub month: u8,
    pub year: u8,
}

impl Default for MinuteSpec {
    // Monday 2025-03-24, 10:30 CET
    fn default() -> Self {
        Self {
            minute: 30,
            hour: 10,
            dst: false,
            day: 24,
            weekday: 1,
            month: 3,
            year: 25,
        }
    }
}

/// Raw digit values of one broadcast minute, before parity
///
/// Unlike [`MinuteSpec`] the digits are independent, so out-of-range values
/// can be injected while the parity bits stay consistent.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RawSpec {
    pub minute_ones: u8,
    pub minute_tens: u8,
    pub hour_ones: u8,
    pub hour_tens: u8,
    pub day_ones: u8,
    pub day_tens: u8,
    pub weekday: u8,
    pub month_ones: u8,
    pub month_tens: u8,
    pub year_ones: u8,
    pub year_tens: u8,
    pub dst: bool,
}

impl From<&MinuteSpec> for RawSpec {
    fn from(spec: &MinuteSpec) -> Self {
        Self {
            minute_ones: spec.minute % 10,
            minute_tens: spec.minute / 10,
            hour_ones: spec.hour % 10,
            hour_tens: spec.hour / 10,
            day_ones: spec.day % 10,
            day_tens: spec.day / 10,
            weekday: spec.weekday,
            month_ones: spec.month % 10,
            month_tens: spec.month / 10,
            year_ones: spec.year % 10,
            year_tens: spec.year / 10,
            dst: spec.dst,
        }
    }
}

/// Wire bits for one minute, bit 0 first received, parity bits computed
pub(crate) fn encode(spec: &MinuteSpec) -> u64 {
    assemble(&RawSpec::from(spec))
}

/// Wire bits with raw digits adjusted before the parity bits are computed
pub(crate) fn encode_raw(adjust: impl FnOnce(&mut RawSpec)) -> u64 {
    let mut raw = RawSpec::from(&MinuteSpec::default());
    adjust(&mut raw);
    assemble(&raw)
}

fn assemble(raw: &RawSpec) -> u64 {
    let mut bits = 0u64;

    put(&mut bits, 17, if raw.dst { 0b01 } else { 0b10 });
    put(&mut bits, 20, 1);

    put(&mut bits, 21, raw.minute_ones);
    put(&mut bits, 25, raw.minute_tens);
    let minute_parity = parity_of(bits, 21, 7);
    put(&mut bits, 28, minute_parity);

    put(&mut bits, 29, raw.hour_ones);
    put(&mut bits, 33, raw.hour_tens);
    let hour_parity = parity_of(bits, 29, 6);
    put(&mut bits, 35, hour_parity);

    put(&mut bits, 36, raw.day_ones);
    put(&mut bits, 40, raw.day_tens);
    put(&mut bits, 42, raw.weekday);
    put(&mut bits, 45, raw.month_ones);
    put(&mut bits, 49, raw.month_tens);
    put(&mut bits, 50, raw.year_ones);
    put(&mut bits, 54, raw.year_tens);
    let date_parity = parity_of(bits, 36, 22);
    put(&mut bits, 58, date_parity);

    bits
}

// place a value at a bit offset, least-significant bit first
fn put(bits: &mut u64, offset: u8, value: u8) {
    *bits |= u64::from(value) << offset;
}

// the parity bit completing a span to an even number of asserted bits
fn parity_of(bits: u64, offset: u8, width: u8) -> u8 {
    (((bits >> offset) & ((1 << width) - 1)).count_ones() % 2) as u8
}

/// A [`TimeFrame`] holding the 59 least-significant wire bits
pub(crate) fn frame(bits: u64) -> TimeFrame {
    let mut frame = TimeFrame::new();
    for n in 0..u64::from(TimeFrame::COMPLETE_LEN) {
        frame.push(bits >> n & 1 != 0);
    }
    frame
}

/// One second of broadcast signal
#[derive(Clone, Copy, Debug)]
pub(crate) enum Second {
    /// Carrier dip at the start of the second: 100 ms for a zero bit,
    /// 200 ms for a one bit
    Bit(bool),

    /// No dip: the minute marker
    Marker,

    /// The sampling source stalls for the whole second; time passes but
    /// no samples are delivered
    Dropped,
}

/// The 59 bit-seconds of one minute, first transmitted first
pub(crate) fn minute_seconds(bits: u64) -> Vec<Second> {
    (0..u64::from(TimeFrame::COMPLETE_LEN))
        .map(|n| Second::Bit(bits >> n & 1 != 0))
        .collect()
}

/// Sampled `(level, time_ms)` ticks for a run of seconds
///
/// The level is asserted while the carrier is at full strength and drops
/// during each second's pulse, sampled at [`SAMPLES_PER_SECOND`]. Time
/// starts at `start_ms` and wraps like the caller's real millisecond clock.
pub(crate) fn ticks_from(seconds: &[Second], start_ms: u32) -> Vec<(bool, u32)> {
    let mut out = Vec::new();
    let mut tick = 0u64;
    for second in seconds {
        for phase in 0..SAMPLES_PER_SECOND {
            let time_ms = start_ms.wrapping_add((tick * 1000 / u64::from(SAMPLES_PER_SECOND)) as u32);
            tick += 1;
            let level = match second {
                // 100 ms is about three samples, 200 ms about six
                Second::Bit(false) => phase >= 3,
                Second::Bit(true) => phase >= 6,
                Second::Marker => true,
                Second::Dropped => continue,
            };
            out.push((level, time_ms));
        }
    }
    out
}

/// [`ticks_from`] with the clock starting at zero
pub(crate) fn ticks(seconds: &[Second]) -> Vec<(bool, u32)> {
    ticks_from(seconds, 0)
}
