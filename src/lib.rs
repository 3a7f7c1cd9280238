//! # funkuhr: DCF77 time signal reception
//!
//! This crate provides a digital receiver for the
//! [DCF77](https://en.wikipedia.org/wiki/DCF77) longwave time broadcast.
//! It turns a stream of boolean carrier samples into validated calendar
//! timestamps, tolerating sampling jitter, missed pulses, and transmission
//! glitches along the way.
//!
//! ## Disclaimer
//!
//! This crate is dual-licensed MIT and Apache 2.0. Read these licenses
//! carefully as they may affect your rights.
//!
//! This crate has not been certified as a timekeeping device for any
//! regulated purpose. Radio-controlled time is easy to jam and easy to
//! spoof; do not let it steer anything safety-critical.
//!
//! ## Example
//!
//! You will first need a demodulated carrier level from a DCF77 ferrite
//! antenna module. These modules are inexpensive and output a single
//! digital pin which follows the 77.5 kHz carrier's amplitude: asserted at
//! full strength, deasserted during the power dips that key the time code.
//! Obtaining that level is beyond the scope of this crate; any GPIO will
//! do. Sample the pin 32 times per second and feed each reading to the
//! receiver together with a millisecond timestamp:
//!
//! ```
//! use funkuhr::Dcf77Receiver;
//!
//! # let antenna = (0u32..64).map(|n| (true, n * 125 / 4));
//! #
//! let mut rx = Dcf77Receiver::new();
//!
//! // antenna yields one (level, time_ms) pair per sampling tick
//! for result in rx.iter(antenna) {
//!     match result {
//!         Ok(timestamp) => println!("it is now {}", timestamp),
//!         Err(err) => println!("rejected minute: {}", err),
//!     }
//! }
//! ```
//!
//! The receiver yields one result per received minute: a decoded
//! [`Timestamp`], or the precise [`TimestampError`] explaining which field
//! of the broadcast failed validation. Invalid minutes are delivered too,
//! because a caller may well accept a good wall-clock time whose date
//! fields were corrupted, and they help with antenna placement.
//!
//! Processing is synchronous and allocation-free, and each sample is
//! handled in small, bounded time, so [`Dcf77Receiver::input`] is safe to
//! call from a periodic timer interrupt. The only notion of time inside
//! the receiver is the millisecond clock supplied by the caller; it may
//! wrap freely around the 32-bit range.
//!
//! ## Background
//!
//! DCF77 transmits from Mainflingen, Germany, and covers most of Europe.
//! Every second the carrier's amplitude drops for 100 ms or 200 ms,
//! encoding a zero or one bit; in the last second of each minute the drop
//! is skipped entirely, and that silence marks the minute boundary. The 59
//! bits gathered between two markers carry the minute, hour, day, weekday,
//! month, year, and time zone of the *following* minute, as BCD digits
//! guarded by three even-parity groups.
//!
//! The broadcast is slow and the carrier is weak, so the receiver leans on
//! redundancy: every sampling phase within a second is averaged against
//! the same phase of the previous fifteen seconds, which pins down the
//! pulse edge even when single samples are corrupted, and pulse widths are
//! classified by counting samples against thresholds rather than matching
//! exact patterns.
//!
//! ## Crate features
//!
//! * `chrono` (default): convert decoded timestamps to
//!   [`chrono::NaiveDateTime`] values via
//!   [`Timestamp::naive_datetime`](struct.Timestamp.html#method.naive_datetime).
//!   If enabled, `chrono` becomes part of this crate's public API.

mod edge;
mod frame;
mod receiver;
mod sampling;
mod smooth;
mod timestamp;

#[cfg(test)]
pub(crate) mod testsig;

pub use frame::TimeFrame;
pub use receiver::{Dcf77Receiver, SourceIter};
pub use timestamp::{
    InvalidDateErr, Timestamp, TimestampError, TimestampResult, UnknownWeekday, Weekday, Zone,
};
