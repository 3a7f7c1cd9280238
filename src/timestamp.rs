//! Decoded timestamps and the time-code decoder

use core::convert::TryFrom;
use core::fmt;

use strum::EnumMessage;
use thiserror::Error;

use crate::frame::TimeFrame;

/// Outcome of decoding one gathered minute
pub type TimestampResult = Result<Timestamp, TimestampError>;

/// Broadcast time zone
///
/// The transmitter announces its zone in two complementary bits, one for
/// CEST and one for CET, so daylight saving time falls out of the zone.
/// Zones may be shown by their abbreviation or as a human-readable string:
///
/// ```
/// use funkuhr::Zone;
///
/// assert_eq!("CEST", Zone::Cest.as_str());
/// assert_eq!("Central European Summer Time", &format!("{}", Zone::Cest));
/// assert!(Zone::Cest.is_dst());
/// assert!(!Zone::Cet.is_dst());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::EnumMessage)]
pub enum Zone {
    /// Central European Time, UTC+1
    #[strum(serialize = "CET", detailed_message = "Central European Time")]
    Cet,

    /// Central European Summer Time, UTC+2
    #[strum(serialize = "CEST", detailed_message = "Central European Summer Time")]
    Cest,
}

impl Zone {
    /// True when daylight saving time is in effect
    pub fn is_dst(&self) -> bool {
        matches!(self, Zone::Cest)
    }

    /// Zone abbreviation, like "`CET`"
    pub fn as_str(&self) -> &'static str {
        self.get_serializations()[0]
    }

    /// Human-readable zone name
    pub fn as_display_str(&self) -> &'static str {
        self.get_detailed_message().expect("missing definition")
    }
}

impl AsRef<str> for Zone {
    fn as_ref(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_display_str().fmt(f)
    }
}

/// Day of the week, as broadcast: Monday is 1, Sunday is 7
///
/// ```
/// use std::convert::TryFrom;
/// use funkuhr::Weekday;
///
/// assert_eq!(Ok(Weekday::Sunday), Weekday::try_from(7));
/// assert_eq!(7, Weekday::Sunday.number());
/// assert_eq!("Sun", Weekday::Sunday.as_str());
/// assert_eq!("Sunday", &format!("{}", Weekday::Sunday));
///
/// // zero is never broadcast
/// assert!(Weekday::try_from(0).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::EnumMessage)]
pub enum Weekday {
    #[strum(serialize = "Mon", detailed_message = "Monday")]
    Monday = 1,
    #[strum(serialize = "Tue", detailed_message = "Tuesday")]
    Tuesday = 2,
    #[strum(serialize = "Wed", detailed_message = "Wednesday")]
    Wednesday = 3,
    #[strum(serialize = "Thu", detailed_message = "Thursday")]
    Thursday = 4,
    #[strum(serialize = "Fri", detailed_message = "Friday")]
    Friday = 5,
    #[strum(serialize = "Sat", detailed_message = "Saturday")]
    Saturday = 6,
    #[strum(serialize = "Sun", detailed_message = "Sunday")]
    Sunday = 7,
}

impl Weekday {
    /// Broadcast number, 1 (Monday) through 7 (Sunday)
    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// Three-letter abbreviation, like "`Mon`"
    pub fn as_str(&self) -> &'static str {
        self.get_serializations()[0]
    }

    /// Full English name
    pub fn as_display_str(&self) -> &'static str {
        self.get_detailed_message().expect("missing definition")
    }
}

impl AsRef<str> for Weekday {
    fn as_ref(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_display_str().fmt(f)
    }
}

/// Error converting a number outside 1..=7 into a [`Weekday`]
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[error("weekday numbers run from 1 (Monday) through 7 (Sunday)")]
pub struct UnknownWeekday {}

impl TryFrom<u8> for Weekday {
    type Error = UnknownWeekday;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Weekday::Monday),
            2 => Ok(Weekday::Tuesday),
            3 => Ok(Weekday::Wednesday),
            4 => Ok(Weekday::Thursday),
            5 => Ok(Weekday::Friday),
            6 => Ok(Weekday::Saturday),
            7 => Ok(Weekday::Sunday),
            _ => Err(UnknownWeekday {}),
        }
    }
}

/// Reason a gathered minute of time code failed validation
///
/// Every check the decoder performs has its own variant, in the order the
/// checks run, so a caller (or a log reader) can tell exactly which field
/// of the broadcast was corrupted. Transient signal trouble tends to show
/// up here as parity errors; a receiver that keeps reporting the same
/// range error is probably mis-synchronized.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimestampError {
    /// The start-of-minute bit is broadcast as zero in every minute
    #[error("start-of-minute bit is asserted")]
    StartOfMinute,

    /// The zone bits announce neither CET nor CEST
    #[error("zone bits announce neither CET nor CEST")]
    Zone,

    /// The start-of-time bit is broadcast as one in every minute
    #[error("start-of-time bit is deasserted")]
    StartOfTime,

    /// Minute ones digit is not a BCD digit
    #[error("minute ones digit exceeds 9")]
    MinuteOnesRange,

    /// Minute tens digit exceeds 5
    #[error("minute tens digit exceeds 5")]
    MinuteTensRange,

    /// The minute group has an odd number of asserted bits
    #[error("minute group fails even parity")]
    MinuteParity,

    /// Hour ones digit is not a BCD digit
    #[error("hour ones digit exceeds 9")]
    HourOnesRange,

    /// Hour tens digit exceeds 2
    #[error("hour tens digit exceeds 2")]
    HourTensRange,

    /// Both hour digits are in range but the hour itself is not
    #[error("hour exceeds 23")]
    HourRange,

    /// The hour group has an odd number of asserted bits
    #[error("hour group fails even parity")]
    HourParity,

    /// Day ones digit is not a BCD digit
    #[error("day ones digit exceeds 9")]
    DayOnesRange,

    /// Day of month is outside 1 through 31
    #[error("day is outside 1 through 31")]
    DayRange,

    /// Weekday zero is never broadcast
    #[error("weekday is zero")]
    WeekdayRange,

    /// Month ones digit is not a BCD digit
    #[error("month ones digit exceeds 9")]
    MonthOnesRange,

    /// Month is outside 1 through 12
    #[error("month is outside 1 through 12")]
    MonthRange,

    /// Year ones digit is not a BCD digit
    #[error("year ones digit exceeds 9")]
    YearOnesRange,

    /// Year tens digit is not a BCD digit
    #[error("year tens digit exceeds 9")]
    YearTensRange,

    /// The date group has an odd number of asserted bits
    #[error("date group fails even parity")]
    DateParity,
}

/// The decoded calendar fields do not form a real date
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[error("decoded fields do not form a valid calendar date")]
pub struct InvalidDateErr {}

/// One fully-decoded minute of the time broadcast
///
/// The timestamp describes the minute that *begins* at the minute marker
/// which completed the frame, in the broadcast's local zone. The year is
/// broadcast without its century.
///
/// Decoding is a pure function of the frame bits:
///
/// ```
/// use funkuhr::{TimeFrame, Timestamp, TimestampError};
///
/// // Monday 2025-03-24, 10:30 CET, bits in received order
/// const WIRE: u64 = (1 << 18) | (1 << 20) | (1 << 25) | (1 << 26)
///     | (1 << 33) | (1 << 35) | (1 << 38) | (1 << 41) | (1 << 42)
///     | (1 << 45) | (1 << 46) | (1 << 50) | (1 << 52) | (1 << 55);
///
/// let mut frame = TimeFrame::new();
/// for n in 0..59 {
///     frame.push(WIRE >> n & 1 != 0);
/// }
///
/// let ts = Timestamp::decode(&frame).expect("clean frame");
/// assert_eq!((ts.hour, ts.minute), (10, 30));
/// assert_eq!("Mon 24.03.25 10:30 CET", &format!("{}", ts));
///
/// // an all-zero frame announces no zone at all
/// let ts = Timestamp::decode(&TimeFrame::new());
/// assert_eq!(Err(TimestampError::Zone), ts);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Timestamp {
    /// Minute of the hour, 0 through 59
    pub minute: u8,

    /// Hour of the day, 0 through 23
    pub hour: u8,

    /// Broadcast zone; CEST means daylight saving time is in effect
    pub zone: Zone,

    /// Day of the month, 1 through 31
    pub day: u8,

    /// Day of the week
    pub weekday: Weekday,

    /// Month, 1 through 12
    pub month: u8,

    /// Year within its century, 0 through 99
    pub year: u8,

    /// The zone changes over at the end of the current hour
    pub dst_change_announced: bool,

    /// A leap second is inserted at the end of the current hour
    pub leap_second_announced: bool,
}

impl Timestamp {
    /// Decode one gathered minute of time code
    ///
    /// Validates structure, digit ranges, combined-field ranges, and the
    /// three even-parity groups, stopping at the first failing check. Each
    /// BCD digit is range-checked before the combined field is formed; a
    /// combined field can still be out of range with both digits in range.
    /// Digits that are structurally confined by their bit width (day tens,
    /// month tens) carry no check of their own.
    pub fn decode(frame: &TimeFrame) -> TimestampResult {
        // Start of minute: always broadcast as zero.
        if frame.bit(0) {
            return Err(TimestampError::StartOfMinute);
        }

        // Zone: one bit each for CEST and CET; exactly one must be set.
        let zone = match frame.field(17, 2) {
            0b01 => Zone::Cest,
            0b10 => Zone::Cet,
            _ => return Err(TimestampError::Zone),
        };

        // Start of encoded time: always broadcast as one.
        if !frame.bit(20) {
            return Err(TimestampError::StartOfTime);
        }

        let minute_ones = frame.field(21, 4);
        if minute_ones > 9 {
            return Err(TimestampError::MinuteOnesRange);
        }
        let minute_tens = frame.field(25, 3);
        if minute_tens > 5 {
            return Err(TimestampError::MinuteTensRange);
        }
        let minute = minute_tens * 10 + minute_ones;
        if !frame.parity_even(21, 8) {
            return Err(TimestampError::MinuteParity);
        }

        let hour_ones = frame.field(29, 4);
        if hour_ones > 9 {
            return Err(TimestampError::HourOnesRange);
        }
        let hour_tens = frame.field(33, 2);
        if hour_tens > 2 {
            return Err(TimestampError::HourTensRange);
        }
        let hour = hour_tens * 10 + hour_ones;
        if hour > 23 {
            return Err(TimestampError::HourRange);
        }
        if !frame.parity_even(29, 7) {
            return Err(TimestampError::HourParity);
        }

        let day_ones = frame.field(36, 4);
        if day_ones > 9 {
            return Err(TimestampError::DayOnesRange);
        }
        let day = frame.field(40, 2) * 10 + day_ones;
        if day == 0 || day > 31 {
            return Err(TimestampError::DayRange);
        }

        let weekday =
            Weekday::try_from(frame.field(42, 3)).map_err(|_| TimestampError::WeekdayRange)?;

        let month_ones = frame.field(45, 4);
        if month_ones > 9 {
            return Err(TimestampError::MonthOnesRange);
        }
        let month = frame.field(49, 1) * 10 + month_ones;
        if month == 0 || month > 12 {
            return Err(TimestampError::MonthRange);
        }

        let year_ones = frame.field(50, 4);
        if year_ones > 9 {
            return Err(TimestampError::YearOnesRange);
        }
        let year_tens = frame.field(54, 4);
        if year_tens > 9 {
            return Err(TimestampError::YearTensRange);
        }
        let year = year_tens * 10 + year_ones;

        // Parity over every date field plus the parity bit itself.
        if !frame.parity_even(36, 23) {
            return Err(TimestampError::DateParity);
        }

        Ok(Timestamp {
            minute,
            hour,
            zone,
            day,
            weekday,
            month,
            year,
            dst_change_announced: frame.bit(16),
            leap_second_announced: frame.bit(19),
        })
    }

    /// True when daylight saving time is in effect
    pub fn dst(&self) -> bool {
        self.zone.is_dst()
    }

    /// Calendar date and wall-clock time as a [`chrono::NaiveDateTime`]
    ///
    /// The broadcast omits the century; this method pins it to 2000–2099.
    /// An error is returned when the decoded fields do not form a real
    /// calendar date (such as 31 February, which passes every per-field
    /// range check) or when the broadcast weekday contradicts the date.
    ///
    /// Requires `chrono`.
    #[cfg(feature = "chrono")]
    pub fn naive_datetime(&self) -> Result<chrono::NaiveDateTime, InvalidDateErr> {
        use chrono::Datelike;

        let date = chrono::NaiveDate::from_ymd_opt(
            2000 + i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )
        .ok_or(InvalidDateErr {})?;

        if date.weekday().number_from_monday() != u32::from(self.weekday.number()) {
            return Err(InvalidDateErr {});
        }

        date.and_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .ok_or(InvalidDateErr {})
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}.{:02}.{:02} {:02}:{:02} {}",
            self.weekday.as_str(),
            self.day,
            self.month,
            self.year,
            self.hour,
            self.minute,
            self.zone.as_str()
        )
    }
}
