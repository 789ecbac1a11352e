//! Wall-clock time decoding.
//!
//! The monitor prints only a 12-hour time of day (`1:23:45.1234567 PM`),
//! with no date. [`TimeDecoder`] turns those strings into absolute
//! timestamps by borrowing the calendar date of a reference instant taken
//! once per run.
//!
//! # Midnight rollover
//!
//! The reference is normally taken after the monitored run has finished, so
//! every event happened at or before it. A time of day later than the
//! reference's own time of day must therefore belong to the previous
//! calendar day, and is moved back by one day. This assumes a session spans
//! at most ~24 hours and that events arrive in non-decreasing order.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static TIME_OF_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{1,2}):([0-9]{2}):([0-9]{2})\.([0-9]+) (AM|PM)$").unwrap()
});

/// A time string that does not match `H:MM:SS.fraction AM|PM`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid time {0:?}")]
pub struct TimeFormatError(pub String);

/// Parse a 12-hour time-of-day string.
///
/// `12 AM` is midnight and `12 PM` is noon. The fractional part is
/// right-padded with zeros or truncated to microseconds.
pub fn parse_time_of_day(text: &str) -> Result<NaiveTime, TimeFormatError> {
    let err = || TimeFormatError(text.to_string());
    let caps = TIME_OF_DAY.captures(text).ok_or_else(err)?;

    let hour: u32 = caps[1].parse().map_err(|_| err())?;
    let minute: u32 = caps[2].parse().map_err(|_| err())?;
    let second: u32 = caps[3].parse().map_err(|_| err())?;
    if !(1..=12).contains(&hour) {
        return Err(err());
    }

    let hour = match &caps[5] {
        "PM" => hour % 12 + 12,
        _ => hour % 12,
    };

    let frac = &caps[4];
    let micros: String = frac.chars().chain(std::iter::repeat('0')).take(6).collect();
    let micros: u32 = micros.parse().map_err(|_| err())?;

    NaiveTime::from_hms_micro_opt(hour, minute, second, micros).ok_or_else(err)
}

/// Render a time of day the way the monitor prints it (7 fractional digits).
pub fn format_time_of_day(time: NaiveTime) -> String {
    let (pm, hour12) = time.hour12();
    format!(
        "{}:{:02}:{:02}.{:06}0 {}",
        hour12,
        time.minute(),
        time.second(),
        time.nanosecond() / 1_000,
        if pm { "PM" } else { "AM" }
    )
}

/// Decodes monitor time-of-day strings into absolute timestamps.
///
/// Each run gets its own decoder; the reference is fixed on first use.
#[derive(Debug, Clone, Default)]
pub struct TimeDecoder {
    reference: Option<NaiveDateTime>,
}

impl TimeDecoder {
    /// A decoder that anchors to the local clock on its first call.
    pub fn new() -> Self {
        Self::default()
    }

    /// A decoder pinned to an explicit reference instant.
    pub fn anchored(reference: NaiveDateTime) -> Self {
        TimeDecoder {
            reference: Some(reference),
        }
    }

    /// The reference instant, if already anchored.
    pub fn reference(&self) -> Option<NaiveDateTime> {
        self.reference
    }

    /// Anchor to the local clock if no reference has been set yet.
    pub fn ensure_anchored(&mut self) -> NaiveDateTime {
        *self
            .reference
            .get_or_insert_with(|| Local::now().naive_local())
    }

    /// Decode one time-of-day string.
    pub fn decode(&mut self, text: &str) -> Result<NaiveDateTime, TimeFormatError> {
        let time = parse_time_of_day(text)?;
        let reference = self.ensure_anchored();
        Ok(place_on_reference_day(reference, time))
    }
}

fn place_on_reference_day(reference: NaiveDateTime, time: NaiveTime) -> NaiveDateTime {
    let date: NaiveDate = reference.date();
    let stamp = date.and_time(time);
    if time > reference.time() {
        stamp - Duration::days(1)
    } else {
        stamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_parse_pm() {
        let t = parse_time_of_day("1:23:45.1234567 PM").unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (13, 23, 45));
        assert_eq!(t.nanosecond(), 123_456_000);
    }

    #[test]
    fn test_parse_pads_short_fraction() {
        let t = parse_time_of_day("9:05:07.5 AM").unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (9, 5, 7));
        assert_eq!(t.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_midnight_and_noon() {
        let midnight = parse_time_of_day("12:00:00.000000 AM").unwrap();
        assert_eq!(midnight.hour(), 0);
        let noon = parse_time_of_day("12:00:00.000000 PM").unwrap();
        assert_eq!(noon.hour(), 12);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "13:00:00.0 PM",
            "0:00:00.0 AM",
            "1:60:00.0 AM",
            "1:00:00 AM",
            "1:00:00.0",
            "1:00:00.0 am",
            "2026-10-17 01:00:00",
            " 1:00:00.0 AM",
        ] {
            assert!(parse_time_of_day(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_same_day_when_earlier_than_reference() {
        let mut decoder = TimeDecoder::anchored(at(2026, 10, 17, 15, 0, 0));
        let t = decoder.decode("2:59:59.0 PM").unwrap();
        assert_eq!(t, at(2026, 10, 17, 14, 59, 59));
    }

    #[test]
    fn test_later_than_reference_is_previous_day() {
        let mut decoder = TimeDecoder::anchored(at(2026, 10, 17, 0, 5, 0));
        let t = decoder.decode("11:58:00.0 PM").unwrap();
        assert_eq!(t, at(2026, 10, 16, 23, 58, 0));
    }

    #[test]
    fn test_rollover_across_midnight() {
        // Run started at 23:59 and ended after midnight.
        let mut decoder = TimeDecoder::anchored(at(2026, 10, 17, 0, 5, 0));
        let before = decoder.decode("11:59:00.0 PM").unwrap();
        let after = decoder.decode("12:01:00.0 AM").unwrap();
        assert_eq!(after.date(), before.date() + Duration::days(1));
        assert!(after > before);
    }

    #[test]
    fn test_anchors_once() {
        let mut decoder = TimeDecoder::new();
        assert!(decoder.reference().is_none());
        decoder.decode("1:00:00.0 AM").unwrap();
        let first = decoder.reference().unwrap();
        decoder.decode("2:00:00.0 AM").unwrap();
        assert_eq!(decoder.reference(), Some(first));
    }

    #[test]
    fn test_format_matches_monitor_layout() {
        let t = NaiveTime::from_hms_micro_opt(13, 4, 5, 120_000).unwrap();
        assert_eq!(format_time_of_day(t), "1:04:05.1200000 PM");
        let t = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        assert_eq!(format_time_of_day(t), "12:00:00.0000000 AM");
    }

    proptest! {
        #[test]
        fn prop_time_of_day_round_trips(
            hour in 1u32..=12,
            minute in 0u32..60,
            second in 0u32..60,
            micros in 0u32..1_000_000,
            pm in any::<bool>(),
        ) {
            let text = format!(
                "{}:{:02}:{:02}.{:06} {}",
                hour, minute, second, micros, if pm { "PM" } else { "AM" }
            );
            let parsed = parse_time_of_day(&text).unwrap();
            let rendered = format_time_of_day(parsed);
            let reparsed = parse_time_of_day(&rendered).unwrap();
            prop_assert_eq!(parsed, reparsed);
            prop_assert_eq!(parsed.hour12(), (pm, hour));
            prop_assert_eq!(parsed.minute(), minute);
            prop_assert_eq!(parsed.second(), second);
        }

        #[test]
        fn prop_decoded_never_after_reference(
            hour in 1u32..=12,
            minute in 0u32..60,
            pm in any::<bool>(),
            ref_hour in 0u32..24,
        ) {
            let reference = at(2026, 3, 1, ref_hour, 30, 0);
            let mut decoder = TimeDecoder::anchored(reference);
            let text = format!("{}:{:02}:00.0 {}", hour, minute, if pm { "PM" } else { "AM" });
            let t = decoder.decode(&text).unwrap();
            prop_assert!(t <= reference);
            prop_assert!(reference - t < Duration::days(1));
        }
    }
}
