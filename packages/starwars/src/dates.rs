//! ISO-8601 datetime strings floored to calendar dates.
//!
//! Accepted forms, with `T` or a space between date and time:
//!
//! - `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, `YYYYMMDD`
//! - a full date followed by `hh`, `hh:mm`, `hh:mm:ss` or `hh:mm:ss.ffffff`
//!   (compact `hhmm` / `hhmmss` too), optionally suffixed with `Z` or an
//!   offset `±hh`, `±hh:mm`, `±hhmm`
//!
//! The date portion is taken as written; offsets are validated but not
//! applied. `24:00` denotes midnight of the following day.

use chrono::{FixedOffset, NaiveDate, NaiveTime};

use crate::error::{Result, StarWarsError};

/// Convert an ISO datetime string into an ISO date string.
///
/// `None` maps to `None`; unparsable input is an error, never a guessed date.
pub fn datetime_string_to_date_string(datetime: Option<&str>) -> Result<Option<String>> {
    datetime
        .map(|s| parse_iso_date(s).map(|d| d.format("%Y-%m-%d").to_string()))
        .transpose()
}

/// Parse an ISO datetime string and keep only its calendar date.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate> {
    let malformed = || StarWarsError::MalformedDate {
        value: input.to_string(),
    };
    if !input.is_ascii() {
        return Err(malformed());
    }

    let (date_part, time_part) = match input.find(['T', ' ']) {
        Some(i) => (&input[..i], Some(&input[i + 1..])),
        None => (input, None),
    };

    let date = parse_date(date_part, time_part.is_some()).ok_or_else(malformed)?;
    match time_part {
        None => Ok(date),
        Some(time) => match parse_time(time).ok_or_else(malformed)? {
            Clock::SameDay => Ok(date),
            Clock::EndOfDay => date.succ_opt().ok_or_else(malformed),
        },
    }
}

enum Clock {
    SameDay,
    EndOfDay,
}

fn digits(s: &str, len: usize) -> Option<u32> {
    if s.len() == len && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

/// Date portion; a time may only follow a complete date.
fn parse_date(s: &str, has_time: bool) -> Option<NaiveDate> {
    let (year, month, day) = match s.len() {
        4 if !has_time => (digits(s, 4)?, 1, 1),
        7 if !has_time && &s[4..5] == "-" => (digits(&s[..4], 4)?, digits(&s[5..], 2)?, 1),
        8 => (
            digits(&s[..4], 4)?,
            digits(&s[4..6], 2)?,
            digits(&s[6..], 2)?,
        ),
        10 if &s[4..5] == "-" && &s[7..8] == "-" => (
            digits(&s[..4], 4)?,
            digits(&s[5..7], 2)?,
            digits(&s[8..], 2)?,
        ),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

fn parse_time(s: &str) -> Option<Clock> {
    let (clock, offset) = split_offset(s);
    if let Some(offset) = offset {
        parse_offset(offset)?;
    }

    let (hms, fraction) = match clock.find(['.', ',']) {
        Some(i) => (&clock[..i], Some(&clock[i + 1..])),
        None => (clock, None),
    };
    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    let (hour, minute, second) = match hms.len() {
        2 => (digits(hms, 2)?, 0, 0),
        4 => (digits(&hms[..2], 2)?, digits(&hms[2..], 2)?, 0),
        5 if &hms[2..3] == ":" => (digits(&hms[..2], 2)?, digits(&hms[3..], 2)?, 0),
        6 => (
            digits(&hms[..2], 2)?,
            digits(&hms[2..4], 2)?,
            digits(&hms[4..], 2)?,
        ),
        8 if &hms[2..3] == ":" && &hms[5..6] == ":" => (
            digits(&hms[..2], 2)?,
            digits(&hms[3..5], 2)?,
            digits(&hms[6..], 2)?,
        ),
        _ => return None,
    };
    if fraction.is_some() && hms.len() < 6 {
        return None;
    }

    if hour == 24 {
        let fraction_is_zero = fraction.map_or(true, |f| f.bytes().all(|b| b == b'0'));
        return (minute == 0 && second == 0 && fraction_is_zero).then_some(Clock::EndOfDay);
    }
    NaiveTime::from_hms_opt(hour, minute, second)?;
    Some(Clock::SameDay)
}

/// Split `clock` from a trailing `Z` or `±offset`.
fn split_offset(s: &str) -> (&str, Option<&str>) {
    if let Some(clock) = s.strip_suffix('Z') {
        return (clock, None);
    }
    match s.find(['+', '-']) {
        Some(i) => (&s[..i], Some(&s[i..])),
        None => (s, None),
    }
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    let sign = if s.starts_with('-') { -1 } else { 1 };
    let body = &s[1..];
    let (hours, minutes) = match body.len() {
        2 => (digits(body, 2)?, 0),
        4 => (digits(&body[..2], 2)?, digits(&body[2..], 2)?),
        5 if &body[2..3] == ":" => (digits(&body[..2], 2)?, digits(&body[3..], 2)?),
        _ => return None,
    };
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_maps_to_none() {
        assert_eq!(datetime_string_to_date_string(None).unwrap(), None);
    }

    #[test]
    fn test_partial_and_full_forms() {
        let cases = [
            ("2021", "2021-01-01"),
            ("2021-06", "2021-06-01"),
            ("2021-06-12", "2021-06-12"),
            ("20210612", "2021-06-12"),
            ("2021-06-12T12", "2021-06-12"),
            ("2021-06-12T12:34", "2021-06-12"),
            ("2021-06-12T12:34:56", "2021-06-12"),
            ("2021-06-12T12:34:56.987654", "2021-06-12"),
            ("2021-06-12T12:34:56.987654Z", "2021-06-12"),
            ("2021-06-12T12:34:56.987654+01:23", "2021-06-12"),
            ("2021-06-12T23:59:59-08:00", "2021-06-12"),
            ("2021-06-12 12:34:56", "2021-06-12"),
            ("20210612T123456+0100", "2021-06-12"),
            ("2014-12-20T21:17:56.891000Z", "2014-12-20"),
        ];
        for (input, expected) in cases {
            assert_eq!(
                datetime_string_to_date_string(Some(input)).unwrap().as_deref(),
                Some(expected),
                "input: {input}"
            );
        }
    }

    #[test]
    fn test_midnight_24_rolls_over() {
        assert_eq!(
            parse_iso_date("2021-06-12T24:00").unwrap(),
            NaiveDate::from_ymd_opt(2021, 6, 13).unwrap()
        );
        assert!(parse_iso_date("2021-06-12T24:00:01").is_err());
    }

    #[test]
    fn test_malformed_inputs_are_errors() {
        let cases = [
            "",
            "yesterday",
            "2021-13-01",
            "2021-02-30",
            "2021-06-12T25",
            "2021-06-12T12:60",
            "2021-06-12T12:34:56.",
            "2021-06-12T12:34:56+25:00",
            "2021-06T12",
            "21-06-12",
            "2021-06-12T",
        ];
        for input in cases {
            let err = parse_iso_date(input).unwrap_err();
            assert!(
                matches!(&err, StarWarsError::MalformedDate { value } if value == input),
                "input: {input}"
            );
        }
    }
}
