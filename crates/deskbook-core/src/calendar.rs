//! Date and time-of-day normalisation.
//!
//! Dates are calendar days (`YYYY-MM-DD`). Times of day are kept at minute
//! precision: caller input must be `HH:MM`, while values read back from
//! storage may carry seconds (`HH:MM:SS`) and are truncated on the way in,
//! so a stored `09:00:00` and a submitted `09:00` are the same value.

use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveTime, Timelike as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const MINUTE_FORMAT: &str = "%H:%M";
const SECOND_FORMAT: &str = "%H:%M:%S";

// ─── Date ────────────────────────────────────────────────────────────────────

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
  // chrono accepts single-digit months and days; the wire format does not.
  if s.len() != 10 {
    return Err(ValidationError::InvalidDate(s.to_owned()));
  }
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|_| ValidationError::InvalidDate(s.to_owned()))
}

pub fn format_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

// ─── TimeOfDay ───────────────────────────────────────────────────────────────

/// A time of day truncated to the minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
  /// Parse caller input, which must be `HH:MM`.
  pub fn parse(s: &str) -> Result<Self, ValidationError> {
    // chrono accepts single-digit hours and minutes; callers must zero-pad.
    let padded = matches!(
      s.as_bytes(),
      [h1, h2, b':', m1, m2] if [h1, h2, m1, m2].iter().all(|b| b.is_ascii_digit())
    );
    if !padded {
      return Err(ValidationError::InvalidTime(s.to_owned()));
    }
    NaiveTime::parse_from_str(s, MINUTE_FORMAT)
      .map(Self)
      .map_err(|_| ValidationError::InvalidTime(s.to_owned()))
  }

  /// Parse a persisted value, accepting `HH:MM` or `HH:MM:SS`.
  pub fn from_stored(s: &str) -> Result<Self, ValidationError> {
    NaiveTime::parse_from_str(s, SECOND_FORMAT)
      .or_else(|_| NaiveTime::parse_from_str(s, MINUTE_FORMAT))
      .map(Self::truncate)
      .map_err(|_| ValidationError::InvalidTime(s.to_owned()))
  }

  fn truncate(t: NaiveTime) -> Self {
    // hour/minute come from a valid time, so this cannot fail.
    Self(NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t))
  }
}

impl fmt::Display for TimeOfDay {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.format(MINUTE_FORMAT))
  }
}

impl FromStr for TimeOfDay {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Self::from_stored(s) }
}

impl Serialize for TimeOfDay {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for TimeOfDay {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Self::from_stored(&raw).map_err(serde::de::Error::custom)
  }
}

// ─── Comparisons ─────────────────────────────────────────────────────────────

/// Slot equality for optional times: both absent, or both present and equal
/// at minute precision.
pub fn times_equal(a: Option<TimeOfDay>, b: Option<TimeOfDay>) -> bool {
  match (a, b) {
    (None, None) => true,
    (Some(a), Some(b)) => a == b,
    _ => false,
  }
}

/// `true` iff `start` strictly precedes `end`.
pub fn is_ordered(start: TimeOfDay, end: TimeOfDay) -> bool { start < end }

/// Parse and check an optional start/end pair.
///
/// Checks run format first, then pairing, then ordering, so a malformed
/// value is always reported as `InvalidTime` even when the other half is
/// missing.
pub fn validate_time_range(
  start: Option<&str>,
  end: Option<&str>,
) -> Result<(Option<TimeOfDay>, Option<TimeOfDay>), ValidationError> {
  let start = start.map(TimeOfDay::parse).transpose()?;
  let end = end.map(TimeOfDay::parse).transpose()?;
  check_pair(start, end)?;
  Ok((start, end))
}

/// Enforce the pairing and ordering invariant on already-parsed times.
pub fn check_pair(
  start: Option<TimeOfDay>,
  end: Option<TimeOfDay>,
) -> Result<(), ValidationError> {
  match (start, end) {
    (None, None) => Ok(()),
    (Some(start), Some(end)) if is_ordered(start, end) => Ok(()),
    (Some(start), Some(end)) => Err(ValidationError::StartAfterEnd { start, end }),
    _ => Err(ValidationError::IncompleteTimeRange),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn t(s: &str) -> TimeOfDay { TimeOfDay::parse(s).unwrap() }

  #[test]
  fn parse_date_accepts_iso_day() {
    let d = parse_date("2024-03-09").unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    assert_eq!(format_date(d), "2024-03-09");
  }

  #[test]
  fn parse_date_rejects_other_shapes() {
    for bad in ["2024-3-9", "09/03/2024", "2024-02-30", "", "2024-03-09T10:00"] {
      assert_eq!(
        parse_date(bad),
        Err(ValidationError::InvalidDate(bad.to_owned())),
        "{bad:?} should be rejected"
      );
    }
  }

  #[test]
  fn caller_time_must_be_hour_minute() {
    assert_eq!(t("09:30").to_string(), "09:30");
    assert!(TimeOfDay::parse("09:30:00").is_err());
    assert!(TimeOfDay::parse("25:00").is_err());
    assert!(TimeOfDay::parse("noon").is_err());
    for unpadded in ["9:5", "9:05", "09:5", " 9:05", "0905"] {
      assert_eq!(
        TimeOfDay::parse(unpadded),
        Err(ValidationError::InvalidTime(unpadded.to_owned())),
        "{unpadded:?} should be rejected"
      );
    }
  }

  #[test]
  fn stored_time_with_seconds_equals_minute_form() {
    let stored = TimeOfDay::from_stored("09:00:00").unwrap();
    assert_eq!(stored, t("09:00"));
    assert_eq!(stored.to_string(), "09:00");

    let with_seconds = TimeOfDay::from_stored("09:00:45").unwrap();
    assert_eq!(with_seconds, t("09:00"));
  }

  #[test]
  fn times_equal_handles_absence() {
    assert!(times_equal(None, None));
    assert!(!times_equal(Some(t("09:00")), None));
    assert!(!times_equal(None, Some(t("09:00"))));
    assert!(times_equal(
      Some(TimeOfDay::from_stored("09:00:00").unwrap()),
      Some(t("09:00"))
    ));
    assert!(!times_equal(Some(t("09:00")), Some(t("09:01"))));
  }

  #[test]
  fn ordering_is_strict() {
    assert!(is_ordered(t("09:00"), t("10:00")));
    assert!(!is_ordered(t("10:00"), t("09:00")));
    assert!(!is_ordered(t("09:00"), t("09:00")));
  }

  #[test]
  fn validate_time_range_rejects_reversed_and_empty_ranges() {
    assert!(matches!(
      validate_time_range(Some("10:00"), Some("09:00")),
      Err(ValidationError::StartAfterEnd { .. })
    ));
    assert!(matches!(
      validate_time_range(Some("09:00"), Some("09:00")),
      Err(ValidationError::StartAfterEnd { .. })
    ));
    assert_eq!(
      validate_time_range(Some("09:00"), None),
      Err(ValidationError::IncompleteTimeRange)
    );
    assert_eq!(
      validate_time_range(None, Some("9am")),
      Err(ValidationError::InvalidTime("9am".into()))
    );
    assert_eq!(validate_time_range(None, None), Ok((None, None)));
  }

  #[test]
  fn serde_uses_minute_form() {
    let json = serde_json::to_string(&t("08:15")).unwrap();
    assert_eq!(json, "\"08:15\"");
    let back: TimeOfDay = serde_json::from_str("\"08:15:59\"").unwrap();
    assert_eq!(back, t("08:15"));
  }
}
