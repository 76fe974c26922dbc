//! Error types for `deskbook-core`.
//!
//! Every domain error maps to exactly one [`ErrorKind`] and one stable
//! machine-readable code. Store failures are carried opaquely.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::calendar::TimeOfDay;

/// Input that failed validation before any state was touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("invalid date {0:?} (use YYYY-MM-DD)")]
  InvalidDate(String),

  #[error("invalid time {0:?} (use HH:MM)")]
  InvalidTime(String),

  #[error("cannot reserve dates in the past: {date} is before {today}")]
  DateInPast { date: NaiveDate, today: NaiveDate },

  #[error("cannot reserve more than 1 week in advance: {date} is after {latest}")]
  DateTooFarInFuture { date: NaiveDate, latest: NaiveDate },

  #[error("start time {start} must be before end time {end}")]
  StartAfterEnd { start: TimeOfDay, end: TimeOfDay },

  #[error("start and end time must be given together")]
  IncompleteTimeRange,

  #[error("space {0} is not a meeting room")]
  NotMeetingRoom(Uuid),
}

impl ValidationError {
  pub fn code(&self) -> &'static str {
    match self {
      Self::InvalidDate(_) => "INVALID_DATE",
      Self::InvalidTime(_) => "INVALID_TIME",
      Self::DateInPast { .. } => "DATE_IN_PAST",
      Self::DateTooFarInFuture { .. } => "DATE_TOO_FAR_IN_FUTURE",
      Self::StartAfterEnd { .. } => "START_AFTER_END",
      Self::IncompleteTimeRange => "INCOMPLETE_TIME_RANGE",
      Self::NotMeetingRoom(_) => "NOT_MEETING_ROOM",
    }
  }
}

/// Coarse classification of [`Error`], stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  Validation,
  CannotUpdateCancelled,
  Conflict,
  Storage,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("reservation not found: {0}")]
  ReservationNotFound(Uuid),

  #[error("space not found: {0}")]
  SpaceNotFound(Uuid),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("cannot update cancelled reservation {0}")]
  CannotUpdateCancelled(Uuid),

  /// The active-slot uniqueness backstop rejected the write. Only reachable
  /// when two creates race for the same slot; the caller may retry.
  #[error("space is already reserved for this time slot")]
  ReservationAlreadyExists,

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn storage<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Storage(Box::new(err))
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::ReservationNotFound(_) | Self::SpaceNotFound(_) => ErrorKind::NotFound,
      Self::Validation(_) => ErrorKind::Validation,
      Self::CannotUpdateCancelled(_) => ErrorKind::CannotUpdateCancelled,
      Self::ReservationAlreadyExists => ErrorKind::Conflict,
      Self::Storage(_) => ErrorKind::Storage,
    }
  }

  /// Machine-readable code for the calling layer. Storage failures all
  /// share `INTERNAL` so no store detail leaks through the code.
  pub fn code(&self) -> &'static str {
    match self {
      Self::ReservationNotFound(_) => "RESERVATION_NOT_FOUND",
      Self::SpaceNotFound(_) => "SPACE_NOT_FOUND",
      Self::Validation(v) => v.code(),
      Self::CannotUpdateCancelled(_) => "CANNOT_UPDATE_CANCELLED",
      Self::ReservationAlreadyExists => "RESERVATION_ALREADY_EXISTS",
      Self::Storage(_) => "INTERNAL",
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
