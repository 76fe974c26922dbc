//! Reservations: one space, one date, an optional time interval.
//!
//! Only two states exist. `Cancelled` is terminal; a cancelled record is kept
//! for audit and never edited again.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::calendar::TimeOfDay;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReservationStatus {
  Active,
  Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
  pub reservation_id: Uuid,
  pub space_id:       Uuid,
  pub user_id:        String,
  /// Display name of the requester; the group cascade matches on it.
  pub user_name:      String,
  pub date:           NaiveDate,
  /// `None` together with `end_time` means an all-day booking.
  pub start_time:     Option<TimeOfDay>,
  pub end_time:       Option<TimeOfDay>,
  pub status:         ReservationStatus,
  pub notes:          String,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

impl Reservation {
  pub fn is_active(&self) -> bool { self.status == ReservationStatus::Active }

  pub fn is_cancelled(&self) -> bool { self.status == ReservationStatus::Cancelled }
}

/// Input to [`crate::lifecycle::Engine::create`].
///
/// Date and times are raw caller strings; the engine parses them so that
/// validation failures are reported in a fixed order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReservation {
  pub space_id:   Uuid,
  pub user_id:    String,
  #[serde(default)]
  pub user_name:  String,
  pub date:       String,
  pub start_time: Option<String>,
  pub end_time:   Option<String>,
  #[serde(default)]
  pub notes:      String,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationPatch {
  pub user_name:  Option<String>,
  pub date:       Option<String>,
  pub start_time: Option<String>,
  pub end_time:   Option<String>,
  pub status:     Option<ReservationStatus>,
  pub notes:      Option<String>,
}

impl ReservationPatch {
  pub fn is_empty(&self) -> bool {
    self.user_name.is_none()
      && self.date.is_none()
      && self.start_time.is_none()
      && self.end_time.is_none()
      && self.status.is_none()
      && self.notes.is_none()
  }
}
