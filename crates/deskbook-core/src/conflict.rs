//! Slot matching and the overwrite-on-create policy.
//!
//! A new booking never gets rejected for occupying a slot. Every reservation
//! already sitting on the same (space in group, date, start time) slot, in
//! any status, is removed and the new one takes its place. Stores apply the
//! removal and the insert as one atomic unit; see
//! [`crate::store::ReservationStore::supersede_slot`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  calendar::{TimeOfDay, times_equal},
  group::BookingGroup,
  reservation::Reservation,
};

/// The slot a new reservation is about to occupy, widened to its group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTarget {
  pub space_ids:  Vec<Uuid>,
  pub date:       NaiveDate,
  pub start_time: Option<TimeOfDay>,
}

impl SlotTarget {
  pub fn new(group: &BookingGroup, date: NaiveDate, start_time: Option<TimeOfDay>) -> Self {
    Self {
      space_ids: group.space_ids().to_vec(),
      date,
      start_time,
    }
  }

  /// Whether `existing` sits on this slot. Status is ignored:
  /// cancelled rows on the slot are replaced too.
  pub fn occupies(&self, existing: &Reservation) -> bool {
    self.space_ids.contains(&existing.space_id)
      && existing.date == self.date
      && times_equal(existing.start_time, self.start_time)
  }

  /// The subset of `candidates` this slot would displace.
  pub fn occupants<'a>(&self, candidates: &'a [Reservation]) -> Vec<&'a Reservation> {
    candidates.iter().filter(|r| self.occupies(r)).collect()
  }
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// What an engine operation did to an existing record.
///
/// `Cancelled` is a status flip kept for audit; `Superseded` means the row was
/// hard-removed because a new booking replaced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
  Retained,
  Cancelled,
  Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOutcome {
  pub reservation_id: Uuid,
  pub space_id:       Uuid,
  pub disposition:    Disposition,
}

impl RecordOutcome {
  pub fn new(reservation: &Reservation, disposition: Disposition) -> Self {
    Self {
      reservation_id: reservation.reservation_id,
      space_id: reservation.space_id,
      disposition,
    }
  }
}
