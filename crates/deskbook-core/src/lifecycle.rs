//! The reservation lifecycle engine.
//!
//! [`Engine`] validates requests, expands spaces into booking groups,
//! applies the overwrite policy on create and the group cascade on cancel.
//! It holds no mutable state of its own; all state lives in the store.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  calendar::{TimeOfDay, check_pair, parse_date, times_equal, validate_time_range},
  clock::{Clock, SystemClock},
  conflict::{Disposition, RecordOutcome, SlotTarget},
  error::ValidationError,
  group::{BookingGroup, group_of},
  reservation::{NewReservation, Reservation, ReservationPatch, ReservationStatus},
  space::Space,
  store::{ReservationFilter, ReservationStore, SpaceCatalog, StoreError as _},
};

/// Bookings may be made for today and up to this many days ahead, inclusive.
pub const BOOKING_WINDOW_DAYS: u64 = 7;

// ─── Results ─────────────────────────────────────────────────────────────────

/// Result of [`Engine::create`].
#[derive(Debug, Clone, Serialize)]
pub struct Booked {
  pub reservation: Reservation,
  pub group:       BookingGroup,
  /// Rows removed from the slot to make room, all `Superseded`.
  pub superseded:  Vec<RecordOutcome>,
}

/// Result of [`Engine::cancel`].
#[derive(Debug, Clone, Serialize)]
pub struct Cancellation {
  pub reservation_id: Uuid,
  pub group:          BookingGroup,
  pub outcomes:       Vec<RecordOutcome>,
}

impl Cancellation {
  pub fn cancelled(&self) -> usize {
    self
      .outcomes
      .iter()
      .filter(|o| o.disposition == Disposition::Cancelled)
      .count()
  }
}

/// Result of [`Engine::cancel_group`].
#[derive(Debug, Clone, Serialize)]
pub struct GroupCancellation {
  pub group:    BookingGroup,
  pub outcomes: Vec<RecordOutcome>,
}

/// Result of [`Engine::availability`].
#[derive(Debug, Clone, Serialize)]
pub struct Availability {
  pub space_id:     Uuid,
  pub date:         NaiveDate,
  /// `true` when the space has no active reservation on `date`.
  pub is_available: bool,
  pub reservations: Vec<Reservation>,
}

// ─── Engine ──────────────────────────────────────────────────────────────────

pub struct Engine<C, R> {
  catalog:      C,
  reservations: R,
  clock:        Arc<dyn Clock>,
}

impl<C, R> Engine<C, R>
where
  C: SpaceCatalog,
  R: ReservationStore,
{
  pub fn new(catalog: C, reservations: R) -> Self {
    Self {
      catalog,
      reservations,
      clock: Arc::new(SystemClock),
    }
  }

  /// Replace the wall clock, e.g. with a [`crate::clock::FixedClock`].
  pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
    self.clock = Arc::new(clock);
    self
  }

  // ── Create ────────────────────────────────────────────────────────────────

  /// Book a slot, replacing whatever occupies it across the space's group.
  ///
  /// Checks run in a fixed order: space existence, date window, time format,
  /// time pairing and ordering.
  pub async fn create(&self, req: NewReservation) -> Result<Booked> {
    let space = self.load_space(req.space_id).await?;

    let date = parse_date(&req.date)?;
    check_window(date, self.clock.today())?;

    let (start_time, end_time) =
      validate_time_range(non_empty(&req.start_time), non_empty(&req.end_time))?;

    let group = group_of(&self.catalog, &space).await?;
    let target = SlotTarget::new(&group, date, start_time);

    let now = self.clock.now();
    let reservation = Reservation {
      reservation_id: Uuid::new_v4(),
      space_id: space.space_id,
      user_id: req.user_id,
      user_name: req.user_name,
      date,
      start_time,
      end_time,
      status: ReservationStatus::Active,
      notes: req.notes,
      created_at: now,
      updated_at: now,
    };

    let removed = self
      .reservations
      .supersede_slot(&target, reservation.clone())
      .await
      .map_err(|e| {
        if e.is_slot_taken() {
          Error::ReservationAlreadyExists
        } else {
          Error::storage(e)
        }
      })?;

    let superseded: Vec<RecordOutcome> = removed
      .iter()
      .map(|r| RecordOutcome::new(r, Disposition::Superseded))
      .collect();

    tracing::info!(
      reservation_id = %reservation.reservation_id,
      space_id = %space.space_id,
      date = %date,
      group_size = group.len(),
      superseded = superseded.len(),
      "reservation created"
    );

    Ok(Booked { reservation, group, superseded })
  }

  // ── Update ────────────────────────────────────────────────────────────────

  /// Apply a partial update to an active reservation.
  ///
  /// The slot is not re-checked against other bookings; a collision is left
  /// to the store's uniqueness constraint and reported as a storage error.
  pub async fn update(&self, id: Uuid, patch: ReservationPatch) -> Result<Reservation> {
    let mut reservation = self.load_reservation(id).await?;
    if reservation.is_cancelled() {
      return Err(Error::CannotUpdateCancelled(id));
    }
    if patch.is_empty() {
      return Ok(reservation);
    }

    if let Some(date) = non_empty(&patch.date) {
      reservation.date = parse_date(date)?;
    }

    let start = non_empty(&patch.start_time).map(TimeOfDay::parse).transpose()?;
    let end = non_empty(&patch.end_time).map(TimeOfDay::parse).transpose()?;
    if start.is_some() || end.is_some() {
      let start = start.or(reservation.start_time);
      let end = end.or(reservation.end_time);
      check_pair(start, end)?;
      reservation.start_time = start;
      reservation.end_time = end;
    }

    if let Some(user_name) = patch.user_name {
      reservation.user_name = user_name;
    }
    if let Some(status) = patch.status {
      reservation.status = status;
    }
    if let Some(notes) = patch.notes {
      reservation.notes = notes;
    }
    reservation.updated_at = self.clock.now();

    self
      .reservations
      .update_reservation(&reservation)
      .await
      .map_err(Error::storage)?;

    tracing::info!(reservation_id = %id, status = %reservation.status, "reservation updated");
    Ok(reservation)
  }

  // ── Cancel ────────────────────────────────────────────────────────────────

  /// Cancel a reservation and, for a multi-room group, the same requester's
  /// matching bookings in the other rooms.
  pub async fn cancel(&self, id: Uuid) -> Result<Cancellation> {
    let reservation = self.load_reservation(id).await?;
    let space = self.load_space(reservation.space_id).await?;
    let group = group_of(&self.catalog, &space).await?;

    let mut outcomes = Vec::new();
    if reservation.is_active() {
      outcomes.push(RecordOutcome::new(&reservation, Disposition::Cancelled));
    } else {
      outcomes.push(RecordOutcome::new(&reservation, Disposition::Retained));
    }

    if !group.is_singleton() {
      let filter = ReservationFilter {
        from: Some(reservation.date),
        to: Some(reservation.date),
        status: Some(ReservationStatus::Active),
        ..Default::default()
      };
      let same_day = self
        .reservations
        .find_reservations(&filter)
        .await
        .map_err(Error::storage)?;

      outcomes.extend(
        same_day
          .iter()
          .filter(|other| group.contains(other.space_id))
          .filter(|other| cascades_with(&reservation, other))
          .map(|other| RecordOutcome::new(other, Disposition::Cancelled)),
      );
    }

    let ids: Vec<Uuid> = outcomes
      .iter()
      .filter(|o| o.disposition == Disposition::Cancelled)
      .map(|o| o.reservation_id)
      .collect();
    if !ids.is_empty() {
      self
        .reservations
        .set_status(&ids, ReservationStatus::Cancelled, self.clock.now())
        .await
        .map_err(Error::storage)?;
    }

    tracing::info!(
      reservation_id = %id,
      group_size = group.len(),
      cancelled = ids.len(),
      "reservation cancelled"
    );

    Ok(Cancellation {
      reservation_id: id,
      group,
      outcomes,
    })
  }

  /// Cancel every active reservation on every room of a meeting-room group.
  pub async fn cancel_group(&self, space_id: Uuid) -> Result<GroupCancellation> {
    let space = self.load_space(space_id).await?;
    if !space.is_meeting_room() {
      return Err(ValidationError::NotMeetingRoom(space_id).into());
    }
    let group = group_of(&self.catalog, &space).await?;

    let mut outcomes = Vec::new();
    for member in group.space_ids() {
      let filter = ReservationFilter {
        space_id: Some(*member),
        status: Some(ReservationStatus::Active),
        ..Default::default()
      };
      let active = self
        .reservations
        .find_reservations(&filter)
        .await
        .map_err(Error::storage)?;
      outcomes.extend(
        active
          .iter()
          .map(|r| RecordOutcome::new(r, Disposition::Cancelled)),
      );
    }

    let ids: Vec<Uuid> = outcomes.iter().map(|o| o.reservation_id).collect();
    if !ids.is_empty() {
      self
        .reservations
        .set_status(&ids, ReservationStatus::Cancelled, self.clock.now())
        .await
        .map_err(Error::storage)?;
    }

    tracing::info!(
      space_id = %space_id,
      group = %group.name,
      group_size = group.len(),
      cancelled = ids.len(),
      "group reservations cancelled"
    );

    Ok(GroupCancellation { group, outcomes })
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub async fn get(&self, id: Uuid) -> Result<Reservation> { self.load_reservation(id).await }

  /// List reservations. Without an explicit status only active ones are
  /// returned.
  pub async fn list(&self, mut filter: ReservationFilter) -> Result<Vec<Reservation>> {
    filter.status.get_or_insert(ReservationStatus::Active);
    self
      .reservations
      .find_reservations(&filter)
      .await
      .map_err(Error::storage)
  }

  /// Active reservations on one space for one day. Only the space itself is
  /// consulted, not the rest of its group.
  pub async fn availability(&self, space_id: Uuid, date: NaiveDate) -> Result<Availability> {
    self.load_space(space_id).await?;
    let filter = ReservationFilter {
      from: Some(date),
      to: Some(date),
      space_id: Some(space_id),
      status: Some(ReservationStatus::Active),
      ..Default::default()
    };
    let reservations = self
      .reservations
      .find_reservations(&filter)
      .await
      .map_err(Error::storage)?;

    Ok(Availability {
      space_id,
      date,
      is_available: reservations.is_empty(),
      reservations,
    })
  }

  /// The booking group a space belongs to.
  pub async fn group(&self, space_id: Uuid) -> Result<BookingGroup> {
    let space = self.load_space(space_id).await?;
    group_of(&self.catalog, &space).await
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  async fn load_space(&self, id: Uuid) -> Result<Space> {
    self
      .catalog
      .find_space(id)
      .await
      .map_err(Error::storage)?
      .ok_or(Error::SpaceNotFound(id))
  }

  async fn load_reservation(&self, id: Uuid) -> Result<Reservation> {
    self
      .reservations
      .find_reservation(id)
      .await
      .map_err(Error::storage)?
      .ok_or(Error::ReservationNotFound(id))
  }
}

/// `today ≤ date ≤ today + BOOKING_WINDOW_DAYS`.
pub fn check_window(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
  if date < today {
    return Err(ValidationError::DateInPast { date, today });
  }
  let latest = today
    .checked_add_days(Days::new(BOOKING_WINDOW_DAYS))
    .unwrap_or(NaiveDate::MAX);
  if date > latest {
    return Err(ValidationError::DateTooFarInFuture { date, latest });
  }
  Ok(())
}

/// Whether cancelling `origin` also cancels `other`: another active booking by
/// the same requester on the same date and times.
fn cascades_with(origin: &Reservation, other: &Reservation) -> bool {
  other.reservation_id != origin.reservation_id
    && other.is_active()
    && other.user_name == origin.user_name
    && other.date == origin.date
    && times_equal(other.start_time, origin.start_time)
    && times_equal(other.end_time, origin.end_time)
}

/// Callers send `""` for "not set".
fn non_empty(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|s| !s.is_empty())
}
