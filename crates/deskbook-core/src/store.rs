//! Collaborator traits: the space catalog and the reservation store.
//!
//! Both are implemented by storage backends (e.g. `deskbook-store-sqlite`).
//! The engine depends on these abstractions only.

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  conflict::SlotTarget,
  reservation::{Reservation, ReservationStatus},
  space::{Space, SpaceKind},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`ReservationStore::find_reservations`]. Every field is an
/// optional AND-ed restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFilter {
  /// Inclusive lower bound on the reservation date.
  pub from:     Option<NaiveDate>,
  /// Inclusive upper bound on the reservation date.
  pub to:       Option<NaiveDate>,
  pub user_id:  Option<String>,
  pub space_id: Option<Uuid>,
  /// `None` at the store level means any status. The engine narrows it to
  /// `Active` when the caller does not choose.
  pub status:   Option<ReservationStatus>,
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Error type of a [`ReservationStore`].
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` when the uniqueness constraint over active slots rejected a
  /// write.
  fn is_slot_taken(&self) -> bool;
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Read access to the space catalog.
pub trait SpaceCatalog: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve a space by UUID. Returns `None` if not found.
  fn find_space(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Space>, Self::Error>> + Send + '_;

  /// All spaces of `kind` on map `map_id`.
  fn find_spaces_by_kind_and_map(
    &self,
    kind: SpaceKind,
    map_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Space>, Self::Error>> + Send + '_;
}

/// Persistence for reservations.
///
/// All methods return `Send` futures so the engine can be driven from a
/// multi-threaded runtime (e.g. tokio with `axum`).
pub trait ReservationStore: Send + Sync {
  type Error: StoreError;

  /// Retrieve a reservation by UUID regardless of status.
  fn find_reservation(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Reservation>, Self::Error>> + Send + '_;

  /// Reservations matching `filter`, ordered by date then start time, with
  /// all-day bookings first within a day.
  fn find_reservations<'a>(
    &'a self,
    filter: &'a ReservationFilter,
  ) -> impl Future<Output = Result<Vec<Reservation>, Self::Error>> + Send + 'a;

  /// Hard-remove every reservation that [`SlotTarget::occupies`] and insert
  /// `reservation`, atomically. Returns the removed rows.
  ///
  /// If the active-slot constraint still rejects the insert, nothing is
  /// removed and the error reports [`StoreError::is_slot_taken`].
  fn supersede_slot<'a>(
    &'a self,
    target: &'a SlotTarget,
    reservation: Reservation,
  ) -> impl Future<Output = Result<Vec<Reservation>, Self::Error>> + Send + 'a;

  /// Persist every mutable field of an existing reservation.
  fn update_reservation<'a>(
    &'a self,
    reservation: &'a Reservation,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Set `status` on each of `ids`. Returns how many rows changed.
  fn set_status<'a>(
    &'a self,
    ids: &'a [Uuid],
    status: ReservationStatus,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;
}
