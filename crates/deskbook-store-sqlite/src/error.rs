//! Error type for `deskbook-store-sqlite`.

use deskbook_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored column could not be decoded into its domain type.
  #[error("decode error: {0}")]
  Decode(String),

  #[error("reservation not found: {0}")]
  ReservationNotFound(uuid::Uuid),

  /// The unique index over active (space, date, start time) slots rejected
  /// a write.
  #[error("an active reservation already occupies this slot")]
  SlotTaken,
}

impl StoreError for Error {
  fn is_slot_taken(&self) -> bool { matches!(self, Self::SlotTaken) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
