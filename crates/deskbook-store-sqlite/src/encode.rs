//! Encoding and decoding between domain types and SQLite column text.
//!
//! Timestamps are RFC 3339 strings, dates `YYYY-MM-DD`, times of day `HH:MM`.
//! UUIDs are hyphenated lowercase strings. Enums use their strum names.

use chrono::{DateTime, NaiveDate, Utc};
use deskbook_core::{
  calendar::{TimeOfDay, format_date, parse_date},
  reservation::{Reservation, ReservationStatus},
  space::{Geometry, Space, SpaceKind},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

pub fn encode_date(date: NaiveDate) -> String { format_date(date) }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  parse_date(s).map_err(|e| Error::Decode(e.to_string()))
}

pub fn encode_time(time: Option<TimeOfDay>) -> Option<String> {
  time.map(|t| t.to_string())
}

/// Accepts both `HH:MM` and the `HH:MM:SS` form older rows carry.
pub fn decode_time(s: Option<&str>) -> Result<Option<TimeOfDay>> {
  s.map(|s| TimeOfDay::from_stored(s).map_err(|e| Error::Decode(e.to_string())))
    .transpose()
}

pub fn encode_status(status: ReservationStatus) -> &'static str { status.into() }

pub fn decode_status(s: &str) -> Result<ReservationStatus> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown reservation status: {s:?}")))
}

pub fn encode_kind(kind: SpaceKind) -> &'static str { kind.into() }

pub fn decode_kind(s: &str) -> Result<SpaceKind> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown space kind: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const SPACE_COLUMNS: &str = "space_id, map_id, name, kind, x, y, width, height, capacity, \
                                 group_key, created_at, updated_at";

/// Raw values read directly from a `spaces` row.
pub struct RawSpace {
  pub space_id:   String,
  pub map_id:     String,
  pub name:       String,
  pub kind:       String,
  pub x:          i32,
  pub y:          i32,
  pub width:      i32,
  pub height:     i32,
  pub capacity:   u32,
  pub group_key:  Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawSpace {
  /// Read a row selected with [`SPACE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      space_id:   row.get(0)?,
      map_id:     row.get(1)?,
      name:       row.get(2)?,
      kind:       row.get(3)?,
      x:          row.get(4)?,
      y:          row.get(5)?,
      width:      row.get(6)?,
      height:     row.get(7)?,
      capacity:   row.get(8)?,
      group_key:  row.get(9)?,
      created_at: row.get(10)?,
      updated_at: row.get(11)?,
    })
  }

  pub fn into_space(self) -> Result<Space> {
    Ok(Space {
      space_id:   decode_uuid(&self.space_id)?,
      map_id:     decode_uuid(&self.map_id)?,
      name:       self.name,
      kind:       decode_kind(&self.kind)?,
      geometry:   Geometry {
        x:      self.x,
        y:      self.y,
        width:  self.width,
        height: self.height,
      },
      capacity:   self.capacity,
      group_key:  self.group_key,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

pub const RESERVATION_COLUMNS: &str = "reservation_id, space_id, user_id, user_name, date, \
                                       start_time, end_time, status, notes, created_at, \
                                       updated_at";

/// Raw values read directly from a `reservations` row.
pub struct RawReservation {
  pub reservation_id: String,
  pub space_id:       String,
  pub user_id:        String,
  pub user_name:      String,
  pub date:           String,
  pub start_time:     Option<String>,
  pub end_time:       Option<String>,
  pub status:         String,
  pub notes:          String,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawReservation {
  /// Read a row selected with [`RESERVATION_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      reservation_id: row.get(0)?,
      space_id:       row.get(1)?,
      user_id:        row.get(2)?,
      user_name:      row.get(3)?,
      date:           row.get(4)?,
      start_time:     row.get(5)?,
      end_time:       row.get(6)?,
      status:         row.get(7)?,
      notes:          row.get(8)?,
      created_at:     row.get(9)?,
      updated_at:     row.get(10)?,
    })
  }

  pub fn into_reservation(self) -> Result<Reservation> {
    Ok(Reservation {
      reservation_id: decode_uuid(&self.reservation_id)?,
      space_id:       decode_uuid(&self.space_id)?,
      user_id:        self.user_id,
      user_name:      self.user_name,
      date:           decode_date(&self.date)?,
      start_time:     decode_time(self.start_time.as_deref())?,
      end_time:       decode_time(self.end_time.as_deref())?,
      status:         decode_status(&self.status)?,
      notes:          self.notes,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

/// Owned column values for an INSERT or full UPDATE of a reservation.
pub struct ReservationRow {
  pub reservation_id: String,
  pub space_id:       String,
  pub user_id:        String,
  pub user_name:      String,
  pub date:           String,
  pub start_time:     Option<String>,
  pub end_time:       Option<String>,
  pub status:         &'static str,
  pub notes:          String,
  pub created_at:     String,
  pub updated_at:     String,
}

impl ReservationRow {
  pub fn new(r: &Reservation) -> Self {
    Self {
      reservation_id: encode_uuid(r.reservation_id),
      space_id:       encode_uuid(r.space_id),
      user_id:        r.user_id.clone(),
      user_name:      r.user_name.clone(),
      date:           encode_date(r.date),
      start_time:     encode_time(r.start_time),
      end_time:       encode_time(r.end_time),
      status:         encode_status(r.status),
      notes:          r.notes.clone(),
      created_at:     encode_dt(r.created_at),
      updated_at:     encode_dt(r.updated_at),
    }
  }

  pub fn insert(&self, conn: &rusqlite::Connection) -> rusqlite::Result<usize> {
    conn.execute(
      "INSERT INTO reservations (reservation_id, space_id, user_id, user_name, date, \
       start_time, end_time, status, notes, created_at, updated_at) \
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
      rusqlite::params![
        self.reservation_id,
        self.space_id,
        self.user_id,
        self.user_name,
        self.date,
        self.start_time,
        self.end_time,
        self.status,
        self.notes,
        self.created_at,
        self.updated_at,
      ],
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn legacy_seconds_decode_to_minutes() {
    let t = decode_time(Some("09:00:00")).unwrap().unwrap();
    assert_eq!(encode_time(Some(t)).as_deref(), Some("09:00"));
    assert_eq!(decode_time(None).unwrap(), None);
    assert!(matches!(decode_time(Some("9am")), Err(Error::Decode(_))));
  }

  #[test]
  fn enums_round_through_strum_names() {
    assert_eq!(encode_kind(SpaceKind::MeetingRoom), "meeting_room");
    assert_eq!(decode_kind("meeting_room").unwrap(), SpaceKind::MeetingRoom);
    assert_eq!(encode_status(ReservationStatus::Cancelled), "cancelled");
    assert!(decode_status("pending").is_err());
  }
}
