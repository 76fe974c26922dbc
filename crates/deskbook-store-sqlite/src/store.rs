//! [`SqliteStore`], the SQLite implementation of [`SpaceCatalog`] and
//! [`ReservationStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior, types::Value};
use uuid::Uuid;

use deskbook_core::{
  conflict::SlotTarget,
  reservation::{Reservation, ReservationStatus},
  space::{NewSpace, Space, SpaceKind},
  store::{ReservationFilter, ReservationStore, SpaceCatalog},
};

use crate::{
  Error, Result,
  encode::{
    RESERVATION_COLUMNS, RawReservation, RawSpace, ReservationRow, SPACE_COLUMNS, encode_date,
    encode_dt, encode_kind, encode_status, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Spaces and reservations in a single SQLite file.
///
/// Cloning is cheap; clones share one background connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and apply the schema.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Register a space in the catalog. Meeting rooms get their group key
  /// cached on the row.
  pub async fn add_space(&self, input: NewSpace) -> Result<Space> {
    let now = Utc::now();
    let space = Space {
      space_id:   Uuid::new_v4(),
      group_key:  input.group_key(),
      map_id:     input.map_id,
      name:       input.name,
      kind:       input.kind,
      geometry:   input.geometry,
      capacity:   input.capacity,
      created_at: now,
      updated_at: now,
    };

    let id_str    = encode_uuid(space.space_id);
    let map_str   = encode_uuid(space.map_id);
    let name      = space.name.clone();
    let kind_str  = encode_kind(space.kind);
    let geometry  = space.geometry;
    let capacity  = space.capacity;
    let group_key = space.group_key.clone();
    let at_str    = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO spaces (space_id, map_id, name, kind, x, y, width, height, capacity, \
           group_key, created_at, updated_at) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
          rusqlite::params![
            id_str,
            map_str,
            name,
            kind_str,
            geometry.x,
            geometry.y,
            geometry.width,
            geometry.height,
            capacity,
            group_key,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(space)
  }

  /// Insert a fully-built reservation as-is, bypassing the overwrite policy.
  /// Used for imports and seeding; the active-slot index still applies.
  pub async fn insert_reservation(&self, reservation: &Reservation) -> Result<()> {
    let row = ReservationRow::new(reservation);
    self
      .conn
      .call(move |conn| Ok(slot_guard(row.insert(conn))?))
      .await??;
    Ok(())
  }

  /// Run raw SQL against the connection, for simulating older rows.
  #[cfg(test)]
  pub(crate) async fn execute_raw(&self, sql: impl Into<String>) -> Result<()> {
    let sql = sql.into();
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// `true` when SQLite rejected a write because of a UNIQUE index.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

/// Lift a unique-index rejection out of the connection error channel so it
/// reaches the caller as [`Error::SlotTaken`].
fn slot_guard<T>(res: rusqlite::Result<T>) -> rusqlite::Result<Result<T>> {
  match res {
    Ok(v) => Ok(Ok(v)),
    Err(e) if is_unique_violation(&e) => Ok(Err(Error::SlotTaken)),
    Err(e) => Err(e),
  }
}

// ─── SpaceCatalog impl ───────────────────────────────────────────────────────

impl SpaceCatalog for SqliteStore {
  type Error = Error;

  async fn find_space(&self, id: Uuid) -> Result<Option<Space>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSpace> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {SPACE_COLUMNS} FROM spaces WHERE space_id = ?1"),
            rusqlite::params![id_str],
            RawSpace::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSpace::into_space).transpose()
  }

  async fn find_spaces_by_kind_and_map(&self, kind: SpaceKind, map_id: Uuid) -> Result<Vec<Space>> {
    let kind_str = encode_kind(kind);
    let map_str = encode_uuid(map_id);

    let raws: Vec<RawSpace> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SPACE_COLUMNS} FROM spaces WHERE kind = ?1 AND map_id = ?2 ORDER BY name"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![kind_str, map_str], RawSpace::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSpace::into_space).collect()
  }
}

// ─── ReservationStore impl ───────────────────────────────────────────────────

impl ReservationStore for SqliteStore {
  type Error = Error;

  async fn find_reservation(&self, id: Uuid) -> Result<Option<Reservation>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawReservation> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE reservation_id = ?1"),
            rusqlite::params![id_str],
            RawReservation::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawReservation::into_reservation).transpose()
  }

  async fn find_reservations<'a>(
    &'a self,
    filter: &'a ReservationFilter,
  ) -> Result<Vec<Reservation>> {
    let mut conds: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    let mut push = |cond: &str, value: String| {
      values.push(Value::Text(value));
      conds.push(format!("{cond} ?{}", values.len()));
    };
    if let Some(from) = filter.from {
      push("date >=", encode_date(from));
    }
    if let Some(to) = filter.to {
      push("date <=", encode_date(to));
    }
    if let Some(user_id) = &filter.user_id {
      push("user_id =", user_id.clone());
    }
    if let Some(space_id) = filter.space_id {
      push("space_id =", encode_uuid(space_id));
    }
    if let Some(status) = filter.status {
      push("status =", encode_status(status).to_owned());
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!(" WHERE {}", conds.join(" AND "))
    };
    let sql = format!(
      "SELECT {RESERVATION_COLUMNS} FROM reservations{where_clause} \
       ORDER BY date ASC, start_time ASC NULLS FIRST, created_at ASC"
    );

    let raws: Vec<RawReservation> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(values), RawReservation::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReservation::into_reservation).collect()
  }

  async fn supersede_slot<'a>(
    &'a self,
    target: &'a SlotTarget,
    reservation: Reservation,
  ) -> Result<Vec<Reservation>> {
    let target = target.clone();
    let date_str = encode_date(target.date);
    let row = ReservationRow::new(&reservation);

    let outcome: Result<Vec<Reservation>> = self
      .conn
      .call(move |conn| {
        // Hold the write lock from the slot read through the insert.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let same_day = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE date = ?1"
          ))?;
          stmt
            .query_map(rusqlite::params![date_str], RawReservation::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let mut decoded = Vec::with_capacity(same_day.len());
        for raw in same_day {
          match raw.into_reservation() {
            Ok(existing) => decoded.push(existing),
            Err(e) => return Ok(Err(e)),
          }
        }
        let removed: Vec<Reservation> = target.occupants(&decoded).into_iter().cloned().collect();

        for existing in &removed {
          tx.execute(
            "DELETE FROM reservations WHERE reservation_id = ?1",
            rusqlite::params![encode_uuid(existing.reservation_id)],
          )?;
        }

        // Dropping `tx` without commit rolls the deletes back.
        if let Err(e) = slot_guard(row.insert(&tx))? {
          return Ok(Err(e));
        }

        tx.commit()?;
        Ok(Ok(removed))
      })
      .await?;

    outcome
  }

  async fn update_reservation<'a>(&'a self, reservation: &'a Reservation) -> Result<()> {
    let id = reservation.reservation_id;
    let row = ReservationRow::new(reservation);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(slot_guard(conn.execute(
          "UPDATE reservations SET user_name = ?2, date = ?3, start_time = ?4, end_time = ?5, \
           status = ?6, notes = ?7, updated_at = ?8 WHERE reservation_id = ?1",
          rusqlite::params![
            row.reservation_id,
            row.user_name,
            row.date,
            row.start_time,
            row.end_time,
            row.status,
            row.notes,
            row.updated_at,
          ],
        ))?)
      })
      .await??;

    if changed == 0 {
      return Err(Error::ReservationNotFound(id));
    }
    Ok(())
  }

  async fn set_status<'a>(
    &'a self,
    ids: &'a [Uuid],
    status: ReservationStatus,
    at: DateTime<Utc>,
  ) -> Result<usize> {
    let id_strs: Vec<String> = ids.iter().copied().map(encode_uuid).collect();
    let status_str = encode_status(status);
    let at_str = encode_dt(at);

    let changed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut changed = 0;
        for id in &id_strs {
          match slot_guard(tx.execute(
            "UPDATE reservations SET status = ?1, updated_at = ?2 \
             WHERE reservation_id = ?3 AND status != ?1",
            rusqlite::params![status_str, at_str, id],
          ))? {
            Ok(n) => changed += n,
            Err(e) => return Ok(Err(e)),
          }
        }
        tx.commit()?;
        Ok(Ok(changed))
      })
      .await??;

    Ok(changed)
  }
}
