//! SQL schema for the Deskbook SQLite store.
//!
//! Applied on every open; the statements are idempotent. `PRAGMA
//! user_version` records the layout for future migrations.

pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS spaces (
    space_id    TEXT PRIMARY KEY,
    map_id      TEXT NOT NULL,
    name        TEXT NOT NULL,
    kind        TEXT NOT NULL,          -- 'workstation' | 'meeting_room' | 'cubicle'
    x           INTEGER NOT NULL DEFAULT 0,
    y           INTEGER NOT NULL DEFAULT 0,
    width       INTEGER NOT NULL DEFAULT 0,
    height      INTEGER NOT NULL DEFAULT 0,
    capacity    INTEGER NOT NULL DEFAULT 1,
    group_key   TEXT,                   -- NULL: derive from name
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reservations (
    reservation_id TEXT PRIMARY KEY,
    space_id       TEXT NOT NULL REFERENCES spaces(space_id),
    user_id        TEXT NOT NULL,
    user_name      TEXT NOT NULL DEFAULT '',
    date           TEXT NOT NULL,       -- YYYY-MM-DD
    start_time     TEXT,                -- HH:MM, older rows HH:MM:SS; NULL = all day
    end_time       TEXT,
    status         TEXT NOT NULL DEFAULT 'active',   -- 'active' | 'cancelled'
    notes          TEXT NOT NULL DEFAULT '',
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS spaces_map_kind_idx       ON spaces(map_id, kind);
CREATE INDEX IF NOT EXISTS reservations_date_idx     ON reservations(date);
CREATE INDEX IF NOT EXISTS reservations_space_idx    ON reservations(space_id);
CREATE INDEX IF NOT EXISTS reservations_user_idx     ON reservations(user_id);

-- At most one active booking per space, date and start minute.
CREATE UNIQUE INDEX IF NOT EXISTS reservations_active_slot_idx
    ON reservations(space_id, date, IFNULL(substr(start_time, 1, 5), ''))
    WHERE status = 'active';

PRAGMA user_version = 1;
";
