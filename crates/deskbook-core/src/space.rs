//! Spaces: bookable units on an office map.
//!
//! Spaces are owned by the catalog; the engine only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::group;

/// The kind of a space. Only meeting rooms form multi-space booking groups.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SpaceKind {
  Workstation,
  MeetingRoom,
  Cubicle,
}

/// Position and footprint on the floor-plan grid; opaque to the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
  pub x:      i32,
  pub y:      i32,
  pub width:  i32,
  pub height: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
  pub space_id:   Uuid,
  pub map_id:     Uuid,
  pub name:       String,
  pub kind:       SpaceKind,
  pub geometry:   Geometry,
  pub capacity:   u32,
  /// Booking-group key cached when the space was registered. `None` for
  /// rows written before the key existed.
  pub group_key:  Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Space {
  pub fn is_meeting_room(&self) -> bool { self.kind == SpaceKind::MeetingRoom }

  /// The key this space groups under: the cached value when present,
  /// otherwise derived from the display name.
  pub fn effective_group_key(&self) -> String {
    match &self.group_key {
      Some(key) => key.clone(),
      None => group::group_key(&self.name),
    }
  }
}

/// Input for registering a space in a catalog.
#[derive(Debug, Clone)]
pub struct NewSpace {
  pub map_id:   Uuid,
  pub name:     String,
  pub kind:     SpaceKind,
  pub geometry: Geometry,
  pub capacity: u32,
}

impl NewSpace {
  pub fn new(map_id: Uuid, name: impl Into<String>, kind: SpaceKind) -> Self {
    Self {
      map_id,
      name: name.into(),
      kind,
      geometry: Geometry::default(),
      capacity: 1,
    }
  }

  /// The group key to cache alongside the new row.
  pub fn group_key(&self) -> Option<String> {
    (self.kind == SpaceKind::MeetingRoom).then(|| group::group_key(&self.name))
  }
}
