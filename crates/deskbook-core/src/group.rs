//! Booking-group resolution.
//!
//! Meeting rooms on the same map whose names differ only by a trailing
//! number ("Board Room 1", "Board Room 2") are booked and cancelled as one
//! unit. Every other space is a group of one.

use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  space::{Space, SpaceKind},
  store::SpaceCatalog,
};

/// Strip a trailing run of whitespace + digits and trim the rest.
///
/// `"Meeting Room 12"` → `"Meeting Room"`; a name without a numeric suffix is
/// returned trimmed but otherwise unchanged.
pub fn base_name(name: &str) -> &str {
  let without_digits = name.trim_end_matches(|c: char| c.is_ascii_digit());
  let stripped = if without_digits.len() == name.len() {
    name
  } else {
    without_digits
  };
  stripped.trim()
}

/// Case-insensitive form of [`base_name`] used to compare spaces.
pub fn group_key(name: &str) -> String { base_name(name).to_lowercase() }

/// The set of spaces treated as one unit for conflicts and cancellation.
/// Never empty; always contains the space it was resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingGroup {
  /// Display name shared by the members.
  pub name:  String,
  space_ids: Vec<Uuid>,
}

impl BookingGroup {
  pub fn singleton(space: &Space) -> Self {
    Self {
      name:      space.name.clone(),
      space_ids: vec![space.space_id],
    }
  }

  pub fn space_ids(&self) -> &[Uuid] { &self.space_ids }

  pub fn len(&self) -> usize { self.space_ids.len() }

  pub fn is_empty(&self) -> bool { self.space_ids.is_empty() }

  pub fn is_singleton(&self) -> bool { self.space_ids.len() == 1 }

  pub fn contains(&self, space_id: Uuid) -> bool { self.space_ids.contains(&space_id) }
}

/// Resolve the booking group of `space` with a single catalog read.
pub async fn group_of<C>(catalog: &C, space: &Space) -> Result<BookingGroup>
where
  C: SpaceCatalog,
{
  if !space.is_meeting_room() {
    return Ok(BookingGroup::singleton(space));
  }

  let key = space.effective_group_key();
  let rooms = catalog
    .find_spaces_by_kind_and_map(SpaceKind::MeetingRoom, space.map_id)
    .await
    .map_err(Error::storage)?;

  let mut members: Vec<&Space> = rooms
    .iter()
    .filter(|room| room.effective_group_key() == key)
    .collect();

  // A stale catalog may not return the space itself.
  if !members.iter().any(|room| room.space_id == space.space_id) {
    members.push(space);
  }
  members.sort_unstable_by_key(|room| room.space_id);

  // Named after the lowest-id member so every member resolves to an equal
  // group, whatever the casing of its own name.
  let name = members
    .first()
    .map_or(space.name.as_str(), |room| room.name.as_str());

  Ok(BookingGroup {
    name:      base_name(name).to_owned(),
    space_ids: members.iter().map(|room| room.space_id).collect(),
  })
}
