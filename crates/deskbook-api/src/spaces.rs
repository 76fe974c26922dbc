//! Handlers for `/spaces/:id/...` endpoints: availability and booking groups.

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{PathRejection, QueryRejection},
  },
};
use deskbook_core::{
  Engine,
  calendar::parse_date,
  error::ValidationError,
  group::BookingGroup,
  lifecycle::{Availability, GroupCancellation},
  store::{ReservationStore, SpaceCatalog},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityParams {
  /// Required, `YYYY-MM-DD`.
  pub date: Option<String>,
}

/// `GET /spaces/:id/availability?date=YYYY-MM-DD`
pub async fn availability<C, R>(
  State(engine): State<Arc<Engine<C, R>>>,
  id: Result<Path<Uuid>, PathRejection>,
  params: Result<Query<AvailabilityParams>, QueryRejection>,
) -> Result<Json<Availability>, ApiError>
where
  C: SpaceCatalog + 'static,
  R: ReservationStore + 'static,
{
  let Path(id) = id?;
  let Query(params) = params?;
  let date = match params.date.filter(|s| !s.is_empty()) {
    Some(date) => parse_date(&date)?,
    None => return Err(ValidationError::InvalidDate(String::new()).into()),
  };
  Ok(Json(engine.availability(id, date).await?))
}

/// `GET /spaces/:id/group`
pub async fn group<C, R>(
  State(engine): State<Arc<Engine<C, R>>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<BookingGroup>, ApiError>
where
  C: SpaceCatalog + 'static,
  R: ReservationStore + 'static,
{
  let Path(id) = id?;
  Ok(Json(engine.group(id).await?))
}

/// `POST /spaces/:id/group/cancel`, meeting rooms only.
pub async fn cancel_group<C, R>(
  State(engine): State<Arc<Engine<C, R>>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<GroupCancellation>, ApiError>
where
  C: SpaceCatalog + 'static,
  R: ReservationStore + 'static,
{
  let Path(id) = id?;
  Ok(Json(engine.cancel_group(id).await?))
}
