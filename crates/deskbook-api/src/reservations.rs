//! Handlers for `/reservations` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/reservations` | Optional `from`, `to`, `user_id`, `space_id`, `status`; active only by default |
//! | `POST`   | `/reservations` | Body: [`NewReservation`]; 201 + booking outcome |
//! | `GET`    | `/reservations/:id` | Any status |
//! | `PATCH`  | `/reservations/:id` | Body: [`ReservationPatch`]; also accepted as `PUT` |
//! | `DELETE` | `/reservations/:id` | Cancels, cascading across a meeting-room group |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use deskbook_core::{
  Engine,
  calendar::parse_date,
  lifecycle::Cancellation,
  reservation::{NewReservation, Reservation, ReservationPatch, ReservationStatus},
  store::{ReservationFilter, ReservationStore, SpaceCatalog},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  /// Inclusive, `YYYY-MM-DD`.
  pub from:     Option<String>,
  /// Inclusive, `YYYY-MM-DD`.
  pub to:       Option<String>,
  pub user_id:  Option<String>,
  pub space_id: Option<Uuid>,
  pub status:   Option<ReservationStatus>,
}

impl ListParams {
  fn into_filter(self) -> Result<ReservationFilter, ApiError> {
    let date = |s: Option<String>| s.filter(|s| !s.is_empty()).map(|s| parse_date(&s)).transpose();
    Ok(ReservationFilter {
      from:     date(self.from)?,
      to:       date(self.to)?,
      user_id:  self.user_id.filter(|s| !s.is_empty()),
      space_id: self.space_id,
      status:   self.status,
    })
  }
}

/// `GET /reservations[?from=..][&to=..][&user_id=..][&space_id=..][&status=..]`
pub async fn list<C, R>(
  State(engine): State<Arc<Engine<C, R>>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Reservation>>, ApiError>
where
  C: SpaceCatalog + 'static,
  R: ReservationStore + 'static,
{
  let Query(params) = params?;
  let reservations = engine.list(params.into_filter()?).await?;
  Ok(Json(reservations))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /reservations`: returns 201 + [`Booked`](deskbook_core::lifecycle::Booked).
pub async fn create<C, R>(
  State(engine): State<Arc<Engine<C, R>>>,
  body: Result<Json<NewReservation>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  C: SpaceCatalog + 'static,
  R: ReservationStore + 'static,
{
  let Json(body) = body?;
  let booked = engine.create(body).await?;
  Ok((StatusCode::CREATED, Json(booked)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /reservations/:id`
pub async fn get_one<C, R>(
  State(engine): State<Arc<Engine<C, R>>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Reservation>, ApiError>
where
  C: SpaceCatalog + 'static,
  R: ReservationStore + 'static,
{
  let Path(id) = id?;
  Ok(Json(engine.get(id).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /reservations/:id`
pub async fn update_one<C, R>(
  State(engine): State<Arc<Engine<C, R>>>,
  id: Result<Path<Uuid>, PathRejection>,
  patch: Result<Json<ReservationPatch>, JsonRejection>,
) -> Result<Json<Reservation>, ApiError>
where
  C: SpaceCatalog + 'static,
  R: ReservationStore + 'static,
{
  let Path(id) = id?;
  let Json(patch) = patch?;
  Ok(Json(engine.update(id, patch).await?))
}

// ─── Cancel ───────────────────────────────────────────────────────────────────

/// `DELETE /reservations/:id`. The record stays, with status `cancelled`.
pub async fn cancel_one<C, R>(
  State(engine): State<Arc<Engine<C, R>>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Cancellation>, ApiError>
where
  C: SpaceCatalog + 'static,
  R: ReservationStore + 'static,
{
  let Path(id) = id?;
  Ok(Json(engine.cancel(id).await?))
}
