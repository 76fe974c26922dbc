//! JSON REST API for Deskbook.
//!
//! Exposes an axum [`Router`] backed by a [`deskbook_core::Engine`] over any
//! catalog and reservation store. Auth and TLS are the caller's concern.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", deskbook_api::api_router(engine.clone()))
//! ```

pub mod error;
pub mod reservations;
pub mod spaces;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use deskbook_core::{
  Engine,
  store::{ReservationStore, SpaceCatalog},
};

pub use error::ApiError;

/// Build the API router for `engine`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<C, R>(engine: Arc<Engine<C, R>>) -> Router<()>
where
  C: SpaceCatalog + 'static,
  R: ReservationStore + 'static,
{
  Router::new()
    // Reservations
    .route(
      "/reservations",
      get(reservations::list::<C, R>).post(reservations::create::<C, R>),
    )
    .route(
      "/reservations/{id}",
      get(reservations::get_one::<C, R>)
        .patch(reservations::update_one::<C, R>)
        .put(reservations::update_one::<C, R>)
        .delete(reservations::cancel_one::<C, R>),
    )
    // Spaces
    .route("/spaces/{id}/availability", get(spaces::availability::<C, R>))
    .route("/spaces/{id}/group", get(spaces::group::<C, R>))
    .route("/spaces/{id}/group/cancel", post(spaces::cancel_group::<C, R>))
    .with_state(engine)
}
