//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use deskbook_core::{Error, ErrorKind, ValidationError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Engine(#[from] Error),

  /// Malformed query parameters, caught before reaching the engine.
  #[error(transparent)]
  Validation(#[from] ValidationError),

  /// The request body, query string or path could not be extracted.
  #[error("{message}")]
  Rejected {
    status:  StatusCode,
    code:    &'static str,
    message: String,
  },
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::Rejected {
      status:  rejection.status(),
      code:    "INVALID_BODY",
      message: rejection.body_text(),
    }
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    Self::Rejected {
      status:  rejection.status(),
      code:    "INVALID_QUERY",
      message: rejection.body_text(),
    }
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    Self::Rejected {
      status:  rejection.status(),
      code:    "INVALID_PATH",
      message: rejection.body_text(),
    }
  }
}

impl ApiError {
  fn status(&self) -> StatusCode {
    let kind = match self {
      Self::Engine(e) => e.kind(),
      Self::Validation(_) => ErrorKind::Validation,
      Self::Rejected { status, .. } => return *status,
    };
    match kind {
      ErrorKind::NotFound => StatusCode::NOT_FOUND,
      ErrorKind::Validation | ErrorKind::CannotUpdateCancelled => StatusCode::BAD_REQUEST,
      ErrorKind::Conflict => StatusCode::CONFLICT,
      ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn code(&self) -> &'static str {
    match self {
      Self::Engine(e) => e.code(),
      Self::Validation(v) => v.code(),
      Self::Rejected { code, .. } => *code,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
      tracing::error!(error = %self, "request failed");
      "internal error".to_owned()
    } else {
      self.to_string()
    };
    (status, Json(json!({ "error": message, "code": self.code() }))).into_response()
  }
}
