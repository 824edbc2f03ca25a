//! Handlers for `/accounts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/accounts` | Body: `{"email":"a@x.com"}` |
//! | `GET`  | `/accounts/{id}` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use mutuals_core::{account::Account, store::RelationshipStore};
use uuid::Uuid;

use crate::{dto::EmailBody, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /accounts`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<EmailBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RelationshipStore,
{
  let email = body.validate()?;
  let account = store
    .create_account(&email)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(account)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /accounts/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Account>, ApiError>
where
  S: RelationshipStore,
{
  let account = store
    .get_account(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("account {id} not found")))?;
  Ok(Json(account))
}
