//! JSON REST API for Mutuals.
//!
//! Exposes an axum [`Router`] backed by any
//! [`mutuals_core::store::RelationshipStore`]. Request bodies are checked for
//! shape and email syntax here; relationship rules are left to the store.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", mutuals_api::api_router(store.clone()))
//! ```

pub mod accounts;
pub mod dto;
pub mod error;
pub mod management;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use mutuals_core::store::RelationshipStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RelationshipStore + 'static,
{
  Router::new()
    // Accounts
    .route("/accounts", post(accounts::create::<S>))
    .route("/accounts/{id}", get(accounts::get_one::<S>))
    // Relationship management
    .route("/account-management/befriend", post(management::befriend::<S>))
    .route("/account-management/get-friends", post(management::friends::<S>))
    .route(
      "/account-management/get-common-friends",
      post(management::common_friends::<S>),
    )
    .route(
      "/account-management/subscribe-updates",
      post(management::subscribe::<S>),
    )
    .route("/account-management/block-account", post(management::block::<S>))
    .route(
      "/account-management/get-update-recipients",
      post(management::recipients::<S>),
    )
    .with_state(store)
}
