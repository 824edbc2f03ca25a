//! Handlers for `/account-management` endpoints.
//!
//! Every endpoint is a `POST` with a JSON body. Rule rejections from the store
//! come back as `400` alongside validation failures.

use std::sync::Arc;

use axum::{Json, extract::State};
use mutuals_core::store::RelationshipStore;

use crate::{
  dto::{
    EmailBody,
    FriendPairBody,
    FriendsResponse,
    RecipientsResponse,
    RequestorTargetBody,
    SenderBody,
    SuccessResponse,
  },
  error::ApiError,
};

/// `POST /account-management/befriend`, body: `{"friends":[a, b]}`
pub async fn befriend<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<FriendPairBody>,
) -> Result<Json<SuccessResponse>, ApiError>
where
  S: RelationshipStore,
{
  let (a, b) = body.validate()?;
  store.befriend(&a, &b).await.map_err(ApiError::from_store)?;
  Ok(Json(SuccessResponse::ok()))
}

/// `POST /account-management/get-friends`, body: `{"email":e}`
pub async fn friends<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<EmailBody>,
) -> Result<Json<FriendsResponse>, ApiError>
where
  S: RelationshipStore,
{
  let email = body.validate()?;
  let friends = store.friends(&email).await.map_err(ApiError::from_store)?;
  Ok(Json(friends.into()))
}

/// `POST /account-management/get-common-friends`, body: `{"friends":[a, b]}`
pub async fn common_friends<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<FriendPairBody>,
) -> Result<Json<FriendsResponse>, ApiError>
where
  S: RelationshipStore,
{
  let (a, b) = body.validate()?;
  let common = store
    .common_friends(&a, &b)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(common.into()))
}

/// `POST /account-management/subscribe-updates`, body: `{"requestor":r, "target":t}`
pub async fn subscribe<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RequestorTargetBody>,
) -> Result<Json<SuccessResponse>, ApiError>
where
  S: RelationshipStore,
{
  let (requestor, target) = body.validate()?;
  store
    .subscribe(&requestor, &target)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(SuccessResponse::ok()))
}

/// `POST /account-management/block-account`, body: `{"requestor":r, "target":t}`
pub async fn block<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RequestorTargetBody>,
) -> Result<Json<SuccessResponse>, ApiError>
where
  S: RelationshipStore,
{
  let (requestor, target) = body.validate()?;
  store
    .block(&requestor, &target)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(SuccessResponse::ok()))
}

/// `POST /account-management/get-update-recipients`, body: `{"sender":s, "text":"..."}`
pub async fn recipients<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<SenderBody>,
) -> Result<Json<RecipientsResponse>, ApiError>
where
  S: RelationshipStore,
{
  let (sender, text) = body.validate()?;
  let recipients = store
    .broadcast_recipients(&sender, &text)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(recipients.into_vec().into()))
}
