//! Handlers shared by the four party collections.

use axum::extract::{Path, State};
use axum::Json;
use kyc_review_api::PartyCollectionRequest;
use kyc_review_db::models::kyc::PartyModel;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use super::error::{ApiJson, AppResult};
use crate::session::Caller;
use crate::state::AppState;

pub async fn list<T>(State(state): State<AppState>, Caller(user): Caller, Path(id): Path<Uuid>) -> AppResult<Json<Vec<T>>>
where
    T: PartyModel + Serialize,
{
    Ok(Json(state.service.list_parties::<T>(&user, id).await?))
}

/// Replaces the collection named by the route with `items`.
pub async fn reconcile<T>(
    State(state): State<AppState>,
    Caller(user): Caller,
    ApiJson(request): ApiJson<PartyCollectionRequest<T::Input>>,
) -> AppResult<Json<Vec<T>>>
where
    T: PartyModel + Serialize,
    T::Input: DeserializeOwned + Validate,
{
    Ok(Json(state.service.reconcile_parties::<T>(&user, request).await?))
}
