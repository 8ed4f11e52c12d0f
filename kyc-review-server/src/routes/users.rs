use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kyc_review_api::CreateUserRequest;
use kyc_review_db::models::user::UserModel;
use kyc_review_db::repository::Page;
use uuid::Uuid;

use super::error::{ApiJson, AppResult};
use super::PageQuery;
use crate::session::Caller;
use crate::state::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    Caller(user): Caller,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<UserModel>>> {
    Ok(Json(state.service.list_users(&user, query.to_request()).await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    Caller(user): Caller,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserModel>)> {
    let created = state.service.create_user(&user, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Deletes the user and drops any cached session for them.
pub async fn delete_user(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.service.delete_user(&user, id).await?;
    state.sessions.invalidate(id).await;
    Ok(StatusCode::NO_CONTENT)
}
