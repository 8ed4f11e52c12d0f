use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kyc_review_api::{CreateClientRequest, UploadDocumentRequest};
use kyc_review_db::models::client::{ClientDocumentModel, ClientModel};
use kyc_review_db::repository::Page;
use uuid::Uuid;

use super::error::{ApiJson, AppResult};
use super::PageQuery;
use crate::session::Caller;
use crate::state::AppState;

pub async fn list_clients(
    State(state): State<AppState>,
    Caller(user): Caller,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<ClientModel>>> {
    Ok(Json(state.service.list_clients(&user, query.to_request()).await?))
}

pub async fn create_client(
    State(state): State<AppState>,
    Caller(user): Caller,
    ApiJson(request): ApiJson<CreateClientRequest>,
) -> AppResult<(StatusCode, Json<ClientModel>)> {
    let client = state.service.create_client(&user, request).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn get_client(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ClientModel>> {
    Ok(Json(state.service.get_client(&user, id).await?))
}

pub async fn list_documents(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<ClientDocumentModel>>> {
    Ok(Json(state.service.list_client_documents(&user, id).await?))
}

pub async fn upload_document(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<UploadDocumentRequest>,
) -> AppResult<(StatusCode, Json<ClientDocumentModel>)> {
    let document = state.service.upload_client_document(&user, id, request).await?;
    Ok((StatusCode::CREATED, Json(document)))
}
