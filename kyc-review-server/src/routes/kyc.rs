use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kyc_review_api::{CreateKycRequest, SubmitReviewRequest, UpdateKycRequest};
use kyc_review_db::models::kyc::KycModel;
use kyc_review_db::repository::Page;
use kyc_review_db::workflow::DocumentAvailability;
use uuid::Uuid;

use super::error::{ApiJson, AppResult};
use super::PageQuery;
use crate::service::{SubmissionOutcome, UnlinkOutcome};
use crate::session::Caller;
use crate::state::AppState;

pub async fn list_kyc(
    State(state): State<AppState>,
    Caller(user): Caller,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<KycModel>>> {
    Ok(Json(state.service.list_kyc(&user, query.to_request()).await?))
}

pub async fn create_kyc(
    State(state): State<AppState>,
    Caller(user): Caller,
    ApiJson(request): ApiJson<CreateKycRequest>,
) -> AppResult<(StatusCode, Json<KycModel>)> {
    let kyc = state.service.create_kyc(&user, request).await?;
    Ok((StatusCode::CREATED, Json(kyc)))
}

pub async fn get_kyc(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<Uuid>,
) -> AppResult<Json<KycModel>> {
    Ok(Json(state.service.get_kyc(&user, id).await?))
}

pub async fn update_kyc(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<UpdateKycRequest>,
) -> AppResult<Json<KycModel>> {
    Ok(Json(state.service.update_kyc(&user, id, request).await?))
}

pub async fn submit_review(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<SubmitReviewRequest>,
) -> AppResult<Json<SubmissionOutcome>> {
    Ok(Json(state.service.submit_review(&user, id, request).await?))
}

pub async fn document_availability(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DocumentAvailability>> {
    Ok(Json(state.service.document_availability(&user, id).await?))
}

pub async fn link_document(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path((id, document_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<DocumentAvailability>> {
    Ok(Json(state.service.link_document(&user, id, document_id).await?))
}

pub async fn unlink_document(
    State(state): State<AppState>,
    Caller(user): Caller,
    Path((id, document_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<UnlinkOutcome>> {
    Ok(Json(state.service.unlink_document(&user, id, document_id).await?))
}
