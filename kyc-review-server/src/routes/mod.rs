//! HTTP routes.
//!
//! ## Endpoints (all under `/api`)
//!
//! - `GET    /health`                             - Liveness, no caller required
//! - `GET    /kyc`, `POST /kyc`                   - List / create records
//! - `GET    /kyc/{id}`, `PATCH /kyc/{id}`        - Read / edit a record
//! - `POST   /kyc/{id}/submit`                    - Run one review step
//! - `GET    /kyc/{id}/documents`                 - Linked and available documents
//! - `POST   /kyc/{id}/documents/{document_id}`   - Link a document
//! - `DELETE /kyc/{id}/documents/{document_id}`   - Unlink a document
//! - `GET    /kyc/{id}/<collection>`              - Party collections
//! - `POST   /kyc/<collection>`                   - Replace a party collection
//! - `GET    /clients`, `POST /clients`, `GET /clients/{id}`
//! - `GET    /clients/{id}/documents`, `POST /clients/{id}/documents`
//! - `GET    /users`, `POST /users`, `DELETE /users/{id}` - Admin only

pub mod clients;
pub mod error;
pub mod kyc;
pub mod parties;
pub mod users;

use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use kyc_review_db::models::kyc::{ManagementPersonModel, RelatedPersonModel, ShareholderModel, UboModel};
use kyc_review_db::repository::{PageRequest, DEFAULT_PAGE_SIZE};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// `?page=&page_size=` query of list endpoints. Pages are 1-based.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl PageQuery {
    pub fn to_request(self) -> PageRequest {
        PageRequest::for_page(self.page_size.unwrap_or(DEFAULT_PAGE_SIZE), self.page.unwrap_or(1))
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/kyc", get(kyc::list_kyc).post(kyc::create_kyc))
        .route("/kyc/{id}", get(kyc::get_kyc).patch(kyc::update_kyc))
        .route("/kyc/{id}/submit", post(kyc::submit_review))
        .route("/kyc/{id}/documents", get(kyc::document_availability))
        .route(
            "/kyc/{id}/documents/{document_id}",
            post(kyc::link_document).delete(kyc::unlink_document),
        )
        .route("/kyc/{id}/related-persons", get(parties::list::<RelatedPersonModel>))
        .route("/kyc/{id}/management-members", get(parties::list::<ManagementPersonModel>))
        .route("/kyc/{id}/shareholders", get(parties::list::<ShareholderModel>))
        .route("/kyc/{id}/ubos", get(parties::list::<UboModel>))
        .route("/kyc/related-persons", post(parties::reconcile::<RelatedPersonModel>))
        .route("/kyc/management-persons", post(parties::reconcile::<ManagementPersonModel>))
        .route("/kyc/shareholders", post(parties::reconcile::<ShareholderModel>))
        .route("/kyc/ubos", post(parties::reconcile::<UboModel>))
        .route("/clients", get(clients::list_clients).post(clients::create_client))
        .route("/clients/{id}", get(clients::get_client))
        .route(
            "/clients/{id}/documents",
            get(clients::list_documents).post(clients::upload_document),
        )
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}", delete(users::delete_user))
}

/// Builds the application router with request tracing, CORS and a
/// per-request timeout.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kyc_review_db::repository::MAX_PAGE_SIZE;

    #[test]
    fn test_page_query_defaults_and_clamps() {
        let request = PageQuery::default().to_request();
        assert_eq!(request, PageRequest::for_page(DEFAULT_PAGE_SIZE, 1));

        let request = PageQuery {
            page: Some(3),
            page_size: Some(10_000),
        }
        .to_request();
        assert_eq!(request.limit, MAX_PAGE_SIZE);
        assert_eq!(request.offset, 2 * MAX_PAGE_SIZE);
    }
}
