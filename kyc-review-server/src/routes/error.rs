use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kyc_review_api::ApiError;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{error, warn};

/// HTTP face of [`ApiError`].
#[derive(Debug)]
pub struct AppError(pub ApiError);

impl From<ApiError> for AppError {
    fn from(error: ApiError) -> Self {
        AppError(error)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) | ApiError::SelfDeletion => StatusCode::FORBIDDEN,
            ApiError::InvalidState(_) | ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), kind = self.0.kind(), error = %self.0, "Request failed");
        } else {
            warn!(status = status.as_u16(), kind = self.0.kind(), error = %self.0, "Request rejected");
        }

        let body = json!({
            "error": self.0.kind(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// JSON body extractor whose rejections use the API error shape.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    AppError(ApiError::ValidationError(rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::ValidationError("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::not_found("kyc", 1), StatusCode::NOT_FOUND),
            (ApiError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("admin only".into()), StatusCode::FORBIDDEN),
            (ApiError::SelfDeletion, StatusCode::FORBIDDEN),
            (ApiError::InvalidState("completed".into()), StatusCode::CONFLICT),
            (ApiError::Conflict("stale".into()), StatusCode::CONFLICT),
            (ApiError::UpstreamError("down".into()), StatusCode::BAD_GATEWAY),
            (ApiError::DatabaseError("gone".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::InternalError("bug".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(AppError(error).status(), expected);
        }
    }

    #[tokio::test]
    async fn test_body_carries_kind_and_message() {
        let response = AppError(ApiError::SelfDeletion).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "self_deletion");
        assert_eq!(body["message"], "Users cannot delete their own account");
    }
}
