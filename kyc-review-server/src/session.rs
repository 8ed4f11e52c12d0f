//! Resolution of the calling user.
//!
//! The upstream authentication gateway forwards the authenticated user id in
//! the `x-user-id` header. It is resolved to a [`CurrentUser`] through the
//! user repository; resolutions are cached for a short time.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use kyc_review_api::{ApiError, ApiResult, CurrentUser};
use kyc_review_db::repository::Load;
use kyc_review_db::unit_of_work::UnitOfWork;
use moka::future::Cache;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::routes::error::AppError;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct SessionResolver {
    uow: Arc<dyn UnitOfWork>,
    cache: Cache<Uuid, CurrentUser>,
}

impl SessionResolver {
    pub fn new(uow: Arc<dyn UnitOfWork>, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(10_000).time_to_live(ttl).build();
        Self { uow, cache }
    }

    pub async fn resolve(&self, headers: &HeaderMap) -> ApiResult<CurrentUser> {
        let raw = headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;
        let user_id = Uuid::parse_str(raw.trim()).map_err(|_| {
            warn!(header = raw, "Malformed user id header");
            ApiError::Unauthenticated
        })?;

        if let Some(user) = self.cache.get(&user_id).await {
            return Ok(user);
        }

        let user = {
            let session = self.uow.begin().await?;
            session.repositories().user_repository.load(user_id).await?
        };
        let Some(user) = user else {
            warn!(%user_id, "Unknown user");
            return Err(ApiError::Unauthenticated);
        };

        let current = user.to_current_user();
        debug!(%user_id, role = ?current.role, "Session resolved");
        self.cache.insert(user_id, current.clone()).await;
        Ok(current)
    }

    /// Drops a cached resolution, e.g. after the user was deleted.
    pub async fn invalidate(&self, user_id: Uuid) {
        self.cache.invalidate(&user_id).await;
    }
}

/// The resolved caller of a protected route.
pub struct Caller(pub CurrentUser);

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = state.sessions.resolve(&parts.headers).await?;
        Ok(Caller(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use kyc_review_api::Role;
    use kyc_review_db::memory::MemoryUnitOfWork;

    use crate::service::ReviewService;
    use crate::storage::MemoryFileStorage;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[tokio::test]
    async fn test_resolves_known_user() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let uow = Arc::new(MemoryUnitOfWork::new());
        let service = ReviewService::new(uow.clone(), Arc::new(MemoryFileStorage::default()));
        let agency_id = Uuid::new_v4();
        let admin = service.seed_admin("admin@agency.test", "Admin", agency_id).await?;

        let resolver = SessionResolver::new(uow, Duration::from_secs(60));
        let user = resolver.resolve(&headers(&admin.id.to_string())).await?;
        assert_eq!(user.id, admin.id);
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.agency_id, agency_id);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_or_unknown_user_is_unauthenticated() {
        let resolver = SessionResolver::new(Arc::new(MemoryUnitOfWork::new()), Duration::from_secs(60));

        let error = resolver.resolve(&HeaderMap::new()).await.unwrap_err();
        assert!(matches!(error, ApiError::Unauthenticated));

        let error = resolver.resolve(&headers("not-a-uuid")).await.unwrap_err();
        assert!(matches!(error, ApiError::Unauthenticated));

        let error = resolver.resolve(&headers(&Uuid::new_v4().to_string())).await.unwrap_err();
        assert!(matches!(error, ApiError::Unauthenticated));
    }
}
