use chrono::Utc;
use kyc_review_api::{ApiError, ApiResult, CreateUserRequest, CurrentUser, Role};
use kyc_review_db::models::audit::AuditLogModel;
use kyc_review_db::models::user::UserModel;
use kyc_review_db::repository::{AuditLogRepository, CreateBatch, DeleteBatch, FindByAgencyId, FindByEmail, Load, Page, PageRequest};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{commit, open_audit_log, ReviewService};

impl ReviewService {
    /// Users of the caller's agency. Admin only.
    pub async fn list_users(&self, user: &CurrentUser, page: PageRequest) -> ApiResult<Page<UserModel>> {
        user.require_admin()?;
        let session = self.begin().await?;
        Ok(session
            .repositories()
            .user_repository
            .find_by_agency_id(user.agency_id, page)
            .await?)
    }

    /// Adds a user to the caller's agency. Admin only.
    pub async fn create_user(&self, user: &CurrentUser, request: CreateUserRequest) -> ApiResult<UserModel> {
        user.require_admin()?;
        request.validate()?;

        let session = self.begin().await?;
        let repositories = session.repositories();
        let email = request.email.trim().to_lowercase();
        if repositories.user_repository.find_by_email(&email).await?.is_some() {
            return Err(ApiError::Conflict(format!("a user with e-mail {email} already exists")));
        }

        let audit_log_id = open_audit_log(repositories, user).await?;
        let created = UserModel {
            id: Uuid::new_v4(),
            agency_id: user.agency_id,
            email,
            name: request.name.trim().to_string(),
            role: request.role,
            created_at: Utc::now(),
        };
        let mut saved = repositories
            .user_repository
            .create_batch(vec![created], audit_log_id)
            .await?;
        let created = saved
            .pop()
            .ok_or_else(|| ApiError::InternalError("user was not saved".to_string()))?;

        commit(session).await?;
        info!(user_id = %created.id, role = ?created.role, created_by = %user.id, "User created");
        Ok(created)
    }

    /// Removes a user of the caller's agency. Admin only; admins cannot
    /// remove themselves.
    pub async fn delete_user(&self, user: &CurrentUser, user_id: Uuid) -> ApiResult<()> {
        user.require_admin()?;
        if user_id == user.id {
            return Err(ApiError::SelfDeletion);
        }

        let session = self.begin().await?;
        let repositories = session.repositories();
        match repositories.user_repository.load(user_id).await? {
            Some(existing) if existing.agency_id == user.agency_id => {}
            _ => return Err(ApiError::not_found("user", user_id)),
        }

        let audit_log_id = open_audit_log(repositories, user).await?;
        repositories.user_repository.delete_batch(&[user_id], audit_log_id).await?;

        commit(session).await?;
        info!(%user_id, deleted_by = %user.id, "User deleted");
        Ok(())
    }

    /// Creates the first administrator of an agency unless a user with
    /// `email` already exists. Returns the existing or created user.
    pub async fn seed_admin(&self, email: &str, name: &str, agency_id: Uuid) -> ApiResult<UserModel> {
        let email = email.trim().to_lowercase();
        let session = self.begin().await?;
        let repositories = session.repositories();
        if let Some(existing) = repositories.user_repository.find_by_email(&email).await? {
            return Ok(existing);
        }

        let admin = UserModel {
            id: Uuid::new_v4(),
            agency_id,
            email,
            name: name.to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
        };
        let audit_log = repositories
            .audit_log_repository
            .create(&AuditLogModel::new(admin.id))
            .await?;
        let mut saved = repositories
            .user_repository
            .create_batch(vec![admin], audit_log.id)
            .await?;
        let admin = saved
            .pop()
            .ok_or_else(|| ApiError::InternalError("administrator was not saved".to_string()))?;

        commit(session).await?;
        info!(user_id = %admin.id, %agency_id, "Bootstrap administrator created");
        Ok(admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::service::test_support::Fixture;

    fn request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            name: "Reviewer".to_string(),
            role: Role::Staff,
        }
    }

    #[tokio::test]
    async fn test_admin_manages_users() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let fixture = Fixture::new().await;
        let service = &fixture.service;

        let created = service.create_user(&fixture.admin, request("Reviewer@Agency.test")).await?;
        assert_eq!(created.email, "reviewer@agency.test");
        assert_eq!(created.agency_id, fixture.admin.agency_id);

        let page = service.list_users(&fixture.admin, PageRequest::default()).await?;
        assert_eq!(page.total, 3);

        service.delete_user(&fixture.admin, created.id).await?;
        let page = service.list_users(&fixture.admin, PageRequest::default()).await?;
        assert_eq!(page.total, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_staff_is_forbidden() {
        let fixture = Fixture::new().await;
        let service = &fixture.service;

        let error = service.list_users(&fixture.staff, PageRequest::default()).await.unwrap_err();
        assert!(matches!(error, ApiError::Forbidden(_)));

        let error = service.create_user(&fixture.staff, request("x@agency.test")).await.unwrap_err();
        assert!(matches!(error, ApiError::Forbidden(_)));

        let error = service.delete_user(&fixture.staff, fixture.admin.id).await.unwrap_err();
        assert!(matches!(error, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_self_deletion_and_duplicates() {
        let fixture = Fixture::new().await;
        let service = &fixture.service;

        let error = service.delete_user(&fixture.admin, fixture.admin.id).await.unwrap_err();
        assert!(matches!(error, ApiError::SelfDeletion));

        let error = service.create_user(&fixture.admin, request("STAFF@agency.test")).await.unwrap_err();
        assert!(matches!(error, ApiError::Conflict(_)));

        let error = service.delete_user(&fixture.admin, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(error, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_seed_admin_is_idempotent() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let fixture = Fixture::new().await;
        let again = fixture
            .service
            .seed_admin("admin@agency.test", "Someone else", Uuid::new_v4())
            .await?;
        assert_eq!(again.id, fixture.admin.id);
        Ok(())
    }
}
