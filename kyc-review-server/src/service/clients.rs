use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use kyc_review_api::{ApiError, ApiResult, CreateClientRequest, CurrentUser, UploadDocumentRequest};
use kyc_review_db::models::client::{ClientDocumentModel, ClientModel};
use kyc_review_db::repository::{FindByAgencyId, FindByClientId, Page, PageRequest};
use kyc_review_db::unit_of_work::ReviewRepositories;
use kyc_review_db::utils::to_heapless;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::{commit, open_audit_log, ReviewService};

async fn load_client(repositories: &ReviewRepositories, user: &CurrentUser, client_id: Uuid) -> ApiResult<ClientModel> {
    match repositories.client_repository.load(client_id).await? {
        Some(client) if client.agency_id == user.agency_id => Ok(client),
        _ => Err(ApiError::not_found("client", client_id)),
    }
}

impl ReviewService {
    pub async fn create_client(&self, user: &CurrentUser, request: CreateClientRequest) -> ApiResult<ClientModel> {
        request.validate()?;

        let session = self.begin().await?;
        let repositories = session.repositories();
        let audit_log_id = open_audit_log(repositories, user).await?;
        let client = ClientModel {
            id: Uuid::new_v4(),
            agency_id: user.agency_id,
            name: request.name.trim().to_string(),
            email: request.email,
            client_type: request.client_type,
            created_at: Utc::now(),
        };
        let mut saved = repositories
            .client_repository
            .create_batch(vec![client], audit_log_id)
            .await?;
        let client = saved
            .pop()
            .ok_or_else(|| ApiError::InternalError("client was not saved".to_string()))?;

        commit(session).await?;
        info!(client_id = %client.id, client_type = %client.client_type, "Client created");
        Ok(client)
    }

    pub async fn list_clients(&self, user: &CurrentUser, page: PageRequest) -> ApiResult<Page<ClientModel>> {
        let session = self.begin().await?;
        Ok(session
            .repositories()
            .client_repository
            .find_by_agency_id(user.agency_id, page)
            .await?)
    }

    pub async fn get_client(&self, user: &CurrentUser, client_id: Uuid) -> ApiResult<ClientModel> {
        let session = self.begin().await?;
        load_client(session.repositories(), user, client_id).await
    }

    /// Stores an uploaded file with the storage provider and records it as a
    /// document of the client.
    pub async fn upload_client_document(
        &self,
        user: &CurrentUser,
        client_id: Uuid,
        request: UploadDocumentRequest,
    ) -> ApiResult<ClientDocumentModel> {
        request.validate()?;
        let bytes = STANDARD
            .decode(request.data_base64.trim())
            .map_err(|e| ApiError::ValidationError(format!("document content is not valid base64: {e}")))?;
        let content_type = to_heapless::<100>("content_type", &request.content_type).map_err(ApiError::ValidationError)?;

        let session = self.begin().await?;
        let repositories = session.repositories();
        let client = load_client(repositories, user, client_id).await?;
        let audit_log_id = open_audit_log(repositories, user).await?;

        let stored = self.storage.upload(bytes, &request.content_type, &request.name).await?;
        let document = ClientDocumentModel {
            id: Uuid::new_v4(),
            client_id: client.id,
            name: request.name,
            url: stored.url.clone(),
            content_type,
            size: stored.size,
            expires_at: request.expires_at,
            is_signature: false,
            created_at: Utc::now(),
        };

        let saved = repositories
            .client_document_repository
            .create_batch(vec![document], audit_log_id)
            .await;
        let document = match saved.map(|mut rows| rows.pop()) {
            Ok(Some(document)) => document,
            Ok(None) => return Err(ApiError::InternalError("document was not saved".to_string())),
            Err(error) => {
                warn!(%client_id, url = %stored.url, "Document upload rolled back, stored file is orphaned");
                return Err(error.into());
            }
        };

        commit(session).await?;
        info!(%client_id, document_id = %document.id, size = document.size, "Client document uploaded");
        Ok(document)
    }

    /// Documents of a client, newest first.
    pub async fn list_client_documents(&self, user: &CurrentUser, client_id: Uuid) -> ApiResult<Vec<ClientDocumentModel>> {
        let session = self.begin().await?;
        let repositories = session.repositories();
        let client = load_client(repositories, user, client_id).await?;
        Ok(repositories.client_document_repository.find_by_client_id(client.id).await?)
    }
}
