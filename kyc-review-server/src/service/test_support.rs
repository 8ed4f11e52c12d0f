use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use kyc_review_api::{
    CreateClientRequest, CreateKycRequest, CreateUserRequest, CurrentUser, Declarations, KycDetails, KycSubject, KycType,
    NaturalPersonDetails, Role, ServiceKind, SubmitReviewRequest, UploadDocumentRequest,
};
use kyc_review_db::memory::MemoryUnitOfWork;
use kyc_review_db::models::client::{ClientDocumentModel, ClientModel};
use kyc_review_db::models::kyc::KycModel;
use uuid::Uuid;

use super::ReviewService;
use crate::storage::MemoryFileStorage;

/// A service over the in-memory backend with one agency, an admin and a
/// staff member.
pub(crate) struct Fixture {
    pub service: ReviewService,
    pub uow: MemoryUnitOfWork,
    pub storage: Arc<MemoryFileStorage>,
    pub admin: CurrentUser,
    pub staff: CurrentUser,
}

impl Fixture {
    pub async fn new() -> Self {
        let uow = MemoryUnitOfWork::new();
        let storage = Arc::new(MemoryFileStorage::default());
        let service = ReviewService::new(Arc::new(uow.clone()), storage.clone());

        let admin = service
            .seed_admin("admin@agency.test", "Admin", Uuid::new_v4())
            .await
            .unwrap()
            .to_current_user();
        let staff = service
            .create_user(
                &admin,
                CreateUserRequest {
                    email: "staff@agency.test".to_string(),
                    name: "Staff".to_string(),
                    role: Role::Staff,
                },
            )
            .await
            .unwrap()
            .to_current_user();

        Self {
            service,
            uow,
            storage,
            admin,
            staff,
        }
    }

    /// An administrator of an unrelated agency.
    pub fn outsider(&self) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            role: Role::Admin,
            agency_id: Uuid::new_v4(),
        }
    }

    pub async fn natural_client(&self) -> ClientModel {
        self.service
            .create_client(
                &self.staff,
                CreateClientRequest {
                    name: "Ada Lovelace".to_string(),
                    email: Some("ada@example.com".to_string()),
                    client_type: KycType::Natural,
                },
            )
            .await
            .unwrap()
    }

    pub async fn submitted_kyc(&self, client: &ClientModel) -> KycModel {
        self.service
            .create_kyc(
                &self.staff,
                CreateKycRequest {
                    client_id: client.id,
                    services: vec![ServiceKind::Accounting],
                    details: natural_details(),
                },
            )
            .await
            .unwrap()
    }

    /// A record pushed through all three review stages.
    pub async fn completed_kyc(&self, client: &ClientModel) -> KycModel {
        let kyc = self.submitted_kyc(client).await;
        let mut latest = kyc;
        for _ in 0..3 {
            latest = self
                .service
                .submit_review(
                    &self.staff,
                    latest.id,
                    SubmitReviewRequest {
                        signature: signature(),
                        ..Default::default()
                    },
                )
                .await
                .unwrap()
                .kyc;
        }
        latest
    }

    /// Uploads a document with unique content for `client_id`.
    pub async fn document(&self, client_id: Uuid, expires_at: Option<DateTime<Utc>>) -> ClientDocumentModel {
        let id = Uuid::new_v4();
        self.service
            .upload_client_document(
                &self.staff,
                client_id,
                UploadDocumentRequest {
                    name: format!("document-{id}.pdf"),
                    content_type: "application/pdf".to_string(),
                    data_base64: STANDARD.encode(format!("%PDF-1.7 {id}")),
                    expires_at,
                },
            )
            .await
            .unwrap()
    }
}

pub(crate) fn natural_details() -> KycDetails {
    KycDetails {
        subject: KycSubject::Natural(NaturalPersonDetails {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            ..Default::default()
        }),
        declarations: Declarations {
            is_pep: Some(false),
            confirms_truthfulness: true,
            ..Default::default()
        },
    }
}

/// A tiny PNG as a data URL.
pub(crate) fn signature() -> String {
    let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    png.extend_from_slice(b"\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01\x08\x06\0\0\0");
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}
