use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use kyc_review_db::memory::MemoryUnitOfWork;
use kyc_review_db::unit_of_work::UnitOfWork;
use kyc_review_server::service::ReviewService;
use kyc_review_server::session::{SessionResolver, USER_ID_HEADER};
use kyc_review_server::storage::MemoryFileStorage;
use kyc_review_server::{build_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    service: Arc<ReviewService>,
    admin_id: Uuid,
}

impl TestApp {
    async fn new() -> Self {
        let uow: Arc<dyn UnitOfWork> = Arc::new(MemoryUnitOfWork::new());
        let storage = Arc::new(MemoryFileStorage::default());
        let service = Arc::new(ReviewService::new(uow.clone(), storage));
        let admin = service
            .seed_admin("admin@agency.test", "Admin", Uuid::new_v4())
            .await
            .unwrap();
        let sessions = SessionResolver::new(uow, Duration::from_secs(60));
        let router = build_router(AppState::new(service.clone(), sessions), Duration::from_secs(5));
        Self {
            router,
            service,
            admin_id: admin.id,
        }
    }

    async fn send(&self, method: Method, uri: &str, user: Option<Uuid>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn as_admin(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, Some(self.admin_id), body).await
    }

    async fn create_client(&self) -> String {
        let (status, client) = self
            .as_admin(
                Method::POST,
                "/api/clients",
                Some(json!({ "name": "Ada Lovelace", "email": "ada@example.com", "client_type": "natural" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        client["id"].as_str().unwrap().to_string()
    }

    async fn upload_document(&self, client_id: &str) -> String {
        let content = format!("%PDF-1.7 {}", Uuid::new_v4());
        let (status, document) = self
            .as_admin(
                Method::POST,
                &format!("/api/clients/{client_id}/documents"),
                Some(json!({
                    "name": "passport.pdf",
                    "content_type": "application/pdf",
                    "data_base64": STANDARD.encode(content),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        document["id"].as_str().unwrap().to_string()
    }

    async fn create_kyc(&self, client_id: &str) -> String {
        let (status, kyc) = self
            .as_admin(
                Method::POST,
                "/api/kyc",
                Some(json!({
                    "client_id": client_id,
                    "services": ["accounting", "payroll"],
                    "details": {
                        "subject": { "type": "natural", "first_name": "Ada", "last_name": "Lovelace" },
                        "declarations": { "is_pep": false, "confirms_truthfulness": true },
                    },
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(kyc["status"], "submitted");
        kyc["id"].as_str().unwrap().to_string()
    }

    async fn submit(&self, kyc_id: &str, body: Value) -> (StatusCode, Value) {
        self.as_admin(Method::POST, &format!("/api/kyc/{kyc_id}/submit"), Some(body))
            .await
    }
}

fn signature() -> String {
    let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    png.extend_from_slice(b"\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01\x08\x06\0\0\0");
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_protected_routes_require_a_known_user() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/api/kyc", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthenticated");

    let (status, _) = app.send(Method::GET, "/api/kyc", Some(Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.as_admin(Method::GET, "/api/kyc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_review_submission_links_documents_and_parties() {
    let app = TestApp::new().await;
    let client_id = app.create_client().await;
    let first = app.upload_document(&client_id).await;
    let second = app.upload_document(&client_id).await;
    let kyc_id = app.create_kyc(&client_id).await;

    let (status, outcome) = app
        .submit(
            &kyc_id,
            json!({
                "signature": signature(),
                "document_ids": [first, second],
                "related_persons": [{ "name": "Jane Doe", "relationship": "spouse" }],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{outcome}");
    assert_eq!(outcome["kyc"]["status"], "responsible_reviewed");
    assert_eq!(outcome["signer_label"], "responsible signature");
    assert_eq!(outcome["signature_document"]["is_signature"], true);
    assert_eq!(outcome["linked_document_ids"].as_array().unwrap().len(), 2);

    let (status, availability) = app
        .as_admin(Method::GET, &format!("/api/kyc/{kyc_id}/documents"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(availability["linked"].as_array().unwrap().len(), 3);
    assert!(availability["available"].as_array().unwrap().is_empty());

    let (status, persons) = app
        .as_admin(Method::GET, &format!("/api/kyc/{kyc_id}/related-persons"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let persons = persons.as_array().unwrap();
    assert_eq!(persons.len(), 1);
    assert_eq!(persons[0]["name"], "Jane Doe");
    assert!(Uuid::parse_str(persons[0]["id"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_completed_record_is_not_resubmitted() {
    let app = TestApp::new().await;
    let client_id = app.create_client().await;
    let kyc_id = app.create_kyc(&client_id).await;

    for expected in ["responsible_reviewed", "compliance_reviewed", "completed"] {
        let (status, outcome) = app.submit(&kyc_id, json!({ "signature": signature() })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["kyc"]["status"], expected);
    }

    let (status, body) = app.submit(&kyc_id, json!({ "signature": signature() })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "invalid_state");

    let (_, kyc) = app.as_admin(Method::GET, &format!("/api/kyc/{kyc_id}"), None).await;
    assert_eq!(kyc["status"], "completed");
}

#[tokio::test]
async fn test_link_and_unlink_documents() {
    let app = TestApp::new().await;
    let client_id = app.create_client().await;
    let document_id = app.upload_document(&client_id).await;
    let kyc_id = app.create_kyc(&client_id).await;
    let uri = format!("/api/kyc/{kyc_id}/documents/{document_id}");

    let (status, availability) = app.as_admin(Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(availability["linked"][0]["id"], document_id.as_str());

    let (status, body) = app.as_admin(Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation");

    let (status, body) = app.as_admin(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], true);

    let (status, body) = app.as_admin(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], false);
}

#[tokio::test]
async fn test_party_collection_replacement() {
    let app = TestApp::new().await;
    let client_id = app.create_client().await;
    let kyc_id = app.create_kyc(&client_id).await;

    let (status, ubos) = app
        .as_admin(
            Method::POST,
            "/api/kyc/ubos",
            Some(json!({ "kyc_id": kyc_id, "items": [{ "name": "Owner One", "ownership_percentage": "60" }] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{ubos}");
    assert_eq!(ubos.as_array().unwrap().len(), 1);

    let (status, ubos) = app
        .as_admin(Method::POST, "/api/kyc/ubos", Some(json!({ "kyc_id": kyc_id, "items": [{ "name": "" }] })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ubos.as_array().unwrap().len(), 1);

    let (status, ubos) = app
        .as_admin(Method::POST, "/api/kyc/ubos", Some(json!({ "kyc_id": kyc_id, "items": [] })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(ubos.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_user_management_is_admin_only() {
    let app = TestApp::new().await;

    let (status, staff) = app
        .as_admin(
            Method::POST,
            "/api/users",
            Some(json!({ "email": "staff@agency.test", "name": "Staff", "role": "staff" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let staff_id = Uuid::parse_str(staff["id"].as_str().unwrap()).unwrap();

    let (status, body) = app.send(Method::GET, "/api/users", Some(staff_id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, body) = app
        .as_admin(Method::DELETE, &format!("/api/users/{}", app.admin_id), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "self_deletion");

    let (status, _) = app
        .as_admin(Method::DELETE, &format!("/api/users/{staff_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send(Method::GET, "/api/kyc", Some(staff_id), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_other_agencies_see_nothing() {
    let app = TestApp::new().await;
    let client_id = app.create_client().await;
    let kyc_id = app.create_kyc(&client_id).await;

    let outsider = app
        .service
        .seed_admin("admin@elsewhere.test", "Elsewhere", Uuid::new_v4())
        .await
        .unwrap();

    let (status, body) = app
        .send(Method::GET, &format!("/api/kyc/{kyc_id}"), Some(outsider.id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, body) = app.send(Method::GET, "/api/clients", Some(outsider.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_malformed_body_is_a_validation_error() {
    let app = TestApp::new().await;
    let (status, body) = app
        .as_admin(Method::POST, "/api/clients", Some(json!({ "name": "No type" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation");
}
