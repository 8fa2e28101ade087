use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use cardportal_auth::{
    Action, MemoryTokenStore, Module, NavState, PermissionState, RoleDraft, SessionToken,
    TokenStore,
};
use cardportal_client::types::{CompanyPayload, LoginRequest, UserPayload};
use cardportal_client::{ApiClient, ApiError, GENERIC_ERROR_MESSAGE, Notice, PortalContext};
use cardportal_core::{EmployeeId, ListQuery, RoleId};

#[derive(Default)]
struct Backend {
    auth_headers: Mutex<Vec<Option<String>>>,
    permission_calls: AtomicUsize,
    /// When set, `/permission` answers 500.
    permissions_down: Mutex<bool>,
    /// When set, the first `/permission` call is slow and returns less.
    slow_first_permission: Mutex<bool>,
    list_queries: Mutex<Vec<Value>>,
    role_updates: Mutex<Vec<Value>>,
}

impl Backend {
    fn record(&self, headers: &HeaderMap) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.auth_headers.lock().unwrap().push(auth);
    }
}

type Shared = Arc<Backend>;

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] == "secret" {
        (
            StatusCode::OK,
            Json(json!({ "token": "tok-123", "name": "Admin" })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
    }
}

async fn forgot_password(Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["email"], "admin@example.com");
    Json(json!({ "message": "OTP sent", "token": "reset-tok" }))
}

async fn verify_otp(State(backend): State<Shared>, headers: HeaderMap) -> Json<Value> {
    backend.record(&headers);
    Json(json!({ "message": "OTP verified" }))
}

async fn permission(State(backend): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    backend.record(&headers);
    let call = backend.permission_calls.fetch_add(1, Ordering::SeqCst);

    if *backend.permissions_down.lock().unwrap() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "database unavailable" })),
        );
    }

    let slow_first = *backend.slow_first_permission.lock().unwrap();
    if slow_first && call == 0 {
        tokio::time::sleep(Duration::from_millis(300)).await;
        return (
            StatusCode::OK,
            Json(json!({ "data": [{ "name": "Dashboard", "read": 1 }] })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "data": [
                { "name": "Roles and permissions", "nav_view": 1, "read": 1, "create": 0, "update": 0, "delete": 0 },
                { "name": "Dashboard", "nav_view": 1, "read": 1, "create": 0, "update": 0, "delete": 0 },
                { "name": "Card", "nav_view": 1, "read": 1, "create": 1, "update": 1, "delete": 1 }
            ]
        })),
    )
}

async fn cards(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    backend.record(&headers);
    backend.list_queries.lock().unwrap().push(json!(query));
    Json(json!({
        "data": [{
            "id": 1,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "phone": "555",
            "qrcodeUrl": "https://cdn/qr/1.jpg"
        }],
        "count": 11
    }))
}

async fn role_detail(Path(id): Path<u64>) -> Json<Value> {
    Json(json!({
        "id": id,
        "name": "Editors",
        "permissions": [
            { "module": { "id": 2, "name": "Card" }, "nav_view": 0, "read": 0, "create": 0, "update": 0, "delete": 0 }
        ]
    }))
}

async fn role_update(
    State(backend): State<Shared>,
    Path(_id): Path<u64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    backend.role_updates.lock().unwrap().push(body);
    Json(json!({ "message": "Role updated successfully" }))
}

async fn create_user() -> Json<Value> {
    Json(json!({ "error": true, "message": "Email already exists" }))
}

async fn create_company() -> StatusCode {
    StatusCode::UNPROCESSABLE_ENTITY
}

async fn dashboard() -> Json<Value> {
    Json(json!({ "total_cards": 12, "download_qr_count": 4, "scan_qr_count": 30 }))
}

async fn scan_logs(Path(_id): Path<u64>) -> Json<Value> {
    Json(json!({ "data": [] }))
}

struct TestServer {
    base_url: String,
    backend: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let backend: Shared = Arc::new(Backend::default());
        let app = Router::new()
            .route("/login", post(login))
            .route("/forgot-password", post(forgot_password))
            .route("/verify-otp", post(verify_otp))
            .route("/permission", get(permission))
            .route("/employees/list", get(cards))
            .route("/employees/scan-logs/:id", get(scan_logs))
            .route("/roles/:id", get(role_detail).put(role_update))
            .route("/users", post(create_user))
            .route("/companies", post(create_company))
            .route("/dashboard/count", get(dashboard))
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            backend,
            handle,
        }
    }

    fn client(&self, store: Arc<dyn TokenStore>) -> ApiClient {
        ApiClient::with_http(reqwest::Client::new(), &self.base_url, store)
    }

    fn context(&self) -> PortalContext {
        PortalContext::new(self.client(Arc::new(MemoryTokenStore::new())))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn bearer_header_only_when_token_stored() {
    let server = TestServer::spawn().await;
    let store = Arc::new(MemoryTokenStore::new());
    let client = server.client(store.clone());

    client.cards(&ListQuery::default()).await.unwrap();
    store.set_token(SessionToken::new("abc").unwrap()).unwrap();
    client.cards(&ListQuery::default()).await.unwrap();
    store.clear().unwrap();
    client.cards(&ListQuery::default()).await.unwrap();

    let seen = server.backend.auth_headers.lock().unwrap().clone();
    assert_eq!(seen, vec![None, Some("Bearer abc".to_string()), None]);
}

#[tokio::test]
async fn login_stores_token_and_loads_permissions() {
    let server = TestServer::spawn().await;
    let ctx = server.context();
    assert!(ctx.permissions().current().is_loading());

    let session = ctx
        .login(&LoginRequest::new("admin@example.com", "secret"))
        .await
        .unwrap();

    assert!(session.is_authenticated());
    assert_eq!(ctx.client().tokens().token().unwrap().as_str(), "tok-123");
    let profile = session.profile.as_deref().unwrap();
    assert_eq!(profile["name"], "Admin");
    assert!(!profile.contains_key("token"));
    assert!(session.permissions.allows(Module::Card, Action::Delete));

    // Menu follows the fixed module order, not the response order.
    let NavState::Menu(items) = session.navigation() else {
        panic!("expected a menu");
    };
    let titles: Vec<_> = items.iter().map(|i| i.title).collect();
    assert_eq!(titles, vec!["Dashboard", "Card", "Roles and Permissions"]);

    let seen = server.backend.auth_headers.lock().unwrap().clone();
    assert_eq!(seen, vec![Some("Bearer tok-123".to_string())]);
}

#[tokio::test]
async fn bad_credentials_surface_backend_message() {
    let server = TestServer::spawn().await;
    let ctx = server.context();

    let err = ctx
        .login(&LoginRequest::new("admin@example.com", "wrong"))
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "Invalid credentials");
    assert!(ctx.client().tokens().token().is_none());
    assert_eq!(server.backend.permission_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_permissions() {
    let server = TestServer::spawn().await;
    let ctx = server.context();
    ctx.login(&LoginRequest::new("admin@example.com", "secret"))
        .await
        .unwrap();
    let before = ctx.permissions().current();
    assert!(matches!(before.as_ref(), PermissionState::Loaded(_)));

    *server.backend.permissions_down.lock().unwrap() = true;
    let err = ctx
        .permissions()
        .update_permissions(ctx.client())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));

    assert_eq!(ctx.permissions().current(), before);
    assert_eq!(ctx.refresh().await.permissions, before);
}

#[tokio::test]
async fn superseded_permission_response_is_discarded() {
    let server = TestServer::spawn().await;
    *server.backend.slow_first_permission.lock().unwrap() = true;
    let ctx = server.context();
    ctx.client()
        .tokens()
        .set_token(SessionToken::new("tok").unwrap())
        .unwrap();

    let store = ctx.permissions();
    let slow = store.update_permissions(ctx.client());
    let fast = async {
        // Make sure the slow request is issued first.
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.update_permissions(ctx.client()).await
    };
    let (slow, fast) = tokio::join!(slow, fast);
    slow.unwrap();
    fast.unwrap();

    let state = store.current();
    let set = state.set().expect("permissions loaded");
    assert_eq!(set.len(), 3);
    assert!(state.allows(Module::Card, Action::Read));
}

#[tokio::test]
async fn logout_clears_token_and_permissions() {
    let server = TestServer::spawn().await;
    let ctx = server.context();
    ctx.login(&LoginRequest::new("admin@example.com", "secret"))
        .await
        .unwrap();

    ctx.logout().unwrap();
    let session = ctx.snapshot();
    assert!(!session.is_authenticated());
    assert!(session.profile.is_none());
    assert_eq!(session.navigation(), NavState::Loading);
}

#[tokio::test]
async fn reset_token_is_bearer_for_otp_check() {
    let server = TestServer::spawn().await;
    let store = Arc::new(MemoryTokenStore::with_token(SessionToken::new("stale").unwrap()));
    let client = server.client(store.clone());

    let resp = client.request_password_otp("admin@example.com").await.unwrap();
    assert_eq!(resp.token.as_deref(), Some("reset-tok"));
    assert_eq!(store.token().unwrap().as_str(), "reset-tok");

    let verified = client
        .verify_password_otp("admin@example.com", "123456")
        .await
        .unwrap();
    assert_eq!(verified.message.as_deref(), Some("OTP verified"));

    let seen = server.backend.auth_headers.lock().unwrap().clone();
    assert_eq!(seen, vec![Some("Bearer reset-tok".to_string())]);
}

#[tokio::test]
async fn list_sends_paging_parameters() {
    let server = TestServer::spawn().await;
    let client = server.client(Arc::new(MemoryTokenStore::new()));

    let page = client
        .cards(&ListQuery::for_page(2, 5, "ada"))
        .await
        .unwrap();
    assert_eq!(page.count, 11);
    assert_eq!(page.data[0].full_name(), "Ada Lovelace");

    let queries = server.backend.list_queries.lock().unwrap().clone();
    assert_eq!(queries, vec![json!({ "start": "10", "limit": "5", "search": "ada" })]);
}

#[tokio::test]
async fn role_update_round_trip() {
    let server = TestServer::spawn().await;
    let client = server.client(Arc::new(MemoryTokenStore::new()));

    let mut draft = RoleDraft::from_role(client.role(RoleId::new(4)).await.unwrap());
    let row = draft.position("Card").unwrap();
    draft.toggle(row, Action::Update).unwrap();
    let resp = client
        .update_role(RoleId::new(4), &draft.payload().unwrap())
        .await
        .unwrap();
    assert_eq!(
        Notice::from_response(&resp, "Role updated").message,
        "Role updated successfully"
    );

    let bodies = server.backend.role_updates.lock().unwrap().clone();
    assert_eq!(
        bodies,
        vec![json!({
            "name": "Editors",
            "module_permissions": [{
                "module_id": 2,
                "permissions": { "nav_view": 0, "read": 1, "create": 0, "update": 1, "delete": 0 }
            }]
        })]
    );
}

#[tokio::test]
async fn error_flag_in_success_body_is_a_rejection() {
    let server = TestServer::spawn().await;
    let client = server.client(Arc::new(MemoryTokenStore::new()));

    let err = client
        .create_user(&UserPayload {
            name: "Sam".into(),
            email: "sam@example.com".into(),
            password: Some("pw".into()),
            role_id: Some(RoleId::new(2)),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Rejected { .. }));
    assert_eq!(err.user_message(), "Email already exists");
}

#[tokio::test]
async fn silent_failures_use_generic_message() {
    let server = TestServer::spawn().await;
    let client = server.client(Arc::new(MemoryTokenStore::new()));

    let err = client
        .create_company(&CompanyPayload {
            name: "Acme".into(),
            url: "https://acme.test".into(),
            addresses: vec![],
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(Notice::from_error(&err).message, GENERIC_ERROR_MESSAGE);
}

#[tokio::test]
async fn invalid_forms_never_reach_the_backend() {
    let server = TestServer::spawn().await;
    let client = server.client(Arc::new(MemoryTokenStore::new()));

    let err = client
        .create_company(&CompanyPayload {
            name: String::new(),
            url: "https://acme.test".into(),
            addresses: vec![],
        })
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Company name required");
}

#[tokio::test]
async fn dashboard_and_empty_scan_log() {
    let server = TestServer::spawn().await;
    let client = server.client(Arc::new(MemoryTokenStore::new()));

    let counts = client.dashboard_counts().await.unwrap();
    assert_eq!(counts.total_cards, 12);
    assert_eq!(counts.scan_qr_count, 30);

    let log = client.scan_log(EmployeeId::new(9)).await.unwrap();
    assert_eq!(log.scan_count, 0);
    assert!(log.device_info.is_empty());
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let client = ApiClient::with_http(
        reqwest::Client::new(),
        "http://127.0.0.1:9",
        Arc::new(MemoryTokenStore::new()),
    );
    let err = client.dashboard_counts().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
}
