use std::{sync::Arc, time::SystemTime};

use async_trait::async_trait;
use gluco_portal::{
    AppConfig, AppState, AuthStore, GatewayState, PortalError, ProfileGateway, create_router,
    models::{Claims, OnboardingFlags, ProfileResponse},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use tokio::net::TcpListener;
use uuid::Uuid;

// --- Test Harness ---

/// Gateway stub for router tests: the store is driven directly, so the
/// backend must never be consulted.
struct UnreachableGateway;

#[async_trait]
impl ProfileGateway for UnreachableGateway {
    async fn fetch_profile(&self) -> Result<ProfileResponse, PortalError> {
        panic!("router test reached the backend gateway");
    }
}

struct TestApp {
    address: String,
    store: Arc<AuthStore>,
}

async fn spawn_app() -> TestApp {
    let config = AppConfig::default();
    let store = Arc::new(AuthStore::new(config.jwt_secret.clone()));
    store.bootstrap(None);

    let state = AppState {
        store: store.clone(),
        gateway: Arc::new(UnreachableGateway) as GatewayState,
        config,
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address, store }
}

/// Client with redirects disabled so 303 responses can be asserted directly.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn create_token(exp_offset: i64) -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: Uuid::from_u128(1),
        iat: now as usize,
        exp: (now + exp_offset) as usize,
    };

    // Must match AppConfig::default().jwt_secret.
    let key = EncodingKey::from_secret(b"super-secure-test-secret-value-local");
    encode(&Header::default(), &claims, &key).unwrap()
}

fn wire_profile(role: &str, flags: OnboardingFlags) -> ProfileResponse {
    ProfileResponse {
        id: Uuid::from_u128(1),
        email: "user@example.com".to_string(),
        role: role.to_string(),
        flags: Some(flags),
    }
}

fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

// --- Tests ---

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let response = client()
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());
}

#[tokio::test]
async fn anonymous_login_screen_renders() {
    let app = spawn_app().await;
    let response = client()
        .get(format!("{}/login", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["view"], "login");
}

#[tokio::test]
async fn anonymous_dashboard_bounces_to_login() {
    let app = spawn_app().await;
    let response = client()
        .get(format!("{}/dashboard", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/login?next=/dashboard");
}

#[tokio::test]
async fn loading_profile_yields_retryable_response() {
    let app = spawn_app().await;
    // Authenticated, but the profile fetch has not resolved yet.
    app.store.apply_login(&create_token(3600)).unwrap();

    let response = client()
        .get(format!("{}/dashboard", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 503);
    assert_eq!(response.headers().get("retry-after").unwrap(), "1");

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["view"], "loading");
}

#[tokio::test]
async fn admin_area_renders_for_admin() {
    let app = spawn_app().await;
    app.store.apply_login(&create_token(3600)).unwrap();
    app.store
        .set_profile(wire_profile("admin", OnboardingFlags::default()));

    let response = client()
        .get(format!("{}/admin", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["view"], "admin-dashboard");
}

#[tokio::test]
async fn guardian_is_fenced_off_the_patient_dashboard() {
    let app = spawn_app().await;
    app.store.apply_login(&create_token(3600)).unwrap();
    app.store
        .set_profile(wire_profile("guardian", OnboardingFlags::complete()));

    let response = client()
        .get(format!("{}/dashboard", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/guardian-portal");
}

#[tokio::test]
async fn authenticated_patient_is_bounced_off_login() {
    let app = spawn_app().await;
    app.store.apply_login(&create_token(3600)).unwrap();
    app.store
        .set_profile(wire_profile("patient", OnboardingFlags::complete()));

    let response = client()
        .get(format!("{}/login", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn fresh_patient_is_pinned_to_verification() {
    let app = spawn_app().await;
    app.store.apply_login(&create_token(3600)).unwrap();
    app.store
        .set_profile(wire_profile("patient", OnboardingFlags::default()));

    let response = client()
        .get(format!("{}/dashboard", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/verify");
}

#[tokio::test]
async fn decision_endpoint_answers_without_navigating() {
    let app = spawn_app().await;

    let response = client()
        .get(format!("{}/nav/decision?path=/dashboard", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["decision"], "redirect");
    assert_eq!(body["to"], "/login");
    assert_eq!(body["returnTo"], "/dashboard");
}

#[tokio::test]
async fn decision_endpoint_reports_render_for_public_paths() {
    let app = spawn_app().await;

    let response = client()
        .get(format!("{}/nav/decision?path=/", app.address))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["decision"], "render");
}
