use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use frontdesk_core::client::{ApiClient, GENERIC_LOGIN_ERROR};
use frontdesk_core::config::ClientConfig;
use frontdesk_core::errors::ApiError;
use frontdesk_core::session::{FileTokenStore, Session};
use frontdesk_core::types::Collection;

fn client_for(server: &MockServer, session: Session) -> ApiClient {
    let config = ClientConfig {
        base_url: Some(server.uri()),
        ..ClientConfig::default()
    };
    ApiClient::new(&config, session).unwrap()
}

fn session_with_token(token: &str) -> Session {
    let session = Session::in_memory();
    session.set_token(token).unwrap();
    session
}

#[tokio::test]
async fn attaches_the_session_token_to_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/room/"))
        .and(header("Authorization", "Token abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{"id": 1, "room_no": "101"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, session_with_token("abc123"));
    let listing = client.get_rooms().await.unwrap();
    assert_eq!(listing.count, 1);
    assert_eq!(listing.items.len(), 1);
}

#[tokio::test]
async fn sends_no_auth_header_without_a_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/hotel/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());
    client.get_hotels().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
    assert_eq!(
        requests[0].headers.get("content-type").unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn unauthorized_drops_the_token_and_short_circuits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/booking/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Invalid token."
        })))
        .expect(2)
        .mount(&server)
        .await;

    let session = session_with_token("stale");
    let client = client_for(&server, session.clone());

    let err = client.get_bookings().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
    assert!(session.token().is_none());
    assert!(!session.is_authenticated());

    // A later call without any token still yields the same terminal signal
    let err = client.get_bookings().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn unauthorized_clears_the_persisted_token_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/payment/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileTokenStore::new(dir.path().join("token")));
    let session = Session::new(store.clone()).unwrap();
    session.set_token("stale").unwrap();

    let client = client_for(&server, session);
    let err = client.get_payments().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));

    use frontdesk_core::session::TokenStore;
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn login_stores_the_returned_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/account/login"))
        .and(body_json(json!({"username": "a@b.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::in_memory();
    let client = client_for(&server, session.clone());

    let payload = client.login("a@b.com", "pw").await.unwrap();
    assert_eq!(payload.token, "T");
    assert_eq!(session.token().as_deref(), Some("T"));
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn login_failure_with_undecodable_body_is_generic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/account/login"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
        .mount(&server)
        .await;

    let session = Session::in_memory();
    let client = client_for(&server, session.clone());

    let err = client.login("a@b.com", "wrong").await.unwrap_err();
    match err {
        ApiError::Rejected { message } => assert_eq!(message, GENERIC_LOGIN_ERROR),
        other => panic!("expected Rejected, got {:?}", other),
    }
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn login_failure_surfaces_the_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/account/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "non_field_errors": ["Unable to log in with provided credentials."]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());
    let err = client.login("a@b.com", "wrong").await.unwrap_err();
    match err {
        ApiError::Rejected { message } => {
            assert!(message.contains("Unable to log in with provided credentials."))
        }
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn register_surfaces_the_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/account/register"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "password": ["Passwords must match."]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());
    let request = frontdesk_core::types::RegisterRequest {
        email: "a@b.com".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        password: "pw1".to_string(),
        password2: "pw2".to_string(),
    };

    let err = client.register(&request).await.unwrap_err();
    match err {
        ApiError::Rejected { message } => assert!(message.contains("Passwords must match.")),
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn register_success_stores_the_returned_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/account/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "response": "successfully registered",
            "email": "a@b.com",
            "token": "REG-TOKEN"
        })))
        .mount(&server)
        .await;

    let session = Session::in_memory();
    let client = client_for(&server, session.clone());
    let request = frontdesk_core::types::RegisterRequest {
        email: "a@b.com".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        password: "pw".to_string(),
        password2: "pw".to_string(),
    };

    let payload = client.register(&request).await.unwrap();
    assert_eq!(payload["email"], json!("a@b.com"));
    // Registration signs the new account in, exactly like login
    assert_eq!(session.token().as_deref(), Some("REG-TOKEN"));
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn register_without_a_token_in_the_body_stays_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/account/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "response": "successfully registered",
            "email": "a@b.com"
        })))
        .mount(&server)
        .await;

    let session = Session::in_memory();
    let client = client_for(&server, session.clone());
    let request = frontdesk_core::types::RegisterRequest {
        email: "a@b.com".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        password: "pw".to_string(),
        password2: "pw".to_string(),
    };

    client.register(&request).await.unwrap();
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn logout_clears_the_token_without_a_server_call() {
    let server = MockServer::start().await;

    let session = session_with_token("abc");
    let client = client_for(&server, session.clone());
    client.logout().unwrap();

    assert!(!session.is_authenticated());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn check_in_patches_the_checkin_path() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/booking/7/checkin/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, session_with_token("abc"));
    let body = client.check_in_booking(7).await.unwrap();
    assert_eq!(body["id"], json!(7));
}

#[tokio::test]
async fn check_out_patches_the_checkout_path() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/booking/9/checkout/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, session_with_token("abc"));
    client.check_out_booking(9).await.unwrap();
}

#[tokio::test]
async fn create_room_posts_the_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/room/"))
        .and(body_json(json!({"room_no": "101", "price": 120.0})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 1, "room_no": "101", "price": 120.0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, session_with_token("abc"));
    let created = client
        .create_room(&json!({"room_no": "101", "price": 120.0}))
        .await
        .unwrap();
    assert_eq!(created["id"], json!(1));
}

#[tokio::test]
async fn non_ok_status_maps_to_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/customer/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server, session_with_token("abc"));
    let err = client.get_customers().await.unwrap_err();
    match err {
        ApiError::HttpError {
            status_code,
            message,
        } => {
            assert_eq!(status_code, 500);
            assert!(message.contains("boom"));
        }
        other => panic!("expected HttpError, got {:?}", other),
    }
}

#[tokio::test]
async fn listings_accept_bare_arrays() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/room/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "room_no": 101},
            {"id": 2, "room_no": 102}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server, session_with_token("abc"));
    let listing = client.get_rooms().await.unwrap();
    assert_eq!(listing.count, 2);
    assert_eq!(listing.items.len(), 2);
}

#[tokio::test]
async fn current_user_parses_the_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/account/me"))
        .and(header("Authorization", "Token abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "email": "admin@hotel.test",
            "first_name": "Front",
            "last_name": "Desk",
            "role": "admin",
            "is_staff": true
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, session_with_token("abc"));
    let profile = client.current_user().await.unwrap();
    assert_eq!(profile.email.as_deref(), Some("admin@hotel.test"));
    assert_eq!(profile.is_staff, Some(true));
}

#[tokio::test]
async fn change_password_posts_both_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/account/change-password"))
        .and(body_json(json!({
            "old_password": "old",
            "new_password": "new"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "password changed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, session_with_token("abc"));
    client.change_password("old", "new").await.unwrap();
}

#[tokio::test]
async fn collection_page_returns_the_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/account/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 12,
            "results": []
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, session_with_token("abc"));
    let page = client.collection_page(Collection::Accounts).await.unwrap();
    assert_eq!(page["count"], json!(12));
}
