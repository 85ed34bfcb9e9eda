//! End-to-end tests of the session contracts against a local stub server:
//! bearer attachment at send time, session persistence on login, and
//! clear-on-auth-rejection.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use wastetrace_core::api::{ApiClient, ApiError};
use wastetrace_core::auth::SessionStore;
use wastetrace_core::models::{RegistrationForm, Role, User};

/// Serve one canned HTTP response per expected connection, capturing each
/// request so tests can assert on headers. The handle resolves to the
/// captured requests once every response has been served.
async fn spawn_stub(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut socket).await);

            let reason = match status {
                200 => "OK",
                401 => "Unauthorized",
                422 => "Unprocessable Entity",
                500 => "Internal Server Error",
                _ => "Error",
            };
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        }
        requests
    });

    (format!("http://{}", addr), handle)
}

/// Read a full HTTP request (head plus Content-Length body) from a socket.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            return String::from_utf8_lossy(&buf).to_string();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn test_user_json() -> &'static str {
    r#"{"id":"u-1","name":"Jane","email":"jane@example.com","role":"field_officer"}"#
}

fn seeded_user() -> User {
    User {
        id: "u-1".to_string(),
        name: "Jane".to_string(),
        email: "jane@example.com".to_string(),
        contact: None,
        area: None,
        plot_number: None,
        account_type: None,
        kyc_status: None,
        role: Role::FieldOfficer,
        created_at: None,
    }
}

fn temp_store() -> (tempfile::TempDir, Arc<SessionStore>) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SessionStore::new(dir.path().join("session")));
    (dir, store)
}

#[tokio::test]
async fn test_login_persists_session_and_attaches_bearer() {
    let login_body = format!(
        r#"{{"status":"success","token":"abc123","user":{}}}"#,
        test_user_json()
    );
    let accounts_body = r#"{"status":"success","data":[]}"#.to_string();
    let (base_url, handle) = spawn_stub(vec![(200, login_body), (200, accounts_body)]).await;

    let (_dir, store) = temp_store();
    let client = ApiClient::new(base_url, Arc::clone(&store)).unwrap();

    let user = client
        .auth()
        .login("jane@example.com", "hunter22")
        .await
        .unwrap();
    assert_eq!(user.name, "Jane");
    assert_eq!(store.token().as_deref(), Some("abc123"));
    assert!(store.auth_state().is_authenticated());

    let accounts = client.accounts().list().await.unwrap();
    assert!(accounts.is_empty());

    let requests = handle.await.unwrap();
    let login_request = requests[0].to_lowercase();
    assert!(!login_request.contains("authorization:"));
    let accounts_request = requests[1].to_lowercase();
    assert!(accounts_request.contains("authorization: bearer abc123"));
}

#[tokio::test]
async fn test_auth_rejected_clears_session_before_returning() {
    let body = r#"{"status":"error","message":"Invalid or expired token"}"#.to_string();
    let (base_url, handle) = spawn_stub(vec![(401, body)]).await;

    let (_dir, store) = temp_store();
    store.save_session("stale-token", &seeded_user()).unwrap();
    let client = ApiClient::new(base_url, Arc::clone(&store)).unwrap();

    let err = client.entries().list().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::AuthRejected)
    ));

    // Cleared as part of the failing call, not afterwards
    assert_eq!(store.token(), None);
    assert!(store.user().is_none());
    assert!(!store.auth_state().is_authenticated());

    let requests = handle.await.unwrap();
    assert!(requests[0]
        .to_lowercase()
        .contains("authorization: bearer stale-token"));
}

#[tokio::test]
async fn test_server_error_preserves_session() {
    let body = r#"{"status":"error","message":"Could not create entry"}"#.to_string();
    let (base_url, _handle) = spawn_stub(vec![(500, body)]).await;

    let (_dir, store) = temp_store();
    store.save_session("abc123", &seeded_user()).unwrap();
    let client = ApiClient::new(base_url, Arc::clone(&store)).unwrap();

    let err = client.accounts().list().await.unwrap_err();
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::Server(msg)) => assert_eq!(msg, "Could not create entry"),
        other => panic!("expected server error, got {:?}", other),
    }
    assert_eq!(store.token().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_validation_failure_preserves_session() {
    let body = r#"{"status":"error","message":"Email already registered"}"#.to_string();
    let (base_url, _handle) = spawn_stub(vec![(422, body)]).await;

    let (_dir, store) = temp_store();
    store.save_session("abc123", &seeded_user()).unwrap();
    let client = ApiClient::new(base_url, Arc::clone(&store)).unwrap();

    let err = client.accounts().list().await.unwrap_err();
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::Validation(msg)) => assert_eq!(msg, "Email already registered"),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(store.token().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_invalid_login_response_is_contract_violation() {
    // Token but no user: must fail, and must not persist a partial session
    let body = r#"{"status":"success","token":"abc123"}"#.to_string();
    let (base_url, _handle) = spawn_stub(vec![(200, body)]).await;

    let (_dir, store) = temp_store();
    let client = ApiClient::new(base_url, Arc::clone(&store)).unwrap();

    let err = client
        .auth()
        .login("jane@example.com", "hunter22")
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::Validation(_))
    ));
    assert_eq!(store.token(), None);
    assert!(store.user().is_none());
}

#[tokio::test]
async fn test_register_validation_runs_before_any_network_call() {
    // A listener that never accepts: if validation leaks a request through,
    // the call would hang against it instead of failing fast.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let (_dir, store) = temp_store();
    let client = ApiClient::new(base_url, Arc::clone(&store)).unwrap();

    let form = RegistrationForm {
        name: "Jane Moyo".to_string(),
        email: "jane@example.com".to_string(),
        password: "hunter22".to_string(),
        confirm_password: "different".to_string(),
        contact: String::new(),
        area: String::new(),
        plot_number: String::new(),
        account_type: wastetrace_core::models::AccountType::Household,
        is_international: false,
        id_document: None,
        selfie: None,
    };

    let err = client.auth().register(&form).await.unwrap_err();
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::Validation(msg)) => assert_eq!(msg, "passwords do not match"),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(store.token(), None);
}
