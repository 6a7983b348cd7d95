//! Tests for Session
//!
//! These tests verify:
//! - Session establishment, endpoint fallback and startup failure
//! - Credential pass-through
//! - put/get/delete/scan round trips against a live server
//! - Per-call deadlines, re-dial included, and recovery after a failed call

#[path = "../common/mod.rs"]
mod common;

use std::time::{Duration, Instant};

use atlaskv_console::{Config, ConsoleError, Entry, KvStore, Session};
use common::{dead_endpoint, MockOptions, MockServer, REJECT_KEY, STALL_KEY, TRICKLE_KEY};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_session() -> (MockServer, Session) {
    let server = MockServer::start();
    let session = Session::connect(server.config()).unwrap();
    (server, session)
}

fn secured_server() -> MockServer {
    MockServer::start_with(MockOptions {
        credentials: Some(("root".to_string(), "hunter2".to_string())),
        ..Default::default()
    })
}

// =============================================================================
// Connection Tests
// =============================================================================

#[test]
fn test_connect_reports_endpoint() {
    let (server, session) = setup_session();

    assert_eq!(session.endpoint(), server.endpoint());
    assert!(session.is_connected());
    assert_eq!(server.connections(), 1);
}

#[test]
fn test_connect_falls_back_to_next_endpoint() {
    let server = MockServer::start();
    let config = Config::builder()
        .endpoints([dead_endpoint(), server.endpoint()])
        .dial_timeout_ms(500)
        .build();

    let session = Session::connect(config).unwrap();
    assert_eq!(session.endpoint(), server.endpoint());
}

#[test]
fn test_connect_failure_is_startup_error() {
    let config = Config::builder()
        .endpoint(dead_endpoint())
        .dial_timeout_ms(500)
        .build();

    match Session::connect(config) {
        Err(ConsoleError::Startup(msg)) => assert!(msg.contains("cannot connect")),
        Err(e) => panic!("Expected startup error, got {:?}", e),
        Ok(_) => panic!("Expected startup error"),
    }
}

#[test]
fn test_connect_unresolvable_endpoint() {
    let config = Config::builder().endpoint("not an address").build();
    assert!(matches!(Session::connect(config), Err(ConsoleError::Startup(_))));
}

#[test]
fn test_connect_invalid_config_is_startup_error() {
    let config = Config::builder().endpoints(Vec::<String>::new()).build();
    assert!(matches!(Session::connect(config), Err(ConsoleError::Startup(_))));
}

// =============================================================================
// Credential Tests
// =============================================================================

#[test]
fn test_connect_with_credentials() {
    let server = secured_server();
    let config = Config::builder()
        .endpoint(server.endpoint())
        .username("root")
        .password("hunter2")
        .build();

    let mut session = Session::connect(config).unwrap();
    session.put("k", "v").unwrap();
    assert_eq!(server.value("k").as_deref(), Some("v"));
}

#[test]
fn test_connect_with_wrong_password() {
    let server = secured_server();
    let config = Config::builder()
        .endpoint(server.endpoint())
        .username("root")
        .password("wrong")
        .build();

    match Session::connect(config) {
        Err(ConsoleError::Startup(msg)) => {
            assert!(msg.contains("authentication failed"));
            assert!(msg.contains("invalid credentials"));
        }
        Err(e) => panic!("Expected startup error, got {:?}", e),
        Ok(_) => panic!("Expected startup error"),
    }
}

#[test]
fn test_anonymous_session_rejected_by_secured_store() {
    let server = secured_server();
    let mut session = Session::connect(server.config()).unwrap();

    let err = session.get("k").unwrap_err();
    assert!(matches!(err, ConsoleError::Unavailable(ref m) if m == "authentication required"));
    assert!(session.is_connected());
}

// =============================================================================
// Operation Tests
// =============================================================================

#[test]
fn test_put_get_round_trip() {
    let (server, mut session) = setup_session();

    session.put("greeting", "hello world").unwrap();

    assert_eq!(session.get("greeting").unwrap().as_deref(), Some("hello world"));
    assert_eq!(server.value("greeting").as_deref(), Some("hello world"));
}

#[test]
fn test_put_overwrites() {
    let (_server, mut session) = setup_session();

    session.put("k", "old").unwrap();
    session.put("k", "new").unwrap();

    assert_eq!(session.get("k").unwrap().as_deref(), Some("new"));
}

#[test]
fn test_get_missing_key() {
    let (_server, mut session) = setup_session();
    assert_eq!(session.get("missing").unwrap(), None);
}

#[test]
fn test_get_empty_value() {
    let (server, mut session) = setup_session();
    server.insert("blank", "");

    assert_eq!(session.get("blank").unwrap().as_deref(), Some(""));
}

#[test]
fn test_delete_is_idempotent() {
    let (server, mut session) = setup_session();
    server.insert("k", "v");

    session.delete("k").unwrap();
    session.delete("k").unwrap();
    session.delete("never-existed").unwrap();

    assert_eq!(session.get("k").unwrap(), None);
    assert_eq!(server.len(), 0);
}

#[test]
fn test_scan_prefix_filters_and_orders() {
    let (server, mut session) = setup_session();
    for (k, v) in [("user/2", "b"), ("app", "x"), ("user/1", "a"), ("users", "z")] {
        server.insert(k, v);
    }

    let entries = session.scan_prefix("user/").unwrap();
    assert_eq!(entries, vec![Entry::new("user/1", "a"), Entry::new("user/2", "b")]);

    let all: Vec<String> = session
        .scan_prefix("")
        .unwrap()
        .into_iter()
        .map(|e| e.key)
        .collect();
    assert_eq!(all, vec!["app", "user/1", "user/2", "users"]);
}

#[test]
fn test_scan_empty_store() {
    let (_server, mut session) = setup_session();
    assert!(session.scan_prefix("").unwrap().is_empty());
}

#[test]
fn test_store_error_keeps_connection() {
    let (server, mut session) = setup_session();

    let err = session.put(REJECT_KEY, "v").unwrap_err();
    assert!(matches!(err, ConsoleError::Unavailable(ref m) if m == "write rejected"));
    assert!(session.is_connected());

    session.put("ok", "v").unwrap();
    assert_eq!(server.connections(), 1);
}

// =============================================================================
// Timeout Tests
// =============================================================================

#[test]
fn test_timeout_is_unavailable_and_session_recovers() {
    let server = MockServer::start();
    let config = Config::builder()
        .endpoint(server.endpoint())
        .request_timeout_ms(200)
        .build();
    let mut session = Session::connect(config).unwrap();

    let err = session.get(STALL_KEY).unwrap_err();
    match err {
        ConsoleError::Unavailable(msg) => assert_eq!(msg, "request timed out after 200ms"),
        other => panic!("Expected Unavailable, got {:?}", other),
    }
    assert!(!session.is_connected());

    // The next call re-dials; the timed-out call is not replayed
    session.put("after", "timeout").unwrap();
    assert!(session.is_connected());
    assert_eq!(server.connections(), 2);
    assert_eq!(session.get("after").unwrap().as_deref(), Some("timeout"));
}

#[test]
fn test_slow_reply_is_cut_off_at_request_timeout() {
    let server = MockServer::start();
    server.insert(TRICKLE_KEY, "slowvalue");
    let config = Config::builder()
        .endpoint(server.endpoint())
        .request_timeout_ms(300)
        .build();
    let mut session = Session::connect(config).unwrap();

    // 14 reply bytes, 150ms apart: every single read is quick, the call is not
    let started = Instant::now();
    let err = session.get(TRICKLE_KEY).unwrap_err();
    let elapsed = started.elapsed();

    match err {
        ConsoleError::Unavailable(msg) => assert_eq!(msg, "request timed out after 300ms"),
        other => panic!("Expected Unavailable, got {:?}", other),
    }
    assert!(elapsed < Duration::from_millis(1000), "call took {:?}", elapsed);
    assert!(!session.is_connected());
}

#[test]
fn test_redial_shares_the_call_deadline() {
    let server = MockServer::start();
    let config = Config::builder()
        .endpoint(server.endpoint())
        .request_timeout_ms(500)
        .build();
    let mut session = Session::connect(config).unwrap();

    session.get(STALL_KEY).unwrap_err();
    assert!(!session.is_connected());

    // Re-dial PING eats 400ms of the 500ms budget, leaving too little for
    // the stalled GET that follows
    server.set_ping_delay(Duration::from_millis(400));
    let started = Instant::now();
    let err = session.get(STALL_KEY).unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, ConsoleError::Unavailable(ref m) if m == "request timed out after 500ms"));
    assert!(elapsed < Duration::from_millis(800), "call took {:?}", elapsed);
}

#[test]
fn test_failed_redial_is_unavailable() {
    let server = MockServer::start_with(MockOptions {
        accept_limit: Some(1),
        ..Default::default()
    });
    let config = Config::builder()
        .endpoint(server.endpoint())
        .dial_timeout_ms(500)
        .request_timeout_ms(200)
        .build();
    let mut session = Session::connect(config).unwrap();

    session.get(STALL_KEY).unwrap_err();
    assert!(!session.is_connected());

    match session.get("k") {
        Err(ConsoleError::Unavailable(msg)) => assert!(msg.contains("cannot connect"), "{}", msg),
        other => panic!("Expected Unavailable, got {:?}", other),
    }
    assert!(!session.is_connected());
    assert_eq!(server.connections(), 1);
}

#[test]
fn test_each_call_is_one_request() {
    let (server, mut session) = setup_session();

    session.put("a", "1").unwrap();
    session.get("a").unwrap();
    session.delete("a").unwrap();
    session.scan_prefix("").unwrap();

    assert_eq!(server.data_requests(), 4);
}
