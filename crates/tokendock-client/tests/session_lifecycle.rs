//! Integration tests for the device session lifecycle.
//!
//! These tests exercise the `Session` through its *public* API the way a
//! front-end uses it, with the mock transport standing in for the device:
//!
//! - The happy path: detect a port, connect, authenticate, manage tokens,
//!   refresh, disconnect.
//! - The error paths: failed authentication leaves the session connected,
//!   a rejected PIN change keeps the old PIN live, and a failed refresh
//!   leaves the cached token set empty.
//! - The wire contract: every operation performs exactly one write and one
//!   bounded read per call, using the PIN cached at authentication time.
//!
//! The device side of every exchange is scripted byte-for-byte; nothing in
//! these tests depends on real serial hardware.

use tokendock_client::application::session::{Session, SessionError, SessionStatus};
use tokendock_client::application::detect;
use tokendock_client::infrastructure::transport::mock::{MockTransportFactory, ScriptedRead};
use tokendock_core::domain::token::TokenDraft;

// ── Full lifecycle ────────────────────────────────────────────────────────────

/// Runs the complete operator flow from detection to disconnect and checks
/// the session state after each step.
#[test]
fn test_full_lifecycle_detect_connect_manage_disconnect() {
    // Arrange: a device on COM2; COM1 exists but is not a token dock.
    let factory = MockTransportFactory::new();
    factory.push_response(ScriptedRead::Reply(b"garbage".to_vec())); // COM1 probe
    factory.push_response(ScriptedRead::Reply(b"OK".to_vec())); // COM2 probe

    // Act: detection.
    let port = detect(&factory, &["COM1".to_string(), "COM2".to_string()])
        .expect("device must be detected");
    assert_eq!(port, "COM2");

    // Act: connect + authenticate.
    let mut session = Session::new(Box::new(factory.clone()));
    session.connect(&port, 115_200).expect("connect");
    assert_eq!(session.status(), SessionStatus::Connected);

    factory.push_response(ScriptedRead::Reply(b"OK".to_vec()));
    session.authenticate("1234").expect("authenticate");
    assert_eq!(session.status(), SessionStatus::Authenticated);

    // Act: push an edited token set.
    factory.push_response(ScriptedRead::Reply(b"OK".to_vec()));
    session
        .save_tokens(&[TokenDraft::new("mail", "JBSWY3DPEHPK3PXP")])
        .expect("save");

    // Act: refresh from the device.
    factory.push_response(ScriptedRead::Reply(
        br#"{"tokens":[{"name":"mail","secret":[72,101,108,108,111,33,222,173,190,239]}]}"#
            .to_vec(),
    ));
    let tokens = session.get_data().expect("refresh");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].name, "mail");
    assert_eq!(tokens[0].secret_base32(), "JBSWY3DPEHPK3PXP");

    // Act: teardown.
    session.disconnect();
    assert_eq!(session.status(), SessionStatus::Disconnected);
    assert!(session.tokens().is_empty());
}

/// Every session operation opens the port once, writes once, and reads once;
/// the serial handle never outlives its exchange.
#[test]
fn test_each_operation_is_one_open_one_write_one_read() {
    let factory = MockTransportFactory::new();
    let mut session = Session::new(Box::new(factory.clone()));
    session.connect("COM2", 115_200).unwrap();

    factory.push_response(ScriptedRead::Reply(b"OK".to_vec()));
    session.authenticate("1234").unwrap();
    assert_eq!(factory.open_count(), 1);
    assert_eq!(factory.write_count(), 1);

    factory.push_response(ScriptedRead::Reply(b"OK".to_vec()));
    session.change_wifi("net", "pw").unwrap();
    assert_eq!(factory.open_count(), 2);
    assert_eq!(factory.write_count(), 2);

    factory.push_response(ScriptedRead::Reply(br#"{"tokens":[]}"#.to_vec()));
    session.get_data().unwrap();
    assert_eq!(factory.open_count(), 3);
    assert_eq!(factory.write_count(), 3);
}

// ── Authentication error paths ────────────────────────────────────────────────

/// A response without the marker must never advance the session to
/// `Authenticated`, and the operator can simply try again.
#[test]
fn test_failed_authentication_allows_retry() {
    let factory = MockTransportFactory::new();
    let mut session = Session::new(Box::new(factory.clone()));
    session.connect("COM2", 115_200).unwrap();

    // First attempt: wrong PIN.
    factory.push_response(ScriptedRead::Reply(b"DENIED".to_vec()));
    let first = session.authenticate("0000");
    assert!(matches!(first, Err(SessionError::AuthenticationFailed)));
    assert_eq!(session.status(), SessionStatus::Connected);

    // Second attempt succeeds; no state was corrupted by the failure.
    factory.push_response(ScriptedRead::Reply(b"OK".to_vec()));
    session.authenticate("1234").expect("retry succeeds");
    assert_eq!(session.status(), SessionStatus::Authenticated);
}

/// Commands that require authentication are refused before any I/O while
/// the session is merely connected.
#[test]
fn test_management_commands_require_authentication() {
    let factory = MockTransportFactory::new();
    let mut session = Session::new(Box::new(factory.clone()));
    session.connect("COM2", 115_200).unwrap();

    assert!(matches!(
        session.change_wifi("net", "pw"),
        Err(SessionError::InvalidState { .. })
    ));
    assert!(matches!(
        session.save_tokens(&[]),
        Err(SessionError::InvalidState { .. })
    ));
    assert!(matches!(
        session.get_data(),
        Err(SessionError::InvalidState { .. })
    ));
    assert_eq!(factory.open_count(), 0);
}

// ── PIN rotation ──────────────────────────────────────────────────────────────

/// After a successful PIN change, subsequent commands carry the new PIN on
/// the wire.
#[test]
fn test_rotated_pin_is_used_by_subsequent_commands() {
    let factory = MockTransportFactory::new();
    let mut session = Session::new(Box::new(factory.clone()));
    session.connect("COM2", 115_200).unwrap();

    factory.push_response(ScriptedRead::Reply(b"OK".to_vec()));
    session.authenticate("1234").unwrap();

    factory.push_response(ScriptedRead::Reply(b"OK".to_vec()));
    session.change_pin("1234", "5678").unwrap();

    factory.push_response(ScriptedRead::Reply(b"OK".to_vec()));
    session.change_wifi("net", "pw").unwrap();

    let last = factory.last_write().unwrap();
    let text = String::from_utf8(last).unwrap();
    assert!(text.contains(r#""pin":"5678""#), "got: {text}");
}

/// A rejected PIN change must leave the old PIN live: the next command
/// still authenticates with it.
#[test]
fn test_rejected_pin_change_keeps_old_pin_live() {
    let factory = MockTransportFactory::new();
    let mut session = Session::new(Box::new(factory.clone()));
    session.connect("COM2", 115_200).unwrap();

    factory.push_response(ScriptedRead::Reply(b"OK".to_vec()));
    session.authenticate("1234").unwrap();

    factory.push_response(ScriptedRead::Reply(b"WRONG".to_vec()));
    assert!(matches!(
        session.change_pin("1234", "5678"),
        Err(SessionError::PinRejected)
    ));

    factory.push_response(ScriptedRead::Reply(b"OK".to_vec()));
    session.change_wifi("net", "pw").unwrap();
    let text = String::from_utf8(factory.last_write().unwrap()).unwrap();
    assert!(text.contains(r#""pin":"1234""#), "got: {text}");
}

// ── Refresh semantics ─────────────────────────────────────────────────────────

/// A refresh that fails mid-way leaves the cached set empty rather than
/// restoring the pre-refresh contents.
#[test]
fn test_failed_refresh_clears_previous_tokens() {
    let factory = MockTransportFactory::new();
    let mut session = Session::new(Box::new(factory.clone()));
    session.connect("COM2", 115_200).unwrap();

    factory.push_response(ScriptedRead::Reply(b"OK".to_vec()));
    session.authenticate("1234").unwrap();

    factory.push_response(ScriptedRead::Reply(
        br#"{"tokens":[{"name":"a","secret":[1,2,3]}]}"#.to_vec(),
    ));
    session.get_data().unwrap();
    assert_eq!(session.tokens().len(), 1);

    // Device goes silent on the second refresh.
    factory.push_response(ScriptedRead::Timeout);
    assert!(matches!(session.get_data(), Err(SessionError::Timeout)));
    assert!(session.tokens().is_empty());
}

/// Two sessions against different ports are fully independent.
#[test]
fn test_independent_sessions_do_not_share_state() {
    let factory_a = MockTransportFactory::new();
    let factory_b = MockTransportFactory::new();
    let mut session_a = Session::new(Box::new(factory_a.clone()));
    let mut session_b = Session::new(Box::new(factory_b.clone()));

    session_a.connect("COM2", 115_200).unwrap();
    factory_a.push_response(ScriptedRead::Reply(b"OK".to_vec()));
    session_a.authenticate("1111").unwrap();

    session_b.connect("COM5", 9600).unwrap();
    factory_b.push_response(ScriptedRead::Reply(b"NO".to_vec()));
    assert!(session_b.authenticate("2222").is_err());

    assert_eq!(session_a.status(), SessionStatus::Authenticated);
    assert_eq!(session_b.status(), SessionStatus::Connected);
    assert_eq!(factory_a.write_count(), 1);
    assert_eq!(factory_b.write_count(), 1);
}
