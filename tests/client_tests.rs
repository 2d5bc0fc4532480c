//! Integration tests for the provider client using mockito for HTTP mocking.

use mockito::{Matcher, Server};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use whatsapp_transport::error::TransportError;
use whatsapp_transport::{
    Config, ContactRecord, DispatchOutcome, Dispatcher, HttpTransport, IntegrationSettings,
    ProviderClient, ProviderLookup, StaticProviderLookup, UreqTransport, INTEGRATION_NAME,
};

fn lookup(api_key: &str) -> Arc<dyn ProviderLookup> {
    Arc::new(
        StaticProviderLookup::new()
            .with_integration(INTEGRATION_NAME, IntegrationSettings::with_api_key(api_key)),
    )
}

fn config_for(server: &Server) -> Config {
    Config {
        api_url: format!("{}/api/send_message", server.url()),
        request_timeout: 5,
        ..Config::default()
    }
}

#[test]
fn test_post_json_payload() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/api/send_message")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({
            "phone_no": "+919876543210",
            "key": "test-api-key",
            "message": "Hi Asha",
            "skip_link": true
        })))
        .with_status(200)
        .with_body(r#"{"status":"queued"}"#)
        .create();

    let dispatcher = Dispatcher::from_config(&config_for(&server), lookup("test-api-key")).unwrap();
    let contact = ContactRecord {
        phone_number: Some("9876543210".to_string()),
        first_name: Some("Asha".to_string()),
        ..Default::default()
    };

    let outcome = dispatcher.dispatch(&contact, "Hi {contact_firstname}");

    mock.assert();
    match outcome {
        DispatchOutcome::Sent { response } => {
            assert_eq!(response.status, 200);
            assert_eq!(response.body, r#"{"status":"queued"}"#);
        }
        other => panic!("Expected Sent, got: {:?}", other),
    }
}

#[test]
fn test_error_status_is_returned_verbatim() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/api/send_message")
        .with_status(401)
        .with_body("invalid key")
        .create();

    let transport = UreqTransport::with_timeout(Duration::from_secs(5));
    let response = transport
        .post_json(&format!("{}/api/send_message", server.url()), "{}")
        .unwrap();

    mock.assert();
    assert_eq!(response.status, 401);
    assert_eq!(response.body, "invalid key");
}

#[test]
fn test_server_error_is_not_a_failure() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/api/send_message")
        .with_status(503)
        .with_body("try later")
        .expect(1)
        .create();

    let dispatcher = Dispatcher::from_config(&config_for(&server), lookup("test-api-key")).unwrap();
    let outcome = dispatcher.dispatch(&ContactRecord::with_phone("+919876543210"), "Hello");

    // Exactly one attempt, no retry
    mock.assert();
    let response = outcome.response().unwrap();
    assert_eq!(response.status, 503);
    assert_eq!(response.body, "try later");
}

#[test]
fn test_provider_client_send() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/api/send_message")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "phone_no": "+14155550100"
        })))
        .with_status(200)
        .with_body("OK")
        .create();

    let lookup = StaticProviderLookup::new()
        .with_integration(INTEGRATION_NAME, IntegrationSettings::with_api_key("k"));
    let credential = whatsapp_transport::connection::resolve(&lookup).unwrap();

    let client = ProviderClient::with_endpoint(format!("{}/api/send_message", server.url()));
    let transport = UreqTransport::with_timeout(Duration::from_secs(5));
    let response = client
        .send("14155550100", "Hello", &credential, &transport)
        .unwrap();

    mock.assert();
    assert_eq!(response.body, "OK");
}

#[test]
fn test_connection_refused() {
    // Bind then drop to get a local port nobody listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let transport = UreqTransport::with_timeout(Duration::from_secs(5));
    let result = transport.post_json(&format!("http://127.0.0.1:{}/api/send_message", port), "{}");

    assert_eq!(result, Err(TransportError::ConnectionRefused));
}

#[test]
fn test_dispatch_connection_refused() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let config = Config {
        api_url: format!("http://127.0.0.1:{}/api/send_message", port),
        request_timeout: 5,
        ..Config::default()
    };
    let dispatcher = Dispatcher::from_config(&config, lookup("test-api-key")).unwrap();

    let outcome = dispatcher.dispatch(&ContactRecord::with_phone("9876543210"), "Hello");
    assert_eq!(
        outcome.failure().map(|r| r.to_string()),
        Some("Whatsapp MSG request failed: connection refused".to_string())
    );
}

#[test]
fn test_tls_handshake_failure_is_tls_error() {
    // Plain HTTP on the other end of an https:// URL
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\n\r\nOK");
        }
    });

    let transport = UreqTransport::with_timeout(Duration::from_secs(5));
    let result = transport.post_json(&format!("https://127.0.0.1:{}/api/send_message", port), "{}");
    server.join().unwrap();

    match result {
        Err(TransportError::Tls(detail)) => assert!(!detail.is_empty()),
        other => panic!("Expected Tls error, got: {:?}", other),
    }
}

#[test]
fn test_unanswered_request_times_out() {
    // The kernel accepts the connection into the backlog; nobody ever replies
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let transport = UreqTransport::with_timeout(Duration::from_millis(300));
    let result = transport.post_json(&format!("http://127.0.0.1:{}/api/send_message", port), "{}");

    assert_eq!(result, Err(TransportError::Timeout));
    drop(listener);
}

#[test]
fn test_unresolvable_host_is_dns_error() {
    let transport = UreqTransport::with_timeout(Duration::from_secs(5));
    let result = transport.post_json("http://whatsapp-provider.invalid/api/send_message", "{}");

    match result {
        Err(TransportError::Dns(detail)) => assert!(!detail.is_empty()),
        other => panic!("Expected Dns error, got: {:?}", other),
    }
}

#[test]
fn test_insecure_tls_transport_builds() {
    let config = Config {
        accept_invalid_certs: true,
        ..Config::default()
    };
    assert!(UreqTransport::new(&config).is_ok());
}
