use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notification_cell::{NotificationSink, SendRequest};
use shared_config::AppConfig;

#[tokio::test]
async fn unconfigured_gateway_still_archives_to_outbox() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::with_base_dir(dir.path());

    let sink = NotificationSink::new(&config);
    let receipt = sink
        .send(SendRequest::email("asha@example.com", "Hello", "Body text"))
        .await;

    assert!(!receipt.delivered);
    let archived = receipt.archived_to.unwrap();
    assert!(archived.starts_with(config.outbox_dir.join("emails")));

    let content = std::fs::read_to_string(&archived).unwrap();
    assert!(content.starts_with("TO: asha@example.com\nSUBJECT: Hello\n\nBody text"));
    let name = archived.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.ends_with("_asha_at_example.com.txt"));
}

#[tokio::test]
async fn configured_gateway_delivers_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "to": "asha@example.com",
            "subject": "Hello",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = AppConfig::with_base_dir(dir.path());
    config.email_gateway_url = format!("{}/email", server.uri());
    config.email_gateway_key = "test-key".to_string();

    let sink = NotificationSink::new(&config);
    let receipt = sink
        .send(SendRequest::email("asha@example.com", "Hello", "Body text"))
        .await;

    assert!(receipt.delivered);
    assert!(receipt.archived_to.is_some());
}

#[tokio::test]
async fn gateway_rejection_is_soft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sms"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = AppConfig::with_base_dir(dir.path());
    config.sms_gateway_url = format!("{}/sms", server.uri());
    config.sms_gateway_key = "test-key".to_string();

    let sink = NotificationSink::new(&config);
    let receipt = sink
        .send(SendRequest::sms("9876543210", "See you soon"))
        .await;

    // Delivery failed but the outbox copy survives.
    assert!(!receipt.delivered);
    assert!(receipt.archived_to.unwrap().exists());
}

#[tokio::test]
async fn empty_destination_gets_a_placeholder_name() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::with_base_dir(dir.path());

    let sink = NotificationSink::new(&config);
    let receipt = sink.send(SendRequest::sms("", "orphan message")).await;

    let archived = receipt.archived_to.unwrap();
    let name = archived.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.ends_with("_no_phone.txt"));
    assert_eq!(std::fs::read_to_string(&archived).unwrap(), "orphan message");
}

#[tokio::test]
async fn email_attachment_is_noted_in_archive() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::with_base_dir(dir.path());

    let sink = NotificationSink::new(&config);
    let request = SendRequest::email("asha@example.com", "Confirmed", "Body")
        .with_attachment(Some(dir.path().join("intake_form.pdf")));
    let receipt = sink.send(request).await;

    let content = std::fs::read_to_string(receipt.archived_to.unwrap()).unwrap();
    assert!(content.ends_with("[ATTACHMENT: intake_form.pdf]"));
}
