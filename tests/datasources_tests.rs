//! Integration tests for data source uploads.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use ragcy_client::errors::UNSUPPORTED_FILE_TYPE_MESSAGE;
use ragcy_client::{DataSourceInput, RagcyError};
use serde_json::json;
use std::io::Write;
use test_case::test_case;

fn write_file(dir: &tempfile::TempDir, name: &str, len: usize) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(&vec![b'r'; len]).unwrap();
    path
}

fn content_type(request: &wiremock::Request) -> String {
    request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_upload_file_as_multipart() {
    let mock_server = setup_mock_server().await;
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "report.pdf", 2_097_152);

    mock_with_auth("POST", "/datasources")
        .respond_with(success_response(json!({"id": "ds1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let envelope = client_for(&mock_server)
        .data_sources()
        .add("c1", DataSourceInput::file(&path))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(envelope.data(), Some(&json!({"id": "ds1"})));

    let requests = mock_server.received_requests().await.unwrap();
    let request = &requests[0];
    assert!(content_type(request).starts_with("multipart/form-data; boundary="));

    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains("name=\"file\"; filename=\"report.pdf\""));
    assert!(body.contains("Content-Type: application/pdf"));
    assert!(body.contains("name=\"filename\"\r\n\r\nreport.pdf\r\n"));
    assert!(body.contains("name=\"type\"\r\n\r\npdf\r\n"));
    assert!(body.contains("name=\"corpusId\"\r\n\r\nc1\r\n"));
    assert!(body.contains("name=\"size\"\r\n\r\n2\r\n"));
    assert!(request.body.len() > 2_097_152);
}

#[tokio::test]
async fn test_register_url_has_no_size() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("POST", "/datasources")
        .respond_with(success_response(json!({"id": "ds2"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    client_for(&mock_server)
        .data_sources()
        .add("c1", DataSourceInput::url("https://example.com/guide"))
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"filename\"\r\n\r\nhttps://example.com/guide\r\n"));
    assert!(body.contains("name=\"type\"\r\n\r\nurl\r\n"));
    assert!(!body.contains("name=\"size\""));
    assert!(!body.contains("name=\"file\""));
}

#[test_case("setup.exe" ; "executable")]
#[test_case("photo.png" ; "image")]
#[test_case("LICENSE" ; "no extension")]
fn test_disallowed_file_makes_no_request(filename: &str) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let mock_server = setup_mock_server().await;
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, filename, 64);

        let err = client_for(&mock_server)
            .data_sources()
            .add("c1", DataSourceInput::file(&path))
            .await
            .unwrap_err();

        assert!(matches!(err, RagcyError::UnsupportedFileType { .. }));
        assert_eq!(err.to_string(), UNSUPPORTED_FILE_TYPE_MESSAGE);
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    });
}

#[tokio::test]
async fn test_no_source_makes_no_request() {
    let mock_server = setup_mock_server().await;

    let result = client_for(&mock_server)
        .data_sources()
        .add("c1", DataSourceInput::default())
        .await
        .unwrap();

    assert!(result.is_none());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_and_remove() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("GET", "/datasources/c1")
        .respond_with(success_response(json!([{"id": "ds1"}])))
        .expect(1)
        .mount(&mock_server)
        .await;
    mock_with_auth("DELETE", "/datasources/ds1")
        .respond_with(success_response(json!(null)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let listed = client.data_sources().list("c1").await.unwrap();
    assert_eq!(listed.data_as::<Vec<serde_json::Value>>().unwrap().len(), 1);

    client.data_sources().remove("ds1").await.unwrap();
}
