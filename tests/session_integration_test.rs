use actinia_client::config::ConnectionSettings;
use actinia_client::utils::error::ErrorCategory;
use actinia_client::{Actinia, ActiniaError, Credentials, TomlConfig};
use httpmock::prelude::*;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

// base64("demouser:gu3st!pa55w0rd")
const DEMO_AUTH_HEADER: &str = "Basic ZGVtb3VzZXI6Z3Uzc3QhcGE1NXcwcmQ=";

#[tokio::test]
async fn test_requests_carry_basic_auth() {
    let server = MockServer::start();
    let authed_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v3/locations")
            .header("authorization", DEMO_AUTH_HEADER);
        then.status(200)
            .json_body(serde_json::json!({"locations": ["nc_spm_08"], "status": "success"}));
    });

    let mut actinia = Actinia::new(&server.base_url(), "v3").unwrap();
    actinia.set_authentication("demouser", "gu3st!pa55w0rd");

    let locations = actinia.get_locations().await.unwrap();

    authed_mock.assert();
    assert!(locations.contains_key("nc_spm_08"));
}

#[tokio::test]
async fn test_unauthorized_is_reported() {
    let server = MockServer::start();
    let unauthorized_mock = server.mock(|when, then| {
        when.method(GET).path("/api/v3/locations");
        then.status(401).body("Unauthorized Access");
    });

    let mut actinia = Actinia::new(&server.base_url(), "v3").unwrap();
    let err = actinia.get_locations().await.unwrap_err();

    unauthorized_mock.assert();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.category(), ErrorCategory::Server);
    assert!(err.to_string().contains("Unauthorized Access"));
    assert!(err.recovery_suggestion().contains("password"));
    assert!(actinia.locations().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_a_decode_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v3/locations");
        then.status(200)
            .header("Content-Type", "application/json")
            .body("{\"locations\": [");
    });

    let mut actinia = Actinia::new(&server.base_url(), "v3").unwrap();
    let result = actinia.get_locations().await;

    assert!(matches!(result, Err(ActiniaError::DecodeError(_))));
}

#[tokio::test]
async fn test_unknown_location_is_not_found_locally() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v3/locations");
        then.status(200)
            .json_body(serde_json::json!({"locations": ["nc_spm_08"]}));
    });

    let mut actinia = Actinia::new(&server.base_url(), "v3").unwrap();
    actinia.get_locations().await.unwrap();

    let err = actinia.location_mut("utm32n").unwrap_err();
    assert!(matches!(
        err,
        ActiniaError::NotFound {
            kind: "location",
            ..
        }
    ));
}

#[tokio::test]
async fn test_session_from_toml_config() {
    let server = MockServer::start();
    let version_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v3/version")
            .header("authorization", DEMO_AUTH_HEADER);
        then.status(200).json_body(serde_json::json!({
            "version": "4.14.1",
            "grass_version": {"version": "8.3.2"}
        }));
    });

    let mut config_file = NamedTempFile::new().unwrap();
    write!(
        config_file,
        r#"
[server]
base_url = "{}"
api_version = "v3"
timeout_seconds = 5

[auth]
user = "demouser"
password = "gu3st!pa55w0rd"
"#,
        server.base_url()
    )
    .unwrap();

    let config = TomlConfig::from_file(config_file.path()).unwrap();
    let settings = ConnectionSettings::from_provider(&config);
    assert_eq!(settings.timeout, Some(Duration::from_secs(5)));
    assert_eq!(
        settings.credentials,
        Some(Credentials::new("demouser", "gu3st!pa55w0rd"))
    );

    let actinia = Actinia::from_config(&settings).unwrap();
    assert!(actinia.is_authenticated());

    let version = actinia.get_version().await.unwrap();
    version_mock.assert();
    assert_eq!(version.version, "4.14.1");
}

#[tokio::test]
async fn test_full_location_lifecycle() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/v3/locations/test_location")
            .json_body(serde_json::json!({"epsg": "4326"}));
        then.status(200).json_body(serde_json::json!({"status": "finished"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v3/locations/test_location/mapsets");
        then.status(200)
            .json_body(serde_json::json!({"process_results": ["PERMANENT"]}));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/v3/locations/test_location/mapsets/test_mapset");
        then.status(200).json_body(serde_json::json!({"status": "finished"}));
    });
    server.mock(|when, then| {
        when.method(DELETE)
            .path("/api/v3/locations/test_location/mapsets/test_mapset");
        then.status(200).json_body(serde_json::json!({"status": "finished"}));
    });
    let delete_location = server.mock(|when, then| {
        when.method(DELETE).path("/api/v3/locations/test_location");
        then.status(200).json_body(serde_json::json!({"status": "finished"}));
    });

    let mut actinia = Actinia::new(&server.base_url(), "v3").unwrap();

    let location = actinia.create_location("test_location", "4326").await.unwrap();
    let mapsets = location.get_mapsets().await.unwrap();
    assert_eq!(mapsets.len(), 1);

    let mapset = location.create_mapset("test_mapset").await.unwrap();
    assert_eq!(mapset.location_name(), "test_location");
    assert_eq!(location.mapsets().len(), 2);

    location.delete_mapset("test_mapset").await.unwrap();
    assert_eq!(location.mapsets().len(), 1);

    actinia.delete_location("test_location").await.unwrap();
    delete_location.assert();
    assert!(actinia.locations().is_empty());
}
