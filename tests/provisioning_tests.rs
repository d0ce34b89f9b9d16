use std::path::Path;
use std::time::Duration;

use paper_setup_lib::core::catalog::CatalogConfig;
use paper_setup_lib::core::downloader::{ArtifactRef, Downloader};
use paper_setup_lib::core::error::{SetupError, ValidationIssue};
use paper_setup_lib::core::http::build_http_client;
use paper_setup_lib::core::install::{LaunchScript, ProvisioningRequest, ServerProperties, SetupForm};
use paper_setup_lib::core::provision;
use paper_setup_lib::core::state::AppState;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JAR_PATH: &str = "/v2/projects/paper/versions/1.20.4/builds/499/downloads/paper-1.20.4-499.jar";

// ── Helpers ─────────────────────────────────────────────────────

fn state_for(server: &MockServer) -> AppState {
    AppState::new(CatalogConfig::with_api_root(format!("{}/v2", server.uri()))).unwrap()
}

fn form_for(dir: &Path) -> SetupForm {
    SetupForm {
        version: "1.20.4".into(),
        install_dir: dir.to_string_lossy().to_string(),
        eula_accepted: true,
        ..SetupForm::default()
    }
}

async fn mount_catalog(server: &MockServer, jar: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path("/v2/projects/paper/versions/1.20.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "project_id": "paper",
            "version": "1.20.4",
            "builds": [100, 499, 450]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(JAR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(jar))
        .mount(server)
        .await;
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

/// One-shot HTTP server that promises `advertised` bytes, sends `sent`, then hangs up.
async fn truncating_server(advertised: usize, sent: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/java-archive\r\nContent-Length: {}\r\n\r\n",
            advertised
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(&vec![7u8; sent]).await.unwrap();
        socket.flush().await.unwrap();
        // socket drops here, mid-body
    });

    format!("http://{}/v2", addr)
}

fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

// ── Catalog ─────────────────────────────────────────────────────

#[tokio::test]
async fn list_versions_is_sorted_descending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/projects/paper"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "project_id": "paper",
            "versions": ["1.19.4", "1.20.4", "1.8.8", "1.20.6"]
        })))
        .mount(&server)
        .await;
    let state = state_for(&server);

    let versions = state.catalog.list_versions().await.unwrap();

    assert_eq!(versions, vec!["1.8.8", "1.20.6", "1.20.4", "1.19.4"]);
    assert_eq!(
        state.catalog.latest_version().await.unwrap().as_deref(),
        Some("1.8.8")
    );
}

#[tokio::test]
async fn catalog_error_status_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let state = state_for(&server);

    let err = state.catalog.list_versions().await.unwrap_err();

    assert!(matches!(err, SetupError::CatalogUnavailable { .. }));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn slow_catalog_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "versions": ["1.20.4"] }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    let mut config = CatalogConfig::with_api_root(format!("{}/v2", server.uri()));
    config.request_timeout = Duration::from_millis(200);
    let state = AppState::new(config).unwrap();

    let err = state.catalog.list_versions().await.unwrap_err();

    assert!(matches!(err, SetupError::CatalogUnavailable { .. }));
}

#[tokio::test]
async fn empty_build_list_is_no_builds_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/projects/paper/versions/1.20.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "builds": [] })))
        .mount(&server)
        .await;
    let state = state_for(&server);
    let dir = tempfile::tempdir().unwrap();

    let err = provision::provision(&state, &form_for(dir.path()))
        .await
        .unwrap_err();

    assert!(matches!(err, SetupError::NoBuildsFound(ref v) if v == "1.20.4"));
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn resolve_latest_picks_highest_build() {
    let server = MockServer::start().await;
    mount_catalog(&server, b"jar".to_vec()).await;
    let state = state_for(&server);

    let artifact = state.catalog.resolve_latest("1.20.4").await.unwrap();

    assert_eq!(artifact.build, 499);
    assert_eq!(artifact.file_name(), "paper-1.20.4-499.jar");
}

// ── End-to-end ──────────────────────────────────────────────────

#[tokio::test]
async fn provisions_complete_installation() {
    let server = MockServer::start().await;
    let jar: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    mount_catalog(&server, jar.clone()).await;
    let state = state_for(&server);
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    let request = ProvisioningRequest::from_form(&form_for(root))
        .unwrap()
        .with_script(LaunchScript::Batch);
    let install = provision::provision_request(&state, &request).await.unwrap();

    assert_eq!(install.artifact_name(), "paper-1.20.4-499.jar");
    assert_eq!(std::fs::read(root.join("paper-1.20.4-499.jar")).unwrap(), jar);
    assert!(!root.join("paper-1.20.4-499.jar.part").exists());
    assert_eq!(std::fs::read_to_string(root.join("eula.txt")).unwrap(), "eula=true\n");

    let props = std::fs::read_to_string(root.join("server.properties")).unwrap();
    let parsed = ServerProperties::parse(&props);
    assert_eq!(parsed.len(), 9);
    assert_eq!(parsed.get("motd"), Some("Minecraft Server (1.20.4)"));
    assert_eq!(parsed.get("difficulty"), Some("2"));
    assert_eq!(parsed, install.properties);

    let script = std::fs::read_to_string(root.join("start.bat")).unwrap();
    assert_eq!(
        script,
        "@echo off\njava -Xmx2048M -Xms2048M -jar paper-1.20.4-499.jar nogui\npause\n"
    );
    assert!(root.join("plugins").is_dir());
    assert!(root.join("world").is_dir());
}

#[tokio::test]
async fn invalid_fields_fall_back_to_defaults() {
    let server = MockServer::start().await;
    mount_catalog(&server, b"jar".to_vec()).await;
    let state = state_for(&server);
    let dir = tempfile::tempdir().unwrap();
    let form = SetupForm {
        ram_mb: "two gigs".into(),
        port: "port".into(),
        gamemode: "hardcore".into(),
        difficulty: "impossible".into(),
        level_type: "caves".into(),
        ..form_for(dir.path())
    };

    let request = ProvisioningRequest::from_form(&form)
        .unwrap()
        .with_script(LaunchScript::Batch);
    provision::provision_request(&state, &request).await.unwrap();

    let script = std::fs::read_to_string(dir.path().join("start.bat")).unwrap();
    assert!(script.contains("-Xmx2048M -Xms2048M"));
    let props =
        ServerProperties::parse(&std::fs::read_to_string(dir.path().join("server.properties")).unwrap());
    assert_eq!(props.get("server-port"), Some("25565"));
    assert_eq!(props.get("gamemode"), Some("survival"));
    assert_eq!(props.get("difficulty"), Some("2"));
    assert_eq!(props.get("level-type"), Some("default"));
}

#[tokio::test]
async fn empty_version_aborts_before_any_side_effect() {
    let server = MockServer::start().await;
    mount_catalog(&server, b"jar".to_vec()).await;
    let state = state_for(&server);
    let dir = tempfile::tempdir().unwrap();
    let form = SetupForm {
        version: "".into(),
        ..form_for(dir.path())
    };

    let err = provision::provision(&state, &form).await.unwrap_err();

    assert!(matches!(
        err,
        SetupError::ValidationFailed(ValidationIssue::MissingVersion)
    ));
    assert_eq!(request_count(&server).await, 0);
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn unaccepted_eula_aborts_before_network() {
    let server = MockServer::start().await;
    mount_catalog(&server, b"jar".to_vec()).await;
    let state = state_for(&server);
    let dir = tempfile::tempdir().unwrap();
    let form = SetupForm {
        eula_accepted: false,
        ..form_for(dir.path())
    };

    let err = provision::provision(&state, &form).await.unwrap_err();

    assert!(matches!(
        err,
        SetupError::ValidationFailed(ValidationIssue::EulaNotAccepted)
    ));
    assert_eq!(request_count(&server).await, 0);
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn missing_directory_aborts_before_network() {
    let server = MockServer::start().await;
    mount_catalog(&server, b"jar".to_vec()).await;
    let state = state_for(&server);
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let err = provision::provision(&state, &form_for(&missing))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SetupError::ValidationFailed(ValidationIssue::DirectoryNotFound(_))
    ));
    assert_eq!(request_count(&server).await, 0);
    assert!(!missing.exists());
}

#[tokio::test]
async fn failed_download_leaves_no_partial_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/projects/paper/versions/1.20.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "builds": [499] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(JAR_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let state = state_for(&server);
    let dir = tempfile::tempdir().unwrap();

    let err = provision::provision(&state, &form_for(dir.path()))
        .await
        .unwrap_err();

    assert!(matches!(err, SetupError::DownloadFailed { .. }));
    assert!(!dir.path().join("paper-1.20.4-499.jar").exists());
    assert!(!dir.path().join("paper-1.20.4-499.jar.part").exists());
    assert!(!dir.path().join("eula.txt").exists());
}

#[tokio::test]
async fn truncated_body_removes_partial_file() {
    let api_root = truncating_server(100_000, 20_000).await;
    let config = CatalogConfig::with_api_root(api_root);
    let downloader = Downloader::new(build_http_client().unwrap(), &config);
    let dir = tempfile::tempdir().unwrap();
    let artifact = ArtifactRef::new("paper", "1.20.4", 499, "jar");

    let err = downloader.download(&artifact, dir.path()).await.unwrap_err();

    assert!(matches!(err, SetupError::DownloadFailed { .. }));
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn truncated_body_keeps_previous_artifact() {
    let api_root = truncating_server(100_000, 20_000).await;
    let config = CatalogConfig::with_api_root(api_root);
    let downloader = Downloader::new(build_http_client().unwrap(), &config);
    let dir = tempfile::tempdir().unwrap();
    let jar = dir.path().join("paper-1.20.4-499.jar");
    std::fs::write(&jar, b"previous run").unwrap();

    let artifact = ArtifactRef::new("paper", "1.20.4", 499, "jar");
    downloader.download(&artifact, dir.path()).await.unwrap_err();

    assert_eq!(std::fs::read(&jar).unwrap(), b"previous run");
    assert!(!dir.path().join("paper-1.20.4-499.jar.part").exists());
}

#[tokio::test]
async fn version_with_path_characters_stays_in_its_segment() {
    let server = MockServer::start().await;
    mount_catalog(&server, b"jar".to_vec()).await;
    let state = state_for(&server);
    let dir = tempfile::tempdir().unwrap();
    let form = SetupForm {
        version: "1.20.4/../../../v1?x=1".into(),
        ..form_for(dir.path())
    };

    let err = provision::provision(&state, &form).await.unwrap_err();

    assert!(matches!(err, SetupError::CatalogUnavailable { .. }));
    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    assert!(requests[0]
        .url
        .path()
        .starts_with("/v2/projects/paper/versions/1.20.4%2F"));
    assert!(dir_is_empty(dir.path()));
}

#[tokio::test]
async fn rerun_replaces_existing_artifact() {
    let server = MockServer::start().await;
    mount_catalog(&server, b"fresh".to_vec()).await;
    let state = state_for(&server);
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("paper-1.20.4-499.jar"), b"stale contents").unwrap();

    provision::provision(&state, &form_for(dir.path())).await.unwrap();

    assert_eq!(
        std::fs::read(dir.path().join("paper-1.20.4-499.jar")).unwrap(),
        b"fresh"
    );
}
