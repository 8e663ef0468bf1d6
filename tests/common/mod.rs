use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub const SEARCH_BODY: &str = r#"{"tracks":{"href":"https://api.spotify.com/v1/search?query=test&type=track","items":[{"album":{"name":"Tests","images":[{"url":"https://i.scdn.co/image/abc","height":640,"width":640}]},"artists":[{"name":"The Testers"}],"external_urls":{"spotify":"https://open.spotify.com/track/t1"},"id":"t1","name":"Test Song"}],"limit":10,"next":null,"offset":0,"previous":null,"total":1}}"#;

pub struct ServerGuard {
    pub base_url: String,
    _data_dir: tempfile::TempDir,
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Starts `resonance-server` with its identity and catalog endpoints pointed
/// at `upstream`.
pub async fn spawn_server(upstream: &MockServer) -> Result<ServerGuard> {
    let data_dir = tempfile::tempdir().context("create server tempdir")?;
    let addr_file = data_dir.path().join("addr.txt");

    let child = Command::new(env!("CARGO_BIN_EXE_resonance-server"))
        .args([
            "--addr",
            "127.0.0.1:0",
            "--addr-file",
            addr_file.to_str().unwrap(),
            "--accounts-url",
            &format!("{}/api/token", upstream.uri()),
            "--search-url",
            &format!("{}/v1/search", upstream.uri()),
            "--request-timeout-secs",
            "5",
        ])
        .env("SPOTIFY_CLIENT_ID", "test-client")
        .env("SPOTIFY_CLIENT_SECRET", "test-secret")
        .env_remove("RESONANCE_ADDR")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn resonance-server")?;

    let mut guard = ServerGuard {
        base_url: String::new(),
        _data_dir: data_dir,
        child,
    };
    guard.base_url = read_addr_file(&addr_file).await?;
    wait_for_healthz(&guard.base_url).await?;

    Ok(guard)
}

async fn read_addr_file(addr_file: &std::path::Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

pub async fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send().await {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }
    }
}

#[allow(dead_code)]
pub async fn mount_token(upstream: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "upstream-token",
            "token_type": "Bearer",
            "expires_in": 3600,
        })))
        .expect(expected_calls)
        .mount(upstream)
        .await;
}

#[allow(dead_code)]
pub async fn mount_search(upstream: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SEARCH_BODY, "application/json"))
        .expect(expected_calls)
        .mount(upstream)
        .await;
}
