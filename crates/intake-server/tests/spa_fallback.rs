// SPDX-License-Identifier: Apache-2.0

use std::net::SocketAddr;
use std::sync::Arc;

use intake_server::{build_router, AppState, FakeStore, ServerConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn dashboard_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("index.html"),
        "<!doctype html><div id=\"app\">intake dashboard</div>",
    )
    .expect("write index");
    std::fs::write(dir.path().join("app.css"), "body { margin: 0 }").expect("write asset");
    dir
}

async fn serve(config: &ServerConfig) -> SocketAddr {
    let state = AppState::new(Arc::new(FakeStore::default()));
    let app = build_router(state, config);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

async fn send_raw(addr: SocketAddr, path: &str) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let req = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head.to_string(), body.to_string())
}

#[tokio::test]
async fn build_output_is_served_directly() {
    let dir = dashboard_dir();
    let config = ServerConfig {
        static_dir: dir.path().to_path_buf(),
        ..ServerConfig::default()
    };
    let addr = serve(&config).await;

    let (status, head, body) = send_raw(addr, "/app.css").await;
    assert_eq!(status, 200);
    assert!(head.to_ascii_lowercase().contains("text/css"));
    assert!(body.contains("margin"));

    let (status, _, body) = send_raw(addr, "/").await;
    assert_eq!(status, 200);
    assert!(body.contains("intake dashboard"));
}

#[tokio::test]
async fn unknown_paths_return_the_entry_document_with_200() {
    let dir = dashboard_dir();
    let config = ServerConfig {
        static_dir: dir.path().to_path_buf(),
        ..ServerConfig::default()
    };
    let addr = serve(&config).await;

    let (status, head, body) = send_raw(addr, "/programs/edit/42").await;
    assert_eq!(status, 200);
    assert!(head.to_ascii_lowercase().contains("text/html"));
    assert!(body.contains("intake dashboard"));

    // Deep asset-looking paths fall back too rather than 404ing.
    let (status, _, body) = send_raw(addr, "/missing/bundle.js").await;
    assert_eq!(status, 200);
    assert!(body.contains("intake dashboard"));
}

#[tokio::test]
async fn api_routes_shadow_the_static_tree() {
    let dir = dashboard_dir();
    std::fs::write(dir.path().join("healthz"), "a file, not the route").expect("write file");
    let config = ServerConfig {
        static_dir: dir.path().to_path_buf(),
        ..ServerConfig::default()
    };
    let addr = serve(&config).await;

    let (status, _, body) = send_raw(addr, "/healthz").await;
    assert_eq!(status, 200);
    assert_eq!(body, "ok");
}
