// SPDX-License-Identifier: Apache-2.0

use std::net::SocketAddr;
use std::sync::Arc;

use intake_server::{build_router, AppState, FakeStore, ServerConfig};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn serve() -> SocketAddr {
    let state = AppState::new(Arc::new(FakeStore::default()));
    let app = build_router(state, &ServerConfig::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

async fn get_settings(addr: SocketAddr) -> (u16, Value) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let req = format!("GET /v1/settings HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    read_response(stream).await
}

async fn post_settings(addr: SocketAddr, payload: &str) -> (u16, Value) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let req = format!(
        "POST /v1/settings HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\
         Content-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{payload}",
        payload.len()
    );
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    read_response(stream).await
}

async fn read_response(mut stream: tokio::net::TcpStream) -> (u16, Value) {
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
    let json: Value = serde_json::from_str(body).expect("json body");
    (status, json)
}

#[tokio::test]
async fn settings_prefill_matches_the_documented_defaults() {
    let addr = serve().await;

    let (status, prefill) = get_settings(addr).await;
    assert_eq!(status, 200);
    assert_eq!(prefill["form"]["username"], json!(""));
    assert_eq!(prefill["form"]["email"], json!(""));
    assert_eq!(prefill["form"]["bio"], json!("I own a computer."));
    assert_eq!(
        prefill["form"]["urls"],
        json!(["https://shadcn.com", "https://twitter.com/shadcn"])
    );
    assert_eq!(prefill["form"]["errors"], json!({}));
}

#[tokio::test]
async fn valid_submission_round_trips_with_split_urls() {
    let addr = serve().await;

    let payload = "username=janedoe&email=jane%40example.com&bio=Building%20farm%20tooling.\
                   &urls=https%3A%2F%2Fjane.dev%2Chttps%3A%2F%2Fgithub.com%2Fjanedoe";
    let (status, saved) = post_settings(addr, payload).await;
    assert_eq!(status, 200);
    assert_eq!(saved["form"]["username"], json!("janedoe"));
    assert_eq!(saved["form"]["email"], json!("jane@example.com"));
    assert_eq!(saved["form"]["bio"], json!("Building farm tooling."));
    assert_eq!(
        saved["form"]["urls"],
        json!(["https://jane.dev", "https://github.com/janedoe"])
    );
    assert_eq!(saved["form"]["errors"], json!({}));
}

#[tokio::test]
async fn invalid_submission_echoes_raw_values_and_field_errors() {
    let addr = serve().await;

    let payload = "username=j&email=not-an-email&bio=hm&urls=%2Frelative%2Calso%20bad";
    let (status, rejected) = post_settings(addr, payload).await;
    assert_eq!(status, 400);

    // Raw values come back untouched, urls still comma-joined.
    assert_eq!(rejected["form"]["username"], json!("j"));
    assert_eq!(rejected["form"]["email"], json!("not-an-email"));
    assert_eq!(rejected["form"]["urls"], json!("/relative,also bad"));

    let errors = rejected["form"]["errors"]
        .as_object()
        .expect("errors map");
    let keys: Vec<&str> = errors.keys().map(String::as_str).collect();
    assert_eq!(keys, ["bio", "email", "urls", "username"]);
    assert_eq!(
        errors["username"][0],
        json!("Username must be at least 2 characters.")
    );
    assert_eq!(errors["email"][0], json!("Please enter a valid email"));
    assert_eq!(errors["bio"][0], json!("Bio must be at least 4 characters."));
    // Both joined entries were bad urls.
    assert_eq!(errors["urls"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn absent_urls_default_to_an_empty_list() {
    let addr = serve().await;

    let payload = "username=janedoe&email=jane%40example.com&bio=Long%20enough%20bio.";
    let (status, saved) = post_settings(addr, payload).await;
    assert_eq!(status, 200);
    assert_eq!(saved["form"]["urls"], json!([]));
}

#[tokio::test]
async fn present_but_empty_urls_string_is_one_invalid_entry() {
    let addr = serve().await;

    let payload = "username=janedoe&email=jane%40example.com&bio=Long%20enough%20bio.&urls=";
    let (status, rejected) = post_settings(addr, payload).await;
    assert_eq!(status, 400);
    assert_eq!(rejected["form"]["urls"], json!(""));
    assert_eq!(rejected["form"]["errors"]["urls"][0], json!("Invalid url"));
}
