// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use intake_server::{
    build_router, validate_startup_config_contract, AppState, FakeStore, HttpStore, ServerConfig,
    DEFAULT_PORT, DEFAULT_REFRESH_INTERVAL_MS, DEFAULT_STATIC_DIR,
};
use intake_store::{Credentials, DocumentStore};
use intake_views::{refresh_applications, refresh_programs};
use std::env;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn load_config() -> ServerConfig {
    ServerConfig {
        port: env_u16("PORT", DEFAULT_PORT),
        base_path: env::var("INTAKE_BASE_PATH").unwrap_or_default(),
        static_dir: PathBuf::from(
            env::var("INTAKE_STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string()),
        ),
        backend_url: env::var("INTAKE_BACKEND_URL")
            .ok()
            .filter(|v| !v.trim().is_empty()),
        backend_email: env::var("INTAKE_BACKEND_EMAIL").ok(),
        backend_password: env::var("INTAKE_BACKEND_PASSWORD").ok(),
        refresh_interval_ms: env_u64("INTAKE_REFRESH_INTERVAL_MS", DEFAULT_REFRESH_INTERVAL_MS),
        log_json: env_bool("INTAKE_LOG_JSON", false),
    }
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = load_config();
    init_tracing(config.log_json);
    validate_startup_config_contract(&config)?;

    let store: Arc<dyn DocumentStore> = match &config.backend_url {
        Some(url) => Arc::new(HttpStore::new(url.clone())),
        None => {
            info!("no backend url configured, starting with an empty in-memory store");
            Arc::new(FakeStore::default())
        }
    };
    info!("document store backend: {}", store.backend_tag());

    if let (Some(email), Some(password)) = (&config.backend_email, &config.backend_password) {
        let credentials = Credentials {
            email: email.clone(),
            password: password.clone(),
        };
        match store.authenticate(&credentials).await {
            Ok(session) => info!("signed in to backend as {}", session.email),
            Err(e) => error!("backend sign-in failed: {e}"),
        }
    }

    let state = AppState::new(store);
    let app = build_router(state.clone(), &config);

    // First passes may fail; the dashboard still serves, views start empty.
    refresh_applications(state.store.as_ref(), &state.applications).await;
    refresh_programs(state.store.as_ref(), &state.programs).await;
    state.ready.store(true, Ordering::Relaxed);

    if config.refresh_interval_ms > 0 {
        let bg = state.clone();
        let period = Duration::from_millis(config.refresh_interval_ms);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                refresh_applications(bg.store.as_ref(), &bg.applications).await;
                refresh_programs(bg.store.as_ref(), &bg.programs).await;
            }
        });
    }

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind failed on {bind_addr}: {e}"))?;
    info!("intake-server listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))
}
