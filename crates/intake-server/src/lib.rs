// SPDX-License-Identifier: Apache-2.0

//! HTTP layer for the intake dashboard: JSON endpoints over the aggregated
//! views, the profile settings form, and the built dashboard shell served
//! as a single-page app.

#![forbid(unsafe_code)]

pub mod config;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use intake_model::{
    validate_profile, ProfileForm, ProfileInput, ProgramLabel, ProgramPriority, ProgramStatus,
};
use intake_store::DocumentStore;
use intake_views::{
    refresh_applications, refresh_programs, ApplicationsView, ProgramsView, Snapshot,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::services::{ServeDir, ServeFile};

pub use config::{
    validate_startup_config_contract, ServerConfig, DEFAULT_PORT, DEFAULT_REFRESH_INTERVAL_MS,
    DEFAULT_STATIC_DIR,
};
pub use intake_store::{FakeStore, HttpStore};

pub const CRATE_NAME: &str = "intake-server";

/// Shared handles behind every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub applications: Arc<ApplicationsView>,
    pub programs: Arc<ProgramsView>,
    pub ready: Arc<AtomicBool>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            applications: Arc::new(ApplicationsView::new()),
            programs: Arc::new(ProgramsView::new()),
            ready: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Assembles the full router. API routes sit under the configured base path;
/// everything else falls through to the static dashboard, which answers any
/// unknown path with the entry document so client-side routing keeps working.
#[must_use]
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let base = config.base_path.as_str();
    let index = config.static_dir.join("index.html");
    let spa = ServeDir::new(&config.static_dir).fallback(ServeFile::new(index));
    Router::new()
        .route(&format!("{base}/healthz"), get(healthz_handler))
        .route(&format!("{base}/readyz"), get(readyz_handler))
        .route(&format!("{base}/v1/version"), get(version_handler))
        .route(
            &format!("{base}/v1/applications"),
            get(applications_handler),
        )
        .route(
            &format!("{base}/v1/applications/refresh"),
            post(refresh_applications_handler),
        )
        .route(&format!("{base}/v1/programs"), get(programs_handler))
        .route(
            &format!("{base}/v1/programs/refresh"),
            post(refresh_programs_handler),
        )
        .route(
            &format!("{base}/v1/programs/options"),
            get(program_options_handler),
        )
        .route(
            &format!("{base}/v1/settings"),
            get(settings_handler).post(submit_settings_handler),
        )
        .fallback_service(spa)
        .with_state(state)
}

async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn readyz_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.ready.load(Ordering::Relaxed) {
        (StatusCode::OK, "ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not-ready").into_response()
    }
}

async fn version_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "crate": CRATE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "backend": state.store.backend_tag(),
    }))
}

fn snapshot_body<T: serde::Serialize>(snapshot: &Snapshot<T>) -> Json<serde_json::Value> {
    Json(json!({
        "items": snapshot.rows.as_slice(),
        "stats": {
            "returned": snapshot.rows.len(),
            "version": snapshot.version,
        },
    }))
}

fn refresh_body(refreshed: bool, returned: usize) -> Json<serde_json::Value> {
    Json(json!({
        "status": if refreshed { "refreshed" } else { "stale" },
        "returned": returned,
    }))
}

async fn applications_handler(State(state): State<AppState>) -> impl IntoResponse {
    snapshot_body(&state.applications.get())
}

async fn refresh_applications_handler(State(state): State<AppState>) -> impl IntoResponse {
    let refreshed = refresh_applications(state.store.as_ref(), &state.applications).await;
    refresh_body(refreshed, state.applications.get().len())
}

async fn programs_handler(State(state): State<AppState>) -> impl IntoResponse {
    snapshot_body(&state.programs.get())
}

async fn refresh_programs_handler(State(state): State<AppState>) -> impl IntoResponse {
    let refreshed = refresh_programs(state.store.as_ref(), &state.programs).await;
    refresh_body(refreshed, state.programs.get().len())
}

async fn program_options_handler() -> impl IntoResponse {
    Json(json!({
        "statuses": ProgramStatus::options(),
        "priorities": ProgramPriority::options(),
        "labels": ProgramLabel::options(),
    }))
}

fn form_body(form: &ProfileForm) -> serde_json::Value {
    json!({
        "form": {
            "username": form.username,
            "email": form.email,
            "bio": form.bio,
            "urls": form.urls,
            "errors": {},
        }
    })
}

async fn settings_handler() -> impl IntoResponse {
    Json(form_body(&ProfileForm::default()))
}

/// Wire shape of a settings post. Every field is optional; the validator
/// supplies defaults and the per-field error messages.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettingsSubmission {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    /// Comma-joined list, the way the dashboard's tag widget posts it.
    pub urls: Option<String>,
}

async fn submit_settings_handler(Form(submission): Form<SettingsSubmission>) -> Response {
    let input = ProfileInput {
        username: submission.username.clone(),
        email: submission.email.clone(),
        bio: submission.bio.clone(),
        urls: submission
            .urls
            .as_deref()
            .map(|joined| joined.split(',').map(str::to_string).collect()),
    };
    match validate_profile(&input) {
        Ok(form) => Json(form_body(&form)).into_response(),
        Err(errors) => (
            StatusCode::BAD_REQUEST,
            // Echo the submission as it arrived so the client can re-render
            // the form, urls still comma-joined.
            Json(json!({
                "form": {
                    "username": submission.username.unwrap_or_default(),
                    "email": submission.email.unwrap_or_default(),
                    "bio": submission.bio.unwrap_or_default(),
                    "urls": submission.urls.unwrap_or_default(),
                    "errors": errors,
                }
            })),
        )
            .into_response(),
    }
}
