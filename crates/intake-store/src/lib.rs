// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use async_trait::async_trait;
use intake_model::FieldMap;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tokio::sync::watch;

mod fake;
mod http;

pub use fake::FakeStore;
pub use http::HttpStore;

pub const CRATE_NAME: &str = "intake-store";

/// One record fetched from the backend, keyed by its document id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub fields: FieldMap,
}

impl Document {
    #[must_use]
    pub fn new(id: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub token: String,
}

/// Where an uploaded blob landed and the URL it can be fetched back from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRef {
    pub path: String,
    pub download_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    NotFound,
    Unauthorized,
    Validation,
    Network,
    Internal,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Validation => "validation_error",
            Self::Network => "network_error",
            Self::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

/// Receiver half of the auth feed; holds the current session, `None` when
/// signed out.
pub type AuthWatch = watch::Receiver<Option<Session>>;

#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    fn backend_tag(&self) -> &'static str {
        "unknown"
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, StoreError>;
    async fn create_account(&self, credentials: &Credentials) -> Result<Session, StoreError>;
    async fn sign_out(&self) -> Result<(), StoreError>;

    /// Every call returns a fresh receiver positioned at the current state.
    fn subscribe_auth(&self) -> AuthWatch;

    async fn read_collection(&self, path: &str) -> Result<Vec<Document>, StoreError>;

    /// `Ok(None)` when the path resolves to no record.
    async fn read_document(&self, path: &str) -> Result<Option<Document>, StoreError>;

    /// Appends a document under `collection` with a backend-chosen id.
    async fn create_document(
        &self,
        collection: &str,
        fields: FieldMap,
    ) -> Result<String, StoreError>;

    /// Merges `fields` into the document at `path`, creating it when absent.
    async fn update_document(&self, path: &str, fields: FieldMap) -> Result<(), StoreError>;

    async fn upload_file(&self, path: &str, bytes: Vec<u8>) -> Result<StorageRef, StoreError>;
}
