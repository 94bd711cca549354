// SPDX-License-Identifier: Apache-2.0

use crate::{
    AuthWatch, Credentials, Document, DocumentStore, Session, StorageRef, StoreError,
    StoreErrorCode,
};
use async_trait::async_trait;
use intake_model::FieldMap;
use serde::Deserialize;
use std::sync::Mutex;
use tokio::sync::watch;

/// Client for the document backend's HTTP surface. The session captured by
/// `authenticate` or `create_account` rides along as a bearer token on every
/// later request until `sign_out`.
pub struct HttpStore {
    base_url: String,
    client: reqwest::Client,
    session: Mutex<Option<Session>>,
    auth_tx: watch::Sender<Option<Session>>,
}

#[derive(Debug, Deserialize)]
struct CollectionBody {
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct CreatedBody {
    id: String,
}

impl HttpStore {
    #[must_use]
    pub fn new(base_url: String) -> Self {
        let (auth_tx, _) = watch::channel(None);
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            session: Mutex::new(None),
            auth_tx,
        }
    }

    fn resource_url(&self, resource: &str, path: &str) -> String {
        format!(
            "{}/v1/{resource}/{}",
            self.base_url,
            path.trim_start_matches('/')
        )
    }

    fn bearer(&self) -> Option<String> {
        self.session
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(|s| s.token.clone()))
    }

    fn store_session(&self, session: Option<Session>) {
        if let Ok(mut slot) = self.session.lock() {
            *slot = session.clone();
        }
        self.auth_tx.send_replace(session);
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.request(method, url);
        if let Some(token) = self.bearer() {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn sign(&self, action: &str, credentials: &Credentials) -> Result<Session, StoreError> {
        let url = format!("{}/v1/auth:{action}", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| StoreError::new(StoreErrorCode::Network, e.to_string()))?;
        let resp = check_status(resp)?;
        let session: Session = resp.json().await.map_err(|e| {
            StoreError::new(
                StoreErrorCode::Validation,
                format!("session parse failed: {e}"),
            )
        })?;
        self.store_session(Some(session.clone()));
        Ok(session)
    }
}

fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let code = match status.as_u16() {
        401 | 403 => StoreErrorCode::Unauthorized,
        404 => StoreErrorCode::NotFound,
        _ => StoreErrorCode::Network,
    };
    Err(StoreError::new(
        code,
        format!("request failed status={status} url={}", resp.url()),
    ))
}

#[async_trait]
impl DocumentStore for HttpStore {
    fn backend_tag(&self) -> &'static str {
        "http"
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, StoreError> {
        self.sign("signIn", credentials).await
    }

    async fn create_account(&self, credentials: &Credentials) -> Result<Session, StoreError> {
        self.sign("signUp", credentials).await
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        let url = format!("{}/v1/auth:signOut", self.base_url);
        let resp = self
            .request(reqwest::Method::POST, &url)
            .send()
            .await
            .map_err(|e| StoreError::new(StoreErrorCode::Network, e.to_string()))?;
        check_status(resp)?;
        self.store_session(None);
        Ok(())
    }

    fn subscribe_auth(&self) -> AuthWatch {
        self.auth_tx.subscribe()
    }

    async fn read_collection(&self, path: &str) -> Result<Vec<Document>, StoreError> {
        let url = self.resource_url("collections", path);
        let resp = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(|e| StoreError::new(StoreErrorCode::Network, e.to_string()))?;
        let resp = check_status(resp)?;
        let body: CollectionBody = resp.json().await.map_err(|e| {
            StoreError::new(
                StoreErrorCode::Validation,
                format!("collection parse failed: {e}"),
            )
        })?;
        Ok(body.documents)
    }

    async fn read_document(&self, path: &str) -> Result<Option<Document>, StoreError> {
        let url = self.resource_url("documents", path);
        let resp = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(|e| StoreError::new(StoreErrorCode::Network, e.to_string()))?;
        if resp.status().as_u16() == 404 {
            return Ok(None);
        }
        let resp = check_status(resp)?;
        let document: Document = resp.json().await.map_err(|e| {
            StoreError::new(
                StoreErrorCode::Validation,
                format!("document parse failed: {e}"),
            )
        })?;
        Ok(Some(document))
    }

    async fn create_document(
        &self,
        collection: &str,
        fields: FieldMap,
    ) -> Result<String, StoreError> {
        let url = self.resource_url("collections", collection);
        let resp = self
            .request(reqwest::Method::POST, &url)
            .json(&fields)
            .send()
            .await
            .map_err(|e| StoreError::new(StoreErrorCode::Network, e.to_string()))?;
        let resp = check_status(resp)?;
        let body: CreatedBody = resp.json().await.map_err(|e| {
            StoreError::new(
                StoreErrorCode::Validation,
                format!("create response parse failed: {e}"),
            )
        })?;
        Ok(body.id)
    }

    async fn update_document(&self, path: &str, fields: FieldMap) -> Result<(), StoreError> {
        let url = self.resource_url("documents", path);
        let resp = self
            .request(reqwest::Method::PATCH, &url)
            .json(&fields)
            .send()
            .await
            .map_err(|e| StoreError::new(StoreErrorCode::Network, e.to_string()))?;
        check_status(resp)?;
        Ok(())
    }

    async fn upload_file(&self, path: &str, bytes: Vec<u8>) -> Result<StorageRef, StoreError> {
        let url = self.resource_url("storage", path);
        let resp = self
            .request(reqwest::Method::POST, &url)
            .body(bytes)
            .send()
            .await
            .map_err(|e| StoreError::new(StoreErrorCode::Network, e.to_string()))?;
        let resp = check_status(resp)?;
        let storage: StorageRef = resp.json().await.map_err(|e| {
            StoreError::new(
                StoreErrorCode::Validation,
                format!("storage response parse failed: {e}"),
            )
        })?;
        Ok(storage)
    }
}
