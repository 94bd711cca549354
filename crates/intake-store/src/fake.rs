// SPDX-License-Identifier: Apache-2.0

use crate::{
    AuthWatch, Credentials, Document, DocumentStore, Session, StorageRef, StoreError,
    StoreErrorCode,
};
use async_trait::async_trait;
use intake_model::FieldMap;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{watch, Mutex};

/// In-memory backend double. Reads can be made to fail per path or after a
/// fixed budget so callers can exercise their failure handling.
pub struct FakeStore {
    pub collections: Mutex<BTreeMap<String, Vec<Document>>>,
    pub accounts: Mutex<BTreeMap<String, String>>,
    pub uploads: Mutex<BTreeMap<String, Vec<u8>>>,
    pub fail_paths: Mutex<BTreeSet<String>>,
    pub read_budget: Mutex<Option<u64>>,
    pub read_calls: AtomicU64,
    next_id: AtomicU64,
    auth_tx: watch::Sender<Option<Session>>,
}

impl Default for FakeStore {
    fn default() -> Self {
        let (auth_tx, _) = watch::channel(None);
        Self {
            collections: Mutex::new(BTreeMap::new()),
            accounts: Mutex::new(BTreeMap::new()),
            uploads: Mutex::new(BTreeMap::new()),
            fail_paths: Mutex::new(BTreeSet::new()),
            read_budget: Mutex::new(None),
            read_calls: AtomicU64::new(0),
            next_id: AtomicU64::new(1),
            auth_tx,
        }
    }
}

impl FakeStore {
    pub async fn insert(&self, collection: &str, id: &str, fields: FieldMap) {
        self.collections
            .lock()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(Document::new(id, fields));
    }

    pub async fn register_account(&self, email: &str, password: &str) {
        self.accounts
            .lock()
            .await
            .insert(email.to_string(), password.to_string());
    }

    /// Makes every read against `path` fail with a network error.
    pub async fn fail_path(&self, path: &str) {
        self.fail_paths.lock().await.insert(path.to_string());
    }

    /// Allows `budget` more successful reads, then fails the rest.
    pub async fn limit_reads(&self, budget: u64) {
        *self.read_budget.lock().await = Some(budget);
    }

    async fn charge_read(&self, path: &str) -> Result<(), StoreError> {
        self.read_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_paths.lock().await.contains(path) {
            return Err(StoreError::new(
                StoreErrorCode::Network,
                format!("injected read failure for {path}"),
            ));
        }
        let mut budget = self.read_budget.lock().await;
        if let Some(remaining) = budget.as_mut() {
            if *remaining == 0 {
                return Err(StoreError::new(
                    StoreErrorCode::Network,
                    "read budget exhausted",
                ));
            }
            *remaining -= 1;
        }
        Ok(())
    }

    fn session_for(email: &str) -> Session {
        Session {
            uid: format!("uid-{email}"),
            email: email.to_string(),
            token: "fake-token".to_string(),
        }
    }
}

fn split_document_path(path: &str) -> Result<(&str, &str), StoreError> {
    match path.rsplit_once('/') {
        Some((collection, id)) if !collection.is_empty() && !id.is_empty() => Ok((collection, id)),
        _ => Err(StoreError::new(
            StoreErrorCode::Validation,
            format!("document path needs a collection and an id: {path}"),
        )),
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    fn backend_tag(&self) -> &'static str {
        "fake"
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, StoreError> {
        let accounts = self.accounts.lock().await;
        match accounts.get(&credentials.email) {
            Some(password) if *password == credentials.password => {
                let session = Self::session_for(&credentials.email);
                self.auth_tx.send_replace(Some(session.clone()));
                Ok(session)
            }
            _ => Err(StoreError::new(
                StoreErrorCode::Unauthorized,
                "invalid credentials",
            )),
        }
    }

    async fn create_account(&self, credentials: &Credentials) -> Result<Session, StoreError> {
        let mut accounts = self.accounts.lock().await;
        if accounts.contains_key(&credentials.email) {
            return Err(StoreError::new(
                StoreErrorCode::Validation,
                format!("account already exists for {}", credentials.email),
            ));
        }
        accounts.insert(credentials.email.clone(), credentials.password.clone());
        let session = Self::session_for(&credentials.email);
        self.auth_tx.send_replace(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        self.auth_tx.send_replace(None);
        Ok(())
    }

    fn subscribe_auth(&self) -> AuthWatch {
        self.auth_tx.subscribe()
    }

    async fn read_collection(&self, path: &str) -> Result<Vec<Document>, StoreError> {
        self.charge_read(path).await?;
        Ok(self
            .collections
            .lock()
            .await
            .get(path)
            .cloned()
            .unwrap_or_default())
    }

    async fn read_document(&self, path: &str) -> Result<Option<Document>, StoreError> {
        self.charge_read(path).await?;
        let (collection, id) = split_document_path(path)?;
        Ok(self
            .collections
            .lock()
            .await
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned()))
    }

    async fn create_document(
        &self,
        collection: &str,
        fields: FieldMap,
    ) -> Result<String, StoreError> {
        let id = format!("doc-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        self.collections
            .lock()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(Document::new(id.clone(), fields));
        Ok(id)
    }

    async fn update_document(&self, path: &str, fields: FieldMap) -> Result<(), StoreError> {
        let (collection, id) = split_document_path(path)?;
        let mut collections = self.collections.lock().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if let Some(index) = docs.iter().position(|d| d.id == id) {
            docs[index].fields.extend(fields);
        } else {
            docs.push(Document::new(id, fields));
        }
        Ok(())
    }

    async fn upload_file(&self, path: &str, bytes: Vec<u8>) -> Result<StorageRef, StoreError> {
        self.uploads.lock().await.insert(path.to_string(), bytes);
        Ok(StorageRef {
            path: path.to_string(),
            download_url: format!("fake://storage/{path}"),
        })
    }
}
