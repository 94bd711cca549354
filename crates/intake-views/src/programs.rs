// SPDX-License-Identifier: Apache-2.0

use crate::ProgramsView;
use intake_model::{ProgramRow, RowError};
use intake_store::{DocumentStore, StoreError};
use std::fmt::{Display, Formatter};
use tracing::{error, info};

pub const PROGRAMS_COLLECTION: &str = "Programs";

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AggregateError {
    Store(StoreError),
    Row(RowError),
}

impl Display for AggregateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(e) => write!(f, "{e}"),
            Self::Row(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AggregateError {}

impl From<StoreError> for AggregateError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<RowError> for AggregateError {
    fn from(err: RowError) -> Self {
        Self::Row(err)
    }
}

/// Normalizes every program document into a row with lower-cased status,
/// priority, and label. One document missing a required field aborts the
/// whole pass; there is no per-document fallback here.
pub async fn collect_programs(store: &dyn DocumentStore) -> Result<Vec<ProgramRow>, AggregateError> {
    let documents = store.read_collection(PROGRAMS_COLLECTION).await?;
    let mut rows = Vec::with_capacity(documents.len());
    for document in documents {
        rows.push(ProgramRow::from_fields(&document.id, &document.fields)?);
    }
    Ok(rows)
}

/// Runs one pass and publishes the result. On failure the previous snapshot
/// stays in place and the return value reports the pass as stale.
pub async fn refresh_programs(store: &dyn DocumentStore, view: &ProgramsView) -> bool {
    match collect_programs(store).await {
        Ok(rows) => {
            info!(rows = rows.len(), "programs view refreshed");
            view.set(rows);
            true
        }
        Err(e) => {
            error!("programs pass failed, keeping previous snapshot: {e}");
            false
        }
    }
}
