// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use std::sync::Arc;
use tokio::sync::watch;

mod applications;
mod programs;

pub use applications::{
    collect_applications, refresh_applications, APPLICATIONS_SUBCOLLECTION, USERS_COLLECTION,
};
pub use programs::{collect_programs, refresh_programs, AggregateError, PROGRAMS_COLLECTION};

pub const CRATE_NAME: &str = "intake-views";

/// One published pass. `version` counts publishes since startup, starting
/// at zero for the empty snapshot a view is born with.
#[derive(Debug)]
pub struct Snapshot<T> {
    pub version: u64,
    pub rows: Arc<Vec<T>>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            version: 0,
            rows: Arc::new(Vec::new()),
        }
    }
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<T> Snapshot<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Shared slot the aggregation passes publish into. Readers always observe a
/// complete pass; `set` replaces the whole row set in one step and never
/// exposes a half-written state.
pub struct ViewStore<T> {
    tx: watch::Sender<Snapshot<T>>,
}

impl<T> Default for ViewStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewStore<T> {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Snapshot::default());
        Self { tx }
    }

    pub fn set(&self, rows: Vec<T>) {
        self.tx.send_modify(|snapshot| {
            snapshot.version += 1;
            snapshot.rows = Arc::new(rows);
        });
    }

    #[must_use]
    pub fn get(&self) -> Snapshot<T> {
        self.tx.borrow().clone()
    }

    /// Fresh receiver positioned at the current snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.tx.subscribe()
    }
}

pub type ApplicationsView = ViewStore<intake_model::ApplicationRow>;
pub type ProgramsView = ViewStore<intake_model::ProgramRow>;
