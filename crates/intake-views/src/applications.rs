// SPDX-License-Identifier: Apache-2.0

use crate::ApplicationsView;
use intake_model::{ApplicationRow, Role, UserId, UserProfile};
use intake_store::{DocumentStore, StoreError, StoreErrorCode};
use tracing::{error, info};

pub const USERS_COLLECTION: &str = "Users";
pub const APPLICATIONS_SUBCOLLECTION: &str = "Applications";

/// Walks every user and flattens each nested application into one row
/// carrying the applicant's contact fields. Admin users are skipped and
/// their subcollections never read. Sparse profiles fall back per field,
/// so one incomplete user cannot sink the pass.
pub async fn collect_applications(
    store: &dyn DocumentStore,
) -> Result<Vec<ApplicationRow>, StoreError> {
    let users = store.read_collection(USERS_COLLECTION).await?;
    let mut rows = Vec::new();
    for user in users {
        if Role::from_field(user.fields.get("userRole")).is_admin() {
            continue;
        }
        let user_id = UserId::parse(&user.id)
            .map_err(|e| StoreError::new(StoreErrorCode::Validation, e.to_string()))?;
        let profile = UserProfile::from_fields(&user.fields);
        let path = format!(
            "{USERS_COLLECTION}/{}/{APPLICATIONS_SUBCOLLECTION}",
            user_id.as_str()
        );
        for application in store.read_collection(&path).await? {
            rows.push(ApplicationRow::flatten(
                user_id.clone(),
                &profile,
                application.fields,
            ));
        }
    }
    Ok(rows)
}

/// Runs one pass and publishes the result. On failure the previous snapshot
/// stays in place and the return value reports the pass as stale.
pub async fn refresh_applications(store: &dyn DocumentStore, view: &ApplicationsView) -> bool {
    match collect_applications(store).await {
        Ok(rows) => {
            info!(rows = rows.len(), "applications view refreshed");
            view.set(rows);
            true
        }
        Err(e) => {
            error!("applications pass failed, keeping previous snapshot: {e}");
            false
        }
    }
}
