// SPDX-License-Identifier: Apache-2.0

use crate::user::{UserId, UserProfile};
use crate::FieldMap;
use serde::{Deserialize, Serialize};

/// Keys the flattened row claims for itself. On collision the user-derived
/// value wins over the application's own field.
const RESERVED_KEYS: [&str; 7] = [
    "userID", "name", "email", "phone", "address", "city", "province",
];

/// One application merged with its owning user's contact fields. Derived and
/// ephemeral, recomputed on every aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRow {
    #[serde(rename = "userID")]
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub province: String,
    #[serde(flatten)]
    pub fields: FieldMap,
}

impl ApplicationRow {
    #[must_use]
    pub fn flatten(user_id: UserId, user: &UserProfile, mut fields: FieldMap) -> Self {
        for key in RESERVED_KEYS {
            fields.remove(key);
        }
        Self {
            user_id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            city: user.city.clone(),
            province: user.province.clone(),
            fields,
        }
    }
}
