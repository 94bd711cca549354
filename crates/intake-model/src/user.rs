// SPDX-License-Identifier: Apache-2.0

use crate::FieldMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

pub const USER_ID_MAX_LEN: usize = 128;

pub const FALLBACK_NAME: &str = "Unknown User";
pub const FALLBACK_EMAIL: &str = "No Email";
pub const FALLBACK_PHONE: &str = "No Phone";
pub const FALLBACK_ADDRESS: &str = "No Address";
pub const FALLBACK_CITY: &str = "No City";
pub const FALLBACK_PROVINCE: &str = "No Province";

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    Trimmed(&'static str),
    TooLong(&'static str, usize),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::Trimmed(name) => {
                write!(f, "{name} must not contain leading/trailing whitespace")
            }
            Self::TooLong(name, max) => write!(f, "{name} exceeds max length {max}"),
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct UserId(String);

impl UserId {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("user_id"));
        }
        if input.trim() != input {
            return Err(ParseError::Trimmed("user_id"));
        }
        if input.len() > USER_ID_MAX_LEN {
            return Err(ParseError::TooLong("user_id", USER_ID_MAX_LEN));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stored user role. Only the exact marker `"admin"` counts as admin; any
/// other value, including absent or non-text, is an applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Applicant,
}

impl Role {
    #[must_use]
    pub fn from_field(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("admin") => Self::Admin,
            _ => Self::Applicant,
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Contact fields of one user document after fallback substitution. Absent,
/// non-text, and empty-string fields all fall back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub province: String,
}

impl UserProfile {
    #[must_use]
    pub fn from_fields(fields: &FieldMap) -> Self {
        Self {
            name: text_or(fields, "userFullName", FALLBACK_NAME),
            email: text_or(fields, "userEmail", FALLBACK_EMAIL),
            phone: text_or(fields, "phone", FALLBACK_PHONE),
            address: text_or(fields, "address", FALLBACK_ADDRESS),
            city: text_or(fields, "city", FALLBACK_CITY),
            province: text_or(fields, "province", FALLBACK_PROVINCE),
        }
    }
}

fn text_or(fields: &FieldMap, key: &str, fallback: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
