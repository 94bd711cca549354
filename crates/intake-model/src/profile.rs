// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const USERNAME_MIN_LEN: usize = 2;
pub const USERNAME_MAX_LEN: usize = 30;
pub const BIO_MIN_LEN: usize = 4;
pub const BIO_MAX_LEN: usize = 160;

/// Constraint violations keyed by field name. Values are never empty.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Raw candidate record as it arrives from a form decode. Absent fields stay
/// `None`; `urls` defaults to an empty list during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub urls: Option<Vec<String>>,
}

/// Validated settings form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
    pub bio: String,
    #[serde(default)]
    pub urls: Vec<String>,
}

impl Default for ProfileForm {
    /// The prefill shown before the user has saved anything. Deliberately
    /// does not satisfy the validator.
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            bio: "I own a computer.".to_string(),
            urls: vec![
                "https://shadcn.com".to_string(),
                "https://twitter.com/shadcn".to_string(),
            ],
        }
    }
}

/// Validates a candidate record. Pure and total: always returns either the
/// normalized form or a non-empty error map, never panics.
pub fn validate_profile(input: &ProfileInput) -> Result<ProfileForm, FieldErrors> {
    let mut errors = FieldErrors::new();

    let username = input.username.clone().unwrap_or_default();
    let username_len = username.chars().count();
    if username_len < USERNAME_MIN_LEN {
        push_error(
            &mut errors,
            "username",
            "Username must be at least 2 characters.",
        );
    }
    if username_len > USERNAME_MAX_LEN {
        push_error(
            &mut errors,
            "username",
            "Username must not be longer than 30 characters",
        );
    }

    let email = input.email.clone().unwrap_or_default();
    if !is_valid_email(&email) {
        push_error(&mut errors, "email", "Please enter a valid email");
    }

    let bio = input.bio.clone().unwrap_or_default();
    let bio_len = bio.chars().count();
    if bio_len < BIO_MIN_LEN {
        push_error(&mut errors, "bio", "Bio must be at least 4 characters.");
    }
    if bio_len > BIO_MAX_LEN {
        push_error(
            &mut errors,
            "bio",
            "Bio must not be longer than 160 characters.",
        );
    }

    let urls = input.urls.clone().unwrap_or_default();
    for raw in &urls {
        if url::Url::parse(raw).is_err() {
            push_error(&mut errors, "urls", "Invalid url");
        }
    }

    if errors.is_empty() {
        Ok(ProfileForm {
            username,
            email,
            bio,
            urls,
        })
    } else {
        Err(errors)
    }
}

fn push_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

/// Standard address shape: one `@`, non-empty local part, dotted domain, no
/// whitespace.
fn is_valid_email(input: &str) -> bool {
    if input.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = input.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return false;
    }
    domain.contains('.')
}
