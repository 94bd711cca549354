// SPDX-License-Identifier: Apache-2.0

//! Intake domain model SSOT: users, applications, programs, and the settings
//! form validator. Pure types, no I/O.

#![forbid(unsafe_code)]

mod application;
mod profile;
mod program;
mod user;

pub use application::ApplicationRow;
pub use profile::{
    validate_profile, FieldErrors, ProfileForm, ProfileInput, BIO_MAX_LEN, BIO_MIN_LEN,
    USERNAME_MAX_LEN, USERNAME_MIN_LEN,
};
pub use program::{
    ProgramLabel, ProgramOption, ProgramPriority, ProgramRow, ProgramStatus, RowError,
};
pub use user::{
    ParseError, Role, UserId, UserProfile, FALLBACK_ADDRESS, FALLBACK_CITY, FALLBACK_EMAIL,
    FALLBACK_NAME, FALLBACK_PHONE, FALLBACK_PROVINCE,
};

pub const CRATE_NAME: &str = "intake-model";

/// Stored document fields: JSON values keyed by field name, in deterministic
/// key order.
pub type FieldMap = std::collections::BTreeMap<String, serde_json::Value>;
