// SPDX-License-Identifier: Apache-2.0

use crate::FieldMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// A `{value, label}` pair as consumed by the dashboard's filter widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgramOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramStatus {
    Backlog,
    Todo,
    InProgress,
    Done,
    Canceled,
}

impl ProgramStatus {
    pub const ALL: [Self; 5] = [
        Self::Backlog,
        Self::Todo,
        Self::InProgress,
        Self::Done,
        Self::Canceled,
    ];

    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Todo => "todo",
            Self::InProgress => "in progress",
            Self::Done => "done",
            Self::Canceled => "canceled",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::Todo => "Todo",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
            Self::Canceled => "Canceled",
        }
    }

    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.value().eq_ignore_ascii_case(input))
    }

    #[must_use]
    pub fn options() -> Vec<ProgramOption> {
        Self::ALL
            .iter()
            .map(|s| ProgramOption {
                value: s.value(),
                label: s.label(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramPriority {
    Low,
    Medium,
    High,
}

impl ProgramPriority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.value().eq_ignore_ascii_case(input))
    }

    #[must_use]
    pub fn options() -> Vec<ProgramOption> {
        Self::ALL
            .iter()
            .map(|p| ProgramOption {
                value: p.value(),
                label: p.label(),
            })
            .collect()
    }
}

/// Business category a program is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramLabel {
    BusinessDevelopment,
    SupplyChainIntegration,
    ManufacturingSupport,
    FashionIndustry,
    Agriculture,
    TrainingSkills,
    InnovationTechnology,
    FundingSupport,
    YouthWomenEmpowerment,
    StartupEcosystem,
}

impl ProgramLabel {
    pub const ALL: [Self; 10] = [
        Self::BusinessDevelopment,
        Self::SupplyChainIntegration,
        Self::ManufacturingSupport,
        Self::FashionIndustry,
        Self::Agriculture,
        Self::TrainingSkills,
        Self::InnovationTechnology,
        Self::FundingSupport,
        Self::YouthWomenEmpowerment,
        Self::StartupEcosystem,
    ];

    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::BusinessDevelopment => "business development",
            Self::SupplyChainIntegration => "supply chain integration",
            Self::ManufacturingSupport => "manufacturing support",
            Self::FashionIndustry => "fashion industry",
            Self::Agriculture => "agriculture",
            Self::TrainingSkills => "training & skills",
            Self::InnovationTechnology => "innovation & technology",
            Self::FundingSupport => "funding support",
            Self::YouthWomenEmpowerment => "youth & women empowerment",
            Self::StartupEcosystem => "startup ecosystem",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BusinessDevelopment => "Business Development",
            Self::SupplyChainIntegration => "Supply Chain Integration",
            Self::ManufacturingSupport => "Manufacturing Support",
            Self::FashionIndustry => "Fashion Industry",
            Self::Agriculture => "Agriculture",
            Self::TrainingSkills => "Training & Skills",
            Self::InnovationTechnology => "Innovation & Technology",
            Self::FundingSupport => "Funding Support",
            Self::YouthWomenEmpowerment => "Youth & Women Empowerment",
            Self::StartupEcosystem => "Startup Ecosystem",
        }
    }

    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.value().eq_ignore_ascii_case(input))
    }

    #[must_use]
    pub fn options() -> Vec<ProgramOption> {
        Self::ALL
            .iter()
            .map(|l| ProgramOption {
                value: l.value(),
                label: l.label(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RowError {
    MissingField { doc: String, field: &'static str },
    NotText { doc: String, field: &'static str },
}

impl Display for RowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { doc, field } => {
                write!(f, "program {doc} is missing required field {field}")
            }
            Self::NotText { doc, field } => {
                write!(f, "program {doc} field {field} is not text")
            }
        }
    }
}

impl std::error::Error for RowError {}

/// Normalized program record. `status`/`priority`/`label` are always the
/// lower-cased form of the stored values; the remaining fields pass through
/// as stored and are omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramRow {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub status: String,
    pub priority: String,
    pub label: String,
    #[serde(rename = "programID", default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Value>,
}

impl ProgramRow {
    /// Derives a row from one stored program document. An absent or non-text
    /// status/priority/label is fatal, the caller aborts the whole pass.
    pub fn from_fields(id: &str, fields: &FieldMap) -> Result<Self, RowError> {
        Ok(Self {
            id: id.to_string(),
            title: text_field(fields, "programName"),
            status: lowered(id, fields, "programStatus")?,
            priority: lowered(id, fields, "programPriority")?,
            label: lowered(id, fields, "programLabel")?,
            program_id: text_field(fields, "programID"),
            budget: fields.get("programBudget").cloned(),
        })
    }
}

fn text_field(fields: &FieldMap, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

fn lowered(doc: &str, fields: &FieldMap, field: &'static str) -> Result<String, RowError> {
    match fields.get(field) {
        Some(Value::String(s)) => Ok(s.to_lowercase()),
        Some(_) => Err(RowError::NotText {
            doc: doc.to_string(),
            field,
        }),
        None => Err(RowError::MissingField {
            doc: doc.to_string(),
            field,
        }),
    }
}
