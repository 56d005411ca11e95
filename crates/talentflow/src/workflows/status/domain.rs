use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Status that triggers the assessment dispatch side effect on the
/// backend when an applicant is moved into it.
pub const APTITUDE_TEST_STATUS: &str = "APTITUDE_TEST";

/// Terminal status requiring a blacklist category and reason.
pub const BLACKLIST_STATUS: &str = "BLACKLIST";

/// Identifier wrapper for applicants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicantId(pub String);

/// Identifier for one applicant's run through the pipeline. An
/// applicant may accumulate several progressions over time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgressId(pub String);

/// Identifier of the acting user recorded on transitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for status history records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryId(pub String);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ProgressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for HistoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cached applicant row as the workflow sees it; refreshed after each
/// mutating call, so possibly stale between refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantSnapshot {
    pub applicant_id: ApplicantId,
    pub progress_id: ProgressId,
    pub name: String,
    pub status: String,
}

const NOT_APPLICABLE: &str = "N/A";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
const DATE_FORMAT_WITH_SECONDS: &str = "%Y-%m-%d %H:%M:%S";

/// Effective date of a transition, or the sentinel meaning the date is
/// unknown or not meaningful for this transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDate {
    At(NaiveDateTime),
    NotApplicable,
}

impl ChangeDate {
    pub fn is_applicable(&self) -> bool {
        matches!(self, ChangeDate::At(_))
    }

    /// Wire and display form. The sentinel renders literally as `N/A`;
    /// no date formatting is attempted for it.
    pub fn display(&self) -> String {
        match self {
            ChangeDate::At(at) => at.format(DATE_FORMAT).to_string(),
            ChangeDate::NotApplicable => NOT_APPLICABLE.to_string(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ChangeDateError> {
        let trimmed = raw.trim();
        if trimmed == NOT_APPLICABLE {
            return Ok(ChangeDate::NotApplicable);
        }

        NaiveDateTime::parse_from_str(trimmed, DATE_FORMAT_WITH_SECONDS)
            .or_else(|_| NaiveDateTime::parse_from_str(trimmed, DATE_FORMAT))
            .map(ChangeDate::At)
            .map_err(|_| ChangeDateError::Unparseable(raw.to_string()))
    }
}

impl fmt::Display for ChangeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Serialize for ChangeDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.display())
    }
}

impl<'de> Deserialize<'de> for ChangeDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        ChangeDate::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChangeDateError {
    #[error("'{0}' is neither 'N/A' nor a 'YYYY-MM-DD HH:MM' timestamp")]
    Unparseable(String),
}

/// Category recorded on blacklist transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlacklistedType {
    Temporary,
    Permanent,
}

impl BlacklistedType {
    pub const fn label(self) -> &'static str {
        match self {
            BlacklistedType::Temporary => "temporary",
            BlacklistedType::Permanent => "permanent",
        }
    }
}

/// Fixed reason list for blacklist transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlacklistReason {
    InterviewNoShow,
    WithdrewAfterAcceptance,
    FalsifiedCredentials,
    MisconductDuringProcess,
    Other,
}

impl BlacklistReason {
    pub const fn label(self) -> &'static str {
        match self {
            BlacklistReason::InterviewNoShow => "interview no-show",
            BlacklistReason::WithdrewAfterAcceptance => "withdrew after acceptance",
            BlacklistReason::FalsifiedCredentials => "falsified credentials",
            BlacklistReason::MisconductDuringProcess => "misconduct during process",
            BlacklistReason::Other => "other",
        }
    }
}

/// One historical transition. A null `previous_status` marks the
/// initial record of a progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeRecord {
    pub id: HistoryId,
    pub progress_id: ProgressId,
    #[serde(default)]
    pub previous_status: Option<String>,
    pub new_status: String,
    pub changed_at: ChangeDate,
    pub changed_by: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blacklisted_type: Option<BlacklistedType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<BlacklistReason>,
    #[serde(default)]
    pub edited: bool,
    #[serde(default)]
    pub deleted: bool,
}

/// Body of `PUT /applicant/update/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeRequest {
    pub progress_id: ProgressId,
    pub applicant_id: ApplicantId,
    pub status: String,
    pub user_id: UserId,
    pub change_date: ChangeDate,
    #[serde(default)]
    pub previous_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blacklisted_type: Option<BlacklistedType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<BlacklistReason>,
}

/// Body of `PUT /applicant/status-history/:history_id`: a metadata
/// correction or soft delete, never a new transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEdit {
    pub status: String,
    pub edited: bool,
    pub deleted: bool,
    pub changed_by: UserId,
    pub changed_at: ChangeDate,
}
