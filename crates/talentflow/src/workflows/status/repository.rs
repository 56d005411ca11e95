use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicantId, ApplicantSnapshot, HistoryEdit, HistoryId, ProgressId, StatusChangeRecord, UserId,
};

/// Storage abstraction so the service and router can be exercised in
/// isolation. History is returned newest-first, matching the wire
/// contract; clients reverse before rendering.
pub trait ProgressionStore: Send + Sync {
    fn applicant(&self, id: &ApplicantId) -> Result<Option<ApplicantSnapshot>, StoreError>;
    fn set_status(
        &self,
        progress_id: &ProgressId,
        applicant_id: &ApplicantId,
        status: &str,
    ) -> Result<(), StoreError>;
    fn append_record(&self, record: StatusChangeRecord) -> Result<StatusChangeRecord, StoreError>;
    fn history(&self, progress_id: &ProgressId) -> Result<Vec<StatusChangeRecord>, StoreError>;
    fn amend_record(
        &self,
        history_id: &HistoryId,
        edit: HistoryEdit,
    ) -> Result<StatusChangeRecord, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook fired when an applicant moves into the aptitude-test
/// status; the receiving system sends the actual assessment.
pub trait AssessmentDispatcher: Send + Sync {
    fn dispatch(&self, notice: AssessmentNotice) -> Result<(), DispatchError>;
}

/// Payload handed to the assessment transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentNotice {
    pub applicant_id: ApplicantId,
    pub progress_id: ProgressId,
    pub requested_by: UserId,
}

/// Assessment dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("assessment transport unavailable: {0}")]
    Transport(String),
}
