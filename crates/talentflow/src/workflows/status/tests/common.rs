use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;

use crate::workflows::status::catalog::StatusCatalog;
use crate::workflows::status::domain::{
    ApplicantId, ApplicantSnapshot, ChangeDate, HistoryEdit, HistoryId, ProgressId,
    StatusChangeRecord, UserId,
};
use crate::workflows::status::repository::{
    AssessmentDispatcher, AssessmentNotice, DispatchError, ProgressionStore, StoreError,
};
use crate::workflows::status::service::StatusChangeService;

pub(super) fn catalog() -> StatusCatalog {
    StatusCatalog::standard()
}

pub(super) fn recruiter() -> UserId {
    UserId("recruiter-7".to_string())
}

pub(super) fn applicant() -> ApplicantSnapshot {
    ApplicantSnapshot {
        applicant_id: ApplicantId("app-1001".to_string()),
        progress_id: ProgressId("prog-2001".to_string()),
        name: "Mori Sakura".to_string(),
        status: "UNPROCESSED".to_string(),
    }
}

pub(super) fn at(hour: u32, minute: u32) -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2025, 11, 4)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

pub(super) fn record(
    id: &str,
    previous: Option<&str>,
    new_status: &str,
    changed_at: ChangeDate,
) -> StatusChangeRecord {
    StatusChangeRecord {
        id: HistoryId(id.to_string()),
        progress_id: ProgressId("prog-2001".to_string()),
        previous_status: previous.map(str::to_string),
        new_status: new_status.to_string(),
        changed_at,
        changed_by: recruiter(),
        blacklisted_type: None,
        reason: None,
        edited: false,
        deleted: false,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    applicants: HashMap<ApplicantId, ApplicantSnapshot>,
    history: Vec<StatusChangeRecord>,
}

impl MemoryStore {
    pub(super) fn seeded(applicants: impl IntoIterator<Item = ApplicantSnapshot>) -> Self {
        let store = Self::default();
        {
            let mut inner = store.inner.lock().expect("store mutex poisoned");
            for snapshot in applicants {
                inner
                    .applicants
                    .insert(snapshot.applicant_id.clone(), snapshot);
            }
        }
        store
    }
}

impl ProgressionStore for MemoryStore {
    fn applicant(&self, id: &ApplicantId) -> Result<Option<ApplicantSnapshot>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.applicants.get(id).cloned())
    }

    fn set_status(
        &self,
        _progress_id: &ProgressId,
        applicant_id: &ApplicantId,
        status: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let snapshot = inner
            .applicants
            .get_mut(applicant_id)
            .ok_or(StoreError::NotFound)?;
        snapshot.status = status.to_string();
        Ok(())
    }

    fn append_record(&self, record: StatusChangeRecord) -> Result<StatusChangeRecord, StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.history.push(record.clone());
        Ok(record)
    }

    fn history(&self, progress_id: &ProgressId) -> Result<Vec<StatusChangeRecord>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .history
            .iter()
            .filter(|record| &record.progress_id == progress_id)
            .rev()
            .cloned()
            .collect())
    }

    fn amend_record(
        &self,
        history_id: &HistoryId,
        edit: HistoryEdit,
    ) -> Result<StatusChangeRecord, StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let record = inner
            .history
            .iter_mut()
            .find(|record| &record.id == history_id)
            .ok_or(StoreError::NotFound)?;
        record.new_status = edit.status;
        record.changed_by = edit.changed_by;
        record.changed_at = edit.changed_at;
        record.edited = edit.edited;
        record.deleted = edit.deleted;
        Ok(record.clone())
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingDispatcher {
    notices: Arc<Mutex<Vec<AssessmentNotice>>>,
}

impl RecordingDispatcher {
    pub(super) fn notices(&self) -> Vec<AssessmentNotice> {
        self.notices.lock().expect("dispatcher mutex poisoned").clone()
    }
}

impl AssessmentDispatcher for RecordingDispatcher {
    fn dispatch(&self, notice: AssessmentNotice) -> Result<(), DispatchError> {
        self.notices
            .lock()
            .expect("dispatcher mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) fn build_service() -> (
    StatusChangeService<MemoryStore, RecordingDispatcher>,
    Arc<MemoryStore>,
    Arc<RecordingDispatcher>,
) {
    let store = Arc::new(MemoryStore::seeded([applicant()]));
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let service = StatusChangeService::new(catalog(), store.clone(), dispatcher.clone());
    (service, store, dispatcher)
}
