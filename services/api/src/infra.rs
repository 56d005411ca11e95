use chrono::NaiveDateTime;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use talentflow::workflows::status::{
    ApplicantId, ApplicantSnapshot, AssessmentDispatcher, AssessmentNotice, DispatchError,
    HistoryEdit, HistoryId, ProgressId, ProgressionStore, StatusChangeRecord, StoreError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProgressionStore {
    inner: Arc<Mutex<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    applicants: HashMap<ApplicantId, ApplicantSnapshot>,
    history: Vec<StatusChangeRecord>,
}

impl InMemoryProgressionStore {
    pub(crate) fn with_applicants(seed: impl IntoIterator<Item = ApplicantSnapshot>) -> Self {
        let store = Self::default();
        {
            let mut inner = store.inner.lock().expect("store mutex poisoned");
            for snapshot in seed {
                inner
                    .applicants
                    .insert(snapshot.applicant_id.clone(), snapshot);
            }
        }
        store
    }
}

impl ProgressionStore for InMemoryProgressionStore {
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
pub(crate) struct RecordingAssessmentDispatcher {
    notices: Arc<Mutex<Vec<AssessmentNotice>>>,
}

impl RecordingAssessmentDispatcher {
    pub(crate) fn notices(&self) -> Vec<AssessmentNotice> {
        self.notices
            .lock()
            .expect("dispatcher mutex poisoned")
            .clone()
    }
}

impl AssessmentDispatcher for RecordingAssessmentDispatcher {
    fn dispatch(&self, notice: AssessmentNotice) -> Result<(), DispatchError> {
        self.notices
            .lock()
            .expect("dispatcher mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(crate) fn seed_applicants() -> Vec<ApplicantSnapshot> {
    vec![
        ApplicantSnapshot {
            applicant_id: ApplicantId("app-1001".to_string()),
            progress_id: ProgressId("prog-2001".to_string()),
            name: "Mori Sakura".to_string(),
            status: "UNPROCESSED".to_string(),
        },
        ApplicantSnapshot {
            applicant_id: ApplicantId("app-1002".to_string()),
            progress_id: ProgressId("prog-2002".to_string()),
            name: "Devon Reyes".to_string(),
            status: "DOCUMENT_SCREENING".to_string(),
        },
        ApplicantSnapshot {
            applicant_id: ApplicantId("app-1003".to_string()),
            progress_id: ProgressId("prog-2003".to_string()),
            name: "Priya Nair".to_string(),
            status: "FIRST_INTERVIEW".to_string(),
        },
    ]
}

pub(crate) fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M")
        .map_err(|err| format!("failed to parse '{raw}' as 'YYYY-MM-DD HH:MM' ({err})"))
}
