use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use super::catalog::StatusCatalog;
use super::domain::{
    HistoryEdit, HistoryId, ProgressId, StatusChangeRecord, StatusChangeRequest,
    APTITUDE_TEST_STATUS, BLACKLIST_STATUS,
};
use super::history::{HistoryEntryView, StatusTimeline};
use super::repository::{
    AssessmentDispatcher, AssessmentNotice, DispatchError, ProgressionStore, StoreError,
};

static HISTORY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_history_id() -> HistoryId {
    let id = HISTORY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    HistoryId(format!("hist-{id:06}"))
}

/// Service composing the catalog, progression store, and assessment
/// dispatch hook behind the four workflow operations.
pub struct StatusChangeService<S, D> {
    catalog: Arc<StatusCatalog>,
    store: Arc<S>,
    assessments: Arc<D>,
}

impl<S, D> StatusChangeService<S, D>
where
    S: ProgressionStore + 'static,
    D: AssessmentDispatcher + 'static,
{
    pub fn new(catalog: StatusCatalog, store: Arc<S>, assessments: Arc<D>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store,
            assessments,
        }
    }

    pub fn catalog(&self) -> Arc<StatusCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Apply one status mutation: update the applicant's current status
    /// and append the history record. The recorded `previous_status` is
    /// taken from the request as submitted; concurrent writers race and
    /// the last write wins, with no conflict detection.
    pub fn apply_change(
        &self,
        request: StatusChangeRequest,
    ) -> Result<StatusChangeRecord, StatusChangeError> {
        if !self.catalog.contains(&request.status) {
            return Err(StatusChangeError::UnknownStatus(request.status));
        }

        let is_blacklist = request.status == BLACKLIST_STATUS;
        if is_blacklist && (request.blacklisted_type.is_none() || request.reason.is_none()) {
            return Err(StatusChangeError::MissingBlacklistDetails);
        }

        let snapshot = self
            .store
            .applicant(&request.applicant_id)?
            .ok_or(StoreError::NotFound)?;
        if snapshot.progress_id != request.progress_id {
            return Err(StatusChangeError::UnknownProgression(request.progress_id));
        }

        self.store
            .set_status(&request.progress_id, &request.applicant_id, &request.status)?;

        let record = self.store.append_record(StatusChangeRecord {
            id: next_history_id(),
            progress_id: request.progress_id.clone(),
            previous_status: request.previous_status.clone(),
            new_status: request.status.clone(),
            changed_at: request.change_date,
            changed_by: request.user_id.clone(),
            blacklisted_type: request.blacklisted_type,
            reason: request.reason,
            edited: false,
            deleted: false,
        })?;

        info!(
            applicant = %request.applicant_id.0,
            from = request.previous_status.as_deref().unwrap_or("-"),
            to = %request.status,
            "applicant status updated"
        );

        if request.status == APTITUDE_TEST_STATUS {
            self.assessments.dispatch(AssessmentNotice {
                applicant_id: request.applicant_id,
                progress_id: request.progress_id,
                requested_by: request.user_id,
            })?;
        }

        Ok(record)
    }

    /// Newest-first history for one progression, as served on the wire.
    pub fn history(
        &self,
        progress_id: &ProgressId,
    ) -> Result<Vec<StatusChangeRecord>, StatusChangeError> {
        Ok(self.store.history(progress_id)?)
    }

    /// Chronological, skip-annotated rendering of the history.
    pub fn timeline(
        &self,
        progress_id: &ProgressId,
    ) -> Result<Vec<HistoryEntryView>, StatusChangeError> {
        let records = self.store.history(progress_id)?;
        Ok(StatusTimeline::from_server(records).entries(&self.catalog))
    }

    /// Correct one record's metadata or soft-delete it. Distinct from
    /// [`StatusChangeService::apply_change`]; no new transition is created.
    pub fn edit_record(
        &self,
        history_id: &HistoryId,
        edit: HistoryEdit,
    ) -> Result<StatusChangeRecord, StatusChangeError> {
        if !self.catalog.contains(&edit.status) {
            return Err(StatusChangeError::UnknownStatus(edit.status));
        }

        let record = self.store.amend_record(history_id, edit)?;
        info!(history = %history_id.0, "status history record amended");
        Ok(record)
    }
}

/// Error raised by the status workflow service.
#[derive(Debug, thiserror::Error)]
pub enum StatusChangeError {
    #[error("status '{0}' is not in the configured catalog")]
    UnknownStatus(String),
    #[error("blacklist transitions require a blacklisted_type and reason")]
    MissingBlacklistDetails,
    #[error("progression '{0}' does not belong to the applicant")]
    UnknownProgression(ProgressId),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
