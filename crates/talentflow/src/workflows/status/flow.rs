use std::sync::Arc;

use chrono::NaiveDateTime;

use super::catalog::StatusCatalog;
use super::domain::{
    ApplicantId, ApplicantSnapshot, BlacklistReason, BlacklistedType, ChangeDate, ProgressId,
    StatusChangeRequest, UserId, APTITUDE_TEST_STATUS, BLACKLIST_STATUS,
};

/// Transient state for one status change; created when the selector
/// value changes and destroyed on confirm or cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingStatusChange {
    pub applicant_id: ApplicantId,
    pub progress_id: ProgressId,
    pub new_status: String,
    /// Displayed status at the moment the change was initiated; the
    /// value restored when a submission fails.
    pub initiated_from: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FlowState {
    Idle,
    SkipWarning {
        pending: PendingStatusChange,
        skipped: Vec<String>,
    },
    CollectingDate {
        pending: PendingStatusChange,
    },
    Submitting {
        pending: PendingStatusChange,
    },
}

/// What the selector change resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Forward jump past intermediate stages; a blocking confirmation
    /// is required before the date step.
    SkipWarning(Vec<String>),
    /// No skip detected; proceed straight to date collection.
    DateRequired,
}

/// Inline supplements the date-collection step must surface for
/// specific target statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSupplement {
    /// Informational only: the backend will send the assessment.
    TestDispatchNotice,
    /// Category and reason are mandatory.
    BlacklistDetails,
}

impl StatusSupplement {
    pub fn for_status(status: &str) -> Option<Self> {
        match status {
            APTITUDE_TEST_STATUS => Some(StatusSupplement::TestDispatchNotice),
            BLACKLIST_STATUS => Some(StatusSupplement::BlacklistDetails),
            _ => None,
        }
    }
}

/// Values gathered by the date-collection step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeForm {
    /// Picker value; callers default it to now.
    pub picked_at: NaiveDateTime,
    /// Unchecked means the effective date is unknown or not meaningful
    /// and the sentinel is sent regardless of the picker value.
    pub date_applicable: bool,
    pub blacklisted_type: Option<BlacklistedType>,
    pub reason: Option<BlacklistReason>,
}

impl ChangeForm {
    pub fn dated(picked_at: NaiveDateTime) -> Self {
        Self {
            picked_at,
            date_applicable: true,
            blacklisted_type: None,
            reason: None,
        }
    }

    pub fn undated(picked_at: NaiveDateTime) -> Self {
        Self {
            date_applicable: false,
            ..Self::dated(picked_at)
        }
    }

    pub fn with_blacklist(mut self, kind: BlacklistedType, reason: BlacklistReason) -> Self {
        self.blacklisted_type = Some(kind);
        self.reason = Some(reason);
        self
    }
}

/// Transient notification carrying enough to undo a committed change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoToast {
    pub applicant_id: ApplicantId,
    pub progress_id: ProgressId,
    pub previous_status: String,
    pub new_status: String,
}

impl UndoToast {
    /// Mirrored forward transition through the same mutation endpoint:
    /// a fresh history record, not a rollback of the committed one.
    pub fn undo_request(&self, user: &UserId, at: NaiveDateTime) -> StatusChangeRequest {
        StatusChangeRequest {
            progress_id: self.progress_id.clone(),
            applicant_id: self.applicant_id.clone(),
            status: self.previous_status.clone(),
            user_id: user.clone(),
            change_date: ChangeDate::At(at),
            previous_status: Some(self.new_status.clone()),
            blacklisted_type: None,
            reason: None,
        }
    }
}

/// Result of resolving a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Committed { toast: UndoToast },
    /// The displayed status was restored to its pre-change value; the
    /// error is surfaced to the user and never retried automatically.
    Reverted { error: String },
}

/// Sequencer for one applicant's status changes.
///
/// Consolidates the selection, skip warning, date collection, and
/// submission steps behind a single reusable state machine; the actual
/// mutation is performed by the caller between [`ConfirmationFlow::confirm`]
/// and [`ConfirmationFlow::resolve_submission`].
#[derive(Debug, Clone)]
pub struct ConfirmationFlow {
    catalog: Arc<StatusCatalog>,
    applicant: ApplicantSnapshot,
    state: FlowState,
    toast: Option<UndoToast>,
}

impl ConfirmationFlow {
    pub fn new(catalog: Arc<StatusCatalog>, applicant: ApplicantSnapshot) -> Self {
        Self {
            catalog,
            applicant,
            state: FlowState::Idle,
            toast: None,
        }
    }

    /// Status label currently shown for the applicant. Optimistically
    /// updated on confirm and reverted if the submission fails.
    pub fn displayed_status(&self) -> &str {
        &self.applicant.status
    }

    pub fn applicant(&self) -> &ApplicantSnapshot {
        &self.applicant
    }

    /// The selector is disabled while a confirmation step or an undo
    /// toast is outstanding, serializing transitions from this client.
    pub fn selector_enabled(&self) -> bool {
        matches!(self.state, FlowState::Idle) && self.toast.is_none()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, FlowState::Idle)
    }

    pub fn toast(&self) -> Option<&UndoToast> {
        self.toast.as_ref()
    }

    /// Skipped statuses awaiting acknowledgement, if any.
    pub fn skip_warning(&self) -> Option<&[String]> {
        match &self.state {
            FlowState::SkipWarning { skipped, .. } => Some(skipped),
            _ => None,
        }
    }

    /// Supplement the date step must collect for the pending status.
    pub fn required_supplement(&self) -> Option<StatusSupplement> {
        match &self.state {
            FlowState::CollectingDate { pending } => {
                StatusSupplement::for_status(&pending.new_status)
            }
            _ => None,
        }
    }

    /// React to the selector changing value.
    pub fn select(&mut self, new_status: &str) -> Result<SelectOutcome, FlowError> {
        if !self.selector_enabled() {
            return Err(FlowError::SelectorDisabled);
        }
        if !self.catalog.contains(new_status) {
            return Err(FlowError::UnknownStatus(new_status.to_string()));
        }

        let pending = PendingStatusChange {
            applicant_id: self.applicant.applicant_id.clone(),
            progress_id: self.applicant.progress_id.clone(),
            new_status: new_status.to_string(),
            initiated_from: self.applicant.status.clone(),
        };

        let skipped = self
            .catalog
            .skipped_between(Some(&pending.initiated_from), new_status);

        if skipped.is_empty() {
            self.state = FlowState::CollectingDate { pending };
            Ok(SelectOutcome::DateRequired)
        } else {
            let outcome = SelectOutcome::SkipWarning(skipped.clone());
            self.state = FlowState::SkipWarning { pending, skipped };
            Ok(outcome)
        }
    }

    /// Explicit "proceed" on the blocking skip warning.
    pub fn proceed_past_warning(&mut self) -> Result<(), FlowError> {
        match std::mem::replace(&mut self.state, FlowState::Idle) {
            FlowState::SkipWarning { pending, .. } => {
                self.state = FlowState::CollectingDate { pending };
                Ok(())
            }
            other => {
                self.state = other;
                Err(FlowError::NoWarningPending)
            }
        }
    }

    /// Abandon the pending change before submission. No backend call is
    /// made and the displayed status is untouched.
    pub fn cancel(&mut self) {
        if !matches!(self.state, FlowState::Submitting { .. }) {
            self.state = FlowState::Idle;
        }
    }

    /// Confirm the date step and build the single mutation request.
    /// The displayed status flips optimistically to the new value.
    pub fn confirm(
        &mut self,
        user: &UserId,
        form: ChangeForm,
    ) -> Result<StatusChangeRequest, FlowError> {
        let FlowState::CollectingDate { pending } = &self.state else {
            return Err(FlowError::NoDatePending);
        };

        let is_blacklist = pending.new_status == BLACKLIST_STATUS;
        if is_blacklist && (form.blacklisted_type.is_none() || form.reason.is_none()) {
            return Err(FlowError::MissingBlacklistDetails);
        }

        let change_date = if form.date_applicable {
            ChangeDate::At(form.picked_at)
        } else {
            ChangeDate::NotApplicable
        };

        let pending = pending.clone();
        let request = StatusChangeRequest {
            progress_id: pending.progress_id.clone(),
            applicant_id: pending.applicant_id.clone(),
            status: pending.new_status.clone(),
            user_id: user.clone(),
            change_date,
            previous_status: Some(pending.initiated_from.clone()),
            blacklisted_type: if is_blacklist { form.blacklisted_type } else { None },
            reason: if is_blacklist { form.reason } else { None },
        };

        self.applicant.status = pending.new_status.clone();
        self.state = FlowState::Submitting { pending };
        Ok(request)
    }

    /// Feed back the mutation result. Success raises the undo toast;
    /// failure restores the pre-change status label.
    pub fn resolve_submission(
        &mut self,
        result: Result<(), String>,
    ) -> Result<SubmitOutcome, FlowError> {
        match std::mem::replace(&mut self.state, FlowState::Idle) {
            FlowState::Submitting { pending } => match result {
                Ok(()) => {
                    let toast = UndoToast {
                        applicant_id: pending.applicant_id,
                        progress_id: pending.progress_id,
                        previous_status: pending.initiated_from,
                        new_status: pending.new_status,
                    };
                    self.toast = Some(toast.clone());
                    Ok(SubmitOutcome::Committed { toast })
                }
                Err(error) => {
                    self.applicant.status = pending.initiated_from;
                    Ok(SubmitOutcome::Reverted { error })
                }
            },
            other => {
                self.state = other;
                Err(FlowError::NoSubmissionPending)
            }
        }
    }

    /// Consume the toast and build the mirrored undo mutation. The
    /// displayed status flips back optimistically.
    pub fn undo(&mut self, user: &UserId, at: NaiveDateTime) -> Option<StatusChangeRequest> {
        let toast = self.toast.take()?;
        self.applicant.status = toast.previous_status.clone();
        Some(toast.undo_request(user, at))
    }

    /// Let the toast expire without undoing, re-enabling the selector.
    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }
}

/// Violations of the confirmation sequence.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("status selector is disabled while a change or undo toast is outstanding")]
    SelectorDisabled,
    #[error("status '{0}' is not part of the loaded catalog")]
    UnknownStatus(String),
    #[error("no skip warning is awaiting acknowledgement")]
    NoWarningPending,
    #[error("no status change is collecting an effective date")]
    NoDatePending,
    #[error("blacklist transitions require a category and a reason")]
    MissingBlacklistDetails,
    #[error("no submission is in flight")]
    NoSubmissionPending,
}
