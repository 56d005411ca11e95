//! Applicant status transition workflow.
//!
//! Covers the ordered status catalog, skip detection for forward jumps,
//! the confirmation-flow state machine shared by the detail and table
//! views, and the skip-annotated history timeline. A missing or unknown
//! previous status deliberately yields an empty skip set rather than an
//! error; product has not confirmed whether that masks anything beyond
//! first-ever transitions.

pub mod catalog;
pub mod domain;
pub mod flow;
pub mod history;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, StatusCatalog};
pub use domain::{
    ApplicantId, ApplicantSnapshot, BlacklistReason, BlacklistedType, ChangeDate, ChangeDateError,
    HistoryEdit, HistoryId, ProgressId, StatusChangeRecord, StatusChangeRequest, UserId,
    APTITUDE_TEST_STATUS, BLACKLIST_STATUS,
};
pub use flow::{
    ChangeForm, ConfirmationFlow, FlowError, PendingStatusChange, SelectOutcome, StatusSupplement,
    SubmitOutcome, UndoToast,
};
pub use history::{HistoryEntryView, StatusTimeline};
pub use repository::{
    AssessmentDispatcher, AssessmentNotice, DispatchError, ProgressionStore, StoreError,
};
pub use router::status_router;
pub use service::{StatusChangeError, StatusChangeService};
