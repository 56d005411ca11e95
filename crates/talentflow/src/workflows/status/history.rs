use serde::Serialize;

use super::catalog::StatusCatalog;
use super::domain::{HistoryId, StatusChangeRecord, UserId};

/// One rendered row of the status history timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntryView {
    pub history_id: HistoryId,
    pub previous_status: Option<String>,
    pub new_status: String,
    /// Display form; the sentinel renders literally as `N/A`.
    pub changed_at: String,
    pub changed_by: UserId,
    /// Statuses this historical step bypassed, recomputed from the
    /// catalog rather than read from any stored flag.
    pub skipped: Vec<String>,
    pub edited: bool,
}

/// Chronological (oldest-first) record sequence for one progression.
///
/// The server returns history newest-first; construct with
/// [`StatusTimeline::from_server`] to restore chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTimeline {
    records: Vec<StatusChangeRecord>,
}

impl StatusTimeline {
    pub fn from_server(mut newest_first: Vec<StatusChangeRecord>) -> Self {
        newest_first.reverse();
        Self {
            records: newest_first,
        }
    }

    pub fn from_chronological(records: Vec<StatusChangeRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[StatusChangeRecord] {
        &self.records
    }

    /// Render the timeline, annotating each surviving step with the
    /// statuses it skipped. Annotation pairs each record with the one
    /// before it (the first record falls back to its own recorded
    /// previous status), so historical skips are flagged independently
    /// of whether the live flow warned at the time. Soft-deleted
    /// records are omitted.
    pub fn entries(&self, catalog: &StatusCatalog) -> Vec<HistoryEntryView> {
        let surviving: Vec<&StatusChangeRecord> =
            self.records.iter().filter(|record| !record.deleted).collect();

        surviving
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let previous = if index == 0 {
                    record.previous_status.as_deref()
                } else {
                    Some(surviving[index - 1].new_status.as_str())
                };

                HistoryEntryView {
                    history_id: record.id.clone(),
                    previous_status: previous.map(str::to_string),
                    new_status: record.new_status.clone(),
                    changed_at: record.changed_at.display(),
                    changed_by: record.changed_by.clone(),
                    skipped: catalog.skipped_between(previous, &record.new_status),
                    edited: record.edited,
                }
            })
            .collect()
    }
}
