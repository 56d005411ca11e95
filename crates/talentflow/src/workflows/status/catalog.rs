use serde::Serialize;

/// Default pipeline served when no catalog override is configured.
///
/// Order is significant: it defines forward progression, and skip
/// detection treats it as a total order.
const STANDARD_PIPELINE: [&str; 10] = [
    "UNPROCESSED",
    "DOCUMENT_SCREENING",
    "APTITUDE_TEST",
    "FIRST_INTERVIEW",
    "SECOND_INTERVIEW",
    "FINAL_INTERVIEW",
    "OFFER",
    "HIRED",
    "DECLINED",
    "BLACKLIST",
];

/// Ordered list of valid applicant pipeline stages.
///
/// Loaded once per session and treated as read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusCatalog {
    statuses: Vec<String>,
}

impl StatusCatalog {
    pub fn new(statuses: Vec<String>) -> Result<Self, CatalogError> {
        if statuses.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (index, status) in statuses.iter().enumerate() {
            if statuses[..index].iter().any(|seen| seen == status) {
                return Err(CatalogError::Duplicate(status.clone()));
            }
        }

        Ok(Self { statuses })
    }

    pub fn standard() -> Self {
        Self {
            statuses: STANDARD_PIPELINE.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    pub fn position(&self, status: &str) -> Option<usize> {
        self.statuses.iter().position(|entry| entry == status)
    }

    pub fn contains(&self, status: &str) -> bool {
        self.position(status).is_some()
    }

    /// Statuses strictly between `previous` and `new_status` in catalog
    /// order, when the move jumps forward past at least one stage.
    ///
    /// A missing or unknown previous status yields an empty set rather
    /// than an error, as does an unknown new status. Backward and
    /// lateral moves are never flagged.
    pub fn skipped_between(&self, previous: Option<&str>, new_status: &str) -> Vec<String> {
        let Some(prev_idx) = previous.and_then(|status| self.position(status)) else {
            return Vec::new();
        };
        let Some(new_idx) = self.position(new_status) else {
            return Vec::new();
        };

        if new_idx > prev_idx + 1 {
            self.statuses[prev_idx + 1..new_idx].to_vec()
        } else {
            Vec::new()
        }
    }
}

/// Rejections raised while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("status catalog must contain at least one status")]
    Empty,
    #[error("status catalog contains '{0}' more than once")]
    Duplicate(String),
}
