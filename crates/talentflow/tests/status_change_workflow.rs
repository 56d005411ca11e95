//! Integration specifications for the applicant status transition
//! workflow: confirmation sequencing, skip warnings, optimistic revert,
//! undo, and the HTTP surface exposed by the status router.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDateTime;

    use talentflow::workflows::status::{
        ApplicantId, ApplicantSnapshot, AssessmentDispatcher, AssessmentNotice, DispatchError,
        HistoryEdit, HistoryId, ProgressId, ProgressionStore, StatusCatalog, StatusChangeRecord,
        StatusChangeService, StoreError, UserId,
    };

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

    #[derive(Default, Clone)]
    pub(super) struct MemoryStore {
        inner: Arc<Mutex<StoreInner>>,
    }

    #[derive(Default)]
    struct StoreInner {
        applicants: HashMap<ApplicantId, ApplicantSnapshot>,
        history: Vec<StatusChangeRecord>,
    }

    impl MemoryStore {
        pub(super) fn seeded(applicants: impl IntoIterator<Item = ApplicantSnapshot>) -> Self {
            let store = Self::default();
            {
                let mut inner = store.inner.lock().expect("lock");
                for snapshot in applicants {
                    inner
                        .applicants
                        .insert(snapshot.applicant_id.clone(), snapshot);
                }
            }
            store
        }

        pub(super) fn status_of(&self, id: &ApplicantId) -> Option<String> {
            let inner = self.inner.lock().expect("lock");
            inner.applicants.get(id).map(|snapshot| snapshot.status.clone())
        }
    }

    impl ProgressionStore for MemoryStore {
        fn applicant(&self, id: &ApplicantId) -> Result<Option<ApplicantSnapshot>, StoreError> {
            let inner = self.inner.lock().expect("lock");
            Ok(inner.applicants.get(id).cloned())
        }

        fn set_status(
            &self,
            _progress_id: &ProgressId,
            applicant_id: &ApplicantId,
            status: &str,
        ) -> Result<(), StoreError> {
            let mut inner = self.inner.lock().expect("lock");
            let snapshot = inner
                .applicants
                .get_mut(applicant_id)
                .ok_or(StoreError::NotFound)?;
            snapshot.status = status.to_string();
            Ok(())
        }

        fn append_record(
            &self,
            record: StatusChangeRecord,
        ) -> Result<StatusChangeRecord, StoreError> {
            let mut inner = self.inner.lock().expect("lock");
            inner.history.push(record.clone());
            Ok(record)
        }

        fn history(&self, progress_id: &ProgressId) -> Result<Vec<StatusChangeRecord>, StoreError> {
            let inner = self.inner.lock().expect("lock");
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
            let mut inner = self.inner.lock().expect("lock");
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
            self.notices.lock().expect("lock").clone()
        }
    }

    impl AssessmentDispatcher for RecordingDispatcher {
        fn dispatch(&self, notice: AssessmentNotice) -> Result<(), DispatchError> {
            self.notices.lock().expect("lock").push(notice);
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
        let service =
            StatusChangeService::new(StatusCatalog::standard(), store.clone(), dispatcher.clone());
        (service, store, dispatcher)
    }
}

mod confirmation {
    use super::common::*;
    use talentflow::workflows::status::{
        ChangeForm, ConfirmationFlow, SelectOutcome, SubmitOutcome,
    };

    fn flow_for(
        service: &talentflow::workflows::status::StatusChangeService<
            MemoryStore,
            RecordingDispatcher,
        >,
    ) -> ConfirmationFlow {
        ConfirmationFlow::new(service.catalog(), applicant())
    }

    #[test]
    fn skip_jump_commits_after_warning_and_undo_mirrors_it() {
        let (service, store, _) = build_service();
        let mut flow = flow_for(&service);

        let outcome = flow.select("FIRST_INTERVIEW").expect("selection accepted");
        assert!(matches!(outcome, SelectOutcome::SkipWarning(_)));
        flow.proceed_past_warning().expect("warning acknowledged");

        let request = flow
            .confirm(&recruiter(), ChangeForm::dated(at(9, 0)))
            .expect("request built");
        let result = service
            .apply_change(request)
            .map(drop)
            .map_err(|err| err.to_string());
        let outcome = flow.resolve_submission(result).expect("resolved");

        let toast = match outcome {
            SubmitOutcome::Committed { toast } => toast,
            other => panic!("expected commit, got {other:?}"),
        };
        assert_eq!(
            store.status_of(&applicant().applicant_id).as_deref(),
            Some("FIRST_INTERVIEW")
        );

        // Undo is a fresh forward transition with the statuses swapped.
        let undo = toast.undo_request(&recruiter(), at(9, 5));
        assert_eq!(undo.status, "UNPROCESSED");
        assert_eq!(undo.previous_status.as_deref(), Some("FIRST_INTERVIEW"));
        service.apply_change(undo).expect("undo applies");

        assert_eq!(
            store.status_of(&applicant().applicant_id).as_deref(),
            Some("UNPROCESSED")
        );
        let history = service
            .history(&applicant().progress_id)
            .expect("history readable");
        assert_eq!(history.len(), 2, "undo appends rather than deletes");
        assert_eq!(history[0].new_status, "UNPROCESSED");
        assert_eq!(history[1].new_status, "FIRST_INTERVIEW");
    }

    #[test]
    fn aptitude_jump_dispatches_an_assessment_after_commit() {
        let (service, _, dispatcher) = build_service();
        let mut flow = flow_for(&service);

        flow.select("APTITUDE_TEST").expect("selection accepted");
        flow.proceed_past_warning().expect("warning acknowledged");
        let request = flow
            .confirm(&recruiter(), ChangeForm::undated(at(9, 0)))
            .expect("request built");
        assert_eq!(request.change_date.display(), "N/A");

        let result = service
            .apply_change(request)
            .map(drop)
            .map_err(|err| err.to_string());
        flow.resolve_submission(result).expect("resolved");

        let notices = dispatcher.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].requested_by, recruiter());
    }

    #[test]
    fn backend_rejection_reverts_the_displayed_status() {
        let (service, store, _) = build_service();
        let mut flow = ConfirmationFlow::new(
            service.catalog(),
            talentflow::workflows::status::ApplicantSnapshot {
                applicant_id: talentflow::workflows::status::ApplicantId("app-gone".to_string()),
                progress_id: talentflow::workflows::status::ProgressId("prog-gone".to_string()),
                name: "Ghost".to_string(),
                status: "UNPROCESSED".to_string(),
            },
        );

        flow.select("DOCUMENT_SCREENING").expect("selection accepted");
        let request = flow
            .confirm(&recruiter(), ChangeForm::dated(at(9, 0)))
            .expect("request built");
        assert_eq!(flow.displayed_status(), "DOCUMENT_SCREENING");

        let result = service
            .apply_change(request)
            .map(drop)
            .map_err(|err| err.to_string());
        let outcome = flow.resolve_submission(result).expect("resolved");

        assert!(matches!(outcome, SubmitOutcome::Reverted { .. }));
        assert_eq!(flow.displayed_status(), "UNPROCESSED");
        assert!(store.status_of(&applicant().applicant_id).is_some());
    }
}

mod http {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use talentflow::workflows::status::status_router;
    use tower::ServiceExt;

    fn build_router() -> axum::Router {
        let (service, _, _) = build_service();
        status_router(Arc::new(service))
    }

    #[tokio::test]
    async fn get_status_returns_the_ordered_catalog() {
        let router = build_router();
        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/status")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        let statuses = payload.as_array().expect("array payload");
        assert_eq!(statuses.first(), Some(&json!("UNPROCESSED")));
        assert_eq!(statuses.last(), Some(&json!("BLACKLIST")));
    }

    #[tokio::test]
    async fn put_update_status_mutates_and_appends_history() {
        let router = build_router();

        let body = json!({
            "progress_id": "prog-2001",
            "applicant_id": "app-1001",
            "status": "DOCUMENT_SCREENING",
            "user_id": "recruiter-7",
            "change_date": "2025-11-04 09:00",
            "previous_status": "UNPROCESSED"
        });
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/applicant/update/status")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let record: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(record.get("new_status"), Some(&json!("DOCUMENT_SCREENING")));
        assert_eq!(record.get("previous_status"), Some(&json!("UNPROCESSED")));

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/applicant/status-history/prog-2001")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let history: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(history.as_array().map(|records| records.len()), Some(1));
    }

    #[tokio::test]
    async fn sentinel_change_date_round_trips_on_the_wire() {
        let router = build_router();

        let body = json!({
            "progress_id": "prog-2001",
            "applicant_id": "app-1001",
            "status": "DOCUMENT_SCREENING",
            "user_id": "recruiter-7",
            "change_date": "N/A",
            "previous_status": "UNPROCESSED"
        });
        let response = router
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/applicant/update/status")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let record: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(record.get("changed_at"), Some(&json!("N/A")));
    }

    #[tokio::test]
    async fn unknown_status_is_unprocessable() {
        let router = build_router();

        let body = json!({
            "progress_id": "prog-2001",
            "applicant_id": "app-1001",
            "status": "PHONE_SCREEN",
            "user_id": "recruiter-7",
            "change_date": "2025-11-04 09:00",
            "previous_status": "UNPROCESSED"
        });
        let response = router
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/applicant/update/status")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn blacklist_without_details_is_unprocessable() {
        let router = build_router();

        let body = json!({
            "progress_id": "prog-2001",
            "applicant_id": "app-1001",
            "status": "BLACKLIST",
            "user_id": "recruiter-7",
            "change_date": "2025-11-04 09:00",
            "previous_status": "UNPROCESSED"
        });
        let response = router
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/applicant/update/status")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn missing_applicant_is_not_found() {
        let router = build_router();

        let body = json!({
            "progress_id": "prog-9999",
            "applicant_id": "app-9999",
            "status": "DOCUMENT_SCREENING",
            "user_id": "recruiter-7",
            "change_date": "2025-11-04 09:00",
            "previous_status": "UNPROCESSED"
        });
        let response = router
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/applicant/update/status")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
