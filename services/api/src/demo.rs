use crate::cli::load_catalog;
use crate::infra::{seed_applicants, InMemoryProgressionStore, RecordingAssessmentDispatcher};
use chrono::{Duration, Local, NaiveDateTime};
use clap::Args;
use std::sync::Arc;
use talentflow::config::AppConfig;
use talentflow::error::AppError;
use talentflow::workflows::status::{
    ApplicantId, ApplicantSnapshot, AssessmentDispatcher, BlacklistReason, BlacklistedType,
    ChangeDate, ChangeForm, ConfirmationFlow, HistoryEdit, ProgressId, ProgressionStore,
    StatusChangeService, SubmitOutcome, UserId, APTITUDE_TEST_STATUS, BLACKLIST_STATUS,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Acting user recorded on every transition
    #[arg(long, default_value = "demo-recruiter")]
    pub(crate) user: String,
    /// Effective timestamp for the first transition (YYYY-MM-DD HH:MM).
    /// Defaults to now; later steps advance from it.
    #[arg(long, value_parser = crate::infra::parse_datetime)]
    pub(crate) at: Option<NaiveDateTime>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { user, at } = args;

    let user = UserId(user);
    let start = at.unwrap_or_else(|| Local::now().naive_local());

    let config = AppConfig::load()?;
    let catalog = load_catalog(&config)?;

    let store = Arc::new(InMemoryProgressionStore::with_applicants(seed_applicants()));
    let assessments = Arc::new(RecordingAssessmentDispatcher::default());
    let service = StatusChangeService::new(catalog, store, assessments.clone());
    let catalog = service.catalog();

    println!("Applicant status workflow demo");
    println!("Pipeline:");
    for (position, status) in catalog.statuses().iter().enumerate() {
        println!("{:>4}. {status}", position + 1);
    }

    let applicant = seed_applicants().remove(0);
    let progress_id = applicant.progress_id.clone();
    println!(
        "\nApplicant {} ({}) starts at {}",
        applicant.name, applicant.applicant_id, applicant.status
    );

    let mut flow = ConfirmationFlow::new(catalog.clone(), applicant);

    // A forward jump: warn, acknowledge, collect a date, submit, undo.
    println!("\nSelecting FIRST_INTERVIEW");
    flow.select("FIRST_INTERVIEW")?;
    acknowledge_any_warning(&mut flow)?;
    submit(&service, &mut flow, &user, ChangeForm::dated(start))?;

    if let Some(undo_request) = flow.undo(&user, start + Duration::minutes(2)) {
        println!(
            "  Undo: {} -> {}",
            undo_request.previous_status.as_deref().unwrap_or("-"),
            undo_request.status
        );
        service.apply_change(undo_request)?;
    }

    // The aptitude-test status carries an informational dispatch notice
    // and demonstrates the N/A effective date.
    println!("\nSelecting {APTITUDE_TEST_STATUS} with no applicable date");
    flow.select(APTITUDE_TEST_STATUS)?;
    acknowledge_any_warning(&mut flow)?;
    if let Some(supplement) = flow.required_supplement() {
        println!("  Supplement: {supplement:?}");
    }
    submit(
        &service,
        &mut flow,
        &user,
        ChangeForm::undated(start + Duration::minutes(5)),
    )?;
    flow.dismiss_toast();

    for notice in assessments.notices() {
        println!(
            "  Assessment dispatched for {} (requested by {})",
            notice.applicant_id, notice.requested_by
        );
    }

    // A blacklist transition requires the category and reason.
    println!("\nSelecting {BLACKLIST_STATUS}");
    flow.select(BLACKLIST_STATUS)?;
    acknowledge_any_warning(&mut flow)?;
    if let Some(supplement) = flow.required_supplement() {
        println!("  Supplement: {supplement:?}");
    }
    submit(
        &service,
        &mut flow,
        &user,
        ChangeForm::dated(start + Duration::minutes(10)).with_blacklist(
            BlacklistedType::Temporary,
            BlacklistReason::WithdrewAfterAcceptance,
        ),
    )?;
    flow.dismiss_toast();

    // A submission against an applicant the backend no longer knows
    // shows the optimistic revert.
    println!("\nSubmission failure and revert");
    let ghost = ApplicantSnapshot {
        applicant_id: ApplicantId("app-gone".to_string()),
        progress_id: ProgressId("prog-gone".to_string()),
        name: "Ghost Applicant".to_string(),
        status: "UNPROCESSED".to_string(),
    };
    let mut ghost_flow = ConfirmationFlow::new(catalog.clone(), ghost);
    ghost_flow.select("DOCUMENT_SCREENING")?;
    submit(
        &service,
        &mut ghost_flow,
        &user,
        ChangeForm::dated(start + Duration::minutes(12)),
    )?;

    // Finish with the annotated timeline and a metadata correction.
    print_timeline(&service, &progress_id, "\nStatus history (oldest first)")?;

    let newest_first = service.history(&progress_id)?;
    if let Some(earliest) = newest_first.last() {
        println!("\nCorrecting the effective date of {}", earliest.id);
        service.edit_record(
            &earliest.id,
            HistoryEdit {
                status: earliest.new_status.clone(),
                edited: true,
                deleted: false,
                changed_by: user.clone(),
                changed_at: ChangeDate::At(start - Duration::minutes(30)),
            },
        )?;
    }

    print_timeline(&service, &progress_id, "\nStatus history after correction")?;

    Ok(())
}

fn acknowledge_any_warning(flow: &mut ConfirmationFlow) -> Result<(), AppError> {
    if let Some(skipped) = flow.skip_warning() {
        println!("  Skip warning: bypasses {}", skipped.join(", "));
        flow.proceed_past_warning()?;
        println!("  Proceeding past the warning");
    }
    Ok(())
}

fn submit<S, D>(
    service: &StatusChangeService<S, D>,
    flow: &mut ConfirmationFlow,
    user: &UserId,
    form: ChangeForm,
) -> Result<(), AppError>
where
    S: ProgressionStore + 'static,
    D: AssessmentDispatcher + 'static,
{
    let request = flow.confirm(user, form)?;
    println!(
        "  Submitting {} -> {} (effective {})",
        request.previous_status.as_deref().unwrap_or("-"),
        request.status,
        request.change_date
    );

    let result = service
        .apply_change(request)
        .map(drop)
        .map_err(|err| err.to_string());

    match flow.resolve_submission(result)? {
        SubmitOutcome::Committed { toast } => {
            println!(
                "  Toast: {} moved {} -> {} (undo available)",
                toast.applicant_id, toast.previous_status, toast.new_status
            );
        }
        SubmitOutcome::Reverted { error } => {
            println!("  Reverted to {} after: {error}", flow.displayed_status());
        }
    }
    Ok(())
}

fn print_timeline<S, D>(
    service: &StatusChangeService<S, D>,
    progress_id: &ProgressId,
    heading: &str,
) -> Result<(), AppError>
where
    S: ProgressionStore + 'static,
    D: AssessmentDispatcher + 'static,
{
    println!("{heading}");
    for entry in service.timeline(progress_id)? {
        let skipped_note = if entry.skipped.is_empty() {
            String::new()
        } else {
            format!(" (skipped: {})", entry.skipped.join(", "))
        };
        let edited_note = if entry.edited { " [edited]" } else { "" };
        println!(
            "- {} -> {} at {} by {}{}{}",
            entry.previous_status.as_deref().unwrap_or("-"),
            entry.new_status,
            entry.changed_at,
            entry.changed_by,
            skipped_note,
            edited_note
        );
    }
    Ok(())
}
