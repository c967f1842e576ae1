mod common;

use std::sync::Arc;

use jiff::Zoned;

use emed_core::models::attendance::{AttendanceStatus, AttendanceType};
use emed_core::routes::Route;
use emed_core::session::Capability;
use emed_core::status::StatusColor;
use emed_workflow::WorkflowError;
use emed_workflow::dashboard::{
    ATTENDANCE_CANCELED, ATTENDANCE_CREATED, ActionState, AttendIcon, Dashboard,
    NOT_ATTENDED_REASON,
};
use emed_workflow::form::{DATE_REQUIRED, REASON_REQUIRED};
use emed_workflow::modal::{ModalSize, SelectedAppointment};
use emed_workflow::services::Level;

use common::*;

fn dashboard(api: &FakeApi, recorder: &Arc<Recorder>) -> Dashboard {
    let attendances = vec![
        attendance(1, AttendanceStatus::Confirmed, DOCTOR_ID),
        attendance(2, AttendanceStatus::InProgress, DOCTOR_ID),
        attendance(3, AttendanceStatus::Done, DOCTOR_ID),
    ];
    let mut session = doctor_session();
    session.capabilities.manage_appointments = true;
    Dashboard::new(Arc::new(api.clone()), session, services(recorder), attendances)
}

fn seeded() -> FakeApi {
    FakeApi::with_attendances(vec![
        attendance(1, AttendanceStatus::Confirmed, DOCTOR_ID),
        attendance(2, AttendanceStatus::InProgress, DOCTOR_ID),
        attendance(3, AttendanceStatus::Done, DOCTOR_ID),
    ])
}

fn zoned(s: &str) -> Zoned {
    s.parse().unwrap()
}

#[test]
fn three_rows_expose_the_expected_actions() {
    let api = seeded();
    let recorder = Arc::new(Recorder::default());
    let board = dashboard(&api, &recorder);

    let rows = board.rows();
    assert_eq!(rows.len(), 3);

    let confirmed = rows[0].actions;
    assert_eq!(confirmed.attend, ActionState::Enabled);
    assert_eq!(confirmed.not_attended, ActionState::Enabled);
    assert_eq!(confirmed.reschedule, ActionState::Enabled);
    assert_eq!(confirmed.cancel, ActionState::Enabled);
    assert_eq!(confirmed.attend_icon, AttendIcon::Doctor);
    assert_eq!(rows[0].status_color, StatusColor::Success);

    let in_progress = rows[1].actions;
    assert_eq!(in_progress.attend, ActionState::Enabled);
    assert_eq!(in_progress.not_attended, ActionState::Disabled);
    assert_eq!(in_progress.reschedule, ActionState::Hidden);
    assert_eq!(in_progress.cancel, ActionState::Hidden);
    assert_eq!(rows[1].status_color, StatusColor::Warning);

    let done = rows[2].actions;
    assert_eq!(done.attend, ActionState::Disabled);
    assert_eq!(done.not_attended, ActionState::Disabled);
    assert_eq!(done.reschedule, ActionState::Hidden);
    assert_eq!(done.cancel, ActionState::Hidden);
    assert_eq!(rows[2].status_color, StatusColor::Neutral);

    for row in &rows {
        assert_eq!(row.actions.medical_records, ActionState::Enabled);
    }
    assert_eq!(rows[0].date_label, "Monday, October 19, 2026 at 02:30 PM");
    assert!(api.calls().is_empty());
}

#[test]
fn attend_is_disabled_for_rows_of_other_professionals() {
    let api = FakeApi::default();
    let recorder = Arc::new(Recorder::default());
    let board = Dashboard::new(
        Arc::new(api),
        doctor_session(),
        services(&recorder),
        vec![
            attendance(1, AttendanceStatus::Confirmed, OTHER_DOCTOR_ID),
            attendance(2, AttendanceStatus::Confirmed, NURSE_ID),
        ],
    );

    let rows = board.rows();
    assert_eq!(rows[0].actions.attend, ActionState::Disabled);
    assert_eq!(rows[1].actions.attend_icon, AttendIcon::Nurse);
    // Doctors do not schedule by default.
    assert_eq!(rows[0].actions.not_attended, ActionState::Hidden);
    assert_eq!(rows[0].actions.cancel, ActionState::Hidden);
}

#[tokio::test]
async fn attending_an_in_progress_row_only_navigates() {
    let api = seeded();
    let recorder = Arc::new(Recorder::default());
    let mut board = dashboard(&api, &recorder);

    board.attend(2).await.unwrap();

    assert_eq!(api.count(|c| matches!(c, Call::UpdateAttendance(_))), 0);
    assert_eq!(recorder.routes(), vec![Route::Attendance(2)]);
}

#[tokio::test]
async fn attending_a_confirmed_row_starts_it_first() {
    let api = seeded();
    let recorder = Arc::new(Recorder::default());
    let mut board = dashboard(&api, &recorder);

    board.attend(1).await.unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    let Call::UpdateAttendance(update) = &calls[0] else {
        panic!("expected status update");
    };
    assert_eq!(update.status, Some(AttendanceStatus::InProgress));
    assert_eq!(recorder.routes(), vec![Route::Attendance(1)]);
}

#[tokio::test]
async fn failed_attend_does_not_navigate() {
    let api = seeded();
    api.fail_status_update(409, None);
    let recorder = Arc::new(Recorder::default());
    let mut board = dashboard(&api, &recorder);

    assert!(board.attend(1).await.is_err());
    assert!(recorder.routes().is_empty());
    assert_eq!(recorder.notifications()[0].level, Level::Error);
}

#[tokio::test]
async fn attend_requires_assignment() {
    let api = FakeApi::with_attendances(vec![attendance(
        1,
        AttendanceStatus::Confirmed,
        OTHER_DOCTOR_ID,
    )]);
    let recorder = Arc::new(Recorder::default());
    let mut board = Dashboard::new(
        Arc::new(api.clone()),
        doctor_session(),
        services(&recorder),
        vec![attendance(1, AttendanceStatus::Confirmed, OTHER_DOCTOR_ID)],
    );

    assert!(matches!(
        board.attend(1).await.unwrap_err(),
        WorkflowError::NotAssigned(1)
    ));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn cancel_with_empty_reason_sends_nothing() {
    let api = seeded();
    let recorder = Arc::new(Recorder::default());
    let mut board = dashboard(&api, &recorder);

    board.open_cancel(1).unwrap();
    assert_eq!(board.modal().header(), "Cancel an appointment");
    assert_eq!(board.modal().size(), ModalSize::Lg);
    assert!(board.modal().is_confirmation());

    let err = board.submit_modal().await.unwrap_err();
    let WorkflowError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(errors.message_for("cancellationReason"), Some(REASON_REQUIRED));
    assert!(api.calls().is_empty());
    assert!(board.modal().is_visible());
}

#[tokio::test]
async fn cancel_sends_one_update_then_one_refetch() {
    let api = seeded();
    let recorder = Arc::new(Recorder::default());
    let mut board = dashboard(&api, &recorder);

    board.open_cancel(1).unwrap();
    let SelectedAppointment::Cancel(form) = board.form_mut() else {
        panic!("cancel form expected");
    };
    form.reason = "Patient asked to cancel".into();
    board.submit_modal().await.unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    let Call::UpdateAttendance(update) = &calls[0] else {
        panic!("expected update first");
    };
    assert_eq!(update.status, Some(AttendanceStatus::Canceled));
    assert_eq!(
        update.cancellation_reason,
        Some(Some("Patient asked to cancel".to_string()))
    );
    assert_eq!(calls[1], Call::ListAttendances);

    assert_eq!(board.attendances()[0].status, AttendanceStatus::Canceled);
    assert!(!board.modal().is_visible());
    assert_eq!(board.modal().selected(), &SelectedAppointment::None);
    assert_eq!(recorder.notifications()[0].title, ATTENDANCE_CANCELED);
}

#[tokio::test]
async fn rejected_cancel_keeps_list_and_modal() {
    let api = seeded();
    api.fail_status_update(422, Some("Attendance cannot be canceled"));
    let recorder = Arc::new(Recorder::default());
    let mut board = dashboard(&api, &recorder);

    board.open_cancel(1).unwrap();
    if let SelectedAppointment::Cancel(form) = board.form_mut() {
        form.reason = "Clash".into();
    }
    assert!(board.submit_modal().await.is_err());

    assert_eq!(api.count(|c| *c == Call::ListAttendances), 0);
    assert!(board.modal().is_visible());
    assert_eq!(board.attendances()[0].status, AttendanceStatus::Confirmed);
    assert_eq!(
        recorder.notifications()[0].message.as_deref(),
        Some("Attendance cannot be canceled")
    );
}

#[test]
fn cancel_and_reschedule_only_open_on_confirmed_rows() {
    let api = seeded();
    let recorder = Arc::new(Recorder::default());
    let mut board = dashboard(&api, &recorder);

    assert!(matches!(board.open_cancel(2), Err(WorkflowError::Core(_))));
    assert!(matches!(board.open_reschedule(3), Err(WorkflowError::Core(_))));
    assert!(matches!(board.open_cancel(42), Err(WorkflowError::NotFound(42))));
    assert!(!board.modal().is_visible());
}

#[tokio::test]
async fn reschedule_keeps_status_and_clears_reason() {
    let api = seeded();
    let recorder = Arc::new(Recorder::default());
    let mut board = dashboard(&api, &recorder);

    board.open_reschedule(1).unwrap();
    assert_eq!(board.modal().header(), "Reschedule an appointment");
    let SelectedAppointment::Reschedule(form) = board.form_mut() else {
        panic!("reschedule form expected");
    };
    assert!(form.date.is_none());

    let err = board.submit_modal().await.unwrap_err();
    let WorkflowError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(errors.message_for("date"), Some(DATE_REQUIRED));

    if let SelectedAppointment::Reschedule(form) = board.form_mut() {
        form.date = Some(zoned("2026-10-20T09:45:00-03:00[-03:00]"));
    }
    board.submit_modal().await.unwrap();

    let calls = api.calls();
    let Call::UpdateAttendance(update) = &calls[0] else {
        panic!("expected update");
    };
    assert_eq!(update.status, Some(AttendanceStatus::Confirmed));
    assert_eq!(update.cancellation_reason, Some(None));
    assert_eq!(
        update.date,
        Some("2026-10-20T12:45:00Z".parse().unwrap())
    );
    assert_eq!(api.count(|c| *c == Call::ListAttendances), 1);
}

#[tokio::test]
async fn reschedule_rejects_weekends_and_off_grid_times() {
    let api = seeded();
    let recorder = Arc::new(Recorder::default());
    let mut board = dashboard(&api, &recorder);
    board.open_reschedule(1).unwrap();

    for date in [
        "2026-10-17T09:00:00-03:00[-03:00]",
        "2026-10-20T09:10:00-03:00[-03:00]",
        "2026-10-15T09:00:00-03:00[-03:00]",
    ] {
        if let SelectedAppointment::Reschedule(form) = board.form_mut() {
            form.date = Some(zoned(date));
        }
        assert!(
            matches!(board.submit_modal().await, Err(WorkflowError::Validation(_))),
            "{date} should be refused"
        );
    }
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn create_loads_lookups_and_filters_professionals_by_type() {
    let api = seeded();
    let recorder = Arc::new(Recorder::default());
    let mut board = dashboard(&api, &recorder);

    board.open_create().await.unwrap();
    assert_eq!(
        api.calls(),
        vec![Call::ListPatients, Call::ListProfessionals]
    );
    assert_eq!(board.modal().size(), ModalSize::FourXl);
    assert!(!board.modal().is_confirmation());

    board.set_create_kind(AttendanceType::Triage);
    let options = board.professional_options();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].value, NURSE_ID);

    board.set_create_kind(AttendanceType::Consultation);
    let ids: Vec<u64> = board.professional_options().iter().map(|o| o.value).collect();
    assert_eq!(ids, vec![DOCTOR_ID, OTHER_DOCTOR_ID]);
    assert_eq!(board.patient_options().len(), 2);
}

#[tokio::test]
async fn changing_type_drops_an_ineligible_professional() {
    let api = seeded();
    let recorder = Arc::new(Recorder::default());
    let mut board = dashboard(&api, &recorder);
    board.open_create().await.unwrap();

    board.set_create_kind(AttendanceType::Consultation);
    if let SelectedAppointment::Create(form) = board.form_mut() {
        form.professional_id = Some(DOCTOR_ID);
    }
    board.set_create_kind(AttendanceType::Triage);

    let SelectedAppointment::Create(form) = board.modal().selected() else {
        panic!("create form expected");
    };
    assert_eq!(form.professional_id, None);
}

#[tokio::test]
async fn create_submits_and_refetches() {
    let api = seeded();
    let recorder = Arc::new(Recorder::default());
    let mut board = dashboard(&api, &recorder);
    board.open_create().await.unwrap();

    board.set_create_kind(AttendanceType::Triage);
    if let SelectedAppointment::Create(form) = board.form_mut() {
        form.professional_id = Some(NURSE_ID);
        form.patient_id = Some(2);
        form.date = Some(zoned("2026-10-16T15:00:00-03:00[-03:00]"));
    }
    board.submit_modal().await.unwrap();

    let calls = api.calls();
    let Call::Create(body) = &calls[2] else {
        panic!("expected create, got {calls:?}");
    };
    assert_eq!(body.kind, AttendanceType::Triage);
    assert_eq!(body.professional_id, NURSE_ID);
    assert_eq!(body.patient_id, 2);
    assert_eq!(calls[3], Call::ListAttendances);
    assert_eq!(recorder.notifications()[0].title, ATTENDANCE_CREATED);
    assert!(!board.modal().is_visible());
}

#[tokio::test]
async fn create_requires_every_field() {
    let api = seeded();
    let recorder = Arc::new(Recorder::default());
    let mut board = dashboard(&api, &recorder);
    board.open_create().await.unwrap();

    let WorkflowError::Validation(errors) = board.submit_modal().await.unwrap_err() else {
        panic!("expected validation error");
    };
    assert_eq!(errors.errors().len(), 4);
    assert_eq!(api.count(|c| matches!(c, Call::Create(_))), 0);
}

#[tokio::test]
async fn not_attended_uses_the_fixed_reason() {
    let api = seeded();
    let recorder = Arc::new(Recorder::default());
    let mut board = dashboard(&api, &recorder);

    board.not_attended(1).await.unwrap();

    let calls = api.calls();
    let Call::UpdateAttendance(update) = &calls[0] else {
        panic!("expected update");
    };
    assert_eq!(update.status, Some(AttendanceStatus::NotAttended));
    assert_eq!(
        update.cancellation_reason,
        Some(Some(NOT_ATTENDED_REASON.to_string()))
    );
    assert_eq!(api.count(|c| *c == Call::ListAttendances), 1);
    assert!(board.not_attended(2).await.is_err());
}

#[tokio::test]
async fn front_desk_cannot_attend() {
    let api = seeded();
    let recorder = Arc::new(Recorder::default());
    let mut board = Dashboard::new(
        Arc::new(api.clone()),
        front_desk_session(),
        services(&recorder),
        vec![attendance(1, AttendanceStatus::Confirmed, DOCTOR_ID)],
    );

    assert_eq!(board.rows()[0].actions.attend, ActionState::Hidden);
    assert!(matches!(
        board.attend(1).await.unwrap_err(),
        WorkflowError::Forbidden(Capability::ManageAttendances)
    ));
}

#[test]
fn medical_records_and_close_modal() {
    let api = seeded();
    let recorder = Arc::new(Recorder::default());
    let mut board = dashboard(&api, &recorder);

    board.open_medical_records(3).unwrap();
    assert_eq!(recorder.routes(), vec![Route::PatientRecords(1)]);

    board.open_cancel(1).unwrap();
    board.close_modal();
    assert_eq!(board.modal().selected(), &SelectedAppointment::None);
    assert!(!board.modal().is_visible());
}

#[test]
fn export_writes_the_loaded_list_without_network() {
    let api = seeded();
    let recorder = Arc::new(Recorder::default());
    let board = dashboard(&api, &recorder);

    let file = board.export().unwrap();
    let expected_millis = NOW.parse::<Zoned>().unwrap().timestamp().as_millisecond();
    assert_eq!(
        file.file_name,
        format!("attendances_export_{expected_millis}.xlsx")
    );
    assert_eq!(&file.bytes[..2], b"PK");
    assert_eq!(recorder.downloads.lock().unwrap().len(), 1);
    assert!(api.calls().is_empty());
}
