mod common;

use emed_core::models::attendance::AttendanceStatus;
use emed_core::routes::Route;
use emed_core::session::AuthToken;
use emed_workflow::entry::{PageLoad, load_attendance, load_dashboard};

use common::*;

#[tokio::test]
async fn no_token_redirects_without_a_request() {
    let api = FakeApi::with_attendances(vec![attendance(1, AttendanceStatus::Confirmed, DOCTOR_ID)]);

    let page = load_dashboard(&api, None).await.unwrap();
    assert_eq!(page, PageLoad::Redirect(Route::Login));
    let page = load_attendance(&api, AuthToken::new("  ").as_ref(), 1)
        .await
        .unwrap();
    assert_eq!(page, PageLoad::Redirect(Route::Login));

    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn token_loads_the_page_data() {
    let api = FakeApi::with_attendances(vec![with_record(attendance(
        4,
        AttendanceStatus::InProgress,
        DOCTOR_ID,
    ))]);
    let token = AuthToken::new("session-token-1234");

    let list = load_dashboard(&api, token.as_ref())
        .await
        .unwrap()
        .into_render()
        .unwrap();
    assert_eq!(list.len(), 1);

    let one = load_attendance(&api, token.as_ref(), 4)
        .await
        .unwrap()
        .into_render()
        .unwrap();
    assert!(one.medical_record.is_some());
    assert_eq!(api.calls(), vec![Call::ListAttendances, Call::GetAttendance(4)]);
}

#[tokio::test]
async fn rejected_token_redirects_to_login() {
    let api = FakeApi::default();
    api.reject_token();
    let token = AuthToken::new("expired-token-0000");

    let page = load_dashboard(&api, token.as_ref()).await.unwrap();
    assert_eq!(page, PageLoad::Redirect(Route::Login));
}

#[tokio::test]
async fn other_failures_are_returned() {
    let api = FakeApi::default();
    let token = AuthToken::new("session-token-1234");

    assert!(load_attendance(&api, token.as_ref(), 99).await.is_err());
}
