use axum::{body::to_bytes, http::StatusCode};
use clinic_slots_api::middleware::error_handling::{AppError, map_error};
use clinic_slots_core::errors::SchedulingError;
use rstest::rstest;

#[rstest]
#[case(SchedulingError::NotFound("Appointment not found".to_string()), StatusCode::NOT_FOUND)]
#[case(SchedulingError::Validation("Invalid input".to_string()), StatusCode::BAD_REQUEST)]
#[case(SchedulingError::Conflict("Slot taken".to_string()), StatusCode::CONFLICT)]
#[case(SchedulingError::Database(eyre::eyre!("Database error")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(
    SchedulingError::Internal(Box::new(std::io::Error::new(std::io::ErrorKind::Other, "Internal error"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
#[tokio::test]
async fn test_error_status_mapping(#[case] error: SchedulingError, #[case] expected: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_error_body_is_json() {
    let response = map_error(SchedulingError::Conflict("Slot 09:00-09:30 is not available".to_string()));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["error"], "Conflict: Slot 09:00-09:30 is not available");
}

#[tokio::test]
async fn test_eyre_report_becomes_database_error() {
    let error: AppError = eyre::eyre!("pool exhausted").into();

    assert!(matches!(error.0, SchedulingError::Database(_)));
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
