#![allow(clippy::unwrap_used, clippy::expect_used)]

use docanchor_core::errors::{AnchorError, ExError, ExErrorKind};
use docanchor_core::logging_facility::test_capture::init_test_capture;
use docanchor_core::{log_op_end, log_op_error, log_op_start};
use docanchor_core::core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use tracing::Level;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, digest = "abc");

    let starts: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START))
        .collect();

    assert_eq!(starts.len(), 1);
    assert_eq!(starts[0].digest.as_deref(), Some("abc"));
    assert_eq!(starts[0].level, Level::INFO);
}

#[test]
fn test_log_op_end_macro_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42u64, outcome = "OK");

    let ends: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].fields.get("duration_ms"), Some(&"42".to_string()));
    assert_eq!(ends[0].outcome.as_deref(), Some("OK"));
}

#[test]
fn test_log_op_error_includes_code_and_level() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = AnchorError::Io {
        message: "stream closed".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10u64);

    let errors: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].level, Level::ERROR);
    assert_eq!(errors[0].fields.get("err.code"), Some(&"ERR_IO".to_string()));
    assert_eq!(
        errors[0].fields.get("err.message"),
        Some(&"stream closed".to_string())
    );
}

#[test]
fn test_log_op_error_accepts_ex_error_directly() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    let err = ExError::new(ExErrorKind::Connectivity).with_message("refused");
    log_op_error!(op_name, err, duration_ms = 1u64);

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
}

#[test]
fn test_component_is_module_path() {
    let capture = init_test_capture();
    let op_name = "test_component_unique_5";

    log_op_start!(op_name);

    let event = capture
        .events()
        .into_iter()
        .find(|e| e.op.as_deref() == Some(op_name))
        .expect("start event captured");
    assert_eq!(event.component.as_deref(), Some(module_path!()));
}
