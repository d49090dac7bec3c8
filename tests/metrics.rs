#![cfg(feature = "metrics")]
//! Tests for `wsframe` metrics helpers.
//!
//! These tests verify that counters update as expected using
//! `metrics_util::debugging::DebuggingRecorder`.

use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use rstest::rstest;
use wsframe::{
    FramingError,
    MessageKind,
    metrics::{self as wsmetrics, Direction},
};

/// Creates a debugging recorder and snapshotter for metrics testing.
fn debugging_recorder_setup() -> (Snapshotter, DebuggingRecorder) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    (snapshotter, recorder)
}

fn counter_recorded(snapshotter: &Snapshotter, name: &str, label: (&str, &str)) -> bool {
    snapshotter.snapshot().into_vec().iter().any(|(k, _, _, v)| {
        k.key().name() == name
            && k.key()
                .labels()
                .any(|l| l.key() == label.0 && l.value() == label.1)
            && matches!(v, DebugValue::Counter(c) if *c > 0)
    })
}

#[rstest]
#[case(Direction::Inbound, "inbound")]
#[case(Direction::Outbound, "outbound")]
fn fragment_metric_increments(#[case] direction: Direction, #[case] label: &str) {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || wsmetrics::inc_fragments(direction));

    assert!(
        counter_recorded(&snapshotter, wsmetrics::FRAGMENTS_TOTAL, ("direction", label)),
        "{label} fragment metric not recorded"
    );
}

#[test]
fn message_metric_carries_kind() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        wsmetrics::inc_messages(Direction::Inbound, MessageKind::Binary);
    });

    assert!(
        counter_recorded(&snapshotter, wsmetrics::MESSAGES_TOTAL, ("kind", "binary")),
        "binary message metric not recorded"
    );
}

#[test]
fn error_metric_is_labelled() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        wsmetrics::inc_errors(&FramingError::UnexpectedFrameKind(0x3));
    });

    assert!(
        counter_recorded(
            &snapshotter,
            wsmetrics::ERRORS_TOTAL,
            ("error", "unexpected_frame_kind")
        ),
        "error metric not recorded"
    );
}
