//! Integration tests for the send side.

use rstest::rstest;
use tokio_util::sync::CancellationToken;
use wsframe::{FragmentKind, FrameSource, FramingError, TransportError};
use wsframe_testing::{RecordingWriter, WriteMode, WrittenFragment, cancel_token};

#[rstest]
#[tokio::test]
async fn send_text_issues_one_final_text_write(cancel_token: CancellationToken) {
    let writer = RecordingWriter::new();
    let log = writer.log();
    let mut source = FrameSource::new(writer);

    source
        .send_text("héllo", &cancel_token)
        .await
        .expect("send succeeds");

    assert_eq!(
        log.fragments(),
        vec![WrittenFragment {
            payload: "héllo".as_bytes().to_vec(),
            kind: FragmentKind::Text,
            end_of_message: true,
        }]
    );
}

#[rstest]
#[tokio::test]
async fn send_binary_and_close_are_single_writes(cancel_token: CancellationToken) {
    let writer = RecordingWriter::new();
    let log = writer.log();
    let mut source = FrameSource::new(writer);

    source
        .send_binary(&[7, 8, 9], &cancel_token)
        .await
        .expect("binary send succeeds");
    source.close(&cancel_token).await.expect("close succeeds");

    let written = log.fragments();
    assert_eq!(written.len(), 2);
    assert_eq!(written[0].kind, FragmentKind::Binary);
    assert_eq!(written[0].payload, vec![7, 8, 9]);
    assert_eq!(written[1].kind, FragmentKind::Close);
    assert!(written[1].payload.is_empty());
    assert!(written.iter().all(|fragment| fragment.end_of_message));
}

#[rstest]
#[tokio::test]
async fn closed_transport_fails_the_write(cancel_token: CancellationToken) {
    let mut source = FrameSource::new(RecordingWriter::with_mode(WriteMode::Closed));

    let err = source
        .send_text("lost", &cancel_token)
        .await
        .expect_err("closed transport must fail");
    assert!(matches!(
        err,
        FramingError::TransportWriteFailure(TransportError::Closed)
    ));
    assert!(!err.is_cancelled());
}

#[rstest]
#[tokio::test]
async fn cancelled_token_fails_before_writing(cancel_token: CancellationToken) {
    let writer = RecordingWriter::new();
    let log = writer.log();
    let mut source = FrameSource::new(writer);
    cancel_token.cancel();

    let err = source
        .send_text("never", &cancel_token)
        .await
        .expect_err("cancelled send must fail");
    assert!(matches!(
        err,
        FramingError::TransportWriteFailure(TransportError::Cancelled)
    ));
    assert!(err.is_cancelled());
    assert!(log.fragments().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancellation_unblocks_a_stalled_write() {
    let mut source = FrameSource::new(RecordingWriter::with_mode(WriteMode::Stall));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        trigger.cancel();
    });

    let err = source
        .send_text("stuck", &cancel)
        .await
        .expect_err("stalled send must be cancelled");
    assert!(err.is_cancelled());
}
