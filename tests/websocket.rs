#![cfg(feature = "tungstenite")]
//! End-to-end tests for the `tokio-tungstenite` adapter over an in-memory
//! duplex stream.

use futures::{SinkExt, StreamExt};
use tokio::io::{DuplexStream, duplex};
use tokio_tungstenite::{
    WebSocketStream,
    tungstenite::{Message, protocol::Role},
};
use tokio_util::sync::CancellationToken;
use wsframe::{
    FragmentKind,
    FragmentWriter,
    FrameSink,
    FrameSource,
    FramingError,
    LogicalMessage,
    TransportError,
    ws,
};

async fn socket_pair() -> (WebSocketStream<DuplexStream>, WebSocketStream<DuplexStream>) {
    let (client_io, server_io) = duplex(1 << 20);
    let client = WebSocketStream::from_raw_socket(client_io, Role::Client, None).await;
    let server = WebSocketStream::from_raw_socket(server_io, Role::Server, None).await;
    (client, server)
}

#[tokio::test]
async fn receives_text_and_binary_from_a_peer() {
    let (mut client, server) = socket_pair().await;
    let (reader, _writer) = ws::split(server);
    let mut sink = FrameSink::new(reader);
    let cancel = CancellationToken::new();

    let large = vec![0xAB_u8; 12 * 1024];
    client.send(Message::text("hello")).await.expect("send text");
    client
        .send(Message::binary(large.clone()))
        .await
        .expect("send binary");

    let first = sink.receive_next(&cancel).await.expect("text message");
    let second = sink.receive_next(&cancel).await.expect("binary message");
    assert_eq!(first, LogicalMessage::Text("hello".into()));
    assert_eq!(second, LogicalMessage::Binary(large));
}

#[tokio::test]
async fn control_frames_are_skipped() {
    let (mut client, server) = socket_pair().await;
    let (reader, _writer) = ws::split(server);
    let mut sink = FrameSink::new(reader);

    client
        .send(Message::Ping(vec![1_u8].into()))
        .await
        .expect("send ping");
    client.send(Message::text("after")).await.expect("send text");

    let message = sink
        .receive_next(&CancellationToken::new())
        .await
        .expect("text message");
    assert_eq!(message.as_text(), Some("after"));
}

#[tokio::test]
async fn peer_close_is_reported() {
    let (mut client, server) = socket_pair().await;
    let (reader, _writer) = ws::split(server);
    let mut sink = FrameSink::new(reader);

    client.send(Message::Close(None)).await.expect("send close");

    let message = sink
        .receive_next(&CancellationToken::new())
        .await
        .expect("close");
    assert_eq!(message, LogicalMessage::ConnectionClosed);
}

#[tokio::test]
async fn sent_text_reaches_the_peer() {
    let (mut client, server) = socket_pair().await;
    let (_reader, writer) = ws::split(server);
    let mut source = FrameSource::new(writer);

    source
        .send_text("pong", &CancellationToken::new())
        .await
        .expect("send text");

    let received = client
        .next()
        .await
        .expect("client stream open")
        .expect("valid message");
    assert_eq!(received, Message::text("pong"));
}

#[tokio::test]
async fn dropped_peer_fails_the_read() {
    let (client, server) = socket_pair().await;
    let (reader, _writer) = ws::split(server);
    let mut sink = FrameSink::new(reader);
    drop(client);

    let err = sink
        .receive_next(&CancellationToken::new())
        .await
        .expect_err("read from dropped peer must fail");
    assert!(matches!(err, FramingError::TransportReadFailure(_)));
}

#[tokio::test]
async fn non_final_writes_are_unsupported() {
    let (_client, server) = socket_pair().await;
    let (_reader, mut writer) = ws::split(server);

    let err = writer
        .write_fragment(b"part", FragmentKind::Text, false)
        .await
        .expect_err("fragmented writes are not supported");
    assert!(matches!(err, TransportError::Unsupported(_)));
}
