//! Transport adapter for `tokio-tungstenite` sockets.
//!
//! `tungstenite` hands out whole messages, so [`WsReader`] re-fragments each
//! one into slices no larger than the caller's read buffer, flagging only the
//! last slice as final. Ping and pong control messages are answered by
//! `tungstenite` itself and never reach the framing layer.
//!
//! ```no_run
//! use tokio_tungstenite::connect_async;
//! use tokio_util::sync::CancellationToken;
//! use wsframe::{FrameSink, FrameSource, ws};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (socket, _) = connect_async("ws://127.0.0.1:9001").await?;
//! let (reader, writer) = ws::split(socket);
//! let mut sink = FrameSink::new(reader);
//! let mut source = FrameSource::new(writer);
//! let cancel = CancellationToken::new();
//!
//! source.send_text("hello", &cancel).await?;
//! let reply = sink.receive_next(&cancel).await?;
//! # let _ = reply;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use futures::{
    Sink,
    SinkExt,
    Stream,
    StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, trace};

use crate::{
    error::TransportError,
    transport::{FragmentKind, FragmentReader, FragmentReceipt, FragmentWriter},
};

/// Split a WebSocket into independently owned read and write halves.
pub fn split<T>(socket: T) -> (WsReader<SplitStream<T>>, WsWriter<SplitSink<T, Message>>)
where
    T: Stream<Item = Result<Message, WsError>> + Sink<Message, Error = WsError>,
{
    let (sink, stream) = socket.split();
    (WsReader::new(stream), WsWriter::new(sink))
}

/// Read half backed by a stream of `tungstenite` messages.
#[derive(Debug)]
pub struct WsReader<S> {
    stream: S,
    pending: Option<(FragmentKind, Bytes)>,
}

impl<S> WsReader<S> {
    /// Wrap a message stream.
    #[must_use]
    pub const fn new(stream: S) -> Self {
        Self {
            stream,
            pending: None,
        }
    }

    /// Consume the reader, returning the stream.
    ///
    /// Any unread remainder of a partially delivered message is discarded.
    #[must_use]
    pub fn into_inner(self) -> S { self.stream }
}

impl<S> WsReader<S>
where
    S: Stream<Item = Result<Message, WsError>> + Unpin + Send,
{
    async fn next_message(&mut self) -> Result<(FragmentKind, Bytes), TransportError> {
        loop {
            let message = self.stream.next().await.ok_or(TransportError::Closed)??;
            let next = match message {
                Message::Text(text) => (FragmentKind::Text, Bytes::copy_from_slice(text.as_bytes())),
                Message::Binary(bytes) => (FragmentKind::Binary, bytes),
                Message::Close(frame) => {
                    debug!(?frame, "close frame received");
                    (FragmentKind::Close, Bytes::new())
                }
                Message::Ping(_) | Message::Pong(_) => {
                    trace!("control frame skipped");
                    continue;
                }
                Message::Frame(frame) => (
                    FragmentKind::Unrecognised(u8::from(frame.header().opcode)),
                    Bytes::new(),
                ),
            };
            return Ok(next);
        }
    }
}

#[async_trait]
impl<S> FragmentReader for WsReader<S>
where
    S: Stream<Item = Result<Message, WsError>> + Unpin + Send,
{
    async fn read_fragment(&mut self, buf: &mut [u8]) -> Result<FragmentReceipt, TransportError> {
        let (kind, mut payload) = match self.pending.take() {
            Some(pending) => pending,
            None => self.next_message().await?,
        };

        let len = payload.len().min(buf.len());
        let rest = payload.split_off(len);
        buf[..len].copy_from_slice(&payload);

        let end_of_message = rest.is_empty();
        if !end_of_message {
            self.pending = Some((kind, rest));
        }
        Ok(FragmentReceipt::new(len, kind, end_of_message))
    }
}

/// Write half backed by a sink of `tungstenite` messages.
///
/// Each write is sent and flushed before returning. Dropping a write part-way
/// may leave the message queued inside the sink.
#[derive(Debug)]
pub struct WsWriter<S> {
    sink: S,
}

impl<S> WsWriter<S> {
    /// Wrap a message sink.
    #[must_use]
    pub const fn new(sink: S) -> Self { Self { sink } }

    /// Consume the writer, returning the sink.
    #[must_use]
    pub fn into_inner(self) -> S { self.sink }
}

#[async_trait]
impl<S> FragmentWriter for WsWriter<S>
where
    S: Sink<Message, Error = WsError> + Unpin + Send,
{
    async fn write_fragment(
        &mut self,
        payload: &[u8],
        kind: FragmentKind,
        end_of_message: bool,
    ) -> Result<(), TransportError> {
        if !end_of_message {
            return Err(TransportError::Unsupported("fragmented websocket writes"));
        }
        let message = match kind {
            FragmentKind::Text => {
                let text = std::str::from_utf8(payload)
                    .map_err(|_| TransportError::Unsupported("text payload is not UTF-8"))?;
                Message::text(text.to_owned())
            }
            FragmentKind::Binary => Message::binary(payload.to_vec()),
            FragmentKind::Close => Message::Close(None),
            FragmentKind::Unrecognised(_) => {
                return Err(TransportError::Unsupported("unknown fragment kind"));
            }
        };
        self.sink.send(message).await?;
        Ok(())
    }
}
