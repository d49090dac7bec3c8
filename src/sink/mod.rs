//! Receive-side reassembly of transport fragments into logical messages.
//!
//! [`FrameSink`] is the per-connection session. It owns the read half of the
//! transport together with two accumulation buffers (text and binary) and a
//! fixed-size scratch buffer every fragment is staged in. Each call to
//! [`FrameSink::receive_next`] starts from empty buffers, reads fragments
//! until one is flagged final, and returns exactly one [`LogicalMessage`].
//! Fragments of the following message are never read ahead. A message
//! abandoned part-way by an error is drained up to its final fragment on the
//! next call.

mod text;

use std::io;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use self::text::TextAccumulator;
use crate::{
    config::SessionConfig,
    error::{FramingError, Result, TransportError},
    message::{LogicalMessage, MessageKind},
    metrics::{self, Direction},
    transport::{FragmentKind, FragmentReader, FragmentReceipt},
};

/// Per-connection reassembly session.
#[derive(Debug)]
pub struct FrameSink<R> {
    reader: R,
    config: SessionConfig,
    text: TextAccumulator,
    binary: Vec<u8>,
    scratch: Box<[u8]>,
    discarding: bool,
}

impl<R: FragmentReader> FrameSink<R> {
    /// Create a session over `reader` with the default [`SessionConfig`].
    #[must_use]
    pub fn new(reader: R) -> Self { Self::with_config(reader, SessionConfig::default()) }

    /// Create a session over `reader` with explicit limits.
    #[must_use]
    pub fn with_config(reader: R, config: SessionConfig) -> Self {
        Self {
            reader,
            config,
            text: TextAccumulator::default(),
            binary: Vec::new(),
            scratch: vec![0; config.scratch_capacity.get()].into_boxed_slice(),
            discarding: false,
        }
    }

    /// Receive the next complete logical message.
    ///
    /// Suspends until the transport delivers a fragment flagged as final or
    /// `cancel` fires. A peer close yields [`LogicalMessage::ConnectionClosed`].
    ///
    /// # Errors
    ///
    /// - [`FramingError::Cancelled`] when `cancel` fires first.
    /// - [`FramingError::ProtocolViolation`] when a fragment changes type
    ///   mid-message. The session stays usable for the next message.
    /// - [`FramingError::UnexpectedFrameKind`] when the transport reports an
    ///   unknown fragment kind. The session should be discarded.
    /// - [`FramingError::InvalidUtf8`] when text fragments do not decode.
    /// - [`FramingError::MessageTooLarge`] when the message exceeds
    ///   [`SessionConfig::max_message_size`].
    /// - [`FramingError::CloseMidMessage`] when a close arrives part-way
    ///   through a message.
    /// - [`FramingError::TransportReadFailure`] when the transport read fails.
    ///
    /// When a recoverable error or cancellation abandons a message before its
    /// final fragment, the next call first reads and drops the remaining
    /// fragments of that message, so they never surface as a message of their
    /// own.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn receive_next(&mut self, cancel: &CancellationToken) -> Result<LogicalMessage> {
        let result = self.assemble(cancel).await;
        match &result {
            Ok(LogicalMessage::ConnectionClosed) => {}
            Ok(message) => {
                if let Some(kind) = message.kind() {
                    metrics::inc_messages(Direction::Inbound, kind);
                }
            }
            Err(err) => metrics::inc_errors(err),
        }
        result
    }

    async fn assemble(&mut self, cancel: &CancellationToken) -> Result<LogicalMessage> {
        if self.discarding && self.discard_remainder(cancel).await? {
            return Ok(LogicalMessage::ConnectionClosed);
        }
        self.text.clear();
        self.binary.clear();
        let mut established: Option<MessageKind> = None;

        loop {
            let receipt = match self.read(cancel).await {
                Err(FramingError::Cancelled) if established.is_some() => {
                    self.discarding = true;
                    return Err(FramingError::Cancelled);
                }
                res => res?,
            };

            let kind = match receipt.kind {
                FragmentKind::Close => return self.on_close(established),
                FragmentKind::Text => MessageKind::Text,
                FragmentKind::Binary => MessageKind::Binary,
                FragmentKind::Unrecognised(opcode) => {
                    warn!(opcode, "transport reported unknown fragment kind");
                    return Err(FramingError::UnexpectedFrameKind(opcode));
                }
            };

            if let Err(err) = self.append(established, kind, receipt.len) {
                // Unread fragments of this message are dropped by the next call.
                self.discarding = !receipt.end_of_message;
                return Err(err);
            }
            established = Some(kind);

            if receipt.end_of_message {
                return self.finish(kind);
            }
        }
    }

    /// Read one fragment into the scratch buffer, racing `cancel`.
    async fn read(&mut self, cancel: &CancellationToken) -> Result<FragmentReceipt> {
        let receipt = tokio::select! {
            biased;

            () = cancel.cancelled() => return Err(FramingError::Cancelled),

            res = self.reader.read_fragment(&mut self.scratch) => {
                res.map_err(FramingError::TransportReadFailure)?
            }
        };

        if receipt.len > self.scratch.len() {
            return Err(FramingError::TransportReadFailure(TransportError::Io(
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    "fragment length exceeds read buffer",
                ),
            )));
        }
        metrics::inc_fragments(Direction::Inbound);
        trace!(
            len = receipt.len,
            kind = ?receipt.kind,
            end_of_message = receipt.end_of_message,
            "fragment received"
        );
        Ok(receipt)
    }

    /// Drop the fragments left over from an abandoned message.
    ///
    /// Returns `true` when the peer closed the connection instead of
    /// finishing that message.
    async fn discard_remainder(&mut self, cancel: &CancellationToken) -> Result<bool> {
        debug!("discarding remainder of abandoned message");
        loop {
            let receipt = self.read(cancel).await?;
            match receipt.kind {
                FragmentKind::Close => {
                    self.discarding = false;
                    debug!("peer closed the connection");
                    return Ok(true);
                }
                FragmentKind::Unrecognised(opcode) => {
                    warn!(opcode, "transport reported unknown fragment kind");
                    return Err(FramingError::UnexpectedFrameKind(opcode));
                }
                FragmentKind::Text | FragmentKind::Binary => {}
            }
            if receipt.end_of_message {
                self.discarding = false;
                return Ok(false);
            }
        }
    }

    /// Check `kind` and the size cap, then append the staged payload.
    fn append(
        &mut self,
        established: Option<MessageKind>,
        kind: MessageKind,
        len: usize,
    ) -> Result<()> {
        if let Some(established) = established
            && established != kind
        {
            warn!(%established, found = %kind, "fragment type changed mid-message");
            return Err(FramingError::ProtocolViolation {
                established,
                found: kind,
            });
        }

        let attempted = self.buffered_len().saturating_add(len);
        let limit = self.config.max_message_size.get();
        if attempted > limit {
            return Err(FramingError::MessageTooLarge { attempted, limit });
        }

        let payload = &self.scratch[..len];
        match kind {
            MessageKind::Text if !payload.is_empty() => self.text.push(payload)?,
            MessageKind::Text => {}
            MessageKind::Binary => self.binary.extend_from_slice(payload),
        }
        Ok(())
    }

    fn on_close(&self, established: Option<MessageKind>) -> Result<LogicalMessage> {
        let buffered = self.buffered_len();
        if established.is_some() || buffered > 0 {
            warn!(buffered, "close frame arrived inside a partial message");
            return Err(FramingError::CloseMidMessage { buffered });
        }
        debug!("peer closed the connection");
        Ok(LogicalMessage::ConnectionClosed)
    }

    fn finish(&mut self, kind: MessageKind) -> Result<LogicalMessage> {
        let message = match kind {
            MessageKind::Text => LogicalMessage::Text(self.text.finish()?),
            MessageKind::Binary => LogicalMessage::Binary(std::mem::take(&mut self.binary)),
        };
        debug!(%message, "message assembled");
        Ok(message)
    }
}

impl<R> FrameSink<R> {
    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig { &self.config }

    /// Bytes of a partial message currently held in the accumulation buffers.
    #[must_use]
    pub fn buffered_len(&self) -> usize { self.text.len() + self.binary.len() }

    /// Returns true when the next receive must first drop the rest of an
    /// abandoned message.
    #[must_use]
    pub const fn is_discarding(&self) -> bool { self.discarding }

    /// Borrow the underlying reader.
    #[must_use]
    pub const fn get_ref(&self) -> &R { &self.reader }

    /// Mutably borrow the underlying reader.
    pub fn get_mut(&mut self) -> &mut R { &mut self.reader }

    /// Discard the session, returning the reader.
    #[must_use]
    pub fn into_inner(self) -> R { self.reader }
}
