//! Canonical error and result types for the crate.
//!
//! [`FramingError`] is the single surface returned by
//! [`FrameSink`](crate::FrameSink) and [`FrameSource`](crate::FrameSource).
//! [`TransportError`] is what transport implementations report; the framing
//! layer wraps it to record which direction failed.

use std::io;

use thiserror::Error;

use crate::message::MessageKind;

/// Errors reported by a [`FragmentReader`](crate::transport::FragmentReader)
/// or [`FragmentWriter`](crate::transport::FragmentWriter).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection is already closed.
    #[error("connection closed")]
    Closed,
    /// The operation was cancelled before the transport completed it.
    #[error("operation cancelled")]
    Cancelled,
    /// The transport cannot carry the requested write.
    #[error("unsupported transport operation: {0}")]
    Unsupported(&'static str),
    /// Socket-level failure.
    #[error("transport I/O error: {0}")]
    Io(#[from] io::Error),
    /// Failure raised by the WebSocket protocol implementation.
    #[error("websocket error: {0}")]
    WebSocket(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors produced while receiving or sending logical messages.
#[derive(Debug, Error)]
pub enum FramingError {
    /// A fragment switched type part-way through a message.
    #[error("protocol violation: {found} fragment inside a {established} message")]
    ProtocolViolation {
        established: MessageKind,
        found: MessageKind,
    },
    /// The transport reported a fragment kind outside the known set.
    #[error("unexpected frame kind (opcode {0:#x})")]
    UnexpectedFrameKind(u8),
    /// The caller cancelled a pending read.
    #[error("operation cancelled")]
    Cancelled,
    /// The transport failed while reading a fragment.
    #[error("transport read failed: {0}")]
    TransportReadFailure(#[source] TransportError),
    /// The transport could not complete an outbound write.
    #[error("transport write failed: {0}")]
    TransportWriteFailure(#[source] TransportError),
    /// A text fragment contained bytes that are not valid UTF-8.
    #[error("text message is not valid UTF-8")]
    InvalidUtf8,
    /// The assembled message would exceed the configured size cap.
    #[error("message of {attempted} bytes exceeds limit of {limit} bytes")]
    MessageTooLarge { attempted: usize, limit: usize },
    /// A close frame arrived while a message was still being assembled.
    #[error("close frame arrived with {buffered} bytes of a partial message buffered")]
    CloseMidMessage { buffered: usize },
}

impl FramingError {
    /// Returns true when the error stems from caller-requested cancellation.
    ///
    /// Cancellation is expected during shutdown and should not be reported as
    /// a failure.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Cancelled | Self::TransportWriteFailure(TransportError::Cancelled)
        )
    }

    /// Returns true when the session can no longer be trusted and the
    /// connection should be torn down.
    ///
    /// Protocol violations, size overruns and invalid text only abandon the
    /// current message. The next receive drops whatever of that message is
    /// still unread and starts from empty buffers.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::UnexpectedFrameKind(_)
            | Self::TransportReadFailure(_)
            | Self::CloseMidMessage { .. } => true,
            Self::TransportWriteFailure(err) => !matches!(err, TransportError::Cancelled),
            Self::ProtocolViolation { .. }
            | Self::Cancelled
            | Self::InvalidUtf8
            | Self::MessageTooLarge { .. } => false,
        }
    }

    /// Short, stable label used for metrics.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ProtocolViolation { .. } => "protocol_violation",
            Self::UnexpectedFrameKind(_) => "unexpected_frame_kind",
            Self::Cancelled => "cancelled",
            Self::TransportReadFailure(_) => "transport_read",
            Self::TransportWriteFailure(_) => "transport_write",
            Self::InvalidUtf8 => "invalid_utf8",
            Self::MessageTooLarge { .. } => "message_too_large",
            Self::CloseMidMessage { .. } => "close_mid_message",
        }
    }
}

#[cfg(feature = "tungstenite")]
impl From<tokio_tungstenite::tungstenite::Error> for TransportError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(error))
    }
}

/// Canonical result alias used by `wsframe` public APIs.
pub type Result<T> = std::result::Result<T, FramingError>;
