//! Fragment-level transport seam.
//!
//! The framing layer never touches sockets directly. Instead it drives a
//! [`FragmentReader`] and a [`FragmentWriter`], the two halves of an
//! established full-duplex connection. Keeping the halves as separate owned
//! values lets one task read while another writes without any locking.

use async_trait::async_trait;

use crate::{error::TransportError, message::MessageKind};

/// RFC 6455 opcode for a text frame.
pub const OPCODE_TEXT: u8 = 0x1;
/// RFC 6455 opcode for a binary frame.
pub const OPCODE_BINARY: u8 = 0x2;
/// RFC 6455 opcode for a close frame.
pub const OPCODE_CLOSE: u8 = 0x8;

/// Type of a single fragment as reported by the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Part of a text message.
    Text,
    /// Part of a binary message.
    Binary,
    /// The peer's close indication.
    Close,
    /// A kind outside the known set, carrying the raw opcode.
    Unrecognised(u8),
}

impl FragmentKind {
    /// Map a data or close opcode to a fragment kind.
    #[must_use]
    pub const fn from_opcode(opcode: u8) -> Self {
        match opcode {
            OPCODE_TEXT => Self::Text,
            OPCODE_BINARY => Self::Binary,
            OPCODE_CLOSE => Self::Close,
            other => Self::Unrecognised(other),
        }
    }

    /// Raw opcode for this kind.
    #[must_use]
    pub const fn opcode(self) -> u8 {
        match self {
            Self::Text => OPCODE_TEXT,
            Self::Binary => OPCODE_BINARY,
            Self::Close => OPCODE_CLOSE,
            Self::Unrecognised(opcode) => opcode,
        }
    }
}

impl From<MessageKind> for FragmentKind {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Text => Self::Text,
            MessageKind::Binary => Self::Binary,
        }
    }
}

/// Outcome of a single fragment read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentReceipt {
    /// Number of payload bytes written into the caller's buffer.
    pub len: usize,
    /// Transport-reported fragment type.
    pub kind: FragmentKind,
    /// Whether this fragment completes the logical message.
    pub end_of_message: bool,
}

impl FragmentReceipt {
    /// Construct a receipt.
    #[must_use]
    pub const fn new(len: usize, kind: FragmentKind, end_of_message: bool) -> Self {
        Self {
            len,
            kind,
            end_of_message,
        }
    }

    /// Receipt for a payload-free close indication.
    #[must_use]
    pub const fn close() -> Self { Self::new(0, FragmentKind::Close, true) }
}

/// Read half of a message-oriented transport.
#[async_trait]
pub trait FragmentReader: Send {
    /// Read the next fragment into `buf`.
    ///
    /// Implementations copy at most `buf.len()` payload bytes. A fragment
    /// longer than `buf` must be handed out over several reads with only the
    /// last one flagged `end_of_message`.
    ///
    /// The returned future must be cancel-safe: dropping it before it
    /// completes must not lose any fragment data.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the connection fails or is closed.
    async fn read_fragment(&mut self, buf: &mut [u8]) -> Result<FragmentReceipt, TransportError>;
}

/// Write half of a message-oriented transport.
#[async_trait]
pub trait FragmentWriter: Send {
    /// Write `payload` as a single fragment of type `kind`.
    ///
    /// The write either completes in full or fails; callers do not retry
    /// partial writes.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the connection fails, is closed, or
    /// cannot represent the requested fragment.
    async fn write_fragment(
        &mut self,
        payload: &[u8],
        kind: FragmentKind,
        end_of_message: bool,
    ) -> Result<(), TransportError>;
}

#[async_trait]
impl<R: FragmentReader + ?Sized> FragmentReader for Box<R> {
    async fn read_fragment(&mut self, buf: &mut [u8]) -> Result<FragmentReceipt, TransportError> {
        (**self).read_fragment(buf).await
    }
}

#[async_trait]
impl<W: FragmentWriter + ?Sized> FragmentWriter for Box<W> {
    async fn write_fragment(
        &mut self,
        payload: &[u8],
        kind: FragmentKind,
        end_of_message: bool,
    ) -> Result<(), TransportError> {
        (**self).write_fragment(payload, kind, end_of_message).await
    }
}
