//! Logical messages produced by reassembly.

use std::fmt;

/// Payload type of a logical message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// UTF-8 text.
    Text,
    /// Opaque bytes.
    Binary,
}

impl MessageKind {
    /// Lower-case name used in logs and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A fully reassembled message, or the peer's close indication.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogicalMessage {
    /// A complete text message.
    Text(String),
    /// A complete binary message.
    Binary(Vec<u8>),
    /// The peer sent a close frame.
    ConnectionClosed,
}

impl LogicalMessage {
    /// Return the payload kind, or `None` for [`LogicalMessage::ConnectionClosed`].
    #[must_use]
    pub const fn kind(&self) -> Option<MessageKind> {
        match self {
            Self::Text(_) => Some(MessageKind::Text),
            Self::Binary(_) => Some(MessageKind::Binary),
            Self::ConnectionClosed => None,
        }
    }

    /// Returns true for the close sentinel.
    #[must_use]
    pub const fn is_closed(&self) -> bool { matches!(self, Self::ConnectionClosed) }

    /// Borrow the text payload, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Borrow the binary payload, if any.
    #[must_use]
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(bytes) => Some(bytes.as_slice()),
            _ => None,
        }
    }

    /// Payload length in bytes; zero for the close sentinel.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Binary(bytes) => bytes.len(),
            Self::ConnectionClosed => 0,
        }
    }

    /// Returns true when the message carries no payload bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl fmt::Display for LogicalMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "text[{}]", text.len()),
            Self::Binary(bytes) => write!(f, "binary[{}]", bytes.len()),
            Self::ConnectionClosed => f.write_str("closed"),
        }
    }
}
