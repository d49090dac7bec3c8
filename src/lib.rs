#![doc(html_root_url = "https://docs.rs/wsframe/latest")]
//! Public API for the `wsframe` library.
//!
//! `wsframe` turns the fragment stream of an established, message-oriented
//! transport (typically a WebSocket) into complete logical messages, and
//! turns outbound messages back into single transport writes.
//!
//! - [`FrameSink`] owns the read half and reassembles fragments.
//! - [`FrameSource`] owns the write half and sends whole messages.
//!
//! The two halves are independent values, so one task may receive while
//! another sends on the same connection.

pub mod config;
pub mod error;
pub mod message;
pub mod metrics;
pub mod sink;
pub mod source;
pub mod transport;
#[cfg(feature = "tungstenite")]
pub mod ws;

pub use config::SessionConfig;
pub use error::{FramingError, Result, TransportError};
pub use message::{LogicalMessage, MessageKind};
pub use sink::FrameSink;
pub use source::FrameSource;
pub use transport::{FragmentKind, FragmentReader, FragmentReceipt, FragmentWriter};
