//! Metric helpers for `wsframe`.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. With the `metrics` feature
//! disabled the helpers compile to no-ops.

#[cfg(feature = "metrics")]
use metrics::counter;

use crate::{error::FramingError, message::MessageKind};

/// Name of the counter tracking transport fragments read or written.
pub const FRAGMENTS_TOTAL: &str = "wsframe_fragments_total";
/// Name of the counter tracking complete logical messages.
pub const MESSAGES_TOTAL: &str = "wsframe_messages_total";
/// Name of the counter tracking framing errors.
pub const ERRORS_TOTAL: &str = "wsframe_errors_total";

/// Direction of message flow.
#[derive(Clone, Copy, Debug)]
pub enum Direction {
    /// Received from the peer.
    Inbound,
    /// Sent to the peer.
    Outbound,
}

impl Direction {
    #[cfg_attr(not(feature = "metrics"), allow(dead_code))]
    fn as_str(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

/// Record a fragment for the given direction.
pub fn inc_fragments(direction: Direction) {
    #[cfg(feature = "metrics")]
    {
        counter!(FRAGMENTS_TOTAL, "direction" => direction.as_str()).increment(1);
    }
    #[cfg(not(feature = "metrics"))]
    let _ = direction;
}

/// Record a complete message of `kind` for the given direction.
pub fn inc_messages(direction: Direction, kind: MessageKind) {
    #[cfg(feature = "metrics")]
    {
        counter!(
            MESSAGES_TOTAL,
            "direction" => direction.as_str(),
            "kind" => kind.as_str()
        )
        .increment(1);
    }
    #[cfg(not(feature = "metrics"))]
    let _ = (direction, kind);
}

/// Record a framing error, labelled by its kind.
pub fn inc_errors(error: &FramingError) {
    #[cfg(feature = "metrics")]
    {
        counter!(ERRORS_TOTAL, "error" => error.label()).increment(1);
    }
    #[cfg(not(feature = "metrics"))]
    let _ = error;
}
