//! In-memory transports for exercising `wsframe` in tests.
//!
//! [`ScriptedReader`] replays a fixed list of fragments and then pends
//! forever, which makes cancellation behaviour easy to observe.
//! [`RecordingWriter`] captures every write so tests can assert on exactly
//! what reached the transport.
//!
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use wsframe::{FrameSink, LogicalMessage};
//! use wsframe_testing::ScriptedReader;
//!
//! # async fn example() {
//! let reader = ScriptedReader::new().text("he", false).text("llo", true);
//! let mut sink = FrameSink::new(reader);
//! let message = sink.receive_next(&CancellationToken::new()).await;
//! assert_eq!(message.ok(), Some(LogicalMessage::Text("hello".into())));
//! # }
//! ```

mod reader;
mod writer;

use rstest::fixture;
use tokio_util::sync::CancellationToken;

pub use reader::{ScriptedFragment, ScriptedReader};
pub use writer::{RecordingWriter, WriteLog, WriteMode, WrittenFragment};

/// Fresh, uncancelled token.
#[allow(
    unused_braces,
    reason = "rustc false positive for single line rstest fixtures"
)]
#[fixture]
pub fn cancel_token() -> CancellationToken { CancellationToken::new() }
