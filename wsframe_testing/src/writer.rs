//! Recording fragment writer.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use wsframe::{FragmentKind, FragmentWriter, TransportError};

/// A fragment captured by [`RecordingWriter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenFragment {
    pub payload: Vec<u8>,
    pub kind: FragmentKind,
    pub end_of_message: bool,
}

/// How [`RecordingWriter`] responds to writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Record and accept every write.
    #[default]
    Accept,
    /// Fail every write as if the connection were closed.
    Closed,
    /// Never complete a write.
    Stall,
}

/// Shared view of the fragments a [`RecordingWriter`] accepted.
#[derive(Clone, Debug, Default)]
pub struct WriteLog(Arc<Mutex<Vec<WrittenFragment>>>);

impl WriteLog {
    /// Snapshot of the recorded fragments.
    #[must_use]
    pub fn fragments(&self) -> Vec<WrittenFragment> { self.lock().clone() }

    fn lock(&self) -> MutexGuard<'_, Vec<WrittenFragment>> {
        self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Writer that records fragments in a [`WriteLog`].
#[derive(Debug, Default)]
pub struct RecordingWriter {
    mode: WriteMode,
    log: WriteLog,
}

impl RecordingWriter {
    /// Writer that accepts everything.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Writer with an explicit response mode.
    #[must_use]
    pub fn with_mode(mode: WriteMode) -> Self {
        Self {
            mode,
            log: WriteLog::default(),
        }
    }

    /// Handle for inspecting recorded writes after the writer is moved.
    #[must_use]
    pub fn log(&self) -> WriteLog { self.log.clone() }
}

#[async_trait]
impl FragmentWriter for RecordingWriter {
    async fn write_fragment(
        &mut self,
        payload: &[u8],
        kind: FragmentKind,
        end_of_message: bool,
    ) -> Result<(), TransportError> {
        match self.mode {
            WriteMode::Accept => {
                self.log.lock().push(WrittenFragment {
                    payload: payload.to_vec(),
                    kind,
                    end_of_message,
                });
                Ok(())
            }
            WriteMode::Closed => Err(TransportError::Closed),
            WriteMode::Stall => std::future::pending().await,
        }
    }
}
