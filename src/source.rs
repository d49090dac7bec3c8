//! Send-side serialisation of logical messages.
//!
//! [`FrameSource`] owns the write half of the transport. Every send issues
//! exactly one write flagged as a complete, final fragment; there is no
//! chunking and no partial-write retry at this layer.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    error::{FramingError, Result, TransportError},
    message::MessageKind,
    metrics::{self, Direction},
    transport::{FragmentKind, FragmentWriter},
};

/// Outbound half of a framed connection.
#[derive(Debug)]
pub struct FrameSource<W> {
    writer: W,
}

impl<W: FragmentWriter> FrameSource<W> {
    /// Wrap the write half of a transport.
    #[must_use]
    pub const fn new(writer: W) -> Self { Self { writer } }

    /// Send `text` as a single final text fragment.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::TransportWriteFailure`] when the transport
    /// rejects the write, the connection is already closed, or `cancel` fires
    /// before the write completes.
    #[tracing::instrument(level = "debug", skip_all, fields(len = text.len()))]
    pub async fn send_text(&mut self, text: &str, cancel: &CancellationToken) -> Result<()> {
        self.send(text.as_bytes(), FragmentKind::Text, cancel).await?;
        metrics::inc_messages(Direction::Outbound, MessageKind::Text);
        Ok(())
    }

    /// Send `payload` as a single final binary fragment.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`FrameSource::send_text`].
    #[tracing::instrument(level = "debug", skip_all, fields(len = payload.len()))]
    pub async fn send_binary(&mut self, payload: &[u8], cancel: &CancellationToken) -> Result<()> {
        self.send(payload, FragmentKind::Binary, cancel).await?;
        metrics::inc_messages(Direction::Outbound, MessageKind::Binary);
        Ok(())
    }

    /// Send an empty close fragment to start an orderly shutdown.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`FrameSource::send_text`].
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn close(&mut self, cancel: &CancellationToken) -> Result<()> {
        self.send(&[], FragmentKind::Close, cancel).await
    }

    async fn send(
        &mut self,
        payload: &[u8],
        kind: FragmentKind,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let outcome = tokio::select! {
            biased;

            () = cancel.cancelled() => Err(TransportError::Cancelled),

            res = self.writer.write_fragment(payload, kind, true) => res,
        };

        match outcome {
            Ok(()) => {
                metrics::inc_fragments(Direction::Outbound);
                debug!(len = payload.len(), ?kind, "fragment written");
                Ok(())
            }
            Err(err) => {
                let err = FramingError::TransportWriteFailure(err);
                metrics::inc_errors(&err);
                debug!(error = %err, "write failed");
                Err(err)
            }
        }
    }
}

impl<W> FrameSource<W> {
    /// Borrow the underlying writer.
    #[must_use]
    pub const fn get_ref(&self) -> &W { &self.writer }

    /// Mutably borrow the underlying writer.
    pub fn get_mut(&mut self) -> &mut W { &mut self.writer }

    /// Discard the source, returning the writer.
    #[must_use]
    pub fn into_inner(self) -> W { self.writer }
}
