//! Scripted fragment reader.

use std::collections::VecDeque;

use async_trait::async_trait;
use wsframe::{FragmentKind, FragmentReader, FragmentReceipt, TransportError};

/// One fragment queued on a [`ScriptedReader`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptedFragment {
    /// Deliver `payload` with the given kind and final flag.
    Data {
        payload: Vec<u8>,
        kind: FragmentKind,
        end_of_message: bool,
    },
    /// Fail the read with [`TransportError::Closed`].
    Fail,
}

/// Reader that replays queued fragments, then pends forever.
///
/// Payloads longer than the caller's buffer are handed out over several
/// reads, mirroring how a real transport behaves with a small read buffer.
#[derive(Debug, Default)]
pub struct ScriptedReader {
    script: VecDeque<ScriptedFragment>,
    reads: usize,
}

impl ScriptedReader {
    /// Empty script.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Queue a raw fragment.
    #[must_use]
    pub fn fragment(mut self, payload: impl AsRef<[u8]>, kind: FragmentKind, fin: bool) -> Self {
        self.script.push_back(ScriptedFragment::Data {
            payload: payload.as_ref().to_vec(),
            kind,
            end_of_message: fin,
        });
        self
    }

    /// Queue a text fragment.
    #[must_use]
    pub fn text(self, payload: impl AsRef<[u8]>, fin: bool) -> Self {
        self.fragment(payload, FragmentKind::Text, fin)
    }

    /// Queue a binary fragment.
    #[must_use]
    pub fn binary(self, payload: impl AsRef<[u8]>, fin: bool) -> Self {
        self.fragment(payload, FragmentKind::Binary, fin)
    }

    /// Queue a close indication.
    #[must_use]
    pub fn close(self) -> Self { self.fragment(b"", FragmentKind::Close, true) }

    /// Queue a transport failure.
    #[must_use]
    pub fn fail(mut self) -> Self {
        self.script.push_back(ScriptedFragment::Fail);
        self
    }

    /// Number of reads that returned a fragment or an error.
    #[must_use]
    pub fn reads(&self) -> usize { self.reads }

    /// Entries still waiting to be read.
    #[must_use]
    pub fn remaining(&self) -> usize { self.script.len() }
}

#[async_trait]
impl FragmentReader for ScriptedReader {
    async fn read_fragment(&mut self, buf: &mut [u8]) -> Result<FragmentReceipt, TransportError> {
        let Some(next) = self.script.pop_front() else {
            return std::future::pending().await;
        };
        self.reads += 1;

        match next {
            ScriptedFragment::Fail => Err(TransportError::Closed),
            ScriptedFragment::Data {
                mut payload,
                kind,
                end_of_message,
            } => {
                let len = payload.len().min(buf.len());
                let rest = payload.split_off(len);
                buf[..len].copy_from_slice(&payload);
                let complete = rest.is_empty();
                if !complete {
                    self.script.push_front(ScriptedFragment::Data {
                        payload: rest,
                        kind,
                        end_of_message,
                    });
                }
                Ok(FragmentReceipt::new(len, kind, complete && end_of_message))
            }
        }
    }
}
