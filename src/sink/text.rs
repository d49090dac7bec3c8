//! Strict UTF-8 accumulation across fragment boundaries.
//!
//! A sender may split a multi-byte code point between two fragments. The
//! accumulator decodes each fragment eagerly but holds back an incomplete
//! trailing sequence (at most three bytes) until the next fragment supplies
//! the rest. Bytes that can never form valid UTF-8 are rejected immediately.

use std::str;

use crate::error::FramingError;

/// Longest UTF-8 encoding of a single code point.
const MAX_CHAR_LEN: usize = 4;

#[derive(Debug, Default)]
pub(crate) struct TextAccumulator {
    text: String,
    pending: Vec<u8>,
}

impl TextAccumulator {
    pub(crate) fn clear(&mut self) {
        self.text.clear();
        self.pending.clear();
    }

    /// Bytes held so far, including an incomplete trailing sequence.
    pub(crate) fn len(&self) -> usize { self.text.len() + self.pending.len() }

    /// Decode `bytes` and append them to the message.
    pub(crate) fn push(&mut self, bytes: &[u8]) -> Result<(), FramingError> {
        if self.pending.is_empty() {
            return self.push_decoded(bytes);
        }

        let needed = MAX_CHAR_LEN - self.pending.len();
        for take in 1..=needed.min(bytes.len()) {
            let mut candidate = self.pending.clone();
            candidate.extend_from_slice(&bytes[..take]);
            match str::from_utf8(&candidate) {
                Ok(decoded) => {
                    self.text.push_str(decoded);
                    self.pending.clear();
                    return self.push_decoded(&bytes[take..]);
                }
                Err(err) if err.error_len().is_some() => return Err(FramingError::InvalidUtf8),
                Err(_) => {}
            }
        }

        if bytes.len() >= needed {
            return Err(FramingError::InvalidUtf8);
        }
        self.pending.extend_from_slice(bytes);
        Ok(())
    }

    /// Take the completed text, failing if a code point was left unfinished.
    pub(crate) fn finish(&mut self) -> Result<String, FramingError> {
        if !self.pending.is_empty() {
            return Err(FramingError::InvalidUtf8);
        }
        Ok(std::mem::take(&mut self.text))
    }

    fn push_decoded(&mut self, bytes: &[u8]) -> Result<(), FramingError> {
        match str::from_utf8(bytes) {
            Ok(decoded) => {
                self.text.push_str(decoded);
                Ok(())
            }
            Err(err) => {
                if err.error_len().is_some() {
                    return Err(FramingError::InvalidUtf8);
                }
                let (valid, tail) = bytes.split_at(err.valid_up_to());
                let valid = str::from_utf8(valid).map_err(|_| FramingError::InvalidUtf8)?;
                self.text.push_str(valid);
                self.pending.extend_from_slice(tail);
                Ok(())
            }
        }
    }
}
