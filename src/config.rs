//! Per-session configuration.

use std::num::NonZeroUsize;

/// Scratch buffer size used for each transport read unless overridden.
pub const DEFAULT_SCRATCH_CAPACITY: NonZeroUsize = non_zero(5 * 1024);

/// Largest assembled message accepted unless overridden.
pub const DEFAULT_MAX_MESSAGE_SIZE: NonZeroUsize = non_zero(16 * 1024 * 1024);

const fn non_zero(value: usize) -> NonZeroUsize {
    match NonZeroUsize::new(value) {
        Some(value) => value,
        None => panic!("default sizes must be non-zero"),
    }
}

/// Settings that bound per-read staging and reassembly resource usage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Size of the fixed scratch buffer each fragment is read into.
    pub scratch_capacity: NonZeroUsize,
    /// Hard cap on the assembled payload of one logical message.
    pub max_message_size: NonZeroUsize,
}

impl SessionConfig {
    /// Replace the scratch buffer size.
    #[must_use]
    pub const fn with_scratch_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.scratch_capacity = capacity;
        self
    }

    /// Replace the maximum assembled message size.
    #[must_use]
    pub const fn with_max_message_size(mut self, limit: NonZeroUsize) -> Self {
        self.max_message_size = limit;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}
