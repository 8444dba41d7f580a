//! Error type shared by the compression entry points.

use thiserror::Error;

/// Failure reported by a compression call.
///
/// Sentinel returns of the streaming engine map onto these variants: a
/// missing handle becomes `None`, every non-positive size becomes `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Lz5Error {
    /// The destination cannot hold the encoded block under a limited-output
    /// call.
    #[error("destination buffer too small for compressed output")]
    OutputTooSmall,
    /// The source exceeds `LZ5_MAX_INPUT_SIZE`.
    #[error("input of {0} bytes exceeds the maximum block input")]
    InputTooLarge(usize),
    /// A caller-supplied state buffer is not aligned for pointers.
    #[error("state buffer is not pointer-aligned")]
    MisalignedState,
    /// A caller-supplied state buffer is smaller than `size_of_state(level)`.
    #[error("state buffer holds {have} bytes, level needs {need}")]
    StateTooSmall { have: usize, need: usize },
    /// Table memory could not be reserved.
    #[error("cannot allocate {0} bytes of match tables")]
    AllocationFailed(usize),
}
