//! The core's only fallible boundary: loading the OTP and flash blobs.
//! Everything downstream of a successful load (CPU execution, the address
//! decoder, the video latch) is infallible wrapping arithmetic, per
//! spec.md §7.

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("expected {expected} bytes but got {actual}")]
    UnexpectedSize { expected: usize, actual: usize },
}
