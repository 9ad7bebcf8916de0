use thiserror::Error;

/// Errors produced at the library's input boundaries.
///
/// Most operations in this crate are total over well-formed input and degrade
/// silently (smaller or empty outputs) instead of failing; the only condition
/// surfaced as an error is a pixel buffer whose length does not match its
/// declared dimensions.
#[derive(Debug, Error)]
pub enum PixelmorphError {
    /// The RGBA buffer length did not equal `width * height * 4`.
    #[error("invalid pixel buffer: expected {expected} bytes for {width}x{height} RGBA, got {got}")]
    InvalidInput {
        width: usize,
        height: usize,
        expected: usize,
        got: usize,
    },
}
