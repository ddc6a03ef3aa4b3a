use thiserror::Error;

/// A list specifying categories of [`Wtf8Error`](crate::Wtf8Error).
///
/// Sanitization is total (invalid byte sequences are replaced, never
/// reported) and out-of-range character offsets are caller bugs that are
/// checked with assertions, so the only recoverable failures are resource
/// limits hit while interning.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Wtf8Error {
    /// The input (after sanitization, which can grow it) does not fit the
    /// configured byte-length limit of a string handle.
    #[error("string of {blen} bytes exceeds the maximum byte length {max}")]
    TooLong {
        /// Byte length of the rejected string.
        blen: usize,
        /// The limit in effect, see [`MAX_BYTE_LENGTH`](crate::MAX_BYTE_LENGTH).
        max: u32,
    },
}

/// Abbreviation of `Result<T, Wtf8Error>`.
pub type Wtf8Result<T> = std::result::Result<T, Wtf8Error>;
