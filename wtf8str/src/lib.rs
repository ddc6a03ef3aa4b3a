//! Interned WTF-8 strings for an embedded ECMAScript engine.
//!
//! ECMAScript strings are sequences of 16-bit code units and are not
//! guaranteed to be well-formed UTF-16. This crate stores them as WTF-8:
//! UTF-8 extended so that unpaired surrogate code points can be encoded,
//! while paired surrogates are always combined into the single 4-byte
//! encoding of their supplementary code point. That canonical form makes
//! byte equality coincide with ECMAScript string equality, which in turn
//! lets the interner give every distinct string a unique handle.
//!
//! The building blocks:
//!
//! * [`unicode`]: the byte-level algorithms. Validation, sanitization of
//!   arbitrary input (invalid sequences become U+FFFD), character length
//!   in the ECMAScript view (non-BMP code points count as two), code point
//!   decoding, and conversion to CESU-8.
//! * [`Wtf8String`]: the immutable interned handle with its lazily
//!   computed character length and ASCII flag.
//! * [`StringHeap`]: the intern table plus the character-indexed
//!   operations that need it. Substring extraction (manufacturing
//!   surrogate halves when an offset splits a supplementary code point),
//!   forward/backward search, and `charCodeAt`-style access.
//!
//! Handles are shared as `Rc<Wtf8String>`; the whole crate is meant for a
//! single-threaded engine context and uses no locks.

#![deny(missing_debug_implementations)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[macro_use]
extern crate log;

mod heap;
mod hstring;
pub mod unicode;
mod wtf8_error;

pub use crate::heap::{Char2ByteScanner, LinearScanner, StringHeap};
pub use crate::hstring::{StringKind, Wtf8String, NO_ARRAY_INDEX, SYMBOL_MARKERS};
pub use crate::wtf8_error::{Wtf8Error, Wtf8Result};

/// Longest byte sequence a handle can carry.
///
/// Checked when interning; longer input is rejected with
/// [`Wtf8Error::TooLong`].
#[cfg(feature = "strlen16")]
pub const MAX_BYTE_LENGTH: u32 = 0xFFFF;
/// Longest byte sequence a handle can carry.
///
/// Checked when interning; longer input is rejected with
/// [`Wtf8Error::TooLong`].
#[cfg(not(feature = "strlen16"))]
pub const MAX_BYTE_LENGTH: u32 = 0xFFFF_FFFF;
