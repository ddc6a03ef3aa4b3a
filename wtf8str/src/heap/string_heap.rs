use std::rc::Rc;

use ahash::RandomState;
use hashbrown::HashTable;

use crate::heap::char2byte::{Char2ByteScanner, LinearScanner};
use crate::hstring::{StringData, StringKind, Wtf8String};
use crate::unicode;
use crate::wtf8_error::{Wtf8Error, Wtf8Result};
use crate::MAX_BYTE_LENGTH;

/// The intern table and the character-level string operations.
///
/// All strings of one engine context live here. Interning canonicalizes
/// (sanitizes) the bytes and deduplicates them, so handle identity
/// (`Rc::ptr_eq`) is string equality; the substring search below depends
/// on exactly that. The heap is single-threaded; handles may be kept by
/// callers for as long as they like and are swept from the table by
/// [`collect`](StringHeap::collect) once the table holds the last
/// reference.
pub struct StringHeap {
    table: HashTable<Rc<Wtf8String>>,
    build_hasher: RandomState,
    scanner: Box<dyn Char2ByteScanner>,
    empty: Rc<Wtf8String>,
}

impl StringHeap {
    /// A heap using the uncached [`LinearScanner`].
    pub fn new() -> StringHeap {
        StringHeap::with_scanner(Box::new(LinearScanner))
    }

    /// A heap using the given char→byte scanner.
    pub fn with_scanner(scanner: Box<dyn Char2ByteScanner>) -> StringHeap {
        let build_hasher = RandomState::new();
        let mut heap = StringHeap {
            table: HashTable::new(),
            empty: Rc::new(Wtf8String::new(
                StringData::Static(b""),
                StringKind::Unicode,
                hash_bytes(&build_hasher, b""),
                true,
            )),
            build_hasher,
            scanner,
        };
        let empty = Rc::clone(&heap.empty);
        heap.insert(empty);
        heap
    }

    /// The interned empty string.
    pub fn empty(&self) -> Rc<Wtf8String> {
        Rc::clone(&self.empty)
    }

    /// Number of strings currently interned.
    pub fn string_count(&self) -> usize {
        self.table.len()
    }

    /// Interns arbitrary input bytes.
    ///
    /// Symbols (first byte in [`SYMBOL_MARKERS`](crate::SYMBOL_MARKERS))
    /// are stored verbatim; everything else is sanitized into canonical
    /// WTF-8 first. Identical payloads always yield the identical handle.
    pub fn intern(&mut self, data: &[u8]) -> Wtf8Result<Rc<Wtf8String>> {
        let keep = unicode::keepable_prefix_len(data);
        if keep == data.len() {
            // Already canonical: pure ASCII, or a symbol kept whole.
            return self.intern_canonical(data, false, None);
        }
        let (sanitized, _clen) = unicode::sanitize_string(data);
        self.intern_canonical(&sanitized, false, None)
    }

    /// Interns static bytes as a read-only handle.
    ///
    /// Read-only handles are bit-frozen: character length and ASCII flag
    /// are computed at construction instead of lazily. When the input is
    /// already canonical its bytes are referenced instead of copied; a
    /// non-canonical input falls back to an owned sanitized copy. If equal
    /// bytes are interned already, the existing handle is returned
    /// unchanged.
    pub fn intern_static(&mut self, data: &'static [u8]) -> Wtf8Result<Rc<Wtf8String>> {
        let keep = unicode::keepable_prefix_len(data);
        if keep == data.len() {
            return self.intern_canonical(data, true, Some(data));
        }
        let (sanitized, _clen) = unicode::sanitize_string(data);
        if sanitized == data {
            self.intern_canonical(data, true, Some(data))
        } else {
            self.intern_canonical(&sanitized, true, None)
        }
    }

    fn intern_canonical(
        &mut self,
        bytes: &[u8],
        read_only: bool,
        static_src: Option<&'static [u8]>,
    ) -> Wtf8Result<Rc<Wtf8String>> {
        if bytes.len() > MAX_BYTE_LENGTH as usize {
            return Err(Wtf8Error::TooLong {
                blen: bytes.len(),
                max: MAX_BYTE_LENGTH,
            });
        }
        let hash = hash_bytes(&self.build_hasher, bytes);
        if let Some(h) = self.lookup(hash, bytes) {
            trace!("intern: hit, blen = {}", bytes.len());
            return Ok(h);
        }

        debug!(
            "intern: miss, allocating {} byte string, hash = {hash:#x}",
            bytes.len()
        );
        let data = match static_src {
            Some(s) => {
                debug_assert_eq!(s, bytes);
                StringData::Static(s)
            }
            None => StringData::Inline(Box::from(bytes)),
        };
        let h = Rc::new(Wtf8String::new(
            data,
            unicode::classify(bytes),
            hash,
            read_only,
        ));
        self.insert(Rc::clone(&h));
        Ok(h)
    }

    fn lookup(&self, hash: u32, bytes: &[u8]) -> Option<Rc<Wtf8String>> {
        self.table
            .find(u64::from(hash), |e| e.hash() == hash && e.data() == bytes)
            .cloned()
    }

    fn insert(&mut self, h: Rc<Wtf8String>) {
        self.table
            .insert_unique(u64::from(h.hash()), h, |e| u64::from(e.hash()));
    }

    /// Sweeps strings whose only remaining reference is the table itself.
    ///
    /// This is the heap's stand-in for the engine's garbage collector
    /// observing a string unreachable.
    pub fn collect(&mut self) {
        // The cached empty string survives: the `empty` field keeps its
        // strong count above the table's own reference.
        let before = self.table.len();
        self.table.retain(|h| Rc::strong_count(h) > 1);
        debug!(
            "collect: swept {} of {} strings",
            before - self.table.len(),
            before
        );
    }

    /// Extracts the substring covering the character range `start..end`.
    ///
    /// Offsets are ECMAScript character offsets, so they may land in the
    /// middle of a supplementary code point; the affected half is then
    /// materialized as a lone surrogate (a low one at the start, a high
    /// one at the end). The result is interned like any other string.
    ///
    /// # Panics
    ///
    /// When the offsets are out of range or crossed.
    pub fn substring(
        &mut self,
        h: &Rc<Wtf8String>,
        start: u32,
        end: u32,
    ) -> Wtf8Result<Rc<Wtf8String>> {
        assert!(
            start <= end && end <= h.char_length(),
            "substring offsets out of range"
        );

        // ASCII fast path: character offsets are byte offsets.
        if h.char_length() == h.byte_length() {
            return self.intern(&h.data()[start as usize..end as usize]);
        }

        // An empty range could otherwise split the same supplementary
        // code point with both offsets.
        if start == end {
            return Ok(self.empty());
        }

        let data = h.data();

        let (start_byteoff, start_charoff) = self.scanner.scan_char2byte(h, start);
        let (prefix_surrogate, copy_start) = if start_charoff == start {
            (None, start_byteoff as usize)
        } else {
            // The start splits a supplementary code point: keep its low
            // surrogate, skip the 4-byte encoding itself.
            let cp = unicode::decode_known(&data[start_byteoff as usize..]);
            (
                Some(0xDC00 + ((cp - 0x10000) & 0x3FF)),
                start_byteoff as usize + 4,
            )
        };

        let (end_byteoff, end_charoff) = self.scanner.scan_char2byte(h, end);
        let copy_end = end_byteoff as usize;
        let suffix_surrogate = if end_charoff == end {
            None
        } else {
            // The end splits a supplementary code point: its high
            // surrogate becomes the suffix.
            let cp = unicode::decode_known(&data[end_byteoff as usize..]);
            Some(0xD800 + ((cp - 0x10000) >> 10))
        };
        debug_assert!(copy_end >= copy_start);

        if prefix_surrogate.is_none() && suffix_surrogate.is_none() {
            return self.intern(&data[copy_start..copy_end]);
        }

        trace!(
            "substring: manufactured halves, prefix = {prefix_surrogate:?}, \
             suffix = {suffix_surrogate:?}, copy = {copy_start}..{copy_end}"
        );
        let alloc_size = copy_end - copy_start
            + if prefix_surrogate.is_some() { 3 } else { 0 }
            + if suffix_surrogate.is_some() { 3 } else { 0 };
        let mut buf = Vec::with_capacity(alloc_size);
        if let Some(lo) = prefix_surrogate {
            unicode::push_surrogate(&mut buf, lo);
        }
        buf.extend_from_slice(&data[copy_start..copy_end]);
        if let Some(hi) = suffix_surrogate {
            unicode::push_surrogate(&mut buf, hi);
        }
        self.intern(&buf)
    }

    /// Finds the first occurrence of `needle` at a character offset
    /// `>= start_char`, or `None`.
    ///
    /// An empty needle matches immediately at `start_char` (which may
    /// equal the input's character length). Candidates are compared by
    /// handle identity, relying on interning.
    pub fn search_forwards(
        &mut self,
        input: &Rc<Wtf8String>,
        needle: &Rc<Wtf8String>,
        start_char: u32,
    ) -> Wtf8Result<Option<u32>> {
        let input_clen = input.char_length();
        let needle_clen = needle.char_length();
        trace!(
            "search_forwards: input_clen = {input_clen}, needle_clen = {needle_clen}, \
             start_char = {start_char}"
        );

        for charoff in start_char..=input_clen {
            if u64::from(charoff) + u64::from(needle_clen) <= u64::from(input_clen) {
                let candidate = self.substring(input, charoff, charoff + needle_clen)?;
                if Rc::ptr_eq(&candidate, needle) {
                    return Ok(Some(charoff));
                }
            }
        }
        Ok(None)
    }

    /// Finds the last occurrence of `needle` at a character offset
    /// `<= start_char`, or `None`.
    pub fn search_backwards(
        &mut self,
        input: &Rc<Wtf8String>,
        needle: &Rc<Wtf8String>,
        start_char: u32,
    ) -> Wtf8Result<Option<u32>> {
        let input_clen = input.char_length();
        let needle_clen = needle.char_length();
        trace!(
            "search_backwards: input_clen = {input_clen}, needle_clen = {needle_clen}, \
             start_char = {start_char}"
        );

        for charoff in (0..=start_char.min(input_clen)).rev() {
            if u64::from(charoff) + u64::from(needle_clen) <= u64::from(input_clen) {
                let candidate = self.substring(input, charoff, charoff + needle_clen)?;
                if Rc::ptr_eq(&candidate, needle) {
                    return Ok(Some(charoff));
                }
            }
        }
        Ok(None)
    }

    /// The code unit (or code point) at character offset `pos`.
    ///
    /// Without surrogate awareness this is `String.prototype.charCodeAt`:
    /// a supplementary code point reads as its high surrogate at its first
    /// character offset and as its low surrogate at the second. With
    /// surrogate awareness the first offset yields the full code point
    /// instead (`codePointAt`).
    ///
    /// # Panics
    ///
    /// When `pos` is not below the character length.
    pub fn char_code_at(
        &mut self,
        h: &Rc<Wtf8String>,
        pos: u32,
        surrogate_aware: bool,
    ) -> u32 {
        assert!(pos < h.char_length(), "character offset out of range");

        if h.char_length() == h.byte_length() {
            return u32::from(h.data()[pos as usize]);
        }

        let (byteoff, charoff) = self.scanner.scan_char2byte(h, pos);
        let cp = unicode::decode_known(&h.data()[byteoff as usize..]);

        if cp < 0x10000 {
            debug_assert_eq!(charoff, pos);
            return cp;
        }

        debug_assert!(charoff == pos || charoff + 1 == pos);
        if charoff == pos {
            if surrogate_aware {
                cp
            } else {
                0xD800 + ((cp - 0x10000) >> 10)
            }
        } else {
            0xDC00 + ((cp - 0x10000) & 0x3FF)
        }
    }
}

impl Default for StringHeap {
    fn default() -> StringHeap {
        StringHeap::new()
    }
}

impl std::fmt::Debug for StringHeap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringHeap")
            .field("string_count", &self.table.len())
            .finish_non_exhaustive()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn hash_bytes(build_hasher: &RandomState, bytes: &[u8]) -> u32 {
    let h = build_hasher.hash_one(bytes);
    if cfg!(feature = "strhash16") {
        (h as u32) & 0xFFFF
    } else {
        h as u32
    }
}
