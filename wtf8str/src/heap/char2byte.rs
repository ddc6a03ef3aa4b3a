use crate::hstring::Wtf8String;

/// Capability interface for mapping a character offset to a byte offset.
///
/// The heap never caches this mapping itself; a production engine plugs in
/// a scanner with a sliding cache of recent positions, while the default
/// [`LinearScanner`] simply walks the string. The cache policy is entirely
/// the implementor's business, only the contract below matters.
///
/// Contract of [`scan_char2byte`](Char2ByteScanner::scan_char2byte): for a
/// non-symbol handle `h` and `char_pos <= h.char_length()`, the returned
/// pair `(byte_off, char_off)` satisfies
///
/// * `byte_off` is a code point boundary (or the end) of `h`'s payload and
///   `char_off` is the character offset of that boundary,
/// * `char_off <= char_pos` and `char_pos - char_off` is 0 or 1,
/// * the difference is 1 exactly when the byte at `byte_off` starts a
///   supplementary code point and `char_pos` addresses its low surrogate
///   half.
pub trait Char2ByteScanner {
    /// Maps the character offset `char_pos` to `(byte_off, char_off)` as
    /// described on the trait.
    fn scan_char2byte(&mut self, h: &Wtf8String, char_pos: u32) -> (u32, u32);
}

/// Scanner without any cache: every query walks the payload from the
/// start. Correct for any input and good enough for short strings.
#[derive(Debug, Default)]
pub struct LinearScanner;

impl Char2ByteScanner for LinearScanner {
    #[allow(clippy::cast_possible_truncation)]
    fn scan_char2byte(&mut self, h: &Wtf8String, char_pos: u32) -> (u32, u32) {
        debug_assert!(!h.is_symbol());
        debug_assert!(char_pos <= h.char_length());

        let data = h.data();
        let mut byte_off = 0usize;
        let mut char_off = 0u32;
        while char_off < char_pos {
            let t = data[byte_off];
            if t <= 0x7F {
                byte_off += 1;
                char_off += 1;
            } else if t <= 0xDF {
                byte_off += 2;
                char_off += 1;
            } else if t <= 0xEF {
                byte_off += 3;
                char_off += 1;
            } else if char_off + 1 == char_pos {
                // char_pos addresses the low surrogate half of this
                // supplementary code point; report the code point start.
                break;
            } else {
                byte_off += 4;
                char_off += 2;
            }
        }
        (byte_off as u32, char_off)
    }
}

#[cfg(test)]
mod tests {
    use super::{Char2ByteScanner, LinearScanner};
    use crate::hstring::{StringData, StringKind, Wtf8String};

    fn handle(s: &str) -> Wtf8String {
        Wtf8String::new(
            StringData::Inline(Box::from(s.as_bytes())),
            StringKind::Unicode,
            0,
            false,
        )
    }

    #[test]
    fn maps_bmp_offsets() {
        let h = handle("aé€z");
        let mut scanner = LinearScanner;
        assert_eq!(scanner.scan_char2byte(&h, 0), (0, 0));
        assert_eq!(scanner.scan_char2byte(&h, 1), (1, 1));
        assert_eq!(scanner.scan_char2byte(&h, 2), (3, 2));
        assert_eq!(scanner.scan_char2byte(&h, 3), (6, 3));
        // End position maps to the end of the payload.
        assert_eq!(scanner.scan_char2byte(&h, 4), (7, 4));
    }

    #[test]
    fn reports_surrogate_halves() {
        // "a😀b": chars a, high half, low half, b.
        let h = handle("a😀b");
        let mut scanner = LinearScanner;
        assert_eq!(scanner.scan_char2byte(&h, 0), (0, 0));
        assert_eq!(scanner.scan_char2byte(&h, 1), (1, 1));
        // Low half: byte offset stays at the code point start, one char
        // short of the request.
        assert_eq!(scanner.scan_char2byte(&h, 2), (1, 1));
        assert_eq!(scanner.scan_char2byte(&h, 3), (5, 3));
        assert_eq!(scanner.scan_char2byte(&h, 4), (6, 4));
    }
}
