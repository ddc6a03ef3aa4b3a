use crate::unicode::{decode_known, is_valid_wtf8, push_surrogate};

/// Number of bytes [`wtf8_to_cesu8`] will produce for `data`.
///
/// CESU-8 is identical to WTF-8 except that supplementary code points take
/// 4 bytes in WTF-8 and 3+3 bytes in CESU-8, so the size is the byte
/// length plus two per 4-byte lead. In valid WTF-8 those leads are exactly
/// the bytes >= 0xF0; continuation bytes never reach that range.
pub fn cesu8_length(data: &[u8]) -> usize {
    debug_assert!(is_valid_wtf8(data));
    data.len() + 2 * data.iter().filter(|&&b| b >= 0xF0).count()
}

/// Re-encodes valid WTF-8 into CESU-8.
///
/// Every BMP code point (including lone surrogates) is copied unchanged;
/// every supplementary code point is split into its UTF-16 surrogate pair
/// and each half emitted as a 3-byte sequence. The result is a
/// representation where no character occupies more than three bytes, which
/// some string algorithms prefer.
pub fn wtf8_to_cesu8(data: &[u8]) -> Vec<u8> {
    debug_assert!(is_valid_wtf8(data));

    let mut out = Vec::with_capacity(cesu8_length(data));
    let mut i = 0;
    while i < data.len() {
        let t = data[i];
        if t >= 0xF0 {
            debug_assert!(data.len() - i >= 4);
            let cp = decode_known(&data[i..]) - 0x10000;
            push_surrogate(&mut out, 0xD800 + (cp >> 10));
            push_surrogate(&mut out, 0xDC00 + (cp & 0x3FF));
            i += 4;
        } else {
            out.push(t);
            i += 1;
        }
    }

    debug_assert_eq!(out.len(), cesu8_length(data));
    out
}
