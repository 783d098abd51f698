//! Display-width accounting for UTF-8 text
//!
//! The toolkit renders with a monospaced glyph cell. Single-byte code
//! points occupy one cell; every multi-byte code point (kana, kanji,
//! symbols) is drawn as a double-width glyph and occupies two.

use heapless::String;

/// Length of the UTF-8 sequence introduced by `lead`
///
/// Returns 0 for continuation bytes and bytes that can never start a
/// sequence.
pub const fn utf8_sequence_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => 0,
    }
}

/// Display columns occupied by `text`
pub fn display_width(text: &str) -> usize {
    text.bytes()
        .map(|byte| match utf8_sequence_len(byte) {
            0 => 0,
            1 => 1,
            _ => 2,
        })
        .sum()
}

/// Display columns occupied by a single character
pub fn char_width(ch: char) -> usize {
    if ch.len_utf8() > 1 {
        2
    } else {
        1
    }
}

/// Copy as much of `text` as fits into a bounded string
///
/// Truncates on a character boundary.
pub fn truncate_to<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_len() {
        assert_eq!(utf8_sequence_len(b'a'), 1);
        assert_eq!(utf8_sequence_len(0xc3), 2);
        assert_eq!(utf8_sequence_len(0xe3), 3);
        assert_eq!(utf8_sequence_len(0xf0), 4);
        assert_eq!(utf8_sequence_len(0x80), 0);
        assert_eq!(utf8_sequence_len(0xc0), 0);
        assert_eq!(utf8_sequence_len(0xf8), 0);
    }

    #[test]
    fn test_ascii_width() {
        assert_eq!(display_width(""), 0);
        assert_eq!(display_width("Wifi"), 4);
    }

    #[test]
    fn test_multibyte_is_double_width() {
        assert_eq!(display_width("設定"), 4);
        assert_eq!(display_width("Wifi設定"), 8);
        assert_eq!(display_width("ボタンです"), 10);
        assert_eq!(display_width("é"), 2);
        assert_eq!(display_width("🙂"), 2);
    }

    #[test]
    fn test_char_width_matches_string_width() {
        for ch in ['a', 'é', '時', '🙂'] {
            let mut buf = [0u8; 4];
            assert_eq!(char_width(ch), display_width(ch.encode_utf8(&mut buf)));
        }
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        let s: String<5> = truncate_to("ab時計");
        assert_eq!(s.as_str(), "ab時");
        let s: String<8> = truncate_to("short");
        assert_eq!(s.as_str(), "short");
    }
}
