//! Virtual keyboard layouts
//!
//! Each keymap is a grid of [`KEYMAP_COLUMNS`] columns by [`KEYMAP_ROWS`]
//! rows. A key covers one or more adjacent columns of its row; the spans of
//! every row add up to the column count.

/// Grid columns per keymap row
pub const KEYMAP_COLUMNS: usize = 10;

/// Rows per keymap
pub const KEYMAP_ROWS: usize = 6;

/// Width of one grid column in pixels
pub const KEY_COLUMN_WIDTH: u32 = 32;

/// Height of one keymap row in pixels
pub const KEY_ROW_HEIGHT: u32 = 28;

/// Number of selectable keymaps
pub const KEYMAP_COUNT: usize = 3;

/// What pressing a key does to the edit buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// Insert a literal character
    Char(char),
    Space,
    /// Show another keymap
    SwitchKeymap(u8),
    Left,
    Right,
    Backspace,
    /// Delete forward
    Delete,
    Clear,
    Copy,
    Paste,
    TogglePassword,
    Home,
    End,
}

/// A key cap: label, action and column span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub label: &'static str,
    pub action: KeyAction,
    pub span: u8,
}

impl Key {
    const fn ch(label: &'static str, ch: char) -> Self {
        Self {
            label,
            action: KeyAction::Char(ch),
            span: 1,
        }
    }

    /// Literal key for a single-byte label
    const fn ascii(label: &'static str) -> Self {
        Self::ch(label, label.as_bytes()[0] as char)
    }

    const fn wide(label: &'static str, action: KeyAction, span: u8) -> Self {
        Self {
            label,
            action,
            span,
        }
    }
}

/// One keymap row
pub type KeyRow = &'static [Key];

/// A complete keymap
pub type Keymap = [KeyRow; KEYMAP_ROWS];

macro_rules! ascii_row {
    ($($label:literal)*) => {
        &[$(Key::ascii($label)),*]
    };
}

const NAV_ROW: KeyRow = &[
    Key::wide("|<", KeyAction::Home, 1),
    Key::wide(">|", KeyAction::End, 1),
    Key::wide("Copy", KeyAction::Copy, 2),
    Key::wide("Paste", KeyAction::Paste, 2),
    Key::wide("Clr", KeyAction::Clear, 2),
    Key::wide("**", KeyAction::TogglePassword, 2),
];

const fn edit_row(switch_label: &'static str, target: u8) -> [Key; 5] {
    [
        Key::wide(switch_label, KeyAction::SwitchKeymap(target), 2),
        Key::wide("<", KeyAction::Left, 1),
        Key::wide(">", KeyAction::Right, 1),
        Key::wide(" ", KeyAction::Space, 4),
        Key::wide("Del", KeyAction::Delete, 2),
    ]
}

const LETTER_EDIT_ROW: [Key; 5] = edit_row("#+=", 2);
const SYMBOL_EDIT_ROW: [Key; 5] = edit_row("abc", 0);

/// Lowercase letters and digits
pub const LOWER: Keymap = [
    ascii_row!("1" "2" "3" "4" "5" "6" "7" "8" "9" "0"),
    ascii_row!("q" "w" "e" "r" "t" "y" "u" "i" "o" "p"),
    ascii_row!("a" "s" "d" "f" "g" "h" "j" "k" "l" "-"),
    &[
        Key::wide("ABC", KeyAction::SwitchKeymap(1), 2),
        Key::ch("z", 'z'),
        Key::ch("x", 'x'),
        Key::ch("c", 'c'),
        Key::ch("v", 'v'),
        Key::ch("b", 'b'),
        Key::ch("n", 'n'),
        Key::ch("m", 'm'),
        Key::wide("BS", KeyAction::Backspace, 1),
    ],
    &LETTER_EDIT_ROW,
    NAV_ROW,
];

/// Uppercase letters and digits
pub const UPPER: Keymap = [
    ascii_row!("1" "2" "3" "4" "5" "6" "7" "8" "9" "0"),
    ascii_row!("Q" "W" "E" "R" "T" "Y" "U" "I" "O" "P"),
    ascii_row!("A" "S" "D" "F" "G" "H" "J" "K" "L" "_"),
    &[
        Key::wide("abc", KeyAction::SwitchKeymap(0), 2),
        Key::ch("Z", 'Z'),
        Key::ch("X", 'X'),
        Key::ch("C", 'C'),
        Key::ch("V", 'V'),
        Key::ch("B", 'B'),
        Key::ch("N", 'N'),
        Key::ch("M", 'M'),
        Key::wide("BS", KeyAction::Backspace, 1),
    ],
    &LETTER_EDIT_ROW,
    NAV_ROW,
];

/// Punctuation and symbols
pub const SYMBOLS: Keymap = [
    ascii_row!("!" "@" "#" "$" "%" "^" "&" "*" "(" ")"),
    ascii_row!("~" "`" "+" "=" "[" "]" "{" "}" "<" ">"),
    ascii_row!("/" "\\" "|" ":" ";" "\"" "'" "," "." "?"),
    &[
        Key::wide("ABC", KeyAction::SwitchKeymap(1), 2),
        Key::ch("-", '-'),
        Key::ch("_", '_'),
        Key::ch("\u{b0}", '\u{b0}'),
        Key::ch("\u{a5}", '\u{a5}'),
        Key::ch("\u{20ac}", '\u{20ac}'),
        Key::ch("\u{a3}", '\u{a3}'),
        Key::ch("\u{a7}", '\u{a7}'),
        Key::wide("BS", KeyAction::Backspace, 1),
    ],
    &SYMBOL_EDIT_ROW,
    NAV_ROW,
];

/// All keymaps, indexed by keymap number
pub const KEYMAPS: [&Keymap; KEYMAP_COUNT] = [&LOWER, &UPPER, &SYMBOLS];

/// Key covering grid `column` in `row` of keymap `map`
///
/// Returns the key and the first column it covers.
pub fn key_at(map: usize, row: usize, column: usize) -> Option<(&'static Key, usize)> {
    let keys = KEYMAPS.get(map)?.get(row)?;
    let mut start = 0;
    for key in keys.iter() {
        let end = start + key.span as usize;
        if column < end {
            return Some((key, start));
        }
        start = end;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_fill_grid() {
        for (m, map) in KEYMAPS.iter().enumerate() {
            for (r, row) in map.iter().enumerate() {
                let span: usize = row.iter().map(|k| k.span as usize).sum();
                assert_eq!(span, KEYMAP_COLUMNS, "keymap {m} row {r}");
            }
        }
    }

    #[test]
    fn test_literal_keys_match_labels() {
        for map in KEYMAPS {
            for row in map.iter() {
                for key in row.iter() {
                    if let KeyAction::Char(ch) = key.action {
                        let mut buf = [0u8; 4];
                        assert_eq!(key.label, ch.encode_utf8(&mut buf) as &str);
                    }
                }
            }
        }
    }

    #[test]
    fn test_switch_keys_target_valid_keymaps() {
        for map in KEYMAPS {
            for row in map.iter() {
                for key in row.iter() {
                    if let KeyAction::SwitchKeymap(target) = key.action {
                        assert!((target as usize) < KEYMAP_COUNT);
                    }
                }
            }
        }
    }

    #[test]
    fn test_key_at_scans_spans() {
        let (key, start) = key_at(0, 1, 0).unwrap();
        assert_eq!(key.action, KeyAction::Char('q'));
        assert_eq!(start, 0);

        let (key, start) = key_at(0, 4, 5).unwrap();
        assert_eq!(key.action, KeyAction::Space);
        assert_eq!(start, 4);

        let (key, _) = key_at(0, 3, 1).unwrap();
        assert_eq!(key.action, KeyAction::SwitchKeymap(1));

        assert!(key_at(0, 1, KEYMAP_COLUMNS).is_none());
        assert!(key_at(0, KEYMAP_ROWS, 0).is_none());
        assert!(key_at(KEYMAP_COUNT, 0, 0).is_none());
    }
}
