//! Bounded, cursor-addressed character buffer

use core::fmt;

use heapless::{String, Vec};

use crate::text::char_width;

/// Ordered character sequence with a cursor
///
/// `N` is the storage size; the runtime capacity given to [`EditBuffer::new`]
/// may be smaller. Always `len() <= capacity()` and `cursor() <= len()`.
/// Inserting into a full buffer drops the character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer<const N: usize> {
    chars: Vec<char, N>,
    capacity: usize,
    cursor: usize,
}

impl<const N: usize> EditBuffer<N> {
    /// Create an empty buffer holding at most `capacity` characters
    ///
    /// The capacity is clamped to `N`.
    pub const fn new(capacity: usize) -> Self {
        Self {
            chars: Vec::new(),
            capacity: if capacity < N { capacity } else { N },
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.chars.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Characters in order
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Insert `ch` at the cursor and advance the cursor
    ///
    /// Returns `false` and drops the character when the buffer is full.
    pub fn insert(&mut self, ch: char) -> bool {
        if self.is_full() {
            return false;
        }
        if self.chars.insert(self.cursor, ch).is_err() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Insert as much of `text` as fits at the cursor
    ///
    /// Returns the number of characters inserted.
    pub fn insert_str(&mut self, text: &str) -> usize {
        text.chars().take_while(|&ch| self.insert(ch)).count()
    }

    /// Delete the character before the cursor
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    /// Delete the character at the cursor
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.chars.remove(self.cursor);
        true
    }

    /// Empty the buffer and reset the cursor
    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    /// Replace the contents, cursor at the end
    ///
    /// Characters beyond capacity are dropped. Returns the number kept.
    pub fn set_text(&mut self, text: &str) -> usize {
        self.clear();
        self.insert_str(text)
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.chars.len();
    }

    /// Place the cursor, clamped to `[0, len]`
    pub fn set_cursor(&mut self, position: usize) {
        self.cursor = position.min(self.chars.len());
    }

    /// Display column of the cursor
    pub fn cursor_column(&self) -> usize {
        self.chars[..self.cursor].iter().map(|&ch| char_width(ch)).sum()
    }

    /// Cursor position for a tap on display `column`
    ///
    /// A tap on the right half of a double-width glyph lands after it.
    pub fn position_at_column(&self, column: usize) -> usize {
        let mut col = 0;
        for (index, &ch) in self.chars.iter().enumerate() {
            let width = char_width(ch);
            if column < col + width {
                return if column > col { index + 1 } else { index };
            }
            col += width;
        }
        self.chars.len()
    }

    /// Contents as a bounded string, truncated on a char boundary
    pub fn as_string<const M: usize>(&self) -> String<M> {
        let mut out = String::new();
        for &ch in self.chars.iter() {
            if out.push(ch).is_err() {
                break;
            }
        }
        out
    }
}

impl<const N: usize> Default for EditBuffer<N> {
    fn default() -> Self {
        Self::new(N)
    }
}

impl<const N: usize> fmt::Display for EditBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for &ch in self.chars.iter() {
            f.write_char(ch)?;
        }
        Ok(())
    }
}
