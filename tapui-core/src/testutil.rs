//! Host-side test doubles

use std::string::{String, ToString};
use std::vec::Vec;

use tapui_display::{DisplayError, Rect, Rgb565, Surface};
use tapui_hal::{TouchPanel, TouchPoint};

use crate::traits::{StoreError, StringStore};

/// A recorded drawing operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Fill(Rect, Rgb565),
    Outline(Rect, Rgb565),
    FillRound(Rect, Rgb565),
    OutlineRound(Rect, Rgb565),
    Text {
        x: i32,
        y: i32,
        text: String,
        fg: Rgb565,
    },
}

/// Surface that records every primitive instead of rendering it
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All text drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Plain fills, in order
    pub fn fills(&self) -> Vec<(Rect, Rgb565)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Fill(rect, color) => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Rgb565) -> Result<(), DisplayError> {
        self.ops.push(Op::Fill(rect, color));
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, color: Rgb565) -> Result<(), DisplayError> {
        self.ops.push(Op::Outline(rect, color));
        Ok(())
    }

    fn fill_round_rect(
        &mut self,
        rect: Rect,
        _radius: u32,
        color: Rgb565,
    ) -> Result<(), DisplayError> {
        self.ops.push(Op::FillRound(rect, color));
        Ok(())
    }

    fn draw_round_rect(
        &mut self,
        rect: Rect,
        _radius: u32,
        color: Rgb565,
    ) -> Result<(), DisplayError> {
        self.ops.push(Op::OutlineRound(rect, color));
        Ok(())
    }

    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        fg: Rgb565,
        _bg: Option<Rgb565>,
    ) -> Result<(), DisplayError> {
        self.ops.push(Op::Text {
            x,
            y,
            text: text.to_string(),
            fg,
        });
        Ok(())
    }

    fn dimensions(&self) -> (u32, u32) {
        (320, 240)
    }
}

/// Touch panel replaying a fixed script of samples, then released
pub struct ScriptedPanel {
    samples: Vec<Option<TouchPoint>>,
    next: usize,
}

impl ScriptedPanel {
    pub fn new(samples: &[Option<(i32, i32)>]) -> Self {
        Self {
            samples: samples
                .iter()
                .map(|s| s.map(|(x, y)| TouchPoint::new(x, y)))
                .collect(),
            next: 0,
        }
    }
}

impl TouchPanel for ScriptedPanel {
    type Error = ();

    fn sample(&mut self) -> Result<Option<TouchPoint>, ()> {
        let sample = self.samples.get(self.next).copied().flatten();
        self.next += 1;
        Ok(sample)
    }
}

/// In-memory string store
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub entries: Vec<Vec<u8>>,
}

impl StringStore for MemoryStore {
    fn clear_index(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        Ok(())
    }

    fn store_string(&mut self, text: &str) -> Result<u8, StoreError> {
        self.entries.push(text.as_bytes().to_vec());
        Ok((self.entries.len() - 1) as u8)
    }

    fn load_string(&mut self, id: u8, buffer: &mut [u8]) -> Result<usize, StoreError> {
        let entry = self
            .entries
            .get(id as usize)
            .ok_or(StoreError::NotFound)?;
        let len = entry.len().min(buffer.len());
        buffer[..len].copy_from_slice(&entry[..len]);
        Ok(len)
    }
}
