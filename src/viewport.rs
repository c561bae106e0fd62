//! Vertical window into the text buffer.
//!
//! The window keeps the cursor line centered while it can, and sticks to the top or the bottom
//! of the buffer near its edges. `height` is the number of body rows of the screen and excludes
//! header and status rows.

use crate::error::{Error, Result};
use std::cmp;
use std::ops::Range;

pub const DEFAULT_HEIGHT: usize = 12;

/// Half-open range `[start, end)` of visible line indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportWindow {
    pub start: usize,
    pub end: usize,
}

impl ViewportWindow {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    height: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(height: usize) -> Result<Self> {
        if height == 0 {
            return Err(Error::InvalidHeight(height));
        }
        Ok(Self { height })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn window(&self, cursor_line: usize, line_count: usize) -> ViewportWindow {
        let half = self.height / 2;
        let start = if cursor_line < half {
            0
        } else if cursor_line + half >= line_count {
            // Stick to the bottom of buffer
            line_count.saturating_sub(self.height)
        } else {
            cursor_line - half
        };
        let end = cmp::min(start + self.height, line_count);
        ViewportWindow { start, end }
    }
}
