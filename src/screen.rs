use crate::error::Result;
#[cfg(unix)]
use crate::signal::SigwinchWatcher;
use crate::text_buffer::TextBuffer;
use crate::viewport::{Viewport, ViewportWindow};
use std::io::Write;
use std::iter;
use std::time::{Duration, Instant};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);
pub const HINT: &str = "ESC to save and exit";
// Drawn at the cursor position. It is not a part of text
pub const CURSOR_GLYPH: char = '█';
const TAB_STOP: usize = 8;

const CYAN: &str = "\x1b[36m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

#[derive(PartialEq, Debug)]
enum StatusMessageKind {
    Info,
    Error,
}

struct StatusMessage {
    text: String,
    kind: StatusMessageKind,
}

impl StatusMessage {
    fn new<S: Into<String>>(message: S, kind: StatusMessageKind) -> StatusMessage {
        StatusMessage {
            text: message.into(),
            kind,
        }
    }
}

// Make display text of the line. Tabs are expanded, other control characters are replaced and
// the cursor glyph is inserted at char index `cursor`. Returns the text and the display column of
// the glyph
fn render_line(line: &str, cursor: Option<usize>) -> (String, usize) {
    let mut text = String::with_capacity(line.len() + CURSOR_GLYPH.len_utf8());
    let mut col = 0;
    let mut cursor_col = 0;
    for (i, c) in line.chars().enumerate() {
        if cursor == Some(i) {
            cursor_col = col;
            text.push(CURSOR_GLYPH);
            col += 1;
        }
        match c {
            '\t' => {
                let n = TAB_STOP - col % TAB_STOP;
                text.extend(iter::repeat(' ').take(n));
                col += n;
            }
            c if c.is_control() => {
                text.push('?');
                col += 1;
            }
            c => {
                text.push(c);
                col += c.width().unwrap_or(0);
            }
        }
    }
    if let Some(cx) = cursor {
        if cx >= line.chars().count() {
            cursor_col = col;
            text.push(CURSOR_GLYPH);
        }
    }
    (text, cursor_col)
}

// Cut `text` to the display columns [skip, skip + width). A wide character which does not fit
// entirely is dropped
fn clip(text: &str, skip: usize, width: usize) -> String {
    let mut clipped = String::new();
    let mut col = 0;
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        let start = col;
        col += w;
        if start < skip {
            continue;
        }
        if used + w > width {
            break;
        }
        clipped.push(c);
        used += w;
    }
    clipped
}

/// Width of the terminal connected to stdout.
pub fn terminal_width() -> Option<usize> {
    term_size::dimensions_stdout()
        .map(|(w, _)| w)
        .filter(|w| *w > 0)
}

fn digits(n: usize) -> usize {
    n.to_string().len()
}

// Renders text buffer as rows of header, body and status. Only rows which differ from the
// previous frame are written to the terminal.
pub struct Screen<W: Write> {
    output: W,
    viewport: Viewport,
    // Rows written at the last render. Index 0 is the header
    frame: Vec<String>,
    // Next render clears the screen and writes all rows
    force: bool,
    frame_interval: Duration,
    last_render: Option<Instant>,
    // Render request was dropped by rate limit
    pending: bool,
    message: Option<StatusMessage>,
    // Number of terminal columns. Rows are clipped to it. None means rows are never clipped
    width: Option<usize>,
    #[cfg(unix)]
    sigwinch: Option<SigwinchWatcher>,
}

impl<W: Write> Screen<W> {
    pub fn new(output: W, viewport: Viewport, frame_interval: Duration) -> Self {
        Self {
            output,
            viewport,
            frame: vec![],
            force: true, // Ensure to clear screen at first paint
            frame_interval,
            last_render: None,
            pending: false,
            message: None,
            width: None,
            #[cfg(unix)]
            sigwinch: None,
        }
    }

    pub fn set_width(&mut self, width: Option<usize>) {
        if self.width != width {
            self.width = width;
            self.reset();
        }
    }

    pub fn width(&self) -> Option<usize> {
        self.width
    }

    #[cfg(unix)]
    pub fn watch_resize(&mut self) -> Result<()> {
        self.sigwinch = Some(SigwinchWatcher::new()?);
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn watch_resize(&mut self) -> Result<()> {
        Ok(())
    }

    // Returns true when window was resized. Then next render redraws the entire screen
    pub fn maybe_resize(&mut self) -> bool {
        #[cfg(unix)]
        {
            if self.sigwinch.as_ref().map(|w| w.notified()).unwrap_or(false) {
                self.width = terminal_width().or(self.width);
                self.reset();
                return true;
            }
        }
        false
    }

    pub fn reset(&mut self) {
        self.force = true;
    }

    fn fit(&self, text: &str, skip: usize, reserved: usize) -> String {
        match self.width {
            Some(w) => clip(text, skip, w.saturating_sub(reserved)),
            None if skip == 0 => text.to_string(),
            None => clip(text, skip, usize::MAX),
        }
    }

    fn header(&self, buf: &TextBuffer, window: ViewportWindow) -> String {
        let modified = if buf.is_modified() { " [modified]" } else { "" };
        let header = format!(
            "Editing: {}{} (lines {}-{} of {}) {}",
            buf.filename(),
            modified,
            window.start + 1,
            window.end,
            buf.line_count(),
            HINT,
        );
        format!("{}{}{}", CYAN, self.fit(&header, 0, 0), RESET)
    }

    fn status(&self, buf: &TextBuffer) -> String {
        let (line, col) = buf.cursor();
        let pos = self.fit(&format!("Ln {}, Col {}", line + 1, col + 1), 0, 0);
        let message = match &self.message {
            Some(m) => m,
            None => return pos,
        };
        let text = self.fit(&message.text, 0, pos.width() + 2);
        if text.is_empty() {
            return pos;
        }
        match message.kind {
            StatusMessageKind::Error => format!("{}  {}{}{}", pos, RED, text, RESET),
            StatusMessageKind::Info => format!("{}  {}", pos, text),
        }
    }

    fn body_row(&self, buf: &TextBuffer, y: usize, gutter: usize) -> String {
        let (cy, cx) = buf.cursor();
        let number = format!("{:>width$} │ ", y + 1, width = gutter);
        let cursor = if y == cy { Some(cx) } else { None };
        let (text, cursor_col) = render_line(buf.rows()[y].buffer(), cursor);

        // Scroll the cursor row horizontally so that the cursor glyph is always visible
        let number_width = number.width();
        let avail = self
            .width
            .map(|w| w.saturating_sub(number_width))
            .unwrap_or(usize::MAX);
        let skip = if cursor.is_some() && avail > 0 && cursor_col >= avail {
            cursor_col + 1 - avail
        } else {
            0
        };

        let row = number + &self.fit(&text, skip, number_width);
        self.fit(&row, 0, 0)
    }

    /// Build all rows of the screen for the current state of `buf`.
    pub fn compose(&self, buf: &TextBuffer) -> Vec<String> {
        let (cy, _) = buf.cursor();
        let window = self.viewport.window(cy, buf.line_count());
        let height = self.viewport.height();
        let gutter = digits(window.end);

        let mut rows = Vec::with_capacity(height + 2);
        rows.push(self.header(buf, window));

        for y in window.range() {
            rows.push(self.body_row(buf, y, gutter));
        }

        for _ in window.len()..height {
            rows.push("~".to_string());
        }

        rows.push(self.status(buf));
        rows
    }

    fn write_row(out: &mut Vec<u8>, y: usize, row: &str) -> Result<()> {
        // Move cursor to target line, write it and erase the rest of line
        write!(out, "\x1b[{};1H{}\x1b[K", y + 1, row)?;
        Ok(())
    }

    fn write_all_rows(&self, out: &mut Vec<u8>, frame: &[String]) -> Result<usize> {
        // Hide cursor since the cursor glyph is drawn in text, then clear entire screen
        out.write_all(b"\x1b[?25l\x1b[2J\x1b[H")?;
        for (y, row) in frame.iter().enumerate() {
            Self::write_row(out, y, row)?;
        }
        Ok(frame.len())
    }

    fn write_changed_rows(&self, out: &mut Vec<u8>, frame: &[String]) -> Result<usize> {
        let mut updated = 0;
        for (y, row) in frame.iter().enumerate() {
            if self.frame.get(y) != Some(row) {
                Self::write_row(out, y, row)?;
                updated += 1;
            }
        }
        // Erase rows which no longer exist
        for y in frame.len()..self.frame.len() {
            Self::write_row(out, y, "")?;
            updated += 1;
        }
        Ok(updated)
    }

    /// Render `buf` and return the number of rows written to the terminal.
    ///
    /// When `rate_limited` is true and the previous render happened less than the frame interval
    /// ago, nothing is written and the request is remembered as pending. See `has_pending`.
    pub fn render(&mut self, buf: &TextBuffer, rate_limited: bool) -> Result<usize> {
        let now = Instant::now();
        if rate_limited && !self.force {
            if let Some(last) = self.last_render {
                if now.duration_since(last) < self.frame_interval {
                    tracing::trace!("Render request dropped by rate limit");
                    self.pending = true;
                    return Ok(0);
                }
            }
        }

        let frame = self.compose(buf);
        let mut out = Vec::with_capacity(frame.iter().map(|r| r.len() + 16).sum());
        let updated = if self.force {
            self.write_all_rows(&mut out, &frame)?
        } else {
            self.write_changed_rows(&mut out, &frame)?
        };

        if !out.is_empty() {
            self.output.write_all(&out)?;
            self.output.flush()?;
        }

        self.frame = frame;
        self.force = false;
        self.pending = false;
        self.last_render = Some(now);
        Ok(updated)
    }

    pub fn has_pending(&self) -> bool {
        self.pending
    }

    pub fn clear(&mut self) -> Result<()> {
        // 2: Argument of 'J' command to reset entire screen. Then reveal cursor again
        self.output.write_all(b"\x1b[2J\x1b[H\x1b[?25h")?;
        self.output.flush()?;
        self.frame.clear();
        self.force = true;
        Ok(())
    }

    pub fn set_info_message<S: Into<String>>(&mut self, message: S) {
        self.message = Some(StatusMessage::new(message, StatusMessageKind::Info));
    }

    pub fn set_error_message<S: Into<String>>(&mut self, message: S) {
        self.message = Some(StatusMessage::new(message, StatusMessageKind::Error));
    }

    pub fn unset_message(&mut self) {
        self.message = None;
    }

    pub fn message_text(&self) -> &'_ str {
        self.message.as_ref().map(|m| m.text.as_str()).unwrap_or("")
    }

    /// Rows written at the last render.
    pub fn frame(&self) -> &[String] {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.viewport.height()
    }
}

impl<W: Write> Drop for Screen<W> {
    fn drop(&mut self) {
        // Reveal cursor which was hidden at first paint
        let _ = self.output.write_all(b"\x1b[?25h");
        let _ = self.output.flush();
    }
}
