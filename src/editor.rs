use crate::error::Result;
use crate::input::{Key, KeyReader};
use crate::screen::Screen;
use crate::text_buffer::{CursorDir, Lines, TextBuffer};
use std::io::Write;
use std::path::PathBuf;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum State {
    Editing,
    Exiting,
}

/// How an editing session ended.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Outcome {
    Saved { path: PathBuf, bytes: usize },
    // Saving failed and user pressed ESC again
    Discarded,
}

pub struct Editor<K: KeyReader, W: Write> {
    input: K,       // Decoded key input
    quitting: bool, // Saving on exit failed and next exit discards changes
    state: State,
    buf: TextBuffer,
    screen: Screen<W>,
}

impl<K, W> Editor<K, W>
where
    K: KeyReader,
    W: Write,
{
    pub fn new(buf: TextBuffer, input: K, mut screen: Screen<W>) -> Self {
        if buf.path().is_some() {
            let notice = if buf.is_new_file() {
                format!("New file: {}", buf.filename())
            } else {
                format!("Loaded existing file: {}", buf.filename())
            };
            screen.set_info_message(notice);
        }

        Self {
            input,
            quitting: false,
            state: State::Editing,
            buf,
            screen,
        }
    }

    fn handle_exit(&mut self) -> Option<Outcome> {
        if self.quitting {
            tracing::info!("Exit without saving {}", self.buf.filename());
            return Some(Outcome::Discarded);
        }

        match self.buf.save() {
            Ok(bytes) => {
                let path = self.buf.path().map(PathBuf::from).unwrap_or_default();
                tracing::info!("{} bytes written to {}", bytes, path.display());
                Some(Outcome::Saved { path, bytes })
            }
            Err(msg) => {
                tracing::warn!("{}", msg);
                self.quitting = true;
                self.screen.set_error_message(format!(
                    "{} (ESC again to quit without saving)",
                    msg
                ));
                None
            }
        }
    }

    fn process_keypress(&mut self, key: Key) -> Option<Outcome> {
        use Key::*;

        match key {
            Exit => return self.handle_exit(),
            Enter => self.buf.split_line(),
            Backspace => self.buf.backspace(),
            Up => self.buf.move_cursor_one(CursorDir::Up),
            Down => self.buf.move_cursor_one(CursorDir::Down),
            Left => self.buf.move_cursor_one(CursorDir::Left),
            Right => self.buf.move_cursor_one(CursorDir::Right),
            Char(c) => self.buf.insert_char(c),
        }

        // Any other key cancels quitting and hides the message
        self.quitting = false;
        self.screen.unset_message();
        None
    }

    pub fn edit(&mut self) -> Result<Outcome> {
        self.screen.render(&self.buf, false)?; // First paint

        loop {
            if self.screen.maybe_resize() {
                self.screen.render(&self.buf, false)?;
            }

            let key = match self.input.poll()? {
                Some(key) => key,
                None => {
                    // Input is idle. Draw the last state if it was dropped by rate limit
                    if self.screen.has_pending() {
                        self.screen.render(&self.buf, false)?;
                    }
                    continue;
                }
            };
            tracing::trace!("Key: {}", key);

            if let Some(outcome) = self.process_keypress(key) {
                self.state = State::Exiting;
                self.screen.clear()?;
                return Ok(outcome);
            }

            self.screen.render(&self.buf, true)?;
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn buf(&self) -> &TextBuffer {
        &self.buf
    }

    pub fn lines(&self) -> Lines<'_> {
        self.buf.lines()
    }

    pub fn screen(&self) -> &'_ Screen<W> {
        &self.screen
    }
}
