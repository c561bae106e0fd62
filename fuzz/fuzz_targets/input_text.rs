#![no_main]
use libfuzzer_sys::fuzz_target;
extern crate yapper;

use std::io::{self, Write};
use std::str;
use std::time::Duration;
use yapper::{Editor, Key, KeyReader, Outcome, RawKeys, Result, Screen, TextBuffer, Viewport};

// Decode fuzzed bytes as terminal input. After all bytes are consumed, keep sending exit. The
// text buffer has no file so the first exit fails to save and the second one quits
struct FuzzInput<'a>(RawKeys<&'a [u8]>);

impl<'a> KeyReader for FuzzInput<'a> {
    fn poll(&mut self) -> Result<Option<Key>> {
        if self.0.get_ref().is_empty() && !self.0.has_next_byte() {
            return Ok(Some(Key::Exit));
        }
        self.0.poll()
    }
}

struct Discard;

impl Write for Discard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let text = str::from_utf8(data).unwrap_or("");
    let buf = TextBuffer::with_lines(text.lines());
    let screen = Screen::new(Discard, Viewport::new(5).unwrap(), Duration::ZERO);
    let mut editor = Editor::new(buf, FuzzInput(RawKeys::new(data)), screen);
    // Editor must quit successfully
    assert_eq!(editor.edit().unwrap(), Outcome::Discarded);
});
