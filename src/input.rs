use crate::error::Result;
use std::fmt;
use std::io::{self, Read};
use std::str;
use std::thread;
use std::time::Duration;

#[cfg(any(unix, windows))]
use crate::error::Error;
#[cfg(unix)]
use std::io::IsTerminal;
#[cfg(unix)]
use std::os::unix::io::AsRawFd;

#[cfg(windows)]
use std::collections::VecDeque;
#[cfg(windows)]
use std::mem;
#[cfg(windows)]
use windows_sys::Win32::Foundation::{HANDLE, INVALID_HANDLE_VALUE};
#[cfg(windows)]
use windows_sys::Win32::System::Console::{
    GetNumberOfConsoleInputEvents, GetStdHandle, ReadConsoleInputW, INPUT_RECORD, KEY_EVENT,
    STD_INPUT_HANDLE,
};

#[cfg(unix)]
pub struct StdinRawMode {
    stdin: io::Stdin,
    orig: termios::Termios,
}

#[cfg(unix)]
impl StdinRawMode {
    pub fn new() -> Result<StdinRawMode> {
        use termios::*;

        let stdin = io::stdin();
        if !stdin.is_terminal() {
            return Err(Error::NotATerminal);
        }
        let fd = stdin.as_raw_fd();
        let mut termios = Termios::from_fd(fd)?;
        let orig = termios;

        // Set terminal raw mode. Disable echo back, canonical mode, signals (SIGINT, SIGTSTP) and Ctrl+V.
        termios.c_lflag &= !(ECHO | ICANON | ISIG | IEXTEN);
        // Disable control flow mode (Ctrl+Q/Ctrl+S) and CR-to-NL translation
        termios.c_iflag &= !(IXON | ICRNL | BRKINT | INPCK | ISTRIP);
        // Disable output processing such as \n to \r\n translation
        termios.c_oflag &= !OPOST;
        // Ensure character size is 8bits
        termios.c_cflag |= CS8;
        // Do not wait for next byte with blocking since reading 0 byte is permitted
        termios.c_cc[VMIN] = 0;
        // Set read timeout to 1/10 second it enables 100ms timeout on read()
        termios.c_cc[VTIME] = 1;
        // Apply terminal configurations
        tcsetattr(fd, TCSAFLUSH, &termios)?;
        tracing::debug!("Entered raw mode on fd {}", fd);

        Ok(StdinRawMode { stdin, orig })
    }

    pub fn input_keys(self) -> RawKeys<StdinRawMode> {
        RawKeys::new(self)
    }
}

#[cfg(unix)]
impl Drop for StdinRawMode {
    fn drop(&mut self) {
        // Restore original terminal mode
        if let Err(err) = termios::tcsetattr(self.stdin.as_raw_fd(), termios::TCSAFLUSH, &self.orig)
        {
            tracing::warn!("Could not restore terminal mode: {}", err);
        }
    }
}

#[cfg(unix)]
impl Read for StdinRawMode {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stdin.read(buf)
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Key {
    Exit,
    Enter,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Char(char),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Key::*;
        match self {
            Exit => write!(f, "EXIT"),
            Enter => write!(f, "ENTER"),
            Backspace => write!(f, "BACKSPACE"),
            Up => write!(f, "UP"),
            Down => write!(f, "DOWN"),
            Left => write!(f, "LEFT"),
            Right => write!(f, "RIGHT"),
            Char(' ') => write!(f, "SPACE"),
            Char(c) => write!(f, "{}", c),
        }
    }
}

/// Source of logical key events.
///
/// `poll` waits at most a short while (about 100ms) for input. `Ok(None)` means either nothing
/// arrived or the input could not be mapped to a key; both are ignored by the editor.
pub trait KeyReader {
    fn poll(&mut self) -> Result<Option<Key>>;
}

impl<K: KeyReader + ?Sized> KeyReader for Box<K> {
    fn poll(&mut self) -> Result<Option<Key>> {
        (**self).poll()
    }
}

/// Decodes bytes from a terminal in raw mode. Reading 0 bytes from `R` means the read timed out.
pub struct RawKeys<R: Read> {
    input: R,
    // Byte which was read ahead but belongs to the next key
    next_byte: Option<u8>,
}

impl<R: Read> RawKeys<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            next_byte: None,
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.input
    }

    pub fn has_next_byte(&self) -> bool {
        self.next_byte.is_some()
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        if let Some(b) = self.next_byte.take() {
            return Ok(Some(b));
        }
        let mut one_byte: [u8; 1] = [0];
        match self.input.read(&mut one_byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(one_byte[0])),
            // e.g. SIGWINCH arrived while waiting. Treat it as timeout so that caller can handle it
            Err(err) if err.kind() == io::ErrorKind::Interrupted => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn decode_escape_sequence(&mut self) -> Result<Option<Key>> {
        // Try to read expecting '[' as escape sequence header. Note that, if next input does
        // not arrive within next tick, it means that ESC key was pressed alone.
        match self.read_byte()? {
            Some(b'[') => { /* fall through */ }
            _ => return Ok(Some(Key::Exit)),
        }

        // Now confirmed \x1b[ which is a header of CSI sequence. Eat parameters until the final
        // byte so that the rest of unknown sequence does not leak into the text.
        let cmd = loop {
            match self.read_byte()? {
                Some(b @ 0x40..=0x7e) => break b,
                Some(_) => continue,
                None => return Ok(None), // Sequence was cut off
            }
        };

        // Modifiers such as \x1b[1;5A (C-<UP>) are ignored
        Ok(match cmd {
            b'A' => Some(Key::Up),
            b'B' => Some(Key::Down),
            b'C' => Some(Key::Right),
            b'D' => Some(Key::Left),
            _ => None,
        })
    }

    fn decode_utf8(&mut self, b: u8) -> Result<Option<Key>> {
        let len = match b {
            0xc2..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf4 => 4,
            _ => return Ok(None), // Stray continuation byte or invalid lead byte
        };

        let mut buf = [0; 4];
        buf[0] = b;
        for i in 1..len {
            match self.read_byte()? {
                Some(b @ 0x80..=0xbf) => buf[i] = b,
                Some(b) => {
                    // Not a continuation byte. Drop the broken sequence and decode the byte as
                    // the next key
                    self.next_byte = Some(b);
                    return Ok(None);
                }
                None => return Ok(None),
            }
        }

        Ok(str::from_utf8(&buf[..len])
            .ok()
            .and_then(|s| s.chars().next())
            .filter(|c| !c.is_control())
            .map(Key::Char))
    }

    fn decode(&mut self, b: u8) -> Result<Option<Key>> {
        match b {
            0x1b => self.decode_escape_sequence(),
            b'\r' | b'\n' => Ok(Some(Key::Enter)),
            0x7f | 0x08 => Ok(Some(Key::Backspace)),
            0x18 => Ok(Some(Key::Exit)), // Ctrl-X
            0x20..=0x7e => Ok(Some(Key::Char(b as char))),
            0x80..=0xff => self.decode_utf8(b),
            _ => Ok(None),
        }
    }
}

impl<R: Read> KeyReader for RawKeys<R> {
    // Read next byte with timeout 100ms. If nothing was read, it returns None.
    fn poll(&mut self) -> Result<Option<Key>> {
        match self.read_byte()? {
            Some(b) => self.decode(b),
            None => Ok(None),
        }
    }
}

/// getch-style console which returns one UTF-16 unit per call. Extended keys such as arrows are
/// returned as two calls: a prefix (0x00 or 0xe0) and then the scan code.
pub trait ConsoleSource {
    fn key_available(&mut self) -> bool;
    fn read_unit(&mut self) -> u16;
}

const POLL_STEP: Duration = Duration::from_millis(10);
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

const ARROW_SCAN_CODES: [(u16, Key); 4] = [
    (b'H' as u16, Key::Up),
    (b'P' as u16, Key::Down),
    (b'K' as u16, Key::Left),
    (b'M' as u16, Key::Right),
];

pub struct ConsoleKeys<S: ConsoleSource> {
    source: S,
}

impl<S: ConsoleSource> ConsoleKeys<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    fn wait_for_key(&mut self) -> bool {
        let mut waited = Duration::ZERO;
        while !self.source.key_available() {
            if waited >= POLL_TIMEOUT {
                return false;
            }
            thread::sleep(POLL_STEP);
            waited += POLL_STEP;
        }
        true
    }

    fn decode_extended(&mut self) -> Option<Key> {
        let code = self.source.read_unit();
        ARROW_SCAN_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, key)| *key)
    }

    fn decode(&mut self, unit: u16) -> Option<Key> {
        match unit {
            0x00 => self.decode_extended(),
            // 0xe0 is also 'à'. A real extended key always has its scan code queued
            0xe0 if self.source.key_available() => self.decode_extended(),
            0x1b | 0x18 => Some(Key::Exit),
            0x0d => Some(Key::Enter),
            0x08 => Some(Key::Backspace),
            // Characters outside BMP arrive as a surrogate pair
            0xd800..=0xdbff if self.source.key_available() => {
                let low = self.source.read_unit();
                char::decode_utf16([unit, low])
                    .next()
                    .and_then(|r| r.ok())
                    .filter(|c| !c.is_control())
                    .map(Key::Char)
            }
            u => char::from_u32(u as u32)
                .filter(|c| !c.is_control())
                .map(Key::Char),
        }
    }
}

impl<S: ConsoleSource> KeyReader for ConsoleKeys<S> {
    fn poll(&mut self) -> Result<Option<Key>> {
        if !self.wait_for_key() {
            return Ok(None);
        }
        let unit = self.source.read_unit();
        Ok(self.decode(unit))
    }
}

/// Console input read through `ReadConsoleInputW`. Key events are translated to getch-style
/// units: a character as its UTF-16 unit, and a key without character as `0x00` followed by its
/// scan code.
#[cfg(windows)]
pub struct WindowsConsole {
    handle: HANDLE,
    units: VecDeque<u16>,
}

#[cfg(windows)]
impl WindowsConsole {
    pub fn new() -> Result<Self> {
        let handle = unsafe { GetStdHandle(STD_INPUT_HANDLE) };
        if handle.is_null() || handle == INVALID_HANDLE_VALUE {
            return Err(Error::NotATerminal);
        }
        Ok(Self {
            handle,
            units: VecDeque::new(),
        })
    }

    // Move all queued console input records into `units` without blocking
    fn fill_units(&mut self) {
        loop {
            let mut count = 0;
            if unsafe { GetNumberOfConsoleInputEvents(self.handle, &mut count) } == 0 || count == 0
            {
                return;
            }

            let mut record: INPUT_RECORD = unsafe { mem::zeroed() };
            let mut read = 0;
            if unsafe { ReadConsoleInputW(self.handle, &mut record, 1, &mut read) } == 0 || read == 0
            {
                return;
            }
            if record.EventType as u32 != KEY_EVENT as u32 {
                continue; // Mouse, focus, resize, ...
            }

            let event = unsafe { record.Event.KeyEvent };
            if event.bKeyDown == 0 {
                continue;
            }
            let unit = unsafe { event.uChar.UnicodeChar };
            for _ in 0..event.wRepeatCount.max(1) {
                if unit != 0 {
                    self.units.push_back(unit);
                } else {
                    self.units.push_back(0x00);
                    self.units.push_back(event.wVirtualScanCode);
                }
            }
        }
    }
}

#[cfg(windows)]
impl ConsoleSource for WindowsConsole {
    fn key_available(&mut self) -> bool {
        if self.units.is_empty() {
            self.fill_units();
        }
        !self.units.is_empty()
    }

    fn read_unit(&mut self) -> u16 {
        self.units.pop_front().unwrap_or(0)
    }
}

/// Open the key reader for the current platform. On Unix-like systems the returned reader owns
/// the raw mode guard so terminal attributes are restored when it is dropped.
#[cfg(unix)]
pub fn open_key_reader() -> Result<Box<dyn KeyReader>> {
    Ok(Box::new(StdinRawMode::new()?.input_keys()))
}

#[cfg(windows)]
pub fn open_key_reader() -> Result<Box<dyn KeyReader>> {
    Ok(Box::new(ConsoleKeys::new(WindowsConsole::new()?)))
}
