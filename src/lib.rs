// Refs:
//   Build Your Own Text Editor: https://viewsourcecode.org/snaptoken/kilo/index.html
//   VT100 User Guide: https://vt100.net/docs/vt100-ug/chapter3.html

pub mod config;
mod editor;
mod error;
mod input;
pub mod logging;
mod row;
mod screen;
#[cfg(unix)]
mod signal;
mod text_buffer;
mod viewport;


pub use config::{Config, Parsed, VERSION};
pub use editor::{Editor, Outcome, State};
pub use error::{Error, Result};
#[cfg(unix)]
pub use input::StdinRawMode;
#[cfg(windows)]
pub use input::WindowsConsole;
pub use input::{open_key_reader, ConsoleKeys, ConsoleSource, Key, KeyReader, RawKeys};
pub use row::Row;
pub use screen::{terminal_width, Screen, CURSOR_GLYPH, DEFAULT_FRAME_INTERVAL};
pub use text_buffer::{CursorDir, Lines, TextBuffer};
pub use viewport::{Viewport, ViewportWindow, DEFAULT_HEIGHT};
