use crate::error::Result;
use crate::row::Row;
use std::fs;
use std::path::{Path, PathBuf};
use std::slice;

// Contain both actual path sequence and display string
pub struct FilePath {
    pub path: PathBuf,
    pub display: String,
}

impl FilePath {
    fn from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        FilePath {
            path: PathBuf::from(path),
            display: path.to_string_lossy().to_string(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CursorDir {
    Left,
    Right,
    Up,
    Down,
}

pub struct Lines<'a>(slice::Iter<'a, Row>);

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|r| r.buffer())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.as_slice().len();
        (len, Some(len))
    }
}

impl<'a> ExactSizeIterator for Lines<'a> {}

fn split_lines(text: &str) -> Vec<Row> {
    let row: Vec<_> = text.lines().map(Row::new).collect();
    if row.is_empty() {
        vec![Row::empty()] // Empty file still has one line to edit
    } else {
        row
    }
}

pub struct TextBuffer {
    // (x, y) coordinate in internal text buffer of rows. x is counted in chars
    cx: usize,
    cy: usize,
    // File editor is opening
    file: Option<FilePath>,
    // Lines of text buffer. Never empty
    row: Vec<Row>,
    // Lines as they were loaded. Compared with `row` to know the buffer is modified
    snapshot: Vec<Row>,
    // File did not exist when it was opened
    new_file: bool,
}

impl TextBuffer {
    pub fn empty() -> Self {
        Self::from_rows(vec![Row::empty()], None)
    }

    pub fn with_lines<'a, I: Iterator<Item = &'a str>>(lines: I) -> Self {
        let mut row: Vec<_> = lines.map(Row::new).collect();
        if row.is_empty() {
            row.push(Row::empty());
        }
        Self::from_rows(row, None)
    }

    fn from_rows(row: Vec<Row>, file: Option<FilePath>) -> Self {
        Self {
            cx: 0,
            cy: 0,
            file,
            snapshot: row.clone(),
            row,
            new_file: false,
        }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = Some(FilePath::from(path));
        if !path.exists() {
            // When the path does not exist, consider it as a new file
            tracing::info!("New file: {}", path.display());
            let mut buf = Self::from_rows(vec![Row::empty()], file);
            buf.new_file = true;
            return Ok(buf);
        }

        let text = fs::read_to_string(path)?;
        let row = split_lines(&text);
        tracing::info!("Loaded {} lines from {}", row.len(), path.display());
        Ok(Self::from_rows(row, file))
    }

    pub fn insert_char(&mut self, ch: char) {
        self.row[self.cy].insert_char(self.cx, ch);
        self.cx += 1;
    }

    // Enter key. New line inherits indentation of current line
    pub fn split_line(&mut self) {
        let row = &mut self.row[self.cy];
        let indent = row.indent().to_owned();
        let rest = row.split_off(self.cx);

        let mut next = Row::new(indent);
        let cx = next.len();
        next.append(rest);
        self.row.insert(self.cy + 1, next);

        self.cy += 1;
        self.cx = cx;
    }

    pub fn backspace(&mut self) {
        if self.cx > 0 {
            self.cx -= 1;
            self.row[self.cy].delete_char(self.cx);
        } else if self.cy > 0 {
            // At top of line, backspace concats current line to previous line
            let removed = self.row.remove(self.cy);
            self.cy -= 1;
            let prev = &mut self.row[self.cy];
            self.cx = prev.len(); // Move cursor column to end of previous line
            prev.append(removed.buffer());
        }
    }

    pub fn move_cursor_one(&mut self, dir: CursorDir) {
        match dir {
            CursorDir::Up => self.cy = self.cy.saturating_sub(1),
            CursorDir::Left => {
                if self.cx > 0 {
                    self.cx -= 1;
                } else if self.cy > 0 {
                    // When moving to left at top of line, move cursor to end of previous line
                    self.cy -= 1;
                    self.cx = self.row[self.cy].len();
                }
            }
            CursorDir::Down => {
                if self.cy + 1 < self.row.len() {
                    self.cy += 1;
                }
            }
            CursorDir::Right => {
                let len = self.row[self.cy].len();
                if self.cx < len {
                    self.cx += 1;
                } else if self.cy + 1 < self.row.len() {
                    // When moving to right at the end of line, move cursor to top of next line.
                    self.cy += 1;
                    self.cx = 0;
                }
            }
        };

        // Snap cursor to end of line when moving up/down from longer line
        let len = self.row[self.cy].len();
        if self.cx > len {
            self.cx = len;
        }
    }

    pub fn is_new_file(&self) -> bool {
        self.new_file
    }

    pub fn is_modified(&self) -> bool {
        self.row != self.snapshot
    }

    pub fn rows(&self) -> &[Row] {
        &self.row
    }

    pub fn line_count(&self) -> usize {
        self.row.len()
    }

    pub fn lines(&self) -> Lines<'_> {
        Lines(self.row.iter())
    }

    // Text to be written to the file. Lines are joined with \n and no newline is added at the end
    pub fn contents(&self) -> String {
        self.lines().collect::<Vec<_>>().join("\n")
    }

    pub fn cx(&self) -> usize {
        self.cx
    }

    pub fn cy(&self) -> usize {
        self.cy
    }

    /// Cursor position as `(line, column)`.
    pub fn cursor(&self) -> (usize, usize) {
        (self.cy, self.cx)
    }

    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(|f| f.path.as_path())
    }

    pub fn filename(&self) -> &str {
        self.file
            .as_ref()
            .map(|f| f.display.as_str())
            .unwrap_or("[No Name]")
    }

    // Returns the number of bytes written. On failure, returns a message to show to user
    pub fn save(&mut self) -> std::result::Result<usize, String> {
        let file = if let Some(file) = &self.file {
            file
        } else {
            return Err("Could not save: No file name".to_string());
        };

        if let Some(dir) = file.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)
                    .map_err(|e| format!("Could not create {}: {}", dir.display(), e))?;
            }
        }

        let contents = self.contents();
        fs::write(&file.path, contents.as_bytes())
            .map_err(|e| format!("Could not save {}: {}", &file.display, e))?;

        self.snapshot = self.row.clone();
        Ok(contents.len())
    }
}
