fn byte_index_at<S: AsRef<str>>(at: usize, s: S) -> Option<usize> {
    s.as_ref().char_indices().nth(at).map(|c| c.0)
}

// One line of text. Indices given to its methods are counted in chars, not bytes
#[derive(Default, Clone, PartialEq, Eq, Debug)]
pub struct Row {
    buf: String,
    len: usize,
}

impl Row {
    pub fn new<S: Into<String>>(line: S) -> Row {
        let buf = line.into();
        let len = buf.chars().count();
        Row { buf, len }
    }

    pub fn empty() -> Row {
        Row::default()
    }

    pub fn buffer(&self) -> &str {
        self.buf.as_str()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // Leading spaces and tabs
    pub fn indent(&self) -> &str {
        let end = self
            .buf
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(self.buf.len());
        &self.buf[..end]
    }

    pub fn insert_char(&mut self, at: usize, c: char) {
        if self.len <= at {
            self.buf.push(c);
        } else {
            let idx = byte_index_at(at, &self.buf).unwrap_or(0);
            self.buf.insert(idx, c);
        }
        self.len += 1;
    }

    pub fn delete_char(&mut self, at: usize) {
        if at < self.len {
            let idx = byte_index_at(at, &self.buf).unwrap_or(0);
            self.buf.remove(idx);
            self.len -= 1;
        }
    }

    pub fn append<S: AsRef<str>>(&mut self, s: S) {
        let s = s.as_ref();
        if s.is_empty() {
            return;
        }
        self.buf.push_str(s);
        self.len += s.chars().count();
    }

    // Truncate the row at `at` and return the rest
    pub fn split_off(&mut self, at: usize) -> String {
        if at >= self.len {
            return String::new();
        }
        let idx = byte_index_at(at, &self.buf).unwrap_or(0);
        let rest = self.buf.split_off(idx);
        self.len = at;
        rest
    }
}
