use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::io::{self, Write};
use std::time::Duration;
use yapper::{Editor, Key, KeyReader, Result, Screen, TextBuffer, Viewport};

// Scroll down to the bottom of buffer and back to the top, then exit
#[derive(Clone)]
struct ScrollInput {
    times: usize,
    count: usize,
    down: bool,
}

impl ScrollInput {
    fn new(times: usize) -> Self {
        assert!(times > 0);
        Self {
            times,
            count: 0,
            down: true,
        }
    }
}

impl KeyReader for ScrollInput {
    fn poll(&mut self) -> Result<Option<Key>> {
        if !self.down && self.count == 0 {
            return Ok(Some(Key::Exit));
        }

        if self.count == self.times {
            self.down = false;
        }

        if self.down {
            self.count += 1;
            Ok(Some(Key::Down))
        } else {
            self.count -= 1;
            Ok(Some(Key::Up))
        }
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

fn long_text(lines: usize) -> Vec<String> {
    (0..lines)
        .map(|i| format!("{:>6}: the quick brown fox jumps over the lazy dog", i))
        .collect()
}

fn bench_scroll(c: &mut Criterion) {
    let lines = long_text(10000);

    for height in &[12, 50] {
        c.bench_function(&format!("scroll 10000 lines with height {}", height), |b| {
            b.iter(|| {
                let buf = TextBuffer::with_lines(lines.iter().map(String::as_str));
                let viewport = Viewport::new(*height).unwrap();
                let screen = Screen::new(Discard, viewport, Duration::ZERO);
                // Unnamed buffer is not saved. Second exit discards it
                let mut editor = Editor::new(buf, ScrollInput::new(lines.len()), screen);
                black_box(editor.edit().unwrap());
            })
        });
    }

    c.bench_function("compose frame", |b| {
        let buf = TextBuffer::with_lines(lines.iter().map(String::as_str));
        let screen = Screen::new(Discard, Viewport::default(), Duration::ZERO);
        b.iter(|| black_box(screen.compose(&buf)))
    });
}

criterion_group!(benches, bench_scroll);
criterion_main!(benches);
