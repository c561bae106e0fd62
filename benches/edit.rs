use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{self, Write};
use std::time::Duration;
use yapper::{Editor, Key, KeyReader, Result, Screen, TextBuffer, Viewport};

fn gen_printable_ascii_char<R: Rng>(rng: &mut R) -> char {
    rng.gen_range(0x20u8..0x7f) as char
}

fn generate_random_text(max_chars: usize) -> Vec<String> {
    let max_chars_in_line = 200;
    let mut lines = vec!["".to_string()];
    let mut rng = StdRng::seed_from_u64(0);
    let mut rest = rng.gen_range(0..max_chars_in_line);
    for _ in 0..max_chars {
        if rest == 0 {
            lines.push("".to_string());
            rest = rng.gen_range(0..max_chars_in_line);
            continue;
        }
        if let Some(line) = lines.last_mut() {
            line.push(gen_printable_ascii_char(&mut rng));
        }
        rest -= 1;
    }
    lines
}

const SPECIAL_KEYS: &[Key] = &[
    Key::Enter,
    Key::Backspace,
    Key::Up,
    Key::Down,
    Key::Left,
    Key::Right,
];

// Random key strokes finished by two exits. Unnamed buffer cannot be saved so the second exit
// discards the buffer
#[derive(Clone)]
struct RandomInput {
    rng: StdRng,
    rest_steps: usize,
}

impl RandomInput {
    fn new(num_steps: usize) -> Self {
        RandomInput {
            rng: StdRng::seed_from_u64(0),
            rest_steps: num_steps,
        }
    }

    fn random_key(&mut self) -> Key {
        match self.rng.gen_range(0..100) {
            0..=29 => SPECIAL_KEYS[self.rng.gen_range(0..SPECIAL_KEYS.len())],
            _ => Key::Char(gen_printable_ascii_char(&mut self.rng)),
        }
    }
}

impl KeyReader for RandomInput {
    fn poll(&mut self) -> Result<Option<Key>> {
        if self.rest_steps == 0 {
            return Ok(Some(Key::Exit));
        }
        self.rest_steps -= 1;
        Ok(Some(self.random_key()))
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

fn run_editor(lines: &[String], input: RandomInput, frame_interval: Duration) {
    let buf = TextBuffer::with_lines(lines.iter().map(String::as_str));
    let screen = Screen::new(Discard, Viewport::default(), frame_interval);
    let mut editor = Editor::new(buf, input, screen);
    black_box(editor.edit().unwrap());
}

fn bench_edit(c: &mut Criterion) {
    let lines = generate_random_text(10000);
    let input = RandomInput::new(1000);

    c.bench_function("1000 operations to 10000 chars text", |b| {
        b.iter(|| run_editor(&lines, input.clone(), Duration::ZERO))
    });

    c.bench_function("1000 operations with rate limited rendering", |b| {
        b.iter(|| run_editor(&lines, input.clone(), Duration::from_millis(16)))
    });

    c.bench_function("1000 operations to empty buffer", |b| {
        b.iter(|| run_editor(&[], input.clone(), Duration::ZERO))
    });
}

criterion_group!(benches, bench_edit);
criterion_main!(benches);
