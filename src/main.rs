use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::exit;
use yapper::{
    logging, open_key_reader, terminal_width, Config, Editor, Outcome, Parsed, Result, Screen,
    TextBuffer, Viewport, VERSION,
};

fn ask_filename() -> Result<Option<PathBuf>> {
    let mut stdout = io::stdout();
    write!(stdout, "Enter filename: ")?;
    stdout.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None); // EOF
    }
    let name = line.trim();
    Ok(if name.is_empty() {
        None
    } else {
        Some(PathBuf::from(name))
    })
}

fn edit(config: Config) -> Result<Option<Outcome>> {
    if let Some(log) = &config.log_file {
        logging::init_global(log)?;
    }

    let path = match config.file {
        Some(path) => path,
        None => match ask_filename()? {
            Some(path) => path,
            None => return Ok(None),
        },
    };

    // Load file before entering raw mode so that errors are printed to normal terminal
    let buf = TextBuffer::open(&path)?;
    let viewport = Viewport::new(config.height)?;

    // Raw mode is enabled while the key reader is alive
    let input = open_key_reader()?;
    let mut screen = Screen::new(io::stdout(), viewport, config.frame_interval);
    screen.set_width(terminal_width());
    screen.watch_resize()?;

    let mut editor = Editor::new(buf, input, screen);
    let outcome = editor.edit()?;
    Ok(Some(outcome))
}

fn main() {
    let config = match Config::from_args(env::args()) {
        Ok(Parsed::Run(config)) => config,
        Ok(Parsed::Help(usage)) => {
            println!("{}", usage);
            return;
        }
        Ok(Parsed::Version) => {
            println!("{}", VERSION);
            return;
        }
        Err(err) => {
            eprintln!("{}", err);
            exit(2);
        }
    };

    match edit(config) {
        Ok(Some(Outcome::Saved { path, bytes })) => {
            println!("File saved to: {} ({} bytes)", path.display(), bytes)
        }
        Ok(Some(Outcome::Discarded)) => println!("Exited without saving"),
        Ok(None) => println!("No file name was given"),
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        }
    }
}
