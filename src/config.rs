use crate::error::{Error, Result};
use crate::screen::DEFAULT_FRAME_INTERVAL;
use crate::viewport::DEFAULT_HEIGHT;
use getopts::Options;
use std::path::PathBuf;
use std::time::Duration;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // None means asking file name on startup
    pub file: Option<PathBuf>,
    pub height: usize,
    pub frame_interval: Duration,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: None,
            height: DEFAULT_HEIGHT,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            log_file: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Parsed {
    Run(Config),
    Help(String),
    Version,
}

fn options() -> Options {
    let mut opts = Options::new();
    opts.optopt("H", "height", "Number of text rows on screen (default: 12)", "N");
    opts.optopt(
        "",
        "frame-interval",
        "Minimum milliseconds between screen updates (default: 16)",
        "MS",
    );
    opts.optopt("", "log", "Write debug log to FILE", "FILE");
    opts.optflag("v", "version", "Print version");
    opts.optflag("h", "help", "Print this help");
    opts
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::InvalidOption(format!("Invalid value for --{}: {:?}", name, value)))
}

impl Config {
    /// Parse command line arguments. The first item is the program name.
    pub fn from_args<I, S>(args: I) -> Result<Parsed>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        let program = args.first().map(String::as_str).unwrap_or("yapper");
        let opts = options();
        let matches = opts.parse(args.iter().skip(1))?;

        if matches.opt_present("h") {
            let brief = format!("Usage: {} [options] [FILE]", program);
            return Ok(Parsed::Help(opts.usage(&brief)));
        }
        if matches.opt_present("v") {
            return Ok(Parsed::Version);
        }

        let mut config = Config::default();
        if let Some(h) = matches.opt_str("height") {
            config.height = parse_number("height", &h)?;
            if config.height == 0 {
                return Err(Error::InvalidHeight(config.height));
            }
        }
        if let Some(ms) = matches.opt_str("frame-interval") {
            config.frame_interval = Duration::from_millis(parse_number("frame-interval", &ms)?);
        }
        config.log_file = matches.opt_str("log").map(PathBuf::from);

        match matches.free.as_slice() {
            [] => {}
            [file] => config.file = Some(PathBuf::from(file)),
            _ => {
                return Err(Error::InvalidOption(
                    "At most one file can be opened".to_string(),
                ))
            }
        }

        Ok(Parsed::Run(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> Config {
        match Config::from_args(args.iter()).unwrap() {
            Parsed::Run(c) => c,
            p => panic!("unexpected: {:?}", p),
        }
    }

    #[test]
    fn defaults() {
        let c = run(&["yapper"]);
        assert_eq!(c, Config::default());
        assert_eq!(c.height, 12);
        assert_eq!(c.frame_interval, Duration::from_millis(16));
    }

    #[test]
    fn file_and_options() {
        let c = run(&[
            "yapper",
            "-H",
            "20",
            "--frame-interval",
            "0",
            "--log",
            "/tmp/yapper.log",
            "notes.txt",
        ]);
        assert_eq!(c.file, Some(PathBuf::from("notes.txt")));
        assert_eq!(c.height, 20);
        assert_eq!(c.frame_interval, Duration::ZERO);
        assert_eq!(c.log_file, Some(PathBuf::from("/tmp/yapper.log")));
    }

    #[test]
    fn help_and_version() {
        match Config::from_args(["yapper", "--help"]).unwrap() {
            Parsed::Help(usage) => {
                assert!(usage.contains("Usage: yapper [options] [FILE]"));
                assert!(usage.contains("--height"));
            }
            p => panic!("unexpected: {:?}", p),
        }
        assert_eq!(
            Config::from_args(["yapper", "-v"]).unwrap(),
            Parsed::Version
        );
    }

    #[test]
    fn invalid_options() {
        assert!(matches!(
            Config::from_args(["yapper", "--height", "0"]),
            Err(Error::InvalidHeight(0))
        ));
        assert!(matches!(
            Config::from_args(["yapper", "--height", "tall"]),
            Err(Error::InvalidOption(_))
        ));
        assert!(matches!(
            Config::from_args(["yapper", "--unknown"]),
            Err(Error::InvalidOption(_))
        ));
        assert!(matches!(
            Config::from_args(["yapper", "a.txt", "b.txt"]),
            Err(Error::InvalidOption(_))
        ));
    }
}
