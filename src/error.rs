use std::io;
use thiserror::Error;

// Deriving Debug is necessary to use .expect() method
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IoError(#[from] io::Error),
    #[error("Standard input is not a terminal. Raw mode is not available")]
    NotATerminal,
    #[error("Screen height {0} is too small. At least 1 row is necessary")]
    InvalidHeight(usize),
    #[error("{0}")]
    InvalidOption(String),
    #[error("Could not set up logging: {0}")]
    Logging(String),
}

impl From<getopts::Fail> for Error {
    fn from(err: getopts::Fail) -> Error {
        Error::InvalidOption(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
