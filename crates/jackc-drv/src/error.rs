//! Error handling for the jackc driver.
//!
//! Mirrors `faxt`'s `error` module: one `thiserror`-derived enum for
//! driver-specific failures (path validation, config parsing), with
//! `#[from]` conversions for the two things that bubble up unannotated
//! (I/O, and a file's compile error).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("input path does not exist: {0}")]
    InputNotFound(std::path::PathBuf),

    #[error("input path is neither a .jack file nor a directory: {0}")]
    InvalidInput(std::path::PathBuf),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Compile(#[from] jackc_par::CompileError),
}

pub type Result<T> = std::result::Result<T, DriverError>;
