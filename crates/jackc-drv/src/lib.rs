//! jackc-drv — Command-Line Driver
//!
//! Everything spec.md's core explicitly leaves to "an external driver":
//! CLI argument parsing, `.jack` file/directory discovery and output-path
//! pairing, reading sources and writing `.vm` text, logging, and optional
//! project configuration. None of this participates in compilation
//! semantics — it calls straight into [`jackc_par::compile`] per file.

pub mod commands;
pub mod config;
pub mod discover;
pub mod error;

pub use commands::compile::CompileSummary;
pub use commands::{run_compile, CompileArgs};
pub use config::Config;
pub use error::{DriverError, Result};
