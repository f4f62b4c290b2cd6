//! Command implementations for the jackc CLI.

pub mod compile;
pub mod traits;

pub use compile::{run_compile, CompileArgs};
