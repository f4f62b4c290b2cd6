//! jackc - Jack-to-Hack-VM compiler CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jackc_drv::{run_compile, CompileArgs, Config};

/// jackc - compiles Jack source files to Hack VM assembly.
#[derive(Parser, Debug)]
#[command(name = "jackc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compiles Jack source files to Hack VM assembly", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true, env = "JACKC_VERBOSE")]
    verbose: bool,

    /// Path to a `jackc.toml` configuration file.
    #[arg(long, global = true, env = "JACKC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a `.jack` file or every `.jack` file in a directory.
    Compile(CompileCommand),
}

#[derive(Parser, Debug)]
struct CompileCommand {
    /// A `.jack` source file, or a directory containing `.jack` files.
    path: PathBuf,

    /// Output directory (default: alongside the input).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep a failed file's partially-written output instead of deleting it.
    #[arg(long)]
    keep_on_error: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Compile(args) => {
            let verbose = cli.verbose || config.verbose;
            let output = args.output.or_else(|| config.output_dir.clone().map(PathBuf::from));
            let keep_on_error = args.keep_on_error || config.keep_on_error;

            let summary = run_compile(CompileArgs {
                input: args.path,
                output,
                verbose,
                keep_on_error,
            })?;

            for path in &summary.failed {
                eprintln!("failed: {}", path.display());
            }

            if !summary.all_ok() {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false).with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compile_subcommand() {
        let cli = Cli::parse_from(["jackc", "compile", "Main.jack"]);
        assert!(matches!(cli.command, Commands::Compile(_)));
    }

    #[test]
    fn parses_compile_with_output_and_flags() {
        let cli = Cli::parse_from([
            "jackc",
            "--verbose",
            "compile",
            "src/",
            "--output",
            "build/",
            "--keep-on-error",
        ]);
        assert!(cli.verbose);
        if let Commands::Compile(args) = cli.command {
            assert_eq!(args.path, PathBuf::from("src/"));
            assert_eq!(args.output, Some(PathBuf::from("build/")));
            assert!(args.keep_on_error);
        } else {
            panic!("expected Compile command");
        }
    }
}
