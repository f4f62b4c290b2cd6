//! The `compile` subcommand: discovers `.jack` inputs, compiles each, and
//! writes the resulting VM text — exactly the one job spec.md leaves to an
//! external driver.

use std::path::PathBuf;

use tracing::{debug, error, info};

use crate::commands::traits::Command;
use crate::discover::{discover, Job};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct CompileArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub verbose: bool,
    pub keep_on_error: bool,
}

/// Summary of one driver invocation, used by `main` to pick an exit code
/// and by tests to assert on outcomes without parsing stdout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileSummary {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

impl CompileSummary {
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct CompileCommand {
    args: CompileArgs,
}

impl CompileCommand {
    fn compile_job(&self, job: &Job) -> std::result::Result<(), ()> {
        if self.args.verbose {
            info!(input = %job.input.display(), output = %job.output.display(), "compiling");
        }

        let source = match std::fs::read_to_string(&job.input) {
            Ok(s) => s,
            Err(e) => {
                error!(input = %job.input.display(), error = %e, "failed to read source");
                return Err(());
            }
        };

        // Tokenized again, separately from `jackc_par::compile`'s own
        // internal pass, purely to report a token count per file for
        // observability during batch compiles; a lex failure here is not
        // reported — `compile` below will surface it through its own
        // error path.
        if let Ok(tokens) = jackc_lex::Lexer::tokenize(&source) {
            debug!(file = %job.input.display(), tokens = tokens.len(), "tokenized");
        }

        match jackc_par::compile(&source) {
            Ok(vm_text) => match std::fs::write(&job.output, vm_text) {
                Ok(()) => Ok(()),
                Err(e) => {
                    error!(output = %job.output.display(), error = %e, "failed to write output");
                    Err(())
                }
            },
            Err(e) => {
                error!(
                    input = %job.input.display(),
                    category = ?e.category(),
                    line = e.line(),
                    "{}", e
                );
                if !self.args.keep_on_error && job.output.exists() {
                    let _ = std::fs::remove_file(&job.output);
                }
                Err(())
            }
        }
    }

    pub fn run(&self) -> Result<CompileSummary> {
        let jobs = discover(&self.args.input, self.args.output.as_deref())?;
        let mut summary = CompileSummary::default();

        // Every discovered file is compiled even after an earlier one
        // fails, so a directory run reports every bad file in one pass.
        for job in &jobs {
            match self.compile_job(job) {
                Ok(()) => summary.succeeded.push(job.output.clone()),
                Err(()) => summary.failed.push(job.input.clone()),
            }
        }

        if self.args.verbose {
            info!(
                succeeded = summary.succeeded.len(),
                failed = summary.failed.len(),
                "compilation finished"
            );
        }

        Ok(summary)
    }
}

impl Command for CompileCommand {
    type Args = CompileArgs;
    type Output = CompileSummary;

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "compile"
    }
}

pub fn run_compile(args: CompileArgs) -> Result<CompileSummary> {
    CompileCommand::new(args).run()
}
