//! Input discovery and output-path pairing.
//!
//! A single `.jack` file compiles alone; a directory is walked with
//! `std::fs::read_dir` and every `.jack` entry (case-sensitive extension,
//! matching spec §6's "file extension `.jack` by convention") is paired
//! with an output path of the same stem and a `.vm` extension, rooted in
//! the output directory.

use std::path::{Path, PathBuf};

use crate::error::{DriverError, Result};

/// One input `.jack` file paired with the `.vm` file the driver will write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Resolves `input_path` (a file or a directory) plus an optional explicit
/// output directory into the list of compile jobs.
pub fn discover(input_path: &Path, output_dir: Option<&Path>) -> Result<Vec<Job>> {
    if !input_path.exists() {
        return Err(DriverError::InputNotFound(input_path.to_path_buf()));
    }

    if input_path.is_file() {
        if input_path.extension().and_then(|e| e.to_str()) != Some("jack") {
            return Err(DriverError::InvalidInput(input_path.to_path_buf()));
        }
        let output = output_path_for(input_path, output_dir.unwrap_or_else(|| parent_or_cwd(input_path)));
        return Ok(vec![Job {
            input: input_path.to_path_buf(),
            output,
        }]);
    }

    if input_path.is_dir() {
        let out_dir = output_dir.unwrap_or(input_path);
        let mut jobs = Vec::new();
        for entry in std::fs::read_dir(input_path)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("jack") {
                jobs.push(Job {
                    output: output_path_for(&path, out_dir),
                    input: path,
                });
            }
        }
        jobs.sort_by(|a, b| a.input.cmp(&b.input));
        return Ok(jobs);
    }

    Err(DriverError::InvalidInput(input_path.to_path_buf()))
}

fn output_path_for(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    out_dir.join(stem).with_extension("vm")
}

fn parent_or_cwd(path: &Path) -> &Path {
    path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."))
}
