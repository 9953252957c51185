use anyhow::{Result, bail};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tacho_ir::UnmarshalOptions;

use crate::{parse_input, read_input};

#[derive(Debug)]
pub struct CheckReport {
    pub path: PathBuf,
    /// Set when decoding, encoding or the byte comparison failed.
    pub failure: Option<String>,
    pub warnings: Vec<String>,
}

/// Decode, re-encode and compare one file.
pub fn check_file(input: &Path, options: &UnmarshalOptions) -> CheckReport {
    let mut report = CheckReport {
        path: input.to_path_buf(),
        failure: None,
        warnings: Vec::new(),
    };
    if let Err(e) = round_trip(input, options, &mut report.warnings) {
        report.failure = Some(format!("{e:#}"));
    }
    report
}

fn round_trip(input: &Path, options: &UnmarshalOptions, warnings: &mut Vec<String>) -> Result<()> {
    let data = read_input(input)?;
    let file = parse_input(input, &data, options)?;
    if let Err(errors) = tacho_ir::validate_file(&file) {
        warnings.extend(errors.iter().map(ToString::to_string));
    }

    let written = tacho_ir::marshal_file(&file)?;
    if written != data {
        let at = written.iter().zip(&data).position(|(a, b)| a != b).unwrap_or(written.len().min(data.len()));
        bail!(
            "re-encoded {} bytes differ from the {} input bytes at offset {at}",
            written.len(),
            data.len()
        );
    }
    Ok(())
}

pub fn run_check(inputs: &[PathBuf], quiet: bool, options: &UnmarshalOptions) -> Result<()> {
    let reports: Vec<CheckReport> = inputs.par_iter().map(|p| check_file(p, options)).collect();

    let mut failed = 0;
    for report in &reports {
        for w in &report.warnings {
            log::warn!("{}: {w}", report.path.display());
        }
        match &report.failure {
            Some(reason) => {
                failed += 1;
                eprintln!("{}: FAIL {reason}", report.path.display());
            }
            None if !quiet => println!("{}: ok", report.path.display()),
            None => {}
        }
    }

    if failed > 0 {
        bail!(
            "{failed} of {} file{} did not round-trip",
            reports.len(),
            if reports.len() == 1 { "" } else { "s" }
        );
    }
    Ok(())
}
