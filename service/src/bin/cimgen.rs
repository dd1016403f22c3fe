//! `cimgen` command-line tool

use cimgen_core::error::CimgenError;
use cimgen_service::cli::CimgenApp;
use colored::Colorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    let app = CimgenApp::from_args();
    app.init_logging();

    match app.run() {
        Ok(report) => {
            if !app.cli().quiet {
                println!(
                    "{} Generated {} files for {} classes",
                    "✓".green(),
                    report.files.len(),
                    report.class_count
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            match err.downcast_ref::<CimgenError>() {
                Some(cimgen_err) => {
                    let errors = cimgen_err.errors();
                    for error in &errors {
                        eprintln!("{} {error}", "error:".red().bold());
                    }
                    if errors.len() > 1 {
                        eprintln!("{}", format!("{} errors", errors.len()).red());
                    }
                }
                None => eprintln!("{} {err:#}", "error:".red().bold()),
            }
            ExitCode::FAILURE
        }
    }
}
