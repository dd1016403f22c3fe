//! Command-line interface
//!
//! `cimgen <PROFILE> <LANGUAGE>` generates source code for the classes of
//! one profile.

use crate::driver::{GenerationDriver, GenerationReport, GenerationRequest};
use crate::generator::TargetLanguage;
use crate::loader::resolve_schema_paths;
use crate::profile::resolve_profile;
use anyhow::Context;
use cimgen_core::prelude::*;
use clap::Parser;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

/// Generate source code from CIM/CGMES RDF schemas
#[derive(Parser, Debug, Clone)]
#[command(name = "cimgen", author, version, about, long_about = None)]
pub struct CimgenCli {
    /// Profile file, configured profile name, `all`, or schema keyword such as `EQ`
    pub profile: String,

    /// Target language: python, java or cpp
    pub language: String,

    /// Schema files (glob patterns, repeatable)
    #[arg(short, long = "schema", value_name = "GLOB")]
    pub schema: Vec<String>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the filtered model as JSON
    #[arg(long, value_name = "FILE")]
    pub dump_model: Option<PathBuf>,

    /// Render classes on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// The `cimgen` application
pub struct CimgenApp {
    cli: CimgenCli,
}

impl CimgenApp {
    /// Create the application from command line arguments
    #[must_use]
    pub fn from_args() -> Self {
        Self::new(CimgenCli::parse())
    }

    #[must_use]
    pub fn new(cli: CimgenCli) -> Self {
        Self { cli }
    }

    #[must_use]
    pub fn cli(&self) -> &CimgenCli {
        &self.cli
    }

    /// Install the global tracing subscriber; `RUST_LOG` wins over the flags
    pub fn init_logging(&self) {
        let level = if self.cli.quiet {
            Level::ERROR
        } else if self.cli.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
            .ok();
    }

    /// Configuration file merged with command line overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded.
    pub fn config(&self) -> anyhow::Result<CimgenConfig> {
        let mut config = match &self.cli.config {
            Some(path) => CimgenConfig::from_file(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => CimgenConfig::default(),
        };
        if !self.cli.schema.is_empty() {
            config.schema.patterns.clone_from(&self.cli.schema);
        }
        if let Some(output) = &self.cli.output {
            config.output.directory.clone_from(output);
        }
        if self.cli.sequential {
            config.generator.parallel = false;
        }
        Ok(config)
    }

    /// Run one generation
    ///
    /// # Errors
    ///
    /// Returns every accumulated pipeline error; a [`CimgenError`] can be
    /// recovered with `downcast_ref`.
    pub fn run(&self) -> anyhow::Result<GenerationReport> {
        let config = self.config()?;
        let language: TargetLanguage = self.cli.language.parse()?;
        let profile = resolve_profile(&self.cli.profile, &config)?;
        let schema_files = resolve_schema_paths(&config.schema.patterns)?;
        info!(
            "Generating {language} for profile '{}' from {} schema files",
            profile.name,
            schema_files.len()
        );

        let mut request = GenerationRequest::new(
            schema_files,
            profile,
            language,
            config.output.directory.clone(),
        );
        if let Some(path) = &self.cli.dump_model {
            request = request.with_dump_model(path);
        }
        let report = GenerationDriver::new(config).run(&request)?;
        Ok(report)
    }
}
