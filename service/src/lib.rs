//! # CIM code generator service
//!
//! Turns CIM/CGMES RDF schema files into per-class source code.
//!
//! The pipeline has five stages:
//!
//! - [`loader`] parses RDF/XML schema files into flat declarations;
//! - [`builder`] resolves them into a linked [`SchemaModel`];
//! - [`profile`] prunes the model to the classes of one profile;
//! - [`generator`] maps types and renders each class for a target language;
//! - [`driver`] runs the stages and writes the output tree.
//!
//! ```no_run
//! use cimgen_service::prelude::*;
//!
//! # fn main() -> cimgen_core::error::Result<()> {
//! let files = resolve_schema_paths(&["schemas/*.rdf"])?;
//! let request = GenerationRequest::new(files, Profile::all(), TargetLanguage::Python, "output");
//! let report = GenerationDriver::new(CimgenConfig::default()).run(&request)?;
//! println!("{} files", report.files.len());
//! # Ok(())
//! # }
//! ```
//!
//! [`SchemaModel`]: cimgen_core::types::SchemaModel

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod cli;
pub mod driver;
pub mod generator;
pub mod loader;
pub mod prelude;
pub mod profile;

pub use driver::{GenerationDriver, GenerationReport, GenerationRequest};
