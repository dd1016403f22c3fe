//! Prelude module for the CIM generator service
//!
//! This module re-exports commonly used types and functions for convenient import.

pub use cimgen_core::prelude::*;

pub use crate::builder::ModelBuilder;
pub use crate::driver::{GenerationDriver, GenerationReport, GenerationRequest};
pub use crate::generator::{
    Generator, GeneratorOptions, GeneratorRegistry, RenderContext, TargetLanguage,
    TypeMappingTable,
};
pub use crate::loader::{RdfXmlLoader, SchemaLoader, resolve_schema_paths};
pub use crate::profile::{ProfileFilter, resolve_profile};
