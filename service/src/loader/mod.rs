//! Schema loaders
//!
//! Loaders turn schema files into flat [`SchemaDocument`]s without
//! resolving any cross-reference.
//!
//! [`SchemaDocument`]: cimgen_core::declaration::SchemaDocument

pub mod rdf_xml;
pub mod traits;

pub use rdf_xml::{RdfXmlConfig, RdfXmlLoader, local_name, type_reference};
pub use traits::{LoaderError, LoaderResult, SchemaLoader};

use cimgen_core::prelude::*;
use std::path::PathBuf;

/// Expand glob patterns into a sorted, de-duplicated list of files
///
/// # Errors
///
/// Returns a configuration error for an invalid pattern or when nothing
/// matches at all.
pub fn resolve_schema_paths<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let entries = glob::glob(pattern)
            .map_err(|e| CimgenError::config(format!("invalid schema pattern '{pattern}': {e}")))?;
        for entry in entries {
            let path = entry.map_err(|e| CimgenError::IoError(e.into_error()))?;
            if path.is_file() {
                paths.push(path);
            }
        }
    }
    paths.sort();
    paths.dedup();

    if paths.is_empty() {
        let joined = patterns
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(CimgenError::config(format!(
            "no schema files matched {joined}"
        )));
    }
    Ok(paths)
}
