//! Common traits and types for schema loaders

use cimgen_core::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Error type for schema loading operations
#[derive(Debug, Error)]
pub enum LoaderError {
    /// I/O error
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File being read
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Parse error
    #[error("Parse error in {location}: {message}")]
    Parse {
        /// File and position
        location: String,
        /// Parser message
        message: String,
    },

    /// Missing required field
    #[error("Missing required field {field} in {location}")]
    MissingField {
        /// File and declaration
        location: String,
        /// Field that was expected
        field: String,
    },
}

/// Result type for loader operations
pub type LoaderResult<T> = std::result::Result<T, LoaderError>;

impl From<LoaderError> for CimgenError {
    fn from(err: LoaderError) -> Self {
        match err {
            LoaderError::Io { path, source } => CimgenError::IoError(std::io::Error::new(
                source.kind(),
                format!("{path}: {source}"),
            )),
            LoaderError::Parse { location, message } => CimgenError::malformed(location, message),
            LoaderError::MissingField { location, field } => {
                CimgenError::malformed(location, format!("missing required field {field}"))
            }
        }
    }
}

/// Trait for schema loaders
pub trait SchemaLoader: Send + Sync {
    /// Get loader name
    fn name(&self) -> &'static str;

    /// Parse one schema document from text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not well-formed or a declaration lacks
    /// an identifying field.
    fn load_str(&self, content: &str, source: &str) -> LoaderResult<SchemaDocument>;

    /// Read and parse one schema file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    fn load_file(&self, path: &Path) -> LoaderResult<SchemaDocument> {
        let content = std::fs::read_to_string(path).map_err(|source| LoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let document = self.load_str(&content, &path.display().to_string())?;
        debug!(
            "Loaded {} declarations from {} (keyword {:?})",
            document.declarations.len(),
            document.source,
            document.keyword
        );
        Ok(document)
    }

    /// Read and parse several files in path order.
    ///
    /// Stops at the first failing file.
    ///
    /// # Errors
    ///
    /// Returns the first loader error encountered.
    fn load_files(&self, paths: &[PathBuf]) -> LoaderResult<Vec<SchemaDocument>> {
        let mut sorted = paths.to_vec();
        sorted.sort();
        sorted.dedup();

        let documents = sorted
            .iter()
            .map(|path| self.load_file(path))
            .collect::<LoaderResult<Vec<_>>>()?;

        info!(
            "{} loaded {} schema files ({} declarations)",
            self.name(),
            documents.len(),
            documents.iter().map(|d| d.declarations.len()).sum::<usize>()
        );
        Ok(documents)
    }
}
