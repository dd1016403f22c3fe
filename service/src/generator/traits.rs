//! Core generator traits and types
//!
//! Every target language implements [`Generator`]. A generator renders one
//! [`RenderContext`] at a time and never looks at other classes.

use super::context::{RenderContext, TemplateKind};
use super::registry::TargetLanguage;
use cimgen_core::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

/// Result type for generator operations
pub type GeneratorResult<T> = std::result::Result<T, GeneratorError>;

/// Errors that can occur during code generation
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A type has no entry in the language's mapping table
    #[error("No {language} mapping for type '{type_name}' (used by '{referrer}')")]
    UnmappedType {
        type_name: String,
        language: String,
        referrer: String,
    },

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// Several member errors of one class
    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<GeneratorError>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeneratorError {
    #[must_use]
    pub fn unmapped(
        type_name: impl Into<String>,
        language: TargetLanguage,
        referrer: impl Into<String>,
    ) -> Self {
        Self::UnmappedType {
            type_name: type_name.into(),
            language: language.to_string(),
            referrer: referrer.into(),
        }
    }

    /// Collapse accumulated errors; `None` when there are none
    #[must_use]
    pub fn from_accumulated(mut errors: Vec<GeneratorError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => Some(errors.remove(0)),
            _ => Some(Self::Multiple(errors)),
        }
    }
}

impl From<GeneratorError> for CimgenError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::UnmappedType {
                type_name,
                language,
                referrer,
            } => CimgenError::unmapped(type_name, language, referrer),
            GeneratorError::Multiple(errors) => {
                CimgenError::Multiple(errors.into_iter().map(Into::into).collect())
            }
            GeneratorError::Io(source) => CimgenError::IoError(source),
            other => CimgenError::generation(other.to_string()),
        }
    }
}

/// Convert `fmt::Error` to `GeneratorError`
pub(crate) fn fmt_error(err: std::fmt::Error) -> GeneratorError {
    GeneratorError::Template(format!("Formatting error: {err}"))
}

/// Options for code generation
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Include documentation comments in generated code
    pub include_docs: bool,

    /// Wrap width for documentation comments
    pub line_width: usize,

    /// Indentation style
    pub indent: IndentStyle,

    /// Custom options for specific generators
    pub custom: HashMap<String, String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            include_docs: true,
            line_width: 80,
            indent: IndentStyle::default(),
            custom: HashMap::new(),
        }
    }
}

impl GeneratorOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include documentation
    #[must_use]
    pub fn with_docs(mut self, include_docs: bool) -> Self {
        self.include_docs = include_docs;
        self
    }

    #[must_use]
    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    /// Set indentation style
    #[must_use]
    pub fn with_indent(mut self, indent: IndentStyle) -> Self {
        self.indent = indent;
        self
    }

    /// Set a custom option
    #[must_use]
    pub fn set_custom(mut self, key: &str, value: &str) -> Self {
        self.custom.insert(key.to_string(), value.to_string());
        self
    }

    /// Get a custom option
    #[must_use]
    pub fn get_custom(&self, key: &str) -> Option<&String> {
        self.custom.get(key)
    }
}

/// Indentation style for generated code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndentStyle {
    /// Use spaces for indentation
    Spaces(usize),
    /// Use tabs for indentation
    Tabs,
}

impl Default for IndentStyle {
    fn default() -> Self {
        Self::Spaces(4)
    }
}

impl IndentStyle {
    /// Indentation from the `generator` configuration section
    #[must_use]
    pub fn from_settings(settings: &GeneratorSettings) -> Self {
        if settings.use_tabs {
            Self::Tabs
        } else {
            Self::Spaces(settings.indent_width)
        }
    }

    /// Get single indentation string
    #[must_use]
    pub fn single(&self) -> String {
        self.level(1)
    }

    /// Get indentation string for given level
    #[must_use]
    pub fn level(&self, level: usize) -> String {
        match self {
            Self::Spaces(n) => " ".repeat(n * level),
            Self::Tabs => "\t".repeat(level),
        }
    }

    /// Visible width of `level` indents, counting a tab as four columns
    #[must_use]
    pub fn width(&self, level: usize) -> usize {
        match self {
            Self::Spaces(n) => n * level,
            Self::Tabs => 4 * level,
        }
    }
}

/// One file produced by a generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOutput {
    /// Path relative to the language output directory
    pub filename: String,
    /// Generated content
    pub content: String,
}

impl GeneratedOutput {
    #[must_use]
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// A class listed in an index file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    pub kind: TemplateKind,
}

impl IndexEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TemplateKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A per-class source generator for one target language
pub trait Generator: Send + Sync {
    /// Target language this generator writes
    fn language(&self) -> TargetLanguage;

    /// Render one class into one or more files.
    ///
    /// File names depend only on the class name.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn generate_class(
        &self,
        context: &RenderContext,
        options: &GeneratorOptions,
    ) -> GeneratorResult<Vec<GeneratedOutput>>;

    /// Render the index file listing every emitted class.
    ///
    /// `classes` is sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn generate_index(
        &self,
        classes: &[IndexEntry],
        options: &GeneratorOptions,
    ) -> GeneratorResult<GeneratedOutput>;
}
