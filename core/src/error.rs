//! Error types for CIM code generation

use thiserror::Error;

/// Main error type for the generation pipeline
#[derive(Error, Debug)]
pub enum CimgenError {
    /// Structurally invalid schema input
    #[error("Malformed schema at {location}: {message}")]
    MalformedSchema {
        /// File and identifier where the defect was found
        location: String,
        /// Error message
        message: String,
    },

    /// A class is transitively its own base class
    #[error("Cyclic inheritance: {}", .cycle.join(" → "))]
    CyclicInheritance {
        /// Class names along the cycle, first name repeated at the end
        cycle: Vec<String>,
    },

    /// A referenced class identifier was never declared nor inferred
    #[error("Unresolved reference to '{identifier}' from '{referrer}'")]
    UnresolvedReference {
        /// The dangling identifier
        identifier: String,
        /// Class or member holding the reference
        referrer: String,
    },

    /// A type used by a class has no entry in the target language table
    #[error("No {language} mapping for type '{type_name}' (used by '{referrer}')")]
    UnmappedType {
        /// The schema type that could not be mapped
        type_name: String,
        /// Target language
        language: String,
        /// Class or member using the type
        referrer: String,
    },

    /// Unknown target language identifier
    #[error("Unknown target language '{0}'")]
    UnknownLanguage(String),

    /// Profile definition or selection errors
    #[error("Profile error: {0}")]
    Profile(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Renderer failures other than unmapped types
    #[error("Code generation failed: {0}")]
    Generation(String),

    /// Several errors accumulated over one run
    #[error("{} errors occurred", .0.len())]
    Multiple(Vec<CimgenError>),
}

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, CimgenError>;

impl CimgenError {
    /// Create a malformed schema error
    #[must_use]
    pub fn malformed(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedSchema {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a cyclic inheritance error
    #[must_use]
    pub fn cyclic(cycle: Vec<String>) -> Self {
        Self::CyclicInheritance { cycle }
    }

    /// Create an unresolved reference error
    #[must_use]
    pub fn unresolved(identifier: impl Into<String>, referrer: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            identifier: identifier.into(),
            referrer: referrer.into(),
        }
    }

    /// Create an unmapped type error
    #[must_use]
    pub fn unmapped(
        type_name: impl Into<String>,
        language: impl Into<String>,
        referrer: impl Into<String>,
    ) -> Self {
        Self::UnmappedType {
            type_name: type_name.into(),
            language: language.into(),
            referrer: referrer.into(),
        }
    }

    /// Create a profile error
    #[must_use]
    pub fn profile(message: impl Into<String>) -> Self {
        Self::Profile(message.into())
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a generation error
    #[must_use]
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Turn a list of accumulated errors into a single result.
    ///
    /// An empty list is success, a single error is returned as is.
    ///
    /// # Errors
    ///
    /// Returns the error (or `Multiple`) when `errors` is non-empty.
    pub fn from_accumulated(mut errors: Vec<CimgenError>) -> Result<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(Self::Multiple(errors)),
        }
    }

    /// Flatten nested `Multiple` errors into a plain list
    #[must_use]
    pub fn into_errors(self) -> Vec<CimgenError> {
        match self {
            Self::Multiple(errors) => errors.into_iter().flat_map(Self::into_errors).collect(),
            other => vec![other],
        }
    }

    /// Borrowing counterpart of [`CimgenError::into_errors`]
    #[must_use]
    pub fn errors(&self) -> Vec<&CimgenError> {
        match self {
            Self::Multiple(errors) => errors.iter().flat_map(Self::errors).collect(),
            other => vec![other],
        }
    }
}

impl From<serde_json::Error> for CimgenError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for CimgenError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
