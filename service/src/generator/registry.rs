//! Target languages and the generator registry

use super::cpp::CppGenerator;
use super::java::JavaGenerator;
use super::python::PythonGenerator;
use super::traits::Generator;
use cimgen_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A supported target language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    Python,
    Java,
    Cpp,
}

impl TargetLanguage {
    /// Every supported language
    #[must_use]
    pub fn all() -> [Self; 3] {
        [Self::Python, Self::Java, Self::Cpp]
    }

    /// Identifier used for configuration keys and output directories
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Java => "java",
            Self::Cpp => "cpp",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetLanguage {
    type Err = CimgenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Self::Python),
            "java" => Ok(Self::Java),
            "cpp" | "c++" => Ok(Self::Cpp),
            _ => Err(CimgenError::UnknownLanguage(s.to_string())),
        }
    }
}

/// Registry of generators keyed by target language
pub struct GeneratorRegistry {
    generators: HashMap<TargetLanguage, Arc<dyn Generator>>,
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorRegistry {
    /// Registry with the built-in generators
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(PythonGenerator::new());
        registry.register(JavaGenerator::new());
        registry.register(CppGenerator::new());
        registry
    }

    /// Registry without any generator
    #[must_use]
    pub fn empty() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    /// Register a generator, replacing any previous one for its language
    pub fn register<G: Generator + 'static>(&mut self, generator: G) {
        self.generators
            .insert(generator.language(), Arc::new(generator));
    }

    /// Get the generator for a language
    #[must_use]
    pub fn get(&self, language: TargetLanguage) -> Option<Arc<dyn Generator>> {
        self.generators.get(&language).map(Arc::clone)
    }
}
