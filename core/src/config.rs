//! Configuration for generation runs
//!
//! Configuration is read from YAML. `${VAR}` and `${VAR:-default}`
//! placeholders are substituted from the environment before parsing.

use crate::error::{CimgenError, Result};
use crate::profile::Profile;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

static ENV_VAR_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\$\{([^}:]+)(?::(-)?([^}]*))?\}").ok());

/// Load a YAML configuration file with environment variable substitution
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML for `T`.
pub fn load_config<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path).map_err(CimgenError::IoError)?;
    parse_config(&contents)
        .map_err(|e| CimgenError::config(format!("{}: {e}", path.display())))
}

/// Parse YAML configuration text with environment variable substitution
///
/// # Errors
///
/// Returns an error if the text is not valid YAML for `T`.
pub fn parse_config<T: for<'de> Deserialize<'de>>(contents: &str) -> Result<T> {
    let substituted = substitute_env_vars(contents);
    serde_yaml::from_str(&substituted)
        .map_err(|e| CimgenError::config(format!("Failed to parse YAML config: {e}")))
}

/// Load a profile definition file
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the profile is empty.
pub fn load_profile(path: &Path) -> Result<Profile> {
    let profile: Profile = load_config(path)?;
    profile.validate()?;
    Ok(profile)
}

/// Substitute environment variables in the format ${VAR:-default}
fn substitute_env_vars(content: &str) -> String {
    let Some(re) = ENV_VAR_PATTERN.as_ref() else {
        return content.to_string();
    };

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default_value = caps.get(3).map_or("", |m| m.as_str());

        env::var(var_name).unwrap_or_else(|_| default_value.to_string())
    })
    .to_string()
}

/// Complete generator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CimgenConfig {
    /// Schema input files
    pub schema: SchemaConfig,
    /// Output tree layout
    pub output: OutputConfig,
    /// Rendering options
    pub generator: GeneratorSettings,
    /// Named profiles, selectable by name on the command line
    pub profiles: BTreeMap<String, Profile>,
    /// Per-language overrides of the datatype mapping tables
    pub languages: BTreeMap<String, LanguageOverrides>,
}

impl CimgenConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or fails validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: Self = load_config(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.schema.patterns.iter().all(|p| p.trim().is_empty()) {
            return Err(CimgenError::config("schema.patterns must not be empty"));
        }
        if self.generator.line_width < 20 {
            return Err(CimgenError::config(format!(
                "generator.line_width must be at least 20, got {}",
                self.generator.line_width
            )));
        }
        if !self.generator.use_tabs && !(1..=8).contains(&self.generator.indent_width) {
            return Err(CimgenError::config(format!(
                "generator.indent_width must be between 1 and 8, got {}",
                self.generator.indent_width
            )));
        }
        for (key, profile) in &self.profiles {
            profile
                .validate()
                .map_err(|e| CimgenError::config(format!("profiles.{key}: {e}")))?;
        }
        Ok(())
    }

    /// Look up a named profile
    #[must_use]
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Overrides for a target language, if configured
    #[must_use]
    pub fn language_overrides(&self, language: &str) -> Option<&LanguageOverrides> {
        self.languages.get(language)
    }
}

/// Schema input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Glob patterns of schema files
    pub patterns: Vec<String>,
    /// Version label, e.g. `CGMES_2.4.15`
    pub version: Option<String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            patterns: vec!["schemas/*.rdf".to_string()],
            version: None,
        }
    }
}

/// Output tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root output directory
    pub directory: PathBuf,
    /// Write into `<directory>/<language>`
    pub per_language_dirs: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            per_language_dirs: true,
        }
    }
}

/// Rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Wrap width for documentation comments
    pub line_width: usize,
    /// Spaces per indentation level
    pub indent_width: usize,
    /// Indent with tabs instead of spaces
    pub use_tabs: bool,
    /// Emit documentation comments
    pub include_docs: bool,
    /// Render classes on the rayon thread pool
    pub parallel: bool,
    /// Java package of generated classes
    pub java_package: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            line_width: 80,
            indent_width: 4,
            use_tabs: false,
            include_docs: true,
            parallel: true,
            java_package: "cim".to_string(),
        }
    }
}

/// Overrides applied on top of a built-in mapping table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageOverrides {
    /// Schema primitive → target type
    pub primitives: BTreeMap<String, String>,
    /// Schema primitive → default value literal
    pub defaults: BTreeMap<String, String>,
}
