//! Profile selection and filtering

pub mod filter;

pub use filter::ProfileFilter;

use cimgen_core::config::{CimgenConfig, load_profile};
use cimgen_core::prelude::*;
use std::path::Path;
use tracing::debug;

/// Resolve a profile identifier from the command line.
///
/// Tried in order: a profile definition file, a profile named in the
/// configuration, `all` for the whole schema, and finally a schema file
/// keyword such as `EQ` from which the profile is derived.
///
/// # Errors
///
/// Returns an error when a profile file exists but cannot be loaded.
pub fn resolve_profile(identifier: &str, config: &CimgenConfig) -> Result<Profile> {
    let path = Path::new(identifier);
    if path.is_file() {
        debug!("Loading profile from {}", path.display());
        return load_profile(path);
    }
    if let Some(profile) = config.profile(identifier) {
        debug!("Using configured profile '{identifier}'");
        return Ok(profile.clone());
    }
    if identifier.eq_ignore_ascii_case("all") {
        return Ok(Profile::all());
    }
    if identifier.trim().is_empty() {
        return Err(CimgenError::profile("profile identifier must not be empty"));
    }
    debug!("Deriving profile from schema keyword '{identifier}'");
    let mut profile = Profile::from_origins(identifier, [identifier]);
    profile.version.clone_from(&config.schema.version);
    Ok(profile)
}
