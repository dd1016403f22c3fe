//! # CIM Generator Core
//!
//! Core types for generating source code from IEC CIM/CGMES schemas.
//!
//! This crate holds everything the pipeline stages share: the raw
//! declarations produced by the schema loader, the resolved class model,
//! profile definitions, configuration and the error taxonomy.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(missing_docs)] // Documentation is covered by module-level docs

/// Error types for the generation pipeline
pub mod error;

/// Raw declarations extracted from schema files
pub mod declaration;

/// Resolved class model
pub mod types;

/// Profile whitelists
pub mod profile;

/// YAML configuration
pub mod config;

/// Prelude for common imports
pub mod prelude {
    pub use crate::config::{CimgenConfig, GeneratorSettings, LanguageOverrides};
    pub use crate::declaration::{
        ClassDecl, Declaration, EnumValueDecl, PropertyDecl, SchemaDocument,
    };
    pub use crate::error::{CimgenError, Result};
    pub use crate::profile::{MemberSelection, Profile};
    pub use crate::types::{
        AssociationRecord, AttributeRecord, ClassKind, ClassRecord, EnumValue, InverseLink,
        MeasuredType, Multiplicity, SchemaModel, ValueType,
    };
}
