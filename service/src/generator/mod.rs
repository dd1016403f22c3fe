//! Per-class code generation
//!
//! A [`TypeMappingTable`] maps schema types for one language, a
//! [`RenderContext`] carries one mapped class, and a [`Generator`] turns it
//! into files.

pub mod base;
pub mod context;
pub mod cpp;
pub mod java;
pub mod mapping;
pub mod python;
pub mod registry;
pub mod traits;

pub use context::{RenderContext, RenderedAssociation, RenderedAttribute, TemplateKind};
pub use cpp::CppGenerator;
pub use java::JavaGenerator;
pub use mapping::TypeMappingTable;
pub use python::PythonGenerator;
pub use registry::{GeneratorRegistry, TargetLanguage};
pub use traits::{
    GeneratedOutput, Generator, GeneratorError, GeneratorOptions, GeneratorResult, IndentStyle,
    IndexEntry,
};
