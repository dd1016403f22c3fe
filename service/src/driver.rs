//! Generator driver
//!
//! Runs load, build, filter, render and write for one
//! (schema files, profile, language) request.

use crate::builder::ModelBuilder;
use crate::generator::{
    GeneratedOutput, GeneratorOptions, GeneratorRegistry, IndentStyle, IndexEntry,
    RenderContext, TargetLanguage, TypeMappingTable,
};
use crate::loader::{RdfXmlLoader, SchemaLoader};
use crate::profile::ProfileFilter;
use cimgen_core::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One generation run
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub schema_files: Vec<PathBuf>,
    pub profile: Profile,
    pub language: TargetLanguage,
    /// Root output directory; the language directory is added when
    /// `output.per_language_dirs` is set
    pub output_dir: PathBuf,
    /// Write the filtered model as JSON here
    pub dump_model: Option<PathBuf>,
}

impl GenerationRequest {
    #[must_use]
    pub fn new(
        schema_files: Vec<PathBuf>,
        profile: Profile,
        language: TargetLanguage,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            schema_files,
            profile,
            language,
            output_dir: output_dir.into(),
            dump_model: None,
        }
    }

    #[must_use]
    pub fn with_dump_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.dump_model = Some(path.into());
        self
    }
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub language: TargetLanguage,
    pub profile: String,
    /// Classes that survived the profile filter
    pub class_count: usize,
    /// Every written file, index included, sorted
    pub files: Vec<PathBuf>,
}

/// Rendered files of one class
struct RenderedClass {
    entry: IndexEntry,
    outputs: Vec<GeneratedOutput>,
}

/// Sequences the pipeline stages
pub struct GenerationDriver {
    config: CimgenConfig,
    loader: Arc<dyn SchemaLoader>,
    registry: GeneratorRegistry,
}

impl GenerationDriver {
    /// Driver with the RDF/XML loader and the built-in generators
    #[must_use]
    pub fn new(config: CimgenConfig) -> Self {
        Self {
            config,
            loader: Arc::new(RdfXmlLoader::new()),
            registry: GeneratorRegistry::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CimgenConfig {
        &self.config
    }

    /// Built-in mapping table with configured overrides applied
    #[must_use]
    pub fn mapping_table(&self, language: TargetLanguage) -> TypeMappingTable {
        let table = TypeMappingTable::for_language(language);
        match self.config.language_overrides(language.as_str()) {
            Some(overrides) => table.with_overrides(overrides),
            None => table,
        }
    }

    /// Rendering options from the `generator` configuration section
    #[must_use]
    pub fn options(&self) -> GeneratorOptions {
        let settings = &self.config.generator;
        GeneratorOptions::new()
            .with_docs(settings.include_docs)
            .with_line_width(settings.line_width)
            .with_indent(IndentStyle::from_settings(settings))
            .set_custom("package", &settings.java_package)
    }

    /// Directory the files of `language` go to
    #[must_use]
    pub fn language_dir(&self, output_dir: &Path, language: TargetLanguage) -> PathBuf {
        if self.config.output.per_language_dirs {
            output_dir.join(language.as_str())
        } else {
            output_dir.to_path_buf()
        }
    }

    /// Load and resolve the schema files into a model.
    ///
    /// # Errors
    ///
    /// Loader errors abort immediately; model errors are returned together.
    pub fn build_model(&self, schema_files: &[PathBuf]) -> Result<SchemaModel> {
        let documents = self.loader.load_files(schema_files)?;
        ModelBuilder::new().build(&documents)
    }

    /// Run the whole pipeline.
    ///
    /// # Errors
    ///
    /// Returns loader and model errors before anything is written. Renderer
    /// errors are collected over all classes; every other class is still
    /// written and the errors are returned afterwards.
    pub fn run(&self, request: &GenerationRequest) -> Result<GenerationReport> {
        request.profile.validate()?;
        let generator = self
            .registry
            .get(request.language)
            .ok_or_else(|| CimgenError::UnknownLanguage(request.language.to_string()))?;

        let model = self.build_model(&request.schema_files)?;
        let filtered = ProfileFilter::new(&request.profile).apply(&model);
        if filtered.is_empty() {
            return Err(CimgenError::profile(format!(
                "profile '{}' selects no classes",
                request.profile.name
            )));
        }

        if let Some(path) = &request.dump_model {
            Self::dump_model(&filtered, path)?;
        }

        let (rendered, mut errors) = self.render(&filtered, request.language);

        let target = self.language_dir(&request.output_dir, request.language);
        fs::create_dir_all(&target)?;
        let mut files = Vec::new();
        let mut entries = Vec::new();
        for class in rendered {
            if !class.outputs.is_empty() {
                entries.push(class.entry);
            }
            for output in &class.outputs {
                files.push(Self::write(&target, output)?);
            }
        }

        let options = self.options();
        match generator.generate_index(&entries, &options) {
            Ok(index) => files.push(Self::write(&target, &index)?),
            Err(err) => errors.push(CimgenError::generation(format!("index: {err}"))),
        }
        files.sort();

        info!(
            "Wrote {} files for {} classes to {}",
            files.len(),
            filtered.len(),
            target.display()
        );
        CimgenError::from_accumulated(errors)?;

        Ok(GenerationReport {
            language: request.language,
            profile: request.profile.name.clone(),
            class_count: filtered.len(),
            files,
        })
    }

    /// Render every class of `model`, in name order.
    ///
    /// Classes that fail are reported and left out of the rendered list.
    fn render(
        &self,
        model: &SchemaModel,
        language: TargetLanguage,
    ) -> (Vec<RenderedClass>, Vec<CimgenError>) {
        let Some(generator) = self.registry.get(language) else {
            return (
                Vec::new(),
                vec![CimgenError::UnknownLanguage(language.to_string())],
            );
        };
        let mapping = self.mapping_table(language);
        let options = self.options();

        let render_one = |class: &ClassRecord| -> Result<RenderedClass> {
            let context = RenderContext::build(class, &mapping)?;
            let outputs = generator
                .generate_class(&context, &options)
                .map_err(|err| match CimgenError::from(err) {
                    unmapped @ CimgenError::UnmappedType { .. } => unmapped,
                    other => CimgenError::generation(format!("{}: {other}", class.name)),
                })?;
            debug!("Rendered {} into {} files", class.name, outputs.len());
            Ok(RenderedClass {
                entry: IndexEntry::new(&class.name, context.kind),
                outputs,
            })
        };

        let results: Vec<Result<RenderedClass>> = if self.config.generator.parallel {
            model.classes().par_iter().map(render_one).collect()
        } else {
            model.classes().iter().map(render_one).collect()
        };

        let mut rendered = Vec::new();
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(class) => rendered.push(class),
                Err(err) => {
                    for err in err.into_errors() {
                        warn!("{err}");
                        errors.push(err);
                    }
                }
            }
        }
        (rendered, errors)
    }

    fn write(dir: &Path, output: &GeneratedOutput) -> Result<PathBuf> {
        let path = dir.join(&output.filename);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &output.content)?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    fn dump_model(model: &SchemaModel, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(model)?)?;
        info!("Dumped model with {} classes to {}", model.len(), path.display());
        Ok(())
    }
}
