//! Python dataclass generator
//!
//! Classes become `@dataclass` types, one module per class. Enumerations
//! derive from `str` and `Enum`. Primitive classes are type aliases and
//! datatypes carry their unit and multiplier.

use super::base::{BaseCodeFormatter, ImportManager};
use super::context::{RenderContext, RenderedAssociation, RenderedAttribute, TemplateKind};
use super::registry::TargetLanguage;
use super::traits::{
    GeneratedOutput, Generator, GeneratorOptions, GeneratorResult, IndexEntry, fmt_error,
};
use std::fmt::Write;

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Python dataclass generator
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonGenerator;

impl PythonGenerator {
    /// Create a new Python dataclass generator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// A valid Python identifier for a schema name
    pub(crate) fn identifier(name: &str) -> String {
        let cleaned: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
            return format!("_{cleaned}");
        }
        BaseCodeFormatter::escape_identifier(&cleaned, PYTHON_KEYWORDS)
    }

    fn docstring(
        output: &mut String,
        text: Option<&str>,
        options: &GeneratorOptions,
    ) -> GeneratorResult<()> {
        let Some(text) = text.filter(|t| options.include_docs && !t.trim().is_empty()) else {
            return Ok(());
        };
        let indent = options.indent.single();
        writeln!(output, "{indent}\"\"\"").map_err(fmt_error)?;
        for line in BaseCodeFormatter::doc_comment(text, "", &options.indent, 1, options.line_width)
        {
            writeln!(output, "{}", line.replace("\"\"\"", "\\\"\\\"\\\"")).map_err(fmt_error)?;
        }
        writeln!(output, "{indent}\"\"\"").map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        Ok(())
    }

    /// `field(...)` expression when metadata is attached, else the default
    fn field_value(default: Option<&str>, metadata: &[(&str, String)]) -> String {
        let default = default.unwrap_or("None");
        if metadata.is_empty() {
            return default.to_string();
        }
        let entries: Vec<String> = metadata
            .iter()
            .map(|(key, value)| {
                format!("\"{key}\": \"{}\"", BaseCodeFormatter::escape_python_string(value))
            })
            .collect();
        let metadata = format!("metadata={{{}}}", entries.join(", "));
        match default.strip_prefix("field(").and_then(|d| d.strip_suffix(')')) {
            Some(arguments) => format!("field({arguments}, {metadata})"),
            None => format!("field(default={default}, {metadata})"),
        }
    }

    fn attribute_line(attribute: &RenderedAttribute) -> String {
        let mut metadata = Vec::new();
        if let Some(unit) = &attribute.unit {
            metadata.push(("unit", unit.clone()));
        }
        if let Some(multiplier) = &attribute.multiplier {
            metadata.push(("multiplier", multiplier.clone()));
        }
        format!(
            "{}: {} = {}",
            Self::identifier(&attribute.name),
            attribute.target_type,
            Self::field_value(attribute.default.as_deref(), &metadata)
        )
    }

    fn association_line(association: &RenderedAssociation) -> String {
        let mut metadata = vec![("type", association.target.clone())];
        if let Some(inverse) = &association.inverse {
            metadata.push(("inverse", inverse.clone()));
        }
        format!(
            "{}: {} = {}",
            Self::identifier(&association.name),
            association.target_type,
            Self::field_value(association.default.as_deref(), &metadata)
        )
    }

    fn collect_imports(context: &RenderContext) -> ImportManager {
        let mut imports = ImportManager::new();
        imports.add_import("dataclasses", "dataclass");
        if let Some(base) = &context.base {
            imports.add_import(format!(".{base}"), base.clone());
        }
        for attribute in &context.attributes {
            if attribute.is_enumeration || attribute.item_type == attribute.schema_type {
                imports.add_import(
                    format!(".{}", attribute.schema_type),
                    attribute.schema_type.clone(),
                );
            }
        }
        let lines = context
            .attributes
            .iter()
            .map(Self::attribute_line)
            .chain(context.associations.iter().map(Self::association_line));
        for line in lines {
            if line.contains("field(") {
                imports.add_import("dataclasses", "field");
            }
            if line.contains("List[") {
                imports.add_import("typing", "List");
            }
            if line.contains("Optional[") {
                imports.add_import("typing", "Optional");
            }
        }
        imports
    }

    fn render_class(context: &RenderContext, options: &GeneratorOptions) -> GeneratorResult<String> {
        let mut output = String::new();
        let indent = options.indent.single();

        writeln!(output, "{}", Self::collect_imports(context).python_imports())
            .map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        writeln!(output, "@dataclass").map_err(fmt_error)?;
        let bases = context.base.as_deref().map(|b| format!("({b})")).unwrap_or_default();
        writeln!(output, "class {}{bases}:", context.class_name).map_err(fmt_error)?;
        Self::docstring(&mut output, context.documentation.as_deref(), options)?;

        let lines: Vec<String> = context
            .attributes
            .iter()
            .map(Self::attribute_line)
            .chain(context.associations.iter().map(Self::association_line))
            .collect();
        if lines.is_empty() {
            writeln!(output, "{indent}pass").map_err(fmt_error)?;
        }
        for line in lines {
            writeln!(output, "{indent}{line}").map_err(fmt_error)?;
        }
        Ok(output)
    }

    fn render_enumeration(
        context: &RenderContext,
        options: &GeneratorOptions,
    ) -> GeneratorResult<String> {
        let mut output = String::new();
        let indent = options.indent.single();
        writeln!(output, "from enum import Enum").map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        writeln!(output, "class {}(str, Enum):", context.class_name).map_err(fmt_error)?;
        Self::docstring(&mut output, context.documentation.as_deref(), options)?;
        if context.enum_values.is_empty() {
            writeln!(output, "{indent}pass").map_err(fmt_error)?;
        }
        for value in &context.enum_values {
            writeln!(
                output,
                "{indent}{} = \"{}\"",
                Self::identifier(&value.name),
                BaseCodeFormatter::escape_python_string(&value.name)
            )
            .map_err(fmt_error)?;
        }
        Ok(output)
    }

    fn render_primitive(
        context: &RenderContext,
        options: &GeneratorOptions,
    ) -> GeneratorResult<String> {
        let mut output = String::new();
        if options.include_docs
            && let Some(doc) = &context.documentation
        {
            for line in BaseCodeFormatter::doc_comment(
                doc,
                "# ",
                &options.indent,
                0,
                options.line_width,
            ) {
                writeln!(output, "{line}").map_err(fmt_error)?;
            }
        }
        writeln!(
            output,
            "{} = {}",
            context.class_name,
            context.primitive_type.as_deref().unwrap_or("str")
        )
        .map_err(fmt_error)?;
        Ok(output)
    }

    fn render_datatype(
        context: &RenderContext,
        options: &GeneratorOptions,
    ) -> GeneratorResult<String> {
        let mut output = String::new();
        let indent = options.indent.single();
        let mut imports = ImportManager::new();
        imports.add_import("dataclasses", "dataclass");
        imports.add_import("typing", "Optional");

        writeln!(output, "{}", imports.python_imports()).map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        writeln!(output, "@dataclass").map_err(fmt_error)?;
        writeln!(output, "class {}:", context.class_name).map_err(fmt_error)?;
        Self::docstring(&mut output, context.documentation.as_deref(), options)?;

        let value_type = context.primitive_type.as_deref().unwrap_or("float");
        writeln!(output, "{indent}value: Optional[{value_type}] = None").map_err(fmt_error)?;
        for (name, fixed) in [("unit", &context.unit), ("multiplier", &context.multiplier)] {
            let line = match fixed {
                Some(fixed) => format!(
                    "{name}: str = \"{}\"",
                    BaseCodeFormatter::escape_python_string(fixed)
                ),
                None => format!("{name}: Optional[str] = None"),
            };
            writeln!(output, "{indent}{line}").map_err(fmt_error)?;
        }
        Ok(output)
    }
}

impl Generator for PythonGenerator {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::Python
    }

    fn generate_class(
        &self,
        context: &RenderContext,
        options: &GeneratorOptions,
    ) -> GeneratorResult<Vec<GeneratedOutput>> {
        let content = match context.kind {
            TemplateKind::RootClass | TemplateKind::DerivedClass => {
                Self::render_class(context, options)?
            }
            TemplateKind::Enumeration => Self::render_enumeration(context, options)?,
            TemplateKind::Primitive => Self::render_primitive(context, options)?,
            TemplateKind::Datatype => Self::render_datatype(context, options)?,
        };
        Ok(vec![GeneratedOutput::new(
            format!("{}.py", context.class_name),
            content,
        )])
    }

    fn generate_index(
        &self,
        classes: &[IndexEntry],
        _options: &GeneratorOptions,
    ) -> GeneratorResult<GeneratedOutput> {
        let mut output = String::new();
        for IndexEntry { name, .. } in classes {
            writeln!(output, "from .{name} import {name}").map_err(fmt_error)?;
        }
        Ok(GeneratedOutput::new("__init__.py", output))
    }
}
