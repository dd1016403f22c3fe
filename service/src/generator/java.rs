//! Java class generator
//!
//! One `.java` file per class or enumeration, in the package given by the
//! `package` custom option. Primitive and datatype classes map straight to
//! `java.lang` types, so they produce no file of their own.

use super::base::{BaseCodeFormatter, ImportManager};
use super::context::{RenderContext, TemplateKind};
use super::registry::TargetLanguage;
use super::traits::{
    GeneratedOutput, Generator, GeneratorOptions, GeneratorResult, IndexEntry, fmt_error,
};
use std::fmt::Write;

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while",
];

const DEFAULT_PACKAGE: &str = "cim";

/// Java class generator
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaGenerator;

/// Field spelled in generated code
struct JavaField {
    variable: String,
    accessor: String,
    java_type: String,
    default: Option<String>,
    documentation: Vec<String>,
}

impl JavaGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Variable name, avoiding keywords and the enclosing class name
    fn variable_name(label: &str, class_name: &str) -> String {
        if label == class_name || JAVA_KEYWORDS.contains(&label) {
            format!("{label}_")
        } else {
            label.to_string()
        }
    }

    /// Accessor suffix; `Name` is prefixed so it cannot clash with `name`
    fn accessor_name(label: &str) -> String {
        if label.starts_with(|c: char| c.is_lowercase()) {
            BaseCodeFormatter::to_pascal_case(label)
        } else if label == "Name" {
            format!("_{label}")
        } else {
            label.to_string()
        }
    }

    pub(crate) fn enum_constant(name: &str) -> String {
        let cleaned: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
            format!("_{cleaned}")
        } else {
            BaseCodeFormatter::escape_identifier(&cleaned, JAVA_KEYWORDS)
        }
    }

    fn package(options: &GeneratorOptions) -> &str {
        options
            .get_custom("package")
            .map_or(DEFAULT_PACKAGE, String::as_str)
    }

    fn javadoc(
        output: &mut String,
        lines: &[String],
        options: &GeneratorOptions,
        level: usize,
    ) -> GeneratorResult<()> {
        if !options.include_docs || lines.is_empty() {
            return Ok(());
        }
        let pad = options.indent.level(level);
        writeln!(output, "{pad}/**").map_err(fmt_error)?;
        for text in lines {
            for line in
                BaseCodeFormatter::doc_comment(text, " * ", &options.indent, level, options.line_width)
            {
                writeln!(output, "{line}").map_err(fmt_error)?;
            }
        }
        writeln!(output, "{pad} */").map_err(fmt_error)?;
        Ok(())
    }

    fn fields(context: &RenderContext) -> Vec<JavaField> {
        let attributes = context.attributes.iter().map(|attribute| {
            let mut documentation: Vec<String> = attribute.documentation.iter().cloned().collect();
            if let Some(unit) = &attribute.unit {
                let multiplier = attribute.multiplier.as_deref().unwrap_or("none");
                documentation.push(format!(
                    "{} in {unit} (multiplier {multiplier}).",
                    attribute.schema_type
                ));
            }
            JavaField {
                variable: Self::variable_name(&attribute.name, &context.class_name),
                accessor: Self::accessor_name(&attribute.name),
                java_type: attribute.target_type.clone(),
                default: attribute.default.clone(),
                documentation,
            }
        });
        let associations = context.associations.iter().map(|association| {
            let mut documentation: Vec<String> =
                association.documentation.iter().cloned().collect();
            if let Some(inverse) = &association.inverse {
                documentation.push(format!("Inverse of {inverse}."));
            }
            JavaField {
                variable: Self::variable_name(&association.name, &context.class_name),
                accessor: Self::accessor_name(&association.name),
                java_type: association.target_type.clone(),
                default: association.default.clone(),
                documentation,
            }
        });
        attributes.chain(associations).collect()
    }

    fn render_class(context: &RenderContext, options: &GeneratorOptions) -> GeneratorResult<String> {
        let mut output = String::new();
        let indent = options.indent.single();
        let body = options.indent.level(2);
        let fields = Self::fields(context);

        writeln!(output, "package {};", Self::package(options)).map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;

        let mut imports = ImportManager::new();
        if fields.iter().any(|f| f.java_type.starts_with("List<")) {
            imports.add_import("java.util", "ArrayList");
            imports.add_import("java.util", "List");
        }
        if !imports.is_empty() {
            writeln!(output, "{}", imports.java_imports()).map_err(fmt_error)?;
            writeln!(output).map_err(fmt_error)?;
        }

        let docs: Vec<String> = context.documentation.iter().cloned().collect();
        Self::javadoc(&mut output, &docs, options, 0)?;
        let extends = context
            .base
            .as_deref()
            .map(|base| format!(" extends {base}"))
            .unwrap_or_default();
        writeln!(output, "public class {}{extends} {{", context.class_name).map_err(fmt_error)?;

        for field in &fields {
            writeln!(output).map_err(fmt_error)?;
            Self::javadoc(&mut output, &field.documentation, options, 1)?;
            let initializer = field
                .default
                .as_deref()
                .map(|d| format!(" = {d}"))
                .unwrap_or_default();
            writeln!(
                output,
                "{indent}private {} {}{initializer};",
                field.java_type, field.variable
            )
            .map_err(fmt_error)?;
        }

        writeln!(output).map_err(fmt_error)?;
        writeln!(output, "{indent}public {}() {{", context.class_name).map_err(fmt_error)?;
        writeln!(output, "{indent}}}").map_err(fmt_error)?;

        for field in &fields {
            writeln!(output).map_err(fmt_error)?;
            writeln!(
                output,
                "{indent}public {} get{}() {{",
                field.java_type, field.accessor
            )
            .map_err(fmt_error)?;
            writeln!(output, "{body}return {};", field.variable).map_err(fmt_error)?;
            writeln!(output, "{indent}}}").map_err(fmt_error)?;
            writeln!(output).map_err(fmt_error)?;
            writeln!(
                output,
                "{indent}public void set{}({} value) {{",
                field.accessor, field.java_type
            )
            .map_err(fmt_error)?;
            writeln!(output, "{body}this.{} = value;", field.variable).map_err(fmt_error)?;
            writeln!(output, "{indent}}}").map_err(fmt_error)?;
        }

        writeln!(output, "}}").map_err(fmt_error)?;
        Ok(output)
    }

    fn render_enumeration(
        context: &RenderContext,
        options: &GeneratorOptions,
    ) -> GeneratorResult<String> {
        let mut output = String::new();
        let indent = options.indent.single();
        writeln!(output, "package {};", Self::package(options)).map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        let docs: Vec<String> = context.documentation.iter().cloned().collect();
        Self::javadoc(&mut output, &docs, options, 0)?;
        writeln!(output, "public enum {} {{", context.class_name).map_err(fmt_error)?;
        let count = context.enum_values.len();
        for (i, value) in context.enum_values.iter().enumerate() {
            let docs: Vec<String> = value.documentation.iter().cloned().collect();
            Self::javadoc(&mut output, &docs, options, 1)?;
            let separator = if i + 1 == count { ";" } else { "," };
            writeln!(output, "{indent}{}{separator}", Self::enum_constant(&value.name))
                .map_err(fmt_error)?;
        }
        writeln!(output, "}}").map_err(fmt_error)?;
        Ok(output)
    }
}

impl Generator for JavaGenerator {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::Java
    }

    fn generate_class(
        &self,
        context: &RenderContext,
        options: &GeneratorOptions,
    ) -> GeneratorResult<Vec<GeneratedOutput>> {
        let content = match context.kind {
            TemplateKind::Primitive | TemplateKind::Datatype => return Ok(Vec::new()),
            TemplateKind::Enumeration => Self::render_enumeration(context, options)?,
            TemplateKind::RootClass | TemplateKind::DerivedClass => {
                Self::render_class(context, options)?
            }
        };
        Ok(vec![GeneratedOutput::new(
            format!("{}.java", context.class_name),
            content,
        )])
    }

    fn generate_index(
        &self,
        classes: &[IndexEntry],
        options: &GeneratorOptions,
    ) -> GeneratorResult<GeneratedOutput> {
        let mut output = String::new();
        let indent = options.indent.single();
        let body = options.indent.level(2);
        writeln!(output, "package {};", Self::package(options)).map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        writeln!(output, "import java.util.Map;").map_err(fmt_error)?;
        writeln!(output, "import java.util.TreeMap;").map_err(fmt_error)?;
        writeln!(output, "import java.util.function.Supplier;").map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        writeln!(output, "public final class CimClassMap {{").map_err(fmt_error)?;
        writeln!(
            output,
            "{indent}public static final Map<String, Supplier<Object>> CLASSES = new TreeMap<>();"
        )
        .map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        writeln!(output, "{indent}static {{").map_err(fmt_error)?;
        let constructible = classes
            .iter()
            .filter(|entry| entry.kind != TemplateKind::Enumeration);
        for IndexEntry { name, .. } in constructible {
            writeln!(output, "{body}CLASSES.put(\"{name}\", {name}::new);").map_err(fmt_error)?;
        }
        writeln!(output, "{indent}}}").map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        writeln!(output, "{indent}private CimClassMap() {{").map_err(fmt_error)?;
        writeln!(output, "{indent}}}").map_err(fmt_error)?;
        writeln!(output, "}}").map_err(fmt_error)?;
        Ok(GeneratedOutput::new("CimClassMap.java", output))
    }
}
