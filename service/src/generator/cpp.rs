//! C++ generator
//!
//! Classes render to a `.hpp`/`.cpp` pair in namespace `CIMPP`.
//! Enumerations, primitive aliases and datatypes are header-only.

use super::base::{BaseCodeFormatter, ImportManager};
use super::context::{RenderContext, TemplateKind};
use super::registry::TargetLanguage;
use super::traits::{
    GeneratedOutput, Generator, GeneratorOptions, GeneratorResult, IndexEntry, fmt_error,
};
use std::collections::BTreeSet;
use std::fmt::Write;

const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "asm", "auto", "bool", "break", "case", "catch", "char",
    "class", "const", "continue", "default", "delete", "do", "double", "else", "enum",
    "explicit", "export", "extern", "false", "float", "for", "friend", "goto", "if", "inline",
    "int", "long", "mutable", "namespace", "new", "not", "operator", "or", "private",
    "protected", "public", "register", "return", "short", "signed", "sizeof", "static",
    "struct", "switch", "template", "this", "throw", "true", "try", "typedef", "union",
    "unsigned", "using", "virtual", "void", "volatile", "while",
];

const NAMESPACE: &str = "CIMPP";

/// C++ header/source generator
#[derive(Debug, Clone, Copy, Default)]
pub struct CppGenerator;

/// Member declaration line parts
struct CppMember {
    name: String,
    cpp_type: String,
    default: Option<String>,
    comment: Option<String>,
}

impl CppGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Label with C++ keywords escaped, e.g. `switch` becomes `_switch`
    fn label_without_keyword(label: &str) -> String {
        BaseCodeFormatter::escape_identifier(label, CPP_KEYWORDS)
    }

    pub(crate) fn enumerator(name: &str) -> String {
        let cleaned: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
            format!("_{cleaned}")
        } else {
            Self::label_without_keyword(&cleaned)
        }
    }

    fn guard(class_name: &str) -> String {
        format!(
            "{NAMESPACE}_{}_HPP",
            BaseCodeFormatter::to_upper_snake_case(class_name)
        )
    }

    fn doc_block(
        output: &mut String,
        text: Option<&str>,
        options: &GeneratorOptions,
        level: usize,
    ) -> GeneratorResult<()> {
        let Some(text) = text.filter(|t| options.include_docs && !t.trim().is_empty()) else {
            return Ok(());
        };
        let pad = options.indent.level(level);
        writeln!(output, "{pad}/*").map_err(fmt_error)?;
        for line in BaseCodeFormatter::doc_comment(text, "", &options.indent, level, options.line_width)
        {
            writeln!(output, "{line}").map_err(fmt_error)?;
        }
        writeln!(output, "{pad}*/").map_err(fmt_error)?;
        Ok(())
    }

    fn members(context: &RenderContext) -> Vec<CppMember> {
        let attributes = context.attributes.iter().map(|attribute| {
            let comment = attribute.unit.as_ref().map(|unit| {
                let multiplier = attribute.multiplier.as_deref().unwrap_or("none");
                format!("Unit: {unit}, multiplier: {multiplier}")
            });
            CppMember {
                name: Self::label_without_keyword(&attribute.name),
                cpp_type: attribute.target_type.clone(),
                default: attribute.default.clone(),
                comment,
            }
        });
        let associations = context.associations.iter().map(|association| CppMember {
            name: Self::label_without_keyword(&association.name),
            cpp_type: association.target_type.clone(),
            default: association.default.clone(),
            comment: association
                .inverse
                .as_ref()
                .map(|inverse| format!("Inverse: {inverse}")),
        });
        attributes.chain(associations).collect()
    }

    fn header_includes(context: &RenderContext) -> ImportManager {
        let mut includes = ImportManager::new();
        if let Some(base) = &context.base {
            includes.add_import(format!("{base}.hpp"), base.clone());
        }
        for attribute in &context.attributes {
            if attribute.item_type.starts_with(NAMESPACE) {
                includes.add_import(
                    format!("{}.hpp", attribute.schema_type),
                    attribute.schema_type.clone(),
                );
            }
        }
        let types = context
            .attributes
            .iter()
            .map(|a| a.target_type.as_str())
            .chain(context.associations.iter().map(|a| a.target_type.as_str()));
        for cpp_type in types {
            if cpp_type.contains("std::list") {
                includes.add_direct("list");
            }
            if cpp_type.contains("std::string") {
                includes.add_direct("string");
            }
        }
        includes
    }

    fn render_header(context: &RenderContext, options: &GeneratorOptions) -> GeneratorResult<String> {
        let mut output = String::new();
        let ns = options.indent.level(1);
        let member_pad = options.indent.level(2);
        let guard = Self::guard(&context.class_name);
        let class_name = &context.class_name;

        writeln!(output, "#ifndef {guard}").map_err(fmt_error)?;
        writeln!(output, "#define {guard}").map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        let includes = Self::header_includes(context);
        if !includes.is_empty() {
            writeln!(output, "{}", includes.cpp_includes()).map_err(fmt_error)?;
            writeln!(output).map_err(fmt_error)?;
        }

        writeln!(output, "namespace {NAMESPACE}").map_err(fmt_error)?;
        writeln!(output, "{{").map_err(fmt_error)?;
        let forward: BTreeSet<&str> = context
            .associations
            .iter()
            .map(|a| a.target.as_str())
            .filter(|target| *target != class_name.as_str())
            .collect();
        for target in &forward {
            writeln!(output, "{ns}class {target};").map_err(fmt_error)?;
        }
        if !forward.is_empty() {
            writeln!(output).map_err(fmt_error)?;
        }

        Self::doc_block(&mut output, context.documentation.as_deref(), options, 1)?;
        let inherits = context
            .base
            .as_deref()
            .map(|base| format!(" : public {base}"))
            .unwrap_or_default();
        writeln!(output, "{ns}class {class_name}{inherits}").map_err(fmt_error)?;
        writeln!(output, "{ns}{{").map_err(fmt_error)?;
        writeln!(output, "{ns}public:").map_err(fmt_error)?;
        let (virtual_kw, override_kw) = if context.base.is_some() {
            ("", " override")
        } else {
            ("virtual ", "")
        };
        writeln!(output, "{member_pad}{class_name}();").map_err(fmt_error)?;
        writeln!(output, "{member_pad}{virtual_kw}~{class_name}(){override_kw};")
            .map_err(fmt_error)?;

        let members = Self::members(context);
        if !members.is_empty() {
            writeln!(output).map_err(fmt_error)?;
        }
        for member in &members {
            let comment = member
                .comment
                .as_deref()
                .map(|c| format!("  /* {c} */"))
                .unwrap_or_default();
            writeln!(output, "{member_pad}{} {};{comment}", member.cpp_type, member.name)
                .map_err(fmt_error)?;
        }

        writeln!(output).map_err(fmt_error)?;
        writeln!(output, "{member_pad}static const char debugName[];").map_err(fmt_error)?;
        writeln!(
            output,
            "{member_pad}{virtual_kw}const char* debugString() const{override_kw};"
        )
        .map_err(fmt_error)?;
        writeln!(output, "{ns}}};").map_err(fmt_error)?;
        writeln!(output, "}}").map_err(fmt_error)?;
        writeln!(output, "#endif").map_err(fmt_error)?;
        Ok(output)
    }

    fn render_source(context: &RenderContext, options: &GeneratorOptions) -> GeneratorResult<String> {
        let mut output = String::new();
        let indent = options.indent.single();
        let class_name = &context.class_name;

        writeln!(output, "#include \"{class_name}.hpp\"").map_err(fmt_error)?;
        let targets: BTreeSet<&str> = context
            .associations
            .iter()
            .map(|a| a.target.as_str())
            .filter(|target| *target != class_name.as_str())
            .collect();
        if !targets.is_empty() {
            writeln!(output).map_err(fmt_error)?;
            for target in &targets {
                writeln!(output, "#include \"{target}.hpp\"").map_err(fmt_error)?;
            }
        }
        writeln!(output).map_err(fmt_error)?;
        writeln!(output, "using namespace {NAMESPACE};").map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;

        let initializers: Vec<String> = context
            .base
            .iter()
            .map(|base| format!("{base}()"))
            .chain(
                Self::members(context)
                    .into_iter()
                    .filter_map(|m| Some(format!("{}({})", m.name, m.default?))),
            )
            .collect();
        if initializers.is_empty() {
            writeln!(output, "{class_name}::{class_name}() {{}}").map_err(fmt_error)?;
        } else {
            writeln!(
                output,
                "{class_name}::{class_name}() : {} {{}}",
                initializers.join(", ")
            )
            .map_err(fmt_error)?;
        }
        writeln!(output, "{class_name}::~{class_name}() {{}}").map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        writeln!(output, "const char {class_name}::debugName[] = \"{class_name}\";")
            .map_err(fmt_error)?;
        writeln!(output, "const char* {class_name}::debugString() const").map_err(fmt_error)?;
        writeln!(output, "{{").map_err(fmt_error)?;
        writeln!(output, "{indent}return {class_name}::debugName;").map_err(fmt_error)?;
        writeln!(output, "}}").map_err(fmt_error)?;
        Ok(output)
    }

    fn render_enumeration(
        context: &RenderContext,
        options: &GeneratorOptions,
    ) -> GeneratorResult<String> {
        let mut output = String::new();
        let ns = options.indent.level(1);
        let value_pad = options.indent.level(2);
        let guard = Self::guard(&context.class_name);

        writeln!(output, "#ifndef {guard}").map_err(fmt_error)?;
        writeln!(output, "#define {guard}").map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        writeln!(output, "namespace {NAMESPACE}").map_err(fmt_error)?;
        writeln!(output, "{{").map_err(fmt_error)?;
        Self::doc_block(&mut output, context.documentation.as_deref(), options, 1)?;
        writeln!(output, "{ns}enum class {}", context.class_name).map_err(fmt_error)?;
        writeln!(output, "{ns}{{").map_err(fmt_error)?;
        for value in &context.enum_values {
            Self::doc_block(&mut output, value.documentation.as_deref(), options, 2)?;
            writeln!(output, "{value_pad}{},", Self::enumerator(&value.name)).map_err(fmt_error)?;
        }
        writeln!(output, "{ns}}};").map_err(fmt_error)?;
        writeln!(output, "}}").map_err(fmt_error)?;
        writeln!(output, "#endif").map_err(fmt_error)?;
        Ok(output)
    }

    fn render_primitive(
        context: &RenderContext,
        options: &GeneratorOptions,
    ) -> GeneratorResult<String> {
        let mut output = String::new();
        let ns = options.indent.level(1);
        let guard = Self::guard(&context.class_name);
        let cpp_type = context.primitive_type.as_deref().unwrap_or("std::string");

        writeln!(output, "#ifndef {guard}").map_err(fmt_error)?;
        writeln!(output, "#define {guard}").map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        if cpp_type.contains("std::string") {
            writeln!(output, "#include <string>").map_err(fmt_error)?;
            writeln!(output).map_err(fmt_error)?;
        }
        writeln!(output, "namespace {NAMESPACE}").map_err(fmt_error)?;
        writeln!(output, "{{").map_err(fmt_error)?;
        Self::doc_block(&mut output, context.documentation.as_deref(), options, 1)?;
        writeln!(output, "{ns}using {} = {cpp_type};", context.class_name).map_err(fmt_error)?;
        writeln!(output, "}}").map_err(fmt_error)?;
        writeln!(output, "#endif").map_err(fmt_error)?;
        Ok(output)
    }

    fn render_datatype(
        context: &RenderContext,
        options: &GeneratorOptions,
    ) -> GeneratorResult<String> {
        let mut output = String::new();
        let ns = options.indent.level(1);
        let member_pad = options.indent.level(2);
        let guard = Self::guard(&context.class_name);
        let class_name = &context.class_name;
        let value_type = context.primitive_type.as_deref().unwrap_or("double");

        writeln!(output, "#ifndef {guard}").map_err(fmt_error)?;
        writeln!(output, "#define {guard}").map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        writeln!(output, "namespace {NAMESPACE}").map_err(fmt_error)?;
        writeln!(output, "{{").map_err(fmt_error)?;
        Self::doc_block(&mut output, context.documentation.as_deref(), options, 1)?;
        writeln!(output, "{ns}class {class_name}").map_err(fmt_error)?;
        writeln!(output, "{ns}{{").map_err(fmt_error)?;
        writeln!(output, "{ns}public:").map_err(fmt_error)?;
        writeln!(output, "{member_pad}{class_name}() = default;").map_err(fmt_error)?;
        writeln!(
            output,
            "{member_pad}{class_name}({value_type} value) : value(value), initialized(true) {{}}"
        )
        .map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        for (name, fixed) in [("unit", &context.unit), ("multiplier", &context.multiplier)] {
            let literal = fixed.as_deref().map_or_else(
                || "nullptr".to_string(),
                |f| format!("\"{}\"", BaseCodeFormatter::escape_c_string(f)),
            );
            writeln!(
                output,
                "{member_pad}static constexpr const char* {name} = {literal};"
            )
            .map_err(fmt_error)?;
        }
        writeln!(output).map_err(fmt_error)?;
        writeln!(output, "{member_pad}{value_type} value{{}};").map_err(fmt_error)?;
        writeln!(output, "{member_pad}bool initialized = false;").map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        writeln!(
            output,
            "{member_pad}operator {value_type}() const {{ return value; }}"
        )
        .map_err(fmt_error)?;
        writeln!(output, "{ns}}};").map_err(fmt_error)?;
        writeln!(output, "}}").map_err(fmt_error)?;
        writeln!(output, "#endif").map_err(fmt_error)?;
        Ok(output)
    }
}

impl Generator for CppGenerator {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::Cpp
    }

    fn generate_class(
        &self,
        context: &RenderContext,
        options: &GeneratorOptions,
    ) -> GeneratorResult<Vec<GeneratedOutput>> {
        let header = format!("{}.hpp", context.class_name);
        let outputs = match context.kind {
            TemplateKind::RootClass | TemplateKind::DerivedClass => vec![
                GeneratedOutput::new(header, Self::render_header(context, options)?),
                GeneratedOutput::new(
                    format!("{}.cpp", context.class_name),
                    Self::render_source(context, options)?,
                ),
            ],
            TemplateKind::Enumeration => vec![GeneratedOutput::new(
                header,
                Self::render_enumeration(context, options)?,
            )],
            TemplateKind::Primitive => vec![GeneratedOutput::new(
                header,
                Self::render_primitive(context, options)?,
            )],
            TemplateKind::Datatype => vec![GeneratedOutput::new(
                header,
                Self::render_datatype(context, options)?,
            )],
        };
        Ok(outputs)
    }

    fn generate_index(
        &self,
        classes: &[IndexEntry],
        _options: &GeneratorOptions,
    ) -> GeneratorResult<GeneratedOutput> {
        let mut output = String::new();
        writeln!(output, "#ifndef CIMCLASSLIST_H").map_err(fmt_error)?;
        writeln!(output, "#define CIMCLASSLIST_H").map_err(fmt_error)?;
        writeln!(output).map_err(fmt_error)?;
        for IndexEntry { name, .. } in classes {
            writeln!(output, "#include \"{name}.hpp\"").map_err(fmt_error)?;
        }
        writeln!(output).map_err(fmt_error)?;
        writeln!(output, "#endif").map_err(fmt_error)?;
        Ok(GeneratedOutput::new("CIMClassList.hpp", output))
    }
}
