//! Datatype mapping tables
//!
//! One [`TypeMappingTable`] per target language translates schema primitives
//! into target types and default values, and describes how enumerations,
//! measured quantities, compounds, references and lists are spelled.
//! Patterns use `{name}` for the schema class name, `{value}` for the mapped
//! value primitive of a datatype and `{item}` for a wrapped type.

use super::cpp::CppGenerator;
use super::java::JavaGenerator;
use super::python::PythonGenerator;
use super::registry::TargetLanguage;
use super::traits::{GeneratorError, GeneratorResult};
use cimgen_core::config::LanguageOverrides;
use cimgen_core::prelude::*;
use std::collections::BTreeMap;

/// Mapping of schema types to one target language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMappingTable {
    language: TargetLanguage,
    primitives: BTreeMap<String, String>,
    defaults: BTreeMap<String, String>,
    /// Measured quantity, e.g. `{value}` or `CIMPP::{name}`
    pub measured_pattern: String,
    pub enumeration_pattern: String,
    pub compound_pattern: String,
    /// Association end pointing at one object
    pub reference_pattern: String,
    pub list_pattern: String,
    pub optional_pattern: String,
    /// Default of an unset association end
    pub reference_default: String,
    /// Default of an unset enumeration or compound attribute
    pub value_default: String,
    pub list_default: String,
    /// Default of an enumeration attribute with a fixed value
    pub enum_default_pattern: String,
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

impl TypeMappingTable {
    /// Built-in table for a language
    #[must_use]
    pub fn for_language(language: TargetLanguage) -> Self {
        match language {
            TargetLanguage::Python => Self::python(),
            TargetLanguage::Java => Self::java(),
            TargetLanguage::Cpp => Self::cpp(),
        }
    }

    fn python() -> Self {
        Self {
            language: TargetLanguage::Python,
            primitives: table(&[
                ("String", "str"),
                ("Integer", "int"),
                ("Boolean", "bool"),
                ("Float", "float"),
                ("Decimal", "float"),
                ("Date", "str"),
                ("DateTime", "str"),
                ("Time", "str"),
                ("MonthDay", "str"),
                ("Duration", "str"),
            ]),
            defaults: table(&[
                ("String", "\"\""),
                ("Integer", "0"),
                ("Boolean", "False"),
                ("Float", "0.0"),
                ("Decimal", "0.0"),
                ("Date", "\"\""),
                ("DateTime", "\"\""),
                ("Time", "\"\""),
                ("MonthDay", "\"\""),
                ("Duration", "\"\""),
            ]),
            measured_pattern: "{value}".to_string(),
            enumeration_pattern: "{name}".to_string(),
            compound_pattern: "{name}".to_string(),
            reference_pattern: "str".to_string(),
            list_pattern: "List[{item}]".to_string(),
            optional_pattern: "Optional[{item}]".to_string(),
            reference_default: "None".to_string(),
            value_default: "None".to_string(),
            list_default: "field(default_factory=list)".to_string(),
            enum_default_pattern: "{name}.{value}".to_string(),
        }
    }

    fn java() -> Self {
        Self {
            language: TargetLanguage::Java,
            primitives: table(&[
                ("String", "String"),
                ("Integer", "Integer"),
                ("Boolean", "Boolean"),
                ("Float", "Double"),
                ("Decimal", "java.math.BigDecimal"),
                ("Date", "String"),
                ("DateTime", "String"),
                ("Time", "String"),
                ("MonthDay", "String"),
                ("Duration", "String"),
            ]),
            defaults: table(&[
                ("Integer", "0"),
                ("Boolean", "false"),
                ("Float", "0.0"),
            ]),
            measured_pattern: "{value}".to_string(),
            enumeration_pattern: "{name}".to_string(),
            compound_pattern: "{name}".to_string(),
            reference_pattern: "{name}".to_string(),
            list_pattern: "List<{item}>".to_string(),
            optional_pattern: "{item}".to_string(),
            reference_default: "null".to_string(),
            value_default: "null".to_string(),
            list_default: "new ArrayList<>()".to_string(),
            enum_default_pattern: "{name}.{value}".to_string(),
        }
    }

    fn cpp() -> Self {
        Self {
            language: TargetLanguage::Cpp,
            primitives: table(&[
                ("String", "std::string"),
                ("Integer", "int"),
                ("Boolean", "bool"),
                ("Float", "double"),
                ("Decimal", "double"),
                ("Date", "std::string"),
                ("DateTime", "std::string"),
                ("Time", "std::string"),
                ("MonthDay", "std::string"),
                ("Duration", "std::string"),
            ]),
            defaults: table(&[
                ("Integer", "0"),
                ("Boolean", "false"),
                ("Float", "0.0"),
                ("Decimal", "0.0"),
            ]),
            measured_pattern: "CIMPP::{name}".to_string(),
            enumeration_pattern: "CIMPP::{name}".to_string(),
            compound_pattern: "CIMPP::{name}".to_string(),
            reference_pattern: "CIMPP::{name}*".to_string(),
            list_pattern: "std::list<{item}>".to_string(),
            optional_pattern: "{item}".to_string(),
            reference_default: "nullptr".to_string(),
            value_default: String::new(),
            list_default: String::new(),
            enum_default_pattern: "CIMPP::{name}::{value}".to_string(),
        }
    }

    /// Apply configured overrides on top of this table
    #[must_use]
    pub fn with_overrides(mut self, overrides: &LanguageOverrides) -> Self {
        self.primitives.extend(
            overrides
                .primitives
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        self.defaults.extend(
            overrides
                .defaults
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        self
    }

    #[must_use]
    pub fn language(&self) -> TargetLanguage {
        self.language
    }

    /// Target type of a schema primitive
    #[must_use]
    pub fn map_primitive(&self, name: &str) -> Option<&str> {
        self.primitives.get(name).map(String::as_str)
    }

    /// Default value literal of a schema primitive
    #[must_use]
    pub fn default_for(&self, name: &str) -> Option<&str> {
        self.defaults.get(name).map(String::as_str)
    }

    /// Target type of one attribute value, before multiplicity wrapping.
    ///
    /// # Errors
    ///
    /// Returns `UnmappedType` naming the primitive without an entry.
    pub fn map_value_type(&self, value_type: &ValueType, referrer: &str) -> GeneratorResult<String> {
        match value_type {
            ValueType::Primitive { name } => self
                .map_primitive(name)
                .map(str::to_string)
                .ok_or_else(|| GeneratorError::unmapped(name, self.language, referrer)),
            ValueType::Enumeration { name } => Ok(self.enumeration_pattern.replace("{name}", name)),
            ValueType::Compound { name } => Ok(self.compound_pattern.replace("{name}", name)),
            ValueType::Datatype(measured) => {
                let value = self.map_primitive(&measured.value).ok_or_else(|| {
                    GeneratorError::unmapped(&measured.value, self.language, referrer)
                })?;
                Ok(self
                    .measured_pattern
                    .replace("{name}", &measured.name)
                    .replace("{value}", value))
            }
        }
    }

    /// Target type of an association end pointing at `target`
    #[must_use]
    pub fn map_reference(&self, target: &str) -> String {
        self.reference_pattern.replace("{name}", target)
    }

    /// Apply the list or optional wrapper for a multiplicity
    #[must_use]
    pub fn wrap(&self, item: &str, multiplicity: Multiplicity) -> String {
        let pattern = match multiplicity {
            Multiplicity::Single => return item.to_string(),
            Multiplicity::Optional => &self.optional_pattern,
            Multiplicity::List => &self.list_pattern,
        };
        pattern.replace("{item}", item)
    }

    /// Default value literal of an attribute, if the language spells one
    #[must_use]
    pub fn attribute_default(&self, attribute: &AttributeRecord) -> Option<String> {
        if attribute.multiplicity.is_list() {
            return non_empty(&self.list_default);
        }
        match &attribute.value_type {
            ValueType::Primitive { name } => match &attribute.default {
                Some(fixed) => Some(self.literal(name, fixed)),
                None => self.default_for(name).map(str::to_string),
            },
            ValueType::Datatype(measured) => match &attribute.default {
                Some(fixed) => Some(self.literal(&measured.value, fixed)),
                None => self.default_for(&measured.value).map(str::to_string),
            },
            ValueType::Enumeration { name } => match &attribute.default {
                Some(fixed) => Some(
                    self.enum_default_pattern
                        .replace("{name}", name)
                        .replace("{value}", &self.enumerator(enum_value_name(name, fixed))),
                ),
                None => non_empty(&self.value_default),
            },
            ValueType::Compound { .. } => non_empty(&self.value_default),
        }
    }

    /// Enumerator spelled the way the language's enumeration renderer does
    #[must_use]
    pub fn enumerator(&self, value: &str) -> String {
        match self.language {
            TargetLanguage::Python => PythonGenerator::identifier(value),
            TargetLanguage::Java => JavaGenerator::enum_constant(value),
            TargetLanguage::Cpp => CppGenerator::enumerator(value),
        }
    }

    /// Default value literal of an association end
    #[must_use]
    pub fn association_default(&self, multiplicity: Multiplicity) -> Option<String> {
        if multiplicity.is_list() {
            non_empty(&self.list_default)
        } else {
            non_empty(&self.reference_default)
        }
    }

    /// Spell a fixed schema value as a literal of `primitive`
    fn literal(&self, primitive: &str, raw: &str) -> String {
        let raw = raw.trim();
        match primitive {
            "Integer" => raw.to_string(),
            "Float" | "Decimal" => {
                let mapped = self.map_primitive(primitive).unwrap_or_default();
                if self.language == TargetLanguage::Java && mapped.ends_with("BigDecimal") {
                    format!("new {mapped}(\"{raw}\")")
                } else if raw.contains(['.', 'e', 'E']) {
                    raw.to_string()
                } else {
                    format!("{raw}.0")
                }
            }
            "Boolean" => {
                let truthy = raw.eq_ignore_ascii_case("true");
                match (self.language, truthy) {
                    (TargetLanguage::Python, true) => "True".to_string(),
                    (TargetLanguage::Python, false) => "False".to_string(),
                    (_, true) => "true".to_string(),
                    (_, false) => "false".to_string(),
                }
            }
            _ => format!("\"{}\"", raw.replace('\\', "\\\\").replace('"', "\\\"")),
        }
    }
}

/// Value part of a fixed enumeration value such as `SwitchKind.breaker`
fn enum_value_name<'a>(enumeration: &str, fixed: &'a str) -> &'a str {
    fixed
        .strip_prefix(enumeration)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(fixed)
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
