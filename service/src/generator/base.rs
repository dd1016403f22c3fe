//! Base functionality shared by all code generators

use super::traits::IndentStyle;
use convert_case::{Case, Casing};
use std::collections::{BTreeMap, BTreeSet};

/// Import manager for tracking and organizing imports
#[derive(Debug, Default)]
pub struct ImportManager {
    /// Module -> Set of imports from that module
    imports: BTreeMap<String, BTreeSet<String>>,
    /// Direct import statements
    direct_imports: BTreeSet<String>,
}

impl ImportManager {
    /// Create a new import manager
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an import from a module
    pub fn add_import(&mut self, module: impl Into<String>, item: impl Into<String>) {
        self.imports
            .entry(module.into())
            .or_default()
            .insert(item.into());
    }

    /// Add a direct import statement
    pub fn add_direct(&mut self, import: impl Into<String>) {
        self.direct_imports.insert(import.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.direct_imports.is_empty()
    }

    /// Generate Python import statements
    ///
    /// Standard library modules come first, then package-relative ones.
    #[must_use]
    pub fn python_imports(&self) -> String {
        let (relative, stdlib): (Vec<_>, Vec<_>) =
            self.imports.iter().partition(|(module, _)| module.starts_with('.'));

        let mut lines: Vec<String> = stdlib
            .into_iter()
            .chain(relative)
            .map(|(module, items)| {
                let items: Vec<&str> = items.iter().map(String::as_str).collect();
                format!("from {module} import {}", items.join(", "))
            })
            .collect();
        lines.extend(self.direct_imports.iter().cloned());
        lines.join("\n")
    }

    /// Generate Java import statements, one per item
    #[must_use]
    pub fn java_imports(&self) -> String {
        let mut lines: Vec<String> = self
            .imports
            .iter()
            .flat_map(|(package, items)| {
                items.iter().map(move |item| format!("import {package}.{item};"))
            })
            .collect();
        lines.extend(self.direct_imports.iter().cloned());
        lines.join("\n")
    }

    /// Generate C++ include directives; modules are header names
    #[must_use]
    pub fn cpp_includes(&self) -> String {
        let system = self
            .direct_imports
            .iter()
            .map(|header| format!("#include <{header}>"));
        let local = self
            .imports
            .keys()
            .map(|header| format!("#include \"{header}\""));
        system.chain(local).collect::<Vec<_>>().join("\n")
    }
}

/// Base code formatter with common functionality
pub struct BaseCodeFormatter;

impl BaseCodeFormatter {
    /// Escape a string for Python
    #[must_use]
    pub fn escape_python_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    /// Escape a string for Java and C++ string literals
    #[must_use]
    pub fn escape_c_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    /// Convert camelCase or `snake_case` to `PascalCase`
    #[must_use]
    pub fn to_pascal_case(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            None => String::new(),
            Some(first) => first.to_uppercase().chain(chars).collect(),
        }
    }

    /// Convert a class name to `UPPER_SNAKE_CASE`, e.g. for include guards
    #[must_use]
    pub fn to_upper_snake_case(s: &str) -> String {
        s.to_case(Case::UpperSnake)
    }

    /// Prefix a name with `_` when it is a keyword of the target language
    #[must_use]
    pub fn escape_identifier(name: &str, keywords: &[&str]) -> String {
        if keywords.contains(&name) {
            format!("_{name}")
        } else {
            name.to_string()
        }
    }

    /// Split text into lines of at most `width` columns.
    ///
    /// A single word longer than `width` gets a line of its own.
    #[must_use]
    pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current_line = String::new();

        for word in text.split_whitespace() {
            if current_line.is_empty() {
                current_line = word.to_string();
            } else if current_line.len() + 1 + word.len() <= width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current_line));
                current_line = word.to_string();
            }
        }

        if !current_line.is_empty() {
            lines.push(current_line);
        }
        lines
    }

    /// Documentation lines with a comment prefix, wrapped to `line_width`
    /// counting the indentation and the prefix
    #[must_use]
    pub fn doc_comment(
        text: &str,
        prefix: &str,
        indent: &IndentStyle,
        level: usize,
        line_width: usize,
    ) -> Vec<String> {
        let used = indent.width(level) + prefix.len();
        let width = line_width.saturating_sub(used).max(20);
        let pad = indent.level(level);
        Self::wrap_lines(text, width)
            .into_iter()
            .map(|line| format!("{pad}{prefix}{line}"))
            .collect()
    }
}
