//! Class table: one entry per class identifier, declared or inferred

use cimgen_core::prelude::*;
use std::collections::HashMap;

/// Primitive names inferred when referenced without a declaration
pub const BUILTIN_PRIMITIVES: &[&str] = &[
    "String", "Integer", "Boolean", "Float", "Decimal", "Date", "DateTime", "Time", "MonthDay",
    "Duration",
];

#[derive(Debug)]
pub(super) struct PendingClass {
    pub name: String,
    pub base: Option<String>,
    pub stereotypes: Vec<String>,
    pub documentation: Option<String>,
    pub package: Option<String>,
    pub origins: Vec<String>,
    pub declared: bool,
    pub inferred: Option<ClassKind>,
    pub has_values: bool,
}

impl PendingClass {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            base: None,
            stereotypes: Vec::new(),
            documentation: None,
            package: None,
            origins: Vec::new(),
            declared: false,
            inferred: None,
            has_values: false,
        }
    }

    fn has_stereotype(&self, stereotype: &str) -> bool {
        self.stereotypes
            .iter()
            .any(|s| s.eq_ignore_ascii_case(stereotype))
    }

    /// Stereotypes win over inference; value instances make an enumeration
    pub fn kind(&self) -> ClassKind {
        if self.has_stereotype("Primitive") {
            ClassKind::Primitive
        } else if self.has_stereotype("CIMDatatype") {
            ClassKind::Datatype
        } else if self.has_stereotype("enumeration") || self.has_values {
            ClassKind::Enumeration
        } else if self.has_stereotype("Compound") {
            ClassKind::Compound
        } else {
            self.inferred.unwrap_or(ClassKind::Regular)
        }
    }
}

/// Identifier → pending class, in first-seen order
#[derive(Debug, Default)]
pub(super) struct ClassTable {
    entries: Vec<PendingClass>,
    index: HashMap<String, usize>,
}

impl ClassTable {
    fn entry(&mut self, name: &str) -> &mut PendingClass {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.entries.push(PendingClass::new(name));
                self.index.insert(name.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx]
    }

    /// Merge a class declaration from a file with profile keyword `origin`
    pub fn declare(&mut self, decl: &ClassDecl, origin: Option<&str>) {
        let entry = self.entry(&decl.id);
        entry.declared = true;
        if entry.base.is_none() {
            entry.base.clone_from(&decl.super_class);
        }
        if entry.documentation.is_none() {
            entry.documentation.clone_from(&decl.comment);
        }
        if entry.package.is_none() {
            entry.package.clone_from(&decl.package);
        }
        for stereotype in &decl.stereotypes {
            if !entry.has_stereotype(stereotype) {
                entry.stereotypes.push(stereotype.clone());
            }
        }
        if let Some(origin) = origin
            && !entry.origins.iter().any(|o| o == origin)
        {
            entry.origins.push(origin.to_string());
        }
    }

    /// Record that an enumeration value is typed by `name`
    pub fn mark_values(&mut self, name: &str) {
        self.entry(name).has_values = true;
    }

    /// Create a placeholder for a built-in primitive referenced by `name`.
    ///
    /// Returns false when `name` is neither known nor a built-in primitive.
    pub fn infer_reference(&mut self, name: &str) -> bool {
        if self.index.contains_key(name) {
            return true;
        }
        if BUILTIN_PRIMITIVES.contains(&name) {
            self.entry(name).inferred = Some(ClassKind::Primitive);
            return true;
        }
        false
    }

    pub fn get(&self, name: &str) -> Option<&PendingClass> {
        self.index.get(name).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn kind_of(&self, name: &str) -> Option<ClassKind> {
        self.get(name).map(PendingClass::kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingClass> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Convert to empty class records, members attached later
    pub fn into_records(self) -> Vec<ClassRecord> {
        self.entries
            .into_iter()
            .map(|pending| {
                let mut record = ClassRecord::new(pending.name.clone(), pending.kind());
                record.base = pending.base;
                record.documentation = pending.documentation;
                record.package = pending.package;
                record.origins = pending.origins;
                record.declared = pending.declared;
                record
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(id: &str, base: Option<&str>, stereotypes: &[&str]) -> ClassDecl {
        ClassDecl {
            id: id.to_string(),
            super_class: base.map(String::from),
            stereotypes: stereotypes.iter().map(|s| (*s).to_string()).collect(),
            ..ClassDecl::default()
        }
    }

    #[test]
    fn test_merge_across_files() {
        let mut table = ClassTable::default();
        table.declare(&decl("Terminal", None, &[]), Some("SSH"));
        table.declare(&decl("Terminal", Some("ACDCTerminal"), &[]), Some("EQ"));
        table.declare(&decl("Terminal", Some("Other"), &[]), Some("EQ"));

        let terminal = table.get("Terminal").expect("declared");
        assert_eq!(terminal.base.as_deref(), Some("ACDCTerminal"));
        assert_eq!(terminal.origins, vec!["SSH", "EQ"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_kinds() {
        let mut table = ClassTable::default();
        table.declare(&decl("Float", None, &["Primitive"]), None);
        table.declare(&decl("Length", None, &["CIMDatatype"]), None);
        table.declare(&decl("UnitSymbol", None, &["enumeration"]), None);
        table.declare(&decl("Plain", None, &[]), None);
        table.mark_values("Phase");

        assert_eq!(table.kind_of("Float"), Some(ClassKind::Primitive));
        assert_eq!(table.kind_of("Length"), Some(ClassKind::Datatype));
        assert_eq!(table.kind_of("UnitSymbol"), Some(ClassKind::Enumeration));
        assert_eq!(table.kind_of("Phase"), Some(ClassKind::Enumeration));
        assert_eq!(table.kind_of("Plain"), Some(ClassKind::Regular));
    }

    #[test]
    fn test_infer_only_builtin_primitives() {
        let mut table = ClassTable::default();
        assert!(table.infer_reference("String"));
        assert!(!table.infer_reference("Foo"));
        assert_eq!(table.kind_of("String"), Some(ClassKind::Primitive));
        assert!(!table.contains("Foo"));
    }
}
