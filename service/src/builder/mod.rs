//! Model builder
//!
//! Resolves the flat declarations of one or more schema documents into a
//! linked [`SchemaModel`]:
//!
//! 1. Create one class entry per declared class, enumeration owner, and
//!    referenced built-in primitive, merging declarations across files.
//! 2. Attach every property to its declaring class, resolving its value type
//!    (attribute) or target class (association) by identifier.
//! 3. Check base classes and reject inheritance cycles.
//! 4. Collect enumeration values in declaration order.
//! 5. Link association inverses.
//!
//! Reference errors are accumulated over the whole schema and returned
//! together.

mod classes;
mod inheritance;
mod inverse;
mod members;

pub use classes::BUILTIN_PRIMITIVES;
pub use inheritance::find_cycles;

use cimgen_core::prelude::*;
use classes::ClassTable;
use members::{PendingMember, PropertyTable};
use std::collections::HashMap;
use tracing::{debug, info};

/// Builds the resolved class model from schema documents
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    infer_primitives: bool,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBuilder {
    /// Create a builder that infers undeclared built-in primitives
    #[must_use]
    pub fn new() -> Self {
        Self {
            infer_primitives: true,
        }
    }

    /// Require every primitive to be declared in the schema
    #[must_use]
    pub fn strict() -> Self {
        Self {
            infer_primitives: false,
        }
    }

    /// Resolve `documents` into a model
    ///
    /// # Errors
    ///
    /// Returns every unresolved reference and inheritance cycle found, as a
    /// single error or `CimgenError::Multiple`.
    pub fn build(&self, documents: &[SchemaDocument]) -> Result<SchemaModel> {
        let mut errors = Vec::new();

        // Pass 1: class placeholders
        let table = self.class_table(documents);
        debug!("Class table holds {} entries", table.len());

        // Pass 2: members
        let properties = PropertyTable::collect(documents);
        let pending = members::resolve_members(&table, &properties, &mut errors);
        let measured = members::measured_types(&table, &pending);

        let mut records = table.into_records();
        let slots: HashMap<String, usize> = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), i))
            .collect();

        for member in &pending {
            match member {
                PendingMember::Attribute {
                    property,
                    type_name,
                    kind,
                } => {
                    if let Some(&slot) = slots.get(&property.decl.domain) {
                        records[slot].attributes.push(members::attribute_record(
                            property, type_name, *kind, &measured,
                        ));
                    }
                }
                PendingMember::Association { property, target } => {
                    if let Some(&slot) = slots.get(&property.decl.domain) {
                        records[slot]
                            .associations
                            .push(members::association_record(property, target));
                    }
                }
            }
        }
        for record in &mut records {
            if record.kind == ClassKind::Datatype {
                record.datatype = measured.get(&record.name).cloned();
            }
        }

        // Pass 3: inheritance
        let mut base_errors = Vec::new();
        inheritance::resolve_bases(&mut records, &mut base_errors);
        base_errors.sort_by_key(ToString::to_string);
        errors.extend(base_errors);
        inheritance::break_cycles(&mut records, &mut errors);

        // Pass 4: enumeration values
        Self::attach_enum_values(documents, &mut records, &slots);

        CimgenError::from_accumulated(errors)?;

        // Pass 5: inverses
        let model = inverse::link_inverses(SchemaModel::new(records), &properties);

        info!(
            "Built model with {} classes ({} enumerations, {} datatypes)",
            model.len(),
            model.iter().filter(|c| c.is_enumeration()).count(),
            model.iter().filter(|c| c.is_datatype()).count()
        );
        Ok(model)
    }

    fn class_table(&self, documents: &[SchemaDocument]) -> ClassTable {
        let mut table = ClassTable::default();
        for document in documents {
            for decl in document.classes() {
                table.declare(decl, document.keyword.as_deref());
            }
        }
        for document in documents {
            for value in document.enum_values() {
                table.mark_values(&value.enumeration);
            }
        }
        if self.infer_primitives {
            for document in documents {
                for property in document.properties() {
                    if let Some(type_name) = property.value_type() {
                        table.infer_reference(type_name);
                    }
                }
            }
        }
        table
    }

    fn attach_enum_values(
        documents: &[SchemaDocument],
        records: &mut [ClassRecord],
        slots: &HashMap<String, usize>,
    ) {
        for document in documents {
            for value in document.enum_values() {
                let Some(&slot) = slots.get(&value.enumeration) else {
                    continue;
                };
                let record = &mut records[slot];
                let name = value.name();
                match record.enum_values.iter_mut().find(|v| v.name == name) {
                    Some(existing) => {
                        if existing.documentation.is_none() {
                            existing.documentation.clone_from(&value.comment);
                        }
                    }
                    None => record.enum_values.push(EnumValue {
                        name: name.to_string(),
                        documentation: value.comment.clone(),
                    }),
                }
            }
        }
    }
}
