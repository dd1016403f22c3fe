//! Attribute and association attachment

use super::classes::ClassTable;
use cimgen_core::prelude::*;
use indexmap::IndexMap;
use std::collections::HashMap;

/// A property merged over every file declaring it
#[derive(Debug, Clone)]
pub(super) struct MergedProperty {
    pub decl: PropertyDecl,
    pub origins: Vec<String>,
}

impl MergedProperty {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.decl.domain, self.decl.name())
    }
}

/// Properties keyed by `(domain, member)` in first-seen order
#[derive(Debug, Default)]
pub(super) struct PropertyTable {
    properties: IndexMap<(String, String), MergedProperty>,
    by_id: HashMap<String, (String, String)>,
}

impl PropertyTable {
    pub fn collect(documents: &[SchemaDocument]) -> Self {
        let mut table = Self::default();
        for document in documents {
            for decl in document.properties() {
                table.insert(decl, document.keyword.as_deref());
            }
        }
        table
    }

    fn insert(&mut self, decl: &PropertyDecl, origin: Option<&str>) {
        let key = (decl.domain.clone(), decl.name().to_string());
        self.by_id.entry(decl.id.clone()).or_insert_with(|| key.clone());
        let merged = self
            .properties
            .entry(key)
            .or_insert_with(|| MergedProperty {
                decl: decl.clone(),
                origins: Vec::new(),
            });
        fill_missing(&mut merged.decl, decl);
        if let Some(origin) = origin
            && !merged.origins.iter().any(|o| o == origin)
        {
            merged.origins.push(origin.to_string());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MergedProperty> {
        self.properties.values()
    }

    /// Look up a property by declaring class and member name
    pub fn get(&self, domain: &str, name: &str) -> Option<&MergedProperty> {
        self.properties
            .get(&(domain.to_string(), name.to_string()))
    }

    /// Look up a property by its schema identifier (`Domain.member`)
    pub fn by_id(&self, id: &str) -> Option<&MergedProperty> {
        self.by_id.get(id).and_then(|key| self.properties.get(key))
    }
}

/// Later files may add documentation or fixed values the first one lacked
fn fill_missing(target: &mut PropertyDecl, other: &PropertyDecl) {
    if target.comment.is_none() {
        target.comment.clone_from(&other.comment);
    }
    if target.fixed.is_none() {
        target.fixed.clone_from(&other.fixed);
    }
    if target.inverse_role.is_none() {
        target.inverse_role.clone_from(&other.inverse_role);
    }
    if target.association_used.is_none() {
        target.association_used = other.association_used;
    }
}

/// A member before value types are finalised
#[derive(Debug)]
pub(super) enum PendingMember {
    Attribute {
        property: MergedProperty,
        type_name: String,
        kind: ClassKind,
    },
    Association {
        property: MergedProperty,
        target: String,
    },
}

/// Resolve the declaring class and value type or target of every property
pub(super) fn resolve_members(
    classes: &ClassTable,
    properties: &PropertyTable,
    errors: &mut Vec<CimgenError>,
) -> Vec<PendingMember> {
    let mut members = Vec::new();
    for property in properties.iter() {
        let decl = &property.decl;
        if !classes.contains(&decl.domain) {
            errors.push(CimgenError::unresolved(&decl.domain, &decl.id));
            continue;
        }
        let Some(type_name) = decl.value_type() else {
            errors.push(CimgenError::malformed(
                &decl.id,
                "property has neither rdfs:range nor cims:dataType",
            ));
            continue;
        };
        let Some(kind) = classes.kind_of(type_name) else {
            errors.push(CimgenError::unresolved(
                type_name,
                property.qualified_name(),
            ));
            continue;
        };

        if kind.is_value_type() {
            members.push(PendingMember::Attribute {
                property: property.clone(),
                type_name: type_name.to_string(),
                kind,
            });
        } else {
            members.push(PendingMember::Association {
                property: property.clone(),
                target: type_name.to_string(),
            });
        }
    }
    members
}

/// Derive unit, multiplier and value primitive of every datatype class
pub(super) fn measured_types(
    classes: &ClassTable,
    members: &[PendingMember],
) -> HashMap<String, MeasuredType> {
    let mut measured: HashMap<String, MeasuredType> = classes
        .iter()
        .filter(|c| c.kind() == ClassKind::Datatype)
        .map(|c| {
            (
                c.name.clone(),
                MeasuredType {
                    name: c.name.clone(),
                    value: "Float".to_string(),
                    unit: None,
                    multiplier: None,
                },
            )
        })
        .collect();

    for member in members {
        let PendingMember::Attribute {
            property,
            type_name,
            ..
        } = member
        else {
            continue;
        };
        let Some(datatype) = measured.get_mut(&property.decl.domain) else {
            continue;
        };
        match property.decl.name() {
            "value" => datatype.value.clone_from(type_name),
            "unit" => datatype.unit.clone_from(&property.decl.fixed),
            "multiplier" => datatype.multiplier.clone_from(&property.decl.fixed),
            _ => {}
        }
    }
    measured
}

/// Build the final attribute record for a value-typed member
pub(super) fn attribute_record(
    property: &MergedProperty,
    type_name: &str,
    kind: ClassKind,
    measured: &HashMap<String, MeasuredType>,
) -> AttributeRecord {
    let name = type_name.to_string();
    let value_type = match kind {
        ClassKind::Enumeration => ValueType::Enumeration { name },
        ClassKind::Compound => ValueType::Compound { name },
        ClassKind::Datatype => measured.get(type_name).cloned().map_or_else(
            || {
                ValueType::Datatype(MeasuredType {
                    name: type_name.to_string(),
                    value: "Float".to_string(),
                    unit: None,
                    multiplier: None,
                })
            },
            ValueType::Datatype,
        ),
        ClassKind::Primitive | ClassKind::Regular => ValueType::Primitive { name },
    };
    AttributeRecord {
        name: property.decl.name().to_string(),
        declaring_class: property.decl.domain.clone(),
        value_type,
        multiplicity: Multiplicity::parse(property.decl.multiplicity.as_deref()),
        documentation: property.decl.comment.clone(),
        default: property.decl.fixed.clone(),
        origins: property.origins.clone(),
    }
}

/// Build an association record; the inverse is linked afterwards
pub(super) fn association_record(property: &MergedProperty, target: &str) -> AssociationRecord {
    AssociationRecord {
        name: property.decl.name().to_string(),
        declaring_class: property.decl.domain.clone(),
        target: target.to_string(),
        multiplicity: Multiplicity::parse(property.decl.multiplicity.as_deref()),
        inverse: InverseLink::None,
        used: property.decl.association_used.unwrap_or(true),
        documentation: property.decl.comment.clone(),
        origins: property.origins.clone(),
    }
}
