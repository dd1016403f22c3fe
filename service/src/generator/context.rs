//! Render context
//!
//! A [`RenderContext`] is one class record with every type already mapped
//! for the active language. Renderers only read it; they never look up
//! other classes.

use super::mapping::TypeMappingTable;
use super::registry::TargetLanguage;
use super::traits::{GeneratorError, GeneratorResult};
use cimgen_core::prelude::*;

/// Template selected by the shape of a class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    RootClass,
    DerivedClass,
    Enumeration,
    /// Wrapper around a language primitive
    Primitive,
    /// Measured quantity with unit and multiplier
    Datatype,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAttribute {
    pub name: String,
    /// Schema class of the value, e.g. `Length`
    pub schema_type: String,
    /// Mapped type without multiplicity wrapper
    pub item_type: String,
    /// Mapped type including the list or optional wrapper
    pub target_type: String,
    pub multiplicity: Multiplicity,
    pub default: Option<String>,
    pub documentation: Option<String>,
    pub unit: Option<String>,
    pub multiplier: Option<String>,
    pub is_enumeration: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAssociation {
    pub name: String,
    pub target: String,
    pub item_type: String,
    pub target_type: String,
    pub multiplicity: Multiplicity,
    /// `Class.member` of the resolved inverse end
    pub inverse: Option<String>,
    pub default: Option<String>,
    pub documentation: Option<String>,
}

/// Everything a renderer needs for one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub language: TargetLanguage,
    pub class_name: String,
    pub base: Option<String>,
    pub kind: TemplateKind,
    pub documentation: Option<String>,
    pub attributes: Vec<RenderedAttribute>,
    pub associations: Vec<RenderedAssociation>,
    pub enum_values: Vec<EnumValue>,
    /// Mapped language type of a primitive class, or of a datatype's value
    pub primitive_type: Option<String>,
    pub unit: Option<String>,
    pub multiplier: Option<String>,
}

impl RenderContext {
    /// Map one class record through a language table.
    ///
    /// # Errors
    ///
    /// Returns `UnmappedType` for a primitive class without a table entry,
    /// or every unmapped attribute type of the class together.
    pub fn build(class: &ClassRecord, mapping: &TypeMappingTable) -> GeneratorResult<Self> {
        let language = mapping.language();
        let kind = match class.kind {
            ClassKind::Enumeration => TemplateKind::Enumeration,
            ClassKind::Primitive => TemplateKind::Primitive,
            ClassKind::Datatype => TemplateKind::Datatype,
            ClassKind::Regular | ClassKind::Compound if class.base.is_some() => {
                TemplateKind::DerivedClass
            }
            ClassKind::Regular | ClassKind::Compound => TemplateKind::RootClass,
        };

        let (primitive_type, unit, multiplier) = match kind {
            TemplateKind::Primitive => {
                let mapped = mapping
                    .map_primitive(&class.name)
                    .ok_or_else(|| GeneratorError::unmapped(&class.name, language, &class.name))?;
                (Some(mapped.to_string()), None, None)
            }
            TemplateKind::Datatype => {
                let value = class.datatype.as_ref().map_or("Float", |d| d.value.as_str());
                let mapped = mapping
                    .map_primitive(value)
                    .ok_or_else(|| GeneratorError::unmapped(value, language, &class.name))?;
                let datatype = class.datatype.as_ref();
                (
                    Some(mapped.to_string()),
                    datatype.and_then(|d| d.unit.clone()),
                    datatype.and_then(|d| d.multiplier.clone()),
                )
            }
            _ => (None, None, None),
        };

        let mut errors = Vec::new();
        let mut attributes = Vec::with_capacity(class.attributes.len());
        for attribute in &class.attributes {
            match render_attribute(class, attribute, mapping) {
                Ok(rendered) => attributes.push(rendered),
                Err(err) => errors.push(err),
            }
        }
        if let Some(err) = GeneratorError::from_accumulated(errors) {
            return Err(err);
        }

        let associations = class
            .associations
            .iter()
            .filter(|association| association.used || !association.multiplicity.is_list())
            .map(|association| render_association(association, mapping))
            .collect();

        Ok(Self {
            language,
            class_name: class.name.clone(),
            base: class.base.clone(),
            kind,
            documentation: class.documentation.clone(),
            attributes,
            associations,
            enum_values: class.enum_values.clone(),
            primitive_type,
            unit,
            multiplier,
        })
    }
}

fn render_attribute(
    class: &ClassRecord,
    attribute: &AttributeRecord,
    mapping: &TypeMappingTable,
) -> GeneratorResult<RenderedAttribute> {
    let referrer = format!("{}.{}", class.name, attribute.name);
    let item_type = mapping.map_value_type(&attribute.value_type, &referrer)?;
    let (unit, multiplier) = match &attribute.value_type {
        ValueType::Datatype(measured) => (measured.unit.clone(), measured.multiplier.clone()),
        _ => (None, None),
    };
    Ok(RenderedAttribute {
        name: attribute.name.clone(),
        schema_type: attribute.value_type.type_name().to_string(),
        target_type: mapping.wrap(&item_type, attribute.multiplicity),
        item_type,
        multiplicity: attribute.multiplicity,
        default: mapping.attribute_default(attribute),
        documentation: attribute.documentation.clone(),
        unit,
        multiplier,
        is_enumeration: matches!(attribute.value_type, ValueType::Enumeration { .. }),
    })
}

fn render_association(
    association: &AssociationRecord,
    mapping: &TypeMappingTable,
) -> RenderedAssociation {
    let item_type = mapping.map_reference(&association.target);
    let inverse = match &association.inverse {
        InverseLink::Resolved { class, name, .. } => Some(format!("{class}.{name}")),
        InverseLink::None | InverseLink::Inconsistent { .. } => None,
    };
    RenderedAssociation {
        name: association.name.clone(),
        target: association.target.clone(),
        target_type: mapping.wrap(&item_type, association.multiplicity),
        item_type,
        multiplicity: association.multiplicity,
        inverse,
        default: mapping.association_default(association.multiplicity),
        documentation: association.documentation.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn association(name: &str, multiplicity: Multiplicity, used: bool) -> AssociationRecord {
        AssociationRecord {
            name: name.into(),
            declaring_class: "ConductingEquipment".into(),
            target: "Terminal".into(),
            multiplicity,
            inverse: InverseLink::Resolved {
                class: "Terminal".into(),
                name: "ConductingEquipment".into(),
                multiplicity: Multiplicity::Single,
            },
            used,
            documentation: None,
            origins: Vec::new(),
        }
    }

    #[test]
    fn test_unused_list_associations_skipped() -> GeneratorResult<()> {
        let mut class = ClassRecord::new("ConductingEquipment", ClassKind::Regular);
        class.associations = vec![
            association("Terminals", Multiplicity::List, false),
            association("Owner", Multiplicity::Optional, false),
            association("Parts", Multiplicity::List, true),
        ];
        let mapping = TypeMappingTable::for_language(TargetLanguage::Python);
        let context = RenderContext::build(&class, &mapping)?;
        let names: Vec<&str> = context.associations.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Owner", "Parts"]);
        assert_eq!(
            context.associations[1].inverse.as_deref(),
            Some("Terminal.ConductingEquipment")
        );
        assert_eq!(context.kind, TemplateKind::RootClass);
        Ok(())
    }

    #[test]
    fn test_datatype_context() -> GeneratorResult<()> {
        let mut class = ClassRecord::new("Length", ClassKind::Datatype);
        class.datatype = Some(MeasuredType {
            name: "Length".into(),
            value: "Float".into(),
            unit: Some("m".into()),
            multiplier: Some("k".into()),
        });
        let mapping = TypeMappingTable::for_language(TargetLanguage::Cpp);
        let context = RenderContext::build(&class, &mapping)?;
        assert_eq!(context.kind, TemplateKind::Datatype);
        assert_eq!(context.primitive_type.as_deref(), Some("double"));
        assert_eq!(context.unit.as_deref(), Some("m"));
        Ok(())
    }

    #[test]
    fn test_unmapped_primitive_class() {
        let class = ClassRecord::new("Quaternion", ClassKind::Primitive);
        let mapping = TypeMappingTable::for_language(TargetLanguage::Java);
        let err = RenderContext::build(&class, &mapping).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::UnmappedType { ref type_name, .. } if type_name == "Quaternion"
        ));
    }

    #[test]
    fn test_every_unmapped_attribute_reported() {
        let mut class = ClassRecord::new("Season", ClassKind::Regular);
        for (name, type_name) in [("flag", "Quaternion"), ("phase", "Octonion")] {
            class.attributes.push(AttributeRecord {
                name: name.into(),
                declaring_class: "Season".into(),
                value_type: ValueType::Primitive { name: type_name.into() },
                multiplicity: Multiplicity::Optional,
                documentation: None,
                default: None,
                origins: Vec::new(),
            });
        }
        let mapping = TypeMappingTable::for_language(TargetLanguage::Java);
        let err = RenderContext::build(&class, &mapping).unwrap_err();
        let GeneratorError::Multiple(errors) = err else {
            panic!("expected both attributes to be reported, got {err}");
        };
        let referrers: Vec<String> = errors
            .into_iter()
            .filter_map(|e| match e {
                GeneratorError::UnmappedType { referrer, .. } => Some(referrer),
                _ => None,
            })
            .collect();
        assert_eq!(referrers, vec!["Season.flag", "Season.phase"]);
    }
}
