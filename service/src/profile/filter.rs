//! Profile-based pruning of the class model

use cimgen_core::prelude::*;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{debug, info, warn};

/// Applies a [`Profile`] to a [`SchemaModel`].
///
/// Kept:
/// - classes the profile selects, with their selected members;
/// - every primitive, datatype, enumeration or compound class used by a
///   kept attribute, with all of its members.
///
/// Dropped:
/// - attributes whose value type is blacklisted;
/// - `Class.member` blacklist entries, value classes included;
/// - associations whose target class is not kept.
///
/// A subclass whose base class is not kept becomes a root. An inverse link
/// to a dropped association is cleared. Enumeration values are never
/// filtered.
#[derive(Debug, Clone, Copy)]
pub struct ProfileFilter<'a> {
    profile: &'a Profile,
}

impl<'a> ProfileFilter<'a> {
    #[must_use]
    pub fn new(profile: &'a Profile) -> Self {
        Self { profile }
    }

    /// Produce the pruned model
    #[must_use]
    pub fn apply(&self, model: &SchemaModel) -> SchemaModel {
        let mut kept: BTreeMap<String, ClassRecord> = BTreeMap::new();
        let mut queue: VecDeque<&ClassRecord> = model
            .iter()
            .filter(|class| self.profile.includes_class(class))
            .collect();
        let mut queued: BTreeSet<&str> =
            queue.iter().copied().map(|c| c.name.as_str()).collect();

        while let Some(class) = queue.pop_front() {
            let record = self.select_members(class);
            for attribute in &record.attributes {
                for dependency in attribute.value_type.referenced_classes() {
                    if let Some(value_class) = model.get(dependency)
                        && queued.insert(value_class.name.as_str())
                    {
                        debug!("{} pulled in by {}.{}", dependency, class.name, attribute.name);
                        queue.push_back(value_class);
                    }
                }
            }
            kept.insert(record.name.clone(), record);
        }

        let names: BTreeSet<String> = kept.keys().cloned().collect();
        let mut classes: Vec<ClassRecord> = kept.into_values().collect();
        for class in &mut classes {
            self.prune_edges(class, &names);
        }
        let pruned = SchemaModel::new(classes);
        let pruned = Self::clear_dangling_inverses(pruned);

        info!(
            "Profile '{}' keeps {} of {} classes",
            self.profile.name,
            pruned.len(),
            model.len()
        );
        pruned
    }

    /// Copy of `class` with only the members the profile keeps
    fn select_members(&self, class: &ClassRecord) -> ClassRecord {
        let mut record = class.clone();
        let value_type = class.kind.is_value_type();

        let member_kept = |name: &str, origins: &[String]| {
            if value_type {
                !self.profile.excludes_member(&class.name, name)
            } else {
                self.profile.includes_member(&class.name, name, origins)
            }
        };
        record.attributes.retain(|attribute| {
            member_kept(&attribute.name, attribute.origins.as_slice())
                && attribute
                    .value_type
                    .referenced_classes()
                    .iter()
                    .all(|dependency| !self.profile.excludes_class(dependency))
        });
        record
            .associations
            .retain(|association| member_kept(&association.name, association.origins.as_slice()));
        record
    }

    fn prune_edges(&self, class: &mut ClassRecord, kept: &BTreeSet<String>) {
        if let Some(base) = &class.base
            && !kept.contains(base)
        {
            warn!(
                "Profile '{}' drops {}, promoting {} to a root class",
                self.profile.name, base, class.name
            );
            class.base = None;
        }
        class.associations.retain(|association| {
            let keep = kept.contains(&association.target);
            if !keep {
                debug!(
                    "Dropping {}.{}: target {} not in profile",
                    class.name, association.name, association.target
                );
            }
            keep
        });
    }

    fn clear_dangling_inverses(model: SchemaModel) -> SchemaModel {
        let mut classes = model.classes().to_vec();
        for class in &mut classes {
            for association in &mut class.associations {
                if let InverseLink::Resolved { class: owner, name, .. } = &association.inverse
                    && !model.get(owner).is_some_and(|c| c.association(name).is_some())
                {
                    association.inverse = InverseLink::None;
                }
            }
        }
        SchemaModel::new(classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn regular(name: &str, base: Option<&str>) -> ClassRecord {
        let mut record = ClassRecord::new(name, ClassKind::Regular);
        record.base = base.map(String::from);
        record
    }

    fn association(from: &str, name: &str, to: &str, inverse: InverseLink) -> AssociationRecord {
        AssociationRecord {
            name: name.to_string(),
            declaring_class: from.to_string(),
            target: to.to_string(),
            multiplicity: Multiplicity::List,
            inverse,
            used: true,
            documentation: None,
            origins: Vec::new(),
        }
    }

    fn model() -> SchemaModel {
        let mut line = regular("ACLineSegment", Some("ConductingEquipment"));
        line.attributes.push(AttributeRecord {
            name: "length".into(),
            declaring_class: "ACLineSegment".into(),
            value_type: ValueType::Datatype(MeasuredType {
                name: "Length".into(),
                value: "Float".into(),
                unit: Some("m".into()),
                multiplier: None,
            }),
            multiplicity: Multiplicity::Optional,
            documentation: None,
            default: None,
            origins: Vec::new(),
        });
        let mut equipment = regular("ConductingEquipment", None);
        equipment.associations.push(association(
            "ConductingEquipment",
            "Terminals",
            "Terminal",
            InverseLink::Resolved {
                class: "Terminal".into(),
                name: "ConductingEquipment".into(),
                multiplicity: Multiplicity::Single,
            },
        ));
        let mut terminal = regular("Terminal", None);
        terminal.associations.push(association(
            "Terminal",
            "ConductingEquipment",
            "ConductingEquipment",
            InverseLink::Resolved {
                class: "ConductingEquipment".into(),
                name: "Terminals".into(),
                multiplicity: Multiplicity::List,
            },
        ));
        let mut length = ClassRecord::new("Length", ClassKind::Datatype);
        for (name, type_name) in [("value", "Float"), ("multiplier", "Float")] {
            length.attributes.push(AttributeRecord {
                name: name.into(),
                declaring_class: "Length".into(),
                value_type: ValueType::Primitive { name: type_name.into() },
                multiplicity: Multiplicity::Optional,
                documentation: None,
                default: None,
                origins: Vec::new(),
            });
        }
        let float = ClassRecord::new("Float", ClassKind::Primitive);
        SchemaModel::new(vec![line, equipment, terminal, length, float])
    }

    #[test]
    fn test_value_types_pulled_in() {
        let profile = Profile::new("p").with_class("ACLineSegment");
        let pruned = ProfileFilter::new(&profile).apply(&model());
        assert_eq!(pruned.names(), vec!["ACLineSegment", "Float", "Length"]);
    }

    #[test]
    fn test_dropped_base_promotes_to_root() {
        let profile = Profile::new("p").with_class("ACLineSegment");
        let pruned = ProfileFilter::new(&profile).apply(&model());
        assert_eq!(pruned.get("ACLineSegment").and_then(|c| c.base.clone()), None);
    }

    #[test]
    fn test_association_to_dropped_target_removed() {
        let profile = Profile::all().excluding("Terminal");
        let pruned = ProfileFilter::new(&profile).apply(&model());
        let equipment = pruned.get("ConductingEquipment").expect("kept");
        assert!(equipment.associations.is_empty());
        assert!(!pruned.contains("Terminal"));
    }

    #[test]
    fn test_inverse_cleared_when_member_dropped() {
        let profile = Profile::new("p")
            .with_class("ConductingEquipment")
            .with_members("Terminal", Vec::<String>::new());
        let pruned = ProfileFilter::new(&profile).apply(&model());
        let terminals = pruned
            .get("ConductingEquipment")
            .and_then(|c| c.association("Terminals"))
            .expect("kept");
        assert_eq!(terminals.inverse, InverseLink::None);
    }

    #[test]
    fn test_excluded_value_type_drops_attribute() {
        let profile = Profile::new("p").with_class("ACLineSegment").excluding("Length");
        let pruned = ProfileFilter::new(&profile).apply(&model());
        assert!(pruned.get("ACLineSegment").is_some_and(|c| c.attributes.is_empty()));
        assert!(!pruned.contains("Length"));
    }

    #[test]
    fn test_member_exclusion_applies_to_value_classes() {
        let profile = Profile::new("p")
            .with_class("ACLineSegment")
            .excluding("Length.multiplier");
        let pruned = ProfileFilter::new(&profile).apply(&model());
        let members: Vec<&str> = pruned
            .get("Length")
            .map(|c| c.attributes.iter().map(|a| a.name.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(members, vec!["value"]);
    }
}
