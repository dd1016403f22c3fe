//! Inverse association linking

use super::members::PropertyTable;
use cimgen_core::prelude::*;
use tracing::warn;

/// Link each association to its inverse, flagging the ones that don't match.
///
/// The inverse must be declared on the target class or one of its
/// ancestors, point back at the declaring class (or an ancestor), and,
/// when it names an inverse itself, name this association.
pub(super) fn link_inverses(model: SchemaModel, properties: &PropertyTable) -> SchemaModel {
    let mut classes = model.classes().to_vec();
    for class in &mut classes {
        for association in &mut class.associations {
            association.inverse = resolve_inverse(&model, properties, association);
        }
    }
    SchemaModel::new(classes)
}

fn resolve_inverse(
    model: &SchemaModel,
    properties: &PropertyTable,
    association: &AssociationRecord,
) -> InverseLink {
    let Some(own) = properties.get(&association.declaring_class, &association.name) else {
        return InverseLink::None;
    };
    let own_id = own.decl.id.as_str();
    let Some(inverse_id) = own.decl.inverse_role.clone() else {
        return InverseLink::None;
    };

    let Some(inverse) = properties.by_id(&inverse_id) else {
        warn!("{own_id}: inverse role {inverse_id} is not declared");
        return InverseLink::Inconsistent { name: inverse_id };
    };

    let on_target = model.is_same_or_ancestor(&inverse.decl.domain, &association.target);
    let points_back = inverse
        .decl
        .range
        .as_deref()
        .is_some_and(|range| model.is_same_or_ancestor(range, &association.declaring_class));
    let names_back = inverse
        .decl
        .inverse_role
        .as_deref()
        .is_none_or(|role| role == own_id);

    if on_target && points_back && names_back {
        InverseLink::Resolved {
            class: inverse.decl.domain.clone(),
            name: inverse.decl.name().to_string(),
            multiplicity: Multiplicity::parse(inverse.decl.multiplicity.as_deref()),
        }
    } else {
        warn!(
            "{own_id}: inverse role {inverse_id} does not match (on target: {on_target}, points back: {points_back}, names back: {names_back})"
        );
        InverseLink::Inconsistent { name: inverse_id }
    }
}
