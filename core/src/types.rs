//! Resolved schema model
//!
//! The model builder produces a [`SchemaModel`]: one [`ClassRecord`] per
//! class identifier, linked by name. Base classes and association targets
//! are non-owning lookups into the same model.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// Shape of a class, derived from its stereotypes and value instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    /// Ordinary class with attributes and associations
    Regular,
    /// Enumeration with an ordered set of values
    Enumeration,
    /// Schema primitive such as `Float` or `String`
    Primitive,
    /// Measured quantity with value, unit and multiplier
    Datatype,
    /// Structured value type without identity
    Compound,
}

impl ClassKind {
    /// Whether records of this kind are used as attribute value types
    #[must_use]
    pub fn is_value_type(self) -> bool {
        !matches!(self, Self::Regular)
    }
}

/// Cardinality of an attribute or association end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Multiplicity {
    /// Exactly one (`M:1`, `M:1..1`)
    Single,
    /// Zero or one (`M:0..1`, or no multiplicity given)
    Optional,
    /// Any upper bound of `n` (`M:0..n`, `M:1..n`, `M:2..n`)
    List,
}

impl Multiplicity {
    /// Parse a raw multiplicity token.
    ///
    /// Accepts the bare token (`M:0..1`) as well as a full IRI ending in it.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Optional;
        };
        let token = raw.rsplit_once('#').map_or(raw, |(_, t)| t);
        let token = token.strip_prefix("M:").unwrap_or(token);
        let upper = token.rsplit_once("..").map_or(token, |(_, upper)| upper);
        match (token, upper) {
            (_, "n" | "*") => Self::List,
            ("1" | "1..1", _) => Self::Single,
            (_, upper) if upper.parse::<u32>().is_ok_and(|n| n > 1) => Self::List,
            _ => Self::Optional,
        }
    }

    #[must_use]
    pub fn is_list(self) -> bool {
        self == Self::List
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "1..1"),
            Self::Optional => write!(f, "0..1"),
            Self::List => write!(f, "0..n"),
        }
    }
}

/// Unit and multiplier semantics of a datatype
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasuredType {
    /// Datatype class name, e.g. `Length`
    pub name: String,
    /// Primitive holding the numeric value, e.g. `Float`
    pub value: String,
    pub unit: Option<String>,
    pub multiplier: Option<String>,
}

/// Value type of an attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueType {
    Primitive { name: String },
    Enumeration { name: String },
    Datatype(MeasuredType),
    Compound { name: String },
}

impl ValueType {
    /// Name of the class the value type refers to
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Primitive { name } | Self::Enumeration { name } | Self::Compound { name } => name,
            Self::Datatype(measured) => &measured.name,
        }
    }

    /// Every class this value type depends on
    #[must_use]
    pub fn referenced_classes(&self) -> Vec<&str> {
        match self {
            Self::Datatype(measured) => vec![measured.name.as_str(), measured.value.as_str()],
            other => vec![other.type_name()],
        }
    }
}

/// An attribute declared directly on a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRecord {
    pub name: String,
    pub declaring_class: String,
    pub value_type: ValueType,
    pub multiplicity: Multiplicity,
    pub documentation: Option<String>,
    /// Fixed value from the schema, if any
    pub default: Option<String>,
    /// Profile keywords of the files declaring this attribute
    pub origins: Vec<String>,
}

/// Inverse side of an association
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InverseLink {
    /// Unidirectional association
    None,
    /// Matching inverse found on the target class or one of its ancestors
    Resolved {
        class: String,
        name: String,
        multiplicity: Multiplicity,
    },
    /// Inverse named in the schema but missing or not pointing back
    Inconsistent { name: String },
}

/// An association end declared on a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationRecord {
    pub name: String,
    pub declaring_class: String,
    pub target: String,
    pub multiplicity: Multiplicity,
    pub inverse: InverseLink,
    /// `cims:AssociationUsed`; associations default to used
    pub used: bool,
    pub documentation: Option<String>,
    pub origins: Vec<String>,
}

/// A named enumeration value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub documentation: Option<String>,
}

/// A resolved class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    pub base: Option<String>,
    pub kind: ClassKind,
    pub documentation: Option<String>,
    pub package: Option<String>,
    pub attributes: Vec<AttributeRecord>,
    pub associations: Vec<AssociationRecord>,
    /// Values in declaration order, unique by name
    pub enum_values: Vec<EnumValue>,
    /// Set for datatype classes
    pub datatype: Option<MeasuredType>,
    pub origins: Vec<String>,
    /// False for classes only inferred from references
    pub declared: bool,
}

impl ClassRecord {
    /// Create an empty record
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            base: None,
            kind,
            documentation: None,
            package: None,
            attributes: Vec::new(),
            associations: Vec::new(),
            enum_values: Vec::new(),
            datatype: None,
            origins: Vec::new(),
            declared: false,
        }
    }

    #[must_use]
    pub fn is_enumeration(&self) -> bool {
        self.kind == ClassKind::Enumeration
    }

    #[must_use]
    pub fn is_datatype(&self) -> bool {
        self.kind == ClassKind::Datatype
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeRecord> {
        self.attributes.iter().find(|a| a.name == name)
    }

    #[must_use]
    pub fn association(&self, name: &str) -> Option<&AssociationRecord> {
        self.associations.iter().find(|a| a.name == name)
    }

    /// Whether any of `keywords` is among the origins of this class
    #[must_use]
    pub fn has_any_origin(&self, keywords: &BTreeSet<String>) -> bool {
        self.origins.iter().any(|o| keywords.contains(o))
    }
}

/// The linked class graph of one run.
///
/// Classes are kept sorted by name; the index maps each name to its slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ClassRecord>", into = "Vec<ClassRecord>")]
pub struct SchemaModel {
    classes: Vec<ClassRecord>,
    index: HashMap<String, usize>,
}

impl SchemaModel {
    /// Build a model, sorting the records by name
    #[must_use]
    pub fn new(mut classes: Vec<ClassRecord>) -> Self {
        classes.sort_by(|a, b| a.name.cmp(&b.name));
        let index = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        Self { classes, index }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClassRecord> {
        self.index.get(name).map(|&i| &self.classes[i])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All classes, sorted by name
    #[must_use]
    pub fn classes(&self) -> &[ClassRecord] {
        &self.classes
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassRecord> {
        self.classes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name.as_str()).collect()
    }

    /// Base-class chain of `name`, nearest first.
    ///
    /// Stops at a missing base or on revisiting a class.
    #[must_use]
    pub fn ancestors(&self, name: &str) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut seen: HashSet<&str> = HashSet::from([name]);
        let mut current = self.get(name).and_then(|c| c.base.as_deref());
        while let Some(base) = current {
            if !seen.insert(base) {
                break;
            }
            chain.push(base);
            current = self.get(base).and_then(|c| c.base.as_deref());
        }
        chain
    }

    /// Whether `ancestor` is `name` itself or one of its base classes
    #[must_use]
    pub fn is_same_or_ancestor(&self, ancestor: &str, name: &str) -> bool {
        ancestor == name || self.ancestors(name).contains(&ancestor)
    }
}

impl From<Vec<ClassRecord>> for SchemaModel {
    fn from(classes: Vec<ClassRecord>) -> Self {
        Self::new(classes)
    }
}

impl From<SchemaModel> for Vec<ClassRecord> {
    fn from(model: SchemaModel) -> Self {
        model.classes
    }
}
