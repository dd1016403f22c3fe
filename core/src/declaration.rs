//! Raw schema declarations
//!
//! These are the unresolved facts the schema loader extracts from one
//! schema file. Identifiers are local names (the IRI fragment), and no
//! cross-reference has been checked yet.

use serde::{Deserialize, Serialize};

/// One parsed schema file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Path or name the document was read from
    pub source: String,
    /// Profile keyword of the file (e.g. `EQ`, `SSH`)
    pub keyword: Option<String>,
    /// Version IRI or version info of the file
    pub version: Option<String>,
    /// Declarations in document order
    pub declarations: Vec<Declaration>,
}

impl SchemaDocument {
    /// Create an empty document for `source`
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Iterate over the class declarations
    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Class(c) => Some(c),
            _ => None,
        })
    }

    /// Iterate over the property declarations
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Property(p) => Some(p),
            _ => None,
        })
    }

    /// Iterate over the enumeration value declarations
    pub fn enum_values(&self) -> impl Iterator<Item = &EnumValueDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::EnumValue(v) => Some(v),
            _ => None,
        })
    }
}

/// A single untyped declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    /// `rdfs:Class`
    Class(ClassDecl),
    /// `rdf:Property`
    Property(PropertyDecl),
    /// An instance typed by an enumeration class
    EnumValue(EnumValueDecl),
}

/// A class declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub id: String,
    pub label: Option<String>,
    pub comment: Option<String>,
    pub super_class: Option<String>,
    pub stereotypes: Vec<String>,
    pub package: Option<String>,
}

impl ClassDecl {
    /// Create a class declaration with only an identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Check for a stereotype, ignoring case
    #[must_use]
    pub fn has_stereotype(&self, stereotype: &str) -> bool {
        self.stereotypes
            .iter()
            .any(|s| s.eq_ignore_ascii_case(stereotype))
    }
}

/// A property declaration (attribute or association end)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDecl {
    /// Identifier, conventionally `Domain.member`
    pub id: String,
    pub label: Option<String>,
    pub comment: Option<String>,
    /// Owning class
    pub domain: String,
    /// `rdfs:range`, set for associations and enumeration attributes
    pub range: Option<String>,
    /// `cims:dataType`, set for attributes
    pub data_type: Option<String>,
    /// Raw multiplicity token such as `M:0..1`
    pub multiplicity: Option<String>,
    /// Identifier of the inverse property
    pub inverse_role: Option<String>,
    /// `cims:AssociationUsed`
    pub association_used: Option<bool>,
    /// `cims:isFixed` value
    pub fixed: Option<String>,
    pub stereotypes: Vec<String>,
}

impl PropertyDecl {
    /// Member name: the label, or the identifier part after the last `.`
    #[must_use]
    pub fn name(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => member_suffix(&self.id),
        }
    }

    /// The referenced type, preferring `cims:dataType` over `rdfs:range`
    #[must_use]
    pub fn value_type(&self) -> Option<&str> {
        self.data_type.as_deref().or(self.range.as_deref())
    }
}

/// An enumeration value instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueDecl {
    /// Identifier, conventionally `Enumeration.value`
    pub id: String,
    pub label: Option<String>,
    pub comment: Option<String>,
    /// The enumeration class this value is typed by
    pub enumeration: String,
}

impl EnumValueDecl {
    /// Value name: the label, or the identifier part after the last `.`
    #[must_use]
    pub fn name(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => member_suffix(&self.id),
        }
    }
}

fn member_suffix(id: &str) -> &str {
    id.rsplit_once('.').map_or(id, |(_, member)| member)
}
