//! Profile definitions
//!
//! A profile is a named whitelist of classes, optionally narrowed to
//! specific members, plus an optional blacklist. Profiles can also be
//! derived from the profile keywords of the schema files a class or member
//! was declared in.

use crate::error::{CimgenError, Result};
use crate::types::ClassRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Which members of a whitelisted class are kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Vec<String>>", into = "Option<Vec<String>>")]
pub enum MemberSelection {
    /// Every attribute and association
    All,
    /// Only the named members
    Only(BTreeSet<String>),
}

impl MemberSelection {
    #[must_use]
    pub fn includes(&self, member: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(members) => members.contains(member),
        }
    }
}

impl From<Option<Vec<String>>> for MemberSelection {
    fn from(members: Option<Vec<String>>) -> Self {
        match members {
            None => Self::All,
            Some(members) if members.iter().any(|m| m == "*") => Self::All,
            Some(members) => Self::Only(members.into_iter().collect()),
        }
    }
}

impl From<MemberSelection> for Option<Vec<String>> {
    fn from(selection: MemberSelection) -> Self {
        match selection {
            MemberSelection::All => None,
            MemberSelection::Only(members) => Some(members.into_iter().collect()),
        }
    }
}

/// A named, versioned class/member whitelist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Select every class of the schema
    #[serde(default)]
    pub include_all: bool,
    /// Whitelisted classes; a null entry selects all members
    #[serde(default)]
    pub classes: BTreeMap<String, MemberSelection>,
    /// Select classes and members declared in files with these keywords
    #[serde(default)]
    pub origins: BTreeSet<String>,
    /// Blacklisted classes (`Terminal`) or members (`ACLineSegment.r0`)
    #[serde(default)]
    pub exclude: BTreeSet<String>,
}

impl Profile {
    /// Create an empty profile
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            include_all: false,
            classes: BTreeMap::new(),
            origins: BTreeSet::new(),
            exclude: BTreeSet::new(),
        }
    }

    /// Profile selecting the whole schema
    #[must_use]
    pub fn all() -> Self {
        Self {
            include_all: true,
            ..Self::new("all")
        }
    }

    /// Profile derived from schema file keywords such as `EQ`
    #[must_use]
    pub fn from_origins<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            origins: keywords.into_iter().map(Into::into).collect(),
            ..Self::new(name)
        }
    }

    /// Whitelist a class with all its members
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into(), MemberSelection::All);
        self
    }

    /// Whitelist a class, narrowed to the given members
    #[must_use]
    pub fn with_members<I, S>(mut self, class: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members = members.into_iter().map(Into::into).collect();
        self.classes.insert(class.into(), MemberSelection::Only(members));
        self
    }

    /// Blacklist a class or a `Class.member`
    #[must_use]
    pub fn excluding(mut self, identifier: impl Into<String>) -> Self {
        self.exclude.insert(identifier.into());
        self
    }

    /// Whether the class name is blacklisted
    #[must_use]
    pub fn excludes_class(&self, class: &str) -> bool {
        self.exclude.contains(class)
    }

    /// Whether the class survives the whitelist and blacklist
    #[must_use]
    pub fn includes_class(&self, class: &ClassRecord) -> bool {
        if self.excludes_class(&class.name) {
            return false;
        }
        self.include_all
            || self.classes.contains_key(&class.name)
            || class.has_any_origin(&self.origins)
    }

    /// Whether `Class.member` is blacklisted
    #[must_use]
    pub fn excludes_member(&self, class: &str, member: &str) -> bool {
        self.exclude.contains(&format!("{class}.{member}"))
    }

    /// Whether a member of an included class is kept
    #[must_use]
    pub fn includes_member(&self, class: &str, member: &str, member_origins: &[String]) -> bool {
        if self.excludes_member(class, member) {
            return false;
        }
        self.include_all
            || self
                .classes
                .get(class)
                .is_some_and(|selection| selection.includes(member))
            || member_origins.iter().any(|o| self.origins.contains(o))
    }

    /// Reject profiles that cannot select anything
    ///
    /// # Errors
    ///
    /// Returns a profile error for an empty name or an empty selection.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CimgenError::profile("profile name must not be empty"));
        }
        if !self.include_all && self.classes.is_empty() && self.origins.is_empty() {
            return Err(CimgenError::profile(format!(
                "profile '{}' selects no classes",
                self.name
            )));
        }
        Ok(())
    }
}
