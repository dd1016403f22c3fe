//! RDF/XML schema loader for CIM/CGMES RDFS exports
//!
//! Reads the RDFS serialisation published with each CGMES profile. The
//! document is parsed into triples with oxigraph's RDF/XML parser, the
//! triples are grouped by subject, and every named subject is classified
//! into a flat [`Declaration`]. Blank nodes only carry values, such as the
//! `rdfs:Literal` of a `cims:isFixed` element.

use super::traits::{LoaderError, LoaderResult, SchemaLoader};
use cimgen_core::prelude::*;
use indexmap::IndexMap;
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{NamedOrBlankNode, Term as RdfTerm};
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use std::collections::HashMap;
use tracing::debug;

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const CIMS_NS: &str = "http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#";
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
pub const DCAT_NS: &str = "http://www.w3.org/ns/dcat#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// Base IRI for documents without `xml:base`
pub const DEFAULT_BASE_IRI: &str = "http://iec.ch/TC57/CIM100";

/// Options for the RDF/XML loader
#[derive(Debug, Clone)]
pub struct RdfXmlConfig {
    /// Trim whitespace around literal values
    pub trim_text: bool,
    /// Collapse runs of whitespace in comments and labels
    pub normalize_whitespace: bool,
    /// Base IRI that relative `rdf:about` values resolve against
    pub base_iri: String,
}

impl Default for RdfXmlConfig {
    fn default() -> Self {
        Self {
            trim_text: true,
            normalize_whitespace: true,
            base_iri: DEFAULT_BASE_IRI.to_string(),
        }
    }
}

/// Loader for CGMES RDFS files in RDF/XML syntax
#[derive(Debug, Clone, Default)]
pub struct RdfXmlLoader {
    config: RdfXmlConfig,
}

/// Object of an RDF statement
#[derive(Debug, Clone, PartialEq, Eq)]
enum Term {
    Resource(String),
    Literal(String),
    Blank(String),
}

/// One subject with its statements
#[derive(Debug)]
struct Node {
    /// Full IRI, or `_:label` for a blank node
    key: String,
    /// Local name of the IRI
    id: String,
    blank: bool,
    types: Vec<String>,
    properties: Vec<(String, Term)>,
}

impl Node {
    fn new(subject: &NamedOrBlankNode) -> Self {
        let (key, blank) = match subject {
            NamedOrBlankNode::NamedNode(node) => (node.as_str().to_string(), false),
            NamedOrBlankNode::BlankNode(node) => (format!("_:{}", node.as_str()), true),
        };
        let id = if blank {
            String::new()
        } else {
            local_name(&key).to_string()
        };
        Self {
            key,
            id,
            blank,
            types: Vec::new(),
            properties: Vec::new(),
        }
    }

    fn has_type(&self, iri: &str) -> bool {
        self.types.iter().any(|t| t == iri)
    }

    fn first(&self, predicate: &str) -> Option<&str> {
        self.properties
            .iter()
            .find_map(|(p, term)| match term {
                Term::Resource(s) | Term::Literal(s) if p == predicate => Some(s.as_str()),
                _ => None,
            })
    }

    fn first_local(&self, predicate: &str) -> Option<String> {
        self.first(predicate).map(local_name).map(String::from)
    }
}

/// Local name of an IRI: the fragment, or the last path segment
#[must_use]
pub fn local_name(iri: &str) -> &str {
    if let Some((_, fragment)) = iri.rsplit_once('#') {
        fragment
    } else if let Some((_, segment)) = iri.rsplit_once('/') {
        segment
    } else {
        iri
    }
}

/// Normalise a type reference, mapping XSD datatypes to CIM primitive names
#[must_use]
pub fn type_reference(iri: &str) -> String {
    let Some(xsd) = iri.strip_prefix(XSD_NS) else {
        return local_name(iri).to_string();
    };
    match xsd {
        "string" | "normalizedString" | "anyURI" | "token" => "String",
        "integer" | "int" | "long" | "short" | "nonNegativeInteger" | "positiveInteger" => {
            "Integer"
        }
        "boolean" => "Boolean",
        "float" | "double" => "Float",
        "decimal" => "Decimal",
        "date" => "Date",
        "dateTime" => "DateTime",
        "time" => "Time",
        "gMonthDay" => "MonthDay",
        "duration" => "Duration",
        other => other,
    }
    .to_string()
}

impl RdfXmlLoader {
    /// Create loader with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create loader with custom configuration
    #[must_use]
    pub fn with_config(config: RdfXmlConfig) -> Self {
        Self { config }
    }

    /// Check that the document is closed and its root is `rdf:RDF`
    fn check_envelope(content: &str, source: &str) -> LoaderResult<()> {
        let mut reader = NsReader::from_str(content);
        let parse_error = |position: usize, message: String| LoaderError::Parse {
            location: format!("{source} (byte {position})"),
            message,
        };

        let mut depth = 0usize;
        let mut seen_root = false;
        loop {
            let result = reader.read_resolved_event().map(|(ns, event)| {
                let in_rdf = matches!(
                    ns,
                    ResolveResult::Bound(Namespace(iri)) if iri == RDF_NS.as_bytes()
                );
                (in_rdf, event)
            });
            match result {
                Ok((in_rdf, Event::Start(e))) if !seen_root => {
                    Self::expect_rdf_root(in_rdf, &e, source)?;
                    seen_root = true;
                    depth += 1;
                }
                Ok((in_rdf, Event::Empty(e))) if !seen_root => {
                    Self::expect_rdf_root(in_rdf, &e, source)?;
                    seen_root = true;
                }
                Ok((_, Event::Start(_))) => depth += 1,
                Ok((_, Event::End(_))) => depth = depth.saturating_sub(1),
                Ok((_, Event::Eof)) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(parse_error(
                        reader.buffer_position(),
                        format!("XML parse error: {e}"),
                    ));
                }
            }
        }

        if !seen_root {
            return Err(LoaderError::Parse {
                location: source.to_string(),
                message: "no root element found".to_string(),
            });
        }
        if depth > 0 {
            return Err(parse_error(
                reader.buffer_position(),
                "unexpected end of document".to_string(),
            ));
        }
        Ok(())
    }

    fn expect_rdf_root(in_rdf: bool, element: &BytesStart, source: &str) -> LoaderResult<()> {
        if in_rdf && element.local_name().as_ref() == b"RDF" {
            return Ok(());
        }
        Err(LoaderError::Parse {
            location: source.to_string(),
            message: format!(
                "expected rdf:RDF root element, found <{}>",
                String::from_utf8_lossy(element.name().as_ref())
            ),
        })
    }

    /// Parse the document into subjects, in order of first appearance
    fn read_nodes(&self, content: &str, source: &str) -> LoaderResult<Vec<Node>> {
        let parser = RdfParser::from_format(RdfFormat::RdfXml)
            .with_base_iri(&self.config.base_iri)
            .map_err(|e| LoaderError::Parse {
                location: source.to_string(),
                message: format!("invalid base IRI '{}': {e}", self.config.base_iri),
            })?;

        let rdf_type = format!("{RDF_NS}type");
        let mut nodes: IndexMap<String, Node> = IndexMap::new();
        for quad in parser.for_reader(content.as_bytes()) {
            let quad = quad.map_err(|e| LoaderError::Parse {
                location: source.to_string(),
                message: format!("Failed to parse RDF: {e}"),
            })?;
            let object = match &quad.object {
                RdfTerm::NamedNode(node) => Term::Resource(node.as_str().to_string()),
                RdfTerm::Literal(literal) => Term::Literal(literal.value().to_string()),
                RdfTerm::BlankNode(node) => Term::Blank(format!("_:{}", node.as_str())),
                #[allow(unreachable_patterns)]
                _ => continue,
            };

            let subject = Node::new(&quad.subject);
            let node = nodes.entry(subject.key.clone()).or_insert(subject);
            match object {
                Term::Resource(iri) if quad.predicate.as_str() == rdf_type => node.types.push(iri),
                object => node
                    .properties
                    .push((quad.predicate.as_str().to_string(), object)),
            }
        }

        // `<cims:isFixed rdfs:Literal="EQ"/>` puts the value on a blank node
        let literal_key = format!("{RDFS_NS}Literal");
        let blank_literals: HashMap<String, String> = nodes
            .values()
            .filter(|node| node.blank)
            .filter_map(|node| {
                node.first(&literal_key)
                    .map(|value| (node.key.clone(), value.to_string()))
            })
            .collect();
        let mut nodes: Vec<Node> = nodes.into_values().collect();
        for node in &mut nodes {
            for (_, term) in &mut node.properties {
                if let Term::Blank(key) = term
                    && let Some(value) = blank_literals.get(key)
                {
                    *term = Term::Literal(value.clone());
                }
            }
        }
        Ok(nodes)
    }

    fn text(&self, node: &Node, predicate: &str) -> Option<String> {
        let raw = node.first(predicate)?;
        let text = if self.config.normalize_whitespace {
            raw.split_whitespace().collect::<Vec<_>>().join(" ")
        } else if self.config.trim_text {
            raw.trim().to_string()
        } else {
            raw.to_string()
        };
        (!text.is_empty()).then_some(text)
    }

    fn stereotypes(node: &Node) -> Vec<String> {
        let stereotype = format!("{CIMS_NS}stereotype");
        node.properties
            .iter()
            .filter(|(p, _)| *p == stereotype)
            .filter_map(|(_, term)| match term {
                Term::Resource(iri) => Some(local_name(iri).to_string()),
                Term::Literal(text) => Some(text.trim().to_string()),
                Term::Blank(_) => None,
            })
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn class_decl(&self, node: &Node) -> ClassDecl {
        ClassDecl {
            id: node.id.clone(),
            label: self.text(node, &format!("{RDFS_NS}label")),
            comment: self.text(node, &format!("{RDFS_NS}comment")),
            super_class: node.first_local(&format!("{RDFS_NS}subClassOf")),
            stereotypes: Self::stereotypes(node),
            package: node.first_local(&format!("{CIMS_NS}belongsToCategory")),
        }
    }

    fn property_decl(&self, node: &Node, source: &str) -> LoaderResult<PropertyDecl> {
        let location = format!("{source}: {}", node.id);
        let domain = node
            .first_local(&format!("{RDFS_NS}domain"))
            .ok_or_else(|| LoaderError::MissingField {
                location: location.clone(),
                field: "rdfs:domain".to_string(),
            })?;
        let range = node.first(&format!("{RDFS_NS}range")).map(type_reference);
        let data_type = node.first(&format!("{CIMS_NS}dataType")).map(type_reference);
        if range.is_none() && data_type.is_none() {
            return Err(LoaderError::MissingField {
                location,
                field: "rdfs:range or cims:dataType".to_string(),
            });
        }

        let association_used = node
            .first(&format!("{CIMS_NS}AssociationUsed"))
            .map(|v| local_name(v.trim()).eq_ignore_ascii_case("yes"));

        Ok(PropertyDecl {
            id: node.id.clone(),
            label: self.text(node, &format!("{RDFS_NS}label")),
            comment: self.text(node, &format!("{RDFS_NS}comment")),
            domain,
            range,
            data_type,
            multiplicity: node.first_local(&format!("{CIMS_NS}multiplicity")),
            inverse_role: node.first_local(&format!("{CIMS_NS}inverseRoleName")),
            association_used,
            fixed: node
                .first(&format!("{CIMS_NS}isFixed"))
                .map(|v| v.trim().to_string()),
            stereotypes: Self::stereotypes(node),
        })
    }

    fn enum_value_decl(&self, node: &Node) -> Option<EnumValueDecl> {
        let schema_namespaces = [RDF_NS, RDFS_NS, OWL_NS, CIMS_NS];
        let enumeration = node
            .types
            .iter()
            .find(|t| !schema_namespaces.iter().any(|ns| t.starts_with(ns)))?;
        Some(EnumValueDecl {
            id: node.id.clone(),
            label: self.text(node, &format!("{RDFS_NS}label")),
            comment: self.text(node, &format!("{RDFS_NS}comment")),
            enumeration: local_name(enumeration).to_string(),
        })
    }

    /// Classify one subject and record it in the document
    fn add_node(&self, node: &Node, document: &mut SchemaDocument) -> LoaderResult<()> {
        if node.blank {
            return Ok(());
        }
        if node.id.is_empty() {
            return Err(LoaderError::MissingField {
                location: format!("{}: <{}>", document.source, node.key),
                field: "rdf:about".to_string(),
            });
        }

        if node.has_type(&format!("{RDFS_NS}Class")) {
            document
                .declarations
                .push(Declaration::Class(self.class_decl(node)));
        } else if node.has_type(&format!("{RDF_NS}Property")) {
            let property = self.property_decl(node, &document.source)?;
            // CGMES 2.4.15 carries the profile keyword as a fixed `shortName`
            if document.keyword.is_none()
                && property.name() == "shortName"
                && let Some(fixed) = &property.fixed
            {
                document.keyword = Some(fixed.clone());
            }
            document.declarations.push(Declaration::Property(property));
        } else if node.has_type(&format!("{OWL_NS}Ontology")) {
            if let Some(keyword) = self.text(node, &format!("{DCAT_NS}keyword")) {
                document.keyword = Some(keyword);
            }
            let version_iri = format!("{OWL_NS}versionIRI");
            let version_info = format!("{OWL_NS}versionInfo");
            document.version = node
                .first(&version_iri)
                .or_else(|| node.first(&version_info))
                .map(|v| v.trim().to_string());
        } else if node.has_type(&format!("{CIMS_NS}ClassCategory")) {
            debug!("{}: skipping package {}", document.source, node.id);
        } else if let Some(value) = self.enum_value_decl(node) {
            document.declarations.push(Declaration::EnumValue(value));
        } else {
            debug!("{}: skipping untyped node {}", document.source, node.id);
        }
        Ok(())
    }
}

impl SchemaLoader for RdfXmlLoader {
    fn name(&self) -> &'static str {
        "rdf-xml"
    }

    fn load_str(&self, content: &str, source: &str) -> LoaderResult<SchemaDocument> {
        Self::check_envelope(content, source)?;
        let nodes = self.read_nodes(content, source)?;

        let mut document = SchemaDocument::new(source);
        for node in &nodes {
            self.add_node(node, &mut document)?;
        }
        Ok(document)
    }
}
