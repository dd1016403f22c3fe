//! Integration tests for the RDF/XML schema loader

use cimgen_service::loader::{LoaderError, RdfXmlConfig, RdfXmlLoader, SchemaLoader};
use cimgen_service::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:cims="http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#"
         xml:base="http://iec.ch/TC57/2013/CIM-schema-cim16">"#;

fn write_schema(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, format!("{HEADER}\n{body}\n</rdf:RDF>\n")).expect("write schema");
    path
}

const TOPOLOGY: &str = r##"
  <rdf:Description rdf:about="#TopologyVersion.shortName">
    <rdfs:label xml:lang="en">shortName</rdfs:label>
    <rdfs:domain rdf:resource="#TopologyVersion"/>
    <cims:dataType rdf:resource="#String"/>
    <cims:isFixed rdfs:Literal="TP"/>
    <rdf:type rdf:resource="http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"/>
  </rdf:Description>
  <rdf:Description rdf:about="#TopologicalNode">
    <rdfs:label xml:lang="en">TopologicalNode</rdfs:label>
    <rdfs:comment rdf:parseType="Literal">For a detailed substation model a
      topological node is a set of connectivity nodes.</rdfs:comment>
    <rdf:type rdf:resource="http://www.w3.org/2000/01/rdf-schema#Class"/>
    <cims:belongsToCategory rdf:resource="#Package_Topology"/>
  </rdf:Description>
  <rdf:Description rdf:about="#Package_Topology">
    <rdfs:label xml:lang="en">Topology</rdfs:label>
    <rdf:type rdf:resource="http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#ClassCategory"/>
  </rdf:Description>
  <rdf:Description rdf:about="#TopologicalNode.ConnectivityNodes">
    <rdfs:label xml:lang="en">ConnectivityNodes</rdfs:label>
    <rdfs:domain rdf:resource="#TopologicalNode"/>
    <rdfs:range rdf:resource="#ConnectivityNode"/>
    <cims:multiplicity rdf:resource="http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#M:0..n"/>
    <cims:AssociationUsed>No</cims:AssociationUsed>
    <cims:inverseRoleName rdf:resource="#ConnectivityNode.TopologicalNode"/>
    <rdf:type rdf:resource="http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"/>
  </rdf:Description>"##;

#[test]
fn test_load_file_reads_declarations() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_schema(&dir, "TP.rdf", TOPOLOGY);
    let document = RdfXmlLoader::new().load_file(&path).expect("loads");

    assert_eq!(document.keyword.as_deref(), Some("TP"));
    assert!(document.source.ends_with("TP.rdf"));

    let node = document.classes().next().expect("one class");
    assert_eq!(node.id, "TopologicalNode");
    assert_eq!(
        node.comment.as_deref(),
        Some("For a detailed substation model a topological node is a set of connectivity nodes.")
    );
    assert_eq!(node.package.as_deref(), Some("Package_Topology"));

    let nodes = document
        .properties()
        .find(|p| p.name() == "ConnectivityNodes")
        .expect("association declared");
    assert_eq!(nodes.range.as_deref(), Some("ConnectivityNode"));
    assert_eq!(nodes.association_used, Some(false));
    assert_eq!(
        nodes.inverse_role.as_deref(),
        Some("ConnectivityNode.TopologicalNode")
    );
}

#[test]
fn test_whitespace_kept_when_not_normalized() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_schema(&dir, "TP.rdf", TOPOLOGY);
    let loader = RdfXmlLoader::with_config(RdfXmlConfig {
        normalize_whitespace: false,
        ..RdfXmlConfig::default()
    });
    let document = loader.load_file(&path).expect("loads");
    let comment = document
        .classes()
        .next()
        .and_then(|c| c.comment.clone())
        .expect("comment");
    assert!(comment.contains('\n'));
}

#[test]
fn test_load_files_in_path_order() {
    let dir = TempDir::new().expect("temp dir");
    let second = write_schema(&dir, "b_TP.rdf", TOPOLOGY);
    let first = write_schema(
        &dir,
        "a_EQ.rdf",
        r##"
  <rdf:Description rdf:about="#ConnectivityNode">
    <rdf:type rdf:resource="http://www.w3.org/2000/01/rdf-schema#Class"/>
  </rdf:Description>"##,
    );

    let documents = RdfXmlLoader::new()
        .load_files(&[second.clone(), first.clone(), second])
        .expect("loads");
    assert_eq!(documents.len(), 2);
    assert!(documents[0].source.ends_with("a_EQ.rdf"));
    assert!(documents[1].source.ends_with("b_TP.rdf"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().expect("temp dir");
    let err = RdfXmlLoader::new()
        .load_file(&dir.path().join("absent.rdf"))
        .unwrap_err();
    assert!(matches!(err, LoaderError::Io { ref path, .. } if path.ends_with("absent.rdf")));

    let converted: CimgenError = err.into();
    assert!(matches!(converted, CimgenError::IoError(_)));
}

#[test]
fn test_wrong_root_is_malformed() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("plain.xml");
    fs::write(&path, "<schema><class name=\"A\"/></schema>").expect("write");

    let err: CimgenError = RdfXmlLoader::new().load_file(&path).unwrap_err().into();
    match err {
        CimgenError::MalformedSchema { location, message } => {
            assert!(location.ends_with("plain.xml"));
            assert!(message.contains("rdf:RDF"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_driver_aborts_on_first_broken_file() {
    let dir = TempDir::new().expect("temp dir");
    let good = write_schema(&dir, "a_TP.rdf", TOPOLOGY);
    let bad = dir.path().join("b_broken.rdf");
    fs::write(&bad, format!("{HEADER}\n<rdf:Description>")).expect("write");

    let driver = GenerationDriver::new(CimgenConfig::default());
    let err = driver.build_model(&[good, bad]).unwrap_err();
    assert!(matches!(err, CimgenError::MalformedSchema { .. }));
}

#[test]
fn test_resolve_schema_paths_expands_globs() {
    let dir = TempDir::new().expect("temp dir");
    write_schema(&dir, "EQ.rdf", "");
    write_schema(&dir, "SSH.rdf", "");
    fs::write(dir.path().join("README.txt"), "not a schema").expect("write");

    let pattern = format!("{}/*.rdf", dir.path().display());
    let paths = resolve_schema_paths(&[pattern]).expect("matches");
    let names: Vec<_> = paths
        .iter()
        .filter_map(|p| p.file_name()?.to_str())
        .collect();
    assert_eq!(names, vec!["EQ.rdf", "SSH.rdf"]);
}

#[test]
fn test_invalid_glob_is_config_error() {
    let result = resolve_schema_paths(&["schemas/[.rdf"]);
    assert!(matches!(result, Err(CimgenError::ConfigError(_))));
}
