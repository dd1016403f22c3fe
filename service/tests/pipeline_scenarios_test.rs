//! End-to-end pipeline scenarios over small CGMES-style schemas

use cimgen_service::prelude::*;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:cims="http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#"
         xmlns:owl="http://www.w3.org/2002/07/owl#"
         xmlns:dcat="http://www.w3.org/ns/dcat#"
         xml:base="http://iec.ch/TC57/CIM100">"#;

const EQUIPMENT: &str = r##"
  <owl:Ontology rdf:about="http://iec.ch/TC57/ns/CIM/CoreEquipment-EU/3.0">
    <dcat:keyword>EQ</dcat:keyword>
  </owl:Ontology>
  <rdf:Description rdf:about="#ConductingEquipment">
    <rdfs:label>ConductingEquipment</rdfs:label>
    <rdfs:comment>The parts of the AC power system that carry current.</rdfs:comment>
    <rdf:type rdf:resource="http://www.w3.org/2000/01/rdf-schema#Class"/>
  </rdf:Description>
  <rdf:Description rdf:about="#ACLineSegment">
    <rdfs:label>ACLineSegment</rdfs:label>
    <rdfs:comment>A wire or combination of wires.</rdfs:comment>
    <rdfs:subClassOf rdf:resource="#ConductingEquipment"/>
    <rdf:type rdf:resource="http://www.w3.org/2000/01/rdf-schema#Class"/>
  </rdf:Description>
  <rdf:Description rdf:about="#Terminal">
    <rdfs:label>Terminal</rdfs:label>
    <rdf:type rdf:resource="http://www.w3.org/2000/01/rdf-schema#Class"/>
  </rdf:Description>
  <rdf:Description rdf:about="#Length">
    <rdfs:label>Length</rdfs:label>
    <cims:stereotype>CIMDatatype</cims:stereotype>
    <rdf:type rdf:resource="http://www.w3.org/2000/01/rdf-schema#Class"/>
  </rdf:Description>
  <rdf:Description rdf:about="#Length.value">
    <rdfs:label>value</rdfs:label>
    <rdfs:domain rdf:resource="#Length"/>
    <cims:dataType rdf:resource="#Float"/>
    <rdf:type rdf:resource="http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"/>
  </rdf:Description>
  <rdf:Description rdf:about="#Length.unit">
    <rdfs:label>unit</rdfs:label>
    <rdfs:domain rdf:resource="#Length"/>
    <cims:dataType rdf:resource="#UnitSymbol"/>
    <cims:isFixed rdfs:Literal="m"/>
    <rdf:type rdf:resource="http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"/>
  </rdf:Description>
  <rdf:Description rdf:about="#Length.multiplier">
    <rdfs:label>multiplier</rdfs:label>
    <rdfs:domain rdf:resource="#Length"/>
    <cims:dataType rdf:resource="#UnitMultiplier"/>
    <cims:isFixed rdfs:Literal="none"/>
    <rdf:type rdf:resource="http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"/>
  </rdf:Description>
  <rdfs:Class rdf:about="#UnitSymbol">
    <cims:stereotype rdf:resource="http://iec.ch/TC57/NonStandard/UML#enumeration"/>
  </rdfs:Class>
  <rdf:Description rdf:about="#UnitSymbol.m">
    <rdfs:label>m</rdfs:label>
    <rdf:type rdf:resource="#UnitSymbol"/>
  </rdf:Description>
  <rdf:Description rdf:about="#UnitSymbol.s">
    <rdfs:label>s</rdfs:label>
    <rdf:type rdf:resource="#UnitSymbol"/>
  </rdf:Description>
  <rdfs:Class rdf:about="#UnitMultiplier">
    <cims:stereotype rdf:resource="http://iec.ch/TC57/NonStandard/UML#enumeration"/>
  </rdfs:Class>
  <rdf:Description rdf:about="#UnitMultiplier.none">
    <rdfs:label>none</rdfs:label>
    <rdf:type rdf:resource="#UnitMultiplier"/>
  </rdf:Description>
  <rdf:Description rdf:about="#UnitMultiplier.k">
    <rdfs:label>k</rdfs:label>
    <rdf:type rdf:resource="#UnitMultiplier"/>
  </rdf:Description>
  <rdf:Description rdf:about="#ACLineSegment.length">
    <rdfs:label>length</rdfs:label>
    <rdfs:domain rdf:resource="#ACLineSegment"/>
    <cims:dataType rdf:resource="#Length"/>
    <cims:multiplicity rdf:resource="http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#M:0..1"/>
    <rdf:type rdf:resource="http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"/>
  </rdf:Description>
  <rdf:Description rdf:about="#Terminal.ConductingEquipment">
    <rdfs:label>ConductingEquipment</rdfs:label>
    <rdfs:domain rdf:resource="#Terminal"/>
    <rdfs:range rdf:resource="#ConductingEquipment"/>
    <cims:multiplicity rdf:resource="http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#M:1"/>
    <cims:inverseRoleName rdf:resource="#ConductingEquipment.Terminals"/>
    <cims:AssociationUsed>Yes</cims:AssociationUsed>
    <rdf:type rdf:resource="http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"/>
  </rdf:Description>
  <rdf:Description rdf:about="#ConductingEquipment.Terminals">
    <rdfs:label>Terminals</rdfs:label>
    <rdfs:domain rdf:resource="#ConductingEquipment"/>
    <rdfs:range rdf:resource="#Terminal"/>
    <cims:multiplicity rdf:resource="http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#M:0..n"/>
    <cims:inverseRoleName rdf:resource="#Terminal.ConductingEquipment"/>
    <cims:AssociationUsed>Yes</cims:AssociationUsed>
    <rdf:type rdf:resource="http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"/>
  </rdf:Description>"##;

const HYPOTHESIS: &str = r##"
  <owl:Ontology rdf:about="http://iec.ch/TC57/ns/CIM/SteadyStateHypothesis-EU/3.0">
    <dcat:keyword>SSH</dcat:keyword>
  </owl:Ontology>
  <rdf:Description rdf:about="#ConductingEquipment">
    <rdfs:label>ConductingEquipment</rdfs:label>
    <rdf:type rdf:resource="http://www.w3.org/2000/01/rdf-schema#Class"/>
  </rdf:Description>
  <rdf:Description rdf:about="#ConductingEquipment.inService">
    <rdfs:label>inService</rdfs:label>
    <rdfs:domain rdf:resource="#ConductingEquipment"/>
    <cims:dataType rdf:resource="#Boolean"/>
    <cims:multiplicity rdf:resource="http://iec.ch/TC57/1999/rdf-schema-extensions-19990926#M:0..1"/>
    <rdf:type rdf:resource="http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"/>
  </rdf:Description>"##;

struct Workspace {
    dir: TempDir,
    schemas: Vec<PathBuf>,
}

impl Workspace {
    fn new(bodies: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let schemas = bodies
            .iter()
            .map(|(name, body)| {
                let path = dir.path().join(name);
                fs::write(&path, format!("{HEADER}\n{body}\n</rdf:RDF>\n")).expect("write schema");
                path
            })
            .collect();
        Self { dir, schemas }
    }

    fn standard() -> Self {
        Self::new(&[("EQ.rdf", EQUIPMENT), ("SSH.rdf", HYPOTHESIS)])
    }

    fn output(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn request(&self, profile: Profile, language: TargetLanguage) -> GenerationRequest {
        GenerationRequest::new(self.schemas.clone(), profile, language, self.output())
    }

    fn model(&self) -> Result<SchemaModel> {
        GenerationDriver::new(CimgenConfig::default()).build_model(&self.schemas)
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

fn file_names(report: &GenerationReport) -> Vec<String> {
    report
        .files
        .iter()
        .filter_map(|p| p.file_name()?.to_str().map(String::from))
        .collect()
}

#[test]
fn test_line_segment_python() {
    let workspace = Workspace::standard();
    let report = GenerationDriver::new(CimgenConfig::default())
        .run(&workspace.request(Profile::all(), TargetLanguage::Python))
        .expect("generation succeeds");

    assert_eq!(report.class_count, 8);
    assert!(file_names(&report).contains(&"__init__.py".to_string()));

    let target = workspace.output().join("python");
    let segment = read(&target.join("ACLineSegment.py"));
    assert!(segment.contains("from .ConductingEquipment import ConductingEquipment"));
    assert!(segment.contains("class ACLineSegment(ConductingEquipment):"));
    assert!(segment.contains("length: Optional[float]"));
    assert!(segment.contains("\"unit\": \"m\""));

    let equipment = read(&target.join("ConductingEquipment.py"));
    assert!(equipment.contains("class ConductingEquipment:"));
    assert!(equipment.contains("\"inverse\": \"Terminal.ConductingEquipment\""));

    let index = read(&target.join("__init__.py"));
    assert!(index.contains("from .ACLineSegment import ACLineSegment\n"));
    assert!(index.contains("from .UnitSymbol import UnitSymbol\n"));
}

#[test]
fn test_line_segment_cpp() {
    let workspace = Workspace::standard();
    let report = GenerationDriver::new(CimgenConfig::default())
        .run(&workspace.request(Profile::all(), TargetLanguage::Cpp))
        .expect("generation succeeds");

    let names = file_names(&report);
    assert!(names.contains(&"ACLineSegment.hpp".to_string()));
    assert!(names.contains(&"ACLineSegment.cpp".to_string()));
    assert!(names.contains(&"Length.hpp".to_string()));
    assert!(!names.contains(&"Length.cpp".to_string()));
    assert!(names.contains(&"CIMClassList.hpp".to_string()));

    let header = read(&workspace.output().join("cpp").join("ACLineSegment.hpp"));
    assert!(header.contains("class ACLineSegment : public ConductingEquipment"));
    assert!(header.contains("CIMPP::Length length;"));
    assert!(header.contains("Unit: m, multiplier: none"));
}

#[test]
fn test_java_skips_value_types() {
    let workspace = Workspace::standard();
    let report = GenerationDriver::new(CimgenConfig::default())
        .run(&workspace.request(Profile::all(), TargetLanguage::Java))
        .expect("generation succeeds");

    let names = file_names(&report);
    assert!(names.contains(&"ACLineSegment.java".to_string()));
    assert!(names.contains(&"UnitSymbol.java".to_string()));
    assert!(!names.contains(&"Length.java".to_string()));
    assert!(!names.contains(&"Float.java".to_string()));

    let index = read(&workspace.output().join("java").join("CimClassMap.java"));
    assert!(index.contains("ACLineSegment"));
    assert!(!index.contains("UnitSymbol"));
}

#[test]
fn test_unresolved_type_names_referrer() {
    let body = format!(
        "{EQUIPMENT}{}",
        r##"
  <rdf:Description rdf:about="#ACLineSegment.foo">
    <rdfs:label>foo</rdfs:label>
    <rdfs:domain rdf:resource="#ACLineSegment"/>
    <cims:dataType rdf:resource="#Foo"/>
    <rdf:type rdf:resource="http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"/>
  </rdf:Description>"##
    );
    let workspace = Workspace::new(&[("EQ.rdf", &body)]);
    let err = GenerationDriver::new(CimgenConfig::default())
        .run(&workspace.request(Profile::all(), TargetLanguage::Python))
        .unwrap_err();

    match err {
        CimgenError::UnresolvedReference {
            identifier,
            referrer,
        } => {
            assert_eq!(identifier, "Foo");
            assert_eq!(referrer, "ACLineSegment.foo");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!workspace.output().exists());
}

#[test]
fn test_inheritance_cycle_is_reported() {
    let body = r##"
  <rdf:Description rdf:about="#A">
    <rdfs:subClassOf rdf:resource="#B"/>
    <rdf:type rdf:resource="http://www.w3.org/2000/01/rdf-schema#Class"/>
  </rdf:Description>
  <rdf:Description rdf:about="#B">
    <rdfs:subClassOf rdf:resource="#A"/>
    <rdf:type rdf:resource="http://www.w3.org/2000/01/rdf-schema#Class"/>
  </rdf:Description>"##;
    let workspace = Workspace::new(&[("cycle.rdf", body)]);
    let err = workspace.model().unwrap_err();

    assert_eq!(err.to_string(), "Cyclic inheritance: A → B → A");
}

#[test]
fn test_excluded_class_drops_associations() {
    let workspace = Workspace::standard();
    let profile = Profile::all().excluding("Terminal");

    let model = workspace.model().expect("model builds");
    let filtered = ProfileFilter::new(&profile).apply(&model);
    assert!(!filtered.contains("Terminal"));
    let equipment = filtered.get("ConductingEquipment").expect("kept");
    assert!(equipment.associations.is_empty());

    let report = GenerationDriver::new(CimgenConfig::default())
        .run(&workspace.request(profile, TargetLanguage::Python))
        .expect("generation succeeds");
    assert!(!file_names(&report).contains(&"Terminal.py".to_string()));
    let content = read(&workspace.output().join("python").join("ConductingEquipment.py"));
    assert!(!content.contains("Terminals"));
}

#[test]
fn test_origin_profile_keeps_own_members() {
    let workspace = Workspace::standard();
    let model = workspace.model().expect("model builds");

    let equipment = model.get("ConductingEquipment").expect("declared");
    assert_eq!(equipment.origins, vec!["EQ", "SSH"]);

    let filtered = ProfileFilter::new(&Profile::from_origins("EQ", ["EQ"])).apply(&model);
    let equipment = filtered.get("ConductingEquipment").expect("kept");
    assert!(equipment.attribute("inService").is_none());
    assert!(equipment.association("Terminals").is_some());
    assert!(!filtered.contains("Boolean"));

    let filtered = ProfileFilter::new(&Profile::from_origins("SSH", ["SSH"])).apply(&model);
    let names = filtered.names();
    assert_eq!(names, vec!["Boolean", "ConductingEquipment"]);
}

#[test]
fn test_one_record_per_class_in_a_forest() {
    let workspace = Workspace::standard();
    let model = workspace.model().expect("model builds");

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for class in model.iter() {
        *counts.entry(class.name.as_str()).or_default() += 1;
    }
    assert!(counts.values().all(|&n| n == 1));

    for class in model.iter() {
        let ancestors = model.ancestors(&class.name);
        assert!(!ancestors.contains(&class.name.as_str()));
    }
    assert_eq!(model.ancestors("ACLineSegment"), vec!["ConductingEquipment"]);
}

#[test]
fn test_generation_is_idempotent() {
    let workspace = Workspace::standard();
    let driver = GenerationDriver::new(CimgenConfig::default());
    let request = workspace.request(Profile::all(), TargetLanguage::Cpp);

    let first = driver.run(&request).expect("first run");
    let snapshot: Vec<String> = first.files.iter().map(|p| read(p)).collect();

    let second = driver.run(&request).expect("second run");
    assert_eq!(first.files, second.files);
    let again: Vec<String> = second.files.iter().map(|p| read(p)).collect();
    assert_eq!(snapshot, again);
}

#[test]
fn test_parallel_and_sequential_match() {
    let workspace = Workspace::standard();
    let mut config = CimgenConfig::default();
    config.output.per_language_dirs = false;

    let parallel_dir = workspace.dir.path().join("parallel");
    let request = GenerationRequest::new(
        workspace.schemas.clone(),
        Profile::all(),
        TargetLanguage::Python,
        &parallel_dir,
    );
    GenerationDriver::new(config.clone())
        .run(&request)
        .expect("parallel run");

    config.generator.parallel = false;
    let sequential_dir = workspace.dir.path().join("sequential");
    let request = GenerationRequest::new(
        workspace.schemas.clone(),
        Profile::all(),
        TargetLanguage::Python,
        &sequential_dir,
    );
    GenerationDriver::new(config)
        .run(&request)
        .expect("sequential run");

    for name in ["ACLineSegment.py", "ConductingEquipment.py", "__init__.py"] {
        assert_eq!(read(&parallel_dir.join(name)), read(&sequential_dir.join(name)));
    }
}

#[test]
fn test_unmapped_primitive_still_writes_other_classes() {
    let body = format!(
        "{EQUIPMENT}{}",
        r##"
  <rdf:Description rdf:about="#Currency">
    <cims:stereotype>Primitive</cims:stereotype>
    <rdf:type rdf:resource="http://www.w3.org/2000/01/rdf-schema#Class"/>
  </rdf:Description>
  <rdf:Description rdf:about="#ACLineSegment.cost">
    <rdfs:label>cost</rdfs:label>
    <rdfs:domain rdf:resource="#ACLineSegment"/>
    <cims:dataType rdf:resource="#Currency"/>
    <rdf:type rdf:resource="http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"/>
  </rdf:Description>"##
    );
    let workspace = Workspace::new(&[("EQ.rdf", &body)]);
    let err = GenerationDriver::new(CimgenConfig::default())
        .run(&workspace.request(Profile::all(), TargetLanguage::Python))
        .unwrap_err();

    let unmapped: Vec<&str> = err
        .errors()
        .into_iter()
        .filter_map(|e| match e {
            CimgenError::UnmappedType { type_name, .. } => Some(type_name.as_str()),
            _ => None,
        })
        .collect();
    assert!(!unmapped.is_empty());
    assert!(unmapped.iter().all(|name| *name == "Currency"));

    let target = workspace.output().join("python");
    assert!(target.join("Terminal.py").exists());
    assert!(!target.join("ACLineSegment.py").exists());
    let index = read(&target.join("__init__.py"));
    assert!(!index.contains("ACLineSegment"));
}

#[test]
fn test_every_unmapped_attribute_of_a_class_is_reported() {
    let body = format!(
        "{EQUIPMENT}{}",
        r##"
  <rdf:Description rdf:about="#Season">
    <rdf:type rdf:resource="http://www.w3.org/2000/01/rdf-schema#Class"/>
  </rdf:Description>
  <rdf:Description rdf:about="#Quaternion">
    <cims:stereotype>Primitive</cims:stereotype>
    <rdf:type rdf:resource="http://www.w3.org/2000/01/rdf-schema#Class"/>
  </rdf:Description>
  <rdf:Description rdf:about="#Octonion">
    <cims:stereotype>Primitive</cims:stereotype>
    <rdf:type rdf:resource="http://www.w3.org/2000/01/rdf-schema#Class"/>
  </rdf:Description>
  <rdf:Description rdf:about="#Season.flag">
    <rdfs:label>flag</rdfs:label>
    <rdfs:domain rdf:resource="#Season"/>
    <cims:dataType rdf:resource="#Quaternion"/>
    <rdf:type rdf:resource="http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"/>
  </rdf:Description>
  <rdf:Description rdf:about="#Season.phase">
    <rdfs:label>phase</rdfs:label>
    <rdfs:domain rdf:resource="#Season"/>
    <cims:dataType rdf:resource="#Octonion"/>
    <rdf:type rdf:resource="http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"/>
  </rdf:Description>"##
    );
    let workspace = Workspace::new(&[("EQ.rdf", &body)]);
    let err = GenerationDriver::new(CimgenConfig::default())
        .run(&workspace.request(Profile::new("seasons").with_class("Season"), TargetLanguage::Java))
        .unwrap_err();

    let mut referrers: Vec<&str> = err
        .errors()
        .into_iter()
        .filter_map(|e| match e {
            CimgenError::UnmappedType { referrer, .. } if referrer.starts_with("Season.") => {
                Some(referrer.as_str())
            }
            _ => None,
        })
        .collect();
    referrers.sort_unstable();
    assert_eq!(referrers, vec!["Season.flag", "Season.phase"]);
}

#[test]
fn test_empty_selection_is_profile_error() {
    let workspace = Workspace::standard();
    let err = GenerationDriver::new(CimgenConfig::default())
        .run(&workspace.request(Profile::from_origins("TP", ["TP"]), TargetLanguage::Python))
        .unwrap_err();
    assert!(matches!(err, CimgenError::Profile(_)));
}

#[test]
fn test_dump_model_writes_json() {
    let workspace = Workspace::standard();
    let dump = workspace.dir.path().join("model.json");
    let request = workspace
        .request(Profile::from_origins("EQ", ["EQ"]), TargetLanguage::Python)
        .with_dump_model(&dump);
    GenerationDriver::new(CimgenConfig::default())
        .run(&request)
        .expect("generation succeeds");

    let value: serde_json::Value = serde_json::from_str(&read(&dump)).expect("valid json");
    let text = value.to_string();
    assert!(text.contains("ACLineSegment"));
    assert!(!text.contains("inService"));
}
