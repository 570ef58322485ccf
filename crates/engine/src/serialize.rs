//! Index serialization
//!
//! Emits sidebar index artifacts as pretty-printed JSON. Output is
//! deterministic: modules ordered by path, kind sections in
//! [`ItemKind::SECTION_ORDER`], entries in the order the collector fixed.
//! Re-serializing an unchanged index yields byte-identical output, which is
//! what keeps regenerated artifacts diffable in version control.
//!
//! The collector guarantees the no-duplicate invariant, but it is re-checked
//! here: a duplicate (kind, name) pair at this stage is an internal
//! consistency failure and aborts that module's artifact rather than
//! emitting ambiguous output.

use std::fmt;

use rustc_hash::FxHashSet;
use serde_json::{json, Map, Value};

use crate::model::{ItemKind, ModuleIndex, ModulePath, SidebarEntry, SidebarIndex};

/// Fatal serialization failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializeError {
    /// A module index contains a duplicate (kind, name) pair, which the
    /// collector should have made impossible.
    InvariantViolation {
        module: ModulePath,
        kind: ItemKind,
        name: String,
    },
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializeError::InvariantViolation { module, kind, name } => write!(
                f,
                "internal consistency failure: duplicate {kind} {name:?} in module {module}"
            ),
        }
    }
}

impl std::error::Error for SerializeError {}

/// Whole-batch serialization where one module's failure does not take the
/// others down.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// Artifact containing every module that serialized cleanly.
    pub json: String,
    /// Per-module invariant failures, in module path order.
    pub failures: Vec<SerializeError>,
}

/// Serialize a single module's index. Fails fatally on an invariant
/// violation instead of emitting ambiguous output.
pub fn module_to_json(index: &ModuleIndex) -> Result<Value, SerializeError> {
    check_invariant(index)?;
    let mut sections = Map::new();
    for section in index.sections() {
        let entries: Vec<Value> = section.entries.iter().map(entry_to_json).collect();
        sections.insert(section.kind.as_str().to_string(), Value::Array(entries));
    }
    Ok(Value::Object(sections))
}

/// Serialize a single module's index to its textual artifact.
pub fn module_to_json_string(index: &ModuleIndex) -> Result<String, SerializeError> {
    Ok(pretty(&module_to_json(index)?))
}

/// Serialize a whole index to one artifact keyed by module path. Fails on
/// the first invariant violation; use [`serialize_all`] for batch runs that
/// should keep going.
pub fn to_json_string(index: &SidebarIndex) -> Result<String, SerializeError> {
    let mut artifact = Map::new();
    for module in index.modules() {
        artifact.insert(module.path().to_string(), module_to_json(module)?);
    }
    Ok(pretty(&Value::Object(artifact)))
}

/// Serialize a whole index, skipping modules whose invariant check fails
/// and reporting them. Other modules are unaffected.
pub fn serialize_all(index: &SidebarIndex) -> BatchOutput {
    let mut artifact = Map::new();
    let mut failures = Vec::new();
    for module in index.modules() {
        match module_to_json(module) {
            Ok(value) => {
                artifact.insert(module.path().to_string(), value);
            }
            Err(err) => {
                tracing::error!("{err}");
                failures.push(err);
            }
        }
    }
    BatchOutput {
        json: pretty(&Value::Object(artifact)),
        failures,
    }
}

fn entry_to_json(entry: &SidebarEntry) -> Value {
    let mut map = Map::new();
    map.insert("name".to_string(), json!(entry.name));
    map.insert("summary".to_string(), json!(entry.summary));
    if let Some(link) = &entry.link {
        map.insert("link".to_string(), json!(link));
    }
    Value::Object(map)
}

fn check_invariant(index: &ModuleIndex) -> Result<(), SerializeError> {
    for section in index.sections() {
        let mut names = FxHashSet::default();
        for entry in &section.entries {
            if !names.insert(entry.name.as_str()) {
                return Err(SerializeError::InvariantViolation {
                    module: index.path().clone(),
                    kind: section.kind,
                    name: entry.name.clone(),
                });
            }
        }
    }
    Ok(())
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).expect("serde_json::Value keys are always strings")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::{Collector, RawDecl};
    use crate::model::Section;

    fn decl(module: &str, kind: &str, name: &str, summary: &str) -> RawDecl {
        RawDecl {
            module_path: Some(module.to_string()),
            kind: Some(kind.to_string()),
            name: Some(name.to_string()),
            summary: Some(summary.to_string()),
            link: None,
        }
    }

    #[test]
    fn serialization_is_idempotent() {
        let outcome = Collector::new().collect(vec![
            decl("lib", "struct", "CallBuilder", "Builds up a cross contract call."),
            decl("lib", "fn", "build_call", "Returns a new CallBuilder."),
            decl("lib::seal", "fn", "call", ""),
        ]);
        let first = to_json_string(&outcome.index).unwrap();
        let second = to_json_string(&outcome.index).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn kind_sections_follow_precedence_not_insertion() {
        // Declared trait first, struct second, fn last.
        let outcome = Collector::new().collect(vec![
            decl("lib", "trait", "IndicateReturnType", ""),
            decl("lib", "struct", "CallParams", ""),
            decl("lib", "fn", "build_call", ""),
        ]);
        let json = to_json_string(&outcome.index).unwrap();

        let pos = |needle: &str| json.find(needle).unwrap();
        assert!(pos("\"fn\"") < pos("\"struct\""));
        assert!(pos("\"struct\"") < pos("\"trait\""));
    }

    #[test]
    fn artifact_shape_is_stable() {
        let outcome = Collector::new().collect(vec![decl(
            "lib",
            "fn",
            "build_call",
            "Returns a new CallBuilder.",
        )]);
        let json = to_json_string(&outcome.index).unwrap();
        let expected = r#"{
  "lib": {
    "fn": [
      {
        "name": "build_call",
        "summary": "Returns a new CallBuilder."
      }
    ]
  }
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn link_is_omitted_when_absent() {
        let with_link = RawDecl {
            link: Some("lib/fn.build_call.html".to_string()),
            ..decl("lib", "fn", "build_call", "")
        };
        let outcome = Collector::new().collect(vec![with_link, decl("lib", "fn", "other", "")]);
        let json = to_json_string(&outcome.index).unwrap();
        assert_eq!(json.matches("\"link\"").count(), 1);
    }

    #[test]
    fn duplicate_in_module_index_is_fatal_for_that_module_only() {
        // Bypass the collector to forge an index that violates the
        // uniqueness invariant.
        let dup = |name: &str| SidebarEntry {
            name: name.to_string(),
            summary: String::new(),
            link: None,
        };
        let bad = ModuleIndex::new(
            ModulePath::parse("bad").unwrap(),
            vec![Section {
                kind: ItemKind::Function,
                entries: vec![dup("twice"), dup("twice")],
            }],
        );
        let good = ModuleIndex::new(
            ModulePath::parse("good").unwrap(),
            vec![Section {
                kind: ItemKind::Function,
                entries: vec![dup("once")],
            }],
        );

        assert!(matches!(
            module_to_json_string(&bad),
            Err(SerializeError::InvariantViolation { ref name, .. }) if name == "twice"
        ));

        let index = SidebarIndex::new(vec![bad, good]);
        assert!(to_json_string(&index).is_err());

        let batch = serialize_all(&index);
        assert_eq!(batch.failures.len(), 1);
        assert!(batch.json.contains("\"good\""));
        assert!(!batch.json.contains("\"bad\""));
    }

    #[test]
    fn empty_index_serializes_to_empty_object() {
        let outcome = Collector::new().collect(Vec::new());
        assert_eq!(to_json_string(&outcome.index).unwrap(), "{}");
    }
}
