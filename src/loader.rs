//! This module provides the `MachineLoader` struct, responsible for reading machine documents
//! from files or strings and parsing them into a [`MachineDefinition`].

use crate::definition::MachineDefinition;
use crate::types::{MachineError, MAX_DOCUMENT_SIZE};
use std::fs;
use std::path::Path;

/// Serialization format of a machine document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

impl Format {
    /// Picks the format from a file extension. Anything other than `.json` is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Yaml,
        }
    }
}

pub struct MachineLoader;

impl MachineLoader {
    /// Loads a machine document from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(MachineDefinition)` if the file is read and parsed.
    /// * `Err(MachineError::FileError)` if the file cannot be read or is too large.
    /// * `Err(MachineError::ParseError)` if the content is not a valid document.
    pub fn load(path: &Path) -> Result<MachineDefinition, MachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "machine document read");

        Self::load_from_str(&content, Format::from_path(path))
    }

    /// Parses a machine document held in memory.
    pub fn load_from_str(content: &str, format: Format) -> Result<MachineDefinition, MachineError> {
        if content.len() > MAX_DOCUMENT_SIZE {
            return Err(MachineError::FileError(format!(
                "Document is {} bytes, larger than the {} byte limit",
                content.len(),
                MAX_DOCUMENT_SIZE
            )));
        }

        match format {
            Format::Yaml => {
                serde_yaml::from_str(content).map_err(|e| MachineError::ParseError(e.to_string()))
            }
            Format::Json => {
                let mut value: serde_json::Value = serde_json::from_str(content)
                    .map_err(|e| MachineError::ParseError(e.to_string()))?;
                stringify_scalars(&mut value);
                serde_json::from_value(value).map_err(|e| MachineError::ParseError(e.to_string()))
            }
        }
    }
}

/// JSON has no unquoted symbols, so numbers and booleans stand for their own text.
fn stringify_scalars(value: &mut serde_json::Value) {
    use serde_json::Value;

    match value {
        Value::Number(n) => *value = Value::String(n.to_string()),
        Value::Bool(b) => *value = Value::String(b.to_string()),
        Value::Array(items) => items.iter_mut().for_each(stringify_scalars),
        Value::Object(fields) => fields.values_mut().for_each(stringify_scalars),
        Value::Null | Value::String(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const DOCUMENT: &str = r#"
q_states:
  q_list: [q0, qf]
  initial: q0
  final: qf
alphabet: ["1"]
tape_alphabet: ["1"]
delta:
  - params: { initial_state: q0, mem_cache_value: "", tape_input: "1" }
    output: { final_state: q0, mem_cache_value: "", tape_output: "1", tape_displacement: R }
  - params: { initial_state: q0, mem_cache_value: "", tape_input: "" }
    output: { final_state: qf, mem_cache_value: "", tape_output: "", tape_displacement: S }
simulation_strings: ["111", ""]
"#;

    #[test]
    fn test_load_yaml_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("info.yaml");
        let mut file = File::create(&file_path).unwrap();
        file.write_all(DOCUMENT.as_bytes()).unwrap();

        let definition = MachineLoader::load(&file_path).unwrap();
        assert_eq!(definition.q_states.initial, "q0");
        assert_eq!(definition.delta.len(), 2);
        assert_eq!(definition.inputs, vec!["111", ""]);
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("machine.json");
        let json = r#"{
            "q_states": { "q_list": ["q0"], "initial": "q0", "final": "q0" },
            "alphabet": ["a"],
            "tape_alphabet": ["a"],
            "simulation_strings": ["a"]
        }"#;
        fs::write(&file_path, json).unwrap();

        let definition = MachineLoader::load(&file_path).unwrap();
        assert_eq!(definition.alphabet, vec!["a"]);
        assert!(definition.delta.is_empty());
    }

    #[test]
    fn test_json_numbers_become_symbols() {
        let json = r#"{
            "q_states": { "q_list": ["q0", "qf"], "initial": "q0", "final": "qf" },
            "alphabet": [0, 1],
            "tape_alphabet": [0, 1, 1.5],
            "delta": [
                { "params": { "initial_state": "q0", "mem_cache_value": null, "tape_input": 1 },
                  "output": { "final_state": "qf", "mem_cache_value": 0, "tape_output": 1.5 } }
            ],
            "simulation_strings": [10, "01"]
        }"#;

        let definition = MachineLoader::load_from_str(json, Format::Json).unwrap();
        assert_eq!(definition.alphabet, vec!["0", "1"]);
        assert_eq!(definition.tape_alphabet, vec!["0", "1", "1.5"]);
        assert_eq!(definition.inputs, vec!["10", "01"]);

        let record = &definition.delta[0];
        assert_eq!(record.params.cache, "");
        assert_eq!(record.params.read, "1");
        assert_eq!(record.output.cache, "0");
        assert_eq!(record.output.write, "1.5");
    }

    #[test]
    fn test_yaml_symbols_are_not_normalized() {
        let yaml = r#"
q_states: { q_list: [q0], initial: q0, final: q0 }
alphabet: ["1", 1.0]
tape_alphabet: ["1", 1.0]
"#;
        let definition = MachineLoader::load_from_str(yaml, Format::Yaml).unwrap();
        assert_eq!(definition.tape_alphabet, vec!["1", "1.0"]);
    }

    #[test]
    fn test_missing_file_is_a_file_error() {
        let dir = tempdir().unwrap();
        let result = MachineLoader::load(&dir.path().join("missing.yaml"));
        assert!(matches!(result, Err(MachineError::FileError(_))));
    }

    #[test]
    fn test_malformed_document_is_a_parse_error() {
        let result = MachineLoader::load_from_str("q_states: [not, a, map]", Format::Yaml);
        assert!(matches!(result, Err(MachineError::ParseError(_))));

        let result = MachineLoader::load_from_str("{ not json", Format::Json);
        assert!(matches!(result, Err(MachineError::ParseError(_))));
    }

    #[test]
    fn test_oversized_document() {
        let content = " ".repeat(MAX_DOCUMENT_SIZE + 1);
        let result = MachineLoader::load_from_str(&content, Format::Yaml);
        assert!(matches!(result, Err(MachineError::FileError(_))));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("m.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("info.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("machine")), Format::Yaml);
    }
}
