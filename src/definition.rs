//! This module defines the in-memory machine description handed to the core by a loader.
//!
//! The field layout follows the machine document format:
//!
//! ```yaml
//! q_states:
//!   q_list: [q0, qf]
//!   initial: q0
//!   final: qf
//! alphabet: ["1"]
//! tape_alphabet: ["1"]
//! delta:
//!   - params: { initial_state: q0, mem_cache_value: "", tape_input: "1" }
//!     output: { final_state: q0, mem_cache_value: "", tape_output: "1", tape_displacement: R }
//! simulation_strings: ["111"]
//! ```
//!
//! Scalars are read as the text written in the document, so a bare `1.0` in YAML is the symbol
//! `"1.0"`, and a `null` or missing cache or symbol value is the blank symbol. JSON numbers and
//! booleans are turned into text by the [loader](crate::loader) before deserialization.

use serde::{Deserialize, Deserializer, Serialize};

/// A complete machine description plus the input strings to simulate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineDefinition {
    pub q_states: StateSet,
    #[serde(default, deserialize_with = "scalar_list")]
    pub alphabet: Vec<String>,
    #[serde(default, deserialize_with = "scalar_list")]
    pub tape_alphabet: Vec<String>,
    #[serde(default)]
    pub delta: Vec<DeltaRecord>,
    #[serde(
        rename = "simulation_strings",
        default,
        deserialize_with = "scalar_list"
    )]
    pub inputs: Vec<String>,
}

/// The declared states and the two distinguished ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSet {
    #[serde(rename = "q_list", default, deserialize_with = "scalar_list")]
    pub states: Vec<String>,
    #[serde(deserialize_with = "scalar")]
    pub initial: String,
    #[serde(rename = "final", deserialize_with = "scalar")]
    pub final_state: String,
}

/// One transition record as written in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeltaRecord {
    pub params: DeltaParams,
    pub output: DeltaOutput,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeltaParams {
    #[serde(rename = "initial_state", deserialize_with = "scalar")]
    pub state: String,
    #[serde(rename = "mem_cache_value", default, deserialize_with = "scalar")]
    pub cache: String,
    #[serde(rename = "tape_input", default, deserialize_with = "scalar")]
    pub read: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeltaOutput {
    #[serde(rename = "final_state", deserialize_with = "scalar")]
    pub state: String,
    #[serde(rename = "mem_cache_value", default, deserialize_with = "scalar")]
    pub cache: String,
    #[serde(rename = "tape_output", default, deserialize_with = "scalar")]
    pub write: String,
    #[serde(rename = "tape_displacement", default, deserialize_with = "scalar")]
    pub displacement: String,
}

impl MachineDefinition {
    /// Creates a definition with the given states and no alphabet, rules or inputs.
    pub fn new(states: &[&str], initial: &str, final_state: &str) -> Self {
        Self {
            q_states: StateSet {
                states: states.iter().map(|s| s.to_string()).collect(),
                initial: initial.to_string(),
                final_state: final_state.to_string(),
            },
            ..Self::default()
        }
    }

    /// Sets both the input alphabet and the tape alphabet.
    pub fn with_alphabet(mut self, alphabet: &[&str], tape_alphabet: &[&str]) -> Self {
        self.alphabet = alphabet.iter().map(|s| s.to_string()).collect();
        self.tape_alphabet = tape_alphabet.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Appends a rule. The empty string stands for blank.
    pub fn with_rule(
        mut self,
        (state, cache, read): (&str, &str, &str),
        (next, next_cache, write, displacement): (&str, &str, &str, &str),
    ) -> Self {
        self.delta.push(DeltaRecord {
            params: DeltaParams {
                state: state.to_string(),
                cache: cache.to_string(),
                read: read.to_string(),
            },
            output: DeltaOutput {
                state: next.to_string(),
                cache: next_cache.to_string(),
                write: write.to_string(),
                displacement: displacement.to_string(),
            },
        });
        self
    }

    pub fn with_inputs(mut self, inputs: &[&str]) -> Self {
        self.inputs = inputs.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// Reads a scalar as the text written in the document. YAML plain scalars such as `1.0` or
/// `007` keep their spelling; `null`, `~` and empty values are blank.
fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
struct Scalar(#[serde(deserialize_with = "scalar")] String);

fn scalar_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let items: Option<Vec<Scalar>> = Option::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(|Scalar(s)| s)
        .collect())
}
