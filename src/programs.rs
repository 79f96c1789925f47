use crate::definition::MachineDefinition;
use crate::loader::{Format, MachineLoader};
use crate::types::MachineError;

// Embedded machine documents
const PROGRAM_TEXTS: [(&str, &str); 3] = [
    ("unary-scan", include_str!("../machines/unary-scan.yaml")),
    (
        "first-equals-last",
        include_str!("../machines/first-equals-last.yaml"),
    ),
    ("bit-flip", include_str!("../machines/bit-flip.yaml")),
];

lazy_static::lazy_static! {
    static ref PROGRAMS: Vec<(&'static str, Result<MachineDefinition, String>)> = PROGRAM_TEXTS
        .iter()
        .map(|(name, text)| {
            let definition = MachineLoader::load_from_str(text, Format::Yaml)
                .map_err(|e| e.to_string());
            (*name, definition)
        })
        .collect();
}

/// Built-in machines shipped with the crate.
pub struct ProgramCatalog;

impl ProgramCatalog {
    /// List all program names
    pub fn names() -> Vec<&'static str> {
        PROGRAM_TEXTS.iter().map(|(name, _)| *name).collect()
    }

    /// Get a program by its name
    pub fn get(name: &str) -> Result<MachineDefinition, MachineError> {
        let (_, definition) = PROGRAMS
            .iter()
            .find(|(program, _)| *program == name)
            .ok_or_else(|| MachineError::FileError(format!("Program '{}' not found", name)))?;

        definition.clone().map_err(MachineError::ParseError)
    }

    /// Get the document text of a program by its name
    pub fn text(name: &str) -> Option<&'static str> {
        PROGRAM_TEXTS
            .iter()
            .find(|(program, _)| *program == name)
            .map(|(_, text)| *text)
    }
}
