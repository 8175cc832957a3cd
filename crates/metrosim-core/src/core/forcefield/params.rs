use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Non-bonded parameters shared by every atom of one force-field type.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct AtomTypeParams {
    pub sigma: f64,
    pub epsilon: f64,
    pub charge: f64,
}

#[derive(Debug, Deserialize)]
struct AtomTypeRecord {
    #[serde(rename = "type")]
    atom_type: String,
    sigma: f64,
    epsilon: f64,
    charge: f64,
}

/// Table of atom-type parameters, keyed by type tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForcefieldParams {
    types: HashMap<String, AtomTypeParams>,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Atom type '{0}' has no force-field parameters")]
    UnknownAtomType(String),
}

impl ForcefieldParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a CSV table with the header `type,sigma,epsilon,charge`.
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let file = std::fs::File::open(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::read_from(file).map_err(|e| match e {
            ParamLoadError::Csv { source, .. } => ParamLoadError::Csv {
                path: path.to_string_lossy().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn read_from<R: std::io::Read>(reader: R) -> Result<Self, ParamLoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut types = HashMap::new();
        for result in reader.deserialize::<AtomTypeRecord>() {
            let record = result.map_err(|e| ParamLoadError::Csv {
                path: "<reader>".to_string(),
                source: e,
            })?;
            types.insert(
                record.atom_type,
                AtomTypeParams {
                    sigma: record.sigma,
                    epsilon: record.epsilon,
                    charge: record.charge,
                },
            );
        }
        Ok(Self { types })
    }

    pub fn insert(&mut self, atom_type: &str, params: AtomTypeParams) {
        self.types.insert(atom_type.to_string(), params);
    }

    pub fn get(&self, atom_type: &str) -> Option<&AtomTypeParams> {
        self.types.get(atom_type)
    }

    /// Like [`Self::get`], but a missing type is an error.
    pub fn require(&self, atom_type: &str) -> Result<&AtomTypeParams, ParamLoadError> {
        self.get(atom_type)
            .ok_or_else(|| ParamLoadError::UnknownAtomType(atom_type.to_string()))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
