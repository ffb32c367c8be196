//! Externally contributed renderer definitions
//!
//! Extra renderers are declared in `viztool_def*.json` files dropped under a
//! contributions directory. Each file holds one definition object or an array
//! of them:
//!
//! ```json
//! {
//!   "name": "Matrix",
//!   "types": ["correlation_dataset"],
//!   "classRef": "Table",
//!   "context": ["parameters"],
//!   "debugModeOnly": false,
//!   "keyMap": {"Enter": "Open the selected cell"},
//!   "desc": "Correlation matrix rendered as a table"
//! }
//! ```
//!
//! `classRef` names an implementation compiled into the binary (see
//! [`ImplementationTable`]). Definitions are discovered and merged once,
//! before the registry is frozen.

use super::context::ContextKind;
use super::contract::RendererFactory;
use super::registry::{RegistryBuilder, RegistryError, RendererDescriptor};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// File name prefix of contributed definitions
const DEFINITION_PREFIX: &str = "viztool_def";

/// One contributed renderer definition, as written on disk
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ContributedRenderer {
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(rename = "classRef")]
    pub implementation: String,
    #[serde(default)]
    pub context: Vec<String>,
    #[serde(rename = "debugModeOnly", default)]
    pub debug_only: bool,
    #[serde(rename = "keyMap", default)]
    pub key_map: BTreeMap<String, String>,
    #[serde(default)]
    pub desc: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DefinitionFile {
    Many(Vec<ContributedRenderer>),
    One(ContributedRenderer),
}

/// Implementation name -> factory, for resolving `classRef`
#[derive(Default, Clone)]
pub struct ImplementationTable {
    factories: HashMap<String, RendererFactory>,
}

impl ImplementationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, implementation: impl Into<String>, factory: RendererFactory) {
        self.factories.insert(implementation.into(), factory);
    }

    pub fn get(&self, implementation: &str) -> Option<&RendererFactory> {
        self.factories.get(implementation)
    }

    /// Known implementation names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl ContributedRenderer {
    /// Resolve into a descriptor against the compiled-in implementations
    pub fn into_descriptor(
        self,
        implementations: &ImplementationTable,
    ) -> Result<RendererDescriptor, RegistryError> {
        let Some(factory) = implementations.get(&self.implementation) else {
            return Err(RegistryError::UnknownImplementation {
                renderer: self.name,
                implementation: self.implementation,
                known: implementations.names().join(", "),
            });
        };

        let mut descriptor = RendererDescriptor::new(self.name.clone(), factory.clone())
            .accepting(self.types)
            .debug_only(self.debug_only)
            .described(self.desc);

        for kind in &self.context {
            let kind: ContextKind = kind.parse().map_err(|kind| RegistryError::UnknownContext {
                renderer: self.name.clone(),
                kind,
            })?;
            descriptor = descriptor.requiring(kind);
        }

        descriptor.gesture_map = self.key_map;
        Ok(descriptor)
    }
}

impl RegistryBuilder {
    /// Append contributed definitions after whatever is already registered
    ///
    /// Returns the number of renderers added.
    pub fn merge_contributions(
        &mut self,
        contributions: Vec<ContributedRenderer>,
        implementations: &ImplementationTable,
    ) -> Result<usize, RegistryError> {
        let count = contributions.len();
        for contribution in contributions {
            let descriptor = contribution.into_descriptor(implementations)?;
            tracing::info!(renderer = %descriptor.name, "merged contributed renderer");
            self.register(descriptor)?;
        }
        Ok(count)
    }
}

/// Read every definition file under `dir`, recursively, in path order
///
/// A missing directory yields no contributions.
pub fn discover(dir: &Path) -> Result<Vec<ContributedRenderer>, RegistryError> {
    if !dir.exists() {
        tracing::debug!(dir = %dir.display(), "no contributions directory");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    collect_definition_files(dir, &mut files)?;
    files.sort();

    let mut contributions = Vec::new();
    for path in files {
        contributions.extend(read_definitions(&path)?);
    }
    Ok(contributions)
}

fn collect_definition_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RegistryError> {
    let read_err = |source| RegistryError::Read {
        path: dir.to_path_buf(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_dir() {
            collect_definition_files(&path, out)?;
        } else if is_definition_file(&path) {
            out.push(path);
        }
    }
    Ok(())
}

fn is_definition_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with(DEFINITION_PREFIX) && name.ends_with(".json")
}

/// Parse one definition file (single object or array)
pub fn read_definitions(path: &Path) -> Result<Vec<ContributedRenderer>, RegistryError> {
    let contents = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: DefinitionFile =
        serde_json::from_str(&contents).map_err(|source| RegistryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(match file {
        DefinitionFile::Many(defs) => defs,
        DefinitionFile::One(def) => vec![def],
    })
}
