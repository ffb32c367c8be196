//! Workspace files - the operator run whose results are being explored
//!
//! ```json
//! {
//!   "operator": "Correlation",
//!   "inputs": {"ds": "Portfolio"},
//!   "parameters": [{"name": "period", "type": "number", "value": 3600}],
//!   "results": [{"name": "Matrix", "type": "table", "value": {...}}],
//!   "series": {"00A1": [[1500000000000, 1.5], [1500000060000, 1.7]]},
//!   "stored_results": {"B1": [{"tsuid": "00A1"}]}
//! }
//! ```
//!
//! `series` is optional; identifiers listed there are served verbatim by the
//! data source instead of being synthesized. `stored_results` holds the
//! content of other operator runs that table links point at by result id.

use crate::data::{DemoDataSource, Series};
use crate::viz::{HostContext, OperatorParameter};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("cannot read workspace {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid workspace {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("result {index} (\"{name}\") has no type")]
    UntypedResult { index: usize, name: String },
}

/// One output of the operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub result_type: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub inputs: Map<String, Value>,
    #[serde(default)]
    pub parameters: Vec<OperatorParameter>,
    #[serde(default)]
    pub results: Vec<ResultEntry>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub series: BTreeMap<String, Vec<(i64, f64)>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stored_results: BTreeMap<String, Value>,
}

impl Workspace {
    pub fn load(path: &Path) -> Result<Self, WorkspaceError> {
        let text = std::fs::read_to_string(path).map_err(|source| WorkspaceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Parse a workspace document; `origin` names it in errors
    pub fn parse(text: &str, origin: &str) -> Result<Self, WorkspaceError> {
        let workspace: Workspace =
            serde_json::from_str(text).map_err(|source| WorkspaceError::Parse {
                origin: origin.to_string(),
                source,
            })?;
        workspace.validate()?;
        Ok(workspace)
    }

    fn validate(&self) -> Result<(), WorkspaceError> {
        for (index, result) in self.results.iter().enumerate() {
            if result.result_type.trim().is_empty() {
                return Err(WorkspaceError::UntypedResult {
                    index,
                    name: result.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// The context renderers may snapshot
    pub fn host_context(&self) -> HostContext {
        HostContext {
            inputs: self.inputs.clone(),
            parameters: self.parameters.clone(),
        }
    }

    pub fn inline_series(&self) -> Vec<Series> {
        self.series
            .iter()
            .map(|(tsuid, points)| Series::new(tsuid.clone(), points.clone()))
            .collect()
    }

    /// Data source serving this workspace's inline series first
    pub fn data_source(&self, latency: Duration) -> DemoDataSource {
        DemoDataSource::new(latency)
            .with_inline(self.inline_series())
            .with_results(self.stored_results.clone())
    }

    pub fn title(&self) -> &str {
        if self.operator.is_empty() {
            "untitled"
        } else {
            &self.operator
        }
    }
}
