//! Compiled contract artifacts (Hardhat JSON output).

use alloy::primitives::Bytes;
use serde::Deserialize;
use std::path::Path;

use crate::deploy::DeployError;

/// The parts of a Hardhat artifact the runner needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractArtifact {
    #[serde(rename = "contractName", default)]
    pub contract_name: String,
    /// Creation code, hex encoded.
    pub bytecode: String,
}

impl ContractArtifact {
    pub fn parse(json: &str) -> Result<Self, DeployError> {
        serde_json::from_str(json).map_err(|e| DeployError::Artifact(format!("invalid JSON: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self, DeployError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DeployError::Artifact(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Decoded creation code. Interfaces and abstract contracts have none.
    pub fn creation_code(&self) -> Result<Bytes, DeployError> {
        let code = alloy::hex::decode(self.bytecode.trim())
            .map_err(|e| DeployError::Artifact(format!("invalid bytecode: {}", e)))?;
        if code.is_empty() {
            return Err(DeployError::Artifact(format!(
                "artifact '{}' has no creation code",
                self.contract_name
            )));
        }
        Ok(code.into())
    }
}
