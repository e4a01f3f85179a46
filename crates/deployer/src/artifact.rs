use {
    alloy::primitives::Bytes,
    anyhow::{Context, Result, ensure},
    serde::Deserialize,
    std::path::Path,
};

/// A compiled contract ready to be deployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    /// Creation bytecode without constructor arguments.
    pub bytecode: Bytes,
}

/// The subset of a truffle, hardhat or foundry build artifact that is needed
/// to deploy it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactFile {
    contract_name: Option<String>,
    bytecode: BytecodeField,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    /// truffle and hardhat
    Hex(String),
    /// foundry
    Object { object: String },
}

impl Artifact {
    pub async fn from_file(path: &Path) -> Result<Self> {
        let data = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("could not read artifact {path:?}"))?;
        let fallback_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_json(&data, &fallback_name).with_context(|| format!("invalid artifact {path:?}"))
    }

    /// Parses a JSON build artifact. `fallback_name` is used when the artifact
    /// does not carry a contract name.
    pub fn from_json(data: &str, fallback_name: &str) -> Result<Self> {
        let file: ArtifactFile = serde_json::from_str(data)?;
        let hex = match &file.bytecode {
            BytecodeField::Hex(hex) | BytecodeField::Object { object: hex } => hex,
        };
        let bytecode = const_hex::decode(hex)
            .context("bytecode is not valid hex, the artifact may contain unlinked libraries")?;
        ensure!(
            !bytecode.is_empty(),
            "artifact has no bytecode, it is probably an interface or abstract contract"
        );
        Ok(Self {
            name: file.contract_name.unwrap_or_else(|| fallback_name.to_owned()),
            bytecode: bytecode.into(),
        })
    }
}
