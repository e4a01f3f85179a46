use std::path::PathBuf;

/// A deployment profile could not be turned into constructor arguments. Always
/// raised before anything is sent to the chain.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("{field} is not a valid address: {value:?}")]
    InvalidAddress { field: &'static str, value: String },
    #[error("fee of {fee} basis points exceeds the maximum of {max}")]
    FeeOutOfRange { fee: u64, max: u64 },
    #[error("network {0:?} has no deployment profile and fallback to the default is disabled")]
    UnknownNetwork(String),
    #[error("could not read profile file {path:?}")]
    ReadProfiles {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid profile file {path:?}")]
    ParseProfiles {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The deployer capability failed. The inner error is exactly what the
    /// deployer returned.
    #[error(transparent)]
    Dispatch(anyhow::Error),
}
