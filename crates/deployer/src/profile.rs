//! Named constructor argument profiles and the table mapping network
//! identifiers onto them.
//!
//! The table is total: every network identifier resolves to some profile,
//! either an explicit entry or the designated default.

use {
    crate::error::ConfigurationError,
    alloy::{
        primitives::{Address, U256},
        sol_types::SolValue,
    },
    serde::Deserialize,
    std::{collections::HashMap, fmt, path::Path, str::FromStr},
};

/// Label of the network the test profile is deployed to.
pub const TEST_NETWORK: &str = "bsctestnet";
/// Name of the profile selected for every network without an explicit entry.
pub const DEFAULT_PROFILE_NAME: &str = "production";
/// Fees are expressed in basis points, so anything above 100% is rejected.
pub const MAX_FEE_BASIS_POINTS: u64 = 10_000;

/// Opaque label of the network a deployment targets (e.g. `bsctestnet`).
/// Matching is exact and case sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetworkId(String);

impl NetworkId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NetworkId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for NetworkId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named set of constructor arguments as it is configured, i.e. before
/// validation. Addresses are kept as strings so that a malformed entry is
/// only reported when its profile is actually selected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DeploymentProfile {
    #[serde(default)]
    pub name: String,
    pub admin: String,
    pub fee_basis_points: u64,
    pub fee_recipient: String,
}

impl DeploymentProfile {
    pub fn new(name: &str, admin: &str, fee_basis_points: u64, fee_recipient: &str) -> Self {
        Self {
            name: name.to_owned(),
            admin: admin.to_owned(),
            fee_basis_points,
            fee_recipient: fee_recipient.to_owned(),
        }
    }

    /// Validates the profile and converts it into the positional constructor
    /// arguments of the contract.
    pub fn constructor_args(&self) -> Result<ConstructorArgs, ConfigurationError> {
        let admin = parse_address("admin", &self.admin)?;
        if self.fee_basis_points > MAX_FEE_BASIS_POINTS {
            return Err(ConfigurationError::FeeOutOfRange {
                fee: self.fee_basis_points,
                max: MAX_FEE_BASIS_POINTS,
            });
        }
        let fee_recipient = parse_address("fee recipient", &self.fee_recipient)?;
        Ok(ConstructorArgs {
            admin,
            fee_basis_points: U256::from(self.fee_basis_points),
            fee_recipient,
        })
    }
}

/// Validated constructor arguments in the order of the contract's
/// constructor: `(admin, feeBasisPoints, feeRecipient)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstructorArgs {
    pub admin: Address,
    pub fee_basis_points: U256,
    pub fee_recipient: Address,
}

impl ConstructorArgs {
    /// ABI encoding of the arguments as they are appended to the creation
    /// bytecode.
    pub fn abi_encode(&self) -> Vec<u8> {
        (self.admin, self.fee_basis_points, self.fee_recipient).abi_encode_params()
    }
}

/// Parses a `0x` prefixed, 40 hex digit address. The checksum casing is not
/// checked.
pub fn parse_address(field: &'static str, value: &str) -> Result<Address, ConfigurationError> {
    let invalid = || ConfigurationError::InvalidAddress {
        field,
        value: value.to_owned(),
    };
    let digits = value.strip_prefix("0x").ok_or_else(invalid)?;
    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    Address::from_str(digits).map_err(|_| invalid())
}

/// Outcome of looking a network up in the [`ProfileTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    /// The network has its own entry.
    Matched(&'a DeploymentProfile),
    /// The network is unknown and the default profile applies.
    Default(&'a DeploymentProfile),
}

impl<'a> Selection<'a> {
    pub fn profile(&self) -> &'a DeploymentProfile {
        match self {
            Self::Matched(profile) | Self::Default(profile) => profile,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileTable {
    networks: HashMap<NetworkId, DeploymentProfile>,
    default: DeploymentProfile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ProfileFile {
    default: DeploymentProfile,
    #[serde(default)]
    networks: HashMap<String, DeploymentProfile>,
}

impl ProfileTable {
    pub fn new(default: DeploymentProfile) -> Self {
        Self {
            networks: HashMap::new(),
            default,
        }
    }

    pub fn with_network(
        mut self,
        network: impl Into<NetworkId>,
        profile: DeploymentProfile,
    ) -> Self {
        self.networks.insert(network.into(), profile);
        self
    }

    /// The profiles compiled into the binary: the test network deploys with a
    /// single test account as admin and fee recipient, everything else is
    /// treated as production.
    pub fn builtin() -> Self {
        Self::new(DeploymentProfile::new(
            DEFAULT_PROFILE_NAME,
            "0xDd5386F52884dF2cE858eeC8e434d9968E4d3B51",
            0,
            "0x93155cA0a0C17831A6809e278f1f90C2bf25CdF0",
        ))
        .with_network(
            TEST_NETWORK,
            DeploymentProfile::new(
                TEST_NETWORK,
                "0x0A8548Bf245c01eCDD95a2052B5f176888f14FaA",
                0,
                "0x0A8548Bf245c01eCDD95a2052B5f176888f14FaA",
            ),
        )
    }

    /// Parses a TOML profile table: a mandatory `[default]` profile and any
    /// number of `[networks.<label>]` entries. `path` is only used for error
    /// messages.
    pub fn from_toml(path: &Path, data: &str) -> Result<Self, ConfigurationError> {
        let file: ProfileFile =
            toml::de::from_str(data).map_err(|source| ConfigurationError::ParseProfiles {
                path: path.to_owned(),
                source,
            })?;

        let mut default = file.default;
        if default.name.is_empty() {
            default.name = DEFAULT_PROFILE_NAME.to_owned();
        }
        let networks = file
            .networks
            .into_iter()
            .map(|(network, mut profile)| {
                if profile.name.is_empty() {
                    profile.name = network.clone();
                }
                (NetworkId::from(network), profile)
            })
            .collect();
        Ok(Self { networks, default })
    }

    pub async fn from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let data = tokio::fs::read_to_string(path).await.map_err(|source| {
            ConfigurationError::ReadProfiles {
                path: path.to_owned(),
                source,
            }
        })?;
        Self::from_toml(path, &data)
    }

    /// Looks up the profile for `network`, falling back to the default.
    pub fn select(&self, network: &NetworkId) -> Selection<'_> {
        match self.networks.get(network) {
            Some(profile) => Selection::Matched(profile),
            None => Selection::Default(&self.default),
        }
    }

    pub fn default_profile(&self) -> &DeploymentProfile {
        &self.default
    }

    pub fn networks(&self) -> impl Iterator<Item = &NetworkId> {
        self.networks.keys()
    }
}
