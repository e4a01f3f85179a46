//! Resolves the constructor arguments for a network and dispatches exactly one
//! deployment.
//!
//! A run goes from `Unresolved` to `Dispatched` in one step: [`Resolver::resolve`]
//! validates the selected profile and yields a [`Resolution`], and
//! [`Resolution::dispatch`] consumes it while calling the deployer once. Since
//! dispatching takes the resolution by value, a resolution can never be
//! deployed twice.

use crate::{
    artifact::Artifact,
    error::{ConfigurationError, Error},
    profile::{ConstructorArgs, NetworkId, ProfileTable, Selection},
    traits::{Deployer, DeploymentResult},
};

/// What to do for networks without an explicit profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Deploy with the default (production) profile.
    #[default]
    UseDefault,
    /// Fail with [`ConfigurationError::UnknownNetwork`].
    Reject,
}

pub struct Resolver<'a> {
    table: &'a ProfileTable,
    fallback: FallbackPolicy,
}

/// A validated profile selection that has not been dispatched yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub network: NetworkId,
    pub profile: String,
    pub is_default: bool,
    pub args: ConstructorArgs,
}

impl<'a> Resolver<'a> {
    pub fn new(table: &'a ProfileTable, fallback: FallbackPolicy) -> Self {
        Self { table, fallback }
    }

    pub fn resolve(&self, network: &NetworkId) -> Result<Resolution, ConfigurationError> {
        let selection = self.table.select(network);
        if let Selection::Default(profile) = selection {
            if self.fallback == FallbackPolicy::Reject {
                return Err(ConfigurationError::UnknownNetwork(network.to_string()));
            }
            tracing::warn!(
                %network,
                profile = %profile.name,
                "no profile configured for network, falling back to the default profile"
            );
        }

        let profile = selection.profile();
        let args = profile.constructor_args()?;
        tracing::info!(%network, profile = %profile.name, "resolved deployment profile");
        Ok(Resolution {
            network: network.clone(),
            profile: profile.name.clone(),
            is_default: selection.is_default(),
            args,
        })
    }

    /// Resolves the profile for `network` and deploys `artifact` with it.
    /// The deployer is only called if the profile is valid, and then exactly
    /// once.
    pub async fn deploy<D>(
        &self,
        network: &NetworkId,
        deployer: &D,
        artifact: &Artifact,
    ) -> Result<DeploymentResult, Error>
    where
        D: Deployer + ?Sized,
    {
        let resolution = self.resolve(network).inspect_err(|err| {
            tracing::error!(%network, ?err, "invalid deployment configuration");
        })?;
        resolution.dispatch(deployer, artifact).await
    }
}

impl Resolution {
    pub async fn dispatch<D>(
        self,
        deployer: &D,
        artifact: &Artifact,
    ) -> Result<DeploymentResult, Error>
    where
        D: Deployer + ?Sized,
    {
        tracing::debug!(
            contract = %artifact.name,
            admin = %self.args.admin,
            fee_basis_points = %self.args.fee_basis_points,
            fee_recipient = %self.args.fee_recipient,
            "dispatching deployment"
        );
        let result = deployer
            .deploy(artifact, self.args)
            .await
            .map_err(Error::Dispatch)?;
        tracing::info!(
            contract = %artifact.name,
            network = %self.network,
            address = %result.address,
            tx = %result.transaction_hash,
            "contract deployed"
        );
        Ok(result)
    }
}
