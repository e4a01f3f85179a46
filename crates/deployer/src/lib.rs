//! Deploys a single contract artifact with constructor arguments chosen by
//! the target network.
pub mod arguments;
pub mod artifact;
pub mod chain;
pub mod error;
pub mod profile;
pub mod resolver;
pub mod traits;

use {
    anyhow::Result,
    artifact::Artifact,
    chain::ChainDeployer,
    profile::{NetworkId, ProfileTable},
    resolver::Resolver,
    traits::DeploymentResult,
};

pub async fn run(args: arguments::Arguments) -> Result<DeploymentResult> {
    let artifact = Artifact::from_file(&args.artifact).await?;
    let table = match &args.profiles {
        Some(path) => ProfileTable::from_file(path).await?,
        None => ProfileTable::builtin(),
    };
    let deployer = ChainDeployer::new(
        args.node_url.clone(),
        args.private_key.clone(),
        args.confirmation_timeout,
    );
    tracing::debug!(
        sender = %deployer.sender(),
        contract = %artifact.name,
        "loaded deployment inputs"
    );

    let result = Resolver::new(&table, args.fallback_policy())
        .deploy(&NetworkId::from(args.network.as_str()), &deployer, &artifact)
        .await?;
    Ok(result)
}
