//! Trait definitions for external system boundaries.
//!
//! The chain client is abstracted away so that the resolver can be tested
//! with mocks.

use {
    crate::{artifact::Artifact, profile::ConstructorArgs},
    alloy::primitives::{Address, B256},
    anyhow::Result,
};

/// Outcome of a successful contract creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentResult {
    pub address: Address,
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
}

/// Abstracts the submission of a contract creation transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Deployer: Send + Sync {
    /// Deploys `artifact` with the given constructor arguments and waits for
    /// the transaction to be mined.
    ///
    /// Implementations own retries, timeouts and cancellation. Errors are
    /// handed to the caller untouched.
    async fn deploy(&self, artifact: &Artifact, args: ConstructorArgs) -> Result<DeploymentResult>;
}
