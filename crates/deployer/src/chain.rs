use {
    crate::{
        artifact::Artifact,
        profile::ConstructorArgs,
        traits::{Deployer, DeploymentResult},
    },
    alloy::{
        network::{EthereumWallet, ReceiptResponse, TransactionBuilder},
        primitives::{Address, Bytes},
        providers::{DynProvider, Provider, ProviderBuilder},
        rpc::{client::ClientBuilder, types::TransactionRequest},
        signers::local::PrivateKeySigner,
    },
    anyhow::{Context, Result, ensure},
    std::time::Duration,
    url::Url,
};

/// Deploys contracts through an HTTP node with a single local signer.
pub struct ChainDeployer {
    provider: DynProvider,
    sender: Address,
    confirmation_timeout: Duration,
}

impl ChainDeployer {
    pub fn new(node_url: Url, signer: PrivateKeySigner, confirmation_timeout: Duration) -> Self {
        let sender = signer.address();
        let rpc = ClientBuilder::default().http(node_url);
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::new(signer))
            .connect_client(rpc)
            .erased();
        Self {
            provider,
            sender,
            confirmation_timeout,
        }
    }

    pub fn sender(&self) -> Address {
        self.sender
    }
}

/// Contract creation input: the creation bytecode followed by the ABI encoded
/// constructor arguments.
pub fn creation_code(artifact: &Artifact, args: &ConstructorArgs) -> Bytes {
    [&artifact.bytecode[..], &args.abi_encode()[..]].concat().into()
}

#[async_trait::async_trait]
impl Deployer for ChainDeployer {
    async fn deploy(&self, artifact: &Artifact, args: ConstructorArgs) -> Result<DeploymentResult> {
        let tx = TransactionRequest::default()
            .from(self.sender)
            .with_deploy_code(creation_code(artifact, &args));

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .context("failed to submit deployment transaction")?;
        let transaction_hash = *pending.tx_hash();
        tracing::info!(
            contract = %artifact.name,
            tx = %transaction_hash,
            "deployment transaction submitted, waiting for receipt"
        );

        let receipt = pending
            .with_timeout(Some(self.confirmation_timeout))
            .get_receipt()
            .await
            .with_context(|| format!("failed to get receipt of deployment {transaction_hash}"))?;
        ensure!(
            receipt.status(),
            "deployment transaction {transaction_hash} reverted"
        );
        let address = receipt
            .contract_address
            .with_context(|| format!("receipt of {transaction_hash} has no contract address"))?;

        Ok(DeploymentResult {
            address,
            transaction_hash,
            block_number: receipt.block_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::{U256, address},
    };

    #[test]
    fn creation_code_appends_constructor_args() {
        let artifact = Artifact {
            name: "BitShopeePayTask".to_owned(),
            bytecode: vec![0x60, 0x80, 0x60, 0x40].into(),
        };
        let args = ConstructorArgs {
            admin: address!("0xDd5386F52884dF2cE858eeC8e434d9968E4d3B51"),
            fee_basis_points: U256::ZERO,
            fee_recipient: address!("0x93155cA0a0C17831A6809e278f1f90C2bf25CdF0"),
        };

        let code = creation_code(&artifact, &args);
        assert_eq!(code.len(), 4 + 3 * 32);
        assert_eq!(code[..4], artifact.bytecode[..]);
        assert_eq!(&code[4..], args.abi_encode().as_slice());
    }

    #[test]
    fn sender_is_signer_address() {
        // well known anvil development key
        let signer: PrivateKeySigner =
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
                .parse()
                .unwrap();
        let deployer = ChainDeployer::new(
            "http://localhost:8545".parse().unwrap(),
            signer,
            Duration::from_secs(60),
        );
        assert_eq!(
            deployer.sender(),
            address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }
}
