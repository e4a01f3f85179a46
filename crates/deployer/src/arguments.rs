use {
    crate::resolver::FallbackPolicy,
    alloy::signers::local::PrivateKeySigner,
    std::{path::PathBuf, time::Duration},
    tracing::level_filters::LevelFilter,
    url::Url,
};

#[derive(clap::Parser)]
pub struct LoggingArguments {
    #[clap(long, env, default_value = "warn,deployer=debug,observe=info")]
    pub log_filter: String,

    /// Events at or above this level are written to stderr, everything else
    /// to stdout.
    #[clap(long, env, default_value = "error")]
    pub log_stderr_threshold: LevelFilter,

    /// Emit log events as JSON.
    #[clap(long, env)]
    pub use_json_logs: bool,
}

impl LoggingArguments {
    pub fn to_config(&self) -> observe::Config {
        let mut config = observe::Config::default().with_env_filter(&self.log_filter);
        if let Some(level) = self.log_stderr_threshold.into_level() {
            config = config.with_stderr_threshold(level);
        }
        if self.use_json_logs {
            config = config.with_json_format();
        }
        config
    }
}

#[derive(clap::Parser)]
pub struct Arguments {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    /// Label of the network to deploy to. Networks without a dedicated
    /// profile are deployed with the default (production) profile.
    #[clap(long, env)]
    pub network: String,

    /// Path to the compiled contract artifact (truffle, hardhat or foundry
    /// JSON).
    #[clap(long, env)]
    pub artifact: PathBuf,

    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Private key of the account sending the deployment transaction.
    #[clap(long, env, hide_env_values = true)]
    pub private_key: PrivateKeySigner,

    /// TOML file replacing the built-in deployment profiles.
    #[clap(long, env)]
    pub profiles: Option<PathBuf>,

    /// Fail instead of deploying with the default profile when the network
    /// has no dedicated profile.
    #[clap(long, env)]
    pub require_known_network: bool,

    /// How long to wait for the deployment transaction to be mined.
    #[clap(
        long,
        env,
        default_value = "5m",
        value_parser = humantime::parse_duration,
    )]
    pub confirmation_timeout: Duration,
}

impl Arguments {
    pub fn fallback_policy(&self) -> FallbackPolicy {
        if self.require_known_network {
            FallbackPolicy::Reject
        } else {
            FallbackPolicy::UseDefault
        }
    }
}

impl std::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            logging,
            network,
            artifact,
            node_url,
            private_key,
            profiles,
            require_known_network,
            confirmation_timeout,
        } = self;

        writeln!(f, "log_filter: {}", logging.log_filter)?;
        writeln!(f, "log_stderr_threshold: {}", logging.log_stderr_threshold)?;
        writeln!(f, "use_json_logs: {}", logging.use_json_logs)?;
        writeln!(f, "network: {network:?}")?;
        writeln!(f, "artifact: {}", artifact.display())?;
        writeln!(f, "node_url: {node_url}")?;
        writeln!(f, "private_key: SECRET ({})", private_key.address())?;
        writeln!(f, "profiles: {profiles:?}")?;
        writeln!(f, "require_known_network: {require_known_network}")?;
        writeln!(f, "confirmation_timeout: {confirmation_timeout:?}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, clap::Parser};

    const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn parses_minimal_arguments() {
        let args = Arguments::try_parse_from([
            "deployer",
            "--network",
            "bsctestnet",
            "--artifact",
            "build/contracts/BitShopeePayTask.json",
            "--private-key",
            ANVIL_KEY,
        ])
        .unwrap();

        assert_eq!(args.network, "bsctestnet");
        assert_eq!(args.node_url.as_str(), "http://localhost:8545/");
        assert_eq!(args.confirmation_timeout, Duration::from_secs(300));
        assert_eq!(args.fallback_policy(), FallbackPolicy::UseDefault);
        assert!(args.profiles.is_none());
    }

    #[test]
    fn strict_mode_and_overrides() {
        let args = Arguments::try_parse_from([
            "deployer",
            "--network",
            "mainnet",
            "--artifact",
            "Main.json",
            "--private-key",
            ANVIL_KEY,
            "--profiles",
            "profiles.toml",
            "--require-known-network",
            "--confirmation-timeout",
            "90s",
        ])
        .unwrap();

        assert_eq!(args.fallback_policy(), FallbackPolicy::Reject);
        assert_eq!(args.profiles, Some(PathBuf::from("profiles.toml")));
        assert_eq!(args.confirmation_timeout, Duration::from_secs(90));
    }

    #[test]
    fn display_hides_private_key() {
        let args = Arguments::try_parse_from([
            "deployer",
            "--network",
            "bsctestnet",
            "--artifact",
            "Main.json",
            "--private-key",
            ANVIL_KEY,
        ])
        .unwrap();

        let printed = args.to_string();
        assert!(!printed.contains(&ANVIL_KEY[2..]));
        assert!(printed.contains("private_key: SECRET"));
    }
}
