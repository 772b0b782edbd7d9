use std::time::Duration;

/// Default contract address: the whitelist deployment recorded with the
/// collection. The CLI reads the Crypto Devs deployment from `CONTRACT`.
pub const CONTRACT_ADDRESS: &str = "0x172A0f8808DA405829BE097aa2295180Ece558E6";

/// Base URL of the token metadata service. Token metadata lives at `{METADATA_URL}{token_id}`.
pub const METADATA_URL: &str = "https://nft-collection-sneh1999.vercel.app/api/";

/// Chain the contract is deployed on.
pub const REQUIRED_CHAIN_ID: u64 = 4;

/// Display name of [`REQUIRED_CHAIN_ID`].
pub const REQUIRED_NETWORK: &str = "Rinkeby";

/// Price of one Crypto Dev, in wei (0.01 ether).
pub const MINT_PRICE_WEI: u64 = 10_000_000_000_000_000;

/// Total supply of the collection.
pub const MAX_TOKEN_IDS: u64 = 20;

/// Period of both sale poll timers.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Delay between receipt lookups while a transaction is pending.
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);
