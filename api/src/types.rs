pub use ethers::types::{Address, TxHash, U256};
use ethers::utils::to_checksum;

/// Checksummed form of `address`, e.g. `0x172A0f88...`.
pub fn checksummed(address: &Address) -> String {
    to_checksum(address, None)
}

/// Shortened checksummed form, e.g. `0x172A...58E6`.
pub fn short_address(address: &Address) -> String {
    let full = checksummed(address);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}
