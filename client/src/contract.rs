use std::sync::Arc;

use async_trait::async_trait;
use cryptodevs_api::prelude::*;
use ethers::{
    contract::{abigen, ContractCall},
    providers::{JsonRpcClient, PendingTransaction, Provider},
    types::{TransactionReceipt, U64},
};

use crate::error::ClientError;

abigen!(
    CryptoDevs,
    r#"[
        function owner() external view returns (address)
        function presaleStarted() external view returns (bool)
        function presaleEnded() external view returns (uint256)
        function tokenIds() external view returns (uint256)
        function startPresale() external
        function presaleMint() external payable
        function mint() external payable
    ]"#
);

/// A submitted transaction that has not been confirmed yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingTx {
    pub hash: TxHash,
}

/// Reads and writes against the Crypto Devs contract.
#[async_trait]
pub trait SaleContract: Send + Sync {
    async fn owner(&self) -> Result<Address, ClientError>;

    async fn presale_started(&self) -> Result<bool, ClientError>;

    /// Timestamp at which the presale ends, if one has been set.
    async fn presale_end_time(&self) -> Result<Option<u64>, ClientError>;

    async fn minted_count(&self) -> Result<u64, ClientError>;

    async fn start_presale(&self, from: Address) -> Result<PendingTx, ClientError>;

    async fn presale_mint(&self, from: Address, fee: U256) -> Result<PendingTx, ClientError>;

    async fn public_mint(&self, from: Address, fee: U256) -> Result<PendingTx, ClientError>;

    /// Waits until `tx` is mined. Fails if it reverted.
    async fn confirm(&self, tx: PendingTx) -> Result<(), ClientError>;
}

pub(crate) fn to_u64(value: U256, what: &'static str) -> Result<u64, ClientError> {
    if value > U256::from(u64::MAX) {
        return Err(ClientError::Overflow(what));
    }
    Ok(value.as_u64())
}

/// Maps the receipt of a mined transaction to its outcome.
fn check_receipt(hash: TxHash, receipt: Option<TransactionReceipt>) -> Result<(), ClientError> {
    match receipt {
        None => Err(ClientError::Dropped(hash)),
        Some(receipt) if receipt.status == Some(U64::from(1)) => Ok(()),
        Some(_) => Err(ClientError::Reverted(hash)),
    }
}

/// [`SaleContract`] bound to a deployment through an ethers provider.
pub struct EthSaleContract<P: JsonRpcClient> {
    provider: Arc<Provider<P>>,
    contract: CryptoDevs<Provider<P>>,
}

impl<P: JsonRpcClient + 'static> EthSaleContract<P> {
    pub fn new(provider: Arc<Provider<P>>, address: Address) -> Self {
        let contract = CryptoDevs::new(address, provider.clone());
        Self { provider, contract }
    }

    async fn send(
        &self,
        call: ContractCall<Provider<P>, ()>,
        from: Address,
        value: U256,
    ) -> Result<PendingTx, ClientError> {
        let call = call.from(from).value(value);
        let pending = call.send().await?;
        let hash = pending.tx_hash();
        tracing::debug!("Submitted {:?}", hash);
        Ok(PendingTx { hash })
    }
}

#[async_trait]
impl<P: JsonRpcClient + 'static> SaleContract for EthSaleContract<P> {
    async fn owner(&self) -> Result<Address, ClientError> {
        Ok(self.contract.owner().call().await?)
    }

    async fn presale_started(&self) -> Result<bool, ClientError> {
        Ok(self.contract.presale_started().call().await?)
    }

    async fn presale_end_time(&self) -> Result<Option<u64>, ClientError> {
        // The contract leaves the end time at zero until the presale starts.
        let end = self.contract.presale_ended().call().await?;
        if end.is_zero() {
            return Ok(None);
        }
        to_u64(end, "presale end time").map(Some)
    }

    async fn minted_count(&self) -> Result<u64, ClientError> {
        to_u64(self.contract.token_ids().call().await?, "token count")
    }

    async fn start_presale(&self, from: Address) -> Result<PendingTx, ClientError> {
        self.send(self.contract.start_presale(), from, U256::zero())
            .await
    }

    async fn presale_mint(&self, from: Address, fee: U256) -> Result<PendingTx, ClientError> {
        self.send(self.contract.presale_mint(), from, fee).await
    }

    async fn public_mint(&self, from: Address, fee: U256) -> Result<PendingTx, ClientError> {
        self.send(self.contract.mint(), from, fee).await
    }

    async fn confirm(&self, tx: PendingTx) -> Result<(), ClientError> {
        let receipt = PendingTransaction::new(tx.hash, &self.provider)
            .interval(RECEIPT_POLL_INTERVAL)
            .await?;
        check_receipt(tx.hash, receipt)
    }
}
