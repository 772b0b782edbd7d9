use std::sync::Arc;

use async_trait::async_trait;
use cryptodevs_api::prelude::*;
use ethers::providers::{JsonRpcClient, Middleware, Provider};

use crate::{contract::to_u64, error::ClientError};

/// Source of the user's account and the network it is on.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Prompts for account access and returns the selected account.
    async fn connect(&self) -> Result<Address, ClientError>;

    async fn chain_id(&self) -> Result<u64, ClientError>;
}

/// Wallet backed by a node that manages the account itself, such as a local
/// dev node or a signer proxy.
pub struct NodeWallet<P: JsonRpcClient> {
    provider: Arc<Provider<P>>,
}

impl<P: JsonRpcClient> NodeWallet<P> {
    pub fn new(provider: Arc<Provider<P>>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: JsonRpcClient + 'static> Wallet for NodeWallet<P> {
    async fn connect(&self) -> Result<Address, ClientError> {
        let accounts: Vec<Address> = self.provider.request("eth_requestAccounts", ()).await?;
        accounts.into_iter().next().ok_or(ClientError::NoAccounts)
    }

    async fn chain_id(&self) -> Result<u64, ClientError> {
        to_u64(self.provider.get_chainid().await?, "chain id")
    }
}
