use cryptodevs_api::prelude::*;
use ethers::{
    contract::ContractError,
    providers::{Middleware, ProviderError},
};
use thiserror::Error;

/// Failures talking to the node.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("contract call failed: {0}")]
    Contract(String),

    #[error("{0} does not fit in 64 bits")]
    Overflow(&'static str),

    #[error("no accounts available")]
    NoAccounts,

    #[error("transaction {0:?} was dropped")]
    Dropped(TxHash),

    #[error("transaction {0:?} reverted")]
    Reverted(TxHash),
}

impl<M: Middleware> From<ContractError<M>> for ClientError {
    fn from(e: ContractError<M>) -> Self {
        ClientError::Contract(e.to_string())
    }
}
