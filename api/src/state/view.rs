use std::fmt;

use serde::{Deserialize, Serialize};

use super::{SaleAction, SalePhase};
use crate::{consts::MAX_TOKEN_IDS, types::Address};

/// The connected wallet and its derived permissions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub address: Address,
    pub is_contract_owner: bool,
}

impl Session {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            is_contract_owner: false,
        }
    }
}

/// Number of tokens minted so far, out of the fixed supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintCounter {
    pub minted: u64,
    pub cap: u64,
}

impl Default for MintCounter {
    fn default() -> Self {
        Self {
            minted: 0,
            cap: MAX_TOKEN_IDS,
        }
    }
}

impl MintCounter {
    pub fn sold_out(&self) -> bool {
        self.minted >= self.cap
    }
}

impl fmt::Display for MintCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} have been minted", self.minted, self.cap)
    }
}

/// Local view of the sale, as presented to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub wallet_connected: bool,
    pub phase: SalePhase,
    pub is_owner: bool,
    pub minted: MintCounter,
    pub loading: bool,
}

impl ViewState {
    pub fn presale_started(&self) -> bool {
        self.phase.presale_started()
    }

    pub fn presale_ended(&self) -> bool {
        self.phase.presale_ended()
    }

    pub fn offer(&self) -> Offer {
        if !self.wallet_connected {
            return Offer::Connect;
        }
        if self.loading {
            return Offer::Loading;
        }
        match SaleAction::for_phase(self.phase, self.is_owner) {
            Some(SaleAction::StartSale) => Offer::StartSale,
            Some(SaleAction::PresaleMint) => Offer::PresaleMint,
            Some(SaleAction::PublicMint) => Offer::PublicMint,
            None => Offer::AwaitPresale,
        }
    }
}

/// The single thing the user can do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Offer {
    Connect,
    Loading,
    StartSale,
    /// Presale has not started and the session cannot start it.
    AwaitPresale,
    PresaleMint,
    PublicMint,
}

impl Offer {
    pub fn action(&self) -> Option<SaleAction> {
        match self {
            Offer::StartSale => Some(SaleAction::StartSale),
            Offer::PresaleMint => Some(SaleAction::PresaleMint),
            Offer::PublicMint => Some(SaleAction::PublicMint),
            Offer::Connect | Offer::Loading | Offer::AwaitPresale => None,
        }
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Offer::Connect => "Connect your wallet",
            Offer::Loading => "Loading...",
            Offer::StartSale => "Start Presale!",
            Offer::AwaitPresale => "Presale hasn't started!",
            Offer::PresaleMint => {
                "Presale has started! If your address is whitelisted, mint a Crypto Dev"
            }
            Offer::PublicMint => "Public Mint",
        };
        f.write_str(s)
    }
}
