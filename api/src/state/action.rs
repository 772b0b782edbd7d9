use std::fmt;

use serde::{Deserialize, Serialize};

use super::SalePhase;
use crate::{consts::MINT_PRICE_WEI, types::U256};

/// A state-gated write against the sale contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaleAction {
    StartSale,
    PresaleMint,
    PublicMint,
}

impl SaleAction {
    pub const ALL: [SaleAction; 3] = [
        SaleAction::StartSale,
        SaleAction::PresaleMint,
        SaleAction::PublicMint,
    ];

    /// Value sent with the transaction, in wei.
    pub fn fee(&self) -> U256 {
        match self {
            SaleAction::StartSale => U256::zero(),
            SaleAction::PresaleMint | SaleAction::PublicMint => U256::from(MINT_PRICE_WEI),
        }
    }

    pub fn is_legal(&self, phase: SalePhase, is_owner: bool) -> bool {
        match self {
            SaleAction::StartSale => phase == SalePhase::NotStarted && is_owner,
            SaleAction::PresaleMint => phase == SalePhase::PresaleActive,
            SaleAction::PublicMint => phase == SalePhase::PresaleEnded,
        }
    }

    /// The action offered in `phase`, if any.
    pub fn for_phase(phase: SalePhase, is_owner: bool) -> Option<SaleAction> {
        Self::ALL.into_iter().find(|a| a.is_legal(phase, is_owner))
    }
}

impl fmt::Display for SaleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SaleAction::StartSale => "start presale",
            SaleAction::PresaleMint => "presale mint",
            SaleAction::PublicMint => "public mint",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHASES: [SalePhase; 3] = [
        SalePhase::NotStarted,
        SalePhase::PresaleActive,
        SalePhase::PresaleEnded,
    ];

    #[test]
    fn test_legal_table() {
        for phase in PHASES {
            for is_owner in [false, true] {
                for action in SaleAction::ALL {
                    let expected = matches!(
                        (action, phase, is_owner),
                        (SaleAction::StartSale, SalePhase::NotStarted, true)
                            | (SaleAction::PresaleMint, SalePhase::PresaleActive, _)
                            | (SaleAction::PublicMint, SalePhase::PresaleEnded, _)
                    );
                    assert_eq!(
                        action.is_legal(phase, is_owner),
                        expected,
                        "{:?} in {:?} (owner: {})",
                        action,
                        phase,
                        is_owner
                    );
                }
            }
        }
    }

    #[test]
    fn test_at_most_one_action_per_phase() {
        for phase in PHASES {
            for is_owner in [false, true] {
                let legal = SaleAction::ALL
                    .iter()
                    .filter(|a| a.is_legal(phase, is_owner))
                    .count();
                assert!(legal <= 1);
            }
        }
        assert_eq!(SaleAction::for_phase(SalePhase::NotStarted, false), None);
        assert_eq!(
            SaleAction::for_phase(SalePhase::NotStarted, true),
            Some(SaleAction::StartSale)
        );
    }

    #[test]
    fn test_fees() {
        let price = ethers::utils::parse_ether("0.01").unwrap();
        assert!(SaleAction::StartSale.fee().is_zero());
        assert_eq!(SaleAction::PresaleMint.fee(), price);
        assert_eq!(SaleAction::PublicMint.fee(), price);
    }
}
