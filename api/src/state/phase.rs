use std::fmt;

use serde::{Deserialize, Serialize};

/// Stage of the sale lifecycle, as reported by the contract.
///
/// Phases only move forward: the contract never un-starts a presale and the
/// end time never moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SalePhase {
    #[default]
    NotStarted,
    PresaleActive,
    PresaleEnded,
}

impl SalePhase {
    /// Derives the phase from the contract's presale flag and end timestamp.
    ///
    /// A started presale with no recorded end time is still active; it only
    /// ends once `end_time <= now`.
    pub fn derive(presale_started: bool, presale_end_time: Option<u64>, now: u64) -> Self {
        if !presale_started {
            return SalePhase::NotStarted;
        }
        match presale_end_time {
            Some(end) if end <= now => SalePhase::PresaleEnded,
            _ => SalePhase::PresaleActive,
        }
    }

    pub fn presale_started(&self) -> bool {
        !matches!(self, SalePhase::NotStarted)
    }

    pub fn presale_ended(&self) -> bool {
        matches!(self, SalePhase::PresaleEnded)
    }

    /// No further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        self.presale_ended()
    }
}

impl fmt::Display for SalePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SalePhase::NotStarted => "not started",
            SalePhase::PresaleActive => "in presale",
            SalePhase::PresaleEnded => "open to the public",
        };
        f.write_str(s)
    }
}
