use std::{sync::Weak, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};

use crate::{contract::SaleContract, controller::SaleController, wallet::Wallet};

/// A running poll timer. Dropping the handle cancels the timer.
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub(crate) struct Pollers {
    pub phase: PollHandle,
    pub mint_count: PollHandle,
}

/// Refreshes the sale phase every `period` until the presale has ended.
pub(crate) fn spawn_phase_poll<W, C>(
    controller: Weak<SaleController<W, C>>,
    period: Duration,
) -> PollHandle
where
    W: Wallet + 'static,
    C: SaleContract + 'static,
{
    let task = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let Some(controller) = controller.upgrade() else {
                break;
            };
            let phase = controller.refresh_phase().await;
            tracing::debug!("Phase poll: sale is {}", phase);
            if phase.is_terminal() {
                tracing::info!("Presale has ended, phase polling stopped");
                break;
            }
        }
    });
    PollHandle { task }
}

/// Refreshes the minted count every `period` until cancelled.
pub(crate) fn spawn_mint_count_poll<W, C>(
    controller: Weak<SaleController<W, C>>,
    period: Duration,
) -> PollHandle
where
    W: Wallet + 'static,
    C: SaleContract + 'static,
{
    let task = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let Some(controller) = controller.upgrade() else {
                break;
            };
            let minted = controller.refresh_mint_count().await;
            tracing::debug!("Mint poll: {} minted", minted);
        }
    });
    PollHandle { task }
}
