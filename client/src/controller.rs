use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use cryptodevs_api::prelude::*;
use parking_lot::Mutex;

use crate::{
    contract::SaleContract,
    poller::{self, Pollers},
    wallet::Wallet,
};

/// Wall-clock source, in unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

/// Result of an owner lookup for the session at `address`.
#[derive(Clone, Copy, Debug)]
struct OwnerCheck {
    address: Address,
    is_owner: bool,
}

#[derive(Default)]
struct Inner {
    session: Option<Session>,
    phase: SalePhase,
    minted: MintCounter,
    loading: bool,
    // Issue sequence of the last applied phase and count responses.
    phase_seq: u64,
    count_seq: u64,
}

/// Tracks the sale phase of the contract and gates which write the user may
/// submit.
///
/// Remote reads never fail from the caller's point of view: on error the last
/// known value is kept and the failure is logged. Writes are gated by the
/// current phase and by the `loading` flag, so at most one is in flight.
pub struct SaleController<W, C> {
    wallet: W,
    contract: C,
    clock: Box<dyn Clock>,
    poll_interval: Duration,
    inner: Mutex<Inner>,
    seq: AtomicU64,
    pollers: Mutex<Option<Pollers>>,
}

/// Clears `loading` when the write completes or is abandoned.
struct LoadingGuard<'a>(&'a Mutex<Inner>);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.lock().loading = false;
    }
}

impl<W: Wallet, C: SaleContract> SaleController<W, C> {
    pub fn new(wallet: W, contract: C) -> Self {
        Self {
            wallet,
            contract,
            clock: Box::new(SystemClock),
            poll_interval: POLL_INTERVAL,
            inner: Mutex::new(Inner::default()),
            seq: AtomicU64::new(0),
            pollers: Mutex::new(None),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn view(&self) -> ViewState {
        let inner = self.inner.lock();
        ViewState {
            wallet_connected: inner.session.is_some(),
            phase: inner.phase,
            is_owner: inner.session.is_some_and(|s| s.is_contract_owner),
            minted: inner.minted,
            loading: inner.loading,
        }
    }

    pub fn offer(&self) -> Offer {
        self.view().offer()
    }

    pub fn session(&self) -> Option<Session> {
        self.inner.lock().session
    }

    /// Connects the wallet and opens a session.
    ///
    /// The wallet must be on [`REQUIRED_CHAIN_ID`]; otherwise any existing
    /// session is torn down and [`SaleError::WrongNetwork`] is returned.
    ///
    /// This does not start the poll timers; use
    /// [`SaleController::connect_and_poll`] for a polling session.
    pub async fn connect(&self) -> Result<Session, SaleError> {
        let address = self.wallet.connect().await.map_err(|e| {
            tracing::error!("Wallet connection failed: {}", e);
            SaleError::ConnectFailed(e.to_string())
        })?;
        let chain_id = self.wallet.chain_id().await.map_err(|e| {
            tracing::error!("Failed to fetch network: {}", e);
            SaleError::ConnectFailed(e.to_string())
        })?;

        if chain_id != REQUIRED_CHAIN_ID {
            self.disconnect();
            let err = SaleError::WrongNetwork {
                expected: REQUIRED_CHAIN_ID,
                actual: chain_id,
            };
            tracing::warn!("{}", err);
            return Err(err);
        }

        let session = Session::new(address);
        self.inner.lock().session = Some(session);
        tracing::info!("Connected {} on {}", checksummed(&address), REQUIRED_NETWORK);
        Ok(session)
    }

    /// Ends the session, stops polling and resets the view.
    pub fn disconnect(&self) {
        // Dropping the handles aborts both poll tasks.
        drop(self.pollers.lock().take());

        let seq = self.seq.load(Ordering::SeqCst);
        let mut inner = self.inner.lock();
        *inner = Inner {
            phase_seq: seq,
            count_seq: seq,
            ..Inner::default()
        };
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Reads the sale flags, derives the phase and records it.
    ///
    /// On read failure the previously known phase is returned unchanged.
    pub async fn refresh_phase(&self) -> SalePhase {
        let seq = self.next_seq();
        let reads = futures::try_join!(
            self.contract.presale_started(),
            self.contract.presale_end_time()
        );
        let (started, end_time) = match reads {
            Ok(reads) => reads,
            Err(e) => {
                tracing::error!("Failed to refresh sale phase: {}", SaleError::ReadFailure(e.to_string()));
                return self.inner.lock().phase;
            }
        };

        let phase = SalePhase::derive(started, end_time, self.clock.now());
        let owner = match phase {
            SalePhase::NotStarted => self.check_owner().await,
            _ => None,
        };
        self.apply_phase(seq, phase, owner)
    }

    /// Records `phase`, and the owner check made alongside it, unless a newer
    /// response has already been applied.
    fn apply_phase(&self, seq: u64, phase: SalePhase, owner: Option<OwnerCheck>) -> SalePhase {
        let mut inner = self.inner.lock();
        if seq <= inner.phase_seq {
            tracing::debug!("Discarding stale phase response #{}", seq);
            return inner.phase;
        }
        inner.phase_seq = seq;
        if inner.phase != phase {
            tracing::info!("Sale is now {}", phase);
        }
        inner.phase = phase;

        if let (Some(check), Some(session)) = (owner, inner.session.as_mut()) {
            if session.address == check.address {
                session.is_contract_owner = check.is_owner;
            }
        }
        phase
    }

    async fn check_owner(&self) -> Option<OwnerCheck> {
        let address = self.session()?.address;
        match self.contract.owner().await {
            Ok(owner) => Some(OwnerCheck {
                address,
                is_owner: owner == address,
            }),
            Err(e) => {
                tracing::error!("Failed to fetch contract owner: {}", SaleError::ReadFailure(e.to_string()));
                None
            }
        }
    }

    /// Reads the number of minted tokens and records it.
    ///
    /// On read failure the previously known count is returned unchanged.
    pub async fn refresh_mint_count(&self) -> u64 {
        let seq = self.next_seq();
        let minted = match self.contract.minted_count().await {
            Ok(minted) => minted,
            Err(e) => {
                tracing::error!("Failed to refresh mint count: {}", SaleError::ReadFailure(e.to_string()));
                return self.inner.lock().minted.minted;
            }
        };

        self.apply_mint_count(seq, minted)
    }

    fn apply_mint_count(&self, seq: u64, minted: u64) -> u64 {
        let mut inner = self.inner.lock();
        if seq <= inner.count_seq {
            tracing::debug!("Discarding stale mint count response #{}", seq);
            return inner.minted.minted;
        }
        inner.count_seq = seq;
        inner.minted.minted = minted;
        minted
    }

    /// Submits `action` and waits for it to be mined, then refreshes the phase.
    pub async fn submit_action(&self, action: SaleAction) -> Result<TxHash, SaleError> {
        let (from, loading) = {
            let mut inner = self.inner.lock();
            let session = inner.session.ok_or(SaleError::NotConnected)?;
            if inner.loading {
                return Err(SaleError::ActionPending);
            }
            if !action.is_legal(inner.phase, session.is_contract_owner) {
                return Err(SaleError::InvalidActionForPhase {
                    action,
                    phase: inner.phase,
                });
            }
            inner.loading = true;
            (session.address, LoadingGuard(&self.inner))
        };

        let result = self.execute(action, from).await;
        drop(loading);

        match result {
            Ok(hash) => {
                match action {
                    SaleAction::StartSale => tracing::info!("Presale started in {:?}", hash),
                    SaleAction::PresaleMint | SaleAction::PublicMint => {
                        tracing::info!("You successfully minted a Crypto Dev! ({:?})", hash)
                    }
                }
                self.refresh_phase().await;
                Ok(hash)
            }
            Err(e) => {
                let err = SaleError::ActionFailed {
                    action,
                    cause: e.to_string(),
                };
                tracing::warn!("{}", err);
                Err(err)
            }
        }
    }

    async fn execute(
        &self,
        action: SaleAction,
        from: Address,
    ) -> Result<TxHash, crate::error::ClientError> {
        let tx = match action {
            SaleAction::StartSale => self.contract.start_presale(from).await?,
            SaleAction::PresaleMint => self.contract.presale_mint(from, action.fee()).await?,
            SaleAction::PublicMint => self.contract.public_mint(from, action.fee()).await?,
        };
        self.contract.confirm(tx).await?;
        Ok(tx.hash)
    }
}

impl<W, C> SaleController<W, C>
where
    W: Wallet + 'static,
    C: SaleContract + 'static,
{
    /// Connects the wallet and starts both poll timers for the new session.
    pub async fn connect_and_poll(self: &Arc<Self>) -> Result<Session, SaleError> {
        let session = self.connect().await?;
        self.start_polling()?;
        Ok(session)
    }

    /// Starts the phase and mint-count poll timers for the current session.
    ///
    /// The phase timer stops on its own once the presale has ended; both are
    /// cancelled by [`SaleController::disconnect`].
    pub fn start_polling(self: &Arc<Self>) -> Result<(), SaleError> {
        if self.session().is_none() {
            return Err(SaleError::NotConnected);
        }
        let pollers = Pollers {
            phase: poller::spawn_phase_poll(Arc::downgrade(self), self.poll_interval),
            mint_count: poller::spawn_mint_count_poll(Arc::downgrade(self), self.poll_interval),
        };
        *self.pollers.lock() = Some(pollers);
        Ok(())
    }

    pub fn is_polling_phase(&self) -> bool {
        self.pollers
            .lock()
            .as_ref()
            .is_some_and(|p| !p.phase.is_finished())
    }

    pub fn is_polling_mint_count(&self) -> bool {
        self.pollers
            .lock()
            .as_ref()
            .is_some_and(|p| !p.mint_count.is_finished())
    }
}
