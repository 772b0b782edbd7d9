use std::{
    ops::Deref,
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use cryptodevs_api::prelude::*;
use ethers::{
    providers::ProviderError,
    types::{H160, H256},
};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::{
    contract::{PendingTx, SaleContract},
    controller::Clock,
    error::ClientError,
    wallet::Wallet,
};

pub const OWNER_ADDRESS: Address = H160([0x11; 20]);
pub const USER_ADDRESS: Address = H160([0x22; 20]);
pub const START_TIME: u64 = 1_700_000_000;
pub const PRESALE_DURATION: u64 = 5 * 60;

#[derive(Default)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    pub fn at(now: u64) -> Arc<Self> {
        Arc::new(Self(AtomicU64::new(now)))
    }

    pub fn advance(&self, secs: u64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct FakeWallet {
    pub address: Address,
    /// Shared so a test can switch networks after handing the wallet over.
    pub chain_id: Arc<AtomicU64>,
}

impl FakeWallet {
    pub fn new(address: Address) -> Self {
        Self::on_chain(address, REQUIRED_CHAIN_ID)
    }

    pub fn on_chain(address: Address, chain_id: u64) -> Self {
        Self {
            address,
            chain_id: Arc::new(AtomicU64::new(chain_id)),
        }
    }
}

#[async_trait]
impl Wallet for FakeWallet {
    async fn connect(&self) -> Result<Address, ClientError> {
        Ok(self.address)
    }

    async fn chain_id(&self) -> Result<u64, ClientError> {
        Ok(self.chain_id.load(Ordering::SeqCst))
    }
}

#[derive(Default)]
struct ChainState {
    started: bool,
    end_time: u64,
    minted: u64,
    next_tx: u8,
}

pub struct ChainShared {
    pub clock: Arc<ManualClock>,
    state: Mutex<ChainState>,
    pub phase_reads: AtomicUsize,
    pub owner_reads: AtomicUsize,
    pub count_reads: AtomicUsize,
    pub writes: AtomicUsize,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub hold_confirmations: AtomicBool,
    pub release: Notify,
}

/// In-memory sale contract sharing its state across clones.
#[derive(Clone)]
pub struct FakeChain(Arc<ChainShared>);

impl Deref for FakeChain {
    type Target = ChainShared;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FakeChain {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self(Arc::new(ChainShared {
            clock,
            state: Mutex::new(ChainState::default()),
            phase_reads: AtomicUsize::new(0),
            owner_reads: AtomicUsize::new(0),
            count_reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            hold_confirmations: AtomicBool::new(false),
            release: Notify::new(),
        }))
    }

    pub fn set_started(&self) {
        let mut state = self.state.lock();
        state.started = true;
        state.end_time = self.clock.now() + PRESALE_DURATION;
    }

    pub fn minted(&self) -> u64 {
        self.state.lock().minted
    }

    fn read<T>(&self, f: impl FnOnce(&ChainState) -> T) -> Result<T, ClientError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClientError::Provider(ProviderError::CustomError(
                "connection reset".to_string(),
            )));
        }
        Ok(f(&*self.state.lock()))
    }

    fn write(
        &self,
        f: impl FnOnce(&mut ChainState, u64) -> Result<(), ClientError>,
    ) -> Result<PendingTx, ClientError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClientError::Contract(
                "User rejected the request.".to_string(),
            ));
        }
        let mut state = self.state.lock();
        f(&mut *state, self.clock.now())?;
        state.next_tx += 1;
        Ok(PendingTx {
            hash: H256([state.next_tx; 32]),
        })
    }
}

fn revert(reason: &str) -> ClientError {
    ClientError::Contract(format!("execution reverted: {}", reason))
}

#[async_trait]
impl SaleContract for FakeChain {
    async fn owner(&self) -> Result<Address, ClientError> {
        self.owner_reads.fetch_add(1, Ordering::SeqCst);
        self.read(|_| OWNER_ADDRESS)
    }

    async fn presale_started(&self) -> Result<bool, ClientError> {
        self.phase_reads.fetch_add(1, Ordering::SeqCst);
        self.read(|s| s.started)
    }

    async fn presale_end_time(&self) -> Result<Option<u64>, ClientError> {
        self.read(|s| (s.end_time != 0).then_some(s.end_time))
    }

    async fn minted_count(&self) -> Result<u64, ClientError> {
        self.count_reads.fetch_add(1, Ordering::SeqCst);
        self.read(|s| s.minted)
    }

    async fn start_presale(&self, from: Address) -> Result<PendingTx, ClientError> {
        self.write(|s, now| {
            if from != OWNER_ADDRESS {
                return Err(revert("Ownable: caller is not the owner"));
            }
            s.started = true;
            s.end_time = now + PRESALE_DURATION;
            Ok(())
        })
    }

    async fn presale_mint(&self, _from: Address, fee: U256) -> Result<PendingTx, ClientError> {
        self.write(|s, now| {
            if !s.started || now >= s.end_time {
                return Err(revert("Presale is not running"));
            }
            if fee < U256::from(MINT_PRICE_WEI) {
                return Err(revert("Ether sent is not correct"));
            }
            s.minted += 1;
            Ok(())
        })
    }

    async fn public_mint(&self, _from: Address, fee: U256) -> Result<PendingTx, ClientError> {
        self.write(|s, now| {
            if !s.started || now < s.end_time {
                return Err(revert("Presale has not ended yet"));
            }
            if fee < U256::from(MINT_PRICE_WEI) {
                return Err(revert("Ether sent is not correct"));
            }
            s.minted += 1;
            Ok(())
        })
    }

    async fn confirm(&self, _tx: PendingTx) -> Result<(), ClientError> {
        if self.hold_confirmations.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        Ok(())
    }
}
