pub mod contract;
pub mod controller;
pub mod error;
pub mod poller;
pub mod wallet;

#[cfg(test)]
mod testing;

pub mod prelude {
    pub use crate::contract::*;
    pub use crate::controller::*;
    pub use crate::error::*;
    pub use crate::poller::PollHandle;
    pub use crate::wallet::*;
}
