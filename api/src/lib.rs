pub mod consts;
pub mod error;
pub mod state;
pub mod types;

pub mod prelude {
    pub use crate::consts::*;
    pub use crate::error::*;
    pub use crate::state::*;
    pub use crate::types::*;
}
