mod action;
mod phase;
mod view;

pub use action::*;
pub use phase::*;
pub use view::*;
