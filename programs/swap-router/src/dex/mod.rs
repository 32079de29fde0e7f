//! Narrow client of the external order-book program: market account layout,
//! `SendTake` encoding and the taker-side adapter used by the settlement engine.

mod adapter;
mod instruction;
mod market_state;

pub use adapter::*;
pub use instruction::*;
pub use market_state::*;
