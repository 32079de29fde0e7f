pub mod market_accounts;
pub mod initialize;
pub mod register_market;
pub mod swap;
pub mod swap_transitive;
pub mod withdraw;

pub use market_accounts::*;
pub use initialize::*;
pub use register_market::*;
pub use swap::*;
pub use swap_transitive::*;
pub use withdraw::*;
