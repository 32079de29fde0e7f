mod router_state;
mod market_config;

pub use router_state::*;
pub use market_config::*;
