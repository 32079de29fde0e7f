use anchor_lang::prelude::*;

#[macro_export]
/// Signer seeds of the treasury PDA that owns every fee vault
macro_rules! treasury_seeds {
    ($router_state:expr) => {
        &[$crate::common::TREASURY_SEED, &[$router_state.treasury_bump]]
    };
}

/// Direction of a taker order. `Ask` sells base for quote, `Bid` sells quote for base.
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    /// Wire value of the side in the dex instruction encoding.
    pub fn as_dex_u32(&self) -> u32 {
        match self {
            Side::Bid => 0,
            Side::Ask => 1,
        }
    }
}
