use anchor_lang::prelude::*;

use crate::common::Side;
use crate::settlement_engine::{SwapOutcome, TransitiveOutcome};

#[event]
pub struct RouterInitialized {
    pub owner: Pubkey,
    pub treasury: Pubkey,
}

#[event]
pub struct MarketRegistered {
    pub market: Pubkey,
    pub dex_program: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub vault_authority: Pubkey,
    pub vault_signer_nonce: u64,
    pub fee_numerator: u64,
    pub fee_denominator: u64,
}

#[event]
pub struct SwapExecuted {
    pub market: Pubkey,
    pub owner: Pubkey,
    pub side: Side,
    pub token_in: Pubkey,
    pub token_out: Pubkey,
    pub amount_in: u64,
    pub gross_amount_out: u64,
    pub fee: u64,
    pub amount_out: u64,
    pub timestamp: i64,
}

impl SwapExecuted {
    pub fn from_outcome(
        market: Pubkey,
        owner: Pubkey,
        side: Side,
        token_in: Pubkey,
        token_out: Pubkey,
        outcome: &SwapOutcome,
        timestamp: i64,
    ) -> Self {
        Self {
            market,
            owner,
            side,
            token_in,
            token_out,
            amount_in: outcome.amount_in,
            gross_amount_out: outcome.gross_amount_out,
            fee: outcome.fee,
            amount_out: outcome.amount_out,
            timestamp,
        }
    }
}

#[event]
pub struct TransitiveSwapExecuted {
    pub from_market: Pubkey,
    pub to_market: Pubkey,
    pub owner: Pubkey,
    pub token_in: Pubkey,
    pub pivot: Pubkey,
    pub token_out: Pubkey,
    pub amount_in: u64,
    pub pivot_amount: u64,
    pub pivot_fee: u64,
    pub pivot_spill: u64,
    pub fee: u64,
    pub amount_out: u64,
    pub timestamp: i64,
}

impl TransitiveSwapExecuted {
    #[allow(clippy::too_many_arguments)]
    pub fn from_outcome(
        from_market: Pubkey,
        to_market: Pubkey,
        owner: Pubkey,
        token_in: Pubkey,
        pivot: Pubkey,
        token_out: Pubkey,
        outcome: &TransitiveOutcome,
        timestamp: i64,
    ) -> Self {
        Self {
            from_market,
            to_market,
            owner,
            token_in,
            pivot,
            token_out,
            amount_in: outcome.leg_a.amount_in,
            pivot_amount: outcome.leg_a.amount_out,
            pivot_fee: outcome.leg_a.fee,
            pivot_spill: outcome.pivot_spill,
            fee: outcome.leg_b.fee,
            amount_out: outcome.leg_b.amount_out,
            timestamp,
        }
    }
}

#[event]
pub struct FeesWithdrawn {
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub fee_vault: Pubkey,
    pub amount: u64,
}
