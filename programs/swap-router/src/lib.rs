use anchor_lang::prelude::*;

pub mod common;
pub mod dex;
pub mod error;
pub mod instructions;
mod settlement_engine;
pub mod state;
mod utils;
pub mod vault_authority;

#[cfg(test)]
mod testing;

use common::Side;
pub use instructions::*;

declare_id!("HqrZnU1DwZwz5Um9L5pqhWAzo7aWxTikanXM86TGC6hs");

#[program]
pub mod swap_router {
    use super::*;

    /// Create the router record and fix its owner
    pub fn initialize(ctx: Context<Initialize>, owner: Pubkey) -> Result<()> {
        initialize_impl(ctx, owner)
    }

    /// Snapshot a dex market, check its vault authority and open the treasury
    /// fee vaults for both of its mints. Owner only.
    pub fn register_market(
        ctx: Context<RegisterMarket>,
        fee_numerator: u64,
        fee_denominator: u64,
    ) -> Result<()> {
        register_market_impl(ctx, fee_numerator, fee_denominator)
    }

    /// Take against one market. `Ask` sells base for quote, `Bid` sells quote
    /// for base. Returns the net output kept by the caller.
    pub fn swap<'info>(
        ctx: Context<'_, '_, '_, 'info, Swap<'info>>,
        side: Side,
        amount_in: u64,
        min_amount_out: u64,
    ) -> Result<u64> {
        swap_impl(ctx, side, amount_in, min_amount_out)
    }

    /// Sell the base of `from` and buy the base of `to` through their shared quote
    pub fn swap_transitive<'info>(
        ctx: Context<'_, '_, '_, 'info, SwapTransitive<'info>>,
        amount_in: u64,
        min_amount_out: u64,
    ) -> Result<u64> {
        swap_transitive_impl(ctx, amount_in, min_amount_out)
    }

    /// Sweep one treasury fee vault to the owner. Owner only.
    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        withdraw_impl(ctx)
    }
}
