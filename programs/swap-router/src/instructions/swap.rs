use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::common::{Side, SwapExecuted, MARKET_CONFIG_SEED, ROUTER_STATE_SEED, TREASURY_SEED};
use crate::dex::TokenFeeCollector;
use crate::error::ErrorCode as RouterError;
use crate::instructions::market_accounts::*;
use crate::settlement_engine::SingleHopSwap;
use crate::state::{MarketConfig, RouterState};

pub fn swap_impl<'info>(
    ctx: Context<'_, '_, '_, 'info, Swap<'info>>,
    side: Side,
    amount_in: u64,
    min_amount_out: u64,
) -> Result<u64> {
    msg!(
        "Swap: market: {}, side: {:?}, amount_in: {}, min_amount_out: {}",
        ctx.accounts.market.market.key(),
        side,
        amount_in,
        min_amount_out
    );
    let accounts = &ctx.accounts;
    let config = &accounts.market_config;
    let (token_in, token_out) = check_swap_accounts(
        &accounts.market,
        config,
        &accounts.pc_wallet,
        &accounts.fee_vault,
        side,
        amount_in,
    )?;
    let output_wallet = match side {
        Side::Ask => accounts.pc_wallet.to_account_info(),
        Side::Bid => accounts.market.coin_wallet.to_account_info(),
    };

    let mut orderbook = accounts.market.orderbook_client(
        accounts.pc_wallet.to_account_info(),
        accounts.wallet_owner.to_account_info(),
        accounts.dex_program.to_account_info(),
        accounts.token_program.to_account_info(),
        config.base_lot_size,
    );
    let mut fees = TokenFeeCollector {
        source: output_wallet,
        fee_vault: accounts.fee_vault.to_account_info(),
        authority: accounts.wallet_owner.to_account_info(),
        token_program: accounts.token_program.to_account_info(),
    };

    let outcome = SingleHopSwap {
        side,
        amount_in,
        min_amount_out,
        fee_rate: config.taker_fee,
    }
    .execute(&mut orderbook, &mut fees)?;

    emit!(SwapExecuted::from_outcome(
        config.market,
        accounts.wallet_owner.key(),
        side,
        token_in,
        token_out,
        &outcome,
        Clock::get()?.unix_timestamp,
    ));
    Ok(outcome.amount_out)
}

/// Everything checked before the order reaches the dex. Returns the
/// (input, output) mints of the swap.
pub fn check_swap_accounts(
    market: &MarketAccounts,
    config: &MarketConfig,
    pc_wallet: &TokenAccount,
    fee_vault: &TokenAccount,
    side: Side,
    amount_in: u64,
) -> Result<(Pubkey, Pubkey)> {
    market.validate(config, pc_wallet)?;

    let (token_in, token_out) = config.mints_for(side);
    require_fee_vault_mint(fee_vault, &token_out)?;
    let source_wallet: &TokenAccount = match side {
        Side::Ask => &market.coin_wallet,
        Side::Bid => pc_wallet,
    };
    require_funds(source_wallet, amount_in)?;
    Ok((token_in, token_out))
}

#[derive(Accounts)]
pub struct Swap<'info> {
    #[account(
        seeds = [ROUTER_STATE_SEED],
        bump = router_state.bump
    )]
    pub router_state: Box<Account<'info, RouterState>>,
    pub market: MarketAccounts<'info>,
    #[account(
        seeds = [MARKET_CONFIG_SEED, market.market.key().as_ref()],
        bump = market_config.bump
    )]
    pub market_config: Box<Account<'info, MarketConfig>>,
    // The user's token account for the quote currency
    #[account(mut)]
    pub pc_wallet: Box<Account<'info, TokenAccount>>,
    pub wallet_owner: Signer<'info>,
    /// CHECK: This is a PDA used as fee vault authority, derived from seeds
    #[account(
        seeds = [TREASURY_SEED],
        bump = router_state.treasury_bump
    )]
    pub treasury: UncheckedAccount<'info>,
    #[account(
        mut,
        token::authority = treasury
    )]
    pub fee_vault: Box<Account<'info, TokenAccount>>,
    /// CHECK: the dex program the market was registered with
    #[account(
        executable,
        address = market_config.dex_program @ RouterError::MarketUnavailable
    )]
    pub dex_program: UncheckedAccount<'info>,
    pub token_program: Program<'info, Token>,
}
