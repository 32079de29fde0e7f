use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::common::{TransitiveSwapExecuted, MARKET_CONFIG_SEED, ROUTER_STATE_SEED, TREASURY_SEED};
use crate::dex::TokenFeeCollector;
use crate::error::ErrorCode as RouterError;
use crate::instructions::market_accounts::*;
use crate::settlement_engine::{check_route, TransitiveSwap};
use crate::state::{MarketConfig, RouterState};

pub fn swap_transitive_impl<'info>(
    ctx: Context<'_, '_, '_, 'info, SwapTransitive<'info>>,
    amount_in: u64,
    min_amount_out: u64,
) -> Result<u64> {
    msg!(
        "Transitive swap: from: {}, to: {}, amount_in: {}, min_amount_out: {}",
        ctx.accounts.from.market.key(),
        ctx.accounts.to.market.key(),
        amount_in,
        min_amount_out
    );
    let accounts = &ctx.accounts;
    let (from_config, to_config) = (&accounts.from_config, &accounts.to_config);
    check_route_accounts(
        (&accounts.from, from_config),
        (&accounts.to, to_config),
        &accounts.pc_wallet,
        &accounts.pivot_fee_vault,
        &accounts.destination_fee_vault,
        amount_in,
    )?;

    let pc_wallet = accounts.pc_wallet.to_account_info();
    let wallet_owner = accounts.wallet_owner.to_account_info();
    let dex_program = accounts.dex_program.to_account_info();
    let token_program = accounts.token_program.to_account_info();

    let mut from_book = accounts.from.orderbook_client(
        pc_wallet.clone(),
        wallet_owner.clone(),
        dex_program.clone(),
        token_program.clone(),
        from_config.base_lot_size,
    );
    let mut from_fees = TokenFeeCollector {
        source: pc_wallet.clone(),
        fee_vault: accounts.pivot_fee_vault.to_account_info(),
        authority: wallet_owner.clone(),
        token_program: token_program.clone(),
    };
    let mut to_book = accounts.to.orderbook_client(
        pc_wallet,
        wallet_owner.clone(),
        dex_program,
        token_program.clone(),
        to_config.base_lot_size,
    );
    let mut to_fees = TokenFeeCollector {
        source: accounts.to.coin_wallet.to_account_info(),
        fee_vault: accounts.destination_fee_vault.to_account_info(),
        authority: wallet_owner,
        token_program,
    };

    let outcome = TransitiveSwap {
        amount_in,
        min_amount_out,
        from_fee_rate: from_config.taker_fee,
        to_fee_rate: to_config.taker_fee,
    }
    .execute(&mut from_book, &mut from_fees, &mut to_book, &mut to_fees)?;

    emit!(TransitiveSwapExecuted::from_outcome(
        from_config.market,
        to_config.market,
        accounts.wallet_owner.key(),
        from_config.base_mint,
        from_config.quote_mint,
        to_config.base_mint,
        &outcome,
        Clock::get()?.unix_timestamp,
    ));
    Ok(outcome.leg_b.amount_out)
}

/// Route and account checks made before either leg reaches the dex
pub fn check_route_accounts(
    (from, from_config): (&MarketAccounts, &MarketConfig),
    (to, to_config): (&MarketAccounts, &MarketConfig),
    pc_wallet: &TokenAccount,
    pivot_fee_vault: &TokenAccount,
    destination_fee_vault: &TokenAccount,
    amount_in: u64,
) -> Result<()> {
    check_route(from_config, to_config)?;
    from.validate(from_config, pc_wallet)?;
    to.validate(to_config, pc_wallet)?;

    require_fee_vault_mint(pivot_fee_vault, &from_config.quote_mint)?;
    require_fee_vault_mint(destination_fee_vault, &to_config.base_mint)?;
    require_funds(&from.coin_wallet, amount_in)
}

#[derive(Accounts)]
pub struct SwapTransitive<'info> {
    #[account(
        seeds = [ROUTER_STATE_SEED],
        bump = router_state.bump
    )]
    pub router_state: Box<Account<'info, RouterState>>,
    pub from: MarketAccounts<'info>,
    #[account(
        seeds = [MARKET_CONFIG_SEED, from.market.key().as_ref()],
        bump = from_config.bump
    )]
    pub from_config: Box<Account<'info, MarketConfig>>,
    pub to: MarketAccounts<'info>,
    #[account(
        seeds = [MARKET_CONFIG_SEED, to.market.key().as_ref()],
        bump = to_config.bump,
        constraint = to_config.dex_program == from_config.dex_program @ RouterError::MarketUnavailable
    )]
    pub to_config: Box<Account<'info, MarketConfig>>,
    // The user's token account for the shared pivot currency
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
    pub pivot_fee_vault: Box<Account<'info, TokenAccount>>,
    #[account(
        mut,
        token::authority = treasury
    )]
    pub destination_fee_vault: Box<Account<'info, TokenAccount>>,
    /// CHECK: the dex program both markets were registered with
    #[account(
        executable,
        address = from_config.dex_program @ RouterError::MarketUnavailable
    )]
    pub dex_program: UncheckedAccount<'info>,
    pub token_program: Program<'info, Token>,
}
