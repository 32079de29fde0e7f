use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::common::{FeesWithdrawn, ROUTER_STATE_SEED, TREASURY_SEED};
use crate::error::ErrorCode as RouterError;
use crate::state::RouterState;
use crate::treasury_seeds;

pub fn withdraw_impl(ctx: Context<Withdraw>) -> Result<()> {
    let accounts = &ctx.accounts;
    msg!(
        "Withdraw fees: mint: {}, amount: {}",
        accounts.fee_vault.mint,
        accounts.fee_vault.amount
    );
    let amount = sweep_fee_vault(
        &accounts.router_state,
        &accounts.owner.key(),
        accounts.fee_vault.amount,
        |amount| {
            // Transfer the whole fee vault from the treasury to the owner
            let signer_seeds: &[&[&[u8]]] = &[treasury_seeds!(accounts.router_state)];
            let cpi_accounts = anchor_spl::token::Transfer {
                from: accounts.fee_vault.to_account_info(),
                to: accounts.owner_token_account.to_account_info(),
                authority: accounts.treasury.to_account_info(),
            };
            let cpi_program = accounts.token_program.to_account_info();
            let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);
            anchor_spl::token::transfer(cpi_ctx, amount)
        },
    )?;

    emit!(FeesWithdrawn {
        owner: accounts.owner.key(),
        mint: accounts.fee_vault.mint,
        fee_vault: accounts.fee_vault.key(),
        amount,
    });
    Ok(())
}

/// Owner-gated sweep of a vault holding `balance`. `transfer` moves the whole
/// balance and is skipped for an empty vault. Returns the amount swept.
pub fn sweep_fee_vault<F>(router_state: &RouterState, caller: &Pubkey, balance: u64, transfer: F) -> Result<u64>
where
    F: FnOnce(u64) -> Result<()>,
{
    router_state.authorize(caller)?;
    if balance > 0 {
        transfer(balance)?;
    }
    Ok(balance)
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(
        seeds = [ROUTER_STATE_SEED],
        bump = router_state.bump
    )]
    pub router_state: Account<'info, RouterState>,
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
    #[account(
        mut,
        token::authority = owner,
        constraint = owner_token_account.mint == fee_vault.mint @ RouterError::AssetMismatch
    )]
    pub owner_token_account: Box<Account<'info, TokenAccount>>,
    pub owner: Signer<'info>,
    pub token_program: Program<'info, Token>,
}
