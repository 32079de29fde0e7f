use anchor_lang::prelude::*;

use crate::common::{RouterInitialized, ROUTER_STATE_SEED, TREASURY_SEED};
use crate::state::RouterState;

pub fn initialize_impl(ctx: Context<Initialize>, owner: Pubkey) -> Result<()> {
    msg!("Initialize router, owner: {}", owner);
    let treasury_bump = ctx.bumps.treasury;
    let bump = ctx.bumps.router_state;
    ctx.accounts.router_state.initialize(owner, treasury_bump, bump)?;

    emit!(RouterInitialized {
        owner,
        treasury: ctx.accounts.treasury.key(),
    });
    Ok(())
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init_if_needed,
        payer = payer,
        space = RouterState::LEN,
        seeds = [ROUTER_STATE_SEED],
        bump
    )]
    pub router_state: Account<'info, RouterState>,
    /// CHECK: This is a PDA used as fee vault authority, derived from seeds
    #[account(
        seeds = [TREASURY_SEED],
        bump
    )]
    pub treasury: UncheckedAccount<'info>,
    #[account(mut)]
    pub payer: Signer<'info>,
    pub system_program: Program<'info, System>,
}
