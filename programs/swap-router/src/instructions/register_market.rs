use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::common::{MarketRegistered, MARKET_CONFIG_SEED, ROUTER_STATE_SEED, TREASURY_SEED};
use crate::dex::MarketStateV1;
use crate::error::ErrorCode as RouterError;
use crate::state::{FeeRate, MarketConfig, RouterState};
use crate::vault_authority::{derive_vault_authority, verify_vault_authority};

pub fn register_market_impl(
    ctx: Context<RegisterMarket>,
    fee_numerator: u64,
    fee_denominator: u64,
) -> Result<()> {
    ctx.accounts.router_state.authorize(&ctx.accounts.owner.key())?;
    let taker_fee = FeeRate::new(fee_numerator, fee_denominator)?;

    let market_info = ctx.accounts.market.to_account_info();
    let config = MarketRegistration {
        market: &market_info,
        dex_program: ctx.accounts.dex_program.key(),
        vault_signer: ctx.accounts.vault_signer.key(),
        base_mint: ctx.accounts.base_mint.key(),
        quote_mint: ctx.accounts.quote_mint.key(),
    }
    .market_config(taker_fee, ctx.bumps.market_config)?;

    emit!(MarketRegistered {
        market: config.market,
        dex_program: config.dex_program,
        base_mint: config.base_mint,
        quote_mint: config.quote_mint,
        vault_authority: config.vault_authority,
        vault_signer_nonce: config.vault_signer_nonce,
        fee_numerator,
        fee_denominator,
    });
    let market_config: &mut MarketConfig = &mut ctx.accounts.market_config;
    *market_config = config;
    Ok(())
}

/// The accounts a registration snapshots
pub struct MarketRegistration<'a, 'info> {
    pub market: &'a AccountInfo<'info>,
    pub dex_program: Pubkey,
    pub vault_signer: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
}

impl MarketRegistration<'_, '_> {
    /// Decode the market, check its mints and vault authority and build the
    /// config recorded for it.
    pub fn market_config(&self, taker_fee: FeeRate, bump: u8) -> Result<MarketConfig> {
        let market_key = self.market.key();
        let state = MarketStateV1::load(self.market, &self.dex_program)?;
        msg!(
            "Registering market {} on {}: base {}, quote {}",
            market_key,
            self.dex_program,
            state.coin_mint(),
            state.pc_mint()
        );

        require_keys_eq!(self.base_mint, state.coin_mint(), RouterError::AssetMismatch);
        require_keys_eq!(self.quote_mint, state.pc_mint(), RouterError::AssetMismatch);

        // The market must use the first nonce that yields an off-curve address
        let (vault_authority, nonce) = derive_vault_authority(&market_key, &self.dex_program)?;
        require!(nonce == state.vault_signer_nonce, RouterError::VaultAuthorityMismatch);
        require_keys_eq!(self.vault_signer, vault_authority, RouterError::VaultAuthorityMismatch);
        verify_vault_authority(&market_key, state.vault_signer_nonce, &self.dex_program, &vault_authority)?;

        let handles = state.handles();
        Ok(MarketConfig {
            market: market_key,
            dex_program: self.dex_program,
            base_mint: state.coin_mint(),
            quote_mint: state.pc_mint(),
            base_vault: handles.coin_vault,
            quote_vault: handles.pc_vault,
            request_queue: handles.request_queue,
            event_queue: handles.event_queue,
            bids: handles.bids,
            asks: handles.asks,
            vault_authority,
            vault_signer_nonce: nonce,
            base_lot_size: state.coin_lot_size,
            taker_fee,
            bump,
        })
    }
}

#[derive(Accounts)]
pub struct RegisterMarket<'info> {
    #[account(
        seeds = [ROUTER_STATE_SEED],
        bump = router_state.bump
    )]
    pub router_state: Box<Account<'info, RouterState>>,
    #[account(
        init_if_needed,
        payer = owner,
        space = MarketConfig::LEN,
        seeds = [MARKET_CONFIG_SEED, market.key().as_ref()],
        bump
    )]
    pub market_config: Box<Account<'info, MarketConfig>>,
    /// CHECK: decoded as a dex market owned by `dex_program`
    pub market: UncheckedAccount<'info>,
    /// CHECK: must be the vault authority derived for `market`
    pub vault_signer: UncheckedAccount<'info>,
    /// CHECK: the external order-book program
    #[account(executable)]
    pub dex_program: UncheckedAccount<'info>,
    pub base_mint: Box<Account<'info, Mint>>,
    pub quote_mint: Box<Account<'info, Mint>>,
    /// CHECK: This is a PDA used as fee vault authority, derived from seeds
    #[account(
        seeds = [TREASURY_SEED],
        bump = router_state.treasury_bump
    )]
    pub treasury: UncheckedAccount<'info>,
    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = base_mint,
        associated_token::authority = treasury
    )]
    pub base_fee_vault: Box<Account<'info, TokenAccount>>,
    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = quote_mint,
        associated_token::authority = treasury
    )]
    pub quote_fee_vault: Box<Account<'info, TokenAccount>>,
    #[account(mut)]
    pub owner: Signer<'info>,
    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
}
