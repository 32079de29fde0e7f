use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::dex::{MarketHandles, MarketStateV1, OrderbookClient};
use crate::error::ErrorCode as RouterError;
use crate::state::MarketConfig;
use crate::vault_authority::verify_vault_authority;

// Market accounts are the accounts used to take against the dex minus the
// common accounts (program ids, the swap user, the pc wallet).
#[derive(Accounts, Clone)]
pub struct MarketAccounts<'info> {
    /// CHECK: decoded and matched against the registered market config
    #[account(mut)]
    pub market: UncheckedAccount<'info>,
    /// CHECK: must equal the registered request queue
    #[account(mut)]
    pub request_queue: UncheckedAccount<'info>,
    /// CHECK: must equal the registered event queue
    #[account(mut)]
    pub event_queue: UncheckedAccount<'info>,
    /// CHECK: must equal the registered bids
    #[account(mut)]
    pub bids: UncheckedAccount<'info>,
    /// CHECK: must equal the registered asks
    #[account(mut)]
    pub asks: UncheckedAccount<'info>,
    /// CHECK: base vault of the market, must equal the registered one
    #[account(mut)]
    pub coin_vault: UncheckedAccount<'info>,
    /// CHECK: quote vault of the market, must equal the registered one
    #[account(mut)]
    pub pc_vault: UncheckedAccount<'info>,
    /// CHECK: verified against the derived vault authority
    pub vault_signer: UncheckedAccount<'info>,
    // The user's token account for the base currency
    #[account(mut)]
    pub coin_wallet: Box<Account<'info, TokenAccount>>,
}

impl<'info> MarketAccounts<'info> {
    pub fn handles(&self) -> MarketHandles {
        MarketHandles {
            market: self.market.key(),
            request_queue: self.request_queue.key(),
            event_queue: self.event_queue.key(),
            bids: self.bids.key(),
            asks: self.asks.key(),
            coin_vault: self.coin_vault.key(),
            pc_vault: self.pc_vault.key(),
        }
    }

    /// Checks run before any order is submitted: the handles are the
    /// registered ones and still live, the vault signer is the derived
    /// authority, and the wallets hold the market's mints.
    pub fn validate(&self, config: &MarketConfig, pc_wallet: &TokenAccount) -> Result<()> {
        config.verify_handles(&self.handles())?;
        let state = MarketStateV1::load(&self.market.to_account_info(), &config.dex_program)?;
        if state.handles() != config.handles() {
            msg!("Market {} moved since registration", config.market);
            return err!(RouterError::MarketUnavailable);
        }

        require!(
            state.vault_signer_nonce == config.vault_signer_nonce,
            RouterError::VaultAuthorityMismatch
        );
        require_keys_eq!(
            self.vault_signer.key(),
            config.vault_authority,
            RouterError::VaultAuthorityMismatch
        );
        verify_vault_authority(
            &config.market,
            state.vault_signer_nonce,
            &config.dex_program,
            &config.vault_authority,
        )?;

        config.verify_wallet_mints(&self.coin_wallet.mint, &pc_wallet.mint)
    }

    pub fn orderbook_client(
        &self,
        pc_wallet: AccountInfo<'info>,
        wallet_owner: AccountInfo<'info>,
        dex_program: AccountInfo<'info>,
        token_program: AccountInfo<'info>,
        base_lot_size: u64,
    ) -> OrderbookClient<'info> {
        OrderbookClient {
            market: self.market.to_account_info(),
            request_queue: self.request_queue.to_account_info(),
            event_queue: self.event_queue.to_account_info(),
            bids: self.bids.to_account_info(),
            asks: self.asks.to_account_info(),
            coin_vault: self.coin_vault.to_account_info(),
            pc_vault: self.pc_vault.to_account_info(),
            vault_signer: self.vault_signer.to_account_info(),
            coin_wallet: self.coin_wallet.to_account_info(),
            pc_wallet,
            wallet_owner,
            dex_program,
            token_program,
            base_lot_size,
        }
    }
}

pub fn require_funds(wallet: &TokenAccount, amount: u64) -> Result<()> {
    if wallet.amount < amount {
        msg!("Wallet holds {} but {} is being sold", wallet.amount, amount);
        return err!(RouterError::InsufficientFunds);
    }
    Ok(())
}

pub fn require_fee_vault_mint(fee_vault: &TokenAccount, mint: &Pubkey) -> Result<()> {
    require_keys_eq!(fee_vault.mint, *mint, RouterError::AssetMismatch);
    Ok(())
}
