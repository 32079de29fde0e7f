use anchor_lang::prelude::*;

use crate::common::{Side, DEFAULT_TAKER_FEE_DENOMINATOR, DEFAULT_TAKER_FEE_NUMERATOR};
use crate::dex::MarketHandles;
use crate::error::ErrorCode as RouterError;

/// Taker fee as an exact fraction of the gross output.
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub struct FeeRate {
    pub numerator: u64,
    pub denominator: u64,
}

impl Default for FeeRate {
    fn default() -> Self {
        Self {
            numerator: DEFAULT_TAKER_FEE_NUMERATOR,
            denominator: DEFAULT_TAKER_FEE_DENOMINATOR,
        }
    }
}

impl FeeRate {
    pub fn new(numerator: u64, denominator: u64) -> Result<Self> {
        require!(denominator > 0, RouterError::InvalidFeeRate);
        require!(numerator <= denominator, RouterError::InvalidFeeRate);
        Ok(Self { numerator, denominator })
    }

    /// `floor(amount * numerator / denominator)`
    pub fn fee_on(&self, amount: u64) -> Result<u64> {
        require!(self.denominator > 0, RouterError::InvalidFeeRate);
        let fee = (amount as u128)
            .checked_mul(self.numerator as u128)
            .ok_or(RouterError::Overflow)?
            / self.denominator as u128;
        u64::try_from(fee).map_err(|_| error!(RouterError::Overflow))
    }
}

/// Registered snapshot of an external order-book market.
#[account]
#[derive(Debug)]
pub struct MarketConfig {
    pub market: Pubkey,
    pub dex_program: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub request_queue: Pubkey,
    pub event_queue: Pubkey,
    pub bids: Pubkey,
    pub asks: Pubkey,
    /// Program-owned signer of `base_vault` and `quote_vault`
    pub vault_authority: Pubkey,
    pub vault_signer_nonce: u64,
    pub base_lot_size: u64,
    pub taker_fee: FeeRate,
    pub bump: u8,
}

impl MarketConfig {
    pub const LEN: usize = 8 + // discriminator
        32 * 11 + // market, dex_program, mints, vaults, queues, book sides, vault_authority
        8 + // vault_signer_nonce
        8 + // base_lot_size
        8 + 8 + // taker_fee
        1; // bump

    pub fn handles(&self) -> MarketHandles {
        MarketHandles {
            market: self.market,
            request_queue: self.request_queue,
            event_queue: self.event_queue,
            bids: self.bids,
            asks: self.asks,
            coin_vault: self.base_vault,
            pc_vault: self.quote_vault,
        }
    }

    /// Caller-supplied market handles must be exactly the registered ones.
    pub fn verify_handles(&self, handles: &MarketHandles) -> Result<()> {
        if self.handles() != *handles {
            msg!("Market handles do not match registered market {}", self.market);
            return err!(RouterError::MarketUnavailable);
        }
        Ok(())
    }

    /// (input mint, output mint) of a taker order on this market
    pub fn mints_for(&self, side: Side) -> (Pubkey, Pubkey) {
        match side {
            Side::Bid => (self.quote_mint, self.base_mint),
            Side::Ask => (self.base_mint, self.quote_mint),
        }
    }

    /// The coin wallet must hold the base mint, the pc wallet the quote mint.
    pub fn verify_wallet_mints(&self, coin_mint: &Pubkey, pc_mint: &Pubkey) -> Result<()> {
        require_keys_eq!(*coin_mint, self.base_mint, RouterError::AssetMismatch);
        require_keys_eq!(*pc_mint, self.quote_mint, RouterError::AssetMismatch);
        Ok(())
    }
}
