use std::mem::size_of;

use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};

use crate::error::ErrorCode as RouterError;

pub const MARKET_HEAD: &[u8; 5] = b"serum";
pub const MARKET_TAIL: &[u8; 7] = b"padding";
pub const MARKET_ACCOUNT_LEN: usize = MARKET_HEAD.len() + size_of::<MarketStateV1>() + MARKET_TAIL.len();

pub const ACCOUNT_FLAG_INITIALIZED: u64 = 1 << 0;
pub const ACCOUNT_FLAG_MARKET: u64 = 1 << 1;
pub const ACCOUNT_FLAG_DISABLED: u64 = 1 << 7;

/// Accounts owned by the dex that identify one market's book and vaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketHandles {
    pub market: Pubkey,
    pub request_queue: Pubkey,
    pub event_queue: Pubkey,
    pub bids: Pubkey,
    pub asks: Pubkey,
    pub coin_vault: Pubkey,
    pub pc_vault: Pubkey,
}

/// Fixed body of a dex market account, between the `serum` head and the
/// `padding` tail. Keys are stored as four native-endian words.
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
#[repr(C)]
pub struct MarketStateV1 {
    pub account_flags: u64,
    pub own_address: [u64; 4],
    pub vault_signer_nonce: u64,
    pub coin_mint: [u64; 4],
    pub pc_mint: [u64; 4],
    pub coin_vault: [u64; 4],
    pub coin_deposits_total: u64,
    pub coin_fees_accrued: u64,
    pub pc_vault: [u64; 4],
    pub pc_deposits_total: u64,
    pub pc_fees_accrued: u64,
    pub pc_dust_threshold: u64,
    pub req_q: [u64; 4],
    pub event_q: [u64; 4],
    pub bids: [u64; 4],
    pub asks: [u64; 4],
    pub coin_lot_size: u64,
    pub pc_lot_size: u64,
    pub fee_rate_bps: u64,
    pub referrer_rebates_accrued: u64,
}

pub fn key_from_words(words: [u64; 4]) -> Pubkey {
    Pubkey::new_from_array(bytemuck::cast(words))
}

pub fn words_from_key(key: &Pubkey) -> [u64; 4] {
    bytemuck::cast(key.to_bytes())
}

impl MarketStateV1 {
    /// Load a live market owned by `dex_program` and check that it describes itself.
    pub fn load(account: &AccountInfo, dex_program: &Pubkey) -> Result<Self> {
        if account.owner != dex_program {
            msg!("Market {} is not owned by dex program {}", account.key, dex_program);
            return err!(RouterError::MarketUnavailable);
        }
        let data = account.try_borrow_data()?;
        let state = Self::decode(&data)?;
        require_keys_eq!(state.own_address(), *account.key, RouterError::MarketUnavailable);
        Ok(state)
    }

    /// Decode and validate raw market account data. Permissioned markets carry
    /// extra fields before the tail; only the common body is read.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < MARKET_ACCOUNT_LEN
            || !data.starts_with(MARKET_HEAD)
            || !data.ends_with(MARKET_TAIL)
        {
            return err!(RouterError::MarketUnavailable);
        }
        let body = &data[MARKET_HEAD.len()..MARKET_HEAD.len() + size_of::<Self>()];
        let state: Self = bytemuck::try_pod_read_unaligned(body)
            .map_err(|_| error!(RouterError::MarketUnavailable))?;

        let required = ACCOUNT_FLAG_INITIALIZED | ACCOUNT_FLAG_MARKET;
        if state.account_flags & required != required
            || state.account_flags & ACCOUNT_FLAG_DISABLED != 0
        {
            msg!("Market flags {:#x} do not describe a live market", state.account_flags);
            return err!(RouterError::MarketUnavailable);
        }
        require!(state.coin_lot_size > 0, RouterError::MarketUnavailable);
        Ok(state)
    }

    pub fn own_address(&self) -> Pubkey {
        key_from_words(self.own_address)
    }

    pub fn coin_mint(&self) -> Pubkey {
        key_from_words(self.coin_mint)
    }

    pub fn pc_mint(&self) -> Pubkey {
        key_from_words(self.pc_mint)
    }

    pub fn handles(&self) -> MarketHandles {
        MarketHandles {
            market: self.own_address(),
            request_queue: key_from_words(self.req_q),
            event_queue: key_from_words(self.event_q),
            bids: key_from_words(self.bids),
            asks: key_from_words(self.asks),
            coin_vault: key_from_words(self.coin_vault),
            pc_vault: key_from_words(self.pc_vault),
        }
    }
}
