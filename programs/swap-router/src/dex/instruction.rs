use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};

use crate::common::{Side, SEND_TAKE_MATCH_LIMIT};
use crate::error::ErrorCode as RouterError;

pub const INSTRUCTION_VERSION: u8 = 0;
pub const SEND_TAKE_TAG: u32 = 13;
pub const SEND_TAKE_DATA_LEN: usize = 1 + 4 + 4 + 8 * 5 + 2;

/// Arguments of the dex `SendTake` instruction: an immediate-or-cancel taker
/// order that settles straight into the caller's wallets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendTakeArgs {
    pub side: Side,
    pub limit_price: u64,
    pub max_coin_qty: u64,
    pub max_native_pc_qty_including_fees: u64,
    pub min_coin_qty: u64,
    pub min_native_pc_qty: u64,
    pub limit: u16,
}

impl SendTakeArgs {
    /// Sell up to `max_coin_lots` base lots at any price.
    pub fn ask(max_coin_lots: u64) -> Self {
        Self {
            side: Side::Ask,
            limit_price: 1,
            max_coin_qty: max_coin_lots,
            max_native_pc_qty_including_fees: u64::MAX,
            min_coin_qty: 0,
            min_native_pc_qty: 0,
            limit: SEND_TAKE_MATCH_LIMIT,
        }
    }

    /// Spend up to `max_pc_amount` native quote at any price.
    pub fn bid(max_pc_amount: u64) -> Self {
        Self {
            side: Side::Bid,
            limit_price: u64::MAX,
            max_coin_qty: u64::MAX,
            max_native_pc_qty_including_fees: max_pc_amount,
            min_coin_qty: 0,
            min_native_pc_qty: 0,
            limit: SEND_TAKE_MATCH_LIMIT,
        }
    }

    /// The dex rejects zero prices and zero maxima.
    pub fn validate(&self) -> Result<()> {
        require!(self.limit_price > 0, RouterError::InvalidAmount);
        require!(self.max_coin_qty > 0, RouterError::InvalidAmount);
        require!(self.max_native_pc_qty_including_fees > 0, RouterError::InvalidAmount);
        Ok(())
    }

    pub fn pack(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(SEND_TAKE_DATA_LEN);
        data.push(INSTRUCTION_VERSION);
        data.extend_from_slice(&SEND_TAKE_TAG.to_le_bytes());
        data.extend_from_slice(&self.side.as_dex_u32().to_le_bytes());
        data.extend_from_slice(&self.limit_price.to_le_bytes());
        data.extend_from_slice(&self.max_coin_qty.to_le_bytes());
        data.extend_from_slice(&self.max_native_pc_qty_including_fees.to_le_bytes());
        data.extend_from_slice(&self.min_coin_qty.to_le_bytes());
        data.extend_from_slice(&self.min_native_pc_qty.to_le_bytes());
        data.extend_from_slice(&self.limit.to_le_bytes());
        data
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SendTakeKeys {
    pub market: Pubkey,
    pub request_queue: Pubkey,
    pub event_queue: Pubkey,
    pub bids: Pubkey,
    pub asks: Pubkey,
    pub coin_wallet: Pubkey,
    pub pc_wallet: Pubkey,
    pub wallet_owner: Pubkey,
    pub coin_vault: Pubkey,
    pub pc_vault: Pubkey,
    pub token_program: Pubkey,
    pub vault_signer: Pubkey,
}

pub fn send_take(dex_program: &Pubkey, keys: &SendTakeKeys, args: &SendTakeArgs) -> Result<Instruction> {
    args.validate()?;
    Ok(Instruction {
        program_id: *dex_program,
        accounts: vec![
            AccountMeta::new(keys.market, false),
            AccountMeta::new(keys.request_queue, false),
            AccountMeta::new(keys.event_queue, false),
            AccountMeta::new(keys.bids, false),
            AccountMeta::new(keys.asks, false),
            AccountMeta::new(keys.coin_wallet, false),
            AccountMeta::new(keys.pc_wallet, false),
            AccountMeta::new_readonly(keys.wallet_owner, true),
            AccountMeta::new(keys.coin_vault, false),
            AccountMeta::new(keys.pc_vault, false),
            AccountMeta::new_readonly(keys.token_program, false),
            AccountMeta::new_readonly(keys.vault_signer, false),
        ],
        data: args.pack(),
    })
}
