// Utility functions for the router

use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::error::ErrorCode as RouterError;

/// Convert a native quantity to whole base lots, dropping the remainder
pub fn quantity_to_base_lots(quantity: u64, base_lot_size: u64) -> Result<u64> {
    quantity
        .checked_div(base_lot_size)
        .ok_or_else(|| error!(RouterError::MarketUnavailable))
}

/// Read the current amount of an SPL token account straight from its data.
///
/// Used around CPIs, where a deserialized `Account<TokenAccount>` would be stale.
pub fn token_balance(account: &AccountInfo) -> Result<u64> {
    let data = account.try_borrow_data()?;
    let token_account = TokenAccount::try_deserialize(&mut &data[..])?;
    Ok(token_account.amount)
}

/// Signed change between two balance snapshots
pub fn balance_delta(before: u64, after: u64) -> i128 {
    after as i128 - before as i128
}
