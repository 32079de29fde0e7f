//! Program-owned vault signer of an order-book market.
//!
//! The dex signs for a market's base and quote vaults with the address
//! `create_program_address([market, nonce_le_bytes], dex_program)`. A nonce is
//! valid when the resulting hash is off the ed25519 curve, so no private key
//! can exist for it.

use anchor_lang::prelude::*;

use crate::common::MAX_VAULT_SIGNER_NONCE;
use crate::error::ErrorCode as RouterError;

/// Vault signer for one specific nonce, or `None` if that nonce lands on the curve.
pub fn vault_authority_for_nonce(market: &Pubkey, nonce: u64, dex_program: &Pubkey) -> Option<Pubkey> {
    Pubkey::create_program_address(&[market.as_ref(), &nonce.to_le_bytes()], dex_program).ok()
}

/// Deterministic search for the first valid vault signer nonce of `market`.
pub fn derive_vault_authority(market: &Pubkey, dex_program: &Pubkey) -> Result<(Pubkey, u64)> {
    search_nonce(MAX_VAULT_SIGNER_NONCE, |nonce| {
        vault_authority_for_nonce(market, nonce, dex_program)
    })
}

fn search_nonce<F>(bound: u64, derive: F) -> Result<(Pubkey, u64)>
where
    F: Fn(u64) -> Option<Pubkey>,
{
    (0..bound)
        .find_map(|nonce| derive(nonce).map(|authority| (authority, nonce)))
        .ok_or_else(|| error!(RouterError::AuthorityDerivationExhausted))
}

/// Re-derive the signer from a recorded nonce and compare it with `expected`.
/// Single attempt, no search.
pub fn verify_vault_authority(
    market: &Pubkey,
    nonce: u64,
    dex_program: &Pubkey,
    expected: &Pubkey,
) -> Result<()> {
    match vault_authority_for_nonce(market, nonce, dex_program) {
        Some(authority) if authority == *expected => Ok(()),
        _ => {
            msg!("Vault authority mismatch for market {} (nonce {})", market, nonce);
            err!(RouterError::VaultAuthorityMismatch)
        }
    }
}
