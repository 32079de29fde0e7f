use anchor_lang::prelude::*;

use crate::error::ErrorCode as RouterError;

/// Process-wide router record: the owner gating admin instructions and the
/// treasury bump used to sign fee withdrawals.
#[account]
#[derive(Debug)]
pub struct RouterState {
    pub owner: Pubkey,
    pub treasury_bump: u8,
    pub bump: u8,
    pub is_initialized: bool,
}

impl RouterState {
    pub const LEN: usize = 8 + // discriminator
        32 + // owner
        1 + // treasury_bump
        1 + // bump
        1; // is_initialized

    /// Record the owner once. A second call fails and leaves the record untouched.
    pub fn initialize(&mut self, owner: Pubkey, treasury_bump: u8, bump: u8) -> Result<()> {
        require!(!self.is_initialized, RouterError::AlreadyInitialized);
        self.owner = owner;
        self.treasury_bump = treasury_bump;
        self.bump = bump;
        self.is_initialized = true;
        Ok(())
    }

    pub fn authorize(&self, caller: &Pubkey) -> Result<()> {
        require!(self.is_initialized, RouterError::NotOwner);
        require_keys_eq!(*caller, self.owner, RouterError::NotOwner);
        Ok(())
    }
}
