use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Wallet or fee vault mint does not match the market")]
    AssetMismatch,
    #[msg("Route markets must be distinct and share the same quote mint")]
    RouteAssetMismatch,
    #[msg("Vault signer does not match the market's derived authority")]
    VaultAuthorityMismatch,
    #[msg("No valid vault signer nonce found for the market")]
    AuthorityDerivationExhausted,
    #[msg("Market accounts are stale, disabled or do not match the registered market")]
    MarketUnavailable,
    #[msg("Swap output is less than the minimum amount out")]
    MinimumOutputNotMet,
    #[msg("Signer is not the router owner")]
    NotOwner,
    #[msg("Router is already initialized")]
    AlreadyInitialized,
    #[msg("Invalid amount")]
    InvalidAmount,
    #[msg("Insufficient funds in the selling wallet")]
    InsufficientFunds,
    #[msg("Swap spent more than the maximum input amount")]
    InputExceedsMaximum,
    #[msg("No token is received from the swap")]
    ZeroOutput,
    #[msg("Invalid fee rate")]
    InvalidFeeRate,
    #[msg("Overflow")]
    Overflow,
}
