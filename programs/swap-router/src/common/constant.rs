pub const ROUTER_STATE_SEED: &[u8] = b"router_state";
pub const TREASURY_SEED: &[u8] = b"treasury";
pub const MARKET_CONFIG_SEED: &[u8] = b"market_config";

/// Upper bound (exclusive) of the vault signer nonce search.
pub const MAX_VAULT_SIGNER_NONCE: u64 = 256;

/// Taker fee charged by the reference order-book deployment: 4 bps.
pub const DEFAULT_TAKER_FEE_NUMERATOR: u64 = 4;
pub const DEFAULT_TAKER_FEE_DENOMINATOR: u64 = 10_000;

/// Matching cycles the dex may spend on one `SendTake` before cancelling the rest.
pub const SEND_TAKE_MATCH_LIMIT: u16 = 65_535;
