//! Test doubles: an in-memory token ledger, a price-level order book that
//! settles through it, and a helper modelling the runtime's revert-on-error
//! boundary.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use anchor_lang::error::Error;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_pack::Pack;
use anchor_spl::token::spl_token::state::{Account as SplTokenAccount, AccountState};
use anchor_spl::token::TokenAccount;

use crate::common::Side;
use crate::dex::{
    words_from_key, FeeCollector, Fill, MarketAdapter, MarketHandles, MarketStateV1,
    ACCOUNT_FLAG_INITIALIZED, ACCOUNT_FLAG_MARKET, MARKET_HEAD, MARKET_TAIL,
};
use crate::error::ErrorCode as RouterError;
use crate::instructions::MarketAccounts;
use crate::state::{FeeRate, MarketConfig};
use crate::utils::{balance_delta, quantity_to_base_lots};
use crate::vault_authority::derive_vault_authority;

/// One whole token at 6 decimals
pub const ONE: u64 = 1_000_000;

pub fn key(n: u8) -> Pubkey {
    Pubkey::new_from_array([n; 32])
}

pub fn assert_router_error<T>(result: Result<T>, expected: RouterError) {
    match result {
        Ok(_) => panic!("expected {:?}, got Ok", expected),
        Err(Error::AnchorError(error)) => {
            assert_eq!(error.error_code_number, u32::from(expected), "expected {:?}, got {}", expected, error)
        }
        Err(Error::ProgramError(error)) => panic!("expected {:?}, got {:?}", expected, error),
    }
}

/// Quote native units per base lot, for a whole-token price with both assets at 6 decimals.
pub fn price_per_lot(price: u64, base_lot_size: u64) -> u64 {
    price * base_lot_size
}

/// Resting liquidity of one book, best level first on each side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Depth {
    pub bids: Vec<Level>,
    pub asks: Vec<Level>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LedgerState {
    balances: BTreeMap<Pubkey, u64>,
    // keyed by the book's base vault
    depth: BTreeMap<Pubkey, Depth>,
}

/// Token balances plus the depth of every mock book settling through them.
#[derive(Clone, Default)]
pub struct Ledger(Rc<RefCell<LedgerState>>);

impl Ledger {
    pub fn balance(&self, account: &Pubkey) -> u64 {
        self.0.borrow().balances.get(account).copied().unwrap_or_default()
    }

    pub fn mint_to(&self, account: &Pubkey, amount: u64) {
        *self.0.borrow_mut().balances.entry(*account).or_default() += amount;
    }

    pub fn transfer(&self, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<()> {
        let mut state = self.0.borrow_mut();
        let source = state.balances.entry(*from).or_default();
        *source = source.checked_sub(amount).ok_or(RouterError::InsufficientFunds)?;
        let destination = state.balances.entry(*to).or_default();
        *destination = destination.checked_add(amount).ok_or(RouterError::Overflow)?;
        Ok(())
    }

    /// Balances only, for before/after comparisons
    pub fn snapshot(&self) -> BTreeMap<Pubkey, u64> {
        self.0.borrow().balances.clone()
    }

    pub fn delta(&self, before: &BTreeMap<Pubkey, u64>, account: &Pubkey) -> i128 {
        balance_delta(before.get(account).copied().unwrap_or_default(), self.balance(account))
    }

    pub fn depth(&self, book: &Pubkey) -> Depth {
        self.0.borrow().depth.get(book).cloned().unwrap_or_default()
    }

    fn set_depth(&self, book: Pubkey, depth: Depth) {
        self.0.borrow_mut().depth.insert(book, depth);
    }

    fn checkpoint(&self) -> LedgerState {
        self.0.borrow().clone()
    }

    fn rollback(&self, checkpoint: LedgerState) {
        *self.0.borrow_mut() = checkpoint;
    }
}

/// Run `f` the way the runtime runs an instruction: all of its effects on
/// balances and book depth are discarded when it fails.
pub fn atomically<T>(ledger: &Ledger, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let checkpoint = ledger.checkpoint();
    let result = f();
    if result.is_err() {
        ledger.rollback(checkpoint);
    }
    result
}

/// A trader's token accounts plus the treasury fee vaults they pay into.
pub struct Wallets {
    pub btc: Pubkey,
    pub eth: Pubkey,
    pub usdc: Pubkey,
    pub btc_fees: Pubkey,
    pub usdc_fees: Pubkey,
}

impl Wallets {
    pub fn funded(ledger: &Ledger) -> Self {
        let wallets = Self {
            btc: key(201),
            eth: key(202),
            usdc: key(203),
            btc_fees: key(211),
            usdc_fees: key(213),
        };
        ledger.mint_to(&wallets.btc, 10 * ONE);
        ledger.mint_to(&wallets.eth, 100 * ONE);
        ledger.mint_to(&wallets.usdc, 10_000_000 * ONE);
        wallets
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    /// Quote native units per base lot
    pub price: u64,
    pub lots: u64,
}

impl Level {
    pub fn new(price: u64, lots: u64) -> Self {
        Self { price, lots }
    }
}

/// One market's order book. Taker orders walk the resting levels and settle
/// through the market's own vaults; the depth lives in the ledger so a
/// reverted instruction restores it.
pub struct MockBook {
    ledger: Ledger,
    pub base_lot_size: u64,
    pub base_wallet: Pubkey,
    pub quote_wallet: Pubkey,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub available: bool,
}

impl MockBook {
    pub fn new(
        ledger: &Ledger,
        base_lot_size: u64,
        base_wallet: Pubkey,
        quote_wallet: Pubkey,
        bids: Vec<Level>,
        asks: Vec<Level>,
    ) -> Self {
        // Vaults are keyed off the traded base wallet so two books never share one
        let mut base_vault_bytes = base_wallet.to_bytes();
        base_vault_bytes[0] = 0xB0;
        let mut quote_vault_bytes = base_vault_bytes;
        quote_vault_bytes[0] = 0xB1;
        let book = Self {
            ledger: ledger.clone(),
            base_lot_size,
            base_wallet,
            quote_wallet,
            base_vault: Pubkey::new_from_array(base_vault_bytes),
            quote_vault: Pubkey::new_from_array(quote_vault_bytes),
            available: true,
        };
        // Resting orders are escrowed in the vaults
        let base_escrow: u64 = asks.iter().map(|level| level.lots * base_lot_size).sum();
        let quote_escrow: u64 = bids.iter().map(|level| level.lots * level.price).sum();
        ledger.mint_to(&book.base_vault, base_escrow);
        ledger.mint_to(&book.quote_vault, quote_escrow);
        ledger.set_depth(book.base_vault, Depth { bids, asks });
        book
    }

    pub fn depth(&self) -> Depth {
        self.ledger.depth(&self.base_vault)
    }

    fn sell_base(&mut self, max_lots: u64) -> Result<()> {
        let mut depth = self.depth();
        let (mut remaining, mut filled_lots, mut proceeds) = (max_lots, 0u64, 0u64);
        for level in depth.bids.iter_mut() {
            if remaining == 0 {
                break;
            }
            let take = remaining.min(level.lots);
            level.lots -= take;
            remaining -= take;
            filled_lots += take;
            proceeds += take * level.price;
        }
        self.ledger.set_depth(self.base_vault, depth);
        self.ledger.transfer(&self.base_wallet, &self.base_vault, filled_lots * self.base_lot_size)?;
        self.ledger.transfer(&self.quote_vault, &self.quote_wallet, proceeds)
    }

    fn buy_base(&mut self, max_quote: u64) -> Result<()> {
        let mut depth = self.depth();
        let (mut budget, mut filled_lots, mut cost) = (max_quote, 0u64, 0u64);
        for level in depth.asks.iter_mut() {
            let take = (budget / level.price).min(level.lots);
            if take == 0 {
                break;
            }
            level.lots -= take;
            budget -= take * level.price;
            filled_lots += take;
            cost += take * level.price;
        }
        self.ledger.set_depth(self.base_vault, depth);
        self.ledger.transfer(&self.quote_wallet, &self.quote_vault, cost)?;
        self.ledger.transfer(&self.base_vault, &self.base_wallet, filled_lots * self.base_lot_size)
    }
}

impl MarketAdapter for MockBook {
    fn execute_taker_order(&mut self, side: Side, max_input: u64) -> Result<Fill> {
        require!(self.available, RouterError::MarketUnavailable);
        let base_before = self.ledger.balance(&self.base_wallet);
        let quote_before = self.ledger.balance(&self.quote_wallet);

        match side {
            Side::Ask => {
                let lots = quantity_to_base_lots(max_input, self.base_lot_size)?;
                require!(lots > 0, RouterError::InvalidAmount);
                self.sell_base(lots)?;
            }
            Side::Bid => {
                require!(max_input > 0, RouterError::InvalidAmount);
                self.buy_base(max_input)?;
            }
        }

        Ok(Fill {
            base_delta: balance_delta(base_before, self.ledger.balance(&self.base_wallet)),
            quote_delta: balance_delta(quote_before, self.ledger.balance(&self.quote_wallet)),
        })
    }
}

pub struct LedgerFeeCollector {
    ledger: Ledger,
    source: Pubkey,
    fee_vault: Pubkey,
}

impl LedgerFeeCollector {
    pub fn new(ledger: &Ledger, source: Pubkey, fee_vault: Pubkey) -> Self {
        Self {
            ledger: ledger.clone(),
            source,
            fee_vault,
        }
    }
}

impl FeeCollector for LedgerFeeCollector {
    fn collect(&mut self, amount: u64) -> Result<()> {
        self.ledger.transfer(&self.source, &self.fee_vault, amount)
    }
}

/// A live BTC/USDC market body with distinct handles.
pub fn sample_market_state(market: Pubkey) -> MarketStateV1 {
    MarketStateV1 {
        account_flags: ACCOUNT_FLAG_INITIALIZED | ACCOUNT_FLAG_MARKET,
        own_address: words_from_key(&market),
        vault_signer_nonce: 3,
        coin_mint: words_from_key(&key(101)),
        pc_mint: words_from_key(&key(102)),
        coin_vault: words_from_key(&key(103)),
        coin_deposits_total: 0,
        coin_fees_accrued: 0,
        pc_vault: words_from_key(&key(104)),
        pc_deposits_total: 0,
        pc_fees_accrued: 0,
        pc_dust_threshold: 100,
        req_q: words_from_key(&key(105)),
        event_q: words_from_key(&key(106)),
        bids: words_from_key(&key(107)),
        asks: words_from_key(&key(108)),
        coin_lot_size: 100,
        pc_lot_size: 10,
        fee_rate_bps: 4,
        referrer_rebates_accrued: 0,
    }
}

pub fn encode_market(state: &MarketStateV1) -> Vec<u8> {
    let mut data = MARKET_HEAD.to_vec();
    data.extend_from_slice(bytemuck::bytes_of(state));
    data.extend_from_slice(MARKET_TAIL);
    data
}

pub fn sample_market_config() -> MarketConfig {
    let state = sample_market_state(key(100));
    let handles: MarketHandles = state.handles();
    MarketConfig {
        market: handles.market,
        dex_program: key(99),
        base_mint: state.coin_mint(),
        quote_mint: state.pc_mint(),
        base_vault: handles.coin_vault,
        quote_vault: handles.pc_vault,
        request_queue: handles.request_queue,
        event_queue: handles.event_queue,
        bids: handles.bids,
        asks: handles.asks,
        vault_authority: key(109),
        vault_signer_nonce: state.vault_signer_nonce,
        base_lot_size: state.coin_lot_size,
        taker_fee: FeeRate::default(),
        bump: 255,
    }
}

/// Account fixture living for the rest of the test binary, so it can back
/// `Account`/`UncheckedAccount` wrappers the way the runtime's slice does.
pub fn account_info(key: Pubkey, owner: Pubkey, data: Vec<u8>) -> &'static AccountInfo<'static> {
    let key: &'static Pubkey = Box::leak(Box::new(key));
    let owner: &'static Pubkey = Box::leak(Box::new(owner));
    let lamports: &'static mut u64 = Box::leak(Box::new(1_000_000_000));
    let data: &'static mut [u8] = Box::leak(data.into_boxed_slice());
    Box::leak(Box::new(AccountInfo::new(key, false, true, lamports, data, owner, false, 0)))
}

pub fn token_account_data(mint: Pubkey, owner: Pubkey, amount: u64) -> Vec<u8> {
    let mut data = vec![0u8; SplTokenAccount::LEN];
    let account = SplTokenAccount {
        mint,
        owner,
        amount,
        state: AccountState::Initialized,
        ..SplTokenAccount::default()
    };
    SplTokenAccount::pack(account, &mut data).unwrap();
    data
}

pub fn token_account(address: Pubkey, mint: Pubkey, owner: Pubkey, amount: u64) -> Account<'static, TokenAccount> {
    let info = account_info(address, anchor_spl::token::ID, token_account_data(mint, owner, amount));
    Account::try_from(info).unwrap()
}

pub const DEX_PROGRAM: Pubkey = Pubkey::new_from_array([99; 32]);
pub const TRADER: Pubkey = Pubkey::new_from_array([230; 32]);

/// Live market whose recorded nonce is the first valid one, and the config
/// registering it.
pub fn registered_market() -> (MarketStateV1, MarketConfig) {
    registered_market_for(key(100), key(101))
}

/// Same as `registered_market` for another market trading `base_mint` against
/// the shared quote mint.
pub fn registered_market_for(market: Pubkey, base_mint: Pubkey) -> (MarketStateV1, MarketConfig) {
    let mut state = sample_market_state(market);
    let (vault_authority, nonce) = derive_vault_authority(&market, &DEX_PROGRAM).unwrap();
    state.vault_signer_nonce = nonce;
    state.coin_mint = words_from_key(&base_mint);

    let handles = state.handles();
    let config = MarketConfig {
        market: handles.market,
        dex_program: DEX_PROGRAM,
        base_mint,
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
        taker_fee: FeeRate::default(),
        bump: 255,
    };
    (state, config)
}

/// The accounts a caller passes for `state`, with a funded coin wallet of `coin_mint`.
pub fn market_accounts(state: &MarketStateV1, vault_signer: Pubkey, coin_mint: Pubkey) -> MarketAccounts<'static> {
    let handles = state.handles();
    let dex_owned = |address: Pubkey| UncheckedAccount::try_from(account_info(address, DEX_PROGRAM, vec![]));
    MarketAccounts {
        market: UncheckedAccount::try_from(account_info(handles.market, DEX_PROGRAM, encode_market(state))),
        request_queue: dex_owned(handles.request_queue),
        event_queue: dex_owned(handles.event_queue),
        bids: dex_owned(handles.bids),
        asks: dex_owned(handles.asks),
        coin_vault: dex_owned(handles.coin_vault),
        pc_vault: dex_owned(handles.pc_vault),
        vault_signer: dex_owned(vault_signer),
        coin_wallet: Box::new(token_account(key(201), coin_mint, TRADER, 10 * ONE)),
    }
}

/// Rewrite the live market account behind `accounts`, as the dex would.
pub fn overwrite_market(accounts: &MarketAccounts, state: &MarketStateV1) {
    let info = accounts.market.to_account_info();
    let mut data = info.try_borrow_mut_data().unwrap();
    data.copy_from_slice(&encode_market(state));
}
