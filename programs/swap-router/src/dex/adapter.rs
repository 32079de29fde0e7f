use anchor_lang::prelude::*;
use anchor_lang::solana_program::program::invoke;
use anchor_spl::token::{self, Transfer};

use crate::common::Side;
use crate::dex::instruction::{send_take, SendTakeArgs, SendTakeKeys};
use crate::error::ErrorCode as RouterError;
use crate::utils::{balance_delta, quantity_to_base_lots, token_balance};

/// Signed change of the caller's wallets produced by one taker order.
/// Negative means sold, positive means bought.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fill {
    pub base_delta: i128,
    pub quote_delta: i128,
}

impl Fill {
    /// `(spent input, received output)` of a taker order on `side`.
    pub fn legs(&self, side: Side) -> Result<(u64, u64)> {
        let (input_delta, output_delta) = match side {
            Side::Ask => (self.base_delta, self.quote_delta),
            Side::Bid => (self.quote_delta, self.base_delta),
        };
        if input_delta > 0 || output_delta < 0 {
            msg!("Settlement moved funds the wrong way: {:?}", self);
            return err!(RouterError::MarketUnavailable);
        }
        let spent = u64::try_from(-input_delta).map_err(|_| error!(RouterError::Overflow))?;
        let received = u64::try_from(output_delta).map_err(|_| error!(RouterError::Overflow))?;
        Ok((spent, received))
    }
}

/// One external order-book market, seen from the taker side.
pub trait MarketAdapter {
    /// Submit an immediate-or-cancel taker order for at most `max_input` of the
    /// sold asset and settle the proceeds into the caller's wallets.
    fn execute_taker_order(&mut self, side: Side, max_input: u64) -> Result<Fill>;
}

/// Destination of the router's protocol fee for one output asset.
pub trait FeeCollector {
    fn collect(&mut self, amount: u64) -> Result<()>;
}

/// `SendTake` CPI client for one market.
#[derive(Clone)]
pub struct OrderbookClient<'info> {
    pub market: AccountInfo<'info>,
    pub request_queue: AccountInfo<'info>,
    pub event_queue: AccountInfo<'info>,
    pub bids: AccountInfo<'info>,
    pub asks: AccountInfo<'info>,
    pub coin_vault: AccountInfo<'info>,
    pub pc_vault: AccountInfo<'info>,
    pub vault_signer: AccountInfo<'info>,
    pub coin_wallet: AccountInfo<'info>,
    pub pc_wallet: AccountInfo<'info>,
    pub wallet_owner: AccountInfo<'info>,
    pub dex_program: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    pub base_lot_size: u64,
}

impl<'info> OrderbookClient<'info> {
    fn keys(&self) -> SendTakeKeys {
        SendTakeKeys {
            market: self.market.key(),
            request_queue: self.request_queue.key(),
            event_queue: self.event_queue.key(),
            bids: self.bids.key(),
            asks: self.asks.key(),
            coin_wallet: self.coin_wallet.key(),
            pc_wallet: self.pc_wallet.key(),
            wallet_owner: self.wallet_owner.key(),
            coin_vault: self.coin_vault.key(),
            pc_vault: self.pc_vault.key(),
            token_program: self.token_program.key(),
            vault_signer: self.vault_signer.key(),
        }
    }

    fn order_args(&self, side: Side, max_input: u64) -> Result<SendTakeArgs> {
        let args = match side {
            Side::Ask => SendTakeArgs::ask(quantity_to_base_lots(max_input, self.base_lot_size)?),
            Side::Bid => SendTakeArgs::bid(max_input),
        };
        args.validate()?;
        Ok(args)
    }
}

impl<'info> MarketAdapter for OrderbookClient<'info> {
    fn execute_taker_order(&mut self, side: Side, max_input: u64) -> Result<Fill> {
        let args = self.order_args(side, max_input)?;
        let ix = send_take(self.dex_program.key, &self.keys(), &args)?;

        let base_before = token_balance(&self.coin_wallet)?;
        let quote_before = token_balance(&self.pc_wallet)?;

        msg!(
            "SendTake CPI: side: {:?}, limit_price: {}, max_coin_qty: {}, max_native_pc_qty_including_fees: {}, limit: {}",
            args.side,
            args.limit_price,
            args.max_coin_qty,
            args.max_native_pc_qty_including_fees,
            args.limit
        );
        invoke(
            &ix,
            &[
                self.market.clone(),
                self.request_queue.clone(),
                self.event_queue.clone(),
                self.bids.clone(),
                self.asks.clone(),
                self.coin_wallet.clone(),
                self.pc_wallet.clone(),
                self.wallet_owner.clone(),
                self.coin_vault.clone(),
                self.pc_vault.clone(),
                self.token_program.clone(),
                self.vault_signer.clone(),
                self.dex_program.clone(),
            ],
        )?;

        let base_after = token_balance(&self.coin_wallet)?;
        let quote_after = token_balance(&self.pc_wallet)?;
        Ok(Fill {
            base_delta: balance_delta(base_before, base_after),
            quote_delta: balance_delta(quote_before, quote_after),
        })
    }
}

/// Moves the fee out of the caller's output wallet into a treasury fee vault.
pub struct TokenFeeCollector<'info> {
    pub source: AccountInfo<'info>,
    pub fee_vault: AccountInfo<'info>,
    pub authority: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
}

impl<'info> FeeCollector for TokenFeeCollector<'info> {
    fn collect(&mut self, amount: u64) -> Result<()> {
        let cpi_accounts = Transfer {
            from: self.source.clone(),
            to: self.fee_vault.clone(),
            authority: self.authority.clone(),
        };
        let cpi_ctx = CpiContext::new(self.token_program.clone(), cpi_accounts);
        token::transfer(cpi_ctx, amount)
    }
}
