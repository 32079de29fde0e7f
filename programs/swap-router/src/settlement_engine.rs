use anchor_lang::prelude::*;

use crate::common::Side;
use crate::dex::{FeeCollector, MarketAdapter};
use crate::error::ErrorCode as RouterError;
use crate::state::{FeeRate, MarketConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapStage {
    Requested,
    OrderSubmitted,
    Settled,
    FeeApplied,
    Committed,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStage {
    Requested,
    LegASettled,
    LegBSettled,
    Committed,
    Aborted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapOutcome {
    /// Input actually sold, never above the requested amount
    pub amount_in: u64,
    pub gross_amount_out: u64,
    pub fee: u64,
    /// `gross_amount_out - fee`, what the caller keeps
    pub amount_out: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitiveOutcome {
    pub leg_a: SwapOutcome,
    pub leg_b: SwapOutcome,
    /// Pivot left in the caller's wallet by lot-size rounding on leg B
    pub pivot_spill: u64,
}

/// One taker swap against one market.
///
/// The engine only decides whether the swap may commit. Every failure is
/// returned as an error and the runtime discards the whole instruction, so no
/// step is ever compensated by hand.
#[derive(Debug, Clone, Copy)]
pub struct SingleHopSwap {
    pub side: Side,
    pub amount_in: u64,
    pub min_amount_out: u64,
    pub fee_rate: FeeRate,
}

impl SingleHopSwap {
    pub fn execute<A, F>(&self, market: &mut A, fees: &mut F) -> Result<SwapOutcome>
    where
        A: MarketAdapter + ?Sized,
        F: FeeCollector + ?Sized,
    {
        let mut stage = SwapStage::Requested;
        let result = self.drive(market, fees, &mut stage);
        match &result {
            Ok(outcome) => {
                stage = SwapStage::Committed;
                msg!(
                    "Swap {:?}: in {}, gross out {}, fee {}, net out {}",
                    stage,
                    outcome.amount_in,
                    outcome.gross_amount_out,
                    outcome.fee,
                    outcome.amount_out
                );
            }
            Err(error) => {
                msg!("Swap {:?} after {:?}: {}", SwapStage::Aborted, stage, error);
            }
        }
        result
    }

    fn drive<A, F>(&self, market: &mut A, fees: &mut F, stage: &mut SwapStage) -> Result<SwapOutcome>
    where
        A: MarketAdapter + ?Sized,
        F: FeeCollector + ?Sized,
    {
        require!(self.amount_in > 0, RouterError::InvalidAmount);

        *stage = SwapStage::OrderSubmitted;
        let fill = market.execute_taker_order(self.side, self.amount_in)?;
        let (spent, gross) = fill.legs(self.side)?;
        require!(spent <= self.amount_in, RouterError::InputExceedsMaximum);
        require!(gross > 0, RouterError::ZeroOutput);

        *stage = SwapStage::Settled;
        let fee = self.fee_rate.fee_on(gross)?;
        if fee > 0 {
            fees.collect(fee)?;
        }
        let net = gross.checked_sub(fee).ok_or(RouterError::Overflow)?;

        *stage = SwapStage::FeeApplied;
        if net < self.min_amount_out {
            msg!("Net output {} below minimum {}", net, self.min_amount_out);
            return err!(RouterError::MinimumOutputNotMet);
        }

        Ok(SwapOutcome {
            amount_in: spent,
            gross_amount_out: gross,
            fee,
            amount_out: net,
        })
    }
}

/// Sell the source base on `from` for the pivot quote, then buy the
/// destination base on `to` with the pivot received. Only the final output is
/// guarded by the caller's minimum.
#[derive(Debug, Clone, Copy)]
pub struct TransitiveSwap {
    pub amount_in: u64,
    pub min_amount_out: u64,
    pub from_fee_rate: FeeRate,
    pub to_fee_rate: FeeRate,
}

impl TransitiveSwap {
    pub fn execute<A, FA, B, FB>(
        &self,
        from: &mut A,
        from_fees: &mut FA,
        to: &mut B,
        to_fees: &mut FB,
    ) -> Result<TransitiveOutcome>
    where
        A: MarketAdapter + ?Sized,
        FA: FeeCollector + ?Sized,
        B: MarketAdapter + ?Sized,
        FB: FeeCollector + ?Sized,
    {
        let mut stage = RouteStage::Requested;
        let result = self.drive(from, from_fees, to, to_fees, &mut stage);
        match &result {
            Ok(outcome) => {
                stage = RouteStage::Committed;
                msg!(
                    "Route {:?}: in {}, pivot {}, spill {}, net out {}",
                    stage,
                    outcome.leg_a.amount_in,
                    outcome.leg_a.amount_out,
                    outcome.pivot_spill,
                    outcome.leg_b.amount_out
                );
            }
            Err(error) => {
                msg!("Route {:?} after {:?}: {}", RouteStage::Aborted, stage, error);
            }
        }
        result
    }

    fn drive<A, FA, B, FB>(
        &self,
        from: &mut A,
        from_fees: &mut FA,
        to: &mut B,
        to_fees: &mut FB,
        stage: &mut RouteStage,
    ) -> Result<TransitiveOutcome>
    where
        A: MarketAdapter + ?Sized,
        FA: FeeCollector + ?Sized,
        B: MarketAdapter + ?Sized,
        FB: FeeCollector + ?Sized,
    {
        let leg_a = SingleHopSwap {
            side: Side::Ask,
            amount_in: self.amount_in,
            min_amount_out: 0,
            fee_rate: self.from_fee_rate,
        }
        .execute(from, from_fees)?;
        *stage = RouteStage::LegASettled;

        let leg_b = SingleHopSwap {
            side: Side::Bid,
            amount_in: leg_a.amount_out,
            min_amount_out: self.min_amount_out,
            fee_rate: self.to_fee_rate,
        }
        .execute(to, to_fees)?;
        *stage = RouteStage::LegBSettled;

        let pivot_spill = leg_a
            .amount_out
            .checked_sub(leg_b.amount_in)
            .ok_or(RouterError::InputExceedsMaximum)?;

        Ok(TransitiveOutcome {
            leg_a,
            leg_b,
            pivot_spill,
        })
    }
}

/// Both markets must be distinct, trade distinct bases, and share the pivot quote.
pub fn check_route(from: &MarketConfig, to: &MarketConfig) -> Result<()> {
    require_keys_eq!(from.quote_mint, to.quote_mint, RouterError::RouteAssetMismatch);
    require_keys_neq!(from.market, to.market, RouterError::RouteAssetMismatch);
    require_keys_neq!(from.base_mint, to.base_mint, RouterError::RouteAssetMismatch);
    Ok(())
}
