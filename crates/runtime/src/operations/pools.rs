//! Pools family: read-only view of the contract's fund pools.

use strum::IntoEnumIterator;

use client_ledger_core::PoolBalances;
use game_core::{
    OperationKind, PoolEntry, PoolKind, PoolsData, can_view_pools, format_amount,
};

use super::lifecycle::{Completion, now_ms};
use super::OperationContext;
use crate::api::Result;
use crate::config::CurrencyConfig;
use crate::events::DomainEvent;

pub struct PoolsOperations {
    ctx: OperationContext,
}

impl PoolsOperations {
    pub(crate) fn new(ctx: OperationContext) -> Self {
        Self { ctx }
    }

    /// Reads all pool balances and caches the formatted view.
    pub async fn load_pools(&self) -> Result<PoolsData> {
        self.ctx.store.with_state(can_view_pools)?;

        let tracker = self
            .ctx
            .begin(OperationKind::LoadPools, "Loading pools...", can_view_pools)?;
        let currency = &self.ctx.config.currency;
        let read = async {
            self.ctx
                .ledger
                .get_pool_balances()
                .await
                .map(|balances| pools_view(&balances, currency, now_ms()))
        };

        tracker
            .run(read, |pools| {
                self.ctx.store.set_pools(Some(pools.clone()));
                self.ctx.bus.emit(DomainEvent::PoolsUpdated {
                    pools: pools.clone(),
                });
                Completion::read("Pools loaded")
            })
            .await
    }
}

fn balance(balances: &PoolBalances, kind: PoolKind) -> u128 {
    match kind {
        PoolKind::Prize => balances.prize,
        PoolKind::Equipment => balances.equipment,
        PoolKind::GasRefund => balances.gas_refund,
        PoolKind::Developer => balances.developer,
        PoolKind::NextEpoch => balances.next_epoch,
        PoolKind::Emergency => balances.emergency,
    }
}

/// Builds the pools view; percentages are integer shares of the total.
pub(crate) fn pools_view(
    balances: &PoolBalances,
    currency: &CurrencyConfig,
    last_updated: u64,
) -> PoolsData {
    let total_value: u128 = PoolKind::iter().map(|kind| balance(balances, kind)).sum();

    let entries = PoolKind::iter()
        .map(|kind| {
            let value = balance(balances, kind);
            let percentage = if total_value == 0 {
                0
            } else {
                u8::try_from(value * 100 / total_value).unwrap_or(100)
            };
            PoolEntry {
                kind,
                value,
                formatted: format_amount(value, currency.decimals, &currency.symbol),
                description: kind.description().to_string(),
                percentage,
            }
        })
        .collect();

    PoolsData {
        entries,
        total_value,
        last_updated,
    }
}
