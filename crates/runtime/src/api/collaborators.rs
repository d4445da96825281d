//! Host-side collaborators: reward delivery and narrative routing.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use combat_core::{RewardGrant, RewardSink, RoutingSignal};

/// Receives the node the story should resume at.
pub trait NarrativeRouter: Send {
    fn route(&mut self, signal: &RoutingSignal);
}

/// Router that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingRouter;

impl NarrativeRouter for LoggingRouter {
    fn route(&mut self, signal: &RoutingSignal) {
        tracing::info!(
            encounter = %signal.encounter,
            result = %signal.result,
            node = %signal.node,
            "routing after combat"
        );
    }
}

/// Shared record of routing signals. Clones observe the same list.
#[derive(Debug, Clone, Default)]
pub struct RouteLog {
    signals: Arc<Mutex<Vec<RoutingSignal>>>,
}

impl RouteLog {
    pub fn signals(&self) -> Vec<RoutingSignal> {
        self.signals.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl NarrativeRouter for RouteLog {
    fn route(&mut self, signal: &RoutingSignal) {
        if let Ok(mut signals) = self.signals.lock() {
            signals.push(signal.clone());
        }
    }
}

/// Accumulated party rewards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerTotals {
    pub grants: u32,
    pub experience: u64,
    pub currency: u64,
    pub skill_points: u32,
    pub items: BTreeMap<String, u32>,
}

/// Shared reward ledger. Clones observe the same totals.
#[derive(Debug, Clone, Default)]
pub struct RewardLedger {
    totals: Arc<Mutex<LedgerTotals>>,
}

impl RewardLedger {
    pub fn totals(&self) -> LedgerTotals {
        self.totals.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

impl RewardSink for RewardLedger {
    fn grant(&mut self, rewards: &RewardGrant) {
        let Ok(mut totals) = self.totals.lock() else {
            tracing::error!("reward ledger poisoned; dropping grant");
            return;
        };
        totals.grants += 1;
        totals.experience += u64::from(rewards.experience);
        totals.currency += u64::from(rewards.currency);
        totals.skill_points += rewards.skill_points;
        for item in &rewards.items {
            *totals.items.entry(item.item.clone()).or_default() += item.quantity;
        }
        tracing::info!(
            experience = rewards.experience,
            currency = rewards.currency,
            items = rewards.items.len(),
            "rewards granted"
        );
    }
}

#[cfg(test)]
mod tests {
    use combat_core::ItemGrant;

    use super::*;

    #[test]
    fn ledger_accumulates_across_clones() {
        let ledger = RewardLedger::default();
        let mut sink = ledger.clone();
        let grant = RewardGrant {
            experience: 10,
            currency: 3,
            items: vec![ItemGrant {
                item: "herb".into(),
                quantity: 2,
            }],
            skill_points: 1,
        };
        sink.grant(&grant);
        sink.grant(&grant);

        let totals = ledger.totals();
        assert_eq!(totals.grants, 2);
        assert_eq!(totals.experience, 20);
        assert_eq!(totals.items.get("herb"), Some(&4));
    }
}
