use serde::{Deserialize, Serialize};

use crate::classifier::ActivityCategory;

/// Running merit total per activity category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLedger {
    buckets: [i64; ActivityCategory::COUNT],
}

impl ActivityLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn get(&self, category: ActivityCategory) -> i64 {
        self.buckets[category.index()]
    }

    pub const fn add(&mut self, category: ActivityCategory, merits: i64) {
        let bucket = &mut self.buckets[category.index()];
        *bucket = bucket.saturating_add(merits);
    }

    /// Move up to `merits` from one bucket to another, never taking `from` below zero.
    /// Returns the amount actually moved.
    pub fn transfer(&mut self, from: ActivityCategory, to: ActivityCategory, merits: i64) -> i64 {
        let moved = merits.min(self.get(from).max(0)).max(0);
        self.buckets[from.index()] -= moved;
        self.buckets[to.index()] = self.buckets[to.index()].saturating_add(moved);
        moved
    }

    /// Sum across every bucket.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.buckets
            .iter()
            .fold(0_i64, |sum, merits| sum.saturating_add(*merits))
    }

    /// Categories holding merits, in display order.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (ActivityCategory, i64)> + '_ {
        ActivityCategory::ALL
            .iter()
            .map(|category| (*category, self.get(*category)))
            .filter(|(_, merits)| *merits != 0)
    }
}

/// Merits and tonnage attributed to one mined commodity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinedCommodity {
    pub commodity: String,
    pub merits: i64,
    pub tonnage: i64,
}

/// Mined sales keyed by commodity type, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinedCommodityLedger {
    entries: Vec<MinedCommodity>,
}

impl MinedCommodityLedger {
    pub fn record(&mut self, commodity: &str, merits: i64, tonnage: i64) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.commodity == commodity)
        {
            entry.merits = entry.merits.saturating_add(merits);
            entry.tonnage = entry.tonnage.saturating_add(tonnage);
            return;
        }
        log::debug!("first mined sale of {commodity}");
        self.entries.push(MinedCommodity {
            commodity: commodity.to_string(),
            merits,
            tonnage,
        });
    }

    #[must_use]
    pub fn get(&self, commodity: &str) -> Option<&MinedCommodity> {
        self.entries.iter().find(|entry| entry.commodity == commodity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MinedCommodity> {
        self.entries.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_conserves_and_clamps() {
        let mut ledger = ActivityLedger::new();
        ledger.add(ActivityCategory::Unknown, 30);
        ledger.add(ActivityCategory::Bounty, 12);
        assert_eq!(
            ledger.transfer(ActivityCategory::Unknown, ActivityCategory::Cartography, 20),
            20
        );
        assert_eq!(ledger.get(ActivityCategory::Unknown), 10);
        assert_eq!(ledger.get(ActivityCategory::Cartography), 20);
        assert_eq!(
            ledger.transfer(ActivityCategory::Unknown, ActivityCategory::Cartography, 50),
            10
        );
        assert_eq!(ledger.get(ActivityCategory::Unknown), 0);
        assert_eq!(ledger.total(), 42);
    }

    #[test]
    fn nonzero_iteration_in_display_order() {
        let mut ledger = ActivityLedger::new();
        ledger.add(ActivityCategory::Mined, 46);
        ledger.add(ActivityCategory::ShipScan, 10);
        let seen: Vec<_> = ledger.iter_nonzero().collect();
        assert_eq!(
            seen,
            vec![
                (ActivityCategory::ShipScan, 10),
                (ActivityCategory::Mined, 46)
            ]
        );
    }

    #[test]
    fn mined_entries_accumulate() {
        let mut mined = MinedCommodityLedger::default();
        assert!(mined.is_empty());
        mined.record("Gold", 46, 50);
        mined.record("Painite", 120, 10);
        mined.record("Gold", 4, 8);
        let gold = mined.get("Gold").expect("gold entry");
        assert_eq!((gold.merits, gold.tonnage), (50, 58));
        assert_eq!(mined.iter().count(), 2);
    }
}
