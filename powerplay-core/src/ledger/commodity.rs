use serde::{Deserialize, Serialize};

use crate::event::CommodityMovement;

/// Collected and delivered tonnage of one commodity at one delivery system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommodityEntry {
    pub kind: String,
    pub kind_localised: String,
    pub delivered_to: String,
    pub collected: i64,
    pub delivered: i64,
}

/// PowerPlay commodities keyed by (type, delivery system), plus first-seen indexes of
/// the systems and localised types that received deliveries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommodityLedger {
    entries: Vec<CommodityEntry>,
    delivered_systems: Vec<String>,
    delivered_types: Vec<String>,
}

impl CommodityLedger {
    pub fn record_collected(&mut self, movement: &CommodityMovement, system: &str) {
        self.record(movement, system, movement.count, 0);
    }

    pub fn record_delivered(&mut self, movement: &CommodityMovement, system: &str) {
        self.record(movement, system, 0, movement.count);
    }

    fn record(&mut self, movement: &CommodityMovement, system: &str, collected: i64, delivered: i64) {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.kind == movement.kind && entry.delivered_to == system)
        {
            Some(entry) => {
                entry.collected = entry.collected.saturating_add(collected);
                entry.delivered = entry.delivered.saturating_add(delivered);
            }
            None => self.entries.push(CommodityEntry {
                kind: movement.kind.clone(),
                kind_localised: movement.kind_localised.clone(),
                delivered_to: system.to_string(),
                collected,
                delivered,
            }),
        }

        if delivered > 0 {
            if !self.delivered_systems.iter().any(|known| known == system) {
                log::debug!("commodity delivered to new system {system}");
                self.delivered_systems.push(system.to_string());
            }
            if !self
                .delivered_types
                .iter()
                .any(|known| *known == movement.kind_localised)
            {
                log::debug!("new delivered commodity type {}", movement.kind_localised);
                self.delivered_types.push(movement.kind_localised.clone());
            }
        }
    }

    #[must_use]
    pub fn total_collected(&self) -> i64 {
        self.entries.iter().map(|entry| entry.collected).sum()
    }

    #[must_use]
    pub fn total_delivered(&self) -> i64 {
        self.entries.iter().map(|entry| entry.delivered).sum()
    }

    #[must_use]
    pub fn delivered_to_system(&self, system: &str) -> i64 {
        self.entries
            .iter()
            .filter(|entry| entry.delivered_to == system)
            .map(|entry| entry.delivered)
            .sum()
    }

    #[must_use]
    pub fn delivered_of_type(&self, kind_localised: &str) -> i64 {
        self.entries
            .iter()
            .filter(|entry| entry.kind_localised == kind_localised)
            .map(|entry| entry.delivered)
            .sum()
    }

    #[must_use]
    pub fn delivered_systems(&self) -> &[String] {
        &self.delivered_systems
    }

    #[must_use]
    pub fn delivered_types(&self) -> &[String] {
        &self.delivered_types
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommodityEntry> {
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

    fn supplies(count: i64) -> CommodityMovement {
        CommodityMovement {
            kind: "republicanfieldsupplies".to_string(),
            kind_localised: "Archer's Field Supplies".to_string(),
            count,
        }
    }

    #[test]
    fn entries_keyed_by_type_and_system() {
        let mut ledger = CommodityLedger::default();
        ledger.record_collected(&supplies(52), "Tobala");
        ledger.record_collected(&supplies(8), "Tobala");
        ledger.record_delivered(&supplies(52), "Fusang");
        ledger.record_delivered(&supplies(8), "Fusang");
        assert_eq!(ledger.iter().count(), 2);
        assert_eq!(ledger.total_collected(), 60);
        assert_eq!(ledger.total_delivered(), 60);
        assert_eq!(ledger.delivered_to_system("Fusang"), 60);
        assert_eq!(ledger.delivered_to_system("Tobala"), 0);
        assert_eq!(ledger.delivered_of_type("Archer's Field Supplies"), 60);
    }

    #[test]
    fn side_indexes_only_track_deliveries() {
        let mut ledger = CommodityLedger::default();
        ledger.record_collected(&supplies(10), "Tobala");
        assert!(ledger.delivered_systems().is_empty());
        assert!(ledger.delivered_types().is_empty());

        let data = CommodityMovement {
            kind: "powerpropagandadata".to_string(),
            kind_localised: "Power Political Data".to_string(),
            count: 1,
        };
        ledger.record_delivered(&data, "LP 926-40");
        ledger.record_delivered(&supplies(10), "Fusang");
        ledger.record_delivered(&data, "Fusang");
        assert_eq!(ledger.delivered_systems(), ["LP 926-40", "Fusang"]);
        assert_eq!(
            ledger.delivered_types(),
            ["Power Political Data", "Archer's Field Supplies"]
        );
    }
}
