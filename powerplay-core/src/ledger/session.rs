use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ActivityLedger, CommodityLedger, MinedCommodityLedger};

/// Progress between two session boundaries (dock or death).
///
/// Power, rank and the commodity, mined and activity ledgers run across boundaries;
/// only `earned_merits` restarts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionLedger {
    pub earned_merits: i64,
    pub power: String,
    pub rank: u32,
    pub commodities: CommodityLedger,
    pub mined: MinedCommodityLedger,
    pub activities: ActivityLedger,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

impl SessionLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The session that follows this one across a boundary.
    #[must_use]
    pub fn carry_forward(&self, started_at: Option<DateTime<Utc>>) -> Self {
        Self {
            earned_merits: 0,
            started_at,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn has_power(&self) -> bool {
        !self.power.is_empty()
    }

    /// Clear accumulated progress, keeping power and rank.
    pub fn clear_progress(&mut self) {
        self.earned_merits = 0;
        self.commodities = CommodityLedger::default();
        self.mined = MinedCommodityLedger::default();
        self.activities = ActivityLedger::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ActivityCategory;

    #[test]
    fn carry_forward_keeps_ledgers() {
        let mut session = SessionLedger::new();
        session.power = "Jerome Archer".to_string();
        session.rank = 149;
        session.earned_merits = 88;
        session.activities.add(ActivityCategory::Bounty, 88);
        session.mined.record("Gold", 10, 5);

        let next = session.carry_forward(None);
        assert_eq!(next.earned_merits, 0);
        assert_eq!(next.power, session.power);
        assert_eq!(next.rank, 149);
        assert_eq!(next.activities, session.activities);
        assert_eq!(next.mined, session.mined);

        let mut detached = next;
        detached.activities.add(ActivityCategory::Bounty, 1);
        assert_eq!(session.activities.get(ActivityCategory::Bounty), 88);
    }

    #[test]
    fn clear_progress_keeps_identity() {
        let mut session = SessionLedger::new();
        session.power = "Yuri Grom".to_string();
        session.rank = 12;
        session.earned_merits = 300;
        session.activities.add(ActivityCategory::Unknown, 300);
        session.clear_progress();
        assert_eq!(session.earned_merits, 0);
        assert_eq!(session.activities.total(), 0);
        assert!(session.has_power());
        assert_eq!(session.rank, 12);
    }
}
