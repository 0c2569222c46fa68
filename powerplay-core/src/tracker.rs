//! Event dispatcher folding journal records into the progress ledgers.
//!
//! Every record is offered to the history window first; the tracker then applies the
//! transition for its event type, consulting the classifier for merit awards. Batch
//! cartography sales are settled a fixed number of events later, and donation awards
//! whose mission completes afterwards are moved out of `Unknown` retroactively.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::{
    ActivityCategory, ActivityClassifier, is_donation_merits_second, sum_batch_merits,
};
use crate::constants::{
    BATCH_CARTOGRAPHY_DEFERRAL, EXCLUDED_COLLECT_TYPE, POWER_MICRO_RESOURCE_PREFIX,
};
use crate::event::{Event, EventKind};
use crate::history::{Admission, SlidingEventHistory};
use crate::ledger::{SessionLedger, SystemLedger, SystemLedgers};
use crate::numbers::{i64_to_f64, non_negative_u64, round_hundredths, u64_to_f64};
use crate::rank::{next_rank_delta, rank, rank_lower_bound};

/// What handling one event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOutcome {
    pub admission: Admission,
    /// A ledger was mutated; presentation should redraw.
    pub changed: bool,
    /// Activity credited by this event, if any.
    pub category: Option<ActivityCategory>,
}

impl EventOutcome {
    const fn unchanged(admission: Admission) -> Self {
        Self {
            admission,
            changed: false,
            category: None,
        }
    }
}

/// Read-only copy of everything the tracker exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub total_merits: i64,
    pub starting_merits: i64,
    pub merits_this_session: i64,
    pub rank: u32,
    pub rank_progress_percent: f64,
    pub current_session: SessionLedger,
    pub previous_session: Option<SessionLedger>,
    pub systems: Vec<SystemLedger>,
}

/// Single-writer aggregator over one journal stream.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    history: SlidingEventHistory,
    classifier: ActivityClassifier,
    current: SessionLedger,
    previous: Option<SessionLedger>,
    systems: SystemLedgers,
    pending_earnings: i64,
    total_merits: i64,
    starting_merits: i64,
    last_award: i64,
    batch_deferral: Option<u8>,
}

impl ProgressTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_classifier(classifier: ActivityClassifier) -> Self {
        Self {
            classifier,
            ..Self::default()
        }
    }

    /// Process one record. `system` is the host's current star system name.
    pub fn handle(&mut self, event: &Event, system: &str) -> EventOutcome {
        let admission = self.history.push(event.clone());
        if admission == Admission::Duplicate {
            return EventOutcome::unchanged(admission);
        }

        let settled = self.advance_batch_deferral();
        let mut outcome = self.apply(event, system, admission);
        outcome.changed |= settled;
        outcome
    }

    /// Step the batch cartography countdown; `true` when merits were moved.
    fn advance_batch_deferral(&mut self) -> bool {
        let Some(remaining) = self.batch_deferral else {
            return false;
        };
        let remaining = remaining.saturating_sub(1);
        if remaining > 0 {
            self.batch_deferral = Some(remaining);
            return false;
        }
        self.batch_deferral = None;
        let batch = sum_batch_merits(&self.history, &EventKind::MultiSellExplorationData);
        if batch <= 0 {
            log::debug!("batch cartography sale settled with no isolated merits");
            return false;
        }
        let moved = self.current.activities.transfer(
            ActivityCategory::Unknown,
            ActivityCategory::Cartography,
            batch,
        );
        log::debug!("batch cartography sale settled: {batch} merits, {moved} moved from unknown");
        moved > 0
    }

    fn apply(&mut self, event: &Event, system: &str, admission: Admission) -> EventOutcome {
        let mut outcome = EventOutcome::unchanged(admission);
        match event.kind {
            EventKind::Location => outcome.changed = self.on_location(event, system, true),
            EventKind::FsdJump => outcome.changed = self.on_location(event, system, false),
            EventKind::Docked | EventKind::Died => {
                self.start_new_session(event.timestamp);
                outcome.changed = true;
            }
            EventKind::PowerplayCollect => {
                let movement = event.commodity_movement();
                if !movement.kind.eq_ignore_ascii_case(EXCLUDED_COLLECT_TYPE) {
                    self.current.commodities.record_collected(&movement, system);
                    outcome.changed = true;
                }
            }
            EventKind::PowerplayDeliver => {
                self.current
                    .commodities
                    .record_delivered(&event.commodity_movement(), system);
                outcome.changed = true;
            }
            EventKind::DeliverPowerMicroResources => {
                for resource in event.micro_resources().iter().filter(|resource| {
                    resource
                        .kind
                        .to_ascii_lowercase()
                        .starts_with(POWER_MICRO_RESOURCE_PREFIX)
                }) {
                    self.current.commodities.record_delivered(resource, system);
                    outcome.changed = true;
                }
            }
            EventKind::PowerplayMerits => {
                outcome.category = self.on_merits(event, system);
                outcome.changed = outcome.category.is_some();
            }
            EventKind::PowerplayRank => {
                if let Some(rank) = record_rank(event) {
                    self.current.rank = rank;
                    outcome.changed = true;
                }
            }
            EventKind::Powerplay => outcome.changed = self.on_powerplay(event, system),
            EventKind::MissionCompleted => {
                if self.correct_late_donation() {
                    outcome.changed = true;
                    outcome.category = Some(ActivityCategory::DonationMission);
                }
            }
            EventKind::MultiSellExplorationData => {
                log::debug!(
                    "batch cartography sale, settling after {BATCH_CARTOGRAPHY_DEFERRAL} events"
                );
                self.batch_deferral = Some(BATCH_CARTOGRAPHY_DEFERRAL);
            }
            _ => {}
        }
        outcome
    }

    fn on_location(&mut self, event: &Event, system: &str, fold_pending: bool) -> bool {
        if system.is_empty() {
            return false;
        }
        let mut changed = false;
        if fold_pending && self.pending_earnings != 0 {
            let pending = std::mem::take(&mut self.pending_earnings);
            self.systems.entry(system).add_earnings(pending);
            changed = true;
        }
        let power = event.power_state();
        if power.is_some() {
            self.systems.upsert(system, power.as_ref());
            changed = true;
        }
        changed
    }

    fn start_new_session(&mut self, started_at: Option<DateTime<Utc>>) {
        let next = self.current.carry_forward(started_at);
        log::debug!(
            "session boundary after {} merits",
            self.current.earned_merits
        );
        self.previous = Some(std::mem::replace(&mut self.current, next));
    }

    fn on_merits(&mut self, event: &Event, system: &str) -> Option<ActivityCategory> {
        let award = event.merit_award()?;
        let total = award
            .total
            .unwrap_or_else(|| self.total_merits.saturating_add(award.gained));

        if !self.current.has_power() {
            self.current.power.clone_from(&award.power);
            self.current.rank = rank(non_negative_u64(total));
            self.starting_merits = total.saturating_sub(award.gained);
        }

        self.current.earned_merits = self.current.earned_merits.saturating_add(award.gained);
        self.total_merits = total;

        if system.is_empty() {
            self.pending_earnings = self.pending_earnings.saturating_add(award.gained);
        } else {
            self.systems.entry(system).add_earnings(award.gained);
        }

        let category = self.classifier.classify(&self.history);
        log::debug!("{} merits classified as {category}", award.gained);
        self.current.activities.add(category, award.gained);
        match category {
            ActivityCategory::Mined => {
                if let Some(sale) = self.history.mined_sale() {
                    self.current
                        .mined
                        .record(&sale.commodity, award.gained, sale.count);
                }
            }
            ActivityCategory::DonationMission => {
                self.history.consume_donation_pair();
            }
            _ => {}
        }
        self.last_award = award.gained;
        Some(category)
    }

    /// Late attach: adopt whatever pledge fields the record carries.
    fn on_powerplay(&mut self, event: &Event, system: &str) -> bool {
        let mut changed = false;
        let power = event.text("Power");
        if !power.is_empty() {
            self.current.power = power.to_string();
            changed = true;
        }
        if let Some(rank) = record_rank(event) {
            self.current.rank = rank;
            changed = true;
        }
        if let Some(merits) = event.try_int("Merits") {
            self.starting_merits = merits;
            self.total_merits = merits;
            changed = true;
        }
        if !system.is_empty() {
            self.systems.entry(system);
            changed = true;
        }
        changed
    }

    /// Move the last award into `DonationMission` when its mission completed after it.
    fn correct_late_donation(&mut self) -> bool {
        if self.current.activities.get(ActivityCategory::Unknown) <= 0
            || !is_donation_merits_second(&self.history)
        {
            return false;
        }
        let moved = self.current.activities.transfer(
            ActivityCategory::Unknown,
            ActivityCategory::DonationMission,
            self.last_award,
        );
        log::debug!("late donation mission, moved {moved} merits from unknown");
        self.last_award = 0;
        self.history.consume_donation_pair();
        true
    }

    /// Clear the current session's progress, per-system earnings and the previous
    /// session. Totals and the power pledge are kept.
    pub fn reset_progress(&mut self) {
        self.current.clear_progress();
        self.previous = None;
        self.systems.reset_earnings();
        self.pending_earnings = 0;
    }

    /// Restart "merits this session" from the current total.
    pub const fn reset_session_baseline(&mut self) {
        self.starting_merits = self.total_merits;
    }

    #[must_use]
    pub const fn history(&self) -> &SlidingEventHistory {
        &self.history
    }

    #[must_use]
    pub const fn classifier(&self) -> &ActivityClassifier {
        &self.classifier
    }

    #[must_use]
    pub const fn current_session(&self) -> &SessionLedger {
        &self.current
    }

    #[must_use]
    pub const fn previous_session(&self) -> Option<&SessionLedger> {
        self.previous.as_ref()
    }

    #[must_use]
    pub const fn systems(&self) -> &SystemLedgers {
        &self.systems
    }

    #[must_use]
    pub const fn total_merits(&self) -> i64 {
        self.total_merits
    }

    #[must_use]
    pub const fn starting_merits(&self) -> i64 {
        self.starting_merits
    }

    #[must_use]
    pub const fn merits_this_session(&self) -> i64 {
        self.total_merits.saturating_sub(self.starting_merits)
    }

    /// Merits awarded before the host knew which system they were earned in.
    #[must_use]
    pub const fn pending_earnings(&self) -> i64 {
        self.pending_earnings
    }

    #[must_use]
    pub const fn last_award(&self) -> i64 {
        self.last_award
    }

    #[must_use]
    pub const fn is_batch_pending(&self) -> bool {
        self.batch_deferral.is_some()
    }

    /// Progress through the current rank bracket, in percent to two decimals.
    #[must_use]
    pub fn rank_progress_percent(&self) -> f64 {
        let rank = self.current.rank;
        let into_bracket = self
            .total_merits
            .saturating_sub(i64::try_from(rank_lower_bound(rank)).unwrap_or(0));
        let delta = u64_to_f64(next_rank_delta(rank));
        round_hundredths(i64_to_f64(into_bracket) / delta * 100.0)
    }

    #[must_use]
    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            total_merits: self.total_merits,
            starting_merits: self.starting_merits,
            merits_this_session: self.merits_this_session(),
            rank: self.current.rank,
            rank_progress_percent: self.rank_progress_percent(),
            current_session: self.current.clone(),
            previous_session: self.previous.clone(),
            systems: self.systems.iter().cloned().collect(),
        }
    }
}

fn record_rank(event: &Event) -> Option<u32> {
    event
        .try_int("Rank")
        .and_then(|rank| u32::try_from(rank).ok())
}
