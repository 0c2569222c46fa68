//! Windowed heuristics attributing merit awards to the activity that produced them.
//!
//! Each rule inspects the first few positions of the history window, position 0 being
//! the triggering award. Rules overlap, so they are kept in an explicit priority table:
//! the first matching rule wins and nothing matching means [`ActivityCategory::Unknown`].

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DATALINK_SCAN_TYPE, DONATION_MISSION_PATTERN, HIGH_VALUE_SALE_RATIO,
    LOW_VALUE_SALE_MAX_PRICE, SALVAGE_TYPES, SHIP_SCAN_MAX_MERITS, SHIP_SCAN_MIN_STAGE,
    WAKE_SCAN_MATERIALS, is_rare_commodity,
};
use crate::event::{Event, EventKind};
use crate::history::SlidingEventHistory;
use crate::numbers::i64_to_f64;

/// Activity a merit award is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    Unknown,
    ShipScan,
    WakeScan,
    Bounty,
    RivalPowerKill,
    PowerPlayDelivery,
    DonationMission,
    ScanDataLinks,
    HoloscreenHack,
    RareGoods,
    Salvage,
    Cartography,
    HighValueCommoditySale,
    LowValueCommoditySale,
    Exobiology,
    Mined,
    OnFoot,
    CommitCrimes,
}

impl ActivityCategory {
    pub const COUNT: usize = 18;

    /// Every category in display order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Unknown,
        Self::ShipScan,
        Self::WakeScan,
        Self::Bounty,
        Self::RivalPowerKill,
        Self::PowerPlayDelivery,
        Self::DonationMission,
        Self::ScanDataLinks,
        Self::HoloscreenHack,
        Self::RareGoods,
        Self::Salvage,
        Self::Cartography,
        Self::HighValueCommoditySale,
        Self::LowValueCommoditySale,
        Self::Exobiology,
        Self::Mined,
        Self::OnFoot,
        Self::CommitCrimes,
    ];

    /// Bucket index, matching the position in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::ShipScan => "Ship Scans",
            Self::WakeScan => "Wake Scans",
            Self::Bounty => "Bounties",
            Self::RivalPowerKill => "Rival Power Kills",
            Self::PowerPlayDelivery => "Powerplay Deliveries",
            Self::DonationMission => "Donation Missions",
            Self::ScanDataLinks => "Scan Data Links",
            Self::HoloscreenHack => "Holoscreen Hacks",
            Self::RareGoods => "Rare Goods",
            Self::Salvage => "Salvage",
            Self::Cartography => "Cartography",
            Self::HighValueCommoditySale => "High Value Commodities",
            Self::LowValueCommoditySale => "Low Value Commodities",
            Self::Exobiology => "Exobiology",
            Self::Mined => "Mined",
            Self::OnFoot => "On Foot",
            Self::CommitCrimes => "Commit Crimes",
        }
    }
}

impl std::fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Predicate over the history window.
pub type RulePredicate = fn(&SlidingEventHistory) -> bool;

/// One row of the priority table.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierRule {
    pub category: ActivityCategory,
    pub predicate: RulePredicate,
}

impl ClassifierRule {
    #[must_use]
    pub const fn new(category: ActivityCategory, predicate: RulePredicate) -> Self {
        Self {
            category,
            predicate,
        }
    }

    #[must_use]
    pub fn matches(&self, history: &SlidingEventHistory) -> bool {
        (self.predicate)(history)
    }
}

/// Default resolution order. Narrow companion-event signatures come before the
/// price-threshold rules that would otherwise swallow them.
pub const DEFAULT_RULES: &[ClassifierRule] = &[
    ClassifierRule::new(ActivityCategory::ShipScan, is_ship_scan),
    ClassifierRule::new(ActivityCategory::WakeScan, is_wake_scan),
    ClassifierRule::new(ActivityCategory::Bounty, is_bounty),
    ClassifierRule::new(ActivityCategory::RivalPowerKill, is_rival_power_kill),
    ClassifierRule::new(ActivityCategory::PowerPlayDelivery, is_powerplay_delivery),
    ClassifierRule::new(ActivityCategory::DonationMission, is_donation_merits_first),
    ClassifierRule::new(ActivityCategory::ScanDataLinks, is_scan_data_links),
    ClassifierRule::new(ActivityCategory::HoloscreenHack, is_holoscreen_hack),
    ClassifierRule::new(ActivityCategory::RareGoods, is_rare_goods),
    ClassifierRule::new(ActivityCategory::Salvage, is_salvage),
    ClassifierRule::new(ActivityCategory::Cartography, is_single_cartography),
    ClassifierRule::new(ActivityCategory::HighValueCommoditySale, is_high_value_sale),
    ClassifierRule::new(ActivityCategory::LowValueCommoditySale, is_low_value_sale),
    ClassifierRule::new(ActivityCategory::Exobiology, is_exobiology),
    ClassifierRule::new(ActivityCategory::Mined, is_mined),
    ClassifierRule::new(ActivityCategory::CommitCrimes, is_commit_crimes),
    ClassifierRule::new(ActivityCategory::OnFoot, is_on_foot),
];

/// Ordered rule bank.
#[derive(Debug, Clone)]
pub struct ActivityClassifier {
    rules: Vec<ClassifierRule>,
}

impl Default for ActivityClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(DEFAULT_RULES.to_vec())
    }

    /// Classifier over a custom priority table.
    #[must_use]
    pub const fn with_rules(rules: Vec<ClassifierRule>) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &[ClassifierRule] {
        &self.rules
    }

    /// Category of the award at position 0.
    #[must_use]
    pub fn classify(&self, history: &SlidingEventHistory) -> ActivityCategory {
        self.rules
            .iter()
            .find(|rule| rule.matches(history))
            .map_or(ActivityCategory::Unknown, |rule| rule.category)
    }
}

/// Sum the merit awards that belong to one batch sale.
///
/// Walks the whole window newest first. Award amounts are summed once the first award
/// is met, and occurrences of `batch` never break the run. Any other event ends the
/// run: before `batch` has been seen the partial sum is discarded, after it the sum
/// stands. Returns 0 when `batch` is not in the window.
#[must_use]
pub fn sum_batch_merits(history: &SlidingEventHistory, batch: &EventKind) -> i64 {
    if !history.contains(batch) {
        return 0;
    }
    let mut total: i64 = 0;
    let mut counting = false;
    let mut batch_seen = false;
    for event in history.iter() {
        if let Some(award) = event.merit_award() {
            counting = true;
            total = total.saturating_add(award.gained);
        } else if event.is(batch) {
            batch_seen = true;
        } else if counting {
            if !batch_seen {
                total = 0;
            }
            break;
        }
    }
    total
}

fn is_award_at_front(history: &SlidingEventHistory) -> bool {
    history.kind_at(0, &EventKind::PowerplayMerits)
}

/// Award at position 0 with a companion at position 1 or 2 satisfying `companion`.
fn award_with_companion(
    history: &SlidingEventHistory,
    companion: impl Fn(&Event) -> bool,
) -> bool {
    is_award_at_front(history) && (1..=2).filter_map(|pos| history.get(pos)).any(companion)
}

fn donation_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(DONATION_MISSION_PATTERN).ok())
        .as_ref()
}

fn is_donation_mission(event: &Event) -> bool {
    event.is(&EventKind::MissionCompleted)
        && donation_pattern().is_some_and(|pattern| pattern.is_match(event.text("Name")))
}

fn name_in(event: &Event, table: &[&str]) -> bool {
    table.contains(&event.text("Name"))
}

pub fn is_ship_scan(history: &SlidingEventHistory) -> bool {
    let gained = history.get(0).map_or(0, |event| event.int("MeritsGained"));
    gained <= SHIP_SCAN_MAX_MERITS
        && award_with_companion(history, |event| {
            event.is(&EventKind::ShipTargeted) && event.int("ScanStage") >= SHIP_SCAN_MIN_STAGE
        })
}

pub fn is_wake_scan(history: &SlidingEventHistory) -> bool {
    award_with_companion(history, |event| {
        event.is(&EventKind::MaterialCollected) && name_in(event, WAKE_SCAN_MATERIALS)
    })
}

/// Bounty reward reached from position 1, passing over ship scans and at most one
/// further award, before any other event type.
pub fn is_bounty(history: &SlidingEventHistory) -> bool {
    if !is_award_at_front(history) {
        return false;
    }
    let mut skipped_award = false;
    for event in history.iter().skip(1) {
        match event.kind {
            EventKind::ShipTargeted => {}
            EventKind::PowerplayMerits if !skipped_award => skipped_award = true,
            EventKind::Bounty => return true,
            _ => return false,
        }
    }
    false
}

pub fn is_rival_power_kill(history: &SlidingEventHistory) -> bool {
    award_with_companion(history, |event| event.is(&EventKind::FactionKillBond))
}

pub fn is_powerplay_delivery(history: &SlidingEventHistory) -> bool {
    award_with_companion(history, |event| event.is(&EventKind::PowerplayDeliver))
}

/// Award at position 0 directly after its donation mission completed.
pub fn is_donation_merits_first(history: &SlidingEventHistory) -> bool {
    is_award_at_front(history) && history.get(1).is_some_and(is_donation_mission)
}

/// Donation mission at position 0 completing after its award.
pub fn is_donation_merits_second(history: &SlidingEventHistory) -> bool {
    history.get(0).is_some_and(is_donation_mission)
        && history.kind_at(1, &EventKind::PowerplayMerits)
}

pub fn is_scan_data_links(history: &SlidingEventHistory) -> bool {
    award_with_companion(history, |event| {
        event.is(&EventKind::DataScanned) && event.text("Type") == DATALINK_SCAN_TYPE
    })
}

pub fn is_holoscreen_hack(history: &SlidingEventHistory) -> bool {
    award_with_companion(history, |event| event.is(&EventKind::HoloscreenHacked))
}

pub fn is_rare_goods(history: &SlidingEventHistory) -> bool {
    award_with_companion(history, |event| {
        event
            .market_sale()
            .is_some_and(|sale| is_rare_commodity(&sale.commodity))
    })
}

pub fn is_salvage(history: &SlidingEventHistory) -> bool {
    award_with_companion(history, |event| {
        event.is(&EventKind::SearchAndRescue) && name_in(event, SALVAGE_TYPES)
    })
}

/// Single-system cartography sale; batch sales are settled separately.
pub fn is_single_cartography(history: &SlidingEventHistory) -> bool {
    award_with_companion(history, |event| event.is(&EventKind::SellExplorationData))
}

pub fn is_high_value_sale(history: &SlidingEventHistory) -> bool {
    award_with_companion(history, |event| {
        event.market_sale().is_some_and(|sale| {
            sale.avg_price_paid > 0
                && i64_to_f64(sale.sell_price) / i64_to_f64(sale.avg_price_paid)
                    >= HIGH_VALUE_SALE_RATIO
        })
    })
}

pub fn is_low_value_sale(history: &SlidingEventHistory) -> bool {
    award_with_companion(history, |event| {
        event
            .market_sale()
            .is_some_and(|sale| sale.sell_price <= LOW_VALUE_SALE_MAX_PRICE)
    })
}

pub fn is_exobiology(history: &SlidingEventHistory) -> bool {
    award_with_companion(history, |event| event.is(&EventKind::SellOrganicData))
}

pub fn is_mined(history: &SlidingEventHistory) -> bool {
    award_with_companion(history, |event| {
        event.market_sale().is_some_and(|sale| sale.is_mined())
    })
}

pub fn is_commit_crimes(history: &SlidingEventHistory) -> bool {
    award_with_companion(history, |event| event.is(&EventKind::CommitCrime))
}

pub fn is_on_foot(history: &SlidingEventHistory) -> bool {
    is_award_at_front(history) && history.is_on_foot()
}
