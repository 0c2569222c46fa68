//! PowerPlay Progress Core
//!
//! Platform-agnostic merit tracking for Elite Dangerous PowerPlay. Journal records are
//! folded one at a time into session, system, commodity and activity ledgers, with a
//! windowed classifier attributing each merit award to the activity that earned it.
//! This crate has no I/O beyond decoding journal text; hosts feed it records.

pub mod classifier;
pub mod constants;
pub mod event;
pub mod history;
pub mod journal;
pub mod ledger;
pub mod numbers;
pub mod rank;
pub mod tracker;

// Re-export commonly used types
pub use classifier::{
    ActivityCategory, ActivityClassifier, ClassifierRule, DEFAULT_RULES, sum_batch_merits,
};
pub use constants::is_rare_commodity;
pub use event::{
    CommodityMovement, Event, EventKind, MarketSale, MeritAward, MicroResource, PowerState,
};
pub use history::{Admission, SlidingEventHistory};
pub use journal::{JournalError, JournalRead, decode_line, read_lenient, read_strict};
pub use ledger::{
    ActivityLedger, CommodityEntry, CommodityLedger, MinedCommodity, MinedCommodityLedger,
    SessionLedger, SystemLedger, SystemLedgers, Trend,
};
pub use rank::{next_rank_delta, rank, rank_lower_bound};
pub use tracker::{EventOutcome, ProgressTracker, TrackerSnapshot};
