//! Accumulators folded by the tracker: per session, per star system, per PowerPlay
//! commodity, per mined commodity and per activity.

pub mod activity;
pub mod commodity;
pub mod session;
pub mod system;

pub use activity::{ActivityLedger, MinedCommodity, MinedCommodityLedger};
pub use commodity::{CommodityEntry, CommodityLedger};
pub use session::SessionLedger;
pub use system::{SystemLedger, SystemLedgers, Trend};
