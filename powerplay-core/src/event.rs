//! Journal events as seen by the tracker.
//!
//! Records arrive as loosely-typed JSON objects. The `event` name is parsed once into
//! an [`EventKind`]; every other field stays in an open bag and is read through lenient
//! accessors that substitute zero/empty values instead of failing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::numbers::round_f64_to_i64;

/// Event types the tracker reacts to or inspects in the history window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PowerplayMerits,
    Powerplay,
    PowerplayRank,
    PowerplayCollect,
    PowerplayDeliver,
    DeliverPowerMicroResources,
    Location,
    FsdJump,
    Docked,
    Died,
    MissionCompleted,
    MultiSellExplorationData,
    SellExplorationData,
    ShipTargeted,
    MaterialCollected,
    Bounty,
    FactionKillBond,
    CommitCrime,
    DataScanned,
    HoloscreenHacked,
    MarketSell,
    SearchAndRescue,
    SellOrganicData,
    Disembark,
    Embark,
    SupercruiseEntry,
    /// Any other event, keyed by its lowercased name.
    Other(String),
}

impl EventKind {
    /// Parse an event name, ignoring case.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let lowered = name.to_ascii_lowercase();
        match lowered.as_str() {
            "powerplaymerits" => Self::PowerplayMerits,
            "powerplay" => Self::Powerplay,
            "powerplayrank" => Self::PowerplayRank,
            "powerplaycollect" => Self::PowerplayCollect,
            "powerplaydeliver" => Self::PowerplayDeliver,
            "deliverpowermicroresources" => Self::DeliverPowerMicroResources,
            "location" => Self::Location,
            "fsdjump" => Self::FsdJump,
            "docked" => Self::Docked,
            "died" => Self::Died,
            "missioncompleted" => Self::MissionCompleted,
            "multisellexplorationdata" => Self::MultiSellExplorationData,
            "sellexplorationdata" => Self::SellExplorationData,
            "shiptargeted" => Self::ShipTargeted,
            "materialcollected" => Self::MaterialCollected,
            "bounty" => Self::Bounty,
            "factionkillbond" => Self::FactionKillBond,
            "commitcrime" => Self::CommitCrime,
            "datascanned" => Self::DataScanned,
            "holoscreenhacked" => Self::HoloscreenHacked,
            "marketsell" => Self::MarketSell,
            "searchandrescue" => Self::SearchAndRescue,
            "sellorganicdata" => Self::SellOrganicData,
            "disembark" => Self::Disembark,
            "embark" => Self::Embark,
            "supercruiseentry" => Self::SupercruiseEntry,
            _ => Self::Other(lowered),
        }
    }

    /// Lowercased journal name of this kind.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::PowerplayMerits => "powerplaymerits",
            Self::Powerplay => "powerplay",
            Self::PowerplayRank => "powerplayrank",
            Self::PowerplayCollect => "powerplaycollect",
            Self::PowerplayDeliver => "powerplaydeliver",
            Self::DeliverPowerMicroResources => "deliverpowermicroresources",
            Self::Location => "location",
            Self::FsdJump => "fsdjump",
            Self::Docked => "docked",
            Self::Died => "died",
            Self::MissionCompleted => "missioncompleted",
            Self::MultiSellExplorationData => "multisellexplorationdata",
            Self::SellExplorationData => "sellexplorationdata",
            Self::ShipTargeted => "shiptargeted",
            Self::MaterialCollected => "materialcollected",
            Self::Bounty => "bounty",
            Self::FactionKillBond => "factionkillbond",
            Self::CommitCrime => "commitcrime",
            Self::DataScanned => "datascanned",
            Self::HoloscreenHacked => "holoscreenhacked",
            Self::MarketSell => "marketsell",
            Self::SearchAndRescue => "searchandrescue",
            Self::SellOrganicData => "sellorganicdata",
            Self::Disembark => "disembark",
            Self::Embark => "embark",
            Self::SupercruiseEntry => "supercruiseentry",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Whether this kind marks the end of a play session.
    #[must_use]
    pub const fn is_session_boundary(&self) -> bool {
        matches!(self, Self::Docked | Self::Died)
    }
}

/// A single journal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    /// Event name exactly as the journal spelled it.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Every field other than `event`, untouched.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Event {
    /// Build an event from a decoded JSON object. Non-object values become an empty
    /// event of unknown kind.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let mut fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let name = match fields.remove("event") {
            Some(Value::String(name)) => name,
            _ => String::new(),
        };
        let timestamp = fields
            .get("timestamp")
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|stamp| stamp.with_timezone(&Utc));
        Self {
            kind: EventKind::parse(&name),
            name,
            timestamp,
            fields,
        }
    }

    /// Decode a single JSON record.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Value>(json).map(Self::from_value)
    }

    /// Convenience constructor used by hosts and tests.
    #[must_use]
    pub fn with_fields(name: &str, fields: Value) -> Self {
        let mut event = Self::from_value(fields);
        event.kind = EventKind::parse(name);
        event.name = name.to_string();
        event
    }

    #[must_use]
    pub fn is(&self, kind: &EventKind) -> bool {
        &self.kind == kind
    }

    /// Integer field; floats are rounded and numeric strings parsed. Defaults to 0.
    #[must_use]
    pub fn int(&self, key: &str) -> i64 {
        self.try_int(key).unwrap_or(0)
    }

    /// Integer field, `None` when absent or not numeric.
    #[must_use]
    pub fn try_int(&self, key: &str) -> Option<i64> {
        match self.fields.get(key)? {
            Value::Number(num) => num
                .as_i64()
                .or_else(|| num.as_f64().map(round_f64_to_i64)),
            Value::String(raw) => raw.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Floating point field. Defaults to 0.0.
    #[must_use]
    pub fn float(&self, key: &str) -> f64 {
        match self.fields.get(key) {
            Some(Value::Number(num)) => num.as_f64().unwrap_or(0.0),
            Some(Value::String(raw)) => raw.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// String field. Defaults to "".
    #[must_use]
    pub fn text(&self, key: &str) -> &str {
        self.fields.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Boolean field. Defaults to false.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.fields
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Merit award view, only for `PowerplayMerits`.
    #[must_use]
    pub fn merit_award(&self) -> Option<MeritAward> {
        self.is(&EventKind::PowerplayMerits).then(|| MeritAward {
            power: self.text("Power").to_string(),
            gained: self.int("MeritsGained"),
            total: self.try_int("TotalMerits"),
        })
    }

    /// Controlling-power view of a `Location`/`FSDJump`; `None` when the system has no
    /// controlling power.
    #[must_use]
    pub fn power_state(&self) -> Option<PowerState> {
        let controlling_power = self.text("ControllingPower");
        if controlling_power.is_empty() {
            return None;
        }
        Some(PowerState {
            controlling_power: controlling_power.to_string(),
            state: self.text("PowerplayState").to_string(),
            control_progress: self.float("PowerplayStateControlProgress"),
            reinforcement: self.float("PowerplayStateReinforcement"),
            undermining: self.float("PowerplayStateUndermining"),
        })
    }

    /// Commodity view of `PowerplayCollect`/`PowerplayDeliver`.
    #[must_use]
    pub fn commodity_movement(&self) -> CommodityMovement {
        let kind = self.text("Type").to_string();
        let localised = self.text("Type_Localised");
        CommodityMovement {
            kind_localised: if localised.is_empty() {
                kind.clone()
            } else {
                localised.to_string()
            },
            kind,
            count: self.int("Count"),
        }
    }

    /// Market sale view, only for `MarketSell`.
    #[must_use]
    pub fn market_sale(&self) -> Option<MarketSale> {
        self.is(&EventKind::MarketSell).then(|| MarketSale {
            commodity: self.text("Type").to_string(),
            count: self.int("Count"),
            sell_price: self.int("SellPrice"),
            avg_price_paid: self.int("AvgPricePaid"),
        })
    }

    /// Entries of a `DeliverPowerMicroResources` record.
    #[must_use]
    pub fn micro_resources(&self) -> Vec<MicroResource> {
        let Some(Value::Array(items)) = self.fields.get("MicroResources") else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(Value::as_object)
            .map(|item| {
                let resource = Self {
                    kind: EventKind::Other(String::new()),
                    name: String::new(),
                    timestamp: None,
                    fields: item.clone(),
                };
                let kind = resource.text("Name").to_string();
                let localised = resource.text("Name_Localised");
                CommodityMovement {
                    kind_localised: if localised.is_empty() {
                        kind.clone()
                    } else {
                        localised.to_string()
                    },
                    kind,
                    count: resource.int("Count"),
                }
            })
            .collect()
    }
}

/// Payload of a `PowerplayMerits` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeritAward {
    pub power: String,
    pub gained: i64,
    /// Cumulative merits after the award; absent on some hand-built records.
    pub total: Option<i64>,
}

/// PowerPlay state carried by `Location`/`FSDJump` records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerState {
    pub controlling_power: String,
    pub state: String,
    pub control_progress: f64,
    pub reinforcement: f64,
    pub undermining: f64,
}

/// A quantity of a PowerPlay commodity or micro-resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommodityMovement {
    pub kind: String,
    pub kind_localised: String,
    pub count: i64,
}

/// One entry of a `DeliverPowerMicroResources` record.
pub type MicroResource = CommodityMovement;

/// Payload of a `MarketSell` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSale {
    pub commodity: String,
    pub count: i64,
    pub sell_price: i64,
    pub avg_price_paid: i64,
}

impl MarketSale {
    /// Nothing was paid for the cargo, so it was mined rather than bought.
    #[must_use]
    pub const fn is_mined(&self) -> bool {
        self.avg_price_paid == 0
    }
}
