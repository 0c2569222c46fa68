use serde::{Deserialize, Serialize};

use crate::event::PowerState;

/// Direction of a PowerPlay metric since the system was first observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Unchanged,
}

impl Trend {
    #[must_use]
    pub fn between(original: f64, current: f64) -> Self {
        if current > original {
            Self::Increasing
        } else if current < original {
            Self::Decreasing
        } else {
            Self::Unchanged
        }
    }

    #[must_use]
    pub const fn arrow(self) -> char {
        match self {
            Self::Increasing => '\u{2191}',
            Self::Decreasing => '\u{2193}',
            Self::Unchanged => '\u{2194}',
        }
    }
}

/// Merits earned in one star system and its PowerPlay standing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemLedger {
    pub name: String,
    pub earnings: i64,
    pub controlling_power: String,
    pub state: String,
    pub control_progress: f64,
    pub reinforcement: f64,
    pub undermining: f64,
    pub original_control_progress: f64,
    pub original_reinforcement: f64,
    pub original_undermining: f64,
}

impl SystemLedger {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Overwrite the current standing. The first time a controlling power is seen the
    /// values also become the original snapshot.
    pub fn apply_power_state(&mut self, power: &PowerState) {
        if self.controlling_power.is_empty() {
            self.original_control_progress = power.control_progress;
            self.original_reinforcement = power.reinforcement;
            self.original_undermining = power.undermining;
        }
        self.controlling_power.clone_from(&power.controlling_power);
        self.state.clone_from(&power.state);
        self.control_progress = power.control_progress;
        self.reinforcement = power.reinforcement;
        self.undermining = power.undermining;
    }

    pub const fn add_earnings(&mut self, merits: i64) {
        self.earnings = self.earnings.saturating_add(merits);
    }

    #[must_use]
    pub fn control_trend(&self) -> Trend {
        Trend::between(self.original_control_progress, self.control_progress)
    }

    #[must_use]
    pub fn reinforcement_trend(&self) -> Trend {
        Trend::between(self.original_reinforcement, self.reinforcement)
    }

    #[must_use]
    pub fn undermining_trend(&self) -> Trend {
        Trend::between(self.original_undermining, self.undermining)
    }

    #[must_use]
    pub fn is_controlled(&self) -> bool {
        !self.controlling_power.is_empty()
    }
}

/// Every system referenced during the process lifetime, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemLedgers {
    entries: Vec<SystemLedger>,
}

impl SystemLedgers {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SystemLedger> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SystemLedger> {
        self.entries.iter_mut().find(|entry| entry.name == name)
    }

    /// Existing entry for `name`, created empty when missing.
    pub fn entry(&mut self, name: &str) -> &mut SystemLedger {
        let idx = match self.entries.iter().position(|entry| entry.name == name) {
            Some(idx) => idx,
            None => {
                log::debug!("tracking new system {name:?}");
                self.entries.push(SystemLedger::new(name));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx]
    }

    /// Apply a location/jump record. Unknown systems are only created when the record
    /// names a controlling power; returns the touched entry.
    pub fn upsert(&mut self, name: &str, power: Option<&PowerState>) -> Option<&mut SystemLedger> {
        match power {
            Some(power) => {
                let entry = self.entry(name);
                entry.apply_power_state(power);
                Some(entry)
            }
            None => self.get_mut(name),
        }
    }

    pub fn reset_earnings(&mut self) {
        for entry in &mut self.entries {
            entry.earnings = 0;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SystemLedger> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
