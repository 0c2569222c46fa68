//! Bounded newest-first window of recently accepted journal events.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::classifier::{is_donation_merits_first, is_donation_merits_second};
use crate::constants::{HISTORY_DEPTH, is_noise_event};
use crate::event::{Event, EventKind, MarketSale};

/// Verdict returned when an event is offered to the history window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Admission {
    Retained,
    /// Event type carries no merit significance.
    Noise,
    /// Merit award repeating the cumulative total of the last retained award.
    Duplicate,
}

impl Admission {
    #[must_use]
    pub const fn is_retained(self) -> bool {
        matches!(self, Self::Retained)
    }
}

/// Window of at most [`HISTORY_DEPTH`] events, index 0 being the newest.
#[derive(Debug, Clone, Default)]
pub struct SlidingEventHistory {
    entries: VecDeque<Event>,
    on_foot: bool,
    last_award_total: Option<i64>,
}

impl SlidingEventHistory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_DEPTH + 1),
            on_foot: false,
            last_award_total: None,
        }
    }

    /// Offer an event to the window; `true` when it was retained.
    pub fn accept(&mut self, event: Event) -> bool {
        self.push(event).is_retained()
    }

    /// Offer an event to the window and report why it was or was not retained.
    ///
    /// The on-foot flag is updated before any filtering so noise and duplicates still
    /// move it.
    pub fn push(&mut self, event: Event) -> Admission {
        self.track_on_foot(&event);

        let award_total = event.merit_award().map(|award| award.total);
        if let Some(total) = award_total {
            if total.is_some() && total == self.last_award_total {
                log::trace!("history rejected duplicate award total {total:?}");
                return Admission::Duplicate;
            }
        }

        if is_noise_event(event.kind.key()) {
            return Admission::Noise;
        }

        if let Some(total) = award_total {
            self.last_award_total = total;
        }
        log::trace!("history retained {}", event.name);
        self.entries.push_front(event);
        self.entries.truncate(HISTORY_DEPTH);
        Admission::Retained
    }

    fn track_on_foot(&mut self, event: &Event) {
        match event.kind {
            EventKind::SupercruiseEntry | EventKind::Embark => self.on_foot = false,
            EventKind::Disembark if event.flag("OnPlanet") => self.on_foot = true,
            _ => {}
        }
    }

    /// Event at `position`, 0 being the newest.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Event> {
        self.entries.get(position)
    }

    /// Whether the event at `position` has the given kind.
    #[must_use]
    pub fn kind_at(&self, position: usize, kind: &EventKind) -> bool {
        self.get(position).is_some_and(|event| event.is(kind))
    }

    #[must_use]
    pub fn contains(&self, kind: &EventKind) -> bool {
        self.entries.iter().any(|event| event.is(kind))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest-first iteration.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.entries.iter()
    }

    #[must_use]
    pub const fn is_on_foot(&self) -> bool {
        self.on_foot
    }

    /// Drop the two newest entries when they form a donation pair in either order, so
    /// the pair cannot match again on the next event. Returns whether anything was
    /// removed.
    pub fn consume_donation_pair(&mut self) -> bool {
        if !(is_donation_merits_first(self) || is_donation_merits_second(self)) {
            return false;
        }
        self.entries.pop_front();
        self.entries.pop_front();
        true
    }

    /// Mined `MarketSell` companion of the newest award, preferring position 1.
    #[must_use]
    pub fn mined_sale(&self) -> Option<MarketSale> {
        (1..=2)
            .filter_map(|position| self.get(position))
            .filter_map(Event::market_sale)
            .find(MarketSale::is_mined)
    }
}
