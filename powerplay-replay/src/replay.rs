use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use powerplay_core::{Admission, Event, EventKind, ProgressTracker, read_lenient};

/// Sanity figures gathered while replaying one journal file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileStats {
    pub path: String,
    pub events: usize,
    pub skipped_lines: usize,
    pub noise: usize,
    pub duplicates: usize,
    /// Sum of `MeritsGained` over accepted awards.
    pub merits_gained: i64,
    /// Cumulative total before the first award of the file.
    pub first_total: Option<i64>,
    /// Cumulative total after the last award of the file.
    pub last_total: Option<i64>,
}

impl FileStats {
    /// Merits implied by the journal's own cumulative totals.
    #[must_use]
    pub fn total_span(&self) -> Option<i64> {
        Some(self.last_total? - self.first_total?)
    }

    /// Summed awards agree with the cumulative totals.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.total_span()
            .is_none_or(|span| span == self.merits_gained)
    }
}

/// Host side of the tracker: owns the current star system and per-file statistics.
#[derive(Debug, Default)]
pub struct Replay {
    pub tracker: ProgressTracker,
    pub current_system: String,
    pub files: Vec<FileStats>,
}

impl Replay {
    #[must_use]
    pub fn new(initial_system: &str) -> Self {
        Self {
            current_system: initial_system.to_string(),
            ..Self::default()
        }
    }

    /// Replay one journal file through the tracker.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn replay_file(&mut self, path: &Path) -> Result<&FileStats> {
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let read = read_lenient(BufReader::new(file))
            .with_context(|| format!("failed to read {}", path.display()))?;
        log::debug!(
            "{}: {} records, {} skipped",
            path.display(),
            read.events.len(),
            read.skipped
        );

        let mut stats = FileStats {
            path: path.display().to_string(),
            skipped_lines: read.skipped,
            ..FileStats::default()
        };
        for event in &read.events {
            self.replay_event(event, &mut stats);
        }
        self.files.push(stats);
        self.files
            .last()
            .context("file statistics missing after replay")
    }

    fn replay_event(&mut self, event: &Event, stats: &mut FileStats) {
        if matches!(
            event.kind,
            EventKind::Location | EventKind::FsdJump | EventKind::Docked
        ) || event.name.eq_ignore_ascii_case("CarrierJump")
        {
            let system = event.text("StarSystem");
            if !system.is_empty() && system != self.current_system {
                log::debug!("current system is now {system}");
                self.current_system = system.to_string();
            }
        }

        let outcome = self.tracker.handle(event, &self.current_system);
        stats.events += 1;
        match outcome.admission {
            Admission::Noise => stats.noise += 1,
            Admission::Duplicate => stats.duplicates += 1,
            Admission::Retained => {}
        }
        if let Some(award) = event.merit_award() {
            if outcome.admission != Admission::Duplicate {
                stats.merits_gained += award.gained;
                if let Some(total) = award.total {
                    if stats.first_total.is_none() {
                        stats.first_total = Some(total - award.gained);
                    }
                    stats.last_total = Some(total);
                }
            }
        }
    }
}

/// Expand input paths: directories contribute their `*.log` files in name order.
///
/// # Errors
///
/// Returns an error if a path does not exist or a directory cannot be listed.
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut logs: Vec<PathBuf> = std::fs::read_dir(input)
                .with_context(|| format!("failed to list {}", input.display()))?
                .filter_map(|entry| entry.ok().map(|entry| entry.path()))
                .filter(|path| {
                    path.is_file()
                        && path
                            .extension()
                            .is_some_and(|ext| ext.eq_ignore_ascii_case("log"))
                })
                .collect();
            logs.sort();
            if logs.is_empty() {
                log::warn!("no journal logs found in {}", input.display());
            }
            files.extend(logs);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            anyhow::bail!("input {} does not exist", input.display());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn system_follows_jumps_and_carrier_jumps() {
        let mut replay = Replay::new("Sol");
        let mut stats = FileStats::default();
        replay.replay_event(
            &Event::with_fields("FSDJump", json!({"StarSystem": "Fusang"})),
            &mut stats,
        );
        assert_eq!(replay.current_system, "Fusang");
        replay.replay_event(
            &Event::with_fields("CarrierJump", json!({"StarSystem": "Tobala"})),
            &mut stats,
        );
        assert_eq!(replay.current_system, "Tobala");
        replay.replay_event(
            &Event::with_fields(
                "PowerplayMerits",
                json!({"Power": "Jerome Archer", "MeritsGained": 12, "TotalMerits": 5_012}),
            ),
            &mut stats,
        );
        assert_eq!(
            replay.tracker.systems().get("Tobala").map(|s| s.earnings),
            Some(12)
        );
        assert_eq!(stats.events, 3);
        assert_eq!(stats.total_span(), Some(12));
        assert!(stats.is_consistent());
    }

    #[test]
    fn stats_count_noise_and_duplicates() {
        let mut replay = Replay::new("Tobala");
        let mut stats = FileStats::default();
        let award = Event::with_fields(
            "PowerplayMerits",
            json!({"Power": "Jerome Archer", "MeritsGained": 20, "TotalMerits": 1_020}),
        );
        replay.replay_event(&award, &mut stats);
        replay.replay_event(&award, &mut stats);
        replay.replay_event(&Event::with_fields("Music", json!({})), &mut stats);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.noise, 1);
        assert_eq!(stats.merits_gained, 20);
        assert_eq!(stats.first_total, Some(1_000));
    }

    #[test]
    fn missing_inputs_are_errors() {
        let missing = std::env::temp_dir().join("powerplay-replay-definitely-missing.log");
        assert!(expand_inputs(&[missing]).is_err());
    }
}
