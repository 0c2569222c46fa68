use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use powerplay_core::{ActivityCategory, SessionLedger, SystemLedger, TrackerSnapshot};

use crate::replay::{FileStats, Replay};

#[derive(Debug, Serialize)]
struct ReplayReport<'a> {
    current_system: &'a str,
    snapshot: TrackerSnapshot,
    files: &'a [FileStats],
}

fn trend_suffix(system: &SystemLedger) -> String {
    format!(
        "C{} R{} U{}",
        system.control_trend().arrow(),
        system.reinforcement_trend().arrow(),
        system.undermining_trend().arrow()
    )
}

fn system_line(system: &SystemLedger) -> String {
    if system.is_controlled() {
        format!(
            "{} : {} : {} : {:.2}% {}",
            system.earnings,
            system.controlling_power,
            system.state,
            system.control_progress * 100.0,
            trend_suffix(system)
        )
    } else {
        system.earnings.to_string()
    }
}

fn earning_systems(snapshot: &TrackerSnapshot) -> impl Iterator<Item = &SystemLedger> {
    snapshot
        .systems
        .iter()
        .filter(|system| system.earnings > 0)
}

fn previous_earned(snapshot: &TrackerSnapshot) -> i64 {
    snapshot
        .previous_session
        .as_ref()
        .map_or(0, |session| session.earned_merits)
}

fn file_line(stats: &FileStats) -> String {
    let span = stats
        .total_span()
        .map_or_else(|| "n/a".to_string(), |span| span.to_string());
    format!(
        "{} events, {} skipped lines, {} noise, {} duplicates, gained {} vs span {}",
        stats.events, stats.skipped_lines, stats.noise, stats.duplicates, stats.merits_gained, span
    )
}

pub fn generate_json_report(out: &mut impl Write, replay: &Replay) -> Result<()> {
    let report = ReplayReport {
        current_system: &replay.current_system,
        snapshot: replay.tracker.snapshot(),
        files: &replay.files,
    };
    let json_output = serde_json::to_string_pretty(&report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_console_report(out: &mut impl Write, replay: &Replay) -> Result<()> {
    let snapshot = replay.tracker.snapshot();
    let session = &snapshot.current_session;

    writeln!(out)?;
    writeln!(out, "{}", "📊 PowerPlay Progress".bright_cyan().bold())?;
    writeln!(out, "{}", "=====================".cyan())?;
    if session.has_power() {
        writeln!(
            out,
            "Pledged to {} at rank {} ({:.2}% to next rank)",
            session.power.bold(),
            snapshot.rank,
            snapshot.rank_progress_percent
        )?;
    }
    writeln!(out, "Total merits: {}", snapshot.total_merits)?;
    writeln!(
        out,
        "Merits this session: {}",
        snapshot.merits_this_session.to_string().green()
    )?;
    writeln!(out, "Since last dock/death: {}", session.earned_merits)?;
    writeln!(out, "Previous dock/death: {}", previous_earned(&snapshot))?;
    writeln!(out)?;

    if earning_systems(&snapshot).next().is_some() {
        writeln!(out, "{}", "🌌 Merits by System".bright_yellow().bold())?;
        for system in earning_systems(&snapshot) {
            writeln!(out, "  - {}: {}", system.name, system_line(system))?;
        }
        writeln!(out)?;
    }

    write_console_commodities(out, session)?;
    write_console_activities(out, session)?;

    writeln!(out, "{}", "🧾 Journal Files".bright_blue().bold())?;
    for stats in &replay.files {
        let marker = if stats.is_consistent() {
            "✅".green()
        } else {
            "⚠️".yellow()
        };
        writeln!(out, "{marker} {}", stats.path.bold())?;
        writeln!(out, "   {}", file_line(stats))?;
    }
    Ok(())
}

fn write_console_commodities(out: &mut impl Write, session: &SessionLedger) -> Result<()> {
    let commodities = &session.commodities;
    if commodities.total_collected() == 0 && commodities.total_delivered() == 0 {
        return Ok(());
    }
    writeln!(
        out,
        "{}",
        format!(
            "📦 PowerPlay Commodities (collected/delivered): {} t / {} t",
            commodities.total_collected(),
            commodities.total_delivered()
        )
        .bright_yellow()
        .bold()
    )?;
    if commodities.total_delivered() > 0 {
        writeln!(out, "Delivered by type:")?;
        for kind in commodities.delivered_types() {
            let count = commodities.delivered_of_type(kind);
            if count > 0 {
                writeln!(out, "  - {kind}: {count} t")?;
            }
        }
        writeln!(out, "Delivered by system:")?;
        for system in commodities.delivered_systems() {
            let count = commodities.delivered_to_system(system);
            if count > 0 {
                writeln!(out, "  - {system}: {count} t")?;
            }
        }
    }
    writeln!(out)?;
    Ok(())
}

fn write_console_activities(out: &mut impl Write, session: &SessionLedger) -> Result<()> {
    let mut rows = session.activities.iter_nonzero().peekable();
    if rows.peek().is_none() {
        return Ok(());
    }
    writeln!(out, "{}", "🎯 Merits by Activity".bright_yellow().bold())?;
    for (category, merits) in rows {
        let amount = if category == ActivityCategory::Unknown {
            merits.to_string().red()
        } else {
            merits.to_string().normal()
        };
        writeln!(out, "  - {category}: {amount}")?;
        if category == ActivityCategory::Mined {
            for mined in session.mined.iter() {
                writeln!(
                    out,
                    "     • {}: {} merits / {} t",
                    mined.commodity, mined.merits, mined.tonnage
                )?;
            }
        }
    }
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut impl Write, replay: &Replay) -> Result<()> {
    let snapshot = replay.tracker.snapshot();
    let session = &snapshot.current_session;

    writeln!(out, "# PowerPlay Progress\n")?;
    writeln!(out, "## Summary\n")?;
    if session.has_power() {
        writeln!(out, "- **Power**: {}", session.power)?;
        writeln!(
            out,
            "- **Rank**: {} ({:.2}% to next rank)",
            snapshot.rank, snapshot.rank_progress_percent
        )?;
    }
    writeln!(out, "- **Total merits**: {}", snapshot.total_merits)?;
    writeln!(out, "- **Merits this session**: {}", snapshot.merits_this_session)?;
    writeln!(out, "- **Since last dock/death**: {}", session.earned_merits)?;
    writeln!(out, "- **Previous dock/death**: {}\n", previous_earned(&snapshot))?;

    if earning_systems(&snapshot).next().is_some() {
        writeln!(out, "## Merits by System\n")?;
        writeln!(out, "| System | Merits | Power | State | Control | Trends |")?;
        writeln!(out, "|---|---:|---|---|---:|---|")?;
        for system in earning_systems(&snapshot) {
            writeln!(
                out,
                "| {} | {} | {} | {} | {:.2}% | {} |",
                system.name,
                system.earnings,
                system.controlling_power,
                system.state,
                system.control_progress * 100.0,
                if system.is_controlled() {
                    trend_suffix(system)
                } else {
                    String::new()
                }
            )?;
        }
        writeln!(out)?;
    }

    let commodities = &session.commodities;
    if commodities.total_collected() > 0 || commodities.total_delivered() > 0 {
        writeln!(out, "## PowerPlay Commodities\n")?;
        writeln!(out, "- **Collected**: {} t", commodities.total_collected())?;
        writeln!(out, "- **Delivered**: {} t", commodities.total_delivered())?;
        for kind in commodities.delivered_types() {
            writeln!(out, "  - {kind}: {} t", commodities.delivered_of_type(kind))?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Merits by Activity\n")?;
    let mut any_activity = false;
    for (category, merits) in session.activities.iter_nonzero() {
        any_activity = true;
        writeln!(out, "- **{category}**: {merits}")?;
        if category == ActivityCategory::Mined {
            for mined in session.mined.iter() {
                writeln!(
                    out,
                    "  - {}: {} merits / {} t",
                    mined.commodity, mined.merits, mined.tonnage
                )?;
            }
        }
    }
    if !any_activity {
        writeln!(out, "_No merits recorded._")?;
    }
    writeln!(out)?;

    writeln!(out, "## Journal Files\n")?;
    for stats in &replay.files {
        let status = if stats.is_consistent() { "✅" } else { "⚠️" };
        writeln!(out, "- {status} `{}`: {}", stats.path, file_line(stats))?;
    }
    Ok(())
}
