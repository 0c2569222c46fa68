mod replay;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use replay::{Replay, expand_inputs};

#[derive(Debug, Parser)]
#[command(name = "powerplay-replay", version = "0.1.0")]
#[command(
    about = "Replay Elite Dangerous journal logs through the PowerPlay progress tracker"
)]
struct Args {
    /// Journal files or directories of *.log files, replayed in order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Star system the commander starts in, until a journal record names one
    #[arg(long, default_value = "")]
    system: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let files = expand_inputs(&args.inputs)?;
    if args.report == "console" && args.output.is_none() {
        announce_banner(files.len());
    }

    let mut replay = Replay::new(&args.system);
    for path in &files {
        let stats = replay.replay_file(path)?;
        log::info!(
            "replayed {} ({} events, {} merits)",
            stats.path,
            stats.events,
            stats.merits_gained
        );
    }

    write_report(&args, &replay)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn announce_banner(file_count: usize) {
    println!("{}", "🛰️ PowerPlay Journal Replay".bright_cyan().bold());
    println!("{}", "===========================".cyan());
    println!("Replaying {file_count} journal file(s)");
}

fn write_report(args: &Args, replay: &Replay) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => report::generate_json_report(&mut output_target, replay)?,
        "markdown" => report::generate_markdown_report(&mut output_target, replay)?,
        _ => report::generate_console_report(&mut output_target, replay)?,
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_defaults() {
        let args = Args::try_parse_from(["powerplay-replay", "journal.log"]).expect("parse");
        assert_eq!(args.report, "console");
        assert_eq!(args.system, "");
        assert!(!args.verbose);
        assert!(args.output.is_none());
        assert_eq!(args.inputs, vec![PathBuf::from("journal.log")]);
    }

    #[test]
    fn args_reject_unknown_report() {
        assert!(Args::try_parse_from(["powerplay-replay", "--report", "csv", "j.log"]).is_err());
        assert!(Args::try_parse_from(["powerplay-replay"]).is_err());
    }

    #[test]
    fn output_target_writes_file() {
        let path = std::env::temp_dir().join(format!(
            "powerplay-replay-target-{}",
            std::process::id()
        ));
        let mut target = OutputTarget::new(Some(path.clone())).expect("create");
        writeln!(target, "hello").expect("write");
        target.flush_inner().expect("flush");
        drop(target);
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "hello\n");
        let _ = std::fs::remove_file(path);
    }
}
