use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{ArgGroup, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cases;
mod dates;
mod eligibility;
mod input;
mod models;
mod report;
mod scorer;

use models::ChannelSnapshot;

#[derive(Parser)]
#[command(name = "channel-pulse")]
#[command(about = "Scores channel engagement against size-scaled expectations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Channel input, either a collaborator JSON snapshot or a bare video CSV
/// plus the channel's raw subscriber-count string.
#[derive(Args)]
#[command(group(
    ArgGroup::new("source")
        .args(["json", "csv"])
        .required(true)
        .multiple(false)
))]
struct ChannelArgs {
    /// Channel snapshot in the collaborator's JSON format
    #[arg(long)]
    json: Option<PathBuf>,
    /// Video statistics CSV (title,view_count,like_count,comment_count,published_at)
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Subscriber count as reported, e.g. "5,230명" (required with --csv)
    #[arg(long)]
    subscribers: Option<String>,
    /// Analysis date (ISO, defaults to today UTC)
    #[arg(long)]
    as_of: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a channel has enough recent uploads to analyze
    Check {
        #[command(flatten)]
        channel: ChannelArgs,
    },
    /// Score a channel and print its metric grades and case identifier
    Score {
        #[command(flatten)]
        channel: ChannelArgs,
    },
    /// Generate a markdown report with the matched analysis case
    Report {
        #[command(flatten)]
        channel: ChannelArgs,
        /// Authored case table JSON
        #[arg(long, default_value = "cases.json")]
        cases: PathBuf,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Check an authored case table for missing or duplicate identifiers
    ValidateCases {
        #[arg(long, default_value = "cases.json")]
        cases: PathBuf,
    },
}

fn channel_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "channel".to_string())
}

fn load_channel(args: &ChannelArgs) -> anyhow::Result<ChannelSnapshot> {
    if let Some(path) = &args.json {
        let mut snapshot = input::load_snapshot_json(path)?;
        if let Some(raw) = &args.subscribers {
            snapshot.subscriber_count = input::parse_count(raw)
                .with_context(|| format!("no usable subscriber count in {raw:?}"))?;
        }
        return Ok(snapshot);
    }

    let path = args.csv.as_ref().context("either --json or --csv is required")?;
    let raw = args
        .subscribers
        .as_ref()
        .context("--subscribers is required with --csv")?;
    let subscriber_count = input::parse_count(raw)
        .with_context(|| format!("no usable subscriber count in {raw:?}"))?;

    Ok(ChannelSnapshot {
        title: channel_title(path),
        subscriber_count,
        videos: input::load_videos_csv(path)?,
    })
}

fn resolve_as_of(args: &ChannelArgs) -> NaiveDate {
    args.as_of.unwrap_or_else(|| Utc::now().date_naive())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { channel } => {
            let as_of = resolve_as_of(&channel);
            let snapshot = load_channel(&channel)?;
            let check = eligibility::check(&snapshot.videos, as_of);
            println!(
                "{}: {} uploads within 3 months, {} within 1 month.",
                snapshot.title, check.in_three_months, check.in_one_month
            );
            if check.eligible {
                println!("Channel qualifies for analysis.");
            } else {
                println!(
                    "Channel does not qualify: needs at least 5 uploads within 3 months and 1 within 1 month."
                );
            }
        }
        Commands::Score { channel } => {
            let as_of = resolve_as_of(&channel);
            let snapshot = load_channel(&channel)?;
            let check = eligibility::check(&snapshot.videos, as_of);
            if !check.eligible {
                println!(
                    "Note: channel does not meet the upload-recency bar ({} within 3 months, {} within 1 month).",
                    check.in_three_months, check.in_one_month
                );
            }

            match scorer::score_channel(&snapshot.videos, snapshot.subscriber_count, as_of) {
                Some(result) => {
                    println!(
                        "{} ({} subscribers, {} videos, as of {}):",
                        snapshot.title,
                        snapshot.subscriber_count,
                        snapshot.videos.len(),
                        as_of
                    );
                    let views_band = scorer::view_thresholds(snapshot.subscriber_count);
                    let likes_band = scorer::like_band(snapshot.subscriber_count);
                    let comments_band = scorer::comment_band(snapshot.subscriber_count);
                    println!(
                        "- mean adjusted views {:.0} (expected {:.0}..{:.0}) -> {}",
                        result.views.value,
                        views_band.min,
                        views_band.max,
                        result.views.level.label()
                    );
                    println!(
                        "- like ratio {:.2}% (expected {:.2}%..{:.2}%) -> {}",
                        result.likes.value * 100.0,
                        likes_band.min * 100.0,
                        likes_band.max * 100.0,
                        result.likes.level.label()
                    );
                    println!(
                        "- comment ratio {:.2}% (expected {:.2}%..{:.2}%) -> {}",
                        result.comments.value * 100.0,
                        comments_band.min * 100.0,
                        comments_band.max * 100.0,
                        result.comments.level.label()
                    );
                    println!("Case identifier: {}", result.case_id());
                }
                None => println!("No recent videos to score."),
            }
        }
        Commands::Report {
            channel,
            cases,
            out,
        } => {
            let as_of = resolve_as_of(&channel);
            let snapshot = load_channel(&channel)?;
            let table = cases::CaseTable::from_path(&cases)?;
            let check = eligibility::check(&snapshot.videos, as_of);
            let result =
                scorer::score_channel(&snapshot.videos, snapshot.subscriber_count, as_of);
            let outcome = result
                .as_ref()
                .map(|result| table.resolve(&result.case_id()));

            let report = report::build_report(
                &snapshot,
                as_of,
                check,
                result.as_ref(),
                outcome.as_ref(),
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::ValidateCases { cases } => {
            let table = cases::CaseTable::from_path(&cases)?;
            let coverage = table.validate();
            if coverage.is_clean() {
                println!("Case table covers all 27 identifiers with no duplicates.");
            } else {
                if !coverage.missing.is_empty() {
                    println!(
                        "Missing {} of 27 identifiers: {}",
                        coverage.missing.len(),
                        coverage.missing.join(", ")
                    );
                }
                if !coverage.duplicates.is_empty() {
                    println!("Duplicate identifiers: {}", coverage.duplicates.join(", "));
                }
                if !coverage.mismatched.is_empty() {
                    println!(
                        "Cases whose metrics contradict their id: {}",
                        coverage.mismatched.join(", ")
                    );
                }
            }
        }
    }

    Ok(())
}
